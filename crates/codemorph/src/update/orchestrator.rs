use crate::gemini::Generator;
use crate::guard::InFlight;
use crate::prelude::*;
use crate::settings::SettingsStore;
use crate::ui::Ui;
use crate::workspace::{TargetResolver, Workspace};
use codemorph_core::settings::Settings;
use codemorph_core::update::{build_prompt, clean_response, GenerationRequest, Milestone, TextEdit};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

const MISSING_API_KEY: &str = "Gemini API key not configured. Please set up your API key.";
const CONFIGURE_NOW: &str = "Configure Now";

/// How an update run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Updated { target: PathBuf, saved: bool },
    Cancelled,
    NoTarget,
    MissingApiKey { configured: bool },
    EmptyFile,
    Busy,
    Failed { message: String },
}

impl Outcome {
    /// Cancellation is a normal way to end a run, not a failure.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Updated { .. } | Self::Cancelled)
    }
}

/// Everything an update run talks to.
pub struct Collaborators<'a> {
    pub resolver: &'a dyn TargetResolver,
    pub settings: &'a dyn SettingsStore,
    pub workspace: &'a dyn Workspace,
    pub generator: &'a dyn Generator,
    pub ui: &'a dyn Ui,
    pub in_flight: &'a InFlight,
}

/// Rewrite a file with the model.
///
/// `target` wins over the resolver's active file. Every outcome is reported
/// to the user through `Ui` before it is returned. The file is only ever
/// modified by one full-document edit, so a failed run leaves it as it was.
pub async fn update_file(
    deps: &Collaborators<'_>,
    target: Option<PathBuf>,
    cancel: &CancellationToken,
) -> Outcome {
    let Some(target) = target.or_else(|| deps.resolver.active_target()) else {
        deps.ui.error(&Error::NoTarget.to_string());
        return Outcome::NoTarget;
    };

    let mut slot = match deps.in_flight.slot(&target) {
        Ok(slot) => slot,
        Err(err) => return fail(deps, &target, err),
    };
    let _guard = match slot.try_acquire() {
        Ok(Some(guard)) => guard,
        Ok(None) => {
            deps.ui
                .error(&Error::Busy(target.display().to_string()).to_string());
            return Outcome::Busy;
        }
        Err(err) => return fail(deps, &target, err),
    };

    let settings = deps.settings.read();
    let Some(api_key) = settings.api_key.clone() else {
        return Outcome::MissingApiKey {
            configured: offer_configuration(deps),
        };
    };

    log::debug!("Updating {} with {}", target.display(), settings.model);

    let result = run(deps, &target, &settings, api_key, cancel).await;
    deps.ui.finish_progress();

    match result {
        Ok(Outcome::Updated { target, saved }) => {
            deps.ui.info("File updated successfully!");
            Outcome::Updated { target, saved }
        }
        Ok(Outcome::Cancelled) => {
            deps.ui.info("AI update cancelled.");
            Outcome::Cancelled
        }
        Ok(Outcome::EmptyFile) => {
            deps.ui.warn("File is empty. Nothing to update.");
            Outcome::EmptyFile
        }
        Ok(outcome) => outcome,
        Err(_) if cancel.is_cancelled() => {
            deps.ui.info("AI update was cancelled.");
            Outcome::Cancelled
        }
        Err(err) => fail(deps, &target, err),
    }
}

/// Log `err` and report it to the user.
fn fail(deps: &Collaborators<'_>, target: &Path, err: color_eyre::eyre::Report) -> Outcome {
    log::error!("Error updating {} with Gemini: {:?}", target.display(), err);

    let message = format!("{:#}", err);
    let message = if message.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        message
    };

    deps.ui.error(&format!("Failed to update file: {}", message));
    Outcome::Failed { message }
}

/// Ask the user whether to open the settings. Returns whether they were
/// opened.
fn offer_configuration(deps: &Collaborators<'_>) -> bool {
    if !deps.ui.choose(MISSING_API_KEY, CONFIGURE_NOW) {
        return false;
    }

    match deps.settings.open() {
        Ok(()) => true,
        Err(err) => {
            log::error!("Failed to open configuration: {:?}", err);
            deps.ui.error(&format!("Error: {:#}", err));
            false
        }
    }
}

async fn run(
    deps: &Collaborators<'_>,
    target: &Path,
    settings: &Settings,
    api_key: String,
    cancel: &CancellationToken,
) -> Result<Outcome> {
    let original = deps.workspace.open(target).await?;

    if original.trim().is_empty() {
        return Ok(Outcome::EmptyFile);
    }

    let request = GenerationRequest {
        api_key,
        model: settings.model.clone(),
        prompt: build_prompt(&settings.default_prompt, &original),
    };

    deps.ui.progress(Milestone::Connecting);
    deps.ui.progress(Milestone::Generating);

    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            log::debug!("Cancelled while waiting for Gemini");
            return Ok(Outcome::Cancelled);
        }
        response = deps.generator.generate(&request) => response?,
    };

    if cancel.is_cancelled() {
        return Ok(Outcome::Cancelled);
    }

    deps.ui.progress(Milestone::Processing);

    let cleaned = clean_response(&response);
    if cleaned.trim().is_empty() {
        return Err(Error::EmptyResponse.into());
    }

    deps.ui.progress(Milestone::Updating);

    let edit = TextEdit::full_replace(&original, cleaned);
    deps.workspace.apply_edit(target, &edit).await?;

    deps.ui.progress(Milestone::Saving);

    if settings.auto_save {
        deps.workspace.save(target).await?;
    }

    deps.ui.progress(Milestone::Complete);

    Ok(Outcome::Updated {
        target: target.to_path_buf(),
        saved: settings.auto_save,
    })
}
