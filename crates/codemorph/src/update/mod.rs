use crate::gemini::{GeminiGenerator, Generator};
use crate::guard::InFlight;
use crate::prelude::{println, *};
use crate::settings::{default_settings_path, FileSettings};
use crate::ui::Console;
use crate::workspace::{ActiveFile, FsWorkspace};
use codemorph_core::settings::SettingsOverrides;
use codemorph_core::update::GenerationRequest;
use std::future::Future;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;

mod orchestrator;

pub use orchestrator::{update_file, Collaborators, Outcome};

#[derive(Debug, clap::Args, Clone)]
pub struct UpdateOptions {
    /// File to rewrite (defaults to the active file)
    pub file: Option<PathBuf>,

    /// File currently focused in the host editor
    #[clap(long, env = "CODEMORPH_ACTIVE_FILE")]
    pub active_file: Option<PathBuf>,

    /// Gemini API key (overrides `apiKey`)
    #[clap(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name (overrides `ai.model`)
    #[clap(long, env = "CODEMORPH_MODEL")]
    pub model: Option<String>,

    /// Instruction sent with the file (overrides `defaultPrompt`)
    #[clap(long, env = "CODEMORPH_PROMPT")]
    pub prompt: Option<String>,

    /// Write the result back to disk (overrides `autoSave`)
    #[clap(long, env = "CODEMORPH_AUTO_SAVE")]
    pub auto_save: Option<bool>,

    /// Output the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

/// Cancels `cancel` when `signal` fires during a generation call.
///
/// The signal is only listened to while the call is running. Tokio keeps a
/// handler installed once registered, so only prompts shown before the
/// first call keep the default Ctrl-C behavior.
pub struct Interruptible<G, S> {
    inner: G,
    cancel: CancellationToken,
    signal: S,
}

impl<G, S, F> Interruptible<G, S>
where
    G: Generator,
    S: Fn() -> F + Send + Sync,
    F: Future<Output = std::io::Result<()>> + Send + 'static,
{
    pub fn new(inner: G, cancel: CancellationToken, signal: S) -> Self {
        Self {
            inner,
            cancel,
            signal,
        }
    }
}

#[async_trait::async_trait]
impl<G, S, F> Generator for Interruptible<G, S>
where
    G: Generator,
    S: Fn() -> F + Send + Sync,
    F: Future<Output = std::io::Result<()>> + Send + 'static,
{
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let signal = (self.signal)();
        let cancel = self.cancel.clone();
        let _watcher = AbortOnDropHandle::new(tokio::spawn(async move {
            if signal.await.is_ok() {
                log::debug!("Interrupted, cancelling");
                cancel.cancel();
            }
        }));

        self.inner.generate(request).await
    }
}

#[derive(Debug, serde::Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    outcome: &'a Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
}

/// Handle the update command. Returns whether the run succeeded.
pub async fn handler(options: UpdateOptions, global: crate::Global) -> Result<bool> {
    let settings_path = match global.config {
        Some(path) => path,
        None => default_settings_path()?,
    };

    let settings = FileSettings::new(
        settings_path,
        SettingsOverrides {
            api_key: options.api_key,
            model: options.model,
            default_prompt: options.prompt,
            auto_save: options.auto_save,
        },
    );

    if global.verbose {
        anstream::eprintln!("Settings: {}", settings.path().display());
    }

    let resolver = ActiveFile(options.active_file);
    let workspace = FsWorkspace::new();
    let cancel = CancellationToken::new();
    let generator = Interruptible::new(GeminiGenerator, cancel.clone(), tokio::signal::ctrl_c);
    let ui = Console::new();
    let in_flight = InFlight::in_cache_dir()?;

    let deps = Collaborators {
        resolver: &resolver,
        settings: &settings,
        workspace: &workspace,
        generator: &generator,
        ui: &ui,
        in_flight: &in_flight,
    };

    let outcome = update_file(&deps, options.file, &cancel).await;

    let unsaved = workspace.unsaved();
    let content = unsaved.first().map(|(_, text)| text.as_str());

    if options.json {
        let report = JsonReport {
            outcome: &outcome,
            content,
        };
        let json_output = serde_json::to_string_pretty(&report)
            .map_err(|e| eyre!("Failed to serialize output: {}", e))?;
        println!("{}", json_output);
    } else if let Some(content) = content {
        println!("{}", content);
    }

    Ok(outcome.is_success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Answers after `release` is notified, or immediately when `None`.
    struct Gated {
        release: Option<Arc<Notify>>,
    }

    #[async_trait::async_trait]
    impl Generator for Gated {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
            if let Some(release) = &self.release {
                release.notified().await;
            }
            Ok("done".to_string())
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            api_key: "test-key".to_string(),
            model: "gemini-2.0-flash".to_string(),
            prompt: "x=1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_signal_during_call_cancels() {
        let cancel = CancellationToken::new();
        let generator = Interruptible::new(
            Gated {
                release: Some(Arc::new(Notify::new())),
            },
            cancel.clone(),
            || async { Ok(()) },
        );

        tokio::select! {
            _ = generator.generate(&request()) => panic!("call should still be waiting"),
            _ = cancel.cancelled() => {}
        }
    }

    #[tokio::test]
    async fn test_signal_is_only_armed_during_call() {
        let cancel = CancellationToken::new();
        let armed = Arc::new(AtomicUsize::new(0));
        let interrupt = Arc::new(Notify::new());

        let generator = Interruptible::new(Gated { release: None }, cancel.clone(), {
            let armed = Arc::clone(&armed);
            let interrupt = Arc::clone(&interrupt);
            move || {
                armed.fetch_add(1, Ordering::SeqCst);
                let interrupt = Arc::clone(&interrupt);
                async move {
                    interrupt.notified().await;
                    Ok(())
                }
            }
        });

        assert_eq!(armed.load(Ordering::SeqCst), 0);

        let response = generator.generate(&request()).await.unwrap();
        assert_eq!(response, "done");
        assert_eq!(armed.load(Ordering::SeqCst), 1);

        interrupt.notify_waiters();
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert!(!cancel.is_cancelled());
    }
}
