use crate::prelude::{println, *};
use codemorph_core::settings::{Settings, SettingsOverrides, SETTINGS_TEMPLATE};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Source of user settings and the way to edit them.
pub trait SettingsStore: Send + Sync {
    /// Read the current settings. Never fails: unreadable values fall back to
    /// their defaults.
    fn read(&self) -> Settings;

    /// Let the user edit the settings.
    fn open(&self) -> Result<()>;
}

/// Settings stored in a TOML file, with flag/environment overrides on top.
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
    overrides: SettingsOverrides,
}

impl FileSettings {
    pub fn new(path: PathBuf, overrides: SettingsOverrides) -> Self {
        Self { path, overrides }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the settings file from the template if it does not exist yet.
    pub fn ensure_exists(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| eyre!("Failed to create settings directory: {}", e))?;
        }

        fs::write(&self.path, SETTINGS_TEMPLATE)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        log::debug!("Created settings file at {}", self.path.display());

        Ok(())
    }
}

/// Default location of the settings file.
pub fn default_settings_path() -> Result<PathBuf> {
    let config_dir = dirs_next::config_dir()
        .ok_or_else(|| eyre!("Unable to determine config directory"))?
        .join("codemorph");

    Ok(config_dir.join("config.toml"))
}

impl SettingsStore for FileSettings {
    fn read(&self) -> Settings {
        let settings = match fs::read_to_string(&self.path) {
            Ok(source) => Settings::from_toml_str(&source),
            Err(e) => {
                log::debug!("No settings read from {}: {}", self.path.display(), e);
                Settings::default()
            }
        };

        settings.with_overrides(self.overrides.clone())
    }

    fn open(&self) -> Result<()> {
        self.ensure_exists()?;

        let Some(editor) = editor_command() else {
            println!("Settings file: {}", self.path.display());
            return Ok(());
        };

        let (program, args) = editor
            .split_first()
            .ok_or_eyre("Editor command is empty")?;

        let status = Command::new(program)
            .args(args)
            .arg(&self.path)
            .status()
            .with_context(|| format!("Failed to launch editor `{}`", program))?;

        if !status.success() {
            return Err(eyre!("Editor `{}` exited with {}", program, status));
        }

        Ok(())
    }
}

/// The user's editor from `$VISUAL` or `$EDITOR`, split into words.
fn editor_command() -> Option<Vec<String>> {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .filter_map(|value| shlex::split(&value))
        .find(|words| !words.is_empty())
}
