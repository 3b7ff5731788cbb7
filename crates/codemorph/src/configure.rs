use crate::prelude::{println, *};
use crate::settings::{default_settings_path, FileSettings, SettingsStore};

#[derive(Debug, clap::Args, Clone)]
pub struct ConfigureOptions {
    /// Print the effective settings instead of opening the settings file
    #[arg(long)]
    pub show: bool,
}

/// Handle the configure command
pub async fn handler(options: ConfigureOptions, global: crate::Global) -> Result<()> {
    let path = match global.config {
        Some(path) => path,
        None => default_settings_path()?,
    };
    let store = FileSettings::new(path, Default::default());

    if options.show {
        let rendered = store
            .read()
            .to_masked_toml()
            .map_err(|e| eyre!("Failed to render settings: {}", e))?;
        println!("# {}", store.path().display());
        println!("{}", rendered);
        return Ok(());
    }

    store.open()
}
