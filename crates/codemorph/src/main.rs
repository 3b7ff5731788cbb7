use crate::prelude::*;
use clap::Parser;
use std::path::PathBuf;

mod configure;
mod error;
mod gemini;
mod guard;
mod prelude;
mod settings;
mod ui;
mod update;
mod workspace;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Rewrite a file in place with Google Gemini"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Settings file (defaults to <config dir>/codemorph/config.toml)
    #[clap(long, env = "CODEMORPH_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "CODEMORPH_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Ask the model to improve a file and replace its content
    Update(crate::update::UpdateOptions),

    /// Open the settings file
    Configure(crate::configure::ConfigureOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Update(options) => {
            if !crate::update::handler(options, app.global).await? {
                std::process::exit(1);
            }
            Ok(())
        }
        SubCommands::Configure(options) => crate::configure::handler(options, app.global).await,
    }
}
