mod replay;
mod script;
mod terminal_output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use slashwire_commands::{build_demo_registry, Router, RouterSettings};
use slashwire_config::{apply_all_defaults, config_dir, config_file_path, load_config, SlashwireConfig};

use script::Script;

#[derive(Parser)]
#[command(name = "slashwire")]
#[command(about = "slashwire — slash-command router for chat platforms")]
#[command(version)]
struct Cli {
    /// Config file (defaults to `$SLASHWIRE_CONFIG_DIR/config.yaml`)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed a scripted list of interactions through the demo command set
    Replay {
        /// YAML script with an `interactions` list
        script: PathBuf,
    },
    /// List the demo commands
    Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging is configured from the file, so validate only once it is up.
    let config_path = cli.config.unwrap_or_else(|| config_file_path(&config_dir()));
    let config = apply_all_defaults(load_config(&config_path).await?);
    init_logging(&config);
    let config = slashwire_config::check(config)?;

    let registry = build_demo_registry().context("Demo command set is malformed")?;

    match cli.command {
        Commands::Commands => {
            let listing = terminal_output::render_commands(
                &registry.commands(),
                terminal_output::supports_color(),
            );
            println!("{listing}");
        }
        Commands::Replay { script } => {
            let script = Script::load(&script).await?;
            let router = Arc::new(Router::with_settings(registry, RouterSettings::from(&config)));
            for transcript in replay::replay(router, &script).await? {
                println!("{}", serde_json::to_string(&transcript)?);
            }
        }
    }

    Ok(())
}

fn init_logging(config: &SlashwireConfig) {
    let logging = config.logging.clone().unwrap_or_default();
    let level = logging.level.unwrap_or_else(|| "info".to_string());
    let dir = logging.dir.filter(|d| !d.trim().is_empty());
    slashwire_logging::init_logger(dir, &level, logging.json.unwrap_or(true));
}
