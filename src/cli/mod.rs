pub mod config;
pub mod generate;
pub mod models;

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

#[derive(Parser)]
#[command(name = "maildraft")]
#[command(about = "Draft business emails from keywords with Gemini")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Draft an email from keywords
    Generate {
        /// Keywords to build the email around (repeat or comma-separate)
        #[arg(short, long = "keyword", required = true, num_args = 1..)]
        keywords: Vec<String>,
        /// Recipient name used in the greeting
        #[arg(short, long)]
        recipient: Option<String>,
        /// Draft language (ja, en)
        #[arg(short, long, default_value = "ja")]
        language: String,
        /// Gemini model to prefer (overrides config)
        #[arg(short, long)]
        model: Option<String>,
        /// Use the offline template generator instead of Gemini
        #[arg(long)]
        offline: bool,
        /// Print the draft as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the model candidates generation would try, in order
    Models {
        /// Gemini model to prefer (overrides config)
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Get a config value
    Get {
        /// Config key (gemini-api-key, gemini-model, backend, timeout)
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key (gemini-api-key, gemini-model, backend, timeout)
        key: String,
        /// Value to store
        value: String,
    },
    /// Remove a config value
    Unset {
        /// Config key to remove
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let rt = Runtime::new()?;

        rt.block_on(async {
            match self.command {
                Commands::Generate {
                    keywords,
                    recipient,
                    language,
                    model,
                    offline,
                    json,
                } => {
                    generate::handle_generate_command(generate::GenerateArgs {
                        keywords,
                        recipient,
                        language,
                        model,
                        offline,
                        json,
                    })
                    .await
                }
                Commands::Models { model } => models::handle_models_command(model).await,
                Commands::Config { command } => config::handle_config_command(command).await,
            }
        })
    }
}
