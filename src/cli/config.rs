use anyhow::Result;
use console::style;
use std::path::Path;

use super::ConfigCommands;
use crate::config::Config;
use crate::env::{apis as env_apis, generation as env_generation};

pub async fn handle_config_command(command: ConfigCommands) -> Result<()> {
    let path = Config::get_config_path()?;

    match command {
        ConfigCommands::Get { key } => {
            let value = config_get(&path, &key)?;
            println!("{value}");
        }
        ConfigCommands::Set { key, value } => {
            config_set(&path, &key, value)?;
            println!(
                "{} {} saved to {}",
                style("✓").green(),
                style(&key).cyan(),
                style(path.display()).dim()
            );
        }
        ConfigCommands::Unset { key } => {
            config_unset(&path, &key)?;
            println!("{} {} removed", style("✓").green(), style(&key).cyan());
        }
        ConfigCommands::List => print_config_list(&path)?,
        ConfigCommands::Path => println!("{}", path.display()),
    }

    Ok(())
}

fn config_get(path: &Path, key: &str) -> Result<String> {
    Config::load_from(path)?
        .get(key)
        .ok_or_else(|| anyhow::anyhow!("Config key '{key}' not found"))
}

fn config_set(path: &Path, key: &str, value: String) -> Result<()> {
    let mut config = Config::load_from(path)?;
    config.set(key, value)?;
    config.save_to(path)
}

fn config_unset(path: &Path, key: &str) -> Result<()> {
    let mut config = Config::load_from(path)?;
    config.unset(key)?;
    config.save_to(path)
}

fn print_config_list(path: &Path) -> Result<()> {
    let items = Config::load_from(path)?.list();

    if items.is_empty() {
        println!("{}", style("No configuration set.").dim());
        println!(
            "Set your Gemini API key with {}",
            style("maildraft config set gemini-api-key YOUR_KEY").cyan()
        );
    } else {
        for (key, value) in items {
            println!("  {} = {}", style(key).cyan(), style(value).dim());
        }
        println!("  file: {}", style(path.display()).dim());
    }

    let overrides: Vec<&str> = [
        env_apis::GEMINI_API_KEY,
        env_apis::GEMINI_MODEL,
        env_apis::GEMINI_BASE_URL,
        env_generation::BACKEND,
        env_generation::TIMEOUT,
    ]
    .into_iter()
    .filter(|name| std::env::var(name).is_ok_and(|v| !v.trim().is_empty()))
    .collect();
    if !overrides.is_empty() {
        println!(
            "{} overridden by environment: {}",
            style("!").yellow(),
            overrides.join(", ")
        );
    }

    Ok(())
}
