use anyhow::Result;
use console::style;

use crate::config::load_gemini_config;
use crate::services::gemini::{GeminiClient, ResolvedCandidate};

/// Show the candidates `generate` would try for the configured model.
pub async fn handle_models_command(model: Option<String>) -> Result<()> {
    let mut config = load_gemini_config()?;
    if let Some(model) = model {
        config = config.with_model(model);
    }
    let client = GeminiClient::new(config)?;
    let desired = client.config().desired_model();
    let candidates = client
        .resolve_candidates()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    print!("{}", format_candidates(&desired, &candidates));
    Ok(())
}

fn format_candidates(desired: &str, candidates: &[ResolvedCandidate]) -> String {
    let mut out = format!("{} {}\n\n", style("Desired model:").bold(), desired);

    if candidates.is_empty() {
        out.push_str(&format!(
            "{}\n",
            style("No model supporting generateContent is available.").yellow()
        ));
        return out;
    }

    for (index, candidate) in candidates.iter().enumerate() {
        let marker = if index == 0 {
            style("*").green().to_string()
        } else {
            " ".to_string()
        };
        out.push_str(&format!(
            "{marker} {:>2}. {}/{}\n",
            index + 1,
            style(candidate.api_version).dim(),
            style(&candidate.model_name).cyan()
        ));
    }
    out
}
