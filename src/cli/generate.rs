use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::load_gemini_config;
use crate::error::MailDraftError;
use crate::logging::log_error_detailed;
use crate::models::{DraftLanguage, EmailDraft, EmailRequest, GenerationBackend};
use crate::services::{create_generator, EmailGenerator};

pub struct GenerateArgs {
    pub keywords: Vec<String>,
    pub recipient: Option<String>,
    pub language: String,
    pub model: Option<String>,
    pub offline: bool,
    pub json: bool,
}

pub async fn handle_generate_command(args: GenerateArgs) -> Result<()> {
    let keywords = split_keywords(&args.keywords)?;
    let language = args
        .language
        .parse::<DraftLanguage>()
        .map_err(|e| MailDraftError::validation("language".to_string(), e))?;

    let mut config = load_gemini_config()?;
    if let Some(model) = args.model {
        config = config.with_model(model);
    }
    if args.offline {
        config = config.with_backend(GenerationBackend::Offline);
    }

    let mut request = EmailRequest::new(keywords).with_language(language);
    if let Some(recipient) = args.recipient {
        request = request.with_recipient(recipient);
    }

    let generator = create_generator(config)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let show_spinner = !args.json && atty::is(atty::Stream::Stderr);
    let draft = match run_generation(generator.as_ref(), request, cancel, show_spinner).await {
        Ok(draft) => draft,
        Err(e) => {
            log_error_detailed(&e, "generate", e.category());
            anyhow::bail!(e.user_message());
        }
    };

    if !args.json {
        eprintln!(
            "{} {}",
            style("✓").green(),
            style(format!("Drafted with {}", generator.backend())).dim()
        );
    }
    println!("{}", render_draft(&draft, args.json)?);

    Ok(())
}

/// Flattens repeated and comma-separated keyword arguments, dropping blanks.
pub fn split_keywords(raw: &[String]) -> crate::Result<Vec<String>> {
    let keywords: Vec<String> = raw
        .iter()
        .flat_map(|value| value.split([',', '、']))
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect();

    if keywords.is_empty() {
        return Err(MailDraftError::validation(
            "keywords",
            "at least one keyword is required",
        ));
    }

    Ok(keywords)
}

/// Runs one drafting request, showing a spinner on stderr while it is in flight.
pub async fn run_generation(
    generator: &dyn EmailGenerator,
    request: EmailRequest,
    cancel: CancellationToken,
    show_spinner: bool,
) -> crate::Result<EmailDraft> {
    let spinner = if show_spinner {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    } else {
        ProgressBar::hidden()
    };
    spinner.set_message(format!("Drafting email ({})...", generator.backend()));

    let result = generator.generate_with_cancel(request, cancel).await;
    spinner.finish_and_clear();

    result
}

pub fn render_draft(draft: &EmailDraft, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(draft)?)
    } else {
        Ok(format!("Subject: {}\n\n{}", draft.subject, draft.body))
    }
}
