//! Model discovery and ranking
//!
//! Both API versions publish their own registry. Every registry is ranked in
//! three passes (preferred names, stable names, everything else that can
//! generate) and the per-version results are concatenated, v1 first.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, warn};

use super::api::GeminiApi;
use super::errors::GeminiError;
use super::models::{ApiVersion, ModelDescriptor, ResolvedCandidate};

/// Substituted when no model is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-001";

/// Known-good models, tried right after the desired one.
pub const PREFERRED_MODELS: [&str; 9] = [
    "gemini-1.5-flash-001",
    "gemini-1.5-flash",
    "gemini-1.5-flash-8b",
    "gemini-1.5-flash-latest",
    "gemini-1.5-pro-001",
    "gemini-1.5-pro",
    "gemini-pro",
    "gemini-1.0-pro",
    "gemini-1.0-pro-001",
];

lazy_static! {
    static ref FLASH_SHORTHAND: Regex = Regex::new(r"(?i)^gemini-1\.5-flash$").unwrap();
    static ref STABLE_MODEL_NAME: Regex =
        Regex::new(r"(?i)^gemini-(?:1(?:\.\d+)?|1\.5|1\.0|pro)").unwrap();
}

/// Maps an empty name to the default and the flash shorthand to its dated
/// release. Anything else passes through trimmed.
pub fn normalize_model_name(raw: Option<&str>) -> String {
    let trimmed = raw.unwrap_or_default().trim();
    if trimmed.is_empty() || FLASH_SHORTHAND.is_match(trimmed) {
        return DEFAULT_MODEL.to_string();
    }
    trimmed.to_string()
}

pub fn is_stable_model_name(name: &str) -> bool {
    STABLE_MODEL_NAME.is_match(name)
}

/// Desired name first, then the static list, without repeats.
pub fn preference_order(desired: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    std::iter::once(desired)
        .chain(PREFERRED_MODELS)
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Ranks one version's registry. `seen` spans the whole resolution so a
/// (version, model) pair is emitted at most once.
pub fn rank_models(
    version: ApiVersion,
    models: &[ModelDescriptor],
    preferred: &[String],
    seen: &mut HashSet<ResolvedCandidate>,
) -> Vec<ResolvedCandidate> {
    let mut ranked = Vec::new();
    let mut push = |model: &ModelDescriptor, ranked: &mut Vec<ResolvedCandidate>| {
        if !model.supports_generation() {
            return;
        }
        let candidate = ResolvedCandidate::new(version, model.name.as_str());
        if seen.insert(candidate.clone()) {
            ranked.push(candidate);
        }
    };

    for name in preferred {
        if let Some(model) = models.iter().find(|m| &m.name == name) {
            push(model, &mut ranked);
        }
    }

    for model in models.iter().filter(|m| is_stable_model_name(&m.name)) {
        push(model, &mut ranked);
    }

    for model in models {
        push(model, &mut ranked);
    }

    ranked
}

/// Pure ranking over already-fetched registries, in the order given.
pub fn rank_candidates(
    registries: &[(ApiVersion, Vec<ModelDescriptor>)],
    desired: &str,
) -> Vec<ResolvedCandidate> {
    let preferred = preference_order(&normalize_model_name(Some(desired)));
    let mut seen = HashSet::new();

    registries
        .iter()
        .flat_map(|(version, models)| rank_models(*version, models, &preferred, &mut seen))
        .collect()
}

pub struct ModelResolver<'a> {
    api: &'a GeminiApi,
}

impl<'a> ModelResolver<'a> {
    pub fn new(api: &'a GeminiApi) -> Self {
        Self { api }
    }

    /// Fetches both registries and ranks them. A version whose registry
    /// cannot be fetched contributes nothing; an empty result means no model
    /// is usable.
    pub async fn resolve_candidates(&self, desired: &str) -> Vec<ResolvedCandidate> {
        let mut registries = Vec::with_capacity(ApiVersion::ALL.len());

        for version in ApiVersion::ALL {
            match self.api.list_models(version).await {
                Ok(models) => registries.push((version, models)),
                Err(e) => {
                    warn!(%version, error = %e, "Skipping API version, model list unavailable");
                }
            }
        }

        let candidates = rank_candidates(&registries, desired);
        debug!(
            desired,
            candidates = ?candidates.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "Resolved model candidates"
        );
        candidates
    }

    /// First-ranked candidate only.
    pub async fn resolve_model(&self, desired: &str) -> Result<ResolvedCandidate, GeminiError> {
        self.resolve_candidates(desired)
            .await
            .into_iter()
            .next()
            .ok_or(GeminiError::NoModelsAvailable)
    }
}
