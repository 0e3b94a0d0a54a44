//! Loading [`GameRules`] from JSON.
//!
//! Missing fields fall back to the defaults, so a rules file only needs the
//! values it changes. Loaded rules are always validated.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use zubo_logic::config::{validate_rules, GameRules, RulesError};

/// Rules bundled with the game.
pub const DEFAULT_RULES_JSON: &str = include_str!("../../../data/rules.json");

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid rules: {0:?}")]
    InvalidRules(Vec<RulesError>),
}

/// Parse and validate rules from a JSON document.
pub fn rules_from_json(json: &str) -> Result<GameRules, LoadError> {
    let rules: GameRules = serde_json::from_str(json)?;
    let errors = validate_rules(&rules);
    if !errors.is_empty() {
        return Err(LoadError::InvalidRules(errors));
    }
    Ok(rules)
}

/// Read rules from a file on disk.
pub fn rules_from_path(path: impl AsRef<Path>) -> Result<GameRules, LoadError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rules = rules_from_json(&json)?;
    log::info!("loaded game rules from {}", path.display());
    Ok(rules)
}

/// The bundled rules.
pub fn default_rules() -> Result<GameRules, LoadError> {
    rules_from_json(DEFAULT_RULES_JSON)
}
