//! Campaign Export
//!
//! Exports serialize a sanitized deep copy of the live document: tracking
//! keys are cleared on the copy so the file carries content only. The
//! model enforces the same guarantee a second time, since keys have no
//! `Serialize` impl at all.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::model::{Campaign, TrackingKey};

/// File name the embedding UI offers for a downloaded campaign.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "campaign.json";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize campaign: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write campaign file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

// ============================================================================
// Sanitization
// ============================================================================

/// Deep copy of `campaign` with every tracking key cleared. The input keeps
/// its keys, so live list identity is unaffected; the copy is what gets
/// serialized or handed to an embedding application.
pub fn sanitize(campaign: &Campaign) -> Campaign {
    let mut out = campaign.clone();
    for character in &mut out.characters {
        character.key = TrackingKey::nil();
    }
    for clue in &mut out.clues {
        clue.key = TrackingKey::nil();
    }
    for conditional in &mut out.conditionals {
        conditional.key = TrackingKey::nil();
    }
    out
}

/// Sanitized document as pretty-printed JSON (two-space indent), the exact
/// payload for clipboard export.
pub fn to_pretty_json(campaign: &Campaign) -> Result<String> {
    Ok(serde_json::to_string_pretty(&sanitize(campaign))?)
}

/// Write the sanitized document to `path`.
pub fn write_to_file(campaign: &Campaign, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, to_pretty_json(campaign)?)?;
    log::info!("Exported campaign to {}", path.display());
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
