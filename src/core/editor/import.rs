//! Campaign Import
//!
//! The import pipeline is the only entrance from raw JSON to an editable
//! document: parse, migrate to the current schema version, hydrate the
//! typed model (absent fields become zero values), and normalize by
//! assigning fresh tracking keys. Local files and URLs both funnel
//! through the same path; either the whole pipeline succeeds or the
//! caller's document is left untouched.

use std::path::Path;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::core::campaign::migration::{MigrationError, MigrationRegistry};
use crate::core::campaign::model::Campaign;
use crate::core::campaign::normalize;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("An import is already in progress")]
    ImportInProgress,

    #[error("Invalid campaign URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to fetch campaign: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Campaign fetch failed with HTTP status {0}")]
    HttpStatus(StatusCode),

    #[error("Failed to read campaign file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse campaign JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Migration(#[from] MigrationError),
}

pub type Result<T> = std::result::Result<T, ImportError>;

// ============================================================================
// Import Report
// ============================================================================

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Version the file declared before migration; absent counts as 0.
    pub from_version: u64,
    /// Version after migration, always the current schema version.
    pub to_version: u32,
    pub characters: usize,
    pub clues: usize,
    pub conditionals: usize,
}

impl ImportReport {
    fn for_campaign(campaign: &Campaign, from_version: u64) -> Self {
        Self {
            from_version,
            to_version: campaign.version,
            characters: campaign.characters.len(),
            clues: campaign.clues.len(),
            conditionals: campaign.conditionals.len(),
        }
    }

    /// Whether migration changed the document's declared version.
    pub fn migrated(&self) -> bool {
        self.from_version != u64::from(self.to_version)
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Imported campaign: {} characters, {} clues, {} conditionals",
            self.characters, self.clues, self.conditionals
        );
        if self.migrated() {
            summary.push_str(&format!(
                " (migrated from version {} to {})",
                self.from_version, self.to_version
            ));
        }
        summary
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Parse, migrate, and normalize a campaign from raw JSON text.
pub fn import_json(text: &str, registry: &MigrationRegistry) -> Result<(Campaign, ImportReport)> {
    let raw: Value = serde_json::from_str(text)?;
    let from_version = MigrationRegistry::declared_version(&raw)?;
    let migrated = registry.migrate(raw)?;
    let campaign: Campaign = serde_json::from_value(migrated)?;
    let campaign = normalize::normalize(campaign);
    let report = ImportReport::for_campaign(&campaign, from_version);
    Ok((campaign, report))
}

/// Read and import a campaign file from disk.
pub async fn import_file(
    path: impl AsRef<Path>,
    registry: &MigrationRegistry,
) -> Result<(Campaign, ImportReport)> {
    let path = path.as_ref();
    log::debug!("Importing campaign from {}", path.display());
    let text = tokio::fs::read_to_string(path).await?;
    import_json(&text, registry)
}

/// Fetch and import a campaign from a URL. Any non-success status is an
/// error; redirects are followed by the HTTP client.
pub async fn import_url(
    url: &str,
    registry: &MigrationRegistry,
) -> Result<(Campaign, ImportReport)> {
    let url = Url::parse(url)?;
    log::debug!("Importing campaign from {url}");
    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ImportError::HttpStatus(status));
    }
    let text = response.text().await?;
    import_json(&text, registry)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::core::campaign::model::CURRENT_VERSION;

    use super::*;

    fn registry() -> MigrationRegistry {
        MigrationRegistry::standard()
    }

    #[test]
    fn test_import_json_happy_path() {
        let text = json!({
            "version": CURRENT_VERSION,
            "title": {"en": "The Mansion"},
            "characters": [{"id": "butler", "name": "The Butler"}],
            "clues": [{"id": "knife"}],
        })
        .to_string();

        let (campaign, report) = import_json(&text, &registry()).unwrap();
        assert_eq!(campaign.version, CURRENT_VERSION);
        assert_eq!(report.characters, 1);
        assert_eq!(report.clues, 1);
        assert_eq!(report.conditionals, 0);
        assert!(!report.migrated());
        assert!(campaign.characters[0].key.is_assigned());
    }

    #[test]
    fn test_import_json_migrates_unversioned_documents() {
        let text = json!({"characters": [{"id": "butler"}]}).to_string();
        let (campaign, report) = import_json(&text, &registry()).unwrap();
        assert_eq!(campaign.version, CURRENT_VERSION);
        assert_eq!(report.from_version, 0);
        assert!(report.migrated());
    }

    #[test]
    fn test_import_json_rejects_newer_versions() {
        let text = json!({"version": 99}).to_string();
        let err = import_json(&text, &registry()).unwrap_err();
        assert!(matches!(
            err,
            ImportError::Migration(MigrationError::TooNew { found: 99, .. })
        ));
    }

    #[test]
    fn test_import_json_rejects_malformed_versions() {
        // Neither a quoted number nor a fraction may be coerced to a
        // schema version; both abort the import.
        for text in [r#"{"version": "2"}"#, r#"{"version": 2.5}"#] {
            let err = import_json(text, &registry()).unwrap_err();
            assert!(matches!(
                err,
                ImportError::Migration(MigrationError::MalformedVersion { .. })
            ));
        }
    }

    #[test]
    fn test_import_json_rejects_malformed_json() {
        let err = import_json("{not json", &registry()).unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
    }

    #[test]
    fn test_import_json_fills_missing_collections() {
        let (campaign, _) = import_json(r#"{"version": 1}"#, &registry()).unwrap();
        assert!(campaign.characters.is_empty());
        assert!(campaign.clues.is_empty());
        assert!(campaign.conditionals.is_empty());
        assert!(campaign.initial_characters.is_empty());
    }

    #[test]
    fn test_report_summary_mentions_migration() {
        let text = json!({"clues": [{"id": "knife"}]}).to_string();
        let (_, report) = import_json(&text, &registry()).unwrap();
        let summary = report.summary();
        assert!(summary.contains("1 clues"));
        assert!(summary.contains("migrated from version 0 to 1"));
    }

    #[tokio::test]
    async fn test_import_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign.json");
        std::fs::write(
            &path,
            json!({"version": 1, "characters": [{"id": "butler"}]}).to_string(),
        )
        .unwrap();

        let (campaign, report) = import_file(&path, &registry()).await.unwrap();
        assert_eq!(campaign.characters.len(), 1);
        assert_eq!(report.characters, 1);
    }

    #[tokio::test]
    async fn test_import_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = import_file(dir.path().join("absent.json"), &registry())
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }

    #[tokio::test]
    async fn test_import_url_rejects_invalid_urls() {
        let err = import_url("not a url", &registry()).await.unwrap_err();
        assert!(matches!(err, ImportError::InvalidUrl(_)));
    }
}
