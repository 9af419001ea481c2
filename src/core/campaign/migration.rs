//! Campaign Document Migration
//!
//! A campaign file declares its schema `version`; documents predating the
//! field count as version 0. The registry holds pure transformation steps
//! keyed by the version they produce and upgrades an older document one
//! step at a time, tolerating gaps for versions whose change was purely
//! additive. Files newer than the compiled-in schema are refused rather
//! than guessed at, as are files whose declared version is not an
//! unsigned integer.
//!
//! Steps run on raw JSON values, before typed parsing, so a step can
//! reshape fields the current schema no longer understands.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use super::model::CURRENT_VERSION;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Campaign file version {found} is newer than the supported version {supported}")]
    TooNew { found: u64, supported: u32 },
    #[error("Campaign file declares the malformed version {found}; expected an unsigned integer")]
    MalformedVersion { found: Value },
}

pub type Result<T> = std::result::Result<T, MigrationError>;

/// A pure migration step: takes the raw document at version N-1, returns
/// it at version N. Steps never stamp the version field they produce; the
/// registry does that afterwards.
pub type MigrationStep = fn(Value) -> Value;

// ============================================================================
// Migration Registry
// ============================================================================

/// Registry of migration steps, keyed by target version.
pub struct MigrationRegistry {
    current: u32,
    steps: BTreeMap<u32, MigrationStep>,
}

impl MigrationRegistry {
    /// Empty registry targeting `current`. Versions without a registered
    /// step are bump-only no-ops.
    pub fn new(current: u32) -> Self {
        Self {
            current,
            steps: BTreeMap::new(),
        }
    }

    /// Registry for the compiled-in schema chain.
    pub fn standard() -> Self {
        let mut registry = Self::new(CURRENT_VERSION);
        registry.register(1, migrate_to_v1);
        registry
    }

    /// Register the step that produces `target`, replacing any step
    /// previously registered for the same version.
    pub fn register(&mut self, target: u32, step: MigrationStep) {
        self.steps.insert(target, step);
    }

    pub fn current_version(&self) -> u32 {
        self.current
    }

    /// Version a raw document declares. An absent or `null` field counts
    /// as 0, the pre-versioning schema; any other non-integer value is
    /// refused rather than coerced.
    pub fn declared_version(raw: &Value) -> Result<u64> {
        match raw.get("version") {
            None | Some(Value::Null) => Ok(0),
            Some(value) => value
                .as_u64()
                .ok_or_else(|| MigrationError::MalformedVersion {
                    found: value.clone(),
                }),
        }
    }

    /// Upgrade `raw` to the registry's current version.
    ///
    /// Applies, in ascending order, every registered step with a target in
    /// `(declared, current]`, then stamps `version` unconditionally. A
    /// document already at the current version passes through with only
    /// the stamp; a newer document, or one declaring a malformed version,
    /// fails without being touched.
    pub fn migrate(&self, raw: Value) -> Result<Value> {
        let from = Self::declared_version(&raw)?;
        if from > u64::from(self.current) {
            return Err(MigrationError::TooNew {
                found: from,
                supported: self.current,
            });
        }

        let mut doc = raw;
        // from <= current was just checked, so the cast is lossless.
        let from = from as u32;
        for target in (from + 1)..=self.current {
            if let Some(step) = self.steps.get(&target) {
                log::info!("Migrating campaign from version {} to {}", target - 1, target);
                doc = step(doc);
            }
        }

        if let Some(obj) = doc.as_object_mut() {
            obj.insert("version".to_string(), Value::from(self.current));
        }
        Ok(doc)
    }
}

impl Default for MigrationRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Upgrade `raw` with the compiled-in registry.
pub fn migrate(raw: Value) -> Result<Value> {
    MigrationRegistry::standard().migrate(raw)
}

// ============================================================================
// Steps
// ============================================================================

/// Version 1 introduced the `version` field itself. Pre-versioned documents
/// are structurally identical, so the step only anchors the chain.
fn migrate_to_v1(doc: Value) -> Value {
    doc
}

// ============================================================================
// Tests
// ============================================================================
