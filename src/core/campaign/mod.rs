//! Campaign Document Module
//!
//! The campaign-definition document and the pipeline around it: version
//! migration, import normalization, stable-id and tracking-key identity,
//! reverse dependency lookup, and export sanitization.

pub mod dependencies;
pub mod export;
pub mod identity;
pub mod migration;
pub mod model;
pub mod normalize;

// Re-exports for convenience
pub use dependencies::dependents_of;
pub use export::{
    sanitize, to_pretty_json, write_to_file, ExportError, DEFAULT_EXPORT_FILE_NAME,
};
pub use identity::{
    allocate_stable_id, allocate_tracking_key, ensure_unique_id, sanitize_id, EntityKind,
};
pub use migration::{migrate, MigrationError, MigrationRegistry, MigrationStep};
pub use model::{
    Campaign, Character, CharacterId, Clue, ClueId, Conditional, LocalizedText, TrackingKey,
    CURRENT_VERSION,
};
pub use normalize::normalize;
