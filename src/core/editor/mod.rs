//! Editor Module
//!
//! The headless half of the campaign editing surface: the owning session,
//! the import pipeline behind it, and portrait processing.

pub mod import;
pub mod portrait;
pub mod session;

// Re-exports for convenience
pub use import::{import_file, import_json, import_url, ImportError, ImportReport};
pub use portrait::{
    process_portrait, PortraitError, MAX_PORTRAIT_BYTES, PORTRAIT_JPEG_QUALITY, PORTRAIT_MAX_DIM,
};
pub use session::EditorSession;
