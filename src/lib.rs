/// Caseweaver - Campaign Editor Core
///
/// Core library behind the campaign editor for mystery-solver games:
/// document versioning and migration, entity identity and reference
/// integrity, import/export, and portrait processing.

pub mod config;
pub mod core;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
