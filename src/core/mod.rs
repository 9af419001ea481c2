
pub mod campaign;
pub mod editor;
pub mod logging;
