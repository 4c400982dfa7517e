/// Capture configuration model and JSON loading.
pub mod model;
