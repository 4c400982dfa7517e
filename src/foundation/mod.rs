/// Shared id, resolution and color types.
pub mod core;
/// Error taxonomy.
pub mod error;
