/// Fixed card layout.
pub mod compose;
/// Field formatting.
pub mod format;
/// Validated card input.
pub mod record;
/// Retained scene model.
pub mod scene;
