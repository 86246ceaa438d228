pub mod constants;
pub mod frame;
pub mod region;
pub mod settings;

/// Boxed error used at collaborator trait seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
