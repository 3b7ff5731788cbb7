pub mod clean;
pub mod edit;
pub mod progress;
pub mod prompt;
pub mod types;

pub use clean::clean_response;
pub use edit::{EditError, TextEdit};
pub use progress::Milestone;
pub use prompt::{build_prompt, DEFAULT_PROMPT};
pub use types::GenerationRequest;
