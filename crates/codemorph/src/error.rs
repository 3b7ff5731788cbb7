#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("AI returned empty content")]
    EmptyResponse,

    #[error("No active file to update")]
    NoTarget,

    #[error("{0} is already being updated")]
    Busy(String),

    #[error("Invalid edit: {0}")]
    Edit(String),
}
