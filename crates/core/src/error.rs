#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text: {0}")]
    Text(#[from] carepoint_types::TextError),
    #[error("failed to read file {path}: {source}", path = path.display())]
    FileRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path}: {source}", path = path.display())]
    FileWrite {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{what} schema mismatch at {path}: {message}")]
    SchemaMismatch {
        what: &'static str,
        path: String,
        message: String,
    },
    #[error("cannot {action} in state {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
    #[error("share surface failed: {0}")]
    Share(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
