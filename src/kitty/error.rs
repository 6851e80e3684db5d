use thiserror::Error;

/// Errors surfaced while talking to kitty or reading its window tree
#[derive(Debug, Error)]
pub enum KittyError {
    /// `kitty @ ls` output does not have the expected shape
    #[error("Malformed window data: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// No remote control socket could be found
    #[error("Kitty is not running or remote control is not enabled")]
    SocketNotFound,

    /// The remote control command exited unsuccessfully
    #[error("kitty @ {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// The remote control command did not finish in time
    #[error("kitty @ command timed out after {0}ms")]
    Timeout(u64),

    /// The kitty binary could not be spawned
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KittyError>;
