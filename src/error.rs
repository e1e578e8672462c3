//! # Error Types
//!
//! Custom error types for RC Stick using `thiserror`.

use thiserror::Error;

/// Main error type for RC Stick
#[derive(Debug, Error)]
pub enum StickError {
    /// Device could not be opened (missing, inaccessible, or not a joystick)
    #[error("failed to open joystick \"{path}\": {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Fatal read failure; the device is gone and the session is closed
    #[error("joystick device lost: {0}")]
    DeviceLost(std::io::Error),

    /// Operation attempted on a closed session
    #[error("joystick session is closed")]
    SessionClosed,

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for RC Stick
pub type Result<T> = std::result::Result<T, StickError>;
