/// Errors that can occur running a scanning session.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The decoding engine could not acquire its input (camera, device,
    /// stream). The session never starts.
    #[error("Failed to initialize decoder: {0}")]
    CameraInit(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
