/// Errors that can occur during monitor capture operations.
///
/// This enum represents all possible errors that can occur when using
/// the capture library. It implements the `std::error::Error` trait
/// through the `thiserror` crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The requested monitor index is outside the enumerated range.
    ///
    /// Index 0 conventionally denotes "all monitors combined" and is not
    /// a valid selection either.
    #[error("monitor index {index} is invalid ({count} monitors available)")]
    InvalidMonitor { index: usize, count: usize },

    /// No monitors were reported by the backend
    #[error("no monitors available")]
    NoMonitors,

    /// The capture backend failed
    #[error("capture backend error: {0}")]
    Backend(#[from] xcap::XCapError),

    /// The captured pixel buffer does not match the reported dimensions
    #[error("pixel buffer does not match {width}x{height}")]
    BufferSize { width: u32, height: u32 },
}
