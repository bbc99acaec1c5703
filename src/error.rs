//! Error types for the blue light filter core.

/// Errors that can occur while validating parameters or driving a display
/// backend.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// A color temperature was outside the supported domain.
    #[error("Temperature {0} K outside supported range 2000-6500 K")]
    InvalidTemperature(i32),

    /// A brightness percentage was outside the supported domain.
    #[error("Brightness {0}% outside supported range 10-100%")]
    InvalidBrightness(i32),

    /// The display's gamma device could not be opened, read, or written.
    #[error("Display device access failed during {operation}")]
    DeviceAccess {
        /// The device operation that failed.
        operation: &'static str,
    },

    /// The external color tool could not be launched.
    #[error("External color tool unavailable: {0}")]
    ToolUnavailable(#[source] std::io::Error),

    /// The external color tool ran but reported failure.
    #[error("External color tool failed: {0}")]
    ToolFailed(std::process::ExitStatus),

    /// Restoration was requested before any original state was captured.
    #[error("Original display state was never captured")]
    NotCaptured,
}
