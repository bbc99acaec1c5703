//! Filter state snapshot and original-state bookkeeping.

use crate::error::FilterError;
use crate::ramp::GammaRamp;

/// Lowest supported color temperature in Kelvin.
pub const TEMPERATURE_MIN: i32 = 2000;
/// Highest supported color temperature in Kelvin.
pub const TEMPERATURE_MAX: i32 = 6500;
/// Lowest supported brightness in percent.
pub const BRIGHTNESS_MIN: i32 = 10;
/// Highest supported brightness in percent.
pub const BRIGHTNESS_MAX: i32 = 100;

/// Default color temperature (neutral daylight).
pub const DEFAULT_TEMPERATURE: i32 = 6500;
/// Default brightness in percent.
pub const DEFAULT_BRIGHTNESS: i32 = 100;

/// A snapshot of the filter's current state.
///
/// Use [`FilterController::state`](crate::FilterController::state) to obtain
/// a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Whether the filter is currently applied to the display.
    pub enabled: bool,
    /// Color temperature in Kelvin (2000-6500).
    pub temperature: i32,
    /// Brightness in percent (10-100).
    pub brightness: i32,
}

impl FilterState {
    /// Brightness as a fractional scale factor in `(0.10, 1.00]`.
    pub fn brightness_fraction(&self) -> f64 {
        f64::from(self.brightness) / 100.0
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            enabled: false,
            temperature: DEFAULT_TEMPERATURE,
            brightness: DEFAULT_BRIGHTNESS,
        }
    }
}

/// Holds the display's gamma ramp as it was before any filter was applied.
///
/// The snapshot is captured once, at backend initialization, and is
/// immutable afterwards: a second capture is ignored so a stale mid-session
/// reading can never overwrite the true original.
#[derive(Debug, Default)]
pub struct OriginalStateStore {
    snapshot: Option<GammaRamp>,
}

impl OriginalStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the original ramp. First capture wins; later calls are no-ops.
    pub fn capture(&mut self, ramp: GammaRamp) {
        if self.snapshot.is_none() {
            self.snapshot = Some(ramp);
        }
    }

    /// Whether an original ramp has been captured.
    pub fn is_captured(&self) -> bool {
        self.snapshot.is_some()
    }

    /// The captured original ramp.
    ///
    /// # Errors
    ///
    /// [`FilterError::NotCaptured`] if [`capture`](Self::capture) was never
    /// called.
    pub fn get(&self) -> Result<&GammaRamp, FilterError> {
        self.snapshot.as_ref().ok_or(FilterError::NotCaptured)
    }
}
