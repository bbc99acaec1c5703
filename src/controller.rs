//! The filter controller: a synchronous enable/disable state machine.

use crate::backend::DisplayBackend;
use crate::error::FilterError;
use crate::state::{
    BRIGHTNESS_MAX, BRIGHTNESS_MIN, FilterState, TEMPERATURE_MAX, TEMPERATURE_MIN,
};

use log::{debug, info, warn};

/// Orchestrates parameter changes and enable/disable toggles against a
/// display backend.
///
/// The controller owns the current [`FilterState`] and the backend it
/// drives. It processes each call synchronously and to completion; there is
/// no internal threading, no debouncing and no retry. On a failed backend
/// call the state is left untouched, so `enabled` never claims more than the
/// display actually shows.
///
/// Dropping the controller restores the display if the filter is still
/// enabled.
///
/// # Example
///
/// ```
/// use warmshift_core::{FilterController, MockBackend};
///
/// let mut controller = FilterController::new(MockBackend::new());
/// controller.set_temperature(3400)?;
/// controller.set_enabled(true)?;
/// assert!(controller.state().enabled);
/// controller.shutdown()?;
/// # Ok::<(), warmshift_core::FilterError>(())
/// ```
pub struct FilterController<B: DisplayBackend> {
    backend: B,
    state: FilterState,
}

impl<B: DisplayBackend> FilterController<B> {
    /// Create a controller in the disabled state with default parameters
    /// (6500 K, 100% brightness).
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: FilterState::default(),
        }
    }

    /// Get a snapshot of the current filter state.
    pub fn state(&self) -> FilterState {
        self.state.clone()
    }

    /// Set the color temperature in Kelvin.
    ///
    /// While enabled, the new curve is pushed to the display before the
    /// parameter is recorded; while disabled, it is only recorded and takes
    /// effect on the next enable.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidTemperature`] if `kelvin` is outside
    /// 2000-6500, or a backend error if re-applying fails. Neither mutates
    /// the recorded state.
    pub fn set_temperature(&mut self, kelvin: i32) -> Result<(), FilterError> {
        if !(TEMPERATURE_MIN..=TEMPERATURE_MAX).contains(&kelvin) {
            return Err(FilterError::InvalidTemperature(kelvin));
        }
        if self.state.enabled {
            self.backend
                .enable(kelvin, self.state.brightness_fraction())?;
            debug!("re-applied filter at {kelvin} K");
        }
        self.state.temperature = kelvin;
        Ok(())
    }

    /// Set the brightness in percent.
    ///
    /// Same push-then-record behavior as [`set_temperature`](Self::set_temperature).
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidBrightness`] if `percent` is outside 10-100,
    /// or a backend error if re-applying fails.
    pub fn set_brightness(&mut self, percent: i32) -> Result<(), FilterError> {
        if !(BRIGHTNESS_MIN..=BRIGHTNESS_MAX).contains(&percent) {
            return Err(FilterError::InvalidBrightness(percent));
        }
        if self.state.enabled {
            self.backend
                .enable(self.state.temperature, f64::from(percent) / 100.0)?;
            debug!("re-applied filter at {percent}% brightness");
        }
        self.state.brightness = percent;
        Ok(())
    }

    /// Enable or disable the filter.
    ///
    /// Enabling pushes the current parameters to the display; disabling
    /// reverts it. A call that matches the current state is a no-op. The
    /// state flips only after the backend call succeeds, so a failed enable
    /// leaves the controller disabled.
    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), FilterError> {
        if enabled == self.state.enabled {
            return Ok(());
        }
        if enabled {
            self.backend
                .enable(self.state.temperature, self.state.brightness_fraction())?;
            info!(
                "filter enabled: {} K at {}% brightness",
                self.state.temperature, self.state.brightness
            );
        } else {
            self.backend.disable()?;
            info!("filter disabled");
        }
        self.state.enabled = enabled;
        Ok(())
    }

    /// Shut down, restoring the display regardless of current state.
    ///
    /// The restore is issued even if the filter was never enabled (a safe
    /// re-assertion of the original state). A restoration failure is
    /// returned and logged, but the controller is torn down either way;
    /// cleanup is best-effort, never a retry loop.
    pub fn shutdown(mut self) -> Result<(), FilterError> {
        let result = self.backend.disable();
        self.state.enabled = false;
        if let Err(e) = &result {
            warn!("restore on shutdown failed: {e}");
        }
        result
    }
}

impl<B: DisplayBackend> Drop for FilterController<B> {
    fn drop(&mut self) {
        if self.state.enabled {
            if let Err(e) = self.backend.disable() {
                warn!("failed to restore display while dropping controller: {e}");
            }
        }
    }
}
