//! Blue light filter core: color-temperature gamma ramps and display
//! backends.
//!
//! This crate turns a color temperature (Kelvin) and a brightness percentage
//! into a per-channel display gamma ramp, and applies or reverts it through
//! a platform backend:
//!
//! - on Windows, ramps are written directly to the display's gamma device
//!   (GDI `SetDeviceGammaRamp`), with the original ramp captured at startup
//!   for exact restoration;
//! - elsewhere, an external `redshift`-style tool is invoked with the raw
//!   parameters and reset to undo the filter.
//!
//! The crate renders no UI. A caller (typically a settings window with two
//! sliders and a toggle) drives [`FilterController`] through
//! [`set_temperature`](FilterController::set_temperature),
//! [`set_brightness`](FilterController::set_brightness) and
//! [`set_enabled`](FilterController::set_enabled).
//!
//! # Example
//!
//! ```no_run
//! use warmshift_core::{FilterController, FilterError, platform_backend};
//!
//! fn main() -> Result<(), FilterError> {
//!     let backend = platform_backend()?;
//!     let mut controller = FilterController::new(backend);
//!
//!     // Warm evening setting.
//!     controller.set_temperature(3400)?;
//!     controller.set_brightness(80)?;
//!     controller.set_enabled(true)?;
//!
//!     // ... later: restore the display.
//!     controller.shutdown()?;
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! Use [`MockBackend`] or [`MockGammaDevice`] to test without a display:
//!
//! ```
//! use warmshift_core::{FilterController, MockBackend};
//!
//! let backend = MockBackend::new();
//! let handle = backend.handle();
//! let mut controller = FilterController::new(backend);
//! controller.set_enabled(true).unwrap();
//! assert_eq!(handle.last_enable(), Some((6500, 1.0)));
//! ```

#![warn(missing_docs)]

mod backend;
mod controller;
mod error;
mod mock;
mod ramp;
mod state;

// Re-export public API
#[cfg(windows)]
pub use backend::GdiDisplay;
pub use backend::{
    DEFAULT_TOOL, DisplayBackend, ExternalToolBackend, GammaDevice, GammaDeviceBackend,
    platform_backend,
};
pub use controller::FilterController;
pub use error::FilterError;
pub use mock::{MockBackend, MockBackendHandle, MockDeviceHandle, MockGammaDevice};
pub use ramp::{GammaRamp, RAMP_SIZE, compute_ramp};
pub use state::{
    BRIGHTNESS_MAX, BRIGHTNESS_MIN, DEFAULT_BRIGHTNESS, DEFAULT_TEMPERATURE, FilterState,
    OriginalStateStore, TEMPERATURE_MAX, TEMPERATURE_MIN,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_pushes_current_parameters() {
        let backend = MockBackend::new();
        let handle = backend.handle();
        let mut controller = FilterController::new(backend);

        controller.set_temperature(3400).unwrap();
        controller.set_brightness(80).unwrap();
        // Parameters recorded while disabled are not pushed.
        assert!(handle.enables().is_empty());

        controller.set_enabled(true).unwrap();
        assert!(controller.state().enabled);
        assert_eq!(handle.last_enable(), Some((3400, 0.8)));

        controller.set_enabled(false).unwrap();
        assert!(!controller.state().enabled);
        assert_eq!(handle.disables(), 1);
    }

    #[test]
    fn parameter_change_while_enabled_reapplies() {
        let backend = MockBackend::new();
        let handle = backend.handle();
        let mut controller = FilterController::new(backend);

        controller.set_enabled(true).unwrap();
        controller.set_temperature(2700).unwrap();
        controller.set_brightness(50).unwrap();

        assert_eq!(
            handle.enables(),
            vec![(6500, 1.0), (2700, 1.0), (2700, 0.5)]
        );
    }

    #[test]
    fn redundant_toggle_is_a_no_op() {
        let backend = MockBackend::new();
        let handle = backend.handle();
        let mut controller = FilterController::new(backend);

        controller.set_enabled(false).unwrap();
        assert_eq!(handle.disables(), 0);

        controller.set_enabled(true).unwrap();
        controller.set_enabled(true).unwrap();
        assert_eq!(handle.enables().len(), 1);
    }

    #[test]
    fn failed_enable_leaves_controller_disabled() {
        let backend = MockBackend::new();
        let handle = backend.handle();
        let mut controller = FilterController::new(backend);

        handle.fail_enable(true);
        assert!(matches!(
            controller.set_enabled(true),
            Err(FilterError::DeviceAccess { .. })
        ));
        assert!(!controller.state().enabled);

        // Once the backend recovers, enabling works normally.
        handle.fail_enable(false);
        controller.set_enabled(true).unwrap();
        assert!(controller.state().enabled);
    }

    #[test]
    fn failed_reapply_keeps_previous_parameters() {
        let backend = MockBackend::new();
        let handle = backend.handle();
        let mut controller = FilterController::new(backend);

        controller.set_enabled(true).unwrap();
        handle.fail_enable(true);
        assert!(controller.set_temperature(2700).is_err());
        assert_eq!(controller.state().temperature, 6500);
        assert!(controller.state().enabled);
    }

    #[test]
    fn validation_rejects_out_of_domain_values() {
        let backend = MockBackend::new();
        let handle = backend.handle();
        let mut controller = FilterController::new(backend);

        assert!(matches!(
            controller.set_temperature(1999),
            Err(FilterError::InvalidTemperature(1999))
        ));
        assert!(matches!(
            controller.set_temperature(6501),
            Err(FilterError::InvalidTemperature(6501))
        ));
        assert!(matches!(
            controller.set_brightness(9),
            Err(FilterError::InvalidBrightness(9))
        ));
        assert!(matches!(
            controller.set_brightness(101),
            Err(FilterError::InvalidBrightness(101))
        ));

        // Rejected values never reach the backend or the state.
        assert!(handle.enables().is_empty());
        assert_eq!(controller.state(), FilterState::default());
    }

    #[test]
    fn boundary_values_are_accepted() {
        let mut controller = FilterController::new(MockBackend::new());
        controller.set_temperature(2000).unwrap();
        controller.set_temperature(6500).unwrap();
        controller.set_brightness(10).unwrap();
        controller.set_brightness(100).unwrap();
    }

    #[test]
    fn shutdown_always_restores() {
        let backend = MockBackend::new();
        let handle = backend.handle();
        let controller = FilterController::new(backend);

        // Never enabled: shutdown still re-asserts the original state.
        controller.shutdown().unwrap();
        assert_eq!(handle.disables(), 1);
    }

    #[test]
    fn shutdown_failure_is_surfaced_once() {
        let backend = MockBackend::new();
        let handle = backend.handle();
        let mut controller = FilterController::new(backend);

        controller.set_enabled(true).unwrap();
        handle.fail_disable(true);
        assert!(controller.shutdown().is_err());
        // The drop path must not have retried after shutdown reported.
        assert_eq!(handle.disables(), 0);
    }

    #[test]
    fn dropping_an_enabled_controller_restores() {
        let backend = MockBackend::new();
        let handle = backend.handle();

        {
            let mut controller = FilterController::new(backend);
            controller.set_enabled(true).unwrap();
        }

        assert_eq!(handle.disables(), 1);
    }

    #[test]
    fn controller_over_gamma_device_round_trips() {
        let device = MockGammaDevice::new();
        let handle = device.handle();
        let original = handle.ramp();

        let backend = GammaDeviceBackend::open(device).unwrap();
        let mut controller = FilterController::new(backend);

        controller.set_temperature(2000).unwrap();
        controller.set_brightness(50).unwrap();
        controller.set_enabled(true).unwrap();
        assert_eq!(handle.ramp(), compute_ramp(2000, 0.5));

        controller.shutdown().unwrap();
        assert_eq!(handle.ramp(), original);
    }

    #[test]
    fn boxed_backend_drives_the_controller() {
        let backend = MockBackend::new();
        let handle = backend.handle();
        let boxed: Box<dyn DisplayBackend> = Box::new(backend);

        let mut controller = FilterController::new(boxed);
        controller.set_enabled(true).unwrap();
        assert_eq!(handle.last_enable(), Some((6500, 1.0)));
    }
}
