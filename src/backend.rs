//! Display backends: the platform-specific mechanisms that push a filter to
//! the screen.
//!
//! Two variants exist and are selected once at startup, never mixed:
//!
//! - [`GammaDeviceBackend`] writes full gamma ramps through an OS display
//!   device (Windows GDI in this crate); it computes the curve itself via
//!   [`compute_ramp`] and restores a captured snapshot on disable.
//! - [`ExternalToolBackend`] delegates to a `redshift`-style process, which
//!   owns its own curve math and its own original-state bookkeeping.
//!
//! The two paths can produce visibly different curves for the same inputs;
//! that mirrors the platform tools and is deliberate.

use crate::error::FilterError;
use crate::ramp::{GammaRamp, compute_ramp};
use crate::state::OriginalStateStore;

use log::{debug, info};
use std::path::PathBuf;
use std::process::Command;

/// The external tool driven by [`ExternalToolBackend::new`].
pub const DEFAULT_TOOL: &str = "redshift";

/// A platform mechanism for applying and reverting the blue light filter.
///
/// Implementations receive the raw temperature (Kelvin) and brightness
/// (fraction in `(0.0, 1.0]`); how the curve is computed and pushed is the
/// backend's business. `disable` must be safe to call when no filter was
/// ever applied.
pub trait DisplayBackend: Send {
    /// Apply the filter for the given parameters, replacing any previously
    /// applied curve.
    fn enable(&mut self, temperature: i32, brightness: f64) -> Result<(), FilterError>;

    /// Revert the display to its unfiltered appearance.
    fn disable(&mut self) -> Result<(), FilterError>;
}

impl<B: DisplayBackend + ?Sized> DisplayBackend for Box<B> {
    fn enable(&mut self, temperature: i32, brightness: f64) -> Result<(), FilterError> {
        (**self).enable(temperature, brightness)
    }

    fn disable(&mut self) -> Result<(), FilterError> {
        (**self).disable()
    }
}

/// A session on an OS gamma-ramp device.
///
/// This is the seam between [`GammaDeviceBackend`] and the operating system:
/// [`GdiDisplay`] implements it over Win32, and
/// [`MockGammaDevice`](crate::MockGammaDevice) over an in-memory table for
/// tests. A write replaces the full 3x256 table in one call.
pub trait GammaDevice: Send {
    /// Read the device's current gamma ramp.
    fn read_ramp(&mut self) -> Result<GammaRamp, FilterError>;

    /// Replace the device's gamma ramp.
    fn write_ramp(&mut self, ramp: &GammaRamp) -> Result<(), FilterError>;
}

// =============================================================================
// Gamma Device Backend
// =============================================================================

/// Device-level backend: computes gamma ramps and writes them directly.
///
/// The display's original ramp is captured exactly once, when the backend is
/// opened and before any filter is applied. Dropping the backend restores
/// the original ramp if a filter is still active, so the display is never
/// left filtered past the backend's lifetime.
pub struct GammaDeviceBackend<D: GammaDevice> {
    device: D,
    original: OriginalStateStore,
    active: bool,
}

impl<D: GammaDevice> GammaDeviceBackend<D> {
    /// Open the backend over a device session, capturing the display's
    /// original ramp.
    ///
    /// # Errors
    ///
    /// [`FilterError::DeviceAccess`] if the original ramp cannot be read.
    pub fn open(mut device: D) -> Result<Self, FilterError> {
        let mut original = OriginalStateStore::new();
        original.capture(device.read_ramp()?);
        debug!("captured original gamma ramp");
        Ok(Self {
            device,
            original,
            active: false,
        })
    }

    /// Whether a filter ramp is currently applied.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(windows)]
impl GammaDeviceBackend<GdiDisplay> {
    /// Open the backend over the active Windows display.
    pub fn open_display() -> Result<Self, FilterError> {
        Self::open(GdiDisplay::open()?)
    }
}

impl<D: GammaDevice> DisplayBackend for GammaDeviceBackend<D> {
    fn enable(&mut self, temperature: i32, brightness: f64) -> Result<(), FilterError> {
        let ramp = compute_ramp(temperature, brightness);
        self.device.write_ramp(&ramp)?;
        self.active = true;
        info!(
            "applied gamma ramp: {} K at {:.0}% brightness",
            temperature,
            brightness * 100.0
        );
        Ok(())
    }

    fn disable(&mut self) -> Result<(), FilterError> {
        let original = self.original.get()?.clone();
        self.device.write_ramp(&original)?;
        self.active = false;
        info!("restored original gamma ramp");
        Ok(())
    }
}

impl<D: GammaDevice> Drop for GammaDeviceBackend<D> {
    fn drop(&mut self) {
        if self.active {
            if let Err(e) = self.disable() {
                log::warn!("failed to restore display while closing backend: {e}");
            }
        }
    }
}

// =============================================================================
// External Tool Backend
// =============================================================================

/// Backend that delegates to an external color-adjustment process.
///
/// The tool receives the raw temperature and brightness (`<tool> -O <kelvin>
/// -b <fraction>`) and is reset with `<tool> -x`; it owns its own curve
/// algorithm and original-state bookkeeping. A reset with no prior enable is
/// a safe no-op from the display's point of view.
pub struct ExternalToolBackend {
    program: PathBuf,
}

impl ExternalToolBackend {
    /// Backend driving [`DEFAULT_TOOL`] from `PATH`.
    pub fn new() -> Self {
        Self::with_program(DEFAULT_TOOL)
    }

    /// Backend driving a specific tool binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<(), FilterError> {
        debug!("running {} {}", self.program.display(), args.join(" "));
        let status = Command::new(&self.program)
            .args(args)
            .status()
            .map_err(FilterError::ToolUnavailable)?;
        if status.success() {
            Ok(())
        } else {
            Err(FilterError::ToolFailed(status))
        }
    }
}

impl Default for ExternalToolBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayBackend for ExternalToolBackend {
    fn enable(&mut self, temperature: i32, brightness: f64) -> Result<(), FilterError> {
        self.run(&[
            "-O",
            &temperature.to_string(),
            "-b",
            &brightness_arg(brightness),
        ])?;
        info!(
            "external tool enabled: {} K at {:.0}% brightness",
            temperature,
            brightness * 100.0
        );
        Ok(())
    }

    fn disable(&mut self) -> Result<(), FilterError> {
        self.run(&["-x"])?;
        info!("external tool reset");
        Ok(())
    }
}

/// Brightness fraction as the tool expects it on the command line.
fn brightness_arg(brightness: f64) -> String {
    format!("{brightness}")
}

// =============================================================================
// Platform Selection
// =============================================================================

/// Select the backend for the current platform.
///
/// Windows gets direct gamma-device control; everything else drives the
/// external tool. Called once at startup; the choice never changes at
/// runtime.
#[cfg(windows)]
pub fn platform_backend() -> Result<Box<dyn DisplayBackend>, FilterError> {
    Ok(Box::new(GammaDeviceBackend::open_display()?))
}

/// Select the backend for the current platform.
///
/// Windows gets direct gamma-device control; everything else drives the
/// external tool. Called once at startup; the choice never changes at
/// runtime.
#[cfg(not(windows))]
pub fn platform_backend() -> Result<Box<dyn DisplayBackend>, FilterError> {
    Ok(Box::new(ExternalToolBackend::new()))
}

// =============================================================================
// Windows GDI Device
// =============================================================================

#[cfg(windows)]
pub use gdi::GdiDisplay;

#[cfg(windows)]
mod gdi {
    use super::GammaDevice;
    use crate::error::FilterError;
    use crate::ramp::GammaRamp;

    use std::ffi::c_void;
    use windows_sys::Win32::Graphics::Gdi::{CreateDCW, DeleteDC, HDC};
    use windows_sys::Win32::UI::ColorSystem::{GetDeviceGammaRamp, SetDeviceGammaRamp};

    /// A GDI device context on the active display.
    ///
    /// The context is owned exclusively and released with `DeleteDC` on
    /// drop.
    pub struct GdiDisplay {
        hdc: HDC,
    }

    // Safety: the HDC is only passed to GDI calls through &mut self, so the
    // context is never used from two threads at once.
    unsafe impl Send for GdiDisplay {}

    impl GdiDisplay {
        /// Open a device context for the active display.
        pub fn open() -> Result<Self, FilterError> {
            let driver: Vec<u16> = "DISPLAY\0".encode_utf16().collect();
            let hdc = unsafe {
                CreateDCW(
                    driver.as_ptr(),
                    std::ptr::null(),
                    std::ptr::null(),
                    std::ptr::null(),
                )
            };
            if hdc.is_null() {
                return Err(FilterError::DeviceAccess {
                    operation: "CreateDCW",
                });
            }
            Ok(Self { hdc })
        }
    }

    impl GammaDevice for GdiDisplay {
        fn read_ramp(&mut self) -> Result<GammaRamp, FilterError> {
            let mut ramp = GammaRamp::identity();
            // GammaRamp is #[repr(C)] and matches the WORD[3][256] record.
            let ok =
                unsafe { GetDeviceGammaRamp(self.hdc, (&raw mut ramp).cast::<c_void>()) };
            if ok == 0 {
                return Err(FilterError::DeviceAccess {
                    operation: "GetDeviceGammaRamp",
                });
            }
            Ok(ramp)
        }

        fn write_ramp(&mut self, ramp: &GammaRamp) -> Result<(), FilterError> {
            let ok = unsafe {
                SetDeviceGammaRamp(self.hdc, (ramp as *const GammaRamp).cast::<c_void>())
            };
            if ok == 0 {
                return Err(FilterError::DeviceAccess {
                    operation: "SetDeviceGammaRamp",
                });
            }
            Ok(())
        }
    }

    impl Drop for GdiDisplay {
        fn drop(&mut self) {
            unsafe {
                DeleteDC(self.hdc);
            }
        }
    }
}
