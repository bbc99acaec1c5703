//! Mock backend and device for testing.
//!
//! These let code that depends on [`DisplayBackend`] or [`GammaDevice`] be
//! tested without touching a real display or spawning an external tool.
//! Both hand out cloneable handles so tests can inspect state and inject
//! failures after ownership has moved into a backend or controller.

use crate::backend::{DisplayBackend, GammaDevice};
use crate::error::FilterError;
use crate::ramp::GammaRamp;

use std::sync::{Arc, Mutex};

// =============================================================================
// Mock Gamma Device
// =============================================================================

#[derive(Debug)]
struct DeviceShared {
    ramp: GammaRamp,
    writes: usize,
    fail_reads: bool,
    fail_writes: bool,
}

/// An in-memory gamma device.
///
/// Starts at the identity ramp. Reads and writes can be made to fail through
/// the [`MockDeviceHandle`].
///
/// # Example
///
/// ```
/// use warmshift_core::{GammaDevice, GammaRamp, MockGammaDevice};
///
/// let mut device = MockGammaDevice::new();
/// let handle = device.handle();
/// device.write_ramp(&GammaRamp::identity()).unwrap();
/// assert_eq!(handle.writes(), 1);
/// ```
#[derive(Debug)]
pub struct MockGammaDevice {
    shared: Arc<Mutex<DeviceShared>>,
}

impl MockGammaDevice {
    /// Create a device holding the identity ramp.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(DeviceShared {
                ramp: GammaRamp::identity(),
                writes: 0,
                fail_reads: false,
                fail_writes: false,
            })),
        }
    }

    /// An inspection handle that stays valid after the device is moved into
    /// a backend.
    pub fn handle(&self) -> MockDeviceHandle {
        MockDeviceHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Default for MockGammaDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GammaDevice for MockGammaDevice {
    fn read_ramp(&mut self) -> Result<GammaRamp, FilterError> {
        let shared = self.shared.lock().unwrap();
        if shared.fail_reads {
            return Err(FilterError::DeviceAccess {
                operation: "mock read",
            });
        }
        Ok(shared.ramp.clone())
    }

    fn write_ramp(&mut self, ramp: &GammaRamp) -> Result<(), FilterError> {
        let mut shared = self.shared.lock().unwrap();
        if shared.fail_writes {
            return Err(FilterError::DeviceAccess {
                operation: "mock write",
            });
        }
        shared.ramp = ramp.clone();
        shared.writes += 1;
        Ok(())
    }
}

/// Inspection and failure-injection handle for a [`MockGammaDevice`].
#[derive(Debug, Clone)]
pub struct MockDeviceHandle {
    shared: Arc<Mutex<DeviceShared>>,
}

impl MockDeviceHandle {
    /// The ramp currently held by the device.
    pub fn ramp(&self) -> GammaRamp {
        self.shared.lock().unwrap().ramp.clone()
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.shared.lock().unwrap().writes
    }

    /// Make subsequent reads fail with a device-access error.
    pub fn fail_reads(&self, fail: bool) {
        self.shared.lock().unwrap().fail_reads = fail;
    }

    /// Make subsequent writes fail with a device-access error.
    pub fn fail_writes(&self, fail: bool) {
        self.shared.lock().unwrap().fail_writes = fail;
    }
}

// =============================================================================
// Mock Backend
// =============================================================================

#[derive(Debug, Default)]
struct BackendShared {
    enables: Vec<(i32, f64)>,
    disables: usize,
    fail_enable: bool,
    fail_disable: bool,
}

/// A [`DisplayBackend`] that records calls instead of touching a display.
///
/// # Example
///
/// ```
/// use warmshift_core::{FilterController, MockBackend};
///
/// let backend = MockBackend::new();
/// let handle = backend.handle();
/// let mut controller = FilterController::new(backend);
/// controller.set_enabled(true).unwrap();
/// assert_eq!(handle.last_enable(), Some((6500, 1.0)));
/// ```
#[derive(Debug)]
pub struct MockBackend {
    shared: Arc<Mutex<BackendShared>>,
}

impl MockBackend {
    /// Create a backend with no recorded calls.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(BackendShared::default())),
        }
    }

    /// An inspection handle that stays valid after the backend is moved into
    /// a controller.
    pub fn handle(&self) -> MockBackendHandle {
        MockBackendHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayBackend for MockBackend {
    fn enable(&mut self, temperature: i32, brightness: f64) -> Result<(), FilterError> {
        let mut shared = self.shared.lock().unwrap();
        if shared.fail_enable {
            return Err(FilterError::DeviceAccess {
                operation: "mock enable",
            });
        }
        shared.enables.push((temperature, brightness));
        Ok(())
    }

    fn disable(&mut self) -> Result<(), FilterError> {
        let mut shared = self.shared.lock().unwrap();
        if shared.fail_disable {
            return Err(FilterError::DeviceAccess {
                operation: "mock disable",
            });
        }
        shared.disables += 1;
        Ok(())
    }
}

/// Inspection and failure-injection handle for a [`MockBackend`].
#[derive(Debug, Clone)]
pub struct MockBackendHandle {
    shared: Arc<Mutex<BackendShared>>,
}

impl MockBackendHandle {
    /// All recorded `enable` calls, oldest first.
    pub fn enables(&self) -> Vec<(i32, f64)> {
        self.shared.lock().unwrap().enables.clone()
    }

    /// The most recent `enable` call, if any.
    pub fn last_enable(&self) -> Option<(i32, f64)> {
        self.shared.lock().unwrap().enables.last().copied()
    }

    /// Number of `disable` calls so far.
    pub fn disables(&self) -> usize {
        self.shared.lock().unwrap().disables
    }

    /// Make subsequent `enable` calls fail with a device-access error.
    pub fn fail_enable(&self, fail: bool) {
        self.shared.lock().unwrap().fail_enable = fail;
    }

    /// Make subsequent `disable` calls fail with a device-access error.
    pub fn fail_disable(&self, fail: bool) {
        self.shared.lock().unwrap().fail_disable = fail;
    }
}
