//! Color-temperature to gamma-ramp computation.
//!
//! The Kelvin-to-RGB fit follows the widely used logarithmic/power
//! approximation of black-body color. The formulas are the visible behavior
//! of the filter and must not be altered, even where they deviate slightly
//! from a neutral ramp at 6500 K.

/// Number of entries per channel in a gamma ramp.
pub const RAMP_SIZE: usize = 256;

/// A full-precision display gamma lookup table.
///
/// Three ordered sequences of 256 unsigned 16-bit intensity values, one per
/// color channel. `#[repr(C)]` keeps the layout identical to the Win32
/// gamma-ramp record (`WORD[3][256]`), so the whole struct can be handed to
/// `GetDeviceGammaRamp`/`SetDeviceGammaRamp` directly.
#[repr(C)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GammaRamp {
    /// Red channel lookup table.
    pub red: [u16; RAMP_SIZE],
    /// Green channel lookup table.
    pub green: [u16; RAMP_SIZE],
    /// Blue channel lookup table.
    pub blue: [u16; RAMP_SIZE],
}

impl GammaRamp {
    /// The neutral identity ramp (`i << 8` per entry).
    ///
    /// This is the conventional unfiltered table; note that
    /// [`compute_ramp`] at 6500 K / 100% approximates but does not exactly
    /// reproduce it.
    pub fn identity() -> Self {
        let mut ramp = Self {
            red: [0; RAMP_SIZE],
            green: [0; RAMP_SIZE],
            blue: [0; RAMP_SIZE],
        };
        for i in 0..RAMP_SIZE {
            let v = (i as u16) << 8;
            ramp.red[i] = v;
            ramp.green[i] = v;
            ramp.blue[i] = v;
        }
        ramp
    }
}

/// Compute the per-channel gamma ramp for a color temperature and brightness.
///
/// `temperature` is in Kelvin (the filter domain is 2000-6500, but the
/// function is total and well-defined outside it); `brightness` is a
/// fraction in `(0.0, 1.0]`. Pure and deterministic: no I/O, never fails.
///
/// Each channel is a linear ramp scaled by that channel's black-body
/// intensity coefficient and the brightness factor, saturating at the 16-bit
/// maximum.
pub fn compute_ramp(temperature: i32, brightness: f64) -> GammaRamp {
    let (red, green, blue) = channel_coefficients(temperature);

    let red = red * brightness;
    let green = green * brightness;
    let blue = blue * brightness;

    let mut ramp = GammaRamp {
        red: [0; RAMP_SIZE],
        green: [0; RAMP_SIZE],
        blue: [0; RAMP_SIZE],
    };
    for i in 0..RAMP_SIZE {
        ramp.red[i] = ramp_entry(i, red);
        ramp.green[i] = ramp_entry(i, green);
        ramp.blue[i] = ramp_entry(i, blue);
    }
    ramp
}

/// Per-channel intensity coefficients in `[0, 255]` for a temperature,
/// before brightness scaling.
///
/// The `t <= 66` boundary is inclusive by contract: 6600 K takes the
/// logarithmic branch, 6601 K the power branch.
pub(crate) fn channel_coefficients(temperature: i32) -> (f64, f64, f64) {
    let t = f64::from(temperature) / 100.0;

    if t <= 66.0 {
        let red = 255.0;
        let green = clamp_255(99.4708025861 * t.ln() - 161.1195681661);
        let blue = if t <= 19.0 {
            0.0
        } else {
            clamp_255(138.5177312231 * (t - 10.0).ln() - 305.0447927307)
        };
        (red, green, blue)
    } else {
        let red = clamp_255(329.698727446 * (t - 60.0).powf(-0.1332047592));
        let green = clamp_255(288.1221695283 * (t - 60.0).powf(-0.0755148492));
        let blue = 255.0;
        (red, green, blue)
    }
}

fn clamp_255(value: f64) -> f64 {
    value.clamp(0.0, 255.0)
}

fn ramp_entry(index: usize, coefficient: f64) -> u16 {
    let value = ((index as f64 * coefficient / 255.0) * 256.0).floor() as u32;
    value.min(u16::MAX as u32) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_monotonic(channel: &[u16; RAMP_SIZE]) {
        for i in 1..RAMP_SIZE {
            assert!(
                channel[i] >= channel[i - 1],
                "channel not monotonic at index {}: {} < {}",
                i,
                channel[i],
                channel[i - 1]
            );
        }
    }

    #[test]
    fn ramps_monotonic_across_domain() {
        for temperature in (2000..=6500).step_by(250) {
            for brightness_percent in (10..=100).step_by(10) {
                let ramp = compute_ramp(temperature, f64::from(brightness_percent) / 100.0);
                assert_monotonic(&ramp.red);
                assert_monotonic(&ramp.green);
                assert_monotonic(&ramp.blue);
            }
        }
    }

    #[test]
    fn branch_boundary_at_66() {
        // 6600 K -> t == 66, must use the logarithmic branch (red pinned).
        let (red, green, blue) = channel_coefficients(6600);
        assert_eq!(red, 255.0);
        assert!((0.0..=255.0).contains(&green));
        assert!((0.0..=255.0).contains(&blue));
        assert!(blue < 255.0);

        // 6601 K -> t == 66.01, power branch (blue pinned).
        let (red, green, blue) = channel_coefficients(6601);
        assert_eq!(blue, 255.0);
        assert_eq!(red, 255.0); // 329.69 * 6.01^-0.133 ~ 259.6, clamped
        assert!((0.0..=255.0).contains(&green));
        assert!(green < 255.0);
    }

    #[test]
    fn coefficients_at_6500() {
        let (red, green, blue) = channel_coefficients(6500);
        assert_eq!(red, 255.0);
        // green = 99.4708025861 * ln(65) - 161.1195681661 ~ 254.1
        assert_eq!(green.floor(), 254.0);
        // blue = 138.5177312231 * ln(55) - 305.0447927307 ~ 250.0
        assert_eq!(blue.floor(), 250.0);
    }

    #[test]
    fn full_brightness_red_tops_out() {
        let ramp = compute_ramp(6500, 1.0);
        // (255 * 255 / 255) * 256 = 65280
        assert_eq!(ramp.red[255], 65280);
        assert_eq!(ramp.red[0], 0);
    }

    #[test]
    fn warm_half_brightness_suppresses_blue() {
        let ramp = compute_ramp(2000, 0.5);
        // t = 20: blue coefficient ~ 13.9, halved to ~7; red halved to 127.5.
        for i in 1..RAMP_SIZE {
            assert!(
                ramp.blue[i] < ramp.red[i],
                "blue not below red at index {}",
                i
            );
        }
        assert!(ramp.blue[255] < ramp.red[255] / 8);
    }

    #[test]
    fn low_temperature_zeroes_blue() {
        // t <= 19 pins blue to zero (below the filter domain, but the
        // function is total).
        let (_, _, blue) = channel_coefficients(1900);
        assert_eq!(blue, 0.0);
    }

    #[test]
    fn identity_ramp_shape() {
        let ramp = GammaRamp::identity();
        assert_eq!(ramp.red[0], 0);
        assert_eq!(ramp.red[1], 256);
        assert_eq!(ramp.red[255], 65280);
        assert_eq!(ramp.green, ramp.red);
        assert_eq!(ramp.blue, ramp.red);
    }
}
