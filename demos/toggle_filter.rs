//! Example: apply a warm filter for a few seconds, then restore the display.
//!
//! Run with: `cargo run --example toggle_filter`

use warmshift_core::{FilterController, FilterError, platform_backend};

fn main() -> Result<(), FilterError> {
    // Initialize logging (optional)
    env_logger::init();

    // Select the backend for this platform
    let backend = platform_backend()?;
    let mut controller = FilterController::new(backend);

    controller.set_temperature(3400)?;
    controller.set_brightness(80)?;

    let state = controller.state();
    println!(
        "Enabling filter: {} K at {}% brightness",
        state.temperature, state.brightness
    );
    controller.set_enabled(true)?;

    std::thread::sleep(std::time::Duration::from_secs(5));

    println!("Restoring display...");
    controller.shutdown()?;

    Ok(())
}
