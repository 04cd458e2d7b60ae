use capture::{available_monitors, capture_monitor};

fn main() -> Result<(), capture::Error> {
    env_logger::init();

    let monitors = available_monitors()?;
    for monitor in &monitors {
        println!(
            "Monitor {}: {} ({}x{} at {},{}){}",
            monitor.index,
            monitor.name,
            monitor.width,
            monitor.height,
            monitor.x,
            monitor.y,
            if monitor.is_primary { " [primary]" } else { "" },
        );
    }

    let capture = capture_monitor(1)?;
    println!(
        "captured {}x{} ({} bytes)",
        capture.width,
        capture.height,
        capture.pixel_data.len()
    );

    Ok(())
}
