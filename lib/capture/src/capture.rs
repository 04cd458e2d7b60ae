use crate::{Capture, Error};
use image::DynamicImage;
use xcap::Monitor;

/// Captures the current contents of one monitor.
///
/// # Arguments
///
/// * `index` - 1-based monitor index, as reported by
///   [`available_monitors`](crate::available_monitors). Index 0 is the
///   source convention for "all monitors combined" and is rejected.
///
/// # Returns
///
/// Returns a [`Capture`] holding the monitor's framebuffer as RGB pixel
/// data, row-major from the top-left corner.
///
/// # Errors
///
/// Returns an error if:
/// - `index` is 0 or larger than the number of connected monitors
/// - No monitors are available
/// - The capture backend fails
pub fn capture_monitor(index: usize) -> Result<Capture, Error> {
    if index == 0 {
        return Err(Error::InvalidMonitor { index, count: 0 });
    }

    let monitors = Monitor::all()?;
    if monitors.is_empty() {
        return Err(Error::NoMonitors);
    }

    let count = monitors.len();
    let monitor = monitors
        .into_iter()
        .nth(index - 1)
        .ok_or(Error::InvalidMonitor { index, count })?;

    let frame = monitor.capture_image()?;
    log::debug!(
        "captured monitor {index}: {}x{} rgba",
        frame.width(),
        frame.height()
    );

    // The backend hands back RGBA; downstream consumers want a plain
    // 3-channel raster.
    let rgb = DynamicImage::ImageRgba8(frame).into_rgb8();

    Ok(Capture {
        width: rgb.width(),
        height: rgb.height(),
        pixel_data: rgb.into_raw(),
    })
}
