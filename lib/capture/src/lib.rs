//! A monitor capture library for physical displays.
//!
//! This library provides functionality to enumerate the connected monitors
//! and to capture the current contents of one of them, selected by a
//! 1-based index.
//!
//! # Overview
//!
//! Two operations are exposed:
//! - **Monitor enumeration**: list the connected displays with their
//!   index, name, size and position
//! - **Indexed capture**: grab the current framebuffer of one display
//!
//! # Dependencies
//!
//! - `xcap` - Cross-platform monitor enumeration and capture
//! - `image` - Pixel buffer interop
//!
//! # Examples
//!
//! ## List available monitors
//! ```no_run
//! use capture::available_monitors;
//!
//! let monitors = available_monitors().unwrap();
//! for monitor in monitors {
//!     println!("Monitor {}: {} ({}x{})", monitor.index, monitor.name, monitor.width, monitor.height);
//! }
//! ```
//!
//! ## Capture a monitor
//! ```no_run
//! use capture::capture_monitor;
//!
//! let capture = capture_monitor(1).unwrap();
//! println!("Captured image: {}x{}", capture.width, capture.height);
//! ```

mod capture;
mod capture_error;
mod screen_info;

pub use capture::*;
pub use capture_error::*;
pub use screen_info::*;

/// Represents a captured monitor image.
///
/// This struct contains the pixel data and dimensions of a captured
/// display. The pixel data is stored in RGB format with 8 bits per
/// channel, no alpha.
#[derive(Debug, Clone)]
pub struct Capture {
    /// Width of the captured image in pixels
    pub width: u32,
    /// Height of the captured image in pixels
    pub height: u32,
    /// Raw pixel data in RGB format
    ///
    /// Each pixel occupies 3 bytes: red, green and blue channels. The data
    /// is stored row-major, starting from the top-left corner.
    pub pixel_data: Vec<u8>,
}

impl Capture {
    /// Converts the capture into an [`image::RgbImage`] without copying.
    pub fn into_rgb_image(self) -> Result<image::RgbImage, Error> {
        let (width, height) = (self.width, self.height);
        image::RgbImage::from_raw(width, height, self.pixel_data)
            .ok_or(Error::BufferSize { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_rgb_image() {
        let capture = Capture {
            width: 2,
            height: 2,
            pixel_data: vec![0u8; 12],
        };

        let image = capture.into_rgb_image().unwrap();
        assert_eq!((image.width(), image.height()), (2, 2));
    }

    #[test]
    fn test_into_rgb_image_rejects_short_buffer() {
        let capture = Capture {
            width: 2,
            height: 2,
            pixel_data: vec![0u8; 5],
        };

        assert!(matches!(
            capture.into_rgb_image(),
            Err(Error::BufferSize { width: 2, height: 2 })
        ));
    }
}
