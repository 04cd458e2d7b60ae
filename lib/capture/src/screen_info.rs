use crate::Error;
use xcap::Monitor;

/// Information about a connected monitor.
///
/// # Example
///
/// ```no_run
/// use capture::available_monitors;
///
/// let monitors = available_monitors().unwrap();
/// for monitor in monitors {
///     println!("Monitor {}: {}", monitor.index, monitor.name);
///     println!("  Size: {}x{}", monitor.width, monitor.height);
///     println!("  Position: ({}, {})", monitor.x, monitor.y);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MonitorInfo {
    /// 1-based index of the monitor, in backend enumeration order.
    ///
    /// The same index selects this monitor in
    /// [`capture_monitor`](crate::capture_monitor).
    pub index: usize,

    /// Name of the output (e.g., "eDP-1", "HDMI-A-1")
    pub name: String,

    /// Width of the monitor in pixels
    pub width: u32,

    /// Height of the monitor in pixels
    pub height: u32,

    /// X position of the monitor in virtual-screen space
    pub x: i32,

    /// Y position of the monitor in virtual-screen space
    pub y: i32,

    /// Whether this is the primary monitor
    pub is_primary: bool,
}

/// Gets information about all connected monitors.
///
/// Monitors are listed in backend enumeration order and assigned 1-based
/// indices; the index is stable for the lifetime of the display
/// configuration and is the selector accepted by
/// [`capture_monitor`](crate::capture_monitor).
///
/// # Errors
///
/// Returns an error if the backend fails or reports no monitors.
pub fn available_monitors() -> Result<Vec<MonitorInfo>, Error> {
    let monitors = Monitor::all()?;

    if monitors.is_empty() {
        return Err(Error::NoMonitors);
    }

    let mut infos = Vec::with_capacity(monitors.len());
    for (i, monitor) in monitors.iter().enumerate() {
        infos.push(MonitorInfo {
            index: i + 1,
            name: monitor
                .name()
                .unwrap_or_else(|_| format!("monitor-{}", i + 1)),
            width: monitor.width()?,
            height: monitor.height()?,
            x: monitor.x()?,
            y: monitor.y()?,
            is_primary: monitor.is_primary().unwrap_or(false),
        });
    }

    Ok(infos)
}
