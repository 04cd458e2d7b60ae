//! Tiled screen capture pipeline.
//!
//! Captures one monitor, splits the frame into a 3x3 grid and persists the
//! full frame plus the nine tiles as PNG files under a node/timestamp
//! directory tree, optionally uploading all ten files to an object-store
//! bucket under the same key scheme.
//!
//! # Architecture
//! - [`config`]: immutable, validated run configuration
//! - [`pipeline`]: the session orchestrator (capture, tile, write, upload)
//! - [`scheduler`]: fixed-interval repetition of the pipeline
//! - [`ident`] / [`timestamp`] / [`naming`]: the artifact key scheme
//! - [`partition`] / [`writer`] / [`uploader`]: the per-raster steps

pub mod config;
pub mod ident;
pub mod naming;
pub mod partition;
pub mod pipeline;
pub mod scheduler;
pub mod timestamp;
pub mod uploader;
pub mod writer;

/// Initializes the logger.
///
/// Sets up a custom logger format with timestamp, log level, file name,
/// line number, and log message. Uses local time format for timestamps.
/// Defaults to `info` level unless `RUST_LOG` overrides it.
pub fn init_logger() {
    use std::io::Write;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
