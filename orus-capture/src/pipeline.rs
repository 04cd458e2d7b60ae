//! The capture session pipeline.
//!
//! One run captures a monitor, persists the full frame, then persists the
//! nine grid tiles, uploading every written file when an upload target is
//! configured. Capture failures abort the run before anything is written;
//! write and upload failures are recorded per artifact while the remaining
//! artifacts still go through.

use crate::{
    config::CaptureConfig,
    ident,
    naming::{self, ArtifactKind},
    partition, timestamp,
    uploader::{UploadError, Uploader},
    writer::{self, WriteError},
};
use image::RgbImage;
use log::{info, warn};
use std::path::PathBuf;
use tokio::{sync::Mutex, task::JoinSet};

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The monitor could not be captured; nothing was written.
    #[error("capture failed: {0}")]
    Capture(#[from] capture::Error),

    /// Another run of this pipeline is still in progress.
    #[error("a capture run is already in progress")]
    Busy,
}

/// One persisted (or attempted) raster file of a session.
#[derive(Debug)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub unique_id: String,
    pub local_path: PathBuf,
    /// Object-store key; `None` when uploading is disabled.
    pub remote_key: Option<String>,
}

/// What happened to one artifact.
#[derive(Debug)]
pub enum ArtifactStatus {
    /// Written locally and uploaded.
    Uploaded,
    /// Written locally; uploading was disabled.
    Written,
    /// The local write failed; no upload was attempted.
    WriteFailed(WriteError),
    /// Written locally but the upload failed. Uploads are best-effort and
    /// never retried.
    UploadFailed(UploadError),
}

impl ArtifactStatus {
    pub fn write_ok(&self) -> bool {
        !matches!(self, ArtifactStatus::WriteFailed(_))
    }
}

#[derive(Debug)]
pub struct ArtifactOutcome {
    pub artifact: Artifact,
    pub status: ArtifactStatus,
}

/// Result of one full session run.
#[derive(Debug)]
pub struct RunReport {
    pub node_name: String,
    pub timestamp: String,
    /// True iff the capture and every local write succeeded. Upload
    /// failures are recorded in `outcomes` but kept out of this flag.
    pub success: bool,
    pub outcomes: Vec<ArtifactOutcome>,
}

/// Orchestrates capture sessions for one fixed configuration.
///
/// At most one run executes at a time; an overlapping [`run`] attempt
/// (a loop tick racing a manual trigger) is rejected with
/// [`PipelineError::Busy`] rather than queued.
///
/// [`run`]: CapturePipeline::run
pub struct CapturePipeline {
    config: CaptureConfig,
    uploader: Option<Uploader>,
    run_guard: Mutex<()>,
}

impl CapturePipeline {
    pub fn new(config: CaptureConfig) -> Self {
        let uploader = config
            .upload
            .as_ref()
            .map(|u| Uploader::new(u.endpoint.clone(), u.bucket.clone()));

        Self {
            config,
            uploader,
            run_guard: Mutex::new(()),
        }
    }

    /// Runs one full capture session: capture, write, upload, report.
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let _guard = self.run_guard.try_lock().map_err(|_| PipelineError::Busy)?;

        let monitor_index = self.config.monitor_index;
        let frame = tokio::task::spawn_blocking(move || capture::capture_monitor(monitor_index))
            .await
            .expect("capture task panicked")?;

        info!(
            "captured monitor {monitor_index}: {}x{}",
            frame.width, frame.height
        );

        let image = frame.into_rgb_image()?;
        Ok(self.session(image).await)
    }

    /// Runs the post-capture stages on a frame captured by the caller,
    /// e.g. a front end reusing its preview frame.
    pub async fn run_with_frame(&self, image: RgbImage) -> Result<RunReport, PipelineError> {
        let _guard = self.run_guard.try_lock().map_err(|_| PipelineError::Busy)?;
        Ok(self.session(image).await)
    }

    async fn session(&self, image: RgbImage) -> RunReport {
        let timestamp = timestamp::session_stamp();
        let node_name = naming::node_name(self.config.node_number);

        let mut outcomes = Vec::with_capacity(1 + naming::TILE_COUNT as usize);

        // The main artifact completes, upload included, before tile work
        // starts.
        let (artifact, write_err) =
            self.write_artifact(&image, ArtifactKind::Main, &node_name, &timestamp);
        let status = match write_err {
            Some(e) => {
                warn!("main write failed: {e}");
                ArtifactStatus::WriteFailed(e)
            }
            None => {
                info!("main capture saved to {}", artifact.local_path.display());
                self.upload_status(&artifact).await
            }
        };
        outcomes.push(ArtifactOutcome { artifact, status });

        // Tiles are written in row-major order; uploads of written tiles
        // fan out concurrently and all join before the report.
        let tiles = partition::partition(&image);
        let mut tile_artifacts = Vec::with_capacity(tiles.len());
        let mut tile_statuses: Vec<Option<ArtifactStatus>> = Vec::with_capacity(tiles.len());
        let mut uploads: JoinSet<(usize, Result<(), UploadError>)> = JoinSet::new();

        for (i, tile) in tiles.iter().enumerate() {
            let kind = ArtifactKind::Tile((i + 1) as u8);
            let (artifact, write_err) = self.write_artifact(tile, kind, &node_name, &timestamp);

            let status = match write_err {
                Some(e) => {
                    warn!("tile {} write failed: {e}", i + 1);
                    Some(ArtifactStatus::WriteFailed(e))
                }
                None => match (&self.uploader, &artifact.remote_key) {
                    (Some(uploader), Some(key)) => {
                        let slot = tile_statuses.len();
                        let uploader = uploader.clone();
                        let key = key.clone();
                        let path = artifact.local_path.clone();
                        uploads.spawn(async move { (slot, uploader.upload(&path, &key).await) });
                        None
                    }
                    _ => Some(ArtifactStatus::Written),
                },
            };

            tile_artifacts.push(artifact);
            tile_statuses.push(status);
        }

        while let Some(joined) = uploads.join_next().await {
            let (slot, result) = joined.expect("upload task panicked");
            tile_statuses[slot] = Some(match result {
                Ok(()) => ArtifactStatus::Uploaded,
                Err(e) => ArtifactStatus::UploadFailed(e),
            });
        }

        for (artifact, status) in tile_artifacts.into_iter().zip(tile_statuses) {
            let status = status.expect("all tile uploads joined");
            outcomes.push(ArtifactOutcome { artifact, status });
        }

        let success = outcomes.iter().all(|o| o.status.write_ok());
        if success {
            info!(
                "session {timestamp} completed: {} artifacts written",
                outcomes.len()
            );
        } else {
            warn!("session {timestamp} completed with write failures");
        }

        RunReport {
            node_name,
            timestamp,
            success,
            outcomes,
        }
    }

    /// Names and writes one raster; uploading is the caller's concern.
    fn write_artifact(
        &self,
        image: &RgbImage,
        kind: ArtifactKind,
        node_name: &str,
        timestamp: &str,
    ) -> (Artifact, Option<WriteError>) {
        let unique_id = ident::unique_id();
        let dir = self
            .config
            .save_dir
            .join(naming::relative_dir(kind, node_name, timestamp));
        let file_name = naming::file_name(kind, node_name, timestamp, &unique_id);
        let remote_key = self
            .uploader
            .as_ref()
            .map(|_| naming::remote_key(kind, node_name, timestamp, &file_name));

        match writer::write_png(image, &dir, &file_name) {
            Ok(local_path) => (
                Artifact {
                    kind,
                    unique_id,
                    local_path,
                    remote_key,
                },
                None,
            ),
            Err(e) => (
                Artifact {
                    kind,
                    unique_id,
                    local_path: dir.join(&file_name),
                    remote_key,
                },
                Some(e),
            ),
        }
    }

    async fn upload_status(&self, artifact: &Artifact) -> ArtifactStatus {
        let (Some(uploader), Some(key)) = (self.uploader.as_ref(), artifact.remote_key.as_deref())
        else {
            return ArtifactStatus::Written;
        };

        match uploader.upload(&artifact.local_path, key).await {
            Ok(()) => ArtifactStatus::Uploaded,
            Err(e) => ArtifactStatus::UploadFailed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UploadConfig;
    use image::Rgb;
    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;

    fn test_config(save_dir: &Path) -> CaptureConfig {
        CaptureConfig {
            save_dir: save_dir.to_path_buf(),
            node_number: 7,
            monitor_index: 1,
            interval_secs: None,
            upload: None,
        }
    }

    fn test_frame() -> RgbImage {
        RgbImage::from_fn(300, 300, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 0]))
    }

    fn count_pngs(dir: &Path) -> usize {
        let mut count = 0;
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                count += count_pngs(&path);
            } else if path.extension().is_some_and(|e| e == "png") {
                count += 1;
            }
        }
        count
    }

    #[tokio::test]
    async fn test_session_writes_ten_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = CapturePipeline::new(test_config(tmp.path()));

        let report = pipeline.run_with_frame(test_frame()).await.unwrap();

        assert!(report.success);
        assert_eq!(report.node_name, "orus-data-node-07");
        assert_eq!(report.outcomes.len(), 10);

        let base = tmp.path().join(&report.node_name).join(&report.timestamp);

        let main_files: Vec<_> = fs::read_dir(base.join("main"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(main_files.len(), 1);
        let main_name = main_files[0].file_name().unwrap().to_str().unwrap();
        assert!(main_name.starts_with("orus-data-node-07_"));
        assert!(main_name.ends_with(".png"));

        for i in 1..=9 {
            let tile_dir = base.join(format!("stream_{i:03}"));
            let entries: Vec<_> = fs::read_dir(&tile_dir)
                .unwrap()
                .map(|e| e.unwrap().path())
                .collect();
            assert_eq!(entries.len(), 1);

            let tile = image::open(&entries[0]).unwrap();
            assert_eq!((tile.width(), tile.height()), (100, 100));
        }
    }

    #[tokio::test]
    async fn test_session_ids_are_distinct_and_upload_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = CapturePipeline::new(test_config(tmp.path()));

        let report = pipeline.run_with_frame(test_frame()).await.unwrap();

        let ids: HashSet<_> = report
            .outcomes
            .iter()
            .map(|o| o.artifact.unique_id.clone())
            .collect();
        assert_eq!(ids.len(), 10);

        for outcome in &report.outcomes {
            assert!(matches!(outcome.status, ArtifactStatus::Written));
            assert!(outcome.artifact.remote_key.is_none());
        }
    }

    #[tokio::test]
    async fn test_two_sessions_share_the_tree_without_collisions() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = CapturePipeline::new(test_config(tmp.path()));

        pipeline.run_with_frame(test_frame()).await.unwrap();
        pipeline.run_with_frame(test_frame()).await.unwrap();

        // Even when both runs land in the same timestamp directory the
        // per-artifact ids keep the 20 files apart.
        assert_eq!(count_pngs(&tmp.path().join("orus-data-node-07")), 20);
    }

    #[tokio::test]
    async fn test_write_failures_do_not_abort_the_batch() {
        let tmp = tempfile::tempdir().unwrap();
        // A file where the node directory should go makes every artifact
        // write fail.
        fs::write(tmp.path().join("orus-data-node-07"), b"blocker").unwrap();

        let pipeline = CapturePipeline::new(test_config(tmp.path()));
        let report = pipeline.run_with_frame(test_frame()).await.unwrap();

        assert!(!report.success);
        assert_eq!(report.outcomes.len(), 10);
        for outcome in &report.outcomes {
            assert!(matches!(outcome.status, ArtifactStatus::WriteFailed(_)));
        }
    }

    #[tokio::test]
    async fn test_upload_failures_keep_the_run_successful() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = test_config(tmp.path());
        // Nothing listens here; every upload fails fast while the writes
        // succeed.
        config.upload = Some(UploadConfig {
            endpoint: "http://127.0.0.1:1".to_string(),
            bucket: "orus-repo-01".to_string(),
        });

        let pipeline = CapturePipeline::new(config);
        let report = pipeline.run_with_frame(test_frame()).await.unwrap();

        assert!(report.success);
        assert_eq!(report.outcomes.len(), 10);
        for outcome in &report.outcomes {
            assert!(matches!(outcome.status, ArtifactStatus::UploadFailed(_)));

            let key = outcome.artifact.remote_key.as_deref().unwrap();
            let file_name = outcome.artifact.local_path.file_name().unwrap();
            assert!(key.starts_with("orus-data-node-07/"));
            assert!(key.ends_with(file_name.to_str().unwrap()));
        }
    }

    #[tokio::test]
    async fn test_overlapping_run_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = CapturePipeline::new(test_config(tmp.path()));

        let _guard = pipeline.run_guard.try_lock().unwrap();
        let err = pipeline.run_with_frame(test_frame()).await.unwrap_err();

        assert!(matches!(err, PipelineError::Busy));
    }
}
