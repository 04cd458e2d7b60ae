//! Local persistence of rasters as PNG files.

use image::RgbImage;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("failed to create directory {path}: {error}")]
    CreateDir {
        error: std::io::Error,
        path: String,
    },

    #[error("failed to write {path}: {error}")]
    Write {
        error: image::ImageError,
        path: String,
    },
}

/// Writes a raster into `dir/file_name` as a PNG.
///
/// Missing parent directories are created; an existing file at the target
/// path is overwritten (artifact names are unique per run, so this only
/// happens when the caller reuses a name deliberately).
pub fn write_png(image: &RgbImage, dir: &Path, file_name: &str) -> Result<PathBuf, WriteError> {
    fs::create_dir_all(dir).map_err(|e| WriteError::CreateDir {
        error: e,
        path: dir.display().to_string(),
    })?;

    let path = dir.join(file_name);
    image.save(&path).map_err(|e| WriteError::Write {
        error: e,
        path: path.display().to_string(),
    })?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("node").join("stamp").join("main");
        let image = RgbImage::new(10, 10);

        let path = write_png(&image, &dir, "frame.png").unwrap();

        assert_eq!(path, dir.join("frame.png"));
        assert!(path.is_file());
    }

    #[test]
    fn test_written_file_decodes_back() {
        let tmp = tempfile::tempdir().unwrap();
        let image = RgbImage::new(8, 6);

        let path = write_png(&image, tmp.path(), "frame.png").unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
    }

    #[test]
    fn test_write_fails_when_directory_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocked");
        fs::write(&blocker, b"not a directory").unwrap();

        let image = RgbImage::new(4, 4);
        let result = write_png(&image, &blocker.join("sub"), "frame.png");

        assert!(matches!(result, Err(WriteError::CreateDir { .. })));
    }
}
