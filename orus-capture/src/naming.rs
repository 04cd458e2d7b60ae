//! Artifact naming: node names, directory layout and remote keys.
//!
//! One session produces this tree under the save directory, with all ten
//! artifacts sharing the session timestamp:
//!
//! ```text
//! {node}/{timestamp}/main/{node}_{timestamp}_{id}.png
//! {node}/{timestamp}/stream_001/stream_001_{timestamp}_{id}.png
//! ...
//! {node}/{timestamp}/stream_009/stream_009_{timestamp}_{id}.png
//! ```
//!
//! The same relative paths double as object-store keys, always joined
//! with `/` regardless of platform.

use std::path::PathBuf;

/// Number of grid tiles per session.
pub const TILE_COUNT: u8 = 9;

/// Which raster of a session an artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// The full captured frame.
    Main,
    /// One grid tile, numbered 1..=9 in row-major order.
    Tile(u8),
}

/// Builds the node name for a node number: `orus-data-node-{NN}`.
pub fn node_name(node_number: u8) -> String {
    format!("orus-data-node-{node_number:02}")
}

/// Directory of an artifact, relative to the save directory.
pub fn relative_dir(kind: ArtifactKind, node_name: &str, timestamp: &str) -> PathBuf {
    PathBuf::from(node_name).join(timestamp).join(leaf_dir(kind))
}

/// File name of an artifact.
pub fn file_name(kind: ArtifactKind, node_name: &str, timestamp: &str, unique_id: &str) -> String {
    match kind {
        ArtifactKind::Main => format!("{node_name}_{timestamp}_{unique_id}.png"),
        ArtifactKind::Tile(i) => format!("stream_{i:03}_{timestamp}_{unique_id}.png"),
    }
}

/// Object-store key of an artifact: the relative directory joined with the
/// file name using `/`.
pub fn remote_key(kind: ArtifactKind, node_name: &str, timestamp: &str, file_name: &str) -> String {
    format!("{node_name}/{timestamp}/{}/{file_name}", leaf_dir(kind))
}

fn leaf_dir(kind: ArtifactKind) -> String {
    match kind {
        ArtifactKind::Main => "main".to_string(),
        ArtifactKind::Tile(i) => format!("stream_{i:03}"),
    }
}
