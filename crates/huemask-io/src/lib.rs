#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// Frame rate counter for video processing.
pub mod fps_counter;

/// High-level image reading functions.
pub mod functional;

/// GStreamer camera and video file capture (feature-gated).
///
/// Camera capture via V4L2 pipelines, camera device enumeration and video
/// file playback. Requires the `gstreamer` feature flag and system GStreamer
/// libraries.
#[cfg(feature = "gstreamer")]
pub mod gstreamer;

/// Frame source adapters for the render loop.
pub mod sources;

pub use crate::error::IoError;
