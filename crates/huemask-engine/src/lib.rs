#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// render loop controller driving the per-tick frame and mask updates.
pub mod controller;

/// Error types for the engine module.
pub mod error;

/// mask computation pipeline with reusable working buffers.
pub mod pipeline;

/// click-to-sample HSV readout.
pub mod sampler;

/// frame source abstraction consumed by the render loop.
pub mod source;

/// HSV range and pipeline option state.
pub mod state;

pub use crate::controller::{LoopState, RenderLoop, TickOutcome};
pub use crate::error::EngineError;
pub use crate::pipeline::MaskPipeline;
pub use crate::sampler::{sample, EyedropSample};
pub use crate::source::FrameSource;
pub use crate::state::{HsvRange, PipelineOptions};
