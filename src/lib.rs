//! Animate inverse transform sampling
//!
//! Uniform random draws are passed through the quantile function (inverse
//! CDF) of a target distribution. Both the raw draws and the transformed
//! values are accumulated into histograms that are redrawn batch by batch and
//! exported as a numbered sequence of frames.
//!
//! The moving parts are:
//!  - [`sample_feed::SampleFeed`] - seeded sequence of uniform draws consumed in batches
//!  - [`binning`] - fixed bin edges over `[0, 1]` and their frequency tables
//!  - [`animator::AnimationState`] - the per-frame update step
//!  - [`renderer::Renderer`] - drawing capabilities the update step calls into
//!  - [`convergence`] - Kolmogorov-Smirnov check of the final output
//!
//! ```
//! # use its_animation::prelude::*;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AnimationConfig {
//!     n_samples: 200,
//!     ..AnimationConfig::default()
//! };
//! let feed = SampleFeed::new(&config)?;
//! let dist = Normal::new(config.loc, config.scale)?;
//! let mut state = AnimationState::new(&config, dist, RecordingRenderer::default())?;
//!
//! let summary = state.run(&feed, |_| {})?;
//! assert_eq!(summary.frames, 10);
//! # Ok(())}
//! ```
//!
use thiserror::Error;

pub mod animator;
pub mod binning;
pub mod bitmap;
pub mod config;
pub mod convergence;
pub mod distribution;
pub mod renderer;
pub mod sample_feed;

/// Errors raised while putting the animation together
///
/// All of these are detected before the first frame is drawn.
#[derive(Error, Debug, PartialEq)]
pub enum SetupError {
    #[error("Bin edges are not strictly increasing")]
    UnsortedGrid,
    #[error("At least one bin is required")]
    NoBins,
    #[error("At least one sample is required")]
    NoSamples,
    #[error("Batch size must be positive")]
    EmptyBatch,
    #[error("Scale of the distribution must be a positive finite number, got {0}")]
    InvalidScale(f64),
    #[error("Location of the distribution must be finite, got {0}")]
    InvalidLocation(f64),
    #[error("Canvas of {0}x{1} pixels is too small to draw on")]
    CanvasTooSmall(u32, u32),
    #[error("Axis rescale factor must be greater than one, got {0}")]
    InvalidRescaleFactor(f64),
}

/// Commonly used items
pub mod prelude {
    pub use crate::animator::{AnimationError, AnimationState, RunSummary, TickOutcome};
    pub use crate::binning::{BinEdges, FrequencyTable, Histogram};
    pub use crate::bitmap::BitmapRenderer;
    pub use crate::config::AnimationConfig;
    pub use crate::distribution::{InverseCdf, InverseTransform, Normal};
    pub use crate::renderer::{BarRef, HistogramId, RecordingRenderer, RenderCall, Renderer};
    pub use crate::sample_feed::SampleFeed;
    pub use crate::SetupError;
}
