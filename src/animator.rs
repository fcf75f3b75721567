//! The per-frame update step
//!
//! Every tick takes the next batch of uniform draws, counts each draw in the
//! input histogram and its inverse transform in the output histogram, pushes
//! the new bar lengths to the [`Renderer`] and exports exactly one frame.
//!
use crate::binning::{BinEdges, Histogram};
use crate::config::AnimationConfig;
use crate::distribution::{InverseCdf, InverseTransform};
use crate::renderer::{BarRef, HistogramId, RenderError, Renderer};
use crate::sample_feed::SampleFeed;
use crate::SetupError;
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, trace};

#[derive(Error, Debug)]
pub enum AnimationError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Tick at offset {frame} is out of order, next expected offset is {expected}")]
    OutOfOrder { frame: usize, expected: usize },

    #[error("All {samples} samples are already processed")]
    Finished { samples: usize },
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Index of the tick, also the number of the exported frame
    pub tick: usize,
    /// Total number of draws counted so far
    pub processed: usize,
    /// Bars whose extent changed
    pub touched: BTreeSet<BarRef>,
    /// Histograms whose axis grew
    pub rescaled: Vec<HistogramId>,
    /// Whether the whole canvas was redrawn
    pub redrawn: bool,
    pub frame_path: PathBuf,
}

/// Totals over a complete run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: usize,
    pub samples: usize,
    pub rescales: usize,
    pub input_bound: u64,
    pub output_bound: u64,
}

/// Grow an axis bound once
///
/// The result is truncated to a whole count and always larger than `bound`.
///
fn grow_bound(bound: u64, factor: f64) -> u64 {
    ((bound as f64 * factor) as u64).max(bound + 1)
}

///
/// State of the animation between ticks
///
/// Owns both histograms, their visible axis bounds and the renderer. Ticks
/// must be applied in increasing offset order without gaps.
///
#[derive(Debug)]
pub struct AnimationState<D, R> {
    sampler: InverseTransform<D>,
    input: Histogram,
    output: Histogram,
    input_bound: u64,
    output_bound: u64,
    rescale_factor: f64,
    output_dir: PathBuf,
    processed: usize,
    renderer: R,
}

impl<D, R> AnimationState<D, R>
where
    D: InverseCdf,
    R: Renderer,
{
    pub fn new(config: &AnimationConfig, dist: D, renderer: R) -> Result<Self, SetupError> {
        config.validate()?;
        let (input_bound, output_bound) = config.initial_bounds();

        Ok(Self {
            sampler: InverseTransform::new(dist),
            input: Histogram::new(BinEdges::unit_interval(config.n_bins)?),
            output: Histogram::new(BinEdges::unit_interval(config.n_bins)?),
            input_bound,
            output_bound,
            rescale_factor: config.rescale_factor,
            output_dir: config.output_dir.clone(),
            processed: 0,
            renderer,
        })
    }

    pub fn histogram(&self, id: HistogramId) -> &Histogram {
        match id {
            HistogramId::Input => &self.input,
            HistogramId::Output => &self.output,
        }
    }

    /// Visible bound of the value axis of a histogram
    pub fn bound(&self, id: HistogramId) -> u64 {
        match id {
            HistogramId::Input => self.input_bound,
            HistogramId::Output => self.output_bound,
        }
    }

    /// Number of draws counted so far
    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Path of the frame exported by tick `tick`
    pub fn frame_path(&self, tick: usize) -> PathBuf {
        self.output_dir.join(format!("its_{tick:05}.png"))
    }

    fn bound_mut(&mut self, id: HistogramId) -> &mut u64 {
        match id {
            HistogramId::Input => &mut self.input_bound,
            HistogramId::Output => &mut self.output_bound,
        }
    }

    /// Count a draw and its transform, and resize their bars
    fn count(&mut self, u: f64, touched: &mut BTreeSet<BarRef>) -> Result<(), RenderError> {
        let (bin, extent) = self.input.bin(u);
        let bar = BarRef {
            histogram: HistogramId::Input,
            bin,
        };
        self.renderer.update_bar(bar, extent)?;
        touched.insert(bar);

        let (bin, extent) = self.output.bin(self.sampler.transform(u));
        let bar = BarRef {
            histogram: HistogramId::Output,
            bin,
        };
        self.renderer.update_bar(bar, extent)?;
        touched.insert(bar);
        Ok(())
    }

    /// Advance the animation by one batch starting at offset `frame`
    ///
    /// The last batch may be shorter than the others. Exactly one frame is
    /// exported; any renderer failure aborts the tick. Once the feed is
    /// exhausted no further frames are produced.
    ///
    pub fn tick(&mut self, feed: &SampleFeed, frame: usize) -> Result<TickOutcome, AnimationError> {
        if self.processed >= feed.len() {
            return Err(AnimationError::Finished {
                samples: self.processed,
            });
        }
        if frame != self.processed {
            return Err(AnimationError::OutOfOrder {
                frame,
                expected: self.processed,
            });
        }

        let batch = feed.batch(frame);
        let tick = frame / feed.batch_size();
        let mut touched = BTreeSet::new();

        for &u in batch {
            self.count(u, &mut touched)?;
        }
        self.processed += batch.len();

        let rescaled: Vec<HistogramId> = [HistogramId::Input, HistogramId::Output]
            .into_iter()
            .filter(|id| self.histogram(*id).freqs().max() > self.bound(*id))
            .collect();
        let mut redrawn = !rescaled.is_empty();

        let last = self.processed >= feed.len();
        if tick % 2 == 0 || last {
            self.renderer
                .set_label(&format!("N = {}", self.processed))?;
            redrawn = true;
        }

        for id in &rescaled {
            let factor = self.rescale_factor;
            let bound = self.bound_mut(*id);
            let old = *bound;
            *bound = grow_bound(old, factor);
            let new = *bound;
            debug!(histogram = ?id, old, new, tick, "Rescaling axis");
            self.renderer.rescale_axis(*id, new)?;
        }

        if redrawn {
            self.renderer.redraw()?;
        }

        let frame_path = self.frame_path(tick);
        self.renderer.export(&frame_path)?;
        trace!(tick, processed = self.processed, touched = touched.len(), redrawn, "Exported frame");

        Ok(TickOutcome {
            tick,
            processed: self.processed,
            touched,
            rescaled,
            redrawn,
            frame_path,
        })
    }

    /// Run all remaining ticks of `feed` in order
    ///
    /// `on_tick` is called after every exported frame.
    ///
    pub fn run(
        &mut self,
        feed: &SampleFeed,
        mut on_tick: impl FnMut(&TickOutcome),
    ) -> Result<RunSummary, AnimationError> {
        let mut frames = 0;
        let mut rescales = 0;

        let start = self.processed;
        for frame in feed.offsets().skip_while(|f| *f < start) {
            let outcome = self.tick(feed, frame)?;
            frames += 1;
            rescales += outcome.rescaled.len();
            on_tick(&outcome);
        }

        let summary = RunSummary {
            frames,
            samples: self.processed,
            rescales,
            input_bound: self.input_bound,
            output_bound: self.output_bound,
        };
        info!(?summary, "Animation finished");
        Ok(summary)
    }
}
