//! Parameters of the animation
//!
//! There is no runtime input: everything is fixed in [`AnimationConfig::default`].
//!
use crate::SetupError;
use std::path::PathBuf;

/// Number of histogram bins subtracted when picking the initial axis bounds
///
/// Gives some headroom over the expected uniform count per bin so the input
/// axis does not need to grow immediately.
const BOUND_BIN_OFFSET: usize = 8;

///
/// Complete set of parameters for a single run
///
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationConfig {
    /// Number of histogram bins over `[0, 1]`
    pub n_bins: usize,
    /// Total number of uniform draws
    pub n_samples: usize,
    /// Draws consumed per frame
    pub nums_per_draw: usize,
    /// Playback rate hint for whoever assembles the frames
    pub fps: u32,
    /// Seed of the random number generator
    pub seed: u64,
    /// Mean of the target Normal distribution
    pub loc: f64,
    /// Standard deviation of the target Normal distribution
    pub scale: f64,
    /// Ratio of the initial output axis bound to the input one
    pub diff_height_scale: u64,
    /// Multiplier applied to an axis bound when a histogram outgrows it
    pub rescale_factor: f64,
    /// Directory receiving the frames
    pub output_dir: PathBuf,
    /// Canvas size in pixels
    pub width: u32,
    pub height: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            n_bins: 48,
            n_samples: 50_000,
            nums_per_draw: 20,
            fps: 60,
            seed: 0,
            loc: 0.5,
            scale: 0.1,
            diff_height_scale: 4,
            rescale_factor: 1.5,
            output_dir: PathBuf::from("frames"),
            width: 800,
            height: 800,
        }
    }
}

impl AnimationConfig {
    /// Check that the parameters describe a run that can be drawn
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.n_bins == 0 {
            return Err(SetupError::NoBins);
        } else if self.n_samples == 0 {
            return Err(SetupError::NoSamples);
        } else if self.nums_per_draw == 0 {
            return Err(SetupError::EmptyBatch);
        } else if !self.loc.is_finite() {
            return Err(SetupError::InvalidLocation(self.loc));
        } else if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(SetupError::InvalidScale(self.scale));
        } else if !(self.rescale_factor > 1.0) {
            return Err(SetupError::InvalidRescaleFactor(self.rescale_factor));
        } else if self.width < 9 || self.height < 9 {
            return Err(SetupError::CanvasTooSmall(self.width, self.height));
        }
        Ok(())
    }

    /// Number of frames the run produces
    ///
    /// Every frame consumes `nums_per_draw` samples, except possibly the last one.
    ///
    pub fn frame_count(&self) -> usize {
        self.n_samples.div_ceil(self.nums_per_draw)
    }

    /// Initial visible bounds of the input and output histogram axes
    ///
    /// Both are at least 1, so small runs still have a drawable range.
    ///
    pub fn initial_bounds(&self) -> (u64, u64) {
        let divisor = self.n_bins.saturating_sub(BOUND_BIN_OFFSET).max(1);
        let input = (self.n_samples / divisor).max(1) as u64;
        let output = (self.diff_height_scale * self.n_samples as u64 / divisor as u64).max(1);
        (input, output)
    }

    /// Playback length of the exported frames in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / f64::from(self.fps.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_frame_count() {
        let config = AnimationConfig::default();
        assert_eq!(2500, config.frame_count());
    }

    #[test]
    fn test_partial_last_frame() {
        let config = AnimationConfig {
            n_samples: 101,
            nums_per_draw: 20,
            ..AnimationConfig::default()
        };
        assert_eq!(6, config.frame_count());
    }

    #[test]
    fn test_initial_bounds() {
        let config = AnimationConfig::default();
        assert_eq!((1250, 5000), config.initial_bounds());

        let tiny = AnimationConfig {
            n_bins: 4,
            n_samples: 3,
            ..AnimationConfig::default()
        };
        assert_eq!((3, 12), tiny.initial_bounds());
    }

    #[test]
    fn test_validation() {
        assert!(AnimationConfig::default().validate().is_ok());

        let cases = [
            (
                AnimationConfig {
                    n_bins: 0,
                    ..AnimationConfig::default()
                },
                SetupError::NoBins,
            ),
            (
                AnimationConfig {
                    n_samples: 0,
                    ..AnimationConfig::default()
                },
                SetupError::NoSamples,
            ),
            (
                AnimationConfig {
                    nums_per_draw: 0,
                    ..AnimationConfig::default()
                },
                SetupError::EmptyBatch,
            ),
            (
                AnimationConfig {
                    scale: -0.1,
                    ..AnimationConfig::default()
                },
                SetupError::InvalidScale(-0.1),
            ),
            (
                AnimationConfig {
                    rescale_factor: 1.0,
                    ..AnimationConfig::default()
                },
                SetupError::InvalidRescaleFactor(1.0),
            ),
            (
                AnimationConfig {
                    width: 4,
                    ..AnimationConfig::default()
                },
                SetupError::CanvasTooSmall(4, 800),
            ),
        ];

        for (config, err) in cases {
            assert_eq!(Err(err), config.validate());
        }
    }

    #[test]
    fn test_duration() {
        let config = AnimationConfig::default();
        approx::assert_relative_eq!(2500.0 / 60.0, config.duration_secs());
    }
}
