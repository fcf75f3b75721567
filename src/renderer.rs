//! Drawing capabilities used by the animation
//!
//! The update step never draws by itself. It calls into a [`Renderer`], which
//! keeps whatever scene it needs and writes it out on [`Renderer::export`].
//!
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while drawing or saving a frame
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw frame: {0}")]
    Drawing(String),

    #[error("Failed to save frame to {path}: {source}")]
    FileSave {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Bin {bin} is out of range for a histogram with {n_bins} bins")]
    UnknownBar { bin: usize, n_bins: usize },
}

/// Which of the two histograms an element belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HistogramId {
    /// Uniform draws, drawn as horizontal bars next to the CDF
    Input,
    /// Transformed values, drawn as vertical bars under the CDF
    Output,
}

/// Single bar of one of the histograms
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BarRef {
    pub histogram: HistogramId,
    pub bin: usize,
}

///
/// Scene the animation draws into
///
/// Mutations are retained until the next [`Renderer::export`].
///
pub trait Renderer {
    /// Set the length of a bar (width for input, height for output)
    fn update_bar(&mut self, bar: BarRef, extent: u64) -> Result<(), RenderError>;

    /// Replace the text of the sample-count label
    fn set_label(&mut self, text: &str) -> Result<(), RenderError>;

    /// Set the upper bound of the value axis of a histogram
    fn rescale_axis(&mut self, histogram: HistogramId, bound: u64) -> Result<(), RenderError>;

    /// Commit the pending changes to the whole canvas
    fn redraw(&mut self) -> Result<(), RenderError>;

    /// Write the current canvas to an image at `path`
    fn export(&mut self, path: &Path) -> Result<(), RenderError>;
}

/// A call made on [`RecordingRenderer`]
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    UpdateBar(BarRef, u64),
    SetLabel(String),
    RescaleAxis(HistogramId, u64),
    Redraw,
    Export(PathBuf),
}

///
/// Headless renderer that only records the calls made on it
///
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
    /// Exports beyond this count fail, to exercise error propagation
    pub fail_after_exports: Option<usize>,
}

impl RecordingRenderer {
    /// Paths of all successful exports, in order
    pub fn exports(&self) -> impl Iterator<Item = &Path> {
        self.calls.iter().filter_map(|c| match c {
            RenderCall::Export(p) => Some(p.as_path()),
            _ => None,
        })
    }

    /// Most recently set label
    pub fn label(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            RenderCall::SetLabel(s) => Some(s.as_str()),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn update_bar(&mut self, bar: BarRef, extent: u64) -> Result<(), RenderError> {
        self.calls.push(RenderCall::UpdateBar(bar, extent));
        Ok(())
    }

    fn set_label(&mut self, text: &str) -> Result<(), RenderError> {
        self.calls.push(RenderCall::SetLabel(text.to_owned()));
        Ok(())
    }

    fn rescale_axis(&mut self, histogram: HistogramId, bound: u64) -> Result<(), RenderError> {
        self.calls.push(RenderCall::RescaleAxis(histogram, bound));
        Ok(())
    }

    fn redraw(&mut self) -> Result<(), RenderError> {
        self.calls.push(RenderCall::Redraw);
        Ok(())
    }

    fn export(&mut self, path: &Path) -> Result<(), RenderError> {
        if let Some(limit) = self.fail_after_exports {
            if self.exports().count() >= limit {
                return Err(RenderError::FileSave {
                    path: path.to_owned(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                });
            }
        }
        self.calls.push(RenderCall::Export(path.to_owned()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording() {
        let mut r = RecordingRenderer::default();
        let bar = BarRef {
            histogram: HistogramId::Input,
            bin: 3,
        };
        r.update_bar(bar, 2).unwrap();
        r.set_label("N = 20").unwrap();
        r.set_label("N = 40").unwrap();
        r.export(Path::new("frames/its_00000.png")).unwrap();

        assert_eq!(RenderCall::UpdateBar(bar, 2), r.calls[0]);
        assert_eq!(Some("N = 40"), r.label());
        assert_eq!(
            vec![Path::new("frames/its_00000.png")],
            r.exports().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_recording_failure() {
        let mut r = RecordingRenderer {
            fail_after_exports: Some(1),
            ..Default::default()
        };
        assert!(r.export(Path::new("a.png")).is_ok());
        assert!(matches!(
            r.export(Path::new("b.png")),
            Err(RenderError::FileSave { .. })
        ));
        assert_eq!(1, r.exports().count());
    }
}
