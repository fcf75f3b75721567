//! PNG frames drawn with [`plotters`]
//!
//! The canvas is laid out on a 9x9 grid. The top-left 6x2 block holds the
//! input histogram as horizontal bars, the top-right 6x7 block the CDF curve,
//! and the bottom-right 3x7 block the output histogram as vertical bars. The
//! CDF therefore maps every input bar onto the output bars below it. The
//! sample-count label is the caption of the CDF panel.
//!
use crate::binning::BinEdges;
use crate::config::AnimationConfig;
use crate::renderer::{BarRef, HistogramId, RenderError, Renderer};
use plotters::prelude::*;
use std::path::Path;
use tracing::trace;

const GRID: u32 = 9;
const TOP_ROWS: u32 = 6;
const LEFT_COLS: u32 = 2;

/// Fraction of the bin width covered by a bar
const BAR_FILL: f64 = 0.8;
const BAR_ALPHA: f64 = 0.5;
const BORDER_PX: u32 = 3;
const CURVE_PX: u32 = 3;
const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);

/// One histogram as drawn on the canvas
#[derive(Debug, Clone)]
struct BarPanel {
    /// Lower edge and width of each bin
    bins: Vec<(f64, f64)>,
    extents: Vec<u64>,
    bound: u64,
}

impl BarPanel {
    fn new(edges: &BinEdges, bound: u64) -> Self {
        Self {
            bins: edges.bins().collect(),
            extents: vec![0; edges.n_bins()],
            bound,
        }
    }

    fn range(&self) -> std::ops::Range<f64> {
        0.0..self.bound as f64
    }
}

///
/// Renderer that keeps the scene in memory and paints it to PNG on export
///
#[derive(Debug, Clone)]
pub struct BitmapRenderer {
    size: (u32, u32),
    input: BarPanel,
    output: BarPanel,
    cdf_curve: Vec<(f64, f64)>,
    label: String,
}

impl BitmapRenderer {
    /// Create an empty scene
    ///
    /// # Arguments
    /// - `config` - canvas size and initial axis bounds are taken from it
    /// - `input_edges`, `output_edges` - bins of the two histograms
    /// - `cdf_curve` - points of the target CDF over `[0, 1]`
    ///
    pub fn new(
        config: &AnimationConfig,
        input_edges: &BinEdges,
        output_edges: &BinEdges,
        cdf_curve: Vec<(f64, f64)>,
    ) -> Self {
        let (input_bound, output_bound) = config.initial_bounds();
        Self {
            size: (config.width, config.height),
            input: BarPanel::new(input_edges, input_bound),
            output: BarPanel::new(output_edges, output_bound),
            cdf_curve,
            label: String::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current axis bound of a histogram
    pub fn bound(&self, histogram: HistogramId) -> u64 {
        self.panel(histogram).bound
    }

    /// Current bar extents of a histogram
    pub fn extents(&self, histogram: HistogramId) -> &[u64] {
        &self.panel(histogram).extents
    }

    fn panel(&self, histogram: HistogramId) -> &BarPanel {
        match histogram {
            HistogramId::Input => &self.input,
            HistogramId::Output => &self.output,
        }
    }

    fn panel_mut(&mut self, histogram: HistogramId) -> &mut BarPanel {
        match histogram {
            HistogramId::Input => &mut self.input,
            HistogramId::Output => &mut self.output,
        }
    }

    fn paint(&self, path: &Path) -> Result<(), RenderError> {
        let (width, height) = self.size;
        let root = BitMapBackend::new(path, self.size).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| RenderError::Drawing(e.to_string()))?;

        let (top, bottom) = root.split_vertically((height / GRID * TOP_ROWS) as i32);
        let (left, centre) = top.split_horizontally((width / GRID * LEFT_COLS) as i32);
        let (_corner, below) = bottom.split_horizontally((width / GRID * LEFT_COLS) as i32);

        let bar_style = BAR_COLOR.mix(BAR_ALPHA).filled();
        let border = BLACK.stroke_width(BORDER_PX);

        // Input: value along x, bins along y
        let mut chart = ChartBuilder::on(&left)
            .build_cartesian_2d(self.input.range(), 0.0..1.0)
            .map_err(|e| RenderError::Drawing(e.to_string()))?;
        chart
            .draw_series(self.input.bins.iter().zip(&self.input.extents).map(
                |(&(lo, w), &count)| {
                    Rectangle::new([(0.0, lo), (count as f64, lo + BAR_FILL * w)], bar_style)
                },
            ))
            .map_err(|e| RenderError::Drawing(e.to_string()))?;
        chart
            .plotting_area()
            .draw(&Rectangle::new(
                [(0.0, 0.0), (self.input.bound as f64, 1.0)],
                border,
            ))
            .map_err(|e| RenderError::Drawing(e.to_string()))?;

        // CDF mapping between the two histograms
        let mut builder = ChartBuilder::on(&centre);
        if !self.label.is_empty() {
            builder.caption(&self.label, ("sans-serif", 20));
        }
        let mut chart = builder
            .build_cartesian_2d(0.0..1.0, 0.0..1.0)
            .map_err(|e| RenderError::Drawing(e.to_string()))?;
        chart
            .draw_series(LineSeries::new(
                self.cdf_curve.iter().copied(),
                BAR_COLOR.stroke_width(CURVE_PX),
            ))
            .map_err(|e| RenderError::Drawing(e.to_string()))?;
        chart
            .plotting_area()
            .draw(&Rectangle::new([(0.0, 0.0), (1.0, 1.0)], border))
            .map_err(|e| RenderError::Drawing(e.to_string()))?;

        // Output: bins along x, value along y
        let mut chart = ChartBuilder::on(&below)
            .build_cartesian_2d(0.0..1.0, self.output.range())
            .map_err(|e| RenderError::Drawing(e.to_string()))?;
        chart
            .draw_series(self.output.bins.iter().zip(&self.output.extents).map(
                |(&(lo, w), &count)| {
                    Rectangle::new([(lo, 0.0), (lo + BAR_FILL * w, count as f64)], bar_style)
                },
            ))
            .map_err(|e| RenderError::Drawing(e.to_string()))?;
        chart
            .plotting_area()
            .draw(&Rectangle::new(
                [(0.0, 0.0), (1.0, self.output.bound as f64)],
                border,
            ))
            .map_err(|e| RenderError::Drawing(e.to_string()))?;

        root.present().map_err(|e| RenderError::FileSave {
            path: path.to_owned(),
            source: std::io::Error::other(e.to_string()),
        })
    }
}

impl Renderer for BitmapRenderer {
    fn update_bar(&mut self, bar: BarRef, extent: u64) -> Result<(), RenderError> {
        let panel = self.panel_mut(bar.histogram);
        let n_bins = panel.extents.len();
        let slot = panel
            .extents
            .get_mut(bar.bin)
            .ok_or(RenderError::UnknownBar { bin: bar.bin, n_bins })?;
        *slot = extent;
        Ok(())
    }

    fn set_label(&mut self, text: &str) -> Result<(), RenderError> {
        text.clone_into(&mut self.label);
        Ok(())
    }

    fn rescale_axis(&mut self, histogram: HistogramId, bound: u64) -> Result<(), RenderError> {
        self.panel_mut(histogram).bound = bound;
        Ok(())
    }

    /// Nothing to do, every export paints the whole scene
    fn redraw(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    fn export(&mut self, path: &Path) -> Result<(), RenderError> {
        trace!(path = %path.display(), "Painting frame");
        self.paint(path)
    }
}
