use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use its_animation::convergence;
use its_animation::distribution::cdf_curve;
use its_animation::prelude::*;
use tracing::info;

/// Resolution of the CDF curve drawn between the histograms
const CDF_POINTS: usize = 1024;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AnimationConfig::default();
    config.validate()?;

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Cannot create {}", config.output_dir.display()))?;

    let dist = Normal::new(config.loc, config.scale)?;
    let edges = BinEdges::unit_interval(config.n_bins)?;
    let renderer = BitmapRenderer::new(&config, &edges, &edges, cdf_curve(&dist, CDF_POINTS));
    let feed = SampleFeed::new(&config)?;
    let mut state = AnimationState::new(&config, dist, renderer)?;

    info!(
        frames = config.frame_count(),
        samples = config.n_samples,
        seed = config.seed,
        output = %config.output_dir.display(),
        "Rendering inverse transform sampling of N({}, {})",
        config.loc,
        config.scale
    );

    let progress = ProgressBar::new(config.frame_count() as u64);
    progress.set_style(ProgressStyle::with_template(
        "{bar:40} {pos}/{len} frames [{elapsed_precise}]",
    )?);

    let summary = state.run(&feed, |_| progress.inc(1))?;
    progress.finish_and_clear();

    let fit = convergence::check_output(&dist, feed.samples())?;
    info!(
        frames = summary.frames,
        rescales = summary.rescales,
        ks_statistic = fit.stat,
        p_value = fit.p_value(),
        "Done, {:.1} s of animation at {} fps",
        config.duration_secs(),
        config.fps
    );
    Ok(())
}
