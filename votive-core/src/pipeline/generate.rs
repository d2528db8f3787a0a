use anyhow::Context as _;
use image::RgbImage;
use rayon::prelude::*;

use crate::{
    assets::font::GlyphSource,
    encode::assemble::{Animation, encode_gif},
    foundation::core::{Candle, FRAME_COUNT, FrameIndex, Palette},
    foundation::error::{VotiveError, VotiveResult},
    layout::wrap::layout_message,
    render::dither::{IndexedFrame, quantize_floyd_steinberg},
    render::frame::{CandleScene, render_frame_at},
};

/// Options for [`generate_candle_gif_with_opts`].
///
/// Only scheduling is configurable; geometry, palette and timing are fixed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateOpts {
    /// Render and quantize frames on a rayon pool instead of the calling thread.
    pub parallel: bool,
    /// Worker count for the parallel path. `None` uses rayon's default.
    pub threads: Option<usize>,
}

impl GenerateOpts {
    pub fn validate(&self) -> VotiveResult<()> {
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(VotiveError::validation(
                "generate 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// Render `candle` to GIF bytes on the calling thread.
pub fn generate_candle_gif(candle: &Candle, font: &dyn GlyphSource) -> VotiveResult<Vec<u8>> {
    generate_candle_gif_with_opts(candle, font, &GenerateOpts::default())
}

/// Render `candle` to GIF bytes.
///
/// Output is byte-identical for identical inputs regardless of `opts`. Any failure discards every
/// frame produced so far.
#[tracing::instrument(skip(candle, font), fields(chars = candle.message().chars().count()))]
pub fn generate_candle_gif_with_opts(
    candle: &Candle,
    font: &dyn GlyphSource,
    opts: &GenerateOpts,
) -> VotiveResult<Vec<u8>> {
    let anim = render_animation(candle, font, opts)?;
    encode_gif(&anim)
}

/// Lay out, render and quantize all frames without encoding them.
pub fn render_animation(
    candle: &Candle,
    font: &dyn GlyphSource,
    opts: &GenerateOpts,
) -> VotiveResult<Animation> {
    opts.validate()?;
    let scene = prepare_scene(candle, font)?;

    let frames = if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        pool.install(|| {
            (0..FRAME_COUNT)
                .into_par_iter()
                .map(|i| quantize_frame(&scene, FrameIndex(i)))
                .collect::<Vec<_>>()
        })
    } else {
        (0..FRAME_COUNT)
            .map(|i| quantize_frame(&scene, FrameIndex(i)))
            .collect()
    };

    tracing::debug!(
        frames = frames.len(),
        parallel = opts.parallel,
        "rendered candle frames"
    );
    Animation::new(frames, *scene.palette())
}

/// Lay out `candle` and rasterize its text once.
pub fn prepare_scene(candle: &Candle, font: &dyn GlyphSource) -> VotiveResult<CandleScene> {
    let layout = layout_message(candle, font)?;
    Ok(CandleScene::prepare(layout, font, Palette::CANDLE))
}

/// True-color frame before quantization, for previews.
pub fn render_preview_frame(
    candle: &Candle,
    font: &dyn GlyphSource,
    frame: FrameIndex,
) -> VotiveResult<RgbImage> {
    if frame.0 >= FRAME_COUNT {
        return Err(VotiveError::validation(format!(
            "frame index {} out of range (animation has {FRAME_COUNT} frames)",
            frame.0
        )));
    }
    let scene = prepare_scene(candle, font)?;
    Ok(render_frame_at(&scene, frame))
}

fn quantize_frame(scene: &CandleScene, frame: FrameIndex) -> IndexedFrame {
    let raster = render_frame_at(scene, frame);
    quantize_floyd_steinberg(&raster, scene.palette())
}

fn build_thread_pool(threads: Option<usize>) -> VotiveResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    checked_pool(builder.build())
}

fn checked_pool(
    built: Result<rayon::ThreadPool, rayon::ThreadPoolBuildError>,
) -> VotiveResult<rayon::ThreadPool> {
    Ok(built.context("build rayon thread pool")?)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/generate.rs"]
mod tests;
