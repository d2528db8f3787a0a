use image::{Rgb, RgbImage};

use crate::{
    animation::flame::{INNER_LOBE, OUTER_LOBE, flicker_offset},
    assets::font::{GlyphSource, InkMask},
    foundation::core::{
        CANDLE_BODY_HEIGHT, CANDLE_BODY_WIDTH, CANVAS_WIDTH, FRAME_COUNT, FrameIndex, Palette,
        PaletteRole, Point, Rgb8, Vec2,
    },
    foundation::math::blend_coverage,
    layout::wrap::MessageLayout,
};

/// Everything that stays constant across the frames of one animation.
///
/// Line ink is rasterized once here; per-frame rendering only composites it.
#[derive(Clone, Debug)]
pub struct CandleScene {
    layout: MessageLayout,
    line_ink: Vec<InkMask>,
    palette: Palette,
}

impl CandleScene {
    pub fn prepare(layout: MessageLayout, font: &dyn GlyphSource, palette: Palette) -> Self {
        let center_x = f64::from(CANVAS_WIDTH) / 2.0;
        let line_ink = layout
            .lines
            .iter()
            .map(|line| {
                let width = f64::from(font.measure(&line.text));
                let origin = Point::new(center_x - width / 2.0, f64::from(line.baseline_y));
                font.draw(&line.text, origin)
            })
            .collect();

        Self {
            layout,
            line_ink,
            palette,
        }
    }

    pub fn layout(&self) -> &MessageLayout {
        &self.layout
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

/// Render the scene with the flame displaced by `flicker`.
pub fn render_frame(scene: &CandleScene, flicker: Vec2) -> RgbImage {
    let canvas = scene.layout.canvas;
    let palette = &scene.palette;
    let background = palette.color(PaletteRole::Background);
    let mut img = RgbImage::from_pixel(canvas.width, canvas.height, to_pixel(background));

    let ink = palette.color(PaletteRole::TextInk);
    for mask in &scene.line_ink {
        for (x, y, alpha) in mask.ink_pixels() {
            if !canvas.contains(x, y) {
                continue;
            }
            let (x, y) = (x as u32, y as u32);
            let under = from_pixel(*img.get_pixel(x, y));
            img.put_pixel(x, y, to_pixel(blend_coverage(under, ink, alpha)));
        }
    }

    let (body_x, body_y) = scene.layout.candle_origin();
    let body = to_pixel(palette.color(PaletteRole::CandleBody));
    for y in body_y..body_y + CANDLE_BODY_HEIGHT {
        for x in body_x..body_x + CANDLE_BODY_WIDTH {
            if x < canvas.width && y < canvas.height {
                img.put_pixel(x, y, body);
            }
        }
    }

    let (cx, cy) = scene.layout.flame_center();
    for (lobe, role) in [
        (OUTER_LOBE, PaletteRole::OuterFlame),
        (INNER_LOBE, PaletteRole::InnerFlame),
    ] {
        let color = to_pixel(palette.color(role));
        for (dx, dy) in lobe.offsets(flicker) {
            let (x, y) = (cx + dx, cy + dy);
            if canvas.contains(x, y) {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }

    img
}

/// Render frame `frame` of the fixed-length loop.
pub fn render_frame_at(scene: &CandleScene, frame: FrameIndex) -> RgbImage {
    render_frame(scene, flicker_offset(frame, FRAME_COUNT))
}

fn to_pixel(c: Rgb8) -> Rgb<u8> {
    Rgb(c.to_array())
}

fn from_pixel(p: Rgb<u8>) -> Rgb8 {
    Rgb8::new(p.0[0], p.0[1], p.0[2])
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
