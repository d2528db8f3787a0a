use image::RgbImage;

use crate::foundation::core::{Palette, Rgb8};

/// A raster of palette indices, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedFrame {
    pub width: u32,
    pub height: u32,
    pub indices: Vec<u8>,
}

impl IndexedFrame {
    pub fn index_at(&self, x: u32, y: u32) -> u8 {
        self.indices[y as usize * self.width as usize + x as usize]
    }
}

/// Index of the palette entry closest to `rgb` in Euclidean RGB distance.
///
/// Ties resolve to the lower index.
pub fn nearest_index(palette: &Palette, rgb: [f32; 3]) -> u8 {
    let mut best = 0u8;
    let mut best_dist = f32::INFINITY;
    for (idx, c) in palette.colors().iter().enumerate() {
        let d = dist_sq(rgb, *c);
        if d < best_dist {
            best_dist = d;
            best = idx as u8;
        }
    }
    best
}

fn dist_sq(rgb: [f32; 3], c: Rgb8) -> f32 {
    let dr = rgb[0] - f32::from(c.r);
    let dg = rgb[1] - f32::from(c.g);
    let db = rgb[2] - f32::from(c.b);
    dr * dr + dg * dg + db * db
}

/// Floyd–Steinberg error diffusion onto `palette`.
///
/// Pixels are visited in row-major order. Quantization error moves to unvisited neighbours with
/// weights 7/16 (right), 3/16 (below-left), 5/16 (below) and 1/16 (below-right); neighbours outside
/// the raster are skipped.
pub fn quantize_floyd_steinberg(raster: &RgbImage, palette: &Palette) -> IndexedFrame {
    let (width, height) = raster.dimensions();
    let w = width as usize;
    let mut indices = Vec::with_capacity(w * height as usize);

    // Error carried into the current and the next row, per channel.
    let mut err_cur = vec![[0.0f32; 3]; w];
    let mut err_next = vec![[0.0f32; 3]; w];

    for y in 0..height {
        for x in 0..w {
            let px = raster.get_pixel(x as u32, y).0;
            let carried = err_cur[x];
            let value = [
                (f32::from(px[0]) + carried[0]).clamp(0.0, 255.0),
                (f32::from(px[1]) + carried[1]).clamp(0.0, 255.0),
                (f32::from(px[2]) + carried[2]).clamp(0.0, 255.0),
            ];

            let idx = nearest_index(palette, value);
            indices.push(idx);

            let chosen = palette.colors()[usize::from(idx)].to_array();
            let err = [
                value[0] - f32::from(chosen[0]),
                value[1] - f32::from(chosen[1]),
                value[2] - f32::from(chosen[2]),
            ];

            if x + 1 < w {
                add_scaled(&mut err_cur[x + 1], err, 7.0 / 16.0);
            }
            if y + 1 < height {
                if x > 0 {
                    add_scaled(&mut err_next[x - 1], err, 3.0 / 16.0);
                }
                add_scaled(&mut err_next[x], err, 5.0 / 16.0);
                if x + 1 < w {
                    add_scaled(&mut err_next[x + 1], err, 1.0 / 16.0);
                }
            }
        }

        std::mem::swap(&mut err_cur, &mut err_next);
        err_next.fill([0.0; 3]);
    }

    IndexedFrame {
        width,
        height,
        indices,
    }
}

fn add_scaled(acc: &mut [f32; 3], err: [f32; 3], weight: f32) {
    for (a, e) in acc.iter_mut().zip(err) {
        *a += e * weight;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/dither.rs"]
mod tests;
