use image::Rgb;

use super::*;
use crate::foundation::core::PaletteRole;

fn solid(w: u32, h: u32, c: Rgb8) -> RgbImage {
    RgbImage::from_pixel(w, h, Rgb(c.to_array()))
}

#[test]
fn exact_palette_colors_map_without_error() {
    let p = Palette::CANDLE;
    for role in PaletteRole::ALL {
        let out = quantize_floyd_steinberg(&solid(7, 5, p.color(role)), &p);
        assert_eq!(out.width, 7);
        assert_eq!(out.height, 5);
        assert!(out.indices.iter().all(|&i| i == role.index()));
    }
}

#[test]
fn nearest_prefers_closest_and_breaks_ties_low() {
    let p = Palette::CANDLE;
    assert_eq!(nearest_index(&p, [250.0, 250.0, 250.0]), 0);
    assert_eq!(nearest_index(&p, [40.0, 40.0, 40.0]), 4);
    assert_eq!(nearest_index(&p, [255.0, 130.0, 10.0]), 2);
    // (255, 235, 0) is equidistant from candle body (255, 215, 0) and inner flame (255, 255, 0).
    assert_eq!(nearest_index(&p, [255.0, 235.0, 0.0]), 1);
}

#[test]
fn mid_gray_dithers_to_a_mix_of_light_and_dark() {
    let p = Palette::CANDLE;
    let out = quantize_floyd_steinberg(&solid(16, 16, Rgb8::new(144, 144, 144)), &p);
    let light = out.indices.iter().filter(|&&i| i == 0).count();
    let dark = out.indices.iter().filter(|&&i| i == 4).count();
    assert!(light > 0 && dark > 0, "light={light} dark={dark}");
    assert!(out.indices.iter().all(|&i| usize::from(i) < p.len()));
}

#[test]
fn error_flows_right_along_the_first_row() {
    let p = Palette::CANDLE;
    // A lone mid-gray pixel rounds to one extreme; the carried error must push its right
    // neighbour (same gray) towards the other extreme.
    let out = quantize_floyd_steinberg(&solid(2, 1, Rgb8::new(144, 144, 144)), &p);
    assert_ne!(out.index_at(0, 0), out.index_at(1, 0));
}

#[test]
fn single_column_does_not_wrap_or_underflow() {
    let p = Palette::CANDLE;
    let out = quantize_floyd_steinberg(&solid(1, 9, Rgb8::new(128, 128, 128)), &p);
    assert_eq!(out.indices.len(), 9);
}

#[test]
fn quantization_is_deterministic_and_stateless() {
    let p = Palette::CANDLE;
    let mut img = RgbImage::new(23, 11);
    for (x, y, px) in img.enumerate_pixels_mut() {
        *px = Rgb([(x * 11) as u8, (y * 23) as u8, ((x + y) * 7) as u8]);
    }
    let a = quantize_floyd_steinberg(&img, &p);
    let _ = quantize_floyd_steinberg(&solid(4, 4, Rgb8::new(1, 2, 3)), &p);
    let b = quantize_floyd_steinberg(&img, &p);
    assert_eq!(a, b);
}

fn gray_raster(rows: &[&[u8]]) -> RgbImage {
    let mut img = RgbImage::new(rows[0].len() as u32, rows.len() as u32);
    for (y, row) in rows.iter().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            img.put_pixel(x as u32, y as u32, Rgb([v, v, v]));
        }
    }
    img
}

#[test]
fn diffusion_weights_land_on_their_neighbours() {
    // Hand-traced: (0,0) 180 -> white, err -75; (1,0) 107.19 -> ink, err +56.19;
    // (2,0) 124.58 -> ink; (0,1) 137.10 -> ink; (1,1) 164.34 -> white; (2,1) 136.84 -> ink.
    // Swapping any pair of weights, or sending the 5/16 share below-right, changes the grid.
    let img = gray_raster(&[&[180, 140, 100], &[150, 100, 150]]);
    let out = quantize_floyd_steinberg(&img, &Palette::CANDLE);
    assert_eq!(out.indices, vec![0, 4, 4, 4, 0, 4]);
}

#[test]
fn last_column_error_stays_in_its_row() {
    // (1,0) 180 -> white, err -75. Only 3/16 of it reaches (0,1): 255 -> 165.9 stays white.
    // Carrying the 7/16 share into the next row would push (0,1) to 132 and flip it to ink.
    let img = gray_raster(&[&[255, 180], &[180, 255]]);
    let out = quantize_floyd_steinberg(&img, &Palette::CANDLE);
    assert_eq!(out.indices, vec![0, 0, 0, 0]);
}

#[test]
fn rows_only_depend_on_rows_above() {
    let p = Palette::CANDLE;
    let full = gray_raster(&[&[180, 140, 100], &[150, 100, 150], &[90, 200, 60]]);
    let top = gray_raster(&[&[180, 140, 100], &[150, 100, 150]]);

    let a = quantize_floyd_steinberg(&full, &p);
    let b = quantize_floyd_steinberg(&top, &p);
    assert_eq!(a.indices[..6], b.indices[..]);
    assert_eq!(a.indices.len(), 9);
}
