use crate::foundation::core::Rgb8;

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Source-over of an opaque `fg` with coverage `alpha` onto an opaque `bg`.
pub(crate) fn blend_coverage(bg: Rgb8, fg: Rgb8, alpha: u8) -> Rgb8 {
    let a = u16::from(alpha);
    let inv = 255 - a;
    let mix =
        |b: u8, f: u8| -> u8 { mul_div255_u8(u16::from(f), a) + mul_div255_u8(u16::from(b), inv) };
    Rgb8 {
        r: mix(bg.r, fg.r),
        g: mix(bg.g, fg.g),
        b: mix(bg.b, fg.b),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
