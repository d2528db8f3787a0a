pub use kurbo::{Point, Vec2};

/// Longest message (in characters) the renderer will lay out.
pub const MAX_MESSAGE_CHARS: usize = 100;

/// Fixed output width in pixels.
pub const CANVAS_WIDTH: u32 = 160;
/// Horizontal padding on each side and the top/bottom padding unit.
pub const PADDING: u32 = 8;
/// Vertical distance between consecutive baselines.
pub const LINE_HEIGHT: u32 = 14;
/// Font size used for both measuring and drawing.
pub const FONT_SIZE_PX: f32 = 12.0;
/// Gap between the text block and the top of the candle body.
pub const CANDLE_OFFSET: u32 = 3;
/// Candle body size in pixels.
pub const CANDLE_BODY_WIDTH: u32 = 5;
pub const CANDLE_BODY_HEIGHT: u32 = 10;
/// Extra height reserved below the text for the candle body and flame.
pub const CANDLE_ALLOWANCE: u32 = CANDLE_OFFSET + 13;

/// Number of frames in every animation.
pub const FRAME_COUNT: u32 = 8;
/// Per-frame delay in hundredths of a second.
pub const FRAME_DELAY_CS: u16 = 8;
/// GIF loop count; zero loops forever.
pub const LOOP_FOREVER: u16 = 0;

/// Content type the transport layer should serve generated bytes with.
pub const GIF_CONTENT_TYPE: &str = "image/gif";
/// Output is a pure function of the message, so it can be cached indefinitely.
pub const CACHE_CONTROL: &str = "public, max-age=31536000";

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }
}

/// Straight (opaque) RGB8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Semantic meaning bound to each palette slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum PaletteRole {
    Background = 0,
    CandleBody = 1,
    OuterFlame = 2,
    InnerFlame = 3,
    TextInk = 4,
}

impl PaletteRole {
    pub const ALL: [PaletteRole; 5] = [
        PaletteRole::Background,
        PaletteRole::CandleBody,
        PaletteRole::OuterFlame,
        PaletteRole::InnerFlame,
        PaletteRole::TextInk,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// The fixed five-color palette. Slot order matches [`PaletteRole`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    colors: [Rgb8; 5],
}

impl Palette {
    pub const LEN: usize = 5;

    pub const CANDLE: Palette = Palette {
        colors: [
            Rgb8::new(255, 255, 255),
            Rgb8::new(255, 215, 0),
            Rgb8::new(255, 140, 0),
            Rgb8::new(255, 255, 0),
            Rgb8::new(0x33, 0x33, 0x33),
        ],
    };

    pub fn color(&self, role: PaletteRole) -> Rgb8 {
        self.colors[role as usize]
    }

    pub fn colors(&self) -> &[Rgb8; 5] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        Self::LEN
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Flattened `r, g, b` triples in slot order.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.colors.iter().flat_map(|c| c.to_array()).collect()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::CANDLE
    }
}

/// A message to render. The text is clamped to [`MAX_MESSAGE_CHARS`] on construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "CandleRepr")]
pub struct Candle {
    message: String,
}

#[derive(serde::Deserialize)]
struct CandleRepr {
    message: String,
}

impl From<CandleRepr> for Candle {
    fn from(repr: CandleRepr) -> Self {
        Candle::new(repr.message)
    }
}

impl Candle {
    pub fn new(message: impl Into<String>) -> Self {
        let mut message = message.into();
        let keep = clamp_message(&message).len();
        message.truncate(keep);
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Return the first [`MAX_MESSAGE_CHARS`] characters of `message`.
pub fn clamp_message(message: &str) -> &str {
    match message.char_indices().nth(MAX_MESSAGE_CHARS) {
        Some((byte_idx, _)) => &message[..byte_idx],
        None => message,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
