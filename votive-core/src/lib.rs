//! Votive renders a short message as a flickering candle, delivered as a small looping GIF.
//!
//! # Pipeline overview
//!
//! 1. **Layout**: `Candle -> MessageLayout` (clamp to 100 characters, greedy word wrap to a
//!    160 px canvas, derive the canvas height)
//! 2. **Animate**: `FrameIndex -> Vec2` flicker offset for each of the 8 frames
//! 3. **Render**: `CandleScene + offset -> RgbImage` (text, candle body, two flame lobes)
//! 4. **Quantize**: `RgbImage -> IndexedFrame` via Floyd–Steinberg onto the 5-color palette
//! 5. **Encode**: `Animation -> Vec<u8>` GIF89a with restore-to-background disposal and infinite
//!    looping
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical message and font yield byte-identical output.
//! - **No IO during generation**: fonts are loaded up front into a [`GlyphSource`] that is shared
//!   read-only between concurrent calls.
//! - **No storage**: the core takes a [`Candle`] by reference and returns bytes; persistence and
//!   transport belong to the caller.
#![forbid(unsafe_code)]

mod animation;
mod assets;
mod encode;
mod foundation;
mod layout;
mod pipeline;
mod render;

pub use animation::flame::{FlameLobe, INNER_LOBE, OUTER_LOBE, flicker_offset};
pub use assets::font::{GlyphSource, InkMask, ParleyFont};
pub use encode::assemble::{Animation, encode_gif};
pub use foundation::core::{
    CACHE_CONTROL, CANDLE_ALLOWANCE, CANDLE_BODY_HEIGHT, CANDLE_BODY_WIDTH, CANDLE_OFFSET,
    CANVAS_WIDTH, Candle, Canvas, FONT_SIZE_PX, FRAME_COUNT, FRAME_DELAY_CS, FrameIndex,
    GIF_CONTENT_TYPE, LINE_HEIGHT, LOOP_FOREVER, MAX_MESSAGE_CHARS, PADDING, Palette, PaletteRole,
    Point, Rgb8, Vec2, clamp_message,
};
pub use foundation::error::{VotiveError, VotiveResult};
pub use layout::wrap::{MAX_LINE_WIDTH_PX, MessageLayout, TextLine, layout_message, wrap_words};
pub use pipeline::generate::{
    GenerateOpts, generate_candle_gif, generate_candle_gif_with_opts, prepare_scene,
    render_animation, render_preview_frame,
};
pub use render::dither::{IndexedFrame, nearest_index, quantize_floyd_steinberg};
pub use render::frame::{CandleScene, render_frame, render_frame_at};
