use crate::{
    assets::font::GlyphSource,
    foundation::core::{
        CANDLE_ALLOWANCE, CANDLE_BODY_WIDTH, CANDLE_OFFSET, CANVAS_WIDTH, Candle, Canvas,
        LINE_HEIGHT, PADDING, clamp_message,
    },
    foundation::error::{VotiveError, VotiveResult},
};

/// Widest a wrapped line may measure before the next word moves down.
pub const MAX_LINE_WIDTH_PX: f32 = (CANVAS_WIDTH - 2 * PADDING) as f32;

/// One wrapped line and the y coordinate of its baseline.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TextLine {
    pub text: String,
    pub baseline_y: u32,
}

/// Wrapped lines plus the canvas they need. Built once per generation call.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MessageLayout {
    pub lines: Vec<TextLine>,
    pub canvas: Canvas,
}

impl MessageLayout {
    /// Assign baselines to already-wrapped lines and size the canvas around them.
    pub fn from_lines(lines: Vec<String>) -> Self {
        let count = lines.len() as u32;
        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(idx, text)| TextLine {
                text,
                baseline_y: 2 * PADDING + idx as u32 * LINE_HEIGHT,
            })
            .collect();

        Self {
            lines,
            canvas: Canvas {
                width: CANVAS_WIDTH,
                height: 2 * PADDING + count * LINE_HEIGHT + CANDLE_ALLOWANCE,
            },
        }
    }

    /// Top-left corner of the candle body, directly below the text block.
    pub fn candle_origin(&self) -> (u32, u32) {
        let x = CANVAS_WIDTH / 2 - CANDLE_BODY_WIDTH / 2;
        let y = PADDING + self.lines.len() as u32 * LINE_HEIGHT + CANDLE_OFFSET;
        (x, y)
    }

    /// Resting flame center, two pixels above the candle body.
    pub fn flame_center(&self) -> (i32, i32) {
        let (_, candle_y) = self.candle_origin();
        ((CANVAS_WIDTH / 2) as i32, candle_y as i32 - 2)
    }
}

/// Greedy whitespace word wrap.
///
/// A word that is wider than `max_width` on its own is emitted as its own line and never split.
pub fn wrap_words<F>(text: &str, max_width: f32, mut measure: F) -> VotiveResult<Vec<String>>
where
    F: FnMut(&str) -> VotiveResult<f32>,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if !current.is_empty() && measure(&candidate)? > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    Ok(lines)
}

/// Clamp, wrap and size a candle message with the given font.
#[tracing::instrument(skip(candle, font), fields(chars = candle.message().chars().count()))]
pub fn layout_message(candle: &Candle, font: &dyn GlyphSource) -> VotiveResult<MessageLayout> {
    let message = clamp_message(candle.message());
    let lines = wrap_words(message, MAX_LINE_WIDTH_PX, |s| {
        let w = font.measure(s);
        if w.is_finite() && w >= 0.0 {
            Ok(w)
        } else {
            Err(VotiveError::layout_unavailable(format!(
                "font measured {w} px for a {}-byte string",
                s.len()
            )))
        }
    })?;

    let layout = MessageLayout::from_lines(lines);
    tracing::debug!(
        lines = layout.lines.len(),
        height = layout.canvas.height,
        "laid out message"
    );
    Ok(layout)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
