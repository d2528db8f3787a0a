use std::{cell::RefCell, collections::HashMap, path::Path, sync::Arc};

use crate::foundation::{
    core::{FONT_SIZE_PX, Point},
    error::{VotiveError, VotiveResult},
};

/// Font capability consumed by layout and rendering.
///
/// Implementations are loaded once and then shared read-only across concurrent generation calls,
/// hence the `Send + Sync` bound. Both methods are pure: the same text always yields the same
/// width and the same coverage.
pub trait GlyphSource: Send + Sync {
    /// Advance width of `text` in pixels when set on a single line.
    fn measure(&self, text: &str) -> f32;

    /// Rasterize `text` with its first baseline starting at `baseline` (canvas space).
    fn draw(&self, text: &str, baseline: Point) -> InkMask;
}

/// Anti-aliased glyph coverage positioned on the canvas.
///
/// `coverage` is row-major, `width * height` bytes; `(x, y)` is the canvas position of the
/// top-left sample and may be negative.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InkMask {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<u8>,
}

impl InkMask {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.coverage.iter().all(|&a| a == 0)
    }

    /// Non-zero samples as `(canvas_x, canvas_y, coverage)`.
    pub fn ink_pixels(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        let w = self.width as usize;
        self.coverage
            .iter()
            .enumerate()
            .filter(|(_, a)| **a != 0)
            .map(move |(i, a)| {
                let col = (i % w) as i32;
                let row = (i / w) as i32;
                (self.x + col, self.y + row, *a)
            })
    }
}

/// Blank samples kept around the glyph box so anti-aliased edges are not clipped.
const MASK_MARGIN: u32 = 2;

/// Distinct fonts a single thread keeps registered before its cache is reset.
const MAX_CACHED_SHAPERS: usize = 8;

/// Parley contexts with one font already registered.
struct Shaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
}

impl Shaper {
    fn new(font_ctx: parley::FontContext) -> Self {
        Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    fn layout(&mut self, text: &str, family: &str, size_px: f32) -> parley::Layout<()> {
        let mut builder = self.layout_ctx.ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Borrowed(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

thread_local! {
    // Keyed by blob id.
    static SHAPERS: RefCell<HashMap<u64, Shaper>> = RefCell::new(HashMap::new());
}

/// [`GlyphSource`] backed by Parley shaping and `vello_cpu` glyph rasterization.
///
/// The font bytes are read once and shared by reference between the Parley blob and the
/// `vello_cpu` font handle. Each thread registers the font with Parley the first time it shapes
/// text and reuses that registration afterwards.
#[derive(Clone)]
pub struct ParleyFont {
    font_bytes: Arc<Vec<u8>>,
    blob: parley::fontique::Blob<u8>,
    family: String,
    size_px: f32,
    glyph_font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for ParleyFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyFont")
            .field("font_bytes_len", &self.font_bytes.len())
            .field("family", &self.family)
            .field("size_px", &self.size_px)
            .finish()
    }
}

impl ParleyFont {
    /// Read a TTF/OTF file at the fixed candle font size.
    pub fn load(path: impl AsRef<Path>) -> VotiveResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            VotiveError::layout_unavailable(format!("read font '{}': {e}", path.display()))
        })?;
        Self::from_bytes(bytes, FONT_SIZE_PX)
    }

    pub fn from_bytes(font_bytes: Vec<u8>, size_px: f32) -> VotiveResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(VotiveError::layout_unavailable(
                "font size_px must be finite and > 0",
            ));
        }

        let font_bytes = Arc::new(font_bytes);
        let blob = parley::fontique::Blob::new(font_bytes.clone());
        let mut font_ctx = parley::FontContext::default();
        let family = register_family(&mut font_ctx, &blob)?;

        let glyph_font =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::new(font_bytes.clone()), 0);

        // The validating registration is reused by this thread's first layout.
        cache_shaper(blob.id(), Shaper::new(font_ctx));

        Ok(Self {
            font_bytes,
            blob,
            family,
            size_px,
            glyph_font,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    fn layout(&self, text: &str) -> parley::Layout<()> {
        SHAPERS.with(|cell| {
            let mut shapers = cell.borrow_mut();
            let id = self.blob.id();
            if !shapers.contains_key(&id) && shapers.len() >= MAX_CACHED_SHAPERS {
                shapers.clear();
            }
            let shaper = shapers.entry(id).or_insert_with(|| {
                let mut font_ctx = parley::FontContext::default();
                font_ctx.collection.register_fonts(self.blob.clone(), None);
                Shaper::new(font_ctx)
            });
            shaper.layout(text, &self.family, self.size_px)
        })
    }
}

fn cache_shaper(id: u64, shaper: Shaper) {
    SHAPERS.with(|cell| {
        let mut shapers = cell.borrow_mut();
        if shapers.len() >= MAX_CACHED_SHAPERS {
            shapers.clear();
        }
        shapers.insert(id, shaper);
    });
}

#[cfg(test)]
fn cached_shaper_count() -> usize {
    SHAPERS.with(|cell| cell.borrow().len())
}

fn register_family(
    font_ctx: &mut parley::FontContext,
    blob: &parley::fontique::Blob<u8>,
) -> VotiveResult<String> {
    let families = font_ctx.collection.register_fonts(blob.clone(), None);
    let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
        VotiveError::layout_unavailable("no font families registered from font bytes")
    })?;

    let name = font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| VotiveError::layout_unavailable("registered font family has no name"))?;
    if name.trim().is_empty() {
        return Err(VotiveError::layout_unavailable(
            "registered font family has an empty name",
        ));
    }
    Ok(name.to_string())
}

fn max_line_advance(layout: &parley::Layout<()>) -> f32 {
    layout
        .lines()
        .map(|line| line.metrics().advance)
        .fold(0.0f32, f32::max)
}

fn total_line_height(layout: &parley::Layout<()>) -> f32 {
    layout
        .lines()
        .map(|line| {
            let m = line.metrics();
            m.ascent + m.descent + m.leading
        })
        .sum()
}

fn to_cpu_dim(px: f32) -> u16 {
    let px = px.ceil().max(0.0) as u32 + 2 * MASK_MARGIN;
    u16::try_from(px).unwrap_or(u16::MAX)
}

impl GlyphSource for ParleyFont {
    fn measure(&self, text: &str) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        max_line_advance(&self.layout(text))
    }

    fn draw(&self, text: &str, baseline: Point) -> InkMask {
        if text.trim().is_empty() {
            return InkMask::empty();
        }

        let layout = self.layout(text);
        let Some(first_baseline) = layout.lines().next().map(|l| l.metrics().baseline) else {
            return InkMask::empty();
        };

        let width = to_cpu_dim(max_line_advance(&layout));
        let height = to_cpu_dim(total_line_height(&layout));

        // Layout space has its origin at the top of the first line; snap that origin to the
        // pixel grid and carry the fractional part into the glyph transform.
        let top_left_x = baseline.x;
        let top_left_y = baseline.y - f64::from(first_baseline);
        let snap_x = top_left_x.floor();
        let snap_y = top_left_y.floor();
        let margin = f64::from(MASK_MARGIN);

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            margin + (top_left_x - snap_x),
            margin + (top_left_y - snap_y),
        )));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.glyph_font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);

        let coverage = pixmap
            .data_as_u8_slice()
            .chunks_exact(4)
            .map(|px| px[3])
            .collect();

        InkMask {
            x: snap_x as i32 - MASK_MARGIN as i32,
            y: snap_y as i32 - MASK_MARGIN as i32,
            width: u32::from(width),
            height: u32::from(height),
            coverage,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
