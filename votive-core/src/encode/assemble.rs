use std::borrow::Cow;

use crate::{
    foundation::core::{FRAME_COUNT, FRAME_DELAY_CS, LOOP_FOREVER, Palette},
    foundation::error::{VotiveError, VotiveResult},
    render::dither::IndexedFrame,
};

/// The eight quantized frames of one candle plus their shared timing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<IndexedFrame>,
    palette: Palette,
    delay_cs: u16,
    loop_count: u16,
}

impl Animation {
    /// Validate and assemble frames with the fixed delay and infinite looping.
    pub fn new(frames: Vec<IndexedFrame>, palette: Palette) -> VotiveResult<Self> {
        let anim = Self {
            frames,
            palette,
            delay_cs: FRAME_DELAY_CS,
            loop_count: LOOP_FOREVER,
        };
        anim.validate()?;
        Ok(anim)
    }

    pub fn frames(&self) -> &[IndexedFrame] {
        &self.frames
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn delay_cs(&self) -> u16 {
        self.delay_cs
    }

    /// GIF loop count; `0` loops forever.
    pub fn loop_count(&self) -> u16 {
        self.loop_count
    }

    /// Shared `(width, height)` of every frame.
    pub fn dimensions(&self) -> (u32, u32) {
        self.frames
            .first()
            .map(|f| (f.width, f.height))
            .unwrap_or((0, 0))
    }

    fn validate(&self) -> VotiveResult<()> {
        if self.frames.len() != FRAME_COUNT as usize {
            return Err(VotiveError::encode(format!(
                "animation needs exactly {FRAME_COUNT} frames, got {}",
                self.frames.len()
            )));
        }

        let (w, h) = self.dimensions();
        if w == 0 || h == 0 {
            return Err(VotiveError::encode("frame width/height must be non-zero"));
        }
        if w > u32::from(u16::MAX) || h > u32::from(u16::MAX) {
            return Err(VotiveError::encode(format!(
                "frame size {w}x{h} exceeds the GIF limit of 65535"
            )));
        }

        let palette_len = self.palette.len();
        for (i, frame) in self.frames.iter().enumerate() {
            if (frame.width, frame.height) != (w, h) {
                return Err(VotiveError::encode(format!(
                    "frame {i} is {}x{}, expected {w}x{h}",
                    frame.width, frame.height
                )));
            }
            if frame.indices.len() != w as usize * h as usize {
                return Err(VotiveError::encode(format!(
                    "frame {i} has {} indices for a {w}x{h} raster",
                    frame.indices.len()
                )));
            }
            if let Some(bad) = frame
                .indices
                .iter()
                .find(|&&idx| usize::from(idx) >= palette_len)
            {
                return Err(VotiveError::encode(format!(
                    "frame {i} references palette index {bad} (palette has {palette_len})"
                )));
            }
        }
        Ok(())
    }
}

/// Encode `anim` as a looping GIF89a.
///
/// The palette becomes the global color table (padded by the encoder to the 8-slot table size the
/// format requires). Every frame carries a graphic control extension with the shared delay and
/// restore-to-background disposal, so flame pixels never linger into the next frame.
pub fn encode_gif(anim: &Animation) -> VotiveResult<Vec<u8>> {
    anim.validate()?;
    let (w, h) = anim.dimensions();
    let (w, h) = (w as u16, h as u16);

    let global_palette = anim.palette.to_rgb_bytes();
    let mut encoder = gif::Encoder::new(Vec::new(), w, h, &global_palette)
        .map_err(|e| VotiveError::encode(format!("write gif header: {e}")))?;
    let repeat = match anim.loop_count {
        0 => gif::Repeat::Infinite,
        n => gif::Repeat::Finite(n),
    };
    encoder
        .set_repeat(repeat)
        .map_err(|e| VotiveError::encode(format!("write loop extension: {e}")))?;

    for (i, indexed) in anim.frames.iter().enumerate() {
        let frame = gif::Frame {
            width: w,
            height: h,
            delay: anim.delay_cs,
            dispose: gif::DisposalMethod::Background,
            buffer: Cow::Borrowed(indexed.indices.as_slice()),
            ..gif::Frame::default()
        };
        encoder
            .write_frame(&frame)
            .map_err(|e| VotiveError::encode(format!("write frame {i}: {e}")))?;
    }

    let bytes = encoder
        .into_inner()
        .map_err(|e| VotiveError::encode(format!("finish gif stream: {e}")))?;
    tracing::debug!(bytes = bytes.len(), width = w, height = h, "encoded gif");
    Ok(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/assemble.rs"]
mod tests;
