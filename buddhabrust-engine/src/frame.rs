use rayon::prelude::*;

use buddhabrust_core::ExportSize;

use crate::error::EngineError;

/// Per-channel multiplicative weights applied while materializing the
/// histogram, set by the UI collaborator. Values are nominally in `[0, 1]`;
/// anything larger simply saturates the channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorWeights {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl ColorWeights {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

impl Default for ColorWeights {
    /// The magenta tint the application ships with.
    fn default() -> Self {
        Self {
            r: 1.0,
            g: 0.2,
            b: 1.0,
        }
    }
}

/// An RGBA8 pixel buffer holding the last materialized density image.
///
/// Row-major, 4 bytes per pixel, row 0 corresponding to the view window's
/// minimum imaginary bound — the layout loads directly into an uncompressed
/// 8-bit-per-channel RGBA texture.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RenderFrame {
    /// Create a new buffer filled with black (opaque). Reports allocation
    /// exhaustion instead of aborting, like the histogram it shadows.
    pub fn new(size: ExportSize) -> crate::Result<Self> {
        let bytes = size.len().saturating_mul(4);
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(bytes)
            .map_err(|_| EngineError::Allocation { bytes })?;
        pixels.resize(bytes, 0);
        for chunk in pixels.chunks_exact_mut(4) {
            chunk[3] = 255;
        }
        Ok(Self {
            width: size.width,
            height: size.height,
            pixels,
        })
    }

    /// Rebuild every pixel from histogram counts.
    ///
    /// `channel = round(255 · count/max_count · weight)`, alpha fully opaque.
    /// The whole buffer is overwritten; nothing is blended with previous
    /// contents. A maximum of zero (no orbit has landed yet) produces a black
    /// frame instead of dividing by zero.
    pub fn materialize(&mut self, counts: &[u32], max_count: u32, color: ColorWeights) {
        debug_assert_eq!(counts.len() * 4, self.pixels.len());

        if max_count == 0 {
            for chunk in self.pixels.chunks_exact_mut(4) {
                chunk.copy_from_slice(&[0, 0, 0, 255]);
            }
            return;
        }

        let max = max_count as f64;
        self.pixels
            .par_chunks_exact_mut(4)
            .zip(counts.par_iter())
            .for_each(|(pixel, &count)| {
                let t = count as f64 / max;
                pixel[0] = (255.0 * t * color.r).round() as u8;
                pixel[1] = (255.0 * t * color.g).round() as u8;
                pixel[2] = (255.0 * t * color.b).round() as u8;
                pixel[3] = 255;
            });
    }
}
