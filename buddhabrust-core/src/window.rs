use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;

/// Base export resolution. The export grid is this, times the export scale.
pub const BASE_EXPORT_WIDTH: u32 = 1920;
pub const BASE_EXPORT_HEIGHT: u32 = 1080;

/// Affine remap of `value` from `[in_start, in_end]` onto `[out_start, out_end]`.
///
/// A degenerate input range (zero span) returns the input unchanged rather
/// than producing NaN; callers are expected to prevent zero-size windows, this
/// is only a guard.
#[inline]
pub fn remap(value: f64, in_start: f64, in_end: f64, out_start: f64, out_end: f64) -> f64 {
    if in_end == in_start {
        return value;
    }
    (value - in_start) / (in_end - in_start) * (out_end - out_start) + out_start
}

/// The display resolution, used only to fix the aspect ratio of the view
/// window. The export grid has its own, independent resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidScreenSize { width, height });
        }
        Ok(Self { width, height })
    }
}

/// Pan/zoom state of the view, owned by the display collaborator.
///
/// `offset` pans in complex-plane units, `scale` is the log₂ of the
/// magnification, `export_scale` multiplies the base 1920×1080 export grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewParams {
    pub offset: Complex,
    pub scale: f64,
    pub export_scale: f64,
}

impl ViewParams {
    pub const MIN_EXPORT_SCALE: f64 = 0.5;
    pub const MAX_EXPORT_SCALE: f64 = 5.7;

    pub fn new(offset: Complex, scale: f64, export_scale: f64) -> crate::Result<Self> {
        if !offset.re.is_finite() || !offset.im.is_finite() {
            return Err(CoreError::InvalidViewParams {
                reason: format!("offset must be finite, got {offset}"),
            });
        }
        if !scale.is_finite() {
            return Err(CoreError::InvalidViewParams {
                reason: format!("scale must be finite, got {scale}"),
            });
        }
        if !(Self::MIN_EXPORT_SCALE..=Self::MAX_EXPORT_SCALE).contains(&export_scale) {
            return Err(CoreError::InvalidViewParams {
                reason: format!(
                    "export scale must be in [{}, {}], got {export_scale}",
                    Self::MIN_EXPORT_SCALE,
                    Self::MAX_EXPORT_SCALE
                ),
            });
        }
        Ok(Self {
            offset,
            scale,
            export_scale,
        })
    }

    /// The export grid resolution these parameters select.
    pub fn export_size(&self) -> ExportSize {
        ExportSize::from_scale(self.export_scale)
    }
}

impl Default for ViewParams {
    /// The view the application opens with: unpanned, unzoomed, 4× export.
    fn default() -> Self {
        Self {
            offset: Complex::ZERO,
            scale: 0.0,
            export_scale: 4.0,
        }
    }
}

/// Integer pixel dimensions of the export grid (histogram and output image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSize {
    pub width: u32,
    pub height: u32,
}

impl ExportSize {
    pub fn from_scale(export_scale: f64) -> Self {
        Self {
            width: (BASE_EXPORT_WIDTH as f64 * export_scale) as u32,
            height: (BASE_EXPORT_HEIGHT as f64 * export_scale) as u32,
        }
    }

    /// Number of cells in the grid.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Half-open containment test for fractional pixel coordinates.
    #[inline]
    pub fn contains(&self, px: f64, py: f64) -> bool {
        0.0 <= px && px < self.width as f64 && 0.0 <= py && py < self.height as f64
    }

    /// Row-major cell index. Row 0 holds the window's minimum imaginary bound.
    #[inline]
    pub fn index(&self, px: u32, py: u32) -> usize {
        py as usize * self.width as usize + px as usize
    }
}

/// The rectangular region of the complex plane mapped onto the output grid.
///
/// Recomputed from pan/zoom only while sampling is stopped; workers read it
/// without locking for the whole session, so it must never change while
/// sampling is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewWindow {
    pub min: Complex,
    pub max: Complex,
}

impl ViewWindow {
    /// Compute the window corners from pan/zoom state.
    ///
    /// The screen height alone fixes the units-per-pixel so the aspect ratio
    /// follows the display; panning is applied in zoomed units.
    pub fn from_view(view: &ViewParams, screen: ScreenSize) -> Self {
        let (sw, sh) = (screen.width as f64, screen.height as f64);
        let pow_scale = 2f64.powf(view.scale);
        let half_span = pow_scale * 0.5 * sh;
        let pan = view.offset / pow_scale;
        Self {
            min: Complex::new(-0.5 * sw / half_span + pan.re, -0.5 * sh / half_span + pan.im),
            max: Complex::new(0.5 * sw / half_span + pan.re, 0.5 * sh / half_span + pan.im),
        }
    }

    /// Half-open containment test: `min <= p < max` on both axes.
    #[inline]
    pub fn contains(&self, p: Complex) -> bool {
        self.min.re <= p.re && p.re < self.max.re && self.min.im <= p.im && p.im < self.max.im
    }

    /// Map screen-space coordinates (in `[0, screen)`) to a plane point.
    #[inline]
    pub fn to_complex(&self, px: f64, py: f64, screen: ScreenSize) -> Complex {
        Complex::new(
            remap(px, 0.0, screen.width as f64, self.min.re, self.max.re),
            remap(py, 0.0, screen.height as f64, self.min.im, self.max.im),
        )
    }

    /// Map a plane point to fractional export-grid coordinates.
    ///
    /// `origin` is a small per-variant translation added to both ends of the
    /// output range, so the grid alignment it produces is stable across zoom
    /// levels.
    #[inline]
    pub fn to_pixel(&self, p: Complex, export: ExportSize, origin: Complex) -> (f64, f64) {
        (
            remap(
                p.re,
                self.min.re,
                self.max.re,
                origin.re,
                export.width as f64 + origin.re,
            ),
            remap(
                p.im,
                self.min.im,
                self.max.im,
                origin.im,
                export.height as f64 + origin.im,
            ),
        )
    }
}
