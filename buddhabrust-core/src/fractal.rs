use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;

/// Parameters controlling escape-time iteration.
///
/// The cached `escape_radius_sq` field is automatically recomputed on
/// deserialization so stored presets always stay consistent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IterParams {
    /// Maximum number of steps before an orbit is abandoned as non-escaping.
    pub max_iterations: u32,

    /// Bailout radius — once `|z|` exceeds this, the orbit has escaped.
    /// Stored directly; the iteration loop compares against `escape_radius²`.
    pub escape_radius: f64,

    /// Cached `escape_radius * escape_radius`, precomputed to avoid
    /// redundant multiplication on every step.
    #[serde(skip)]
    escape_radius_sq: f64,
}

/// Helper for deserialization — recomputes the cached square on load.
impl<'de> Deserialize<'de> for IterParams {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            max_iterations: u32,
            escape_radius: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        Ok(Self {
            max_iterations: raw.max_iterations,
            escape_radius: raw.escape_radius,
            escape_radius_sq: raw.escape_radius * raw.escape_radius,
        })
    }
}

impl IterParams {
    pub const DEFAULT_MAX_ITERATIONS: u32 = 500;
    pub const DEFAULT_ESCAPE_RADIUS: f64 = 2.0;

    pub fn new(max_iterations: u32, escape_radius: f64) -> crate::Result<Self> {
        if max_iterations < 1 {
            return Err(CoreError::InvalidMaxIterations(max_iterations));
        }
        if escape_radius <= 0.0 || !escape_radius.is_finite() {
            return Err(CoreError::InvalidEscapeRadius(escape_radius));
        }
        Ok(Self {
            max_iterations,
            escape_radius,
            escape_radius_sq: escape_radius * escape_radius,
        })
    }

    /// Pre-computed squared escape radius for the inner loop.
    #[inline]
    pub fn escape_radius_sq(&self) -> f64 {
        self.escape_radius_sq
    }

    /// Update the escape radius and recompute the cached square.
    pub fn set_escape_radius(&mut self, r: f64) {
        self.escape_radius = r;
        self.escape_radius_sq = r * r;
    }

    /// Return a copy with a different `max_iterations` value.
    pub fn with_max_iterations(self, max_iterations: u32) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }
}

impl Default for IterParams {
    fn default() -> Self {
        Self {
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            escape_radius: Self::DEFAULT_ESCAPE_RADIUS,
            escape_radius_sq: Self::DEFAULT_ESCAPE_RADIUS * Self::DEFAULT_ESCAPE_RADIUS,
        }
    }
}

/// Mirror axis a variant's density image shares, exploited while plotting to
/// double (or quadruple) the hits per computed trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symmetry {
    /// No exploitable symmetry.
    None,
    /// Symmetric about the real axis: mirror the imaginary component.
    Vertical,
    /// Symmetric about the imaginary axis after the variant's fold:
    /// mirror the real component.
    Horizontal,
}

/// The closed set of fractal variants the engine can sample.
///
/// Each variant is one closed-form transform applied per escape-time step.
/// The selector is captured once per sampling session; it never changes
/// mid-orbit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FractalKind {
    Mandelbrot,
    BurningShip,
    CrescentMoon,
    NorthStar,
    BlackHole,
    TheOrb,
    LoversFractal,
}

/// `TheOrb` orbits converge too slowly for the escape test alone; its
/// trajectories are cut off at this step count.
const ORB_STEP_CUTOFF: u32 = 250;

impl FractalKind {
    pub const ALL: [Self; 7] = [
        Self::Mandelbrot,
        Self::BurningShip,
        Self::CrescentMoon,
        Self::NorthStar,
        Self::BlackHole,
        Self::TheOrb,
        Self::LoversFractal,
    ];

    /// Display name, as shown by the parameter UI.
    pub fn name(self) -> &'static str {
        match self {
            Self::Mandelbrot => "Mandelbrot Set",
            Self::BurningShip => "Burning Ship",
            Self::CrescentMoon => "Crescent Moon",
            Self::NorthStar => "North Star",
            Self::BlackHole => "Black Hole",
            Self::TheOrb => "The Orb",
            Self::LoversFractal => "Lovers' Fractal",
        }
    }

    /// The variant after this one, wrapping around. Used by the UI
    /// collaborator to cycle the selector.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Apply one escape-time step in place.
    ///
    /// `z_sq` is the running square of `z`, maintained here so the escape
    /// test costs no extra multiplies. Returns `false` when the orbit should
    /// stop: either it has escaped (`z_sq.re + z_sq.im >= escape_radius_sq`)
    /// or the variant's own cutoff hit. A stopped orbit leaves `z`/`z_sq`
    /// untouched.
    pub fn step(
        self,
        i: u32,
        z: &mut Complex,
        z_sq: &mut Complex,
        c: Complex,
        escape_radius_sq: f64,
        time: f64,
    ) -> bool {
        if z_sq.re + z_sq.im >= escape_radius_sq {
            return false;
        }

        let next = match self {
            Self::Mandelbrot => *z_sq + c,
            Self::BurningShip => {
                let c = c - Complex::new(0.25, 0.0);
                Complex::new(z.re.abs(), z.im.abs()).square() + c
            }
            Self::CrescentMoon => (*z + Complex::ONE).div(z.exp() + c / 0.47),
            Self::NorthStar => {
                let shifted = *z + ((c + Complex::new(0.0, -0.1)) / 0.65) * -Complex::I;
                Complex::ONE.div(shifted.powf(4.0))
            }
            Self::BlackHole => {
                let warp = Complex::new((time / 5.0).cos(), (time / 5.0).sin()) / 10.0;
                z.div(c) + Complex::I.mul_parts(c.mul_parts(warp).powf(8.0)) + z.div(warp) / 4.7
            }
            Self::TheOrb => {
                if i >= ORB_STEP_CUTOFF {
                    return false;
                }
                let c = Complex::new(c.re.abs(), c.im);
                let warp = Complex::new((time + c.re).cos(), (time + c.im).sin()) / 10.0;
                z.div(c) + Complex::I.mul_parts(c.powc(c.mul_parts(warp).powf(4.0)))
            }
            Self::LoversFractal => {
                let c = Complex::new(c.re.abs(), c.im) * 0.75 + Complex::new(0.125, 0.155);
                z_sq.div(-Complex::I + c.powc(*z)) + c
            }
        };

        *z = next;
        *z_sq = next.square();
        true
    }

    /// Grid translation applied to both ends of the plane→pixel remap, so
    /// the variant's density lines up with the directly rendered view.
    pub fn plot_offset(self) -> Complex {
        match self {
            Self::Mandelbrot | Self::BurningShip => Complex::new(0.25, 0.0),
            Self::NorthStar => Complex::new(0.0, -0.1),
            _ => Complex::ZERO,
        }
    }

    /// The mirror axis this variant's density shares. Kept as an explicit
    /// table — the symmetry is a property of the rendered image, not
    /// something the step formula exposes.
    pub fn symmetry(self) -> Symmetry {
        match self {
            Self::Mandelbrot => Symmetry::Vertical,
            Self::LoversFractal => Symmetry::Horizontal,
            _ => Symmetry::None,
        }
    }

    /// Map an orbit point onto the variant's mirrored half before plotting.
    ///
    /// Only `LoversFractal` folds: its transform bakes an offset and a
    /// reflection into `c`, which this undoes so the horizontal mirror in
    /// [`symmetry`](Self::symmetry) lands on the right cells. All other
    /// variants plot orbit points as-is.
    #[inline]
    pub fn fold_point(self, z: Complex) -> Complex {
        match self {
            Self::LoversFractal => {
                Complex::new((z.re - 0.125).abs(), -z.im) / 0.75 + Complex::new(0.0, 0.155)
            }
            _ => z,
        }
    }
}

impl std::fmt::Display for FractalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
