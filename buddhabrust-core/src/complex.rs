use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// A complex number represented as two `f64` components.
///
/// This is a lightweight, `Copy` type optimized for the tight sampling loop.
/// We roll our own instead of using `num::Complex` to keep the dependency graph
/// minimal and retain full control over the arithmetic — in particular the
/// degenerate-input behavior of [`div`](Self::div), which the variant formulas
/// rely on.
///
/// Every operation here is total: division by a zero-magnitude divisor yields
/// zero, and the transcendental forms follow IEEE-754 semantics rather than
/// faulting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };
    pub const ONE: Self = Self { re: 1.0, im: 0.0 };
    pub const I: Self = Self { re: 0.0, im: 1.0 };

    #[inline]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Returns `re² + im²` without taking the square root.
    #[inline]
    pub fn norm_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Returns `√(re² + im²)`.
    #[inline]
    pub fn norm(self) -> f64 {
        self.norm_sq().sqrt()
    }

    /// The argument (phase angle), computed with `atan2` so it is defined in
    /// all four quadrants and returns `0.0` at the origin.
    #[inline]
    pub fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    /// `z²` via the expanded product, saving one multiply over `z * z`.
    #[inline]
    pub fn square(self) -> Self {
        Self {
            re: self.re * self.re - self.im * self.im,
            im: 2.0 * self.re * self.im,
        }
    }

    /// Complex division. A zero-magnitude divisor yields zero rather than
    /// NaN — the variant formulas divide by arbitrary orbit values and must
    /// never fault.
    #[inline]
    pub fn div(self, rhs: Self) -> Self {
        let denom = rhs.norm_sq();
        if denom == 0.0 {
            return Self::ZERO;
        }
        Self {
            re: (self.re * rhs.re + self.im * rhs.im) / denom,
            im: (self.im * rhs.re - self.re * rhs.im) / denom,
        }
    }

    /// Component-wise product: `(a.re·b.re, a.im·b.im)`.
    ///
    /// Not the complex product — the warp variants scale the real and
    /// imaginary parts independently.
    #[inline]
    pub fn mul_parts(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re,
            im: self.im * rhs.im,
        }
    }

    /// Real power: `|z|ⁿ ∠ (n·arg z)`.
    #[inline]
    pub fn powf(self, n: f64) -> Self {
        let r = self.norm().powf(n);
        let theta = self.arg() * n;
        Self {
            re: theta.cos() * r,
            im: theta.sin() * r,
        }
    }

    /// Exponential: `e^z = e^re · (cos im + i sin im)`.
    #[inline]
    pub fn exp(self) -> Self {
        let r = self.re.exp();
        Self {
            re: self.im.cos() * r,
            im: self.im.sin() * r,
        }
    }

    /// Principal natural logarithm: `ln|z| + i·arg z`.
    #[inline]
    pub fn ln(self) -> Self {
        Self {
            re: self.norm().ln(),
            im: self.arg(),
        }
    }

    /// Complex power: `z^w = e^(w·ln z)`.
    #[inline]
    pub fn powc(self, n: Self) -> Self {
        (self.ln() * n).exp()
    }

    /// Complex sine: `sin re·cosh im + i·cos re·sinh im`.
    #[inline]
    pub fn sin(self) -> Self {
        Self {
            re: self.re.sin() * self.im.cosh(),
            im: self.re.cos() * self.im.sinh(),
        }
    }

    /// Complex cosine: `cos re·cosh im − i·sin re·sinh im`.
    #[inline]
    pub fn cos(self) -> Self {
        Self {
            re: self.re.cos() * self.im.cosh(),
            im: -(self.re.sin() * self.im.sinh()),
        }
    }

    /// Complex tangent via the `tan`/`tanh` closed form.
    #[inline]
    pub fn tan(self) -> Self {
        let (t, th) = (self.re.tan(), self.im.tanh());
        let denom = 1.0 + t * t * th * th;
        Self {
            re: (t - t * th * th) / denom,
            im: (th + t * t * th) / denom,
        }
    }
}

// -- Arithmetic operators --

impl Add for Complex {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl AddAssign for Complex {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.re += rhs.re;
        self.im += rhs.im;
    }
}

impl Sub for Complex {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

impl SubAssign for Complex {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.re -= rhs.re;
        self.im -= rhs.im;
    }
}

/// The complex product.
impl Mul for Complex {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

impl MulAssign for Complex {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Neg for Complex {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

/// Scalar multiplication: `Complex * f64`.
impl Mul<f64> for Complex {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self {
            re: self.re * rhs,
            im: self.im * rhs,
        }
    }
}

/// Scalar division: `Complex / f64`.
impl Div<f64> for Complex {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self {
        Self {
            re: self.re / rhs,
            im: self.im / rhs,
        }
    }
}

impl std::fmt::Display for Complex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.im >= 0.0 {
            write!(f, "{} + {}i", self.re, self.im)
        } else {
            write!(f, "{} - {}i", self.re, -self.im)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn approx_c(a: Complex, b: Complex) -> bool {
        approx_eq(a.re, b.re) && approx_eq(a.im, b.im)
    }

    #[test]
    fn constants() {
        assert_eq!(Complex::ZERO, Complex::new(0.0, 0.0));
        assert_eq!(Complex::ONE, Complex::new(1.0, 0.0));
        assert_eq!(Complex::I, Complex::new(0.0, 1.0));
    }

    #[test]
    fn multiplication() {
        // (1 + 2i)(3 + 4i) = 3 + 4i + 6i + 8i² = -5 + 10i
        let c = Complex::new(1.0, 2.0) * Complex::new(3.0, 4.0);
        assert!(approx_c(c, Complex::new(-5.0, 10.0)));
    }

    #[test]
    fn square_matches_product() {
        let z = Complex::new(1.3, -0.7);
        assert!(approx_c(z.square(), z * z));
    }

    #[test]
    fn division_inverts_multiplication() {
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(3.0, -4.0);
        assert!(approx_c((a * b).div(b), a));
    }

    #[test]
    fn division_by_zero_yields_zero() {
        let a = Complex::new(5.0, -3.0);
        assert_eq!(a.div(Complex::ZERO), Complex::ZERO);
    }

    #[test]
    fn scalar_ops() {
        let a = Complex::new(2.0, 3.0);
        assert!(approx_c(a * 4.0, Complex::new(8.0, 12.0)));
        assert!(approx_c(a / 2.0, Complex::new(1.0, 1.5)));
    }

    #[test]
    fn component_wise_product() {
        let a = Complex::new(2.0, 3.0);
        let b = Complex::new(5.0, -1.0);
        assert_eq!(a.mul_parts(b), Complex::new(10.0, -3.0));
        // i ⊙ z keeps only the imaginary part.
        assert_eq!(Complex::I.mul_parts(a), Complex::new(0.0, 3.0));
    }

    #[test]
    fn arg_quadrants() {
        assert!(approx_eq(Complex::ONE.arg(), 0.0));
        assert!(approx_eq(Complex::I.arg(), std::f64::consts::FRAC_PI_2));
        assert!(approx_eq(Complex::new(-1.0, 0.0).arg(), std::f64::consts::PI));
        assert!(approx_eq(Complex::ZERO.arg(), 0.0));
    }

    #[test]
    fn powf_integer_exponent() {
        // (1 + i)⁴ = (2i)² = -4
        let z = Complex::new(1.0, 1.0);
        assert!(approx_c(z.powf(4.0), Complex::new(-4.0, 0.0)));
    }

    #[test]
    fn powf_of_zero_is_zero() {
        assert!(approx_c(Complex::ZERO.powf(8.0), Complex::ZERO));
    }

    #[test]
    fn exp_of_i_pi() {
        // e^(iπ) = -1
        let z = Complex::new(0.0, std::f64::consts::PI).exp();
        assert!(approx_c(z, Complex::new(-1.0, 0.0)));
    }

    #[test]
    fn ln_inverts_exp() {
        let z = Complex::new(0.4, 1.1);
        assert!(approx_c(z.exp().ln(), z));
    }

    #[test]
    fn powc_matches_powf_for_real_exponent() {
        let z = Complex::new(0.8, 0.3);
        let a = z.powc(Complex::new(3.0, 0.0));
        let b = z.powf(3.0);
        assert!((a.re - b.re).abs() < 1e-10 && (a.im - b.im).abs() < 1e-10);
    }

    #[test]
    fn trig_on_real_axis_matches_f64() {
        let z = Complex::new(0.7, 0.0);
        assert!(approx_c(z.sin(), Complex::new(0.7f64.sin(), 0.0)));
        assert!(approx_c(z.cos(), Complex::new(0.7f64.cos(), 0.0)));
        assert!(approx_c(z.tan(), Complex::new(0.7f64.tan(), 0.0)));
    }

    #[test]
    fn sin_sq_plus_cos_sq_is_one() {
        let z = Complex::new(0.3, -0.9);
        let s = z.sin().square();
        let c = z.cos().square();
        assert!(approx_c(s + c, Complex::ONE));
    }

    #[test]
    fn serde_round_trip() {
        let z = Complex::new(-0.75, 0.1);
        let json = serde_json::to_string(&z).unwrap();
        let back: Complex = serde_json::from_str(&json).unwrap();
        assert_eq!(z, back);
    }
}
