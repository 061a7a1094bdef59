//! Polynomial Engine
//!
//! Dense univariate polynomials over `F` in two **tagged** representations:
//! - [`Coefficients`]: monomial coefficients, index = degree, low→high.
//!   Length is not canonical; trailing zeros are allowed everywhere.
//! - [`Evaluations`]: values over the subgroup of order `len()` in domain
//!   order (`ω^0, ω^1, …`). Always power-of-two length.
//!
//! The two convert through the radix-2 transforms in [`crate::domain`]. Keeping
//! them as distinct types stops a caller from committing an evaluation vector
//! against the monomial SRS (or vice versa) by accident.

#![forbid(unsafe_code)]

use std::ops::{Add, Deref, Sub};

use ark_ff::{Field, One, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::{
    domain,
    error::Error,
    F,
};

/// Monomial-basis polynomial, coefficients low→high.
#[derive(Clone, Debug, Default, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Coefficients(pub Vec<F>);

/// Evaluation-basis polynomial over the subgroup of order `len()`.
#[derive(Clone, Debug, Default, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Evaluations(pub Vec<F>);

impl Deref for Coefficients {
    type Target = [F];
    fn deref(&self) -> &[F] {
        &self.0
    }
}

impl Deref for Evaluations {
    type Target = [F];
    fn deref(&self) -> &[F] {
        &self.0
    }
}

impl From<Vec<F>> for Coefficients {
    fn from(v: Vec<F>) -> Self {
        Self(v)
    }
}

impl From<Vec<F>> for Evaluations {
    fn from(v: Vec<F>) -> Self {
        Self(v)
    }
}

impl Evaluations {
    /// Inverse transform to coefficients. Length must be a power of two.
    pub fn to_coefficients(&self) -> crate::Result<Coefficients> {
        domain::ifft(&self.0).map(Coefficients)
    }
}

impl Coefficients {
    /// The zero polynomial (empty coefficient vector).
    pub fn zero() -> Self {
        Self(Vec::new())
    }

    /// Constant polynomial `c`.
    pub fn constant(c: F) -> Self {
        Self(vec![c])
    }

    /// Forward transform to evaluations. Length must be a power of two;
    /// callers zero-pad otherwise.
    pub fn to_evaluations(&self) -> crate::Result<Evaluations> {
        domain::fft(&self.0).map(Evaluations)
    }

    /// Zero-pad to `len` coefficients (never truncates).
    pub fn padded(&self, len: usize) -> Self {
        let mut v = self.0.clone();
        if v.len() < len {
            v.resize(len, F::zero());
        }
        Self(v)
    }

    /// Drop trailing zero coefficients.
    pub fn trim(mut self) -> Self {
        while self.0.last().map_or(false, |c| c.is_zero()) {
            self.0.pop();
        }
        self
    }

    /// Horner evaluation at `x`.
    pub fn evaluate(&self, x: F) -> F {
        self.0.iter().rev().fold(F::zero(), |acc, c| acc * x + c)
    }

    /// Degree after skipping leading zero coefficients; `0` for the zero
    /// polynomial and for constants.
    pub fn degree(&self) -> usize {
        self.0.iter().rposition(|c| !c.is_zero()).unwrap_or(0)
    }

    /// `c · f(X)`.
    pub fn scale(&self, c: F) -> Self {
        Self(self.0.iter().map(|a| *a * c).collect())
    }

    /// `f(c · X)`: coefficient `i` is multiplied by `c^i`.
    pub fn compose_scaled(&self, c: F) -> Self {
        let mut pow = F::one();
        let mut out = Vec::with_capacity(self.0.len());
        for a in &self.0 {
            out.push(*a * pow);
            pow *= c;
        }
        Self(out)
    }

    /// `X^k · f(X)`.
    pub fn mul_by_monomial(&self, k: usize) -> Self {
        if self.0.is_empty() {
            return Self::zero();
        }
        let mut out = vec![F::zero(); k];
        out.extend_from_slice(&self.0);
        Self(out)
    }

    /// `f(X) · (c1·X + c0)` in `O(len)`.
    fn mul_linear(&self, c0: F, c1: F) -> Self {
        let mut out = vec![F::zero(); self.0.len() + 1];
        for (i, a) in self.0.iter().enumerate() {
            out[i] += *a * c0;
            out[i + 1] += *a * c1;
        }
        Self(out)
    }

    /// Product via the smallest power-of-two domain holding `degA + degB + 1`
    /// points, truncated to exactly that many coefficients.
    pub fn mul(&self, other: &Self) -> crate::Result<Self> {
        if self.0.is_empty() || other.0.is_empty() {
            return Ok(Self::zero());
        }
        let prod_len = self.0.len() + other.0.len() - 1;
        let size = prod_len.next_power_of_two();
        let a = self.padded(size).to_evaluations()?;
        let b = other.padded(size).to_evaluations()?;
        let pointwise: Vec<F> = a.iter().zip(b.iter()).map(|(x, y)| *x * y).collect();
        let mut coeffs = Evaluations(pointwise).to_coefficients()?.0;
        coeffs.truncate(prod_len);
        Ok(Self(coeffs))
    }

    /// Exact division by `X^n - 1`.
    ///
    /// The divisor must divide `self`; the remainder is neither computed nor
    /// checked.
    pub fn div_by_vanishing(&self, n: usize) -> crate::Result<Self> {
        self.div_by_shifted_vanishing(n, F::one())
    }

    /// Exact division by `X^n - c` (coset vanishing polynomial).
    pub fn div_by_shifted_vanishing(&self, n: usize, c: F) -> crate::Result<Self> {
        if n == 0 {
            return Err(Error::ZeroDivisor("vanishing polynomial of degree 0"));
        }
        if self.0.len() <= n {
            return Ok(Self::zero());
        }
        let q_len = self.0.len() - n;
        let mut r = self.0.clone();
        let mut q = vec![F::zero(); q_len];
        for i in (0..q_len).rev() {
            q[i] = r[i + n];
            r[i] += q[i] * c;
        }
        Ok(Self(q))
    }

    /// Synthetic division by `(X - point)`, discarding the remainder.
    pub fn div_by_single_root(&self, point: F) -> Self {
        if self.0.len() <= 1 {
            return Self::zero();
        }
        let q_len = self.0.len() - 1;
        let mut q = vec![F::zero(); q_len];
        let mut carry = F::zero();
        for i in (0..q_len).rev() {
            carry = self.0[i + 1] + carry * point;
            q[i] = carry;
        }
        Self(q)
    }

    /// `X^n - 1`.
    pub fn vanishing(n: usize) -> Self {
        let mut v = vec![F::zero(); n + 1];
        v[0] = -F::one();
        v[n] += F::one();
        Self(v)
    }

    /// `∏ (X - p_i)`.
    pub fn vanishing_at_points(points: &[F]) -> Self {
        points
            .iter()
            .fold(Self::constant(F::one()), |acc, p| acc.mul_linear(-*p, F::one()))
    }

    /// Degree-`< n` polynomial equal to 1 at `ω^i` and 0 on the rest of the
    /// order-`n` subgroup.
    pub fn lagrange_basis(n: usize, i: usize) -> crate::Result<Self> {
        if i >= n {
            return Err(Error::IndexOutOfRange { index: i, size: n });
        }
        let mut indicator = vec![F::zero(); n];
        indicator[i] = F::one();
        Evaluations(indicator).to_coefficients()
    }

    /// Lagrange polynomial of `points[i]` over an arbitrary point set.
    pub fn lagrange_polynomial(points: &[F], i: usize) -> crate::Result<Self> {
        if i >= points.len() {
            return Err(Error::IndexOutOfRange { index: i, size: points.len() });
        }
        let mut result = Self::constant(F::one());
        for (j, pj) in points.iter().enumerate() {
            if j == i {
                continue;
            }
            let m = (points[i] - pj)
                .inverse()
                .ok_or(Error::ZeroDivisor("interpolation points must be distinct"))?;
            result = result.mul_linear(-m * pj, m);
        }
        Ok(result)
    }

    /// Unique polynomial of degree `< xs.len()` through `(xs[i], ys[i])`.
    pub fn interpolate(xs: &[F], ys: &[F]) -> crate::Result<Self> {
        if xs.len() != ys.len() {
            return Err(Error::LengthMismatch { expected: xs.len(), got: ys.len() });
        }
        let mut result = Self::constant(F::zero());
        for (i, y) in ys.iter().enumerate() {
            let basis = Self::lagrange_polynomial(xs, i)?;
            result = &result + &basis.scale(*y);
        }
        Ok(result)
    }
}

impl<'a> Add<&'a Coefficients> for &'a Coefficients {
    type Output = Coefficients;

    fn add(self, rhs: &'a Coefficients) -> Coefficients {
        let (long, short) = if self.0.len() >= rhs.0.len() { (self, rhs) } else { (rhs, self) };
        let mut out = long.0.clone();
        for (o, s) in out.iter_mut().zip(short.0.iter()) {
            *o += s;
        }
        Coefficients(out)
    }
}

impl<'a> Sub<&'a Coefficients> for &'a Coefficients {
    type Output = Coefficients;

    fn sub(self, rhs: &'a Coefficients) -> Coefficients {
        let len = self.0.len().max(rhs.0.len());
        let mut out = self.0.clone();
        out.resize(len, F::zero());
        for (o, r) in out.iter_mut().zip(rhs.0.iter()) {
            *o -= r;
        }
        Coefficients(out)
    }
}
