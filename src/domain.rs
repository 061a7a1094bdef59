//! Evaluation Domains & Radix-2 Transforms
//!
//! This module defines the multiplicative evaluation domain `H = shift * <ω>`
//! with vanishing polynomial `Z_H(X) = X^N - shift^N`, plus the in-place
//! **power-of-two radix-2 NTT/IFFT** every other component relies on.
//!
//! Conventions:
//! - `N` is always a power of two and `ω` is the canonical 2-adic root of
//!   unity of order `N` from `FftField::get_root_of_unity`, so `ω^{N/2} = -1`
//!   and element `i` of the plain domain is `ω^i`.
//! - `fft` maps coefficients (low→high) to evaluations in domain order;
//!   `ifft` is its inverse. Both operate on the subgroup, never the coset;
//!   coset callers rescale coefficients themselves.

#![forbid(unsafe_code)]

use ark_ff::{FftField, Field, One, Zero};

use crate::{
    error::{Error, Result},
    F,
};

/// Multiplicative evaluation domain, optionally shifted into a coset.
///
/// - `n`: domain size `N` (power of two).
/// - `omega`: primitive `N`-th root of unity.
/// - `shift`: coset offset `g`; elements are `g·ω^i` and `Z_H(X) = X^N - g^N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Domain {
    /// Domain size `N`.
    pub n: usize,
    /// Generator `ω` of the order-`N` subgroup.
    pub omega: F,
    /// Coset offset (`1` for the subgroup itself).
    pub shift: F,
}

impl Domain {
    /// The subgroup of order `n`.
    pub fn new(n: usize) -> Result<Self> {
        Self::new_with_coset(n, F::one())
    }

    /// The coset `shift * <ω>` of order `n`.
    pub fn new_with_coset(n: usize, shift: F) -> Result<Self> {
        if !n.is_power_of_two() {
            return Err(Error::NotPowerOfTwo { len: n });
        }
        if shift.is_zero() {
            return Err(Error::ZeroDivisor("coset shift must be non-zero"));
        }
        let omega = F::get_root_of_unity(n as u64).ok_or(Error::NotPowerOfTwo { len: n })?;
        let d = Self { n, omega, shift };
        debug_assert!(d.is_primitive());
        Ok(d)
    }

    /// Smallest subgroup holding at least `len` points.
    pub fn for_len(len: usize) -> Result<Self> {
        Self::new(len.max(1).next_power_of_two())
    }

    /// `shift · ω^i`.
    #[inline]
    pub fn element(&self, i: usize) -> F {
        self.shift * pow_u64(self.omega, (i % self.n) as u64)
    }

    /// All `N` elements in domain order.
    pub fn elements(&self) -> Vec<F> {
        let mut out = Vec::with_capacity(self.n);
        let mut acc = self.shift;
        for _ in 0..self.n {
            out.push(acc);
            acc *= self.omega;
        }
        out
    }

    /// Constant `c` in `Z_H(X) = X^N - c`.
    #[inline]
    pub fn vanishing_constant(&self) -> F {
        pow_u64(self.shift, self.n as u64)
    }

    /// `Z_H(x) = x^N - c`.
    #[inline]
    pub fn evaluate_vanishing(&self, x: F) -> F {
        pow_u64(x, self.n as u64) - self.vanishing_constant()
    }

    /// Check `ω^N == 1` and `ω^{N/2} != 1`. For `N = 2^k` the only prime
    /// factor is 2, so this is exactly primitivity.
    fn is_primitive(&self) -> bool {
        if !pow_u64(self.omega, self.n as u64).is_one() {
            return false;
        }
        self.n == 1 || !pow_u64(self.omega, (self.n / 2) as u64).is_one()
    }
}

/// Square-and-multiply exponentiation by a machine-word exponent.
#[inline]
pub fn pow_u64(mut base: F, mut exp: u64) -> F {
    let mut acc = F::one();
    while exp > 0 {
        if (exp & 1) == 1 {
            acc *= base;
        }
        base.square_in_place();
        exp >>= 1;
    }
    acc
}

// ------------------------- FFT / IFFT -------------------------

/// In-place iterative Cooley–Tukey radix-2 NTT (forward).
fn ntt_in_place(a: &mut [F], root: F) {
    let n = a.len();
    debug_assert!(n.is_power_of_two());

    // Bit-reversal permutation
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            a.swap(i, j);
        }
    }

    // Cooley–Tukey butterflies
    let mut len = 2;
    while len <= n {
        // w_len = root^{n/len}
        let w_len = pow_u64(root, (n / len) as u64);
        let half = len / 2;
        for chunk in a.chunks_mut(len) {
            let mut w = F::one();
            for i in 0..half {
                let u = chunk[i];
                let v = chunk[i + half] * w;
                chunk[i] = u + v;
                chunk[i + half] = u - v;
                w *= w_len;
            }
        }
        len <<= 1;
    }
}

/// In-place inverse NTT (radix-2).
fn intt_in_place(a: &mut [F], root: F) -> Result<()> {
    let inv_root = root.inverse().ok_or(Error::ZeroDivisor("root of unity"))?;
    // Running forward with inv_root equals inverse NTT
    ntt_in_place(a, inv_root);
    let inv_n = F::from(a.len() as u64)
        .inverse()
        .ok_or(Error::ZeroDivisor("transform length"))?;
    for x in a.iter_mut() {
        *x *= inv_n;
    }
    Ok(())
}

/// Forward transform: **coefficients → evaluations** over the subgroup of
/// order `values.len()`.
pub fn fft(values: &[F]) -> Result<Vec<F>> {
    let d = Domain::new(values.len())?;
    let mut a = values.to_vec();
    ntt_in_place(&mut a, d.omega);
    Ok(a)
}

/// Inverse transform: **evaluations → coefficients** over the subgroup of
/// order `values.len()`.
pub fn ifft(values: &[F]) -> Result<Vec<F>> {
    let d = Domain::new(values.len())?;
    let mut a = values.to_vec();
    intt_in_place(&mut a, d.omega)?;
    Ok(a)
}
