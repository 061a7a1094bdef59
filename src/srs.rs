//! Structured Reference String (KZG parameters)
//!
//! `KzgParams` bundles everything the KZG layer reads:
//!
//! ```text
//!   srs_g1     = [τ^0]G1, [τ^1]G1, …, [τ^d]G1        (d + 1 points, d = depth)
//!   srs_g2     = [1]G2, [τ]G2, [τ^2]G2
//!   domain     = ω^0, …, ω^{d-1}                     (order-d subgroup)
//!   inv_domain = (1 - ω^i)^{-1}                       (slot 0 unused, stored as 0)
//!   aux        = [L_i(τ)]G1,  L_i(τ) = (τ^d - 1)/d · ω^i/(τ - ω^i)
//! ```
//!
//! `aux` lets evaluation-form vectors be committed with one MSM and no IFFT.
//! τ itself is dropped as soon as `setup` returns.
//!
//! Parameters are immutable after construction and shared read-only.

#![forbid(unsafe_code)]

use ark_bn254::{G1Projective, G2Projective};
use ark_ec::{AffineRepr, CurveGroup, Group, VariableBaseMSM};
use ark_ff::{batch_inversion, Field, One, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rayon::prelude::*;
use tracing::instrument;

use crate::{
    domain::{pow_u64, Domain},
    error::Error,
    kzg::pairing_check,
    F, G1, G2,
};

/// Public KZG parameters over the order-`depth` subgroup.
#[derive(Clone, Debug, CanonicalSerialize, CanonicalDeserialize)]
pub struct KzgParams {
    /// `[τ^i]G1` for `i = 0..=depth`.
    pub srs_g1: Vec<G1>,
    /// `[1]G2, [τ]G2, [τ^2]G2`.
    pub srs_g2: Vec<G2>,
    /// Subgroup elements `ω^i`.
    pub domain: Vec<F>,
    /// `(1 - ω^i)^{-1}`; index 0 is never read and holds zero.
    pub inv_domain: Vec<F>,
    /// Lagrange bases `[L_i(τ)]G1`.
    pub aux: Vec<G1>,
    /// Domain size (power of two).
    pub depth: usize,
}

impl KzgParams {
    /// Run the trusted setup for toxic waste `tau`.
    #[instrument(skip_all, fields(depth = depth), level = "debug")]
    pub fn setup(tau: F, depth: usize) -> crate::Result<Self> {
        let d = Domain::new(depth)?;
        if d.evaluate_vanishing(tau).is_zero() {
            return Err(Error::ZeroDivisor("tau lies in the evaluation domain"));
        }
        let domain = d.elements();

        let mut powers = Vec::with_capacity(depth + 1);
        let mut acc = F::one();
        for _ in 0..=depth {
            powers.push(acc);
            acc *= tau;
        }
        let g1 = G1Projective::generator();
        let srs_g1 = G1Projective::normalize_batch(
            &powers.par_iter().map(|p| g1 * p).collect::<Vec<_>>(),
        );
        let g2 = G2Projective::generator();
        let srs_g2 = G2Projective::normalize_batch(&[g2, g2 * powers[1], g2 * powers[2]]);

        // L_i(τ) = (τ^d - 1)/d · ω^i / (τ - ω^i)
        let a_div_d = d.evaluate_vanishing(tau)
            * F::from(depth as u64)
                .inverse()
                .ok_or(Error::ZeroDivisor("domain size"))?;
        let mut denoms: Vec<F> = domain.iter().map(|w| tau - w).collect();
        batch_inversion(&mut denoms);
        let lagrange_at_tau: Vec<F> = domain
            .iter()
            .zip(&denoms)
            .map(|(w, inv)| a_div_d * w * inv)
            .collect();
        let aux = G1Projective::normalize_batch(
            &lagrange_at_tau.par_iter().map(|l| g1 * l).collect::<Vec<_>>(),
        );

        let inv_domain = inverse_complements(&domain);
        tracing::debug!(depth, "kzg trusted setup complete");
        Ok(Self { srs_g1, srs_g2, domain, inv_domain, aux, depth })
    }

    /// Deterministic parameters for tests and local tooling.
    #[cfg(feature = "dev-srs")]
    pub fn dev(depth: usize) -> crate::Result<Self> {
        use ark_ff::UniformRand;
        use rand::{rngs::StdRng, SeedableRng};

        let mut rng = StdRng::from_seed([42u8; 32]);
        Self::setup(F::rand(&mut rng), depth)
    }

    /// Assemble parameters from externally imported group elements and check
    /// them with [`KzgParams::validate`].
    pub fn from_parts(srs_g1: Vec<G1>, srs_g2: Vec<G2>, aux: Vec<G1>, depth: usize) -> crate::Result<Self> {
        let domain = Domain::new(depth)?.elements();
        let inv_domain = inverse_complements(&domain);
        let params = Self { srs_g1, srs_g2, domain, inv_domain, aux, depth };
        params.validate()?;
        Ok(params)
    }

    /// Structural and pairing-consistency checks.
    ///
    /// Besides shapes this pins the SRS degree: `srs_g1` must hold exactly
    /// `depth + 1` powers and its top power must be consistent with `[τ]G2`.
    /// The unity argument's degree check relies on there being no higher
    /// committable power.
    pub fn validate(&self) -> crate::Result<()> {
        let n = self.depth;
        if !n.is_power_of_two() {
            return Err(Error::NotPowerOfTwo { len: n });
        }
        if self.srs_g1.len() != n + 1 {
            return Err(Error::MalformedParams("srs_g1 must hold exactly depth + 1 powers"));
        }
        if self.srs_g2.len() != 3 {
            return Err(Error::MalformedParams("srs_g2 must hold exactly 3 powers"));
        }
        if self.aux.len() != n || self.domain.len() != n || self.inv_domain.len() != n {
            return Err(Error::MalformedParams("domain tables must hold depth entries"));
        }
        let g1 = G1::generator();
        let g2 = G2::generator();
        if self.srs_g1[0] != g1 || self.srs_g2[0] != g2 {
            return Err(Error::MalformedParams("SRS must start at the generators"));
        }
        let g2p = g2.into_group();
        let consistent = pairing_check(&[
            (self.srs_g1[1].into_group(), g2p),
            (-g1.into_group(), self.srs_g2[1].into_group()),
        ]) && pairing_check(&[
            (self.srs_g1[1].into_group(), self.srs_g2[1].into_group()),
            (-g1.into_group(), self.srs_g2[2].into_group()),
        ]) && pairing_check(&[
            (self.srs_g1[n].into_group(), g2p),
            (-self.srs_g1[n - 1].into_group(), self.srs_g2[1].into_group()),
        ]);
        if !consistent {
            return Err(Error::MalformedParams("SRS powers are not consistent with [τ]G2"));
        }

        // Σ L_i(τ) = 1 and Σ ω^i L_i(τ) = τ.
        let ones = vec![F::one(); n];
        let sum = G1Projective::msm(&self.aux, &ones)
            .map_err(|_| Error::MalformedParams("aux length"))?;
        let x_at_tau = G1Projective::msm(&self.aux, &self.domain)
            .map_err(|_| Error::MalformedParams("aux length"))?;
        if sum != g1.into_group() || x_at_tau != self.srs_g1[1].into_group() {
            return Err(Error::MalformedParams("aux is not the Lagrange basis of the SRS"));
        }
        Ok(())
    }

    /// `ω^i` with the index reduced modulo the domain size.
    #[inline]
    pub fn domain_at(&self, i: usize) -> F {
        self.domain[i % self.depth]
    }

    /// `ω` itself.
    pub fn generator(&self) -> F {
        if self.depth > 1 {
            self.domain[1]
        } else {
            F::one()
        }
    }

    /// `τ^k·G1` basis of the highest committable degree.
    pub fn top_power(&self) -> G1 {
        self.srs_g1[self.depth]
    }

    /// `ω^{-i}`.
    #[inline]
    pub fn domain_inverse_at(&self, i: usize) -> F {
        self.domain[(self.depth - i % self.depth) % self.depth]
    }

    /// Check `x ∉ H` cheaply via `x^d != 1`.
    pub fn outside_domain(&self, x: F) -> bool {
        pow_u64(x, self.depth as u64) != F::one()
    }
}

/// `(1 - ω^i)^{-1}` for `i ≥ 1`, zero at `i = 0`.
fn inverse_complements(domain: &[F]) -> Vec<F> {
    let mut out: Vec<F> = domain.iter().map(|w| F::one() - w).collect();
    // Slot 0 is 1 - 1 = 0; batch_inversion leaves zeros untouched.
    batch_inversion(&mut out);
    out
}
