//! KZG commitments over the order-`depth` subgroup
//!
//! Commitments are a single MSM against the basis that matches the input's
//! representation:
//!
//! ```text
//!   Evaluations  -> aux     ([L_i(τ)]G1)    no IFFT needed
//!   Coefficients -> srs_g1  ([τ^i]G1)
//! ```
//!
//! Openings at a domain point `ω^k` never leave evaluation form. The quotient
//! `q(X) = (f(X) - f(ω^k)) / (X - ω^k)` is computed pointwise:
//!
//! ```text
//!   q_i = (f_i - f_k) · ω^{-i} · (1 - ω^{k-i})^{-1}        i != k
//!   q_k = -Σ_{i != k} q_i · ω^{i-k}
//! ```
//!
//! and committed against `aux`, so an opening costs `O(n)` field work plus one
//! MSM. Verification is one pairing-product check:
//!
//! ```text
//!   e(π, [τ]G2 - ω^k·G2) · e(-(C - v·G1), G2) == 1
//! ```

#![forbid(unsafe_code)]

use ark_bn254::{Bn254, G1Projective, G2Projective};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{One, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{
    error::Error,
    polynomial::{Coefficients, Evaluations},
    srs::KzgParams,
    F, G1,
};

/// PCS commitment newtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Commitment(pub G1);

impl Default for Commitment {
    fn default() -> Self {
        Self(G1::zero())
    }
}

impl From<G1Projective> for Commitment {
    fn from(p: G1Projective) -> Self {
        Self(p.into_affine())
    }
}

/// Which SRS basis a vector is committed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    /// Values over the domain; committed against `aux`.
    Evaluation,
    /// Monomial coefficients; committed against `srs_g1`.
    Coefficient,
}

/// A scalar vector that knows its own basis.
pub trait Committable {
    /// Basis the scalars are expressed in.
    const BASIS: Basis;

    /// Scalars to feed the MSM.
    fn scalars(&self) -> &[F];
}

impl Committable for Evaluations {
    const BASIS: Basis = Basis::Evaluation;

    fn scalars(&self) -> &[F] {
        &self.0
    }
}

impl Committable for Coefficients {
    const BASIS: Basis = Basis::Coefficient;

    fn scalars(&self) -> &[F] {
        &self.0
    }
}

/// Commit to `poly` with the basis its type implies.
///
/// Evaluation vectors must hold exactly `depth` entries. Coefficient vectors
/// may hold up to `depth + 1` and use a prefix of the monomial basis.
pub fn commit<P: Committable>(params: &KzgParams, poly: &P) -> crate::Result<Commitment> {
    let scalars = poly.scalars();
    let bases = match P::BASIS {
        Basis::Evaluation => {
            if scalars.len() != params.depth {
                return Err(Error::LengthMismatch { expected: params.depth, got: scalars.len() });
            }
            &params.aux[..]
        }
        Basis::Coefficient => &params.srs_g1[..],
    };
    if scalars.len() > bases.len() {
        return Err(Error::DegreeTooLarge { len: scalars.len(), max: bases.len() });
    }
    msm(&bases[..scalars.len()], scalars).map(Commitment::from)
}

/// Commit to an evaluation-form vector.
pub fn commit_evaluations(params: &KzgParams, evals: &Evaluations) -> crate::Result<Commitment> {
    commit(params, evals)
}

/// Commit to a coefficient-form polynomial.
pub fn commit_coefficients(params: &KzgParams, coeffs: &Coefficients) -> crate::Result<Commitment> {
    commit(params, coeffs)
}

pub(crate) fn msm(bases: &[G1], scalars: &[F]) -> crate::Result<G1Projective> {
    if scalars.is_empty() {
        return Ok(G1Projective::zero());
    }
    G1Projective::msm(bases, scalars)
        .map_err(|got| Error::LengthMismatch { expected: bases.len(), got })
}

/// Quotient `(f - f(ω^index)) / (X - ω^index)` in evaluation form.
#[instrument(skip_all, fields(index = index), level = "debug")]
pub fn calculate_quotient(params: &KzgParams, evals: &Evaluations, index: usize) -> crate::Result<Evaluations> {
    let n = params.depth;
    if evals.len() != n {
        return Err(Error::LengthMismatch { expected: n, got: evals.len() });
    }
    if index >= n {
        return Err(Error::IndexOutOfRange { index, size: n });
    }
    let fk = evals[index];

    let mut q: Vec<F> = (0..n)
        .into_par_iter()
        .map(|i| {
            if i == index {
                F::zero()
            } else {
                (evals[i] - fk) * params.domain[(n - i) % n] * params.inv_domain[(n + index - i) % n]
            }
        })
        .collect();

    let acc: F = (0..n)
        .into_par_iter()
        .filter(|&i| i != index)
        .map(|i| q[i] * params.domain[(n + i - index) % n])
        .sum();
    q[index] = -acc;

    Ok(Evaluations(q))
}

/// Opening proof for `evals` at `ω^index`.
pub fn open(params: &KzgParams, evals: &Evaluations, index: usize) -> crate::Result<G1> {
    let q = calculate_quotient(params, evals, index)?;
    Ok(commit_evaluations(params, &q)?.0)
}

/// Opening proof for a coefficient-form polynomial at `ω^index`.
///
/// Returns the claimed value alongside the proof.
pub fn open_coefficients(params: &KzgParams, coeffs: &Coefficients, index: usize) -> crate::Result<(F, G1)> {
    if coeffs.len() > params.depth {
        return Err(Error::DegreeTooLarge { len: coeffs.len(), max: params.depth });
    }
    let evals = coeffs.padded(params.depth).to_evaluations()?;
    let proof = open(params, &evals, index)?;
    Ok((evals[index], proof))
}

/// Check an opening at `ω^index`.
///
/// Shape errors (an index outside the domain) are reported as `Err`;
/// a proof that does not verify yields `Ok(false)`.
pub fn verify(params: &KzgParams, proof: &G1, commitment: &Commitment, index: usize, value: F) -> crate::Result<bool> {
    if index >= params.depth {
        return Err(Error::IndexOutOfRange { index, size: params.depth });
    }
    let g1 = params.srs_g1[0].into_group();
    let g2 = params.srs_g2[0].into_group();
    let shifted_tau = params.srs_g2[1].into_group() - g2 * params.domain[index];
    let ok = pairing_check(&[
        (proof.into_group(), shifted_tau),
        (-(commitment.0.into_group() - g1 * value), g2),
    ]);
    if !ok {
        debug!(index, "kzg opening rejected");
    }
    Ok(ok)
}

/// `∏ e(a_i, b_i) == 1`, evaluated as one multi-Miller loop.
pub fn pairing_check(pairs: &[(G1Projective, G2Projective)]) -> bool {
    if pairs.is_empty() {
        return true;
    }
    let (a, b): (Vec<G1Projective>, Vec<G2Projective>) = pairs.iter().copied().unzip();
    let a = G1Projective::normalize_batch(&a);
    let b = G2Projective::normalize_batch(&b);
    let mlo = <Bn254 as Pairing>::multi_miller_loop(a, b);
    match <Bn254 as Pairing>::final_exponentiation(mlo) {
        Some(fe) => fe.0.is_one(),
        None => false,
    }
}
