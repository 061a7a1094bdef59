//! Caulk unity argument
//!
//! Proves that a committed linear polynomial `z(X) = a·X + b` vanishes at some
//! `2^logN`-th root of unity without saying which one. Equivalently
//! `(a / -b)^{2^logN} = 1`, which the prover shows with a repeated-squaring
//! chain laid out over a small auxiliary domain `V` of size `m`
//! (`m` = next power of two `≥ logN + 6`, `σ` its generator):
//!
//! ```text
//!   slot        0      1       2   3   4 .. 4+logN        logN+5   rest
//!   f(σ^slot)   a-b    aσ-b    a   b   (a/b)^{2^k}        1        0
//! ```
//!
//! (`b` here is the negated constant coefficient.) `f` is blinded by
//! `r(X)·(X^m - 1)` with a random quadratic `r`. The constraint polynomial
//!
//! ```text
//!   p = (f - z)(ρ0 + ρ1)
//!     + ((1-σ)f - f(σ⁻²X) + f(σ⁻¹X)) ρ2
//!     + (f + f(σ⁻²X) - σ f(σ⁻¹X)) ρ3
//!     + (f f(σ⁻¹X) - f(σ⁻²X)) ρ4
//!     + (f - f(σ⁻¹X)^2) prod
//!     + (f(σ⁻¹X) - 1) ρ_{logN+5}
//! ```
//!
//! vanishes on `V`, so `p = ĥ·(X^m - 1)`. The prover commits `f` and
//! `h = ĥ + X^{d-1}·z` (the monomial term pins `h` to the top of the SRS),
//! derives `α` from both commitments, opens `f` at `α σ⁻¹`, `α σ⁻²` with one
//! witness and proves that the linearised `p_α` vanishes at `α`.

#![forbid(unsafe_code)]

use ark_ec::AffineRepr;
use ark_ff::{Field, One, UniformRand, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, RngCore};
use tracing::{debug, instrument};

use crate::{
    domain::{pow_u64, Domain},
    error::Error,
    kzg::{commit_coefficients, pairing_check, Commitment},
    opening::{single_opening, twice_opening, verify_twice_opening, TwiceOpening},
    polynomial::{Coefficients, Evaluations},
    srs::KzgParams,
    transcript::Transcript,
    F, G1, G2,
};

/// Precomputed tables for a `2^log_n` root-of-unity statement.
#[derive(Debug, Clone, CanonicalSerialize, CanonicalDeserialize)]
pub struct UnityParams {
    /// `logN`.
    pub log_n: usize,
    /// Auxiliary domain `V`.
    pub domain_vn: Vec<F>,
    /// Barycentric weights `1 / ∏_{j≠i} (v_i - v_j)`.
    pub domain_vn_scalars: Vec<F>,
    /// Lagrange basis of `V`, one polynomial per slot.
    pub rhos: Vec<Coefficients>,
    /// Vanishing polynomial of the slots outside `5..=logN+4`.
    pub prod: Coefficients,
}

impl UnityParams {
    /// Build the tables for statements over `2^log_n` roots of unity.
    #[instrument(skip_all, fields(log_n = log_n), level = "debug")]
    pub fn setup(log_n: usize) -> crate::Result<Self> {
        let m = (log_n + 6).next_power_of_two();
        let domain_vn = Domain::new(m)?.elements();

        let mut domain_vn_scalars = Vec::with_capacity(m);
        for (i, vi) in domain_vn.iter().enumerate() {
            let denom = domain_vn
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .fold(F::one(), |acc, (_, vj)| acc * (*vi - vj));
            domain_vn_scalars.push(denom.inverse().ok_or(Error::ZeroDivisor("auxiliary domain"))?);
        }

        let rhos = (0..m)
            .map(|i| Coefficients::lagrange_basis(m, i))
            .collect::<crate::Result<Vec<_>>>()?;

        let prod_points: Vec<F> = domain_vn
            .iter()
            .enumerate()
            .filter(|(i, _)| *i < 5 || *i > log_n + 4)
            .map(|(_, v)| *v)
            .collect();
        let prod = Coefficients::vanishing_at_points(&prod_points);

        Ok(Self { log_n, domain_vn, domain_vn_scalars, rhos, prod })
    }

    /// Size `m` of the auxiliary domain.
    pub fn size(&self) -> usize {
        self.domain_vn.len()
    }

    /// Generator `σ` of the auxiliary domain.
    pub fn sigma(&self) -> F {
        self.domain_vn[1]
    }

    /// `σ^{-1}` and `σ^{-2}`.
    fn inverse_shifts(&self) -> (F, F) {
        let m = self.size();
        (self.domain_vn[m - 1], self.domain_vn[m - 2])
    }

    /// Slot of the terminal `1` marker.
    fn terminal_slot(&self) -> usize {
        self.log_n + 5
    }
}

/// Commitments to `f` and `h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct UnityPhase1Proof {
    /// `[f]`.
    pub f1: Commitment,
    /// `[h]`.
    pub h1: Commitment,
}

/// Openings at the Fiat–Shamir point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct UnityPhase2Proof {
    /// `f(α σ⁻¹)`.
    pub v1: F,
    /// `f(α σ⁻²)`.
    pub v2: F,
    /// Combined witness for `v1`, `v2`.
    pub pi1: G1,
    /// Witness that `p_α(α) = 0`.
    pub pi2: G1,
}

/// Full unity argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct UnityProof {
    /// Round-one commitments.
    pub proof1: UnityPhase1Proof,
    /// Round-two openings.
    pub proof2: UnityPhase2Proof,
}

/// Split `z(X) = z0 + z1·X` into `(a, b) = (z1, -z0)`.
fn linear_coefficients(z: &Coefficients) -> crate::Result<(F, F)> {
    if z.len() != 2 {
        return Err(Error::LengthMismatch { expected: 2, got: z.len() });
    }
    let (a, b) = (z[1], -z[0]);
    if a.is_zero() || b.is_zero() {
        return Err(Error::ZeroDivisor("z(X) must have non-zero coefficients"));
    }
    Ok((a, b))
}

/// Blinded witness polynomial `f`.
pub fn calculate_f<R: RngCore + CryptoRng>(params: &UnityParams, z: &Coefficients, rng: &mut R) -> crate::Result<Coefficients> {
    let (a, b) = linear_coefficients(z)?;
    let m = params.size();
    let sigma = params.sigma();
    let ratio = a * b.inverse().ok_or(Error::ZeroDivisor("z(X) constant term"))?;

    let mut evals = vec![F::zero(); m];
    evals[0] = a - b;
    evals[1] = a * sigma - b;
    evals[2] = a;
    evals[3] = b;
    let mut acc = ratio;
    for slot in evals.iter_mut().skip(4).take(params.log_n + 1) {
        *slot = acc;
        acc.square_in_place();
    }
    evals[params.terminal_slot()] = F::one();

    let f = Evaluations(evals).to_coefficients()?;
    let blinding = Coefficients(vec![F::rand(rng), F::rand(rng), F::rand(rng)]);
    Ok(&f + &blinding.mul(&Coefficients::vanishing(m))?)
}

/// Constraint polynomial `p`; vanishes on the auxiliary domain iff `f` is
/// well formed for `z`.
pub fn calculate_p(params: &UnityParams, f: &Coefficients, z: &Coefficients) -> crate::Result<Coefficients> {
    let sigma = params.sigma();
    let (s1, s2) = params.inverse_shifts();
    let shift1 = f.compose_scaled(s1);
    let shift2 = f.compose_scaled(s2);
    let rho = &params.rhos;

    let t0 = (f - z).mul(&(&rho[0] + &rho[1]))?;
    let t1 = (&(&f.scale(F::one() - sigma) - &shift2) + &shift1).mul(&rho[2])?;
    let t2 = (&(f + &shift2) - &shift1.scale(sigma)).mul(&rho[3])?;
    let t3 = (&f.mul(&shift1)? - &shift2).mul(&rho[4])?;
    let t4 = (f - &shift1.mul(&shift1)?).mul(&params.prod)?;
    let t5 = (&shift1 - &Coefficients::constant(F::one())).mul(&rho[params.terminal_slot()])?;

    Ok([t1, t2, t3, t4, t5].iter().fold(t0, |acc, t| &acc + t))
}

/// `(ĥ, h)` with `p = ĥ·(X^m - 1)` and `h = ĥ + X^{depth-1}·z`.
pub fn calculate_h(
    kzg: &KzgParams,
    params: &UnityParams,
    p: &Coefficients,
    z: &Coefficients,
) -> crate::Result<(Coefficients, Coefficients)> {
    let h_hat = p.div_by_vanishing(params.size())?.trim();
    if h_hat.len() + 1 > kzg.depth {
        return Err(Error::DegreeTooLarge { len: h_hat.len(), max: kzg.depth - 1 });
    }
    let h = &h_hat + &z.mul_by_monomial(kzg.depth - 1);
    Ok((h_hat, h))
}

/// Fiat–Shamir point `α = H([F1, H1], [])`.
pub fn challenge(proof1: &UnityPhase1Proof) -> F {
    let mut t = Transcript::new();
    t.absorb_commitment(&proof1.f1);
    t.absorb_commitment(&proof1.h1);
    t.challenge()
}

/// Scalar weights of the six constraint terms at `α`.
#[derive(Debug, Clone, Copy)]
struct ChallengeWeights {
    alpha: F,
    alpha1: F,
    alpha2: F,
    z_vn: F,
    rho01: F,
    rho2: F,
    rho3: F,
    rho4: F,
    rho_n: F,
    prod: F,
}

impl ChallengeWeights {
    /// `None` if `α` lands on the auxiliary domain.
    fn at(params: &UnityParams, alpha: F) -> Option<Self> {
        let m = params.size();
        let z_vn = pow_u64(alpha, m as u64) - F::one();
        let rho = |i: usize| -> Option<F> {
            let inv = (alpha - params.domain_vn[i]).inverse()?;
            Some(z_vn * params.domain_vn_scalars[i] * inv)
        };
        let (s1, s2) = params.inverse_shifts();
        Some(Self {
            alpha,
            alpha1: alpha * s1,
            alpha2: alpha * s2,
            z_vn,
            rho01: rho(0)? + rho(1)?,
            rho2: rho(2)?,
            rho3: rho(3)?,
            rho4: rho(4)?,
            rho_n: rho(params.terminal_slot())?,
            prod: params.prod.evaluate(alpha),
        })
    }
}

/// `p` with the shifted copies of `f` replaced by their openings at `α`.
fn calculate_p_alpha(
    params: &UnityParams,
    w: &ChallengeWeights,
    h_hat: &Coefficients,
    f: &Coefficients,
    z: &Coefficients,
    v1: F,
    v2: F,
) -> Coefficients {
    let sigma = params.sigma();
    let c = Coefficients::constant;
    let terms = [
        (f - z).scale(w.rho01),
        (&f.scale(F::one() - sigma) + &c(v1 - v2)).scale(w.rho2),
        (f + &c(v2 - sigma * v1)).scale(w.rho3),
        (f - &c(v1 * v1)).scale(w.prod),
        (&f.scale(v1) - &c(v2)).scale(w.rho4),
        c((v1 - F::one()) * w.rho_n),
    ];
    terms.iter().fold(h_hat.scale(-w.z_vn), |acc, t| &acc + t)
}

/// Prove that `z(X)` vanishes at a `2^logN`-th root of unity.
#[instrument(skip_all, fields(log_n = params.log_n), level = "debug")]
pub fn prove<R: RngCore + CryptoRng>(
    kzg: &KzgParams,
    params: &UnityParams,
    z: &Coefficients,
    rng: &mut R,
) -> crate::Result<UnityProof> {
    let f = calculate_f(params, z, rng)?;
    let p = calculate_p(params, &f, z)?;
    let (h_hat, h) = calculate_h(kzg, params, &p, z)?;

    let proof1 = UnityPhase1Proof {
        f1: commit_coefficients(kzg, &f)?,
        h1: commit_coefficients(kzg, &h)?,
    };

    let alpha = challenge(&proof1);
    let w = ChallengeWeights::at(params, alpha).ok_or(Error::ZeroDivisor("challenge hit the auxiliary domain"))?;
    let TwiceOpening { eval1: v1, eval2: v2, proof: pi1 } = twice_opening(kzg, &f, w.alpha1, w.alpha2)?;
    let p_alpha = calculate_p_alpha(params, &w, &h_hat, &f, z, v1, v2);
    let pi2 = single_opening(kzg, &p_alpha, alpha)?.proof;

    Ok(UnityProof { proof1, proof2: UnityPhase2Proof { v1, v2, pi1, pi2 } })
}

/// Check a unity proof against `Z2 = [z(τ)]G2`.
#[instrument(skip_all, level = "debug")]
pub fn verify(kzg: &KzgParams, params: &UnityParams, z2: &G2, proof: &UnityProof) -> bool {
    let UnityProof { proof1, proof2 } = proof;
    let alpha = challenge(proof1);
    let w = match ChallengeWeights::at(params, alpha) {
        Some(w) => w,
        None => {
            debug!("unity challenge hit the auxiliary domain");
            return false;
        }
    };

    let opening = TwiceOpening { eval1: proof2.v1, eval2: proof2.v2, proof: proof2.pi1 };
    if !verify_twice_opening(kzg, &proof1.f1, w.alpha1, w.alpha2, &opening) {
        debug!("unity shifted openings of f rejected");
        return false;
    }

    let (v1, v2) = (proof2.v1, proof2.v2);
    let sigma = params.sigma();
    let g1 = kzg.srs_g1[0].into_group();
    let f1 = proof1.f1.0.into_group();
    let p1 = proof1.h1.0.into_group() * (-w.z_vn)
        + f1 * w.rho01
        + (f1 * (F::one() - sigma) + g1 * (v1 - v2)) * w.rho2
        + (f1 + g1 * (v2 - v1 * sigma)) * w.rho3
        + (f1 * v1 - g1 * v2) * w.rho4
        + g1 * (w.rho_n * (v1 - F::one()))
        + (f1 - g1 * (v1 * v1)) * w.prod;

    let degree_term = kzg.srs_g1[kzg.depth - 1].into_group() * w.z_vn - g1 * w.rho01;
    let g2 = kzg.srs_g2[0].into_group();
    let ok = pairing_check(&[
        (p1, g2),
        (degree_term, z2.into_group()),
        (-proof2.pi2.into_group(), kzg.srs_g2[1].into_group() - g2 * w.alpha),
    ]);
    if !ok {
        debug!("unity pairing check rejected");
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const LOG_N: usize = 6;

    fn setup() -> (KzgParams, UnityParams, StdRng) {
        let mut rng = StdRng::seed_from_u64(41);
        let kzg = KzgParams::setup(F::rand(&mut rng), 1 << LOG_N).unwrap();
        let params = UnityParams::setup(LOG_N).unwrap();
        (kzg, params, rng)
    }

    fn root_polynomial(kzg: &KzgParams, index: usize, a: F) -> Coefficients {
        Coefficients(vec![-(a * kzg.domain[index]), a])
    }

    fn commit_g2(kzg: &KzgParams, z: &Coefficients) -> G2 {
        (kzg.srs_g2[1] * z[1] + kzg.srs_g2[0] * z[0]).into()
    }

    #[test]
    fn tables_have_expected_shape() {
        let params = UnityParams::setup(8).unwrap();
        assert_eq!(params.size(), 16);
        assert_eq!(params.rhos.len(), 16);
        // 5 fixed slots plus everything past the chain.
        assert_eq!(params.prod.degree(), 5 + (16 - 13));
        for i in 0..16 {
            assert_eq!(params.rhos[i].evaluate(params.domain_vn[i]), F::one());
        }
    }

    #[test]
    fn constraint_vanishes_on_auxiliary_domain() {
        let (kzg, params, mut rng) = setup();
        let z = root_polynomial(&kzg, 37, F::rand(&mut rng));
        let f = calculate_f(&params, &z, &mut rng).unwrap();
        assert_eq!(f.evaluate(params.domain_vn[LOG_N + 4]), F::one());
        let p = calculate_p(&params, &f, &z).unwrap();
        for v in &params.domain_vn {
            assert!(p.evaluate(*v).is_zero());
        }
    }

    #[test]
    fn constraint_fails_off_the_roots_of_unity() {
        let (_, params, mut rng) = setup();
        let a = F::rand(&mut rng);
        let z = Coefficients(vec![-(a * F::from(3u64)), a]);
        let f = calculate_f(&params, &z, &mut rng).unwrap();
        let p = calculate_p(&params, &f, &z).unwrap();
        assert!(params.domain_vn.iter().any(|v| !p.evaluate(*v).is_zero()));
    }

    #[test]
    fn prove_and_verify() {
        let (kzg, params, mut rng) = setup();
        for index in [0usize, 1, 45, 63] {
            let z = root_polynomial(&kzg, index, F::rand(&mut rng));
            let proof = prove(&kzg, &params, &z, &mut rng).unwrap();
            assert!(verify(&kzg, &params, &commit_g2(&kzg, &z), &proof));
        }
    }

    #[test]
    fn tampered_proof_is_rejected() {
        let (kzg, params, mut rng) = setup();
        let z = root_polynomial(&kzg, 9, F::rand(&mut rng));
        let z2 = commit_g2(&kzg, &z);
        let proof = prove(&kzg, &params, &z, &mut rng).unwrap();

        let mut bad = proof;
        bad.proof2.v1 += F::one();
        assert!(!verify(&kzg, &params, &z2, &bad));

        let other = root_polynomial(&kzg, 10, F::rand(&mut rng));
        assert!(!verify(&kzg, &params, &commit_g2(&kzg, &other), &proof));
    }

    #[test]
    fn malformed_z_is_an_error() {
        let (kzg, params, mut rng) = setup();
        let z = Coefficients(vec![F::zero(), F::one()]);
        assert!(matches!(prove(&kzg, &params, &z, &mut rng), Err(Error::ZeroDivisor(_))));
        let z = Coefficients(vec![F::one(); 3]);
        assert!(matches!(prove(&kzg, &params, &z, &mut rng), Err(Error::LengthMismatch { .. })));
    }
}
