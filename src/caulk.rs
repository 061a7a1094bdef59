//! Caulk single-element private opening
//!
//! Shows that a Pedersen-committed value `cm = v·G1 + r·H` equals `f(ω^i)` for
//! the polynomial behind a public KZG commitment `C`, hiding `i` and `v`.
//!
//! ```text
//!   z(X) = a·X - a·ω^i                      a random, non-zero
//!   Z2   = [z(τ)]G2
//!   T1   = a⁻¹·[q(τ)]G1 + s·H               q = (f - f(ω^i)) / (X - ω^i)
//!   S2   = -r·G2 - s·Z2
//!
//!   e(C - cm, G2) · e(-T1, Z2) · e(-H, S2) == 1
//! ```
//!
//! The Pedersen proof binds `cm` to a known opening and the unity argument
//! shows that `Z2` really commits to a linear polynomial with a root of unity
//! as its zero. The mock variant leaves the unity argument out.

#![forbid(unsafe_code)]

use ark_bn254::G2Projective;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{Field, UniformRand, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, RngCore};
use tracing::{debug, instrument};

use crate::{
    error::Error,
    kzg::{calculate_quotient, commit_evaluations, pairing_check, Commitment},
    pedersen::{self, PedersenParams, PedersenProof},
    polynomial::{Coefficients, Evaluations},
    srs::KzgParams,
    unity::{self, UnityParams, UnityProof},
    F, G1, G2,
};

/// Private opening of one entry of a committed vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct SingleCaulkProof {
    /// `[z(τ)]G2`.
    pub z2: G2,
    /// Blinded quotient commitment.
    pub t1: G1,
    /// Blinding correction in G2.
    pub s2: G2,
    /// Proof of opening for `cm`.
    pub pi_ped: PedersenProof,
    /// Root-of-unity argument for `z`.
    pub pi_unity: UnityProof,
    /// Pedersen commitment to the opened value.
    pub cm: G1,
}

/// [`SingleCaulkProof`] without the unity argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct MockSingleCaulkProof {
    /// `[z(τ)]G2`.
    pub z2: G2,
    /// Blinded quotient commitment.
    pub t1: G1,
    /// Blinding correction in G2.
    pub s2: G2,
    /// Proof of opening for `cm`.
    pub pi_ped: PedersenProof,
    /// Pedersen commitment to the opened value.
    pub cm: G1,
}

/// `z(X) = a·X - a·ω^index`.
pub fn blinded_root_polynomial(kzg: &KzgParams, index: usize, a: F) -> crate::Result<Coefficients> {
    if index >= kzg.depth {
        return Err(Error::IndexOutOfRange { index, size: kzg.depth });
    }
    Ok(Coefficients(vec![-(a * kzg.domain[index]), a]))
}

/// `Z2 = z1·[τ]G2 + z0·G2` for a linear `z`.
pub fn commit_g2(kzg: &KzgParams, z: &Coefficients) -> crate::Result<G2> {
    if z.len() != 2 {
        return Err(Error::LengthMismatch { expected: 2, got: z.len() });
    }
    Ok((kzg.srs_g2[1] * z[1] + kzg.srs_g2[0] * z[0]).into_affine())
}

/// `T1 = a⁻¹·[q] + s·H` with `q` the quotient at `ω^index`.
pub fn calculate_t1(
    kzg: &KzgParams,
    ped: &PedersenParams,
    evals: &Evaluations,
    a: F,
    index: usize,
    s: F,
) -> crate::Result<G1> {
    let a_inv = a.inverse().ok_or(Error::ZeroDivisor("blinding factor a"))?;
    let q = commit_evaluations(kzg, &calculate_quotient(kzg, evals, index)?)?;
    Ok((q.0 * a_inv + ped.h * s).into_affine())
}

/// `S2 = -r·G2 - s·Z2`.
pub fn calculate_s2(kzg: &KzgParams, r: F, s: F, z2: &G2) -> G2 {
    let g2: G2Projective = kzg.srs_g2[0].into_group();
    (g2 * (-r) - *z2 * s).into_affine()
}

fn nonzero_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> F {
    loop {
        let x = F::rand(rng);
        if !x.is_zero() {
            return x;
        }
    }
}

/// Everything both proof flavours share.
struct Blinded {
    z: Coefficients,
    z2: G2,
    t1: G1,
    s2: G2,
    pi_ped: PedersenProof,
    cm: G1,
}

fn blind<R: RngCore + CryptoRng>(
    kzg: &KzgParams,
    ped: &PedersenParams,
    evals: &Evaluations,
    index: usize,
    rng: &mut R,
) -> crate::Result<Blinded> {
    if evals.len() != kzg.depth {
        return Err(Error::LengthMismatch { expected: kzg.depth, got: evals.len() });
    }
    let a = nonzero_scalar(rng);
    let s = F::rand(rng);
    let r = F::rand(rng);
    let z = blinded_root_polynomial(kzg, index, a)?;
    let z2 = commit_g2(kzg, &z)?;
    let t1 = calculate_t1(kzg, ped, evals, a, index, s)?;
    let s2 = calculate_s2(kzg, r, s, &z2);
    let v = evals[index];
    let cm = pedersen::commit(ped, v, r);
    let pi_ped = pedersen::prove(ped, v, r, rng);
    Ok(Blinded { z, z2, t1, s2, pi_ped, cm })
}

/// `e(C - cm, G2) · e(-T1, Z2) · e(-H, S2) == 1`.
fn opening_relation(kzg: &KzgParams, ped: &PedersenParams, c: &Commitment, z2: &G2, t1: &G1, s2: &G2, cm: &G1) -> bool {
    pairing_check(&[
        (c.0.into_group() - cm, kzg.srs_g2[0].into_group()),
        (-t1.into_group(), z2.into_group()),
        (-ped.h.into_group(), s2.into_group()),
    ])
}

/// Prove that `evals[index]` is the value inside the returned `cm`.
#[instrument(skip_all, level = "debug")]
pub fn prove<R: RngCore + CryptoRng>(
    kzg: &KzgParams,
    ped: &PedersenParams,
    unity_params: &UnityParams,
    evals: &Evaluations,
    index: usize,
    rng: &mut R,
) -> crate::Result<SingleCaulkProof> {
    if kzg.depth != 1 << unity_params.log_n {
        return Err(Error::MalformedParams("unity parameters do not match the KZG domain"));
    }
    let b = blind(kzg, ped, evals, index, rng)?;
    let pi_unity = unity::prove(kzg, unity_params, &b.z, rng)?;
    Ok(SingleCaulkProof { z2: b.z2, t1: b.t1, s2: b.s2, pi_ped: b.pi_ped, pi_unity, cm: b.cm })
}

/// Check a [`SingleCaulkProof`] against the vector commitment `c`.
#[instrument(skip_all, level = "debug")]
pub fn verify(
    kzg: &KzgParams,
    ped: &PedersenParams,
    unity_params: &UnityParams,
    c: &Commitment,
    proof: &SingleCaulkProof,
) -> bool {
    if !pedersen::verify(ped, &proof.cm, &proof.pi_ped) {
        debug!("caulk: pedersen sub-proof rejected");
        return false;
    }
    if !unity::verify(kzg, unity_params, &proof.z2, &proof.pi_unity) {
        debug!("caulk: unity sub-proof rejected");
        return false;
    }
    let ok = opening_relation(kzg, ped, c, &proof.z2, &proof.t1, &proof.s2, &proof.cm);
    if !ok {
        debug!("caulk: opening pairing rejected");
    }
    ok
}

/// Prove the opening relation without the unity argument.
pub fn prove_mock<R: RngCore + CryptoRng>(
    kzg: &KzgParams,
    ped: &PedersenParams,
    evals: &Evaluations,
    index: usize,
    rng: &mut R,
) -> crate::Result<MockSingleCaulkProof> {
    let b = blind(kzg, ped, evals, index, rng)?;
    Ok(MockSingleCaulkProof { z2: b.z2, t1: b.t1, s2: b.s2, pi_ped: b.pi_ped, cm: b.cm })
}

/// Check a [`MockSingleCaulkProof`].
pub fn verify_mock(kzg: &KzgParams, ped: &PedersenParams, c: &Commitment, proof: &MockSingleCaulkProof) -> bool {
    if !pedersen::verify(ped, &proof.cm, &proof.pi_ped) {
        debug!("caulk mock: pedersen sub-proof rejected");
        return false;
    }
    let ok = opening_relation(kzg, ped, c, &proof.z2, &proof.t1, &proof.s2, &proof.cm);
    if !ok {
        debug!("caulk mock: opening pairing rejected");
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::One;
    use rand::{rngs::StdRng, SeedableRng};

    fn setup(depth: usize) -> (KzgParams, PedersenParams, Evaluations, Commitment, StdRng) {
        let mut rng = StdRng::seed_from_u64(51);
        let kzg = KzgParams::setup(F::rand(&mut rng), depth).unwrap();
        let ped = PedersenParams::setup(&mut rng);
        let evals = Evaluations((0..depth).map(|_| F::rand(&mut rng)).collect());
        let c = commit_evaluations(&kzg, &evals).unwrap();
        (kzg, ped, evals, c, rng)
    }

    #[test]
    fn mock_opening_round_trip() {
        let (kzg, ped, evals, c, mut rng) = setup(16);
        let proof = prove_mock(&kzg, &ped, &evals, 5, &mut rng).unwrap();
        assert!(verify_mock(&kzg, &ped, &c, &proof));
        assert!(pedersen::verify(&ped, &proof.cm, &proof.pi_ped));
    }

    #[test]
    fn mock_opening_rejects_wrong_commitment() {
        let (kzg, ped, evals, c, mut rng) = setup(16);
        let proof = prove_mock(&kzg, &ped, &evals, 3, &mut rng).unwrap();

        let mut altered = evals.clone();
        altered.0[3] += F::one();
        let other = commit_evaluations(&kzg, &altered).unwrap();
        assert!(!verify_mock(&kzg, &ped, &other, &proof));

        let mut bad = proof;
        bad.pi_ped.t1 += F::one();
        assert!(!verify_mock(&kzg, &ped, &c, &bad));
    }

    #[test]
    fn full_opening_round_trip() {
        let (kzg, ped, evals, c, mut rng) = setup(64);
        let unity_params = UnityParams::setup(6).unwrap();
        let proof = prove(&kzg, &ped, &unity_params, &evals, 42, &mut rng).unwrap();
        assert!(verify(&kzg, &ped, &unity_params, &c, &proof));

        let mut bad = proof;
        bad.t1 = (bad.t1.into_group() + kzg.srs_g1[0]).into_affine();
        assert!(!verify(&kzg, &ped, &unity_params, &c, &bad));
    }

    #[test]
    fn mismatched_unity_params_are_an_error() {
        let (kzg, ped, evals, _, mut rng) = setup(64);
        let unity_params = UnityParams::setup(5).unwrap();
        assert!(matches!(
            prove(&kzg, &ped, &unity_params, &evals, 1, &mut rng),
            Err(Error::MalformedParams(_))
        ));
        assert!(matches!(blinded_root_polynomial(&kzg, 64, F::one()), Err(Error::IndexOutOfRange { .. })));
    }
}
