//! Pedersen commitments with a Schnorr-style proof of opening
//!
//! ```text
//!   commit(v, r) = v·G1 + r·H
//!   prove:   R = commit(s1, s2),  c = H(cm, R),  t1 = s1 + v·c,  t2 = s2 + r·c
//!   verify:  commit(t1, t2) == R + c·cm
//! ```
//!
//! `H` must have an unknown discrete log relative to `G1`.

#![forbid(unsafe_code)]

use ark_bn254::G1Projective;
use ark_ec::{AffineRepr, CurveGroup, Group};
use ark_ff::{UniformRand, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::{transcript::Transcript, F, G1};

/// Second generator for Pedersen commitments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct PedersenParams {
    /// Auxiliary generator `H`.
    pub h: G1,
}

impl PedersenParams {
    /// Sample `H = h·G1`; `h` is discarded.
    pub fn setup<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut h = F::rand(rng);
        while h.is_zero() {
            h = F::rand(rng);
        }
        Self { h: (G1Projective::generator() * h).into_affine() }
    }
}

/// Proof of knowledge of `(v, r)` opening a Pedersen commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct PedersenProof {
    /// Commitment to the masks `(s1, s2)`.
    pub r: G1,
    /// `s1 + v·c`.
    pub t1: F,
    /// `s2 + r·c`.
    pub t2: F,
}

/// `v·G1 + r·H`.
pub fn commit(params: &PedersenParams, v: F, r: F) -> G1 {
    (G1::generator() * v + params.h * r).into_affine()
}

fn challenge(cm: &G1, r: &G1) -> F {
    let mut t = Transcript::new();
    t.absorb_point(cm);
    t.absorb_point(r);
    t.challenge()
}

/// Prove knowledge of the opening `(v, r)`.
pub fn prove<R: RngCore + CryptoRng>(params: &PedersenParams, v: F, r: F, rng: &mut R) -> PedersenProof {
    let s1 = F::rand(rng);
    let s2 = F::rand(rng);
    let big_r = commit(params, s1, s2);
    let cm = commit(params, v, r);
    let c = challenge(&cm, &big_r);
    PedersenProof { r: big_r, t1: s1 + v * c, t2: s2 + r * c }
}

/// Check a proof of opening for `cm`.
pub fn verify(params: &PedersenParams, cm: &G1, proof: &PedersenProof) -> bool {
    let c = challenge(cm, &proof.r);
    let lhs = commit(params, proof.t1, proof.t2);
    let rhs = proof.r.into_group() + *cm * c;
    let ok = lhs.into_group() == rhs;
    if !ok {
        debug!("pedersen proof rejected");
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::One;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn completeness_and_tampering() {
        let mut rng = StdRng::seed_from_u64(31);
        let params = PedersenParams::setup(&mut rng);
        for _ in 0..4 {
            let v = F::rand(&mut rng);
            let r = F::rand(&mut rng);
            let cm = commit(&params, v, r);
            let proof = prove(&params, v, r, &mut rng);
            assert!(verify(&params, &cm, &proof));

            let bad_t1 = PedersenProof { t1: proof.t1 + F::one(), ..proof };
            assert!(!verify(&params, &cm, &bad_t1));
            let bad_t2 = PedersenProof { t2: proof.t2 - F::one(), ..proof };
            assert!(!verify(&params, &cm, &bad_t2));
        }
    }

    #[test]
    fn proof_does_not_transfer_to_other_commitment() {
        let mut rng = StdRng::seed_from_u64(32);
        let params = PedersenParams::setup(&mut rng);
        let v = F::from(42u64);
        let r = F::rand(&mut rng);
        let proof = prove(&params, v, r, &mut rng);
        let other = commit(&params, v + F::one(), r);
        assert!(!verify(&params, &other, &proof));
    }

    #[test]
    fn commitment_is_additively_homomorphic() {
        let mut rng = StdRng::seed_from_u64(33);
        let params = PedersenParams::setup(&mut rng);
        let (v1, r1, v2, r2) = (F::from(3u64), F::from(4u64), F::from(5u64), F::from(6u64));
        let sum = commit(&params, v1, r1).into_group() + commit(&params, v2, r2);
        assert_eq!(sum.into_affine(), commit(&params, v1 + v2, r1 + r2));
    }
}
