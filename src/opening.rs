//! KZG openings at arbitrary points
//!
//! [`crate::kzg`] only opens at domain points. The Caulk unity argument needs
//! openings at Fiat–Shamir points that lie anywhere in the field, so this
//! module works on coefficient-form polynomials:
//!
//! - single:  `π = [(f(X) - f(p)) / (X - p)]`
//! - twice:   `π = (π_1 - π_2) / (p_1 - p_2)`, which equals the commitment to
//!   `(f(X) - I(X)) / ((X - p_1)(X - p_2))` with `I` the line through
//!   `(p_1, e_1)` and `(p_2, e_2)`. One group element proves both values.

#![forbid(unsafe_code)]

use ark_ec::AffineRepr;
use ark_ff::Field;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use tracing::debug;

use crate::{
    error::Error,
    kzg::{commit_coefficients, pairing_check, Commitment},
    polynomial::Coefficients,
    srs::KzgParams,
    F, G1,
};

/// Evaluation of a committed polynomial at one point plus its witness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct SingleOpening {
    /// `f(p)`.
    pub eval: F,
    /// `[(f(X) - f(p)) / (X - p)]G1`.
    pub proof: G1,
}

/// Evaluations at two points sharing one witness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct TwiceOpening {
    /// `f(p_1)`.
    pub eval1: F,
    /// `f(p_2)`.
    pub eval2: F,
    /// Combined witness.
    pub proof: G1,
}

/// Open `poly` at `point`.
pub fn single_opening(params: &KzgParams, poly: &Coefficients, point: F) -> crate::Result<SingleOpening> {
    let eval = poly.evaluate(point);
    let quotient = (poly - &Coefficients::constant(eval)).div_by_single_root(point);
    let proof = commit_coefficients(params, &quotient)?.0;
    Ok(SingleOpening { eval, proof })
}

/// Open `poly` at two distinct points with a single witness.
pub fn twice_opening(params: &KzgParams, poly: &Coefficients, p1: F, p2: F) -> crate::Result<TwiceOpening> {
    let inv = (p1 - p2)
        .inverse()
        .ok_or(Error::ZeroDivisor("twice opening needs two distinct points"))?;
    let o1 = single_opening(params, poly, p1)?;
    let o2 = single_opening(params, poly, p2)?;
    let proof = ((o1.proof.into_group() - o2.proof.into_group()) * inv).into();
    Ok(TwiceOpening { eval1: o1.eval, eval2: o2.eval, proof })
}

/// `e(C - e·G1, G2) · e(-π, [τ]G2 - p·G2) == 1`.
pub fn verify_single_opening(params: &KzgParams, commitment: &Commitment, point: F, opening: &SingleOpening) -> bool {
    let g1 = params.srs_g1[0].into_group();
    let g2 = params.srs_g2[0].into_group();
    let ok = pairing_check(&[
        (commitment.0.into_group() - g1 * opening.eval, g2),
        (-opening.proof.into_group(), params.srs_g2[1].into_group() - g2 * point),
    ]);
    if !ok {
        debug!("single opening rejected");
    }
    ok
}

/// Check a [`TwiceOpening`] of `commitment` at `(p1, p2)`.
///
/// With `I(X) = term1·X + term0` the interpolant and
/// `(X - p1)(X - p2) = X^2 - a·X + b`:
///
/// ```text
///   e(C - [I(τ)] - b·π, G2) · e(-π, [τ^2]G2) · e(a·π, [τ]G2) == 1
/// ```
pub fn verify_twice_opening(
    params: &KzgParams,
    commitment: &Commitment,
    p1: F,
    p2: F,
    opening: &TwiceOpening,
) -> bool {
    let inv = match (p1 - p2).inverse() {
        Some(inv) => inv,
        None => {
            debug!("twice opening queried at coinciding points");
            return false;
        }
    };
    let (e1, e2) = (opening.eval1, opening.eval2);
    let term0 = (p1 * e2 - p2 * e1) * inv;
    let term1 = (e1 - e2) * inv;
    let interpolant = params.srs_g1[0] * term0 + params.srs_g1[1] * term1;

    let a = p1 + p2;
    let b = p1 * p2;
    let pi = opening.proof.into_group();
    let ok = pairing_check(&[
        (commitment.0.into_group() - interpolant - pi * b, params.srs_g2[0].into_group()),
        (-pi, params.srs_g2[2].into_group()),
        (pi * a, params.srs_g2[1].into_group()),
    ]);
    if !ok {
        debug!("twice opening rejected");
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::{One, UniformRand};
    use rand::{rngs::StdRng, SeedableRng};

    fn setup() -> (KzgParams, Coefficients, Commitment) {
        let mut rng = StdRng::seed_from_u64(21);
        let params = KzgParams::setup(F::rand(&mut rng), 16).unwrap();
        let poly = Coefficients((0..12).map(|_| F::rand(&mut rng)).collect());
        let c = commit_coefficients(&params, &poly).unwrap();
        (params, poly, c)
    }

    #[test]
    fn single_opening_outside_domain() {
        let (params, poly, c) = setup();
        let point = F::from(123_456_789u64);
        let opening = single_opening(&params, &poly, point).unwrap();
        assert_eq!(opening.eval, poly.evaluate(point));
        assert!(verify_single_opening(&params, &c, point, &opening));

        let forged = SingleOpening { eval: opening.eval + F::one(), ..opening };
        assert!(!verify_single_opening(&params, &c, point, &forged));
        assert!(!verify_single_opening(&params, &c, point + F::one(), &opening));
    }

    #[test]
    fn twice_opening_binds_both_points() {
        let (params, poly, c) = setup();
        let p1 = F::from(3u64);
        let p2 = F::from(17u64);
        let p3 = F::from(2024u64);
        let opening = twice_opening(&params, &poly, p1, p2).unwrap();
        assert_eq!(opening.eval1, poly.evaluate(p1));
        assert_eq!(opening.eval2, poly.evaluate(p2));
        assert!(verify_twice_opening(&params, &c, p1, p2, &opening));
        assert!(!verify_twice_opening(&params, &c, p1, p3, &opening));

        let forged = TwiceOpening { eval2: opening.eval2 - F::one(), ..opening };
        assert!(!verify_twice_opening(&params, &c, p1, p2, &forged));
    }

    #[test]
    fn coinciding_points() {
        let (params, poly, c) = setup();
        let p = F::from(9u64);
        assert!(matches!(twice_opening(&params, &poly, p, p), Err(Error::ZeroDivisor(_))));
        let opening = twice_opening(&params, &poly, p, F::from(10u64)).unwrap();
        assert!(!verify_twice_opening(&params, &c, p, p, &opening));
    }
}
