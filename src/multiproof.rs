//! Aggregated KZG openings (PCS multiproofs)
//!
//! Opens `k` committed evaluation vectors `F_i` at domain points `z_i = ω^{idx_i}`
//! with two group elements:
//!
//! ```text
//!   r      = H(C_1..C_k ; y_1..y_k, z_1..z_k)         r_i = r^i
//!   G      = Σ r_i · (F_i - y_i) / (X - z_i)          D = [G]
//!   t      = H(D ; r)
//!   H      = Σ r_i / (t - z_i) · F_i                  g2(t) = Σ r_i / (t - z_i) · y_i
//!   Π      = [(H - G - g2(t)) / (X - t)]
//!
//!   check  e(E - D - g2(t)·G1, G2) == e(Π, [τ]G2 - t·G2),   E = Σ r_i / (t - z_i) · C_i
//! ```
//!
//! Everything stays in evaluation form, so the prover never runs an IFFT.

#![forbid(unsafe_code)]

use ark_ec::AffineRepr;
use ark_ff::{batch_inversion, One, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{
    error::Error,
    kzg::{calculate_quotient, commit_evaluations, msm, pairing_check, Commitment},
    polynomial::Evaluations,
    srs::KzgParams,
    transcript::{hash_points_and_scalars, Transcript},
    F,
};

/// Aggregated opening proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct PcsMultiproof {
    /// `[(H - G - g2(t)) / (X - t)]`.
    pub pi: Commitment,
    /// `[G]`, the aggregated quotient.
    pub d: Commitment,
}

fn check_shapes(params: &KzgParams, indexes: &[usize], n_values: usize, n_commitments: usize) -> crate::Result<()> {
    if indexes.is_empty() {
        return Err(Error::EmptyInput("multiproof needs at least one opening"));
    }
    for len in [n_values, n_commitments] {
        if len != indexes.len() {
            return Err(Error::LengthMismatch { expected: indexes.len(), got: len });
        }
    }
    if let Some(&index) = indexes.iter().find(|&&i| i >= params.depth) {
        return Err(Error::IndexOutOfRange { index, size: params.depth });
    }
    Ok(())
}

/// First challenge `r` and its powers `r^0, …, r^{k-1}`.
pub fn calculate_rs(params: &KzgParams, indexes: &[usize], ys: &[F], cs: &[Commitment]) -> (F, Vec<F>) {
    let mut t = Transcript::new();
    for c in cs {
        t.absorb_commitment(c);
    }
    for y in ys {
        t.absorb_scalar(y);
    }
    for &i in indexes {
        t.absorb_scalar(&params.domain[i]);
    }
    let r = t.challenge();

    let mut acc = F::one();
    let rs = indexes
        .iter()
        .map(|_| {
            let cur = acc;
            acc *= r;
            cur
        })
        .collect();
    (r, rs)
}

/// Second challenge `t = H([D], [r])`.
pub fn calculate_t(d: &Commitment, r: F) -> F {
    hash_points_and_scalars(&[d.0], &[r])
}

/// `r_i / (t - z_i)`.
pub fn calculate_rtz(params: &KzgParams, rs: &[F], indexes: &[usize], t: F) -> crate::Result<Vec<F>> {
    let mut denoms: Vec<F> = indexes.iter().map(|&i| t - params.domain[i]).collect();
    if denoms.iter().any(|d| d.is_zero()) {
        return Err(Error::ZeroDivisor("challenge t coincides with an opened point"));
    }
    batch_inversion(&mut denoms);
    Ok(rs.iter().zip(denoms).map(|(r, d)| *r * d).collect())
}

/// `G = Σ r_i · Q_i` in evaluation form.
pub fn calculate_g(params: &KzgParams, rs: &[F], fxs: &[Evaluations], indexes: &[usize]) -> crate::Result<Evaluations> {
    let quotients = fxs
        .par_iter()
        .zip(indexes.par_iter())
        .map(|(f, &i)| calculate_quotient(params, f, i))
        .collect::<crate::Result<Vec<_>>>()?;
    let g: Vec<F> = (0..params.depth)
        .into_par_iter()
        .map(|j| quotients.iter().zip(rs).map(|(q, r)| *r * q[j]).sum::<F>())
        .collect();
    Ok(Evaluations(g))
}

/// `H = Σ rtz_i · F_i` in evaluation form.
pub fn calculate_h(params: &KzgParams, fxs: &[Evaluations], rtz: &[F]) -> Evaluations {
    let h: Vec<F> = (0..params.depth)
        .into_par_iter()
        .map(|j| fxs.iter().zip(rtz).map(|(f, w)| *w * f[j]).sum::<F>())
        .collect();
    Evaluations(h)
}

/// `g2(t) = Σ rtz_i · y_i`.
pub fn calculate_g2t(ys: &[F], rtz: &[F]) -> F {
    ys.iter().zip(rtz).map(|(y, w)| *y * w).sum()
}

/// Aggregate the openings of `fxs[i]` at `ω^{indexes[i]}`.
///
/// `cs[i]` must be the evaluation-form commitment to `fxs[i]`; it is only
/// hashed here, not recomputed.
#[instrument(skip_all, fields(k = indexes.len()), level = "debug")]
pub fn prove(params: &KzgParams, cs: &[Commitment], fxs: &[Evaluations], indexes: &[usize]) -> crate::Result<PcsMultiproof> {
    check_shapes(params, indexes, fxs.len(), cs.len())?;
    if let Some(f) = fxs.iter().find(|f| f.len() != params.depth) {
        return Err(Error::LengthMismatch { expected: params.depth, got: f.len() });
    }
    let ys: Vec<F> = fxs.iter().zip(indexes).map(|(f, &i)| f[i]).collect();
    let (r, rs) = calculate_rs(params, indexes, &ys, cs);

    let g = calculate_g(params, &rs, fxs, indexes)?;
    let d = commit_evaluations(params, &g)?;
    let t = calculate_t(&d, r);

    let rtz = calculate_rtz(params, &rs, indexes, t)?;
    let h = calculate_h(params, fxs, &rtz);
    let g2t = calculate_g2t(&ys, &rtz);

    let mut denoms: Vec<F> = params.domain.iter().map(|w| *w - t).collect();
    if denoms.iter().any(|d| d.is_zero()) {
        return Err(Error::ZeroDivisor("challenge t lies in the evaluation domain"));
    }
    batch_inversion(&mut denoms);
    let pi_evals: Vec<F> = h
        .par_iter()
        .zip(g.par_iter())
        .zip(denoms.par_iter())
        .map(|((hj, gj), inv)| (*hj - gj - g2t) * inv)
        .collect();
    let pi = commit_evaluations(params, &Evaluations(pi_evals))?;

    Ok(PcsMultiproof { pi, d })
}

/// Check an aggregated opening.
///
/// Mismatched input lengths and out-of-range indexes are errors; a proof that
/// fails the pairing check yields `Ok(false)`.
#[instrument(skip_all, fields(k = indexes.len()), level = "debug")]
pub fn verify(
    params: &KzgParams,
    indexes: &[usize],
    ys: &[F],
    cs: &[Commitment],
    proof: &PcsMultiproof,
) -> crate::Result<bool> {
    check_shapes(params, indexes, ys.len(), cs.len())?;
    let (r, rs) = calculate_rs(params, indexes, ys, cs);
    let t = calculate_t(&proof.d, r);
    let rtz = match calculate_rtz(params, &rs, indexes, t) {
        Ok(rtz) => rtz,
        Err(_) => {
            debug!("multiproof challenge coincides with an opened point");
            return Ok(false);
        }
    };
    let g2t = calculate_g2t(ys, &rtz);
    let bases: Vec<_> = cs.iter().map(|c| c.0).collect();
    let e = msm(&bases, &rtz)?;

    let g1 = params.srs_g1[0].into_group();
    let g2 = params.srs_g2[0].into_group();
    let ok = pairing_check(&[
        (e - proof.d.0 - g1 * g2t, g2),
        (-proof.pi.0.into_group(), params.srs_g2[1].into_group() - g2 * t),
    ]);
    if !ok {
        debug!("multiproof pairing check rejected");
    }
    Ok(ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::UniformRand;
    use rand::{rngs::StdRng, SeedableRng};

    fn setup(depth: usize, k: usize) -> (KzgParams, Vec<Evaluations>, Vec<Commitment>) {
        let mut rng = StdRng::seed_from_u64(61);
        let params = KzgParams::setup(F::rand(&mut rng), depth).unwrap();
        let fxs: Vec<Evaluations> = (0..k)
            .map(|_| Evaluations((0..depth).map(|_| F::rand(&mut rng)).collect()))
            .collect();
        let cs = fxs.iter().map(|f| commit_evaluations(&params, f).unwrap()).collect();
        (params, fxs, cs)
    }

    #[test]
    fn aggregate_polynomials_agree_at_t() {
        let (params, fxs, cs) = setup(16, 3);
        let indexes = [2usize, 9, 15];
        let ys: Vec<F> = fxs.iter().zip(&indexes).map(|(f, &i)| f[i]).collect();
        let (r, rs) = calculate_rs(&params, &indexes, &ys, &cs);
        assert_eq!(rs[1], r);
        let g = calculate_g(&params, &rs, &fxs, &indexes).unwrap();
        let t = calculate_t(&commit_evaluations(&params, &g).unwrap(), r);
        let rtz = calculate_rtz(&params, &rs, &indexes, t).unwrap();
        let h = calculate_h(&params, &fxs, &rtz);
        let ht = h.to_coefficients().unwrap().evaluate(t);
        let gt = g.to_coefficients().unwrap().evaluate(t);
        assert_eq!(ht - gt, calculate_g2t(&ys, &rtz));
    }

    #[test]
    fn single_opening_aggregate() {
        let (params, fxs, cs) = setup(8, 1);
        let proof = prove(&params, &cs, &fxs, &[6]).unwrap();
        assert!(verify(&params, &[6], &[fxs[0][6]], &cs, &proof).unwrap());
    }

    #[test]
    fn repeated_index_across_polynomials() {
        let (params, fxs, cs) = setup(16, 2);
        let indexes = [4usize, 4];
        let proof = prove(&params, &cs, &fxs, &indexes).unwrap();
        let ys = [fxs[0][4], fxs[1][4]];
        assert!(verify(&params, &indexes, &ys, &cs, &proof).unwrap());
        assert!(!verify(&params, &indexes, &[ys[1], ys[0]], &cs, &proof).unwrap());
    }

    #[test]
    fn proof_survives_serialization() {
        let (params, fxs, cs) = setup(8, 2);
        let proof = prove(&params, &cs, &fxs, &[1, 5]).unwrap();
        let mut bytes = Vec::new();
        proof.serialize_compressed(&mut bytes).unwrap();
        let back = PcsMultiproof::deserialize_compressed(&bytes[..]).unwrap();
        assert_eq!(back, proof);
        assert!(verify(&params, &[1, 5], &[fxs[0][1], fxs[1][5]], &cs, &back).unwrap());
    }

    #[test]
    fn shape_errors() {
        let (params, fxs, cs) = setup(8, 2);
        let proof = prove(&params, &cs, &fxs, &[0, 1]).unwrap();
        assert!(matches!(
            verify(&params, &[0, 1], &[F::zero()], &cs, &proof),
            Err(Error::LengthMismatch { expected: 2, got: 1 })
        ));
        assert!(matches!(
            verify(&params, &[0, 8], &[F::zero(); 2], &cs, &proof),
            Err(Error::IndexOutOfRange { index: 8, .. })
        ));
        assert!(matches!(prove(&params, &[], &[], &[]), Err(Error::EmptyInput(_))));
    }
}
