//! FRI low-degree test
//!
//! The prover commits to evaluations of `f` over the coset `g·<ω_N>` and folds
//! them `L` times by the folding factor `k`:
//!
//! ```text
//!   group i  = [ f(x_i·ρ^0), …, f(x_i·ρ^{k-1}) ]     x_i = g·ω_N^i,  ρ = ω_N^{N/k}
//!   leaf i   = H([] ; group i)
//!   α_l      = H([] ; root_0, …, root_l)
//!   f'(x_i^k) = Q_i(α_l / x_i),                       Q_i = ifft(group i)
//! ```
//!
//! after which the domain shrinks to `g^k·<ω_{N/k}>`. Folding stops once the
//! domain fits in `max_remainder_size`; that last vector is sent in the clear.
//!
//! The verifier replays every query through each layer: check the Merkle
//! batch proof, check the queried value sits in its group, interpolate the
//! group and evaluate at `α_l`. The remainder must agree at the final
//! positions and interpolate to a polynomial of degree at most
//! `⌈(d+1)/k^L⌉ - 1`.

#![forbid(unsafe_code)]

use std::collections::{HashMap, HashSet};

use ark_ff::{batch_inversion, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rayon::prelude::*;
use tracing::{debug, instrument, trace};

use crate::{
    domain::{ifft, pow_u64, Domain},
    error::Error,
    merkle::{batch_verify, BatchProof, FixedMerkleTree, LeafWithIndex},
    polynomial::Coefficients,
    transcript::{hash_pair, hash_points_and_scalars},
    F,
};

const SUPPORTED_FOLDING_FACTORS: [usize; 4] = [2, 4, 8, 16];

/// Public FRI configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FriParams {
    /// Coset shift `g` of the source domain.
    pub domain_offset: F,
    /// Domain reduction per round.
    pub folding_factor: usize,
    /// Folding stops once the domain has at most this many points.
    pub max_remainder_size: usize,
}

impl FriParams {
    /// Validate and bundle the configuration.
    pub fn new(domain_offset: F, max_remainder_size: usize, folding_factor: usize) -> crate::Result<Self> {
        if !SUPPORTED_FOLDING_FACTORS.contains(&folding_factor) {
            return Err(Error::UnsupportedFoldingFactor(folding_factor));
        }
        if max_remainder_size < folding_factor {
            return Err(Error::RemainderTooSmall { max_remainder_size, folding_factor });
        }
        if domain_offset.is_zero() {
            return Err(Error::ZeroDivisor("fri domain offset must be non-zero"));
        }
        Ok(Self { domain_offset, folding_factor, max_remainder_size })
    }

    /// Number of folding rounds for a source domain of `domain_size` points.
    pub fn num_layers(&self, domain_size: usize) -> usize {
        let mut cur = domain_size;
        let mut layers = 0;
        while cur > self.max_remainder_size {
            cur /= self.folding_factor;
            layers += 1;
        }
        layers
    }

    /// Length of the remainder vector for a source domain of `domain_size` points.
    pub fn remainder_size(&self, domain_size: usize) -> usize {
        let mut cur = domain_size;
        while cur > self.max_remainder_size {
            cur /= self.folding_factor;
        }
        cur
    }
}

/// Split `values` into `values.len() / k` groups; group `i` collects every
/// `(len / k)`-th element starting at `i`.
pub fn transpose(values: &[F], folding_factor: usize) -> crate::Result<Vec<Vec<F>>> {
    if folding_factor == 0 || values.len() % folding_factor != 0 {
        return Err(Error::LengthMismatch {
            expected: values.len().next_multiple_of(folding_factor.max(1)),
            got: values.len(),
        });
    }
    let rows = values.len() / folding_factor;
    Ok((0..rows)
        .map(|i| (0..folding_factor).map(|j| values[j * rows + i]).collect())
        .collect())
}

/// Inverse of [`transpose`].
pub fn detranspose(groups: &[Vec<F>]) -> Vec<F> {
    let rows = groups.len();
    let cols = groups.first().map_or(0, Vec::len);
    let mut out = vec![F::zero(); rows * cols];
    for (i, group) in groups.iter().enumerate() {
        for (j, v) in group.iter().enumerate() {
            out[j * rows + i] = *v;
        }
    }
    out
}

/// `x_i^{-1}` for the first `rows` points of `offset·<ω_n>`.
fn inverse_coset_points(n: usize, rows: usize, offset: F) -> crate::Result<Vec<F>> {
    let coset = Domain::new_with_coset(n, offset)?;
    let mut xs: Vec<F> = std::iter::successors(Some(coset.shift), |x| Some(*x * coset.omega))
        .take(rows)
        .collect();
    batch_inversion(&mut xs);
    Ok(xs)
}

fn fold_groups(groups: &[Vec<F>], n: usize, offset: F, alpha: F) -> crate::Result<Vec<F>> {
    let inv_xs = inverse_coset_points(n, groups.len(), offset)?;
    groups
        .par_iter()
        .zip(inv_xs.par_iter())
        .map(|(group, inv_x)| -> crate::Result<F> { Ok(Coefficients(ifft(group)?).evaluate(alpha * inv_x)) })
        .collect()
}

/// One folding round: evaluations over `offset·<ω_N>` become evaluations of
/// the folded polynomial over `offset^k·<ω_{N/k}>`.
pub fn fold_evaluations(values: &[F], offset: F, alpha: F, folding_factor: usize) -> crate::Result<Vec<F>> {
    if !values.len().is_power_of_two() {
        return Err(Error::NotPowerOfTwo { len: values.len() });
    }
    let groups = transpose(values, folding_factor)?;
    fold_groups(&groups, values.len(), offset, alpha)
}

/// Map source positions to group indexes of the folded domain, keeping the
/// first occurrence of each.
pub fn fold_positions(positions: &[usize], domain_size: usize, folding_factor: usize) -> Vec<usize> {
    let target = (domain_size / folding_factor).max(1);
    let mut seen = HashSet::with_capacity(positions.len());
    positions
        .iter()
        .map(|p| p % target)
        .filter(|p| seen.insert(*p))
        .collect()
}

fn hash_group(group: &[F]) -> F {
    hash_points_and_scalars(&[], group)
}

/// One committed round.
#[derive(Debug, Clone)]
pub struct FriLayer {
    /// Transposed evaluations, group `i` at `[i·k, (i+1)·k)`.
    pub evaluations: Vec<F>,
    /// Tree over the group hashes.
    pub tree: FixedMerkleTree,
}

/// Prover state: every committed round plus the final remainder.
#[derive(Debug, Clone)]
pub struct FriProver {
    /// Rounds in folding order.
    pub layers: Vec<FriLayer>,
    /// Evaluations left after the last fold.
    pub remainder: Vec<F>,
}

/// Opened groups of one round.
#[derive(Debug, Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct FriProofLayer {
    /// One group of `k` values per folded position.
    pub query_values: Vec<Vec<F>>,
    /// Batch proof for the group hashes.
    pub merkle_proof: BatchProof,
}

/// Full FRI proof.
#[derive(Debug, Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct FriProof {
    /// Per-round openings.
    pub layers: Vec<FriProofLayer>,
    /// Final evaluation vector.
    pub remainder: Vec<F>,
}

impl FriProver {
    /// Commit to `evaluations` over `params.domain_offset·<ω_N>` and fold down
    /// to the remainder.
    #[instrument(skip_all, fields(n = evaluations.len()), level = "debug")]
    pub fn build(params: &FriParams, evaluations: &[F]) -> crate::Result<Self> {
        if !evaluations.len().is_power_of_two() {
            return Err(Error::NotPowerOfTwo { len: evaluations.len() });
        }
        let k = params.folding_factor;
        let num_layers = params.num_layers(evaluations.len());
        let mut layers = Vec::with_capacity(num_layers);
        let mut seeds = Vec::with_capacity(num_layers);
        let mut cur = evaluations.to_vec();
        let mut offset = params.domain_offset;

        for round in 0..num_layers {
            let n = cur.len();
            let groups = transpose(&cur, k)?;
            let leaves: Vec<F> = groups.par_iter().map(|g| hash_group(g)).collect();
            let levels = leaves.len().trailing_zeros() as usize;
            let tree = FixedMerkleTree::with_elements(levels, &leaves, hash_pair)?;

            seeds.push(tree.root());
            let alpha = hash_points_and_scalars(&[], &seeds);
            cur = fold_groups(&groups, n, offset, alpha)?;
            offset = pow_u64(offset, k as u64);
            trace!(round, from = n, to = cur.len(), "fri round committed");

            layers.push(FriLayer { evaluations: groups.concat(), tree });
        }
        Ok(Self { layers, remainder: cur })
    }

    /// Merkle roots of every round, in order.
    pub fn commitment(&self) -> Vec<F> {
        self.layers.iter().map(|l| l.tree.root()).collect()
    }

    /// Open round `layer` at the folded `positions`.
    pub fn query_layer(&self, params: &FriParams, layer: usize, positions: &[usize]) -> crate::Result<FriProofLayer> {
        let l = self
            .layers
            .get(layer)
            .ok_or(Error::IndexOutOfRange { index: layer, size: self.layers.len() })?;
        let k = params.folding_factor;
        let groups = l.evaluations.len() / k;
        let query_values = positions
            .iter()
            .map(|&p| {
                l.evaluations
                    .get(p * k..(p + 1) * k)
                    .map(<[F]>::to_vec)
                    .ok_or(Error::IndexOutOfRange { index: p, size: groups })
            })
            .collect::<crate::Result<Vec<_>>>()?;
        let merkle_proof = l.tree.batch_proof(positions)?;
        Ok(FriProofLayer { query_values, merkle_proof })
    }

    /// Open every round along the paths of `positions` in a source domain of
    /// `source_size` points.
    #[instrument(skip_all, fields(queries = positions.len()), level = "debug")]
    pub fn build_proof(&self, params: &FriParams, positions: &[usize], source_size: usize) -> crate::Result<FriProof> {
        if let Some(&index) = positions.iter().find(|&&p| p >= source_size) {
            return Err(Error::IndexOutOfRange { index, size: source_size });
        }
        let mut size = source_size;
        let mut cur = positions.to_vec();
        let mut layers = Vec::with_capacity(self.layers.len());
        for layer in 0..self.layers.len() {
            cur = fold_positions(&cur, size, params.folding_factor);
            layers.push(self.query_layer(params, layer, &cur)?);
            size /= params.folding_factor;
        }
        Ok(FriProof { layers, remainder: self.remainder.clone() })
    }
}

/// Check one round: the batch proof against `root`, and that every queried
/// `evaluations[i]` sits at its slot inside the opened groups.
pub fn verify_layer(
    params: &FriParams,
    domain_size: usize,
    evaluations: &[F],
    positions: &[usize],
    root: F,
    layer: &FriProofLayer,
) -> bool {
    let k = params.folding_factor;
    let target = domain_size / k;
    if !target.is_power_of_two() || evaluations.len() != positions.len() {
        return false;
    }
    let levels = target.trailing_zeros() as usize;
    if layer.merkle_proof.len() != levels {
        debug!(expected = levels, got = layer.merkle_proof.len(), "fri layer: merkle proof has the wrong depth");
        return false;
    }
    let folded = fold_positions(positions, domain_size, k);
    if layer.query_values.len() != folded.len() || layer.query_values.iter().any(|g| g.len() != k) {
        debug!(expected = folded.len(), got = layer.query_values.len(), "fri layer: query shape mismatch");
        return false;
    }

    let leaves: Vec<LeafWithIndex> = folded
        .iter()
        .zip(&layer.query_values)
        .map(|(&index, group)| LeafWithIndex { index, data: hash_group(group) })
        .collect();
    if !batch_verify(&layer.merkle_proof, root, levels, &leaves, hash_pair) {
        debug!("fri layer: merkle batch proof rejected");
        return false;
    }

    let slot: HashMap<usize, usize> = folded.iter().enumerate().map(|(i, p)| (*p, i)).collect();
    for (&p, e) in positions.iter().zip(evaluations) {
        let Some(&group) = slot.get(&(p % target)) else {
            return false;
        };
        if layer.query_values[group].get(p / target) != Some(e) {
            debug!(position = p, "fri layer: queried value not in its group");
            return false;
        }
    }
    true
}

/// Fold the opened groups at `alpha`: interpolate group `i` over
/// `x·ρ^0, …, x·ρ^{k-1}` with `x = coset.element(folded[i])` and evaluate.
pub fn fold_query_values(
    coset: &Domain,
    fold_roots: &[F],
    folded: &[usize],
    alpha: F,
    query_values: &[Vec<F>],
) -> crate::Result<Vec<F>> {
    if folded.len() != query_values.len() {
        return Err(Error::LengthMismatch { expected: folded.len(), got: query_values.len() });
    }
    folded
        .par_iter()
        .zip(query_values.par_iter())
        .map(|(&p, ys)| -> crate::Result<F> {
            let x = coset.element(p);
            let xs: Vec<F> = fold_roots.iter().map(|r| *r * x).collect();
            Ok(Coefficients::interpolate(&xs, ys)?.evaluate(alpha))
        })
        .collect()
}

/// Whether `remainder` interpolates to a polynomial of degree at most `max_degree`.
pub fn verify_remainder(remainder: &[F], max_degree: usize) -> crate::Result<bool> {
    if max_degree + 1 >= remainder.len() {
        return Ok(true);
    }
    let degree = Coefficients(ifft(remainder)?).degree();
    if degree > max_degree {
        debug!(degree, max_degree, "fri remainder degree too large");
        return Ok(false);
    }
    Ok(true)
}

/// Check that `evaluations` at `positions` of a `domain_size`-point coset
/// come from a polynomial of degree at most `max_degree`.
///
/// Shape errors in the query set are reported as `Err`; a proof that does
/// not match the commitment yields `Ok(false)`.
#[instrument(skip_all, fields(domain_size = domain_size, max_degree = max_degree, queries = positions.len()), level = "debug")]
pub fn verify_fri(
    params: &FriParams,
    evaluations: &[F],
    positions: &[usize],
    domain_size: usize,
    max_degree: usize,
    commitment: &[F],
    proof: &FriProof,
) -> crate::Result<bool> {
    if evaluations.len() != positions.len() {
        return Err(Error::LengthMismatch { expected: positions.len(), got: evaluations.len() });
    }
    if positions.is_empty() {
        return Err(Error::EmptyInput("fri verification needs at least one query"));
    }
    if !domain_size.is_power_of_two() {
        return Err(Error::NotPowerOfTwo { len: domain_size });
    }
    if let Some(&index) = positions.iter().find(|&&p| p >= domain_size) {
        return Err(Error::IndexOutOfRange { index, size: domain_size });
    }

    let k = params.folding_factor;
    let num_layers = params.num_layers(domain_size);
    if proof.layers.len() != num_layers || commitment.len() != num_layers {
        debug!(num_layers, got = proof.layers.len(), "fri: wrong number of layers");
        return Ok(false);
    }
    if proof.remainder.len() != params.remainder_size(domain_size) {
        debug!(got = proof.remainder.len(), "fri: wrong remainder length");
        return Ok(false);
    }

    let fold_roots = Domain::new(k)?.elements();
    let mut size = domain_size;
    let mut offset = params.domain_offset;
    let mut positions = positions.to_vec();
    let mut evaluations = evaluations.to_vec();

    for (round, layer) in proof.layers.iter().enumerate() {
        if !verify_layer(params, size, &evaluations, &positions, commitment[round], layer) {
            debug!(round, "fri: layer rejected");
            return Ok(false);
        }
        let alpha = hash_points_and_scalars(&[], &commitment[..=round]);
        let folded = fold_positions(&positions, size, k);
        let coset = Domain::new_with_coset(size, offset)?;
        evaluations = fold_query_values(&coset, &fold_roots, &folded, alpha, &layer.query_values)?;
        positions = folded;
        size /= k;
        offset = pow_u64(offset, k as u64);
        trace!(round, size, "fri round verified");
    }

    for (p, e) in positions.iter().zip(&evaluations) {
        if proof.remainder.get(*p) != Some(e) {
            debug!(position = p, "fri: remainder disagrees with folded query");
            return Ok(false);
        }
    }

    let shrink = k.pow(num_layers as u32);
    let bound = (max_degree + 1).div_ceil(shrink) - 1;
    verify_remainder(&proof.remainder, bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::{One, UniformRand};
    use rand::{rngs::StdRng, SeedableRng};

    fn coset_evaluations(coeffs: &Coefficients, n: usize, offset: F) -> Vec<F> {
        coeffs.padded(n).compose_scaled(offset).to_evaluations().unwrap().0
    }

    fn random_poly(rng: &mut StdRng, len: usize) -> Coefficients {
        Coefficients((0..len).map(|_| F::rand(rng)).collect())
    }

    #[test]
    fn params_validation() {
        let g = F::from(7u64);
        assert!(matches!(FriParams::new(g, 17, 3), Err(Error::UnsupportedFoldingFactor(3))));
        assert!(matches!(FriParams::new(g, 3, 4), Err(Error::RemainderTooSmall { .. })));
        assert!(matches!(FriParams::new(F::zero(), 17, 4), Err(Error::ZeroDivisor(_))));

        let p = FriParams::new(g, 17, 4).unwrap();
        assert_eq!(p.num_layers(4096), 4);
        assert_eq!(p.remainder_size(4096), 16);
        assert_eq!(p.num_layers(16), 0);
        assert_eq!(p.remainder_size(16), 16);
    }

    #[test]
    fn transpose_layout() {
        let v: Vec<F> = (0..16u64).map(F::from).collect();
        let t = transpose(&v, 4).unwrap();
        assert_eq!(t.len(), 4);
        assert_eq!(t[1], vec![F::from(1u64), F::from(5u64), F::from(9u64), F::from(13u64)]);
        assert_eq!(detranspose(&t), v);
        assert!(transpose(&v[..15], 4).is_err());
    }

    #[test]
    fn fold_positions_keeps_first_occurrence() {
        assert_eq!(fold_positions(&[17, 1, 5, 33, 2], 64, 4), vec![1, 5, 2]);
    }

    #[test]
    fn folding_matches_coefficient_folding() {
        let mut rng = StdRng::seed_from_u64(71);
        let (n, k) = (256, 8);
        let offset = F::rand(&mut rng);
        let alpha = F::rand(&mut rng);
        let p = random_poly(&mut rng, n);

        let folded = fold_evaluations(&coset_evaluations(&p, n, offset), offset, alpha, k).unwrap();

        let mut alpha_pows = vec![F::one()];
        for _ in 1..k {
            alpha_pows.push(*alpha_pows.last().unwrap() * alpha);
        }
        let g = Coefficients(
            p.chunks(k)
                .map(|c| c.iter().zip(&alpha_pows).map(|(a, b)| *a * b).sum::<F>())
                .collect(),
        );
        let expected = coset_evaluations(&g, n / k, pow_u64(offset, k as u64));
        assert_eq!(folded, expected);
    }

    #[test]
    fn query_folding_agrees_with_prover_folding() {
        let mut rng = StdRng::seed_from_u64(72);
        let (n, k) = (1 << 10, 16);
        let offset = F::rand(&mut rng);
        let alpha = F::rand(&mut rng);
        let values: Vec<F> = (0..n).map(|_| F::rand(&mut rng)).collect();

        let folded = fold_evaluations(&values, offset, alpha, k).unwrap();
        let groups = transpose(&values, k).unwrap();
        let positions: Vec<usize> = (0..40).map(|i| (i * 13 + 13) % (n / k)).collect();
        let queries: Vec<Vec<F>> = positions.iter().map(|&p| groups[p].clone()).collect();
        let coset = Domain::new_with_coset(n, offset).unwrap();
        let roots = Domain::new(k).unwrap().elements();
        let got = fold_query_values(&coset, &roots, &positions, alpha, &queries).unwrap();
        for (p, v) in positions.iter().zip(got) {
            assert_eq!(folded[*p], v);
        }
    }

    #[test]
    fn single_layer_verifies() {
        let mut rng = StdRng::seed_from_u64(73);
        let n = 1 << 10;
        let params = FriParams::new(F::rand(&mut rng), 17, 16).unwrap();
        let values: Vec<F> = (0..n as u64).map(|i| F::from(i * 11 + 11)).collect();
        let prover = FriProver::build(&params, &values).unwrap();

        let positions: Vec<usize> = (0..400).map(|i| (i * 13 + 13) % n).collect();
        let evaluations: Vec<F> = positions.iter().map(|&p| values[p]).collect();
        let folded = fold_positions(&positions, n, 16);
        let layer = prover.query_layer(&params, 0, &folded).unwrap();
        let root = prover.commitment()[0];
        assert!(verify_layer(&params, n, &evaluations, &positions, root, &layer));

        let mut wrong = evaluations.clone();
        wrong[7] += F::one();
        assert!(!verify_layer(&params, n, &wrong, &positions, root, &layer));
    }

    #[test]
    fn layer_proof_depth_must_match_the_domain() {
        let mut rng = StdRng::seed_from_u64(76);
        let n = 64;
        let params = FriParams::new(F::rand(&mut rng), 2, 2).unwrap();
        let values: Vec<F> = (0..n).map(|_| F::rand(&mut rng)).collect();
        let prover = FriProver::build(&params, &values).unwrap();
        let root = prover.commitment()[0];

        let positions = [5usize, 37];
        let evaluations = [values[5], values[37]];
        let layer = prover.query_layer(&params, 0, &fold_positions(&positions, n, 2)).unwrap();
        assert_eq!(layer.merkle_proof.len(), 5);
        assert!(verify_layer(&params, n, &evaluations, &positions, root, &layer));

        let mut shallow = layer.clone();
        shallow.merkle_proof.remove(0);
        assert!(!verify_layer(&params, n, &evaluations, &positions, root, &shallow));
        let mut deep = layer;
        deep.merkle_proof.push(vec![]);
        assert!(!verify_layer(&params, n, &evaluations, &positions, root, &deep));
    }

    #[test]
    fn proof_survives_serialization() {
        let mut rng = StdRng::seed_from_u64(77);
        let n = 128;
        let params = FriParams::new(F::rand(&mut rng), 8, 4).unwrap();
        let values: Vec<F> = (0..n).map(|_| F::rand(&mut rng)).collect();
        let prover = FriProver::build(&params, &values).unwrap();
        let proof = prover.build_proof(&params, &[3, 77, 100], n).unwrap();

        let mut bytes = Vec::new();
        proof.serialize_compressed(&mut bytes).unwrap();
        assert_eq!(bytes.len(), proof.compressed_size());
        let back = FriProof::deserialize_compressed(&bytes[..]).unwrap();
        assert_eq!(back, proof);
    }

    #[test]
    fn low_degree_round_trip_and_tampering() {
        let mut rng = StdRng::seed_from_u64(74);
        let n = 256;
        let params = FriParams::new(F::rand(&mut rng), 16, 4).unwrap();
        let p = random_poly(&mut rng, 64);
        let values = coset_evaluations(&p, n, params.domain_offset);

        let prover = FriProver::build(&params, &values).unwrap();
        assert_eq!(prover.layers.len(), 2);
        assert_eq!(prover.remainder.len(), 16);

        let positions: Vec<usize> = (0..20).map(|i| (i * 37 + 5) % n).collect();
        let evaluations: Vec<F> = positions.iter().map(|&i| values[i]).collect();
        let proof = prover.build_proof(&params, &positions, n).unwrap();
        let commitment = prover.commitment();
        assert!(verify_fri(&params, &evaluations, &positions, n, 63, &commitment, &proof).unwrap());

        let mut bad = proof.clone();
        bad.layers[1].query_values[0][0] += F::one();
        assert!(!verify_fri(&params, &evaluations, &positions, n, 63, &commitment, &bad).unwrap());

        let mut bad = proof.clone();
        bad.remainder[0] += F::one();
        assert!(!verify_fri(&params, &evaluations, &positions, n, 63, &commitment, &bad).unwrap());

        let mut short = proof.clone();
        short.layers.pop();
        assert!(!verify_fri(&params, &evaluations, &positions, n, 63, &commitment, &short).unwrap());

        let mut other = commitment.clone();
        other[0] += F::one();
        assert!(!verify_fri(&params, &evaluations, &positions, n, 63, &other, &proof).unwrap());
    }

    #[test]
    fn verifier_shape_errors() {
        let params = FriParams::new(F::from(5u64), 16, 4).unwrap();
        let proof = FriProof { layers: vec![], remainder: vec![F::zero(); 16] };
        assert!(matches!(
            verify_fri(&params, &[F::zero()], &[0, 1], 16, 3, &[], &proof),
            Err(Error::LengthMismatch { .. })
        ));
        assert!(matches!(
            verify_fri(&params, &[F::zero()], &[16], 16, 3, &[], &proof),
            Err(Error::IndexOutOfRange { index: 16, .. })
        ));
        assert!(matches!(
            verify_fri(&params, &[F::zero()], &[0], 24, 3, &[], &proof),
            Err(Error::NotPowerOfTwo { len: 24 })
        ));
    }

    #[test]
    fn remainder_degree_check() {
        let mut rng = StdRng::seed_from_u64(75);
        let p = random_poly(&mut rng, 4);
        let evals = coset_evaluations(&p, 16, F::one());
        assert!(verify_remainder(&evals, 3).unwrap());
        assert!(!verify_remainder(&evals, 2).unwrap());
        assert!(verify_remainder(&evals, 15).unwrap());
    }
}
