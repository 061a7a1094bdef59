//! Fiat–Shamir transcript (Keccak-256 over contract-ABI words)
//!
//! Challenges must be reproducible by an on-chain verifier, so the encoding
//! is pinned to what Solidity's `keccak256(abi.encode(uint256[] input))`
//! hashes:
//!
//! ```text
//!   input  = [X_1, Y_1, X_2, Y_2, …, s_1, s_2, …]     (points first, then scalars)
//!   bytes  = 0x20 ‖ len(input) ‖ input[0] ‖ input[1] ‖ …   (each a 32-byte BE word)
//!   c      = uint256(keccak256(bytes)) mod r
//! ```
//!
//! G1 points enter as their affine coordinates in canonical big-endian form;
//! the point at infinity encodes as `(0, 0)`. Scalars enter as canonical
//! (non-Montgomery) big-endian integers.

#![forbid(unsafe_code)]

use ark_ec::AffineRepr;
use ark_ff::{BigInteger, PrimeField};
use tiny_keccak::{Hasher, Keccak};

use crate::{F, G1};

/// One 32-byte ABI word.
pub type Word = [u8; 32];

/// Keccak-256 of `bytes`.
pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(bytes);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// Canonical big-endian word of any prime-field element.
fn field_word<P: PrimeField>(x: &P) -> Word {
    let bytes = x.into_bigint().to_bytes_be();
    let mut w = [0u8; 32];
    // BN254 base and scalar fields both fit in 256 bits.
    w[32 - bytes.len()..].copy_from_slice(&bytes);
    w
}

/// Affine `(X, Y)` words of a G1 point; infinity maps to `(0, 0)`.
pub fn point_words(p: &G1) -> [Word; 2] {
    if p.is_zero() {
        return [[0u8; 32]; 2];
    }
    [field_word(&p.x), field_word(&p.y)]
}

/// Canonical word of a scalar.
pub fn scalar_word(s: &F) -> Word {
    field_word(s)
}

/// `abi.encode(uint256[])`: head offset, length, then the words.
pub fn abi_encode_words(words: &[Word]) -> Vec<u8> {
    let mut out = Vec::with_capacity(32 * (words.len() + 2));
    let mut offset = [0u8; 32];
    offset[31] = 0x20;
    out.extend_from_slice(&offset);
    let mut len = [0u8; 32];
    len[24..].copy_from_slice(&(words.len() as u64).to_be_bytes());
    out.extend_from_slice(&len);
    for w in words {
        out.extend_from_slice(w);
    }
    out
}

/// Hash an ordered list of G1 points followed by an ordered list of scalars.
pub fn hash_points_and_scalars(points: &[G1], scalars: &[F]) -> F {
    let mut t = Transcript::new();
    for p in points {
        t.absorb_point(p);
    }
    for s in scalars {
        t.absorb_scalar(s);
    }
    t.challenge()
}

/// Merkle node hash: `H([], [left, right])`.
pub fn hash_pair(left: F, right: F) -> F {
    hash_points_and_scalars(&[], &[left, right])
}

/// Fiat–Shamir transcript over points and scalars.
///
/// Points and scalars are kept in separate queues; the encoding always lists
/// every point before every scalar, whatever the absorb order, because that
/// is the shape the external verifier hashes.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    points: Vec<Word>,
    scalars: Vec<Word>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb a G1 point as its two affine coordinate words.
    pub fn absorb_point(&mut self, p: &G1) {
        self.points.extend_from_slice(&point_words(p));
    }

    /// Absorb a PCS commitment.
    pub fn absorb_commitment(&mut self, c: &crate::kzg::Commitment) {
        self.absorb_point(&c.0);
    }

    /// Absorb a scalar.
    pub fn absorb_scalar(&mut self, s: &F) {
        self.scalars.push(scalar_word(s));
    }

    /// Encoded transcript bytes (what gets hashed).
    pub fn encode(&self) -> Vec<u8> {
        let words: Vec<Word> = self.points.iter().chain(self.scalars.iter()).copied().collect();
        abi_encode_words(&words)
    }

    /// Derive the challenge for the current state.
    ///
    /// Deriving does not consume or reset the transcript, so the same state
    /// always yields the same challenge.
    pub fn challenge(&self) -> F {
        F::from_be_bytes_mod_order(&keccak256(&self.encode()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn keccak_empty_input() {
        assert_eq!(
            keccak256(&[]),
            hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
        );
    }

    #[test]
    fn abi_layout_of_scalar_array() {
        let bytes = abi_encode_words(&[scalar_word(&F::from(5u64)), scalar_word(&F::from(258u64))]);
        assert_eq!(bytes.len(), 4 * 32);
        assert_eq!(bytes[31], 0x20);
        assert_eq!(bytes[63], 2);
        assert_eq!(bytes[95], 5);
        assert_eq!(&bytes[126..128], &[1, 2]);
        assert!(bytes[..31].iter().all(|b| *b == 0));
    }

    #[test]
    fn generator_encodes_as_one_two() {
        let [x, y] = point_words(&G1::generator());
        assert_eq!(x[31], 1);
        assert_eq!(y[31], 2);
        assert!(x[..31].iter().chain(y[..31].iter()).all(|b| *b == 0));
        assert_eq!(point_words(&G1::zero()), [[0u8; 32]; 2]);
    }

    #[test]
    fn points_always_precede_scalars() {
        let g = G1::generator();
        let s = F::from(9u64);
        let mut a = Transcript::new();
        a.absorb_scalar(&s);
        a.absorb_point(&g);
        let mut b = Transcript::new();
        b.absorb_point(&g);
        b.absorb_scalar(&s);
        assert_eq!(a.encode(), b.encode());
        assert_eq!(a.challenge(), hash_points_and_scalars(&[g], &[s]));
        assert_ne!(a.challenge(), hash_points_and_scalars(&[], &[s]));
    }

    #[test]
    fn merkle_pair_hash_is_order_sensitive() {
        let l = F::from(1u64);
        let r = F::from(2u64);
        assert_ne!(hash_pair(l, r), hash_pair(r, l));
        assert_eq!(hash_pair(l, r), hash_points_and_scalars(&[], &[l, r]));
    }
}
