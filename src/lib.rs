//! Public surface & core types
//!
//! Non-interactive argument building blocks over BN254:
//!
//! - KZG commitments to vectors over a power-of-two subgroup, with openings at
//!   domain points ([`kzg`]) and at arbitrary field points ([`opening`]).
//! - Pedersen commitments with a proof of opening ([`pedersen`]).
//! - Caulk single-element private openings ([`caulk`]) built on the
//!   root-of-unity argument in [`unity`].
//! - Aggregated multi-point KZG openings ([`multiproof`]).
//! - A fixed-height Merkle tree ([`merkle`]) and the FRI low-degree test on
//!   top of it ([`fri`]).
//!
//! ## Transcript (Public Contract)
//!
//! Every Fiat–Shamir challenge is Keccak-256 over the Solidity ABI encoding of
//! a single `uint256[]`: G1 coordinates first, then scalars, reduced mod `r`.
//! See [`transcript`] for the exact byte layout. Proof objects are plain
//! `CanonicalSerialize` structs and are never mutated after a prover returns.
//!
//! ## Errors
//!
//! Provers and setup return [`Result`]. Verifiers return `bool` for a proof
//! that fails to check; those that take indexes or sizes return
//! `Result<bool>` so malformed queries surface as [`Error`].

#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms)]

/// Precondition errors shared by every module.
pub mod error;
/// Domain & transforms (vanishing polynomial X^N - c, radix-2 NTT/IFFT).
pub mod domain;
/// Coefficient and evaluation form polynomials.
pub mod polynomial;
/// Fiat–Shamir transcript (Keccak-256 over ABI words, hash→field).
pub mod transcript;
/// KZG structured reference string and derived tables.
pub mod srs;
/// KZG commit / open / verify at domain points.
pub mod kzg;
/// KZG openings at points outside the domain.
pub mod opening;
/// Pedersen commitments and proof of opening.
pub mod pedersen;
/// Root-of-unity argument for a committed linear polynomial.
pub mod unity;
/// Caulk single opening (full and mock).
pub mod caulk;
/// Aggregated multi-point KZG openings.
pub mod multiproof;
/// Fixed-height Merkle tree with single and batch proofs.
pub mod merkle;
/// FRI folding prover and verifier.
pub mod fri;

pub use error::{Error, Result};
pub use kzg::Commitment;
pub use polynomial::{Coefficients, Evaluations};
pub use srs::KzgParams;

/// Scalar field of BN254.
pub type F = ark_bn254::Fr;

/// G1 affine group element used for commitments.
pub type G1 = ark_bn254::G1Affine;

/// G2 affine group element.
pub type G2 = ark_bn254::G2Affine;
