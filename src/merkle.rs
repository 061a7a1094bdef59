//! Fixed-height Merkle tree over scalars
//!
//! A complete binary tree with `2^levels` leaf slots. Every layer is allocated
//! up front and pre-filled with the hash of an empty subtree of that height:
//!
//! ```text
//!   zeros[0] = zero element
//!   zeros[l] = hash(zeros[l-1], zeros[l-1])
//! ```
//!
//! so unfilled slots never need special casing. Leaves are appended in order
//! (`insert`, `bulk_insert`) or overwritten in place (`update`); each mutation
//! rehashes one root path.
//!
//! Batch proofs list, per level, the siblings of the current node set that the
//! verifier cannot compute itself. Two queried nodes that are siblings of one
//! another consume each other and need no proof entry.

#![forbid(unsafe_code)]

use ark_ff::Zero;
use tracing::debug;

use crate::{
    error::{Error, Result},
    transcript::hash_pair,
    F,
};

/// Two-to-one node hash.
pub type HashFn = fn(F, F) -> F;

/// Per-level sibling lists of a batch proof, leaf level first.
pub type BatchProof = Vec<Vec<F>>;

/// Authentication path of a single leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerklePath {
    /// Sibling at each level, leaf level first.
    pub path_elements: Vec<F>,
    /// `0` if the node at that level is a left child, `1` if right.
    pub path_indices: Vec<u8>,
    /// Root the path was produced against.
    pub path_root: F,
}

/// Leaf value paired with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafWithIndex {
    /// Leaf position.
    pub index: usize,
    /// Leaf value.
    pub data: F,
}

/// Fixed-capacity Merkle tree.
#[derive(Debug, Clone)]
pub struct FixedMerkleTree {
    levels: usize,
    hash: HashFn,
    zeros: Vec<F>,
    /// `layers[l]` holds `2^(levels - l)` nodes; `layers[levels]` is the root.
    layers: Vec<Vec<F>>,
    len: usize,
}

impl FixedMerkleTree {
    /// Empty tree with the transcript pair hash.
    pub fn new(levels: usize) -> Result<Self> {
        Self::with_hash(levels, hash_pair)
    }

    /// Empty tree with a custom node hash.
    pub fn with_hash(levels: usize, hash: HashFn) -> Result<Self> {
        if levels >= usize::BITS as usize - 1 {
            return Err(Error::MalformedParams("merkle tree height exceeds the address space"));
        }
        let mut zeros = Vec::with_capacity(levels + 1);
        zeros.push(F::zero());
        for l in 1..=levels {
            zeros.push(hash(zeros[l - 1], zeros[l - 1]));
        }
        let layers = (0..=levels).map(|l| vec![zeros[l]; 1 << (levels - l)]).collect();
        Ok(Self { levels, hash, zeros, layers, len: 0 })
    }

    /// Tree holding `elements` as its first leaves.
    pub fn with_elements(levels: usize, elements: &[F], hash: HashFn) -> Result<Self> {
        let mut tree = Self::with_hash(levels, hash)?;
        tree.bulk_insert(elements)?;
        Ok(tree)
    }

    /// Height of the tree.
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Number of leaf slots, `2^levels`.
    pub fn capacity(&self) -> usize {
        1 << self.levels
    }

    /// Number of filled leaves.
    pub fn len(&self) -> usize {
        self.len
    }

    /// No leaves filled yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current root.
    pub fn root(&self) -> F {
        self.layers[self.levels][0]
    }

    /// Empty-subtree hashes per level.
    pub fn zeros(&self) -> &[F] {
        &self.zeros
    }

    /// Filled leaves in order.
    pub fn elements(&self) -> &[F] {
        &self.layers[0][..self.len]
    }

    /// Append one leaf.
    pub fn insert(&mut self, element: F) -> Result<()> {
        if self.len >= self.capacity() {
            return Err(Error::TreeFull { capacity: self.capacity() });
        }
        self.update(self.len, element)
    }

    /// Append many leaves, rehashing each interior node once.
    pub fn bulk_insert(&mut self, elements: &[F]) -> Result<()> {
        let Some((last, init)) = elements.split_last() else {
            return Ok(());
        };
        if self.len + elements.len() > self.capacity() {
            return Err(Error::TreeFull { capacity: self.capacity() });
        }
        // Only complete subtrees are hashed here; the final insert rehashes
        // the right frontier up to the root.
        for &e in init {
            let mut index = self.len;
            self.layers[0][index] = e;
            self.len += 1;
            let mut level = 0;
            while index % 2 == 1 {
                level += 1;
                index >>= 1;
                let below = &self.layers[level - 1];
                let node = (self.hash)(below[2 * index], below[2 * index + 1]);
                self.layers[level][index] = node;
            }
        }
        self.insert(*last)
    }

    /// Overwrite leaf `index`, or append when `index == len()`.
    pub fn update(&mut self, index: usize, element: F) -> Result<()> {
        if index >= self.capacity() {
            return Err(Error::IndexOutOfRange { index, size: self.capacity() });
        }
        if index > self.len {
            return Err(Error::IndexOutOfRange { index, size: self.len });
        }
        self.layers[0][index] = element;
        if index == self.len {
            self.len += 1;
        }
        let mut index = index;
        for level in 1..=self.levels {
            index >>= 1;
            let below = &self.layers[level - 1];
            let node = (self.hash)(below[2 * index], below[2 * index + 1]);
            self.layers[level][index] = node;
        }
        Ok(())
    }

    /// Position of the first leaf equal to `element`.
    pub fn index_of(&self, element: F) -> Option<usize> {
        self.elements().iter().position(|e| *e == element)
    }

    /// Path of the first leaf equal to `element`.
    pub fn proof(&self, element: F) -> Option<MerklePath> {
        self.index_of(element).and_then(|i| self.path(i).ok())
    }

    /// Authentication path of leaf `index`.
    pub fn path(&self, index: usize) -> Result<MerklePath> {
        if index >= self.len {
            return Err(Error::IndexOutOfRange { index, size: self.len });
        }
        let mut path_elements = Vec::with_capacity(self.levels);
        let mut path_indices = Vec::with_capacity(self.levels);
        let mut i = index;
        for level in 0..self.levels {
            path_indices.push((i % 2) as u8);
            path_elements.push(self.layers[level][i ^ 1]);
            i >>= 1;
        }
        Ok(MerklePath { path_elements, path_indices, path_root: self.root() })
    }

    /// Compressed proof for a set of leaf positions.
    pub fn batch_proof(&self, indexes: &[usize]) -> Result<BatchProof> {
        if let Some(&index) = indexes.iter().find(|&&i| i >= self.capacity()) {
            return Err(Error::IndexOutOfRange { index, size: self.capacity() });
        }
        let mut cur = indexes.to_vec();
        cur.sort_unstable();
        cur.dedup();

        let mut proof = Vec::with_capacity(self.levels);
        for level in 0..self.levels {
            let mut layer = Vec::new();
            for (k, &i) in cur.iter().enumerate() {
                let sibling = i ^ 1;
                let left_is_sibling = k > 0 && cur[k - 1] == sibling;
                let right_is_sibling = k + 1 < cur.len() && cur[k + 1] == sibling;
                if !left_is_sibling && !right_is_sibling {
                    layer.push(self.layers[level][sibling]);
                }
            }
            proof.push(layer);
            cur = cur.iter().map(|i| i >> 1).collect();
            cur.dedup();
        }
        Ok(proof)
    }
}

/// `index` addresses a leaf of a tree with `levels` levels.
fn leaf_in_range(index: usize, levels: usize) -> bool {
    levels >= usize::BITS as usize || index < 1 << levels
}

/// Replay a single authentication path of a tree with `levels` levels.
pub fn verify(path: &MerklePath, root: F, levels: usize, index: usize, leaf: F, hash: HashFn) -> bool {
    if path.path_root != root
        || path.path_elements.len() != levels
        || path.path_indices.len() != levels
        || !leaf_in_range(index, levels)
    {
        debug!(index, levels, "merkle path has the wrong shape");
        return false;
    }
    let mut cur = leaf;
    let mut i = index;
    for (sibling, bit) in path.path_elements.iter().zip(&path.path_indices) {
        if *bit as usize != i % 2 {
            return false;
        }
        cur = if *bit == 0 { hash(cur, *sibling) } else { hash(*sibling, cur) };
        i >>= 1;
    }
    cur == path.path_root
}

/// Check a [`BatchProof`] for `leaves` against the root of a tree with
/// `levels` levels.
///
/// Repeated positions are accepted only if they carry the same value.
pub fn batch_verify(proof: &BatchProof, root: F, levels: usize, leaves: &[LeafWithIndex], hash: HashFn) -> bool {
    if proof.len() != levels {
        debug!(expected = levels, got = proof.len(), "batch merkle proof has the wrong depth");
        return false;
    }
    if let Some(leaf) = leaves.iter().find(|l| !leaf_in_range(l.index, levels)) {
        debug!(index = leaf.index, levels, "batch merkle proof: leaf index out of range");
        return false;
    }
    let mut nodes = leaves.to_vec();
    nodes.sort_by_key(|n| n.index);
    if nodes.windows(2).any(|w| w[0].index == w[1].index && w[0].data != w[1].data) {
        debug!("batch merkle proof: conflicting values for one leaf");
        return false;
    }
    nodes.dedup();
    if nodes.is_empty() {
        return false;
    }

    for (level, layer) in proof.iter().enumerate() {
        let mut parents = Vec::with_capacity(nodes.len());
        let mut k = 0;
        let mut used = 0;
        while k < nodes.len() {
            let node = nodes[k];
            let data = match nodes.get(k + 1) {
                Some(next) if next.index == node.index ^ 1 => {
                    k += 2;
                    hash(node.data, next.data)
                }
                _ => {
                    let Some(&sibling) = layer.get(used) else {
                        debug!(level, "batch merkle proof ran out of siblings");
                        return false;
                    };
                    used += 1;
                    k += 1;
                    if node.index % 2 == 0 {
                        hash(node.data, sibling)
                    } else {
                        hash(sibling, node.data)
                    }
                }
            };
            parents.push(LeafWithIndex { index: node.index >> 1, data });
        }
        if used != layer.len() {
            debug!(level, "batch merkle proof has unused siblings");
            return false;
        }
        nodes = parents;
    }
    nodes.len() == 1 && nodes[0].index == 0 && nodes[0].data == root
}
