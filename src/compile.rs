//! Compiles a [`Trie`] into a flat, pre-order array of [`RadixNode`]s.
//!
//! A trie node earns its own slot only if it branches, holds a value, or is
//! a leaf. Every unbranched, valueless chain is folded into the skip count
//! (`key_length`) of the slot that starts it.

use std::{borrow::Borrow, slice};

use thiserror::Error;

use crate::{
    node::{MAX_KEY_LENGTH, MAX_NODES, NO_VALUE, RadixNode},
    trie::{InsertErr, Trie, TrieNode},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileErr {
    #[error("compiled tree needs {0} nodes, exceeding the 16-bit index space")]
    CapacityExceeded(usize),

    #[error("compacted prefix of {0} bytes does not fit in a 16-bit skip count")]
    SkipOverflow(usize),

    #[error("value 0xffff is reserved to mark empty slots")]
    ReservedValue,

    #[error("output holds {available} nodes but {required} are required")]
    Length { required: usize, available: usize },

    #[error("out of memory")]
    OutOfMemory,
}

impl From<InsertErr> for CompileErr {
    fn from(err: InsertErr) -> Self {
        match err {
            InsertErr::OutOfMemory => CompileErr::OutOfMemory,
        }
    }
}

/// Follows the unbranched, valueless chain starting at `node`. Returns the
/// node the chain ends at and the number of edges folded.
#[inline]
fn compact<V>(mut node: &TrieNode<V>) -> (&TrieNode<V>, usize) {
    let mut skip = 0;
    while node.children().len() == 1 && node.value().is_none() {
        node = &node.children()[0];
        skip += 1;
    }
    (node, skip)
}

/// Returns the exact number of slots [`serialize`] will write for `trie`.
pub fn required_size<V>(trie: &Trie<V>) -> usize {
    let mut count = 0;
    let mut stack = vec![trie.root()];
    while let Some(node) = stack.pop() {
        count += 1;
        let (end, _) = compact(node);
        stack.extend(end.children());
    }
    count
}

struct Frame<'a, V> {
    slot: usize,
    children: slice::Iter<'a, TrieNode<V>>,
}

/// Writes `node` into the next free slot and returns the children which
/// still need emitting.
fn emit<'a, V: Borrow<u16>>(
    node: &'a TrieNode<V>,
    out: &mut [RadixNode],
    cursor: &mut usize,
) -> Result<slice::Iter<'a, TrieNode<V>>, CompileErr> {
    let (end, skip) = compact(node);
    if skip > MAX_KEY_LENGTH {
        return Err(CompileErr::SkipOverflow(skip));
    }
    let value = end.value().map(|v| *Borrow::<u16>::borrow(v));
    if value == Some(NO_VALUE) {
        return Err(CompileErr::ReservedValue);
    }

    out[*cursor] = RadixNode::new(node.key(), skip as u16, value);
    *cursor += 1;
    Ok(end.children().iter())
}

/// Serializes `trie` into `out` in a single depth-first pre-order pass and
/// returns the number of slots written.
///
/// `out` must hold at least [`required_size`] slots. Each slot's tree size is
/// back-patched once its children are written, so a lookup can step over a
/// whole subtree at once.
pub fn serialize<V: Borrow<u16>>(
    trie: &Trie<V>,
    out: &mut [RadixNode],
) -> Result<usize, CompileErr> {
    let required = required_size(trie);
    if required > MAX_NODES {
        return Err(CompileErr::CapacityExceeded(required));
    }
    if out.len() < required {
        return Err(CompileErr::Length { required, available: out.len() });
    }

    let mut cursor = 0;
    let children = emit(trie.root(), out, &mut cursor)?;
    let mut stack = vec![Frame { slot: 0, children }];

    while let Some(frame) = stack.last_mut() {
        let slot = frame.slot;
        match frame.children.next() {
            Some(child) => {
                let slot = cursor;
                let children = emit(child, out, &mut cursor)?;
                stack.push(Frame { slot, children });
            }
            None => {
                stack.pop();
                // cursor <= MAX_NODES, so the difference always fits
                out[slot].set_tree_size((cursor - slot - 1) as u16);
            }
        }
    }

    debug_assert_eq!(cursor, required);
    Ok(cursor)
}

/// Allocates an array of exactly [`required_size`] slots and serializes
/// `trie` into it.
pub(crate) fn compile<V: Borrow<u16>>(trie: &Trie<V>) -> Result<Box<[RadixNode]>, CompileErr> {
    let required = required_size(trie);
    if required > MAX_NODES {
        return Err(CompileErr::CapacityExceeded(required));
    }

    let mut nodes = Vec::new();
    nodes
        .try_reserve_exact(required)
        .map_err(|_| CompileErr::OutOfMemory)?;
    nodes.resize(required, RadixNode::EMPTY);

    let written = serialize(trie, &mut nodes)?;
    tracing::debug!(
        trie_nodes = trie.node_count(),
        keys = trie.len(),
        radix_nodes = written,
        "compiled radix tree"
    );
    Ok(nodes.into_boxed_slice())
}

/// Builds a temporary trie from `entries`, compiles it and discards the trie.
pub fn build_from_entries<K, I>(entries: I) -> Result<Box<[RadixNode]>, CompileErr>
where
    K: AsRef<[u8]>,
    I: IntoIterator<Item = (K, u16)>,
{
    let mut trie = Trie::new();
    for (key, value) in entries {
        trie.add(key, value)?;
    }
    compile(&trie)
}
