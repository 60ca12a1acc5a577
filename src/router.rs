use std::{borrow::Borrow, fmt::Debug};

use bytes::BufMut;

use crate::{
    Encodable, RadixRead, RadixTreeRef,
    codec::{self, encoder::Encoder},
    compile::{self, CompileErr},
    node::RadixNode,
    trie::Trie,
};

/// Looks up `query` in a compiled, pre-order slot array.
///
/// Bytes folded into a slot's skip count are trusted rather than compared,
/// so a query which differs from a stored key only inside a folded chain
/// resolves to that key's value. Every branching byte is compared, and the
/// query must be consumed exactly.
pub fn search(nodes: &[RadixNode], query: &[u8]) -> Option<u16> {
    let mut current = 0;
    let mut cursor = 0;

    loop {
        let node = nodes.get(current)?;
        cursor += node.key_length();

        if cursor == query.len() {
            return node.value();
        }
        if cursor > query.len() {
            return None;
        }

        // scan the immediate children, stepping over each subtree; a leaf
        // has none, so an unmatched suffix ends the search here
        let next = query[cursor];
        let end = current + node.tree_size() + 1;
        let mut child = current + 1;
        current = loop {
            if child >= end {
                return None;
            }
            let candidate = nodes.get(child)?;
            if candidate.character() == next {
                break child;
            }
            child += candidate.tree_size() + 1;
        };

        cursor += 1;
    }
}

/// A compiled, immutable radix tree.
///
/// Lookups never mutate the tree, so a `RadixTree` can be shared freely
/// between readers.
///
/// # Examples
///
/// ```
/// use radix_router::{RadixRead, RadixTree};
///
/// let tree = RadixTree::from_entries([
///     ("/api/user", 1),
///     ("/api/user/login", 2),
///     ("/api/user/create", 3),
/// ])
/// .unwrap();
///
/// assert_eq!(tree.search("/api/user"), Some(1));
/// assert_eq!(tree.search("/api/user/login"), Some(2));
/// assert_eq!(tree.search("/api/users"), None);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct RadixTree {
    nodes: Box<[RadixNode]>,
}

impl RadixTree {
    /// Compiles `trie` into a new tree. The trie may be dropped afterwards.
    pub fn from_trie<V: Borrow<u16>>(trie: &Trie<V>) -> Result<Self, CompileErr> {
        Ok(Self { nodes: compile::compile(trie)? })
    }

    /// Compiles a tree straight from `(key, value)` pairs. Later duplicates
    /// replace earlier ones.
    pub fn from_entries<K, I>(entries: I) -> Result<Self, CompileErr>
    where
        K: AsRef<[u8]>,
        I: IntoIterator<Item = (K, u16)>,
    {
        Ok(Self { nodes: compile::build_from_entries(entries)? })
    }

    #[inline]
    pub fn nodes(&self) -> &[RadixNode] {
        &self.nodes
    }

    /// Releases the slot array.
    pub fn destroy(self) {}

    /// Encodes this tree into a [`RadixTreeRef`] for zero-copy lookups.
    pub fn encode_to_tree_ref(&self) -> RadixTreeRef<bytes::Bytes> {
        RadixTreeRef::from_encoded(self.encode_to_bytes())
    }

    pub(crate) fn from_nodes(nodes: Box<[RadixNode]>) -> Self {
        Self { nodes }
    }
}

impl RadixRead for RadixTree {
    #[inline]
    fn search(&self, query: impl AsRef<[u8]>) -> Option<u16> {
        search(&self.nodes, query.as_ref())
    }

    #[inline]
    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Encodable for RadixTree {
    fn encoded_size(&self) -> usize {
        codec::encoded_size(self.nodes.len())
    }

    fn encode<B: BufMut>(&self, encoder: &mut Encoder<B>) {
        encoder.put_nodes(&self.nodes);
        encoder.write_footer();
    }
}

impl Debug for RadixTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.nodes.iter()).finish()
    }
}
