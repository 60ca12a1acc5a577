use std::{fmt::Debug, ops::Deref};

use bytes::{BufMut, Bytes};
use zerocopy::FromBytes;

use crate::{
    RadixRead, RadixTree,
    codec::{DecodeErr, Encodable, encoder::Encoder, footer::Footer},
    node::{MAX_NODES, RadixNode},
    router,
};

/// A zero-copy view over an encoded [`RadixTree`].
///
/// `from_bytes` validates the footer and the pre-order layout once, after
/// which lookups read the records in place.
#[derive(Clone)]
pub struct RadixTreeRef<B> {
    pub(crate) data: B,
}

impl<B: Deref<Target = [u8]>> Debug for RadixTreeRef<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RadixTreeRef")
            .field(&self.load_unchecked())
            .finish()
    }
}

impl<B> RadixTreeRef<B> {
    #[inline]
    pub fn inner(&self) -> &B {
        &self.data
    }

    #[inline]
    pub fn into_inner(self) -> B {
        self.data
    }

    /// Wraps bytes produced by [`Encodable::encode_to_bytes`] on a
    /// [`RadixTree`] without validating them.
    #[inline]
    pub(crate) fn from_encoded(data: B) -> Self {
        Self { data }
    }
}

impl RadixTreeRef<Bytes> {
    #[inline]
    pub fn encode_to_bytes(&self) -> Bytes {
        self.data.clone()
    }
}

impl<B: Deref<Target = [u8]>> Encodable for RadixTreeRef<B> {
    #[inline]
    fn encoded_size(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn encode<T: BufMut>(&self, encoder: &mut Encoder<T>) {
        encoder.write_tree(&self.data);
    }
}

impl<B: Deref<Target = [u8]>> RadixTreeRef<B> {
    /// Copies the records out into an owned [`RadixTree`].
    pub fn decode_to_tree(&self) -> RadixTree {
        RadixTree::from_nodes(self.load_unchecked().into())
    }

    pub fn from_bytes(data: B) -> Result<Self, DecodeErr> {
        if data.len() < Footer::SIZE {
            return Err(DecodeErr::Length);
        }
        let (records, footer) = data.split_at(data.len() - Footer::SIZE);
        let node_count = Footer::ref_from_bytes(footer)?.validate(records)?;

        let nodes = <[RadixNode]>::ref_from_bytes(records)?;
        if nodes.len() != node_count {
            return Err(DecodeErr::Validity);
        }
        validate_layout(nodes)?;
        tracing::debug!(radix_nodes = nodes.len(), "decoded radix tree");
        Ok(Self { data })
    }

    pub(crate) fn load_unchecked(&self) -> &[RadixNode] {
        let records = &self.data[..(self.data.len() - Footer::SIZE)];
        // records were validated by from_bytes or written by RadixTree
        <[RadixNode]>::ref_from_bytes(records).unwrap()
    }
}

/// Checks that the root spans every record and that each slot's immediate
/// children exactly tile its subtree.
fn validate_layout(nodes: &[RadixNode]) -> Result<(), DecodeErr> {
    let Some(root) = nodes.first() else {
        return Err(DecodeErr::Length);
    };
    if nodes.len() > MAX_NODES || root.tree_size() + 1 != nodes.len() {
        return Err(DecodeErr::Validity);
    }

    for (slot, node) in nodes.iter().enumerate() {
        let end = slot + node.tree_size() + 1;
        if end > nodes.len() {
            return Err(DecodeErr::Validity);
        }
        let mut child = slot + 1;
        while child < end {
            child += nodes[child].tree_size() + 1;
        }
        if child != end {
            return Err(DecodeErr::Validity);
        }
    }
    Ok(())
}

impl<B: Deref<Target = [u8]>> RadixRead for RadixTreeRef<B> {
    #[inline]
    fn search(&self, query: impl AsRef<[u8]>) -> Option<u16> {
        router::search(self.load_unchecked(), query.as_ref())
    }

    #[inline]
    fn node_count(&self) -> usize {
        self.load_unchecked().len()
    }
}

impl<B: Deref<Target = [u8]>> PartialEq<RadixTree> for RadixTreeRef<B> {
    #[inline]
    fn eq(&self, other: &RadixTree) -> bool {
        self.load_unchecked() == other.nodes()
    }
}

impl<B: Deref<Target = [u8]>> PartialEq<RadixTreeRef<B>> for RadixTree {
    #[inline]
    fn eq(&self, other: &RadixTreeRef<B>) -> bool {
        other == self
    }
}

impl<B: Deref<Target = [u8]>, B2: Deref<Target = [u8]>> PartialEq<RadixTreeRef<B2>>
    for RadixTreeRef<B>
{
    fn eq(&self, other: &RadixTreeRef<B2>) -> bool {
        self.load_unchecked() == other.load_unchecked()
    }
}
