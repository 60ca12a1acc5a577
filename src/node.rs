use std::fmt::Debug;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, LittleEndian, U16, Unaligned};

/// Reserved value marking a slot which carries no payload.
pub const NO_VALUE: u16 = u16::MAX;

/// The largest number of slots a compiled tree may contain.
pub const MAX_NODES: usize = u16::MAX as usize;

/// The largest number of bytes a single slot may skip.
pub const MAX_KEY_LENGTH: usize = u16::MAX as usize;

/// One slot of a compiled radix tree.
///
/// Slots are stored in pre-order. A slot at position `i` with a tree size of
/// `s` owns positions `[i+1, i+s]`; its immediate children are found by
/// repeatedly stepping over `child.tree_size() + 1` slots.
///
/// The record is exactly eight bytes: character, tree size, key length,
/// value (all little-endian) and one byte of padding.
#[derive(Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, Unaligned, KnownLayout)]
#[repr(C)]
pub struct RadixNode {
    character: u8,
    tree_size: U16<LittleEndian>,
    key_length: U16<LittleEndian>,
    value: U16<LittleEndian>,
    _padding: [u8; 1],
}

static_assertions::const_assert_eq!(std::mem::size_of::<RadixNode>(), 8);

impl RadixNode {
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// An unused slot, suitable for pre-allocating output arrays.
    pub const EMPTY: Self = Self {
        character: 0,
        tree_size: U16::ZERO,
        key_length: U16::ZERO,
        value: U16::new(NO_VALUE),
        _padding: [0],
    };

    pub(crate) fn new(character: u8, key_length: u16, value: Option<u16>) -> Self {
        Self {
            character,
            tree_size: U16::ZERO,
            key_length: key_length.into(),
            value: value.unwrap_or(NO_VALUE).into(),
            _padding: [0],
        }
    }

    /// The byte compared against the query where this slot's siblings diverge.
    #[inline]
    pub fn character(&self) -> u8 {
        self.character
    }

    /// Number of slots in this slot's subtree, excluding itself.
    #[inline]
    pub fn tree_size(&self) -> usize {
        self.tree_size.get() as usize
    }

    /// Number of query bytes consumed after matching this slot's character.
    /// These bytes were compacted away and are not re-checked.
    #[inline]
    pub fn key_length(&self) -> usize {
        self.key_length.get() as usize
    }

    #[inline]
    pub fn value(&self) -> Option<u16> {
        let value = self.value.get();
        (value != NO_VALUE).then_some(value)
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.tree_size() == 0
    }

    #[inline]
    pub(crate) fn set_tree_size(&mut self, tree_size: u16) {
        self.tree_size = tree_size.into();
    }
}

impl Default for RadixNode {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Debug for RadixNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadixNode")
            .field("character", &(self.character as char))
            .field("key_length", &self.key_length())
            .field("tree_size", &self.tree_size())
            .field("value", &self.value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use zerocopy::{FromBytes, IntoBytes};

    use super::{NO_VALUE, RadixNode};

    #[test]
    fn test_record_byteorder() {
        let mut node = RadixNode::new(b'a', 0x0102, Some(0x0304));
        node.set_tree_size(0x0506);
        assert_eq!(
            node.as_bytes(),
            &[
                b'a', // character
                0x06, 0x05, // tree size
                0x02, 0x01, // key length
                0x04, 0x03, // value
                0x00, // padding
            ]
        );
        assert_eq!(RadixNode::read_from_bytes(node.as_bytes()).unwrap(), node);
    }

    #[test]
    fn test_missing_value_uses_sentinel() {
        let node = RadixNode::new(b'x', 0, None);
        assert_eq!(node.value(), None);
        assert_eq!(&node.as_bytes()[5..7], &NO_VALUE.to_le_bytes());
        assert!(node.is_leaf());

        assert_eq!(RadixNode::new(b'x', 0, Some(0)).value(), Some(0));
        assert_eq!(RadixNode::default(), RadixNode::EMPTY);
    }
}
