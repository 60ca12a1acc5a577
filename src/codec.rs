use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;
use zerocopy::{ConvertError, SizeError};

use crate::{
    codec::{encoder::Encoder, footer::Footer},
    node::RadixNode,
};

pub mod encoder;
pub mod footer;

pub trait Encodable {
    fn encoded_size(&self) -> usize;

    fn encode<B: BufMut>(&self, encoder: &mut Encoder<B>);

    fn encode_to_bytes(&self) -> Bytes {
        let size = self.encoded_size();
        let mut encoder = Encoder::new(BytesMut::with_capacity(size));
        self.encode(&mut encoder);
        encoder.into_inner().freeze()
    }
}

/// The number of bytes needed to encode a tree of `node_count` slots.
#[inline]
pub(crate) fn encoded_size(node_count: usize) -> usize {
    node_count * RadixNode::SIZE + Footer::SIZE
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeErr {
    #[error("not enough bytes")]
    Length,

    #[error("invalid encoding")]
    Validity,

    #[error("unknown magic value")]
    Magic,

    #[error("unsupported format version {0}")]
    Version(u8),

    #[error("invalid checksum")]
    Checksum,
}

impl<S, D> From<SizeError<S, D>> for DecodeErr {
    fn from(_: SizeError<S, D>) -> Self {
        DecodeErr::Length
    }
}

impl<A, S, V> From<ConvertError<A, S, V>> for DecodeErr {
    fn from(err: ConvertError<A, S, V>) -> Self {
        match err {
            ConvertError::Alignment(_) => panic!("All zerocopy transmutations must be unaligned"),
            ConvertError::Size(_) => DecodeErr::Length,
            ConvertError::Validity(_) => DecodeErr::Validity,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use zerocopy::IntoBytes;

    use crate::{
        Encodable, RadixRead, RadixTreeRef,
        codec::{
            DecodeErr,
            footer::{FORMAT_VERSION, Footer, RADIX_MAGIC},
        },
        node::RadixNode,
        testutil::{ROUTES, mktree, mktree_manual},
    };

    #[test]
    fn test_encode_decode() {
        let tree = mktree(ROUTES);
        let buf = tree.encode_to_bytes();
        assert_eq!(
            tree.encoded_size(),
            buf.len(),
            "encoded_size doesn't match actual size"
        );

        let tree_ref = RadixTreeRef::from_bytes(buf).unwrap();
        assert_eq!(tree_ref.node_count(), tree.node_count());
        assert_eq!(tree_ref, tree);
        for (key, value) in ROUTES {
            assert_eq!(tree_ref.search(key), Some(*value));
        }
        assert_eq!(tree_ref.decode_to_tree(), tree);
    }

    #[test]
    fn test_byteorder() {
        let tree = mktree(&[("ab", 0x0102)]);
        let buf = tree.encode_to_bytes();
        assert_eq!(
            &buf[..RadixNode::SIZE],
            &[
                0x00, // character
                0x00, 0x00, // tree size
                0x02, 0x00, // key length
                0x02, 0x01, // value
                0x00, // padding
            ]
        );
        assert_eq!(&buf[buf.len() - RADIX_MAGIC.len()..], &RADIX_MAGIC);
    }

    #[test]
    fn test_length_corruption() {
        for i in 0..Footer::SIZE {
            let truncated = [0].repeat(i);
            assert_matches!(
                RadixTreeRef::from_bytes(truncated),
                Err(DecodeErr::Length),
                "Failed for truncated buffer of size {}",
                i
            );
        }
    }

    #[test]
    fn test_empty_records() {
        let buf = mktree_manual(&[]);
        assert_matches!(RadixTreeRef::from_bytes(buf), Err(DecodeErr::Length));
    }

    #[test]
    fn test_partial_record() {
        let tree = mktree(ROUTES);
        let mut records = tree.nodes().as_bytes().to_vec();
        records.pop();
        let buf = mktree_manual(&records);
        assert_matches!(RadixTreeRef::from_bytes(buf), Err(DecodeErr::Length));
    }

    #[test]
    fn test_corrupted_magic() {
        let mut buf = mktree(ROUTES).encode_to_bytes().to_vec();
        let magic_offset = buf.len() - RADIX_MAGIC.len();
        buf[magic_offset..].copy_from_slice(&[0].repeat(4));
        assert_matches!(RadixTreeRef::from_bytes(buf), Err(DecodeErr::Magic));
    }

    #[test]
    fn test_corrupted_version() {
        let mut buf = mktree(ROUTES).encode_to_bytes().to_vec();
        let version_offset = buf.len() - RADIX_MAGIC.len() - 2;
        assert_eq!(buf[version_offset], FORMAT_VERSION);
        buf[version_offset] = FORMAT_VERSION + 1;
        assert_matches!(
            RadixTreeRef::from_bytes(buf),
            Err(DecodeErr::Version(v)) if v == FORMAT_VERSION + 1
        );
    }

    #[test]
    fn test_corrupted_record_size() {
        let mut buf = mktree(ROUTES).encode_to_bytes().to_vec();
        let record_size_offset = buf.len() - RADIX_MAGIC.len() - 1;
        assert_eq!(buf[record_size_offset] as usize, RadixNode::SIZE);
        buf[record_size_offset] = 12;
        assert_matches!(RadixTreeRef::from_bytes(buf), Err(DecodeErr::Validity));
    }

    #[test]
    fn test_corrupted_node_count() {
        let tree = mktree(ROUTES);
        let mut buf = tree.encode_to_bytes().to_vec();
        let count_offset = buf.len() - RADIX_MAGIC.len() - 4;
        assert_eq!(buf[count_offset] as usize, tree.node_count());
        buf[count_offset] -= 1;
        assert_matches!(RadixTreeRef::from_bytes(buf), Err(DecodeErr::Validity));
    }

    #[test]
    fn test_corrupted_data() {
        let mut buf = mktree(ROUTES).encode_to_bytes().to_vec();
        buf[0] = 123;
        assert_matches!(RadixTreeRef::from_bytes(buf), Err(DecodeErr::Checksum));
    }

    #[test]
    fn test_corrupted_checksum() {
        let mut buf = mktree(ROUTES).encode_to_bytes().to_vec();
        let checksum_offset = buf.len() - Footer::SIZE;
        buf[checksum_offset] ^= 0xFF;
        assert_matches!(RadixTreeRef::from_bytes(buf), Err(DecodeErr::Checksum));
    }

    #[test]
    fn test_corrupted_tree_size() {
        let tree = mktree(&[("app", 1), ("apple", 2), ("apply", 3), ("apt", 4)]);
        let mut records = tree.nodes().as_bytes().to_vec();

        // root claims one slot more than the array holds
        records[1] = 6;
        assert_matches!(
            RadixTreeRef::from_bytes(mktree_manual(&records)),
            Err(DecodeErr::Validity)
        );

        // 'l' swallows its parent's sibling 't', overrunning the subtree of 'p'
        records[1] = 5;
        records[2 * RadixNode::SIZE + 1] = 3;
        assert_matches!(
            RadixTreeRef::from_bytes(mktree_manual(&records)),
            Err(DecodeErr::Validity)
        );
    }

    #[test]
    fn test_root_must_span_records() {
        let tree = mktree(&[("a", 1), ("b", 2)]);
        let mut records = tree.nodes().as_bytes().to_vec();
        // root covers only its first child
        records[1] = 1;
        assert_matches!(
            RadixTreeRef::from_bytes(mktree_manual(&records)),
            Err(DecodeErr::Validity)
        );
    }
}
