use crc64fast_nvme::Digest;
use zerocopy::{
    ByteEq, ByteHash, FromBytes, Immutable, IntoBytes, KnownLayout, LittleEndian, U16, U64,
    Unaligned,
};

use crate::{codec::DecodeErr, node::RadixNode};

/// The last four bytes of an encoded radix tree
pub const RADIX_MAGIC: [u8; 4] = [0x7A, 0xD1, 0x0C, 0x5E];

/// Bumped whenever the [`RadixNode`] record layout changes.
pub const FORMAT_VERSION: u8 = 1;

/// Trailer of an encoded radix tree.
///
/// Pins the record layout the slots were written with and the number of
/// slots, so a reader never interprets records from another layout.
#[derive(FromBytes, IntoBytes, Immutable, Unaligned, KnownLayout, ByteHash, ByteEq)]
#[repr(C)]
pub struct Footer {
    checksum: U64<LittleEndian>,
    node_count: U16<LittleEndian>,
    version: u8,
    record_size: u8,
    magic: [u8; 4],
}

static_assertions::const_assert_eq!(Footer::SIZE, 16);
static_assertions::const_assert!(RadixNode::SIZE <= u8::MAX as usize);

impl Footer {
    pub const SIZE: usize = std::mem::size_of::<Self>();

    pub fn new(checksum: u64, node_count: u16) -> Self {
        Self {
            checksum: checksum.into(),
            node_count: node_count.into(),
            version: FORMAT_VERSION,
            record_size: RadixNode::SIZE as u8,
            magic: RADIX_MAGIC,
        }
    }

    /// Checks the footer against the record bytes preceding it and returns
    /// the slot count it declares.
    pub fn validate(&self, records: &[u8]) -> Result<usize, DecodeErr> {
        if self.magic != RADIX_MAGIC {
            return Err(DecodeErr::Magic);
        }
        if self.version != FORMAT_VERSION {
            return Err(DecodeErr::Version(self.version));
        }
        if self.record_size as usize != RadixNode::SIZE {
            return Err(DecodeErr::Validity);
        }

        let checksum = {
            let mut c = Digest::new();
            c.write(records);
            c.sum64()
        };
        if checksum != self.checksum.get() {
            return Err(DecodeErr::Checksum);
        }

        Ok(self.node_count.get() as usize)
    }
}
