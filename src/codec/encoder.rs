use bytes::BufMut;
use crc64fast_nvme::Digest;
use zerocopy::IntoBytes;

use crate::{codec::footer::Footer, node::RadixNode};

pub struct Encoder<B: BufMut> {
    buf: B,
    bytes_written: usize,
    nodes_written: usize,
    checksum: Digest,
    wrote_footer: bool,
}

impl<B: BufMut> Encoder<B> {
    pub fn new(buf: B) -> Self {
        Self {
            buf,
            bytes_written: 0,
            nodes_written: 0,
            checksum: Digest::new(),
            wrote_footer: false,
        }
    }

    /// Retrieve the wrapped buffer from the `Encoder`
    pub fn into_inner(self) -> B {
        self.buf
    }

    /// Write an entire encoded tree to the buffer
    pub(crate) fn write_tree(&mut self, tree: &[u8]) {
        self.buf.put_slice(tree);
        self.bytes_written += tree.len();
        // assuming the tree is valid, it already has a footer
        self.wrote_footer = true;
    }

    /// Write the checksum, slot count and format stamp to the buffer
    pub(crate) fn write_footer(&mut self) {
        assert!(
            !self.wrote_footer,
            "invalid encoder usage: footer already present"
        );
        let node_count = u16::try_from(self.nodes_written)
            .expect("invalid encoder usage: more slots than a tree can index");
        let footer = Footer::new(self.checksum.sum64(), node_count);
        self.put_slice(footer.as_bytes());
        self.wrote_footer = true;
    }

    /// The total number of bytes written to the buffer since this Encoder was
    /// initialized.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Encode a run of pre-order slots into the buffer.
    pub(crate) fn put_nodes(&mut self, nodes: &[RadixNode]) {
        self.put_slice(nodes.as_bytes());
        self.nodes_written += nodes.len();
    }

    /// Encode raw record bytes without interpreting them.
    /// Only whole records count towards the slot count in the footer.
    #[cfg(any(test, feature = "testutil"))]
    pub(crate) fn put_records(&mut self, records: &[u8]) {
        self.put_slice(records);
        self.nodes_written += records.len() / RadixNode::SIZE;
    }

    fn put_slice(&mut self, data: &[u8]) {
        assert!(
            !self.wrote_footer,
            "invalid encoder usage: data written after footer"
        );
        self.checksum.write(data);
        self.buf.put_slice(data);
        self.bytes_written += data.len();
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        codec::{
            Encodable, encoded_size,
            encoder::Encoder,
            footer::{FORMAT_VERSION, Footer},
        },
        node::RadixNode,
        testutil::{ROUTES, mktree},
    };

    #[test]
    fn test_bytes_written() {
        let tree = mktree(ROUTES);
        let mut encoder = Encoder::new(Vec::new());
        tree.encode(&mut encoder);
        assert_eq!(encoder.bytes_written(), encoded_size(tree.nodes().len()));
        assert_eq!(
            encoder.bytes_written(),
            tree.nodes().len() * RadixNode::SIZE + Footer::SIZE
        );
        assert_eq!(encoder.into_inner(), tree.encode_to_bytes());
    }

    #[test]
    fn test_footer_records_slot_count() {
        let tree = mktree(&[("app", 1), ("apple", 2), ("apply", 3), ("apt", 4)]);
        assert_eq!(tree.nodes().len(), 6);
        let mut encoder = Encoder::new(Vec::new());
        encoder.put_nodes(&tree.nodes()[..2]);
        encoder.put_nodes(&tree.nodes()[2..]);
        encoder.write_footer();

        let buf = encoder.into_inner();
        let footer = &buf[buf.len() - Footer::SIZE..];
        assert_eq!(
            &footer[8..12],
            &[
                0x06, 0x00, // node count
                FORMAT_VERSION,
                RadixNode::SIZE as u8,
            ]
        );
        assert_eq!(buf, tree.encode_to_bytes());
    }

    #[test]
    #[should_panic(expected = "footer already present")]
    fn test_double_footer() {
        let mut encoder = Encoder::new(Vec::new());
        encoder.write_footer();
        encoder.write_footer();
    }
}
