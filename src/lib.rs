//! A two-stage string router: build a [`Trie`] incrementally, then compile it
//! into a [`RadixTree`], a compact read-only array tuned for repeated lookups.
//!
//! ## Key Features:
//!
//! - **Chain Compaction**: Unbranched, valueless runs of trie nodes are folded
//!   into a single skip count. A compiled slot exists only for nodes which
//!   branch, hold a value, or end a key, so lookup cost does not depend on the
//!   uncompacted trie depth.
//!
//! - **Pre-order Layout**: Slots are stored depth-first with their subtree size,
//!   letting a lookup step over any non-matching branch in one move.
//!
//! - **Zero-copy Access**: A compiled tree encodes to fixed 8-byte records plus
//!   a checksummed footer, and [`RadixTreeRef`] serves lookups directly from
//!   any type implementing `Deref<Target = [u8]>`.
//!
//! ```
//! use radix_router::{RadixRead, RadixTree, Trie};
//!
//! let mut trie = Trie::new();
//! trie.add("app", 1u16).unwrap();
//! trie.add("apple", 2u16).unwrap();
//! trie.add("apt", 3u16).unwrap();
//!
//! let tree = RadixTree::from_trie(&trie).unwrap();
//! drop(trie);
//!
//! assert_eq!(tree.search("apple"), Some(2));
//! assert_eq!(tree.search("appl"), None);
//! ```

mod codec;
pub mod compile;
pub mod node;
mod radix_ref;
pub mod router;
mod traits;
pub mod trie;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use codec::{
    DecodeErr, Encodable,
    encoder::Encoder,
    footer::{FORMAT_VERSION, RADIX_MAGIC},
};
pub use compile::CompileErr;
pub use node::{MAX_KEY_LENGTH, MAX_NODES, NO_VALUE, RadixNode};
pub use radix_ref::RadixTreeRef;
pub use router::RadixTree;
pub use traits::RadixRead;
pub use trie::{InsertErr, Trie, TrieNode};
