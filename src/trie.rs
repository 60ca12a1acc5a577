use std::fmt::Debug;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InsertErr {
    #[error("out of memory while growing the trie")]
    OutOfMemory,
}

/// A single byte edge in a [`Trie`].
///
/// Children are kept in insertion order and are owned exclusively by their
/// parent. All access goes through the owning node, so growing a child list
/// never invalidates anything held elsewhere.
pub struct TrieNode<V> {
    key: u8,
    children: Vec<TrieNode<V>>,
    value: Option<V>,
}

impl<V> TrieNode<V> {
    const ROOT_KEY: u8 = 0;

    #[inline]
    fn new(key: u8) -> Self {
        Self { key, children: Vec::new(), value: None }
    }

    /// The byte this node represents. The root carries a zero sentinel.
    #[inline]
    pub fn key(&self) -> u8 {
        self.key
    }

    #[inline]
    pub fn children(&self) -> &[TrieNode<V>] {
        &self.children
    }

    #[inline]
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// First child matching `key`, scanning in insertion order.
    #[inline]
    fn position(&self, key: u8) -> Option<usize> {
        self.children.iter().position(|child| child.key == key)
    }

    #[inline]
    fn child(&self, key: u8) -> Option<&TrieNode<V>> {
        self.position(key).map(|idx| &self.children[idx])
    }
}

impl<V: Debug> Debug for TrieNode<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrieNode")
            .field("key", &(self.key as char))
            .field("value", &self.value)
            .field("children", &self.children)
            .finish()
    }
}

/// A mutable prefix tree built one key at a time.
///
/// `Trie` is the construction half of the router: insert every route, then
/// compile it into a [`crate::RadixTree`] and drop it. Values are stored
/// as-is; the trie never inspects them, so `V` may just as well be a borrow
/// of caller-owned data.
///
/// # Examples
///
/// ```
/// use radix_router::Trie;
///
/// let mut trie = Trie::default();
/// trie.add("/api/user", 1u16).unwrap();
/// trie.add("/api/user/login", 2u16).unwrap();
///
/// assert_eq!(trie.search("/api/user"), Some(&1));
/// assert_eq!(trie.search("/api/use"), None);
/// ```
pub struct Trie<V> {
    root: TrieNode<V>,
    node_count: usize,
    node_limit: usize,
    len: usize,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::with_node_limit(usize::MAX)
    }
}

impl<V> Trie<V> {
    /// Creates a trie holding only the sentinel root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a trie which refuses to grow past `node_limit` nodes, root
    /// included. Growth past the limit fails exactly like an allocation
    /// failure.
    pub fn with_node_limit(node_limit: usize) -> Self {
        Self {
            root: TrieNode::new(TrieNode::<V>::ROOT_KEY),
            node_count: 1,
            node_limit,
            len: 0,
        }
    }

    #[inline]
    pub fn root(&self) -> &TrieNode<V> {
        &self.root
    }

    /// Number of keys carrying a value.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes in the trie, including the root.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Associates `value` with `key`, replacing any previous value.
    ///
    /// Matching prefix nodes are reused; one new node is appended per
    /// remaining byte. If growth fails part way, the nodes appended so far
    /// are left in place and no value is stored.
    pub fn add(&mut self, key: impl AsRef<[u8]>, value: V) -> Result<(), InsertErr> {
        let Self { root, node_count, node_limit, len } = self;

        let mut node = root;
        for &byte in key.as_ref() {
            let idx = match node.position(byte) {
                Some(idx) => idx,
                None => {
                    if *node_count >= *node_limit {
                        return Err(InsertErr::OutOfMemory);
                    }
                    node.children
                        .try_reserve_exact(1)
                        .map_err(|_| InsertErr::OutOfMemory)?;
                    node.children.push(TrieNode::new(byte));
                    *node_count += 1;
                    node.children.len() - 1
                }
            };
            node = &mut node.children[idx];
        }

        if node.value.replace(value).is_none() {
            *len += 1;
        }
        Ok(())
    }

    /// Returns the value stored under exactly `key`.
    pub fn search(&self, key: impl AsRef<[u8]>) -> Option<&V> {
        let mut node = &self.root;
        for &byte in key.as_ref() {
            node = node.child(byte)?;
        }
        node.value.as_ref()
    }

    /// Tears the trie down and returns how many nodes were released.
    pub fn destroy(mut self) -> usize {
        self.teardown()
    }

    /// Releases every node in post-order using an explicit stack, so
    /// arbitrarily deep tries never recurse. A node is only dropped once all
    /// of its children have been.
    fn teardown(&mut self) -> usize {
        let mut stack: Vec<(TrieNode<V>, bool)> = std::mem::take(&mut self.root.children)
            .into_iter()
            .map(|node| (node, false))
            .collect();
        let mut released = 0;
        while let Some((mut node, expanded)) = stack.pop() {
            if expanded {
                drop(node);
                released += 1;
            } else {
                let children = std::mem::take(&mut node.children);
                stack.push((node, true));
                stack.extend(children.into_iter().map(|child| (child, false)));
            }
        }
        self.root.value = None;
        self.node_count = 1;
        self.len = 0;

        // the root itself is released along with the trie
        released += 1;
        tracing::trace!(released, "trie released");
        released
    }
}

impl<V> Drop for Trie<V> {
    fn drop(&mut self) {
        if !self.root.children.is_empty() {
            self.teardown();
        }
    }
}

impl<V: Debug> Debug for Trie<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trie")
            .field("len", &self.len)
            .field("node_count", &self.node_count)
            .field("root", &self.root)
            .finish()
    }
}
