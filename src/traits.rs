pub trait RadixRead {
    /// returns the value stored under exactly `query`, or `None` if the
    /// query does not resolve to a value.
    fn search(&self, query: impl AsRef<[u8]>) -> Option<u16>;

    /// returns true if `query` resolves to a value
    fn contains(&self, query: impl AsRef<[u8]>) -> bool {
        self.search(query).is_some()
    }

    /// the number of slots in the compiled tree
    fn node_count(&self) -> usize;
}
