use itertools::Itertools;
use rand::{SeedableRng, seq::index};

use crate::{RadixTree, Trie, codec::encoder::Encoder};

/// Word list exercised by the radix tree since its first revision; values
/// are each key's 1-based position.
pub const ROUTES: &[(&str, u16)] = &[
    ("Hello World!", 1),
    ("Health", 2),
    ("Fire", 3),
    ("app", 4),
    ("apple", 5),
    ("application", 6),
    ("apply", 7),
    ("apt", 8),
    ("bat", 9),
    ("batch", 10),
    ("bath", 11),
    ("batman", 12),
    ("cat", 13),
    ("catalog", 14),
    ("cater", 15),
    ("catering", 16),
    ("dog", 17),
    ("dove", 18),
    ("dot", 19),
    ("door", 20),
    ("doom", 21),
    ("zoo", 22),
    ("zoom", 23),
];

pub fn mktrie<K: AsRef<[u8]>>(entries: &[(K, u16)]) -> Trie<u16> {
    let mut trie = Trie::new();
    for (key, value) in entries {
        trie.add(key, *value).unwrap();
    }
    trie
}

pub fn mktree<K: AsRef<[u8]>>(entries: &[(K, u16)]) -> RadixTree {
    RadixTree::from_trie(&mktrie(entries)).unwrap()
}

/// Appends a valid footer to arbitrary record bytes, so decoding reaches the
/// layout checks.
pub fn mktree_manual(records: &[u8]) -> Vec<u8> {
    let mut encoder = Encoder::new(Vec::with_capacity(records.len()));
    encoder.put_records(records);
    encoder.write_footer();
    encoder.into_inner()
}

const SEGMENTS: &[&str] = &[
    "api", "v1", "v2", "users", "user", "login", "logout", "orders", "order", "items", "search",
    "health", "metrics", "admin", "settings", "profile", "static", "assets", "img", "css",
];

/// Generates unique, route-shaped keys from a fixed seed.
pub struct KeyGen {
    rng: rand::rngs::StdRng,
}

impl KeyGen {
    pub fn new(seed: u64) -> Self {
        let rng = rand::rngs::StdRng::seed_from_u64(seed);
        Self { rng }
    }

    fn below(&mut self, n: usize) -> usize {
        index::sample(&mut self.rng, n, 1).index(0)
    }

    fn route(&mut self) -> String {
        let depth = self.below(5) + 1;
        let mut route = String::new();
        for _ in 0..depth {
            route.push('/');
            route.push_str(SEGMENTS[self.below(SEGMENTS.len())]);
            // numeric ids keep the key space large enough for big samples
            if self.below(3) == 0 {
                route.push_str(&self.below(1000).to_string());
            }
        }
        route
    }

    /// Returns `count` distinct routes, each paired with its position.
    #[track_caller]
    pub fn routes(&mut self, count: usize) -> Vec<(String, u16)> {
        assert!(count < u16::MAX as usize, "too many routes");
        let mut routes = Vec::with_capacity(count);
        while routes.len() < count {
            let missing = count - routes.len();
            routes.extend((0..missing).map(|_| self.route()));
            routes = routes.into_iter().unique().collect_vec();
        }
        routes
            .into_iter()
            .enumerate()
            .map(|(i, route)| (route, i as u16))
            .collect()
    }
}
