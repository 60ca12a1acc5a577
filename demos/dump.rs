use radix_router::{RadixRead, RadixTree, Trie, testutil::ROUTES};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut trie = Trie::new();
    for (key, value) in ROUTES {
        trie.add(key, *value).unwrap();
    }

    let tree = RadixTree::from_trie(&trie).unwrap();
    println!(
        "{} keys, {} trie nodes, {} radix nodes\n",
        trie.len(),
        trie.node_count(),
        tree.node_count()
    );
    trie.destroy();

    for (slot, node) in tree.nodes().iter().enumerate() {
        let value = node
            .value()
            .map_or_else(|| "-".to_string(), |v| v.to_string());
        println!(
            "{slot:3}: char={:?} skip={} tree_size={} value={value}",
            node.character() as char,
            node.key_length(),
            node.tree_size(),
        );
    }

    let mut failed = 0;
    for (key, value) in ROUTES {
        if tree.search(key) != Some(*value) {
            println!("Failed to find key {key:?}");
            failed += 1;
        }
    }
    for query in ["He", "cats", "appl"] {
        println!("{query:?} -> {:?}", tree.search(query));
    }

    if failed == 0 {
        println!("\nSuccess!");
    }
}
