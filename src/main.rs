// ============================================================
// File: main.rs
//
// Description:
//   Entry point for the B-tree demonstration driver. Builds a
//   tree with a chosen minimum degree, inserts a fixed key list,
//   runs a few searches, then deletes every key, printing the
//   in-order traversal after each mutation.
//
//   The driver only ever calls the public `insert`, `remove`,
//   `search`, and `iter` operations; all balancing happens
//   inside the library.
//
// Notes:
//   - Set RUST_LOG=btree_index=trace to watch the split, borrow,
//     and merge decisions as they happen.
// ============================================================
use std::fmt::Display;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use btree_index::BTree;

/// Demonstration driver for the B-tree ordered index.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Minimum degree t of the tree (each node holds t-1 to 2t-1 keys).
    #[arg(long, default_value_t = 3)]
    degree: usize,
}

fn main() -> btree_index::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut tree = BTree::new(args.degree)?;

    // Insert a bunch of keys
    let values = [
        10, 20, 5, 6, 12, 30, 7, 17, 3, 4, 2, 40, 50, 60, 1, 8, 9, 11, 13, 14,
    ];
    for v in values {
        tree.insert(v);
    }

    println!("Traversal after insertions:");
    println!("{}", render_traversal(&tree));

    // Search tests
    for x in [6, 15, 30, 100] {
        let outcome = if tree.contains(&x) { "found" } else { "not found" };
        println!("Search {x}: {outcome}");
    }

    // Deletions with intermediate traversals
    let to_delete = [
        6, 13, 7, 4, 2, 12, 30, 10, 20, 5, 3, 1, 9, 8, 11, 14, 17, 40, 50, 60,
    ];
    for d in to_delete {
        tree.remove(&d);
        println!("After deleting {d}:");
        println!("{}", render_traversal(&tree));
    }

    // Final state
    println!("Final traversal (should be empty tree):");
    println!("{}", render_traversal(&tree));

    Ok(())
}

/// Formats the ascending key sequence as a single space-separated line.
fn render_traversal<K: Ord + Display>(tree: &BTree<K>) -> String {
    tree.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
