use btree_index::BTree;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Operation {
    Insert(i32),
    Remove(i32),
}

fn arb_operation() -> impl Strategy<Value = Operation> {
    // A small key domain keeps duplicates and absent-key removals common
    prop_oneof![
        (0..64i32).prop_map(Operation::Insert),
        (0..64i32).prop_map(Operation::Remove),
    ]
}

/// Sorted multiset model the tree is checked against.
fn model_apply(model: &mut Vec<i32>, op: &Operation) {
    match *op {
        Operation::Insert(key) => {
            let pos = model.partition_point(|k| *k <= key);
            model.insert(pos, key);
        }
        Operation::Remove(key) => {
            let pos = model.partition_point(|k| *k < key);
            if model.get(pos) == Some(&key) {
                model.remove(pos);
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_traversal_matches_sorted_multiset(
        t in 2usize..6,
        ops in prop::collection::vec(arb_operation(), 1..300),
    ) {
        let mut tree = BTree::new(t).unwrap();
        let mut model = Vec::new();

        for op in &ops {
            match *op {
                Operation::Insert(key) => tree.insert(key),
                Operation::Remove(key) => tree.remove(&key),
            }
            model_apply(&mut model, op);
        }

        prop_assert!(tree.validate().is_ok());
        let keys: Vec<i32> = tree.iter().copied().collect();
        prop_assert_eq!(keys, model);
    }

    #[test]
    fn prop_invariants_hold_after_every_operation(
        t in 2usize..5,
        ops in prop::collection::vec(arb_operation(), 1..120),
    ) {
        let mut tree = BTree::new(t).unwrap();

        for op in &ops {
            match *op {
                Operation::Insert(key) => tree.insert(key),
                Operation::Remove(key) => tree.remove(&key),
            }
            prop_assert!(tree.validate().is_ok(), "violated after {:?}", op);
        }
    }

    #[test]
    fn prop_insert_then_search_finds_the_key(
        t in 2usize..6,
        seed in prop::collection::vec(0..64i32, 0..100),
        key in 0..64i32,
    ) {
        let mut tree = BTree::new(t).unwrap();
        for k in seed {
            tree.insert(k);
        }

        tree.insert(key);
        prop_assert!(tree.contains(&key));

        // Removing one occurrence of a key inserted once on top of a
        // seed that may also contain it must leave the seed's copies
        let copies_before = tree.iter().filter(|k| **k == key).count();
        tree.remove(&key);
        let copies_after = tree.iter().filter(|k| **k == key).count();
        prop_assert_eq!(copies_after, copies_before - 1);
        prop_assert_eq!(tree.contains(&key), copies_after > 0);
    }

    #[test]
    fn prop_removing_absent_key_is_idempotent(
        t in 2usize..6,
        seed in prop::collection::vec(0..64i32, 0..100),
        absent in 100..200i32,
    ) {
        let mut tree = BTree::new(t).unwrap();
        for k in seed {
            tree.insert(k);
        }
        let before: Vec<i32> = tree.iter().copied().collect();

        tree.remove(&absent);

        let after: Vec<i32> = tree.iter().copied().collect();
        prop_assert_eq!(before, after);
        prop_assert!(tree.validate().is_ok());
    }

    #[test]
    fn prop_full_drain_leaves_an_empty_tree(
        t in 2usize..6,
        keys in prop::collection::vec(0..64i32, 0..150),
    ) {
        let mut tree = BTree::new(t).unwrap();
        for &k in &keys {
            tree.insert(k);
        }

        // Remove the same multiset in reverse insertion order
        for k in keys.iter().rev() {
            tree.remove(k);
            prop_assert!(tree.validate().is_ok());
        }

        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.iter().count(), 0);
    }
}
