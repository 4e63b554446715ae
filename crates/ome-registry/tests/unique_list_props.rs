//! Property tests for the unique ordered collection

use ome_registry::{NodeId, UniqueList};
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    AddAt(usize, usize),
    Remove(usize),
    Set(usize, usize),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..16usize).prop_map(Op::Add),
        2 => (0..16usize, 0..16usize).prop_map(|(p, n)| Op::AddAt(p, n)),
        2 => (0..16usize).prop_map(Op::Remove),
        2 => (0..16usize, 0..16usize).prop_map(|(p, n)| Op::Set(p, n)),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn prop_never_holds_duplicates(ops in proptest::collection::vec(op_strategy(), 0..64)) {
        let mut list = UniqueList::new();

        for op in ops {
            match op {
                Op::Add(n) => {
                    let was_member = list.contains(&NodeId::from_index(n));
                    prop_assert_eq!(list.add(NodeId::from_index(n)), !was_member);
                }
                Op::AddAt(p, n) => {
                    if p <= list.len() {
                        let _ = list.add_at(p, NodeId::from_index(n));
                    }
                }
                Op::Remove(n) => {
                    let was_member = list.contains(&NodeId::from_index(n));
                    let before = list.len();
                    prop_assert_eq!(list.remove(&NodeId::from_index(n)), was_member);
                    prop_assert_eq!(list.len(), if was_member { before - 1 } else { before });
                }
                Op::Set(p, n) => {
                    let _ = list.set(p, NodeId::from_index(n));
                }
                Op::Clear => list.clear(),
            }

            // Invariant: sequence has no duplicates and agrees with membership
            let distinct: HashSet<_> = list.iter().copied().collect();
            prop_assert_eq!(distinct.len(), list.len());
            prop_assert!(list.contains_all(list.as_slice()));
        }
    }

    #[test]
    fn prop_collect_keeps_first_occurrence_order(values in proptest::collection::vec(0..8usize, 0..32)) {
        let list: UniqueList<usize> = values.iter().copied().collect();

        let mut seen = HashSet::new();
        let expected: Vec<usize> = values.into_iter().filter(|v| seen.insert(*v)).collect();
        prop_assert_eq!(list.to_vec(), expected);
    }
}
