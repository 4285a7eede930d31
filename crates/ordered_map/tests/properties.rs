use std::collections::BTreeMap;

use ordered_map::{AvlTreeMap, RbTreeMap};
use proptest::prelude::*;

proptest! {
    #[test]
    fn navigation_matches_btreemap(
        pairs in prop::collection::vec((0u16..512, any::<u8>()), 0..200),
        probes in prop::collection::vec(0u16..520, 1..40),
    ) {
        let avl: AvlTreeMap<u16, u8> = pairs.iter().copied().collect();
        let rb: RbTreeMap<u16, u8> = pairs.iter().copied().collect();
        let oracle: BTreeMap<u16, u8> = pairs.iter().copied().collect();
        prop_assert_eq!(avl.check_invariants(), Ok(()));
        prop_assert_eq!(rb.check_invariants(), Ok(()));
        prop_assert_eq!(avl.len(), oracle.len());

        for probe in probes {
            let floor = oracle.range(..=probe).next_back().map(|(k, _)| k);
            let lower = oracle.range(..probe).next_back().map(|(k, _)| k);
            let ceiling = oracle.range(probe..).next().map(|(k, _)| k);
            prop_assert_eq!(avl.floor_key(&probe), floor);
            prop_assert_eq!(rb.floor_key(&probe), floor);
            prop_assert_eq!(avl.lower_key(&probe), lower);
            prop_assert_eq!(rb.lower_key(&probe), lower);
            prop_assert_eq!(avl.ceiling_key(&probe), ceiling);
            prop_assert_eq!(rb.ceiling_key(&probe), ceiling);
            prop_assert_eq!(rb.get(&probe), oracle.get(&probe));
        }
    }

    #[test]
    fn removal_keeps_order(keys in prop::collection::vec(0u16..256, 0..200)) {
        let mut map: RbTreeMap<u16, u16> = keys.iter().map(|&k| (k, k)).collect();
        let mut oracle: BTreeMap<u16, u16> = keys.iter().map(|&k| (k, k)).collect();
        for key in keys.iter().step_by(2) {
            let removed = map.remove(key).map(|entry| entry.into_parts());
            prop_assert_eq!(removed, oracle.remove_entry(key));
            prop_assert_eq!(map.check_invariants(), Ok(()));
        }
        prop_assert!(map.keys().eq(oracle.keys()));
    }
}
