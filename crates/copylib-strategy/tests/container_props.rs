//! Property tests for container copies

use copylib_meta::core_types::vector3f;
use copylib_meta::{ClassCatalog, TypeDescriptor, Value};
use copylib_strategy::{CopyStrategy, CopyStrategyLibrary};
use copylib_test_utils::{assert_independent_copy, game_catalog, item, ITEM};
use proptest::prelude::*;
use std::sync::Arc;

fn library() -> CopyStrategyLibrary {
    CopyStrategyLibrary::create(Arc::new(ClassCatalog::with_core_types()))
}

fn vectors() -> impl Strategy<Value = Vec<(f32, f32, f32)>> {
    prop::collection::vec((-1.0e3f32..1.0e3, -1.0e3f32..1.0e3, -1.0e3f32..1.0e3), 0..16)
}

proptest! {
    #[test]
    fn prop_list_copy_preserves_order_and_length(coords in vectors()) {
        let mut library = library();
        let strategy = library.get_strategy(&"List<Vector3f>".parse::<TypeDescriptor>().unwrap());

        let elements: Vec<Value> = coords.iter().map(|&(x, y, z)| vector3f(x, y, z)).collect();
        let original = Value::list(elements.clone());
        let copy = strategy.copy(&original);

        prop_assert!(!copy.same_ref(&original));
        let copied = copy.as_list().unwrap().read().clone();
        prop_assert_eq!(copied.len(), elements.len());
        for (c, e) in copied.iter().zip(&elements) {
            prop_assert!(c.deep_eq(e));
            prop_assert!(!c.same_ref(e));
        }
    }

    #[test]
    fn prop_map_copy_preserves_associations(
        entries in prop::collection::btree_map("[a-z]{1,8}", 0i64..1000, 0..16)
    ) {
        let mut library = CopyStrategyLibrary::create(Arc::new(game_catalog()));
        let strategy = library.get_strategy(
            &format!("Map<String, {ITEM}>").parse::<TypeDescriptor>().unwrap(),
        );

        let original = Value::map(
            entries.iter().map(|(k, &count)| (Value::str(k), item(k, count))),
        );
        let copy = strategy.copy(&original);

        let Value::Map(copied) = &copy else {
            panic!("expected map, got {}", copy.kind_name());
        };
        let copied = copied.read();
        prop_assert_eq!(copied.len(), entries.len());
        for (k, &count) in &entries {
            let value = copied.get(&Value::str(k)).unwrap();
            assert_independent_copy(value, &item(k, count));
        }
    }

    #[test]
    fn prop_repeated_copies_agree(counts in prop::collection::vec(0i64..100, 0..8)) {
        let mut library = CopyStrategyLibrary::create(Arc::new(game_catalog()));
        let descriptor = TypeDescriptor::list_of(TypeDescriptor::class(ITEM));
        let original = Value::list(counts.iter().map(|&c| item("thing", c)).collect());

        let first = library.copy(&descriptor, &original);
        let second = library.copy(&descriptor, &original);
        prop_assert!(first.deep_eq(&second));
        prop_assert!(!first.same_ref(&second));
    }
}
