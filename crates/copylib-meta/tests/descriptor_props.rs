//! Descriptor parser properties

use copylib_meta::TypeDescriptor;
use proptest::prelude::*;

fn descriptor() -> impl Strategy<Value = TypeDescriptor> {
    let leaf = prop_oneof![
        "[A-Z][a-z]{0,6}(\\.[A-Z][a-z]{0,6}){0,2}".prop_map(TypeDescriptor::class),
        "[A-Z]".prop_map(TypeDescriptor::variable),
        Just(TypeDescriptor::Wildcard),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        ("[A-Z][a-z]{0,6}", prop::collection::vec(inner, 1..3))
            .prop_map(|(raw, args)| TypeDescriptor::parameterized(raw, args))
    })
}

proptest! {
    #[test]
    fn prop_display_parses_back(ty in descriptor()) {
        let text = ty.to_string();
        let parsed: TypeDescriptor = text.parse().unwrap();
        prop_assert_eq!(parsed, ty);
    }

    #[test]
    fn prop_parser_never_panics(text in "[A-Za-z<>,?$ .]{0,24}") {
        let _ = text.parse::<TypeDescriptor>();
    }

    #[test]
    fn prop_raw_class_of_parameterized(raw in "[A-Z][a-z]{0,6}", n in 1usize..4) {
        let args = vec![TypeDescriptor::Wildcard; n];
        let ty = TypeDescriptor::parameterized(raw.as_str(), args);
        prop_assert_eq!(ty.raw_class().map(|c| c.name()), Some(raw.as_str()));
        prop_assert!(ty.type_argument(n - 1).is_some());
        prop_assert!(ty.type_argument(n).is_none());
    }
}
