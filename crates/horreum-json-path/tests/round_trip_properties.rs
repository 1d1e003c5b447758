//! Every structural path produced by evaluation re-selects exactly its match.

use horreum_json_path::evaluate;
use proptest::prelude::*;
use serde_json::{Map, Value};

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z_][a-z0-9_]{0,6}",
        "[a-zA-Z0-9 .\"'\\\\@$\\[\\]-]{0,5}",
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((key(), inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

proptest! {
    #[test]
    fn descendant_paths_round_trip(doc in json_value()) {
        let matches = evaluate(&doc, "$..*").unwrap();
        for m in matches {
            let again = evaluate(&doc, &m.path).unwrap();
            prop_assert_eq!(again, vec![m]);
        }
    }

    #[test]
    fn root_path_round_trips(doc in json_value()) {
        let matches = evaluate(&doc, "$").unwrap();
        prop_assert_eq!(matches.len(), 1);
        let again = evaluate(&doc, &matches[0].path).unwrap();
        prop_assert_eq!(again, matches);
    }
}
