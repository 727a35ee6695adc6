//! Property test strategies for request params and cache values

use proptest::prelude::*;
use serde_json::{json, Value};

// Re-export proptest for convenience
pub use proptest;

/// Param names: lower-case identifiers that never collide with the token.
pub fn arb_param_name() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,11}"
}

/// Text that needs percent-encoding some of the time.
pub fn arb_param_text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,&=+/?%#-]{0,16}"
}

/// A scalar param value: string, integer or boolean.
pub fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_param_text().prop_map(Value::String),
        any::<i32>().prop_map(|n| json!(n)),
        any::<bool>().prop_map(Value::Bool),
    ]
}

/// A non-empty list of string param values.
pub fn arb_text_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_param_text(), 1..5)
}

/// Small JSON documents for cache round trips.
pub fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        arb_param_text().prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(arb_param_name(), inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}
