//! Text and JSON forms agree on random trees.

use proptest::prelude::*;
use tzenc_micheline::{parse_expression, Micheline};

fn leaf() -> impl Strategy<Value = Micheline> {
    prop_oneof![
        any::<i64>().prop_map(Micheline::int),
        "[a-zA-Z0-9 \"\\\\\n\t]{0,8}".prop_map(Micheline::string),
        prop::collection::vec(any::<u8>(), 0..6).prop_map(Micheline::bytes),
        "[A-Za-z_][A-Za-z0-9_]{0,6}".prop_map(Micheline::prim),
    ]
}

fn micheline() -> impl Strategy<Value = Micheline> {
    leaf().prop_recursive(6, 64, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Micheline::sequence),
            (
                "[A-Za-z_][A-Za-z0-9_]{0,6}",
                prop::collection::vec(inner, 0..5),
                prop::collection::vec("[:@%][a-z0-9_.]{0,4}", 0..3),
            )
                .prop_map(|(prim, args, annots)| Micheline::prim_annotated(prim, args, annots)),
        ]
    })
}

proptest! {
    #[test]
    fn test_text_form_parses_back(node in micheline()) {
        let text = node.to_string();
        let parsed = parse_expression(&text).unwrap();
        prop_assert_eq!(parsed, node, "{}", text);
    }

    #[test]
    fn test_json_form_parses_back(node in micheline()) {
        let json = serde_json::to_string(&node).unwrap();
        let parsed: Micheline = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed, node);
    }
}

#[test]
fn test_contract_json_to_text() {
    let json = r#"[
        {"prim": "parameter", "args": [{"prim": "or", "args": [
            {"prim": "int", "annots": ["%decrement"]},
            {"prim": "int", "annots": ["%increment"]}
        ]}]},
        {"prim": "storage", "args": [{"prim": "int"}]},
        {"prim": "code", "args": [[
            {"prim": "UNPAIR"},
            {"prim": "IF_LEFT", "args": [[{"prim": "SWAP"}, {"prim": "SUB"}], [{"prim": "ADD"}]]},
            {"prim": "NIL", "args": [{"prim": "operation"}]},
            {"prim": "PAIR"}
        ]]}
    ]"#;

    let node: Micheline = serde_json::from_str(json).unwrap();
    assert_eq!(
        node.to_string(),
        "{ parameter (or (int %decrement) (int %increment)) ; \
         storage int ; \
         code { UNPAIR ; IF_LEFT { SWAP ; SUB } { ADD } ; NIL operation ; PAIR } }"
    );
    assert_eq!(
        node.compact().to_string(),
        "{ parameter (or (int %decrement) (int %increment)) ; ... ; \
         code { UNPAIR ; ... ; PAIR } }"
    );
}
