//! Properties of conversion and normalization on random trees.

use proptest::prelude::*;
use tzenc_micheline::Micheline;
use tzenc_michelson::normalizer::is_comb_primitive;
use tzenc_michelson::{
    normalize, Annotations, BlockOp, BranchOp, ComparableNode, ComparableType, Converter,
    CountedOp, Data, Elt, Instruction, Nat, SimpleOp, ToMicheline, Type, TypeNode, TypedOp,
};

fn comparable_leaf() -> impl Strategy<Value = ComparableNode> {
    prop_oneof![
        Just(ComparableNode::Unit),
        Just(ComparableNode::Int),
        Just(ComparableNode::Nat),
        Just(ComparableNode::String),
        Just(ComparableNode::Bytes),
        Just(ComparableNode::Mutez),
        Just(ComparableNode::Address),
        Just(ComparableNode::Timestamp),
    ]
}

fn ty() -> impl Strategy<Value = Type> {
    let leaf = prop_oneof![
        comparable_leaf().prop_map(Type::from),
        Just(Type::new(TypeNode::Operation)),
        Just(Type::new(TypeNode::Chest)),
        (0u64..64).prop_map(|n| Type::new(TypeNode::SaplingState(Nat::from(n)))),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(Type::option),
            inner
                .clone()
                .prop_map(|item| Type::new(TypeNode::List(Box::new(item)))),
            (inner.clone(), inner.clone()).prop_map(|(left, right)| Type::or(left, right)),
            prop::collection::vec(inner.clone(), 2..4).prop_map(Type::pair),
            (comparable_leaf(), inner).prop_map(|(key, value)| {
                Type::new(TypeNode::Map(
                    Box::new(ComparableType::new(key)),
                    Box::new(value),
                ))
            }),
        ]
    })
}

fn data() -> impl Strategy<Value = Data> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Data::int),
        "[a-z ]{0,6}".prop_map(Data::string),
        prop::collection::vec(any::<u8>(), 0..4).prop_map(Data::Bytes),
        Just(Data::Unit),
        Just(Data::True),
        Just(Data::False),
        Just(Data::None),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..4).prop_map(Data::Pair),
            inner.clone().prop_map(|value| Data::Left(Box::new(value))),
            inner.clone().prop_map(|value| Data::Right(Box::new(value))),
            inner.clone().prop_map(Data::some),
            prop::collection::vec(inner.clone(), 0..3).prop_map(Data::Sequence),
            prop::collection::vec((inner.clone(), inner), 1..3).prop_map(|elts| {
                Data::EltSequence(
                    elts.into_iter()
                        .map(|(key, value)| Elt { key, value })
                        .collect(),
                )
            }),
        ]
    })
}

fn simple_op() -> impl Strategy<Value = SimpleOp> {
    prop::sample::select(SimpleOp::ALL)
}

fn instruction() -> impl Strategy<Value = Instruction> {
    let leaf = prop_oneof![
        simple_op().prop_map(Instruction::simple),
        (
            prop::sample::select(CountedOp::ALL),
            prop::option::of(0u64..16)
        )
            .prop_map(|(op, n)| Instruction::counted(op, n)),
        (prop::sample::select(TypedOp::ALL), ty()).prop_map(|(op, ty)| Instruction::Typed {
            op,
            ty,
            annots: Annotations::new(),
        }),
        (ty(), data()).prop_map(|(ty, value)| Instruction::Push {
            ty,
            value: Box::new(value),
            annots: Annotations::new(),
        }),
    ];
    leaf.prop_recursive(3, 24, 3, |inner| {
        let body = prop::collection::vec(inner.clone(), 0..3);
        prop_oneof![
            body.clone().prop_map(Instruction::Sequence),
            (prop::sample::select(BlockOp::ALL), body.clone()).prop_map(|(op, body)| {
                Instruction::Block {
                    op,
                    body,
                    annots: Annotations::new(),
                }
            }),
            (prop::option::of(0u64..4), body.clone()).prop_map(|(n, body)| Instruction::Dip {
                n: n.map(Nat::from),
                body,
                annots: Annotations::new(),
            }),
            (prop::sample::select(BranchOp::ALL), body.clone(), body).prop_map(
                |(op, then, otherwise)| Instruction::Branch {
                    op,
                    then,
                    otherwise,
                    annots: Annotations::new(),
                }
            ),
        ]
    })
}

fn generic() -> impl Strategy<Value = Micheline> {
    let name = prop::sample::select(vec!["pair", "Pair", "PAIR", "Elt", "Some", "or"]);
    let leaf = prop_oneof![
        any::<i32>().prop_map(Micheline::int),
        "[a-z]{0,3}".prop_map(Micheline::string),
        name.clone().prop_map(Micheline::prim),
    ];
    leaf.prop_recursive(5, 48, 5, move |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Micheline::sequence),
            (
                name.clone(),
                prop::collection::vec(inner, 0..6),
                prop::collection::vec("[:@%][a-z]{1,3}", 0..2),
            )
                .prop_map(|(prim, args, annots)| Micheline::prim_annotated(prim, args, annots)),
        ]
    })
}

/// Every `pair`/`Pair` node in the tree has at most two arguments.
fn is_combed(node: &Micheline) -> bool {
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        if let Some(app) = node.as_primitive_application() {
            if is_comb_primitive(&app.prim) && app.args.len() > 2 {
                return false;
            }
        }
        stack.extend(node.children());
    }
    true
}

/// Leaves in left-to-right order, ignoring how pairs are nested.
fn pair_leaves(node: &Micheline, out: &mut Vec<Micheline>) {
    match node.as_primitive_application() {
        Some(app) if is_comb_primitive(&app.prim) => {
            app.args.iter().for_each(|arg| pair_leaves(arg, out));
        }
        _ => out.push(node.clone()),
    }
}

proptest! {
    #[test]
    fn test_type_round_trip(ty in ty()) {
        let converted = Converter::new().to_type(&ty.to_micheline()).unwrap();
        prop_assert_eq!(converted, ty);
    }

    #[test]
    fn test_data_round_trip(data in data()) {
        let converted = Converter::new().to_data(&data.to_micheline()).unwrap();
        prop_assert_eq!(converted, data);
    }

    #[test]
    fn test_instruction_round_trip(instruction in instruction()) {
        let converted = Converter::new()
            .to_instruction(&instruction.to_micheline())
            .unwrap();
        prop_assert_eq!(converted, instruction);
    }

    #[test]
    fn test_normalize_idempotent(node in generic()) {
        let once = normalize(&node);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_normalize_combs_every_pair(node in generic()) {
        prop_assert!(is_combed(&normalize(&node)));
    }

    #[test]
    fn test_normalize_keeps_pair_leaves(node in generic()) {
        let mut before = Vec::new();
        let mut after = Vec::new();
        pair_leaves(&node, &mut before);
        pair_leaves(&normalize(&node), &mut after);
        prop_assert_eq!(before.len(), after.len());
    }

    #[test]
    fn test_normalized_data_pairs_are_binary(data in data()) {
        let node = normalize(&data.to_micheline());
        let converted = Converter::new().to_data(&node).unwrap();
        let mut stack = vec![&converted];
        while let Some(data) = stack.pop() {
            match data {
                Data::Pair(items) => {
                    prop_assert_eq!(items.len(), 2);
                    stack.extend(items);
                }
                Data::Left(value) | Data::Right(value) | Data::Some(value) => stack.push(value),
                Data::Sequence(items) => stack.extend(items),
                Data::EltSequence(elts) => {
                    stack.extend(elts.iter().flat_map(|elt| [&elt.key, &elt.value]));
                }
                _ => {}
            }
        }
    }
}

#[test]
fn test_normalize_shape() {
    let a = Micheline::int(1);
    let b = Micheline::string("b");
    let c = Micheline::prim("Unit");
    let three = Micheline::prim_with("Pair", vec![a.clone(), b.clone(), c.clone()]);
    assert_eq!(
        normalize(&three),
        Micheline::prim_with(
            "Pair",
            vec![a.clone(), Micheline::prim_with("Pair", vec![b.clone(), c])]
        )
    );

    let two = Micheline::prim_with("Pair", vec![a, b]);
    assert_eq!(normalize(&two), two);
}
