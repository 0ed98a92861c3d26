//! The generic Micheline tree.
//!
//! A node is a literal, a primitive application or a sequence. Nothing here
//! knows which primitives exist or how many arguments they take.

use crate::int::Int;
use serde::{Deserialize, Serialize};

/// A literal leaf.
///
/// Serializes as `{"int": "…"}`, `{"string": "…"}` or `{"bytes": "<hex>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Literal {
    #[serde(rename = "int")]
    Int(Int),

    #[serde(rename = "string")]
    String(String),

    #[serde(rename = "bytes", with = "hex::serde")]
    Bytes(Vec<u8>),
}

/// A named primitive applied to arguments, with optional annotations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrimitiveApplication {
    pub prim: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Micheline>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annots: Vec<String>,
}

impl PrimitiveApplication {
    pub fn new(prim: impl Into<String>, args: Vec<Micheline>, annots: Vec<String>) -> Self {
        Self {
            prim: prim.into(),
            args,
            annots,
        }
    }
}

/// A generic Micheline node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Micheline {
    Literal(Literal),
    PrimitiveApplication(PrimitiveApplication),
    Sequence(Vec<Micheline>),
}

impl Micheline {
    pub fn int(value: impl Into<Int>) -> Self {
        Micheline::Literal(Literal::Int(value.into()))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Micheline::Literal(Literal::String(value.into()))
    }

    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Micheline::Literal(Literal::Bytes(value.into()))
    }

    /// A primitive application without arguments or annotations.
    pub fn prim(name: impl Into<String>) -> Self {
        Self::prim_with(name, Vec::new())
    }

    pub fn prim_with(name: impl Into<String>, args: Vec<Micheline>) -> Self {
        Self::prim_annotated(name, args, Vec::new())
    }

    pub fn prim_annotated(
        name: impl Into<String>,
        args: Vec<Micheline>,
        annots: Vec<String>,
    ) -> Self {
        Micheline::PrimitiveApplication(PrimitiveApplication::new(name, args, annots))
    }

    pub fn sequence(items: Vec<Micheline>) -> Self {
        Micheline::Sequence(items)
    }

    /// Whether this node applies the primitive `name`.
    pub fn is_primitive_application(&self, name: &str) -> bool {
        matches!(self, Micheline::PrimitiveApplication(app) if app.prim == name)
    }

    pub fn as_primitive_application(&self) -> Option<&PrimitiveApplication> {
        match self {
            Micheline::PrimitiveApplication(app) => Some(app),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Micheline]> {
        match self {
            Micheline::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Micheline::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// Direct children: arguments of an application or items of a sequence.
    pub fn children(&self) -> &[Micheline] {
        match self {
            Micheline::Literal(_) => &[],
            Micheline::PrimitiveApplication(app) => &app.args,
            Micheline::Sequence(items) => items,
        }
    }

    /// Number of nodes on the longest root-to-leaf path. A leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            stack.extend(node.children().iter().map(|child| (child, depth + 1)));
        }
        max
    }
}

/// Deep trees are released with an explicit stack.
impl Drop for Micheline {
    fn drop(&mut self) {
        let mut stack = match self {
            Micheline::Literal(_) => return,
            Micheline::PrimitiveApplication(app) => std::mem::take(&mut app.args),
            Micheline::Sequence(items) => std::mem::take(items),
        };
        while let Some(mut node) = stack.pop() {
            match &mut node {
                Micheline::Literal(_) => {}
                Micheline::PrimitiveApplication(app) => stack.append(&mut app.args),
                Micheline::Sequence(items) => stack.append(items),
            }
        }
    }
}

impl From<Literal> for Micheline {
    fn from(literal: Literal) -> Self {
        Micheline::Literal(literal)
    }
}

impl From<PrimitiveApplication> for Micheline {
    fn from(app: PrimitiveApplication) -> Self {
        Micheline::PrimitiveApplication(app)
    }
}

impl From<Vec<Micheline>> for Micheline {
    fn from(items: Vec<Micheline>) -> Self {
        Micheline::Sequence(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_literals() {
        let node: Micheline = serde_json::from_value(json!({"int": "-12"})).unwrap();
        assert_eq!(node, Micheline::int(-12));

        let node: Micheline = serde_json::from_value(json!({"string": "tez"})).unwrap();
        assert_eq!(node, Micheline::string("tez"));

        let node: Micheline = serde_json::from_value(json!({"bytes": "00ff"})).unwrap();
        assert_eq!(node, Micheline::bytes(vec![0x00, 0xff]));
    }

    #[test]
    fn test_json_application_omits_empty_fields() {
        let node = Micheline::prim("Unit");
        assert_eq!(serde_json::to_value(&node).unwrap(), json!({"prim": "Unit"}));

        let node = Micheline::prim_annotated("nat", vec![], vec!["%count".into()]);
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({"prim": "nat", "annots": ["%count"]})
        );
    }

    #[test]
    fn test_json_nested() {
        let value = json!([
            {"prim": "Pair", "args": [{"int": "1"}, {"string": "a"}]},
            {"prim": "Elt", "args": [{"bytes": ""}, []], "annots": ["@x"]}
        ]);
        let node: Micheline = serde_json::from_value(value.clone()).unwrap();

        let expected = Micheline::sequence(vec![
            Micheline::prim_with("Pair", vec![Micheline::int(1), Micheline::string("a")]),
            Micheline::prim_annotated(
                "Elt",
                vec![Micheline::bytes(vec![]), Micheline::sequence(vec![])],
                vec!["@x".into()],
            ),
        ]);
        assert_eq!(node, expected);
        assert_eq!(serde_json::to_value(&node).unwrap(), value);
    }

    #[test]
    fn test_json_rejects_malformed() {
        assert!(serde_json::from_value::<Micheline>(json!({"int": "1.5"})).is_err());
        assert!(serde_json::from_value::<Micheline>(json!({"bytes": "0g"})).is_err());
        assert!(serde_json::from_value::<Micheline>(json!({"args": []})).is_err());
        assert!(serde_json::from_value::<Micheline>(json!(42)).is_err());
    }

    #[test]
    fn test_is_primitive_application() {
        let node = Micheline::prim_with("Some", vec![Micheline::int(1)]);
        assert!(node.is_primitive_application("Some"));
        assert!(!node.is_primitive_application("None"));
        assert!(!Micheline::string("Some").is_primitive_application("Some"));
        assert_eq!(node.as_primitive_application().map(|a| a.args.len()), Some(1));
    }

    #[test]
    fn test_depth() {
        assert_eq!(Micheline::int(1).depth(), 1);
        assert_eq!(Micheline::sequence(vec![]).depth(), 1);

        let node = Micheline::prim_with(
            "pair",
            vec![
                Micheline::prim("int"),
                Micheline::prim_with("option", vec![Micheline::prim("nat")]),
            ],
        );
        assert_eq!(node.depth(), 3);
    }

    #[test]
    fn test_drop_deep_tree() {
        let mut node = Micheline::sequence(vec![]);
        for i in 0..100_000 {
            node = if i % 2 == 0 {
                Micheline::prim_with("Some", vec![node])
            } else {
                Micheline::sequence(vec![Micheline::int(i), node])
            };
        }
        assert_eq!(node.children().len(), 2);
        drop(node);
    }
}
