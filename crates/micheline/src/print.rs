//! Rendering of Micheline in its concrete text syntax.
//!
//! The full form is accepted back by [`crate::parser`]. The compact form
//! keeps only the first and last element of long argument lists, sequences
//! and annotation lists, and is meant for error messages.
//!
//! Both walk the tree with an explicit stack.

use crate::node::{Literal, Micheline};
use std::fmt::{self, Write};

enum Step<'a> {
    Node { node: &'a Micheline, nested: bool },
    Text(&'static str),
}

/// Display adapter produced by [`Micheline::compact`].
pub struct Compact<'a>(&'a Micheline);

impl Micheline {
    /// A length-elided rendering of this node.
    pub fn compact(&self) -> Compact<'_> {
        Compact(self)
    }
}

impl fmt::Display for Micheline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_micheline(f, self, false)
    }
}

impl fmt::Display for Compact<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_micheline(f, self.0, true)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{n}"),
            Literal::String(s) => write_string(f, s),
            Literal::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
        }
    }
}

/// Either every item, or `[first, None, last]` when eliding.
fn shown<T>(items: &[T], compact: bool) -> Vec<Option<&T>> {
    match items {
        [first, .., last] if compact && items.len() > 2 => vec![Some(first), None, Some(last)],
        _ => items.iter().map(Some).collect(),
    }
}

fn write_micheline<W: Write>(out: &mut W, root: &Micheline, compact: bool) -> fmt::Result {
    let mut stack = vec![Step::Node {
        node: root,
        nested: false,
    }];

    while let Some(step) = stack.pop() {
        let (node, nested) = match step {
            Step::Text(text) => {
                out.write_str(text)?;
                continue;
            }
            Step::Node { node, nested } => (node, nested),
        };

        match node {
            Micheline::Literal(literal) => write!(out, "{literal}")?,

            Micheline::Sequence(items) if items.is_empty() => out.write_str("{}")?,

            Micheline::Sequence(items) => {
                out.write_str("{ ")?;
                stack.push(Step::Text(" }"));
                for (index, item) in shown(items, compact).into_iter().enumerate().rev() {
                    stack.push(match item {
                        Some(node) => Step::Node {
                            node,
                            nested: false,
                        },
                        None => Step::Text("..."),
                    });
                    if index > 0 {
                        stack.push(Step::Text(" ; "));
                    }
                }
            }

            Micheline::PrimitiveApplication(app) => {
                let wrap = nested && (!app.args.is_empty() || !app.annots.is_empty());
                if wrap {
                    out.write_char('(')?;
                    stack.push(Step::Text(")"));
                }

                out.write_str(&app.prim)?;
                for annot in shown(&app.annots, compact) {
                    out.write_char(' ')?;
                    out.write_str(annot.map_or("...", String::as_str))?;
                }

                for arg in shown(&app.args, compact).into_iter().rev() {
                    stack.push(match arg {
                        Some(node) => Step::Node { node, nested: true },
                        None => Step::Text("..."),
                    });
                    stack.push(Step::Text(" "));
                }
            }
        }
    }

    Ok(())
}

fn write_string<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            '\u{8}' => out.write_str("\\b")?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(args: Vec<Micheline>) -> Micheline {
        Micheline::prim_with("Pair", args)
    }

    #[test]
    fn test_print_literals() {
        assert_eq!(Micheline::int(-3).to_string(), "-3");
        assert_eq!(Micheline::bytes(vec![0xca, 0xfe]).to_string(), "0xcafe");
        assert_eq!(Micheline::bytes(vec![]).to_string(), "0x");
        assert_eq!(
            Micheline::string("say \"hi\"\n").to_string(),
            r#""say \"hi\"\n""#
        );
    }

    #[test]
    fn test_print_application() {
        let node = Micheline::prim_annotated(
            "PUSH",
            vec![Micheline::prim("nat"), Micheline::int(1)],
            vec!["@one".into()],
        );
        assert_eq!(node.to_string(), "PUSH @one nat 1");

        let node = Micheline::prim_with(
            "pair",
            vec![
                Micheline::prim_annotated("int", vec![], vec!["%a".into()]),
                Micheline::prim_with("option", vec![Micheline::prim("nat")]),
            ],
        );
        assert_eq!(node.to_string(), "pair (int %a) (option nat)");
    }

    #[test]
    fn test_print_sequence() {
        assert_eq!(Micheline::sequence(vec![]).to_string(), "{}");

        let node = Micheline::sequence(vec![
            Micheline::prim("DUP"),
            Micheline::prim_with("DIP", vec![Micheline::sequence(vec![Micheline::prim("DROP")])]),
        ]);
        assert_eq!(node.to_string(), "{ DUP ; DIP { DROP } }");
    }

    #[test]
    fn test_compact_elides_middle() {
        let node = pair((1..=5).map(Micheline::int).collect());
        assert_eq!(node.to_string(), "Pair 1 2 3 4 5");
        assert_eq!(node.compact().to_string(), "Pair 1 ... 5");

        let node = Micheline::sequence((1..=4).map(Micheline::int).collect());
        assert_eq!(node.compact().to_string(), "{ 1 ; ... ; 4 }");

        let node = Micheline::prim_annotated(
            "unit",
            vec![],
            vec![":a".into(), "@b".into(), "%c".into()],
        );
        assert_eq!(node.compact().to_string(), "unit :a ... %c");
    }

    #[test]
    fn test_compact_keeps_short_lists() {
        let node = pair(vec![Micheline::int(1), Micheline::int(2)]);
        assert_eq!(node.compact().to_string(), node.to_string());
    }

    #[test]
    fn test_print_deep_tree() {
        let mut node = Micheline::prim("unit");
        for _ in 0..50_000 {
            node = Micheline::prim_with("option", vec![node]);
        }
        let text = node.to_string();
        assert!(text.starts_with("option (option"));
        assert!(text.ends_with("unit))"));
    }
}
