//! Right-comb normalization of generic trees.
//!
//! `pair` and `Pair` applications with more than two arguments are rewritten
//! into nested two-argument applications: `Pair a b c` becomes
//! `Pair a (Pair b c)`. Annotations stay on the outermost node. Every other
//! node is copied unchanged, so normalizing twice is the same as once.

use crate::prim::Prim;
use tzenc_micheline::{Micheline, PrimitiveApplication};

enum Frame<'a> {
    Enter(&'a Micheline),
    ExitPrim(&'a PrimitiveApplication),
    ExitSequence(usize),
}

/// Whether `name` is one of the primitives that get combed.
pub fn is_comb_primitive(name: &str) -> bool {
    name == Prim::TPair.name() || name == Prim::DPair.name()
}

/// Normalize `root`. Walks the tree with an explicit stack, so any depth is
/// accepted.
pub fn normalize(root: &Micheline) -> Micheline {
    let mut work = vec![Frame::Enter(root)];
    let mut done: Vec<Micheline> = Vec::new();

    while let Some(frame) = work.pop() {
        match frame {
            Frame::Enter(node) => match node {
                Micheline::Literal(_) => done.push(node.clone()),
                Micheline::PrimitiveApplication(app) => {
                    work.push(Frame::ExitPrim(app));
                    work.extend(app.args.iter().rev().map(Frame::Enter));
                }
                Micheline::Sequence(items) => {
                    work.push(Frame::ExitSequence(items.len()));
                    work.extend(items.iter().rev().map(Frame::Enter));
                }
            },
            Frame::ExitPrim(app) => {
                let args = done.split_off(done.len() - app.args.len());
                done.push(comb(app, args));
            }
            Frame::ExitSequence(len) => {
                let items = done.split_off(done.len() - len);
                done.push(Micheline::Sequence(items));
            }
        }
    }

    // The walk leaves exactly the rebuilt root.
    done.pop().unwrap_or_else(|| root.clone())
}

fn comb(app: &PrimitiveApplication, mut args: Vec<Micheline>) -> Micheline {
    if args.len() <= 2 || !is_comb_primitive(&app.prim) {
        return Micheline::prim_annotated(app.prim.clone(), args, app.annots.clone());
    }

    tracing::trace!(prim = %app.prim, arity = args.len(), "combing pair");
    let mut rest = args.split_off(1);
    let mut tail = match rest.pop() {
        Some(last) => last,
        None => return Micheline::prim_annotated(app.prim.clone(), args, app.annots.clone()),
    };
    while let Some(item) = rest.pop() {
        tail = Micheline::prim_with(app.prim.clone(), vec![item, tail]);
    }
    args.push(tail);
    Micheline::prim_annotated(app.prim.clone(), args, app.annots.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tzenc_micheline::parse_expression;

    fn normalized(text: &str) -> String {
        normalize(&parse_expression(text).unwrap()).to_string()
    }

    #[test]
    fn test_three_components() {
        assert_eq!(normalized("Pair 1 2 3"), "Pair 1 (Pair 2 3)");
        assert_eq!(normalized("pair int nat string"), "pair int (pair nat string)");
    }

    #[test]
    fn test_long_comb() {
        assert_eq!(
            normalized("Pair 1 2 3 4 5"),
            "Pair 1 (Pair 2 (Pair 3 (Pair 4 5)))"
        );
    }

    #[test]
    fn test_annotations_stay_outside() {
        assert_eq!(
            normalized("pair :p (int %a) (nat %b) (string %c)"),
            "pair :p (int %a) (pair (nat %b) (string %c))"
        );
    }

    #[test]
    fn test_binary_unchanged() {
        assert_eq!(normalized("Pair 1 2"), "Pair 1 2");
        assert_eq!(normalized("PAIR 3"), "PAIR 3");
        assert_eq!(normalized("Elt 1 2"), "Elt 1 2");
    }

    #[test]
    fn test_nested_and_inside_sequences() {
        assert_eq!(
            normalized("{ Pair (Pair 1 2 3) 4 5 ; PUSH (pair int int int) (Pair 1 2 3) }"),
            "{ Pair (Pair 1 (Pair 2 3)) (Pair 4 5) ; \
             PUSH (pair int (pair int int)) (Pair 1 (Pair 2 3)) }"
        );
    }

    #[test]
    fn test_uppercase_pair_untouched() {
        // PAIR n is an instruction count, not a comb
        let node = Micheline::prim_with("PAIR", (1..=3).map(Micheline::int).collect());
        assert_eq!(normalize(&node), node);
    }

    #[test]
    fn test_idempotent() {
        let once = normalize(&parse_expression("Pair 1 (Pair 2 3 4) 5 6").unwrap());
        assert_eq!(normalize(&once), once);
    }
}
