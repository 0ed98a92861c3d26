//! Argument and annotation checks shared by every conversion rule.

use crate::annotation::{AnnotationKind, Annotations};
use crate::data::Nat;
use crate::error::{ConversionError, Result};
use crate::prim::Prim;
use tzenc_micheline::{Literal, Micheline, PrimitiveApplication};

/// A primitive application whose argument count and annotations fit the
/// primitive's table entry.
pub(crate) struct Args<'a> {
    pub prim: Prim,
    pub node: &'a Micheline,
    items: &'a [Micheline],
    annots: Annotations,
}

impl<'a> Args<'a> {
    pub fn check(prim: Prim, app: &'a PrimitiveApplication, node: &'a Micheline) -> Result<Self> {
        let arity = prim.arity();
        if !arity.accepts(app.args.len()) {
            return Err(ConversionError::invalid(
                prim.name(),
                format!("expected {arity} arguments, found {}", app.args.len()),
                node,
            ));
        }

        let annots = Annotations::classify(&app.annots);
        let slots = prim.annotation_slots();
        for (kind, max) in [
            (AnnotationKind::Type, slots.type_names),
            (AnnotationKind::Variable, slots.variable_names),
            (AnnotationKind::Field, slots.field_names),
        ] {
            let count = annots.count(kind);
            if count > max {
                return Err(ConversionError::invalid(
                    prim.name(),
                    format!("{count} {kind} annotations, at most {max} allowed"),
                    node,
                ));
            }
        }

        Ok(Self {
            prim,
            node,
            items: &app.args,
            annots,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn all(&self) -> &'a [Micheline] {
        self.items
    }

    fn get(&self, index: usize) -> Result<&'a Micheline> {
        self.items
            .get(index)
            .ok_or_else(|| self.invalid(format!("missing argument {}", index + 1)))
    }

    pub fn first(&self) -> Result<&'a Micheline> {
        self.get(0)
    }

    pub fn second(&self) -> Result<&'a Micheline> {
        self.get(1)
    }

    pub fn third(&self) -> Result<&'a Micheline> {
        self.get(2)
    }

    pub fn fourth(&self) -> Result<&'a Micheline> {
        self.get(3)
    }

    /// The optional argument of count-taking primitives.
    pub fn first_or_none(&self) -> Option<&'a Micheline> {
        self.items.first()
    }

    pub fn annots(&self) -> Annotations {
        self.annots.clone()
    }

    pub fn into_annots(self) -> Annotations {
        self.annots
    }

    pub fn nat(&self, arg: &Micheline) -> Result<Nat> {
        match arg {
            Micheline::Literal(Literal::Int(value)) => Nat::try_from(value.clone())
                .map_err(|value| self.invalid(format!("expected a natural number, found {value}"))),
            _ => Err(self.invalid("expected a natural number")),
        }
    }

    pub fn string(&self, arg: &Micheline) -> Result<String> {
        match arg {
            Micheline::Literal(Literal::String(value)) => Ok(value.clone()),
            _ => Err(self.invalid("expected a string")),
        }
    }

    pub fn invalid(&self, reason: impl Into<String>) -> ConversionError {
        ConversionError::invalid(self.prim.name(), reason, self.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(node: &Micheline) -> Result<Args<'_>> {
        let app = node.as_primitive_application().unwrap();
        let prim = Prim::from_name(&app.prim).unwrap();
        Args::check(prim, app, node)
    }

    #[test]
    fn test_arity_checked() {
        let node = Micheline::prim_with("DROP", vec![Micheline::int(2)]);
        let args = check(&node).unwrap();
        assert_eq!(args.len(), 1);
        assert_eq!(args.nat(args.first().unwrap()).unwrap(), Nat::from(2u64));

        let node = Micheline::prim_with("DROP", vec![Micheline::int(2), Micheline::int(3)]);
        assert!(matches!(
            check(&node),
            Err(ConversionError::InvalidPrimitiveApplication { ref reason, .. })
                if reason == "expected 0 or 1 arguments, found 2"
        ));
    }

    #[test]
    fn test_annotation_slots_checked() {
        let node = Micheline::prim_annotated("DUP", vec![], vec!["@a".into()]);
        assert_eq!(check(&node).unwrap().annots().len(), 1);

        let node = Micheline::prim_annotated("DUP", vec![], vec!["@a".into(), "@b".into()]);
        assert!(check(&node).is_err());

        let node = Micheline::prim_annotated("SWAP", vec![], vec!["%f".into()]);
        assert!(check(&node).is_err());
    }

    #[test]
    fn test_unclassified_annotations_dropped() {
        let node = Micheline::prim_annotated("SWAP", vec![], vec!["junk".into()]);
        assert!(check(&node).unwrap().annots().is_empty());
    }

    #[test]
    fn test_nat_rejects_negative_and_non_int() {
        let node = Micheline::prim_with("DIG", vec![Micheline::int(-1)]);
        let args = check(&node).unwrap();
        assert!(args.nat(args.first().unwrap()).is_err());
        assert!(args.nat(&Micheline::string("1")).is_err());
    }
}
