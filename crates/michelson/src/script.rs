//! Contract scripts.

use crate::annotation::Annotations;
use crate::instruction::Instruction;
use crate::types::Type;

/// A contract: the `parameter`, `storage`, `code` and `view` sections.
///
/// Entrypoints are field annotations inside the parameter type, so they live
/// on [`Script::parameter`]. The root entrypoint is the field annotation on
/// the `parameter` section itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Script {
    pub parameter: Type,
    pub parameter_annots: Annotations,
    pub storage: Type,
    pub code: Vec<Instruction>,
    pub views: Vec<ViewDefinition>,
}

/// An on-chain view: `view "name" input output { code }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewDefinition {
    pub name: String,
    pub input: Type,
    pub output: Type,
    pub code: Vec<Instruction>,
}

impl Script {
    pub fn new(parameter: Type, storage: Type, code: Vec<Instruction>) -> Self {
        Self {
            parameter,
            parameter_annots: Annotations::new(),
            storage,
            code,
            views: Vec::new(),
        }
    }

    pub fn root_entrypoint(&self) -> Option<&str> {
        self.parameter_annots.field_name().map(|annot| annot.name())
    }

    pub fn view(&self, name: &str) -> Option<&ViewDefinition> {
        self.views.iter().find(|view| view.name == name)
    }
}
