//! Type, variable and field annotations.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    /// `:name`
    Type,
    /// `@name`
    Variable,
    /// `%name`
    Field,
}

impl AnnotationKind {
    pub fn prefix(self) -> char {
        match self {
            AnnotationKind::Type => ':',
            AnnotationKind::Variable => '@',
            AnnotationKind::Field => '%',
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnnotationKind::Type => "type",
            AnnotationKind::Variable => "variable",
            AnnotationKind::Field => "field",
        })
    }
}

/// A classified annotation. The text keeps its prefix character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    kind: AnnotationKind,
    text: String,
}

impl Annotation {
    /// Classify `text` by its prefix.
    ///
    /// Returns `None` unless the text is a prefix character followed only by
    /// ASCII letters, digits, `_`, `.`, `%` or `@`.
    pub fn classify(text: &str) -> Option<Annotation> {
        let kind = match text.chars().next()? {
            ':' => AnnotationKind::Type,
            '@' => AnnotationKind::Variable,
            '%' => AnnotationKind::Field,
            _ => return None,
        };
        let valid = text[1..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '%' | '@'));
        valid.then(|| Annotation {
            kind,
            text: text.to_string(),
        })
    }

    pub fn new(kind: AnnotationKind, name: &str) -> Option<Annotation> {
        Annotation::classify(&format!("{}{name}", kind.prefix()))
    }

    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    /// Full text, prefix included.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Text without the prefix.
    pub fn name(&self) -> &str {
        &self.text[1..]
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The annotations of one node, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Annotations(Vec<Annotation>);

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify raw strings, dropping the ones that match no kind.
    pub fn classify<S: AsRef<str>>(raw: &[S]) -> Self {
        let annots: Vec<_> = raw
            .iter()
            .filter_map(|text| {
                let annot = Annotation::classify(text.as_ref());
                if annot.is_none() {
                    tracing::trace!(annotation = text.as_ref(), "dropping unclassified annotation");
                }
                annot
            })
            .collect();
        Annotations(annots)
    }

    /// Builder-style helper used when assembling typed nodes by hand.
    pub fn with(mut self, kind: AnnotationKind, name: &str) -> Self {
        if let Some(annot) = Annotation::new(kind, name) {
            self.0.push(annot);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.0.iter()
    }

    pub fn count(&self, kind: AnnotationKind) -> usize {
        self.of_kind(kind).count()
    }

    fn of_kind(&self, kind: AnnotationKind) -> impl Iterator<Item = &Annotation> {
        self.0.iter().filter(move |a| a.kind == kind)
    }

    pub fn type_name(&self) -> Option<&Annotation> {
        self.of_kind(AnnotationKind::Type).next()
    }

    pub fn variable_name(&self) -> Option<&Annotation> {
        self.first_variable_name()
    }

    pub fn field_name(&self) -> Option<&Annotation> {
        self.of_kind(AnnotationKind::Field).next()
    }

    /// For instructions binding two values, such as `UNPAIR`.
    pub fn first_variable_name(&self) -> Option<&Annotation> {
        self.of_kind(AnnotationKind::Variable).next()
    }

    pub fn second_variable_name(&self) -> Option<&Annotation> {
        self.of_kind(AnnotationKind::Variable).nth(1)
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|a| a.text.clone()).collect()
    }
}

impl FromIterator<Annotation> for Annotations {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        Annotations(iter.into_iter().collect())
    }
}
