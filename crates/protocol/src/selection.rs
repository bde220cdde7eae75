//! Result-shape trees: the fields a caller wants back from an operation.

use std::fmt;

/// One entry in a selection set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// A leaf field, e.g. `email`.
    Scalar(String),
    /// A field with its own sub-selection, e.g. `user { id email }`.
    Nested { name: String, selection: Selection },
}

impl Field {
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(name) => name,
            Self::Nested { name, .. } => name,
        }
    }
}

/// An ordered selection set.
///
/// Duplicate field names are collapsed at insertion; the first occurrence
/// keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    fields: Vec<Field>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection of leaf fields.
    pub fn of(names: &[&str]) -> Self {
        names.iter().fold(Self::new(), |sel, name| sel.field(*name))
    }

    /// Append a leaf field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.contains(&name) {
            self.fields.push(Field::Scalar(name));
        }
        self
    }

    /// Append a field with a nested sub-selection.
    #[must_use]
    pub fn nested(mut self, name: impl Into<String>, selection: Selection) -> Self {
        let name = name.into();
        if !self.contains(&name) {
            self.fields.push(Field::Nested { name, selection });
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name() == name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

impl fmt::Display for Selection {
    /// Renders as `{ a b c { d } }`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for field in &self.fields {
            match field {
                Field::Scalar(name) => write!(f, " {name}")?,
                Field::Nested { name, selection } if selection.is_empty() => {
                    write!(f, " {name}")?
                },
                Field::Nested { name, selection } => write!(f, " {name} {selection}")?,
            }
        }
        f.write_str(" }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_flat_selection() {
        let sel = Selection::of(&["success", "message"]);
        assert_eq!(sel.to_string(), "{ success message }");
    }

    #[test]
    fn renders_nested_selection_in_order() {
        let sel = Selection::of(&["success", "message", "token"])
            .nested("user", Selection::of(&["id", "email"]));
        assert_eq!(
            sel.to_string(),
            "{ success message token user { id email } }"
        );
    }

    #[test]
    fn duplicate_fields_are_collapsed() {
        let sel = Selection::of(&["id", "id", "email"]);
        assert_eq!(sel.fields().len(), 2);
        assert_eq!(sel.to_string(), "{ id email }");
    }

    #[test]
    fn empty_nested_renders_as_leaf() {
        let sel = Selection::new().nested("data", Selection::new());
        assert_eq!(sel.to_string(), "{ data }");
    }
}
