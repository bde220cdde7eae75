//! Untyped operation descriptors and GraphQL document rendering.

use std::fmt;

use serde_json::{Map, Value};

use crate::{GraphQlRequest, Selection};

/// Advisory read/write hint.
///
/// Both kinds go over the same POST; the hint only picks the document
/// keyword (`query` or `mutation`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OperationKind {
    #[default]
    Read,
    Write,
}

impl OperationKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Read => "query",
            Self::Write => "mutation",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// A file attached to an `Upload`-typed variable.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One declared operation parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub value: Value,
    /// GraphQL type without the non-null marker, e.g. `Int` or `[Int]`.
    pub declared_type: String,
    pub required: bool,
}

impl Variable {
    /// Type as written in the variable definition (`Int!` when required).
    pub fn graphql_type(&self) -> String {
        if self.required {
            format!("{}!", self.declared_type)
        } else {
            self.declared_type.clone()
        }
    }
}

/// Ordered mapping from parameter name to [`Variable`].
///
/// Insertion order is kept so rendered documents are stable. Setting a name
/// twice replaces the earlier entry in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    entries: Vec<(String, Variable)>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required (`Type!`) variable.
    ///
    /// A `null` value is still sent; the server decides what to do with it.
    #[must_use]
    pub fn required(self, name: &str, declared_type: &str, value: impl Into<Value>) -> Self {
        self.with(name, declared_type, true, value.into())
    }

    /// Add a nullable variable.
    #[must_use]
    pub fn optional(self, name: &str, declared_type: &str, value: impl Into<Value>) -> Self {
        self.with(name, declared_type, false, value.into())
    }

    /// Add a nullable variable only when `value` is present.
    #[must_use]
    pub fn optional_if_some<T: Into<Value>>(
        self,
        name: &str,
        declared_type: &str,
        value: Option<T>,
    ) -> Self {
        match value {
            Some(v) => self.optional(name, declared_type, v),
            None => self,
        }
    }

    fn with(mut self, name: &str, declared_type: &str, required: bool, value: Value) -> Self {
        let variable = Variable {
            value,
            declared_type: declared_type.to_string(),
            required,
        };
        if let Some((_, existing)) = self.entries.iter_mut().find(|(n, _)| n == name) {
            *existing = variable;
        } else {
            self.entries.push((name.to_string(), variable));
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of required variables whose value is `null`.
    pub fn missing_required(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, v)| v.required && v.value.is_null())
            .map(|(n, _)| n)
            .collect()
    }

    /// The JSON `variables` object, every declared name included.
    pub fn to_json(&self) -> Map<String, Value> {
        self.iter()
            .map(|(n, v)| (n.to_string(), v.value.clone()))
            .collect()
    }
}

/// A declarative request: which remote operation, with what arguments, and
/// which result fields to bring back.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDescriptor {
    pub name: String,
    pub kind: OperationKind,
    pub variables: Variables,
    pub selection: Selection,
    pub uploads: Vec<(String, Upload)>,
}

impl OperationDescriptor {
    pub fn new(name: impl Into<String>, kind: OperationKind) -> Self {
        Self {
            name: name.into(),
            kind,
            variables: Variables::new(),
            selection: Selection::new(),
            uploads: Vec::new(),
        }
    }

    pub fn read(name: impl Into<String>) -> Self {
        Self::new(name, OperationKind::Read)
    }

    pub fn write(name: impl Into<String>) -> Self {
        Self::new(name, OperationKind::Write)
    }

    #[must_use]
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Attach a file to a required `Upload` variable. The variable itself is
    /// sent as `null` and filled in by the multipart `map`.
    #[must_use]
    pub fn with_upload(mut self, name: &str, upload: Upload) -> Self {
        self.variables = self.variables.required(name, "Upload", Value::Null);
        self.uploads.retain(|(n, _)| n != name);
        self.uploads.push((name.to_string(), upload));
        self
    }

    /// Render the GraphQL document, e.g.
    /// `mutation ($email: String!) { forgotPassword(email: $email) { success message } }`.
    pub fn document(&self) -> String {
        let mut out = String::from(self.kind.keyword());
        if !self.variables.is_empty() {
            let definitions = self
                .variables
                .iter()
                .map(|(name, v)| format!("${name}: {}", v.graphql_type()))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!(" ({definitions})"));
        }
        out.push_str(" { ");
        out.push_str(&self.name);
        if !self.variables.is_empty() {
            let arguments = self
                .variables
                .iter()
                .map(|(name, _)| format!("{name}: ${name}"))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("({arguments})"));
        }
        if !self.selection.is_empty() {
            out.push(' ');
            out.push_str(&self.selection.to_string());
        }
        out.push_str(" }");
        out
    }

    pub fn to_request(&self) -> GraphQlRequest {
        GraphQlRequest {
            query: self.document(),
            variables: self.variables.to_json(),
            uploads: self.uploads.clone(),
        }
    }
}
