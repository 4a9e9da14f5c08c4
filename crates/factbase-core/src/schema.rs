//! Field-name schemas for fact bases
//!
//! A schema is the ordered list of field names fixed at store creation. It
//! defines the tuple arity and the name-to-position mapping used by the
//! retrieval engine.

/// Field name given to a store created without any field names.
pub const DEFAULT_FIELD_NAME: &str = "unnamed";

/// Ordered field names defining the structure of a fact base.
///
/// Immutable for the lifetime of the store. Field names are looked up
/// case-sensitively; structural comparison between schemas is
/// case-insensitive but order-sensitive. When duplicate names are supplied,
/// lookup resolves to the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<String>,
}

impl Schema {
    /// Create a schema from the given field names. An empty list falls back
    /// to the single default field `"unnamed"`.
    pub fn new(fields: &[&str]) -> Self {
        Self::from_names(fields.iter().map(|f| (*f).to_string()).collect())
    }

    /// Create a schema from owned field names, applying the same default.
    pub fn from_names(fields: Vec<String>) -> Self {
        if fields.is_empty() {
            Self { fields: vec![DEFAULT_FIELD_NAME.to_string()] }
        } else {
            Self { fields }
        }
    }

    /// Number of fields, which is also the arity of every fact in the store.
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// The field names in schema order.
    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    /// Position of the given field name, or `None` if it is not a field.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    /// Check whether another schema has the same structure: the same number
    /// of fields, with matching names (ignoring case) in the same order.
    pub fn same_structure(&self, other: &Schema) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new(&[])
    }
}
