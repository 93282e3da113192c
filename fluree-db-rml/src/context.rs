//! Iteration contexts
//!
//! An iteration context exposes exactly one record of a logical source: a
//! CSV row, a JSON or XML sub-tree, a relational row, a SPARQL solution.
//! Sources implement [`IterationContext`]; the evaluator only reads from it.
//!
//! Two in-memory implementations are provided:
//!
//! - [`Record`]: multi-valued fields, for hierarchical sources where a single
//!   reference may select several nodes
//! - [`Row`]: single-valued nullable cells over a shared [`RowSchema`], for
//!   tabular sources

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::CoercionPolicy;
use crate::error::{RmlError, RmlResult};
use crate::value::RawValue;

/// One record of a logical source
pub trait IterationContext {
    /// Raw values for a field, in source order
    ///
    /// Unknown or absent fields yield an empty list, never an error.
    fn values_for(&self, name: &str) -> Vec<RawValue>;

    /// Canonical string forms of the values for a field, in source order
    ///
    /// Null values are dropped. A value without a string form fails with
    /// [`RmlError::Coercion`] under [`CoercionPolicy::Abort`] and is dropped
    /// with a warning under [`CoercionPolicy::Skip`].
    fn strings_for(&self, name: &str, policy: CoercionPolicy) -> RmlResult<Vec<String>> {
        coerce_values(name, self.values_for(name), policy)
    }
}

impl<C: IterationContext + ?Sized> IterationContext for &C {
    fn values_for(&self, name: &str) -> Vec<RawValue> {
        (**self).values_for(name)
    }

    fn strings_for(&self, name: &str, policy: CoercionPolicy) -> RmlResult<Vec<String>> {
        (**self).strings_for(name, policy)
    }
}

/// Coerce raw values of a field to their canonical strings
pub fn coerce_values(
    name: &str,
    values: Vec<RawValue>,
    policy: CoercionPolicy,
) -> RmlResult<Vec<String>> {
    let mut strings = Vec::with_capacity(values.len());
    for value in values {
        match value.canonical_string() {
            Ok(Some(s)) => strings.push(s),
            Ok(None) => {}
            Err(message) => match policy {
                CoercionPolicy::Abort => return Err(RmlError::coercion(name, message)),
                CoercionPolicy::Skip => {
                    tracing::warn!(
                        field = name,
                        value_type = value.type_name(),
                        "Skipping value without a string form"
                    );
                }
            },
        }
    }
    Ok(strings)
}

/// In-memory record with multi-valued fields
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: HashMap<String, Vec<RawValue>>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all values of a field, replacing any previous values
    pub fn with<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        self.insert(name, values);
        self
    }

    /// Set all values of a field, replacing any previous values
    pub fn insert<I, V>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        self.fields
            .insert(name.into(), values.into_iter().map(Into::into).collect());
    }

    /// Append one value to a field
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.entry(name.into()).or_default().push(value.into());
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl IterationContext for Record {
    fn values_for(&self, name: &str) -> Vec<RawValue> {
        self.fields.get(name).cloned().unwrap_or_default()
    }
}

/// Column layout shared by all rows of a tabular source
#[derive(Debug, Clone)]
pub struct RowSchema {
    columns: Vec<String>,
    name_to_index: HashMap<String, usize>,
}

impl RowSchema {
    /// Create a schema from column names in order
    ///
    /// When a name repeats, lookups resolve to its first column.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut name_to_index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            name_to_index.entry(name.clone()).or_insert(i);
        }
        Self {
            columns,
            name_to_index,
        }
    }

    /// Get column index by name
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One row of a tabular source
#[derive(Debug, Clone)]
pub struct Row {
    schema: Arc<RowSchema>,
    cells: Vec<RawValue>,
}

impl Row {
    /// Create a row, validating the cell count against the schema
    pub fn new(schema: Arc<RowSchema>, cells: Vec<RawValue>) -> RmlResult<Self> {
        if cells.len() != schema.len() {
            return Err(RmlError::configuration(format!(
                "Row has {} cells, schema has {} columns",
                cells.len(),
                schema.len()
            )));
        }
        Ok(Self { schema, cells })
    }

    /// Get the cell for a column, if the column exists
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.schema.index_of(name).map(|i| &self.cells[i])
    }

    /// The shared schema of this row
    pub fn schema(&self) -> &Arc<RowSchema> {
        &self.schema
    }
}

impl IterationContext for Row {
    fn values_for(&self, name: &str) -> Vec<RawValue> {
        match self.get(name) {
            Some(value) => vec![value.clone()],
            None => Vec::new(),
        }
    }
}
