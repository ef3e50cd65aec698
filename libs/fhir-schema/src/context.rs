//! Schema registry
//!
//! A [`SchemaContext`] resolves type names to their schemas at runtime,
//! the way conformance resources are resolved in a FHIR context. The
//! default implementation is a plain in-memory map; consumers that source
//! schemas elsewhere implement the trait themselves.

use crate::error::{Error, Result};
use crate::types::TypeSchema;
use std::collections::HashMap;
use std::sync::Arc;

/// Runtime access to type schemas
pub trait SchemaContext: Send + Sync {
    /// Resolve a schema by type name
    fn schema(&self, type_name: &str) -> Option<Arc<TypeSchema>>;

    fn contains(&self, type_name: &str) -> bool {
        self.schema(type_name).is_some()
    }
}

/// In-memory schema registry
#[derive(Debug, Clone, Default)]
pub struct DefaultSchemaContext {
    schemas: HashMap<String, Arc<TypeSchema>>,
}

impl DefaultSchemaContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema, failing on duplicate type names
    pub fn register(&mut self, schema: TypeSchema) -> Result<()> {
        let name = schema.name.clone();
        if self.schemas.contains_key(&name) {
            return Err(Error::DuplicateType(name));
        }
        self.schemas.insert(name, Arc::new(schema));
        Ok(())
    }

    /// Resolve a schema or fail with [`Error::TypeNotFound`]
    pub fn require(&self, type_name: &str) -> Result<Arc<TypeSchema>> {
        self.schema(type_name)
            .ok_or_else(|| Error::TypeNotFound(type_name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered type names, in no particular order
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}

impl SchemaContext for DefaultSchemaContext {
    fn schema(&self, type_name: &str) -> Option<Arc<TypeSchema>> {
        self.schemas.get(type_name).cloned()
    }
}
