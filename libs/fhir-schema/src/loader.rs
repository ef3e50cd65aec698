//! Filesystem loader for schema files
//!
//! Reads `.json` schema files from a directory into a
//! [`DefaultSchemaContext`]. A file may hold a single schema object or an
//! array of them.

use crate::context::DefaultSchemaContext;
use crate::error::Result;
use crate::types::TypeSchema;
use std::fs;
use std::path::Path;

#[derive(Debug, Default)]
pub struct SchemaLoader;

impl SchemaLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load every `.json` file in a directory into a fresh context
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<DefaultSchemaContext> {
        let dir = dir.as_ref();
        let mut ctx = DefaultSchemaContext::new();

        let mut entries: Vec<_> = fs::read_dir(dir)?
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        // Deterministic registration order regardless of directory order
        entries.sort();

        for path in entries {
            let count = self.load_file(&path, &mut ctx)?;
            tracing::debug!(file = %path.display(), schemas = count, "loaded schema file");
        }

        tracing::info!(dir = %dir.display(), types = ctx.len(), "schema context loaded");
        Ok(ctx)
    }

    /// Load one schema file into an existing context; returns the number
    /// of schemas registered
    pub fn load_file(&self, path: impl AsRef<Path>, ctx: &mut DefaultSchemaContext) -> Result<usize> {
        let text = fs::read_to_string(path.as_ref())?;
        self.load_str(&text, ctx)
    }

    /// Parse a schema document (object or array of objects) into a context
    pub fn load_str(&self, text: &str, ctx: &mut DefaultSchemaContext) -> Result<usize> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let schemas: Vec<TypeSchema> = if value.is_array() {
            serde_json::from_value(value)?
        } else {
            vec![serde_json::from_value(value)?]
        };

        let count = schemas.len();
        for schema in schemas {
            ctx.register(schema)?;
        }
        Ok(count)
    }
}
