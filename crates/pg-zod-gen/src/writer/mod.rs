//! Output files.
//!
//! One source file per table plus the shared helper file, all in a single
//! output directory. Existing files are overwritten.

use crate::core::TableSchemaResult;
use crate::error::{GenError, Result};
use crate::render::SchemaRenderer;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes rendered schemas into an output directory.
pub struct SchemaWriter<'a> {
    dir: PathBuf,
    renderer: &'a dyn SchemaRenderer,
}

impl<'a> SchemaWriter<'a> {
    /// Create the output directory if needed.
    pub fn new(dir: impl AsRef<Path>, renderer: &'a dyn SchemaRenderer) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, renderer })
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the helper file.
    pub fn write_helpers(&self) -> Result<PathBuf> {
        let path = self.dir.join(self.renderer.helpers_file_name());
        fs::write(&path, self.renderer.helpers_source())?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Render and write one table.
    ///
    /// The file must land directly in the output directory, so table names
    /// containing path separators or naming `.`/`..` are rejected.
    pub fn write_table(&self, result: &TableSchemaResult) -> Result<PathBuf> {
        check_file_stem(&result.table)?;
        let path = self.dir.join(self.renderer.table_file_name(&result.table));
        fs::write(&path, self.renderer.render_table(result))?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }
}

fn check_file_stem(table: &str) -> Result<()> {
    if table.is_empty() || table == "." || table == ".." {
        return Err(GenError::invalid_table(table, "not usable as a file name"));
    }
    if let Some(bad) = table.chars().find(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(GenError::invalid_table(
            table,
            format!("character {:?} is not allowed in a file name", bad),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FieldEntry, SchemaExpr};
    use crate::render::ZodRenderer;
    use tempfile::TempDir;

    fn result(table: &str) -> TableSchemaResult {
        TableSchemaResult {
            table: table.into(),
            entries: vec![FieldEntry {
                field_name: "active".into(),
                column_name: "active".into(),
                expr: SchemaExpr::Boolean,
            }],
            processed: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_creates_nested_output_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a").join("b");
        let renderer = ZodRenderer::new();
        let writer = SchemaWriter::new(&dir, &renderer).unwrap();
        assert!(writer.dir().is_dir());
    }

    #[test]
    fn test_write_table_and_helpers() {
        let tmp = TempDir::new().unwrap();
        let renderer = ZodRenderer::new();
        let writer = SchemaWriter::new(tmp.path(), &renderer).unwrap();

        let table_path = writer.write_table(&result("flags")).unwrap();
        let helpers_path = writer.write_helpers().unwrap();

        assert_eq!(table_path, tmp.path().join("flags.ts"));
        assert_eq!(helpers_path, tmp.path().join("zod-helpers.ts"));

        let source = fs::read_to_string(table_path).unwrap();
        assert!(source.contains("export const flagsSchema"));
        assert!(source.contains("active: z.boolean(),"));
        assert_eq!(
            fs::read_to_string(helpers_path).unwrap(),
            renderer.helpers_source()
        );
    }

    #[test]
    fn test_write_table_overwrites() {
        let tmp = TempDir::new().unwrap();
        let renderer = ZodRenderer::new();
        let writer = SchemaWriter::new(tmp.path(), &renderer).unwrap();
        fs::write(tmp.path().join("flags.ts"), "stale").unwrap();

        writer.write_table(&result("flags")).unwrap();
        let source = fs::read_to_string(tmp.path().join("flags.ts")).unwrap();
        assert!(!source.contains("stale"));
    }

    #[test]
    fn test_write_table_rejects_path_escapes() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let renderer = ZodRenderer::new();
        let writer = SchemaWriter::new(&out, &renderer).unwrap();

        for table in ["../escaped", "nested/users", "win\\users", "..", "."] {
            let err = writer.write_table(&result(table)).unwrap_err();
            assert!(matches!(err, GenError::InvalidTable { .. }), "{}", table);
        }
        assert!(!tmp.path().join("escaped.ts").exists());
        assert!(!out.join("nested").exists());
    }

    #[test]
    fn test_write_table_allows_names_postgres_accepts() {
        let tmp = TempDir::new().unwrap();
        let renderer = ZodRenderer::new();
        let writer = SchemaWriter::new(tmp.path(), &renderer).unwrap();

        let path = writer.write_table(&result("order items")).unwrap();
        assert_eq!(path, tmp.path().join("order items.ts"));
    }
}
