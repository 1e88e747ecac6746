//! Column sources.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::errors::SchemaError;
use crate::types::ColumnDescriptor;

/// Supplies the ordered column list of a table.
pub trait SchemaSource {
    fn columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>, SchemaError>;
}

/// In-memory source keyed by table name.
impl SchemaSource for BTreeMap<String, Vec<ColumnDescriptor>> {
    fn columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>, SchemaError> {
        self.get(table).cloned().ok_or_else(|| SchemaError::MissingTable {
            table: table.to_string(),
        })
    }
}

/// Reads table snapshots from `<dir>/<table>.json`, each a JSON array of columns:
///
/// ```json
/// [{ "name": "id", "type": "int", "comment": "Primary key" }]
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotSchemaSource {
    dir: PathBuf,
}

impl SnapshotSchemaSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn snapshot_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.json"))
    }
}

impl SchemaSource for SnapshotSchemaSource {
    fn columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>, SchemaError> {
        let path = self.snapshot_path(table);
        if !path.exists() {
            return Err(SchemaError::MissingTable {
                table: table.to_string(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|source| SchemaError::Read {
            table: table.to_string(),
            source,
        })?;
        let columns: Vec<ColumnDescriptor> = serde_json::from_str(&content).map_err(|e| SchemaError::Invalid {
            table: table.to_string(),
            message: e.to_string(),
        })?;

        let mut seen = HashSet::new();
        if let Some(dup) = columns.iter().find(|c| !seen.insert(c.name.as_str())) {
            return Err(SchemaError::Invalid {
                table: table.to_string(),
                message: format!("duplicate column '{}'", dup.name),
            });
        }

        log::debug!("loaded {} column(s) for {table} from {}", columns.len(), path.display());
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_preserves_column_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("user.json"),
            r#"[{"name":"id","type":"int"},{"name":"name","type":"varchar(255)","comment":"Name"}]"#,
        )
        .unwrap();

        let columns = SnapshotSchemaSource::new(dir.path()).columns("user").unwrap();
        assert_eq!(
            columns,
            vec![
                ColumnDescriptor::new("id", "int", ""),
                ColumnDescriptor::new("name", "varchar(255)", "Name"),
            ]
        );
    }

    #[test]
    fn test_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let err = SnapshotSchemaSource::new(dir.path()).columns("ghost").unwrap_err();
        assert!(matches!(err, SchemaError::MissingTable { .. }));
    }

    #[test]
    fn test_duplicate_columns_are_invalid() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("t.json"),
            r#"[{"name":"id","type":"int"},{"name":"id","type":"int"}]"#,
        )
        .unwrap();
        let err = SnapshotSchemaSource::new(dir.path()).columns("t").unwrap_err();
        assert!(matches!(err, SchemaError::Invalid { .. }));
    }

    #[test]
    fn test_memory_source() {
        let mut tables = BTreeMap::new();
        tables.insert("t".to_string(), vec![ColumnDescriptor::new("id", "int", "")]);
        assert_eq!(tables.columns("t").unwrap().len(), 1);
        assert!(tables.columns("u").is_err());
    }
}
