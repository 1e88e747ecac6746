//! Per-target orchestration: load, inspect, synthesize, patch, persist.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::GeneratorConfig;
use crate::errors::DocError;
use crate::inspector::inspect;
use crate::model::{DocModel, ModelCatalog};
use crate::patcher::{AnchorPatcher, Document, GeneratedBlocks};
use crate::registry::{PropertyRegistry, SchemaRegistry};
use crate::schema_source::SchemaSource;
use crate::targets::Target;
use crate::types::{ColumnDescriptor, PropertyOrigin};

/// Result of a successful pass over one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange {
    Updated,
    Unchanged,
}

/// Final state of one target in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Updated,
    Unchanged,
    /// Not a loadable model; nothing attempted
    Skipped(String),
    /// Processing failed; the file was left untouched
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    pub class: String,
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Progress notifications emitted by [`Generator::run`].
#[derive(Debug, Clone, Copy)]
pub enum RunEvent<'r> {
    Started(&'r Target),
    Finished(&'r TargetReport),
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub targets: Vec<TargetReport>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
}

impl RunReport {
    fn count(&self, matches: impl Fn(&Outcome) -> bool) -> usize {
        self.targets.iter().filter(|t| matches(&t.outcome)).count()
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Updated))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Unchanged))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

/// Runs the documentation pipeline over model files.
///
/// Every target gets a fresh pair of registries and a fresh [`Document`]; nothing carries over
/// from one target to the next.
pub struct Generator<'a> {
    config: &'a GeneratorConfig,
    catalog: &'a dyn ModelCatalog,
    schema: &'a dyn SchemaSource,
    dry_run: bool,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a GeneratorConfig, catalog: &'a dyn ModelCatalog, schema: &'a dyn SchemaSource) -> Self {
        Self {
            config,
            catalog,
            schema,
            dry_run: false,
        }
    }

    /// Report changes without writing files.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Build the generated lines for `model` from its columns and declared methods.
    ///
    /// Columns are registered first, then accessor and relation contributions in declaration
    /// order, which fixes the type-union order of every key.
    pub fn synthesize(&self, model: &dyn DocModel, columns: &[ColumnDescriptor]) -> GeneratedBlocks {
        let mut properties = PropertyRegistry::new(self.config.key_case);
        let mut schema = SchemaRegistry::new(self.config.key_case, self.config.indent.as_str());

        for column in columns {
            schema.add(column);
            properties.add(&column.name, &column.db_type, &column.comment, PropertyOrigin::Column);
        }

        let inspection = inspect(model);
        for contribution in &inspection.contributions {
            properties.add(&contribution.name, &contribution.ty, &contribution.comment, contribution.origin);
        }

        GeneratedBlocks {
            table: model
                .declared_table()
                .is_empty()
                .then(|| self.config.table_for(model)),
            uses: inspection.uses,
            schema: schema.format(),
            properties: properties.format(),
        }
    }

    /// Patch `source` for `model` and return the new file content.
    pub fn render(
        &self,
        model: &dyn DocModel,
        class_name: &str,
        columns: &[ColumnDescriptor],
        source: &str,
    ) -> Result<String, DocError> {
        let blocks = self.synthesize(model, columns);
        let mut doc = Document::parse(source);
        let patcher = AnchorPatcher {
            class_name,
            parent: self.config.parent_for(model),
            indent: &self.config.indent,
            virtual_markers: &self.config.virtual_markers,
        };
        let summary = patcher.patch(&mut doc, &blocks)?;
        log::debug!("{}: {summary:?}", model.class_name());
        Ok(doc.render())
    }

    /// Run the full pipeline for one target. The file is written only when its content changes.
    pub fn process(&self, target: &Target) -> Result<FileChange, DocError> {
        let model = self.catalog.load(&target.class)?;
        let table = self.config.table_for(&*model);
        let columns = self.schema.columns(&table)?;

        let source = fs::read_to_string(&target.path).map_err(|e| DocError::io(&target.path, e))?;
        let rendered = self.render(&*model, &target.class_name, &columns, &source)?;
        if rendered == source {
            return Ok(FileChange::Unchanged);
        }

        if self.dry_run {
            log::info!("would update {}", target.path.display());
        } else {
            fs::write(&target.path, rendered).map_err(|e| DocError::io(&target.path, e))?;
            log::info!("updated {}", target.path.display());
        }
        Ok(FileChange::Updated)
    }

    /// Process every target in order. A failing target never stops the run.
    pub fn run(&self, targets: &[Target], mut on_event: impl FnMut(RunEvent<'_>)) -> RunReport {
        let mut reports = Vec::with_capacity(targets.len());

        for target in targets {
            on_event(RunEvent::Started(target));
            let outcome = match self.process(target) {
                Ok(FileChange::Updated) => Outcome::Updated,
                Ok(FileChange::Unchanged) => Outcome::Unchanged,
                Err(err) if err.is_skip() => Outcome::Skipped(err.to_string()),
                Err(err) => {
                    log::warn!("{}: {err}", target.class);
                    Outcome::Failed(err.to_string())
                }
            };
            let report = TargetReport {
                class: target.class.clone(),
                path: target.path.clone(),
                outcome,
            };
            on_event(RunEvent::Finished(&report));
            reports.push(report);
        }

        RunReport {
            targets: reports,
            finished_at: Utc::now(),
            dry_run: self.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestCatalog;
    use std::collections::BTreeMap;

    const MANIFEST: &str = r#"
[[model]]
class = "app\\model\\UserModel"
table = "user"

[[model]]
class = "app\\model\\PostModel"

[[model.method]]
name = "author"
doc = "/**\n * Author\n */"
relation = { kind = "belongs_to", target = "app\\model\\UserModel" }

[[model]]
class = "app\\model\\BaseModel"
abstract = true
"#;

    const POST_SOURCE: &str = "<?php\n\nnamespace app\\model;\n\nclass PostModel extends BaseModel\n{\n}\n";

    fn schema() -> BTreeMap<String, Vec<ColumnDescriptor>> {
        let mut tables = BTreeMap::new();
        tables.insert("post".to_string(), vec![ColumnDescriptor::new("id", "int", "")]);
        tables
    }

    fn target(dir: &std::path::Path, class_name: &str, source: &str) -> Target {
        let path = dir.join(format!("{class_name}.php"));
        fs::write(&path, source).unwrap();
        Target {
            class: format!("app\\model\\{class_name}"),
            class_name: class_name.to_string(),
            path,
        }
    }

    #[test]
    fn test_synthesize_columns_then_relations() {
        let catalog = ManifestCatalog::from_toml(MANIFEST).unwrap();
        let config = GeneratorConfig::default();
        let tables = schema();
        let generator = Generator::new(&config, &catalog, &tables);

        let model = catalog.load("app\\model\\PostModel").unwrap();
        let blocks = generator.synthesize(&*model, &tables["post"]);

        assert_eq!(blocks.table.as_deref(), Some("post"));
        assert_eq!(blocks.schema, vec!["        'ID' => 'int', // ID"]);
        assert_eq!(
            blocks.properties,
            vec![
                " * @property int       $ID      ID",
                " * @property UserModel $AUTHOR  Author[one-to-one]",
            ]
        );
    }

    #[test]
    fn test_process_writes_then_reports_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ManifestCatalog::from_toml(MANIFEST).unwrap();
        let config = GeneratorConfig::default();
        let tables = schema();
        let generator = Generator::new(&config, &catalog, &tables);
        let post = target(dir.path(), "PostModel", POST_SOURCE);

        assert_eq!(generator.process(&post).unwrap(), FileChange::Updated);
        let written = fs::read_to_string(&post.path).unwrap();
        assert!(written.contains("protected $table = 'post';"));
        assert!(written.contains(" * @property UserModel $AUTHOR  Author[one-to-one]"));

        assert_eq!(generator.process(&post).unwrap(), FileChange::Unchanged);
        assert_eq!(fs::read_to_string(&post.path).unwrap(), written);
    }

    #[test]
    fn test_dry_run_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ManifestCatalog::from_toml(MANIFEST).unwrap();
        let config = GeneratorConfig::default();
        let tables = schema();
        let generator = Generator::new(&config, &catalog, &tables).dry_run(true);
        let post = target(dir.path(), "PostModel", POST_SOURCE);

        assert_eq!(generator.process(&post).unwrap(), FileChange::Updated);
        assert_eq!(fs::read_to_string(&post.path).unwrap(), POST_SOURCE);
    }

    #[test]
    fn test_run_reports_skips_and_failures() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ManifestCatalog::from_toml(MANIFEST).unwrap();
        let config = GeneratorConfig::default();
        let tables = schema();
        let generator = Generator::new(&config, &catalog, &tables);

        let user_source = "<?php\nclass UserModel extends BaseModel\n{\n}\n";
        let targets = vec![
            target(dir.path(), "BaseModel", "<?php\nabstract class BaseModel\n{\n}\n"),
            target(dir.path(), "UserModel", user_source),
            target(dir.path(), "PostModel", POST_SOURCE),
        ];

        let mut started = Vec::new();
        let report = generator.run(&targets, |event| {
            if let RunEvent::Started(target) = event {
                started.push(target.class_name.clone());
            }
        });

        assert_eq!(started, vec!["BaseModel", "UserModel", "PostModel"]);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.updated(), 1);
        assert!(matches!(&report.targets[1].outcome, Outcome::Failed(reason) if reason.contains("'user'")));
        // the user table has no columns on record, so its file is untouched
        assert_eq!(fs::read_to_string(&targets[1].path).unwrap(), user_source);
    }

    #[test]
    fn test_outcome_json_shape() {
        let report = TargetReport {
            class: "app\\model\\PostModel".into(),
            path: PathBuf::from("PostModel.php"),
            outcome: Outcome::Failed("boom".into()),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["outcome"]["status"], "failed");
        assert_eq!(value["outcome"]["reason"], "boom");
    }
}
