//! TOML manifest describing model classes.
//!
//! The manifest stands in for runtime reflection: each `[[model]]` table lists the class,
//! its declared table and the methods declared on it. A method that builds a relation carries
//! a `relation = { kind = "...", target = "..." }` table.
//!
//! ```toml
//! [[model]]
//! class = "app\\model\\PostModel"
//! table = ""
//!
//! [[model.method]]
//! name = "author"
//! doc = "/**\n * Author\n */"
//! relation = { kind = "belongs_to", target = "app\\model\\UserModel" }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{LoadError, ManifestError, ProbeError};
use crate::model::{DocModel, ModelCatalog, normalize_class};
use crate::types::{MethodInfo, Relation, RelationKind};

#[derive(Debug, Default, Deserialize)]
struct ManifestFile {
    #[serde(default, rename = "model")]
    models: Vec<ModelSpec>,
}

/// One class entry of the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSpec {
    pub class: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub table: String,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    /// `false` for classes that live next to models but are not models
    #[serde(default = "default_true")]
    pub model: bool,
    #[serde(default, rename = "method")]
    pub methods: Vec<MethodSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MethodSpec {
    pub name: String,
    #[serde(default = "default_true")]
    pub public: bool,
    #[serde(default)]
    pub required_params: usize,
    #[serde(default)]
    pub returns: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub relation: Option<RelationSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationSpec {
    pub kind: RelationKind,
    /// Related class. Omitted when the related model cannot be resolved.
    #[serde(default)]
    pub target: Option<String>,
}

fn default_true() -> bool {
    true
}

impl MethodSpec {
    fn info(&self) -> MethodInfo {
        MethodInfo {
            name: self.name.clone(),
            public: self.public,
            required_params: self.required_params,
            return_type: self.returns.clone(),
            doc_comment: self.doc.clone(),
        }
    }
}

/// Catalog backed by a parsed manifest.
#[derive(Debug, Default)]
pub struct ManifestCatalog {
    models: Vec<ModelSpec>,
    index: HashMap<String, usize>,
}

impl ManifestCatalog {
    pub fn from_toml(content: &str) -> Result<Self, ManifestError> {
        let file: ManifestFile = toml::from_str(content)?;
        Self::from_specs(file.models)
    }

    pub fn from_specs(models: Vec<ModelSpec>) -> Result<Self, ManifestError> {
        let mut index = HashMap::with_capacity(models.len());
        for (position, spec) in models.iter().enumerate() {
            let key = normalize_class(&spec.class).to_string();
            if index.insert(key, position).is_some() {
                return Err(ManifestError::DuplicateClass {
                    class: spec.class.clone(),
                });
            }
        }
        Ok(Self { models, index })
    }

    /// Load a manifest file. A missing file yields an empty catalog.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.exists() {
            log::debug!("manifest {} not found, starting empty", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn spec(&self, class: &str) -> Option<&ModelSpec> {
        self.index.get(normalize_class(class)).map(|&i| &self.models[i])
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl ModelCatalog for ManifestCatalog {
    fn load(&self, class: &str) -> Result<Box<dyn DocModel + '_>, LoadError> {
        let spec = self.spec(class).ok_or_else(|| LoadError::NotFound {
            class: class.to_string(),
        })?;
        if !spec.model {
            return Err(LoadError::NotAModel {
                class: class.to_string(),
            });
        }
        if spec.is_abstract {
            return Err(LoadError::Abstract {
                class: class.to_string(),
            });
        }
        Ok(Box::new(ManifestModel { spec, catalog: self }))
    }

    fn contains(&self, class: &str) -> bool {
        self.spec(class).is_some()
    }
}

/// A model instantiated from its manifest entry.
pub struct ManifestModel<'a> {
    spec: &'a ModelSpec,
    catalog: &'a ManifestCatalog,
}

impl DocModel for ManifestModel<'_> {
    fn class_name(&self) -> &str {
        &self.spec.class
    }

    fn parent_class(&self) -> Option<&str> {
        self.spec.parent.as_deref()
    }

    fn declared_table(&self) -> &str {
        &self.spec.table
    }

    fn declared_methods(&self) -> Vec<MethodInfo> {
        self.spec.methods.iter().map(MethodSpec::info).collect()
    }

    fn probe_relation(&self, method: &str) -> Result<Option<Relation>, ProbeError> {
        let spec = self
            .spec
            .methods
            .iter()
            .find(|m| m.name == method)
            .ok_or_else(|| ProbeError::UnknownMethod {
                method: method.to_string(),
            })?;
        let Some(relation) = &spec.relation else {
            return Ok(None);
        };
        match &relation.target {
            // A relation pointing at a class nobody declares fails when it is built.
            Some(target) if !self.catalog.contains(target) => Err(ProbeError::Misconfigured {
                method: method.to_string(),
                reason: format!("related class {target} is not declared"),
            }),
            Some(target) => Ok(Some(Relation::new(relation.kind, normalize_class(target)))),
            None => Ok(Some(Relation::unresolved(relation.kind))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[[model]]
class = "app\\model\\UserModel"
table = "user"

[[model]]
class = "app\\model\\PostModel"
parent = "AppModel"

[[model.method]]
name = "getTitleTextAttr"
returns = "string"
doc = "/**\n * Title text\n */"

[[model.method]]
name = "author"
relation = { kind = "belongs_to", target = "app\\model\\UserModel" }

[[model.method]]
name = "editor"
relation = { kind = "belongs_to", target = "app\\model\\Missing" }

[[model.method]]
name = "subject"
relation = { kind = "morph_to" }

[[model.method]]
name = "toArray"

[[model]]
class = "app\\model\\BaseModel"
abstract = true

[[model]]
class = "app\\model\\Helper"
model = false
"#;

    fn catalog() -> ManifestCatalog {
        ManifestCatalog::from_toml(MANIFEST).unwrap()
    }

    #[test]
    fn test_manifest_parses_models_and_methods() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 4);
        let model = catalog.load("app\\model\\PostModel").unwrap();
        assert_eq!(model.parent_class(), Some("AppModel"));
        assert_eq!(model.declared_table(), "");
        let methods = model.declared_methods();
        assert_eq!(methods.len(), 5);
        assert_eq!(methods[0].return_type.as_deref(), Some("string"));
        assert!(methods[0].public);
    }

    #[test]
    fn test_probe_outcomes() {
        let catalog = catalog();
        let model = catalog.load("app\\model\\PostModel").unwrap();

        let author = model.probe_relation("author").unwrap().unwrap();
        assert_eq!(author.kind, RelationKind::BelongsTo);
        assert_eq!(author.target.as_deref(), Some("app\\model\\UserModel"));

        assert!(matches!(model.probe_relation("editor"), Err(ProbeError::Misconfigured { .. })));
        assert_eq!(model.probe_relation("subject").unwrap().unwrap().target, None);
        assert_eq!(model.probe_relation("toArray").unwrap(), None);
        assert!(matches!(model.probe_relation("nope"), Err(ProbeError::UnknownMethod { .. })));
    }

    #[test]
    fn test_load_rejections() {
        let catalog = catalog();
        assert!(matches!(catalog.load("app\\model\\BaseModel").err(), Some(LoadError::Abstract { .. })));
        assert!(matches!(catalog.load("app\\model\\Helper").err(), Some(LoadError::NotAModel { .. })));
        assert!(matches!(catalog.load("app\\model\\Ghost").err(), Some(LoadError::NotFound { .. })));
    }

    #[test]
    fn test_duplicate_classes_rejected() {
        let err = ManifestCatalog::from_toml(
            r#"
[[model]]
class = "app\\model\\A"
[[model]]
class = "\\app\\model\\A"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateClass { .. }));
    }

    #[test]
    fn test_missing_manifest_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ManifestCatalog::load(&dir.path().join("models.toml")).unwrap();
        assert!(catalog.is_empty());
    }
}
