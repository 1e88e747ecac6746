//! Shared descriptors passed between the schema source, the inspector and the registries.

use serde::{Deserialize, Serialize};

/// One column of a table as reported by the schema source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub db_type: String,
    #[serde(default)]
    pub comment: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, db_type: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            db_type: db_type.into(),
            comment: comment.into(),
        }
    }
}

/// Relation builders a model method can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    HasOne,
    BelongsTo,
    MorphOne,
    HasOneThrough,
    HasMany,
    HasManyThrough,
    BelongsToMany,
    MorphTo,
    MorphMany,
    MorphToMany,
}

impl RelationKind {
    pub fn cardinality(self) -> Cardinality {
        match self {
            RelationKind::HasOne | RelationKind::BelongsTo | RelationKind::MorphOne | RelationKind::HasOneThrough => {
                Cardinality::OneToOne
            }
            RelationKind::HasMany | RelationKind::HasManyThrough | RelationKind::BelongsToMany => {
                Cardinality::OneToMany
            }
            RelationKind::MorphTo | RelationKind::MorphMany => Cardinality::PolymorphicOneToMany,
            RelationKind::MorphToMany => Cardinality::PolymorphicManyToMany,
        }
    }
}

/// How many related records a relation yields, and whether it is polymorphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    PolymorphicOneToMany,
    PolymorphicManyToMany,
}

impl Cardinality {
    /// Marker appended to the relation's comment.
    pub fn marker(self) -> &'static str {
        match self {
            Cardinality::OneToOne => "[one-to-one]",
            Cardinality::OneToMany => "[one-to-many]",
            Cardinality::PolymorphicOneToMany => "[polymorphic one-to-many]",
            Cardinality::PolymorphicManyToMany => "[polymorphic many-to-many]",
        }
    }

    pub fn is_single(self) -> bool {
        matches!(self, Cardinality::OneToOne)
    }
}

/// A relation discovered by probing a model method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDescriptor {
    pub method_name: String,
    pub cardinality: Cardinality,
    /// Short class name of the related model; empty when it cannot be resolved.
    pub target_type_name: String,
    pub comment: String,
}

/// Result of calling a relation-building method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub kind: RelationKind,
    /// Fully qualified class of the related model, if it could be resolved.
    pub target: Option<String>,
}

impl Relation {
    pub fn new(kind: RelationKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: Some(target.into()),
        }
    }

    pub fn unresolved(kind: RelationKind) -> Self {
        Self { kind, target: None }
    }
}

/// A method declared directly on a model class (inherited methods are never listed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    #[serde(default = "default_public")]
    pub public: bool,
    #[serde(default)]
    pub required_params: usize,
    #[serde(default, rename = "returns")]
    pub return_type: Option<String>,
    #[serde(default, rename = "doc")]
    pub doc_comment: Option<String>,
}

fn default_public() -> bool {
    true
}

impl MethodInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public: true,
            required_params: 0,
            return_type: None,
            doc_comment: None,
        }
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc_comment = Some(doc.into());
        self
    }

    pub fn params(mut self, required: usize) -> Self {
        self.required_params = required;
        self
    }

    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }
}

/// Where a property entry first came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyOrigin {
    Column,
    Accessor,
    Relation,
}

/// Case convention applied to property keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum KeyCase {
    /// `created_at` -> `CREATED_AT`
    #[default]
    Upper,
    /// `FullName` -> `full_name`
    Snake,
}

/// Short class name of a fully qualified `a\b\Class` name.
pub fn class_basename(class: &str) -> &str {
    class.rsplit('\\').next().unwrap_or(class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_kinds_map_to_cardinality() {
        assert_eq!(RelationKind::BelongsTo.cardinality(), Cardinality::OneToOne);
        assert_eq!(RelationKind::HasOneThrough.cardinality(), Cardinality::OneToOne);
        assert_eq!(RelationKind::BelongsToMany.cardinality(), Cardinality::OneToMany);
        assert_eq!(RelationKind::MorphTo.cardinality(), Cardinality::PolymorphicOneToMany);
        assert_eq!(RelationKind::MorphToMany.cardinality(), Cardinality::PolymorphicManyToMany);
    }

    #[test]
    fn basename_strips_namespace() {
        assert_eq!(class_basename("app\\model\\UserModel"), "UserModel");
        assert_eq!(class_basename("UserModel"), "UserModel");
    }

    #[test]
    fn column_descriptor_reads_type_field() {
        let column: ColumnDescriptor = serde_json::from_str(r#"{"name":"id","type":"int"}"#).unwrap();
        assert_eq!(column, ColumnDescriptor::new("id", "int", ""));
    }
}
