//! Classifies a model's declared methods into accessors, mutators, search filters and relations.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::DocModel;
use crate::types::{MethodInfo, PropertyOrigin, RelationDescriptor, class_basename};

static ACCESSOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^get(\w+)Attr$").expect("valid accessor pattern"));
static MUTATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^set\w+Attr$").expect("valid mutator pattern"));
static SEARCH_FILTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^search\w*Attr$").expect("valid search pattern"));

/// Type used for the collection half of a to-many relation.
pub const COLLECTION_TYPE: &str = "Collection";

const ACCESSOR_MARKER: &str = "[accessor]";

/// One `(name, type, comment)` fact destined for the property registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub name: String,
    pub ty: String,
    pub comment: String,
    pub origin: PropertyOrigin,
}

/// Everything learned from one model's declared methods, in reflection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inspection {
    pub contributions: Vec<Contribution>,
    /// Accessor, mutator and search-filter method names, for `@uses` lines.
    pub uses: Vec<String>,
}

/// How a declared method is treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodRole {
    /// `get<X>Attr`, carrying `<X>`
    Accessor(String),
    Mutator,
    SearchFilter,
    /// Public and callable without arguments; may build a relation
    RelationCandidate,
    Ignored,
}

pub fn classify(method: &MethodInfo) -> MethodRole {
    if let Some(captures) = ACCESSOR.captures(&method.name) {
        return MethodRole::Accessor(captures[1].to_string());
    }
    if MUTATOR.is_match(&method.name) {
        return MethodRole::Mutator;
    }
    if SEARCH_FILTER.is_match(&method.name) {
        return MethodRole::SearchFilter;
    }
    if method.public && method.required_params == 0 {
        return MethodRole::RelationCandidate;
    }
    MethodRole::Ignored
}

/// Walk the model's declared methods and collect property contributions.
pub fn inspect(model: &dyn DocModel) -> Inspection {
    let mut inspection = Inspection::default();

    for method in model.declared_methods() {
        match classify(&method) {
            MethodRole::Accessor(field) => {
                inspection.uses.push(method.name.clone());
                inspection.contributions.push(Contribution {
                    name: field,
                    ty: accessor_type(&method),
                    comment: format!("{}{ACCESSOR_MARKER}", leading_doc_line(method.doc_comment.as_deref())),
                    origin: PropertyOrigin::Accessor,
                });
            }
            MethodRole::Mutator | MethodRole::SearchFilter => {
                inspection.uses.push(method.name.clone());
            }
            MethodRole::RelationCandidate => {
                if let Some(relation) = try_classify_relation(model, &method) {
                    inspection.contributions.extend(relation_contributions(&relation));
                }
            }
            MethodRole::Ignored => {}
        }
    }

    inspection
}

/// Probe `method` on `model` and describe the relation it builds.
///
/// Returns `None` on any probe failure, and when the method returns something that is not a relation.
pub fn try_classify_relation(model: &dyn DocModel, method: &MethodInfo) -> Option<RelationDescriptor> {
    let relation = match model.probe_relation(&method.name) {
        Ok(Some(relation)) => relation,
        Ok(None) => return None,
        Err(err) => {
            log::debug!("skipping {}::{}: {err}", model.class_name(), method.name);
            return None;
        }
    };

    Some(RelationDescriptor {
        method_name: method.name.clone(),
        cardinality: relation.kind.cardinality(),
        target_type_name: relation.target.as_deref().map(class_basename).unwrap_or_default().to_string(),
        comment: leading_doc_line(method.doc_comment.as_deref()),
    })
}

/// A single relation documents its target; to-many relations document `Target[]` and `Collection`.
pub fn relation_contributions(relation: &RelationDescriptor) -> Vec<Contribution> {
    let comment = format!("{}{}", relation.comment, relation.cardinality.marker());
    let contribution = |ty: String| Contribution {
        name: relation.method_name.clone(),
        ty,
        comment: comment.clone(),
        origin: PropertyOrigin::Relation,
    };

    if relation.cardinality.is_single() {
        return vec![contribution(relation.target_type_name.clone())];
    }

    let array_type = if relation.target_type_name.is_empty() {
        String::new()
    } else {
        format!("{}[]", relation.target_type_name)
    };
    vec![contribution(array_type), contribution(COLLECTION_TYPE.to_string())]
}

/// Declared return type, else the `@return` tag, else `string`.
pub fn accessor_type(method: &MethodInfo) -> String {
    method
        .return_type
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
        .or_else(|| method.doc_comment.as_deref().and_then(doc_return_type))
        .unwrap_or_else(|| "string".to_string())
}

/// First descriptive line of a doc comment, skipping tag lines.
pub fn leading_doc_line(doc: Option<&str>) -> String {
    let Some(doc) = doc else {
        return String::new();
    };
    doc.lines()
        .filter(|line| !line.contains('@'))
        .map(strip_comment_punctuation)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Type named by the first `@return` tag.
pub fn doc_return_type(doc: &str) -> Option<String> {
    doc.lines()
        .find_map(|line| line.split_once("@return").map(|(_, rest)| rest))
        .and_then(|rest| rest.split_whitespace().next())
        .map(str::to_string)
}

fn strip_comment_punctuation(line: &str) -> &str {
    line.trim()
        .trim_start_matches("/**")
        .trim_end_matches("*/")
        .trim_start_matches('*')
        .trim()
}
