//! The reflection surface a model exposes to the inspector.

use crate::errors::{LoadError, ProbeError};
use crate::types::{MethodInfo, Relation};

/// A live, instantiated model class.
pub trait DocModel {
    /// Fully qualified class name (e.g. `app\model\UserModel`).
    fn class_name(&self) -> &str;

    /// Parent class named in the class declaration. `None` means the configured default.
    fn parent_class(&self) -> Option<&str> {
        None
    }

    /// Table name declared on the class itself; empty when the class relies on the derived name.
    fn declared_table(&self) -> &str;

    /// Methods declared directly on this class, in declaration order. Inherited methods are excluded.
    fn declared_methods(&self) -> Vec<MethodInfo>;

    /// Call a zero-argument method and report the relation it builds.
    ///
    /// `Ok(None)` means the method ran but returned something other than a relation.
    fn probe_relation(&self, method: &str) -> Result<Option<Relation>, ProbeError>;
}

/// Resolves class names to live models.
pub trait ModelCatalog {
    fn load(&self, class: &str) -> Result<Box<dyn DocModel + '_>, LoadError>;

    /// Whether the catalog knows the class at all, model or not.
    fn contains(&self, class: &str) -> bool;
}

/// Consults several catalogs in order; the first one that knows a class answers for it.
#[derive(Default)]
pub struct CatalogChain<'a> {
    catalogs: Vec<&'a dyn ModelCatalog>,
}

impl<'a> CatalogChain<'a> {
    pub fn new() -> Self {
        Self { catalogs: Vec::new() }
    }

    pub fn with(mut self, catalog: &'a dyn ModelCatalog) -> Self {
        self.catalogs.push(catalog);
        self
    }
}

impl ModelCatalog for CatalogChain<'_> {
    fn load(&self, class: &str) -> Result<Box<dyn DocModel + '_>, LoadError> {
        match self.catalogs.iter().find(|catalog| catalog.contains(class)) {
            Some(catalog) => catalog.load(class),
            None => Err(LoadError::NotFound {
                class: class.to_string(),
            }),
        }
    }

    fn contains(&self, class: &str) -> bool {
        self.catalogs.iter().any(|catalog| catalog.contains(class))
    }
}

/// Normalizes a class name for lookup: no leading namespace separator.
pub(crate) fn normalize_class(class: &str) -> &str {
    class.trim_start_matches('\\')
}
