//! Model auto-registration via inventory crate.
//!
//! Programs that embed modeldoc can describe their models in Rust instead of a manifest.
//! Each model submits a [`ModelRegistration`] and becomes loadable through [`RegisteredModels`]:
//!
//! ```ignore
//! modeldoc::inventory::submit! {
//!     modeldoc::ModelRegistration {
//!         class: "app\\model\\UserModel",
//!         is_abstract: false,
//!         construct: new_user_model,
//!     }
//! }
//!
//! fn new_user_model() -> Box<dyn modeldoc::DocModel> {
//!     Box::new(UserModel::default())
//! }
//! ```

use crate::errors::LoadError;
use crate::model::{DocModel, ModelCatalog, normalize_class};

/// Metadata for a model registered at compile time.
pub struct ModelRegistration {
    /// Fully qualified class name (e.g., "app\\model\\UserModel")
    pub class: &'static str,
    /// Abstract classes are known but never instantiated
    pub is_abstract: bool,
    /// Builds a fresh model instance
    pub construct: fn() -> Box<dyn DocModel>,
}

inventory::collect!(ModelRegistration);

/// Get all registered models.
pub fn registered_models() -> impl Iterator<Item = &'static ModelRegistration> {
    inventory::iter::<ModelRegistration>()
}

/// Get a registered model by class name.
pub fn get_model_by_class(class: &str) -> Option<&'static ModelRegistration> {
    let class = normalize_class(class);
    registered_models().find(|r| normalize_class(r.class) == class)
}

/// Catalog over every [`ModelRegistration`] linked into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegisteredModels;

impl ModelCatalog for RegisteredModels {
    fn load(&self, class: &str) -> Result<Box<dyn DocModel + '_>, LoadError> {
        let registration = get_model_by_class(class).ok_or_else(|| LoadError::NotFound {
            class: class.to_string(),
        })?;
        if registration.is_abstract {
            return Err(LoadError::Abstract {
                class: class.to_string(),
            });
        }
        Ok((registration.construct)())
    }

    fn contains(&self, class: &str) -> bool {
        get_model_by_class(class).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProbeError;
    use crate::types::{MethodInfo, Relation, RelationKind};

    struct RegisteredPost;

    impl DocModel for RegisteredPost {
        fn class_name(&self) -> &str {
            "app\\model\\RegisteredPost"
        }

        fn declared_table(&self) -> &str {
            "post"
        }

        fn declared_methods(&self) -> Vec<MethodInfo> {
            vec![MethodInfo::new("author")]
        }

        fn probe_relation(&self, method: &str) -> Result<Option<Relation>, ProbeError> {
            match method {
                "author" => Ok(Some(Relation::new(RelationKind::BelongsTo, "app\\model\\UserModel"))),
                _ => Err(ProbeError::UnknownMethod {
                    method: method.to_string(),
                }),
            }
        }
    }

    inventory::submit! {
        ModelRegistration {
            class: "app\\model\\RegisteredPost",
            is_abstract: false,
            construct: construct_post,
        }
    }

    inventory::submit! {
        ModelRegistration {
            class: "app\\model\\RegisteredBase",
            is_abstract: true,
            construct: construct_post,
        }
    }

    fn construct_post() -> Box<dyn DocModel> {
        Box::new(RegisteredPost)
    }

    #[test]
    fn test_registered_model_loads() {
        let model = RegisteredModels.load("\\app\\model\\RegisteredPost").unwrap();
        assert_eq!(model.declared_table(), "post");
        assert_eq!(model.declared_methods().len(), 1);
    }

    #[test]
    fn test_abstract_registration_is_rejected() {
        assert!(RegisteredModels.contains("app\\model\\RegisteredBase"));
        let err = RegisteredModels.load("app\\model\\RegisteredBase").err().unwrap();
        assert!(matches!(err, LoadError::Abstract { .. }));
    }

    #[test]
    fn test_unknown_class_is_not_found() {
        let err = RegisteredModels.load("app\\model\\Nope").err().unwrap();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }
}
