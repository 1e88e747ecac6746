use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

use crate::model::DocModel;
use crate::types::{KeyCase, class_basename};

/// Settings that shape the generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Namespace prepended to bare model names
    #[serde(default = "default_namespace")]
    pub default_namespace: String,
    /// Parent class expected in `class X extends <parent>`
    #[serde(default = "default_parent_class")]
    pub parent_class: String,
    #[serde(default)]
    pub key_case: KeyCase,
    #[serde(default = "default_indent")]
    pub indent: String,
    /// Substrings that mark a hand-written `@property` line as a virtual field
    #[serde(default = "default_virtual_markers")]
    pub virtual_markers: Vec<String>,
    /// Stripped from the class name before deriving a table name
    #[serde(default = "default_model_suffix")]
    pub model_suffix: String,
    #[serde(default)]
    pub table_prefix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
            parent_class: default_parent_class(),
            key_case: KeyCase::default(),
            indent: default_indent(),
            virtual_markers: default_virtual_markers(),
            model_suffix: default_model_suffix(),
            table_prefix: String::new(),
        }
    }
}

fn default_namespace() -> String {
    "app\\model\\".to_string()
}

fn default_parent_class() -> String {
    "BaseModel".to_string()
}

fn default_indent() -> String {
    "    ".to_string()
}

fn default_virtual_markers() -> Vec<String> {
    vec!["[virtual]".to_string(), "虚拟字段".to_string()]
}

fn default_model_suffix() -> String {
    "Model".to_string()
}

impl GeneratorConfig {
    /// Table the model maps to: its declared table, else one derived from the class name.
    pub fn table_for(&self, model: &dyn DocModel) -> String {
        let declared = model.declared_table();
        if !declared.is_empty() {
            return declared.to_string();
        }
        self.derived_table(model.class_name())
    }

    /// `app\model\UserProfileModel` -> `user_profile` (plus the configured prefix).
    pub fn derived_table(&self, class: &str) -> String {
        let base = class_basename(class);
        let base = match base.strip_suffix(self.model_suffix.as_str()) {
            Some(stem) if !stem.is_empty() && !self.model_suffix.is_empty() => stem,
            _ => base,
        };
        format!("{}{}", self.table_prefix, base.to_snake_case())
    }

    pub fn parent_for<'m>(&'m self, model: &'m dyn DocModel) -> &'m str {
        model.parent_class().unwrap_or(&self.parent_class)
    }
}
