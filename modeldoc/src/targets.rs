//! Turning command-line model names and directories into files to patch.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use walkdir::WalkDir;

const SOURCE_EXTENSION: &str = "php";

/// A model class and the file that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    /// Fully qualified class (e.g. `app\model\UserModel`)
    pub class: String,
    /// Short class name used in the class declaration
    pub class_name: String,
    pub path: PathBuf,
}

/// Resolves model names and model directories relative to a project root.
#[derive(Debug, Clone)]
pub struct TargetResolver {
    root: PathBuf,
    default_namespace: String,
}

impl TargetResolver {
    pub fn new(root: impl Into<PathBuf>, default_namespace: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            default_namespace: default_namespace.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve both lists. Each class appears once, at its first position.
    pub fn resolve(&self, models: &[String], dirs: &[String]) -> Vec<Target> {
        let mut targets = IndexMap::new();
        for name in split_list(models) {
            if let Some(target) = self.resolve_model(&name) {
                targets.insert(target.class.clone(), target);
            }
        }
        for dir in split_list(dirs) {
            for target in self.scan_dir(&dir) {
                targets.insert(target.class.clone(), target);
            }
        }
        targets.into_values().collect()
    }

    /// `UserModel` or `app\model\UserModel`. Names whose file does not exist resolve to nothing.
    pub fn resolve_model(&self, name: &str) -> Option<Target> {
        let name = name.trim().trim_start_matches('\\');
        if name.is_empty() {
            return None;
        }

        let class = if name.contains('\\') {
            name.to_string()
        } else {
            format!("{}\\{}", self.default_namespace.trim_end_matches('\\'), capitalize(name))
        };

        let relative: PathBuf = class.split('\\').collect();
        let path = self.root.join(relative).with_extension(SOURCE_EXTENSION);
        if !path.is_file() {
            log::debug!("{class}: {} does not exist", path.display());
            return None;
        }

        let class_name = class.rsplit('\\').next().unwrap_or(&class).to_string();
        Some(Target { class, class_name, path })
    }

    /// Every source file below `dir`, recursively, in file-name order.
    pub fn scan_dir(&self, dir: &str) -> Vec<Target> {
        let base = self.root.join(dir.trim().trim_matches('/'));
        if !base.is_dir() {
            log::debug!("{} is not a directory", base.display());
            return Vec::new();
        }

        WalkDir::new(&base)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.target_for_file(entry.path()))
            .collect()
    }

    fn target_for_file(&self, path: &Path) -> Option<Target> {
        if path.extension().is_none_or(|ext| ext != SOURCE_EXTENSION) {
            return None;
        }
        let relative = path.strip_prefix(&self.root).ok()?.with_extension("");
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        if parts.iter().any(|p| p.starts_with('.')) {
            return None;
        }

        Some(Target {
            class: parts.join("\\"),
            class_name: parts.last()?.clone(),
            path: path.to_path_buf(),
        })
    }
}

/// Flatten `["a,b", "c"]` into `["a", "b", "c"]`.
pub fn split_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
