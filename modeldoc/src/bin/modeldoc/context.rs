use anyhow::{Context, Result};
use modeldoc::GeneratorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project configuration file
pub const CONFIG_FILE: &str = "modeldoc.toml";

/// Project context for modeldoc operations
pub struct ProjectContext {
    /// Root directory of the project (where modeldoc.toml is)
    pub project_root: PathBuf,
    /// Path to config file
    pub config_path: PathBuf,
    /// Path to the model manifest
    pub manifest_path: PathBuf,
    /// Path to table snapshots
    pub schemas_dir: PathBuf,
    /// Loaded configuration, defaults when no config file exists
    pub config: ProjectConfig,
}

/// Configuration stored in modeldoc.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub sources: SourceSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    #[serde(default = "default_manifest")]
    pub manifest: String,
    #[serde(default = "default_schemas_dir")]
    pub schemas_dir: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            schemas_dir: default_schemas_dir(),
        }
    }
}

fn default_manifest() -> String {
    ".modeldoc/models.toml".to_string()
}

fn default_schemas_dir() -> String {
    ".modeldoc/schemas".to_string()
}

impl ProjectContext {
    /// Use `root` when given, else search from the current directory
    pub fn locate(root: Option<&Path>) -> Result<Self> {
        match root {
            Some(root) => Self::from_root(root.to_path_buf()),
            None => Self::find(),
        }
    }

    /// Find and load project context from current directory or ancestors
    pub fn find() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::find_from(&current_dir)
    }

    /// Find project context starting from the given directory.
    ///
    /// Falls back to `start` itself when no ancestor carries a config file.
    pub fn find_from(start: &Path) -> Result<Self> {
        let project_root = Self::find_project_root(start).unwrap_or_else(|| start.to_path_buf());
        Self::from_root(project_root)
    }

    /// Create context from a known project root
    pub fn from_root(project_root: PathBuf) -> Result<Self> {
        let config_path = project_root.join(CONFIG_FILE);

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            toml::from_str(&content).with_context(|| format!("Failed to parse {}", config_path.display()))?
        } else {
            ProjectConfig::default()
        };

        Ok(Self {
            manifest_path: project_root.join(&config.sources.manifest),
            schemas_dir: project_root.join(&config.sources.schemas_dir),
            project_root,
            config_path,
            config,
        })
    }

    /// Find project root by looking for modeldoc.toml
    fn find_project_root(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(CONFIG_FILE).is_file())
            .map(Path::to_path_buf)
    }

    /// Check if modeldoc is initialized in this project
    pub fn is_initialized(&self) -> bool {
        self.config_path.exists()
    }

    /// Path relative to the project root, for display
    pub fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.project_root).unwrap_or(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProjectConfig::default();
        assert_eq!(config.sources.manifest, ".modeldoc/models.toml");
        assert_eq!(config.sources.schemas_dir, ".modeldoc/schemas");
        assert_eq!(config.generator.parent_class, "BaseModel");
    }

    #[test]
    fn test_config_serialization() {
        let config = ProjectConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[generator]"));
        assert!(toml_str.contains("schemas_dir"));

        let parsed: ProjectConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.generator, config.generator);
    }

    #[test]
    fn test_find_walks_up_to_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[generator]\nkey_case = \"snake\"\n[sources]\nschemas_dir = \"db\"\n",
        )
        .unwrap();
        let nested = dir.path().join("app/model");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = ProjectContext::find_from(&nested).unwrap();
        assert_eq!(ctx.project_root, dir.path());
        assert!(ctx.is_initialized());
        assert_eq!(ctx.schemas_dir, dir.path().join("db"));
        assert_eq!(ctx.manifest_path, dir.path().join(".modeldoc/models.toml"));
        assert_eq!(ctx.config.generator.key_case, modeldoc::KeyCase::Snake);
    }

    #[test]
    fn test_without_config_uses_start_dir() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ProjectContext::find_from(dir.path()).unwrap();
        assert_eq!(ctx.project_root, dir.path());
        assert!(!ctx.is_initialized());
    }
}
