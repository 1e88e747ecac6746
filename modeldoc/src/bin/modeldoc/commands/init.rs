use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use crate::context::{CONFIG_FILE, ProjectConfig, ProjectContext};
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Project Setup",
    commands: &[
        "modeldoc init                      # Write modeldoc.toml and an empty manifest",
        "modeldoc init --force              # Overwrite an existing modeldoc.toml",
        "modeldoc --root ../shop init       # Initialize another project",
    ],
}];

const MANIFEST_TEMPLATE: &str = r#"# Model classes known to modeldoc.
#
# [[model]]
# class = "app\\model\\UserModel"
# table = "user"
#
# [[model.method]]
# name = "posts"
# doc = "/**\n * Posts written by the user\n */"
# relation = { kind = "has_many", target = "app\\model\\PostModel" }
"#;

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

pub fn handle_init(args: InitArgs, root: Option<&Path>, output: &OutputManager) -> Result<()> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let config_path = root.join(CONFIG_FILE);

    output.heading("Initializing modeldoc");

    if config_path.exists() && !args.force {
        output.warning(&format!("{CONFIG_FILE} already exists; use --force to overwrite it."));
        return Ok(());
    }

    let config = ProjectConfig::default();
    let content = toml::to_string_pretty(&config).context("Failed to serialize default configuration")?;
    fs::write(&config_path, content).with_context(|| format!("Failed to write {}", config_path.display()))?;
    output.success(&format!("Created {CONFIG_FILE}"));

    let ctx = ProjectContext::from_root(root)?;
    fs::create_dir_all(&ctx.schemas_dir)
        .with_context(|| format!("Failed to create {}", ctx.schemas_dir.display()))?;
    output.bullet(&format!("Table snapshots: {}", ctx.relative(&ctx.schemas_dir).display()));

    if ctx.manifest_path.exists() {
        output.bullet(&format!("Keeping manifest: {}", ctx.relative(&ctx.manifest_path).display()));
    } else {
        if let Some(parent) = ctx.manifest_path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&ctx.manifest_path, MANIFEST_TEMPLATE)
            .with_context(|| format!("Failed to write {}", ctx.manifest_path.display()))?;
        output.bullet(&format!("Model manifest: {}", ctx.relative(&ctx.manifest_path).display()));
    }

    output.info("Next: describe your models in the manifest, then run 'modeldoc generate -D app/model'.");
    Ok(())
}
