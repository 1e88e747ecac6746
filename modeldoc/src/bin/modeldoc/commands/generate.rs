use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color as TableColor, Table};
use modeldoc::{
    CatalogChain, Generator, GeneratorConfig, KeyCase, ManifestCatalog, Outcome, RegisteredModels, RunEvent, RunReport,
    SnapshotSchemaSource, TargetReport, TargetResolver,
};

use crate::context::ProjectContext;
use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableDisplay};
use crate::theme::ICONS;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Single Models",
        commands: &[
            "modeldoc generate UserModel                     # Resolves to app\\model\\UserModel",
            "modeldoc generate UserModel,PostModel           # Comma-separated names",
            "modeldoc generate 'app\\admin\\model\\RoleModel'   # Fully qualified class",
        ],
    },
    ExampleGroup {
        title: "Directories",
        commands: &[
            "modeldoc generate -D app/model                  # Every model below app/model",
            "modeldoc generate -D app/model --dry-run        # Show what would change",
        ],
    },
    ExampleGroup {
        title: "Formatting",
        commands: &[
            "modeldoc generate -D app/model --key-case snake # snake_case property keys",
            "modeldoc --output json generate UserModel       # Machine-readable report",
        ],
    },
];

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Model names or classes; comma-separated values are split
    pub models: Vec<String>,

    /// Directories to scan recursively, relative to the project root
    #[arg(short = 'D', long = "dir", value_name = "DIR")]
    pub dirs: Vec<String>,

    /// Case convention for property and schema keys
    #[arg(long, value_enum)]
    pub key_case: Option<KeyCase>,

    /// Parent class expected in the class declaration
    #[arg(long)]
    pub parent: Option<String>,

    /// Namespace for bare model names
    #[arg(long)]
    pub namespace: Option<String>,

    /// Report changes without writing files
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    fn apply_overrides(&self, config: &mut GeneratorConfig) {
        if let Some(key_case) = self.key_case {
            config.key_case = key_case;
        }
        if let Some(parent) = &self.parent {
            config.parent_class = parent.clone();
        }
        if let Some(namespace) = &self.namespace {
            config.default_namespace = namespace.clone();
        }
    }
}

pub fn handle_generate(args: GenerateArgs, root: Option<&Path>, output: &OutputManager) -> Result<()> {
    let ctx = ProjectContext::locate(root)?;
    let mut config = ctx.config.generator.clone();
    args.apply_overrides(&mut config);

    if !ctx.is_initialized() {
        output.verbose("No modeldoc.toml found; using default settings");
    }
    output.verbose(&format!("Project root: {}", ctx.project_root.display()));
    output.verbose(&format!("Manifest: {}", ctx.manifest_path.display()));
    output.verbose(&format!("Schemas: {}", ctx.schemas_dir.display()));

    let resolver = TargetResolver::new(&ctx.project_root, config.default_namespace.as_str());
    let targets = resolver.resolve(&args.models, &args.dirs);
    if targets.is_empty() {
        output.error("No model files matched the given names or directories.");
        output.info("Pass model names (UserModel) or a directory (-D app/model).");
        anyhow::bail!("No models to process");
    }

    let manifest = ManifestCatalog::load(&ctx.manifest_path)
        .with_context(|| format!("Failed to load model manifest {}", ctx.manifest_path.display()))?;
    let registered = RegisteredModels;
    let catalog = CatalogChain::new().with(&manifest).with(&registered);
    let schema = SnapshotSchemaSource::new(&ctx.schemas_dir);

    output.heading(if args.dry_run { "Model docs (dry run)" } else { "Model docs" });

    let generator = Generator::new(&config, &catalog, &schema).dry_run(args.dry_run);
    let report = generator.run(&targets, |event| match event {
        RunEvent::Started(target) => output.progress(&target.class),
        RunEvent::Finished(report) => {
            output.clear_line();
            report_target(&ctx, report, args.dry_run, output);
        }
    });

    output.display(&report)?;
    Ok(())
}

fn report_target(ctx: &ProjectContext, report: &TargetReport, dry_run: bool, output: &OutputManager) {
    let path = ctx.relative(&report.path).display();
    match &report.outcome {
        Outcome::Updated if dry_run => output.success(&format!("{} would change ({path})", report.class)),
        Outcome::Updated => output.success(&format!("{} updated ({path})", report.class)),
        Outcome::Unchanged => output.indented(ICONS.unchanged, &format!("{} unchanged", report.class)),
        Outcome::Skipped(reason) => output.warning(&format!("Skipped: {reason}")),
        Outcome::Failed(reason) => output.error(&format!("{}: {reason}", report.class)),
    }
}

fn outcome_cell(outcome: &Outcome, dry_run: bool) -> Cell {
    match outcome {
        Outcome::Updated if dry_run => Cell::new("would change").fg(TableColor::Green),
        Outcome::Updated => Cell::new("updated").fg(TableColor::Green),
        Outcome::Unchanged => Cell::new("unchanged"),
        Outcome::Skipped(_) => Cell::new("skipped").fg(TableColor::Yellow),
        Outcome::Failed(_) => Cell::new("failed").fg(TableColor::Red),
    }
}

impl TableDisplay for RunReport {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.create_table();
        output.add_table_header(&mut table, vec!["Model", "File", "Status", "Detail"]);

        for target in &self.targets {
            let detail = match &target.outcome {
                Outcome::Skipped(reason) | Outcome::Failed(reason) => reason.as_str(),
                Outcome::Updated | Outcome::Unchanged => "",
            };
            table.add_row(vec![
                Cell::new(&target.class),
                Cell::new(format!("{} {}", ICONS.file, target.path.display())),
                outcome_cell(&target.outcome, self.dry_run),
                Cell::new(detail),
            ]);
        }

        table.add_row(vec![
            Cell::new(format!("{} model(s)", self.targets.len())),
            Cell::new(format!("finished {}", self.finished_at.format("%Y-%m-%d %H:%M:%S UTC"))),
            Cell::new(format!("{} updated", self.updated())),
            Cell::new(format!(
                "{} unchanged, {} skipped, {} failed",
                self.unchanged(),
                self.skipped(),
                self.failed()
            )),
        ]);
        table
    }

    fn to_compact(&self) -> String {
        format!(
            "updated={} unchanged={} skipped={} failed={}{}",
            self.updated(),
            self.unchanged(),
            self.skipped(),
            self.failed(),
            if self.dry_run { " (dry run)" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::GlobalOptions;
    use std::path::PathBuf;

    fn report() -> RunReport {
        RunReport {
            targets: vec![
                TargetReport {
                    class: "app\\model\\UserModel".into(),
                    path: PathBuf::from("app/model/UserModel.php"),
                    outcome: Outcome::Updated,
                },
                TargetReport {
                    class: "app\\model\\BaseModel".into(),
                    path: PathBuf::from("app/model/BaseModel.php"),
                    outcome: Outcome::Skipped("app\\model\\BaseModel is abstract".into()),
                },
            ],
            finished_at: chrono::Utc::now(),
            dry_run: false,
        }
    }

    #[test]
    fn test_compact_summary() {
        assert_eq!(report().to_compact(), "updated=1 unchanged=0 skipped=1 failed=0");
    }

    #[test]
    fn test_table_lists_every_target() {
        let output = OutputManager::new(GlobalOptions {
            no_color: true,
            ..Default::default()
        });
        let rendered = report().to_table(&output).to_string();
        assert!(rendered.contains("UserModel"));
        assert!(rendered.contains("is abstract"));
        assert!(rendered.contains("2 model(s)"));
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = GenerateArgs {
            key_case: Some(KeyCase::Snake),
            parent: Some("Pivot".into()),
            ..Default::default()
        };
        let mut config = GeneratorConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.key_case, KeyCase::Snake);
        assert_eq!(config.parent_class, "Pivot");
        assert_eq!(config.default_namespace, "app\\model\\");
    }
}
