mod commands;
mod context;
mod examples;
mod output;
mod theme;

use anyhow::Result;
use clap::{
    ColorChoice, Command, CommandFactory, FromArgMatches, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Color as ClapColor, Style},
    },
};
use colored::{Color as ThemeColor, Colorize, control::ShouldColorize};
use std::fmt::Write;
use std::path::PathBuf;

use commands::{
    generate::{GenerateArgs, handle_generate},
    init::{InitArgs, handle_init},
};
use examples::{ExampleGroup, command_examples};
use output::{GlobalOptions, OutputFormat, OutputManager};
use theme::{ICONS, THEME};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("MODELDOC_ROOT", "Project root used instead of searching for modeldoc.toml"),
    ("RUST_LOG", "Log filter for diagnostic output (e.g. modeldoc=debug)"),
];

#[derive(Parser)]
#[command(name = "modeldoc", version)]
#[command(
    about = "Keeps model schema maps and @property docs in sync with their tables",
    long_about = r#"Patches model classes in place with:

• a `protected $schema` field-type map built from the table's columns
• `@property` lines for columns, accessors and relations

Hand-written code and virtual fields are left alone, and a second run with the
same inputs changes nothing."#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Project root (defaults to the nearest directory containing modeldoc.toml)
    #[arg(long, global = true, env = "MODELDOC_ROOT")]
    root: Option<PathBuf>,

    /// Output format for the run report
    #[arg(long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Only print errors
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Print resolved paths and debug logs
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn parse_with_styles() -> Self {
        let matches = build_cli_command().get_matches();
        Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }
}

fn build_cli_command() -> Command {
    let use_color = ShouldColorize::from_env().should_colorize();
    let mut command = Cli::command()
        .styles(help_styles())
        .color(if use_color { ColorChoice::Auto } else { ColorChoice::Never })
        .after_long_help(render_environment(use_color));

    for example in command_examples() {
        if let Some(subcommand) = command.find_subcommand_mut(example.name) {
            *subcommand = subcommand.clone().after_long_help(render_examples(example.groups, use_color));
        }
    }
    command
}

fn render_examples(groups: &[ExampleGroup], use_color: bool) -> String {
    let mut buffer = format!("{}\n", paint("Examples:", THEME.highlight, true, use_color));
    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            buffer.push('\n');
        }
        let _ = writeln!(buffer, "  {}", paint(group.title, THEME.primary, true, use_color));
        let arrow = paint(ICONS.arrow, THEME.secondary, false, use_color);
        for command in group.commands {
            let _ = writeln!(buffer, "    {arrow} {}", paint(command, THEME.secondary, false, use_color));
        }
    }
    buffer
}

fn render_environment(use_color: bool) -> String {
    let mut buffer = format!("{}\n", paint("Environment Variables:", THEME.highlight, true, use_color));
    for (key, description) in ENVIRONMENT_VARIABLES {
        let _ = writeln!(
            buffer,
            "  {}  {}",
            paint(key, THEME.key, true, use_color),
            paint(description, THEME.value, false, use_color)
        );
    }
    let _ = writeln!(
        buffer,
        "\n{} Use 'modeldoc <command> --help' to see examples.",
        paint("Tip:", THEME.highlight, true, use_color)
    );
    buffer
}

fn paint(text: &str, color: ThemeColor, bold: bool, use_color: bool) -> String {
    match (use_color, bold) {
        (false, _) => text.to_string(),
        (true, true) => text.color(color).bold().to_string(),
        (true, false) => text.color(color).to_string(),
    }
}

fn help_styles() -> Styles {
    let style = |color: ThemeColor| Style::new().fg_color(Some(ClapColor::Ansi(ansi(color))));
    Styles::styled()
        .usage(style(THEME.primary).bold())
        .header(style(THEME.highlight).bold())
        .literal(style(THEME.secondary))
        .placeholder(style(THEME.muted))
        .valid(style(THEME.success))
        .invalid(style(THEME.warning))
        .error(style(THEME.error).bold())
}

/// Theme colors are all plain ANSI colors.
fn ansi(color: ThemeColor) -> AnsiColor {
    match color {
        ThemeColor::Red => AnsiColor::Red,
        ThemeColor::Green => AnsiColor::Green,
        ThemeColor::Yellow => AnsiColor::Yellow,
        ThemeColor::Blue => AnsiColor::Blue,
        ThemeColor::Magenta => AnsiColor::Magenta,
        ThemeColor::Cyan => AnsiColor::Cyan,
        ThemeColor::BrightBlack => AnsiColor::BrightBlack,
        ThemeColor::BrightBlue => AnsiColor::BrightBlue,
        ThemeColor::BrightCyan => AnsiColor::BrightCyan,
        _ => AnsiColor::White,
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize modeldoc in the current project
    Init(InitArgs),

    /// Regenerate schema maps and @property docs for model files
    Generate(GenerateArgs),
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "modeldoc=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

fn main() {
    let cli = Cli::parse_with_styles();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(err) = execute(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn execute(cli: Cli) -> Result<()> {
    let global_options = GlobalOptions {
        output_format: cli.output,
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };

    let output = OutputManager::new(global_options);
    let root = cli.root.as_deref();

    match cli.command {
        Commands::Init(args) => handle_init(args, root, &output)?,
        Commands::Generate(args) => handle_generate(args, root, &output)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_arguments() {
        let cli = Cli::try_parse_from([
            "modeldoc",
            "--output",
            "json",
            "generate",
            "UserModel,PostModel",
            "-D",
            "app/model",
            "--key-case",
            "snake",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.models, vec!["UserModel,PostModel"]);
        assert_eq!(args.dirs, vec!["app/model"]);
        assert_eq!(args.key_case, Some(modeldoc::KeyCase::Snake));
        assert!(args.dry_run);
    }

    #[test]
    fn test_examples_attach_to_subcommands() {
        let text = render_examples(commands::generate::EXAMPLES, false);
        assert!(text.starts_with("Examples:"));
        assert!(text.contains("modeldoc generate -D app/model"));
    }

    #[test]
    fn test_plain_help_appendix_lists_environment() {
        let text = render_environment(false);
        assert!(text.starts_with("Environment Variables:\n"));
        assert!(text.contains("  MODELDOC_ROOT  Project root"));
        assert!(text.ends_with("Tip: Use 'modeldoc <command> --help' to see examples.\n"));
    }
}
