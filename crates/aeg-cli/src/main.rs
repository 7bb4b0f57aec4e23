use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use miette::GraphicalReportHandler;

use aeg_core::config::{self, AegConfig, CONFIG_FILE_NAME};
use aeg_core::diagnostics::Diagnostic;
use aeg_core::host::{self, Expansion, MacroRegistry};
use aeg_core::parse;
use aeg_core::syntax::{Decl, Syntax};
use aeg_macros::case_extractor::extract_cases;

#[derive(Parser)]
#[command(name = "aeg", about = "AppEnum conformance generator for Swift enums", version)]
struct Cli {
    /// Path to the config file (defaults to `.aeg.yaml` when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand attached macros and print the expanded source
    Expand {
        /// Path to the Swift source file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Apply the suggested replacements of `@AppEnumGenFixIt`
    Fix {
        /// Path to the Swift source file
        #[arg(short, long)]
        input: PathBuf,

        /// Overwrite the input file instead of printing the result
        #[arg(long)]
        write: bool,
    },

    /// Inspect the enums of a Swift source file
    Inspect {
        /// Path to the Swift source file
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// List the macros the plugin provides
    Macros,

    /// Initialize a new aeg configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Expand { input } => cmd_expand(cli.config, input),

        Commands::Fix { input, write } => cmd_fix(cli.config, input, write),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Macros => cmd_macros(cli.config),

        Commands::Init { force } => cmd_init(&PathBuf::from(CONFIG_FILE_NAME), force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "aeg", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the config named on the command line, or `.aeg.yaml` from the current directory.
fn resolve_config(explicit: Option<PathBuf>) -> Result<AegConfig> {
    match explicit {
        Some(path) => config::load_config(&path)
            .map_err(|e| anyhow::anyhow!(e))?
            .with_context(|| format!("config file {} not found", path.display())),
        None => {
            let cfg = config::load_config(Path::new(CONFIG_FILE_NAME))
                .map_err(|e| anyhow::anyhow!(e))?;
            Ok(cfg.unwrap_or_default())
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn expand_file(path: &Path, registry: &MacroRegistry) -> Result<(String, Expansion)> {
    let source = read_source(path)?;
    let expansion = host::expand_source(&source, registry)
        .with_context(|| format!("failed to expand {}", path.display()))?;
    log::debug!(
        "expanded {} with {} diagnostics",
        path.display(),
        expansion.diagnostics.len()
    );
    Ok((source, expansion))
}

/// Print diagnostics to stderr as miette reports.
fn report(path: &Path, source: &str, diagnostics: &[Diagnostic]) -> Result<()> {
    let file_name = path.display().to_string();
    let handler = GraphicalReportHandler::new();
    for diagnostic in diagnostics {
        let mut out = String::new();
        handler.render_report(&mut out, &diagnostic.with_source(&file_name, source))?;
        eprintln!("{out}");
    }
    Ok(())
}

fn error_count(diagnostics: &[Diagnostic]) -> usize {
    diagnostics.iter().filter(|d| d.is_error()).count()
}

fn cmd_expand(config: Option<PathBuf>, input: PathBuf) -> Result<()> {
    let cfg = resolve_config(config)?;
    let registry = aeg_macros::plugin(&cfg);
    let (source, expansion) = expand_file(&input, &registry)?;

    print!("{}", expansion.expanded_source);
    report(&input, &source, &expansion.diagnostics)?;

    if expansion.has_errors() {
        anyhow::bail!(
            "{} error(s) while expanding {}",
            error_count(&expansion.diagnostics),
            input.display()
        );
    }
    Ok(())
}

/// Expand `input` and splice in every suggested replacement. Returns the fixed source and
/// the number of fix-its applied.
fn fix_source(input: &Path, cfg: &AegConfig) -> Result<(String, usize)> {
    let registry = aeg_macros::plugin(cfg);
    let (source, expansion) = expand_file(input, &registry)?;
    report(input, &source, &expansion.diagnostics)?;

    let applied = expansion
        .diagnostics
        .iter()
        .map(|d| d.fix_its.len())
        .sum();
    let fixed = host::apply_fix_its(&source, &expansion.diagnostics)
        .with_context(|| format!("failed to apply fix-its to {}", input.display()))?;
    Ok((fixed, applied))
}

fn cmd_fix(config: Option<PathBuf>, input: PathBuf, write: bool) -> Result<()> {
    let cfg = resolve_config(config)?;
    let (fixed, applied) = fix_source(&input, &cfg)?;

    if !write {
        print!("{}", fixed);
        return Ok(());
    }

    if applied == 0 {
        eprintln!("No fix-its for {}", input.display());
        return Ok(());
    }
    fs::write(&input, &fixed).with_context(|| format!("failed to write {}", input.display()))?;
    eprintln!("Applied {} fix-it(s) to {}", applied, input.display());
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<()> {
    let source = read_source(&input)?;
    let file = parse::parse_source(&source)
        .with_context(|| format!("failed to parse {}", input.display()))?;

    let summary = build_inspect_summary(file.items.iter().map(|item| &item.decl));

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary<'a>(decls: impl Iterator<Item = &'a Decl>) -> serde_json::Value {
    let enums: Vec<serde_json::Value> = decls
        .filter_map(Decl::as_enum)
        .map(|e| {
            let inheritance: Vec<String> = e
                .inheritance_clause
                .iter()
                .flat_map(|clause| &clause.inherited_types)
                .map(|inherited| inherited.ty.trimmed_source())
                .collect();
            let cases: Vec<String> = extract_cases(&e.member_block)
                .iter()
                .map(|entry| entry.label().to_string())
                .collect();
            serde_json::json!({
                "name": e.name.identifier_text(),
                "attributes": e.attributes.iter().map(|a| a.name_text()).collect::<Vec<_>>(),
                "inheritance": inheritance,
                "cases": cases,
            })
        })
        .collect();

    serde_json::json!({ "enums": enums })
}

fn cmd_macros(config: Option<PathBuf>) -> Result<()> {
    let cfg = resolve_config(config)?;
    let registry = aeg_macros::plugin(&cfg);
    for name in registry.names() {
        let conformance = registry.get(name).map(|m| m.conformance()).unwrap_or_default();
        println!("@{name}  ({conformance})");
    }
    Ok(())
}

fn cmd_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "@AppEnumGenFixIt\nenum Color: String {\n    case red, green\n}\n";

    fn write_input(dir: &Path, source: &str) -> PathBuf {
        let path = dir.join("Color.swift");
        fs::write(&path, source).unwrap();
        path
    }

    #[test]
    fn test_fix_source_applies_replacement() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), SOURCE);

        let (fixed, applied) = fix_source(&input, &AegConfig::default()).unwrap();
        assert_eq!(applied, 1);
        assert!(fixed.starts_with("//@AppEnumGenFixIt\nenum Color: String, AppEnum {\n"));
        assert!(fixed.contains(".red: \"red\", .green: \"green\""));
    }

    #[test]
    fn test_fix_write_overwrites_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), SOURCE);

        cmd_fix(None, input.clone(), true).unwrap();
        let written = fs::read_to_string(&input).unwrap();
        assert!(written.contains("static var caseDisplayRepresentations"));
        assert!(written.ends_with("}\n"));
    }

    #[test]
    fn test_fix_write_leaves_file_without_fix_its() {
        let dir = tempfile::tempdir().unwrap();
        let source = "@AppEnumGen\nenum Color { case red }\n";
        let input = write_input(dir.path(), source);

        cmd_fix(None, input.clone(), true).unwrap();
        assert_eq!(fs::read_to_string(&input).unwrap(), source);
    }

    #[test]
    fn test_expand_fails_on_error_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "@AppEnumGen\nstruct Color {}\n");

        let err = cmd_expand(None, input).unwrap_err();
        assert!(err.to_string().starts_with("1 error(s) while expanding"));
    }

    #[test]
    fn test_explicit_config_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.yaml");
        fs::write(&config_path, "conformance: AppEntityEnum\n").unwrap();

        let cfg = resolve_config(Some(config_path)).unwrap();
        assert_eq!(cfg.conformance, "AppEntityEnum");
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_config(Some(dir.path().join("missing.yaml"))).is_err());
    }

    #[test]
    fn test_init_writes_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        cmd_init(&path, false).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            config::default_config_content()
        );
        assert!(cmd_init(&path, false).is_err());
        cmd_init(&path, true).unwrap();
    }

    #[test]
    fn test_inspect_summary() {
        let file = parse::parse_source(
            "@AppEnumGen\nenum Color: String { case red, `default` }\n\nstruct S {}\n",
        )
        .unwrap();
        let summary = build_inspect_summary(file.items.iter().map(|item| &item.decl));
        assert_eq!(
            summary,
            serde_json::json!({
                "enums": [{
                    "name": "Color",
                    "attributes": ["AppEnumGen"],
                    "inheritance": ["String"],
                    "cases": ["red", "default"],
                }]
            })
        );
    }
}
