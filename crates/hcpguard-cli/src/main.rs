//! CLI entry point for hcpguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `hcpguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hcpguard_app::{
    ExplainOutput, OutputFormat, ValidateInput, config_schema, format_explanation,
    format_not_found, render_report, report_schema, run_explain, run_validate, scan_exit_code,
};
use hcpguard_settings::Overrides;
use hcpguard_types::{Product, Severity};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "hcpguard",
    version,
    about = "Static security and best-practice validator for Vault, Consul, and Nomad configuration files"
)]
struct Cli {
    /// Log debug details to stderr (overrides RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate Vault configuration files.
    Vault(ProductArgs),
    /// Validate Consul configuration files.
    Consul(ProductArgs),
    /// Validate Nomad configuration files.
    Nomad(ProductArgs),

    /// Validate files or directories, detecting the product of each file.
    Validate {
        /// Config files or directories to scan.
        #[arg(required = true)]
        paths: Vec<Utf8PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Explain a shipped rule with remediation guidance.
    Explain {
        /// The rule id (e.g., "VLT-001").
        rule_id: String,
    },

    /// Print a JSON schema.
    Schema {
        #[arg(value_enum, default_value_t = SchemaKind::Report)]
        kind: SchemaKind,
    },
}

#[derive(Args, Debug)]
struct ProductArgs {
    #[command(flatten)]
    target: TargetArgs,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct TargetArgs {
    /// A single config file.
    #[arg(long)]
    file: Option<Utf8PathBuf>,

    /// A directory scanned recursively for config files.
    #[arg(long)]
    directory: Option<Utf8PathBuf>,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputArg::Console)]
    output: OutputArg,

    /// Lowest failed severity that fails the run (default: critical).
    #[arg(long, value_enum)]
    fail_level: Option<SeverityArg>,

    /// Path to hcpguard config TOML (a missing file is allowed).
    #[arg(long, default_value = "hcpguard.toml")]
    config: Utf8PathBuf,

    /// Extra YAML rule file (repeatable).
    #[arg(long = "rules", value_name = "FILE")]
    rules: Vec<Utf8PathBuf>,

    /// Glob excluded from directory scans (repeatable).
    #[arg(long, value_name = "GLOB")]
    exclude: Vec<String>,

    /// Fill in documented product defaults before evaluating.
    #[arg(long)]
    inject_defaults: bool,

    /// Skip the shipped rule sets.
    #[arg(long)]
    no_builtin_rules: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputArg {
    Console,
    Json,
    Md,
}

impl From<OutputArg> for OutputFormat {
    fn from(value: OutputArg) -> Self {
        match value {
            OutputArg::Console => OutputFormat::Console,
            OutputArg::Json => OutputFormat::Json,
            OutputArg::Md => OutputFormat::Markdown,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SeverityArg {
    Info,
    Warning,
    Critical,
}

impl From<SeverityArg> for Severity {
    fn from(value: SeverityArg) -> Self {
        match value {
            SeverityArg::Info => Severity::Info,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Critical => Severity::Critical,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SchemaKind {
    Report,
    Config,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and succeed; usage errors exit 1.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    init_tracing(cli.verbose);

    let result = match cli.cmd {
        Commands::Vault(args) => cmd_product(Product::Vault, args),
        Commands::Consul(args) => cmd_product(Product::Consul, args),
        Commands::Nomad(args) => cmd_product(Product::Nomad, args),
        Commands::Validate { paths, common } => cmd_validate(None, paths, common),
        Commands::Explain { rule_id } => cmd_explain(&rule_id),
        Commands::Schema { kind } => cmd_schema(kind),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("hcpguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn cmd_product(product: Product, args: ProductArgs) -> anyhow::Result<i32> {
    let path = match (args.target.file, args.target.directory) {
        (Some(file), _) => {
            if !file.is_file() {
                anyhow::bail!("not a file: {file}");
            }
            file
        }
        (None, Some(dir)) => {
            if !dir.is_dir() {
                anyhow::bail!("not a directory: {dir}");
            }
            dir
        }
        (None, None) => anyhow::bail!("one of --file or --directory is required"),
    };
    cmd_validate(Some(product), vec![path], args.common)
}

fn cmd_validate(
    product: Option<Product>,
    paths: Vec<Utf8PathBuf>,
    common: CommonArgs,
) -> anyhow::Result<i32> {
    let config_text = read_config(&common.config)?;
    let config_dir = match common.config.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
        _ => Utf8PathBuf::from("."),
    };

    let overrides = Overrides {
        fail_level: common.fail_level.map(Severity::from),
        inject_defaults: common.inject_defaults.then_some(true),
        builtin_rules: common.no_builtin_rules.then_some(false),
        rule_files: common.rules.iter().map(|p| p.to_string()).collect(),
        exclude: common.exclude,
    };

    let output = run_validate(ValidateInput {
        paths: &paths,
        product,
        config_text: &config_text,
        config_dir: &config_dir,
        overrides,
    })?;

    let rendered = render_report(&output.report, common.output.into())?;
    print!("{rendered}");

    Ok(scan_exit_code(&output.report))
}

/// Config file contents; a missing file reads as empty (defaults apply).
fn read_config(path: &Utf8Path) -> anyhow::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            debug!(path = %path, "config loaded");
            Ok(text)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path, "no config file; using defaults");
            Ok(String::new())
        }
        Err(err) => Err(err).with_context(|| format!("read config: {path}")),
    }
}

fn cmd_explain(rule_id: &str) -> anyhow::Result<i32> {
    match run_explain(rule_id)? {
        ExplainOutput::Found(def) => {
            print!("{}", format_explanation(&def));
            Ok(0)
        }
        ExplainOutput::NotFound {
            identifier,
            available_rule_ids,
        } => {
            eprint!("{}", format_not_found(&identifier, &available_rule_ids));
            Ok(1)
        }
    }
}

fn cmd_schema(kind: SchemaKind) -> anyhow::Result<i32> {
    let schema = match kind {
        SchemaKind::Report => report_schema(),
        SchemaKind::Config => config_schema(),
    };
    let text = serde_json::to_string_pretty(&schema).context("serialize schema")?;
    println!("{text}");
    Ok(0)
}
