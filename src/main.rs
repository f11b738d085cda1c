//! SOP Guardian CLI - Command-line interface for SOP compliance scoring
//!
//! Architectural Principle: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to analyzer and formatter operations
//! - Handles external concerns like configuration discovery, process exit codes, and terminal output
//! - Provides clean separation between user interface and business logic

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use sop_guardian::{
    AnalysisOptions, ComplianceConfig, DocumentProfile, FileTextExtractor, OutputFormat,
    ReferenceCorpus, ReportFormatter, ReportOptions, RuleRegistry, Severity, SopValidator,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Configuration files looked up in the working directory, in order
const DEFAULT_CONFIG_FILES: [&str; 3] = [
    "sop_guardian.yaml",
    "sop_guardian.yml",
    ".sop_guardian.yaml",
];

/// SOP Guardian - Compliance scoring for Standard Operating Procedures
#[derive(Parser)]
#[command(name = "sop-guardian")]
#[command(version)]
#[command(about = "Rule-based compliance scoring for SOP documents")]
#[command(
    long_about = "SOP Guardian extracts text from SOP documents (PDF, DOCX, plain text), classifies each one, checks it against a regulatory checklist and reports a 0-100 compliance score with issues and suggestions."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze SOP documents
    Analyze {
        /// Paths to analyze (files or directories)
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,

        /// Exit with status 1 when any document scores below this
        #[arg(long, default_value_t = 0)]
        min_score: u32,

        /// Minimum severity level to list
        #[arg(short, long, value_enum)]
        severity: Option<SeverityArg>,

        /// Reference documents, replacing the configured ones
        #[arg(long, action = clap::ArgAction::Append)]
        references: Vec<PathBuf>,

        /// Additional exclude patterns
        #[arg(long, action = clap::ArgAction::Append)]
        exclude: Vec<String>,

        /// Disable parallel processing
        #[arg(long)]
        no_parallel: bool,

        /// Fail on the first unreadable document
        #[arg(long)]
        fail_fast: bool,
    },

    /// Analyze one of the bundled sample documents
    Sample {
        /// Sample key, e.g. compliant or outdated_refs
        key: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,

        /// Directory holding the sample documents
        #[arg(long)]
        documents: Option<PathBuf>,
    },

    /// List document profiles and the rules that run for each
    Profiles,

    /// Explain a profile or a rule
    Explain {
        /// Profile name or rule ID
        name: String,
    },

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },

    /// Show which reference documents are loaded
    Corpus,
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum SeverityArg {
    Minor,
    Major,
    Critical,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Minor => Severity::Minor,
            SeverityArg::Major => Severity::Major,
            SeverityArg::Critical => Severity::Critical,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run_command(cli).await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

async fn run_command(cli: Cli) -> anyhow::Result<i32> {
    let use_colors = !cli.no_color;

    match cli.command {
        Commands::Analyze {
            paths,
            format,
            min_score,
            severity,
            references,
            exclude,
            no_parallel,
            fail_fast,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if !references.is_empty() {
                config.references.paths = references;
            }

            let options = AnalysisOptions {
                parallel: !no_parallel,
                fail_fast,
                exclude_patterns: exclude,
                ..Default::default()
            };
            let report_options = ReportOptions {
                use_colors,
                min_severity: severity.map(Severity::from),
                ..Default::default()
            };

            run_analyze(config, paths, format, min_score, options, report_options).await
        }
        Commands::Sample {
            key,
            format,
            documents,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(directory) = documents {
                config.documents.directory = directory;
            }
            run_sample(config, &key, format, use_colors)
        }
        Commands::Profiles => run_profiles(&load_config(cli.config.as_deref())?),
        Commands::Explain { name } => run_explain(&load_config(cli.config.as_deref())?, &name),
        Commands::ValidateConfig { config_file } => {
            run_validate_config(config_file.or(cli.config))
        }
        Commands::Corpus => run_corpus(&load_config(cli.config.as_deref())?),
    }
}

/// Load the given configuration file, or the first default file present, or the defaults
fn load_config(config_path: Option<&Path>) -> anyhow::Result<ComplianceConfig> {
    if let Some(path) = config_path {
        return ComplianceConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()));
    }

    for config_name in DEFAULT_CONFIG_FILES {
        if Path::new(config_name).exists() {
            tracing::debug!("Using configuration file {}", config_name);
            return ComplianceConfig::load_from_file(config_name)
                .with_context(|| format!("Failed to load configuration from {config_name}"));
        }
    }

    Ok(ComplianceConfig::default())
}

async fn run_analyze(
    config: ComplianceConfig,
    paths: Vec<PathBuf>,
    format: OutputFormatArg,
    min_score: u32,
    options: AnalysisOptions,
    report_options: ReportOptions,
) -> anyhow::Result<i32> {
    let validator = SopValidator::new_with_config(config)?
        .with_report_formatter(ReportFormatter::new(report_options));

    // Use the documents directory if no paths specified
    let paths = if paths.is_empty() {
        vec![validator.config().documents.directory.clone()]
    } else {
        paths
    };

    let batch = validator.validate_files(paths, &options).await?;
    println!("{}", validator.format_batch(&batch, format.into())?);

    if batch.any_below(min_score) {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn run_sample(
    config: ComplianceConfig,
    key: &str,
    format: OutputFormatArg,
    use_colors: bool,
) -> anyhow::Result<i32> {
    if config.sample_path(key).is_none() {
        eprintln!("❌ Unknown sample '{key}'");
        let keys: Vec<&str> = config.documents.samples.keys().map(String::as_str).collect();
        eprintln!("Available samples: {}", keys.join(", "));
        return Ok(1);
    }

    let validator = SopValidator::new_with_config(config)?.with_report_formatter(
        ReportFormatter::new(ReportOptions {
            use_colors,
            ..Default::default()
        }),
    );

    let report = validator.validate_sample(key)?;
    println!("{}", validator.format_report(&report, format.into())?);
    Ok(0)
}

fn run_profiles(config: &ComplianceConfig) -> anyhow::Result<i32> {
    let registry = RuleRegistry::from_config(config);

    println!("📋 Document Profiles (checked in this order)\n");

    for profile in DocumentProfile::ALL {
        let Some(settings) = config.profile(profile) else {
            continue;
        };

        let trigger = match (&settings.identifier, &settings.filename_hint) {
            (Some(id), Some(hint)) => format!("text contains '{id}' or filename contains '{hint}'"),
            (Some(id), None) => format!("text contains '{id}'"),
            (None, Some(hint)) => format!("filename contains '{hint}'"),
            (None, None) => "fallback".to_string(),
        };

        println!("📂 {} (baseline {}) - {}", profile, settings.baseline, trigger);
        for rule in registry.rules_for(profile) {
            println!("  🔍 {} - {}", rule.id(), rule.describe());
        }
        println!();
    }

    Ok(0)
}

fn run_explain(config: &ComplianceConfig, name: &str) -> anyhow::Result<i32> {
    let registry = RuleRegistry::from_config(config);

    if let Some(profile) = DocumentProfile::parse(name) {
        println!("📖 Profile: {profile}");
        if let Some(settings) = config.profile(profile) {
            println!("🎯 Baseline: {}", settings.baseline);
            if let Some(id) = &settings.identifier {
                println!("🔎 Identifier: {id}");
            }
            if let Some(hint) = &settings.filename_hint {
                println!("🔎 Filename hint: {hint}");
            }
            if !settings.required_sections.is_empty() {
                println!("📝 Required sections: {}", settings.required_sections.join(", "));
            }
            for advisory in &settings.advisories {
                println!("💡 {advisory}");
            }
        }
        println!();
        println!("Rules:");
        for rule in registry.rules_for(profile) {
            println!("  - {}: {}", rule.id(), rule.describe());
        }
        return Ok(0);
    }

    if let Some((profile, rule)) = registry.find(name) {
        println!("📖 Rule: {}", rule.id());
        println!("📂 Profile: {profile}");
        println!("🏷️ Category: {}", rule.category().as_str());
        println!();
        println!("📝 Description:");
        println!("   {}", rule.describe());
        return Ok(0);
    }

    eprintln!("❌ '{name}' is neither a profile nor a rule");
    println!();
    println!("Profiles:");
    for profile in DocumentProfile::ALL {
        println!("  {profile}:");
        for rule in registry.rules_for(profile) {
            println!("    - {}", rule.id());
        }
    }

    Ok(1)
}

fn run_validate_config(config_path: Option<PathBuf>) -> anyhow::Result<i32> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILES[0]));

    println!("Validating configuration: {}", config_path.display());

    match ComplianceConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("✅ Configuration is valid");

            let sections: usize = config
                .profiles
                .iter()
                .map(|p| p.required_sections.len())
                .sum();

            println!("📊 Configuration summary:");
            println!("  Profiles: {}", config.profiles.len());
            println!("  Rules: {}", RuleRegistry::from_config(&config).rule_count());
            println!("  Required sections: {} profile-specific, {} generic", sections, config.generic_sections.len());
            println!("  Outdated references: {}", config.outdated_references.len());
            println!("  Placeholder tokens: {}", config.placeholders.tokens.len());
            println!("  Reference documents: {}", config.references.paths.len());

            Ok(0)
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed: {e}");
            Ok(1)
        }
    }
}

fn run_corpus(config: &ComplianceConfig) -> anyhow::Result<i32> {
    let corpus = ReferenceCorpus::load(&config.references.paths, &FileTextExtractor::new());

    println!("📚 Reference corpus");
    for path in &config.references.paths {
        let status = if corpus.sources().contains(path) { "✅" } else { "❌" };
        println!("  {} {}", status, path.display());
    }
    println!(
        "📊 {} of {} document(s) loaded, {} characters",
        corpus.sources().len(),
        config.references.paths.len(),
        corpus.text().chars().count()
    );

    if corpus.is_empty() {
        println!("⚠️  No reference text available; citation checks use the built-in table only");
    }

    Ok(0)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
