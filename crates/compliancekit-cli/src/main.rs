//! ComplianceKit CLI - System compliance profile explorer
//!
//! Reads a compliancekit.toml, builds the system profile it describes and
//! answers summary and per-control queries.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use compliancekit::{init_tracing, LogConfig, ProfileBuild, ProfileConfig};

mod error;
mod output;

use error::{CliError, Result};

/// ComplianceKit CLI - NIST 800-53 System Compliance Profiles
#[derive(Parser)]
#[command(name = "compliancekit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to compliancekit.toml configuration file
    #[arg(short, long, default_value = "compliancekit.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the system name and its components, standards and certifications
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a control with the components that implement it
    Control {
        /// Control or enhancement identifier, e.g. "AC-4" or "AC-2 (1)"
        id: String,

        /// Output as JSON
        #[arg(long, conflicts_with = "yaml")]
        json: bool,

        /// Output as YAML
        #[arg(long)]
        yaml: bool,
    },

    /// List registered components with their claimed control counts
    Components,

    /// List ingested component source locations
    Sources,

    /// Initialize a new compliancekit.toml
    Init {
        /// System name
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite existing configuration
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "compliancekit=debug" } else { "warn" };
    if let Err(e) = init_tracing(&LogConfig::from_env().with_filter(filter)) {
        output::warning(&e.to_string());
    }

    let result = match cli.command {
        Commands::Summary { json } => cmd_summary(&cli.config, json),
        Commands::Control { id, json, yaml } => cmd_control(&cli.config, &id, json, yaml),
        Commands::Components => cmd_components(&cli.config),
        Commands::Sources => cmd_sources(&cli.config),
        Commands::Init { name, force } => cmd_init(&cli.config, name, force),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

/// Load the configuration and build the profile, reporting skipped components
fn load_profile(config_path: &Path) -> Result<ProfileBuild> {
    if !config_path.exists() {
        return Err(CliError::ConfigNotFound {
            path: config_path.to_path_buf(),
        });
    }

    let mut config = ProfileConfig::from_file(config_path)?;
    config.apply_env();
    tracing::debug!(config = %config_path.display(), "Configuration loaded");

    let build = config.build()?;
    output::print_ingest_failures(&build.failures);
    Ok(build)
}

fn cmd_summary(config_path: &Path, json: bool) -> Result<()> {
    let build = load_profile(config_path)?;
    let summary = build.profile.summary();

    if json {
        output::print_json(&summary)?;
    } else {
        output::print_summary(&summary);
    }
    Ok(())
}

fn cmd_control(config_path: &Path, id: &str, json: bool, yaml: bool) -> Result<()> {
    let build = load_profile(config_path)?;
    let view = build.profile.control(id);

    if json {
        output::print_json(&view)?;
    } else if yaml {
        output::print_yaml(&view)?;
    } else {
        output::print_control(&view);
    }
    Ok(())
}

fn cmd_components(config_path: &Path) -> Result<()> {
    let build = load_profile(config_path)?;
    output::print_components(&build.profile);
    Ok(())
}

fn cmd_sources(config_path: &Path) -> Result<()> {
    let build = load_profile(config_path)?;
    output::print_sources(&build.profile);
    Ok(())
}

fn cmd_init(config_path: &Path, name: Option<String>, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        return Err(CliError::ConfigExists {
            path: config_path.to_path_buf(),
        });
    }

    let system_name = name.unwrap_or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|p| p.file_name().map(|s| s.to_string_lossy().to_string()))
            .unwrap_or_else(|| "my-system".to_string())
    });

    std::fs::write(config_path, generate_init_template(&system_name))?;

    output::print_banner();
    output::success(&format!("Created {}", config_path.display()));
    output::info("Point [catalog] path at the 800-53 XML feed and list your component files");

    Ok(())
}

fn generate_init_template(system_name: &str) -> String {
    format!(
        r#"# ComplianceKit Configuration

[system]
name = "{}"

[catalog]
# NIST SP 800-53 XML feed; COMPLIANCEKIT_CATALOG overrides this
path = "800-53-controls.xml"

[components]
# File paths (relative to this file), file:// or http(s):// URLs
locations = []
# fetch_timeout = "30s"

# [standards."NIST-800-53"]
# name = "NIST-800-53"

# [certifications."FedRAMP-Low"]
# name = "FedRAMP-Low"

# [roles."System Owner"]
# contact = "owner@example.org"
"#,
        system_name.replace('\\', "\\\\").replace('"', "\\\"")
    )
}
