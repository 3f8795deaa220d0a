//! Output formatting and display utilities
//!
//! Provides colored, formatted output for the CLI

use colored::Colorize;

use compliancekit::{
    ComplianceProfile, ControlImplementationView, ImplementationStatus, IngestError, Summary,
};

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print a warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}

/// Print a header
pub fn header(msg: &str) {
    println!("\n{}", msg.bold().underline());
}

/// Print a subheader
pub fn subheader(msg: &str) {
    println!("\n{}", msg.bold());
}

/// Print components that could not be ingested
pub fn print_ingest_failures(failures: &[IngestError]) {
    for failure in failures {
        warning(&format!("Skipped component: {}", failure));
    }
}

/// Print the system summary
pub fn print_summary(summary: &Summary) {
    header(&summary.name);

    print_name_list("Components", &summary.components);
    print_name_list("Standards", &summary.standards);
    print_name_list("Certifications", &summary.certifications);
    println!();
}

fn print_name_list(title: &str, names: &[String]) {
    subheader(&format!("{} ({}):", title, names.len()));
    if names.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for name in names {
        println!("  {} {}", "•".cyan(), name);
    }
}

/// Print a control implementation view
pub fn print_control(view: &ControlImplementationView) {
    let control = &view.control;

    if !view.is_found() {
        warning(&format!("{} is not in the catalog", view.id()));
    } else {
        header(&format!(
            "{}  {}",
            view.id(),
            view.title().unwrap_or_default()
        ));

        let mut facts = Vec::new();
        if let Some(family) = &control.family {
            facts.push(format!("Family: {}", family));
        }
        if let Some(priority) = &control.priority {
            facts.push(format!("Priority: {}", priority));
        }
        if let Some(responsible) = &control.responsible {
            facts.push(format!("Responsible: {}", responsible));
        }
        if let Some(parent) = &control.parent {
            facts.push(format!("Enhances: {}", parent));
        }
        if !control.baseline_impact.is_empty() {
            facts.push(format!("Baselines: {}", control.baseline_impact.join(", ")));
        }
        if !facts.is_empty() {
            println!("{}", facts.join("   ").dimmed());
        }

        if let Some(intro) = &control.description_intro {
            println!("\n{}", intro);
        }
        for section in &control.description_sections {
            println!("  {}", section);
        }

        if !control.withdrawn_into.is_empty() {
            println!(
                "\n{} {}",
                "Incorporated into:".yellow(),
                control.withdrawn_into.join(", ")
            );
        }
        if !control.control_enhancements.is_empty() {
            println!(
                "\n{} {}",
                "Enhancements:".dimmed(),
                control.control_enhancements.join(", ")
            );
        }
    }

    subheader("Implemented by:");
    if !view.is_implemented() {
        println!("  {}", "no registered component claims this control".dimmed());
    }
    for ((component, narrative), status) in view.attributions().zip(&view.implementation_status) {
        println!("  {} {} {}", status_icon(*status), component.bold(), format!("[{}]", status).dimmed());
        for line in narrative.lines() {
            println!("      {}", line);
        }
    }
    println!();
}

fn status_icon(status: ImplementationStatus) -> colored::ColoredString {
    match status {
        ImplementationStatus::Complete => "✓".green(),
        ImplementationStatus::Partial | ImplementationStatus::Planned => "◐".yellow(),
        ImplementationStatus::NotImplemented => "✗".red(),
        ImplementationStatus::NotApplicable | ImplementationStatus::Unknown => "•".cyan(),
    }
}

/// Print registered components with the number of controls each claims
pub fn print_components(profile: &ComplianceProfile) {
    header("Components");
    for name in profile.components() {
        let Some(component) = profile.store().component(&name) else {
            continue;
        };
        let controls = component.control_keys().len();
        let source = component.source.as_deref().unwrap_or("inline");
        println!(
            "  {} {} {}",
            "•".cyan(),
            name,
            format!("({} controls, {})", controls, source).dimmed()
        );
    }
    println!();
}

/// Print ingested source keys
pub fn print_sources(profile: &ComplianceProfile) {
    header(&format!("Sources ({})", profile.store().count()));
    for key in profile.store().source_keys() {
        println!("  {} {}", "→".cyan(), key);
    }
    println!();
}

/// Print a JSON report
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a YAML report
pub fn print_yaml<T: serde::Serialize>(value: &T) -> Result<(), serde_yaml::Error> {
    let yaml = serde_yaml::to_string(value)?;
    print!("{}", yaml);
    Ok(())
}

/// Print the CLI banner
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!("{}", format!("ComplianceKit CLI v{}", version).bold());
    println!("{}", "NIST 800-53 System Compliance Profiles".dimmed());
}
