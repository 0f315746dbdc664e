//! depres - dependency version and requirement resolution CLI
//!
//! Given an ecosystem, a package and its current state, resolves:
//! - the latest installable version (filters applied)
//! - or, with --security, the minimal fixed version
//! - the requirement strings rewritten for the chosen target

use clap::Parser;
use colored::Colorize;
use depres::cli::CliArgs;
use depres::grammar::GrammarRegistry;
use depres::registry::{create_client, HttpClient};
use depres::update::{fetch_catalog, UpdateChecker};
use serde_json::json;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let dependency = args.to_dependency();
    let grammars = GrammarRegistry::standard();

    let http = HttpClient::new()?;
    let Some(registry) = create_client(args.ecosystem, http) else {
        anyhow::bail!("no registry adapter available for ecosystem '{}'", args.ecosystem);
    };

    if args.verbose {
        eprintln!(
            "depres v{} resolving {} via {}",
            env!("CARGO_PKG_VERSION"),
            dependency,
            registry.registry_name()
        );
    }

    let catalog = fetch_catalog(registry.as_ref(), &dependency).await;

    let mut checker = UpdateChecker::new(&dependency, &catalog, &grammars)
        .with_ignored_versions(args.ignore.clone())
        .with_raise_on_ignored(args.strict_ignores)
        .with_metadata_client(registry.as_ref());
    if let Some(policy) = args.cooldown_policy() {
        checker = checker.with_cooldown(policy);
    }

    let resolved = if args.security {
        checker.lowest_security_fix_version().await?
    } else {
        checker.latest_version().await?
    };

    let Some(target) = resolved else {
        if args.json {
            println!("{}", json!({ "package": dependency.name, "resolved": null }));
        } else {
            println!("{} no installable version found", "✗".red());
        }
        return Ok(ExitCode::FAILURE);
    };

    let current = checker.current_version();
    let updated = if dependency.requirements.is_empty() {
        Vec::new()
    } else {
        checker.updated_requirements(&target)?
    };

    if args.json {
        println!(
            "{}",
            json!({
                "package": dependency.name,
                "ecosystem": dependency.ecosystem,
                "current": current,
                "resolved": target,
                "requirements": updated,
            })
        );
        return Ok(ExitCode::SUCCESS);
    }

    match &current {
        Some(current) if current >= &target => {
            println!(
                "{} {} is up to date ({})",
                "✓".green(),
                dependency.name.bold(),
                current
            );
        }
        Some(current) => {
            println!(
                "{} {} {} -> {}",
                "↑".cyan(),
                dependency.name.bold(),
                current.to_string().yellow(),
                target.to_string().green()
            );
        }
        None => {
            println!(
                "{} {} resolves to {}",
                "•".cyan(),
                dependency.name.bold(),
                target.to_string().green()
            );
        }
    }

    for occurrence in &updated {
        if let Some(requirement) = &occurrence.requirement {
            println!("  {} => {}", occurrence.file.dimmed(), requirement);
        }
    }

    Ok(ExitCode::SUCCESS)
}
