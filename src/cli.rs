//! CLI argument parsing module for depres

use crate::domain::{CooldownPolicy, Dependency, Ecosystem, RequirementOccurrence};
use clap::{ArgAction, Parser};

/// Multi-ecosystem dependency version resolver
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depres",
    version,
    about = "Resolve the next version and requirements for a dependency"
)]
pub struct CliArgs {
    /// Packaging ecosystem (npm, cargo, rubygems, maven, gradle, go, toolchain)
    pub ecosystem: Ecosystem,

    /// Package name
    pub package: String,

    /// Currently installed version
    #[arg(long)]
    pub current: Option<String>,

    /// Requirement string as declared (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub requirement: Vec<String>,

    /// Resolve the minimal security fix instead of the latest version
    #[arg(long)]
    pub security: bool,

    /// Version or range to skip (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Fail instead of standing pat when every candidate is ignored
    #[arg(long)]
    pub strict_ignores: bool,

    /// Skip releases published fewer than this many days ago
    #[arg(long)]
    pub cooldown_days: Option<u32>,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl CliArgs {
    /// The dependency under resolution, as described by the arguments
    pub fn to_dependency(&self) -> Dependency {
        let requirements = self
            .requirement
            .iter()
            .map(|r| RequirementOccurrence::new("command line", r))
            .collect();
        Dependency::new(&self.package, self.current.clone(), requirements, self.ecosystem)
    }

    /// The cooldown policy, when one was requested
    pub fn cooldown_policy(&self) -> Option<CooldownPolicy> {
        self.cooldown_days.map(CooldownPolicy::new)
    }
}
