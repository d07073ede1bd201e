//! Directive parsing and declarative-config assembly for foreign-package
//! adapter generators: turns `go:adapter:`-prefixed source comments and
//! `.adptool.*` config files into a single resolved rename configuration
//! (see `SPEC_FULL.md`).

pub mod cli;
pub mod compile;
pub mod container;
pub mod directive;
pub mod error;
pub mod loader;
pub mod ruleset;
pub mod scope;

pub use compile::{compile, merge, CompiledConfig, CompiledRenameRule, RuleKind, GLOBAL_SCOPE};
pub use container::{Container, ContainerKind, RootData};
pub use directive::{Directive, DIRECTIVE_PREFIX};
pub use error::{AdapterError, Result};
pub use ruleset::{Mode, RuleSet};
pub use scope::Parser;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Scan sources and/or a declarative config, and print the resolved
    /// rename configuration as JSON.
    Compile {
        /// Source files to scan for `go:adapter:` directive comments.
        #[arg(long = "source")]
        sources: Vec<String>,
        /// Explicit declarative config path. Overrides discovery.
        #[arg(long)]
        config: Option<String>,
    },

    /// Validate sources and/or a declarative config without compiling;
    /// prints any directive or merge errors and exits non-zero if there
    /// are any.
    Check {
        #[arg(long = "source")]
        sources: Vec<String>,
        #[arg(long)]
        config: Option<String>,
    },

    /// Write a minimal starter `.adptool.yaml` in the current directory.
    Init,
}
