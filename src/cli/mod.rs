//! CLI scaffolding around the core directive/config-merge engine. Thin by
//! design: the actual rename-configuration logic lives in
//! [`crate::scope`], [`crate::container`], [`crate::loader`], and
//! [`crate::compile`].

pub mod check;
pub mod compile;
pub mod init;
pub mod scanner;

use std::path::Path;

use crate::container::RootData;
use crate::directive::lex;
use crate::error::AdapterError;
use crate::scope::Parser;

/// Dispatch a CLI command synchronously -- there is no I/O to await
/// anywhere in this crate's core, so `dispatch` stays a plain `fn`.
pub fn dispatch(command: crate::Commands) -> anyhow::Result<()> {
    match command {
        crate::Commands::Compile { sources, config } => {
            compile::run(&sources, config.as_deref())
        }
        crate::Commands::Check { sources, config } => check::run(&sources, config.as_deref()),
        crate::Commands::Init => init::run(),
    }
}

/// Loads the project's declarative config, if any (spec.md §6 discovery
/// rules).
pub fn load_declarative(
    cwd: &Path,
    explicit: Option<&Path>,
) -> Result<Option<RootData>, AdapterError> {
    crate::loader::load_project(cwd, explicit)
}

/// Scans every source file for directive comments and parses them into a
/// single [`RootData`] tree, collecting (not aborting on) errors from
/// either the lexer or the scope machine.
pub fn gather_directives(sources: &[String]) -> anyhow::Result<(RootData, Vec<AdapterError>)> {
    let mut all_errors = Vec::new();
    let mut merged = RootData::default();

    for source in sources {
        let contents = std::fs::read_to_string(source)
            .map_err(|e| anyhow::anyhow!("reading {source}: {e}"))?;
        let comments = crate::cli::scanner::scan(&contents);
        let borrowed: Vec<(u64, &str)> = comments.iter().map(|(l, s)| (*l, s.as_str())).collect();
        let (directives, lex_errors) = lex(borrowed);
        all_errors.extend(lex_errors);

        let (root, parse_errors) = Parser::parse(&directives);
        all_errors.extend(parse_errors);
        merged = crate::compile::merge(Some(merged), root);
    }

    Ok((merged, all_errors))
}
