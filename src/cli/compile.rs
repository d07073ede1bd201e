use std::path::PathBuf;

use tracing::info;

use crate::cli::{gather_directives, load_declarative};
use crate::{compile, merge};

pub fn run(sources: &[String], config: Option<&str>) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config_path = config.map(PathBuf::from);
    let declarative = load_declarative(&cwd, config_path.as_deref())?;

    let (in_source, errors) = gather_directives(sources)?;
    for err in &errors {
        tracing::warn!(%err, "directive error");
    }

    let merged = merge(declarative, in_source);
    let compiled = compile::compile(&merged);
    info!(packages = compiled.len(), "compiled rename configuration");

    let printable: std::collections::BTreeMap<_, _> = compiled
        .into_iter()
        .map(|(scope, categories)| {
            let inner: std::collections::BTreeMap<String, usize> = categories
                .into_iter()
                .map(|(kind, cat)| (format!("{kind:?}"), cat.rules.len()))
                .collect();
            (scope, inner)
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&printable)?);

    if !errors.is_empty() {
        anyhow::bail!("{} directive error(s) encountered during compile", errors.len());
    }
    Ok(())
}
