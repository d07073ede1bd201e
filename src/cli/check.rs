use std::path::PathBuf;

use crate::cli::{gather_directives, load_declarative};

pub fn run(sources: &[String], config: Option<&str>) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config_path = config.map(PathBuf::from);

    match load_declarative(&cwd, config_path.as_deref()) {
        Ok(Some(_)) => println!("declarative config: ok"),
        Ok(None) => println!("declarative config: none found"),
        Err(err) => {
            println!("declarative config: {err}");
            anyhow::bail!("declarative config is invalid");
        }
    }

    let (_, errors) = gather_directives(sources)?;
    if errors.is_empty() {
        println!("directives: ok ({} source file(s))", sources.len());
        Ok(())
    } else {
        for err in &errors {
            println!("directive error: {err}");
        }
        anyhow::bail!("{} directive error(s)", errors.len());
    }
}
