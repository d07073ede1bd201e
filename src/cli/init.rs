const TEMPLATE: &str = "\
# Starter declarative adapter config. See go:adapter: directive comments
# in source for the in-source equivalent of every key below.
defaults:
  prefix_mode: replace

ignores: []

types: []

functions: []

variables: []

constants: []

packages: []
";

pub fn run() -> anyhow::Result<()> {
    let path = std::env::current_dir()?.join(".adptool.yaml");
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    std::fs::write(&path, TEMPLATE)?;
    println!("wrote {}", path.display());
    Ok(())
}
