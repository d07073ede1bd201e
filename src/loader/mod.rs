//! Declarative config file loading (spec.md §6): format detection by
//! extension, `.adptool.*` discovery (current directory, then a sibling
//! `configs/` directory), and conversion into [`RootData`].

pub mod schema;

use std::path::{Path, PathBuf};

use crate::container::RootData;
use crate::error::{AdapterError, Result};
use schema::ConfigFile;

const DISCOVERY_NAMES: &[&str] = &[
    ".adptool.yaml",
    ".adptool.yml",
    ".adptool.json",
    ".adptool.toml",
];

/// Parses a declarative config from `contents`, dispatching on `path`'s
/// extension (spec.md §6: YAML, JSON, or TOML).
pub fn parse(path: &Path, contents: &str) -> Result<RootData> {
    let format = Format::from_path(path)?;
    let config: ConfigFile = match format {
        Format::Yaml => serde_yaml::from_str(contents).map_err(|e| AdapterError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?,
        Format::Json => serde_json::from_str(contents).map_err(|e| AdapterError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?,
        Format::Toml => toml::from_str(contents).map_err(|e| AdapterError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?,
    };
    Ok(config.into())
}

/// Reads and parses the declarative config at `path`.
pub fn load_file(path: &Path) -> Result<RootData> {
    let contents = std::fs::read_to_string(path)?;
    parse(path, &contents)
}

/// Loads the project's declarative config.
///
/// If `explicit` is given, that path must exist (an [`AdapterError::ConfigNotFound`]
/// otherwise). Absent an explicit path, this looks for a `.adptool.{yaml,yml,json,toml}`
/// file in `cwd`, then in `cwd/configs/`, tolerating absence in both -- a
/// project with no declarative config at all is valid; it just means every
/// rule comes from in-source directives.
pub fn load_project(cwd: &Path, explicit: Option<&Path>) -> Result<Option<RootData>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(AdapterError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        return Ok(Some(load_file(path)?));
    }

    if let Some(found) = discover(cwd) {
        return Ok(Some(load_file(&found)?));
    }

    if let Some(found) = discover(&cwd.join("configs")) {
        return Ok(Some(load_file(&found)?));
    }

    Ok(None)
}

fn discover(dir: &Path) -> Option<PathBuf> {
    DISCOVERY_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            _ => Err(AdapterError::UnknownConfigFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unknown_extension_is_an_error() {
        let err = Format::from_path(Path::new("rules.ini"));
        assert!(matches!(err, Err(AdapterError::UnknownConfigFormat { .. })));
    }

    #[test]
    fn yaml_and_json_parse_to_equivalent_root() {
        let yaml = "ignores:\n  - internal.Foo\npackages:\n  - import: p/v3\n    alias: v3\n";
        let json = r#"{"ignores":["internal.Foo"],"packages":[{"import":"p/v3","alias":"v3"}]}"#;

        let from_yaml = parse(Path::new("a.yaml"), yaml).unwrap();
        let from_json = parse(Path::new("a.json"), json).unwrap();

        assert_eq!(from_yaml.ignore, from_json.ignore);
        assert_eq!(from_yaml.packages[0].import, from_json.packages[0].import);
        assert_eq!(from_yaml.packages[0].alias, from_json.packages[0].alias);
    }

    #[test]
    fn toml_parses_defaults_and_types() {
        let toml_src = "[defaults]\nprefix_mode = \"append\"\n\n[[types]]\nname = \"*\"\npattern = \"wrap\"\n";
        let root = parse(Path::new("a.toml"), toml_src).unwrap();
        assert_eq!(root.defaults.prefix_mode, crate::ruleset::Mode::Append);
        assert!(root.defaults_touched.prefix_mode);
        assert_eq!(root.categories.types[0].name, "*");
    }

    #[test]
    fn explicit_missing_path_is_config_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        let err = load_project(dir.path(), Some(&missing));
        assert!(matches!(err, Err(AdapterError::ConfigNotFound { .. })));
    }

    #[test]
    fn absent_config_is_tolerated_when_not_explicit() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_project(dir.path(), None).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn discovers_config_in_configs_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("configs")).unwrap();
        let mut file =
            std::fs::File::create(dir.path().join("configs").join(".adptool.yaml")).unwrap();
        writeln!(file, "ignores:\n  - internal.Foo").unwrap();

        let result = load_project(dir.path(), None).unwrap();
        assert_eq!(result.unwrap().ignore, vec!["internal.Foo".to_string()]);
    }
}
