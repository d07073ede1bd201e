//! Serde DTOs mirroring the declarative config file surface (spec.md §6).
//!
//! These are intentionally a separate shape from [`crate::container`]'s
//! runtime types: the file format uses plain top-level keys (`defaults`,
//! `ignores`, `types`, `functions`, `variables`, `constants`, `packages`)
//! while the runtime tree is built incrementally by the directive scope
//! machine. `From`/`TryFrom` conversions below bridge the two, so both
//! input paths (in-source directives and declarative files) feed the same
//! merge/compile pipeline.

use serde::{Deserialize, Serialize};

use crate::container::{
    Categories, Defaults, DefaultsTouched, LeafData, PackageData, RootData, TypeData, TypeKind,
    TypePattern,
};
use crate::ruleset::{ExplicitRule, Mode, RegexRule, RuleSet, Transform};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub defaults: DefaultsSchema,
    #[serde(default, alias = "props", alias = "vars")]
    pub properties: Vec<PropertySchema>,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub types: Vec<TypeSchema>,
    #[serde(default)]
    pub functions: Vec<LeafSchema>,
    #[serde(default)]
    pub variables: Vec<LeafSchema>,
    #[serde(default)]
    pub constants: Vec<LeafSchema>,
    #[serde(default)]
    pub packages: Vec<PackageSchema>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsSchema {
    pub strategy_mode: Option<Mode>,
    pub prefix_mode: Option<Mode>,
    pub suffix_mode: Option<Mode>,
    pub explicit_mode: Option<Mode>,
    pub regex_mode: Option<Mode>,
    pub ignore_mode: Option<Mode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSetSchema {
    #[serde(default)]
    pub strategy: Vec<String>,
    pub strategy_mode: Option<Mode>,
    #[serde(default)]
    pub prefix: String,
    pub prefix_mode: Option<Mode>,
    #[serde(default)]
    pub suffix: String,
    pub suffix_mode: Option<Mode>,
    #[serde(default)]
    pub explicit: Vec<ExplicitEntry>,
    pub explicit_mode: Option<Mode>,
    #[serde(default)]
    pub regex: Vec<RegexEntry>,
    pub regex_mode: Option<Mode>,
    #[serde(default)]
    pub ignore: Vec<String>,
    pub ignore_mode: Option<Mode>,
    #[serde(default)]
    pub transform: TransformEntry,
    pub inherit_prefix: Option<bool>,
    pub inherit_suffix: Option<bool>,
    pub inherit_explicit: Option<bool>,
    pub inherit_regex: Option<bool>,
    pub inherit_ignore: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplicitEntry {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegexEntry {
    pub pattern: String,
    pub replace: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformEntry {
    #[serde(default)]
    pub before: String,
    #[serde(default)]
    pub after: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeafSchema {
    pub name: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, flatten)]
    pub ruleset: RuleSetSchema,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeSchema {
    pub name: String,
    #[serde(default)]
    pub disabled: bool,
    pub kind: Option<TypeKind>,
    pub pattern: Option<TypePattern>,
    #[serde(default, flatten)]
    pub ruleset: RuleSetSchema,
    #[serde(default)]
    pub methods: Vec<LeafSchema>,
    #[serde(default)]
    pub fields: Vec<LeafSchema>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageSchema {
    pub import: String,
    pub alias: Option<String>,
    pub path: Option<String>,
    #[serde(default, alias = "props", alias = "vars")]
    pub properties: Vec<PropertySchema>,
    #[serde(default)]
    pub types: Vec<TypeSchema>,
    #[serde(default)]
    pub functions: Vec<LeafSchema>,
    #[serde(default)]
    pub variables: Vec<LeafSchema>,
    #[serde(default)]
    pub constants: Vec<LeafSchema>,
}

impl From<RuleSetSchema> for RuleSet {
    fn from(s: RuleSetSchema) -> Self {
        RuleSet {
            strategy: s.strategy,
            strategy_mode: s.strategy_mode,
            prefix: s.prefix,
            prefix_mode: s.prefix_mode,
            suffix: s.suffix,
            suffix_mode: s.suffix_mode,
            explicit: s
                .explicit
                .into_iter()
                .map(|e| ExplicitRule { from: e.from, to: e.to })
                .collect(),
            explicit_mode: s.explicit_mode,
            regex: s
                .regex
                .into_iter()
                .map(|r| RegexRule {
                    pattern: r.pattern,
                    replace: r.replace,
                })
                .collect(),
            regex_mode: s.regex_mode,
            ignore: s.ignore,
            ignore_mode: s.ignore_mode,
            transform: Transform {
                before: s.transform.before,
                after: s.transform.after,
            },
            inherit_prefix: s.inherit_prefix,
            inherit_suffix: s.inherit_suffix,
            inherit_explicit: s.inherit_explicit,
            inherit_regex: s.inherit_regex,
            inherit_ignore: s.inherit_ignore,
        }
    }
}

impl From<LeafSchema> for LeafData {
    fn from(s: LeafSchema) -> Self {
        LeafData {
            name: s.name,
            disabled: s.disabled,
            ruleset: s.ruleset.into(),
        }
    }
}

impl From<TypeSchema> for TypeData {
    fn from(s: TypeSchema) -> Self {
        TypeData {
            name: s.name,
            disabled: s.disabled,
            kind: s.kind,
            pattern: s.pattern,
            ruleset: s.ruleset.into(),
            methods: s.methods.into_iter().map(Into::into).collect(),
            fields: s.fields.into_iter().map(Into::into).collect(),
        }
    }
}

fn categories_from(
    types: Vec<TypeSchema>,
    functions: Vec<LeafSchema>,
    variables: Vec<LeafSchema>,
    constants: Vec<LeafSchema>,
) -> Categories {
    Categories {
        types: types.into_iter().map(Into::into).collect(),
        functions: functions.into_iter().map(Into::into).collect(),
        variables: variables.into_iter().map(Into::into).collect(),
        constants: constants.into_iter().map(Into::into).collect(),
    }
}

impl From<PackageSchema> for PackageData {
    fn from(s: PackageSchema) -> Self {
        PackageData {
            import: s.import,
            alias: s.alias,
            path: s.path,
            properties: s
                .properties
                .into_iter()
                .map(|p| (p.name, p.value))
                .collect(),
            categories: categories_from(s.types, s.functions, s.variables, s.constants),
        }
    }
}

impl From<ConfigFile> for RootData {
    fn from(f: ConfigFile) -> Self {
        let mut defaults_touched = DefaultsTouched::default();
        let mut defaults = Defaults::default();
        if let Some(m) = f.defaults.strategy_mode {
            defaults.strategy_mode = m;
            defaults_touched.strategy_mode = true;
        }
        if let Some(m) = f.defaults.prefix_mode {
            defaults.prefix_mode = m;
            defaults_touched.prefix_mode = true;
        }
        if let Some(m) = f.defaults.suffix_mode {
            defaults.suffix_mode = m;
            defaults_touched.suffix_mode = true;
        }
        if let Some(m) = f.defaults.explicit_mode {
            defaults.explicit_mode = m;
            defaults_touched.explicit_mode = true;
        }
        if let Some(m) = f.defaults.regex_mode {
            defaults.regex_mode = m;
            defaults_touched.regex_mode = true;
        }
        if let Some(m) = f.defaults.ignore_mode {
            defaults.ignore_mode = m;
            defaults_touched.ignore_mode = true;
        }

        RootData {
            defaults,
            defaults_touched,
            ignore: f.ignores,
            properties: f.properties.into_iter().map(|p| (p.name, p.value)).collect(),
            categories: categories_from(f.types, f.functions, f.variables, f.constants),
            packages: f.packages.into_iter().map(Into::into).collect(),
        }
    }
}
