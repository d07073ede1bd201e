//! Data held by the leaf rule kinds (Type, Func, Var, Const, Method, Field).

use serde::{Deserialize, Serialize};

use crate::ruleset::RuleSet;

/// What a Type actually *is* in the wrapped ecosystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Type,
    Struct,
    Interface,
}

/// How the adapter should re-expose a wrapped Type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypePattern {
    Wrap,
    Copy,
    Alias,
    Define,
}

/// A Type rule: name, disabled flag, kind/pattern, its own RuleSet, and its
/// Method/Field children (spec.md §3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeData {
    pub name: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub kind: Option<TypeKind>,
    #[serde(default)]
    pub pattern: Option<TypePattern>,
    #[serde(default)]
    pub ruleset: RuleSet,
    #[serde(default)]
    pub methods: Vec<LeafData>,
    #[serde(default)]
    pub fields: Vec<LeafData>,
}

impl TypeData {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.name == "*"
    }
}

/// Shared shape for Func, Var, Const, Method, and Field rules: just a name,
/// a disabled flag, and a RuleSet (spec.md §3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeafData {
    pub name: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub ruleset: RuleSet,
}

impl LeafData {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.name == "*"
    }
}

/// Ordered, name-addressable rule lists for one category tier (either the
/// global Root scope or a single Package). A `Vec` rather than a map keeps
/// insertion order stable, which the compiled-output ordering invariants
/// (spec.md §3 invariant 5, §8 idempotence) depend on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Categories {
    #[serde(default)]
    pub types: Vec<TypeData>,
    #[serde(default)]
    pub functions: Vec<LeafData>,
    #[serde(default)]
    pub variables: Vec<LeafData>,
    #[serde(default)]
    pub constants: Vec<LeafData>,
}

/// Merges a same-name rule by attaching the incoming member RuleSet under
/// its own mode rather than overwriting (spec.md §3 invariant 3). Used both
/// for Type Method/Field lists and for the category lists themselves when a
/// directive reopens an already-finalized name (e.g. two `context` blocks
/// contributing to the same Type).
pub fn upsert_leaf(list: &mut Vec<LeafData>, incoming: LeafData) {
    if let Some(existing) = list.iter_mut().find(|l| l.name == incoming.name) {
        existing.disabled = incoming.disabled;
        merge_ruleset_in_place(&mut existing.ruleset, incoming.ruleset);
    } else {
        list.push(incoming);
    }
}

pub fn upsert_type(list: &mut Vec<TypeData>, incoming: TypeData) {
    if let Some(existing) = list.iter_mut().find(|t| t.name == incoming.name) {
        existing.disabled = incoming.disabled;
        if incoming.kind.is_some() {
            existing.kind = incoming.kind;
        }
        if incoming.pattern.is_some() {
            existing.pattern = incoming.pattern;
        }
        merge_ruleset_in_place(&mut existing.ruleset, incoming.ruleset);
        for m in incoming.methods {
            upsert_leaf(&mut existing.methods, m);
        }
        for f in incoming.fields {
            upsert_leaf(&mut existing.fields, f);
        }
    } else {
        list.push(incoming);
    }
}

/// Appends an incoming RuleSet's scalar/list fields onto an existing one.
/// This is a structural merge at data-model assembly time (two directive
/// blocks targeting the same name), distinct from the mode-driven
/// inheritance merge performed in the compile stage.
fn merge_ruleset_in_place(existing: &mut RuleSet, incoming: RuleSet) {
    existing.strategy.extend(incoming.strategy);
    if incoming.strategy_mode.is_some() {
        existing.strategy_mode = incoming.strategy_mode;
    }
    if !incoming.prefix.is_empty() {
        existing.prefix = incoming.prefix;
    }
    if incoming.prefix_mode.is_some() {
        existing.prefix_mode = incoming.prefix_mode;
    }
    if !incoming.suffix.is_empty() {
        existing.suffix = incoming.suffix;
    }
    if incoming.suffix_mode.is_some() {
        existing.suffix_mode = incoming.suffix_mode;
    }
    existing.explicit.extend(incoming.explicit);
    if incoming.explicit_mode.is_some() {
        existing.explicit_mode = incoming.explicit_mode;
    }
    existing.regex.extend(incoming.regex);
    if incoming.regex_mode.is_some() {
        existing.regex_mode = incoming.regex_mode;
    }
    existing.ignore.extend(incoming.ignore);
    if incoming.ignore_mode.is_some() {
        existing.ignore_mode = incoming.ignore_mode;
    }
    if !incoming.transform.before.is_empty() {
        existing.transform.before = incoming.transform.before;
    }
    if !incoming.transform.after.is_empty() {
        existing.transform.after = incoming.transform.after;
    }
    if incoming.inherit_prefix.is_some() {
        existing.inherit_prefix = incoming.inherit_prefix;
    }
    if incoming.inherit_suffix.is_some() {
        existing.inherit_suffix = incoming.inherit_suffix;
    }
    if incoming.inherit_explicit.is_some() {
        existing.inherit_explicit = incoming.inherit_explicit;
    }
    if incoming.inherit_regex.is_some() {
        existing.inherit_regex = incoming.inherit_regex;
    }
    if incoming.inherit_ignore.is_some() {
        existing.inherit_ignore = incoming.inherit_ignore;
    }
}
