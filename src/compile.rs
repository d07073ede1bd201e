//! The three-pass merge/inheritance/linearize pipeline (spec.md §4.5-§4.6):
//! Pass 1 merges a declarative `RootData` with the in-source-directive
//! `RootData`; Pass 2 resolves scope-chain inheritance (global wildcard ->
//! package wildcard -> item) using each field's `Mode`; Pass 3 linearizes
//! the result into the compact, tool-facing [`CompiledConfig`].

use std::collections::HashMap;

use crate::container::{Defaults, LeafData, RootData, TypeData, TypeKind, TypePattern};
use crate::ruleset::{ExplicitRule, Mode, RegexRule, RuleSet};

/// The six leaf rule kinds a compiled symbol can belong to (spec.md §6).
/// Method and Field surface as their own entries here even though they
/// nest under Type in the source-side data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Type,
    Func,
    Var,
    Const,
    Method,
    Field,
}

/// A single resolved rename instruction, in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledRenameRule {
    Explicit { from: String, to: String },
    Prefix { value: String },
    Suffix { value: String },
    Regex { pattern: String, replace: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledCategory {
    /// Resolved rules, in invariant-5 order (explicit, prefix, suffix,
    /// regex), keyed by symbol name (`"Type"` or `"Type.Member"` for
    /// Method/Field).
    pub rules: HashMap<String, Vec<CompiledRenameRule>>,
    pub ignore: Vec<String>,
    /// Resolved `(kind, pattern)` per symbol, wildcard-fallback applied
    /// (spec.md §8 concrete scenario 2). Only ever populated for
    /// [`RuleKind::Type`] -- other kinds have no kind/pattern of their own.
    pub type_shape: HashMap<String, (Option<TypeKind>, Option<TypePattern>)>,
}

pub type PackageCompiled = HashMap<RuleKind, CompiledCategory>;

/// The fully resolved, ready-to-apply configuration. Keyed by package
/// import path, with [`GLOBAL_SCOPE`] standing in for Root-level
/// (non-packaged) rules.
pub type CompiledConfig = HashMap<String, PackageCompiled>;

pub const GLOBAL_SCOPE: &str = "global";

/// Pass 1: merge a declarative config (if any) with the in-source-directive
/// tree, appending/upserting per spec.md §3's invariants 2 and 3.
pub fn merge(declarative: Option<RootData>, in_source: RootData) -> RootData {
    let mut target = declarative.unwrap_or_default();
    let (defaults, touched) = (&mut target.defaults, &mut target.defaults_touched);
    defaults.fill_absent_from(touched, &in_source.defaults, &in_source.defaults_touched);
    target.ignore.extend(in_source.ignore);
    target.properties.extend(in_source.properties);
    for t in in_source.categories.types {
        crate::container::upsert_type(&mut target.categories.types, t);
    }
    for f in in_source.categories.functions {
        crate::container::upsert_leaf(&mut target.categories.functions, f);
    }
    for v in in_source.categories.variables {
        crate::container::upsert_leaf(&mut target.categories.variables, v);
    }
    for c in in_source.categories.constants {
        crate::container::upsert_leaf(&mut target.categories.constants, c);
    }
    for p in in_source.packages {
        if let Some(existing) = target.packages.iter_mut().find(|e| e.import == p.import) {
            existing.merge_append(p);
        } else {
            target.packages.push(p);
        }
    }
    target
}

fn combine_scalar(accum: &str, local: &str, mode: Mode, inherit: Option<bool>) -> String {
    if inherit == Some(false) {
        return local.to_string();
    }
    if inherit == Some(true) && local.is_empty() {
        return accum.to_string();
    }
    match mode {
        Mode::Replace | Mode::Merge => local.to_string(),
        Mode::Append => format!("{accum}{local}"),
        Mode::Prepend => format!("{local}{accum}"),
    }
}

fn combine_list<T: Clone>(
    accum: &[T],
    local: &[T],
    mode: Mode,
    inherit: Option<bool>,
    key_of: impl Fn(&T) -> String,
) -> Vec<T> {
    if inherit == Some(false) {
        return local.to_vec();
    }
    if inherit == Some(true) && local.is_empty() {
        return accum.to_vec();
    }
    match mode {
        Mode::Replace => local.to_vec(),
        Mode::Append => accum.iter().chain(local).cloned().collect(),
        Mode::Prepend => local.iter().chain(accum).cloned().collect(),
        Mode::Merge => {
            let mut out = accum.to_vec();
            for item in local {
                let key = key_of(item);
                if let Some(slot) = out.iter_mut().find(|existing| key_of(existing) == key) {
                    *slot = item.clone();
                } else {
                    out.push(item.clone());
                }
            }
            out
        }
    }
}

/// Folds `next` onto the already-accumulated `accum` RuleSet, using
/// `next`'s own `*_mode` where set and the project `defaults` otherwise.
fn combine_into(accum: RuleSet, next: &RuleSet, defaults: &Defaults) -> RuleSet {
    let strategy_mode = next.strategy_mode.unwrap_or(defaults.strategy_mode);
    let prefix_mode = next.prefix_mode.unwrap_or(defaults.prefix_mode);
    let suffix_mode = next.suffix_mode.unwrap_or(defaults.suffix_mode);
    let explicit_mode = next.explicit_mode.unwrap_or(defaults.explicit_mode);
    let regex_mode = next.regex_mode.unwrap_or(defaults.regex_mode);
    let ignore_mode = next.ignore_mode.unwrap_or(defaults.ignore_mode);

    RuleSet {
        strategy: combine_list(&accum.strategy, &next.strategy, strategy_mode, None, |s| {
            s.clone()
        }),
        strategy_mode: Some(strategy_mode),
        prefix: combine_scalar(&accum.prefix, &next.prefix, prefix_mode, next.inherit_prefix),
        prefix_mode: Some(prefix_mode),
        suffix: combine_scalar(&accum.suffix, &next.suffix, suffix_mode, next.inherit_suffix),
        suffix_mode: Some(suffix_mode),
        explicit: combine_list(
            &accum.explicit,
            &next.explicit,
            explicit_mode,
            next.inherit_explicit,
            |e: &ExplicitRule| e.from.clone(),
        ),
        explicit_mode: Some(explicit_mode),
        regex: combine_list(
            &accum.regex,
            &next.regex,
            regex_mode,
            next.inherit_regex,
            |r: &RegexRule| r.pattern.clone(),
        ),
        regex_mode: Some(regex_mode),
        ignore: combine_list(&accum.ignore, &next.ignore, ignore_mode, next.inherit_ignore, |s| {
            s.clone()
        }),
        ignore_mode: Some(ignore_mode),
        transform: if next.transform.before.is_empty() && next.transform.after.is_empty() {
            accum.transform.clone()
        } else {
            next.transform.clone()
        },
        inherit_prefix: next.inherit_prefix,
        inherit_suffix: next.inherit_suffix,
        inherit_explicit: next.inherit_explicit,
        inherit_regex: next.inherit_regex,
        inherit_ignore: next.inherit_ignore,
    }
}

/// Resolves one item's effective RuleSet by folding the scope chain
/// (global wildcard -> package wildcard -> the item's own RuleSet), per
/// spec.md §4.6.
fn resolve_chain(
    chain: &[&RuleSet],
    defaults: &Defaults,
) -> RuleSet {
    chain
        .iter()
        .fold(RuleSet::default(), |accum, next| combine_into(accum, next, defaults))
}

fn wildcard_ruleset(types: &[TypeData]) -> Option<&RuleSet> {
    types.iter().find(|t| t.is_wildcard()).map(|t| &t.ruleset)
}

fn wildcard_leaf_ruleset(leaves: &[LeafData]) -> Option<&RuleSet> {
    leaves.iter().find(|l| l.is_wildcard()).map(|l| &l.ruleset)
}

fn wildcard_type_shape(types: &[TypeData]) -> (Option<TypeKind>, Option<TypePattern>) {
    types
        .iter()
        .find(|t| t.is_wildcard())
        .map(|t| (t.kind, t.pattern))
        .unwrap_or((None, None))
}

/// Pass 2 + Pass 3: resolve inheritance across the scope chain and
/// linearize the result into [`CompiledConfig`].
pub fn compile(root: &RootData) -> CompiledConfig {
    let mut out = CompiledConfig::new();

    out.insert(
        GLOBAL_SCOPE.to_string(),
        compile_categories(
            &root.categories.types,
            &root.categories.functions,
            &root.categories.variables,
            &root.categories.constants,
            None,
            &root.defaults,
        ),
    );

    for pkg in &root.packages {
        let pkg_compiled = compile_categories(
            &pkg.categories.types,
            &pkg.categories.functions,
            &pkg.categories.variables,
            &pkg.categories.constants,
            Some(root),
            &root.defaults,
        );
        out.insert(pkg.import.clone(), pkg_compiled);
    }

    out
}

fn compile_categories(
    types: &[TypeData],
    functions: &[LeafData],
    variables: &[LeafData],
    constants: &[LeafData],
    global: Option<&RootData>,
    defaults: &Defaults,
) -> PackageCompiled {
    let mut out = PackageCompiled::new();

    let global_type_wc = global.and_then(|r| wildcard_ruleset(&r.categories.types));
    let global_func_wc = global.and_then(|r| wildcard_leaf_ruleset(&r.categories.functions));
    let global_var_wc = global.and_then(|r| wildcard_leaf_ruleset(&r.categories.variables));
    let global_const_wc = global.and_then(|r| wildcard_leaf_ruleset(&r.categories.constants));
    let local_type_wc = wildcard_ruleset(types);
    let local_func_wc = wildcard_leaf_ruleset(functions);
    let local_var_wc = wildcard_leaf_ruleset(variables);
    let local_const_wc = wildcard_leaf_ruleset(constants);
    let wildcard_shape = wildcard_type_shape(types);

    let mut type_category = CompiledCategory::default();
    let mut method_category = CompiledCategory::default();
    let mut field_category = CompiledCategory::default();
    for ty in types {
        if ty.is_wildcard() || ty.disabled {
            continue;
        }
        let chain: Vec<&RuleSet> = [global_type_wc, local_type_wc]
            .into_iter()
            .flatten()
            .chain(std::iter::once(&ty.ruleset))
            .collect();
        let resolved = resolve_chain(&chain, defaults);
        type_category.ignore.extend(resolved.ignore.clone());
        type_category
            .rules
            .insert(ty.name.clone(), linearize(&resolved));

        type_category.type_shape.insert(
            ty.name.clone(),
            (ty.kind.or(wildcard_shape.0), ty.pattern.or(wildcard_shape.1)),
        );

        for method in &ty.methods {
            if method.disabled {
                continue;
            }
            let resolved = resolve_chain(&[&resolved.clone(), &method.ruleset], defaults);
            let key = format!("{}.{}", ty.name, method.name);
            method_category.ignore.extend(resolved.ignore.clone());
            method_category.rules.insert(key, linearize(&resolved));
        }
        for field in &ty.fields {
            if field.disabled {
                continue;
            }
            let resolved = resolve_chain(&[&resolved.clone(), &field.ruleset], defaults);
            let key = format!("{}.{}", ty.name, field.name);
            field_category.ignore.extend(resolved.ignore.clone());
            field_category.rules.insert(key, linearize(&resolved));
        }
    }
    out.insert(RuleKind::Type, type_category);
    out.insert(RuleKind::Method, method_category);
    out.insert(RuleKind::Field, field_category);

    out.insert(
        RuleKind::Func,
        compile_leaf_category(functions, global_func_wc, local_func_wc, defaults),
    );
    out.insert(
        RuleKind::Var,
        compile_leaf_category(variables, global_var_wc, local_var_wc, defaults),
    );
    out.insert(
        RuleKind::Const,
        compile_leaf_category(constants, global_const_wc, local_const_wc, defaults),
    );

    out
}

fn compile_leaf_category(
    leaves: &[LeafData],
    global_wc: Option<&RuleSet>,
    local_wc: Option<&RuleSet>,
    defaults: &Defaults,
) -> CompiledCategory {
    let mut category = CompiledCategory::default();
    for leaf in leaves {
        if leaf.is_wildcard() || leaf.disabled {
            continue;
        }
        let chain: Vec<&RuleSet> = [global_wc, local_wc]
            .into_iter()
            .flatten()
            .chain(std::iter::once(&leaf.ruleset))
            .collect();
        let resolved = resolve_chain(&chain, defaults);
        category.ignore.extend(resolved.ignore.clone());
        category.rules.insert(leaf.name.clone(), linearize(&resolved));
    }
    category
}

/// Orders a resolved RuleSet's active fields into rename rules per
/// invariant 5 (explicit -> prefix -> suffix -> regex).
fn linearize(rs: &RuleSet) -> Vec<CompiledRenameRule> {
    let mut rules = Vec::new();
    for e in &rs.explicit {
        rules.push(CompiledRenameRule::Explicit {
            from: e.from.clone(),
            to: e.to.clone(),
        });
    }
    if !rs.prefix.is_empty() {
        rules.push(CompiledRenameRule::Prefix {
            value: rs.prefix.clone(),
        });
    }
    if !rs.suffix.is_empty() {
        rules.push(CompiledRenameRule::Suffix {
            value: rs.suffix.clone(),
        });
    }
    for r in &rs.regex {
        rules.push(CompiledRenameRule::Regex {
            pattern: r.pattern.clone(),
            replace: r.replace.clone(),
        });
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Categories, TypeData};

    fn root_with_types(types: Vec<TypeData>) -> RootData {
        RootData {
            categories: Categories {
                types,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn wildcard_prefix_inherits_under_append_mode() {
        let mut wildcard = TypeData::named("*");
        wildcard.ruleset.prefix = "Ext".to_string();
        wildcard.ruleset.prefix_mode = Some(Mode::Append);
        let specific = TypeData::named("A");
        let root = root_with_types(vec![wildcard, specific]);

        let compiled = compile(&root);
        let rules = &compiled[GLOBAL_SCOPE][&RuleKind::Type].rules["A"];
        assert_eq!(rules, &vec![CompiledRenameRule::Prefix { value: "Ext".to_string() }]);
    }

    #[test]
    fn explicit_local_replace_ignores_wildcard_by_default() {
        let mut wildcard = TypeData::named("*");
        wildcard.ruleset.prefix = "Ext".to_string(); // default mode = Replace
        let mut specific = TypeData::named("A");
        specific.ruleset.suffix = "Impl".to_string();
        let root = root_with_types(vec![wildcard, specific]);

        let compiled = compile(&root);
        let rules = &compiled[GLOBAL_SCOPE][&RuleKind::Type].rules["A"];
        assert_eq!(rules, &vec![CompiledRenameRule::Suffix { value: "Impl".to_string() }]);
    }

    #[test]
    fn inherit_override_true_adopts_wildcard_when_local_empty() {
        let mut wildcard = TypeData::named("*");
        wildcard.ruleset.prefix = "Ext".to_string();
        let mut specific = TypeData::named("A");
        specific.ruleset.inherit_prefix = Some(true);
        let root = root_with_types(vec![wildcard, specific]);

        let compiled = compile(&root);
        let rules = &compiled[GLOBAL_SCOPE][&RuleKind::Type].rules["A"];
        assert_eq!(rules, &vec![CompiledRenameRule::Prefix { value: "Ext".to_string() }]);
    }

    #[test]
    fn type_pattern_falls_back_to_wildcard() {
        let mut wildcard = TypeData::named("*");
        wildcard.pattern = Some(TypePattern::Wrap);
        wildcard.kind = Some(TypeKind::Struct);
        let specific = TypeData::named("A"); // no local pattern/kind
        let root = root_with_types(vec![wildcard, specific]);

        let compiled = compile(&root);
        let shape = compiled[GLOBAL_SCOPE][&RuleKind::Type].type_shape["A"];
        assert_eq!(shape, (Some(TypeKind::Struct), Some(TypePattern::Wrap)));
    }

    #[test]
    fn merge_pass_appends_packages_by_import() {
        let mut a = RootData::default();
        a.packages.push(PackageData::new("p/v3"));
        let mut b = RootData::default();
        let mut p = PackageData::new("p/v3");
        p.categories.types.push(TypeData::named("T"));
        b.packages.push(p);

        let merged = merge(Some(a), b);
        assert_eq!(merged.packages.len(), 1);
        assert_eq!(merged.packages[0].categories.types.len(), 1);
    }

    #[test]
    fn merge_pass_fills_absent_defaults_only() {
        let mut declarative = RootData::default();
        declarative.defaults.prefix_mode = Mode::Append;
        declarative.defaults_touched.prefix_mode = true;

        let mut in_source = RootData::default();
        in_source.defaults.suffix_mode = Mode::Merge;
        in_source.defaults_touched.suffix_mode = true;
        in_source.defaults.prefix_mode = Mode::Prepend;
        in_source.defaults_touched.prefix_mode = true;

        let merged = merge(Some(declarative), in_source);
        assert_eq!(merged.defaults.prefix_mode, Mode::Append); // declarative wins, already touched
        assert_eq!(merged.defaults.suffix_mode, Mode::Merge); // filled from in_source
    }

    #[test]
    fn method_inherits_from_its_owning_type() {
        let mut ty = TypeData::named("T");
        ty.ruleset.prefix = "X".to_string();
        ty.ruleset.prefix_mode = Some(Mode::Append);
        let mut method = LeafData::named("DoX");
        method.ruleset.suffix = "Y".to_string();
        ty.methods.push(method);
        let root = root_with_types(vec![ty]);

        let compiled = compile(&root);
        let rules = &compiled[GLOBAL_SCOPE][&RuleKind::Method].rules["T.DoX"];
        assert!(rules.contains(&CompiledRenameRule::Prefix { value: "X".to_string() }));
        assert!(rules.contains(&CompiledRenameRule::Suffix { value: "Y".to_string() }));
    }
}
