use serde::{Deserialize, Serialize};

use crate::container::rule::Categories;

/// A Package rule: import path, optional alias, optional filesystem path,
/// properties, and per-category rule lists (spec.md §3).
///
/// Packages are identified by `import` path (invariant 2); `PackageData`
/// itself does not enforce uniqueness -- that's the Root's job when adding
/// a child (spec.md §3 invariant 2, merge by append of child lists).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageData {
    pub import: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub properties: Vec<(String, String)>,
    #[serde(default)]
    pub categories: Categories,
}

impl PackageData {
    pub fn new(import: impl Into<String>) -> Self {
        Self {
            import: import.into(),
            ..Default::default()
        }
    }

    /// Merge `incoming` into `self` by appending category rule lists and
    /// properties. This is the "duplicate import path" rule from spec.md §3
    /// invariant 2 / §9 Open Question 4: deliberately append, never replace.
    pub fn merge_append(&mut self, incoming: PackageData) {
        if incoming.alias.is_some() {
            self.alias = incoming.alias;
        }
        if incoming.path.is_some() {
            self.path = incoming.path;
        }
        self.properties.extend(incoming.properties);
        for t in incoming.categories.types {
            crate::container::rule::upsert_type(&mut self.categories.types, t);
        }
        for f in incoming.categories.functions {
            crate::container::rule::upsert_leaf(&mut self.categories.functions, f);
        }
        for v in incoming.categories.variables {
            crate::container::rule::upsert_leaf(&mut self.categories.variables, v);
        }
        for c in incoming.categories.constants {
            crate::container::rule::upsert_leaf(&mut self.categories.constants, c);
        }
    }
}
