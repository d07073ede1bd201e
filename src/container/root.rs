use serde::{Deserialize, Serialize};

use crate::container::package::PackageData;
use crate::container::rule::Categories;
use crate::ruleset::Mode;

/// Per-field mode defaults, used when a rule doesn't set its own
/// `*_mode` (spec.md §3 "Defaults.Mode").
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub strategy_mode: Mode,
    #[serde(default)]
    pub prefix_mode: Mode,
    #[serde(default)]
    pub suffix_mode: Mode,
    #[serde(default)]
    pub explicit_mode: Mode,
    #[serde(default)]
    pub regex_mode: Mode,
    #[serde(default)]
    pub ignore_mode: Mode,
}

impl Default for Defaults {
    fn default() -> Self {
        // See DESIGN.md Open Question resolution: every field defaults to
        // `replace` absent an explicit `default:mode:<field>` directive or
        // declarative `defaults:` entry, matching `Mode`'s own `#[default]`.
        Self {
            strategy_mode: Mode::Replace,
            prefix_mode: Mode::Replace,
            suffix_mode: Mode::Replace,
            explicit_mode: Mode::Replace,
            regex_mode: Mode::Replace,
            ignore_mode: Mode::Replace,
        }
    }
}

impl Defaults {
    /// Fill in only the fields `touched` says are still absent, from `other`
    /// wherever `other_touched` says it was explicitly set. Used by Pass 1
    /// merge ("Global `Defaults.Mode` fields only fill in where absent",
    /// spec.md §4.6). Marks `touched` for every field it fills, so a later
    /// merge won't overwrite it again.
    pub fn fill_absent_from(
        &mut self,
        touched: &mut DefaultsTouched,
        other: &Defaults,
        other_touched: &DefaultsTouched,
    ) {
        macro_rules! fill {
            ($field:ident) => {
                if !touched.$field && other_touched.$field {
                    self.$field = other.$field;
                    touched.$field = true;
                }
            };
        }
        fill!(strategy_mode);
        fill!(prefix_mode);
        fill!(suffix_mode);
        fill!(explicit_mode);
        fill!(regex_mode);
        fill!(ignore_mode);
    }
}

/// Tracks which `Defaults` fields a Root has explicitly set via a
/// `default:mode:<field>` directive or declarative `defaults:` entry, so
/// Pass 1 merge knows which fields are still "absent" and may be filled in
/// from another source's defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultsTouched {
    pub strategy_mode: bool,
    pub prefix_mode: bool,
    pub suffix_mode: bool,
    pub explicit_mode: bool,
    pub regex_mode: bool,
    pub ignore_mode: bool,
}

/// The root of the scope tree: global defaults, the global ignore list,
/// ordered properties, global category rule lists, and the packages list
/// (spec.md §3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RootData {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(skip)]
    pub defaults_touched: DefaultsTouched,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub properties: Vec<(String, String)>,
    #[serde(default)]
    pub categories: Categories,
    #[serde(default)]
    pub packages: Vec<PackageData>,
}
