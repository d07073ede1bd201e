//! The polymorphic Container/Rule taxonomy (spec.md §4.2).
//!
//! `ContainerKind` is a closed enum (Root, Package, Type, Func, Var, Const,
//! Method, Field); `Container` is a tagged union over the per-kind data.
//! Per spec.md §9's design notes this replaces the original tool's
//! trait-object hierarchy and its `InvalidContainer` sentinel: because the
//! kind enum is closed and every `match` on it is exhaustive, there is no
//! "unknown kind" left to special-case.

pub mod package;
pub mod root;
pub mod rule;

use crate::directive::Directive;
use crate::error::{AdapterError, Result};
use crate::ruleset::{ExplicitRule, Mode};

pub use package::PackageData;
pub use root::{Defaults, DefaultsTouched, RootData};
pub use rule::{upsert_leaf, upsert_type, Categories, LeafData, TypeData, TypeKind, TypePattern};

/// The closed set of rule kinds. Used both as the tag of [`Container`] and
/// as the key type for compiled output (`RuleKind` in spec.md §6 reuses the
/// leaf subset of this same enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Root,
    Package,
    Type,
    Func,
    Var,
    Const,
    Method,
    Field,
}

impl ContainerKind {
    pub fn label(self) -> &'static str {
        match self {
            ContainerKind::Root => "Root",
            ContainerKind::Package => "Package",
            ContainerKind::Type => "Type",
            ContainerKind::Func => "Func",
            ContainerKind::Var => "Var",
            ContainerKind::Const => "Const",
            ContainerKind::Method => "Method",
            ContainerKind::Field => "Field",
        }
    }

    /// Maps a directive base command to the kind it would open, *given*
    /// the active context is of kind `self`. Returns `None` when `self`
    /// hosts no such child (spec.md §3's permitted-child table).
    pub fn opener_kind_for(self, base: &str) -> Option<ContainerKind> {
        match self {
            ContainerKind::Root => match base {
                "package" => Some(ContainerKind::Package),
                "type" => Some(ContainerKind::Type),
                "function" | "func" => Some(ContainerKind::Func),
                "variable" | "var" => Some(ContainerKind::Var),
                "constant" | "const" => Some(ContainerKind::Const),
                _ => None,
            },
            ContainerKind::Package => match base {
                "type" => Some(ContainerKind::Type),
                "function" | "func" => Some(ContainerKind::Func),
                "variable" | "var" => Some(ContainerKind::Var),
                "constant" | "const" => Some(ContainerKind::Const),
                _ => None,
            },
            ContainerKind::Type => match base {
                "method" => Some(ContainerKind::Method),
                "field" => Some(ContainerKind::Field),
                _ => None,
            },
            ContainerKind::Func
            | ContainerKind::Var
            | ContainerKind::Const
            | ContainerKind::Method
            | ContainerKind::Field => None,
        }
    }

    pub fn permits_child(self, child: ContainerKind) -> bool {
        matches!(
            (self, child),
            (ContainerKind::Root, ContainerKind::Package)
                | (ContainerKind::Root, ContainerKind::Type)
                | (ContainerKind::Root, ContainerKind::Func)
                | (ContainerKind::Root, ContainerKind::Var)
                | (ContainerKind::Root, ContainerKind::Const)
                | (ContainerKind::Package, ContainerKind::Type)
                | (ContainerKind::Package, ContainerKind::Func)
                | (ContainerKind::Package, ContainerKind::Var)
                | (ContainerKind::Package, ContainerKind::Const)
                | (ContainerKind::Type, ContainerKind::Method)
                | (ContainerKind::Type, ContainerKind::Field)
        )
    }
}

/// A node in the scope tree owning one rule kind's data.
#[derive(Debug, Clone)]
pub enum Container {
    Root(RootData),
    Package(PackageData),
    Type(TypeData),
    Func(LeafData),
    Var(LeafData),
    Const(LeafData),
    Method(LeafData),
    Field(LeafData),
}

impl Container {
    pub fn new(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Root => Container::Root(RootData::default()),
            ContainerKind::Package => Container::Package(PackageData::default()),
            ContainerKind::Type => Container::Type(TypeData::default()),
            ContainerKind::Func => Container::Func(LeafData::default()),
            ContainerKind::Var => Container::Var(LeafData::default()),
            ContainerKind::Const => Container::Const(LeafData::default()),
            ContainerKind::Method => Container::Method(LeafData::default()),
            ContainerKind::Field => Container::Field(LeafData::default()),
        }
    }

    pub fn kind(&self) -> ContainerKind {
        match self {
            Container::Root(_) => ContainerKind::Root,
            Container::Package(_) => ContainerKind::Package,
            Container::Type(_) => ContainerKind::Type,
            Container::Func(_) => ContainerKind::Func,
            Container::Var(_) => ContainerKind::Var,
            Container::Const(_) => ContainerKind::Const,
            Container::Method(_) => ContainerKind::Method,
            Container::Field(_) => ContainerKind::Field,
        }
    }

    /// Consume the opening directive's argument to name this rule. Called
    /// exactly once, right after [`Container::new`], by the scope machine.
    pub fn bind_opening_argument(&mut self, argument: &str) {
        match self {
            Container::Root(_) => {}
            Container::Package(p) => {
                let (import, alias) = match argument.split_once(char::is_whitespace) {
                    Some((i, a)) => (i.trim(), Some(a.trim().to_string())),
                    None => (argument.trim(), None),
                };
                p.import = import.to_string();
                p.alias = alias.filter(|a| !a.is_empty());
            }
            Container::Type(t) => t.name = argument.to_string(),
            Container::Func(l) | Container::Var(l) | Container::Const(l) => {
                l.name = argument.to_string()
            }
            Container::Method(l) | Container::Field(l) => l.name = argument.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Container::Root(_) => "",
            Container::Package(p) => &p.import,
            Container::Type(t) => &t.name,
            Container::Func(l) | Container::Var(l) | Container::Const(l) => &l.name,
            Container::Method(l) | Container::Field(l) => &l.name,
        }
    }

    /// Apply a directive that does not itself start a new scope. `directive`
    /// is already positioned at this container's own dispatch level (any
    /// kind-routing prefix has been peeled off via [`Directive::sub`]).
    pub fn parse_directive(&mut self, directive: &Directive) -> Result<()> {
        match self {
            Container::Root(root) => parse_root(root, directive),
            Container::Package(pkg) => parse_package(pkg, directive),
            Container::Type(ty) => parse_type(ty, directive),
            Container::Func(leaf) | Container::Var(leaf) | Container::Const(leaf) => {
                parse_leaf(leaf, directive)
            }
            Container::Method(leaf) | Container::Field(leaf) => parse_leaf(leaf, directive),
        }
    }

    /// Attach a finalized child. Fails if the kind pairing is disallowed
    /// (spec.md §3's permitted-child table).
    pub fn add_child(&mut self, child: Container) -> Result<()> {
        if !self.kind().permits_child(child.kind()) {
            return Err(AdapterError::ForbiddenChild {
                parent: self.kind().label().to_string(),
                child: child.kind().label().to_string(),
            });
        }
        match (self, child) {
            (Container::Root(root), Container::Package(incoming)) => {
                if let Some(existing) = root
                    .packages
                    .iter_mut()
                    .find(|p| p.import == incoming.import)
                {
                    existing.merge_append(incoming);
                } else {
                    root.packages.push(incoming);
                }
            }
            (Container::Root(root), Container::Type(t)) => {
                upsert_type(&mut root.categories.types, t)
            }
            (Container::Root(root), Container::Func(l)) => {
                upsert_leaf(&mut root.categories.functions, l)
            }
            (Container::Root(root), Container::Var(l)) => {
                upsert_leaf(&mut root.categories.variables, l)
            }
            (Container::Root(root), Container::Const(l)) => {
                upsert_leaf(&mut root.categories.constants, l)
            }
            (Container::Package(pkg), Container::Type(t)) => {
                upsert_type(&mut pkg.categories.types, t)
            }
            (Container::Package(pkg), Container::Func(l)) => {
                upsert_leaf(&mut pkg.categories.functions, l)
            }
            (Container::Package(pkg), Container::Var(l)) => {
                upsert_leaf(&mut pkg.categories.variables, l)
            }
            (Container::Package(pkg), Container::Const(l)) => {
                upsert_leaf(&mut pkg.categories.constants, l)
            }
            (Container::Type(ty), Container::Method(l)) => upsert_leaf(&mut ty.methods, l),
            (Container::Type(ty), Container::Field(l)) => upsert_leaf(&mut ty.fields, l),
            // Every other pairing was already rejected by `permits_child` above.
            _ => unreachable!("permits_child should have rejected this pairing"),
        }
        Ok(())
    }
}

fn require_argument<'a>(directive: &'a Directive) -> Result<&'a str> {
    if directive.argument.is_empty() {
        Err(AdapterError::RequiresArgument {
            line: directive.line,
            command: directive.command.clone(),
        })
    } else {
        Ok(&directive.argument)
    }
}

fn parse_bool(directive: &Directive) -> Result<bool> {
    let arg = require_argument(directive)?;
    match arg {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(AdapterError::InvalidArgument {
            line: directive.line,
            field: directive.command.clone(),
            argument: other.to_string(),
            reason: "expected 'true' or 'false'".to_string(),
        }),
    }
}

fn parse_mode_value(directive: &Directive) -> Result<Mode> {
    let arg = require_argument(directive)?;
    arg.parse::<Mode>()
        .map_err(|reason| AdapterError::InvalidArgument {
            line: directive.line,
            field: directive.command.clone(),
            argument: arg.to_string(),
            reason,
        })
}

fn parse_root(root: &mut RootData, directive: &Directive) -> Result<()> {
    match (directive.base.as_str(), directive.subs.as_slice()) {
        // Resolved Open Question 1 (spec.md §9): the directive is
        // `default:mode:<field>`, i.e. base "default" with two subs,
        // "mode" and the target field name.
        ("default", subs) if subs.len() == 2 && subs[0] == "mode" => {
            let mode = parse_mode_value(directive)?;
            match subs[1].as_str() {
                "strategy" => {
                    root.defaults.strategy_mode = mode;
                    root.defaults_touched.strategy_mode = true;
                }
                "prefix" => {
                    root.defaults.prefix_mode = mode;
                    root.defaults_touched.prefix_mode = true;
                }
                "suffix" => {
                    root.defaults.suffix_mode = mode;
                    root.defaults_touched.suffix_mode = true;
                }
                "explicit" => {
                    root.defaults.explicit_mode = mode;
                    root.defaults_touched.explicit_mode = true;
                }
                "regex" => {
                    root.defaults.regex_mode = mode;
                    root.defaults_touched.regex_mode = true;
                }
                "ignore" | "ignores" => {
                    root.defaults.ignore_mode = mode;
                    root.defaults_touched.ignore_mode = true;
                }
                other => {
                    return Err(AdapterError::UnrecognizedDirective {
                        line: directive.line,
                        command: format!("default:mode:{other}"),
                    })
                }
            }
            Ok(())
        }
        ("property", []) => {
            let arg = require_argument(directive)?;
            let (name, value) = arg
                .split_once(char::is_whitespace)
                .ok_or_else(|| AdapterError::InvalidArgument {
                    line: directive.line,
                    field: "property".to_string(),
                    argument: arg.to_string(),
                    reason: "expected 'name value'".to_string(),
                })?;
            root.properties
                .push((name.to_string(), value.trim().to_string()));
            Ok(())
        }
        ("ignore", []) => {
            root.ignore.push(require_argument(directive)?.to_string());
            Ok(())
        }
        ("ignores", []) => {
            let arg = require_argument(directive)?;
            root.ignore
                .extend(arg.split_whitespace().map(str::to_string));
            Ok(())
        }
        _ => Err(AdapterError::UnrecognizedDirective {
            line: directive.line,
            command: directive.command.clone(),
        }),
    }
}

fn parse_package(pkg: &mut PackageData, directive: &Directive) -> Result<()> {
    match (directive.base.as_str(), directive.subs.as_slice()) {
        ("alias", []) => {
            pkg.alias = Some(require_argument(directive)?.to_string());
            Ok(())
        }
        ("path", []) => {
            pkg.path = Some(require_argument(directive)?.to_string());
            Ok(())
        }
        ("import", []) => {
            pkg.import = require_argument(directive)?.to_string();
            Ok(())
        }
        ("property", []) => {
            let arg = require_argument(directive)?;
            let (name, value) = arg
                .split_once(char::is_whitespace)
                .ok_or_else(|| AdapterError::InvalidArgument {
                    line: directive.line,
                    field: "property".to_string(),
                    argument: arg.to_string(),
                    reason: "expected 'name value'".to_string(),
                })?;
            pkg.properties
                .push((name.to_string(), value.trim().to_string()));
            Ok(())
        }
        _ => Err(AdapterError::UnrecognizedDirective {
            line: directive.line,
            command: directive.command.clone(),
        }),
    }
}

fn parse_type(ty: &mut TypeData, directive: &Directive) -> Result<()> {
    match (directive.base.as_str(), directive.subs.as_slice()) {
        ("struct", []) => {
            let arg = require_argument(directive)?;
            ty.pattern = Some(parse_pattern(directive, arg)?);
            ty.kind = Some(TypeKind::Struct);
            Ok(())
        }
        ("disabled", []) => {
            ty.disabled = parse_bool(directive)?;
            Ok(())
        }
        ("rename", []) => {
            apply_rename(&mut ty.ruleset, &ty.name, directive)
        }
        _ => ty.ruleset.apply(directive),
    }
}

fn parse_leaf(leaf: &mut LeafData, directive: &Directive) -> Result<()> {
    match (directive.base.as_str(), directive.subs.as_slice()) {
        ("disabled", []) => {
            leaf.disabled = parse_bool(directive)?;
            Ok(())
        }
        ("rename", []) => apply_rename(&mut leaf.ruleset, &leaf.name, directive),
        _ => leaf.ruleset.apply(directive),
    }
}

/// `rename <new name>` is sugar for `explicit <own name>=<new name>`
/// (spec.md §8 concrete scenario 1). It isn't in the formal RuleSet grammar
/// table (spec.md §4.4) because it needs the owning rule's own name, which
/// `RuleSet` itself doesn't know -- so it's handled one level up, in each
/// leaf kind's own dispatch, rather than in `RuleSet::apply`.
fn apply_rename(ruleset: &mut crate::ruleset::RuleSet, own_name: &str, directive: &Directive) -> Result<()> {
    let to = require_argument(directive)?;
    ruleset.explicit.push(ExplicitRule {
        from: own_name.to_string(),
        to: to.to_string(),
    });
    Ok(())
}

fn parse_pattern(directive: &Directive, value: &str) -> Result<TypePattern> {
    match value {
        "wrap" => Ok(TypePattern::Wrap),
        "copy" => Ok(TypePattern::Copy),
        "alias" => Ok(TypePattern::Alias),
        "define" => Ok(TypePattern::Define),
        other => Err(AdapterError::InvalidArgument {
            line: directive.line,
            field: "struct".to_string(),
            argument: other.to_string(),
            reason: "expected wrap, copy, alias, or define".to_string(),
        }),
    }
}
