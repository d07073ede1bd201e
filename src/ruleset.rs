//! The RuleSet sub-directive grammar (spec.md §4.4), shared by every leaf
//! rule kind (Type, Func, Var, Const, Method, Field).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::directive::Directive;
use crate::error::{AdapterError, Result};

/// How an inherited RuleSet field combines with a local one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Replace,
    Append,
    Prepend,
    Merge,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "replace" => Ok(Mode::Replace),
            "append" => Ok(Mode::Append),
            "prepend" => Ok(Mode::Prepend),
            "merge" => Ok(Mode::Merge),
            other => Err(format!(
                "unknown mode '{other}' (expected replace, append, prepend, or merge)"
            )),
        }
    }
}

/// An explicit `from -> to` rename rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplicitRule {
    pub from: String,
    pub to: String,
}

/// A regex `pattern -> replace` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexRule {
    pub pattern: String,
    pub replace: String,
}

/// The `transform:before`/`transform:after` pair. Legacy
/// `transform_before`/`transform_after` directives write through to the same
/// two fields -- there is exactly one source of truth, so the "scalar
/// mirror" the original tool kept is redundant here and the two write paths
/// can never drift (see DESIGN.md Open Question 3).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub before: String,
    #[serde(default)]
    pub after: String,
}

/// The shared set of sub-directive-controlled fields attached to every leaf
/// rule (spec.md §3 "RuleSet").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub strategy: Vec<String>,
    #[serde(default)]
    pub strategy_mode: Option<Mode>,

    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub prefix_mode: Option<Mode>,

    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub suffix_mode: Option<Mode>,

    #[serde(default)]
    pub explicit: Vec<ExplicitRule>,
    #[serde(default)]
    pub explicit_mode: Option<Mode>,

    #[serde(default)]
    pub regex: Vec<RegexRule>,
    #[serde(default)]
    pub regex_mode: Option<Mode>,

    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub ignore_mode: Option<Mode>,

    #[serde(default)]
    pub transform: Transform,

    /// `inherit_<field>` overrides, declarative-config only (spec.md §4.6).
    #[serde(default)]
    pub inherit_prefix: Option<bool>,
    #[serde(default)]
    pub inherit_suffix: Option<bool>,
    #[serde(default)]
    pub inherit_explicit: Option<bool>,
    #[serde(default)]
    pub inherit_regex: Option<bool>,
    #[serde(default)]
    pub inherit_ignore: Option<bool>,
}

fn require_argument(directive: &Directive) -> Result<&str> {
    if directive.argument.is_empty() {
        Err(AdapterError::RequiresArgument {
            line: directive.line,
            command: directive.command.clone(),
        })
    } else {
        Ok(&directive.argument)
    }
}

fn parse_mode(directive: &Directive) -> Result<Mode> {
    let arg = require_argument(directive)?;
    Mode::from_str(arg).map_err(|reason| AdapterError::InvalidArgument {
        line: directive.line,
        field: directive.command.clone(),
        argument: arg.to_string(),
        reason,
    })
}

fn split_once_eq<'a>(directive: &'a Directive, field: &str) -> Result<(&'a str, &'a str)> {
    let arg = require_argument(directive)?;
    arg.split_once('=')
        .ok_or_else(|| AdapterError::InvalidArgument {
            line: directive.line,
            field: field.to_string(),
            argument: arg.to_string(),
            reason: "expected 'key=value'".to_string(),
        })
}

fn parse_json<T: serde::de::DeserializeOwned>(directive: &Directive, field: &str) -> Result<T> {
    let arg = require_argument(directive)?;
    serde_json::from_str(arg).map_err(|e| AdapterError::InvalidJson {
        line: directive.line,
        command: field.to_string(),
        reason: e.to_string(),
    })
}

/// Rejects a malformed regex pattern at directive-apply time rather than
/// letting it reach compiled output unvalidated.
fn validate_pattern(directive: &Directive, pattern: &str) -> Result<()> {
    regex::Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| AdapterError::InvalidArgument {
            line: directive.line,
            field: "regex".to_string(),
            argument: pattern.to_string(),
            reason: e.to_string(),
        })
}

impl RuleSet {
    /// Apply one RuleSet-grammar sub-directive. `directive` must already be
    /// positioned at the RuleSet's own dispatch level (the owning container
    /// has peeled off any kind-specific routing via [`Directive::sub`]).
    ///
    /// Returns `Err(AdapterError::UnrecognizedDirective)` for anything not
    /// in the grammar (spec.md §4.4), so callers can surface that as the
    /// "tried own sub-commands, then the shared grammar, still unknown"
    /// error spec.md §4.2 describes.
    pub fn apply(&mut self, directive: &Directive) -> Result<()> {
        match (directive.base.as_str(), directive.subs.as_slice()) {
            ("strategy", []) => {
                if directive.should_unmarshal() {
                    self.strategy = parse_json(directive, "strategy")?;
                } else {
                    let arg = require_argument(directive)?;
                    self.strategy.push(arg.to_string());
                }
                Ok(())
            }
            ("strategy_mode", []) => {
                self.strategy_mode = Some(parse_mode(directive)?);
                Ok(())
            }

            ("prefix", []) => {
                self.prefix = require_argument(directive)?.to_string();
                Ok(())
            }
            ("prefix_mode", []) => {
                self.prefix_mode = Some(parse_mode(directive)?);
                Ok(())
            }

            ("suffix", []) => {
                self.suffix = require_argument(directive)?.to_string();
                Ok(())
            }
            ("suffix_mode", []) => {
                self.suffix_mode = Some(parse_mode(directive)?);
                Ok(())
            }

            ("explicit", []) => {
                if directive.should_unmarshal() {
                    self.explicit = parse_json(directive, "explicit")?;
                } else {
                    let (from, to) = split_once_eq(directive, "explicit")?;
                    self.explicit.push(ExplicitRule {
                        from: from.to_string(),
                        to: to.to_string(),
                    });
                }
                Ok(())
            }
            ("explicit_mode", []) => {
                self.explicit_mode = Some(parse_mode(directive)?);
                Ok(())
            }

            ("regex", []) => {
                if directive.should_unmarshal() {
                    let rules: Vec<RegexRule> = parse_json(directive, "regex")?;
                    for rule in &rules {
                        validate_pattern(directive, &rule.pattern)?;
                    }
                    self.regex = rules;
                } else {
                    let (pattern, replace) = split_once_eq(directive, "regex")?;
                    validate_pattern(directive, pattern)?;
                    self.regex.push(RegexRule {
                        pattern: pattern.to_string(),
                        replace: replace.to_string(),
                    });
                }
                Ok(())
            }
            ("regex_mode", []) => {
                self.regex_mode = Some(parse_mode(directive)?);
                Ok(())
            }

            ("ignore", []) => {
                self.ignore.push(require_argument(directive)?.to_string());
                Ok(())
            }
            ("ignores", []) => {
                if directive.should_unmarshal() {
                    self.ignore = parse_json(directive, "ignores")?;
                } else {
                    let arg = require_argument(directive)?;
                    self.ignore.extend(arg.split_whitespace().map(str::to_string));
                }
                Ok(())
            }
            ("ignores_mode", []) => {
                self.ignore_mode = Some(parse_mode(directive)?);
                Ok(())
            }

            ("transform", subs) => match subs {
                [] => {
                    let t: Transform = parse_json(directive, "transform")?;
                    self.transform = t;
                    Ok(())
                }
                [field] if field == "before" => {
                    self.transform.before = require_argument(directive)?.to_string();
                    Ok(())
                }
                [field] if field == "after" => {
                    self.transform.after = require_argument(directive)?.to_string();
                    Ok(())
                }
                _ => Err(AdapterError::UnrecognizedDirective {
                    line: directive.line,
                    command: directive.command.clone(),
                }),
            },
            ("transform_before", []) => {
                self.transform.before = require_argument(directive)?.to_string();
                Ok(())
            }
            ("transform_after", []) => {
                self.transform.after = require_argument(directive)?.to_string();
                Ok(())
            }

            _ => Err(AdapterError::UnrecognizedDirective {
                line: directive.line,
                command: directive.command.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive(base: &str, subs: &[&str], argument: &str, json: bool) -> Directive {
        let subs: Vec<String> = subs.iter().map(|s| s.to_string()).collect();
        let mut command_parts = vec![base.to_string()];
        command_parts.extend(subs.iter().cloned());
        Directive {
            line: 1,
            command: command_parts.join(":"),
            argument: argument.to_string(),
            base: base.to_string(),
            subs,
            json,
        }
    }

    #[test]
    fn strategy_appends_by_default() {
        let mut rs = RuleSet::default();
        rs.apply(&directive("strategy", &[], "snake_case", false))
            .unwrap();
        rs.apply(&directive("strategy", &[], "lower", false))
            .unwrap();
        assert_eq!(rs.strategy, vec!["snake_case", "lower"]);
    }

    #[test]
    fn strategy_json_replaces() {
        let mut rs = RuleSet::default();
        rs.strategy = vec!["old".to_string()];
        rs.apply(&directive("strategy", &[], r#"["a","b"]"#, true))
            .unwrap();
        assert_eq!(rs.strategy, vec!["a", "b"]);
    }

    #[test]
    fn explicit_requires_equals() {
        let mut rs = RuleSet::default();
        let err = rs.apply(&directive("explicit", &[], "NoEquals", false));
        assert!(matches!(err, Err(AdapterError::InvalidArgument { .. })));
    }

    #[test]
    fn explicit_splits_on_first_equals_only() {
        let mut rs = RuleSet::default();
        rs.apply(&directive("explicit", &[], "A=B=C", false)).unwrap();
        assert_eq!(rs.explicit[0].from, "A");
        assert_eq!(rs.explicit[0].to, "B=C");
    }

    #[test]
    fn regex_rejects_malformed_pattern() {
        let mut rs = RuleSet::default();
        let err = rs.apply(&directive("regex", &[], "(unclosed=X", false));
        assert!(matches!(err, Err(AdapterError::InvalidArgument { .. })));
    }

    #[test]
    fn regex_json_replaces_list() {
        let mut rs = RuleSet::default();
        rs.apply(&directive(
            "regex",
            &[],
            r#"[{"pattern":"^Old","replace":"New"}]"#,
            true,
        ))
        .unwrap();
        assert_eq!(rs.regex.len(), 1);
        assert_eq!(rs.regex[0].pattern, "^Old");
    }

    #[test]
    fn ignores_splits_whitespace() {
        let mut rs = RuleSet::default();
        rs.apply(&directive("ignores", &[], "foo bar baz", false))
            .unwrap();
        assert_eq!(rs.ignore, vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn transform_before_and_after_write_structured_pair() {
        let mut rs = RuleSet::default();
        rs.apply(&directive("transform", &["before"], "Old", false))
            .unwrap();
        rs.apply(&directive("transform", &["after"], "New", false))
            .unwrap();
        assert_eq!(rs.transform.before, "Old");
        assert_eq!(rs.transform.after, "New");
    }

    #[test]
    fn legacy_transform_before_writes_same_field_as_structured_form() {
        let mut rs = RuleSet::default();
        rs.apply(&directive("transform_before", &[], "Old", false))
            .unwrap();
        assert_eq!(rs.transform.before, "Old");
    }

    #[test]
    fn unknown_subcommand_is_unrecognized() {
        let mut rs = RuleSet::default();
        let err = rs.apply(&directive("bogus", &[], "x", false));
        assert!(matches!(err, Err(AdapterError::UnrecognizedDirective { .. })));
    }

    #[test]
    fn mode_directive_requires_valid_value() {
        let mut rs = RuleSet::default();
        let err = rs.apply(&directive("prefix_mode", &[], "bogus", false));
        assert!(matches!(err, Err(AdapterError::InvalidArgument { .. })));
        rs.apply(&directive("prefix_mode", &[], "merge", false))
            .unwrap();
        assert_eq!(rs.prefix_mode, Some(Mode::Merge));
    }

    #[test]
    fn missing_argument_is_requires_argument_error() {
        let mut rs = RuleSet::default();
        let err = rs.apply(&directive("prefix", &[], "", false));
        assert!(matches!(err, Err(AdapterError::RequiresArgument { .. })));
    }
}
