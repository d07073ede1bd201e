//! The directive lexer: turns raw comment bodies into [`Directive`] records.
//!
//! Recognition, splitting, and the `:json` suffix rule are described in
//! spec.md §4.1. This module has no I/O of its own -- it consumes whatever
//! `(line, text)` pairs the caller already extracted from source comments.

/// Fixed prefix that marks a comment as carrying a directive.
pub const DIRECTIVE_PREFIX: &str = "go:adapter:";

/// An immutable record produced by the lexer for a single recognized
/// directive comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub line: u64,
    /// Full command string, without any `:json` suffix.
    pub command: String,
    pub argument: String,
    /// First colon-separated segment of `command`.
    pub base: String,
    /// Remaining colon-separated segments of `command`, in order.
    pub subs: Vec<String>,
    /// True iff the original command ended with `:json` and no sub-commands
    /// follow -- i.e. the suffix attaches to the *last* segment.
    pub json: bool,
}

impl Directive {
    /// Whether this directive carries at least one sub-command.
    pub fn has_sub(&self) -> bool {
        !self.subs.is_empty()
    }

    /// A new directive whose `base` becomes this directive's first
    /// sub-command, with the remaining sub-commands shifted down. Used by
    /// containers to delegate one level deeper (e.g. Root forwarding
    /// `package:alias` to the Package container as `alias`).
    pub fn sub(&self) -> Directive {
        let mut subs = self.subs.clone();
        let base = if subs.is_empty() {
            self.base.clone()
        } else {
            subs.remove(0)
        };
        let mut command_parts = vec![base.clone()];
        command_parts.extend(subs.iter().cloned());
        Directive {
            line: self.line,
            command: command_parts.join(":"),
            argument: self.argument.clone(),
            base,
            subs,
            json: self.json,
        }
    }

    /// True iff the JSON flag is set and no sub-commands follow -- the only
    /// configuration in which `:json` is meaningful (spec.md §3).
    pub fn should_unmarshal(&self) -> bool {
        self.json && self.subs.is_empty()
    }
}

/// Scan a stream of `(line, comment body)` pairs and extract every directive.
///
/// Comments that don't begin with [`DIRECTIVE_PREFIX`] are silently
/// discarded (spec.md §4.1). Lexical errors (malformed `:json` placement)
/// are collected per-directive rather than aborting the scan; scanning
/// continues after an error (spec.md §4.7).
pub fn lex<'a, I>(comments: I) -> (Vec<Directive>, Vec<crate::error::AdapterError>)
where
    I: IntoIterator<Item = (u64, &'a str)>,
{
    let mut directives = Vec::new();
    let mut errors = Vec::new();

    for (line, text) in comments {
        let Some(rest) = text.trim_start().strip_prefix(DIRECTIVE_PREFIX) else {
            continue;
        };

        match lex_one(line, rest) {
            Ok(directive) => directives.push(directive),
            Err(err) => errors.push(err),
        }
    }

    (directives, errors)
}

fn lex_one(line: u64, rest: &str) -> Result<Directive, crate::error::AdapterError> {
    let rest = rest.trim_start();
    let (raw_command, raw_argument) = match rest.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim_start()),
        None => (rest, ""),
    };

    // Trim a trailing inline `//` comment and its tail from the argument.
    let argument = match raw_argument.find("//") {
        Some(idx) => raw_argument[..idx].trim_end(),
        None => raw_argument.trim_end(),
    };

    let (command, json) = strip_json_suffix(line, raw_command)?;

    let mut segments = command.split(':').map(str::to_string);
    let base = segments.next().unwrap_or_default();
    let subs: Vec<String> = segments.collect();

    Ok(Directive {
        line,
        command,
        argument: argument.to_string(),
        base,
        subs,
        json,
    })
}

/// Strips a trailing `:json` suffix from `command`, validating that it only
/// ever appears once and at the very end (a `:json:` in the middle, or more
/// than one, is a lexical error).
fn strip_json_suffix(
    line: u64,
    command: &str,
) -> Result<(String, bool), crate::error::AdapterError> {
    const SUFFIX: &str = ":json";

    if let Some(stripped) = command.strip_suffix(SUFFIX) {
        if stripped.contains(SUFFIX) {
            return Err(crate::error::AdapterError::InvalidArgument {
                line,
                field: "command".to_string(),
                argument: command.to_string(),
                reason: "':json' suffix may only appear once, at the end".to_string(),
            });
        }
        if stripped.is_empty() {
            return Err(crate::error::AdapterError::InvalidArgument {
                line,
                field: "command".to_string(),
                argument: command.to_string(),
                reason: "':json' suffix requires a preceding command".to_string(),
            });
        }
        Ok((stripped.to_string(), true))
    } else if command.contains(SUFFIX) {
        Err(crate::error::AdapterError::InvalidArgument {
            line,
            field: "command".to_string(),
            argument: command.to_string(),
            reason: "':json' suffix is only valid at the end of a command".to_string(),
        })
    } else {
        Ok((command.to_string(), false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(text: &str) -> Directive {
        let (directives, errors) = lex([(1, text)]);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(directives.len(), 1, "expected exactly one directive");
        directives.into_iter().next().unwrap()
    }

    #[test]
    fn non_matching_comment_is_discarded() {
        let (directives, errors) = lex([(1, "just a comment")]);
        assert!(directives.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn splits_base_and_subs() {
        let d = one("go:adapter:type:method DoX");
        assert_eq!(d.base, "type");
        assert_eq!(d.subs, vec!["method".to_string()]);
        assert_eq!(d.argument, "DoX");
        assert!(!d.json);
    }

    #[test]
    fn simple_scope_opener_has_no_subs() {
        let d = one("go:adapter:type MyStruct");
        assert_eq!(d.base, "type");
        assert!(d.subs.is_empty());
        assert_eq!(d.argument, "MyStruct");
        assert!(!d.has_sub());
    }

    #[test]
    fn trailing_inline_comment_is_trimmed_from_argument() {
        let d = one("go:adapter:explicit A=B // keep this name");
        assert_eq!(d.argument, "A=B");
    }

    #[test]
    fn json_suffix_sets_flag_and_is_stripped() {
        let d = one(r#"go:adapter:strategy:json ["snake_case"]"#);
        assert_eq!(d.command, "strategy");
        assert!(d.json);
        assert!(d.should_unmarshal());
    }

    #[test]
    fn json_suffix_with_subs_after_is_not_should_unmarshal() {
        // `:json` only means "unmarshal" when no sub-commands follow.
        let d = Directive {
            line: 1,
            command: "foo".to_string(),
            argument: String::new(),
            base: "foo".to_string(),
            subs: vec!["bar".to_string()],
            json: true,
        };
        assert!(!d.should_unmarshal());
    }

    #[test]
    fn sub_shifts_base_down_one_level() {
        let d = one("go:adapter:type:method:disabled true");
        let child = d.sub();
        assert_eq!(child.base, "method");
        assert_eq!(child.subs, vec!["disabled".to_string()]);
        let grandchild = child.sub();
        assert_eq!(grandchild.base, "disabled");
        assert!(grandchild.subs.is_empty());
    }

    #[test]
    fn malformed_json_suffix_position_is_a_lexical_error() {
        let (directives, errors) = lex([(7, "go:adapter:type:json:method X")]);
        assert!(directives.is_empty());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn scanning_continues_after_a_lexical_error() {
        let (directives, errors) = lex([
            (1, "go:adapter:type:json:method X"),
            (2, "go:adapter:type Good"),
        ]);
        assert_eq!(errors.len(), 1);
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].argument, "Good");
    }
}
