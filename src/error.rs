use std::fmt;
use std::path::PathBuf;

use crate::directive::Directive;

/// The single structured error type produced by every core entry point.
///
/// Each variant's `Display` begins with a fixed message prefix (documented
/// next to the variant) so callers can filter on prefix without matching on
/// the enum shape directly.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// `unrecognized directive`
    #[error("unrecognized directive '{command}' at line {line}")]
    UnrecognizedDirective { line: u64, command: String },

    /// `requires an argument`
    #[error("directive '{command}' requires an argument (line {line})")]
    RequiresArgument { line: u64, command: String },

    /// `invalid <field> argument`
    #[error("invalid {field} argument '{argument}' at line {line}: {reason}")]
    InvalidArgument {
        line: u64,
        field: String,
        argument: String,
        reason: String,
    },

    /// `invalid JSON`
    #[error("invalid JSON for '{command}' at line {line}: {reason}")]
    InvalidJson {
        line: u64,
        command: String,
        reason: String,
    },

    /// `<Kind> cannot contain a <Kind>`
    #[error("{parent} cannot contain a {child}")]
    ForbiddenChild { parent: String, child: String },

    /// `unclosed 'context' block(s)`
    #[error("unclosed 'context' block(s): {count} still open at end of input")]
    UnclosedContext { count: usize },

    /// `'done' without matching 'context'`
    #[error("'done' without matching 'context' at line {line}")]
    DoneWithoutContext { line: u64 },

    /// `consecutive 'context'`
    #[error("consecutive 'context' directives at line {line}")]
    ConsecutiveContext { line: u64 },

    #[error("malformed declarative config at {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("explicit config path does not exist: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("unrecognized declarative config extension: {path}")]
    UnknownConfigFormat { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AdapterError>;

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.command)
    }
}
