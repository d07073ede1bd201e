//! The hierarchical scope machine (spec.md §4.3): turns a flat directive
//! stream into a [`RootData`] tree.
//!
//! Contexts live in a flat arena (`Vec<Context>`) addressed by index rather
//! than back-pointers, per spec.md §9's design notes -- a `Context` never
//! borrows another `Context`, so the whole tree can be walked and mutated
//! with plain indices instead of `Rc<RefCell<_>>`.
//!
//! Dispatch recurses from the root down through whichever chain of active
//! children is currently open, stopping at the first level whose own
//! opener vocabulary recognizes the directive's base command (this is how
//! `type:method DoX` ends up opening a Method under the active Type instead
//! of being mistaken for a second Type at the Root). `context`/`done`
//! always act on the *deepest* active context, regardless of vocabulary.

use crate::container::{Container, ContainerKind, RootData};
use crate::directive::Directive;
use crate::error::{AdapterError, Result};

struct Context {
    container: Container,
    parent: Option<usize>,
    active_child: Option<usize>,
    /// Set by a preceding `context` directive; consumed by the next child
    /// this context opens (that child is born with `explicit = true`).
    pending_explicit: bool,
    /// Whether `done` (rather than an ordinary scope transition) is
    /// required to close this context.
    explicit: bool,
}

impl Context {
    fn new(container: Container, parent: Option<usize>, explicit: bool) -> Self {
        Self {
            container,
            parent,
            active_child: None,
            pending_explicit: false,
            explicit,
        }
    }
}

/// Parses a directive stream into a [`RootData`] tree.
pub struct Parser {
    arena: Vec<Context>,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            arena: vec![Context::new(Container::new(ContainerKind::Root), None, false)],
        }
    }

    /// Parse a full directive stream, returning the assembled [`RootData`]
    /// plus any per-directive errors (scanning continues past a directive
    /// error the same way the lexer continues past a lexical one, spec.md
    /// §4.7). The returned `RootData` reflects every directive that *did*
    /// apply cleanly.
    pub fn parse(directives: &[Directive]) -> (RootData, Vec<AdapterError>) {
        let mut parser = Parser::new();
        let mut errors = Vec::new();

        for directive in directives {
            if let Err(err) = parser.dispatch(0, directive) {
                errors.push(err);
            }
        }

        match parser.finish() {
            Ok(root) => (root, errors),
            Err(err) => {
                errors.push(err);
                (RootData::default(), errors)
            }
        }
    }

    fn deepest_active(&self, mut idx: usize) -> usize {
        while let Some(child) = self.arena[idx].active_child {
            idx = child;
        }
        idx
    }

    fn dispatch(&mut self, idx: usize, directive: &Directive) -> Result<()> {
        match directive.base.as_str() {
            "context" => return self.handle_context(idx, directive),
            "done" => return self.handle_done(idx, directive),
            _ => {}
        }

        let kind = self.arena[idx].container.kind();
        if let Some(child_kind) = kind.opener_kind_for(&directive.base) {
            let child_idx = self.open_or_reuse(idx, child_kind, directive)?;
            if directive.has_sub() {
                return self.dispatch(child_idx, &directive.sub());
            }
            return Ok(());
        }

        if let Some(child_idx) = self.arena[idx].active_child {
            return self.dispatch(child_idx, directive);
        }

        self.arena[idx].container.parse_directive(directive)
    }

    fn handle_context(&mut self, idx: usize, directive: &Directive) -> Result<()> {
        let leaf = self.deepest_active(idx);
        let ctx = &mut self.arena[leaf];
        if ctx.pending_explicit && ctx.active_child.is_none() {
            return Err(AdapterError::ConsecutiveContext {
                line: directive.line,
            });
        }
        ctx.pending_explicit = true;
        Ok(())
    }

    fn handle_done(&mut self, idx: usize, directive: &Directive) -> Result<()> {
        let leaf = self.deepest_active(idx);
        if !self.arena[leaf].explicit {
            return Err(AdapterError::DoneWithoutContext {
                line: directive.line,
            });
        }
        self.close_context(leaf)
    }

    /// Opens a new child of `kind` under `parent`, or reuses `parent`'s
    /// current active child when it's the same kind and the directive is a
    /// modifier on it (has sub-commands). Otherwise the active child is
    /// implicitly closed (cascading through any of its own open
    /// descendants first) before the new one opens.
    fn open_or_reuse(
        &mut self,
        parent: usize,
        kind: ContainerKind,
        directive: &Directive,
    ) -> Result<usize> {
        if let Some(active) = self.arena[parent].active_child {
            if self.arena[active].container.kind() == kind && directive.has_sub() {
                return Ok(active);
            }
            self.close_context(active)?;
        }

        let explicit = self.arena[parent].pending_explicit;
        self.arena[parent].pending_explicit = false;

        let mut container = Container::new(kind);
        container.bind_opening_argument(&directive.argument);

        let new_idx = self.arena.len();
        self.arena.push(Context::new(container, Some(parent), explicit));
        self.arena[parent].active_child = Some(new_idx);
        Ok(new_idx)
    }

    /// Finalizes `idx` (cascading through its own active child first, if
    /// any) and attaches it to its parent, clearing the parent's
    /// active-child pointer.
    fn close_context(&mut self, idx: usize) -> Result<()> {
        if let Some(child) = self.arena[idx].active_child {
            self.close_context(child)?;
        }

        let ctx = &mut self.arena[idx];
        let container = std::mem::replace(&mut ctx.container, Container::new(ContainerKind::Root));
        let parent = ctx.parent;

        if let Some(parent_idx) = parent {
            self.arena[parent_idx].container.add_child(container)?;
            self.arena[parent_idx].active_child = None;
        }
        Ok(())
    }

    /// Cascades a final close from the deepest still-open context up to the
    /// root, returning the assembled [`RootData`]. Fails with
    /// [`AdapterError::UnclosedContext`] if any still-open context requires
    /// an explicit `done` (spec.md §4.7).
    fn finish(mut self) -> Result<RootData> {
        // Closed contexts stay in the arena as orphaned entries (their slot
        // is reused as a dummy placeholder, not removed), so only the chain
        // still reachable from the root via `active_child` is "open".
        let mut explicit_open = 0;
        let mut idx = 0;
        while let Some(child) = self.arena[idx].active_child {
            if self.arena[child].explicit {
                explicit_open += 1;
            }
            idx = child;
        }
        if explicit_open > 0 {
            return Err(AdapterError::UnclosedContext {
                count: explicit_open,
            });
        }

        let leaf = self.deepest_active(0);
        if leaf != 0 {
            self.close_context(leaf)?;
        }

        match std::mem::replace(&mut self.arena[0].container, Container::new(ContainerKind::Root)) {
            Container::Root(root) => Ok(root),
            _ => unreachable!("arena[0] is always the Root container"),
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::lex;

    fn parse_ok(text: &str) -> RootData {
        let lines: Vec<(u64, &str)> = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i as u64 + 1, l))
            .collect();
        let (directives, lex_errors) = lex(lines);
        assert!(lex_errors.is_empty(), "lex errors: {lex_errors:?}");
        let (root, errors) = Parser::parse(&directives);
        assert!(errors.is_empty(), "parse errors: {errors:?}");
        root
    }

    #[test]
    fn minimal_type_rename() {
        let root = parse_ok(
            "// go:adapter:type MyStruct\n// go:adapter:type:rename NewStruct\n",
        );
        assert_eq!(root.categories.types.len(), 1);
        let t = &root.categories.types[0];
        assert_eq!(t.name, "MyStruct");
        assert_eq!(t.ruleset.explicit[0].from, "MyStruct");
        assert_eq!(t.ruleset.explicit[0].to, "NewStruct");
    }

    #[test]
    fn wildcard_then_two_specific_types() {
        let root = parse_ok(
            "// go:adapter:type *\n\
             // go:adapter:type:struct wrap\n\
             // go:adapter:type ext.A\n\
             // go:adapter:type ext.B\n\
             // go:adapter:type:struct copy\n",
        );
        assert_eq!(root.categories.types.len(), 3);
        assert_eq!(root.categories.types[0].name, "*");
        assert_eq!(
            root.categories.types[0].pattern,
            Some(crate::container::TypePattern::Wrap)
        );
        assert_eq!(root.categories.types[1].name, "ext.A");
        assert_eq!(root.categories.types[1].pattern, None);
        assert_eq!(root.categories.types[2].name, "ext.B");
        assert_eq!(
            root.categories.types[2].pattern,
            Some(crate::container::TypePattern::Copy)
        );
    }

    #[test]
    fn explicit_context_unwinds_to_root_for_type() {
        let root = parse_ok(
            "// go:adapter:context\n\
             // go:adapter:package p/v3 ctx3\n\
             // go:adapter:done\n\
             // go:adapter:type ctx3.T\n\
             // go:adapter:type:method DoX\n",
        );
        assert_eq!(root.packages.len(), 1);
        assert_eq!(root.packages[0].import, "p/v3");
        assert_eq!(root.packages[0].alias.as_deref(), Some("ctx3"));
        assert!(root.packages[0].categories.types.is_empty());
        assert_eq!(root.categories.types.len(), 1);
        assert_eq!(root.categories.types[0].name, "ctx3.T");
        assert_eq!(root.categories.types[0].methods.len(), 1);
        assert_eq!(root.categories.types[0].methods[0].name, "DoX");
    }

    #[test]
    fn done_without_context_is_an_error() {
        let (directives, _) = lex([(1, "go:adapter:done")]);
        let (_, errors) = Parser::parse(&directives);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], AdapterError::DoneWithoutContext { .. }));
    }

    #[test]
    fn consecutive_context_is_an_error() {
        let (directives, _) = lex([(1, "go:adapter:context"), (2, "go:adapter:context")]);
        let (_, errors) = Parser::parse(&directives);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], AdapterError::ConsecutiveContext { .. }));
    }

    #[test]
    fn unclosed_explicit_context_at_eof_is_an_error() {
        let (directives, _) = lex([
            (1, "go:adapter:context"),
            (2, "go:adapter:package p/v3"),
        ]);
        let (_, errors) = Parser::parse(&directives);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], AdapterError::UnclosedContext { count: 1 }));
    }

    #[test]
    fn implicit_scope_cascades_close_on_eof_without_error() {
        let root = parse_ok("// go:adapter:type Foo\n// go:adapter:prefix X\n");
        assert_eq!(root.categories.types.len(), 1);
        assert_eq!(root.categories.types[0].ruleset.prefix, "X");
    }

    #[test]
    fn global_property_and_ignore() {
        let root = parse_ok(
            "// go:adapter:property module github.com/x\n// go:adapter:ignore internal.Foo\n",
        );
        assert_eq!(
            root.properties[0],
            ("module".to_string(), "github.com/x".to_string())
        );
        assert_eq!(root.ignore, vec!["internal.Foo".to_string()]);
    }

    #[test]
    fn different_kind_implicitly_closes_previous_sibling() {
        let root = parse_ok(
            "// go:adapter:type Foo\n// go:adapter:function Bar\n",
        );
        assert_eq!(root.categories.types.len(), 1);
        assert_eq!(root.categories.functions.len(), 1);
        assert_eq!(root.categories.types[0].name, "Foo");
        assert_eq!(root.categories.functions[0].name, "Bar");
    }
}
