//! A minimal, delimiter-agnostic comment-line scanner used by the CLI's
//! `compile`/`check` subcommands for demo and debugging purposes.
//!
//! This is deliberately not a real source-AST parser: it treats any line
//! whose trimmed content starts with `//`, `#`, or `--` as a candidate
//! comment and hands the text after the marker to the directive lexer.
//! A production adapter-generation tool would extract comments from an
//! actual AST per source language; that's out of scope here (`SPEC_FULL.md`
//! PURPOSE & SCOPE).

const MARKERS: &[&str] = &["//", "#", "--"];

/// Extracts `(line, comment body)` pairs from `contents`, one-indexed.
pub fn scan(contents: &str) -> Vec<(u64, String)> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let trimmed = line.trim_start();
            MARKERS
                .iter()
                .find_map(|m| trimmed.strip_prefix(m))
                .map(|body| (i as u64 + 1, body.trim_start().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_slash_slash_hash_and_dash_dash() {
        let src = "// go:adapter:type Foo\n# go:adapter:type Bar\n-- go:adapter:type Baz\nplain();\n";
        let found = scan(src);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].1, "go:adapter:type Foo");
        assert_eq!(found[1].1, "go:adapter:type Bar");
        assert_eq!(found[2].1, "go:adapter:type Baz");
    }

    #[test]
    fn ignores_non_comment_lines() {
        let found = scan("let x = 1;\nfn main() {}\n");
        assert!(found.is_empty());
    }

    #[test]
    fn line_numbers_are_one_indexed() {
        let found = scan("\n\n// go:adapter:type Foo\n");
        assert_eq!(found[0].0, 3);
    }
}
