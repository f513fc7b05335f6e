//! AST-based endpoint detection for each supported language.
//!
//! Each language module walks the tree-sitter AST directly to find route
//! declarations. Every framework idiom is detected independently and the
//! results are concatenated in source order.

pub mod java;
pub mod javascript;
pub mod python;

use tree_sitter::{Language as Grammar, Node, Parser as TsParser, Tree};

use crate::error::{FinderError, Result};

/// Parse `content` with `grammar`, rejecting trees that contain errors.
pub(crate) fn parse_tree(
    grammar: &Grammar,
    language: &'static str,
    content: &str,
    path: &str,
) -> Result<Tree> {
    let mut parser = TsParser::new();
    parser
        .set_language(grammar)
        .map_err(|e| FinderError::Grammar {
            language,
            message: e.to_string(),
        })?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| FinderError::Syntax {
            path: path.to_string(),
            language,
        })?;

    if tree.root_node().has_error() {
        return Err(FinderError::Syntax {
            path: path.to_string(),
            language,
        });
    }
    Ok(tree)
}

/// Source text of a node (empty on invalid UTF-8 boundaries).
pub(crate) fn node_text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// 1-indexed line a node starts on.
pub(crate) fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

/// Named children of a node, collected so callers can iterate freely.
pub(crate) fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Strip comment markers from a `//`, `/* */` or `/** */` comment and
/// return the remaining text, one line per source line.
pub(crate) fn clean_comment(raw: &str) -> String {
    let raw = raw.trim();
    let body = if let Some(inner) = raw.strip_prefix("/*") {
        let inner = inner.strip_suffix("*/").unwrap_or(inner);
        inner.strip_prefix('*').unwrap_or(inner)
    } else {
        raw.strip_prefix("//").unwrap_or(raw)
    };

    body.lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').map(str::trim_start).unwrap_or(line)
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
