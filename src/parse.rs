//! Tree builder: turns indented text into a [`Node`] tree.
//!
//! The builder is a recursive-descent scanner over cleaned lines. Each call
//! handles one block at an expected indentation and returns the node it built
//! together with the index of the first line it did not consume:
//!
//! - leading tabs expand to one indentation unit each
//! - `#` outside a quoted run starts a comment
//! - blank lines are skipped
//! - a line indented less than expected ends the block (soft termination)
//! - `- ` lines are sequence entries, `key: value` lines are mapping entries
//! - a block with both kinds of entries keeps only its mapping entries
//!
//! Scalars are stored as raw tokens; nothing is coerced here.
//!
//! ```rust
//! use yaml_records::{node, parse};
//!
//! let text = "cardTypes:\n\tfunds:\n\t\ttitle: Funds # wealth\n";
//! assert_eq!(
//!     parse(text).unwrap(),
//!     node!({ "cardTypes": { "funds": { "title": "Funds" } } })
//! );
//! ```

use crate::{Error, Node, NodeMap, Options, Result};

/// Parses text into a [`Node`] tree with default options.
///
/// An input made only of blank lines and comments yields an empty mapping.
/// A single line without a key separator yields a scalar (or an inline
/// sequence when it is wrapped in `[...]`).
///
/// # Errors
///
/// Returns [`Error::Structure`] for a tab that follows spaces in the leading
/// whitespace, and [`Error::DepthLimit`] when nesting exceeds the configured
/// limit.
pub fn parse(text: &str) -> Result<Node> {
    parse_with_options(text, &Options::default())
}

/// Parses text into a [`Node`] tree with custom options.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_with_options(text: &str, options: &Options) -> Result<Node> {
    let mut builder = TreeBuilder::new(text, options)?;

    if let Some(node) = builder.single_scalar() {
        return Ok(node);
    }

    let (node, consumed) = builder.block(0, 0, 0)?;
    log::trace!(
        "built {} from {} of {} lines",
        node.as_ref().map_or("empty document", Node::kind),
        consumed,
        builder.lines.len()
    );
    Ok(node.unwrap_or_else(|| Node::Mapping(NodeMap::new())))
}

struct TreeBuilder<'a> {
    /// Cleaned lines; `None` marks a blank or comment-only line.
    lines: Vec<Option<String>>,
    options: &'a Options,
}

impl<'a> TreeBuilder<'a> {
    fn new(text: &str, options: &'a Options) -> Result<Self> {
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, raw)| clean_line(raw, options.indent, i + 1))
            .collect::<Result<Vec<_>>>()?;
        Ok(TreeBuilder { lines, options })
    }

    fn single_scalar(&self) -> Option<Node> {
        let mut structural = self.lines.iter().flatten();
        let only = structural.next()?.trim();
        if structural.next().is_some()
            || only == "-"
            || only.starts_with("- ")
            || find_unquoted(only, ':').is_some()
        {
            return None;
        }
        Some(scalar_or_inline_list(only))
    }

    /// Builds one block starting at line `start`, expecting `indent` spaces.
    fn block(&mut self, start: usize, indent: usize, depth: usize) -> Result<(Option<Node>, usize)> {
        if depth > self.options.max_depth {
            return Err(Error::depth_limit(start + 1, self.options.max_depth));
        }

        let unit = self.options.indent;
        let mut seen = false;
        let mut mapping = NodeMap::new();
        let mut sequence = Vec::new();
        let mut i = start;

        while i < self.lines.len() {
            let Some(line) = &self.lines[i] else {
                i += 1;
                continue;
            };

            if leading_spaces(line) < indent {
                log::trace!("block at indent {} ends before line {}", indent, i + 1);
                break;
            }

            let body = &line[indent..];
            let is_entry = body == "-" || body.starts_with("- ");
            seen = true;

            if is_entry {
                let rest = body[1..].trim();
                if rest.is_empty() {
                    let (child, next) = self.block(i + 1, indent + unit, depth + 1)?;
                    sequence.push(child.unwrap_or_default());
                    i = next;
                } else if find_unquoted(rest, ':').is_none() {
                    sequence.push(Node::Scalar(rest.to_string()));
                    i += 1;
                } else {
                    // The first field shares the dash line: shift it right by
                    // one unit and re-read the line as the start of a mapping.
                    let rewritten = format!("{}{}", " ".repeat(indent + unit), &body[2..]);
                    self.lines[i] = Some(rewritten);
                    let (child, next) = self.block(i, indent + unit, depth + 1)?;
                    sequence.push(child.unwrap_or_default());
                    i = next;
                }
                continue;
            }

            let (key, rest) = match find_unquoted(body, ':') {
                Some(pos) => (body[..pos].trim(), body[pos + 1..].trim()),
                None => (body.trim(), ""),
            };
            let key = key.to_string();

            if rest.is_empty() {
                let (child, next) = self.block(i + 1, indent + unit, depth + 1)?;
                mapping.insert(key, child.unwrap_or_default());
                i = next;
            } else {
                let value = scalar_or_inline_list(rest);
                mapping.insert(key, value);
                i += 1;
            }
        }

        // A block holding both kinds of entries keeps its mapping entries.
        let node = if !mapping.is_empty() {
            if !sequence.is_empty() {
                log::trace!(
                    "block at indent {} ending before line {} drops {} sequence entries mixed with mapping entries",
                    indent,
                    i + 1,
                    sequence.len()
                );
            }
            Some(Node::Mapping(mapping))
        } else if seen {
            Some(Node::Sequence(sequence))
        } else {
            None
        };
        Ok((node, i))
    }
}

/// Normalizes one raw line: expands leading tabs, strips a trailing comment
/// and trailing whitespace. Blank results become `None`.
fn clean_line(raw: &str, unit: usize, line_number: usize) -> Result<Option<String>> {
    let tabs = raw.bytes().take_while(|b| *b == b'\t').count();
    let mut line = String::with_capacity(raw.len() + tabs * unit);
    line.push_str(&" ".repeat(tabs * unit));
    line.push_str(&raw[tabs..]);

    if let Some(pos) = find_unquoted(&line, '#') {
        line.truncate(pos);
    }
    line.truncate(line.trim_end().len());

    if line.is_empty() {
        return Ok(None);
    }

    let content = line.trim_start();
    if line[..line.len() - content.len()].contains('\t') {
        return Err(Error::structure(format!(
            "line {} mixes tabs and spaces in its indentation",
            line_number
        )));
    }
    Ok(Some(line))
}

/// Finds the first `target` that is not inside a quoted run.
///
/// A quote character opens a run only at the start of a token (at the start
/// of the line or after whitespace, `:`, `[` or `,`), so an apostrophe inside
/// a word is an ordinary character. A run is closed only by the quote that
/// opened it; inside a double-quoted run `\"` does not close it.
pub(crate) fn find_unquoted(line: &str, target: char) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev: Option<char> = None;
    for (i, ch) in line.char_indices() {
        match quote {
            Some(open) => {
                if escaped {
                    escaped = false;
                } else if open == '"' && ch == '\\' {
                    escaped = true;
                } else if ch == open {
                    quote = None;
                }
            }
            None if ch == target => return Some(i),
            None if (ch == '"' || ch == '\'') && opens_token(prev) => quote = Some(ch),
            None => {}
        }
        prev = Some(ch);
    }
    None
}

fn opens_token(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, ':' | '[' | ','),
    }
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Returns the inline sequence for `[a, b, c]`, or the raw token otherwise.
fn scalar_or_inline_list(rest: &str) -> Node {
    match rest.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        Some(inner) => Node::Sequence(split_inline(inner)),
        None => Node::Scalar(rest.to_string()),
    }
}

fn split_inline(mut inner: &str) -> Vec<Node> {
    let mut items = Vec::new();
    loop {
        let (item, next) = match find_unquoted(inner, ',') {
            Some(pos) => (&inner[..pos], Some(&inner[pos + 1..])),
            None => (inner, None),
        };
        let item = item.trim();
        if !item.is_empty() {
            items.push(Node::Scalar(item.to_string()));
        }
        match next {
            Some(remaining) => inner = remaining,
            None => break,
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node;

    #[test]
    fn test_clean_line_strips_comments_outside_quotes() {
        assert_eq!(
            clean_line("  funds: # wealth", 2, 1).unwrap(),
            Some("  funds:".to_string())
        );
        assert_eq!(
            clean_line(r#"content: "a # b" # c"#, 2, 1).unwrap(),
            Some(r#"content: "a # b""#.to_string())
        );
        assert_eq!(
            clean_line(r#"q: "x \" # y""#, 2, 1).unwrap(),
            Some(r#"q: "x \" # y""#.to_string())
        );
        assert_eq!(clean_line("   # only a comment", 2, 1).unwrap(), None);
        assert_eq!(clean_line(" \t ", 2, 1).unwrap(), None);
    }

    #[test]
    fn test_clean_line_expands_leading_tabs() {
        assert_eq!(
            clean_line("\t\ttitle: Funds", 2, 1).unwrap(),
            Some("    title: Funds".to_string())
        );
        assert_eq!(
            clean_line("\ttitle: Funds", 4, 1).unwrap(),
            Some("    title: Funds".to_string())
        );
    }

    #[test]
    fn test_clean_line_rejects_tab_after_spaces() {
        let err = clean_line("  \ttitle: Funds", 2, 7).unwrap_err();
        assert!(matches!(err, Error::Structure(msg) if msg.contains("line 7")));
    }

    #[test]
    fn test_find_unquoted() {
        assert_eq!(find_unquoted("a: b", ':'), Some(1));
        assert_eq!(find_unquoted(r#""a:b": c"#, ':'), Some(5));
        assert_eq!(find_unquoted("'a:b'", ':'), None);
        assert_eq!(find_unquoted("it's # x", '#'), Some(5));
        assert_eq!(find_unquoted("author's name: Bob", ':'), Some(13));
        assert_eq!(find_unquoted("say \"it's: x\"", ':'), None);
    }

    #[test]
    fn test_apostrophe_inside_key() {
        let tree = parse("author's name: Bob\nnext: 1").unwrap();
        assert_eq!(tree, node!({ "author's name": "Bob", "next": 1 }));

        let tree = parse("- it's: x\n  more: y\n- plain").unwrap();
        assert_eq!(tree, node!([{ "it's": "x", "more": "y" }, "plain"]));

        let tree = parse("title: it's late # comment").unwrap();
        assert_eq!(tree, node!({ "title": "it's late" }));
    }

    #[test]
    fn test_quoted_key_keeps_its_colon() {
        let tree = parse("\"a: b\": 2\n'c:d': 3").unwrap();
        assert_eq!(
            tree,
            Node::Mapping(
                vec![
                    ("\"a: b\"".to_string(), Node::scalar("2")),
                    ("'c:d'".to_string(), Node::scalar("3")),
                ]
                .into_iter()
                .collect()
            )
        );
    }

    #[test]
    fn test_mapping_and_nested_mapping() {
        let tree = parse("a: 1\nb:\n  c: 2\n  d: 3\ne: 4").unwrap();
        assert_eq!(tree, node!({ "a": 1, "b": { "c": 2, "d": 3 }, "e": 4 }));
    }

    #[test]
    fn test_sequence_of_mappings() {
        let text = "sockets:\n  - title: work\n    accepts: [reason, health]\n  - title: rest\n";
        let tree = parse(text).unwrap();
        assert_eq!(
            tree,
            node!({
                "sockets": [
                    { "title": "work", "accepts": ["reason", "health"] },
                    { "title": "rest" }
                ]
            })
        );
    }

    #[test]
    fn test_key_without_block_is_absent() {
        let tree = parse("property1: 60\nproperty2:").unwrap();
        assert_eq!(tree, node!({ "property1": 60, "property2": null }));
    }

    #[test]
    fn test_soft_termination_keeps_earlier_entries() {
        // Over-indented lines still belong to the block; only a dedent ends it.
        let tree = parse("outer:\n    inner: 1\n  stray: 2\nnext: 3").unwrap();
        assert_eq!(
            tree,
            node!({ "outer": { "inner": 1, "stray": 2 }, "next": 3 })
        );
    }

    #[test]
    fn test_dedent_truncates_sequence_silently() {
        let tree = parse("items:\n  - a\n - b\n  - c").unwrap();
        let mut expected = NodeMap::new();
        expected.insert("items".to_string(), node!(["a"]));
        expected.insert("- b".to_string(), node!(["c"]));
        assert_eq!(tree, Node::Mapping(expected));
    }

    #[test]
    fn test_bare_dash_starts_nested_block() {
        let tree = parse("-\n  - 1\n  - 2\n-\n- x").unwrap();
        assert_eq!(tree, node!([[1, 2], null, "x"]));
    }

    #[test]
    fn test_inline_list_respects_quotes() {
        let tree = parse(r#"items: [a, "b, c", , d]"#).unwrap();
        assert_eq!(
            tree,
            Node::Mapping(
                vec![(
                    "items".to_string(),
                    Node::Sequence(vec![
                        Node::scalar("a"),
                        Node::scalar("\"b, c\""),
                        Node::scalar("d"),
                    ])
                )]
                .into_iter()
                .collect()
            )
        );
    }

    #[test]
    fn test_repeated_key_last_wins() {
        let tree = parse("a: 1\nb: 2\na: 3").unwrap();
        assert_eq!(tree, node!({ "a": 3, "b": 2 }));
    }

    #[test]
    fn test_blank_document_is_empty_mapping() {
        assert_eq!(parse("\n# nothing\n   \n").unwrap(), Node::Mapping(NodeMap::new()));
    }

    #[test]
    fn test_single_scalar_document() {
        assert_eq!(parse("42").unwrap(), Node::scalar("42"));
        assert_eq!(parse("[1, 2]").unwrap(), node!([1, 2]));
    }

    #[test]
    fn test_mixed_block_keeps_mapping_entries() {
        assert_eq!(parse("a: 1\n- b").unwrap(), node!({ "a": 1 }));
        assert_eq!(parse("- b\na: 1\n- c").unwrap(), node!({ "a": 1 }));
    }

    #[test]
    fn test_unindented_entries_under_key_are_dropped() {
        let tree = parse("items:\n- a\n- b").unwrap();
        assert_eq!(tree, node!({ "items": null }));
    }

    #[test]
    fn test_depth_limit() {
        let options = Options::new().with_max_depth(2);
        let err = parse_with_options("a:\n  b:\n    c:\n      d: 1", &options).unwrap_err();
        assert!(matches!(err, Error::DepthLimit { limit: 2, .. }));
    }
}
