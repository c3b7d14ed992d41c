//! Text rendering of diff trees.

use std::io::{self, Write};

use xdiffer::{DiffNode, DiffNodeHandle, DiffNodeKind, DiffTree, DiffTreeKind};

use crate::config::CliConfig;

/// Longest snippet of an updated value shown on one line.
const SNIPPET_LEN: usize = 40;

/// Writes a diff tree, one node per line.
///
/// ```text
///   <Customer> /0
///     - <Bio> /0/0/5
///     ~ TEXT /0/0/2/0 "George" -> "Fred"
/// ```
pub fn write_tree(
    out: &mut dyn Write,
    tree: &DiffTree,
    text1: &str,
    text2: &str,
    config: &CliConfig,
) -> io::Result<()> {
    match tree.kind() {
        DiffTreeKind::Same => writeln!(out, "Documents are the same."),
        DiffTreeKind::TotalDiff => {
            writeln!(out, "Root elements differ, documents are totally different.")
        }
        DiffTreeKind::PartialDiff => {
            if let Some(root) = tree.root() {
                write_node(out, root, &DiffNodeHandle::root(), 0, text1, text2, config)?;
            }
            writeln!(out, "{} difference(s).", tree.diff_count())
        }
    }
}

fn write_node(
    out: &mut dyn Write,
    node: &DiffNode,
    handle: &DiffNodeHandle,
    depth: usize,
    text1: &str,
    text2: &str,
    config: &CliConfig,
) -> io::Result<()> {
    if !config.show_unchanged && !node.has_diff() {
        return Ok(());
    }

    let marker = match node.kind() {
        DiffNodeKind::NoDiff => ' ',
        DiffNodeKind::DeletedNode | DiffNodeKind::DeletedSubNode => '-',
        DiffNodeKind::AddedNode | DiffNodeKind::AddedSubNode => '+',
        DiffNodeKind::UpdatedNode => '~',
    };
    write!(
        out,
        "{:indent$}{} {} {}",
        "",
        marker,
        node.name(),
        handle,
        indent = depth * config.indent
    )?;
    if node.kind() == DiffNodeKind::UpdatedNode {
        let old = node.range1().and_then(|r| text1.get(r.start..r.end)).unwrap_or("");
        let new = node.range2().and_then(|r| text2.get(r.start..r.end)).unwrap_or("");
        write!(out, " {:?} -> {:?}", snippet(old), snippet(new))?;
    }
    writeln!(out)?;

    // Whole added or deleted subtrees are summarised by their top node
    if matches!(
        node.kind(),
        DiffNodeKind::DeletedNode | DiffNodeKind::AddedNode
    ) {
        return Ok(());
    }
    for (index, child) in node.children().iter().enumerate() {
        write_node(
            out,
            child,
            &handle.child(index),
            depth + 1,
            text1,
            text2,
            config,
        )?;
    }
    Ok(())
}

fn snippet(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= SNIPPET_LEN {
        collapsed
    } else {
        let cut: String = collapsed.chars().take(SNIPPET_LEN).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdiffer::build_diff_tree;

    fn render(xml1: &str, xml2: &str, config: &CliConfig) -> String {
        let tree = build_diff_tree(xml1, xml2).unwrap();
        let mut out = Vec::new();
        write_tree(&mut out, &tree, xml1, xml2, config).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_same() {
        let out = render("<a/>", "<a/>", &CliConfig::default());
        assert_eq!(out, "Documents are the same.\n");
    }

    #[test]
    fn test_total_diff() {
        let out = render("<a/>", "<b/>", &CliConfig::default());
        assert!(out.starts_with("Root elements differ"));
    }

    #[test]
    fn test_changed_nodes_only() {
        let xml1 = "<a><b>x</b><c/><d><e/></d></a>";
        let xml2 = "<a><b>y</b><c/></a>";
        let out = render(xml1, xml2, &CliConfig::default());
        assert_eq!(
            out,
            "  <a> /\n    <b> /0\n    ~ TEXT /0/0 \"x\" -> \"y\"\n  - <d> /2\n2 difference(s).\n"
        );
    }

    #[test]
    fn test_show_unchanged() {
        let config = CliConfig {
            show_unchanged: true,
            indent: 1,
            ..CliConfig::default()
        };
        let out = render("<a><b/><c>1</c></a>", "<a><b/><c>2</c></a>", &config);
        assert!(out.contains("\n   <b> /0\n"));
    }

    #[test]
    fn test_snippet() {
        assert_eq!(snippet("  a \n b "), "a b");
        let long = "x".repeat(50);
        assert_eq!(snippet(&long), format!("{}...", "x".repeat(SNIPPET_LEN)));
    }
}
