//! Example: List the differences between two XML documents
//!
//! Prints one line per differing node with its handle and the text it
//! covers in either document.
//!
//! Usage: cargo run --example diff <first.xml> <second.xml>

use std::env;

use xdiffer::{parse_file, split_by_range, DiffNodeKind, DiffTree, DiffTreeKind};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <first.xml> <second.xml>", args[0]);
        std::process::exit(1);
    }

    eprintln!("Parsing first: {}", args[1]);
    let (text1, tree1) = parse_file(&args[1])?;

    eprintln!("Parsing second: {}", args[2]);
    let (text2, tree2) = parse_file(&args[2])?;

    let tree = DiffTree::from_trees(&tree1, &tree2);
    match tree.kind() {
        DiffTreeKind::Same => println!("Documents are the same."),
        DiffTreeKind::TotalDiff => println!("Root elements differ."),
        DiffTreeKind::PartialDiff => {
            for (handle, node) in tree.walk() {
                let (label, text) = match node.kind() {
                    DiffNodeKind::DeletedNode => ("deleted", split_by_range(&text1, node.range1())?),
                    DiffNodeKind::AddedNode => ("added", split_by_range(&text2, node.range2())?),
                    DiffNodeKind::UpdatedNode => ("updated", split_by_range(&text2, node.range2())?),
                    _ => continue,
                };
                println!("{:8} {:12} {} {}", label, handle.to_string(), node.name(), text.middle());
            }
            eprintln!("{} difference(s)", tree.diff_count());
        }
    }

    Ok(())
}
