//! xdiffer - structural XML comparison from the command line.

mod config;
mod render;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::rc::Rc;

use clap::{Parser, Subcommand};
use xdiffer::{build_diff_tree, DiffTree, DisplayMode, UiState, DEMO_XML_1, DEMO_XML_2};

use config::CliConfig;

/// Structural XML comparison tool
#[derive(Parser)]
#[command(name = "xdiffer")]
#[command(version)]
#[command(about = "Compare XML documents structurally and merge their differences", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the differences between two documents as a tree
    #[command(visible_alias = "t")]
    Tree {
        /// First (original) file
        xml1: String,
        /// Second (modified) file
        xml2: String,
        /// Also print nodes without differences
        #[arg(short = 'a', long)]
        all: bool,
    },

    /// Apply every difference of the second document to the first
    #[command(visible_alias = "a")]
    Apply {
        /// First (original) file
        xml1: String,
        /// Second (modified) file
        xml2: String,
        /// Output file (default: stdout)
        output: Option<String>,
    },

    /// Compare the built-in demo documents
    Demo,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let (config, source) = CliConfig::load();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();
    source.log();

    let result = match cli.command {
        Commands::Tree { xml1, xml2, all } => {
            let config = CliConfig {
                show_unchanged: config.show_unchanged || all,
                ..config
            };
            run_tree(&xml1, &xml2, &config)
        }
        Commands::Apply { xml1, xml2, output } => run_apply(&xml1, &xml2, output.as_deref()),
        Commands::Demo => run_demo(&config),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

/// Reads both documents and compares them.
fn compare(
    xml1_path: &str,
    xml2_path: &str,
) -> Result<(String, String, DiffTree), Box<dyn std::error::Error>> {
    log::info!("Reading {}", xml1_path);
    let text1 = fs::read_to_string(xml1_path)?;
    log::info!("Reading {}", xml2_path);
    let text2 = fs::read_to_string(xml2_path)?;

    let tree = build_diff_tree(&text1, &text2)?;
    log::info!(
        "Comparison finished: {:?} with {} difference(s)",
        tree.kind(),
        tree.diff_count()
    );
    Ok((text1, text2, tree))
}

/// Prints the diff tree of two files.
fn run_tree(
    xml1_path: &str,
    xml2_path: &str,
    config: &CliConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let (text1, text2, tree) = compare(xml1_path, xml2_path)?;
    let mut out = io::stdout().lock();
    render::write_tree(&mut out, &tree, &text1, &text2, config)?;
    Ok(())
}

/// Accepts every change and writes the merged first document.
fn run_apply(
    xml1_path: &str,
    xml2_path: &str,
    output_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (text1, text2, tree) = compare(xml1_path, xml2_path)?;

    let state = UiState::new();
    for (handle, change) in tree.changes() {
        state.applied_edits().insert(handle.to_string(), change);
    }
    log::info!("Applying {} change(s)", state.applied_edits().len());
    let merged = state.applied_edits().apply(&text1, &text2)?;

    // Get output writer
    let mut output: Box<dyn Write> = match output_path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    output.write_all(merged.as_bytes())?;
    output.flush()?;
    Ok(())
}

/// Walks through the demo documents the way a comparison view would: show
/// the tree, select each difference, accept it and preview the result.
fn run_demo(config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let tree = build_diff_tree(DEMO_XML_1, DEMO_XML_2)?;
    let mut out = io::stdout().lock();

    writeln!(out, "[{:?}]", DisplayMode::Compare)?;
    render::write_tree(&mut out, &tree, DEMO_XML_1, DEMO_XML_2, config)?;

    let state = Rc::new(UiState::new());
    let tree_view = Rc::clone(&state);
    state.subscribe_current_diff_node(move |node| {
        if let Some(handle) = node {
            log::debug!("selected {}", handle);
        }
    });

    for (handle, change) in tree.changes() {
        tree_view.set_current_diff_node(Some(handle.clone()));
        state.applied_edits().insert(handle.to_string(), change);
    }
    tree_view.set_current_diff_node(None);

    writeln!(out)?;
    writeln!(out, "[{:?}]", DisplayMode::Preview)?;
    let preview = state.applied_edits().apply(DEMO_XML_1, DEMO_XML_2)?;
    writeln!(out, "{}", preview)?;
    Ok(())
}
