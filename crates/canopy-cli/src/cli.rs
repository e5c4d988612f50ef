use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "canopy",
    about = "Canopy — outline document comparison",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two outline documents by stable node identity
    Compare(CompareArgs),
    /// Compare a titled container against the same container in another document
    Headings(HeadingsArgs),
    /// Compare two containers of one document by normalized heading
    Subtrees(SubtreesArgs),
    /// Show a unified diff of two text files
    Diff(DiffArgs),
    /// Print a document's outline tree
    Show(ShowArgs),
}

#[derive(Args)]
pub struct CompareArgs {
    /// The visible (primary) document
    pub primary: PathBuf,
    /// The document to compare against
    pub secondary: PathBuf,
    /// Write the primary back with the report grafted in
    #[arg(long)]
    pub save: bool,
}

#[derive(Args)]
pub struct HeadingsArgs {
    pub primary: PathBuf,
    pub secondary: PathBuf,
    /// Title of the container to match on both sides
    pub title: String,
    /// Title for the report root
    #[arg(long, default_value = "compare-marked-nodes")]
    pub tag: String,
    #[arg(long)]
    pub save: bool,
}

#[derive(Args)]
pub struct SubtreesArgs {
    pub document: PathBuf,
    /// Title of the first container
    pub title_a: String,
    /// Title of the second container
    pub title_b: String,
    #[arg(long, default_value = "compare-trees")]
    pub tag: String,
    #[arg(long)]
    pub save: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    pub file_a: PathBuf,
    pub file_b: PathBuf,
}

#[derive(Args)]
pub struct ShowArgs {
    pub document: PathBuf,
    /// Also print node bodies
    #[arg(long)]
    pub bodies: bool,
}
