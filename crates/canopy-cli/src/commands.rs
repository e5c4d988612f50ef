use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use canopy_diff::unified_diff;
use canopy_outline::{read_file_text, Document, DocumentLoader, JsonLoader, Position};
use canopy_report::{compare_anchored, compare_documents, compare_subtrees, ReportError};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Compare(args) => cmd_compare(args),
        Command::Headings(args) => cmd_headings(args),
        Command::Subtrees(args) => cmd_subtrees(args),
        Command::Diff(args) => cmd_diff(args),
        Command::Show(args) => cmd_show(args),
    }
}

fn load(path: &Path) -> anyhow::Result<Document> {
    JsonLoader::new()
        .load(path)
        .with_context(|| format!("loading {}", path.display()))
}

fn save_if(requested: bool, doc: &Document, path: &Path) -> anyhow::Result<()> {
    if requested {
        JsonLoader::new()
            .save(doc, path)
            .with_context(|| format!("saving {}", path.display()))?;
        println!("{} saved {}", "✓".green(), path.display());
    }
    Ok(())
}

fn cmd_compare(args: CompareArgs) -> anyhow::Result<()> {
    let mut primary = load(&args.primary)?;
    let outcome = compare_documents(&mut primary, &JsonLoader::new(), &args.secondary)?;

    let set = &outcome.change_set;
    if set.is_empty() {
        println!("{} documents are identical", "✓".green());
    } else {
        println!(
            "{} inserted, {} deleted, {} changed",
            set.inserted.len().to_string().green(),
            set.deleted.len().to_string().red(),
            set.changed.len().to_string().yellow(),
        );
    }
    print_subtree(&primary, &outcome.report, false);
    save_if(args.save, &primary, &args.primary)
}

fn cmd_headings(args: HeadingsArgs) -> anyhow::Result<()> {
    let mut primary = load(&args.primary)?;
    match compare_anchored(
        &mut primary,
        &JsonLoader::new(),
        &args.secondary,
        &args.title,
        &args.tag,
    ) {
        Ok((diff, report)) => {
            for title in &diff.duplicates {
                println!("{} duplicate heading: {}", "!".yellow(), title);
            }
            if diff.is_empty() {
                println!("{} no differences found", "✓".green());
            }
            print_subtree(&primary, &report, false);
            save_if(args.save, &primary, &args.primary)
        }
        // Nothing to compare is a notice, not a failure.
        Err(ReportError::NoMatchingContainer { title, document }) => {
            println!("{} no container titled {title:?} in {document}", "!".yellow());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_subtrees(args: SubtreesArgs) -> anyhow::Result<()> {
    let mut doc = load(&args.document)?;
    let anchor_a = doc
        .find_by_title(&args.title_a)
        .with_context(|| format!("no container titled {:?}", args.title_a))?;
    let anchor_b = doc
        .find_by_title(&args.title_b)
        .with_context(|| format!("no container titled {:?}", args.title_b))?;

    let (diff, report) = compare_subtrees(&mut doc, &anchor_a, &anchor_b, &args.tag)?;
    for title in &diff.duplicates {
        println!("{} duplicate heading: {}", "!".yellow(), title);
    }
    print_subtree(&doc, &report, true);
    save_if(args.save, &doc, &args.document)
}

fn cmd_diff(args: DiffArgs) -> anyhow::Result<()> {
    let text_a = read_file_text(&args.file_a)?;
    let text_b = read_file_text(&args.file_b)?;
    let diff = unified_diff(
        &text_a,
        &text_b,
        &args.file_a.display().to_string(),
        &args.file_b.display().to_string(),
    );
    if diff.is_empty() {
        println!("{} files are identical", "✓".green());
        return Ok(());
    }
    for line in diff.lines() {
        if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else {
            println!("{line}");
        }
    }
    Ok(())
}

fn cmd_show(args: ShowArgs) -> anyhow::Result<()> {
    let doc = load(&args.document)?;
    println!("{} ({} nodes)", doc.name().bold(), doc.node_count());
    for pos in doc.walk() {
        print_node(&doc, &pos, args.bodies);
    }
    Ok(())
}

fn print_subtree(doc: &Document, root: &Position, bodies: bool) {
    for pos in doc.walk_subtree(root) {
        print_node(doc, &pos, bodies);
    }
}

fn print_node(doc: &Document, pos: &Position, bodies: bool) {
    let indent = "  ".repeat(pos.depth());
    let title = doc.title(pos).unwrap_or("<missing>");
    println!("{indent}{} {}", "•".dimmed(), title);
    if bodies {
        if let Ok(body) = doc.body(pos) {
            for line in body.lines() {
                println!("{indent}    {}", line.dimmed());
            }
        }
    }
}
