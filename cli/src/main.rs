//! mdpdf CLI - converts every Markdown file under the working directory to PDF

use std::path::Path;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use mdpdf::batch::{self, BatchEvent, OUTPUT_DIR};
use mdpdf::{ConvertOptions, MarkdownConverter, RunReport};

const RULE_WIDTH: usize = 60;

#[derive(Parser)]
#[command(name = "mdpdf")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Convert every Markdown file under the current directory to PDF",
    long_about = "Walks the current directory, converts each Markdown file to a styled PDF \
                  and mirrors the tree under pdf_documents/. Directories named node_modules, \
                  .git, venv, __pycache__ and pdf_documents are skipped."
)]
struct Cli {}

fn main() {
    env_logger::init();

    let _cli = Cli::parse();

    if let Err(e) = run() {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let root = std::env::current_dir()?;
    log::debug!("converting markdown under {}", root.display());

    print_banner("  OITH Markdown to PDF Converter");

    let converter = MarkdownConverter::new();
    let options = ConvertOptions::default();
    let mut progress: Option<ProgressBar> = None;

    let report = batch::run(&root, &converter, &options, |event| {
        handle_event(event, &mut progress);
    });

    if let Some(pb) = progress.take() {
        pb.finish_and_clear();
    }
    print_summary(&report);

    // Conversion failures are reported, not signalled through the exit code.
    Ok(())
}

fn handle_event(event: BatchEvent<'_>, progress: &mut Option<ProgressBar>) {
    match event {
        BatchEvent::Started { count } => {
            println!("\n📄 Found {} markdown files to convert\n", count.to_string().bold());
            let pb = ProgressBar::new(count as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            *progress = Some(pb);
        }
        BatchEvent::Converting { relative } => {
            with_progress(progress, || {
                println!("📝 Converting: {}", relative.display());
            });
            if let Some(pb) = progress {
                pb.set_message(relative.display().to_string());
            }
        }
        BatchEvent::Created { output, .. } => {
            with_progress(progress, || {
                println!("   {} Created: {}", "✅".green(), display_output(output));
            });
            if let Some(pb) = progress {
                pb.inc(1);
            }
        }
        BatchEvent::Failed { message, .. } => {
            with_progress(progress, || {
                println!("  {} Error: {}", "❌".red(), message.dimmed());
                println!("   {} Failed", "❌".red());
            });
            if let Some(pb) = progress {
                pb.inc(1);
            }
        }
        BatchEvent::Finished { report } => {
            log::debug!("{} attempted", report.attempted());
        }
    }
}

/// Print through the progress bar, if any, so lines are not overdrawn.
fn with_progress<F: FnOnce()>(progress: &Option<ProgressBar>, print: F) {
    match progress {
        Some(pb) => pb.suspend(print),
        None => print(),
    }
}

fn display_output(output: &Path) -> String {
    output.display().to_string().replace('\\', "/")
}

fn print_banner(title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("\n{}", rule.cyan());
    println!("{}", title.cyan().bold());
    println!("{}", rule.cyan());
}

fn print_summary(report: &RunReport) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("\n{}", rule.cyan());
    println!("{}", "  Conversion Complete!".cyan().bold());
    println!("  {} Success: {}", "✅".green(), report.succeeded.to_string().green().bold());
    println!("  {} Failed: {}", "❌".red(), report.failed.to_string().red().bold());
    println!("{}\n", rule.cyan());
    println!("📁 All PDFs saved to: {}/", OUTPUT_DIR.bold());
}
