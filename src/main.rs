mod check;
mod db;
mod export;
mod ingest;
mod model;
mod parser;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::warn;

use model::CvData;

#[derive(Parser)]
#[command(name = "perfectcv", about = "CV importer: extract, parse, store and export structured records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import documents: extract text, parse into records, save
    Import {
        /// PDF, DOCX or plain-text files
        files: Vec<PathBuf>,
    },
    /// Parse one document and print the record as JSON (nothing is saved)
    Parse {
        file: PathBuf,
        /// Print the detected sections instead of the record
        #[arg(long)]
        sections: bool,
    },
    /// List stored documents
    List,
    /// Print a stored document
    Show {
        /// Document id (or unique prefix)
        id: String,
        /// Print raw JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Write a stored document to a plain-text file
    Export {
        /// Document id (or unique prefix)
        id: String,
        /// Output path (defaults to <First>_<Last>_CV.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the content-quality checklist on a stored document
    Check {
        /// Document id (or unique prefix)
        id: String,
    },
    /// Make a document the current one
    Select {
        /// Document id (or unique prefix)
        id: String,
    },
    /// Delete a stored document
    Delete {
        /// Document id (or unique prefix)
        id: String,
    },
    /// Show storage statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Import { files } => {
            anyhow::ensure!(!files.is_empty(), "No input files given");
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            import_files(&conn, &files)
        }
        Commands::Parse { file, sections } => {
            let text = ingest::extract_text(&file)?;
            if sections {
                let lines = parser::sections::normalize_lines(&text);
                let secs = parser::sections::segment(&lines);
                println!("{}", serde_json::to_string_pretty(&secs)?);
            } else {
                let cv = parser::parse_document(&text);
                println!("{}", serde_json::to_string_pretty(&cv)?);
            }
            Ok(())
        }
        Commands::List => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let rows = db::list_documents(&conn)?;
            if rows.is_empty() {
                println!("No documents stored. Run 'import' first.");
                return Ok(());
            }
            let current = db::get_current(&conn)?;

            println!(
                "{:>3} | {:<10} | {:<26} | {:<18} | {:<22} | {:<24} | {:<10}",
                "#", "Id", "Title", "Name", "Job Title", "Email", "Updated"
            );
            println!("{}", "-".repeat(130));
            for (i, row) in rows.iter().enumerate() {
                let marker = if current.as_deref() == Some(row.id.as_str()) { "*" } else { " " };
                let name = format!("{} {}", row.first_name, row.last_name);
                println!(
                    "{:>2}{} | {:<10} | {:<26} | {:<18} | {:<22} | {:<24} | {:<10}",
                    i + 1,
                    marker,
                    &row.id[..row.id.len().min(8)],
                    truncate(&row.title, 26),
                    truncate(name.trim(), 18),
                    truncate(&row.job_title, 22),
                    truncate(&row.email, 24),
                    truncate(&row.updated_at, 10),
                );
            }
            println!("\n{} documents | * = current | show <id> for details", rows.len());
            Ok(())
        }
        Commands::Show { id, json } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let cv = fetch_by_prefix(&conn, &id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&cv)?);
            } else {
                println!("{}", export::render_txt(&cv));
            }
            Ok(())
        }
        Commands::Export { id, output } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let cv = fetch_by_prefix(&conn, &id)?;
            let path = output.unwrap_or_else(|| PathBuf::from(export::txt_filename(&cv)));
            std::fs::write(&path, export::render_txt(&cv))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        Commands::Check { id } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let cv = fetch_by_prefix(&conn, &id)?;
            let report = check::analyze(&cv);
            println!("Score: {}/100", report.score);
            if !report.issues.is_empty() {
                println!("\nIssues:");
                for issue in &report.issues {
                    println!("  [{}] {}", issue.severity.as_str(), issue.title);
                    println!("      {}", issue.description);
                    println!("      Fix: {}", issue.suggestion);
                }
            }
            if !report.passed.is_empty() {
                println!("\nPassed:");
                for rule in &report.passed {
                    println!("  {} - {}", rule.title, rule.description);
                }
            }
            Ok(())
        }
        Commands::Select { id } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let id = db::resolve_id(&conn, &id)?;
            db::set_current(&conn, &id)?;
            println!("Current document set to {}", id);
            Ok(())
        }
        Commands::Delete { id } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let id = db::resolve_id(&conn, &id)?;
            if db::delete_document(&conn, &id)? {
                println!("Deleted {}", id);
            } else {
                println!("Nothing to delete.");
            }
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Documents:  {}", s.total);
            println!("Named:      {}", s.named);
            println!("With email: {}", s.with_email);
            println!("Current:    {}", s.current.as_deref().unwrap_or("-"));
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

struct ImportCounts {
    documents: usize,
    experience: usize,
    education: usize,
    skills: usize,
    errors: usize,
}

impl ImportCounts {
    fn print(&self) {
        println!(
            "Imported {} documents ({} experience, {} education, {} skill entries), {} errors.",
            self.documents, self.experience, self.education, self.skills, self.errors,
        );
    }
}

/// Parse every file in parallel (the parser is pure and reentrant), then
/// save sequentially on the single connection.
fn import_files(conn: &rusqlite::Connection, files: &[PathBuf]) -> anyhow::Result<()> {
    println!("Importing {} documents...", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec})")?
            .progress_chars("=> "),
    );

    let results: Vec<(&Path, anyhow::Result<CvData>)> = files
        .par_iter()
        .map(|path| {
            let parsed = ingest::extract_text(path).map(|text| parser::parse_document(&text));
            pb.inc(1);
            (path.as_path(), parsed)
        })
        .collect();
    pb.finish_and_clear();

    let mut counts = ImportCounts {
        documents: 0,
        experience: 0,
        education: 0,
        skills: 0,
        errors: 0,
    };

    for (path, parsed) in results {
        match parsed {
            Ok(cv) => {
                counts.documents += 1;
                counts.experience += cv.experience.len();
                counts.education += cv.education.len();
                counts.skills += cv.skills.len();
                db::save_document(conn, &cv, path.to_str())?;
                db::set_current(conn, &cv.id)?;
                println!("  {} -> {} ({})", path.display(), cv.title, &cv.id[..8]);
            }
            Err(e) => {
                warn!("Skipping {}: {:#}", path.display(), e);
                counts.errors += 1;
            }
        }
    }

    counts.print();
    Ok(())
}

fn fetch_by_prefix(conn: &rusqlite::Connection, prefix: &str) -> anyhow::Result<CvData> {
    let id = db::resolve_id(conn, prefix)?;
    db::fetch_document(conn, &id)?
        .with_context(|| format!("Document {} disappeared mid-read", id))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
