//! bindery CLI - book pagination tool

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use bindery::layout::{estimate_report, NumberSystem};
use bindery::render::{serialize, JsonFormat};
use bindery::{load_document, Bindery, Block, MarkupOptions, SectionKind};

#[derive(Parser)]
#[command(name = "bindery")]
#[command(version)]
#[command(about = "Paginate book documents into page layouts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a document into pages
    Layout {
        /// Document JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Print laid-out page numbers in the table of contents
        #[arg(long)]
        reconcile_toc: bool,

        /// Columns per indentation level
        #[arg(long, default_value = "4", env = "BINDERY_TAB_STOP")]
        tab_stop: usize,

        /// Leave out cover pages
        #[arg(long)]
        no_covers: bool,
    },

    /// Show estimated page numbers
    Estimate {
        /// Document JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output the estimates as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dump parsed markup blocks as JSON
    Blocks {
        /// Document JSON file, markup text file, or `-` for stdin
        #[arg(value_name = "FILE")]
        input: String,

        /// Only this section of a document
        #[arg(short, long, value_name = "ID")]
        section: Option<String>,

        /// Columns per indentation level
        #[arg(long, default_value = "4")]
        tab_stop: usize,
    },

    /// Show document information
    Info {
        /// Document JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Draw operations as JSON
    Json,
    /// Plain-text proof
    Text,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Layout {
            input,
            output,
            format,
            compact,
            reconcile_toc,
            tab_stop,
            no_covers,
        } => cmd_layout(
            &input,
            output.as_deref(),
            format,
            compact,
            reconcile_toc,
            tab_stop,
            no_covers,
        ),
        Commands::Estimate { input, json } => cmd_estimate(&input, json),
        Commands::Blocks {
            input,
            section,
            tab_stop,
        } => cmd_blocks(&input, section.as_deref(), tab_stop),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_layout(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    compact: bool,
    reconcile_toc: bool,
    tab_stop: usize,
    no_covers: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Laying out pages...");

    let mut bindery = Bindery::new().with_tab_stop(tab_stop);
    if reconcile_toc {
        bindery = bindery.reconciled();
    }
    if no_covers {
        bindery = bindery.without_covers();
    }
    let layout = bindery.load(input)?;
    spinner.finish_and_clear();

    for warning in &layout.result.warnings {
        eprintln!("{}: {}", "Warning".yellow().bold(), warning);
    }

    let content = match format {
        OutputFormat::Json if compact => layout.to_json(JsonFormat::Compact)?,
        OutputFormat::Json => layout.to_json(JsonFormat::Pretty)?,
        OutputFormat::Text => layout.to_text(),
    };
    write_output(output, &content)?;

    if output.is_some() {
        let stats = &layout.result.stats;
        println!(
            "{} {} pages ({} roman, {} arabic, {} unnumbered)",
            "Done!".green().bold(),
            stats.total_pages(),
            stats.roman_pages,
            stats.arabic_pages,
            stats.unnumbered_pages
        );
    }
    Ok(())
}

fn cmd_estimate(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_document(input)?;
    let report = estimate_report(&doc)?;

    if json {
        println!("{}", serialize(&report, JsonFormat::Pretty)?);
        return Ok(());
    }

    println!("{}", "Estimated Page Numbers".cyan().bold());
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "{:<36} {:>6} {:>8} {:>7}",
        "Section".bold(),
        "Page".bold(),
        "Content".bold(),
        "Images".bold()
    );
    for section in &report {
        let page = match section.system {
            NumberSystem::Roman => bindery::layout::romanize(section.page_number),
            NumberSystem::Arabic => section.page_number.to_string(),
        };
        println!(
            "{:<36} {:>6} {:>8} {:>7}",
            truncate(&section.title, 36),
            page,
            section.content_pages,
            section.image_pages
        );
        for sub in &section.subsections {
            let page = match section.system {
                NumberSystem::Roman => bindery::layout::romanize(sub.page_number),
                NumberSystem::Arabic => sub.page_number.to_string(),
            };
            println!(
                "  {:<34} {:>6} {:>8}",
                truncate(&sub.title, 34).dimmed(),
                page,
                sub.content_pages
            );
        }
    }
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

fn cmd_blocks(
    input: &str,
    section: Option<&str>,
    tab_stop: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = MarkupOptions::new().with_tab_stop(tab_stop);

    let text = if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        fs::read_to_string(input)?
    };

    let blocks: Vec<(String, Vec<Block>)> = if input.ends_with(".json") {
        let doc = bindery::Document::from_json(&text)?;
        doc.sections
            .iter()
            .filter(|s| section.map_or(true, |id| s.id == id))
            .map(|s| (s.id.clone(), bindery::parser::parse_blocks_with(&s.content, &options)))
            .collect()
    } else {
        vec![(
            input.to_string(),
            bindery::parser::parse_blocks_with(&text, &options),
        )]
    };

    if blocks.is_empty() {
        return Err(format!("No section matches '{}'", section.unwrap_or_default()).into());
    }

    let value: serde_json::Map<String, serde_json::Value> = blocks
        .into_iter()
        .map(|(id, blocks)| Ok((id, serde_json::to_value(blocks)?)))
        .collect::<Result<_, serde_json::Error>>()?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_document(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if !doc.info.title.is_empty() {
        println!("{}: {}", "Title".bold(), doc.info.title);
    }
    if !doc.info.author.is_empty() {
        println!("{}: {}", "Author".bold(), doc.info.author);
    }
    println!("{}: {:?}", "Paper".bold(), doc.settings.paper_size);

    let count = |kind: SectionKind| doc.sections.iter().filter(|s| s.kind == kind).count();
    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Front matter".bold(), count(SectionKind::FrontMatter));
    println!("{}: {}", "Chapters".bold(), count(SectionKind::Chapter));
    println!("{}: {}", "Back matter".bold(), count(SectionKind::BackMatter));

    let subsections: usize = doc.sections.iter().map(|s| s.subsections.len()).sum();
    let text = doc
        .sections
        .iter()
        .map(|s| bindery::strip_markup(&s.content))
        .collect::<Vec<_>>()
        .join("\n");
    println!("{}: {}", "Subsections".bold(), subsections);
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.chars().count());
    println!("{}: {}", "Images".bold(), doc.image_count());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "bindery".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Book pagination tool");
    println!();
    println!("License: MIT");
}
