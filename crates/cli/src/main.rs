//! CLI tool for turning a Wikipedia article into a PowerPoint deck.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::{Config, GeneratedDeck, Outcome, RequestHandler};
use deck_pptx::{PptxParser, PptxWriter};
use deck_wiki::WikipediaClient;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Generate a presentation from the Wikipedia article on a topic.
#[derive(Parser, Debug)]
#[command(name = "wiki-deck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Topic to look up, e.g. "Rust (programming language)"
    topic: String,

    /// Output directory (default: generated_ppt)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of content slides (default: 12)
    #[arg(short, long)]
    max_slides: Option<usize>,

    /// Wikipedia language code (default: en)
    #[arg(long)]
    language: Option<String>,

    /// Write an HTML page with the download link to this file
    #[arg(long)]
    html: Option<PathBuf>,

    /// Print the HTML download link to stdout
    #[arg(short, long)]
    print_link: bool,

    /// Print a per-slide summary of the generated deck
    #[arg(short, long)]
    inspect: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = load_config(&args)?;
    config.deck.validate()?;

    let source = WikipediaClient::new(&config.wiki)?;
    log::debug!("Using {}", source.api_url());

    let handler = RequestHandler::with_config(source, PptxWriter::new(), config.deck);

    let outcome = handler.handle(&args.topic);
    match &outcome {
        Outcome::Success(generated) => {
            println!("{}", outcome.message());
            report(generated, &args)?;
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Invalid(_) | Outcome::Failed(_) => {
            eprintln!("{}", outcome.message());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Load the config file, if any, and apply command-line overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(dir) = &args.output_dir {
        config.deck = config.deck.with_output_dir(dir);
    }
    if let Some(max_slides) = args.max_slides {
        config.deck = config.deck.with_max_slides(max_slides);
    }
    if let Some(language) = &args.language {
        config.wiki.language = language.clone();
    }

    Ok(config)
}

/// Print what was generated and write the optional extras.
fn report(generated: &GeneratedDeck, args: &Args) -> Result<()> {
    println!("  Saved to: {}", generated.path.display());
    println!("  Slides: {}", generated.slide_count);
    if !generated.article_found {
        println!("  No article found for '{}'", generated.topic);
    }

    if args.inspect {
        inspect(&generated.path)?;
    }

    if let Some(html_path) = &args.html {
        std::fs::write(html_path, generated.link.render_page(&generated.topic))
            .with_context(|| format!("Failed to write {}", html_path.display()))?;
        if args.verbose {
            eprintln!("Download page written to: {}", html_path.display());
        }
    }

    if args.print_link {
        println!("{}", generated.link.to_html());
    }

    Ok(())
}

/// Read the deck back and print one line per slide.
fn inspect(path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let presentation = PptxParser::new()
        .parse(BufReader::new(file), filename)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    for slide in &presentation.slides {
        let bullets = slide
            .body()
            .map(|body| body.paragraphs.iter().filter(|p| !p.text.is_empty()).count())
            .unwrap_or(0);
        let title_size = slide
            .title()
            .and_then(|t| t.paragraphs.first())
            .and_then(|p| p.font_size)
            .map(|size| format!(" [{}pt]", size.0))
            .unwrap_or_default();

        println!(
            "  {:>2}. {}{} ({} bullets)",
            slide.number,
            slide.title_text(),
            title_size,
            bullets
        );
    }

    Ok(())
}
