//! babel CLI: browse and search the infinite library.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use rand::SeedableRng;

use babel_stacks::config::LibraryConfig;
use babel_stacks::coordinate::Coordinate;
use babel_stacks::engine::{Engine, EngineConfig};
use babel_stacks::library::Book;
use babel_stacks::search::{SearchMode, SearchResponse};

#[derive(Parser)]
#[command(name = "babel", version, about = "Browse and search the infinite library")]
struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/babel-stacks/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the library for books matching a query.
    Search {
        /// Free-text query.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Number of results to return.
        #[arg(long)]
        max_results: Option<usize>,

        /// Weight of the author/genre diversity bonus.
        #[arg(long)]
        diversity: Option<f32>,

        /// "deterministic" or "serendipitous".
        #[arg(long)]
        mode: Option<SearchMode>,

        /// Print the full response as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the book at a coordinate (hexagon.wall.shelf.volume).
    Book {
        coordinate: String,

        /// Print the book as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the text of one chapter.
    Chapter {
        coordinate: String,
        /// 1-based chapter number.
        ordinal: usize,
    },

    /// Pull a book from a random shelf.
    Random {
        /// Seed for a reproducible pick.
        #[arg(long)]
        seed: Option<u64>,

        /// Print the book as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show how a query is classified.
    Analyze {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Show engine info.
    Info,

    /// Inspect or create the config file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = LibraryConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Search {
            query,
            max_results,
            diversity,
            mode,
            json,
        } => {
            let engine = Engine::new(EngineConfig::from(&config))?;
            let mut options = config.search_options();
            if let Some(n) = max_results {
                options.max_results = n;
            }
            if let Some(w) = diversity {
                options.diversity_weight = w;
            }
            if let Some(m) = mode {
                options.mode = m;
            }

            let response = engine.search(&query.join(" "), &options)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&response).into_diagnostic()?
                );
            } else {
                print_response(&response);
            }
        }

        Commands::Book { coordinate, json } => {
            let engine = Engine::new(EngineConfig::from(&config))?;
            let coordinate: Coordinate = coordinate.parse()?;
            let book = engine.generate_book(&coordinate)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&book).into_diagnostic()?);
            } else {
                print_book(&book);
            }
        }

        Commands::Chapter {
            coordinate,
            ordinal,
        } => {
            let engine = Engine::new(EngineConfig::from(&config))?;
            let coordinate: Coordinate = coordinate.parse()?;
            let book = engine.generate_book(&coordinate)?;
            let text = engine.chapter_text(&coordinate, ordinal)?;
            if let Some(chapter) = book.chapter(ordinal) {
                println!("{}\n", book.title);
                println!("Chapter {}: {}\n", chapter.ordinal, chapter.title);
            }
            println!("{text}");
        }

        Commands::Random { seed, json } => {
            let engine = Engine::new(EngineConfig::from(&config))?;
            let book = match seed {
                Some(seed) => engine.random_book(&mut rand::rngs::StdRng::seed_from_u64(seed))?,
                None => engine.random_book(&mut rand::thread_rng())?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&book).into_diagnostic()?);
            } else {
                print_book(&book);
            }
        }

        Commands::Analyze { query } => {
            let engine = Engine::new(EngineConfig::from(&config))?;
            let analysis = engine.analyze(&query.join(" "))?;
            println!("Query:       \"{}\"", analysis.original_query);
            println!("Type:        {}", analysis.query_type);
            println!("Complexity:  {:.2}", analysis.complexity);
            println!("Concepts:    {}", analysis.concepts.join(", "));
            println!("Fields:      {}", analysis.fields.join(", "));
            println!("Adjectives:  {}", analysis.adjectives.join(", "));
            println!("Unknown:     {}", analysis.unknown_terms.join(", "));
        }

        Commands::Info => {
            let engine = Engine::new(EngineConfig::from(&config))?;
            println!("{}", engine.info());
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", toml::to_string_pretty(&config).into_diagnostic()?);
            }
            ConfigAction::Init { force } => {
                let path = match cli.config.or_else(LibraryConfig::default_path) {
                    Some(path) => path,
                    None => miette::bail!("cannot determine a config path; pass --config"),
                };
                if path.exists() && !force {
                    miette::bail!(
                        "config already exists at {} (use --force to overwrite)",
                        path.display()
                    );
                }
                LibraryConfig::default().save(&path)?;
                println!("Wrote default config to {}", path.display());
            }
        },
    }

    Ok(())
}

fn print_book(book: &Book) {
    println!("{}", book.title);
    println!("by {} ({}, {})", book.author, book.genre, book.publication_year);
    println!("Shelf mark: {}", book.id);
    println!();
    println!("{}", book.abstract_text);
    println!();
    println!("Contents ({} words):", book.word_count);
    for chapter in &book.chapters {
        println!(
            "  {:>2}. {} ({} words)",
            chapter.ordinal, chapter.title, chapter.word_count
        );
    }
    println!();
    println!("Bibliography:");
    for entry in &book.bibliography {
        println!("  - {entry}");
    }
}

fn print_response(response: &SearchResponse) {
    let meta = &response.metadata;
    println!(
        "\"{}\" ({} query, {} coordinates, {} books explored):",
        meta.query_analysis.original_query,
        meta.query_analysis.query_type,
        meta.search_space_size,
        meta.total_explored
    );
    if response.results.is_empty() {
        println!("  No books found.");
        return;
    }
    for (i, hit) in response.results.iter().enumerate() {
        println!(
            "  {}. {} by {} [{}]",
            i + 1,
            hit.book.title,
            hit.book.author,
            hit.book.id
        );
        println!(
            "     score {:.3} (relevance {:.3}, quality {:.3}, novelty {:.3}) via {}",
            hit.final_score,
            hit.relevance_score,
            hit.quality_score,
            hit.novelty_score,
            hit.search_source
        );
    }
}
