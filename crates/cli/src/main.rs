use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use catalog::{Movie, MovieCatalog, MovieId, MovieRepository, Rating, SortKey};
use clap::{Parser, Subcommand};
use colored::Colorize;
use server::params::IndexParams;
use server::{MovieList, Outcome, ServerConfig, Session, View};

/// moviedb - Movie catalog
#[derive(Parser)]
#[command(name = "moviedb")]
#[command(about = "Browse and serve a movie catalog", long_about = None)]
struct Cli {
    /// Path to the movie seed file
    #[arg(short, long, default_value = ServerConfig::DEFAULT_DATA_FILE)]
    data_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the catalog over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },

    /// List movies, optionally filtered by rating
    List {
        /// Column to sort by (title or release_date)
        #[arg(long)]
        sort: Option<String>,

        /// Only show these ratings (repeatable)
        #[arg(long = "rating")]
        ratings: Vec<String>,
    },

    /// Show one movie
    Show {
        #[arg(long)]
        id: MovieId,
    },

    /// List movies by the same director as a movie
    Similar {
        #[arg(long)]
        id: MovieId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Commands::Serve { bind } = cli.command {
        let config = ServerConfig {
            bind,
            data_file: cli.data_file,
        };
        return server::serve(config).await;
    }

    let start = Instant::now();
    let catalog = MovieCatalog::load_from_file(&cli.data_file)
        .with_context(|| format!("Failed to load catalog from {}", cli.data_file.display()))?;
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );
    let movie_list = MovieList::new(Arc::new(catalog));

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::List { sort, ratings } => handle_list(&movie_list, sort, ratings)?,
        Commands::Show { id } => handle_show(&movie_list, id)?,
        Commands::Similar { id } => handle_similar(&movie_list, id)?,
        Commands::Serve { .. } => {}
    }

    Ok(())
}

/// Handle the 'list' command
fn handle_list(movie_list: &MovieList, sort: Option<String>, ratings: Vec<String>) -> Result<()> {
    let sort = sort
        .map(|s| s.parse::<SortKey>())
        .transpose()
        .context("Invalid --sort")?;
    let ratings: BTreeSet<Rating> = ratings
        .iter()
        .map(|r| r.parse::<Rating>())
        .collect::<catalog::Result<_>>()
        .context("Invalid --rating")?;
    let params = IndexParams {
        sort,
        ratings: Some(ratings).filter(|r| !r.is_empty()),
    };

    let mut session = Session::default();
    let Outcome::Render(page) = movie_list.index(params, &mut session)? else {
        return Ok(());
    };
    let View::Index(view) = page.view else {
        return Ok(());
    };

    let selected = view
        .selected_ratings
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "{}",
        format!("Movies [{}] sorted by {}:", selected, view.sort).bold().blue()
    );
    for movie in &view.movies {
        print_movie_line(movie);
    }
    Ok(())
}

/// Handle the 'show' command
fn handle_show(movie_list: &MovieList, id: MovieId) -> Result<()> {
    let movie = movie_list.repository().find_by_id(id)?;

    println!("{}", movie.title.bold().blue());
    println!("{}Rating: {}", "• ".green(), movie.rating);
    println!(
        "{}Released on: {}",
        "• ".green(),
        movie
            .release_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    );
    println!(
        "{}Director: {}",
        "• ".green(),
        movie.director_name().unwrap_or("unknown")
    );
    if let Some(description) = &movie.description {
        println!("{}{}", "• ".green(), description);
    }
    Ok(())
}

/// Handle the 'similar' command
fn handle_similar(movie_list: &MovieList, id: MovieId) -> Result<()> {
    let mut session = Session::default();
    match movie_list.similar(id, &mut session)? {
        Outcome::Render(page) => {
            if let View::Similar { movie, movies } = page.view {
                println!(
                    "{}",
                    format!("Movies by the director of '{}':", movie.title).bold().blue()
                );
                for m in &movies {
                    print_movie_line(m);
                }
            }
        }
        Outcome::Redirect(_) => {
            if let Some(flash) = session.take_flash() {
                println!("{} {}", "!".yellow(), flash);
            }
        }
    }
    Ok(())
}

fn print_movie_line(movie: &Movie) {
    println!(
        "{}: {} [{}] {}",
        format!("{:>4}", movie.id).green(),
        movie.title,
        movie.rating,
        movie
            .release_date
            .map(|d| d.to_string())
            .unwrap_or_default()
    );
}
