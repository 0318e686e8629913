use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::Catalog;
use llm_client::config::{DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use llm_client::{ApiKey, LlmConfig, OpenAiChatClient, DEFAULT_API_KEY_VAR};
use pipeline::{SearchResult, ValidationError, DEFAULT_SAMPLE_SIZE};
use rand::rngs::StdRng;
use rand::SeedableRng;
use server::{
    CautionNotice, DiscoveryService, DiscoverySession, RecommendationError,
    RecommendationOrchestrator, RecommendationResult,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Movie Finder - discover movies by genre
#[derive(Parser)]
#[command(name = "movie-finder")]
#[command(about = "Sample movies from a catalog by genre and ask an AI for more", long_about = None)]
struct Cli {
    /// Path to the movie catalog CSV (needs Title and Genre columns)
    #[arg(short, long, env = "MOVIE_CATALOG", default_value = "final_movies.csv")]
    catalog: PathBuf,

    /// File whose first line is the API key; falls back to $OPENAI_API_KEY
    #[arg(long, env = "MOVIE_FINDER_KEY_FILE")]
    key_file: Option<PathBuf>,

    /// Chat model used for recommendations
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Sampling temperature for the chat model
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Seconds to wait for the recommendation service
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Number of titles returned by a search
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    sample_size: usize,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the genres in the catalog
    Genres,

    /// Sample movies of a genre from the catalog
    Search {
        /// Genre to search for (case-insensitive)
        #[arg(long)]
        genre: String,

        /// Seed the random sampler for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Search a genre, then ask the AI for further recommendations
    Recommend {
        /// Genre to search for (case-insensitive)
        #[arg(long)]
        genre: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Interactive session (the default)
    Interactive,
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

    // A catalog that doesn't load means nothing gets served
    let start = Instant::now();
    let catalog = Arc::new(
        Catalog::load_from_file(&cli.catalog)
            .with_context(|| format!("Failed to load movie catalog {}", cli.catalog.display()))?,
    );
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );

    let service = build_service(&cli, catalog)?;

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Genres => handle_genres(&service),
        Commands::Search { genre, seed } => handle_search(&service, &genre, seed),
        Commands::Recommend { genre, yes } => handle_recommend(&service, &genre, yes).await,
        Commands::Interactive => handle_interactive(&service).await,
    }
}

/// Wire up the service, enabling recommendations only when a credential exists
fn build_service(cli: &Cli, catalog: Arc<Catalog>) -> Result<DiscoveryService> {
    let service = DiscoveryService::new(catalog).with_sample_size(cli.sample_size);

    let Some(api_key) = load_api_key(cli.key_file.as_deref())? else {
        warn!("No API key installed; AI recommendations are disabled");
        return Ok(service);
    };

    let timeout = Duration::from_secs(cli.timeout_secs);
    let config = LlmConfig::default()
        .with_api_base(cli.api_base.as_str())
        .with_model(cli.model.as_str())
        .with_temperature(cli.temperature)
        .with_timeout(timeout);
    let client = OpenAiChatClient::new(api_key, config)?;
    info!("AI recommendations enabled ({})", client.config().model);

    Ok(service.with_recommendations(
        RecommendationOrchestrator::new(Arc::new(client)).with_timeout(timeout),
    ))
}

/// An explicit key file must be readable; the environment is optional
fn load_api_key(key_file: Option<&Path>) -> Result<Option<ApiKey>> {
    match key_file {
        Some(path) => {
            let key = ApiKey::from_file(path)
                .with_context(|| format!("Failed to read API key from {}", path.display()))?;
            Ok(Some(key))
        }
        None => Ok(ApiKey::from_env(DEFAULT_API_KEY_VAR).ok()),
    }
}

/// Handle the 'genres' command
fn handle_genres(service: &DiscoveryService) -> Result<()> {
    println!("{}", "Available genres:".bold().blue());
    print_genre_list(service.genres().iter());
    Ok(())
}

/// Handle the 'search' command
fn handle_search(service: &DiscoveryService, genre: &str, seed: Option<u64>) -> Result<()> {
    let mut session = match seed {
        Some(seed) => service.open_session_with_rng(StdRng::seed_from_u64(seed)),
        None => service.open_session(),
    };

    match session.search(genre) {
        Ok(result) => print_search_result(&result),
        Err(e) => print_validation_error(&e),
    }
    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(service: &DiscoveryService, genre: &str, yes: bool) -> Result<()> {
    let mut session = service.open_session();

    match session.search(genre) {
        Ok(result) => print_search_result(&result),
        Err(e) => {
            print_validation_error(&e);
            return Ok(());
        }
    }

    run_recommendations(&mut session, yes).await;
    Ok(())
}

/// Handle the 'interactive' command
async fn handle_interactive(service: &DiscoveryService) -> Result<()> {
    let mut session = service.open_session();
    print_help(service.recommendations_enabled());

    loop {
        let prompt = match session.state().genre() {
            Some(genre) => format!("[{}]> ", genre),
            None => "> ".to_string(),
        };
        print!("{}", prompt.cyan());
        io::stdout().flush()?;

        let Some(line) = read_line().await? else {
            break;
        };

        match parse_command(&line) {
            ReplCommand::Search(genre) => match session.search(&genre) {
                Ok(result) => print_search_result(&result),
                Err(e) => print_validation_error(&e),
            },
            ReplCommand::Recommend => run_recommendations(&mut session, false).await,
            ReplCommand::Reset => {
                session.reset();
                println!("Genre cleared.");
            }
            ReplCommand::Genres => print_genre_list(session.genres().iter()),
            ReplCommand::Help => print_help(session.recommendations_enabled()),
            ReplCommand::Quit => break,
            ReplCommand::Empty => {}
            ReplCommand::Unknown(word) => {
                println!("{} Unknown command '{}'. Type 'help'.", "!".yellow(), word);
            }
        }
    }
    Ok(())
}

/// One line of interactive input
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Search(String),
    Recommend,
    Reset,
    Genres,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "" => ReplCommand::Empty,
        "search" | "s" => ReplCommand::Search(rest.to_string()),
        "recommend" | "r" => ReplCommand::Recommend,
        "reset" | "back" => ReplCommand::Reset,
        "genres" | "g" => ReplCommand::Genres,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        _ => ReplCommand::Unknown(word.to_string()),
    }
}

/// Show the notice, ask for confirmation, and print whatever comes back
async fn run_recommendations<R: rand::Rng>(session: &mut DiscoverySession<R>, assume_yes: bool) {
    let notice = match session.prepare_recommendations() {
        Ok(notice) => notice,
        Err(e) => {
            print_recommendation_error(&e);
            return;
        }
    };
    print_notice(&notice);

    let outcome = if assume_yes || ask_confirmation().await {
        println!("{}", "Here are some movies you might like ...".italic());
        session.confirm_recommendations().await
    } else {
        session.decline_recommendations()
    };

    match outcome {
        Ok(result) => print_recommendations(&result),
        Err(e) => print_recommendation_error(&e),
    }
}

async fn ask_confirmation() -> bool {
    print!("Continue? [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }

    match read_line().await {
        Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        _ => false,
    }
}

/// Read one line from stdin off the runtime threads. `None` at end of input.
async fn read_line() -> Result<Option<String>> {
    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        io::stdin().read_line(&mut line).map(|read| (read > 0).then_some(line))
    })
    .await??;
    Ok(line)
}

fn print_search_result(result: &SearchResult) {
    println!("{}", format!("Results for {}:", result.genre).bold().blue());
    for (i, title) in result.titles.iter().enumerate() {
        println!("{}. {}", (i + 1).to_string().green(), title);
    }
}

fn print_validation_error(error: &ValidationError) {
    match error {
        ValidationError::EmptyGenre => println!("{} {}", "!".yellow(), error),
        ValidationError::UnknownGenre { input, valid_genres } => {
            println!(
                "{} '{}' is not in our catalogue. Please enter one of the categories listed below:",
                "!".yellow(),
                input
            );
            print_genre_list(valid_genres.iter().map(String::as_str));
        }
    }
}

fn print_genre_list<'a>(genres: impl Iterator<Item = &'a str>) {
    for (i, genre) in genres.enumerate() {
        println!("  {}. {}", i + 1, genre);
    }
}

fn print_notice(notice: &CautionNotice) {
    println!("{} {}", "Note:".yellow().bold(), notice.message);
}

fn print_recommendations(result: &RecommendationResult) {
    match result.text() {
        Some(text) => {
            println!("{}", "AI Recommendations:".bold().blue());
            println!("{}", text);
        }
        None => println!("No recommendations requested."),
    }
}

fn print_recommendation_error(error: &RecommendationError) {
    println!("{} {}", "✗".red(), error);
    if error.is_recoverable() {
        println!("  Try 'recommend' again to retry.");
    }
}

fn print_help(recommendations_enabled: bool) {
    println!("{}", "Commands:".bold());
    println!("  search <genre>   sample movies of a genre");
    if recommendations_enabled {
        println!("  recommend        ask the AI for more movies in the current genre");
    } else {
        println!("  recommend        (unavailable: no API key installed)");
    }
    println!("  reset            clear the current genre");
    println!("  genres           list the catalog genres");
    println!("  quit             leave");
}
