//! Blogstore CLI - inspect and populate a blog repository file

mod seed;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use blogstore_model::BlogPostComment;
use blogstore_repository::{BlogRepository, RepositoryConfig, RepositoryError};
use blogstore_storage::{RedbStore, StorageError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("cannot open database: {0}")]
    Storage(#[from] StorageError),

    #[error("cannot render output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Parser)]
#[command(name = "blogstore")]
#[command(about = "Blog repository with recent feeds, tag ranking and categories", long_about = None)]
struct Cli {
    /// Database file
    #[arg(long, default_value = "blogstore.redb")]
    db: PathBuf,
    /// Repository configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Pretty print the output
    #[arg(short, long)]
    pretty: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the sample users, blogs and posts
    Seed,
    /// List all users
    Users,
    /// List all blogs
    Blogs,
    /// Show a single post
    Post { id: u64 },
    /// Show the recent-posts feed
    RecentPosts,
    /// Show the recent-comments feed
    RecentComments,
    /// Show the most used tags
    TopTags {
        #[arg(short, default_value_t = 5)]
        n: usize,
    },
    /// List all categories
    Categories,
    /// List the posts in a category
    Category { name: String },
    /// Append a comment to a post
    Comment {
        post_id: u64,
        text: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => RepositoryConfig::load(path)?,
        None => RepositoryConfig::default(),
    };
    let store = RedbStore::new(&cli.db)?;
    let repo = BlogRepository::with_config(store, config)?;

    match &cli.command {
        Commands::Seed => {
            let summary = seed::insert_sample_data(&repo)?;
            print_json(&summary, cli.pretty)
        }
        Commands::Users => print_json(&repo.get_all_users()?, cli.pretty),
        Commands::Blogs => print_json(&repo.get_all_blogs()?, cli.pretty),
        Commands::Post { id } => print_json(&repo.get_blog_post(*id)?, cli.pretty),
        Commands::RecentPosts => print_json(&repo.get_recent_blog_posts()?, cli.pretty),
        Commands::RecentComments => {
            print_json(&repo.get_recent_blog_post_comments()?, cli.pretty)
        }
        Commands::TopTags { n } => print_json(&repo.get_top_tags(*n)?, cli.pretty),
        Commands::Categories => print_json(&repo.get_all_categories()?, cli.pretty),
        Commands::Category { name } => {
            print_json(&repo.get_blog_posts_by_category(name)?, cli.pretty)
        }
        Commands::Comment { post_id, text } => {
            let post = repo.add_comment(*post_id, BlogPostComment::new(text.as_str()))?;
            print_json(&post, cli.pretty)
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
