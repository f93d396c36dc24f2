//! conceptmap CLI: load article batches and query concept graphs.
//!
//! Usage:
//!   conceptmap [--db path] [--config settings.yaml] ingest <batch.json> [--warm]
//!   conceptmap context <article> --user <id>
//!   conceptmap map --user <id>

use clap::{Parser, Subcommand, ValueEnum};
use conceptmap::{
    ArticleId, CollectionQuery, CollectionSort, ConceptId, ConceptMapApi, GraphSettings,
    IngestBatch, OpenStore, SortOrder, SqliteStore, UserId,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "conceptmap",
    version,
    about = "Article context graphs and personal concept maps"
)]
struct Cli {
    /// Path to SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// YAML file overriding graph thresholds
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log level written to stderr (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load an analyzed article batch
    Ingest {
        /// JSON batch file
        batch: PathBuf,
        /// Build the article's graph cache after loading
        #[arg(long)]
        warm: bool,
    },
    /// Build and store an article's graph cache if it has none
    BuildCache {
        article: i64,
    },
    /// Show an article's context graph for a user
    Context {
        article: i64,
        #[arg(long)]
        user: i64,
    },
    /// Collect a concept
    Collect {
        concept: i64,
        #[arg(long)]
        user: i64,
    },
    /// Remove a collected concept
    Uncollect {
        concept: i64,
        #[arg(long)]
        user: i64,
    },
    /// List a user's collected concepts
    Collections {
        #[arg(long)]
        user: i64,
        #[arg(long, value_enum, default_value_t = SortArg::CollectedAt)]
        sort: SortArg,
        #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
        order: OrderArg,
    },
    /// Show a user's personal knowledge map
    Map {
        #[arg(long)]
        user: i64,
    },
    /// Show a concept with its related concepts and articles
    Concept {
        concept: i64,
        /// Report whether this user collected the concept
        #[arg(long)]
        user: Option<i64>,
    },
    /// Search concepts by name
    Search {
        query: String,
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    CollectedAt,
    Name,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

impl From<SortArg> for CollectionSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::CollectedAt => CollectionSort::CollectedAt,
            SortArg::Name => CollectionSort::Name,
        }
    }
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

/// Get the default database path (~/.local/share/conceptmap/conceptmap.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    let app_dir = data_dir.join("conceptmap");
    std::fs::create_dir_all(&app_dir).ok();
    app_dir.join("conceptmap.db")
}

fn open_api(db: Option<PathBuf>, config: Option<PathBuf>) -> Result<ConceptMapApi, String> {
    let settings = match config {
        Some(path) => GraphSettings::load(&path)
            .map_err(|e| format!("Failed to load config '{}': {}", path.display(), e))?,
        None => GraphSettings::default(),
    };
    let db_path = db.unwrap_or_else(default_db_path);
    let store =
        SqliteStore::open(&db_path).map_err(|e| format!("Failed to open database: {}", e))?;
    Ok(ConceptMapApi::new(Arc::new(store), settings))
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn report<T: Serialize, E: std::fmt::Display>(result: Result<T, E>) -> i32 {
    match result {
        Ok(value) => print_json(&value),
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_ingest(api: &ConceptMapApi, path: &PathBuf, warm: bool) -> i32 {
    let batch = match IngestBatch::from_path(path) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", path.display(), e);
            return 1;
        }
    };
    report(api.ingest(&batch, warm))
}

fn cmd_build_cache(api: &ConceptMapApi, article: ArticleId) -> i32 {
    match api.warm_article_cache(article) {
        Ok(true) => {
            println!("Built graph cache for article {}", article);
            0
        }
        Ok(false) => {
            println!("Article {} already has a graph cache", article);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_uncollect(api: &ConceptMapApi, user: UserId, concept: ConceptId) -> i32 {
    match api.remove_collection(user, concept) {
        Ok(name) => {
            println!("Removed '{}' from user {}'s collection", name, user);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    let api = match open_api(cli.db, cli.config) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Ingest { batch, warm } => cmd_ingest(&api, &batch, warm),
        Commands::BuildCache { article } => cmd_build_cache(&api, ArticleId::new(article)),
        Commands::Context { article, user } => {
            report(api.get_article_context(ArticleId::new(article), UserId::new(user)))
        }
        Commands::Collect { concept, user } => {
            report(api.collect_concept(UserId::new(user), ConceptId::new(concept)))
        }
        Commands::Uncollect { concept, user } => {
            cmd_uncollect(&api, UserId::new(user), ConceptId::new(concept))
        }
        Commands::Collections { user, sort, order } => {
            let query = CollectionQuery::new().sort_by(sort.into()).order(order.into());
            report(api.list_collections(UserId::new(user), &query))
        }
        Commands::Map { user } => report(api.get_user_knowledge_map(UserId::new(user))),
        Commands::Concept { concept, user } => {
            report(api.get_concept(ConceptId::new(concept), user.map(UserId::new)))
        }
        Commands::Search { query, limit } => report(api.search_concepts(&query, limit)),
    };
    std::process::exit(code);
}
