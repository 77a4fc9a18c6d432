use anyhow::{bail, Context, Result};
use cinematch_core::{Catalog, RecommendError, Recommender, RecommenderConfig, Weights};
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "recommend")]
#[command(about = "Recommend movies similar to a title from weighted cast, genre and director", long_about = None)]
struct Cli {
    /// Catalog path (.json / .jsonl file or a directory of them)
    #[arg(long)]
    catalog: String,
    /// Optional JSON config file
    #[arg(long)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct WeightArgs {
    /// How important the cast is (1-5)
    #[arg(long, default_value_t = 1)]
    cast: i64,
    /// How important the genre is (1-5)
    #[arg(long, default_value_t = 1)]
    genre: i64,
    /// How important the director is (1-5)
    #[arg(long, default_value_t = 1)]
    director: i64,
}

impl WeightArgs {
    fn weights(&self) -> Result<Weights> {
        Ok(Weights::new(self.cast, self.genre, self.director)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the movies most similar to a title
    Query {
        #[arg(long)]
        title: String,
        #[command(flatten)]
        weights: WeightArgs,
        /// Number of recommendations (defaults to the configured top_n)
        #[arg(long)]
        top: Option<usize>,
        /// Print JSON instead of a numbered list
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show the combined text a title is vectorized from
    Profile {
        #[arg(long)]
        title: String,
        #[command(flatten)]
        weights: WeightArgs,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RecommenderConfig::from_file(path).with_context(|| format!("reading config {path}"))?,
        None => RecommenderConfig::default(),
    };
    let catalog = Catalog::load(&cli.catalog).with_context(|| format!("loading catalog {}", cli.catalog))?;
    tracing::info!(num_records = catalog.len(), catalog = %cli.catalog, "catalog ready");
    let recommender = Recommender::new(Arc::new(catalog), config)?;

    match cli.command {
        Commands::Query { title, weights, top, json } => {
            query(&recommender, &title, weights.weights()?, top, json)
        }
        Commands::Profile { title, weights } => profile(&recommender, &title, weights.weights()?),
    }
}

fn query(recommender: &Recommender, title: &str, weights: Weights, top: Option<usize>, json: bool) -> Result<()> {
    let top_n = top.unwrap_or(recommender.config().top_n).max(1);
    let recs = match recommender.run_query_top(title, weights, top_n) {
        Ok(recs) => recs,
        Err(err @ (RecommendError::TitleNotFound(_) | RecommendError::Vectorization(_))) => {
            bail!(err.user_message())
        }
        Err(err) => return Err(err.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recs)?);
        return Ok(());
    }
    println!(
        "Featured Weights - Cast: {}, Genre: {}, Director: {}.\n",
        weights.cast(),
        weights.genre(),
        weights.director()
    );
    println!("Here are the top {} films similar to:", recs.results.len());
    println!("## {}", recs.selected);
    for r in &recs.results {
        println!("{}. {}", r.rank, r.title);
    }
    Ok(())
}

fn profile(recommender: &Recommender, title: &str, weights: Weights) -> Result<()> {
    let index = recommender.lookup(title).map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let corpus = recommender.corpus(weights).map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let profile = corpus.profiles.get(index).context("record missing from weighted corpus")?;
    let num_terms = corpus.matrix.row(index).map(|r| r.len()).unwrap_or(0);
    tracing::info!(index, num_terms, vocabulary = corpus.vocabulary.len(), "profile");
    println!("{}", profile.combined_text.trim_end());
    Ok(())
}
