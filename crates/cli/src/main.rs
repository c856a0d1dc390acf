use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use engine::Recommender;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use store::{CatalogStore, InteractionStore, MemoryCatalog, UserId};
use tracing::info;

/// movie-recs - Hybrid Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Hybrid movie recommendations from content and collaborative signals", long_about = None)]
struct Cli {
    /// Path to the dataset directory (movies.json + interactions.json)
    #[arg(short, long, default_value = "data/sample")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movie recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Number of recommendations to return
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Show the popularity ranking (the model-free fallback)
    Popular {
        /// Number of movies to return
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Rebuild both models from the current dataset
    Train,

    /// Run a concurrent benchmark against the recommender
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
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

    // Load the dataset (this may take a moment for large catalogs)
    println!("Loading dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let (catalog, interactions) =
        store::load_dataset(&cli.data_dir).context("Failed to load dataset")?;
    let catalog = Arc::new(catalog);
    let interactions = Arc::new(interactions);
    println!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());
    info!(
        movies = catalog.len(),
        interactions = interactions.len(),
        "Dataset loaded"
    );

    let engine = Arc::new(Recommender::new(catalog.clone(), interactions.clone()));

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend { user_id, limit } => {
            handle_recommend(engine, catalog, user_id, limit)?
        }
        Commands::Popular { limit } => handle_popular(engine, catalog, limit)?,
        Commands::Train => handle_train(engine)?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(engine, interactions, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    engine: Arc<Recommender>,
    catalog: Arc<MemoryCatalog>,
    user_id: UserId,
    limit: usize,
) -> Result<()> {
    let start = Instant::now();
    let movie_ids = engine.recommend_for_user(user_id, limit);
    let elapsed = start.elapsed();

    println!(
        "{}",
        format!("Recommendations for user {} ({:?}):", user_id, elapsed)
            .bold()
            .blue()
    );
    print_movie_list(&catalog, &movie_ids)
}

/// Handle the 'popular' command
fn handle_popular(
    engine: Arc<Recommender>,
    catalog: Arc<MemoryCatalog>,
    limit: usize,
) -> Result<()> {
    let movie_ids = engine.popularity_ranked(limit);

    println!("{}", "Most popular movies:".bold().blue());
    print_movie_list(&catalog, &movie_ids)
}

/// Handle the 'train' command
fn handle_train(engine: Arc<Recommender>) -> Result<()> {
    let start = Instant::now();
    let success = engine.train_models();
    let elapsed = start.elapsed();

    if success {
        println!("{} Both models trained in {:?}", "✓".green(), elapsed);
        Ok(())
    } else {
        // Serving still works through the surviving model / popularity,
        // but the operator should know the rebuild was incomplete
        Err(anyhow!("at least one model failed to train (see logs)"))
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    engine: Arc<Recommender>,
    interactions: Arc<store::MemoryInteractions>,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        return Err(anyhow!("--requests must be at least 1"));
    }

    // Sample request users from the users actually present in the log
    let user_ids: Vec<UserId> = interactions
        .all_interactions()?
        .iter()
        .map(|record| record.user_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    if user_ids.is_empty() {
        return Err(anyhow!("dataset has no interactions to benchmark against"));
    }

    // Warm both models outside the measured window
    engine.train_models();

    let semaphore = Arc::new(tokio::sync::Semaphore::new(concurrent.max(1)));
    let bench_start = Instant::now();

    let mut handles = vec![];
    for _ in 0..requests {
        let engine = engine.clone();
        let semaphore = semaphore.clone();
        let user_id = user_ids[rand::random::<u32>() as usize % user_ids.len()];
        let handle = tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let start = Instant::now();
            tokio::task::spawn_blocking(move || engine.recommend_for_user(user_id, 10)).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete and collect timings
    let mut timings = vec![];
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let wall_time = bench_start.elapsed();

    let stats = latency_stats(timings).ok_or_else(|| anyhow!("no timings recorded"))?;
    let throughput = requests as f32 / wall_time.as_secs_f32();

    println!("Benchmark results:");
    println!("Wall time: {:?}", wall_time);
    println!("Average latency: {:?}", stats.avg);
    println!("P50 latency: {:?}", stats.p50);
    println!("P95 latency: {:?}", stats.p95);
    println!("P99 latency: {:?}", stats.p99);
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

struct LatencyStats {
    avg: Duration,
    p50: Duration,
    p95: Duration,
    p99: Duration,
}

/// Summarize per-request latencies. None for an empty sample.
fn latency_stats(mut timings: Vec<Duration>) -> Option<LatencyStats> {
    if timings.is_empty() {
        return None;
    }
    let total: Duration = timings.iter().sum();
    let avg = total / (timings.len() as u32);
    timings.sort();
    let last = timings.len() - 1;
    let percentile = |q: f32| timings[((timings.len() as f32 * q) as usize).min(last)];
    Some(LatencyStats {
        avg,
        p50: timings[timings.len() / 2],
        p95: percentile(0.95),
        p99: percentile(0.99),
    })
}

/// Resolve movie ids against the catalog and print them in rank order
fn print_movie_list(catalog: &MemoryCatalog, movie_ids: &[store::MovieId]) -> Result<()> {
    if movie_ids.is_empty() {
        println!("  (nothing to recommend - is the catalog empty?)");
        return Ok(());
    }

    for (rank, &movie_id) in movie_ids.iter().enumerate() {
        match catalog.movie(movie_id)? {
            Some(movie) => {
                println!(
                    "{}. {} [{}] - popularity {:.1}",
                    (rank + 1).to_string().green(),
                    movie.title,
                    movie.genres.join(", "),
                    movie.popularity
                );
            }
            None => {
                // Ids come from the same catalog, so this means the
                // dataset changed underneath us
                println!("{}. (unknown movie {})", (rank + 1).to_string().green(), movie_id);
            }
        }
    }
    Ok(())
}
