use anyhow::Context;
use clap::{Parser, Subcommand};
use moodknn::{storage, vectorize, Metric, MoodBoard, Params, UserQuery, DEFAULT_K};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "moodknn")]
#[command(about = "Recommend movies that match a mood", long_about = None)]
struct Cli {
    /// JSON array of movie records.
    #[arg(short, long, global = true, default_value = "movies.json")]
    catalog: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the catalog against a mood and print the closest movies.
    Recommend {
        #[arg(long, default_value_t = 0.5)]
        hue: f64,
        #[arg(long, default_value_t = 0.5)]
        intensity: f64,
        #[arg(long, default_value_t = 0.5)]
        pacing: f64,
        /// Eight comma separated 0/1 flags.
        #[arg(long)]
        descriptors: Option<String>,
        /// Mood-board colour (#RRGGBB); repeatable. Overrides --hue.
        #[arg(long = "color")]
        colors: Vec<String>,
        /// Mood-board descriptor name; repeatable. Overrides --descriptors.
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(short, default_value_t = DEFAULT_K as i64, allow_negative_numbers = true)]
        k: i64,
        #[arg(long, default_value = "euclidean")]
        metric: String,
        /// Score by tag, colour and slider overlap instead of vector distance.
        #[arg(long)]
        heuristic: bool,
    },
    /// Print the mood vector of every movie in the catalog.
    Vectors,
    /// Print the catalog and its size.
    Movies,
}

fn parse_vector(s: &str) -> Vec<f64> {
    s.split(',').filter_map(|x| x.trim().parse().ok()).collect()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodknn=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let catalog = storage::load_or_empty(&cli.catalog, Params::default());
    match cli.command {
        Commands::Recommend {
            hue,
            intensity,
            pacing,
            descriptors,
            colors,
            tags,
            k,
            metric,
            heuristic,
        } => {
            if heuristic {
                let board = MoodBoard {
                    colors: colors.into_iter().collect(),
                    descriptors: tags.into_iter().collect(),
                    intensity,
                    pacing,
                };
                let mut matches = catalog.rank_by_mood(&board);
                matches.truncate(usize::try_from(k).ok().filter(|&k| k > 0).unwrap_or(DEFAULT_K));
                let count = matches.len();
                let body = serde_json::json!({
                    "success": true,
                    "recommendations": matches,
                    "k": count,
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
                return Ok(());
            }
            let query = if colors.is_empty() && tags.is_empty() {
                UserQuery {
                    color_hue: hue,
                    intensity,
                    pacing,
                    descriptors: descriptors
                        .as_deref()
                        .map(parse_vector)
                        .unwrap_or_else(|| vec![0.0; 8]),
                    k: Some(k),
                    distance_metric: Some(metric),
                }
            } else {
                let metric: Metric = metric.parse()?;
                let board = MoodBoard {
                    colors: colors.into_iter().collect(),
                    descriptors: tags.into_iter().collect(),
                    intensity,
                    pacing,
                };
                board.to_query(Some(k), Some(metric))
            };
            let response = catalog
                .recommend(&query)
                .context("invalid query")?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Vectors => {
            for movie in catalog.movies() {
                let v = vectorize(movie);
                println!("{} {:?}", movie.id, v.as_slice());
            }
        }
        Commands::Movies => {
            let body = serde_json::json!({
                "movies": catalog.movies(),
                "count": catalog.len(),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }
    Ok(())
}
