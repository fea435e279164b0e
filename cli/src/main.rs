mod api;
mod browse;
mod controller;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use api::{HttpFetcher, PageRequest, RecipeFetcher};

#[derive(Parser)]
#[command(name = "larder")]
#[command(about = "Larder recipe browser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse recipes interactively
    Browse {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
    /// Run a one-shot search and print the matching page
    Search {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        /// Title substring
        #[arg(long)]
        title: Option<String>,
        /// Cuisine substring
        #[arg(long)]
        cuisine: Option<String>,
        /// Serving count prefix, e.g. 4
        #[arg(long)]
        serves: Option<String>,
        /// At most N stars (1-5)
        #[arg(long)]
        rating: Option<u8>,
        /// At most N minutes total time
        #[arg(long)]
        max_time: Option<u32>,
        /// Page number (default: 1)
        #[arg(long, default_value_t = 1)]
        page: i64,
        /// Rows per page (default: 15)
        #[arg(long, default_value_t = 15)]
        limit: i64,
    },
    /// Show a single recipe by id
    Show {
        /// Server URL (default: http://localhost:3000)
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        /// Recipe id
        id: i32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Browse { server } => {
            browse::browse(&server).await?;
        }
        Commands::Search {
            server,
            title,
            cuisine,
            serves,
            rating,
            max_time,
            page,
            limit,
        } => {
            let fetcher = HttpFetcher::new(&server);
            let request = PageRequest {
                page: page.max(1),
                limit: limit.max(1),
                title,
                cuisine,
                serves,
                rating,
                max_time,
            };
            let response = fetcher.fetch_page(&request).await?;
            browse::print_table(&response.data);
            println!("{} of {} total", response.data.len(), response.total);
        }
        Commands::Show { server, id } => {
            let fetcher: Arc<dyn RecipeFetcher> = Arc::new(HttpFetcher::new(&server));
            browse::show_recipe(fetcher.as_ref(), id).await;
        }
    }

    Ok(())
}
