use clap::{Parser, Subcommand};
use log::{error, info};
use recipe_extract::{
    extract_recipe_with, fetch_recipe_with_config, server, AppConfig, ParsedRecipe,
    SelectionOrder,
};
use std::path::PathBuf;

/// Extract structured recipes from recipe web pages
#[derive(Parser, Debug)]
#[command(name = "recipe-extract", version, about, long_about = None)]
struct Cli {
    /// Take heuristic matches in document order across all selector patterns
    #[arg(long, global = true)]
    document_order: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a recipe page and print the extracted recipe as JSON
    Url {
        /// Recipe page URL
        url: String,
    },
    /// Extract a recipe from a saved HTML file
    File {
        /// Path to the HTML file
        path: PathBuf,
    },
    /// Run the HTTP service
    Serve {
        /// Address to listen on, overrides the configured one
        #[arg(long)]
        bind: Option<String>,
    },
}

fn print_recipe(recipe: &ParsedRecipe) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(recipe)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if cli.document_order {
        config.extractors.selection_order = SelectionOrder::Document;
    }

    match cli.command {
        Command::Url { url } => match fetch_recipe_with_config(&url, &config).await {
            Ok(recipe) => print_recipe(&recipe)?,
            Err(e) => {
                error!("Unable to fetch the recipe from {}: {}", url, e);
                return Err(e.into());
            }
        },
        Command::File { path } => {
            let html = tokio::fs::read_to_string(&path).await?;
            info!("Read {} ({} bytes)", path.display(), html.len());
            let recipe = extract_recipe_with(&html, config.extractors.selection_order);
            print_recipe(&recipe)?;
        }
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            server::serve(config).await?;
        }
    }

    Ok(())
}
