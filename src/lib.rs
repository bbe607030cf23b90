pub mod config;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod model;
pub mod pipelines;
pub mod server;

pub use config::AppConfig;
pub use error::ImportError;
pub use extractors::SelectionOrder;
pub use model::{ParseRecipeRequest, ParseRecipeResponse, ParsedRecipe};

use crate::fetchers::RequestFetcher;

/// Extract a recipe from raw HTML using the default selection order.
///
/// # Example
/// ```
/// let html = r#"<h1>Grandma's Soup</h1><li class="ingredient">2 cups broth</li>"#;
/// let recipe = recipe_extract::extract_recipe(html);
///
/// assert_eq!(recipe.title.as_deref(), Some("Grandma's Soup"));
/// assert_eq!(recipe.ingredients, vec!["2 cups broth"]);
/// ```
pub fn extract_recipe(html: &str) -> ParsedRecipe {
    pipelines::html::process(html, SelectionOrder::default())
}

/// Extract a recipe from raw HTML with an explicit heuristic selection order.
pub fn extract_recipe_with(html: &str, order: SelectionOrder) -> ParsedRecipe {
    pipelines::html::process(html, order)
}

/// Fetch a recipe page with default settings and extract its recipe.
pub async fn fetch_recipe(url: &str) -> Result<ParsedRecipe, ImportError> {
    fetch_recipe_with_config(url, &AppConfig::default()).await
}

/// Fetch a recipe page using the given configuration and extract its recipe.
pub async fn fetch_recipe_with_config(
    url: &str,
    config: &AppConfig,
) -> Result<ParsedRecipe, ImportError> {
    let fetcher = RequestFetcher::new(&config.fetch)?;
    pipelines::url::process(url, &fetcher, config.extractors.selection_order).await
}
