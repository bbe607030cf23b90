use crate::error::ImportError;
use crate::extractors::SelectionOrder;
use crate::fetchers::RequestFetcher;
use crate::model::ParsedRecipe;
use log::info;

/// Fetch `url` and extract a recipe from the returned page.
///
/// Only the fetch can fail; extraction always yields a recipe.
pub async fn process(
    url: &str,
    fetcher: &RequestFetcher,
    order: SelectionOrder,
) -> Result<ParsedRecipe, ImportError> {
    let html_content = fetcher.fetch(url).await?;
    info!("Fetched {} ({} bytes)", url, html_content.len());

    Ok(super::html::process(&html_content, order))
}
