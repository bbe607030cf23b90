use crate::extractors::{Extractor, HtmlClassExtractor, JsonLdExtractor, SelectionOrder};
use crate::model::ParsedRecipe;
use log::debug;
use scraper::Html;

/// Extract a recipe from raw HTML.
///
/// This pipeline:
/// 1. Parses the HTML into a document
/// 2. Returns the embedded JSON-LD recipe if there is one
/// 3. Otherwise falls back to the class/microdata heuristics, which always
///    produce a recipe
///
/// The two strategies are never merged.
pub fn process(html: &str, order: SelectionOrder) -> ParsedRecipe {
    let document = Html::parse_document(html);

    let structured = JsonLdExtractor;
    if let Some(recipe) = structured.parse(&document) {
        debug!("Recipe extracted by {}", structured.name());
        return recipe;
    }

    debug!("No structured data found, falling back to HTML heuristics");
    HtmlClassExtractor::new(order).extract(&document)
}
