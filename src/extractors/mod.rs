use crate::model::ParsedRecipe;
use scraper::Html;

mod html_class;
mod json_ld;
mod query;

pub use html_class::{HtmlClassExtractor, DEFAULT_TITLE};
pub use json_ld::JsonLdExtractor;
pub use query::SelectionOrder;

pub trait Extractor {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Extract a recipe from the document, `None` when this strategy finds nothing.
    fn parse(&self, document: &Html) -> Option<ParsedRecipe>;
}
