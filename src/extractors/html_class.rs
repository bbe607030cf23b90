use super::query::{element_text, Rule, SelectionOrder};
use super::Extractor;
use crate::model::ParsedRecipe;
use log::debug;
use scraper::{ElementRef, Html};

/// Title used when the page has no heading-like element.
pub const DEFAULT_TITLE: &str = "Recipe";

const TITLE_PATTERNS: &[&str] = &[
    "h1",
    "[class*='recipe-title']",
    "[class*='title']",
    ".entry-title",
];

const DESCRIPTION_PATTERNS: &[&str] = &[
    "[itemprop='description']",
    "[class*='recipe-summary']",
    "[class*='recipe-description']",
];

const IMAGE_PATTERNS: &[&str] = &["img[itemprop='image']", "meta[property='og:image']"];

const INGREDIENT_PATTERNS: &[&str] = &[
    "[class*='ingredient']",
    ".recipe-ingredient",
    ".ingredients li",
    "[itemprop='recipeIngredient']",
];

const INSTRUCTION_PATTERNS: &[&str] = &[
    "[class*='instruction']",
    ".recipe-instruction",
    ".instructions li",
    "[itemprop='recipeInstructions']",
];

const SERVINGS_PATTERNS: &[&str] = &[
    "[class*='serving']",
    "[class*='yield']",
    "[itemprop='recipeYield']",
];

const COOK_TIME_PATTERNS: &[&str] = &["[class*='cook-time']", "[itemprop='cookTime']"];

const PREP_TIME_PATTERNS: &[&str] = &["[class*='prep-time']", "[itemprop='prepTime']"];

const TOTAL_TIME_PATTERNS: &[&str] = &["[class*='total-time']", "[itemprop='totalTime']"];

struct FieldRules {
    title: Rule,
    description: Rule,
    image: Rule,
    ingredients: Rule,
    instructions: Rule,
    servings: Rule,
    cook_time: Rule,
    prep_time: Rule,
    total_time: Rule,
}

impl FieldRules {
    fn new() -> Self {
        FieldRules {
            title: Rule::new(TITLE_PATTERNS),
            description: Rule::new(DESCRIPTION_PATTERNS),
            image: Rule::new(IMAGE_PATTERNS),
            ingredients: Rule::new(INGREDIENT_PATTERNS),
            instructions: Rule::new(INSTRUCTION_PATTERNS),
            servings: Rule::new(SERVINGS_PATTERNS),
            cook_time: Rule::new(COOK_TIME_PATTERNS),
            prep_time: Rule::new(PREP_TIME_PATTERNS),
            total_time: Rule::new(TOTAL_TIME_PATTERNS),
        }
    }
}

fn image_source(element: ElementRef<'_>) -> Option<String> {
    let value = element.value();
    value
        .attr("src")
        .or_else(|| value.attr("content"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(str::to_string)
}

/// Best-effort extraction from class names and microdata attributes.
///
/// This is the last-resort extractor: it always produces a recipe, even for
/// a page with no recipe markup at all.
pub struct HtmlClassExtractor {
    order: SelectionOrder,
    rules: FieldRules,
}

impl HtmlClassExtractor {
    pub fn new(order: SelectionOrder) -> Self {
        HtmlClassExtractor {
            order,
            rules: FieldRules::new(),
        }
    }

    /// Extract a recipe, falling back to defaults for anything missing.
    pub fn extract(&self, document: &Html) -> ParsedRecipe {
        debug!(
            "Attempting to extract recipe using HTML class matchers ({:?} order)",
            self.order
        );

        let rules = &self.rules;
        let first_text = |rule: &Rule| rule.first_value(document, self.order, element_text);

        let title = first_text(&rules.title).unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let ingredients = rules
            .ingredients
            .all_values(document, self.order, element_text);
        let instructions = rules
            .instructions
            .all_values(document, self.order, element_text);

        debug!("Recipe name: {}", title);
        debug!("Ingredients count: {}", ingredients.len());
        debug!("Instructions count: {}", instructions.len());

        ParsedRecipe {
            title: Some(title),
            description: first_text(&rules.description),
            image: rules.image.first_value(document, self.order, image_source),
            ingredients,
            instructions,
            servings: first_text(&rules.servings),
            cook_time: first_text(&rules.cook_time),
            prep_time: first_text(&rules.prep_time),
            total_time: first_text(&rules.total_time),
            ..Default::default()
        }
    }
}

impl Default for HtmlClassExtractor {
    fn default() -> Self {
        HtmlClassExtractor::new(SelectionOrder::default())
    }
}

impl Extractor for HtmlClassExtractor {
    fn name(&self) -> &'static str {
        "html_class"
    }

    fn parse(&self, document: &Html) -> Option<ParsedRecipe> {
        Some(self.extract(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_from_meta_tag() {
        let html = r#"
            <html>
            <head><meta property="og:image" content="https://example.com/tart.jpg"></head>
            <body></body>
            </html>
        "#;
        let document = Html::parse_document(html);

        let recipe = HtmlClassExtractor::default().extract(&document);
        assert_eq!(recipe.image.as_deref(), Some("https://example.com/tart.jpg"));
    }

    #[test]
    fn test_parse_always_returns_recipe() {
        let document = Html::parse_document("");
        assert!(HtmlClassExtractor::default().parse(&document).is_some());
    }
}
