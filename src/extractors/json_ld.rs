use super::Extractor;
use crate::model::ParsedRecipe;
use log::debug;
use scraper::{Html, Selector};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

const RECIPE_TYPE: &str = "Recipe";

pub struct JsonLdExtractor;

/// A schema.org Recipe as published by the site.
///
/// Every field is decoded leniently: a value of an unexpected shape becomes
/// `None` instead of failing the whole record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonLdRecipe {
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    description: Option<DescriptionType>,
    #[serde(default, deserialize_with = "lenient")]
    image: Option<ImageType>,
    #[serde(default, deserialize_with = "lenient")]
    recipe_ingredient: Option<RecipeIngredients>,
    #[serde(default, deserialize_with = "lenient")]
    recipe_instructions: Option<RecipeInstructions>,
    #[serde(default, deserialize_with = "lenient")]
    recipe_yield: Option<RecipeYield>,
    #[serde(default, deserialize_with = "lenient")]
    cook_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    prep_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    total_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    aggregate_rating: Option<AggregateRating>,
    #[serde(default, deserialize_with = "lenient")]
    author: Option<Author>,
    #[serde(default, deserialize_with = "lenient")]
    recipe_cuisine: Option<TextList>,
    #[serde(default, deserialize_with = "lenient")]
    recipe_category: Option<TextList>,
    #[serde(default, deserialize_with = "lenient")]
    keywords: Option<TextList>,
}

#[derive(Debug, Deserialize)]
struct TextObject {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DescriptionType {
    String(String),
    Object(TextObject),
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageEntry {
    String(String),
    Object(ImageObject),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageType {
    Single(ImageEntry),
    // potentially multiple images, first one wins
    Multiple(Vec<ImageEntry>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeIngredients {
    String(String),
    Multiple(Vec<Value>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeInstructions {
    String(String),
    Multiple(Vec<InstructionEntry>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstructionEntry {
    Text(String),
    Section(HowToSection),
    Step(HowToStep),
    Nested(Vec<InstructionEntry>),
    Unknown(IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct HowToStep {
    #[serde(default, deserialize_with = "lenient")]
    text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HowToSection {
    #[serde(rename = "itemListElement")]
    item_list_element: Vec<InstructionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeYield {
    String(String),
    Number(Number),
    Array(Vec<Value>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregateRating {
    #[serde(default, deserialize_with = "lenient")]
    rating_value: Option<RatingValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RatingValue {
    Number(f64),
    String(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Author {
    String(String),
    Object(AuthorObject),
    Multiple(Vec<Author>),
}

#[derive(Debug, Deserialize)]
struct AuthorObject {
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextList {
    Multiple(Vec<Value>),
    Single(Value),
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Text form of a string or number; anything else has none.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl InstructionEntry {
    fn collect_texts(self, texts: &mut Vec<String>) {
        match self {
            InstructionEntry::Text(text) => texts.push(text),
            InstructionEntry::Section(section) => {
                for entry in section.item_list_element {
                    entry.collect_texts(texts);
                }
            }
            // Prefer text over name
            InstructionEntry::Step(step) => {
                if let Some(text) = step.text.or(step.name) {
                    texts.push(text);
                }
            }
            InstructionEntry::Nested(entries) => {
                for entry in entries {
                    entry.collect_texts(texts);
                }
            }
            InstructionEntry::Unknown(_) => {}
        }
    }
}

impl Author {
    fn collect_names(self, names: &mut Vec<String>) {
        match self {
            Author::String(name) => names.push(name),
            Author::Object(obj) => names.extend(obj.name),
            Author::Multiple(authors) => {
                for author in authors {
                    author.collect_names(names);
                }
            }
        }
    }
}

impl TextList {
    fn joined(self) -> Option<String> {
        let texts = self.into_vec()?;
        if texts.is_empty() {
            None
        } else {
            Some(texts.join(", "))
        }
    }

    fn into_vec(self) -> Option<Vec<String>> {
        match self {
            TextList::Multiple(values) => Some(values.iter().filter_map(scalar_text).collect()),
            TextList::Single(value) => scalar_text(&value).map(|text| vec![text]),
        }
    }
}

impl From<JsonLdRecipe> for ParsedRecipe {
    fn from(json_ld_recipe: JsonLdRecipe) -> Self {
        let image = json_ld_recipe.image.and_then(|img| {
            let entry = match img {
                ImageType::Single(entry) => Some(entry),
                ImageType::Multiple(entries) => entries.into_iter().next(),
            };
            entry.map(|entry| match entry {
                ImageEntry::String(url) => url,
                ImageEntry::Object(obj) => obj.url,
            })
        });

        let ingredients = match json_ld_recipe.recipe_ingredient {
            Some(RecipeIngredients::String(ingredient)) => vec![ingredient],
            Some(RecipeIngredients::Multiple(ingredients)) => ingredients
                .into_iter()
                .filter_map(|ingredient| match ingredient {
                    Value::String(text) => Some(text),
                    _ => None,
                })
                .collect(),
            None => Vec::new(),
        };

        let instructions = match json_ld_recipe.recipe_instructions {
            Some(RecipeInstructions::String(instructions)) => vec![instructions],
            Some(RecipeInstructions::Multiple(entries)) => {
                let mut texts = Vec::new();
                for entry in entries {
                    entry.collect_texts(&mut texts);
                }
                texts
            }
            None => Vec::new(),
        };

        let servings = json_ld_recipe.recipe_yield.and_then(|yield_val| match yield_val {
            RecipeYield::String(s) => Some(s),
            RecipeYield::Number(n) => Some(n.to_string()),
            // For arrays, prefer the descriptive version (e.g., "4 servings") over just the number
            RecipeYield::Array(arr) => {
                let texts: Vec<String> = arr.iter().filter_map(scalar_text).collect();
                let descriptive = texts.iter().position(|s| s.contains(char::is_alphabetic));
                texts.into_iter().nth(descriptive.unwrap_or(0))
            }
        });

        let rating = json_ld_recipe
            .aggregate_rating
            .and_then(|rating| rating.rating_value)
            .and_then(|value| match value {
                RatingValue::Number(n) => Some(n),
                RatingValue::String(s) => s.trim().parse().ok(),
            });

        let author = json_ld_recipe.author.and_then(|author| {
            let mut names = Vec::new();
            author.collect_names(&mut names);
            if names.is_empty() {
                None
            } else {
                Some(names.join(", "))
            }
        });

        ParsedRecipe {
            title: json_ld_recipe.name,
            description: json_ld_recipe.description.map(|desc| match desc {
                DescriptionType::String(d) => d,
                DescriptionType::Object(d) => d.text,
            }),
            image,
            ingredients,
            instructions,
            servings,
            cook_time: json_ld_recipe.cook_time,
            prep_time: json_ld_recipe.prep_time,
            total_time: json_ld_recipe.total_time,
            rating,
            author,
            cuisine: json_ld_recipe.recipe_cuisine.and_then(TextList::joined),
            course: json_ld_recipe.recipe_category.and_then(TextList::joined),
            tags: json_ld_recipe.keywords.and_then(TextList::into_vec),
        }
    }
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(type_str)) => type_str == RECIPE_TYPE,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(RECIPE_TYPE)),
        _ => false,
    }
}

fn find_recipe(json_ld: &Value) -> Option<&Value> {
    match json_ld {
        Value::Array(items) => items.iter().find(|item| is_recipe_type(item)),
        Value::Object(_) if is_recipe_type(json_ld) => Some(json_ld),
        Value::Object(_) => json_ld
            .get("@graph")
            .and_then(Value::as_array)
            .and_then(|items| items.iter().find(|item| is_recipe_type(item))),
        _ => None,
    }
}

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "json_ld"
    }

    fn parse(&self, document: &Html) -> Option<ParsedRecipe> {
        let Ok(selector) = Selector::parse("script[type='application/ld+json']") else {
            return None;
        };

        let Some(script) = document.select(&selector).next() else {
            debug!("JsonLdExtractor: No JSON-LD script tag found");
            return None;
        };

        let raw_json = script.text().collect::<String>();
        let json_ld = match serde_json::from_str::<Value>(&raw_json) {
            Ok(json_ld) => json_ld,
            Err(e) => {
                debug!("JsonLdExtractor: Failed to parse JSON-LD: {}", e);
                return None;
            }
        };

        let Some(recipe) = find_recipe(&json_ld) else {
            debug!("JsonLdExtractor: No Recipe object in JSON-LD");
            return None;
        };

        match JsonLdRecipe::deserialize(recipe) {
            Ok(recipe) => {
                debug!("JsonLdExtractor: Found recipe: {:?}", recipe.name);
                Some(ParsedRecipe::from(recipe))
            }
            Err(e) => {
                debug!("JsonLdExtractor: Failed to decode Recipe object: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_html_document(json_ld: &str) -> Html {
        let html = format!(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <script type="application/ld+json">
                    {json_ld}
                </script>
            </head>
            <body></body>
            </html>
            "#
        );
        Html::parse_document(&html)
    }

    #[test]
    fn test_lenient_fields_do_not_reject_record() {
        let json_ld = r#"
        {
            "@type": "Recipe",
            "name": 42,
            "image": true,
            "recipeYield": {"value": 4},
            "aggregateRating": "five stars",
            "recipeIngredient": ["flour", 3, null, "sugar"]
        }
        "#;

        let result = JsonLdExtractor
            .parse(&create_html_document(json_ld))
            .unwrap();

        assert_eq!(result.title, None);
        assert_eq!(result.image, None);
        assert_eq!(result.servings, None);
        assert_eq!(result.rating, None);
        assert_eq!(result.ingredients, vec!["flour", "sugar"]);
        assert!(result.instructions.is_empty());
    }

    #[test]
    fn test_nested_instruction_sections() {
        let json_ld = r#"
        {
            "@type": "Recipe",
            "recipeInstructions": [
                {
                    "@type": "HowToSection",
                    "name": "Dough",
                    "itemListElement": [
                        {"@type": "HowToStep", "text": "Knead"},
                        {"@type": "HowToStep", "name": "Rest"}
                    ]
                },
                [{"@type": "HowToStep", "text": "Shape"}],
                {"@type": "HowToStep"},
                7,
                "Bake"
            ]
        }
        "#;

        let result = JsonLdExtractor
            .parse(&create_html_document(json_ld))
            .unwrap();

        assert_eq!(result.instructions, vec!["Knead", "Rest", "Shape", "Bake"]);
    }

    #[test]
    fn test_numeric_yield_inside_array() {
        let json_ld = r#"{"@type": "Recipe", "recipeYield": [4]}"#;

        let result = JsonLdExtractor
            .parse(&create_html_document(json_ld))
            .unwrap();

        assert_eq!(result.servings.as_deref(), Some("4"));
    }

    #[test]
    fn test_mixed_yield_array_prefers_descriptive_entry() {
        let json_ld = r#"{"@type": "Recipe", "recipeYield": [6, null, "6 slices"]}"#;

        let result = JsonLdExtractor
            .parse(&create_html_document(json_ld))
            .unwrap();

        assert_eq!(result.servings.as_deref(), Some("6 slices"));
    }

    #[test]
    fn test_float_yield_keeps_json_form() {
        let json_ld = r#"{"@type": "Recipe", "recipeYield": 4.0}"#;

        let result = JsonLdExtractor
            .parse(&create_html_document(json_ld))
            .unwrap();

        assert_eq!(result.servings.as_deref(), Some("4.0"));
    }

    #[test]
    fn test_mixed_keyword_and_category_arrays() {
        let json_ld = r#"
        {
            "@type": "Recipe",
            "keywords": ["quick", 5, {"name": "ignored"}],
            "recipeCategory": ["Dessert", 2],
            "recipeCuisine": {"name": "French"}
        }
        "#;

        let result = JsonLdExtractor
            .parse(&create_html_document(json_ld))
            .unwrap();

        assert_eq!(result.tags, Some(vec!["quick".to_string(), "5".to_string()]));
        assert_eq!(result.course.as_deref(), Some("Dessert, 2"));
        assert_eq!(result.cuisine, None);
    }

    #[test]
    fn test_recipe_type_matching() {
        assert!(is_recipe_type(&serde_json::json!({"@type": "Recipe"})));
        assert!(is_recipe_type(
            &serde_json::json!({"@type": ["NewsArticle", "Recipe"]})
        ));
        assert!(!is_recipe_type(&serde_json::json!({"@type": "recipe"})));
        assert!(!is_recipe_type(&serde_json::json!({"name": "Recipe"})));
    }
}
