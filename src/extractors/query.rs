use std::collections::HashSet;

use log::warn;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;

/// How matches from several selector patterns are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionOrder {
    /// Take matches pattern by pattern, in the order the patterns are listed.
    #[default]
    Pattern,
    /// Query all patterns at once and take matches in document order.
    Document,
}

/// An ordered list of selector patterns used to locate one recipe field.
pub(crate) struct Rule {
    patterns: Vec<Selector>,
    combined: Option<Selector>,
}

impl Rule {
    pub(crate) fn new(patterns: &[&str]) -> Self {
        let mut valid = Vec::with_capacity(patterns.len());
        let mut compiled = Vec::with_capacity(patterns.len());

        for pattern in patterns {
            match Selector::parse(pattern) {
                Ok(selector) => {
                    valid.push(*pattern);
                    compiled.push(selector);
                }
                Err(e) => warn!("Skipping invalid selector '{}': {:?}", pattern, e),
            }
        }

        let combined = if valid.is_empty() {
            None
        } else {
            Selector::parse(&valid.join(", ")).ok()
        };

        Rule {
            patterns: compiled,
            combined,
        }
    }

    /// Value of the first matching element.
    ///
    /// Only that element is considered: when `extract` yields nothing for it
    /// the field is absent.
    pub(crate) fn first_value<'a, T>(
        &self,
        document: &'a Html,
        order: SelectionOrder,
        extract: impl Fn(ElementRef<'a>) -> Option<T>,
    ) -> Option<T> {
        let first = match order {
            SelectionOrder::Pattern => self
                .patterns
                .iter()
                .find_map(|selector| document.select(selector).next()),
            SelectionOrder::Document => self
                .combined
                .as_ref()
                .and_then(|selector| document.select(selector).next()),
        };
        first.and_then(extract)
    }

    /// Values of every element matching any pattern, each element once.
    ///
    /// Pattern order lists the matches of each pattern in turn; document
    /// order lists all matches as they appear in the page.
    pub(crate) fn all_values<'a, T>(
        &self,
        document: &'a Html,
        order: SelectionOrder,
        extract: impl Fn(ElementRef<'a>) -> Option<T>,
    ) -> Vec<T> {
        match order {
            SelectionOrder::Pattern => {
                let mut seen = HashSet::new();
                self.patterns
                    .iter()
                    .flat_map(|selector| document.select(selector))
                    .filter(|element| seen.insert(element.id()))
                    .filter_map(extract)
                    .collect()
            }
            SelectionOrder::Document => match &self.combined {
                Some(selector) => document.select(selector).filter_map(extract).collect(),
                None => Vec::new(),
            },
        }
    }
}

/// Trimmed text content of an element, `None` when blank.
pub(crate) fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
