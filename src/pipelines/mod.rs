//! End-to-end flows: raw HTML to recipe, and URL to recipe.

pub mod html;
pub mod url;
