//! Parser module for fetched HTML pages

pub mod document;
pub mod html;
pub mod markup;

pub use document::{DocumentModel, FormElement, Heading, ImageElement};
pub use html::{decode_markup, HtmlParser};
pub use markup::{contains_any, contains_ignore_ascii_case, count_occurrences};
