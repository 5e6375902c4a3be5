//! Read-only snapshot of a parsed page
//!
//! The DOM from scraper is not `Sync`, so everything the scorers need is
//! extracted once into owned data. The snapshot can then be shared freely
//! across threads.

use crate::HeadingCounts;
use scraper::{Html, Selector};
use std::sync::LazyLock;

const TITLE_SELECTOR_STR: &str = "title";
const META_DESCRIPTION_SELECTOR_STR: &str = "meta[name='description']";
const HEADING_SELECTOR_STR: &str = "h1, h2, h3";
const IMAGE_SELECTOR_STR: &str = "img";
const FORM_SELECTOR_STR: &str = "form";
const INPUT_SELECTOR_STR: &str = "input";
const LABEL_SELECTOR_STR: &str = "label";
const BODY_SELECTOR_STR: &str = "body";

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(TITLE_SELECTOR_STR).expect("Failed to parse title selector - this is a bug")
});

static META_DESCRIPTION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(META_DESCRIPTION_SELECTOR_STR)
        .expect("Failed to parse meta description selector - this is a bug")
});

static HEADING_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(HEADING_SELECTOR_STR)
        .expect("Failed to parse heading selector - this is a bug")
});

static IMAGE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(IMAGE_SELECTOR_STR).expect("Failed to parse image selector - this is a bug")
});

static FORM_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(FORM_SELECTOR_STR).expect("Failed to parse form selector - this is a bug")
});

static INPUT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(INPUT_SELECTOR_STR).expect("Failed to parse input selector - this is a bug")
});

static LABEL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(LABEL_SELECTOR_STR).expect("Failed to parse label selector - this is a bug")
});

static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(BODY_SELECTOR_STR).expect("Failed to parse body selector - this is a bug")
});

/// A heading element (h1..h3)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
}

/// An `<img>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageElement {
    /// Alt attribute value; `None` when the attribute is absent
    pub alt: Option<String>,
}

impl ImageElement {
    pub fn has_alt_attribute(&self) -> bool {
        self.alt.is_some()
    }

    /// Alt attribute present and non-empty
    pub fn has_alt_text(&self) -> bool {
        self.alt.as_deref().is_some_and(|a| !a.is_empty())
    }
}

/// A `<form>` element with the inputs and labels nested inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormElement {
    pub input_count: usize,
    pub label_count: usize,
}

/// Everything the track scorers read from one page
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentModel {
    raw: String,
    title: Option<String>,
    meta_description: Option<Option<String>>,
    headings: Vec<Heading>,
    images: Vec<ImageElement>,
    forms: Vec<FormElement>,
    input_count: usize,
    label_count: usize,
    body_text_len: usize,
}

impl DocumentModel {
    /// Extract the snapshot from a parsed DOM
    pub fn from_html(raw: String, html: &Html) -> Self {
        let title = html
            .select(&TITLE_SELECTOR)
            .next()
            .map(|el| el.text().collect::<String>());

        let meta_description = html
            .select(&META_DESCRIPTION_SELECTOR)
            .next()
            .map(|el| el.value().attr("content").map(str::to_string));

        let headings = html
            .select(&HEADING_SELECTOR)
            .filter_map(|el| {
                let level = match el.value().name() {
                    "h1" => 1,
                    "h2" => 2,
                    "h3" => 3,
                    _ => return None,
                };
                Some(Heading { level })
            })
            .collect();

        let images = html
            .select(&IMAGE_SELECTOR)
            .map(|el| ImageElement {
                alt: el.value().attr("alt").map(str::to_string),
            })
            .collect();

        let forms = html
            .select(&FORM_SELECTOR)
            .map(|form| FormElement {
                input_count: form.select(&INPUT_SELECTOR).count(),
                label_count: form.select(&LABEL_SELECTOR).count(),
            })
            .collect();

        let body_text_len = html
            .select(&BODY_SELECTOR)
            .next()
            .map(|body| body.text().map(|t| t.chars().count()).sum())
            .unwrap_or(0);

        Self {
            title,
            meta_description,
            headings,
            images,
            forms,
            input_count: html.select(&INPUT_SELECTOR).count(),
            label_count: html.select(&LABEL_SELECTOR).count(),
            body_text_len,
            raw,
        }
    }

    /// The raw markup as fetched
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Page weight in bytes (UTF-8)
    pub fn byte_len(&self) -> usize {
        self.raw.len()
    }

    /// Text of the first `<title>`, if present and non-empty (not trimmed)
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Whether a `<meta name="description">` element exists at all
    pub fn has_meta_description_tag(&self) -> bool {
        self.meta_description.is_some()
    }

    /// Non-empty `content` of the meta description
    pub fn meta_description(&self) -> Option<&str> {
        self.meta_description
            .as_ref()
            .and_then(|c| c.as_deref())
            .filter(|c| !c.is_empty())
    }

    /// Headings h1..h3 in document order
    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    pub fn heading_count(&self, level: u8) -> usize {
        self.headings.iter().filter(|h| h.level == level).count()
    }

    pub fn heading_counts(&self) -> HeadingCounts {
        HeadingCounts {
            h1: self.heading_count(1),
            h2: self.heading_count(2),
            h3: self.heading_count(3),
        }
    }

    pub fn images(&self) -> &[ImageElement] {
        &self.images
    }

    /// Images with no alt attribute at all
    pub fn images_without_alt(&self) -> usize {
        self.images.iter().filter(|i| !i.has_alt_attribute()).count()
    }

    /// Images whose alt attribute is absent or empty
    pub fn images_without_alt_text(&self) -> usize {
        self.images.iter().filter(|i| !i.has_alt_text()).count()
    }

    pub fn forms(&self) -> &[FormElement] {
        &self.forms
    }

    /// `<input>` elements anywhere in the document
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// `<label>` elements anywhere in the document
    pub fn label_count(&self) -> usize {
        self.label_count
    }

    /// Character length of the body's text content
    pub fn body_text_len(&self) -> usize {
        self.body_text_len
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn arbitrary_markup() -> impl Strategy<Value = String> {
        let fragment = prop::sample::select(vec![
            "<title>", "</title>", "<h1>", "</h1>", "<h2>", "<h3>", "<img alt=\"a\">", "<img>",
            "<form>", "<input>", "<label>", "</form>", "<body>", "<meta name=\"description\" content=\"d\">",
            "text", " ", "<", ">", "&amp;", "<!--", "-->",
        ]);
        prop::collection::vec(fragment, 0..80).prop_map(|parts| parts.concat())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn extraction_never_panics(ref input in ".{0,500}") {
            let html = Html::parse_document(input);
            let doc = DocumentModel::from_html(input.clone(), &html);
            prop_assert_eq!(doc.byte_len(), input.len());
        }

        #[test]
        fn counts_are_consistent(ref input in arbitrary_markup()) {
            let html = Html::parse_document(input);
            let doc = DocumentModel::from_html(input.clone(), &html);
            prop_assert!(doc.images_without_alt() <= doc.images_without_alt_text());
            prop_assert!(doc.images_without_alt_text() <= doc.images().len());
            let counts = doc.heading_counts();
            prop_assert_eq!(counts.h1 + counts.h2 + counts.h3, doc.headings().len());
        }
    }
}
