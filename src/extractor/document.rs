//! Best-effort queries over a parsed page.
//!
//! Nothing here fails: a selector that does not parse, a missing element or a malformed
//! JSON-LD block just yields `None` (and a debug log line), so extraction can carry on with
//! whatever it already has.

use scraper::{Html, Selector};
use serde_json::Value;

pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Text of the `<title>` element, trimmed. Empty when the page has none.
    pub fn title(&self) -> String {
        self.element_text("title").unwrap_or_default()
    }

    /// Text of the first element matching `selector`, even if it is empty.
    pub fn element_text(&self, selector: &str) -> Option<String> {
        let selector = parse_selector(selector)?;
        self.html
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
    }

    /// Text of the first element matching `selector` whose text is not blank.
    pub fn non_empty_text(&self, selector: &str) -> Option<String> {
        let selector = parse_selector(selector)?;
        self.html
            .select(&selector)
            .map(|element| element.text().collect::<String>().trim().to_string())
            .find(|text| !text.is_empty())
    }

    /// Probes `selectors` in order and returns the first non-blank text along with the
    /// selector that produced it.
    pub fn first_text<'s>(&self, selectors: &[&'s str]) -> Option<(String, &'s str)> {
        selectors
            .iter()
            .find_map(|selector| self.non_empty_text(selector).map(|text| (text, *selector)))
    }

    pub fn attribute(&self, selector: &str, attribute: &str) -> Option<String> {
        let selector = parse_selector(selector)?;
        self.html
            .select(&selector)
            .filter_map(|element| element.value().attr(attribute))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Every JSON-LD object embedded in the page. Top-level arrays are flattened.
    pub fn structured_data(&self) -> Vec<Value> {
        let Some(selector) = parse_selector(r#"script[type="application/ld+json"]"#) else {
            return Vec::new();
        };

        let mut blocks = Vec::new();
        for script in self.html.select(&selector) {
            let raw = script.text().collect::<String>();
            match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Array(items)) => blocks.extend(items),
                Ok(value) => blocks.push(value),
                Err(e) => log::debug!("Skipping malformed structured data block: {}", e),
            }
        }
        blocks
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::debug!("Skipping unparsable selector {:?}: {:?}", selector, e);
            None
        }
    }
}
