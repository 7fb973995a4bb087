//! Remote plugin directory listing
//!
//! The hosted-repository browse endpoint serves an HTML page; the file
//! names are the text of anchor elements with class `list`.

use scraper::{Html, Selector};

use crate::error::{Result, UpkeepError};

const ANCHOR_SELECTOR: &str = "a.list";

/// Extract plugin file names from a listing page
pub fn parse_listing(html: &str) -> Result<Vec<String>> {
    let selector =
        Selector::parse(ANCHOR_SELECTOR).map_err(|e| UpkeepError::SelectorInvalid {
            selector: ANCHOR_SELECTOR.to_string(),
            message: e.to_string(),
        })?;

    let document = Html::parse_document(html);
    let names = document
        .select(&selector)
        .map(|anchor| anchor.text().collect::<String>().trim().to_string())
        // Listing entries are flat filenames; anything else is noise.
        .filter(|name| !name.is_empty() && !name.contains('/'))
        .collect();
    Ok(names)
}
