//! Engine-specific plugin overlays
//!
//! An overlay is a small XML patch document named after a search engine
//! (`SearchOverlays/<engine>.xml`). Its root children are the actions to
//! apply to that engine's downloaded plugin definition:
//!
//! ```xml
//! <overlay>
//!   <replace target="//search:Url[@type='text/html']">
//!     <Url xmlns="http://www.mozilla.org/2006/browser/search/" … />
//!   </replace>
//!   <append parent="//search:SearchPlugin">
//!     <InputEncoding xmlns="…">UTF-8</InputEncoding>
//!   </append>
//! </overlay>
//! ```
//!
//! The whitespace bookkeeping below keeps the generated documents
//! human-readable; it has no effect on the XML semantics.

use std::fs::File;
use std::path::Path;

use crate::error::{Result, UpkeepError};
use crate::plugins::dom::{self, XmlElement, XmlNode};
use crate::plugins::xpath::PathSelector;

/// Namespace of search plugin documents
pub const SEARCH_NS: &str = "http://www.mozilla.org/2006/browser/search/";

/// Prefixes available to overlay selectors
pub const SELECTOR_NAMESPACES: &[(&str, &str)] = &[("search", SEARCH_NS)];

/// License header prepended to every generated plugin document
pub const LICENSE_HEADER: &str = "<!-- This Source Code Form is subject to the terms of the Mozilla Public\n   - License, v. 2.0. If a copy of the MPL was not distributed with this\n   - file, You can obtain one at http://mozilla.org/MPL/2.0/. -->\n\n";

/// One overlay action
#[derive(Debug, Clone)]
pub enum OverlayAction {
    /// Substitute every element matching `target` with `replacement`
    Replace {
        target: PathSelector,
        replacement: XmlElement,
    },
    /// Append `child` as the last child of every element matching `parent`
    Append {
        parent: PathSelector,
        child: XmlElement,
    },
}

/// A parsed overlay document
#[derive(Debug, Clone)]
pub struct Overlay {
    pub actions: Vec<OverlayAction>,
}

impl Overlay {
    /// Load the overlay for an engine, if one is defined.
    ///
    /// Returns `Ok(None)` when `<overlays_dir>/<engine>.xml` does not exist.
    pub fn load_for_engine(overlays_dir: &Path, engine: &str) -> Result<Option<Self>> {
        let path = overlays_dir.join(format!("{}.xml", engine));
        if !path.exists() {
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }

    /// Load and validate an overlay document
    pub fn load(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let file = File::open(path).map_err(|e| UpkeepError::FileReadFailed {
            path: display.clone(),
            reason: e.to_string(),
        })?;
        let root = dom::parse(file).map_err(|reason| UpkeepError::XmlParseFailed {
            path: display.clone(),
            reason,
        })?;
        Self::from_document(&root, &display)
    }

    fn from_document(root: &XmlElement, path: &str) -> Result<Self> {
        let invalid = |message: String| UpkeepError::OverlayInvalid {
            path: path.to_string(),
            message,
        };

        let mut actions = Vec::new();
        for idx in root.element_positions() {
            let Some(XmlNode::Element(action)) = root.children.get(idx) else {
                continue;
            };
            match action.local_name.as_str() {
                "replace" => {
                    let target = action
                        .attribute("target")
                        .ok_or_else(|| invalid("replace action has no target".to_string()))?;
                    let replacement = first_element_child(action)
                        .ok_or_else(|| invalid("replace action has no child element".to_string()))?;
                    actions.push(OverlayAction::Replace {
                        target: PathSelector::parse(target, SELECTOR_NAMESPACES)?,
                        replacement: replacement.clone(),
                    });
                }
                "append" => {
                    let parent = action
                        .attribute("parent")
                        .ok_or_else(|| invalid("append action has no parent".to_string()))?;
                    let child = first_element_child(action)
                        .ok_or_else(|| invalid("append action has no child element".to_string()))?;
                    actions.push(OverlayAction::Append {
                        parent: PathSelector::parse(parent, SELECTOR_NAMESPACES)?,
                        child: child.clone(),
                    });
                }
                // Unknown action elements are ignored, matching the
                // tolerant reading the tool has always had.
                _ => {}
            }
        }

        Ok(Self { actions })
    }

    /// Apply all actions to a plugin document root, in order
    pub fn apply(&self, document: &mut XmlElement) {
        for action in &self.actions {
            match action {
                OverlayAction::Replace {
                    target,
                    replacement,
                } => replace_all(document, target, replacement),
                OverlayAction::Append { parent, child } => append_all(document, parent, child),
            }
        }
    }
}

/// Substitute each matching element with a copy of the replacement.
///
/// The text node that follows a match (its trailing whitespace) stays in
/// place, so the replacement inherits the original's tail.
fn replace_all(document: &mut XmlElement, target: &PathSelector, replacement: &XmlElement) {
    for path in target.find_paths(document) {
        // The document root itself cannot be replaced; it has no parent.
        let Some((&last, parent_path)) = path.split_last() else {
            continue;
        };
        if let Some(parent) = document.descend_mut(parent_path) {
            if matches!(parent.children.get(last), Some(XmlNode::Element(_))) {
                parent.children[last] = XmlNode::Element(replacement.clone());
            }
        }
    }
}

/// Append a copy of the child as the last child of each matching parent,
/// then fix up whitespace: the new element's tail becomes a newline, and
/// the previously-last element's tail is reconciled to the tail of the
/// sibling before it, continuing the document's indentation pattern.
fn append_all(document: &mut XmlElement, parent: &PathSelector, child: &XmlElement) {
    for path in parent.find_paths(document) {
        let Some(element) = document.descend_mut(&path) else {
            continue;
        };

        let positions = element.element_positions();
        if let [.., before_last, last] = positions[..] {
            let pattern = match element.children.get(before_last + 1) {
                Some(XmlNode::Text(text)) => Some(text.clone()),
                _ => None,
            };
            let last_has_tail =
                matches!(element.children.get(last + 1), Some(XmlNode::Text(_)));
            match (last_has_tail, pattern) {
                (true, Some(text)) => element.children[last + 1] = XmlNode::Text(text),
                (true, None) => {
                    element.children.remove(last + 1);
                }
                (false, Some(text)) => element.children.insert(last + 1, XmlNode::Text(text)),
                (false, None) => {}
            }
        }

        element.children.push(XmlNode::Element(child.clone()));
        element.children.push(XmlNode::Text("\n".to_string()));
    }
}

/// Serialize a patched plugin document with the fixed license header
pub fn serialize_with_header(document: &XmlElement, path: &str) -> Result<String> {
    let body = dom::write(document).map_err(|e| UpkeepError::XmlWriteFailed {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    let mut contents = String::with_capacity(LICENSE_HEADER.len() + body.len() + 1);
    contents.push_str(LICENSE_HEADER);
    contents.push_str(&body);
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    Ok(contents)
}

fn first_element_child(element: &XmlElement) -> Option<&XmlElement> {
    element.children.iter().find_map(|node| match node {
        XmlNode::Element(el) => Some(el),
        _ => None,
    })
}
