//! Path selectors for overlay targets
//!
//! Overlay actions address elements with a small XPath subset: child steps
//! (`/Root/Child`), descendant steps (`//Name`), optional namespace
//! prefixes and optional `[@attr='value']` predicates. That covers the
//! whole overlay corpus; anything else is rejected up front.
//!
//! Unprefixed step names match on local name alone; a prefixed name must
//! also match the prefix's namespace URI.

use crate::error::{Result, UpkeepError};
use crate::plugins::dom::{XmlElement, XmlNode};

/// One step of a parsed selector
#[derive(Debug, Clone, PartialEq)]
struct Step {
    /// Resolved namespace URI when the step name carried a prefix
    namespace: Option<String>,
    local_name: String,
    /// Required attribute, as `[@name='value']`
    predicate: Option<(String, String)>,
    /// True when the step was written with `//`
    descendant: bool,
}

/// A parsed selector, applied from the document node
#[derive(Debug, Clone, PartialEq)]
pub struct PathSelector {
    steps: Vec<Step>,
}

impl PathSelector {
    /// Parse a selector, resolving prefixes against `namespaces`
    /// (`(prefix, uri)` pairs).
    pub fn parse(selector: &str, namespaces: &[(&str, &str)]) -> Result<Self> {
        let invalid = |message: &str| UpkeepError::SelectorInvalid {
            selector: selector.to_string(),
            message: message.to_string(),
        };

        if !selector.starts_with('/') {
            return Err(invalid("selector must start with '/' or '//'"));
        }

        let mut steps = Vec::new();
        let mut rest = selector;
        while !rest.is_empty() {
            let descendant = if let Some(stripped) = rest.strip_prefix("//") {
                rest = stripped;
                true
            } else if let Some(stripped) = rest.strip_prefix('/') {
                rest = stripped;
                false
            } else {
                return Err(invalid("expected '/' between steps"));
            };

            let end = rest.find('/').unwrap_or(rest.len());
            let (token, remainder) = rest.split_at(end);
            rest = remainder;

            if token.is_empty() {
                return Err(invalid("empty step name"));
            }

            let (name_part, predicate) = match token.find('[') {
                Some(open) => {
                    let (name, pred) = token.split_at(open);
                    (name, Some(parse_predicate(pred).ok_or_else(|| {
                        invalid("predicates must have the form [@attr='value']")
                    })?))
                }
                None => (token, None),
            };

            let (namespace, local_name) = match name_part.split_once(':') {
                Some((prefix, local)) => {
                    let uri = namespaces
                        .iter()
                        .find(|(p, _)| *p == prefix)
                        .map(|(_, uri)| uri.to_string())
                        .ok_or_else(|| invalid("unknown namespace prefix"))?;
                    (Some(uri), local.to_string())
                }
                None => (None, name_part.to_string()),
            };

            if local_name.is_empty() {
                return Err(invalid("empty step name"));
            }

            steps.push(Step {
                namespace,
                local_name,
                predicate,
                descendant,
            });
        }

        Ok(Self { steps })
    }

    /// Find all matching elements under `root`, returned as child-index
    /// paths (the empty path is the root element itself). Paths come back
    /// in document order.
    pub fn find_paths(&self, root: &XmlElement) -> Vec<Vec<usize>> {
        // The virtual document node has the root element as its only child.
        let mut current: Vec<Vec<usize>> = Vec::new();
        let mut first = true;

        for step in &self.steps {
            let mut next: Vec<Vec<usize>> = Vec::new();
            if first {
                if step.descendant {
                    if step_matches(root, step) {
                        next.push(Vec::new());
                    }
                    collect_descendants(root, step, &mut Vec::new(), &mut next);
                } else if step_matches(root, step) {
                    next.push(Vec::new());
                }
                first = false;
            } else {
                for path in &current {
                    let Some(element) = root.descend(path) else {
                        continue;
                    };
                    if step.descendant {
                        collect_descendants(element, step, &mut path.clone(), &mut next);
                    } else {
                        for idx in element.element_positions() {
                            if let Some(XmlNode::Element(child)) = element.children.get(idx) {
                                if step_matches(child, step) {
                                    let mut child_path = path.clone();
                                    child_path.push(idx);
                                    next.push(child_path);
                                }
                            }
                        }
                    }
                }
            }
            // Overlapping descendant steps can visit a node twice; keep the
            // first occurrence so results stay in document order.
            let mut seen = std::collections::HashSet::new();
            next.retain(|p| seen.insert(p.clone()));
            current = next;
        }

        current
    }
}

fn parse_predicate(token: &str) -> Option<(String, String)> {
    let inner = token.strip_prefix("[@")?.strip_suffix(']')?;
    let (attr, quoted) = inner.split_once('=')?;
    let value = quoted
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .or_else(|| quoted.strip_prefix('"').and_then(|v| v.strip_suffix('"')))?;
    if attr.is_empty() {
        return None;
    }
    Some((attr.to_string(), value.to_string()))
}

fn step_matches(element: &XmlElement, step: &Step) -> bool {
    if element.local_name != step.local_name {
        return false;
    }
    if let Some(ref uri) = step.namespace {
        if element.namespace.as_deref() != Some(uri.as_str()) {
            return false;
        }
    }
    if let Some((ref attr, ref value)) = step.predicate {
        if element.attribute(attr) != Some(value.as_str()) {
            return false;
        }
    }
    true
}

/// Collect paths of all strict descendants of `element` matching `step`
fn collect_descendants(
    element: &XmlElement,
    step: &Step,
    path: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    for idx in element.element_positions() {
        if let Some(XmlNode::Element(child)) = element.children.get(idx) {
            path.push(idx);
            if step_matches(child, step) {
                out.push(path.clone());
            }
            collect_descendants(child, step, path, out);
            path.pop();
        }
    }
}
