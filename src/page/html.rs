//! HTML Page Templates
//!
//! Builds a [`Document`] from an existing HTML page. The template goes
//! through a full HTML parser, so attribute quoting, comments and implied
//! end tags follow the browser's rules. Elements whose `id` names one of the
//! requested containers become addressable.
//!
//! The page is re-serialized from the parsed tree: markup outside the
//! containers keeps its content but is normalized (quoted attributes,
//! implied `<head>`/`<body>`, closed elements).

use scraper::node::{Node, Text};
use scraper::{Html, Selector};
use uuid::Uuid;

use super::{Document, PageError};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// A container found in the parsed tree
struct Found {
    id: String,
    marker: String,
    inner: String,
}

impl Document {
    /// Parse `template`, exposing the elements whose id is in `ids` as
    /// containers. Ids missing from the template are simply absent.
    ///
    /// The first element with a given id wins. A container nested inside
    /// another container is not addressable.
    pub fn parse_html(template: &str, ids: &[&str]) -> Result<Self, PageError> {
        let full_document = is_full_document(template);
        let mut html = if full_document {
            Html::parse_document(template)
        } else {
            Html::parse_fragment(template)
        };

        let with_id = Selector::parse("[id]").map_err(|e| PageError::Selector(e.to_string()))?;

        let mut claimed = Vec::new();
        let mut found: Vec<Found> = Vec::new();

        for element in html.select(&with_id) {
            let Some(id) = element.value().id() else {
                continue;
            };
            if !ids.contains(&id) || found.iter().any(|f| f.id == id) {
                continue;
            }
            if element.ancestors().any(|node| claimed.contains(&node.id())) {
                continue;
            }

            let tag = element.value().name();
            if VOID_ELEMENTS.contains(&tag) {
                return Err(PageError::VoidElement {
                    id: id.to_string(),
                    tag: tag.to_string(),
                });
            }

            claimed.push(element.id());
            found.push(Found {
                id: id.to_string(),
                marker: format!("secret-snake-slot-{}", Uuid::new_v4().simple()),
                inner: element.inner_html(),
            });
        }

        // Swap each container's children for a marker, then cut the
        // serialized page at the markers.
        for (node_id, container) in claimed.iter().zip(&found) {
            if let Some(mut node) = html.tree.get_mut(*node_id) {
                while let Some(mut child) = node.first_child() {
                    child.detach();
                }
                node.append(Node::Text(Text {
                    text: container.marker.as_str().into(),
                }));
            }
        }

        let mut rest = if full_document {
            html.html()
        } else {
            html.root_element().inner_html()
        };

        let mut document = Document::new();
        for container in found {
            let Some((before, after)) = rest.split_once(&container.marker) else {
                continue;
            };
            document.push_markup(before);
            document.push_container(container.id, container.inner);
            rest = after.to_string();
        }
        document.push_markup(rest);

        tracing::debug!(
            containers = ?document.container_ids(),
            parse_errors = html.errors.len(),
            "Parsed page template"
        );
        Ok(document)
    }
}

/// Whether `template` is a whole page rather than a fragment
fn is_full_document(template: &str) -> bool {
    let head: String = template.trim_start().chars().take(9).collect();
    let head = head.to_ascii_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}
