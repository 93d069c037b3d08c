//! In-memory Document
//!
//! A page made of static markup interleaved with addressable containers.
//! Container content lives behind shared slots, so a [`ContainerHandle`]
//! handed to the loader writes straight into the document it came from.

use std::cell::RefCell;
use std::rc::Rc;

use super::{Container, Page};
use crate::view::{escape_text, View};

type Slot = Rc<RefCell<String>>;

#[derive(Debug, Clone)]
enum Segment {
    Markup(String),
    Container { id: String, slot: Slot },
}

/// In-memory page
#[derive(Debug, Clone, Default)]
pub struct Document {
    segments: Vec<Segment>,
}

/// Handle to one container of a [`Document`]
#[derive(Debug, Clone)]
pub struct ContainerHandle {
    id: String,
    slot: Slot,
}

impl ContainerHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current inner markup
    pub fn inner_html(&self) -> String {
        self.slot.borrow().clone()
    }
}

impl Container for ContainerHandle {
    fn render(&self, view: &View) {
        *self.slot.borrow_mut() = view.to_html();
    }
}

impl Document {
    /// Create an empty document with no containers
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document holding one empty `<div>` per id
    pub fn with_containers<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut document = Self::new();
        for id in ids {
            document.add_container(id, "");
        }
        document
    }

    /// Append a `<div>` container with some initial inner markup
    pub fn add_container(&mut self, id: impl Into<String>, initial: impl Into<String>) {
        let id = id.into();
        self.push_markup(format!("<div id=\"{}\">", escape_text(&id)));
        self.push_container(id, initial.into());
        self.push_markup("</div>");
    }

    pub(crate) fn push_markup(&mut self, markup: impl Into<String>) {
        let markup = markup.into();
        if markup.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(Segment::Markup(existing)) => existing.push_str(&markup),
            _ => self.segments.push(Segment::Markup(markup)),
        }
    }

    pub(crate) fn push_container(&mut self, id: String, inner: String) {
        self.segments.push(Segment::Container {
            id,
            slot: Rc::new(RefCell::new(inner)),
        });
    }

    /// Whether a container with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.container(id).is_some()
    }

    /// Ids of all containers in document order
    pub fn container_ids(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Container { id, .. } => Some(id.as_str()),
                Segment::Markup(_) => None,
            })
            .collect()
    }

    /// Inner markup of a container
    pub fn inner_html(&self, id: &str) -> Option<String> {
        self.container(id).map(|handle| handle.inner_html())
    }

    /// Serialize the whole document
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Markup(markup) => html.push_str(markup),
                Segment::Container { slot, .. } => html.push_str(&slot.borrow()),
            }
        }
        html
    }
}

impl Page for Document {
    type Container = ContainerHandle;

    // First match wins, like getElementById.
    fn container(&self, id: &str) -> Option<ContainerHandle> {
        self.segments.iter().find_map(|segment| match segment {
            Segment::Container { id: own, slot } if own == id => Some(ContainerHandle {
                id: own.clone(),
                slot: Rc::clone(slot),
            }),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_container() {
        let document = Document::with_containers(["assignment-container"]);
        assert!(document.contains("assignment-container"));
        assert!(document.container("tips-container").is_none());
    }

    #[test]
    fn test_render_through_handle() {
        let document = Document::with_containers(["tips-container"]);
        let handle = document.container("tips-container").unwrap();

        handle.render(&View::no_tips());

        assert_eq!(
            document.inner_html("tips-container").as_deref(),
            Some("<p>No tips found.</p>")
        );
        assert_eq!(
            document.to_html(),
            "<div id=\"tips-container\"><p>No tips found.</p></div>"
        );
    }

    #[test]
    fn test_initial_content_is_kept_until_render() {
        let mut document = Document::new();
        document.add_container("assignment-container", "<em>loading</em>");
        assert_eq!(
            document.inner_html("assignment-container").as_deref(),
            Some("<em>loading</em>")
        );
    }

    #[test]
    fn test_container_ids_in_order() {
        let document = Document::with_containers(["a", "b"]);
        assert_eq!(document.container_ids(), vec!["a", "b"]);
    }
}
