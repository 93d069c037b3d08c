//! Live DOM Page
//!
//! [`Page`] and [`Container`] over `web_sys`, plus the one-shot
//! page-ready hook.

use leptos::{mount_to, view};
use secret_snake::{Container, Page, View};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DocumentReadyState, Element, HtmlElement};

use crate::components::ContainerView;

/// The document the script runs in
pub struct BrowserPage {
    document: web_sys::Document,
}

impl BrowserPage {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    /// The current window's document, if there is one
    pub fn current() -> Option<Self> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(Self::new)
    }
}

impl Page for BrowserPage {
    type Container = DomContainer;

    fn container(&self, id: &str) -> Option<DomContainer> {
        self.document.get_element_by_id(id).map(DomContainer)
    }
}

/// A page element the loader renders into
pub struct DomContainer(Element);

impl Container for DomContainer {
    fn render(&self, view: &View) {
        // Drop whatever the element held before
        self.0.set_text_content(None);

        match self.0.dyn_ref::<HtmlElement>() {
            Some(element) => {
                let content = view.clone();
                mount_to(element.clone(), move || view! { <ContainerView content=content /> });
            }
            // Not an HTML element (e.g. SVG): plain text only
            None => self.0.set_text_content(Some(&view.text())),
        }
    }
}

/// Run `f` once the document has been parsed.
///
/// Runs immediately if `DOMContentLoaded` has already fired, which is the
/// usual case for a deferred WASM module.
pub fn on_dom_ready(f: impl FnOnce() + 'static) {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        web_sys::console::error_1(&"No document, page data not loaded".into());
        return;
    };

    if document.ready_state() != DocumentReadyState::Loading {
        f();
        return;
    }

    let callback = Closure::once_into_js(f);
    if let Err(e) =
        document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
    {
        web_sys::console::error_1(&format!("Failed to register ready handler: {:?}", e).into());
    }
}
