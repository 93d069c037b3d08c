//! Container View Component
//!
//! Turns a loader [`View`] into DOM nodes. Dynamic text is always a text
//! node, never parsed as markup.

use leptos::*;
use secret_snake::view::{View, ASSIGNMENT_PREFIX};

/// Content of one loader container
#[component]
pub fn ContainerView(content: View) -> impl IntoView {
    match content {
        View::Assignment { target } => view! {
            <p>{ASSIGNMENT_PREFIX}{target.to_string()}</p>
        }
        .into_view(),

        View::TipList { items } => view! {
            <ul>
                {items.into_iter().map(|item| view! { <li>{item}</li> }).collect_view()}
            </ul>
        }
        .into_view(),

        View::Notice { message } => view! { <p>{message}</p> }.into_view(),
    }
}
