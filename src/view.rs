//! Container Views
//!
//! What a container shows once its fetch has settled. Hosts decide how a
//! [`View`] reaches the screen: the native [`Document`](crate::page::Document)
//! serializes it with [`View::to_html`], the browser host builds DOM nodes.
//! Either way, dynamic text never becomes markup.

use serde::Serialize;

use crate::model::{Assignment, Tip, UserId};

/// Prefix of the assignment sentence
pub const ASSIGNMENT_PREFIX: &str = "You are assigned to buy a gift for: ";

/// Shown when `/users/assignment` answers with a non-OK status
pub const NO_ASSIGNMENT_MESSAGE: &str = "No assignment found.";

/// Shown when `/tips/me` answers with a non-OK status
pub const NO_TIPS_MESSAGE: &str = "No tips found.";

/// Rendered content of one container
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    /// A paragraph naming the assignment target
    Assignment { target: UserId },
    /// An unordered list, one item per tip, in received order
    TipList { items: Vec<String> },
    /// A paragraph with a fixed fallback message
    Notice { message: String },
}

impl View {
    pub fn assignment(assignment: &Assignment) -> Self {
        View::Assignment {
            target: assignment.assigned_user_id.clone(),
        }
    }

    pub fn tips(tips: &[Tip]) -> Self {
        View::TipList {
            items: tips.iter().map(|tip| tip.content.clone()).collect(),
        }
    }

    pub fn no_assignment() -> Self {
        View::Notice {
            message: NO_ASSIGNMENT_MESSAGE.to_string(),
        }
    }

    pub fn no_tips() -> Self {
        View::Notice {
            message: NO_TIPS_MESSAGE.to_string(),
        }
    }

    /// Visible text of the view, list items joined by newlines
    pub fn text(&self) -> String {
        match self {
            View::Assignment { target } => format!("{}{}", ASSIGNMENT_PREFIX, target),
            View::TipList { items } => items.join("\n"),
            View::Notice { message } => message.clone(),
        }
    }

    /// Serialize to markup, escaping every piece of dynamic text
    pub fn to_html(&self) -> String {
        match self {
            View::Assignment { target } => format!(
                "<p>{}{}</p>",
                ASSIGNMENT_PREFIX,
                escape_text(&target.to_string())
            ),
            View::TipList { items } => {
                let mut html = String::from("<ul>");
                for item in items {
                    html.push_str("<li>");
                    html.push_str(&escape_text(item));
                    html.push_str("</li>");
                }
                html.push_str("</ul>");
                html
            }
            View::Notice { message } => format!("<p>{}</p>", escape_text(message)),
        }
    }
}

/// Escape text for use as HTML element content or a quoted attribute value
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
