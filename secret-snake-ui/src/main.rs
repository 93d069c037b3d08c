//! Secret Snake Page Loader (WASM)
//!
//! Browser host for the shared loader. Once the page is parsed it reads the
//! bearer token from `localStorage`, fetches the assignment and tips, and
//! renders them into `#assignment-container` and `#tips-container` when
//! those elements exist.
//!
//! Failures that leave a container untouched are reported on the console
//! only.

use secret_snake::{PageDataLoader, TOKEN_KEY};

mod api;
mod components;
mod dom;
mod storage;

use api::GlooBackend;
use dom::BrowserPage;
use storage::LocalStorage;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    dom::on_dom_ready(|| wasm_bindgen_futures::spawn_local(load_page_data()));
}

async fn load_page_data() {
    let Some(page) = BrowserPage::current() else {
        return;
    };

    // An unreadable store stops the load before any request goes out
    let backend = GlooBackend::new(api::get_api_base());
    let loader = match LocalStorage::open()
        .and_then(|store| PageDataLoader::from_store(backend, &store, TOKEN_KEY))
    {
        Ok(loader) => loader,
        Err(e) => {
            web_sys::console::error_1(&format!("Failed to read token: {}", e).into());
            return;
        }
    };

    let report = loader.on_ready(&page).await;

    for (operation, error) in report.failures() {
        web_sys::console::error_1(&format!("Error loading {}: {}", operation, error).into());
    }

    if let Ok(json) = serde_json::to_string(&report) {
        web_sys::console::debug_1(&json.into());
    }
}
