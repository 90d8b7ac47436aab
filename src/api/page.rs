//! Page rendering endpoints.

use axum::{extract::State, response::Html};

use super::{ensure_loaded, ApiResponse};
use crate::presenter::PageSnapshot;
use crate::render::{render_page, PageView};
use crate::AppState;

/// GET / - Render the contact table.
pub async fn show_page(State(state): State<AppState>) -> Html<String> {
    let mut list = state.contacts.lock().await;
    ensure_loaded(&mut list).await;

    let toasts = list.take_toasts();
    Html(render_page(&PageView {
        phase: list.phase(),
        rows: list.rows(),
        form: list.form(),
        toasts: &toasts,
    }))
}

/// GET /state - Current rows as JSON.
pub async fn page_state(State(state): State<AppState>) -> ApiResponse<PageSnapshot> {
    let mut list = state.contacts.lock().await;
    ensure_loaded(&mut list).await;
    ApiResponse::new(list.snapshot())
}
