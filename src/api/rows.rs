//! Row action endpoints.
//!
//! Every action form carries the values of all rows currently being edited,
//! so each handler applies the submission before acting.

use axum::{
    extract::{Path, State},
    response::Redirect,
    Form,
};

use super::ensure_loaded;
use crate::errors::AppError;
use crate::presenter::SaveOutcome;
use crate::rows::RowKey;
use crate::AppState;

type Submission = Form<Vec<(String, String)>>;

fn back_to_page() -> Redirect {
    Redirect::to("/")
}

/// POST /rows - Append a draft row.
pub async fn add_row(
    State(state): State<AppState>,
    Form(pairs): Submission,
) -> Result<Redirect, AppError> {
    let mut list = state.contacts.lock().await;
    ensure_loaded(&mut list).await;
    list.input(&pairs);
    list.add();
    Ok(back_to_page())
}

/// POST /rows/{key}/edit - Switch a row into edit mode.
pub async fn edit_row(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Form(pairs): Submission,
) -> Result<Redirect, AppError> {
    let key = RowKey::parse(&key);
    let mut list = state.contacts.lock().await;
    ensure_loaded(&mut list).await;
    list.input(&pairs);
    if !list.edit(&key) {
        return Err(AppError::NotFound(format!("Row {} not found", key)));
    }
    Ok(back_to_page())
}

/// POST /rows/{key}/cancel - Leave edit mode without saving.
pub async fn cancel_row(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Form(pairs): Submission,
) -> Result<Redirect, AppError> {
    let key = RowKey::parse(&key);
    let mut list = state.contacts.lock().await;
    ensure_loaded(&mut list).await;
    list.input(&pairs);
    if !list.cancel(&key) {
        return Err(AppError::NotFound(format!("Row {} not found", key)));
    }
    Ok(back_to_page())
}

/// POST /rows/{key}/save - Validate and write the row.
///
/// Validation and directory failures are reported on the page itself.
pub async fn save_row(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Form(pairs): Submission,
) -> Result<Redirect, AppError> {
    let key = RowKey::parse(&key);
    let mut list = state.contacts.lock().await;
    ensure_loaded(&mut list).await;
    list.input(&pairs);
    match list.save(&key).await {
        SaveOutcome::NotFound => Err(AppError::NotFound(format!("Row {} not found", key))),
        SaveOutcome::Invalid(_) | SaveOutcome::Saved | SaveOutcome::Failed => Ok(back_to_page()),
    }
}

/// POST /rows/{key}/delete - Delete the contact behind a row.
pub async fn delete_row(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Form(pairs): Submission,
) -> Result<Redirect, AppError> {
    let key = RowKey::parse(&key);
    let Some(id) = key.contact_id() else {
        return Err(AppError::Validation(
            "Unsaved rows cannot be deleted; cancel them instead".to_string(),
        ));
    };
    let mut list = state.contacts.lock().await;
    list.input(&pairs);
    list.delete(id).await;
    Ok(back_to_page())
}
