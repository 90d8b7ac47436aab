//! HTTP surface of the admin page.
//!
//! Browser actions are form posts that answer with a redirect back to `/`.

mod page;
mod rows;

pub use page::*;
pub use rows::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::directory::HttpDirectory;
use crate::presenter::{ContactList, PagePhase};

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Run the initial list fetch if the page has not been mounted yet.
async fn ensure_loaded(list: &mut ContactList<HttpDirectory>) {
    if list.phase() == PagePhase::Loading {
        list.load().await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::{create_router, AppState};

    /// Router whose directory refuses every connection.
    fn offline_router() -> Router {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let api_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let config = Config {
            api_url,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            log_json: false,
            request_timeout: Duration::from_secs(2),
        };
        create_router(AppState::new(&config).unwrap())
    }

    fn form_post(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_without_socket() {
        let resp = offline_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_add_answers_see_other() {
        let resp = offline_router()
            .oneshot(form_post("/rows", ""))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_delete_of_draft_key_is_rejected() {
        let resp = offline_router()
            .oneshot(form_post(
                "/rows/draft-67e55044-10b1-426f-9247-bb680e5fe0c8/delete",
                "",
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_edit_of_unknown_row_is_not_found() {
        let resp = offline_router()
            .oneshot(form_post("/rows/42/edit", "42_name=x"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_state_reports_ready_after_failed_load() {
        let resp = offline_router()
            .oneshot(Request::get("/state").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["phase"], "ready");
        assert!(value["data"]["rows"].as_array().unwrap().is_empty());
    }
}
