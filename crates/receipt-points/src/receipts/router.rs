use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, warn};

use super::domain::{Receipt, ReceiptId};
use super::store::{IdGenerator, ReceiptStore, StoreError};
use super::validation::ReceiptSubmission;

pub(crate) const INVALID_RECEIPT: &str = "The receipt is invalid.";
pub(crate) const RECEIPT_NOT_FOUND: &str = "No receipt found for that ID.";

/// Router builder exposing receipt intake and point lookup.
pub fn receipt_router<G>(store: Arc<ReceiptStore<G>>) -> Router
where
    G: IdGenerator + 'static,
{
    Router::new()
        .route("/receipts/process", post(process_handler::<G>))
        .route("/receipts/:id/points", get(points_handler::<G>))
        .with_state(store)
}

fn invalid_receipt(detail: String) -> Response {
    let payload = json!({
        "description": INVALID_RECEIPT,
        "error": detail,
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

pub(crate) async fn process_handler<G>(
    State(store): State<Arc<ReceiptStore<G>>>,
    payload: Result<Json<ReceiptSubmission>, JsonRejection>,
) -> Response
where
    G: IdGenerator + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected unreadable receipt payload");
            return invalid_receipt(rejection.body_text());
        }
    };

    let receipt = match Receipt::try_from(submission) {
        Ok(receipt) => receipt,
        Err(error) => {
            warn!(%error, "rejected invalid receipt");
            return invalid_receipt(error.to_string());
        }
    };

    match store.record(&receipt) {
        Ok(scored) => {
            info!(id = %scored.id, points = scored.points, "receipt processed");
            (StatusCode::OK, Json(json!({ "id": scored.id }))).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn points_handler<G>(
    State(store): State<Arc<ReceiptStore<G>>>,
    Path(id): Path<String>,
) -> Response
where
    G: IdGenerator + 'static,
{
    let id = ReceiptId(id);
    match store.lookup(&id) {
        Ok(points) => (StatusCode::OK, Json(json!({ "points": points }))).into_response(),
        Err(StoreError::NotFound(_)) => {
            let payload = json!({
                "error": RECEIPT_NOT_FOUND,
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipts::validation::ItemSubmission;
    use axum::body::to_bytes;
    use serde_json::Value;

    fn submission(total: &str) -> ReceiptSubmission {
        ReceiptSubmission {
            retailer: "Target".to_string(),
            purchase_date: "2022-01-02".to_string(),
            purchase_time: "13:13".to_string(),
            items: vec![ItemSubmission {
                short_description: "Pepsi 12pack".to_string(),
                price: total.into(),
            }],
            total: total.to_string(),
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn process_handler_returns_identifier() {
        let store = Arc::new(ReceiptStore::new());

        let response =
            process_handler(State(store.clone()), Ok(Json(submission("1.25")))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let id = body["id"].as_str().expect("id string");
        assert_eq!(store.lookup(&ReceiptId::from(id)), Ok(6 + 25 + 1));
    }

    #[tokio::test]
    async fn process_handler_rejects_invalid_receipt() {
        let store = Arc::new(ReceiptStore::new());

        let response =
            process_handler(State(store.clone()), Ok(Json(submission("1.5")))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["description"], INVALID_RECEIPT);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn points_handler_reports_missing_receipt() {
        let store = Arc::new(ReceiptStore::new());

        let response = points_handler(State(store), Path("unknown".to_string())).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": RECEIPT_NOT_FOUND }));
    }
}
