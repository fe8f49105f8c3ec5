use crate::{handler::MessageHandler, InboundEvent};

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use line_client::{
    signature::{self, SIGNATURE_HEADER},
    webhook::CallbackPayload,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub channel_secret: Arc<str>,
    pub handler: MessageHandler,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/callback", post(callback))
        .with_state(state)
}

async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, StatusCode> {
    tracing::info!("Received callback:\n{}", String::from_utf8_lossy(&body));

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing {SIGNATURE_HEADER} header");
            StatusCode::BAD_REQUEST
        })?;

    if !signature::verify(&state.channel_secret, &body, signature) {
        tracing::warn!("Invalid signature, check the channel secret");
        return Err(StatusCode::BAD_REQUEST);
    }

    let payload: CallbackPayload = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!("Error parsing callback: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    for event in &payload.events {
        match InboundEvent::from_webhook_event(event) {
            Some(inbound) => {
                state.handler.handle(inbound).await;
            }
            None => tracing::debug!("Ignoring event: {:?}", event),
        }
    }

    Ok("OK")
}
