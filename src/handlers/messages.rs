use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::chat::{group_by_day, DisplayedMessage};
use crate::models::{NewMessage, User};
use crate::state::AppState;
use crate::store::list_messages_or_empty;
use crate::utils::error::AppError;
use crate::utils::response::{created, data, empty_success};

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub sender: String,
}

/// GET /api/messages
pub async fn list_messages(State(state): State<AppState>) -> Response {
    data(list_messages_or_empty(state.messages.as_ref()).await)
}

/// POST /api/messages
pub async fn create_message(
    State(state): State<AppState>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;
    let sender: User = req.sender.parse()?;
    let input = NewMessage::new(&req.content, sender)?;

    let message = state.messages.create_message(&input).await?;
    info!(id = message.id, sender = %message.sender, "Message created");

    Ok(created(message, "Message envoyé"))
}

/// DELETE /api/messages/:id
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    state.messages.delete_message(id).await?;
    info!(id, "Message deleted");
    Ok(empty_success("Message supprimé"))
}

/// GET /api/messages/days
pub async fn messages_by_day(State(state): State<AppState>) -> Response {
    let messages = list_messages_or_empty(state.messages.as_ref()).await;
    let groups = group_by_day(
        messages.into_iter().map(DisplayedMessage::Confirmed),
        state.timezone,
        state.clock.now(),
    );
    data(groups)
}
