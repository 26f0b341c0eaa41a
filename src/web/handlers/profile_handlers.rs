// src/web/handlers/profile_handlers.rs
use crate::auth::AuthenticatedUser;
use crate::profile::{Profile, ProfileUpdate};
use crate::web::types::{
    ActionResponse, ApiError, ApiResult, DataResponse, ProfileInput, ResumeInput,
    StandardRequest, UserInstructionsInput, WithConversationId,
};
use crate::web::ServerState;
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

pub async fn get_profile_handler(
    auth: AuthenticatedUser,
    state: &State<ServerState>,
) -> ApiResult<DataResponse<Profile>> {
    let profile = state
        .profiles
        .fetch(&auth.user_id)
        .await
        .map_err(ApiError::from_profile)?;

    let message = match profile.updated_at {
        Some(at) => format!("Settings last saved {}", at.to_rfc3339()),
        None => "No settings saved yet".to_string(),
    };
    Ok(Json(DataResponse::success(message, profile, None)))
}

pub async fn save_profile_handler(
    request: Json<StandardRequest<ProfileInput>>,
    auth: AuthenticatedUser,
    state: &State<ServerState>,
) -> ApiResult<ActionResponse> {
    let conversation_id = request.conversation_id();
    let input = request.into_inner().data;
    save_update(
        ProfileUpdate::full(input.resume, input.instructions),
        "Settings saved",
        auth,
        state,
        conversation_id,
    )
    .await
}

pub async fn save_resume_handler(
    request: Json<StandardRequest<ResumeInput>>,
    auth: AuthenticatedUser,
    state: &State<ServerState>,
) -> ApiResult<ActionResponse> {
    let conversation_id = request.conversation_id();
    let input = request.into_inner().data;
    save_update(
        ProfileUpdate::resume(input.resume),
        "Resume saved",
        auth,
        state,
        conversation_id,
    )
    .await
}

pub async fn save_instructions_handler(
    request: Json<StandardRequest<UserInstructionsInput>>,
    auth: AuthenticatedUser,
    state: &State<ServerState>,
) -> ApiResult<ActionResponse> {
    let conversation_id = request.conversation_id();
    let input = request.into_inner().data;
    save_update(
        ProfileUpdate::instructions(input.instructions),
        "Agent instructions saved",
        auth,
        state,
        conversation_id,
    )
    .await
}

async fn save_update(
    update: ProfileUpdate,
    message: &str,
    auth: AuthenticatedUser,
    state: &State<ServerState>,
    conversation_id: Option<String>,
) -> ApiResult<ActionResponse> {
    info!(
        "User {} saving settings [{}]",
        auth.user_id,
        conversation_id.clone().unwrap_or_default()
    );

    state
        .profiles
        .save(&auth.user_id, &update)
        .await
        .map_err(|e| ApiError::from_profile(e).with_conversation_id(conversation_id.clone()))?;

    Ok(Json(ActionResponse::success(
        message.to_string(),
        "saved".to_string(),
        conversation_id,
    )))
}
