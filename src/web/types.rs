// src/web/types.rs
use crate::jobs::{JobPosting, SearchError};
use crate::profile::ProfileError;
use rocket::form::FromForm;
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::Request;
use tracing::error;

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ProfileInput {
    pub resume: String,
    pub instructions: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ResumeInput {
    pub resume: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct UserInstructionsInput {
    pub instructions: String,
}

#[derive(FromForm)]
pub struct SettingsForm {
    pub resume: String,
    pub instructions: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct JobSearchData {
    pub search_id: uuid::Uuid,
    pub count: usize,
    pub jobs: Vec<JobPosting>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Action,
    Error,
}

// Request types with conversation_id support
#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardRequest<T> {
    #[serde(flatten)]
    pub data: T,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

// Helper trait for extracting conversation_id
pub trait WithConversationId {
    fn conversation_id(&self) -> Option<String>;
}

impl<T> WithConversationId for StandardRequest<T> {
    fn conversation_id(&self) -> Option<String> {
        self.conversation_id.clone()
    }
}

impl TextResponse {
    pub fn success(message: String, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
            conversation_id,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
            conversation_id,
        }
    }
}

impl ActionResponse {
    pub fn success(message: String, action: String, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action,
            conversation_id,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(
        error: String,
        error_code: String,
        suggestions: Vec<String>,
        conversation_id: Option<String>,
    ) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
            conversation_id,
        }
    }
}

/// Error envelope sent with a matching HTTP status
pub struct ApiError {
    pub status: Status,
    pub body: StandardErrorResponse,
}

impl ApiError {
    pub fn new(status: Status, error: impl Into<String>, error_code: &str, suggestions: &[&str]) -> Self {
        Self {
            status,
            body: StandardErrorResponse::new(
                error.into(),
                error_code.to_string(),
                suggestions.iter().map(|s| s.to_string()).collect(),
                None,
            ),
        }
    }

    pub fn with_conversation_id(mut self, conversation_id: Option<String>) -> Self {
        self.body.conversation_id = conversation_id;
        self
    }

    pub fn from_profile(e: ProfileError) -> Self {
        match e {
            ProfileError::TooLarge { .. } => Self::new(
                Status::PayloadTooLarge,
                e.to_string(),
                "FIELD_TOO_LARGE",
                &["Shorten the text and save again"],
            ),
            ProfileError::Storage(ref inner) => {
                error!("Profile storage error: {}", inner);
                Self::new(
                    Status::InternalServerError,
                    "Failed to store settings",
                    "STORAGE_ERROR",
                    &["Try again in a few moments", "Contact support if the problem persists"],
                )
            }
            ProfileError::Unavailable(_) => Self::new(
                Status::ServiceUnavailable,
                e.to_string(),
                "STORAGE_ERROR",
                &["Try again in a few moments"],
            ),
        }
    }

    pub fn from_search(e: SearchError) -> Self {
        match e {
            SearchError::InvalidParams(_) => Self::new(
                Status::BadRequest,
                e.to_string(),
                "VALIDATION_ERROR",
                &["limit must be between 1 and 50", "sort_by must be \"R\" or \"DD\""],
            ),
            SearchError::Upstream(_) => Self::new(
                Status::BadGateway,
                e.to_string(),
                "UPSTREAM_ERROR",
                &[
                    "The job listing service is temporarily unavailable",
                    "Try again in a few moments",
                ],
            ),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let mut response = Json(self.body).respond_to(req)?;
        response.set_status(self.status);
        Ok(response)
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;
