// src/web/handlers/job_handlers.rs
use crate::jobs::JobSearchParams;
use crate::web::types::{
    ApiError, ApiResult, DataResponse, JobSearchData, StandardRequest, WithConversationId,
};
use crate::web::ServerState;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};
use uuid::Uuid;

pub async fn search_jobs_handler(
    request: Json<StandardRequest<JobSearchParams>>,
    state: &State<ServerState>,
) -> ApiResult<DataResponse<JobSearchData>> {
    let conversation_id = request.conversation_id();
    let params = request.into_inner().data;
    let search_id = Uuid::new_v4();

    info!(
        "Search {}: keywords={:?} location={:?} limit={}",
        search_id,
        params.keywords(),
        params.location(),
        params.limit
    );

    if let Err(e) = params.validate() {
        return Err(ApiError::from_search(e).with_conversation_id(conversation_id));
    }

    let jobs = match state.jobs.search(&params).await {
        Ok(jobs) => jobs,
        Err(e) => {
            error!("Search {} failed: {}", search_id, e);
            return Err(ApiError::from_search(e).with_conversation_id(conversation_id));
        }
    };

    info!("Search {} returned {} jobs", search_id, jobs.len());
    Ok(Json(DataResponse::success(
        format!("Found {} jobs", jobs.len()),
        JobSearchData {
            search_id,
            count: jobs.len(),
            jobs,
        },
        conversation_id,
    )))
}
