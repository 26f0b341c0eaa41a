// src/web/handlers/page_handlers.rs
use crate::auth::OptionalAuth;
use crate::ui::render::{render_dashboard, render_not_found, render_settings};
use crate::ui::{DashboardPage, SearchField, SearchQuery, SettingsPage};
use crate::web::types::SettingsForm;
use crate::web::ServerState;
use rocket::form::Form;
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::State;
use tracing::{info, warn};

pub async fn dashboard_page_handler(
    keywords: Option<String>,
    location: Option<String>,
    state: &State<ServerState>,
) -> RawHtml<String> {
    let mut page = DashboardPage::new();

    if keywords.is_some() || location.is_some() {
        let query = SearchQuery {
            keywords: keywords.unwrap_or_default(),
            location: location.unwrap_or_default(),
        };
        if let Some(bar) = page.header_mut().search_mut() {
            bar.input(SearchField::Keywords, &query.keywords);
            bar.input(SearchField::Location, &query.location);
        }
        page.run_search(&query, state.jobs.as_ref()).await;
    }

    RawHtml(render_dashboard(&page))
}

pub async fn settings_page_handler(
    auth: OptionalAuth,
    state: &State<ServerState>,
) -> RawHtml<String> {
    let mut page = SettingsPage::new(state.save_indicator);

    if let Some(user) = &auth.user {
        let backend = state.profiles.for_user(user.user_id.clone());
        if let Err(e) = page.load(&backend).await {
            warn!("Failed to load settings for {}: {}", user.user_id, e);
        }
    }

    RawHtml(render_settings(&page, auth.user.is_some()))
}

pub async fn save_settings_page_handler(
    form: Form<SettingsForm>,
    auth: OptionalAuth,
    state: &State<ServerState>,
) -> (Status, RawHtml<String>) {
    let mut page = SettingsPage::new(state.save_indicator);
    let form = form.into_inner();
    page.resume_mut().set(form.resume);
    page.instructions_mut().set(form.instructions);

    let Some(user) = auth.user else {
        return (Status::Unauthorized, RawHtml(render_settings(&page, false)));
    };

    let backend = state.profiles.for_user(user.user_id.clone());
    let status = match page.save(&backend).await {
        Ok(_) => {
            info!("Settings form saved for {}", user.user_id);
            Status::Ok
        }
        Err(e) => crate::web::types::ApiError::from_profile(e).status,
    };

    (status, RawHtml(render_settings(&page, true)))
}

pub fn not_found_page(path: &str) -> RawHtml<String> {
    RawHtml(render_not_found(path))
}
