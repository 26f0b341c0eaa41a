// src/ui/render.rs
//! Plain server-side HTML for the page models. Markup only, no styling.

use super::dashboard::DashboardPage;
use super::header::{Header, SearchBar, BRAND};
use super::router::Page;
use super::settings::{SaveState, SettingsPage};
use crate::utils::escape_html;
use std::fmt::Write;

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{} | {}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        BRAND,
        body
    )
}

pub fn render_header(header: &Header) -> String {
    let mut html = String::from("<header>\n");
    let _ = writeln!(html, "  <a class=\"brand\" href=\"/\">{}</a>", BRAND);
    html.push_str("  <nav>\n");
    for item in header.nav_items() {
        let _ = writeln!(
            html,
            "    <a href=\"{}\"{}>{}</a>",
            item.route.path(),
            if item.active { " class=\"active\" aria-current=\"page\"" } else { "" },
            escape_html(item.label)
        );
    }
    html.push_str("  </nav>\n");
    if let Some(search) = header.search() {
        html.push_str(&render_search_bar(search));
    }
    html.push_str("</header>");
    html
}

fn render_search_bar(bar: &SearchBar) -> String {
    format!(
        concat!(
            "  <form class=\"search\" method=\"get\" action=\"/\">\n",
            "    <input name=\"keywords\" value=\"{}\" placeholder=\"Job Title (e.g. Python)\">\n",
            "    <input name=\"location\" value=\"{}\" placeholder=\"Location\">\n",
            "    <button type=\"submit\"{}>{}</button>\n",
            "  </form>\n"
        ),
        escape_html(bar.keywords()),
        escape_html(bar.location()),
        if bar.is_disabled() { " disabled" } else { "" },
        bar.button_label()
    )
}

pub fn render_dashboard(page: &DashboardPage) -> String {
    let mut body = render_header(page.header());
    body.push_str("\n<main>\n");

    if let Some(error) = page.error() {
        let _ = writeln!(body, "  <p class=\"error\" role=\"alert\">{}</p>", escape_html(error));
    } else if page.results().is_empty() {
        body.push_str("  <p class=\"empty\">Search for a job title and location to get started.</p>\n");
    } else {
        body.push_str("  <ul class=\"results\">\n");
        for job in page.results() {
            let _ = write!(
                body,
                "    <li data-job-id=\"{}\"><a href=\"{}\">{}</a>",
                escape_html(&job.job_id),
                escape_html(&job.url),
                escape_html(&job.title)
            );
            if let Some(company) = &job.company {
                let _ = write!(body, " <span class=\"company\">{}</span>", escape_html(company));
            }
            if let Some(location) = &job.location {
                let _ = write!(body, " <span class=\"location\">{}</span>", escape_html(location));
            }
            body.push_str("</li>\n");
        }
        body.push_str("  </ul>\n");
    }

    body.push_str("</main>");
    document("Find Jobs", &body)
}

pub fn render_settings(page: &SettingsPage, signed_in: bool) -> String {
    let mut body = render_header(page.header());
    body.push_str("\n<main>\n  <h2>Profile &amp; Agent Settings</h2>\n");

    match page.save_state() {
        SaveState::Saved => body.push_str("  <p class=\"status\" role=\"status\">Settings saved.</p>\n"),
        SaveState::Failed(reason) => {
            let _ = writeln!(
                body,
                "  <p class=\"error\" role=\"alert\">Could not save settings: {}</p>",
                escape_html(&reason)
            );
        }
        SaveState::Idle | SaveState::Saving => {}
    }
    if !signed_in {
        body.push_str("  <p class=\"notice\">Sign in to load and save your settings.</p>\n");
    }

    let _ = write!(
        body,
        concat!(
            "  <form method=\"post\" action=\"/settings\">\n",
            "    <label for=\"resume\">Your Resume</label>\n",
            "    <textarea id=\"resume\" name=\"resume\" placeholder=\"Paste your full resume content here...\">{}</textarea>\n",
            "    <label for=\"instructions\">Agent Instructions</label>\n",
            "    <textarea id=\"instructions\" name=\"instructions\">{}</textarea>\n",
            "    <button type=\"submit\"{}>{}</button>\n",
            "  </form>\n"
        ),
        escape_html(page.resume().value()),
        escape_html(page.instructions().value()),
        if page.can_save() && signed_in { "" } else { " disabled" },
        page.button_label()
    );

    body.push_str("</main>");
    document("Settings", &body)
}

pub fn render_not_found(path: &str) -> String {
    let body = format!(
        "<main>\n  <h2>Page not found</h2>\n  <p>Nothing lives at {}. <a href=\"/\">Back to {}</a></p>\n</main>",
        escape_html(path),
        BRAND
    );
    document("Not Found", &body)
}

pub fn render_page(page: &Page) -> String {
    match page {
        Page::Dashboard(dashboard) => render_dashboard(dashboard),
        Page::Settings(settings) => render_settings(settings, false),
        Page::NotFound(path) => render_not_found(path),
    }
}
