// src/jobs/extract.rs
use super::types::JobPosting;
use crate::utils::{clean_text, strip_query};
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use tracing::debug;

const URN_PREFIX: &str = "urn:li:jobPosting:";

struct CardSelectors {
    card: Selector,
    link: Selector,
    title: Selector,
    company: Selector,
    location: Selector,
    posted: Selector,
}

fn selectors() -> &'static CardSelectors {
    static SELECTORS: OnceLock<CardSelectors> = OnceLock::new();
    SELECTORS.get_or_init(|| {
        let parse = |css: &str| Selector::parse(css).expect("valid static selector");
        CardSelectors {
            card: parse("[data-entity-urn]"),
            link: parse("a.base-card__full-link"),
            title: parse(".base-search-card__title"),
            company: parse(".base-search-card__subtitle"),
            location: parse(".job-search-card__location"),
            posted: parse("time[datetime]"),
        }
    })
}

/// Extract job cards from one page of search results.
///
/// Cards without a job posting urn, a link or a title are skipped.
pub fn parse_job_cards(html: &str) -> Vec<JobPosting> {
    let document = Html::parse_document(html);
    let sel = selectors();

    document
        .select(&sel.card)
        .filter_map(|card| parse_card(card, sel))
        .collect()
}

fn parse_card(card: ElementRef<'_>, sel: &CardSelectors) -> Option<JobPosting> {
    let urn = card.value().attr("data-entity-urn")?;
    let job_id = urn.strip_prefix(URN_PREFIX)?.trim();
    if job_id.is_empty() {
        return None;
    }

    let href = card
        .select(&sel.link)
        .next()
        .and_then(|link| link.value().attr("href"))
        .or_else(|| card.value().attr("href"));
    let Some(href) = href else {
        debug!("Skipping job card {} without a link", job_id);
        return None;
    };

    let title = first_text(card, &sel.title)?;

    Some(JobPosting {
        job_id: job_id.to_string(),
        url: strip_query(href.trim()).to_string(),
        title,
        company: first_text(card, &sel.company),
        location: first_text(card, &sel.location),
        posted_at: card
            .select(&sel.posted)
            .next()
            .and_then(|time| time.value().attr("datetime"))
            .map(str::to_string),
    })
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector)
        .next()
        .map(|element| clean_text(&element.text().collect::<Vec<_>>().join(" ")))
        .filter(|text| !text.is_empty())
}
