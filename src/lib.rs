// src/lib.rs
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod jobs;
pub mod profile;
pub mod ui;
pub mod utils;
pub mod web;

pub use config::AppConfig;
pub use jobs::{JobPosting, JobSearchParams, JobSource, LinkedinJobClient, SearchError};
pub use profile::{Profile, ProfileError, ProfileService, ProfileStore, ProfileUpdate};
pub use web::{build_rocket, start_web_server, ServerState};
