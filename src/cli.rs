// src/cli.rs
use crate::auth::AuthConfig;
use crate::config::AppConfig;
use crate::jobs::{JobPosting, JobSearchParams, JobSource, LinkedinJobClient, SortBy};
use crate::profile::{ProfileService, ProfileUpdate};
use crate::utils::read_file_content;
use crate::web::{open_profile_store, start_web_server};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "scoutling")]
#[command(about = "Job search dashboard with per-user resume and agent settings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to $SCOUTLING_CONFIG or config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        #[arg(long)]
        port: Option<u16>,
        /// Keep profiles in memory instead of SQLite
        #[arg(long)]
        memory: bool,
    },
    /// Search job postings and print them
    Search {
        #[arg(long)]
        keywords: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        start: u32,
        #[arg(long, value_enum, default_value_t = SortArg::R)]
        sort_by: SortArg,
        /// Only postings newer than this many seconds
        #[arg(long)]
        time_filter: Option<u64>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Inspect or edit stored settings
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
    /// Issue a signed token for a user
    Token {
        #[arg(long)]
        user: String,
        #[arg(long)]
        email: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    Show {
        #[arg(long)]
        user: String,
    },
    Set {
        #[arg(long)]
        user: String,
        #[arg(long)]
        resume_file: Option<PathBuf>,
        #[arg(long, conflicts_with = "instructions_file")]
        instructions: Option<String>,
        #[arg(long)]
        instructions_file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    #[value(name = "R")]
    R,
    #[value(name = "DD")]
    DD,
}

impl From<SortArg> for SortBy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::R => SortBy::R,
            SortArg::DD => SortBy::DD,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

pub async fn handle_command(cli: Cli, mut config: AppConfig) -> Result<()> {
    match cli.command {
        Command::Serve { port, memory } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            start_web_server(config, memory).await
        }

        Command::Search {
            keywords,
            location,
            limit,
            start,
            sort_by,
            time_filter,
            format,
        } => {
            let params = JobSearchParams {
                keywords,
                location,
                start,
                limit,
                time_filter,
                sort_by: sort_by.into(),
            };
            let client = LinkedinJobClient::from_settings(&config.linkedin)?;
            let jobs = client.search(&params).await?;
            info!("Search returned {} jobs", jobs.len());
            write_jobs(&jobs, format, std::io::stdout().lock())
        }

        Command::Profile { action } => {
            let store = open_profile_store(&config, false).await?;
            let service = ProfileService::new(store, config.profile.max_field_bytes);
            handle_profile_command(action, &service).await
        }

        Command::Token { user, email } => {
            let secret = AppConfig::jwt_secret()?;
            let auth = AuthConfig::new(&secret, config.auth.issuer.clone(), config.auth.token_ttl_hours);
            let token = auth.issue_token(&user, email.as_deref())?;
            println!("{}", token);
            Ok(())
        }
    }
}

async fn handle_profile_command(action: ProfileCommand, service: &ProfileService) -> Result<()> {
    match action {
        ProfileCommand::Show { user } => {
            let profile = service.fetch(&user).await?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }

        ProfileCommand::Set {
            user,
            resume_file,
            instructions,
            instructions_file,
        } => {
            let resume = match resume_file {
                Some(path) => Some(read_file_content(&path).await?),
                None => None,
            };
            let instructions = match (instructions, instructions_file) {
                (Some(text), _) => Some(text),
                (None, Some(path)) => Some(read_file_content(&path).await?),
                (None, None) => None,
            };
            if resume.is_none() && instructions.is_none() {
                anyhow::bail!("Nothing to save: pass --resume-file, --instructions or --instructions-file");
            }

            let profile = service
                .save(&user, &ProfileUpdate { resume, instructions })
                .await?;
            info!("Saved settings for {}", profile.user_id);
            println!("Settings saved for {}", profile.user_id);
        }
    }
    Ok(())
}

pub fn write_jobs<W: Write>(jobs: &[JobPosting], format: OutputFormat, mut out: W) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, jobs)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for job in jobs {
                writer.serialize(job).context("Failed to write CSV row")?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<JobPosting> {
        vec![JobPosting {
            job_id: "4001".to_string(),
            url: "https://www.linkedin.com/jobs/view/4001".to_string(),
            title: "Rust Developer".to_string(),
            company: Some("Acme".to_string()),
            location: None,
            posted_at: Some("2026-10-01".to_string()),
        }]
    }

    #[test]
    fn test_csv_output_has_header_and_row() {
        let mut buf = Vec::new();
        write_jobs(&sample(), OutputFormat::Csv, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("job_id,url,title,company,location,posted_at")
        );
        assert_eq!(
            lines.next(),
            Some("4001,https://www.linkedin.com/jobs/view/4001,Rust Developer,Acme,,2026-10-01")
        );
    }

    #[test]
    fn test_json_output_is_an_array() {
        let mut buf = Vec::new();
        write_jobs(&sample(), OutputFormat::Json, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["job_id"], "4001");
    }

    #[test]
    fn test_parse_search_command() {
        let cli = Cli::try_parse_from([
            "scoutling", "search", "--keywords", "Rust", "--sort-by", "DD", "--format", "csv",
        ])
        .unwrap();
        match cli.command {
            Command::Search { keywords, sort_by, format, limit, .. } => {
                assert_eq!(keywords.as_deref(), Some("Rust"));
                assert_eq!(SortBy::from(sort_by), SortBy::DD);
                assert!(format == OutputFormat::Csv);
                assert_eq!(limit, 10);
            }
            _ => panic!("expected search"),
        }
    }
}
