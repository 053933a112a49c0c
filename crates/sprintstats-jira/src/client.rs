//! Blocking JIRA REST client.

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use std::time::Duration;
use ureq::Agent;

use sprintstats_core::Issue;

use crate::progress::{ProgressSink, Silent};
use crate::provider::IssueProvider;
use crate::types::{Board, Field, Page, Project, RawIssue, ReportedIssue, Sprint, SprintReport};

/// Errors raised against the JIRA REST API. Caught once at the top level;
/// there is no retry anywhere.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("JIRA API returned HTTP {status} for {url}")]
    Status { status: u16, url: String },
    #[error("failed to reach JIRA at {url}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("failed to decode JIRA response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// JIRA API client. All calls block the caller; a failed call aborts the
/// whole run.
pub struct JiraClient {
    base_url: String,
    auth_header: String,
    agent: Agent,
    /// Custom field id holding story points, resolved once by name.
    story_field: Option<String>,
    progress: Box<dyn ProgressSink>,
}

impl JiraClient {
    /// Create a client for a JIRA server, authenticating with HTTP Basic.
    #[must_use]
    pub fn new(server: &str, user: &str, password: &str) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .build();
        let credentials = STANDARD.encode(format!("{user}:{password}"));

        Self {
            base_url: server.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {credentials}"),
            agent: config.into(),
            story_field: None,
            progress: Box::new(Silent),
        }
    }

    /// Attach a progress sink, ticked once per remote fetch.
    #[must_use]
    pub fn with_progress(mut self, progress: Box<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Record the resolved story-points field id so fetched issues carry a
    /// typed point value instead of an opaque custom field.
    #[must_use]
    pub fn with_story_field(mut self, field_id: String) -> Self {
        self.story_field = Some(field_id);
        self
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/rest/{path}", self.base_url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        log::debug!("GET {url}");

        let response = self
            .agent
            .get(url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .call()
            .map_err(|err| match err {
                ureq::Error::StatusCode(status) => ApiError::Status {
                    status,
                    url: url.to_string(),
                },
                other => ApiError::Transport {
                    url: url.to_string(),
                    source: Box::new(other),
                },
            })?;

        let body = response
            .into_body()
            .read_to_string()
            .map_err(|err| ApiError::Transport {
                url: url.to_string(),
                source: Box::new(err),
            })?;

        self.progress.tick();
        serde_json::from_str(&body).map_err(|err| ApiError::Decode {
            url: url.to_string(),
            source: err,
        })
    }

    /// Walk an Agile API listing page by page until `isLast`.
    fn get_paged<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut start_at = 0_usize;

        loop {
            let sep = if path.contains('?') { '&' } else { '?' };
            let url = self.build_url(&format!("{path}{sep}startAt={start_at}"));
            let page: Page<T> = self.get_json(&url)?;
            let fetched = page.values.len();
            items.extend(page.values);
            if page.is_last || fetched == 0 {
                break;
            }
            start_at += fetched;
        }

        Ok(items)
    }

    fn sprint_report(&self, board_id: u64, sprint_id: u64) -> Result<SprintReport, ApiError> {
        let url = self.build_url(&format!(
            "greenhopper/1.0/rapid/charts/sprintreport?rapidViewId={board_id}&sprintId={sprint_id}"
        ));
        self.get_json(&url)
    }

    /// The sprint report only carries issue keys; fetch the full record for
    /// each so story points and timestamps are present.
    fn hydrate(&self, reported: Vec<ReportedIssue>) -> Result<Vec<Issue>> {
        reported.iter().map(|r| self.issue(&r.key)).collect()
    }
}

impl IssueProvider for JiraClient {
    fn fields(&self) -> Result<Vec<Field>> {
        Ok(self.get_json(&self.build_url("api/2/field"))?)
    }

    fn projects(&self) -> Result<Vec<Project>> {
        Ok(self.get_json(&self.build_url("api/2/project"))?)
    }

    fn boards(&self) -> Result<Vec<Board>> {
        Ok(self.get_paged("agile/1.0/board")?)
    }

    fn sprints(&self, board_id: u64) -> Result<Vec<Sprint>> {
        Ok(self.get_paged(&format!("agile/1.0/board/{board_id}/sprint"))?)
    }

    fn issue(&self, key: &str) -> Result<Issue> {
        let raw: RawIssue = self.get_json(&self.build_url(&format!("api/2/issue/{key}")))?;
        raw.into_issue(self.story_field.as_deref())
    }

    fn completed_issues(&self, board_id: u64, sprint_id: u64) -> Result<Vec<Issue>> {
        let report = self.sprint_report(board_id, sprint_id)?;
        self.hydrate(report.contents.completed_issues)
    }

    fn incompleted_issues(&self, board_id: u64, sprint_id: u64) -> Result<Vec<Issue>> {
        let report = self.sprint_report(board_id, sprint_id)?;
        self.hydrate(report.contents.incompleted_issues)
    }
}
