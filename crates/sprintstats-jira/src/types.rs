//! Wire types for the JIRA REST API.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::collections::HashMap;

use sprintstats_core::Issue;

/// A field descriptor from `/rest/api/2/field`. Custom fields (story points
/// among them) are only identifiable by display name, so the id has to be
/// resolved at runtime.
#[derive(Debug, Clone, Deserialize)]
pub struct Field {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "clauseNames")]
    pub clause_names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Board {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sprint {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// One page of an Agile API listing.
#[derive(Debug, Deserialize)]
// The `default` on `values` would otherwise make the derive demand
// `T: Default`; only `Deserialize` is actually needed.
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub values: Vec<T>,
    // Treat a missing marker as the final page so a malformed response
    // cannot keep the pagination loop alive.
    #[serde(default = "default_is_last", rename = "isLast")]
    pub is_last: bool,
}

fn default_is_last() -> bool {
    true
}

/// A full issue record from `/rest/api/2/issue/{key}`.
#[derive(Debug, Deserialize)]
pub struct RawIssue {
    pub key: String,
    pub fields: RawFields,
}

#[derive(Debug, Deserialize)]
pub struct RawFields {
    #[serde(default)]
    pub summary: Option<String>,
    pub issuetype: RawIssueType,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default, rename = "resolutiondate")]
    pub resolution_date: Option<String>,
    #[serde(default)]
    pub subtasks: Vec<RawSubtask>,
    /// Everything else, including the `customfield_*` entries.
    #[serde(flatten)]
    pub custom: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct RawIssueType {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RawSubtask {
    pub key: String,
}

/// The GreenHopper sprint report, the one endpoint that splits a sprint's
/// issues into completed and not-completed.
#[derive(Debug, Deserialize)]
pub struct SprintReport {
    pub contents: SprintReportContents,
}

#[derive(Debug, Deserialize)]
pub struct SprintReportContents {
    #[serde(default, rename = "completedIssues")]
    pub completed_issues: Vec<ReportedIssue>,
    #[serde(default, rename = "issuesNotCompletedInCurrentSprint")]
    pub incompleted_issues: Vec<ReportedIssue>,
}

#[derive(Debug, Deserialize)]
pub struct ReportedIssue {
    pub key: String,
}

/// Parse a JIRA timestamp. The REST API emits `2015-05-01T12:00:00.000-0400`
/// style offsets; RFC 3339 is accepted as a fallback.
///
/// # Errors
///
/// Returns an error when the value matches neither format.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .with_context(|| format!("Unparseable timestamp: {raw}"))
}

impl RawIssue {
    /// Map the wire record into the domain model, reading story points out
    /// of the custom field resolved earlier by `find_custom_field`.
    ///
    /// # Errors
    ///
    /// Returns an error when a timestamp on the record cannot be parsed.
    pub fn into_issue(self, story_field: Option<&str>) -> Result<Issue> {
        let created = self.fields.created.as_deref().map(parse_timestamp).transpose()?;
        let resolved = self
            .fields
            .resolution_date
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;
        let story_points = story_field
            .and_then(|id| self.fields.custom.get(id))
            .and_then(serde_json::Value::as_f64);

        Ok(Issue {
            key: self.key,
            summary: self.fields.summary.unwrap_or_default(),
            type_name: self.fields.issuetype.name,
            story_points,
            created,
            resolved,
            subtask_keys: self.fields.subtasks.into_iter().map(|s| s.key).collect(),
        })
    }
}
