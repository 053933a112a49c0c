use anyhow::Result;

use sprintstats_core::Issue;

use crate::types::{Board, Field, Project, Sprint};

/// The issue-tracking service as the stats pipeline sees it. `JiraClient`
/// is the production implementation; tests substitute an in-memory one.
pub trait IssueProvider {
    /// Field descriptors, used to resolve custom field ids by display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    fn fields(&self) -> Result<Vec<Field>>;

    /// All projects visible to the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    fn projects(&self) -> Result<Vec<Project>>;

    /// All boards visible to the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    fn boards(&self) -> Result<Vec<Board>>;

    /// Sprints on a board.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    fn sprints(&self, board_id: u64) -> Result<Vec<Sprint>>;

    /// One full issue record.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the key is unknown.
    fn issue(&self, key: &str) -> Result<Issue>;

    /// Issues completed within the sprint, in report order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    fn completed_issues(&self, board_id: u64, sprint_id: u64) -> Result<Vec<Issue>>;

    /// Issues left incomplete at the end of the sprint, in report order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    fn incompleted_issues(&self, board_id: u64, sprint_id: u64) -> Result<Vec<Issue>>;
}
