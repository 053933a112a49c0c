pub mod client;
pub mod lookup;
pub mod progress;
pub mod provider;
pub mod types;

pub use client::{ApiError, JiraClient};
pub use lookup::{fetch_subtasks, find_board, find_custom_field, find_project, find_sprint};
pub use progress::{ProgressSink, Silent, StderrDots};
pub use provider::IssueProvider;
pub use types::{Board, Field, Project, Sprint};
