use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Issue type name that is excluded from every aggregate computation.
pub const SUB_TASK_TYPE: &str = "Sub-task";

/// A single issue as reported by the tracker.
///
/// Sub-task children are carried as key references only; the full child
/// records are fetched on demand through the issue provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub type_name: String,
    /// Story point estimate; `None` when the issue was never scored.
    pub story_points: Option<f64>,
    pub created: Option<DateTime<FixedOffset>>,
    pub resolved: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub subtask_keys: Vec<String>,
}

impl Issue {
    #[must_use]
    pub fn is_subtask(&self) -> bool {
        self.type_name == SUB_TASK_TYPE
    }

    /// Whole days between creation and resolution (floor), if both are known.
    #[must_use]
    pub fn cycle_time_days(&self) -> Option<i64> {
        match (self.created, self.resolved) {
            (Some(created), Some(resolved)) => {
                Some((resolved - created).num_seconds().div_euclid(86_400))
            }
            _ => None,
        }
    }
}
