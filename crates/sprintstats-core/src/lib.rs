pub mod config;
pub mod issue;
pub mod stats;

pub use config::{load_settings, Settings, DEFAULT_CONFIG_PATHS};
pub use issue::{Issue, SUB_TASK_TYPE};
pub use stats::{calculate_cycle_times, gather_stats, sum_story_points, CycleTimes, SprintStats};
