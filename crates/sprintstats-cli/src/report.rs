//! Human-readable report rendering.

use tabled::{Table, Tabled};

use sprintstats_core::{Issue, SprintStats};
use sprintstats_jira::Board;

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Summary")]
    summary: String,
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Statistic")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct BoardRow {
    #[tabled(rename = "Id")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
}

fn print_titled(title: &str, table: &str) {
    println!("{title}");
    println!("{}", "=".repeat(title.len()));
    println!("{table}");
    println!();
}

fn issue_rows(issues: &[Issue], include_subtasks: bool) -> Vec<IssueRow> {
    issues
        .iter()
        .filter(|issue| include_subtasks || !issue.is_subtask())
        .map(|issue| IssueRow {
            key: issue.key.clone(),
            summary: issue.summary.clone(),
        })
        .collect()
}

/// Stats rows sorted by name, floats rounded to two decimals.
fn stat_rows(stats: &SprintStats) -> Vec<StatRow> {
    let mut rows = vec![
        StatRow {
            name: "velocity".to_string(),
            value: format_points(stats.velocity),
        },
        StatRow {
            name: "min_cycle_time".to_string(),
            value: stats.min_cycle_time.to_string(),
        },
        StatRow {
            name: "max_cycle_time".to_string(),
            value: stats.max_cycle_time.to_string(),
        },
        StatRow {
            name: "average_cycle_time".to_string(),
            value: format!("{:.2}", stats.average_cycle_time),
        },
        StatRow {
            name: "cycle_time_stddev".to_string(),
            value: format!("{:.2}", stats.cycle_time_stddev),
        },
    ];
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}

fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{points:.0}")
    } else {
        format!("{points}")
    }
}

/// Print an issue list, leaving sub-tasks out.
pub fn print_issues(title: &str, issues: &[Issue]) {
    print_titled(title, &Table::new(issue_rows(issues, false)).to_string());
}

/// Print a sub-task list. Nothing is filtered here; the input is already
/// all sub-tasks.
pub fn print_subtasks(title: &str, issues: &[Issue]) {
    print_titled(title, &Table::new(issue_rows(issues, true)).to_string());
}

/// Print the sprint stats record.
pub fn print_stats(title: &str, stats: &SprintStats) {
    print_titled(title, &Table::new(stat_rows(stats)).to_string());
}

/// Print the board id/name listing for `--list-boards`.
pub fn print_boards(boards: &[Board]) {
    let rows: Vec<BoardRow> = boards
        .iter()
        .map(|b| BoardRow {
            id: b.id,
            name: b.name.clone(),
        })
        .collect();
    print_titled("Boards", &Table::new(rows).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprintstats_core::SUB_TASK_TYPE;

    fn issue(key: &str, type_name: &str) -> Issue {
        Issue {
            key: key.to_string(),
            summary: format!("Summary of {key}"),
            type_name: type_name.to_string(),
            story_points: None,
            created: None,
            resolved: None,
            subtask_keys: Vec::new(),
        }
    }

    #[test]
    fn test_issue_rows_exclude_sub_tasks() {
        let issues = vec![
            issue("PD-1", "Story"),
            issue("PD-2", SUB_TASK_TYPE),
            issue("PD-3", "Bug"),
        ];
        let rows = issue_rows(&issues, false);
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["PD-1", "PD-3"]);
    }

    #[test]
    fn test_issue_rows_can_keep_sub_tasks() {
        let issues = vec![issue("PD-2", SUB_TASK_TYPE)];
        assert_eq!(issue_rows(&issues, true).len(), 1);
    }

    #[test]
    fn test_stat_rows_sorted_by_name() {
        let stats = SprintStats {
            velocity: 25.0,
            min_cycle_time: 2,
            max_cycle_time: 4,
            average_cycle_time: 3.0,
            cycle_time_stddev: 1.0,
        };
        let rows = stat_rows(&stats);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "average_cycle_time",
                "cycle_time_stddev",
                "max_cycle_time",
                "min_cycle_time",
                "velocity"
            ]
        );
    }

    #[test]
    fn test_stat_rows_formatting() {
        let stats = SprintStats {
            velocity: 22.5,
            min_cycle_time: -1,
            max_cycle_time: -1,
            average_cycle_time: -1.0,
            cycle_time_stddev: -1.0,
        };
        let rows = stat_rows(&stats);
        let velocity = rows.iter().find(|r| r.name == "velocity").unwrap();
        assert_eq!(velocity.value, "22.5");
        let min = rows.iter().find(|r| r.name == "min_cycle_time").unwrap();
        assert_eq!(min.value, "-1");
        let avg = rows.iter().find(|r| r.name == "average_cycle_time").unwrap();
        assert_eq!(avg.value, "-1.00");
    }

    #[test]
    fn test_format_points_trims_whole_numbers() {
        assert_eq!(format_points(25.0), "25");
        assert_eq!(format_points(0.0), "0");
        assert_eq!(format_points(12.5), "12.5");
    }
}
