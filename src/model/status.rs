use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowercase and drop separators so "On Hold", "on-hold" and "on_hold" agree
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Task status as derived from OmniFocus' completed/dropped/blocked flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Available or waiting on its defer date
    Active,
    /// Waiting on a sequential predecessor
    Blocked,
    Completed,
    Dropped,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Completed => "completed",
            TaskStatus::Dropped => "dropped",
        }
    }

    /// Derive the status from the flags a task record carries
    pub fn from_flags(completed: bool, dropped: bool, blocked: bool) -> Self {
        if completed {
            TaskStatus::Completed
        } else if dropped {
            TaskStatus::Dropped
        } else if blocked {
            TaskStatus::Blocked
        } else {
            TaskStatus::Active
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "active" | "available" | "incomplete" => Ok(TaskStatus::Active),
            "blocked" => Ok(TaskStatus::Blocked),
            "completed" | "complete" | "done" => Ok(TaskStatus::Completed),
            "dropped" => Ok(TaskStatus::Dropped),
            _ => Err(format!(
                "Invalid task status '{}'. Valid options are: active, completed, dropped",
                s
            )),
        }
    }
}

/// Project status as exposed by OmniFocus' `status` property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    OnHold,
    Done,
    Dropped,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::OnHold => "on_hold",
            ProjectStatus::Done => "done",
            ProjectStatus::Dropped => "dropped",
        }
    }

    /// The AppleScript enumeration constant for this status
    pub fn script_constant(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active status",
            ProjectStatus::OnHold => "on hold status",
            ProjectStatus::Done => "done status",
            ProjectStatus::Dropped => "dropped status",
        }
    }

    /// Parse the text OmniFocus prints for `status of p as text`
    pub fn from_script_text(s: &str) -> Option<Self> {
        match s.trim() {
            "active status" | "active" => Some(ProjectStatus::Active),
            "on hold status" | "on hold" => Some(ProjectStatus::OnHold),
            "done status" | "done" => Some(ProjectStatus::Done),
            "dropped status" | "dropped" => Some(ProjectStatus::Dropped),
            _ => None,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "active" | "activestatus" => Ok(ProjectStatus::Active),
            "onhold" | "onholdstatus" | "paused" => Ok(ProjectStatus::OnHold),
            "done" | "donestatus" | "completed" | "complete" => Ok(ProjectStatus::Done),
            "dropped" | "droppedstatus" => Ok(ProjectStatus::Dropped),
            _ => Err(format!(
                "Invalid project status '{}'. Valid options are: active, on_hold, done, dropped",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_status_accepts_spelling_variants() {
        for input in ["on_hold", "On Hold", "on-hold", "ONHOLD", "on hold status"] {
            assert_eq!(input.parse::<ProjectStatus>().unwrap(), ProjectStatus::OnHold);
        }
        assert!("someday".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_project_status_script_text_round_trip() {
        for status in [
            ProjectStatus::Active,
            ProjectStatus::OnHold,
            ProjectStatus::Done,
            ProjectStatus::Dropped,
        ] {
            assert_eq!(
                ProjectStatus::from_script_text(status.script_constant()),
                Some(status)
            );
        }
    }

    #[test]
    fn test_task_status_from_flags_prefers_completed() {
        assert_eq!(TaskStatus::from_flags(true, true, true), TaskStatus::Completed);
        assert_eq!(TaskStatus::from_flags(false, true, true), TaskStatus::Dropped);
        assert_eq!(TaskStatus::from_flags(false, false, true), TaskStatus::Blocked);
        assert_eq!(TaskStatus::from_flags(false, false, false), TaskStatus::Active);
    }

    #[test]
    fn test_task_status_parse() {
        assert_eq!("Completed".parse::<TaskStatus>().unwrap(), TaskStatus::Completed);
        assert_eq!("done".parse::<TaskStatus>().unwrap(), TaskStatus::Completed);
        assert!("waiting".parse::<TaskStatus>().is_err());
    }
}
