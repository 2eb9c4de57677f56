use super::status::ProjectStatus;
use crate::error::ParseError;
use crate::parser::{FromRecord, Record};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit of a project's review interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewUnit {
    Day,
    Week,
    Month,
    Year,
}

impl ReviewUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewUnit::Day => "day",
            ReviewUnit::Week => "week",
            ReviewUnit::Month => "month",
            ReviewUnit::Year => "year",
        }
    }
}

impl FromStr for ReviewUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().trim_end_matches('s') {
            "day" => Ok(ReviewUnit::Day),
            "week" => Ok(ReviewUnit::Week),
            "month" => Ok(ReviewUnit::Month),
            "year" => Ok(ReviewUnit::Year),
            _ => Err(format!("Invalid review unit '{}'", s)),
        }
    }
}

/// How often a project comes up for review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewInterval {
    pub steps: u32,
    pub unit: ReviewUnit,
}

impl ReviewInterval {
    pub fn weeks(steps: u32) -> Self {
        Self {
            steps,
            unit: ReviewUnit::Week,
        }
    }

    /// Interval length in weeks, when it is expressed in weeks
    pub fn as_weeks(&self) -> Option<u32> {
        (self.unit == ReviewUnit::Week).then_some(self.steps)
    }
}

impl fmt::Display for ReviewInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.steps, self.unit.as_str())
    }
}

impl FromStr for ReviewInterval {
    type Err = String;

    /// Parse the "<steps> <unit>" pair the prelude prints
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(steps), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!("Invalid review interval '{}'", s));
        };
        let steps = steps
            .parse::<u32>()
            .map_err(|_| format!("Invalid review interval steps '{}'", steps))?;
        Ok(ReviewInterval {
            steps,
            unit: unit.parse()?,
        })
    }
}

/// An OmniFocus project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub note: String,
    /// Folder names from the top level down; empty for top-level projects
    pub folder_path: Vec<String>,
    /// Id of the containing folder; absent for top-level projects
    pub folder_id: Option<String>,
    pub status: ProjectStatus,
    /// Actions must be completed in order
    pub sequential: bool,
    pub flagged: bool,
    pub due_date: Option<NaiveDateTime>,
    pub defer_date: Option<NaiveDateTime>,
    pub review_interval: Option<ReviewInterval>,
    pub last_reviewed: Option<NaiveDateTime>,
    pub next_review: Option<NaiveDateTime>,
}

impl FromRecord for Project {
    const KIND: &'static str = "project";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "note",
        "folder_path",
        "folder_id",
        "status",
        "sequential",
        "flagged",
        "due_date",
        "defer_date",
        "review_interval",
        "last_reviewed",
        "next_review",
    ];

    fn from_record(record: &Record<'_>) -> Result<Self, ParseError> {
        let status_text = record.text("status")?;
        let status = ProjectStatus::from_script_text(&status_text).ok_or_else(|| {
            record.error(format!("unknown project status '{}'", status_text))
        })?;
        let review_interval = match record.opt_text("review_interval")? {
            Some(text) => Some(text.parse::<ReviewInterval>().map_err(|e| record.error(e))?),
            None => None,
        };

        Ok(Project {
            id: record.required_text("id")?,
            name: record.text("name")?,
            note: record.text("note")?,
            folder_path: record.list("folder_path")?,
            folder_id: record.opt_text("folder_id")?,
            status,
            sequential: record.bool("sequential")?,
            flagged: record.bool("flagged")?,
            due_date: record.opt_datetime("due_date")?,
            defer_date: record.opt_datetime("defer_date")?,
            review_interval,
            last_reviewed: record.opt_datetime("last_reviewed")?,
            next_review: record.opt_datetime("next_review")?,
        })
    }
}
