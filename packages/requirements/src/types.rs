use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Priority levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Invalid priority: {0}. Must be one of: low, medium, high")]
pub struct InvalidPriority(pub String);

impl FromStr for Priority {
    type Err = InvalidPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(InvalidPriority(s.to_string())),
        }
    }
}

/// Workflow status of a requirement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    Draft,
    Approved,
    InProgress,
    Completed,
}

impl RequirementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementStatus::Draft => "draft",
            RequirementStatus::Approved => "approved",
            RequirementStatus::InProgress => "in_progress",
            RequirementStatus::Completed => "completed",
        }
    }
}

impl Default for RequirementStatus {
    fn default() -> Self {
        RequirementStatus::Draft
    }
}

impl fmt::Display for RequirementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("Invalid status: {0}. Must be one of: draft, approved, in_progress, completed")]
pub struct InvalidStatus(pub String);

impl FromStr for RequirementStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(RequirementStatus::Draft),
            "approved" => Ok(RequirementStatus::Approved),
            "in_progress" => Ok(RequirementStatus::InProgress),
            "completed" => Ok(RequirementStatus::Completed),
            _ => Err(InvalidStatus(s.to_string())),
        }
    }
}

/// A requirement scoped to one project
#[derive(Debug, Clone, Serialize)]
pub struct Requirement {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: RequirementStatus,
    pub created_by: String,
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a requirement
#[derive(Debug, Clone)]
pub struct NewRequirement {
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub created_by: String,
    pub created_by_name: String,
}

/// Partial update: only provided fields change
#[derive(Debug, Clone, Default)]
pub struct RequirementUpdateInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<RequirementStatus>,
}

impl RequirementUpdateInput {
    /// An update with no provided fields is a no-op, not an error
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
    }
}
