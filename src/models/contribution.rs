//! Contribution record and its closed enumerations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::RollbackId;
use crate::errors::AppError;

/// Compensation category of a contribution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Size {
    Small,
    Medium,
    NoCompensation,
    Large,
    CompetenceDevelopment,
}

impl Size {
    pub const ALL: [Size; 5] = [
        Size::Small,
        Size::Medium,
        Size::NoCompensation,
        Size::Large,
        Size::CompetenceDevelopment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::Small => "SMALL",
            Size::Medium => "MEDIUM",
            Size::NoCompensation => "NO_COMPENSATION",
            Size::Large => "LARGE",
            Size::CompetenceDevelopment => "COMPETENCE_DEVELOPMENT",
        }
    }
}

impl FromStr for Size {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SMALL" => Ok(Size::Small),
            "MEDIUM" => Ok(Size::Medium),
            "NO_COMPENSATION" => Ok(Size::NoCompensation),
            "LARGE" => Ok(Size::Large),
            "COMPETENCE_DEVELOPMENT" => Ok(Size::CompetenceDevelopment),
            other => Err(AppError::InvalidRecord(format!(
                "Unknown contribution size {}, expected one of {}",
                other,
                join(&Size::ALL)
            ))),
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review status of a contribution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Initial,
    Pending,
    Accepted,
    Declined,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Initial,
        Status::Pending,
        Status::Accepted,
        Status::Declined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Initial => "INITIAL",
            Status::Pending => "PENDING",
            Status::Accepted => "ACCEPTED",
            Status::Declined => "DECLINED",
        }
    }

    /// Attachment color used when rendering a contribution in this status.
    ///
    /// `None` leaves the color to the chat client's default rendering.
    pub fn color(&self) -> Option<&'static str> {
        match self {
            Status::Initial => None,
            Status::Pending => Some("#ffff00"),
            Status::Accepted => Some("#36a64f"),
            Status::Declined => Some("#ff0000"),
        }
    }

    /// Whether the status is a review outcome.
    pub fn is_final(&self) -> bool {
        matches!(self, Status::Accepted | Status::Declined)
    }
}

impl FromStr for Status {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INITIAL" => Ok(Status::Initial),
            "PENDING" => Ok(Status::Pending),
            "ACCEPTED" => Ok(Status::Accepted),
            "DECLINED" => Ok(Status::Declined),
            other => Err(AppError::InvalidRecord(format!(
                "Unknown contribution status {}, expected one of {}",
                other,
                join(&Status::ALL)
            ))),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn join<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A single reported act of open source work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub id: String,
    pub sequence: String,
    /// Creation time in epoch milliseconds
    pub timestamp: i64,
    pub username: String,
    pub private_channel: String,
    pub size: Size,
    pub status: Status,
    pub text: String,
}

impl Contribution {
    pub fn rollback_id(&self) -> RollbackId {
        RollbackId::new(&self.id, &self.sequence)
    }
}

/// Request body for recording a new contribution.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContributionRequest {
    /// Groups entries under an existing id; generated when absent
    #[serde(default)]
    pub id: Option<String>,
    pub username: String,
    pub private_channel: String,
    pub size: Size,
    pub text: String,
    #[serde(default)]
    pub status: Option<Status>,
}

/// Request body for the review flow.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: Status,
}
