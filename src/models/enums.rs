//! Shared domain enums

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

// ---------------------------------------------------------------------------
// ServiceStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a service ticket, one kanban column each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceStatus {
    Todo,
    InProgress,
    WaitingForParts,
    Done,
    Archived,
}

impl ServiceStatus {
    /// All statuses in board column order
    pub const ALL: [ServiceStatus; 5] = [
        ServiceStatus::Todo,
        ServiceStatus::InProgress,
        ServiceStatus::WaitingForParts,
        ServiceStatus::Done,
        ServiceStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Todo => "todo",
            ServiceStatus::InProgress => "in-progress",
            ServiceStatus::WaitingForParts => "waiting-for-parts",
            ServiceStatus::Done => "done",
            ServiceStatus::Archived => "archived",
        }
    }

    /// Column heading shown on the workshop board
    pub fn title(&self) -> &'static str {
        match self {
            ServiceStatus::Todo => "To Do",
            ServiceStatus::InProgress => "In Progress",
            ServiceStatus::WaitingForParts => "Waiting for Parts",
            ServiceStatus::Done => "Done",
            ServiceStatus::Archived => "Archived",
        }
    }

    /// Work finished (counts towards revenue)
    pub fn is_completed(&self) -> bool {
        matches!(self, ServiceStatus::Done | ServiceStatus::Archived)
    }

    /// Work started but not finished (counts towards estimated revenue)
    pub fn is_in_progress(&self) -> bool {
        matches!(self, ServiceStatus::InProgress | ServiceStatus::WaitingForParts)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ServiceStatus::Archived)
    }

    /// Check a move from `self` to `to`.
    ///
    /// Archived tickets never move, and only done tickets may be archived.
    /// Every other pair is allowed, including re-entering the same column.
    pub fn check_transition(&self, to: ServiceStatus) -> Result<(), AppError> {
        if self.is_terminal() {
            return Err(AppError::InvalidTransition(format!(
                "Ticket is archived and cannot be moved to {}",
                to
            )));
        }
        if to == ServiceStatus::Archived && *self != ServiceStatus::Done {
            return Err(AppError::InvalidTransition(format!(
                "Only done tickets can be archived (ticket is {})",
                self
            )));
        }
        Ok(())
    }
}

impl FromStr for ServiceStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Invalid status value: {}", s)))
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ServiceType
// ---------------------------------------------------------------------------

/// Kind of service requested at intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ServiceType {
    #[serde(rename = "Simple Service")]
    SimpleService,
    #[serde(rename = "Full Service")]
    FullService,
    #[serde(rename = "Other")]
    Other,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::SimpleService => "Simple Service",
            ServiceType::FullService => "Full Service",
            ServiceType::Other => "Other",
        }
    }
}

impl FromStr for ServiceType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Simple Service" => Ok(ServiceType::SimpleService),
            "Full Service" => Ok(ServiceType::FullService),
            "Other" => Ok(ServiceType::Other),
            _ => Err(AppError::Validation(format!("Invalid service type: {}", s))),
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in ServiceStatus::ALL {
            assert_eq!(status.as_str().parse::<ServiceStatus>().unwrap(), status);
        }
        assert_eq!(
            serde_json::to_string(&ServiceStatus::WaitingForParts).unwrap(),
            "\"waiting-for-parts\""
        );
    }

    #[test]
    fn test_unknown_status_is_validation_error() {
        assert!(matches!(
            "finished".parse::<ServiceStatus>(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_open_transitions_allowed() {
        let open = [
            ServiceStatus::Todo,
            ServiceStatus::InProgress,
            ServiceStatus::WaitingForParts,
            ServiceStatus::Done,
        ];
        for from in open {
            for to in open {
                assert!(from.check_transition(to).is_ok(), "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_archive_only_from_done() {
        assert!(ServiceStatus::Done.check_transition(ServiceStatus::Archived).is_ok());
        assert!(ServiceStatus::Todo.check_transition(ServiceStatus::Archived).is_err());
        assert!(ServiceStatus::InProgress.check_transition(ServiceStatus::Archived).is_err());
    }

    #[test]
    fn test_archived_is_terminal() {
        for to in ServiceStatus::ALL {
            assert!(matches!(
                ServiceStatus::Archived.check_transition(to),
                Err(AppError::InvalidTransition(_))
            ));
        }
    }

    #[test]
    fn test_service_type_labels() {
        assert_eq!(
            serde_json::to_string(&ServiceType::FullService).unwrap(),
            "\"Full Service\""
        );
        assert_eq!("Other".parse::<ServiceType>().unwrap(), ServiceType::Other);
        assert!("Repair".parse::<ServiceType>().is_err());
    }
}
