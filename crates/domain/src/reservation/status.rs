//! Reservation lifecycle.

use serde::{Deserialize, Serialize};

/// The status of a reservation.
///
/// Status transitions:
/// ```text
/// Pending ──► Confirmed
///    │            │
///    └────────────┴──► Canceled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ReservationStatus {
    /// Created and awaiting confirmation.
    #[default]
    Pending,

    /// Confirmed by the host.
    Confirmed,

    /// Canceled (terminal state).
    Canceled,
}

impl ReservationStatus {
    /// Returns true if guests, services and requests can still change.
    pub fn can_modify(&self) -> bool {
        !self.is_terminal()
    }

    pub fn can_confirm(&self) -> bool {
        matches!(self, ReservationStatus::Pending)
    }

    pub fn can_cancel(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReservationStatus::Canceled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::Canceled => "Canceled",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
