use tracing::{debug, warn};

use shared_models::AppointmentStatus;

use crate::models::AppointmentError;

/// Outcome of a requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Apply(AppointmentStatus),
    /// Already in the requested state.
    Unchanged,
}

pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    /// `booked` may move to `cancelled` or `completed`. Terminal states absorb,
    /// and re-cancelling a cancelled appointment is accepted as a no-op.
    pub fn validate_status_transition(
        current: AppointmentStatus,
        requested: AppointmentStatus,
    ) -> Result<Transition, AppointmentError> {
        debug!("Validating status transition from {} to {}", current, requested);

        match (current, requested) {
            (AppointmentStatus::Booked, AppointmentStatus::Cancelled | AppointmentStatus::Completed) => {
                Ok(Transition::Apply(requested))
            }
            (AppointmentStatus::Cancelled, AppointmentStatus::Cancelled) => Ok(Transition::Unchanged),
            _ => {
                warn!("Invalid status transition attempted: {} -> {}", current, requested);
                Err(AppointmentError::InvalidStatusTransition {
                    from: current,
                    to: requested,
                })
            }
        }
    }

    pub fn valid_transitions(current: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current {
            AppointmentStatus::Booked => vec![AppointmentStatus::Cancelled, AppointmentStatus::Completed],
            AppointmentStatus::Cancelled | AppointmentStatus::Completed => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    use AppointmentStatus::*;

    #[test]
    fn test_booked_moves_to_terminal_states() {
        assert_eq!(
            AppointmentLifecycleService::validate_status_transition(Booked, Cancelled).unwrap(),
            Transition::Apply(Cancelled)
        );
        assert_eq!(
            AppointmentLifecycleService::validate_status_transition(Booked, Completed).unwrap(),
            Transition::Apply(Completed)
        );
    }

    #[test]
    fn test_cancel_is_idempotent() {
        assert_eq!(
            AppointmentLifecycleService::validate_status_transition(Cancelled, Cancelled).unwrap(),
            Transition::Unchanged
        );
    }

    #[test]
    fn test_terminal_states_absorb() {
        for (from, to) in [(Completed, Cancelled), (Completed, Completed), (Cancelled, Completed), (Cancelled, Booked), (Booked, Booked)] {
            assert_matches!(
                AppointmentLifecycleService::validate_status_transition(from, to),
                Err(AppointmentError::InvalidStatusTransition { .. })
            );
        }
    }

    #[test]
    fn test_valid_transitions_match_validation() {
        for current in [Booked, Cancelled, Completed] {
            for next in AppointmentLifecycleService::valid_transitions(current) {
                assert!(AppointmentLifecycleService::validate_status_transition(current, next).is_ok());
            }
        }
        assert!(AppointmentLifecycleService::valid_transitions(Completed).is_empty());
    }
}
