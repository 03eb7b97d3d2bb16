use crate::draft::BookingDraft;
use crate::validate::{validate_step, StepError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The fixed 4-step wizard flow, in order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    SelectType,
    TripDetails,
    PersonalInfo,
    Confirmation,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::SelectType,
        Step::TripDetails,
        Step::PersonalInfo,
        Step::Confirmation,
    ];

    pub fn next(&self) -> Option<Step> {
        match self {
            Step::SelectType => Some(Step::TripDetails),
            Step::TripDetails => Some(Step::PersonalInfo),
            Step::PersonalInfo => Some(Step::Confirmation),
            Step::Confirmation => None,
        }
    }

    pub fn prev(&self) -> Option<Step> {
        match self {
            Step::SelectType => None,
            Step::TripDetails => Some(Step::SelectType),
            Step::PersonalInfo => Some(Step::TripDetails),
            Step::Confirmation => Some(Step::PersonalInfo),
        }
    }
}

/// Callback fired after every successful transition. The caller uses it
/// for presentation concerns (the UI scrolls back to the top of the
/// form); the sequencer itself stays free of view side effects.
pub type TransitionListener = Box<dyn Fn(Step) + Send + Sync>;

/// State machine over the ordered steps. Forward motion is gated by the
/// current step's validator; backward motion is unconditional. No
/// skipping in either direction.
pub struct StepSequencer {
    current: Step,
    completed: HashSet<Step>,
    on_transition: Option<TransitionListener>,
}

impl StepSequencer {
    pub fn new() -> Self {
        Self {
            current: Step::SelectType,
            completed: HashSet::new(),
            on_transition: None,
        }
    }

    pub fn with_listener(mut self, listener: TransitionListener) -> Self {
        self.on_transition = Some(listener);
        self
    }

    pub fn current(&self) -> Step {
        self.current
    }

    pub fn is_completed(&self, step: Step) -> bool {
        self.completed.contains(&step)
    }

    /// Validate the current step; on pass, mark it completed and move
    /// forward one. A failed validation leaves both the position and the
    /// draft untouched. No-op at the terminal step.
    pub fn advance(&mut self, draft: &BookingDraft) -> Result<Step, StepError> {
        validate_step(self.current, draft)?;
        self.completed.insert(self.current);
        if let Some(next) = self.current.next() {
            self.current = next;
            self.notify();
        }
        Ok(self.current)
    }

    /// Move back one step unconditionally. No-op at the first step.
    pub fn retreat(&mut self) -> Step {
        if let Some(prev) = self.current.prev() {
            self.current = prev;
            self.notify();
        }
        self.current
    }

    fn notify(&self) {
        if let Some(listener) = &self.on_transition {
            listener(self.current);
        }
    }
}

impl Default for StepSequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::BookingType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn complete_draft() -> BookingDraft {
        let mut draft = BookingDraft::default();
        draft.set_booking_type(BookingType::Tour);
        draft.select_item("hiking-001");
        draft.set_date("2026-09-15");
        draft.set_contact("Asha", "Mrema", "asha@example.com", "+255700000000");
        draft.set_agree_to_terms(true);
        draft
    }

    #[test]
    fn full_walk_through_all_steps() {
        let draft = complete_draft();
        let mut seq = StepSequencer::new();

        assert_eq!(seq.current(), Step::SelectType);
        assert_eq!(seq.advance(&draft), Ok(Step::TripDetails));
        assert_eq!(seq.advance(&draft), Ok(Step::PersonalInfo));
        assert_eq!(seq.advance(&draft), Ok(Step::Confirmation));
        assert!(seq.is_completed(Step::SelectType));
        assert!(seq.is_completed(Step::PersonalInfo));

        // Terminal: advancing again stays put
        assert_eq!(seq.advance(&draft), Ok(Step::Confirmation));
        assert_eq!(seq.current(), Step::Confirmation);
    }

    #[test]
    fn failed_validation_does_not_move_or_mutate() {
        let draft = BookingDraft::default();
        let before = draft.clone();
        let mut seq = StepSequencer::new();

        let err = seq.advance(&draft).unwrap_err();
        assert_eq!(err, StepError::MissingBookingType);
        assert_eq!(seq.current(), Step::SelectType);
        assert!(!seq.is_completed(Step::SelectType));
        assert_eq!(draft, before);
    }

    #[test]
    fn retreat_is_unconditional_and_stops_at_first_step() {
        let draft = complete_draft();
        let mut seq = StepSequencer::new();
        seq.advance(&draft).unwrap();
        seq.advance(&draft).unwrap();

        assert_eq!(seq.retreat(), Step::TripDetails);
        assert_eq!(seq.retreat(), Step::SelectType);
        assert_eq!(seq.retreat(), Step::SelectType);
    }

    #[test]
    fn listener_fires_on_every_transition() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let draft = complete_draft();

        let mut seq = StepSequencer::new().with_listener(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        seq.advance(&draft).unwrap();
        seq.retreat();
        assert_eq!(fired.load(Ordering::SeqCst), 2);

        // No transition on a no-op retreat at the first step
        seq.retreat();
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }
}
