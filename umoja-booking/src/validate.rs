use crate::draft::{BookingDraft, BookingType};
use crate::steps::Step;

/// Per-step validation failures. The Display strings are the exact
/// messages surfaced to the customer; nothing structured leaves this
/// layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("Please select a booking type")]
    MissingBookingType,

    #[error("Please select a tour or event")]
    MissingItem,

    #[error("Please choose a travel date")]
    MissingDate,

    #[error("At least one adult is required")]
    NoAdults,

    #[error("Please enter your first and last name")]
    MissingName,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please agree to the terms and conditions")]
    TermsNotAccepted,
}

/// Pure gate for forward navigation. Runs only on Next/Submit; backward
/// navigation is never validated. Must not mutate the draft.
pub fn validate_step(step: Step, draft: &BookingDraft) -> Result<(), StepError> {
    match step {
        Step::SelectType => {
            if draft.booking_type == BookingType::Unset {
                return Err(StepError::MissingBookingType);
            }
            if draft.item_id.is_none() {
                return Err(StepError::MissingItem);
            }
            Ok(())
        }
        Step::TripDetails => {
            if draft.date.trim().is_empty() {
                return Err(StepError::MissingDate);
            }
            if draft.adults < 1 {
                return Err(StepError::NoAdults);
            }
            Ok(())
        }
        Step::PersonalInfo => {
            if draft.first_name.trim().is_empty() || draft.last_name.trim().is_empty() {
                return Err(StepError::MissingName);
            }
            if draft.email.trim().is_empty() || !draft.email.contains('@') {
                return Err(StepError::InvalidEmail);
            }
            if !draft.agree_to_terms {
                return Err(StepError::TermsNotAccepted);
            }
            Ok(())
        }
        // Terminal step, nothing left to collect
        Step::Confirmation => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tour_draft() -> BookingDraft {
        let mut draft = BookingDraft::default();
        draft.set_booking_type(BookingType::Tour);
        draft.select_item("hiking-001");
        draft
    }

    #[test]
    fn select_type_requires_type_then_item() {
        let draft = BookingDraft::default();
        assert_eq!(
            validate_step(Step::SelectType, &draft),
            Err(StepError::MissingBookingType)
        );

        let mut typed = BookingDraft::default();
        typed.set_booking_type(BookingType::Event);
        assert_eq!(
            validate_step(Step::SelectType, &typed),
            Err(StepError::MissingItem)
        );

        assert_eq!(validate_step(Step::SelectType, &tour_draft()), Ok(()));
    }

    #[test]
    fn trip_details_requires_date_and_an_adult() {
        let mut draft = tour_draft();
        assert_eq!(
            validate_step(Step::TripDetails, &draft),
            Err(StepError::MissingDate)
        );

        draft.set_date("2026-09-15");
        draft.set_party(0, 2);
        assert_eq!(
            validate_step(Step::TripDetails, &draft),
            Err(StepError::NoAdults)
        );

        draft.set_party(2, 1);
        assert_eq!(validate_step(Step::TripDetails, &draft), Ok(()));
    }

    #[test]
    fn personal_info_checks_name_email_and_terms() {
        let mut draft = tour_draft();
        assert_eq!(
            validate_step(Step::PersonalInfo, &draft),
            Err(StepError::MissingName)
        );

        draft.set_contact("Asha", "Mrema", "not-an-email", "+255700000000");
        assert_eq!(
            validate_step(Step::PersonalInfo, &draft),
            Err(StepError::InvalidEmail)
        );

        draft.set_contact("Asha", "Mrema", "asha@example.com", "+255700000000");
        assert_eq!(
            validate_step(Step::PersonalInfo, &draft),
            Err(StepError::TermsNotAccepted)
        );

        draft.set_agree_to_terms(true);
        assert_eq!(validate_step(Step::PersonalInfo, &draft), Ok(()));
    }

    #[test]
    fn confirmation_always_passes() {
        assert_eq!(
            validate_step(Step::Confirmation, &BookingDraft::default()),
            Ok(())
        );
    }

    #[test]
    fn validation_never_mutates_the_draft() {
        let draft = BookingDraft::default();
        let before = draft.clone();
        let _ = validate_step(Step::SelectType, &draft);
        let _ = validate_step(Step::PersonalInfo, &draft);
        assert_eq!(draft, before);
    }
}
