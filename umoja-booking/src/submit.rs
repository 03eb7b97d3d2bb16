use crate::draft::{BookingDraft, BookingType, CurrentUser};
use crate::models::{
    BookingPayload, BookingStatus, BookingWriter, PaymentStatus,
};
use crate::pricing::PriceQuote;
use crate::steps::Step;
use crate::validate::{validate_step, StepError};
use chrono::Utc;
use rand::Rng;
use umoja_catalog::{CatalogItem, CatalogProvider, ItemKind};

/// Submission lifecycle: `Idle → Submitting → {Confirmed,
/// DegradedConfirmed, Failed}`. `Submitting` is the only concurrency
/// guard; it blocks re-entrant submission from the same wizard instance.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Confirmed {
        reference: String,
    },
    /// The backend reported a problem but still issued a reference. The
    /// customer proceeds with a visible warning to retain the reference
    /// and contact support; `detail` carries the raw error text.
    DegradedConfirmed {
        reference: String,
        detail: String,
    },
    Failed {
        message: String,
    },
}

impl SubmissionState {
    /// Manual resubmission is allowed from every state except an
    /// in-flight one.
    pub fn can_submit(&self) -> bool {
        !matches!(self, SubmissionState::Submitting)
    }

    pub fn reference(&self) -> Option<&str> {
        match self {
            SubmissionState::Confirmed { reference }
            | SubmissionState::DegradedConfirmed { reference, .. } => Some(reference),
            _ => None,
        }
    }
}

/// Pre-flight failures. These abort before anything is written; write
/// outcomes (including hard write failures) are reported through
/// `SubmissionState` instead.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("A submission is already in progress")]
    AlreadySubmitting,

    #[error("Please complete the previous steps before submitting")]
    WrongStep,

    #[error(transparent)]
    Validation(#[from] StepError),

    #[error("The selected item is no longer available. Please choose another tour or event.")]
    ItemNotFound,

    #[error("The selected item does not match the chosen booking type")]
    KindMismatch,

    #[error("Catalog lookup failed: {0}")]
    CatalogUnavailable(String),
}

/// Fallback reference, zero-padded random 4 digits. Used only when the
/// write path returns no reference of its own; the store's reference is
/// authoritative.
pub fn fallback_reference() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("UE-{:04}", n)
}

pub struct BookingSubmitter {
    state: SubmissionState,
}

impl BookingSubmitter {
    pub fn new() -> Self {
        Self {
            state: SubmissionState::Idle,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Run the full submission flow once. Pre-flight failures return
    /// `Err` and leave the state unchanged; the single write attempt
    /// lands in `Confirmed`, `DegradedConfirmed` or `Failed`. No
    /// automatic retry anywhere.
    pub async fn submit(
        &mut self,
        draft: &BookingDraft,
        user: Option<&CurrentUser>,
        catalog: &dyn CatalogProvider,
        writer: &dyn BookingWriter,
    ) -> Result<SubmissionState, SubmitError> {
        if !self.state.can_submit() {
            return Err(SubmitError::AlreadySubmitting);
        }

        // 1. Gate on the final form step before any payload exists
        validate_step(Step::PersonalInfo, draft)?;

        // 2. Resolve the selected item; fatal if it vanished
        let item_id = draft.item_id.as_deref().ok_or(SubmitError::ItemNotFound)?;
        let item = catalog
            .get(item_id)
            .await
            .map_err(|e| SubmitError::CatalogUnavailable(e.to_string()))?
            .ok_or(SubmitError::ItemNotFound)?;

        let expected_kind = match draft.booking_type {
            BookingType::Tour => ItemKind::Tour,
            BookingType::Event => ItemKind::Event,
            BookingType::Unset => return Err(SubmitError::Validation(StepError::MissingBookingType)),
        };
        if item.kind != expected_kind {
            return Err(SubmitError::KindMismatch);
        }

        // 3. Build the payload and fire the single write
        let payload = build_payload(draft, user, &item);
        self.state = SubmissionState::Submitting;

        match writer.create_booking(&payload).await {
            Ok(outcome) => {
                let reference = if outcome.booking_reference.is_empty() {
                    payload.reference.clone()
                } else {
                    outcome.booking_reference.clone()
                };

                if outcome.is_authoritative() {
                    tracing::info!(reference = %reference, item = %item.id, "booking confirmed");
                    self.state = SubmissionState::Confirmed { reference };
                } else {
                    let detail = outcome
                        .error_details
                        .unwrap_or_else(|| "backend did not confirm the write".to_string());
                    tracing::warn!(reference = %reference, detail = %detail, "booking write degraded");
                    self.state = SubmissionState::DegradedConfirmed { reference, detail };
                }
            }
            Err(e) => {
                tracing::error!(error = %e, item = %item.id, "booking write failed");
                self.state = SubmissionState::Failed {
                    message: "We could not submit your booking. Please check your connection and try again."
                        .to_string(),
                };
            }
        }

        Ok(self.state.clone())
    }
}

impl Default for BookingSubmitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Assemble the booking payload from the draft, the optional session
/// identity and the resolved item. Totals are derived here, never taken
/// from the form.
pub fn build_payload(
    draft: &BookingDraft,
    user: Option<&CurrentUser>,
    item: &CatalogItem,
) -> BookingPayload {
    let quote = PriceQuote::compute(item.price, draft.adults, draft.children);
    let (tour_id, event_id) = match item.kind {
        ItemKind::Tour => (Some(item.id.clone()), None),
        ItemKind::Event => (None, Some(item.id.clone())),
    };

    let special_requests = draft.special_requests.trim();

    BookingPayload {
        reference: fallback_reference(),
        user_id: user.map(|u| u.id),
        first_name: draft.first_name.clone(),
        last_name: draft.last_name.clone(),
        email: draft.email.clone(),
        phone: draft.phone.clone(),
        tour_id,
        event_id,
        travel_date: draft.date.clone(),
        adults: draft.adults,
        children: draft.children,
        total: quote.total,
        deposit: quote.deposit,
        balance: quote.balance,
        status: BookingStatus::Pending,
        payment_status: PaymentStatus::Pending,
        special_requests: if special_requests.is_empty() {
            None
        } else {
            Some(special_requests.to_string())
        },
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateBookingOutcome, StoreResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use umoja_catalog::MemoryCatalog;
    use uuid::Uuid;

    struct ScriptedWriter {
        outcome: Mutex<Option<StoreResult<CreateBookingOutcome>>>,
        calls: AtomicUsize,
    }

    impl ScriptedWriter {
        fn ok(id: &str, reference: &str, detail: Option<&str>) -> Self {
            Self {
                outcome: Mutex::new(Some(Ok(CreateBookingOutcome {
                    id: id.to_string(),
                    booking_reference: reference.to_string(),
                    error_details: detail.map(str::to_string),
                }))),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                outcome: Mutex::new(Some(Err("connection reset".into()))),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BookingWriter for ScriptedWriter {
        async fn create_booking(
            &self,
            _payload: &BookingPayload,
        ) -> StoreResult<CreateBookingOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome
                .lock()
                .unwrap()
                .take()
                .expect("writer called more than scripted")
        }
    }

    fn ready_draft() -> BookingDraft {
        let mut draft = BookingDraft::default();
        draft.set_booking_type(BookingType::Tour);
        draft.select_item("hiking-001");
        draft.set_date("2026-09-15");
        draft.set_party(2, 1);
        draft.set_contact("Asha", "Mrema", "asha@example.com", "+255700000000");
        draft.set_agree_to_terms(true);
        draft
    }

    #[tokio::test]
    async fn authoritative_id_confirms() {
        let catalog = MemoryCatalog::seeded();
        let writer = ScriptedWriter::ok(&Uuid::new_v4().to_string(), "UE-4821", None);
        let mut submitter = BookingSubmitter::new();

        let state = submitter
            .submit(&ready_draft(), None, &catalog, &writer)
            .await
            .unwrap();

        assert_eq!(
            state,
            SubmissionState::Confirmed {
                reference: "UE-4821".to_string()
            }
        );
        assert_eq!(writer.call_count(), 1);
    }

    #[tokio::test]
    async fn soft_error_still_confirms_with_warning_detail() {
        let catalog = MemoryCatalog::seeded();
        let writer = ScriptedWriter::ok("error", "UE-1234", Some("timeout"));
        let mut submitter = BookingSubmitter::new();

        let state = submitter
            .submit(&ready_draft(), None, &catalog, &writer)
            .await
            .unwrap();

        match state {
            SubmissionState::DegradedConfirmed { reference, detail } => {
                assert_eq!(reference, "UE-1234");
                assert!(detail.contains("timeout"));
            }
            other => panic!("expected degraded confirmation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn hard_failure_sets_failed_state_with_no_retry() {
        let catalog = MemoryCatalog::seeded();
        let writer = ScriptedWriter::failing();
        let mut submitter = BookingSubmitter::new();

        let state = submitter
            .submit(&ready_draft(), None, &catalog, &writer)
            .await
            .unwrap();

        assert!(matches!(state, SubmissionState::Failed { .. }));
        assert_eq!(writer.call_count(), 1);
        // Manual resubmission stays possible
        assert!(submitter.state().can_submit());
    }

    #[tokio::test]
    async fn unchecked_terms_block_before_any_payload_is_built() {
        let catalog = MemoryCatalog::seeded();
        let writer = ScriptedWriter::ok("x", "UE-0000", None);
        let mut submitter = BookingSubmitter::new();

        let mut draft = ready_draft();
        draft.set_agree_to_terms(false);

        let err = submitter
            .submit(&draft, None, &catalog, &writer)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SubmitError::Validation(StepError::TermsNotAccepted)
        ));
        assert_eq!(writer.call_count(), 0);
        assert_eq!(*submitter.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn vanished_item_aborts_the_attempt() {
        let catalog = MemoryCatalog::empty();
        let writer = ScriptedWriter::ok("x", "UE-0000", None);
        let mut submitter = BookingSubmitter::new();

        let err = submitter
            .submit(&ready_draft(), None, &catalog, &writer)
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::ItemNotFound));
        assert_eq!(writer.call_count(), 0);
    }

    #[tokio::test]
    async fn kind_mismatch_is_rejected() {
        let catalog = MemoryCatalog::seeded();
        let writer = ScriptedWriter::ok("x", "UE-0000", None);
        let mut submitter = BookingSubmitter::new();

        let mut draft = ready_draft();
        // Event id under a tour booking type
        draft.item_id = Some("evt-001".to_string());

        let err = submitter
            .submit(&draft, None, &catalog, &writer)
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::KindMismatch));
    }

    #[tokio::test]
    async fn payload_carries_server_side_totals_and_identity() {
        let catalog = MemoryCatalog::seeded();
        let item = catalog.get("hiking-001").await.unwrap().unwrap();
        let user = CurrentUser {
            id: Uuid::new_v4(),
            email: "asha@example.com".to_string(),
        };

        let payload = build_payload(&ready_draft(), Some(&user), &item);

        assert!((payload.total - 647.40).abs() < 1e-9);
        assert!((payload.deposit - 647.40 * 0.2).abs() < 1e-9);
        assert_eq!(payload.user_id, Some(user.id));
        assert_eq!(payload.tour_id.as_deref(), Some("hiking-001"));
        assert_eq!(payload.event_id, None);
        assert_eq!(payload.status, BookingStatus::Pending);
        assert_eq!(payload.payment_status, PaymentStatus::Pending);
        assert!(payload.reference.starts_with("UE-"));
        assert_eq!(payload.reference.len(), 7);
    }

    #[test]
    fn fallback_reference_is_zero_padded() {
        for _ in 0..50 {
            let reference = fallback_reference();
            assert_eq!(reference.len(), 7);
            assert!(reference.starts_with("UE-"));
            assert!(reference[3..].chars().all(|c| c.is_ascii_digit()));
        }
    }
}
