use crate::draft::{BookingDraft, BookingType, CurrentUser};
use crate::pricing::PriceQuote;
use crate::steps::{Step, StepSequencer, TransitionListener};
use crate::submit::{BookingSubmitter, SubmissionState, SubmitError};
use crate::models::BookingWriter;
use crate::validate::StepError;
use umoja_catalog::{CatalogItem, CatalogProvider, ItemKind};

/// Query parameters consumed at mount: `?tour=<id>` / `?event=<id>`
/// pre-select the booking and skip straight to trip details.
#[derive(Debug, Clone, Default)]
pub struct MountParams {
    pub tour: Option<String>,
    pub event: Option<String>,
}

/// One wizard instance: the draft, the step machine and the submitter,
/// wired to whatever catalog/write backends the caller configured. Local
/// to a single mount; dropped on navigation away.
pub struct BookingWizard {
    draft: BookingDraft,
    sequencer: StepSequencer,
    submitter: BookingSubmitter,
    user: Option<CurrentUser>,
}

impl BookingWizard {
    pub fn new(user: Option<CurrentUser>) -> Self {
        let mut draft = BookingDraft::default();
        if let Some(u) = &user {
            draft.prefill_identity(u);
        }
        Self {
            draft,
            sequencer: StepSequencer::new(),
            submitter: BookingSubmitter::new(),
            user,
        }
    }

    /// Mount with query pre-selection. A known item id selects type and
    /// item and completes the first step; an unknown or mismatched id is
    /// ignored and the wizard starts at the beginning.
    pub async fn mount(
        params: MountParams,
        user: Option<CurrentUser>,
        catalog: &dyn CatalogProvider,
    ) -> Self {
        let mut wizard = Self::new(user);

        let requested = match (&params.tour, &params.event) {
            (Some(id), _) => Some((id.clone(), BookingType::Tour, ItemKind::Tour)),
            (None, Some(id)) => Some((id.clone(), BookingType::Event, ItemKind::Event)),
            (None, None) => None,
        };

        if let Some((id, booking_type, kind)) = requested {
            match catalog.get(&id).await {
                Ok(Some(item)) if item.kind == kind => {
                    wizard.draft.set_booking_type(booking_type);
                    wizard.draft.select_item(item.id.clone());
                    wizard.draft.set_destination(item.location.clone());
                    // Pre-selection satisfies the first step's validator,
                    // so this lands on TripDetails with SelectType done.
                    let _ = wizard.sequencer.advance(&wizard.draft);
                }
                Ok(_) => {
                    tracing::warn!(item = %id, "mount pre-selection ignored: unknown or mismatched item");
                }
                Err(e) => {
                    tracing::warn!(item = %id, error = %e, "mount pre-selection skipped: catalog unavailable");
                }
            }
        }

        wizard
    }

    pub fn with_transition_listener(mut self, listener: TransitionListener) -> Self {
        self.sequencer = self.sequencer.with_listener(listener);
        self
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut BookingDraft {
        &mut self.draft
    }

    pub fn current_step(&self) -> Step {
        self.sequencer.current()
    }

    pub fn is_completed(&self, step: Step) -> bool {
        self.sequencer.is_completed(step)
    }

    pub fn submission(&self) -> &SubmissionState {
        self.submitter.state()
    }

    pub fn next(&mut self) -> Result<Step, StepError> {
        self.sequencer.advance(&self.draft)
    }

    pub fn back(&mut self) -> Step {
        self.sequencer.retreat()
    }

    /// Live price breakdown for the currently selected item. Derived on
    /// every call from the draft; nothing is cached.
    pub fn quote_for(&self, item: &CatalogItem) -> PriceQuote {
        PriceQuote::compute(item.price, self.draft.adults, self.draft.children)
    }

    /// Final-step submission. Confirmed and degraded-confirmed outcomes
    /// both advance to the confirmation step; a hard failure stays on
    /// personal info so the customer can retry. Only reachable from the
    /// personal info step; earlier steps must be walked first.
    pub async fn submit(
        &mut self,
        catalog: &dyn CatalogProvider,
        writer: &dyn BookingWriter,
    ) -> Result<SubmissionState, SubmitError> {
        if self.sequencer.current() != Step::PersonalInfo {
            return Err(SubmitError::WrongStep);
        }

        let state = self
            .submitter
            .submit(&self.draft, self.user.as_ref(), catalog, writer)
            .await?;

        match &state {
            SubmissionState::Confirmed { .. } | SubmissionState::DegradedConfirmed { .. } => {
                // Validator already passed inside submit(); this marks
                // PersonalInfo completed and moves to Confirmation.
                let _ = self.sequencer.advance(&self.draft);
            }
            _ => {}
        }

        Ok(state)
    }
}
