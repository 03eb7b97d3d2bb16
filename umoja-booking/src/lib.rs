pub mod draft;
pub mod memory;
pub mod models;
pub mod pricing;
pub mod steps;
pub mod submit;
pub mod validate;
pub mod wizard;

pub use draft::{BookingDraft, BookingType, CurrentUser};
pub use memory::MemoryBookingStore;
pub use models::{
    BookingAdmin, BookingPayload, BookingRecord, BookingStatus, BookingWriter,
    CreateBookingOutcome, PaymentStatus, ReferenceSource,
};
pub use pricing::PriceQuote;
pub use steps::{Step, StepSequencer};
pub use submit::{BookingSubmitter, SubmissionState, SubmitError};
pub use validate::{validate_step, StepError};
pub use wizard::{BookingWizard, MountParams};
