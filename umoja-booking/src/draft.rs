use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the customer is booking. `Unset` until the first wizard step is
/// answered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingType {
    Unset,
    Tour,
    Event,
}

/// Authenticated session identity, optional. Anonymous bookings are fully
/// supported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

/// Mutable form state for one wizard instance. Owned exclusively by the
/// wizard for its lifetime and discarded with it.
///
/// Mutation goes through typed setters rather than stringly-typed field
/// events, so invariants like "changing the booking type clears the item"
/// live in exactly one place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingDraft {
    pub booking_type: BookingType,
    pub item_id: Option<String>,
    pub destination: String,
    pub date: String,
    pub adults: u32,
    pub children: u32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub special_requests: String,
    pub agree_to_terms: bool,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            booking_type: BookingType::Unset,
            item_id: None,
            destination: String::new(),
            date: String::new(),
            adults: 1,
            children: 0,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            special_requests: String::new(),
            agree_to_terms: false,
        }
    }
}

impl BookingDraft {
    /// Switching type invalidates any previously chosen item: a tour id is
    /// meaningless under an event booking and vice versa.
    pub fn set_booking_type(&mut self, booking_type: BookingType) {
        if booking_type != self.booking_type {
            self.item_id = None;
        }
        self.booking_type = booking_type;
    }

    pub fn select_item(&mut self, item_id: impl Into<String>) {
        self.item_id = Some(item_id.into());
    }

    pub fn set_destination(&mut self, destination: impl Into<String>) {
        self.destination = destination.into();
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.date = date.into();
    }

    pub fn set_party(&mut self, adults: u32, children: u32) {
        self.adults = adults;
        self.children = children;
    }

    pub fn set_contact(
        &mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self.email = email.into();
        self.phone = phone.into();
    }

    pub fn set_special_requests(&mut self, text: impl Into<String>) {
        self.special_requests = text.into();
    }

    pub fn set_agree_to_terms(&mut self, agreed: bool) {
        self.agree_to_terms = agreed;
    }

    /// Pre-fill contact fields from an authenticated session. Only fills
    /// blanks; never overwrites what the customer already typed.
    pub fn prefill_identity(&mut self, user: &CurrentUser) {
        if self.email.is_empty() {
            self.email = user.email.clone();
        }
    }

    pub fn party_size(&self) -> u32 {
        self.adults + self.children
    }
}
