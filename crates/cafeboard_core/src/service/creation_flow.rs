//! New-card creation flow.
//!
//! # Responsibility
//! - Track form visibility and the single in-flight submission.
//! - Validate form input, and turn a geocoding result into a `CardRecord`.
//!
//! # Invariants
//! - At most one submission is in flight; a second `begin` is rejected.
//! - A result is accepted only for the ticket issued by the latest `begin`,
//!   and only while the form has not been cancelled since.
//! - Lookup failures never produce a record.

use crate::geocode::{GeocodeCandidate, GeocodeError};
use crate::model::card::{CardDraft, CardRecord, CardValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raw form input. `keywords` comes from a separate prompt and may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardForm {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub address: String,
    pub keywords: Option<String>,
}

/// Identifies one `begin` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

/// A validated submission waiting for its address lookup.
///
/// Deliberately not `Clone`: each ticket completes at most once.
#[derive(Debug)]
pub struct PendingSubmission {
    ticket: SubmissionTicket,
    address: String,
    draft: CardDraft,
}

impl PendingSubmission {
    pub fn ticket(&self) -> SubmissionTicket {
        self.ticket
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

#[derive(Debug)]
pub enum CreationError {
    /// A required card field is blank.
    Validation(CardValidationError),
    MissingAddress,
    SubmissionInFlight,
    /// The geocoder found no candidates.
    LookupEmpty,
    LookupFailed(GeocodeError),
    /// The first candidate's coordinates fail card validation.
    InvalidCoordinates(CardValidationError),
    /// The form was cancelled or superseded while the lookup ran.
    Abandoned,
}

impl Display for CreationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::MissingAddress => write!(f, "required field `address` is empty"),
            Self::SubmissionInFlight => write!(f, "a submission is already in flight"),
            Self::LookupEmpty => write!(f, "address lookup returned no results"),
            Self::LookupFailed(err) => write!(f, "{err}"),
            Self::InvalidCoordinates(err) => write!(f, "address lookup returned {err}"),
            Self::Abandoned => write!(f, "submission was abandoned"),
        }
    }
}

impl Error for CreationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) | Self::InvalidCoordinates(err) => Some(err),
            Self::LookupFailed(err) => Some(err),
            Self::MissingAddress
            | Self::SubmissionInFlight
            | Self::LookupEmpty
            | Self::Abandoned => None,
        }
    }
}

#[derive(Debug)]
pub struct CreationFlow {
    visible: bool,
    generation: u64,
    in_flight: Option<u64>,
    default_keywords: String,
}

impl CreationFlow {
    pub fn new(default_keywords: impl Into<String>) -> Self {
        Self {
            visible: false,
            generation: 0,
            in_flight: None,
            default_keywords: default_keywords.into(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Hides the form; any pending submission is abandoned.
    pub fn cancel(&mut self) {
        self.visible = false;
        self.in_flight = None;
    }

    /// Validates `form` and reserves the in-flight slot.
    pub fn begin(&mut self, form: CardForm) -> Result<PendingSubmission, CreationError> {
        if self.in_flight.is_some() {
            return Err(CreationError::SubmissionInFlight);
        }

        let draft = CardDraft {
            name: Some(form.name),
            description: Some(form.description),
            image_url: Some(form.image_url),
            latitude: None,
            longitude: None,
            keywords: form.keywords,
        };
        draft.check_text_fields().map_err(CreationError::Validation)?;
        if form.address.trim().is_empty() {
            return Err(CreationError::MissingAddress);
        }

        self.generation += 1;
        self.in_flight = Some(self.generation);
        Ok(PendingSubmission {
            ticket: SubmissionTicket(self.generation),
            address: form.address,
            draft,
        })
    }

    /// Consumes a pending submission with its lookup result.
    ///
    /// Releases the in-flight slot unless the submission was abandoned.
    pub fn finish(
        &mut self,
        pending: PendingSubmission,
        lookup: Result<Vec<GeocodeCandidate>, GeocodeError>,
    ) -> Result<CardRecord, CreationError> {
        if self.in_flight != Some(pending.ticket.0) {
            return Err(CreationError::Abandoned);
        }
        self.in_flight = None;

        let candidates = lookup.map_err(CreationError::LookupFailed)?;
        let first = candidates.first().ok_or(CreationError::LookupEmpty)?;

        let mut draft = pending.draft.with_defaults(&self.default_keywords);
        draft.latitude = Some(first.coordinates.latitude);
        draft.longitude = Some(first.coordinates.longitude);
        draft.validate().map_err(CreationError::InvalidCoordinates)
    }

    /// Hides the form after a committed submission.
    pub fn complete(&mut self) {
        self.visible = false;
    }
}
