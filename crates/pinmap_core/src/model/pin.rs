//! Pin domain model.
//!
//! # Responsibility
//! - Define the canonical record shared by generic/location/event pins.
//! - Sanitize every untrusted field on its way into the model.
//! - Own the event-glyph remap table and the HTML fragment helpers the
//!   front-end map consumes.
//!
//! # Invariants
//! - `id` is assigned by storage on first insert and never reused.
//! - Two pins are equal iff their ids are equal (null-safe).
//! - Both dates set means event, neither means location; a half-open date
//!   range is invalid in every variant.

use crate::address::decompose;
use crate::sanitize::sanitize;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Storage-assigned surrogate key for pins.
pub type PinId = i64;

const NAME_MAX_CHARS: usize = 120;
const STREET_MAX_CHARS: usize = 120;
const TOWN_MAX_CHARS: usize = 120;
const STATE_MAX_CHARS: usize = 8;
const ZIP_MAX_CHARS: usize = 5;
const COORDINATES_MAX_CHARS: usize = 80;
const THUMBNAIL_MAX_CHARS: usize = 255;
const LINK_MAX_CHARS: usize = 255;

/// Display category of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinKind {
    /// Storage-facing unified shape; accepts either complete date state.
    Generic,
    /// Permanent place of interest, no date range.
    Location,
    /// Scheduled happening with a start and end date.
    Event,
}

/// Field state shared by every pin variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PinRecord {
    /// Unset until the first insert commits; immutable thereafter.
    pub id: Option<PinId>,
    /// Display glyph selector; events use a remapped glyph slot.
    pub icon_id: i32,
    pub name: String,
    pub street: String,
    pub town: String,
    pub state: String,
    pub zip: String,
    /// Encodes a lat/long pair but is stored opaquely.
    pub coordinates: String,
    pub content: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Bare filename or a pre-built `<img>` fragment.
    pub thumbnail: String,
    /// URL or bare hostname.
    pub link: String,
    /// Whether the record came from an external data feed rather than a
    /// manual admin entry.
    pub api_sourced: bool,
}

/// A map pin, tagged by display category over one shared record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Pin {
    Generic(PinRecord),
    Location(PinRecord),
    Event(PinRecord),
}

/// Validation failures for pin state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinValidationError {
    /// Exactly one of start/end date is set.
    HalfOpenDateRange,
    /// An event pin is missing its date range.
    MissingDateRange,
    /// A location pin carries a date range.
    UnexpectedDateRange,
    /// A text field exceeds its persisted column width.
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

impl Display for PinValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HalfOpenDateRange => {
                write!(f, "pin has exactly one of start/end date set")
            }
            Self::MissingDateRange => write!(f, "event pin requires both start and end dates"),
            Self::UnexpectedDateRange => write!(f, "location pin must not carry dates"),
            Self::FieldTooLong { field, max, actual } => {
                write!(f, "pin field `{field}` is {actual} chars, max {max}")
            }
        }
    }
}

impl Error for PinValidationError {}

impl Pin {
    /// Creates an empty pin of the given kind.
    pub fn new(kind: PinKind) -> Self {
        Self::from_record(kind, PinRecord::default())
    }

    /// Wraps an existing record in the given kind's representation.
    pub fn from_record(kind: PinKind, record: PinRecord) -> Self {
        match kind {
            PinKind::Generic => Self::Generic(record),
            PinKind::Location => Self::Location(record),
            PinKind::Event => Self::Event(record),
        }
    }

    pub fn kind(&self) -> PinKind {
        match self {
            Self::Generic(_) => PinKind::Generic,
            Self::Location(_) => PinKind::Location,
            Self::Event(_) => PinKind::Event,
        }
    }

    pub fn record(&self) -> &PinRecord {
        match self {
            Self::Generic(record) | Self::Location(record) | Self::Event(record) => record,
        }
    }

    pub fn record_mut(&mut self) -> &mut PinRecord {
        match self {
            Self::Generic(record) | Self::Location(record) | Self::Event(record) => record,
        }
    }

    pub fn into_record(self) -> PinRecord {
        match self {
            Self::Generic(record) | Self::Location(record) | Self::Event(record) => record,
        }
    }

    pub fn id(&self) -> Option<PinId> {
        self.record().id
    }

    /// Copies every field of `other` into this pin, keeping this pin's
    /// variant. Used to carry one variant's state into another
    /// representation.
    pub fn copy_from(&mut self, other: &Pin) {
        *self.record_mut() = other.record().clone();
    }

    pub fn set_icon_id(&mut self, icon_id: i32) {
        self.record_mut().icon_id = icon_id;
    }

    /// Sanitizes and stores the display name.
    pub fn set_name(&mut self, raw: Option<&str>) {
        self.record_mut().name = sanitize(raw);
    }

    /// Decomposes one free-text address line into the four address fields.
    ///
    /// Decomposed values are stored as-is; callers feeding untrusted text
    /// sanitize it first.
    pub fn set_address(&mut self, raw_address: &str) {
        let parts = decompose(raw_address);
        let record = self.record_mut();
        record.street = parts.street;
        record.town = parts.town;
        record.state = parts.state;
        record.zip = parts.zip;
    }

    /// Sanitizes and stores the coordinate text.
    pub fn set_coordinates(&mut self, raw: Option<&str>) {
        self.record_mut().coordinates = sanitize(raw);
    }

    /// Sanitizes and stores the body content.
    pub fn set_content(&mut self, raw: Option<&str>) {
        self.record_mut().content = sanitize(raw);
    }

    /// Stores body content without sanitization.
    ///
    /// For writers that hold pre-sanitized or trusted HTML.
    pub fn set_content_raw(&mut self, content: impl Into<String>) {
        self.record_mut().content = content.into();
    }

    /// Sanitizes and stores the start date; absent or empty input clears it.
    pub fn set_start_date(&mut self, raw: Option<&str>) {
        self.record_mut().start_date = sanitize_date(raw);
    }

    /// Sanitizes and stores the end date; absent or empty input clears it.
    pub fn set_end_date(&mut self, raw: Option<&str>) {
        self.record_mut().end_date = sanitize_date(raw);
    }

    /// Stores the thumbnail verbatim; absent input clears it.
    ///
    /// The thumbnail may be a bare filename or a pre-built `<img>` fragment
    /// that `thumbnail_html` must return unchanged, so this path never
    /// strips or escapes. Fragment-bearing writers are trusted, like
    /// `set_content_raw` callers.
    pub fn set_thumbnail(&mut self, raw: Option<&str>) {
        self.record_mut().thumbnail = raw.unwrap_or_default().to_string();
    }

    pub fn set_link(&mut self, raw: Option<&str>) {
        self.record_mut().link = sanitize(raw);
    }

    pub fn set_api_sourced(&mut self, api_sourced: bool) {
        self.record_mut().api_sourced = api_sourced;
    }

    /// Whether this pin carries a complete date range.
    pub fn has_date_range(&self) -> bool {
        let record = self.record();
        record.start_date.is_some() && record.end_date.is_some()
    }

    /// Reassembles the four address fields into one display string.
    pub fn location_address(&self) -> String {
        let record = self.record();
        format!(
            "{}, {}, {} {}",
            record.street, record.town, record.state, record.zip
        )
    }

    /// Renders the thumbnail as an HTML fragment.
    ///
    /// Empty thumbnails render as empty text; a value that already contains
    /// an `<img` fragment is returned unchanged; a bare filename is wrapped
    /// in a fixed 100x100 image tag rooted at `base_url`.
    pub fn thumbnail_html(&self, base_url: &str) -> String {
        let thumbnail = self.record().thumbnail.as_str();
        if thumbnail.is_empty() {
            return String::new();
        }
        if thumbnail.contains("<img") {
            return thumbnail.to_string();
        }
        format!(r#"<img src="{base_url}{thumbnail}" width="100" height="100">"#)
    }

    /// Renders the link as an anchor opening in a new context.
    ///
    /// Values already carrying an `http://` or `https://` scheme are used
    /// as-is; anything else is prefixed with `http://`.
    pub fn link_html(&self) -> String {
        let link = self.record().link.as_str();
        if link.is_empty() {
            return String::new();
        }
        let href = if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            format!("http://{link}")
        };
        format!(r#"<a href="{href}" target="_blank">{link}</a>"#)
    }

    /// Checks this pin's state against its variant contract.
    ///
    /// # Errors
    /// - `HalfOpenDateRange` when exactly one date is set, in any variant.
    /// - `MissingDateRange`/`UnexpectedDateRange` when the date state
    ///   contradicts the variant.
    /// - `FieldTooLong` when a field exceeds its persisted column width.
    pub fn validate(&self) -> Result<(), PinValidationError> {
        let record = self.record();

        match (record.start_date.as_deref(), record.end_date.as_deref()) {
            (Some(_), None) | (None, Some(_)) => {
                return Err(PinValidationError::HalfOpenDateRange)
            }
            (Some(_), Some(_)) => {
                if self.kind() == PinKind::Location {
                    return Err(PinValidationError::UnexpectedDateRange);
                }
            }
            (None, None) => {
                if self.kind() == PinKind::Event {
                    return Err(PinValidationError::MissingDateRange);
                }
            }
        }

        check_width("name", &record.name, NAME_MAX_CHARS)?;
        check_width("street", &record.street, STREET_MAX_CHARS)?;
        check_width("town", &record.town, TOWN_MAX_CHARS)?;
        check_width("state", &record.state, STATE_MAX_CHARS)?;
        check_width("zip", &record.zip, ZIP_MAX_CHARS)?;
        check_width("coordinates", &record.coordinates, COORDINATES_MAX_CHARS)?;
        check_width("thumbnail", &record.thumbnail, THUMBNAIL_MAX_CHARS)?;
        check_width("link", &record.link, LINK_MAX_CHARS)?;

        Ok(())
    }
}

/// Equality derives solely from the surrogate key, null-safe: two pins that
/// have not been inserted yet compare equal.
impl PartialEq for Pin {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Pin {}

impl Hash for Pin {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

/// Maps a location glyph to its event glyph at the same logical slot.
///
/// Applied only when a pin carries a complete date range; codes outside the
/// table pass through unchanged.
pub fn event_icon(icon_id: i32) -> i32 {
    match icon_id {
        1 | 4 => 9,
        2 => 8,
        3 => 13,
        5 => 11,
        6 => 10,
        7 => 12,
        other => other,
    }
}

fn sanitize_date(raw: Option<&str>) -> Option<String> {
    let cleaned = sanitize(raw);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn check_width(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), PinValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(PinValidationError::FieldTooLong { field, max, actual });
    }
    Ok(())
}
