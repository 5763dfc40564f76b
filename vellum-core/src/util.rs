//! Clock and identifier collaborators.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Returns the current instant.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Renders a timestamp as an ISO-8601 string with millisecond precision,
/// e.g. `2024-01-01T00:00:00.000Z`.
pub(crate) fn timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Generates a collision-resistant document identifier (UUID v4).
pub(crate) fn new_document_id() -> String {
    Uuid::new_v4().to_string()
}
