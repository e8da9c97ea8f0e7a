use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod group;
pub mod health;
pub mod matches;
pub mod roster;
pub mod session;
pub mod team;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

/// Parse an RFC 3339 timestamp supplied by a client into a [`SystemTime`].
pub(crate) fn parse_system_time(value: &str) -> Result<SystemTime, time::error::Parse> {
    OffsetDateTime::parse(value, &Rfc3339).map(SystemTime::from)
}
