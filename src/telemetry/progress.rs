//! Session span helpers.
//!
//! A session span wraps one run of the logbook. Each store mutation is
//! recorded as an event inside it.

use tracing::Span;
use uuid::Uuid;

use crate::event::Event;

/// Start the span covering one logbook session.
///
/// `logbook.level` is declared empty and filled by [`record_mutation`].
pub fn start_session_span(session_id: &Uuid) -> Span {
    tracing::info_span!(
        "logbook.session",
        "logbook.session.id" = %session_id,
        "logbook.level" = tracing::field::Empty,
    )
}

/// Record a mutation event on the session span and refresh its level.
pub fn record_mutation(span: &Span, event: &Event, level: u64) {
    span.record("logbook.level", level);
    span.in_scope(|| {
        tracing::info!(
            seq = event.seq,
            kind = event.kind.name(),
            xp_delta = event.kind.xp_delta(),
            "mutation"
        );
    });
}
