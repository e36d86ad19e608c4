//! Calendar fetching and the readiness gate over multiple sources.
//!
//! Each calendar URL resolves independently to either parsed event data or
//! an error message. The gate enforces the asymmetry between the two
//! calendar roles: a primary failure is terminal and user-visible, while a
//! failed or still-pending plan calendar only defers computation, so the
//! schedule is never computed against partial plan data.

use freeslot_ical::EventMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Calendar fetch returned HTTP {status} for {url}")]
    Http {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Calendar fetch failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Parse(#[from] freeslot_ical::parse::error::ParseError),
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// ## Summary
/// Fetches one calendar URL and parses the body into an event map.
///
/// No retry and no timeout beyond the client's own; retry policy belongs to
/// the caller, last-resolved-wins is acceptable.
///
/// ## Errors
/// Returns an error on transport failure, a non-2xx status, or an
/// unparseable body.
pub async fn fetch_calendar(client: &reqwest::Client, url: &str) -> SourceResult<EventMap> {
    tracing::debug!(url = %url, "Fetching calendar");
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Http {
            status,
            url: url.to_string(),
        });
    }
    let body = response.text().await?;
    let events = freeslot_ical::parse_events(&body)?;
    tracing::info!(url = %url, events = events.len(), "Calendar fetched");
    Ok(events)
}

/// Resolution state of one calendar source.
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarFeed {
    Pending,
    Ready(EventMap),
    Failed(String),
}

impl CalendarFeed {
    /// Collapses a fetch result into a feed state.
    #[must_use]
    pub fn from_result(result: SourceResult<EventMap>) -> Self {
        match result {
            Ok(events) => Self::Ready(events),
            Err(err) => Self::Failed(err.to_string()),
        }
    }
}

/// Whether downstream computation may run, and with what.
#[derive(Debug, PartialEq)]
pub enum GateState<'a> {
    /// All sources resolved; compute with these snapshots.
    Ready {
        primary: &'a EventMap,
        plans: Vec<&'a EventMap>,
    },
    /// The primary calendar failed; terminal and user-visible.
    PrimaryFailed(&'a str),
    /// Some plan calendar is pending or failed; computation is deferred.
    Waiting,
}

/// ## Summary
/// Gates schedule computation on source readiness.
///
/// Primary failure short-circuits everything; any plan calendar that is not
/// `Ready` withholds computation rather than running with partial data.
#[must_use]
pub fn gate<'a>(primary: &'a CalendarFeed, plans: &'a [CalendarFeed]) -> GateState<'a> {
    let primary_events = match primary {
        CalendarFeed::Failed(message) => return GateState::PrimaryFailed(message),
        CalendarFeed::Pending => return GateState::Waiting,
        CalendarFeed::Ready(events) => events,
    };

    let mut plan_events = Vec::with_capacity(plans.len());
    for plan in plans {
        match plan {
            CalendarFeed::Ready(events) => plan_events.push(events),
            CalendarFeed::Pending | CalendarFeed::Failed(_) => return GateState::Waiting,
        }
    }

    GateState::Ready {
        primary: primary_events,
        plans: plan_events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_ready_when_all_sources_resolved() {
        let primary = CalendarFeed::Ready(EventMap::new());
        let plans = [CalendarFeed::Ready(EventMap::new())];
        assert!(matches!(gate(&primary, &plans), GateState::Ready { .. }));
    }

    #[test]
    fn primary_failure_is_terminal() {
        let primary = CalendarFeed::Failed("HTTP 404".to_string());
        // Plan state is irrelevant once the primary has failed.
        let plans = [CalendarFeed::Pending];
        assert_eq!(
            gate(&primary, &plans),
            GateState::PrimaryFailed("HTTP 404")
        );
    }

    #[test]
    fn unresolved_plan_defers_computation() {
        let primary = CalendarFeed::Ready(EventMap::new());
        assert_eq!(gate(&primary, &[CalendarFeed::Pending]), GateState::Waiting);
        assert_eq!(
            gate(&primary, &[CalendarFeed::Failed("boom".to_string())]),
            GateState::Waiting
        );
    }

    #[test]
    fn no_plan_calendars_is_ready() {
        let primary = CalendarFeed::Ready(EventMap::new());
        assert!(matches!(gate(&primary, &[]), GateState::Ready { plans, .. } if plans.is_empty()));
    }
}
