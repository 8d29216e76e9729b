//! Support status resolution.
//!
//! The stored support tag on a version is not authoritative: once the
//! scheduled end-of-support date has passed, the effective status is
//! end-of-life whatever the tag says. Resolution is a pure function of
//! (stored status, end date, evaluation date), so repeated queries yield
//! consistent, explainable transitions without mutating stored data.

use chrono::{NaiveDate, Utc};

use depot_core::model::{Support, SupportSpec, SupportStatus};

/// Resolves the effective support state at the given evaluation date.
///
/// If an end date is present and `at` is on or after it, the effective
/// status is [`SupportStatus::EndOfLife`] regardless of the stored tag.
/// Otherwise the stored status passes through unchanged.
#[must_use]
pub fn resolve_at(spec: &SupportSpec, at: NaiveDate) -> Support {
    let status = match spec.end {
        Some(end) if at >= end => SupportStatus::EndOfLife,
        _ => spec.status,
    };
    Support {
        status,
        end: spec.end,
    }
}

/// Resolves the effective support state at the current UTC date.
#[must_use]
pub fn resolve(spec: &SupportSpec) -> Support {
    resolve_at(spec, Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(status: SupportStatus, end: Option<NaiveDate>) -> SupportSpec {
        SupportSpec { status, end }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn stored_status_passes_through_before_end_date() {
        let s = spec(SupportStatus::Supported, Some(date(2026, 6, 1)));
        let resolved = resolve_at(&s, date(2026, 5, 31));
        assert_eq!(resolved.status, SupportStatus::Supported);
        assert_eq!(resolved.end, Some(date(2026, 6, 1)));
    }

    #[test]
    fn end_date_reached_becomes_end_of_life() {
        let s = spec(SupportStatus::Supported, Some(date(2026, 6, 1)));
        // Evaluation on the end date itself already counts as past it.
        assert_eq!(
            resolve_at(&s, date(2026, 6, 1)).status,
            SupportStatus::EndOfLife
        );
        assert_eq!(
            resolve_at(&s, date(2027, 1, 1)).status,
            SupportStatus::EndOfLife
        );
    }

    #[test]
    fn stale_deprecated_tag_is_overridden() {
        let s = spec(SupportStatus::Deprecated, Some(date(2025, 1, 1)));
        assert_eq!(
            resolve_at(&s, date(2025, 2, 1)).status,
            SupportStatus::EndOfLife
        );
    }

    #[test]
    fn no_end_date_never_expires() {
        let s = spec(SupportStatus::Unsupported, None);
        let resolved = resolve_at(&s, date(2099, 12, 31));
        assert_eq!(resolved.status, SupportStatus::Unsupported);
        assert_eq!(resolved.end, None);
    }

    #[test]
    fn resolution_is_deterministic() {
        let s = spec(SupportStatus::Supported, Some(date(2026, 6, 1)));
        let at = date(2026, 3, 1);
        assert_eq!(resolve_at(&s, at), resolve_at(&s, at));
    }
}
