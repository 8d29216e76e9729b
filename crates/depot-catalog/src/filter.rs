//! Filter and pagination engine.
//!
//! Filter specifications are explicit structures with a documented set of
//! optional fields. Predicates compose with AND semantics, independent of
//! field order; absent fields impose no constraint. Limits apply after
//! filtering and ordering, taking the first `limit` elements.
//!
//! The engine is a pure read/transform pipeline: no side effects, safe to
//! call concurrently, identical results for identical inputs over the
//! same data snapshot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use depot_core::id::FamilyId;
use depot_core::model::{Build, Channel, SupportStatus, Version};

use crate::error::{CatalogError, Result};
use crate::support;

/// Optional predicates for version listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFilter {
    /// Keep only versions referencing this family.
    #[serde(default)]
    pub family: Option<FamilyId>,
    /// Keep only versions whose *resolved* support status equals this.
    ///
    /// Evaluated against the output of the support resolver, not the raw
    /// stored tag, so a version past its end date matches `END_OF_LIFE`
    /// even if the stored tag still says otherwise.
    #[serde(default)]
    pub support_status: Option<SupportStatus>,
}

impl VersionFilter {
    /// Returns whether a version satisfies every provided predicate at
    /// the given evaluation date.
    #[must_use]
    pub fn matches(&self, version: &Version, at: NaiveDate) -> bool {
        if let Some(family) = self.family {
            if version.family != family {
                return false;
            }
        }
        if let Some(status) = self.support_status {
            if support::resolve_at(&version.support, at).status != status {
                return false;
            }
        }
        true
    }
}

/// Optional predicates for build listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildFilter {
    /// Keep only builds on this channel.
    #[serde(default)]
    pub channel: Option<Channel>,
}

impl BuildFilter {
    /// Returns whether a build satisfies every provided predicate.
    #[must_use]
    pub fn matches(&self, build: &Build) -> bool {
        match self.channel {
            Some(channel) => build.channel == channel,
            None => true,
        }
    }
}

/// A validated, non-negative result-size limit.
///
/// Callers hand the facade a raw integer; validation happens once at that
/// boundary. A negative value is a caller fault and is rejected rather
/// than clamped. Zero is valid and yields an empty sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(usize);

impl Limit {
    /// Validates a raw limit value.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidFilter` if `raw` is negative.
    pub fn new(raw: i64) -> Result<Self> {
        usize::try_from(raw)
            .map(Self)
            .map_err(|_| CatalogError::invalid_filter(format!("limit must be >= 0, got {raw}")))
    }

    /// Returns the limit as a count.
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

/// Truncates an ordered candidate list to at most `limit` elements.
///
/// With no limit the list passes through untouched.
#[must_use]
pub fn clip<T>(mut items: Vec<T>, limit: Option<Limit>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(limit.get());
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use depot_core::id::{ProjectId, VersionId};
    use depot_core::model::SupportSpec;
    use std::collections::BTreeMap;

    fn version(family: FamilyId, status: SupportStatus, end: Option<NaiveDate>) -> Version {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        Version {
            id: VersionId::generate(),
            project: ProjectId::generate(),
            family,
            name: "1.0.0".to_string(),
            created_at: now,
            updated_at: now,
            support: SupportSpec { status, end },
            java: None,
        }
    }

    fn build(number: u32, channel: Channel) -> Build {
        Build {
            id: depot_core::id::BuildId::generate(),
            version: VersionId::generate(),
            number,
            created_at: Utc.timestamp_opt(1_700_000_000 + i64::from(number), 0).unwrap(),
            channel,
            commits: Vec::new(),
            downloads: BTreeMap::new(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let v = version(FamilyId::generate(), SupportStatus::Unsupported, None);
        assert!(VersionFilter::default().matches(&v, today()));
        assert!(BuildFilter::default().matches(&build(1, Channel::Experimental)));
    }

    #[test]
    fn predicates_are_conjunctive() {
        let family = FamilyId::generate();
        let v = version(family, SupportStatus::Supported, None);

        let both = VersionFilter {
            family: Some(family),
            support_status: Some(SupportStatus::Supported),
        };
        assert!(both.matches(&v, today()));

        // One satisfied predicate is not enough.
        let wrong_family = VersionFilter {
            family: Some(FamilyId::generate()),
            support_status: Some(SupportStatus::Supported),
        };
        assert!(!wrong_family.matches(&v, today()));

        let wrong_status = VersionFilter {
            family: Some(family),
            support_status: Some(SupportStatus::EndOfLife),
        };
        assert!(!wrong_status.matches(&v, today()));
    }

    #[test]
    fn support_predicate_sees_resolved_status() {
        let past_end = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let v = version(FamilyId::generate(), SupportStatus::Supported, Some(past_end));

        // Stored tag says SUPPORTED, but the end date has passed.
        let eol = VersionFilter {
            family: None,
            support_status: Some(SupportStatus::EndOfLife),
        };
        assert!(eol.matches(&v, today()));

        let supported = VersionFilter {
            family: None,
            support_status: Some(SupportStatus::Supported),
        };
        assert!(!supported.matches(&v, today()));
    }

    #[test]
    fn channel_filter_matches_exactly() {
        let stable = BuildFilter {
            channel: Some(Channel::Stable),
        };
        assert!(stable.matches(&build(1, Channel::Stable)));
        assert!(!stable.matches(&build(2, Channel::Experimental)));
    }

    #[test]
    fn filters_deserialize_with_absent_fields() {
        let empty: VersionFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, VersionFilter::default());

        let filter = VersionFilter {
            family: Some(FamilyId::generate()),
            support_status: Some(SupportStatus::EndOfLife),
        };
        let json = serde_json::to_string(&filter).unwrap();
        let back: VersionFilter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, filter);
    }

    #[test]
    fn limit_rejects_negative() {
        let err = Limit::new(-1).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidFilter { .. }));
    }

    #[test]
    fn limit_zero_yields_empty() {
        let items = vec![1, 2, 3];
        assert!(clip(items, Some(Limit::new(0).unwrap())).is_empty());
    }

    #[test]
    fn clip_returns_min_of_limit_and_len() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(clip(items.clone(), Some(Limit::new(4).unwrap())), vec![0, 1, 2, 3]);
        assert_eq!(clip(items.clone(), Some(Limit::new(25).unwrap())).len(), 10);
        assert_eq!(clip(items, None).len(), 10);
    }
}
