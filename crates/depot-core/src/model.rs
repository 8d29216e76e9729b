//! Entity model for the release artifact catalog.
//!
//! Entities are immutable snapshots produced by an external ingestion
//! path; the read side only derives views over them. They are pure data
//! containers: no collaborator handles, no behavior beyond accessors,
//! equality and the canonical orderings used by the query engine.
//!
//! # Hierarchy
//!
//! ```text
//! Project -> Family (release line)
//!         -> Version -> Build -> Download
//! ```
//!
//! A version references its family by ID. The reference is informational
//! rather than a strict containment: it may name a family that is not
//! nested under the same project record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::id::{BuildId, FamilyId, ProjectId, VersionId};
use crate::storage::StorageKey;

/// A top-level named software product tracked by the catalog.
///
/// Project names are unique across the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project ID.
    pub id: ProjectId,
    /// Unique machine name, e.g. `"paper"`.
    pub name: String,
    /// Human-readable name, e.g. `"Paper"`.
    pub display_name: String,
}

impl Project {
    /// Canonical project ordering: by name, ascending.
    #[must_use]
    pub fn by_name(a: &Self, b: &Self) -> Ordering {
        a.name.cmp(&b.name)
    }
}

/// Java runtime requirements shared by a release line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaRuntime {
    /// Minimum Java major version required to run builds of this line.
    pub minimum_version: u32,
    /// Recommended JVM flags.
    #[serde(default)]
    pub recommended_flags: Vec<String>,
}

/// A release line within a project, e.g. a major version branch.
///
/// Family names are unique within their project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    /// Unique family ID.
    pub id: FamilyId,
    /// The owning project.
    pub project: ProjectId,
    /// Family name, e.g. `"1.21"`.
    pub name: String,
    /// When this family was created.
    pub created_at: DateTime<Utc>,
    /// Java requirements shared by versions of this family.
    pub java: Option<JavaRuntime>,
}

impl Family {
    /// Canonical family ordering: creation time descending, newest first.
    #[must_use]
    pub fn newest_first(a: &Self, b: &Self) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }
}

/// Lifecycle state of a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupportStatus {
    /// Actively supported.
    Supported,
    /// Still supported but superseded; users should migrate.
    Deprecated,
    /// No longer receiving fixes.
    Unsupported,
    /// Support has ended.
    EndOfLife,
}

/// Raw stored support fields of a version.
///
/// This is what the ingestion path wrote, not the effective lifecycle
/// state: the stored tag may be stale once `end` has passed. The support
/// resolver in `depot-catalog` derives the effective [`Support`] from
/// these fields and the evaluation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportSpec {
    /// The stored status tag.
    pub status: SupportStatus,
    /// Calendar date after which support ceases, if scheduled.
    pub end: Option<NaiveDate>,
}

/// Resolved support state of a version: the effective status plus the
/// end-of-support date, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    /// Effective lifecycle status.
    pub status: SupportStatus,
    /// Date after which support ceases, if scheduled.
    pub end: Option<NaiveDate>,
}

/// A specific release under a project, with its own support lifecycle.
///
/// Version names are unique within their project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Unique version ID.
    pub id: VersionId,
    /// The owning project.
    pub project: ProjectId,
    /// The release family this version belongs to (informational link).
    pub family: FamilyId,
    /// Version name, e.g. `"1.21.4"`.
    pub name: String,
    /// When this version was created.
    pub created_at: DateTime<Utc>,
    /// When this version was last modified.
    pub updated_at: DateTime<Utc>,
    /// Raw stored support fields.
    pub support: SupportSpec,
    /// Java requirements overriding the family's, if set.
    pub java: Option<JavaRuntime>,
}

impl Version {
    /// Canonical version ordering: creation time descending, newest first.
    #[must_use]
    pub fn newest_first(a: &Self, b: &Self) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }
}

/// A build's release track label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    /// Regular stable build.
    Stable,
    /// Stable build promoted as the recommended download.
    Recommended,
    /// Pre-release build, may be unstable.
    Experimental,
}

/// A single upstream commit included in a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Full 40-character commit SHA.
    pub sha: String,
    /// Author time of the commit.
    pub time: DateTime<Utc>,
    /// Full commit message.
    pub message: String,
}

impl Commit {
    /// Returns the abbreviated 7-character SHA.
    #[must_use]
    pub fn short_sha(&self) -> &str {
        &self.sha[..7.min(self.sha.len())]
    }

    /// Returns the first line of the commit message.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Validates that a commit list is ordered newest-to-oldest.
    ///
    /// Build commit lists are stored in that order; ingestion calls this
    /// before accepting a build, and test fixtures use it to stay honest.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` naming the first out-of-order pair.
    pub fn check_order(commits: &[Commit]) -> Result<()> {
        for (i, pair) in commits.windows(2).enumerate() {
            if pair[0].time < pair[1].time {
                return Err(Error::InvalidInput(format!(
                    "commit order validation failed: index {i} ({}) comes before index {} ({}); expected newest-to-oldest",
                    pair[0].sha,
                    i + 1,
                    pair[1].sha,
                )));
            }
        }
        Ok(())
    }
}

/// Checksums of a download's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksums {
    /// Hex-encoded SHA-256 digest.
    pub sha256: String,
}

/// One file artifact belonging to a build.
///
/// The fetchable URL is deliberately not part of this type. Downloads
/// carry an opaque [`StorageKey`]; the artifact resolver turns it into a
/// URL at read time so the storage layer can rotate credentials, signing
/// or base paths without a data migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Download {
    /// File name, e.g. `"paper-1.21.4-100.jar"`.
    pub name: String,
    /// File size in bytes.
    pub size: u64,
    /// Content checksums.
    pub checksums: Checksums,
    /// Opaque storage location reference.
    pub storage_key: StorageKey,
}

/// A compiled artifact set produced for a version.
///
/// Build numbers are unique within their version and increase in creation
/// order, so "the last N builds" is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    /// Unique build ID.
    pub id: BuildId,
    /// The owning version.
    pub version: VersionId,
    /// Sequence number within the version, increasing in creation order.
    pub number: u32,
    /// When this build was created.
    pub created_at: DateTime<Utc>,
    /// Release track of this build.
    pub channel: Channel,
    /// Commits included since the previous build, newest first.
    pub commits: Vec<Commit>,
    /// Download entries keyed by artifact role, e.g. `"server"`.
    pub downloads: BTreeMap<String, Download>,
}

impl Build {
    /// Canonical build ordering: build number descending, newest first.
    #[must_use]
    pub fn newest_first(a: &Self, b: &Self) -> Ordering {
        b.number.cmp(&a.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn commit(sha: &str, secs: i64) -> Commit {
        Commit {
            sha: sha.to_string(),
            time: Utc.timestamp_opt(secs, 0).unwrap(),
            message: "Fix the thing\n\nLonger explanation.".to_string(),
        }
    }

    #[test]
    fn commit_summary_is_first_line() {
        let c = commit("a".repeat(40).as_str(), 100);
        assert_eq!(c.summary(), "Fix the thing");
    }

    #[test]
    fn commit_short_sha() {
        let c = commit("0123456789abcdef0123456789abcdef01234567", 100);
        assert_eq!(c.short_sha(), "0123456");
    }

    #[test]
    fn commit_order_accepts_newest_first() {
        let commits = vec![commit("a", 300), commit("b", 200), commit("c", 100)];
        assert!(Commit::check_order(&commits).is_ok());
    }

    #[test]
    fn commit_order_accepts_equal_times() {
        let commits = vec![commit("a", 200), commit("b", 200)];
        assert!(Commit::check_order(&commits).is_ok());
    }

    #[test]
    fn commit_order_rejects_oldest_first() {
        let commits = vec![commit("a", 100), commit("b", 200)];
        let err = Commit::check_order(&commits).unwrap_err();
        assert!(err.to_string().contains("newest-to-oldest"));
    }

    #[test]
    fn project_ordering_is_by_name_ascending() {
        let mut projects = vec![
            Project {
                id: ProjectId::generate(),
                name: "waterfall".into(),
                display_name: "Waterfall".into(),
            },
            Project {
                id: ProjectId::generate(),
                name: "paper".into(),
                display_name: "Paper".into(),
            },
        ];
        projects.sort_by(Project::by_name);
        assert_eq!(projects[0].name, "paper");
        assert_eq!(projects[1].name, "waterfall");
    }

    #[test]
    fn status_serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&SupportStatus::EndOfLife).unwrap();
        assert_eq!(json, "\"END_OF_LIFE\"");
        let json = serde_json::to_string(&Channel::Stable).unwrap();
        assert_eq!(json, "\"STABLE\"");
    }
}
