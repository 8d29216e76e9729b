//! Composed view objects returned by the query facade.
//!
//! Views are plain data: entities mapped into the shapes a transport
//! layer serializes, with derived fields (resolved support status,
//! download URLs) already attached. They never carry repository or
//! store handles; assembly happens in the facade with its collaborators
//! passed explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use depot_core::id::{BuildId, FamilyId, ProjectId, VersionId};
use depot_core::model::{Channel, Checksums, Commit, Family, JavaRuntime, Project, Support};

/// A project as returned by the facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectView {
    /// Unique project ID.
    pub id: ProjectId,
    /// Unique machine name.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
}

impl From<Project> for ProjectView {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            display_name: project.display_name,
        }
    }
}

/// A release family as returned by the facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyView {
    /// Unique family ID.
    pub id: FamilyId,
    /// Family name.
    pub name: String,
    /// When the family was created.
    pub created_at: DateTime<Utc>,
    /// Java requirements shared by the family's versions.
    pub java: Option<JavaRuntime>,
}

impl From<Family> for FamilyView {
    fn from(family: Family) -> Self {
        Self {
            id: family.id,
            name: family.name,
            created_at: family.created_at,
            java: family.java,
        }
    }
}

/// A version with its resolved support state and family attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionView {
    /// Unique version ID.
    pub id: VersionId,
    /// Version name.
    pub name: String,
    /// The referenced release family.
    pub family: FamilyView,
    /// Effective support state at query time.
    pub support: Support,
    /// Java requirements overriding the family's, if set.
    pub java: Option<JavaRuntime>,
    /// When the version was created.
    pub created_at: DateTime<Utc>,
    /// When the version was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Outcome of resolving one download's URL.
///
/// An unavailable artifact is carried as a marker so one broken download
/// never hides an otherwise valid build record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrlOutcome {
    /// The artifact is fetchable at this URL.
    Resolved(String),
    /// The storage collaborator could not resolve the artifact.
    Unavailable {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl UrlOutcome {
    /// Returns the URL if resolution succeeded.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Resolved(url) => Some(url),
            Self::Unavailable { .. } => None,
        }
    }

    /// Returns whether resolution succeeded.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// One download of a build with its resolution outcome attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadView {
    /// File name.
    pub name: String,
    /// File size in bytes.
    pub size: u64,
    /// Content checksums.
    pub checksums: Checksums,
    /// Resolved URL or unavailability marker.
    pub url: UrlOutcome,
}

/// A build with all downloads resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildView {
    /// Unique build ID.
    pub id: BuildId,
    /// Sequence number within the version.
    pub number: u32,
    /// When the build was created.
    pub created_at: DateTime<Utc>,
    /// Release track of the build.
    pub channel: Channel,
    /// Commits included since the previous build, newest first.
    pub commits: Vec<Commit>,
    /// Download views keyed by artifact role.
    pub downloads: BTreeMap<String, DownloadView>,
}

/// Result of an update check against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateCheck {
    /// The queried build is the newest along every axis.
    UpToDate,
    /// The queried build trails the newest family, version or build.
    Behind {
        /// How many families are newer than the queried version's family.
        families: usize,
        /// How many versions of the family are newer than the queried one.
        versions: usize,
        /// How many builds of the version are newer than the queried one.
        builds: usize,
    },
}
