//! The query facade: the operations a transport layer invokes.
//!
//! `Catalog` composes the repository ports, the filter engine, the
//! support resolver and the artifact resolver into plain operations
//! taking plain filter/limit values and returning plain view objects.
//! No framework types cross this boundary.
//!
//! Absent parents are `Ok(None)`, distinct from "exists but has zero
//! matching children" (`Ok(Some(vec![]))`). Raw limits are validated
//! here, before any repository call.

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::Instrument;

use depot_core::catalog_span;
use depot_core::model::{Build, Family, Project, Version};

use crate::error::{CatalogError, Result};
use crate::filter::{self, BuildFilter, Limit, VersionFilter};
use crate::repository::{BuildRepository, FamilyRepository, ProjectRepository, VersionRepository};
use crate::resolver::ArtifactResolver;
use crate::support;
use crate::view::{
    BuildView, DownloadView, FamilyView, ProjectView, UpdateCheck, UrlOutcome, VersionView,
};

/// Read-only query facade over the catalog.
///
/// Stateless between calls apart from the resolver's URL cache; safe to
/// share behind an `Arc` and invoke from any number of tasks.
pub struct Catalog {
    projects: Arc<dyn ProjectRepository>,
    families: Arc<dyn FamilyRepository>,
    versions: Arc<dyn VersionRepository>,
    builds: Arc<dyn BuildRepository>,
    resolver: ArtifactResolver,
}

impl Catalog {
    /// Creates a facade over the given ports.
    #[must_use]
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        families: Arc<dyn FamilyRepository>,
        versions: Arc<dyn VersionRepository>,
        builds: Arc<dyn BuildRepository>,
        resolver: ArtifactResolver,
    ) -> Self {
        Self {
            projects,
            families,
            versions,
            builds,
            resolver,
        }
    }

    /// Returns the artifact resolver, e.g. to invalidate its URL cache
    /// after storage-side key rotation.
    #[must_use]
    pub fn resolver(&self) -> &ArtifactResolver {
        &self.resolver
    }

    /// Lists all projects, ordered by name ascending.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Collaborator` if the repository fails.
    pub async fn list_projects(&self) -> Result<Vec<ProjectView>> {
        let mut projects = self.projects.find_all().await?;
        projects.sort_by(Project::by_name);
        tracing::debug!(count = projects.len(), "listed projects");
        Ok(projects.into_iter().map(ProjectView::from).collect())
    }

    /// Finds a project by name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Collaborator` if the repository fails.
    pub async fn get_project(&self, name: &str) -> Result<Option<ProjectView>> {
        Ok(self
            .projects
            .find_by_name(name)
            .await?
            .map(ProjectView::from))
    }

    /// Lists a project's families, newest first.
    ///
    /// Returns `None` if the project does not exist.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Collaborator` if a repository fails.
    pub async fn list_families(&self, project: &str) -> Result<Option<Vec<FamilyView>>> {
        let Some(project) = self.projects.find_by_name(project).await? else {
            return Ok(None);
        };
        let mut families = self.families.find_all_by_project(project.id).await?;
        families.sort_by(Family::newest_first);
        Ok(Some(families.into_iter().map(FamilyView::from).collect()))
    }

    /// Finds a family by name within a project.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Collaborator` if a repository fails.
    pub async fn get_family(&self, project: &str, name: &str) -> Result<Option<FamilyView>> {
        let Some(project) = self.projects.find_by_name(project).await? else {
            return Ok(None);
        };
        Ok(self
            .families
            .find_by_project_and_name(project.id, name)
            .await?
            .map(FamilyView::from))
    }

    /// Lists a project's versions, newest first, with optional filters
    /// and an optional result-size limit.
    ///
    /// Returns `None` if the project does not exist.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidFilter` for a negative `last`,
    /// `CatalogError::Collaborator` if a repository fails, and
    /// `CatalogError::Integrity` if a version's family reference does
    /// not resolve.
    pub async fn list_versions(
        &self,
        project: &str,
        filter: &VersionFilter,
        last: Option<i64>,
    ) -> Result<Option<Vec<VersionView>>> {
        let span = catalog_span("list_versions", project);
        async {
            let limit = last.map(Limit::new).transpose()?;
            let Some(project) = self.projects.find_by_name(project).await? else {
                return Ok(None);
            };

            let mut versions = self.versions.find_all_by_project(project.id).await?;
            versions.sort_by(Version::newest_first);
            let today = Utc::now().date_naive();
            versions.retain(|v| filter.matches(v, today));
            let versions = filter::clip(versions, limit);
            tracing::debug!(count = versions.len(), "listed versions");

            let mut views = Vec::with_capacity(versions.len());
            for version in versions {
                views.push(self.version_view(version).await?);
            }
            Ok(Some(views))
        }
        .instrument(span)
        .await
    }

    /// Finds a version by name within a project.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Collaborator` if a repository fails and
    /// `CatalogError::Integrity` if the family reference does not resolve.
    pub async fn get_version(&self, project: &str, name: &str) -> Result<Option<VersionView>> {
        let Some(project) = self.projects.find_by_name(project).await? else {
            return Ok(None);
        };
        match self
            .versions
            .find_by_project_and_name(project.id, name)
            .await?
        {
            Some(version) => Ok(Some(self.version_view(version).await?)),
            None => Ok(None),
        }
    }

    /// Lists a version's builds, newest first, with an optional channel
    /// filter and an optional result-size limit. Every download of every
    /// returned build carries its resolved URL or an unavailability
    /// marker.
    ///
    /// Returns `None` if the project or version does not exist.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidFilter` for a negative `last` and
    /// `CatalogError::Collaborator` if a repository or the artifact
    /// store fails. An unavailable artifact is not an error; it becomes
    /// a per-download marker in the composed view.
    pub async fn list_builds(
        &self,
        project: &str,
        version: &str,
        filter: &BuildFilter,
        last: Option<i64>,
    ) -> Result<Option<Vec<BuildView>>> {
        let span = catalog_span("list_builds", project);
        async {
            let limit = last.map(Limit::new).transpose()?;
            let Some(project) = self.projects.find_by_name(project).await? else {
                return Ok(None);
            };
            let Some(version) = self
                .versions
                .find_by_project_and_name(project.id, version)
                .await?
            else {
                return Ok(None);
            };

            let mut builds = self.builds.find_all_by_version(version.id).await?;
            builds.sort_by(Build::newest_first);
            builds.retain(|b| filter.matches(b));
            let builds = filter::clip(builds, limit);
            tracing::debug!(version = %version.name, count = builds.len(), "listed builds");

            let mut views = Vec::with_capacity(builds.len());
            for build in builds {
                views.push(self.build_view(&project, &version, build).await?);
            }
            Ok(Some(views))
        }
        .instrument(span)
        .await
    }

    /// Finds a build by number within a version, with downloads resolved.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Collaborator` if a repository or the
    /// artifact store fails.
    pub async fn get_build(
        &self,
        project: &str,
        version: &str,
        number: u32,
    ) -> Result<Option<BuildView>> {
        let Some(project) = self.projects.find_by_name(project).await? else {
            return Ok(None);
        };
        let Some(version) = self
            .versions
            .find_by_project_and_name(project.id, version)
            .await?
        else {
            return Ok(None);
        };
        match self
            .builds
            .find_by_version_and_number(version.id, number)
            .await?
        {
            Some(build) => Ok(Some(self.build_view(&project, &version, build).await?)),
            None => Ok(None),
        }
    }

    /// Reports how far a build trails the newest family, version and
    /// build along the canonical orderings.
    ///
    /// Returns `None` if the project, version or build does not exist.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Collaborator` if a repository fails and
    /// `CatalogError::Integrity` if the version's family reference does
    /// not resolve.
    pub async fn check_update(
        &self,
        project: &str,
        version: &str,
        build: u32,
    ) -> Result<Option<UpdateCheck>> {
        let Some(project) = self.projects.find_by_name(project).await? else {
            return Ok(None);
        };
        let Some(version) = self
            .versions
            .find_by_project_and_name(project.id, version)
            .await?
        else {
            return Ok(None);
        };
        let family = self.family_of(&version).await?;
        let Some(build) = self
            .builds
            .find_by_version_and_number(version.id, build)
            .await?
        else {
            return Ok(None);
        };

        let mut families = self.families.find_all_by_project(project.id).await?;
        families.sort_by(Family::newest_first);
        // A cross-project family reference cannot be ranked within this
        // project's families; treat that axis as current.
        let families_behind = families
            .iter()
            .position(|f| f.id == family.id)
            .unwrap_or(0);

        let mut versions = self.versions.find_all_by_family(family.id).await?;
        versions.sort_by(Version::newest_first);
        let versions_behind = versions
            .iter()
            .position(|v| v.id == version.id)
            .unwrap_or(0);

        let mut builds = self.builds.find_all_by_version(version.id).await?;
        builds.sort_by(Build::newest_first);
        let builds_behind = builds
            .iter()
            .position(|b| b.number == build.number)
            .unwrap_or(0);

        if families_behind > 0 || versions_behind > 0 || builds_behind > 0 {
            Ok(Some(UpdateCheck::Behind {
                families: families_behind,
                versions: versions_behind,
                builds: builds_behind,
            }))
        } else {
            Ok(Some(UpdateCheck::UpToDate))
        }
    }

    async fn family_of(&self, version: &Version) -> Result<Family> {
        self.families
            .find_by_id(version.family)
            .await?
            .ok_or_else(|| {
                CatalogError::integrity(format!(
                    "version {} references missing family {}",
                    version.name, version.family
                ))
            })
    }

    async fn version_view(&self, version: Version) -> Result<VersionView> {
        let family = self.family_of(&version).await?;
        Ok(VersionView {
            id: version.id,
            name: version.name,
            family: FamilyView::from(family),
            support: support::resolve(&version.support),
            java: version.java,
            created_at: version.created_at,
            updated_at: version.updated_at,
        })
    }

    async fn build_view(
        &self,
        project: &Project,
        version: &Version,
        build: Build,
    ) -> Result<BuildView> {
        let mut downloads = BTreeMap::new();
        for (role, download) in &build.downloads {
            let url = match self.resolver.resolve(project, version, &build, download).await {
                Ok(url) => UrlOutcome::Resolved(url),
                Err(CatalogError::Unavailable { key }) => {
                    tracing::warn!(
                        project = %project.name,
                        version = %version.name,
                        build = build.number,
                        download = %download.name,
                        %key,
                        "artifact unavailable"
                    );
                    UrlOutcome::Unavailable {
                        reason: format!("artifact unavailable: {key}"),
                    }
                }
                Err(other) => return Err(other),
            };
            downloads.insert(
                role.clone(),
                DownloadView {
                    name: download.name.clone(),
                    size: download.size,
                    checksums: download.checksums.clone(),
                    url,
                },
            );
        }
        Ok(BuildView {
            id: build.id,
            number: build.number,
            created_at: build.created_at,
            channel: build.channel,
            commits: build.commits,
            downloads,
        })
    }
}
