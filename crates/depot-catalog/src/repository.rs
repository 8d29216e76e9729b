//! Repository ports and an in-memory implementation.
//!
//! The query engine reads entities through these narrow lookup traits;
//! the backing persistence store lives outside this workspace. Returned
//! entities are assumed to already satisfy the model invariants (name
//! uniqueness, parent linkage); the engine does not re-validate on read.
//!
//! Result ordering from `find_all*` methods is unspecified. The filter
//! engine applies the canonical orderings itself, so ports are free to
//! return rows in whatever order is cheapest.
//!
//! [`MemoryRepository`] backs the test suites and is exported for
//! downstream tests; it is not suitable for production.

use async_trait::async_trait;
use std::sync::RwLock;

use depot_core::id::{FamilyId, ProjectId, VersionId};
use depot_core::model::{Build, Family, Project, Version};
use depot_core::{Error, Result};

/// Lookup port for projects.
#[async_trait]
pub trait ProjectRepository: Send + Sync + 'static {
    /// Returns all projects, in unspecified order.
    async fn find_all(&self) -> Result<Vec<Project>>;

    /// Finds a project by its globally unique name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Project>>;
}

/// Lookup port for release families.
#[async_trait]
pub trait FamilyRepository: Send + Sync + 'static {
    /// Returns all families owned by a project.
    async fn find_all_by_project(&self, project: ProjectId) -> Result<Vec<Family>>;

    /// Finds a family by name within a project.
    async fn find_by_project_and_name(
        &self,
        project: ProjectId,
        name: &str,
    ) -> Result<Option<Family>>;

    /// Finds a family by ID, regardless of owning project.
    ///
    /// A version's family reference is informational and may point at a
    /// family outside the version's own project record, so this lookup
    /// is deliberately not project-scoped.
    async fn find_by_id(&self, id: FamilyId) -> Result<Option<Family>>;
}

/// Lookup port for versions.
#[async_trait]
pub trait VersionRepository: Send + Sync + 'static {
    /// Returns all versions owned by a project.
    async fn find_all_by_project(&self, project: ProjectId) -> Result<Vec<Version>>;

    /// Finds a version by name within a project.
    async fn find_by_project_and_name(
        &self,
        project: ProjectId,
        name: &str,
    ) -> Result<Option<Version>>;

    /// Returns all versions referencing a family.
    async fn find_all_by_family(&self, family: FamilyId) -> Result<Vec<Version>>;
}

/// Lookup port for builds.
#[async_trait]
pub trait BuildRepository: Send + Sync + 'static {
    /// Returns all builds of a version.
    async fn find_all_by_version(&self, version: VersionId) -> Result<Vec<Build>>;

    /// Finds a build by its number within a version.
    async fn find_by_version_and_number(
        &self,
        version: VersionId,
        number: u32,
    ) -> Result<Option<Build>>;
}

#[derive(Debug, Default)]
struct Inner {
    projects: Vec<Project>,
    families: Vec<Family>,
    versions: Vec<Version>,
    builds: Vec<Build>,
}

/// In-memory store implementing all four repository ports.
///
/// Thread-safe via `RwLock`. Entities are returned as clones of the
/// inserted snapshots, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    inner: RwLock<Inner>,
}

impl MemoryRepository {
    /// Creates a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a project snapshot.
    pub fn insert_project(&self, project: Project) {
        if let Ok(mut inner) = self.inner.write() {
            inner.projects.push(project);
        }
    }

    /// Inserts a family snapshot.
    pub fn insert_family(&self, family: Family) {
        if let Ok(mut inner) = self.inner.write() {
            inner.families.push(family);
        }
    }

    /// Inserts a version snapshot.
    pub fn insert_version(&self, version: Version) {
        if let Ok(mut inner) = self.inner.write() {
            inner.versions.push(version);
        }
    }

    /// Inserts a build snapshot.
    pub fn insert_build(&self, build: Build) {
        if let Ok(mut inner) = self.inner.write() {
            inner.builds.push(build);
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })
    }
}

#[async_trait]
impl ProjectRepository for MemoryRepository {
    async fn find_all(&self) -> Result<Vec<Project>> {
        Ok(self.read()?.projects.clone())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Project>> {
        Ok(self.read()?.projects.iter().find(|p| p.name == name).cloned())
    }
}

#[async_trait]
impl FamilyRepository for MemoryRepository {
    async fn find_all_by_project(&self, project: ProjectId) -> Result<Vec<Family>> {
        Ok(self
            .read()?
            .families
            .iter()
            .filter(|f| f.project == project)
            .cloned()
            .collect())
    }

    async fn find_by_project_and_name(
        &self,
        project: ProjectId,
        name: &str,
    ) -> Result<Option<Family>> {
        Ok(self
            .read()?
            .families
            .iter()
            .find(|f| f.project == project && f.name == name)
            .cloned())
    }

    async fn find_by_id(&self, id: FamilyId) -> Result<Option<Family>> {
        Ok(self.read()?.families.iter().find(|f| f.id == id).cloned())
    }
}

#[async_trait]
impl VersionRepository for MemoryRepository {
    async fn find_all_by_project(&self, project: ProjectId) -> Result<Vec<Version>> {
        Ok(self
            .read()?
            .versions
            .iter()
            .filter(|v| v.project == project)
            .cloned()
            .collect())
    }

    async fn find_by_project_and_name(
        &self,
        project: ProjectId,
        name: &str,
    ) -> Result<Option<Version>> {
        Ok(self
            .read()?
            .versions
            .iter()
            .find(|v| v.project == project && v.name == name)
            .cloned())
    }

    async fn find_all_by_family(&self, family: FamilyId) -> Result<Vec<Version>> {
        Ok(self
            .read()?
            .versions
            .iter()
            .filter(|v| v.family == family)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BuildRepository for MemoryRepository {
    async fn find_all_by_version(&self, version: VersionId) -> Result<Vec<Build>> {
        Ok(self
            .read()?
            .builds
            .iter()
            .filter(|b| b.version == version)
            .cloned()
            .collect())
    }

    async fn find_by_version_and_number(
        &self,
        version: VersionId,
        number: u32,
    ) -> Result<Option<Build>> {
        Ok(self
            .read()?
            .builds
            .iter()
            .find(|b| b.version == version && b.number == number)
            .cloned())
    }
}
