//! # depot-catalog
//!
//! The catalog query and artifact-resolution engine for Depot.
//!
//! Depot exposes a hierarchical inventory of software release artifacts
//! (project → release family → version → build → download) and answers
//! read-side queries that filter, sort, paginate and resolve those
//! entities into retrievable download locations:
//!
//! - **Repository Ports**: Abstract lookup interfaces backed by an
//!   external persistence store, plus an in-memory implementation for
//!   tests
//! - **Support Resolver**: Derives a version's effective lifecycle state
//!   from its stored support fields and the evaluation date
//! - **Filter Engine**: Conjunctive optional predicates with validated
//!   result-size limits over the canonical orderings
//! - **Artifact Resolver**: Turns opaque storage keys into fetchable
//!   URLs per request, behind a short-lived single-flight cache
//! - **Query Facade**: [`Catalog`], composing the above into the
//!   operations a transport layer invokes
//!
//! The engine is read-only: entities are created by an external
//! ingestion path and never mutated here.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use depot_catalog::{ArtifactResolver, Catalog, ResolverConfig, VersionFilter};
//! use depot_core::MemoryStore;
//!
//! let store = Arc::new(MemoryStore::new());
//! let resolver = ArtifactResolver::new(store, ResolverConfig::default());
//! let catalog = Catalog::new(projects, families, versions, builds, resolver);
//!
//! let supported = catalog
//!     .list_versions("paper", &VersionFilter::default(), Some(5))
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod filter;
pub mod query;
pub mod repository;
pub mod resolver;
pub mod support;
pub mod view;

pub use error::{CatalogError, Result};
pub use filter::{BuildFilter, Limit, VersionFilter};
pub use query::Catalog;
pub use repository::{
    BuildRepository, FamilyRepository, MemoryRepository, ProjectRepository, VersionRepository,
};
pub use resolver::{ArtifactResolver, ResolverConfig};
pub use view::{
    BuildView, DownloadView, FamilyView, ProjectView, UpdateCheck, UrlOutcome, VersionView,
};
