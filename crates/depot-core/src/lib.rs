//! # depot-core
//!
//! Core abstractions for the Depot release artifact catalog.
//!
//! This crate provides the foundational types shared across all Depot
//! components:
//!
//! - **Entity Model**: Immutable snapshots of projects, release families,
//!   versions, builds and downloads
//! - **Identifiers**: Strongly-typed IDs for every entity kind
//! - **Artifact Store**: The storage collaborator port that turns opaque
//!   storage keys into fetchable URLs
//! - **Error Types**: Shared error definitions and result types
//! - **Observability**: Logging initialization and span constructors
//!
//! ## Crate Boundary
//!
//! `depot-core` is the only crate allowed to define shared primitives.
//! The query engine in `depot-catalog` consumes these types; transport
//! and persistence layers live outside this workspace entirely.
//!
//! ## Example
//!
//! ```rust
//! use depot_core::prelude::*;
//!
//! let id = ProjectId::generate();
//! let key = StorageKey::new("paper/1.0.0/10/server.jar");
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod id;
pub mod model;
pub mod observability;
pub mod storage;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use depot_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::id::{BuildId, FamilyId, ProjectId, VersionId};
    pub use crate::model::{
        Build, Channel, Checksums, Commit, Download, Family, JavaRuntime, Project, Support,
        SupportSpec, SupportStatus, Version,
    };
    pub use crate::storage::{ArtifactStore, MemoryStore, PublicUrlStore, StorageKey};
}

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use id::{BuildId, FamilyId, ProjectId, VersionId};
pub use model::{
    Build, Channel, Checksums, Commit, Download, Family, JavaRuntime, Project, Support,
    SupportSpec, SupportStatus, Version,
};
pub use observability::{LogFormat, catalog_span, init_logging};
pub use storage::{ArtifactStore, MemoryStore, PublicUrlConfig, PublicUrlStore, StorageKey};
