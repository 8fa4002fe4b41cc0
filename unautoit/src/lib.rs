//! Orchestration for extracting resources from compiled AutoIt binaries.
//!
//! Container parsing, payload decompression and script tokenizing/tidying are provided by a
//! [`Decompiler`] backend. This crate drives that backend: it resolves style settings,
//! classifies and lists resources, names output files and runs single or batch extraction.

/// Resource classification.
pub mod classify;
/// The decompiler backend seam.
pub mod decompiler;
/// Single resource extraction.
pub mod extract;
/// Resource listing.
pub mod list;
/// Output file naming.
pub mod naming;
/// Concurrent batch extraction.
pub mod pipeline;
/// Resources and the resource catalog.
pub mod resource;
/// Tidy style settings.
pub mod style;
/// Text helpers.
pub mod text;

pub use self::classify::FileType;
pub use self::decompiler::BoxError;
pub use self::decompiler::Decompiler;
pub use self::decompiler::NoProgress;
pub use self::decompiler::Progress;
pub use self::decompiler::Unlinked;
pub use self::extract::extract_resource;
pub use self::extract::ExtractOptions;
pub use self::extract::Extracted;
pub use self::list::ResourceInfo;
pub use self::pipeline::extract_all;
pub use self::pipeline::BatchReport;
pub use self::pipeline::ExtractionState;
pub use self::pipeline::PipelineObserver;
pub use self::pipeline::ResourceOutcome;
pub use self::resource::Catalog;
pub use self::resource::DecompiledState;
pub use self::resource::Resource;
pub use self::style::IdentCase;
pub use self::style::StyleOptions;

use std::path::PathBuf;

/// The minimum keyword score for a payload to be treated as a script.
pub const SCRIPT_CONFIDENCE: usize = 20;

/// The library error type
#[derive(Debug)]
pub enum Error {
    /// An I/O error occured.
    Io(std::io::Error),

    /// The backend could not parse the container.
    InvalidContainer {
        /// The error
        error: BoxError,
    },

    /// No resource has the requested id.
    NoSuchResource {
        /// The requested id
        id: usize,

        /// The number of resources in the catalog
        count: usize,
    },

    /// The backend failed to decompress a payload.
    Decompress {
        /// The resource id
        id: usize,
    },

    /// The output directory could not be created.
    CreateDir {
        /// The directory path
        path: PathBuf,

        /// The error
        error: std::io::Error,
    },

    /// An output file could not be written.
    Write {
        /// The file path
        path: PathBuf,

        /// The error
        error: std::io::Error,
    },

    /// No worker thread could be started for a resource.
    Spawn {
        /// The resource id
        id: usize,

        /// The error
        error: std::io::Error,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(_error) => write!(f, "an I/O error occured"),
            Self::InvalidContainer { .. } => write!(f, "the container is invalid"),
            Self::NoSuchResource { id, count } => write!(
                f,
                "no such resource id {id}, the container has {count} resources. Try using the list command"
            ),
            Self::Decompress { id } => write!(
                f,
                "resource {id} is compressed and the decompressor failed, the payload is corrupt or unsupported"
            ),
            Self::CreateDir { path, .. } => {
                write!(f, "failed to create directory at \"{}\"", path.display())
            }
            Self::Write { path, .. } => write!(f, "failed to write \"{}\"", path.display()),
            Self::Spawn { id, .. } => write!(f, "failed to start a worker for resource {id}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            Self::InvalidContainer { error } => Some(&**error),
            Self::CreateDir { error, .. } => Some(error),
            Self::Write { error, .. } => Some(error),
            Self::Spawn { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}
