//! Error types for the maze solver

use std::path::PathBuf;

use thiserror::Error;

use crate::grid::Point;

/// Failures that end a run before or around solving
#[derive(Error, Debug)]
pub enum MazeError {
    #[error("failed to decode maze image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode maze image {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no start marker found in maze")]
    NoStartFound,

    #[error("internal solver error: {0}")]
    Internal(#[from] InternalError),
}

/// A bug in the wall following logic itself, never a property of the maze
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    #[error("solve loop exceeded {limit} iterations")]
    IterationCap { limit: usize },

    #[error("tube traversal from {from} did not settle within {limit} steps")]
    TubeOverrun { from: Point, limit: usize },

    #[error("walker left the grid at {0}")]
    OutOfBounds(Point),
}

pub type Result<T> = std::result::Result<T, MazeError>;
