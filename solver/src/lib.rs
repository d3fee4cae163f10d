//! Solves mazes drawn as images by following walls.
//!
//! Black pixels are walls, a red pixel is the start and a blue pixel the goal.
//! The walker keeps a wall alongside at all times, so it finds a way out of
//! mazes whose walls are connected, but it is not a complete search and gives
//! no guarantee of the shortest path.

pub mod config;
pub mod error;
pub mod find;
pub mod follow;
pub mod grid;
pub mod util;

pub use config::SolverConfig;
pub use error::{InternalError, MazeError};
pub use find::{solve, MazeMap, Outcome, PathMarker, Solution, SolveState, WallFollower};
pub use follow::Walker;
pub use grid::{Cell, CellStorage, Direction, Grid, Overlay, Point};
pub use util::MazeImage;
