use log::debug;

use crate::{
    config::SolverConfig,
    error::InternalError,
    follow::{acquire_nearest_wall, follow_contour, Walker},
    grid::{Cell, CellStorage, Grid, Overlay, Point},
};

/// Read access to the maze the solver walks in
pub trait MazeMap {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// The cell at `point`, `None` outside the map
    fn cell_at(&self, point: Point) -> Option<Cell>;

    fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width()
            && (point.y as usize) < self.height()
    }

    /// Cells outside the map count as walls
    fn is_wall_or_boundary(&self, point: Point) -> bool {
        self.cell_at(point).map_or(true, |cell| cell == Cell::Wall)
    }

    fn is_goal(&self, point: Point) -> bool {
        self.cell_at(point) == Some(Cell::Goal)
    }

    /// Walls directly above and below
    fn is_horizontal_tube(&self, point: Point) -> bool {
        self.is_wall_or_boundary(Point::new(point.x, point.y - 1))
            && self.is_wall_or_boundary(Point::new(point.x, point.y + 1))
    }

    /// Walls directly left and right
    fn is_vertical_tube(&self, point: Point) -> bool {
        self.is_wall_or_boundary(Point::new(point.x - 1, point.y))
            && self.is_wall_or_boundary(Point::new(point.x + 1, point.y))
    }
}

/// Write access for recording the cells the walker enters
pub trait PathMarker {
    fn mark(&mut self, point: Point);
}

/// Records the walk in visiting order, repeats included
impl PathMarker for Vec<Point> {
    fn mark(&mut self, point: Point) {
        self.push(point);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveState {
    /// Not touching a wall yet
    Seeking(Point),
    Following(Walker),
    Solved(Point),
    Unsolvable(Point),
}

impl SolveState {
    pub fn is_done(&self) -> bool {
        matches!(self, SolveState::Solved(_) | SolveState::Unsolvable(_))
    }

    pub fn position(&self) -> Point {
        match *self {
            SolveState::Seeking(p) | SolveState::Solved(p) | SolveState::Unsolvable(p) => p,
            SolveState::Following(walker) => walker.position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Solved,
    /// The walker ran out of moves or started circling without reaching the goal.
    /// Wall following is a local heuristic, so this can happen even if a path exists.
    Unsolvable,
}

#[derive(Debug)]
pub struct WallFollower<'a, M: MazeMap + ?Sized, O: PathMarker> {
    map: &'a M,
    marker: O,
    // positions the Following state has already started a transition from
    departed: CellStorage<bool>,
    state: SolveState,
    iterations: usize,
    limit: usize,
}

impl<'a, M: MazeMap + ?Sized, O: PathMarker> WallFollower<'a, M, O> {
    pub fn new(map: &'a M, start: Point, marker: O, config: &SolverConfig) -> Self {
        Self {
            map,
            marker,
            departed: CellStorage::new(map.width(), map.height(), false),
            state: SolveState::Seeking(start),
            iterations: 0,
            limit: config.iteration_limit(map.width(), map.height()),
        }
    }

    /// Runs transitions until the walk is done
    pub fn finish(mut self) -> Result<(Outcome, O), InternalError> {
        loop {
            match self.step()? {
                SolveState::Solved(_) => return Ok((Outcome::Solved, self.marker)),
                SolveState::Unsolvable(_) => return Ok((Outcome::Unsolvable, self.marker)),
                _ => {}
            }
        }
    }

    /// Performs exactly one transition; a no-op once done.
    pub fn step(&mut self) -> Result<SolveState, InternalError> {
        if self.state.is_done() {
            return Ok(self.state);
        }

        self.iterations += 1;
        if self.iterations > self.limit {
            return Err(InternalError::IterationCap { limit: self.limit });
        }

        let next = self.transition(self.state)?;
        debug!("{:?} -> {:?}", self.state, next);
        self.state = next;

        Ok(self.state)
    }

    pub fn transition(&mut self, state: SolveState) -> Result<SolveState, InternalError> {
        let position = state.position();
        if !self.map.in_bounds(position) {
            return Err(InternalError::OutOfBounds(position));
        }
        if self.map.is_goal(position) {
            return Ok(SolveState::Solved(position));
        }

        match state {
            SolveState::Seeking(_) => self.reacquire(position),
            SolveState::Following(_) => {
                // each transition only depends on the position, so coming back means circling
                match self.departed.get_mut(position) {
                    Some(departed) if *departed => return Ok(SolveState::Unsolvable(position)),
                    Some(departed) => *departed = true,
                    None => return Err(InternalError::OutOfBounds(position)),
                }

                match follow_contour(self.map, &mut self.marker, position)? {
                    Some(walker) => Ok(SolveState::Following(walker)),
                    None => self.reacquire(position),
                }
            }
            done => Ok(done),
        }
    }

    fn reacquire(&mut self, position: Point) -> Result<SolveState, InternalError> {
        Ok(
            match acquire_nearest_wall(self.map, &mut self.marker, position)? {
                Some(acquired) => SolveState::Following(acquired.walker),
                None => SolveState::Unsolvable(position),
            },
        )
    }

    pub fn state(&self) -> &SolveState {
        &self.state
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn marker(&self) -> &O {
        &self.marker
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub outcome: Outcome,
    pub overlay: Overlay,
}

/// Walks `grid` from `start` with a fresh [`Overlay`]
pub fn solve(grid: &Grid, start: Point, config: &SolverConfig) -> Result<Solution, InternalError> {
    let follower = WallFollower::new(grid, start, Overlay::from_grid(grid), config);
    let (outcome, overlay) = follower.finish()?;

    debug!(
        "{:?} after marking {} cells",
        outcome,
        overlay.marked().count()
    );

    Ok(Solution { outcome, overlay })
}
