//! Wall following on the pixel grid: getting onto a wall, stepping along it,
//! and running through one-cell-wide tubes.
//!
//! Every operation takes the current position by value and returns the new
//! [`Walker`]; cells the walker enters are handed to a [`PathMarker`].

use log::trace;

use crate::{
    error::InternalError,
    find::{MazeMap, PathMarker},
    grid::{Direction, Point},
};

/// Position plus the direction the walker is travelling along its wall
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Walker {
    pub position: Point,
    pub facing: Option<Direction>,
}

impl Walker {
    pub fn at(position: Point) -> Self {
        Self {
            position,
            facing: None,
        }
    }
}

/// Which of the four orthogonal neighbours are walls (or off the grid)
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Blocked {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

/// The branch of the contour following table that decided a step
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Branch {
    TopLeftCorner,
    TopRightCorner,
    BottomRightCorner,
    BottomLeftCorner,
    LeftSide,
    RightSide,
    BottomSide,
    TopSide,
}

impl Branch {
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Branch::TopLeftCorner
                | Branch::TopRightCorner
                | Branch::BottomRightCorner
                | Branch::BottomLeftCorner
        )
    }
}

impl Blocked {
    pub fn around<M: MazeMap + ?Sized>(map: &M, point: Point) -> Self {
        Self {
            left: map.is_wall_or_boundary(point.step(Direction::Left)),
            right: map.is_wall_or_boundary(point.step(Direction::Right)),
            top: map.is_wall_or_boundary(point.step(Direction::Up)),
            bottom: map.is_wall_or_boundary(point.step(Direction::Down)),
        }
    }

    pub fn is_blocked(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.top,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Picks the step that keeps a wall alongside. Corners win over single
    /// sides and are checked clockwise from the top left; the first match
    /// decides. `None` when nothing is adjacent or the cell is walled in.
    pub fn resolve(&self) -> Option<(Branch, Direction)> {
        use Direction::*;

        if self.left && self.right && self.top && self.bottom {
            return None;
        }

        let resolved = if self.left && self.top {
            (Branch::TopLeftCorner, if self.right { Down } else { Right })
        } else if self.top && self.right {
            (Branch::TopRightCorner, if self.bottom { Left } else { Down })
        } else if self.right && self.bottom {
            (Branch::BottomRightCorner, if self.left { Up } else { Left })
        } else if self.bottom && self.left {
            (Branch::BottomLeftCorner, if self.top { Right } else { Up })
        } else if self.left {
            (Branch::LeftSide, Up)
        } else if self.right {
            (Branch::RightSide, Down)
        } else if self.bottom {
            (Branch::BottomSide, Left)
        } else if self.top {
            (Branch::TopSide, Right)
        } else {
            return None;
        };

        Some(resolved)
    }
}

/// Result of a successful nearest wall search
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Acquisition {
    pub walker: Walker,
    /// Ring (Chebyshev distance) at which the wall was found
    pub radius: usize,
}

/// True when `point` sits in a one cell wide corridor running along `direction`'s axis
pub fn is_tube_along<M: MazeMap + ?Sized>(map: &M, point: Point, direction: Direction) -> bool {
    if direction.is_horizontal() {
        map.is_horizontal_tube(point)
    } else {
        map.is_vertical_tube(point)
    }
}

/// Expands square rings around `from` until one of the eight probe cells
/// (four corners, then four sides) is a wall, and moves next to it.
///
/// Fails only once every probe cell of a ring lies outside the grid.
pub fn acquire_nearest_wall<M, O>(
    map: &M,
    marker: &mut O,
    from: Point,
) -> Result<Option<Acquisition>, InternalError>
where
    M: MazeMap + ?Sized,
    O: PathMarker + ?Sized,
{
    let Point { x, y } = from;
    let mut r: isize = 1;

    loop {
        let ring = [
            Point::new(x - r, y - r), // upper left
            Point::new(x + r, y + r), // lower right
            Point::new(x + r, y - r), // upper right
            Point::new(x - r, y + r), // lower left
            Point::new(x + r, y),     // right
            Point::new(x - r, y),     // left
            Point::new(x, y + r),     // bottom
            Point::new(x, y - r),     // top
        ];

        if ring.iter().all(|p| !map.in_bounds(*p)) {
            trace!("no wall around {} up to radius {}", from, r);
            return Ok(None);
        }

        if let Some(hit) = ring.iter().position(|p| map.is_wall_or_boundary(*p)) {
            let radius = r as usize;
            trace!("wall at {} (radius {})", ring[hit], radius);

            // corners snap diagonally and then pick a direction to hug the wall in
            let corner = |snap: Point, probe: Point, free: Direction, blocked: Direction| {
                let direction = if map.is_wall_or_boundary(probe) {
                    blocked
                } else {
                    free
                };
                (snap, Some(direction))
            };

            let (snap, nudge) = match hit {
                0 => {
                    let snap = Point::new(x - r + 1, y - r + 1);
                    corner(
                        snap,
                        Point::new(snap.x, snap.y - r),
                        Direction::Up,
                        Direction::Right,
                    )
                }
                1 => {
                    let snap = Point::new(x + r - 1, y + r - 1);
                    corner(
                        snap,
                        Point::new(snap.x, snap.y + r),
                        Direction::Down,
                        Direction::Left,
                    )
                }
                2 => {
                    let snap = Point::new(x + r - 1, y - r + 1);
                    corner(
                        snap,
                        Point::new(snap.x + r, snap.y),
                        Direction::Right,
                        Direction::Down,
                    )
                }
                3 => {
                    let snap = Point::new(x - r + 1, y + r - 1);
                    corner(
                        snap,
                        Point::new(snap.x - r, snap.y),
                        Direction::Left,
                        Direction::Up,
                    )
                }
                4 => (Point::new(x + r - 1, y), None),
                5 => (Point::new(x - r + 1, y), None),
                6 => (Point::new(x, y + r - 1), None),
                _ => (Point::new(x, y - r + 1), None),
            };

            let walker = match nudge {
                Some(direction) if !map.is_wall_or_boundary(snap.step(direction)) => {
                    resolve_tube(map, marker, snap.step(direction), direction)?
                }
                _ => {
                    marker.mark(snap);
                    Walker::at(snap)
                }
            };

            return Ok(Some(Acquisition { walker, radius }));
        }

        r += 1;
    }
}

/// Takes one wall hugging step from `position`, decided only by which
/// neighbours are blocked. Returns `None` when no step is possible.
pub fn follow_contour<M, O>(
    map: &M,
    marker: &mut O,
    position: Point,
) -> Result<Option<Walker>, InternalError>
where
    M: MazeMap + ?Sized,
    O: PathMarker + ?Sized,
{
    let blocked = Blocked::around(map, position);
    let Some((branch, direction)) = blocked.resolve() else {
        trace!("no step from {} ({:?})", position, blocked);
        return Ok(None);
    };

    trace!("{:?} at {}, moving {}", branch, position, direction);
    resolve_tube(map, marker, position.step(direction), direction).map(Some)
}

/// Called right after the walker stepped onto `position` travelling in
/// `facing`. Runs through the tube it may have entered, turning back once at
/// a dead end, then steps around the end of the wall it is hugging.
///
/// Stops early on the goal cell. Every entered cell is marked. A straight run
/// takes at most `max(width, height)` steps; the one reversal can double that.
pub fn resolve_tube<M, O>(
    map: &M,
    marker: &mut O,
    mut position: Point,
    mut facing: Direction,
) -> Result<Walker, InternalError>
where
    M: MazeMap + ?Sized,
    O: PathMarker + ?Sized,
{
    let from = position;
    let limit = 2 * map.width().max(map.height()) + 2;
    let mut steps = 0;
    let mut reversed = false;

    marker.mark(position);

    while !map.is_goal(position) && is_tube_along(map, position, facing) {
        let ahead = position.step(facing);
        if !map.is_wall_or_boundary(ahead) {
            position = ahead;
        } else if !reversed && !map.is_wall_or_boundary(position.step(facing.reverse())) {
            trace!("dead end at {}, turning {}", position, facing.reverse());
            reversed = true;
            facing = facing.reverse();
            position = position.step(facing);
        } else {
            // sealed on both ends
            break;
        }

        steps += 1;
        if steps > limit {
            return Err(InternalError::TubeOverrun { from, limit });
        }
        marker.mark(position);
    }

    if !map.is_goal(position) {
        let turn = facing.turn_left();
        let side = position.step(turn);
        if !map.is_wall_or_boundary(side) && !is_tube_along(map, side, turn) {
            position = side;
            marker.mark(position);
        }
    }

    Ok(Walker {
        position,
        facing: Some(facing),
    })
}
