use std::{fmt::Display, str::FromStr};

use crate::error::MazeError;
use crate::find::{MazeMap, PathMarker};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Cell {
    Wall,
    Start,
    Goal,
    Open,
    /// Only ever written into an [`Overlay`], never part of a source [`Grid`]
    Path,
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Cell::Wall => "#",
                Cell::Start => "S",
                Cell::Goal => "G",
                Cell::Open => ".",
                Cell::Path => "*",
            }
        )
    }
}

impl TryFrom<char> for Cell {
    type Error = anyhow::Error;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '#' => Ok(Cell::Wall),
            'S' => Ok(Cell::Start),
            'G' => Ok(Cell::Goal),
            '.' | ' ' => Ok(Cell::Open),
            '*' => Ok(Cell::Path),
            _ => Err(anyhow::anyhow!("Invalid cell: {:?}", c)),
        }
    }
}

/// Direction of travel along the wall currently being hugged
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn reverse(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Quarter turn counter-clockwise as seen on screen (y grows downwards)
    pub fn turn_left(self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Up => "up",
                Direction::Down => "down",
                Direction::Left => "left",
                Direction::Right => "right",
            }
        )
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(anyhow::anyhow!("Invalid direction: {}", s)),
        }
    }
}

/// A pixel coordinate. Signed so that neighbours of edge cells can be probed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Point {
    pub x: isize,
    pub y: isize,
}

impl Point {
    pub const fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rectangular storage of one value per cell, kept row-major in a single vec
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CellStorage<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Copy> CellStorage<T> {
    pub fn new(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, point: Point) -> Option<usize> {
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn get(&self, point: Point) -> Option<T> {
        self.index(point).map(|i| self.cells[i])
    }

    pub fn get_mut(&mut self, point: Point) -> Option<&mut T> {
        self.index(point).map(move |i| &mut self.cells[i])
    }

    /// All cells with their coordinates, in row-major order starting at (0, 0)
    pub fn iter(&self) -> impl Iterator<Item = (Point, T)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            (
                Point::new((i % width) as isize, (i / width) as isize),
                *cell,
            )
        })
    }
}

impl<T: Display> Display for CellStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// The source maze. Read-only once built; all wall tests go through it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid {
    cells: CellStorage<Cell>,
}

impl Grid {
    /// An all-open grid of the given size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: CellStorage::new(width, height, Cell::Open),
        }
    }

    /// Sets a cell while building the grid. Returns `false` if `point` is outside it.
    pub fn set(&mut self, point: Point, cell: Cell) -> bool {
        match self.cells.get_mut(point) {
            Some(c) => {
                *c = cell;
                true
            }
            None => false,
        }
    }

    pub fn cells(&self) -> &CellStorage<Cell> {
        &self.cells
    }

    /// First cell of the given kind in row-major order
    pub fn find_first(&self, kind: Cell) -> Option<Point> {
        self.cells
            .iter()
            .find_map(|(point, cell)| (cell == kind).then_some(point))
    }

    pub fn find_start(&self) -> Result<Point, MazeError> {
        self.find_first(Cell::Start).ok_or(MazeError::NoStartFound)
    }
}

impl MazeMap for Grid {
    fn width(&self) -> usize {
        self.cells.width()
    }

    fn height(&self) -> usize {
        self.cells.height()
    }

    fn cell_at(&self, point: Point) -> Option<Cell> {
        self.cells.get(point)
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cells)
    }
}

impl FromStr for Grid {
    type Err = anyhow::Error;

    /// Parses one row per line using the characters of [`Cell`]'s `Display`.
    /// Blank lines are skipped and surrounding indentation is trimmed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .map(Cell::try_from)
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(anyhow::anyhow!("Empty grid"));
        }
        if let Some(row) = rows.iter().position(|r| r.len() != width) {
            return Err(anyhow::anyhow!(
                "Row {} has {} cells, expected {}",
                row,
                rows[row].len(),
                width
            ));
        }

        Ok(Grid {
            cells: CellStorage {
                width,
                height: rows.len(),
                cells: rows.into_iter().flatten().collect(),
            },
        })
    }
}

/// The rendered path: a copy of the source cells where visited open cells become [`Cell::Path`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Overlay {
    cells: CellStorage<Cell>,
}

impl Overlay {
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            cells: grid.cells.clone(),
        }
    }

    pub fn cells(&self) -> &CellStorage<Cell> {
        &self.cells
    }

    pub fn cell_at(&self, point: Point) -> Option<Cell> {
        self.cells.get(point)
    }

    pub fn marked(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells
            .iter()
            .filter_map(|(point, cell)| (cell == Cell::Path).then_some(point))
    }
}

impl PathMarker for Overlay {
    /// Start, goal and wall cells keep their kind; marking twice is harmless.
    fn mark(&mut self, point: Point) {
        if let Some(cell) = self.cells.get_mut(point) {
            if *cell == Cell::Open {
                *cell = Cell::Path;
            }
        }
    }
}

impl Display for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cells)
    }
}

#[cfg(test)]
mod test {

    use super::*;

    fn create_basic_map() -> Grid {
        "
        #####
        #S..#
        #.#G#
        #####
        "
        .parse()
        .unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let grid = create_basic_map();

        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.cell_at(Point::new(1, 1)), Some(Cell::Start));
        assert_eq!(grid.cell_at(Point::new(3, 2)), Some(Cell::Goal));
        assert_eq!(grid.cell_at(Point::new(2, 2)), Some(Cell::Wall));
        assert_eq!(grid.to_string(), "#####\n#S..#\n#.#G#\n#####\n");
    }

    #[test]
    fn test_parse_rejects_ragged_and_unknown() {
        assert!("###\n##\n".parse::<Grid>().is_err());
        assert!("#x#\n".parse::<Grid>().is_err());
        assert!("\n\n".parse::<Grid>().is_err());
    }

    #[test]
    fn test_bounds_and_boundary_walls() {
        let grid: Grid = "S..\n...\n".parse().unwrap();

        assert!(grid.in_bounds(Point::new(0, 0)));
        assert!(grid.in_bounds(Point::new(2, 1)));
        assert!(!grid.in_bounds(Point::new(3, 0)));
        assert!(!grid.in_bounds(Point::new(0, 2)));

        // no explicit walls, but the image edge counts as one
        assert!(!grid.is_wall_or_boundary(Point::new(0, 1)));
        assert!(grid.is_wall_or_boundary(Point::new(-1, 1)));
        assert!(grid.is_wall_or_boundary(Point::new(0, -1)));
        assert!(grid.cell_at(Point::new(-1, 1)).is_none());
    }

    #[test]
    fn test_find_start_scans_row_major() {
        let grid: Grid = "..S\nS..\n".parse().unwrap();
        assert_eq!(grid.find_start().unwrap(), Point::new(2, 0));

        let grid: Grid = "...\n.G.\n".parse().unwrap();
        assert!(matches!(grid.find_start(), Err(MazeError::NoStartFound)));
    }

    #[test]
    fn test_overlay_keeps_markers() {
        let grid = create_basic_map();
        let mut overlay = Overlay::from_grid(&grid);

        for point in [
            Point::new(1, 1),
            Point::new(2, 1),
            Point::new(2, 1),
            Point::new(0, 0),
            Point::new(3, 2),
            Point::new(9, 9),
        ] {
            overlay.mark(point);
        }

        assert_eq!(overlay.marked().collect::<Vec<_>>(), vec![Point::new(2, 1)]);
        assert_eq!(overlay.cell_at(Point::new(1, 1)), Some(Cell::Start));
        assert_eq!(overlay.cell_at(Point::new(3, 2)), Some(Cell::Goal));
        assert_eq!(overlay.cell_at(Point::new(0, 0)), Some(Cell::Wall));
        // the source is untouched
        assert_eq!(grid.cell_at(Point::new(2, 1)), Some(Cell::Open));
    }

    #[test]
    fn test_direction_helpers() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert_eq!(direction.reverse().reverse(), direction);
            assert_ne!(direction.turn_left().is_horizontal(), direction.is_horizontal());
            assert_eq!(direction.to_string().parse::<Direction>().unwrap(), direction);
        }
        assert_eq!(Point::new(3, 3).step(Direction::Up), Point::new(3, 2));
        assert!("sideways".parse::<Direction>().is_err());
    }
}
