use std::collections::VecDeque;

use crate::utils::Point;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// 90° counter-clockwise as seen on screen.
    pub fn left(&self) -> Direction {
        match self {
            Direction::Up => Direction::Left,
            Direction::Down => Direction::Right,
            Direction::Left => Direction::Down,
            Direction::Right => Direction::Up,
        }
    }

    /// 90° clockwise as seen on screen.
    pub fn right(&self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
            Direction::Right => Direction::Down,
        }
    }

    /// One-cell step `(dx, dy)`.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Heading after applying a relative move.
    pub fn turn(&self, mv: Move) -> Direction {
        match mv {
            Move::Straight => *self,
            Move::Right => self.right(),
            Move::Left => self.left(),
        }
    }
}

/// Action relative to the current heading.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Move {
    Straight,
    Right,
    Left,
}

impl Move {
    pub const COUNT: usize = 3;
    pub const ALL: [Move; 3] = [Move::Straight, Move::Right, Move::Left];

    pub fn index(self) -> usize {
        match self {
            Move::Straight => 0,
            Move::Right => 1,
            Move::Left => 2,
        }
    }

    /// Panics on an index outside `0..3`; callers derive it from a 3-way argmax or draw.
    pub fn from_index(i: usize) -> Move {
        Move::ALL[i]
    }

    pub fn one_hot(self) -> [f32; Move::COUNT] {
        let mut v = [0.0; Move::COUNT];
        v[self.index()] = 1.0;
        v
    }
}

pub struct Snake {
    body: VecDeque<Point>, // body[0] is the head
    direction: Direction,
}

impl Snake {
    /// Straight snake with the tail laid out behind the head.
    pub fn new(head: Point, init_length: usize, direction: Direction) -> Snake {
        let tail_step = direction.opposite().delta();
        let body = (0..init_length.max(1) as i32)
            .map(|i| Point::new(head.x + tail_step.0 * i, head.y + tail_step.1 * i))
            .collect();
        Snake { body, direction }
    }

    pub fn head(&self) -> Point {
        self.body[0]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn body(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }

    /// Body without the head.
    pub fn hits_tail(&self, p: Point) -> bool {
        self.body.iter().skip(1).any(|&seg| seg == p)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.body.contains(&p)
    }

    pub fn turn(&mut self, mv: Move) {
        self.direction = self.direction.turn(mv);
    }

    /// Moves one cell forward. With `grow` the tail stays in place.
    pub fn move_forward(&mut self, grow: bool) {
        let new_head = self.head().offset(self.direction.delta());
        self.body.push_front(new_head);
        if !grow {
            self.drop_tail();
        }
    }

    pub fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }
}
