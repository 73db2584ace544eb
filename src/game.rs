use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::food::Food;
use crate::snake::{Direction, Move, Snake};
use crate::utils::Point;

pub const GRID_WIDTH: i32 = 32;
pub const GRID_HEIGHT: i32 = 24;
const INIT_LENGTH: usize = 3;

pub const REWARD_FOOD: f32 = 10.0;
pub const REWARD_DEATH: f32 = -10.0;

/// What the featurizer is allowed to look at.
pub trait Observation {
    fn head(&self) -> Point;
    fn heading(&self) -> Direction;
    fn food(&self) -> Point;
    fn is_collision(&self, p: Point) -> bool;
}

/// Result of one `play_step`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct StepOutcome {
    pub reward: f32,
    pub done: bool,
    pub score: u32,
}

pub trait Environment: Observation {
    fn reset(&mut self);
    fn play_step(&mut self, mv: Move) -> StepOutcome;
}

/// Headless grid snake.
pub struct SnakeGame {
    width: i32,
    height: i32,
    snake: Snake,
    food: Food,
    score: u32,
    frame_iteration: usize,
    rng: StdRng,
}

impl SnakeGame {
    pub fn new(width: i32, height: i32, seed: u64) -> Self {
        let mut game = Self {
            width,
            height,
            snake: Snake::new(Point::new(width / 2, height / 2), INIT_LENGTH, Direction::Right),
            food: Food::new(Point::default()),
            score: 0,
            frame_iteration: 0,
            rng: StdRng::seed_from_u64(seed),
        };
        game.reset();
        game
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    fn is_inside(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    #[cfg(test)]
    pub(crate) fn place_food(&mut self, p: Point) {
        self.food.position = p;
    }
}

impl Default for SnakeGame {
    fn default() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT, rand::random())
    }
}

impl Observation for SnakeGame {
    fn head(&self) -> Point {
        self.snake.head()
    }

    fn heading(&self) -> Direction {
        self.snake.direction()
    }

    fn food(&self) -> Point {
        self.food.position
    }

    fn is_collision(&self, p: Point) -> bool {
        !self.is_inside(p) || self.snake.hits_tail(p)
    }
}

impl Environment for SnakeGame {
    fn reset(&mut self) {
        let head = Point::new(self.width / 2, self.height / 2);
        self.snake = Snake::new(head, INIT_LENGTH, Direction::Right);
        self.score = 0;
        self.frame_iteration = 0;
        self.food.respawn(&mut self.rng, &self.snake, self.width, self.height);
    }

    fn play_step(&mut self, mv: Move) -> StepOutcome {
        self.frame_iteration += 1;
        self.snake.turn(mv);
        // the tail is dropped only after the collision test
        self.snake.move_forward(true);

        let head = self.snake.head();
        if self.is_collision(head) || self.frame_iteration > 100 * self.snake.len() {
            return StepOutcome { reward: REWARD_DEATH, done: true, score: self.score };
        }

        if head == self.food.position {
            self.score += 1;
            let placed = self.food.respawn(&mut self.rng, &self.snake, self.width, self.height);
            // no free cell left: the board is full and the game is over
            return StepOutcome { reward: REWARD_FOOD, done: !placed, score: self.score };
        }

        self.snake.drop_tail();
        StepOutcome { reward: 0.0, done: false, score: self.score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_state() {
        let game = SnakeGame::new(10, 10, 1);
        assert_eq!(game.head(), Point::new(5, 5));
        assert_eq!(game.heading(), Direction::Right);
        assert_eq!(game.snake().len(), 3);
        assert!(!game.snake().contains(game.food()));
    }

    #[test]
    fn test_walls_collide() {
        let game = SnakeGame::new(10, 10, 1);
        assert!(game.is_collision(Point::new(-1, 0)));
        assert!(game.is_collision(Point::new(10, 3)));
        assert!(game.is_collision(Point::new(3, 10)));
        assert!(!game.is_collision(Point::new(0, 0)));
        // body behind the head
        assert!(game.is_collision(Point::new(4, 5)));
        assert!(!game.is_collision(game.head()));
    }

    #[test]
    fn test_eating_scores() {
        let mut game = SnakeGame::new(10, 10, 1);
        game.place_food(Point::new(6, 5));
        let out = game.play_step(Move::Straight);
        assert_eq!(out, StepOutcome { reward: REWARD_FOOD, done: false, score: 1 });
        assert_eq!(game.snake().len(), 4);
    }

    #[test]
    fn test_running_into_wall_ends_episode() {
        let mut game = SnakeGame::new(4, 4, 1);
        game.place_food(Point::new(0, 0));
        // head at (2,2) heading right: (3,2) then the wall
        assert!(!game.play_step(Move::Straight).done);
        let out = game.play_step(Move::Straight);
        assert!(out.done);
        assert_eq!(out.reward, REWARD_DEATH);
    }

    #[test]
    fn test_reset_after_death() {
        let mut game = SnakeGame::new(4, 4, 1);
        game.place_food(Point::new(0, 0));
        game.play_step(Move::Straight);
        game.play_step(Move::Straight);
        game.reset();
        assert_eq!(game.score(), 0);
        assert_eq!(game.head(), Point::new(2, 2));
    }

    #[test]
    fn test_timeout_ends_episode() {
        let mut game = SnakeGame::new(20, 20, 3);
        // circle in place, far from any wall
        game.place_food(Point::new(0, 0));
        // the limit is checked after the head is pushed, so against len + 1
        let limit = 100 * (game.snake().len() + 1) + 1;
        let mut steps = 0;
        loop {
            steps += 1;
            let out = game.play_step(Move::Right);
            if out.done {
                assert_eq!(out.reward, REWARD_DEATH);
                break;
            }
            assert!(steps <= limit, "timeout never triggered");
        }
        assert_eq!(steps, limit);
        assert_eq!(steps, 401);
    }
}
