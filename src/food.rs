use rand::Rng;
use rand::seq::SliceRandom;

use crate::snake::Snake;
use crate::utils::Point;

#[derive(Debug)]
pub struct Food {
    pub position: Point,
}

impl Food {
    pub fn new(position: Point) -> Self {
        Self { position }
    }

    /// Moves the food to a random cell not covered by the snake.
    /// Returns false (and stays put) when the snake fills the board.
    pub fn respawn<R: Rng>(&mut self, rng: &mut R, snake: &Snake, width: i32, height: i32) -> bool {
        // rejection sampling while the board is mostly empty
        for _ in 0..64 {
            let pos = Point::new(rng.gen_range(0..width), rng.gen_range(0..height));
            if !snake.contains(pos) {
                self.position = pos;
                return true;
            }
        }

        let free: Vec<Point> = (0..height)
            .flat_map(|y| (0..width).map(move |x| Point::new(x, y)))
            .filter(|&p| !snake.contains(p))
            .collect();
        match free.choose(rng) {
            Some(&pos) => {
                self.position = pos;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_respawn_avoids_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let snake = Snake::new(Point::new(2, 0), 3, Direction::Right);
        let mut food = Food::new(Point::new(0, 0));
        for _ in 0..100 {
            assert!(food.respawn(&mut rng, &snake, 4, 1));
            assert_eq!(food.position, Point::new(3, 0));
        }
    }

    #[test]
    fn test_respawn_full_board() {
        let mut rng = StdRng::seed_from_u64(7);
        let snake = Snake::new(Point::new(2, 0), 3, Direction::Right);
        let mut food = Food::new(Point::new(1, 0));
        assert!(!food.respawn(&mut rng, &snake, 3, 1));
        assert_eq!(food.position, Point::new(1, 0));
    }
}
