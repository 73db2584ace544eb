use crate::game::Observation;
use crate::snake::Direction;

pub const STATE_LEN: usize = 11;

/// 3 danger flags, 4 heading flags, 4 food flags. Every entry is 0.0 or 1.0.
pub type StateVector = [f32; STATE_LEN];

// Layout
pub const DANGER_STRAIGHT: usize = 0;
pub const DANGER_RIGHT: usize = 1;
pub const DANGER_LEFT: usize = 2;
pub const DIR_LEFT: usize = 3;
pub const DIR_RIGHT: usize = 4;
pub const DIR_UP: usize = 5;
pub const DIR_DOWN: usize = 6;
pub const FOOD_LEFT: usize = 7;
pub const FOOD_RIGHT: usize = 8;
pub const FOOD_UP: usize = 9;
pub const FOOD_DOWN: usize = 10;

fn flag(b: bool) -> f32 {
    if b { 1.0 } else { 0.0 }
}

/// Builds the state vector for the current instant of `game`.
///
/// Danger is probed one cell away from the head: straight ahead, to the
/// right of the heading and to the left of it. Food flags compare raw
/// coordinates, so an aligned axis leaves both of its flags at 0.
pub fn get_state<G: Observation + ?Sized>(game: &G) -> StateVector {
    let head = game.head();
    let heading = game.heading();
    let food = game.food();

    let danger = |dir: Direction| flag(game.is_collision(head.offset(dir.delta())));

    let mut state = [0.0f32; STATE_LEN];
    state[DANGER_STRAIGHT] = danger(heading);
    state[DANGER_RIGHT] = danger(heading.right());
    state[DANGER_LEFT] = danger(heading.left());

    let heading_slot = match heading {
        Direction::Left => DIR_LEFT,
        Direction::Right => DIR_RIGHT,
        Direction::Up => DIR_UP,
        Direction::Down => DIR_DOWN,
    };
    state[heading_slot] = 1.0;

    state[FOOD_LEFT] = flag(food.x < head.x);
    state[FOOD_RIGHT] = flag(food.x > head.x);
    state[FOOD_UP] = flag(food.y < head.y);
    state[FOOD_DOWN] = flag(food.y > head.y);

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Point;

    /// Head at the origin; `blocked` lists the compass neighbours that collide.
    struct Probe {
        heading: Direction,
        blocked: Vec<Direction>,
        food: Point,
    }

    impl Observation for Probe {
        fn head(&self) -> Point {
            Point::new(0, 0)
        }
        fn heading(&self) -> Direction {
            self.heading
        }
        fn food(&self) -> Point {
            self.food
        }
        fn is_collision(&self, p: Point) -> bool {
            self.blocked.iter().any(|d| Point::new(0, 0).offset(d.delta()) == p)
        }
    }

    fn danger(heading: Direction, blocked: &[Direction]) -> [f32; 3] {
        let s = get_state(&Probe { heading, blocked: blocked.to_vec(), food: Point::new(0, 0) });
        [s[DANGER_STRAIGHT], s[DANGER_RIGHT], s[DANGER_LEFT]]
    }

    #[test]
    fn test_danger_truth_table() {
        use Direction::*;
        // (heading, compass neighbour, expected [straight, right, left])
        let table = [
            (Up, Up, [1.0, 0.0, 0.0]),
            (Up, Right, [0.0, 1.0, 0.0]),
            (Up, Left, [0.0, 0.0, 1.0]),
            (Down, Down, [1.0, 0.0, 0.0]),
            (Down, Left, [0.0, 1.0, 0.0]),
            (Down, Right, [0.0, 0.0, 1.0]),
            (Left, Left, [1.0, 0.0, 0.0]),
            (Left, Up, [0.0, 1.0, 0.0]),
            (Left, Down, [0.0, 0.0, 1.0]),
            (Right, Right, [1.0, 0.0, 0.0]),
            (Right, Down, [0.0, 1.0, 0.0]),
            (Right, Up, [0.0, 0.0, 1.0]),
        ];
        for (heading, blocked, expected) in table {
            assert_eq!(danger(heading, &[blocked]), expected, "heading {heading:?}, blocked {blocked:?}");
        }
    }

    #[test]
    fn test_cell_behind_is_never_danger() {
        for heading in Direction::ALL {
            assert_eq!(danger(heading, &[heading.opposite()]), [0.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn test_all_danger_combinations() {
        // every subset of the 4 neighbours, for every heading
        for heading in Direction::ALL {
            for mask in 0u8..16 {
                let blocked: Vec<Direction> =
                    Direction::ALL.iter().enumerate().filter(|(i, _)| mask & (1 << i) != 0).map(|(_, &d)| d).collect();
                let has = |d: Direction| if blocked.contains(&d) { 1.0 } else { 0.0 };
                let expected = [has(heading), has(heading.right()), has(heading.left())];
                assert_eq!(danger(heading, &blocked), expected);
            }
        }
    }

    #[test]
    fn test_exactly_one_heading_flag() {
        for heading in Direction::ALL {
            let s = get_state(&Probe { heading, blocked: vec![], food: Point::new(3, -2) });
            assert_eq!(s.len(), STATE_LEN);
            let set: f32 = s[DIR_LEFT..=DIR_DOWN].iter().sum();
            assert_eq!(set, 1.0);
            assert!(s.iter().all(|&v| v == 0.0 || v == 1.0));
        }
    }

    #[test]
    fn test_food_flags() {
        let s = get_state(&Probe { heading: Direction::Up, blocked: vec![], food: Point::new(-4, 2) });
        assert_eq!(&s[FOOD_LEFT..=FOOD_DOWN], &[1.0, 0.0, 0.0, 1.0]);

        let s = get_state(&Probe { heading: Direction::Up, blocked: vec![], food: Point::new(5, -1) });
        assert_eq!(&s[FOOD_LEFT..=FOOD_DOWN], &[0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_food_on_same_axis_leaves_flags_clear() {
        let s = get_state(&Probe { heading: Direction::Right, blocked: vec![], food: Point::new(0, 7) });
        assert_eq!(s[FOOD_LEFT], 0.0);
        assert_eq!(s[FOOD_RIGHT], 0.0);
        assert_eq!(s[FOOD_DOWN], 1.0);

        let s = get_state(&Probe { heading: Direction::Right, blocked: vec![], food: Point::new(0, 0) });
        assert_eq!(&s[FOOD_LEFT..=FOOD_DOWN], &[0.0; 4]);
    }
}
