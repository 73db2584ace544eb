use serde::{Deserialize, Serialize};

/// Grid cell. `y` grows downwards.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// Index of the largest element; the first one wins on ties.
pub fn argmax(v: &[f32]) -> usize {
    let mut best_i = 0;
    let mut best_v = v[0];
    for i in 1..v.len() {
        if v[i] > best_v {
            best_v = v[i];
            best_i = i;
        }
    }
    best_i
}

pub fn has_non_finite(xs: &[f32]) -> bool {
    xs.iter().any(|&v| !v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_first_wins_on_ties() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0]), 1);
        assert_eq!(argmax(&[0.0, 0.0, 0.0]), 0);
        assert_eq!(argmax(&[-2.0, -1.0, -5.0]), 1);
    }

    #[test]
    fn test_has_non_finite() {
        assert!(!has_non_finite(&[0.0, 1.0]));
        assert!(has_non_finite(&[0.0, f32::NAN]));
        assert!(has_non_finite(&[f32::INFINITY]));
    }

    #[test]
    fn test_offset() {
        assert_eq!(Point::new(3, 4).offset((-1, 0)), Point::new(2, 4));
    }
}
