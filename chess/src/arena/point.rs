use derive_more::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Point or vector in arena coordinates
///
/// One unit equals the size of a fighter. `y` grows upwards.
#[derive(Debug, Default, Copy, Clone, PartialEq, Add, AddAssign, Sub, SubAssign, Mul, Neg)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Point {
        Point { x, y }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Returns the unit vector with the same direction
    ///
    /// Returns `None` if the vector has zero or non-finite length, i.e. has no direction.
    pub fn normalized(&self) -> Option<Point> {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        Some(Point::new(self.x / len, self.y / len))
    }
}
