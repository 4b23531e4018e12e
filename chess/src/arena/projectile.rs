use super::point::Point;
use crate::types::Side;

/// Projectile flying in a straight line
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projectile {
    owner: Side,
    position: Point,
    velocity: Point,
}

impl Projectile {
    /// Creates a projectile at `start` flying towards `target` with the given speed
    ///
    /// The direction is fixed at creation. If `start` and `target` coincide, the projectile
    /// has no direction and stays in place.
    pub fn new(owner: Side, start: Point, target: Point, speed: f32) -> Projectile {
        let velocity = (target - start)
            .normalized()
            .map_or(Point::ZERO, |dir| dir * speed);
        Projectile {
            owner,
            position: start,
            velocity,
        }
    }

    #[inline]
    pub fn owner(&self) -> Side {
        self.owner
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Point {
        self.velocity
    }

    pub fn advance(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    pub fn is_out_of_bounds(&self, bounds: Point) -> bool {
        self.position.x < 0.0
            || self.position.x > bounds.x
            || self.position.y < 0.0
            || self.position.y > bounds.y
    }

    /// Checks whether the projectile hits a target of side `side` centered at `center`
    ///
    /// Both hit boxes are axis-aligned squares centered at their positions. A projectile never
    /// hits its own side.
    pub fn hits(&self, side: Side, center: Point, target_size: f32, own_size: f32) -> bool {
        if side == self.owner {
            return false;
        }
        let reach = (target_size + own_size) / 2.0;
        (self.position.x - center.x).abs() < reach && (self.position.y - center.y).abs() < reach
    }
}
