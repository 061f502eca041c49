use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Box anchored at its top-left corner
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Touching edges count as an intersection
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Penetration depth along each axis (negative when separated on that axis)
    pub fn overlap(&self, other: &Aabb) -> Vec2 {
        Vec2::new(
            self.max.x.min(other.max.x) - self.min.x.max(other.min.x),
            self.max.y.min(other.max.y) - self.min.y.max(other.min.y),
        )
    }
}

/// Field edge, also naming the paddle that defends it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    /// Axis along which the paddle on this side travels
    pub fn axis(self) -> Axis {
        match self {
            Side::Left | Side::Right => Axis::Vertical,
            Side::Top | Side::Bottom => Axis::Horizontal,
        }
    }

    /// Unit vector pointing from this edge into the field
    pub fn inward(self) -> Vec2 {
        match self {
            Side::Left => Vec2::X,
            Side::Right => Vec2::NEG_X,
            Side::Top => Vec2::Y,
            Side::Bottom => Vec2::NEG_Y,
        }
    }

    /// True when a ball with this velocity is heading toward this edge
    pub fn is_approaching(self, vel: Vec2) -> bool {
        vel.dot(self.inward()) < 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }

    pub fn with(self, mut v: Vec2, value: f32) -> Vec2 {
        match self {
            Axis::Horizontal => v.x = value,
            Axis::Vertical => v.y = value,
        }
        v
    }

    pub fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Playing field bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub size: Vec2,
    pub margin: f32,
    pub rail_inset: f32,
}

impl Field {
    pub fn new(size: Vec2, margin: f32, rail_inset: f32) -> Self {
        Self {
            size,
            margin,
            rail_inset,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn extent(&self, axis: Axis) -> f32 {
        axis.of(self.size)
    }

    /// Clamp a paddle's leading coordinate so it stays inside the margin
    pub fn clamp_paddle(&self, axis: Axis, start: f32, length: f32) -> f32 {
        let max = (self.extent(axis) - length - self.margin).max(self.margin);
        start.clamp(self.margin, max)
    }

    /// First field edge the box touches or crosses, checked left, right, top, bottom
    pub fn crossed_edge(&self, b: &Aabb) -> Option<Side> {
        if b.min.x <= 0.0 {
            Some(Side::Left)
        } else if b.max.x >= self.size.x {
            Some(Side::Right)
        } else if b.min.y <= 0.0 {
            Some(Side::Top)
        } else if b.max.y >= self.size.y {
            Some(Side::Bottom)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap_depth() {
        let a = Aabb::from_pos_size(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::from_pos_size(Vec2::new(8.0, 5.0), Vec2::new(10.0, 10.0));
        assert!(a.intersects(&b));
        assert_eq!(a.overlap(&b), Vec2::new(2.0, 5.0));
    }

    #[test]
    fn test_aabb_separated() {
        let a = Aabb::from_pos_size(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::from_pos_size(Vec2::new(11.0, 0.0), Vec2::splat(10.0));
        assert!(!a.intersects(&b), "Boxes one unit apart must not intersect");
        assert!(a.overlap(&b).x < 0.0);
    }

    #[test]
    fn test_side_approach() {
        assert!(Side::Right.is_approaching(Vec2::new(1.0, 0.3)));
        assert!(!Side::Left.is_approaching(Vec2::new(1.0, 0.3)));
        assert!(Side::Top.is_approaching(Vec2::new(0.2, -1.0)));
        assert!(Side::Bottom.is_approaching(Vec2::new(0.2, 1.0)));
    }

    #[test]
    fn test_field_clamp_paddle() {
        let field = Field::new(Vec2::new(600.0, 400.0), 20.0, 10.0);
        assert_eq!(field.clamp_paddle(Axis::Vertical, -5.0, 50.0), 20.0);
        assert_eq!(field.clamp_paddle(Axis::Vertical, 500.0, 50.0), 330.0);
        assert_eq!(field.clamp_paddle(Axis::Vertical, 100.0, 50.0), 100.0);
    }

    #[test]
    fn test_field_crossed_edge() {
        let field = Field::new(Vec2::new(600.0, 400.0), 20.0, 10.0);
        let inside = Aabb::from_pos_size(Vec2::new(300.0, 200.0), Vec2::splat(10.0));
        let left = Aabb::from_pos_size(Vec2::new(-1.0, 200.0), Vec2::splat(10.0));
        let right = Aabb::from_pos_size(Vec2::new(591.0, 200.0), Vec2::splat(10.0));
        assert_eq!(field.crossed_edge(&inside), None);
        assert_eq!(field.crossed_edge(&left), Some(Side::Left));
        assert_eq!(field.crossed_edge(&right), Some(Side::Right));
    }
}
