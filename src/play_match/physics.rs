//! Arena geometry and collision helpers
//!
//! Everything lives on the XZ plane; the Y component of positions is fixed
//! at zero and ignored by every test here.

use bevy::math::Vec3;

/// Axis-aligned box on the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Build from a center point and half extents (Y is ignored).
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: Vec3::new(center.x - half_extents.x, 0.0, center.z - half_extents.z),
            max: Vec3::new(center.x + half_extents.x, 0.0, center.z + half_extents.z),
        }
    }

    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.z && point.z <= self.max.z
    }

    /// Minimum translation vector that moves `self` out of `other`, pushing
    /// along the axis of least penetration. `None` when they don't overlap.
    pub fn penetration(&self, other: &Bounds) -> Option<Vec3> {
        if !self.overlaps(other) {
            return None;
        }

        let push_pos_x = other.max.x - self.min.x;
        let push_neg_x = self.max.x - other.min.x;
        let push_pos_z = other.max.z - self.min.z;
        let push_neg_z = self.max.z - other.min.z;

        let x = if push_pos_x < push_neg_x { push_pos_x } else { -push_neg_x };
        let z = if push_pos_z < push_neg_z { push_pos_z } else { -push_neg_z };

        if x.abs() < z.abs() {
            Some(Vec3::new(x, 0.0, 0.0))
        } else {
            Some(Vec3::new(0.0, 0.0, z))
        }
    }

    /// Slab test: distance along `direction` (unit) at which a ray from
    /// `origin` enters this box, if within `max_distance`.
    pub fn ray_hit(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;

        for (o, d, lo, hi) in [
            (origin.x, direction.x, self.min.x, self.max.x),
            (origin.z, direction.z, self.min.z, self.max.z),
        ] {
            if d.abs() < 1e-6 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t1 = (lo - o) * inv;
            let mut t2 = (hi - o) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}

/// Closest distance between point `p` and the segment `a`-`b`.
pub fn segment_point_distance(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-8 {
        return a.distance(p);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t).distance(p)
}

/// Unit vector on the XZ plane, or zero.
pub fn flat_direction(from: Vec3, to: Vec3) -> Vec3 {
    Vec3::new(to.x - from.x, 0.0, to.z - from.z).normalize_or_zero()
}

/// Rotate a planar direction by `angle` radians around the vertical axis.
pub fn rotate_planar(direction: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(
        direction.x * cos - direction.z * sin,
        0.0,
        direction.x * sin + direction.z * cos,
    )
}

/// Static arena: rectangular bounds plus fixed obstacles.
#[derive(Debug, Clone)]
pub struct Arena {
    pub half_x: f32,
    pub half_z: f32,
    pub margin: f32,
    pub obstacles: Vec<Bounds>,
}

impl Arena {
    pub fn new(half_x: f32, half_z: f32, margin: f32, obstacles: Vec<Bounds>) -> Self {
        Self {
            half_x,
            half_z,
            margin,
            obstacles,
        }
    }

    /// Clamp a position to the playable area (bounds minus margin).
    pub fn clamp(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            position.x.clamp(-self.half_x + self.margin, self.half_x - self.margin),
            0.0,
            position.z.clamp(-self.half_z + self.margin, self.half_z - self.margin),
        )
    }

    pub fn contains(&self, position: Vec3) -> bool {
        position.x.abs() <= self.half_x - self.margin && position.z.abs() <= self.half_z - self.margin
    }

    /// Distance to the first obstacle along a ray, if any within `max_distance`.
    pub fn ray_obstacle(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        self.obstacles
            .iter()
            .filter_map(|obstacle| obstacle.ray_hit(origin, direction, max_distance))
            .min_by(|a, b| a.total_cmp(b))
    }

    /// True if any obstacle intersects the segment between two points.
    pub fn segment_blocked(&self, from: Vec3, to: Vec3) -> bool {
        let delta = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
        let distance = delta.length();
        if distance < 1e-4 {
            return false;
        }
        self.ray_obstacle(from, delta / distance, distance).is_some()
    }

    pub fn point_in_obstacle(&self, point: Vec3) -> bool {
        self.obstacles.iter().any(|o| o.contains_point(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pillar() -> Bounds {
        Bounds::from_center(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0))
    }

    #[test]
    fn test_penetration_uses_axis_of_least_overlap() {
        let fighter = Bounds::from_center(Vec3::new(1.3, 0.0, 0.2), Vec3::new(0.5, 0.0, 0.5));
        let mtv = fighter.penetration(&pillar()).expect("should overlap");
        // Overlap on X is 0.2, on Z it is 1.3 - push out along +X
        assert!((mtv.x - 0.2).abs() < 1e-5);
        assert_eq!(mtv.z, 0.0);
    }

    #[test]
    fn test_no_penetration_when_apart() {
        let fighter = Bounds::from_center(Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.5, 0.0, 0.5));
        assert!(fighter.penetration(&pillar()).is_none());
    }

    #[test]
    fn test_ray_hits_pillar() {
        let hit = pillar().ray_hit(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 10.0);
        assert!((hit.unwrap() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_misses_when_too_short() {
        assert!(pillar().ray_hit(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 3.0).is_none());
    }

    #[test]
    fn test_segment_blocked_by_arena_obstacle() {
        let arena = Arena::new(20.0, 20.0, 1.0, vec![pillar()]);
        assert!(arena.segment_blocked(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)));
        assert!(!arena.segment_blocked(Vec3::new(-5.0, 0.0, 3.0), Vec3::new(5.0, 0.0, 3.0)));
    }

    #[test]
    fn test_clamp_respects_margin() {
        let arena = Arena::new(20.0, 20.0, 1.0, Vec::new());
        let clamped = arena.clamp(Vec3::new(50.0, 3.0, -50.0));
        assert_eq!(clamped, Vec3::new(19.0, 0.0, -19.0));
    }
}
