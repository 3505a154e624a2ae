//! Ground sensor result structures.
//!
//! These structures hold the result of the per-tick downward raycast used
//! by the float law to measure the craft's height above terrain.

use bevy::prelude::*;

/// Result of the downward terrain raycast.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroundHit {
    /// Distance from the ray origin (craft position) to the hit point.
    pub distance: f32,
    /// World position of the hit point.
    pub point: Vec3,
    /// Entity that was hit (if the backend reports one).
    pub entity: Option<Entity>,
}

impl GroundHit {
    /// Create a ground hit.
    pub fn new(distance: f32, point: Vec3, entity: Option<Entity>) -> Self {
        Self {
            distance,
            point,
            entity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_hit_fields() {
        let hit = GroundHit::new(4.0, Vec3::new(1.0, 0.0, 2.0), None);

        assert_eq!(hit.distance, 4.0);
        assert_eq!(hit.point, Vec3::new(1.0, 0.0, 2.0));
        assert!(hit.entity.is_none());
    }

    #[test]
    fn ground_hit_with_entity() {
        let entity = Entity::from_raw(7);
        let hit = GroundHit::new(1.5, Vec3::ZERO, Some(entity));

        assert_eq!(hit.entity, Some(entity));
    }
}
