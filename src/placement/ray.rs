use bevy::prelude::*;

use crate::session::plane_registry::PlaneRecord;

/// Ray distance to an infinite horizontal plane at `height`, or `None` for
/// rays parallel to it or pointing away.
pub fn ray_horizontal_plane_t(origin: Vec3, direction: Vec3, height: f32) -> Option<f32> {
    if direction.y.abs() < 1e-4 {
        return None;
    }
    let t = (height - origin.y) / direction.y;
    (t > 0.0).then_some(t)
}

/// Ray distance to a tracked plane's finite surface rectangle.
pub fn ray_hits_plane_rect(origin: Vec3, direction: Vec3, record: &PlaneRecord) -> Option<f32> {
    let t = ray_horizontal_plane_t(origin, direction, record.origin.y)?;
    let point = origin + direction * t;
    record.contains_horizontally(point).then_some(t)
}

/// Ray test against an element's oriented bounding box, in box-local space.
pub fn ray_hits_obb(origin: Vec3, direction: Vec3, transform: &Transform, size: Vec3) -> Option<f32> {
    let inverse = transform.compute_matrix().inverse();
    let local_origin = inverse.transform_point3(origin);
    let local_direction = inverse.transform_vector3(direction);
    let half = size * 0.5;
    ray_aabb_hit_t(local_origin, local_direction, -half, half)
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = Vec3::new(
        if ray_direction.x != 0.0 { 1.0 / ray_direction.x } else { f32::INFINITY },
        if ray_direction.y != 0.0 { 1.0 / ray_direction.y } else { f32::INFINITY },
        if ray_direction.z != 0.0 { 1.0 / ray_direction.z } else { f32::INFINITY },
    );

    let (mut tmin, mut tmax) = ((min.x - ray_origin.x) * inv.x, (max.x - ray_origin.x) * inv.x);
    if tmin > tmax {
        std::mem::swap(&mut tmin, &mut tmax);
    }

    let (mut tymin, mut tymax) = ((min.y - ray_origin.y) * inv.y, (max.y - ray_origin.y) * inv.y);
    if tymin > tymax {
        std::mem::swap(&mut tymin, &mut tymax);
    }

    if (tmin > tymax) || (tymin > tmax) {
        return None;
    }
    if tymin > tmin {
        tmin = tymin;
    }
    if tymax < tmax {
        tmax = tymax;
    }

    let (mut tzmin, mut tzmax) = ((min.z - ray_origin.z) * inv.z, (max.z - ray_origin.z) * inv.z);
    if tzmin > tzmax {
        std::mem::swap(&mut tzmin, &mut tzmax);
    }

    if (tmin > tzmax) || (tzmin > tmax) {
        return None;
    }
    if tzmin > tmin {
        tmin = tzmin;
    }
    if tzmax < tmax {
        tmax = tzmax;
    }

    if tmax < 0.0 {
        return None;
    }
    Some(if tmin >= 0.0 { tmin } else { tmax })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::anchors::{PlaneAnchorId, PlaneCenter, PlaneExtent};
    use crate::session::plane_registry::PlaneMaterialKind;

    fn record(origin: Vec3, width: f32, depth: f32) -> PlaneRecord {
        PlaneRecord {
            id: PlaneAnchorId(1),
            origin,
            extent: PlaneExtent::new(width, depth),
            center: PlaneCenter::default(),
            visible: true,
            material_kind: PlaneMaterialKind::Default,
        }
    }

    #[test]
    fn downward_ray_hits_plane_rect() {
        let record = record(Vec3::new(0.0, -0.5, 0.0), 1.0, 1.0);
        let t = ray_hits_plane_rect(Vec3::new(0.2, 1.5, 0.2), Vec3::NEG_Y, &record).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_outside_extent() {
        let record = record(Vec3::new(0.0, 0.0, 0.0), 1.0, 1.0);
        assert!(ray_hits_plane_rect(Vec3::new(0.8, 1.0, 0.0), Vec3::NEG_Y, &record).is_none());
    }

    #[test]
    fn horizontal_ray_never_hits_horizontal_plane() {
        assert!(ray_horizontal_plane_t(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 0.0).is_none());
    }

    #[test]
    fn plane_behind_ray_origin_is_ignored() {
        assert!(ray_horizontal_plane_t(Vec3::new(0.0, 1.0, 0.0), Vec3::Y, 0.0).is_none());
    }

    #[test]
    fn obb_hit_accounts_for_translation() {
        let transform = Transform::from_translation(Vec3::new(0.0, 0.0, -3.0));
        let t = ray_hits_obb(Vec3::ZERO, Vec3::NEG_Z, &transform, Vec3::splat(1.0)).unwrap();
        assert!((t - 2.5).abs() < 1e-5);
    }

    #[test]
    fn aabb_miss_returns_none() {
        assert!(ray_aabb_hit_t(
            Vec3::new(5.0, 5.0, 5.0),
            Vec3::Y,
            Vec3::splat(-1.0),
            Vec3::splat(1.0)
        )
        .is_none());
    }
}
