//! Headless collision среда: набор твёрдых полупространств
//!
//! Замена host physics (Godot CharacterBody3D / Rapier) для headless симуляции и тестов.
//! Актор = вертикальная капсула (центр в Transform.translation).
//! Move: сдвиг → выталкивание из пересечённых плоскостей вдоль нормали
//! (итеративно для углов) → скольжение вдоль стен.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::locomotion::{CharacterCollider, GroundProbe, MoveResult};

/// Проходов solver'а на один move (угол = 2 плоскости, запас на 3+)
const MAX_SOLVER_ITERATIONS: usize = 4;

/// Пересечения меньше этого игнорируются (float шум при скольжении по полу)
const PENETRATION_SLOP: f32 = 1e-4;

/// Твёрдое полупространство: solid где dot(normal, p) < offset
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CollisionPlane {
    /// Unit нормаль, смотрит в свободную сторону
    pub normal: Vec3,
    pub offset: f32,
}

impl CollisionPlane {
    /// Плоскость через `point` с нормалью `normal` (нормализуется)
    pub fn new(normal: Vec3, point: Vec3) -> Self {
        let normal = normal.normalize_or(Vec3::Y);
        Self {
            normal,
            offset: normal.dot(point),
        }
    }

    /// Расстояние от ближайшей точки капсулы до плоскости (< 0 = пересечение)
    pub fn separation(&self, center: Vec3, body: &BodyShape) -> f32 {
        let reach = body.radius + body.half_height * self.normal.y.abs();
        self.normal.dot(center) - self.offset - reach
    }
}

/// Капсула актора (совпадает с rapier Collider::capsule_y)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct BodyShape {
    /// Половина высоты цилиндрической части
    pub half_height: f32,
    pub radius: f32,
}

impl Default for BodyShape {
    fn default() -> Self {
        Self {
            half_height: 0.5, // Высота 1.8m (0.5 + 0.5 + 2 × 0.4)
            radius: 0.4,
        }
    }
}

impl BodyShape {
    /// Высота центра над полом при касании
    pub fn center_height(&self) -> f32 {
        self.half_height + self.radius
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = self.half_height.is_finite()
            && self.radius.is_finite()
            && self.half_height >= 0.0
            && self.radius > 0.0;
        if valid {
            Ok(())
        } else {
            Err(ConfigError::Body {
                half_height: self.half_height,
                radius: self.radius,
            })
        }
    }
}

/// Ground contact актора по итогам последнего move
///
/// Как CharacterController host'а: обновляется только attempt_move.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct GroundContact {
    pub grounded: bool,
}

impl GroundProbe for GroundContact {
    fn is_ground_contact(&self) -> bool {
        self.grounded
    }
}

/// Статическая геометрия headless мира
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PlaneWorld {
    pub planes: Vec<CollisionPlane>,
    /// cos(max slope): плоскость walkable если normal.y ≥ этого
    pub walkable_min_normal_y: f32,
    /// Зазор, в пределах которого касание считается ground contact
    pub skin_width: f32,
}

impl Default for PlaneWorld {
    fn default() -> Self {
        Self::with_floor(0.0)
    }
}

impl PlaneWorld {
    pub fn empty() -> Self {
        Self {
            planes: Vec::new(),
            walkable_min_normal_y: 45.0_f32.to_radians().cos(),
            skin_width: 0.02,
        }
    }

    pub fn with_floor(height: f32) -> Self {
        Self::empty().with_plane(CollisionPlane::new(Vec3::Y, Vec3::Y * height))
    }

    /// Пол + 4 стены квадратной арены (|x|, |z| ≤ half_extent)
    pub fn arena(floor_height: f32, half_extent: f32) -> Self {
        let mut world = Self::with_floor(floor_height);
        for axis in [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z] {
            world = world.with_plane(CollisionPlane::new(-axis, axis * half_extent));
        }
        world
    }

    pub fn with_plane(mut self, plane: CollisionPlane) -> Self {
        self.planes.push(plane);
        self
    }

    pub fn is_walkable(&self, plane: &CollisionPlane) -> bool {
        plane.normal.y >= self.walkable_min_normal_y
    }

    pub fn ground_contact(&self, center: Vec3, body: &BodyShape) -> bool {
        self.planes
            .iter()
            .any(|plane| self.is_walkable(plane) && plane.separation(center, body) <= self.skin_width)
    }

    /// Выталкивание капсулы из всех плоскостей. Возвращает (позиция, было ли выталкивание)
    pub fn depenetrate(&self, mut center: Vec3, body: &BodyShape) -> (Vec3, bool) {
        let mut pushed = false;

        for _ in 0..MAX_SOLVER_ITERATIONS {
            let mut settled = true;
            for plane in &self.planes {
                let depth = -plane.separation(center, body);
                if depth > PENETRATION_SLOP {
                    center += plane.normal * depth;
                    pushed = true;
                    settled = false;
                }
            }
            if settled {
                break;
            }
        }

        (center, pushed)
    }
}

/// CharacterCollider одного актора поверх PlaneWorld
///
/// Двигает Transform и обновляет GroundContact, живёт один step.
pub struct PlaneCollider<'a> {
    world: &'a PlaneWorld,
    body: &'a BodyShape,
    transform: &'a mut Transform,
    contact: &'a mut GroundContact,
}

impl<'a> PlaneCollider<'a> {
    pub fn new(
        world: &'a PlaneWorld,
        body: &'a BodyShape,
        transform: &'a mut Transform,
        contact: &'a mut GroundContact,
    ) -> Self {
        Self {
            world,
            body,
            transform,
            contact,
        }
    }
}

impl GroundProbe for PlaneCollider<'_> {
    fn is_ground_contact(&self) -> bool {
        self.contact.grounded
    }
}

impl CharacterCollider for PlaneCollider<'_> {
    fn attempt_move(&mut self, displacement: Vec3) -> MoveResult {
        let start = self.transform.translation;
        let (end, obstructed) = self.world.depenetrate(start + displacement, self.body);

        self.transform.translation = end;
        self.contact.grounded = self.world.ground_contact(end, self.body);

        MoveResult {
            obstructed,
            actual_displacement: end - start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(world: &PlaneWorld, body: &BodyShape) -> Transform {
        let transform = Transform::from_xyz(0.0, body.center_height(), 0.0);
        assert!(world.ground_contact(transform.translation, body));
        transform
    }

    #[test]
    fn test_floor_blocks_fall() {
        let world = PlaneWorld::default();
        let body = BodyShape::default();
        let mut transform = standing(&world, &body);
        let mut contact = GroundContact::default();

        let mut collider = PlaneCollider::new(&world, &body, &mut transform, &mut contact);
        let result = collider.attempt_move(Vec3::new(0.0, -0.5, 0.0));

        assert!(result.obstructed);
        assert!(result.actual_displacement.length() < 1e-5);
        assert!(collider.is_ground_contact());
    }

    #[test]
    fn test_walking_on_floor_is_unobstructed() {
        let world = PlaneWorld::default();
        let body = BodyShape::default();
        let mut transform = standing(&world, &body);
        let mut contact = GroundContact::default();

        let mut collider = PlaneCollider::new(&world, &body, &mut transform, &mut contact);
        let result = collider.attempt_move(Vec3::new(0.3, 0.0, -0.2));

        assert!(!result.obstructed);
        assert_eq!(result.actual_displacement, Vec3::new(0.3, 0.0, -0.2));
        assert!(contact.grounded);
        assert!((transform.translation.x - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_wall_slide_keeps_tangent() {
        let world = PlaneWorld::arena(0.0, 2.0);
        let body = BodyShape::default();
        // Касаемся стены x = +2
        let mut transform = Transform::from_xyz(2.0 - body.radius, body.center_height(), 0.0);
        let mut contact = GroundContact::default();

        let mut collider = PlaneCollider::new(&world, &body, &mut transform, &mut contact);
        let result = collider.attempt_move(Vec3::new(0.5, 0.0, 0.5));

        assert!(result.obstructed);
        assert!(result.actual_displacement.x.abs() < 1e-5);
        assert!((result.actual_displacement.z - 0.5).abs() < 1e-5);
        assert!((transform.translation.x - (2.0 - body.radius)).abs() < 1e-5);
    }

    #[test]
    fn test_leaving_floor_drops_contact() {
        let world = PlaneWorld::default();
        let body = BodyShape::default();
        let mut transform = standing(&world, &body);
        let mut contact = GroundContact { grounded: true };

        let mut collider = PlaneCollider::new(&world, &body, &mut transform, &mut contact);
        let result = collider.attempt_move(Vec3::new(0.0, 0.2, 0.0));

        assert!(!result.obstructed);
        assert!(!contact.grounded);
    }

    #[test]
    fn test_steep_plane_is_not_ground() {
        let body = BodyShape::default();
        // 60° склон — стена, не пол
        let normal = Vec3::new(60.0_f32.to_radians().sin(), 60.0_f32.to_radians().cos(), 0.0);
        let world = PlaneWorld::empty().with_plane(CollisionPlane::new(normal, Vec3::ZERO));

        let plane = world.planes[0];
        assert!(!world.is_walkable(&plane));

        let touching = normal * (body.radius + body.half_height * normal.y);
        assert!(plane.separation(touching, &body).abs() < 1e-5);
        assert!(!world.ground_contact(touching, &body));
    }

    #[test]
    fn test_corner_pushes_out_of_both_walls() {
        let world = PlaneWorld::arena(0.0, 2.0);
        let body = BodyShape::default();

        let (center, pushed) = world.depenetrate(Vec3::new(2.5, body.center_height(), 2.5), &body);

        assert!(pushed);
        assert!((center.x - (2.0 - body.radius)).abs() < 1e-5);
        assert!((center.z - (2.0 - body.radius)).abs() < 1e-5);
    }
}
