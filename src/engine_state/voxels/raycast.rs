//! # Raycast Module
//!
//! Block picking along a view ray. The ray is sampled at fixed steps and the first solid
//! block it enters is reported, together with the cell a new block would be placed in.

use cgmath::{InnerSpace, Point3, Vector3, Zero};

use super::{
    block::{block_face::BlockFace, Voxel},
    chunk::geometry::ChunkGeometry,
    world::World,
};

/// Distance between two samples along the ray.
pub const RAYCAST_STEP: f32 = 0.1;

/// The reach of a player's hand, in blocks.
pub const DEFAULT_REACH: f32 = 5.0;

/// The first solid block along a ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RaycastHit {
    /// The block that was hit.
    pub voxel: Voxel,
    /// The sample point that landed inside the block.
    pub hit_point: Point3<f32>,
}

impl RaycastHit {
    /// The face of the hit block the ray entered through.
    ///
    /// Picks the axis along which the hit point lies furthest from the block centre.
    pub fn hit_face(&self) -> BlockFace {
        let position = self.voxel.position;
        let offset = self.hit_point
            - Point3::new(
                position.x as f32 + 0.5,
                position.y as f32 + 0.5,
                position.z as f32 + 0.5,
            );

        if offset.x.abs() >= offset.y.abs() && offset.x.abs() >= offset.z.abs() {
            if offset.x >= 0.0 {
                BlockFace::East
            } else {
                BlockFace::West
            }
        } else if offset.y.abs() >= offset.z.abs() {
            if offset.y >= 0.0 {
                BlockFace::Top
            } else {
                BlockFace::Bottom
            }
        } else if offset.z >= 0.0 {
            BlockFace::South
        } else {
            BlockFace::North
        }
    }

    /// The cell in front of the hit face, where a placed block would go.
    ///
    /// `None` when that cell would lie past the edge of the `i32` world.
    pub fn placement_position(&self) -> Option<Point3<i32>> {
        let position = self.voxel.position;
        let offset = self.hit_face().offset();
        Some(Point3::new(
            position.x.checked_add(offset.x)?,
            position.y.checked_add(offset.y)?,
            position.z.checked_add(offset.z)?,
        ))
    }
}

/// The unit view direction for a yaw and pitch in degrees.
///
/// Yaw `0` looks down negative Z; positive pitch looks up.
pub fn look_direction(yaw_degrees: f32, pitch_degrees: f32) -> Vector3<f32> {
    let yaw = yaw_degrees.to_radians();
    let pitch = pitch_degrees.to_radians();
    Vector3::new(
        -yaw.sin() * pitch.cos(),
        pitch.sin(),
        -yaw.cos() * pitch.cos(),
    )
    .normalize()
}

impl<G: ChunkGeometry> World<G> {
    /// Walks a ray and returns the first solid block within `reach`.
    ///
    /// # Arguments
    ///
    /// * `origin` - Start of the ray in world space
    /// * `direction` - Direction of the ray; need not be normalized
    /// * `reach` - Maximum distance travelled
    ///
    /// # Returns
    ///
    /// `None` if nothing solid is hit, or if `direction` is zero. Chunks along the ray
    /// are created as needed.
    pub fn raycast(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        reach: f32,
    ) -> Option<RaycastHit> {
        if direction.is_zero() || !reach.is_finite() || reach <= 0.0 {
            return None;
        }
        let direction = direction.normalize();

        let steps = (reach / RAYCAST_STEP).ceil() as u32;
        (0..steps)
            .map(|step| origin + direction * (step as f32 * RAYCAST_STEP))
            .find_map(|point| {
                let cell = Point3::new(
                    point.x.floor() as i32,
                    point.y.floor() as i32,
                    point.z.floor() as i32,
                );
                self.get_block(cell)
                    .filter(Voxel::is_solid)
                    .map(|voxel| RaycastHit {
                        voxel,
                        hit_point: point,
                    })
            })
    }
}
