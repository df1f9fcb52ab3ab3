//! Vertex data structures for voxel meshes.
//!
//! This module defines the vertex format produced by the mesher and the helper used to
//! hand mesh data to a graphics API.

use cgmath::Point3;

use crate::engine_state::voxels::block::TextureCell;

/// A vertex of a chunk mesh.
///
/// Meshes are non-indexed triangle lists, six vertices per visible face. Positions are
/// chunk-local; the renderer translates them by the chunk origin.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
///
/// Total size: 20 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Position in chunk-local space
    pub position: [f32; 3],
    /// Texture atlas cell `(u, v)` of the block face this vertex belongs to
    pub tex_coords: [f32; 2],
}

impl MeshVertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `position` - The corner position in chunk-local space
    /// * `cell` - The atlas cell of the face
    ///
    /// # Returns
    /// A new `MeshVertex` instance
    pub fn new(position: Point3<i32>, cell: TextureCell) -> Self {
        MeshVertex {
            position: [position.x as f32, position.y as f32, position.z as f32],
            tex_coords: [cell[0] as f32, cell[1] as f32],
        }
    }
}

/// Views a vertex slice as raw bytes, ready for a vertex buffer upload.
pub fn vertex_bytes(vertices: &[MeshVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_five_packed_floats() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 20);
    }

    #[test]
    fn bytes_follow_field_order() {
        let vertices = [MeshVertex::new(Point3::new(1, 2, 3), [4, 5])];
        let bytes = vertex_bytes(&vertices);
        assert_eq!(bytes.len(), 20);

        let floats: &[f32] = bytemuck::cast_slice(bytes);
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0, 5.0]);
    }
}
