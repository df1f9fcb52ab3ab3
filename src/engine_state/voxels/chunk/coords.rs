//! # Chunk Coordinate Mapping
//!
//! Pure functions mapping a world-space axis coordinate to the chunk that owns it and
//! the offset inside that chunk, and back.
//!
//! Edge lengths are powers of two, so the chunk coordinate is an arithmetic right
//! shift and the local coordinate is a mask. On two's-complement integers the shift
//! is floor division, which keeps negative coordinates in the correct chunk:
//! world `-1` lives in chunk `-1` at local `15`, not in chunk `0`.

/// Number of bits to shift a world coordinate by for the given edge length.
#[inline]
pub fn edge_shift(edge: i32) -> u32 {
    debug_assert!(edge > 0 && edge & (edge - 1) == 0, "edge must be a power of two");
    edge.trailing_zeros()
}

/// The chunk coordinate owning world coordinate `world` (floor division by `edge`).
#[inline]
pub fn chunk_coord(world: i32, edge: i32) -> i32 {
    world >> edge_shift(edge)
}

/// The offset of `world` inside its chunk, always in `[0, edge)`.
#[inline]
pub fn local_coord(world: i32, edge: i32) -> i32 {
    world & (edge - 1)
}

/// Splits a world coordinate into `(chunk, local)`.
#[inline]
pub fn split(world: i32, edge: i32) -> (i32, i32) {
    (chunk_coord(world, edge), local_coord(world, edge))
}

/// Recombines a chunk coordinate and a local offset into a world coordinate.
#[inline]
pub fn world_coord(chunk: i32, local: i32, edge: i32) -> i32 {
    chunk * edge + local
}

/// Steps a chunk coordinate by `delta`, or `None` when the result would own no
/// representable world coordinate.
#[inline]
pub fn step_chunk(chunk: i32, delta: i32, edge: i32) -> Option<i32> {
    let bounds = chunk_coord(i32::MIN, edge)..=chunk_coord(i32::MAX, edge);
    chunk.checked_add(delta).filter(|stepped| bounds.contains(stepped))
}
