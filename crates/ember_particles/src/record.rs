//! # Particle Records
//!
//! Particle records are plain data. The pool never looks inside them; it
//! only needs their size (to pick a group size) and the guarantee that they
//! can be bitwise copied, zero-initialized, and shared across threads.

use bytemuck::{Pod, Zeroable};

/// Marker trait for values stored in a [`ParticlePool`](crate::ParticlePool).
///
/// Records must be:
/// - `Pod`: plain old data, bitwise copyable, valid when zeroed
/// - `Send + Sync`: groups are processed on worker threads
///
/// Implemented for every type that meets those bounds, so simulation code
/// can define its own record layout:
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Pod, Zeroable)]
/// #[repr(C)]
/// struct Spark {
///     position: [f32; 2],
///     heat: f32,
///     _padding: f32,
/// }
///
/// let pool: ParticlePool<Spark> = ParticlePool::new(jobs);
/// ```
pub trait ParticleRecord: Pod + Send + Sync {}

impl<T: Pod + Send + Sync> ParticleRecord for T {}

/// Default particle record, 64 bytes.
///
/// A particle is alive while `age < lifetime`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Particle {
    /// World-space position.
    pub position: [f32; 3],
    /// Seconds the particle lives for.
    pub lifetime: f32,
    /// World-space velocity, units per second.
    pub velocity: [f32; 3],
    /// Seconds since spawn.
    pub age: f32,
    /// Linear RGBA color.
    pub color: [f32; 4],
    /// Per-axis scale.
    pub scale: [f32; 3],
    /// Rotation around the view axis, radians.
    pub rotation: f32,
}

impl Particle {
    /// Creates a particle at rest at `position`.
    #[inline]
    #[must_use]
    pub const fn at(position: [f32; 3], lifetime: f32) -> Self {
        Self {
            position,
            lifetime,
            velocity: [0.0; 3],
            age: 0.0,
            color: [1.0; 4],
            scale: [1.0; 3],
            rotation: 0.0,
        }
    }

    /// Returns true while the particle has lifetime left.
    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.age < self.lifetime
    }

    /// Returns age as a fraction of lifetime, clamped to `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn normalized_age(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 1.0;
        }
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }
}
