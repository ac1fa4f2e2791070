//! # Simulation Helpers
//!
//! Per-frame steps for pools of the default [`Particle`] record, each one a
//! single pool operation:
//!
//! ```text
//!   Emitter::emit     -> parallel_spawn   (initialize new slots)
//!   integrate         -> parallel_update  (age, gravity, motion)
//!   recycle_expired   -> event + recycle  (compact survivors into the prefix)
//!   live_bounds       -> render_all       (read-only reduction)
//! ```

use parking_lot::Mutex;

use crate::pool::ParticlePool;
use crate::record::Particle;

/// Golden angle in radians, spreads consecutive particles evenly.
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Spawns particles from a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Emitter {
    /// Spawn position.
    pub origin: [f32; 3],
    /// Base velocity of every particle.
    pub velocity: [f32; 3],
    /// Horizontal speed added around the base velocity.
    pub spread: f32,
    /// Lifetime of every particle, seconds.
    pub lifetime: f32,
    /// Initial color.
    pub color: [f32; 4],
    /// Uniform initial scale.
    pub scale: f32,
}

impl Default for Emitter {
    fn default() -> Self {
        Self {
            origin: [0.0; 3],
            velocity: [0.0, 1.0, 0.0],
            spread: 0.0,
            lifetime: 1.0,
            color: [1.0; 4],
            scale: 1.0,
        }
    }
}

/// Outcome of an [`Emitter::emit`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnReport {
    /// Pool index of the first new particle.
    pub begin: u32,
    /// Particles asked for.
    pub requested: u32,
    /// Particles actually spawned.
    pub spawned: u32,
}

impl SpawnReport {
    /// Returns true if the pool ran out of capacity.
    #[inline]
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.spawned < self.requested
    }
}

impl Emitter {
    /// Builds the particle spawned at pool index `index`.
    ///
    /// Deterministic: the spread direction depends only on the index.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn particle(&self, index: u32) -> Particle {
        let angle = index as f32 * GOLDEN_ANGLE;
        let (sin, cos) = angle.sin_cos();

        Particle {
            velocity: [
                self.velocity[0] + self.spread * cos,
                self.velocity[1],
                self.velocity[2] + self.spread * sin,
            ],
            color: self.color,
            scale: [self.scale; 3],
            ..Particle::at(self.origin, self.lifetime)
        }
    }

    /// Spawns up to `count` particles into `pool`.
    pub fn emit(&self, pool: &mut ParticlePool<Particle>, count: u32) -> SpawnReport {
        let begin = pool.parallel_spawn(count, |mut group, _, _, _| {
            for (index, particle) in group.iter_mut() {
                *particle = self.particle(index);
            }
        });

        SpawnReport {
            begin,
            requested: count,
            spawned: pool.alive() - begin,
        }
    }
}

/// Advances every live particle by `dt` seconds under `gravity`.
pub fn integrate(pool: &mut ParticlePool<Particle>, dt: f32, gravity: [f32; 3]) {
    pool.parallel_update(0, |mut group, _, _| {
        for particle in group.as_mut_slice() {
            particle.age += dt;
            let axes = particle.velocity.iter_mut().zip(particle.position.iter_mut());
            for ((velocity, position), g) in axes.zip(gravity) {
                *velocity += g * dt;
                *position += *velocity * dt;
            }
        }
    });
}

/// Removes particles whose lifetime ran out.
///
/// Survivors are moved, in order, to the front of the live range and the
/// tail is recycled. Returns the new alive count.
#[allow(clippy::cast_possible_truncation)]
pub fn recycle_expired(pool: &mut ParticlePool<Particle>) -> u32 {
    let alive = pool.event(0, |storage, begin, alive| {
        let live = &mut storage[begin as usize..alive as usize];
        let mut write = 0;
        for read in 0..live.len() {
            if live[read].is_alive() {
                live[write] = live[read];
                write += 1;
            }
        }
        // `write` never exceeds the u32 live range.
        begin + write as u32
    });

    pool.recycle(alive);
    alive
}

/// Axis-aligned bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Minimum corner.
    pub min: [f32; 3],
    /// Maximum corner.
    pub max: [f32; 3],
}

impl Bounds {
    /// Bounds of a single point.
    #[must_use]
    pub const fn point(p: [f32; 3]) -> Self {
        Self { min: p, max: p }
    }

    /// Grows the bounds to include `p`.
    pub fn include(&mut self, p: [f32; 3]) {
        let corners = self.min.iter_mut().zip(self.max.iter_mut());
        for ((lo, hi), value) in corners.zip(p) {
            *lo = lo.min(value);
            *hi = hi.max(value);
        }
    }

    /// Smallest bounds containing both.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.include(other.min);
        self.include(other.max);
        self
    }

    /// Returns true if `p` lies inside or on the bounds.
    #[must_use]
    pub fn contains(&self, p: [f32; 3]) -> bool {
        (0..3).all(|axis| self.min[axis] <= p[axis] && p[axis] <= self.max[axis])
    }
}

/// Bounds of every live particle position, `None` for an empty pool.
#[must_use]
pub fn live_bounds(pool: &ParticlePool<Particle>) -> Option<Bounds> {
    let total: Mutex<Option<Bounds>> = Mutex::new(None);

    pool.render_all(|storage, start, end| {
        let mut positions = storage[start as usize..end as usize].iter().map(|p| p.position);
        let Some(first) = positions.next() else {
            return;
        };

        let mut local = Bounds::point(first);
        for p in positions {
            local.include(p);
        }

        let mut total = total.lock();
        *total = Some(match *total {
            Some(bounds) => bounds.merge(local),
            None => local,
        });
    });

    total.into_inner()
}
