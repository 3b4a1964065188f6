use crate::particles::particle::{Particle, ParticleInit};

/// Default number of retired particles kept for reuse.
pub const DEFAULT_POOL_CAPACITY: usize = 200_000;

/// Pool counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Particles currently retained.
    pub retained: usize,
    /// Particles allocated because the pool was empty.
    pub created: u64,
    /// Particles handed out from the free list.
    pub reused: u64,
    /// Retirees discarded because the pool was full.
    pub dropped_on_recycle: u64,
}

/// Bounded free list of retired particles.
///
/// Acquire/recycle happen at generation granularity, never per frame.
#[derive(Debug)]
pub struct ParticlePool {
    capacity: usize,
    free: Vec<Particle>,
    next_id: u64,
    stats: PoolStats,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

impl ParticlePool {
    /// Pool retaining at most `capacity` particles.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            free: Vec::new(),
            next_id: 0,
            stats: PoolStats::default(),
        }
    }

    /// Maximum particles retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Particles currently retained.
    pub fn len(&self) -> usize {
        self.free.len()
    }

    /// Whether nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Counters since creation.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            retained: self.free.len(),
            ..self.stats
        }
    }

    /// Pop a retired particle and re-arm it, or allocate a new one.
    pub fn acquire_or_create(&mut self, init: ParticleInit, rng: &mut fastrand::Rng) -> Particle {
        match self.free.pop() {
            Some(mut p) => {
                self.stats.reused += 1;
                p.reset(init, rng);
                p
            }
            None => {
                self.stats.created += 1;
                let id = self.next_id;
                self.next_id += 1;
                Particle::new(id, init, rng)
            }
        }
    }

    /// Retire particles. Anything beyond capacity is dropped.
    pub fn recycle(&mut self, particles: impl IntoIterator<Item = Particle>) {
        for p in particles {
            if self.free.len() >= self.capacity {
                self.stats.dropped_on_recycle += 1;
                continue;
            }
            self.free.push(p);
        }
    }

    /// Drop every retained particle.
    pub fn clear(&mut self) {
        self.free.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/pool.rs"]
mod tests;
