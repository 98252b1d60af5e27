//! Standard components shared by the built-in systems

use crate::ecs::Component;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: [f32; 2],
    pub rotation: f32,
    pub scale: f32,
}

impl Transform {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: [x, y],
            ..Self::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0],
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

impl Component for Transform {}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub linear: [f32; 2],
    pub angular: f32,
}

impl Velocity {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self {
            linear: [dx, dy],
            angular: 0.0,
        }
    }
}

impl Component for Velocity {}

/// Remaining lifetime in seconds. The entity is removed once it drops to zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Expires {
    pub remaining: f32,
}

impl Expires {
    pub fn after(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

impl Component for Expires {}

/// Inclusive `[min, max]` range sampled by spawners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min >= 0.0 && self.min <= self.max && self.max.is_finite()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Spawner {
    /// Seconds between bursts.
    pub interval: f32,
    pub burst: u32,
    pub lifetime: Range,
    pub speed: Range,
    pub elapsed: f32,
}

impl Spawner {
    pub fn new(interval: f32, burst: u32, lifetime: Range, speed: Range) -> Self {
        Self {
            interval,
            burst,
            lifetime,
            speed,
            elapsed: 0.0,
        }
    }

    /// Advance the internal timer and return how many bursts are due.
    ///
    /// Non-finite or non-positive steps and intervals never produce bursts.
    pub fn tick(&mut self, dt: f32) -> u32 {
        let usable = |value: f32| value.is_finite() && value > 0.0;
        if !usable(self.interval) || !usable(dt) {
            return 0;
        }
        self.elapsed += dt;
        let due = (self.elapsed / self.interval).floor();
        self.elapsed %= self.interval;
        // Float to int casts saturate, so an absurd backlog clamps to u32::MAX.
        due as u32
    }
}

impl Component for Spawner {}
