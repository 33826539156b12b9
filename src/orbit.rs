//! Inertial drag-to-rotate
//!
//! Pointer drags feed velocity; `update` integrates it into pitch and yaw and
//! bleeds it off with a fixed friction factor.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

/// Tunables for `OrbitControl`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub speed: f64,
    /// Fraction of velocity lost per update
    pub friction: f64,
    pub initial_rot_x: f64,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            speed: 0.05,
            friction: 0.08,
            initial_rot_x: 0.3,
        }
    }
}

/// Drag state machine
#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    /// Pointer went down over the render surface and has not been released
    Dragging,
}

#[derive(Debug, Clone)]
pub struct OrbitControl {
    state: State,
    rot_x: f64,
    rot_y: f64,
    vel_x: f64,
    vel_y: f64,
    speed: f64,
    friction_factor: f64,
    last_pointer: (f64, f64),
}

impl Default for OrbitControl {
    fn default() -> Self {
        Self::new(&OrbitConfig::default())
    }
}

impl OrbitControl {
    pub fn new(config: &OrbitConfig) -> Self {
        Self {
            state: State::Idle,
            rot_x: config.initial_rot_x.clamp(-FRAC_PI_2, FRAC_PI_2),
            rot_y: 0.0,
            vel_x: 0.0,
            vel_y: 0.0,
            speed: config.speed,
            friction_factor: 1.0 - config.friction,
            last_pointer: (0.0, 0.0),
        }
    }

    #[inline]
    pub fn rot_x(&self) -> f64 {
        self.rot_x
    }

    #[inline]
    pub fn rot_y(&self) -> f64 {
        self.rot_y
    }

    #[inline]
    pub fn velocity(&self) -> (f64, f64) {
        (self.vel_x, self.vel_y)
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.state == State::Dragging
    }

    /// Starts a drag only when the press landed on the render surface
    pub fn pointer_down(&mut self, x: f64, y: f64, over_surface: bool) {
        self.last_pointer = (x, y);
        if over_surface {
            self.state = State::Dragging;
        }
    }

    /// Horizontal motion yaws, vertical motion pitches
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let (old_x, old_y) = self.last_pointer;
        self.last_pointer = (x, y);
        if self.state == State::Dragging {
            self.vel_y -= x - old_x;
            self.vel_x += y - old_y;
        }
    }

    pub fn pointer_up(&mut self) {
        self.state = State::Idle;
    }

    /// Integrate one step of `dt` seconds.
    /// Friction is applied once per call regardless of `dt`.
    pub fn update(&mut self, dt: f64) {
        self.rot_x += self.vel_x * self.speed * dt;
        self.rot_y += self.vel_y * self.speed * dt;
        self.vel_x *= self.friction_factor;
        self.vel_y *= self.friction_factor;

        // NaN from a bad dt would stick forever; drop it
        if !self.rot_x.is_finite() {
            self.rot_x = 0.0;
            self.vel_x = 0.0;
        }
        if !self.rot_y.is_finite() {
            self.rot_y = 0.0;
            self.vel_y = 0.0;
        }
        self.rot_x = self.rot_x.clamp(-FRAC_PI_2, FRAC_PI_2);
    }
}
