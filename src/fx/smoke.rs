//! The smoke entity that roams the story scene
//!
//! The entity itself cycles dormant -> active (emerging in place) ->
//! traversing (crossing the frame on a wobbling path) -> dormant. While it is
//! awake it emits puffs into a trail; puffs fade at their own rate and are
//! pruned once invisible, so the trail drains after the entity leaves.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use super::ParticleSystem;
use crate::consts::*;
use crate::renderer::{Color, DrawList, Paint};

/// Re-appearance delay range (s)
const DELAY_MIN: f32 = 6.0;
const DELAY_MAX: f32 = 15.0;
/// Time spent emerging before it starts to move (s)
const EMERGE_SECS: f32 = 1.2;
const SPEED_MIN: f32 = 90.0;
const SPEED_MAX: f32 = 140.0;
const WOBBLE_AMPLITUDE: f32 = 40.0;
/// rad/s
const WOBBLE_RATE: f32 = 1.7;
const PUFFS_PER_SEC: f32 = 40.0;
const PUFF_DECAY_MIN: f32 = 0.35;
const PUFF_DECAY_MAX: f32 = 0.6;
const PUFF_START_ALPHA: f32 = 0.5;
/// Puff radius growth (px/s)
const PUFF_GROWTH: f32 = 18.0;
const BODY_RADIUS: f32 = 36.0;
/// Start/finish this far past the canvas edges
const OFFSCREEN_MARGIN: f32 = 60.0;

const SMOKE_COLOR: Color = Color::rgb(18, 18, 20);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmokeMode {
    /// Waiting `wait` more seconds before emerging
    Dormant { wait: f32 },
    /// Emerging at the entry point
    Active { age: f32 },
    Traversing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmokePuff {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alpha: f32,
    /// Alpha lost per second
    pub decay: f32,
}

#[derive(Debug, Clone)]
pub struct Smoke {
    mode: SmokeMode,
    pos: Vec2,
    /// Signed horizontal speed (px/s)
    speed: f32,
    base_y: f32,
    wobble_phase: f32,
    travel: f32,
    emit_carry: f32,
    puffs: Vec<SmokePuff>,
}

impl Default for Smoke {
    fn default() -> Self {
        Self {
            mode: SmokeMode::Dormant { wait: DELAY_MIN },
            pos: Vec2::ZERO,
            speed: 0.0,
            base_y: CANVAS_HEIGHT * 0.6,
            wobble_phase: 0.0,
            travel: 0.0,
            emit_carry: 0.0,
            puffs: Vec::new(),
        }
    }
}

impl Smoke {
    pub fn mode(&self) -> SmokeMode {
        self.mode
    }

    pub fn is_dormant(&self) -> bool {
        matches!(self.mode, SmokeMode::Dormant { .. })
    }

    pub fn puffs(&self) -> &[SmokePuff] {
        &self.puffs
    }

    /// Body opacity: ramps in while emerging, solid while traversing
    pub fn body_alpha(&self) -> f32 {
        match self.mode {
            SmokeMode::Dormant { .. } => 0.0,
            SmokeMode::Active { age } => (age / EMERGE_SECS).clamp(0.0, 1.0),
            SmokeMode::Traversing => 1.0,
        }
    }

    fn go_dormant(&mut self, rng: &mut Pcg32) {
        self.mode = SmokeMode::Dormant {
            wait: rng.random_range(DELAY_MIN..DELAY_MAX),
        };
        self.emit_carry = 0.0;
    }

    /// Pick an entry edge and path for the next appearance
    fn emerge(&mut self, rng: &mut Pcg32) {
        let from_left = rng.random::<bool>();
        let speed = rng.random_range(SPEED_MIN..SPEED_MAX);
        self.speed = if from_left { speed } else { -speed };
        self.base_y = CANVAS_HEIGHT * (0.45 + rng.random::<f32>() * 0.3);
        self.wobble_phase = rng.random::<f32>() * TAU;
        self.travel = 0.0;
        let x = if from_left {
            -OFFSCREEN_MARGIN * 0.5
        } else {
            CANVAS_WIDTH + OFFSCREEN_MARGIN * 0.5
        };
        self.pos = Vec2::new(x, self.wobble_y());
        self.mode = SmokeMode::Active { age: 0.0 };
    }

    fn wobble_y(&self) -> f32 {
        self.base_y + (self.travel * WOBBLE_RATE + self.wobble_phase).sin() * WOBBLE_AMPLITUDE
    }

    fn has_exited(&self) -> bool {
        if self.speed >= 0.0 {
            self.pos.x > CANVAS_WIDTH + OFFSCREEN_MARGIN
        } else {
            self.pos.x < -OFFSCREEN_MARGIN
        }
    }

    fn emit(&mut self, dt: f32, rng: &mut Pcg32) {
        self.emit_carry += dt * PUFFS_PER_SEC;
        while self.emit_carry >= 1.0 {
            self.emit_carry -= 1.0;
            let jitter = Vec2::new(
                rng.random_range(-10.0..10.0),
                rng.random_range(-10.0..10.0),
            );
            self.puffs.push(SmokePuff {
                pos: self.pos + jitter,
                vel: Vec2::new(-self.speed * 0.1, rng.random_range(-25.0..-5.0)),
                radius: rng.random_range(10.0..22.0),
                alpha: PUFF_START_ALPHA * self.body_alpha().max(0.2),
                decay: rng.random_range(PUFF_DECAY_MIN..PUFF_DECAY_MAX),
            });
        }
    }

    fn age_puffs(&mut self, dt: f32) {
        for puff in &mut self.puffs {
            puff.pos += puff.vel * dt;
            puff.radius += PUFF_GROWTH * dt;
            puff.alpha -= puff.decay * dt;
        }
        self.puffs.retain(|p| p.alpha > 0.0);
    }
}

impl ParticleSystem for Smoke {
    fn init(&mut self, rng: &mut Pcg32) {
        self.puffs.clear();
        self.go_dormant(rng);
    }

    fn update(&mut self, dt: f32, rng: &mut Pcg32) {
        self.age_puffs(dt);

        match self.mode {
            SmokeMode::Dormant { wait } => {
                let wait = wait - dt;
                if wait <= 0.0 {
                    self.emerge(rng);
                } else {
                    self.mode = SmokeMode::Dormant { wait };
                }
            }
            SmokeMode::Active { age } => {
                let age = age + dt;
                self.mode = if age >= EMERGE_SECS {
                    SmokeMode::Traversing
                } else {
                    SmokeMode::Active { age }
                };
                self.emit(dt, rng);
            }
            SmokeMode::Traversing => {
                self.travel += dt;
                self.pos.x += self.speed * dt;
                self.pos.y = self.wobble_y();
                self.emit(dt, rng);
                if self.has_exited() {
                    self.go_dormant(rng);
                }
            }
        }
    }

    fn render(&self, out: &mut DrawList, fade: f32) {
        if fade <= 0.0 {
            return;
        }
        for puff in &self.puffs {
            let alpha = puff.alpha * fade;
            out.circle(
                puff.pos,
                puff.radius,
                Paint::Radial {
                    center: puff.pos,
                    inner: 0.0,
                    outer: puff.radius,
                    stops: vec![
                        (0.0, SMOKE_COLOR.with_alpha(alpha)),
                        (1.0, SMOKE_COLOR.with_alpha(0.0)),
                    ],
                },
            );
        }

        let body = self.body_alpha() * fade;
        if body > 0.0 {
            out.circle(
                self.pos,
                BODY_RADIUS,
                Paint::Radial {
                    center: self.pos,
                    inner: BODY_RADIUS * 0.2,
                    outer: BODY_RADIUS,
                    stops: vec![
                        (0.0, SMOKE_COLOR.with_alpha(0.9 * body)),
                        (1.0, SMOKE_COLOR.with_alpha(0.0)),
                    ],
                },
            );
        }
    }

    fn len(&self) -> usize {
        self.puffs.len()
    }
}
