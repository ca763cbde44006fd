//! Low drifting fog banks

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use super::ParticleSystem;
use crate::consts::*;
use crate::renderer::{Color, DrawList, Paint};

const FOG_COLOR: Color = Color::rgb(200, 205, 210);
const RADIUS_MIN: f32 = 80.0;
const RADIUS_MAX: f32 = 180.0;
const SPEED_MIN: f32 = 8.0;
const SPEED_MAX: f32 = 25.0;
const OPACITY_MIN: f32 = 0.04;
const OPACITY_MAX: f32 = 0.10;
/// Breathing rate range (rad/s)
const BREATH_MIN: f32 = 0.3;
const BREATH_MAX: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogBlob {
    pub pos: Vec2,
    pub radius: f32,
    /// Horizontal drift (px/s)
    pub vx: f32,
    pub opacity: f32,
    pub breath_rate: f32,
    pub breath_phase: f32,
}

impl FogBlob {
    /// A fresh blob; `anywhere` scatters it across the canvas instead of just left of it
    fn spawn(rng: &mut Pcg32, anywhere: bool) -> Self {
        let radius = rng.random_range(RADIUS_MIN..RADIUS_MAX);
        let x = if anywhere {
            rng.random::<f32>() * CANVAS_WIDTH
        } else {
            -radius
        };
        // Hug the lower half of the frame
        let y = CANVAS_HEIGHT * 0.45 + rng.random::<f32>() * CANVAS_HEIGHT * 0.6;
        Self {
            pos: Vec2::new(x, y),
            radius,
            vx: rng.random_range(SPEED_MIN..SPEED_MAX),
            opacity: rng.random_range(OPACITY_MIN..OPACITY_MAX),
            breath_rate: rng.random_range(BREATH_MIN..BREATH_MAX),
            breath_phase: rng.random::<f32>() * TAU,
        }
    }

    /// Opacity after the breathing term, before any fade
    pub fn breathing_alpha(&self, elapsed: f32) -> f32 {
        self.opacity * (0.75 + 0.25 * (elapsed * self.breath_rate + self.breath_phase).sin())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FogBank {
    blobs: Vec<FogBlob>,
    /// Seconds since init; drives the breathing
    elapsed: f32,
}

impl FogBank {
    pub fn blobs(&self) -> &[FogBlob] {
        &self.blobs
    }
}

impl ParticleSystem for FogBank {
    fn init(&mut self, rng: &mut Pcg32) {
        self.elapsed = 0.0;
        self.blobs.clear();
        self.blobs
            .extend((0..FOG_BLOB_COUNT).map(|_| FogBlob::spawn(rng, true)));
    }

    fn update(&mut self, dt: f32, rng: &mut Pcg32) {
        self.elapsed += dt;
        for blob in &mut self.blobs {
            blob.pos.x += blob.vx * dt;
            if blob.pos.x - blob.radius > CANVAS_WIDTH {
                *blob = FogBlob::spawn(rng, false);
            }
        }
    }

    fn render(&self, out: &mut DrawList, fade: f32) {
        if fade <= 0.0 {
            return;
        }
        for blob in &self.blobs {
            let alpha = blob.breathing_alpha(self.elapsed) * fade;
            out.circle(
                blob.pos,
                blob.radius,
                Paint::Radial {
                    center: blob.pos,
                    inner: 0.0,
                    outer: blob.radius,
                    stops: vec![
                        (0.0, FOG_COLOR.with_alpha(alpha)),
                        (1.0, FOG_COLOR.with_alpha(0.0)),
                    ],
                },
            );
        }
    }

    fn len(&self) -> usize {
        self.blobs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_breathing_stays_in_band() {
        let mut rng = Pcg32::seed_from_u64(5);
        let blob = FogBlob::spawn(&mut rng, true);
        for i in 0..200 {
            let a = blob.breathing_alpha(i as f32 * 0.1);
            assert!(a >= blob.opacity * 0.5 - 1e-6);
            assert!(a <= blob.opacity + 1e-6);
        }
    }

    #[test]
    fn test_blobs_wrap_to_left_edge() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut fog = FogBank::default();
        fog.init(&mut rng);
        // Slowest blob crosses the whole canvas in at most (800 + 180) / 8 seconds
        for _ in 0..1300 {
            fog.update(0.1, &mut rng);
        }
        assert_eq!(fog.len(), FOG_BLOB_COUNT);
        for blob in fog.blobs() {
            assert!(blob.pos.x - blob.radius <= CANVAS_WIDTH);
        }
    }

    #[test]
    fn test_render_one_circle_per_blob() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut fog = FogBank::default();
        fog.init(&mut rng);
        let mut out = DrawList::new();
        fog.render(&mut out, 1.0);
        assert_eq!(out.len(), FOG_BLOB_COUNT);
    }

    proptest! {
        #[test]
        fn prop_pool_size_constant(
            seed in any::<u64>(),
            steps in proptest::collection::vec(0.0f32..2.0, 1..80),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut fog = FogBank::default();
            fog.init(&mut rng);
            for dt in steps {
                fog.update(dt, &mut rng);
                prop_assert_eq!(fog.len(), FOG_BLOB_COUNT);
            }
        }
    }
}
