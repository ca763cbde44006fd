//! Rain streaks over the surface scenes

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::ParticleSystem;
use crate::consts::*;
use crate::renderer::{Color, DrawCmd, DrawList};

/// Horizontal spawn band extends this far past both canvas edges
const SPAWN_MARGIN: f32 = 50.0;
/// Streak lean (px of x per streak)
const STREAK_SLANT: f32 = 3.0;
const RAIN_COLOR: Color = Color::rgb(180, 200, 220);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainDrop {
    pub pos: Vec2,
    /// Fall speed (px/s)
    pub speed: f32,
    pub length: f32,
    /// Sideways wind (px/s, negative is leftward)
    pub drift: f32,
}

impl RainDrop {
    /// A fresh drop; `anywhere` scatters it over the canvas instead of above it
    fn spawn(rng: &mut Pcg32, anywhere: bool) -> Self {
        let x = rng.random::<f32>() * (CANVAS_WIDTH + SPAWN_MARGIN * 2.0) - SPAWN_MARGIN;
        let y = if anywhere {
            rng.random::<f32>() * CANVAS_HEIGHT
        } else {
            -RAIN_LENGTH_MAX
        };
        Self {
            pos: Vec2::new(x, y),
            speed: rng.random_range(RAIN_SPEED_MIN..RAIN_SPEED_MAX),
            length: rng.random_range(RAIN_LENGTH_MIN..RAIN_LENGTH_MAX),
            drift: -30.0 - rng.random::<f32>() * 20.0,
        }
    }

    fn is_offscreen(&self) -> bool {
        self.pos.y > CANVAS_HEIGHT + self.length || self.pos.x < -SPAWN_MARGIN
    }
}

#[derive(Debug, Clone, Default)]
pub struct RainField {
    drops: Vec<RainDrop>,
}

impl RainField {
    pub fn drops(&self) -> &[RainDrop] {
        &self.drops
    }
}

impl ParticleSystem for RainField {
    fn init(&mut self, rng: &mut Pcg32) {
        self.drops.clear();
        self.drops
            .extend((0..RAIN_DROP_COUNT).map(|_| RainDrop::spawn(rng, true)));
    }

    fn update(&mut self, dt: f32, rng: &mut Pcg32) {
        for drop in &mut self.drops {
            drop.pos.y += drop.speed * dt;
            drop.pos.x += drop.drift * dt;
            if drop.is_offscreen() {
                *drop = RainDrop::spawn(rng, false);
            }
        }
    }

    fn render(&self, out: &mut DrawList, fade: f32) {
        if self.drops.is_empty() || fade <= 0.0 {
            return;
        }
        let color = RAIN_COLOR.with_alpha(RAIN_OPACITY * fade);
        out.save();
        for drop in &self.drops {
            out.push(DrawCmd::Polyline {
                points: vec![
                    drop.pos,
                    drop.pos + Vec2::new(-STREAK_SLANT, drop.length),
                ],
                color,
                width: 1.0,
                round_caps: true,
            });
        }
        out.restore();
    }

    fn len(&self) -> usize {
        self.drops.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_init_fills_pool_on_canvas() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut rain = RainField::default();
        rain.init(&mut rng);
        assert_eq!(rain.len(), RAIN_DROP_COUNT);
        for drop in rain.drops() {
            assert!(drop.pos.y >= 0.0 && drop.pos.y <= CANVAS_HEIGHT);
            assert!(drop.speed >= RAIN_SPEED_MIN && drop.speed < RAIN_SPEED_MAX);
        }
    }

    #[test]
    fn test_drops_recycle_from_top() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut rain = RainField::default();
        rain.init(&mut rng);
        // Two seconds pushes every drop past the bottom edge at least once
        rain.update(2.0, &mut rng);
        for drop in rain.drops() {
            assert_eq!(drop.pos.y, -RAIN_LENGTH_MAX);
        }
    }

    #[test]
    fn test_render_fades() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut rain = RainField::default();
        rain.init(&mut rng);

        let mut out = DrawList::new();
        rain.render(&mut out, 0.0);
        assert!(out.is_empty());

        rain.render(&mut out, 0.5);
        assert_eq!(out.len(), RAIN_DROP_COUNT + 2);
        assert!(out.is_balanced());
        let alpha = out.cmds().iter().find_map(|c| match c {
            DrawCmd::Polyline { color, .. } => Some(color.a),
            _ => None,
        });
        assert_eq!(alpha, Some(RAIN_OPACITY * 0.5));
    }

    proptest! {
        #[test]
        fn prop_pool_size_constant(
            seed in any::<u64>(),
            steps in proptest::collection::vec(0.0f32..0.5, 1..60),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut rain = RainField::default();
            rain.init(&mut rng);
            for dt in steps {
                rain.update(dt, &mut rng);
                prop_assert_eq!(rain.len(), RAIN_DROP_COUNT);
            }
        }
    }
}
