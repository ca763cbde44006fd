//! Ambient particle systems
//!
//! Each system owns a pool that is recycled in place: elements leaving the
//! visible band are respawned, never removed, so rain and fog keep a constant
//! cardinality. All motion is scaled by the real frame delta.

pub mod fog;
pub mod rain;
pub mod smoke;

pub use fog::{FogBank, FogBlob};
pub use rain::{RainDrop, RainField};
pub use smoke::{Smoke, SmokeMode, SmokePuff};

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::renderer::DrawList;
use crate::sim::GamePhase;

/// A self-contained particle simulation
pub trait ParticleSystem {
    /// Fill (or refill) the pool with fresh random state
    fn init(&mut self, rng: &mut Pcg32);
    /// Advance by `dt` seconds
    fn update(&mut self, dt: f32, rng: &mut Pcg32);
    /// Draw with every alpha multiplied by `fade`
    fn render(&self, out: &mut DrawList, fade: f32);
    /// Live elements
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All ambient systems plus the RNG they draw from
#[derive(Debug, Clone)]
pub struct Weather {
    pub rain: RainField,
    pub fog: FogBank,
    pub smoke: Smoke,
    rng: Pcg32,
}

impl Weather {
    pub fn new(seed: u64) -> Self {
        let mut weather = Self {
            rain: RainField::default(),
            fog: FogBank::default(),
            smoke: Smoke::default(),
            rng: Pcg32::seed_from_u64(seed),
        };
        weather.reset();
        weather
    }

    /// Reinitialise every pool
    pub fn reset(&mut self) {
        self.rain.init(&mut self.rng);
        self.fog.init(&mut self.rng);
        self.smoke.init(&mut self.rng);
    }

    /// Tick the systems visible in `phase`
    pub fn update(&mut self, dt: f32, phase: GamePhase) {
        match phase {
            GamePhase::Intro => {
                self.rain.update(dt, &mut self.rng);
            }
            GamePhase::Scroll => {
                self.rain.update(dt, &mut self.rng);
                self.fog.update(dt, &mut self.rng);
            }
            GamePhase::Story => {
                self.fog.update(dt, &mut self.rng);
                self.smoke.update(dt, &mut self.rng);
            }
            _ => {}
        }
    }
}
