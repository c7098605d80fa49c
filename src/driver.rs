use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::SceneConfig;
use crate::error::ConfigError;
use crate::particle::ParticleStore;
use crate::spatial_grid::SpatialGrid;
use crate::surface::Surface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
    Stopped,
}

/// What a frame callback tells its scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Counters for the most recent frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStats {
    pub frame: u64,
    pub particles: usize,
    /// Distance checks made against grid neighbors, self excluded.
    pub candidates: usize,
    pub connections: usize,
}

/// Linear falloff: `base` at distance 0, 0 at `threshold` and beyond.
pub fn line_opacity(distance: f64, threshold: f64, base: f64) -> f64 {
    (base * (1.0 - distance / threshold)).clamp(0.0, base)
}

pub struct FrameDriver {
    config: SceneConfig,
    store: ParticleStore,
    grid: SpatialGrid,
    neighbors: Vec<usize>,
    width: f64,
    height: f64,
    state: DriverState,
    stats: FrameStats,
}

impl FrameDriver {
    pub fn new<R: Rng>(
        config: SceneConfig,
        width: f64,
        height: f64,
        rng: &mut R,
    ) -> Result<FrameDriver, ConfigError> {
        config.validate()?;
        let store = ParticleStore::create(
            config.particle_count,
            width,
            height,
            config.max_speed,
            config.max_radius,
            rng,
        );
        Ok(FrameDriver::with_store(config, store, width, height))
    }

    pub fn seeded(config: SceneConfig, width: f64, height: f64, seed: u64) -> Result<FrameDriver, ConfigError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        FrameDriver::new(config, width, height, &mut rng)
    }

    /// Drive a hand-built population. The config is trusted as given.
    pub fn with_store(config: SceneConfig, store: ParticleStore, width: f64, height: f64) -> FrameDriver {
        let grid = SpatialGrid::new(config.cell_size);
        FrameDriver {
            config,
            store,
            grid,
            neighbors: Vec::new(),
            width,
            height,
            state: DriverState::Idle,
            stats: FrameStats::default(),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn viewport(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// New bounds take effect on the next frame; particles are not moved.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn stop(&mut self) {
        if self.state != DriverState::Stopped {
            log::debug!("frame driver stopped after {} frames", self.stats.frame);
        }
        self.state = DriverState::Stopped;
    }

    pub fn tick<S: Surface>(&mut self, surface: &mut S) -> LoopControl {
        match self.state {
            DriverState::Stopped => return LoopControl::Stop,
            DriverState::Idle => {
                log::debug!(
                    "frame driver running: {} particles in {}x{}",
                    self.store.len(),
                    self.width,
                    self.height
                );
                self.state = DriverState::Running;
            }
            DriverState::Running => {}
        }

        let FrameDriver {
            config,
            store,
            grid,
            neighbors,
            width,
            height,
            stats,
            ..
        } = self;

        surface.clear(*width, *height);
        store.advance(*width, *height);
        grid.rebuild(store.particles());

        let threshold = config.connection_distance;
        let mut candidates = 0;
        let mut connections = 0;

        let particles = store.particles();
        for (i, p) in particles.iter().enumerate() {
            p.render(surface, &config.particle_color);

            grid.query_into(p, neighbors);
            for &j in neighbors.iter() {
                if j == i || (config.draw_pairs_once && j < i) {
                    continue;
                }
                candidates += 1;

                let other = &particles[j];
                let distance = p.distance_to(other);
                if distance < threshold {
                    let alpha = line_opacity(distance, threshold, config.line_opacity);
                    surface.stroke_line(
                        (p.x, p.y),
                        (other.x, other.y),
                        &config.line_color.with_alpha(alpha),
                        config.line_width,
                    );
                    connections += 1;
                }
            }
        }

        *stats = FrameStats {
            frame: stats.frame + 1,
            particles: particles.len(),
            candidates,
            connections,
        };
        LoopControl::Continue
    }
}

/// A driver bound to the surface it draws on.
pub struct Scene<S: Surface> {
    pub driver: FrameDriver,
    pub surface: S,
}

impl<S: Surface> Scene<S> {
    pub fn new(driver: FrameDriver, mut surface: S) -> Scene<S> {
        let (width, height) = driver.viewport();
        surface.resize(width, height);
        Scene { driver, surface }
    }

    pub fn frame(&mut self) -> LoopControl {
        self.driver.tick(&mut self.surface)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.surface.resize(width, height);
        self.driver.set_viewport(width, height);
    }
}
