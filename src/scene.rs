use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::{
    config::SkyConfig,
    particle::{Bounds, Particle, ParticleKind},
    scenery,
    surface::{FrameScheduler, Surface},
};

/// Simulation state for the whole animation.
///
/// `tick` is the frame callback: it paints the backdrop, advances every star
/// and fragment once, recycles the expired ones and schedules the next frame.
pub struct Sky {
    config: SkyConfig,
    bounds: Bounds,
    ticker: u64,
    spawn_interval: u64,
    stars: Vec<Particle>,
    debris: Vec<Particle>,
    ambient: Vec<Particle>,
    rng: StdRng,
}

impl Sky {
    pub fn new(config: SkyConfig, width: f32, height: f32) -> Self {
        Self::with_rng(config, width, height, StdRng::from_entropy())
    }

    pub fn with_rng(config: SkyConfig, width: f32, height: f32, rng: StdRng) -> Self {
        let bounds = Bounds::new(width, height, config.scenery.ground_ratio);
        let mut sky = Self {
            spawn_interval: config.spawn.initial_interval,
            config,
            bounds,
            ticker: 0,
            stars: Vec::new(),
            debris: Vec::new(),
            ambient: Vec::new(),
            rng,
        };
        sky.init();
        sky
    }

    /// Drops every moving particle and scatters a fresh set of ambient stars.
    pub fn init(&mut self) {
        self.stars.clear();
        self.debris.clear();

        let ambient = &self.config.ambient;
        let Bounds { width, height, .. } = self.bounds;
        let rng = &mut self.rng;
        self.ambient = (0..ambient.count)
            .map(|_| {
                let x = rng.gen::<f32>() * width;
                let y = rng.gen::<f32>() * height;
                let radius = rng.gen::<f32>() * ambient.max_radius;
                Particle::ambient(x, y, radius, ambient.palette.pick(rng), ambient.glow)
            })
            .collect();
        info!(width, height, ambient = self.ambient.len(), "Sky initialised");
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.bounds = Bounds::new(width, height, self.config.scenery.ground_ratio);
        self.init();
    }

    pub fn tick<S, F>(&mut self, surface: &mut S, scheduler: &F)
    where
        S: Surface + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        let backdrop = &self.config.scenery;
        surface.clear(scenery::full_rect(&self.bounds));
        scenery::paint_sky(surface, &self.bounds, backdrop);
        for star in &self.ambient {
            star.draw(surface);
        }
        scenery::paint_mountains(surface, &self.bounds, backdrop);
        scenery::paint_ground(surface, &self.bounds, backdrop);

        self.advance_stars(surface);
        self.advance_debris(surface);
        self.advance_spawner();

        scheduler.request_frame();
    }

    fn advance_stars<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let Self {
            config,
            bounds,
            stars,
            debris,
            rng,
            ..
        } = self;
        stars.retain_mut(|star| {
            star.draw(surface);
            let (x, y) = (star.x, star.y);
            let shatters = star.step(bounds);
            for _ in 0..shatters {
                trace!(x, y, radius = star.radius, "Star shattered");
                debris.extend((0..config.star.fragments).map(|_| fragment(config, x, y, rng)));
            }
            !star.is_expired()
        });
    }

    fn advance_debris<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let bounds = &self.bounds;
        self.debris.retain_mut(|fragment| {
            fragment.draw(surface);
            fragment.step(bounds);
            !fragment.is_expired()
        });
    }

    fn advance_spawner(&mut self) {
        self.ticker += 1;
        if self.ticker % self.spawn_interval.max(1) == 0 {
            self.spawn_star();
            self.spawn_interval = self
                .rng
                .gen_range(self.config.spawn.min_interval..=self.config.spawn.max_interval);
            debug!(
                ticker = self.ticker,
                next_interval = self.spawn_interval,
                "Spawned falling star"
            );
        }
    }

    /// Drops a new star above the top edge at a random column.
    pub fn spawn_star(&mut self) {
        let star = &self.config.star;
        let radius = star.radius;
        let x = radius.max(self.rng.gen::<f32>() * self.bounds.width - radius);
        let vx = (self.rng.gen::<f32>() - 0.5) * star.horizontal_spread;
        self.stars.push(Particle {
            x,
            y: star.spawn_height,
            radius,
            color: star.palette.pick(&mut self.rng),
            vx,
            vy: star.fall_speed,
            friction: star.friction,
            gravity: star.gravity,
            glow: star.glow,
            kind: ParticleKind::FallingStar {
                shrink: star.shrink,
            },
        });
    }

    pub fn stars(&self) -> &[Particle] {
        &self.stars
    }

    pub fn debris(&self) -> &[Particle] {
        &self.debris
    }

    pub fn ambient(&self) -> &[Particle] {
        &self.ambient
    }
}

fn fragment(config: &SkyConfig, x: f32, y: f32, rng: &mut StdRng) -> Particle {
    let debris = &config.debris;
    Particle {
        x,
        y,
        radius: debris.radius,
        color: debris.palette.pick(rng),
        vx: (rng.gen::<f32>() - 0.5) * debris.horizontal_spread,
        vy: (rng.gen::<f32>() - 0.5) * debris.vertical_spread,
        friction: debris.friction,
        gravity: debris.gravity,
        glow: debris.glow,
        kind: ParticleKind::Debris {
            ttl: debris.ttl,
            opacity: 1.0,
            fade: debris.fade,
            body: debris.body,
        },
    }
}
