use crate::{
    color::Color,
    surface::{Circle, Shadow, Surface},
};

/// The area particles live in. The ground line is `height - ground_height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
    pub ground_height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32, ground_ratio: f32) -> Self {
        Self {
            width,
            height,
            ground_height: height * ground_ratio,
        }
    }

    pub fn ground_line(&self) -> f32 {
        self.height - self.ground_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleKind {
    /// Falls, bounces off the ground and both walls, and loses `shrink` radius per bounce.
    FallingStar { shrink: f32 },
    /// Bounces off the ground only and fades out over `ttl` ticks.
    Debris {
        ttl: u32,
        opacity: f32,
        fade: f32,
        body: Color,
    },
    /// Background decoration. Never moves.
    Ambient,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: Color,
    pub vx: f32,
    pub vy: f32,
    pub friction: f32,
    pub gravity: f32,
    pub glow: f32,
    pub kind: ParticleKind,
}

impl Particle {
    pub fn ambient(x: f32, y: f32, radius: f32, color: Color, glow: f32) -> Self {
        Self {
            x,
            y,
            radius,
            color,
            vx: 0.0,
            vy: 0.0,
            friction: 0.0,
            gravity: 0.0,
            glow,
            kind: ParticleKind::Ambient,
        }
    }

    pub fn is_expired(&self) -> bool {
        match self.kind {
            ParticleKind::FallingStar { .. } => self.radius <= 0.0,
            ParticleKind::Debris { ttl, .. } => ttl == 0,
            ParticleKind::Ambient => false,
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        let body = match self.kind {
            ParticleKind::Debris { opacity, body, .. } => body.with_alpha(opacity),
            _ => self.color,
        };
        surface.fill_circle(
            Circle {
                x: self.x,
                y: self.y,
                radius: self.radius.max(0.0),
            },
            body,
            Shadow {
                color: self.color,
                blur: self.glow,
            },
        );
    }

    /// Advances one tick and returns how many times a falling star shattered.
    ///
    /// Collisions are checked against the pre-move position, so any shatter
    /// happens where the particle was when the tick began.
    pub fn step(&mut self, bounds: &Bounds) -> usize {
        if let ParticleKind::Ambient = self.kind {
            return 0;
        }

        let mut shatters = 0;
        if self.y + self.radius + self.vy > bounds.ground_line() {
            self.vy = -self.vy * self.friction;
            shatters += self.shatter();
        } else {
            self.vy += self.gravity;
        }

        if let ParticleKind::FallingStar { .. } = self.kind {
            if self.x + self.radius + self.vx > bounds.width || self.x - self.radius <= 0.0 {
                self.vx = -self.vx * self.friction;
                shatters += self.shatter();
            }
        }

        self.x += self.vx;
        self.y += self.vy;

        if let ParticleKind::Debris {
            ttl, opacity, fade, ..
        } = &mut self.kind
        {
            *ttl = ttl.saturating_sub(1);
            *opacity -= *fade * *ttl as f32;
        }

        shatters
    }

    fn shatter(&mut self) -> usize {
        match self.kind {
            ParticleKind::FallingStar { shrink } => {
                self.radius = (self.radius - shrink).max(0.0);
                1
            }
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds {
            width: 800.0,
            height: 600.0,
            ground_height: 54.0,
        }
    }

    fn star(x: f32, y: f32, vx: f32, vy: f32) -> Particle {
        Particle {
            x,
            y,
            radius: 9.0,
            color: Color::rgb(255, 215, 0),
            vx,
            vy,
            friction: 0.8,
            gravity: 1.0,
            glow: 20.0,
            kind: ParticleKind::FallingStar { shrink: 3.0 },
        }
    }

    fn debris(y: f32, vy: f32, ttl: u32) -> Particle {
        Particle {
            x: 100.0,
            y,
            radius: 2.0,
            color: Color::rgb(0, 255, 255),
            vx: 1.0,
            vy,
            friction: 0.8,
            gravity: 0.1,
            glow: 30.0,
            kind: ParticleKind::Debris {
                ttl,
                opacity: 1.0,
                fade: 0.0001,
                body: Color::rgb(227, 234, 239),
            },
        }
    }

    #[test]
    fn ground_line_follows_ratio() {
        let bounds = Bounds::new(800.0, 600.0, 0.09);
        assert!((bounds.ground_line() - 546.0).abs() < 1e-3);
    }

    #[test]
    fn falling_star_accelerates_in_open_air() {
        let mut star = star(100.0, 100.0, 2.0, 3.0);
        assert_eq!(star.step(&bounds()), 0);
        assert_eq!(star.vy, 4.0);
        assert_eq!((star.x, star.y), (102.0, 104.0));
        assert_eq!(star.radius, 9.0);
    }

    #[test]
    fn ground_bounce_damps_and_shrinks() {
        // 535 + 9 + 3 = 547 crosses the 546 ground line.
        let mut star = star(100.0, 535.0, 2.0, 3.0);
        assert_eq!(star.step(&bounds()), 1);
        assert!((star.vy + 2.4).abs() < 1e-6);
        assert_eq!(star.radius, 6.0);
        assert!((star.y - 532.6).abs() < 1e-4);
        assert_eq!(star.vx, 2.0);
    }

    #[test]
    fn right_wall_bounce() {
        let mut star = star(790.0, 100.0, 2.0, 0.0);
        assert_eq!(star.step(&bounds()), 1);
        assert!((star.vx + 1.6).abs() < 1e-6);
        assert_eq!(star.radius, 6.0);
    }

    #[test]
    fn left_wall_bounce_ignores_velocity() {
        let mut star = star(9.0, 100.0, 3.0, 0.0);
        assert_eq!(star.step(&bounds()), 1);
        assert!((star.vx + 2.4).abs() < 1e-6);
    }

    #[test]
    fn corner_hit_shatters_twice_and_wall_sees_shrunk_radius() {
        // After the ground bounce the radius is 6, so 792 + 6 + 3 > 800 still trips the wall.
        let mut corner = star(792.0, 540.0, 3.0, 3.0);
        assert_eq!(corner.step(&bounds()), 2);
        assert_eq!(corner.radius, 3.0);

        // 790 + 9 + 3 would cross, but 790 + 6 + 3 stays inside after the ground bounce.
        let mut near_corner = star(790.0, 540.0, 3.0, 3.0);
        assert_eq!(near_corner.step(&bounds()), 1);
    }

    #[test]
    fn radius_never_goes_negative() {
        let mut star = star(100.0, 542.0, 0.0, 3.0);
        star.radius = 2.0;
        star.step(&bounds());
        assert_eq!(star.radius, 0.0);
        assert!(star.is_expired());
    }

    #[test]
    fn debris_ignores_walls() {
        let mut debris = debris(100.0, 0.0, 100);
        debris.x = 799.0;
        debris.vx = 5.0;
        assert_eq!(debris.step(&bounds()), 0);
        assert_eq!(debris.vx, 5.0);
        assert_eq!(debris.x, 804.0);
    }

    #[test]
    fn debris_bounces_off_ground_without_shrinking() {
        let mut debris = debris(540.0, 10.0, 100);
        assert_eq!(debris.step(&bounds()), 0);
        assert!((debris.vy + 8.0).abs() < 1e-6);
        assert_eq!(debris.radius, 2.0);
    }

    #[test]
    fn debris_fade_accelerates_with_remaining_ttl() {
        let mut debris = debris(100.0, 0.0, 100);
        debris.step(&bounds());
        let ParticleKind::Debris { ttl, opacity, .. } = debris.kind else {
            unreachable!()
        };
        assert_eq!(ttl, 99);
        assert!((opacity - (1.0 - 0.0099)).abs() < 1e-6);

        for _ in 0..99 {
            debris.step(&bounds());
        }
        let ParticleKind::Debris { ttl, opacity, .. } = debris.kind else {
            unreachable!()
        };
        assert_eq!(ttl, 0);
        // 1 - 0.0001 * (99 + 98 + ... + 0)
        assert!((opacity - 0.505).abs() < 1e-4);
        assert!(debris.is_expired());
    }

    #[test]
    fn ambient_never_moves_or_expires() {
        let mut star = Particle::ambient(10.0, 20.0, 1.5, Color::rgb(255, 255, 255), 20.0);
        let before = star.clone();
        assert_eq!(star.step(&bounds()), 0);
        assert_eq!(star, before);
        assert!(!star.is_expired());
    }

    #[test]
    fn debris_is_drawn_in_body_colour_with_glow() {
        let mut list = crate::surface::DrawList::new();
        let mut debris = debris(100.0, 0.0, 100);
        if let ParticleKind::Debris { opacity, .. } = &mut debris.kind {
            *opacity = 0.25;
        }
        debris.draw(&mut list);
        let (circle, body, shadow) = list.circles().next().unwrap();
        assert_eq!(circle.radius, 2.0);
        assert_eq!(*body, Color::rgb(227, 234, 239).with_alpha(0.25));
        assert_eq!(shadow.color, Color::rgb(0, 255, 255));
        assert_eq!(shadow.blur, 30.0);
    }
}
