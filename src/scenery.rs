//! The static backdrop: sky gradient, mountain silhouettes and the ground band.
//! Everything here is derived from the current bounds on every frame.

use crate::{
    config::{MountainRange, SceneryConfig},
    particle::Bounds,
    surface::{Fill, LinearGradient, Rect, Surface},
};

pub fn full_rect(bounds: &Bounds) -> Rect {
    Rect {
        x: 0.0,
        y: 0.0,
        width: bounds.width,
        height: bounds.height,
    }
}

pub fn paint_sky<S: Surface + ?Sized>(surface: &mut S, bounds: &Bounds, scenery: &SceneryConfig) {
    let gradient = LinearGradient::new([0.0, 0.0], [bounds.width, bounds.height])
        .with_stop(0.0, scenery.sky_top)
        .with_stop(1.0, scenery.sky_bottom);
    surface.fill_rect(full_rect(bounds), &Fill::Linear(gradient));
}

pub fn paint_mountains<S: Surface + ?Sized>(
    surface: &mut S,
    bounds: &Bounds,
    scenery: &SceneryConfig,
) {
    for range in &scenery.ranges {
        for outline in mountain_outlines(bounds, range) {
            surface.fill_polygon(&outline, range.color);
        }
    }
}

pub fn paint_ground<S: Surface + ?Sized>(surface: &mut S, bounds: &Bounds, scenery: &SceneryConfig) {
    let rect = Rect {
        x: 0.0,
        y: bounds.ground_line(),
        width: bounds.width,
        height: bounds.ground_height,
    };
    surface.fill_rect(rect, &Fill::Solid(scenery.ground));
}

/// One outline per peak. Each base overhangs its slot by a fifth of the
/// surface height on both sides so neighbouring peaks overlap.
pub fn mountain_outlines(bounds: &Bounds, range: &MountainRange) -> Vec<[[f32; 2]; 4]> {
    let floor = bounds.height;
    let overhang = 0.2 * bounds.height;
    let peak = floor - bounds.height * range.height_ratio;
    let slot = bounds.width / range.peaks as f32;

    (0..range.peaks)
        .map(|i| {
            let left = i as f32 * slot;
            [
                [left, floor],
                [left + slot + overhang, floor],
                [left + slot / 2.0, peak],
                [left - overhang, floor],
            ]
        })
        .collect()
}
