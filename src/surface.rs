use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Soft halo painted under a shape, like a canvas `shadowBlur`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Color,
}

/// Gradient along the line `start -> end`, clamped to the end stops outside it.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: [f32; 2],
    pub end: [f32; 2],
    stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(start: [f32; 2], end: [f32; 2]) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    pub fn with_stop(mut self, offset: f32, color: Color) -> Self {
        let offset = offset.clamp(0.0, 1.0);
        let at = self.stops.partition_point(|stop| stop.offset <= offset);
        self.stops.insert(at, ColorStop { offset, color });
        self
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn color_at(&self, point: [f32; 2]) -> Color {
        let axis = [self.end[0] - self.start[0], self.end[1] - self.start[1]];
        let length_sq = axis[0] * axis[0] + axis[1] * axis[1];
        let t = if length_sq > 0.0 {
            ((point[0] - self.start[0]) * axis[0] + (point[1] - self.start[1]) * axis[1])
                / length_sq
        } else {
            0.0
        };

        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Color::TRANSPARENT,
        };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }
        for pair in self.stops.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if t <= to.offset {
                let span = to.offset - from.offset;
                let local = if span > 0.0 { (t - from.offset) / span } else { 1.0 };
                return from.color.lerp(to.color, local);
            }
        }
        last.color
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Color),
    Linear(LinearGradient),
}

impl Fill {
    pub fn color_at(&self, point: [f32; 2]) -> Color {
        match self {
            Fill::Solid(color) => *color,
            Fill::Linear(gradient) => gradient.color_at(point),
        }
    }
}

/// 2D drawing target the sky paints into, in pixels with y pointing down.
pub trait Surface {
    fn clear(&mut self, region: Rect);
    fn fill_rect(&mut self, rect: Rect, fill: &Fill);
    fn fill_circle(&mut self, circle: Circle, color: Color, shadow: Shadow);
    fn fill_polygon(&mut self, points: &[[f32; 2]], color: Color);
}

/// Whatever drives the frame loop; asked once per tick for the next frame.
pub trait FrameScheduler {
    fn request_frame(&self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rect),
    Rect(Rect, Fill),
    Circle(Circle, Color, Shadow),
    Polygon(Vec<[f32; 2]>, Color),
}

/// Surface that only remembers what was drawn. Handy for headless runs.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl DrawList {
    pub(crate) fn circles(&self) -> impl Iterator<Item = (&Circle, &Color, &Shadow)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Circle(circle, color, shadow) => Some((circle, color, shadow)),
            _ => None,
        })
    }
}

impl Surface for DrawList {
    fn clear(&mut self, region: Rect) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(region));
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Fill) {
        self.commands.push(DrawCommand::Rect(rect, fill.clone()));
    }

    fn fill_circle(&mut self, circle: Circle, color: Color, shadow: Shadow) {
        self.commands.push(DrawCommand::Circle(circle, color, shadow));
    }

    fn fill_polygon(&mut self, points: &[[f32; 2]], color: Color) {
        self.commands.push(DrawCommand::Polygon(points.to_vec(), color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sunset() -> LinearGradient {
        LinearGradient::new([0.0, 0.0], [100.0, 0.0])
            .with_stop(1.0, Color::rgb(255, 255, 255))
            .with_stop(0.0, Color::rgb(0, 0, 0))
    }

    #[test]
    fn stops_are_kept_sorted() {
        let offsets: Vec<f32> = sunset().stops().iter().map(|stop| stop.offset).collect();
        assert_eq!(offsets, vec![0.0, 1.0]);
    }

    #[test]
    fn gradient_interpolates_along_axis() {
        let gradient = sunset();
        assert_eq!(gradient.color_at([0.0, 50.0]), Color::rgb(0, 0, 0));
        assert!((gradient.color_at([50.0, 999.0]).r - 0.5).abs() < 1e-6);
        assert_eq!(gradient.color_at([100.0, 0.0]), Color::rgb(255, 255, 255));
    }

    #[test]
    fn gradient_clamps_outside_axis() {
        let gradient = sunset();
        assert_eq!(gradient.color_at([-40.0, 0.0]), Color::rgb(0, 0, 0));
        assert_eq!(gradient.color_at([400.0, 0.0]), Color::rgb(255, 255, 255));
    }

    #[test]
    fn stopless_gradient_is_transparent() {
        let gradient = LinearGradient::new([0.0, 0.0], [1.0, 1.0]);
        assert_eq!(gradient.color_at([0.5, 0.5]), Color::TRANSPARENT);
    }

    #[test]
    fn clearing_a_draw_list_forgets_old_commands() {
        let mut list = DrawList::new();
        let region = Rect { x: 0.0, y: 0.0, width: 10.0, height: 10.0 };
        list.fill_polygon(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]], Color::rgb(1, 1, 1));
        list.clear(region);
        assert_eq!(list.commands, vec![DrawCommand::Clear(region)]);
    }
}
