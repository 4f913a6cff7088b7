use crate::{
    config,
    types::{ColorId, RenderCommand, Vec2},
};

/// Drawing target the simulation renders into.
pub trait Surface {
    /// Fades the whole area toward the background, leaving trails.
    fn clear(&mut self);

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: ColorId);
}

/// Hands one frame's worth of render commands to `surface`.
pub fn present<S: Surface + ?Sized>(surface: &mut S, commands: &[RenderCommand]) {
    surface.clear();
    for command in commands {
        match *command {
            RenderCommand::Circle {
                center,
                radius,
                color,
            } => surface.draw_circle(center, radius, color),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderCell {
    pub intensity: f32,
    pub color: ColorId,
}

impl RenderCell {
    const EMPTY: RenderCell = RenderCell {
        intensity: 0.0,
        color: ColorId::Pink,
    };

    pub fn glyph(&self) -> char {
        if self.intensity > 0.75 {
            '●'
        } else if self.intensity > 0.45 {
            '•'
        } else if self.intensity > 0.2 {
            '·'
        } else if self.intensity > config::FADE_CUTOFF {
            '.'
        } else {
            ' '
        }
    }

    /// Cell colour blended toward the fade colour as the intensity drops.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let (r, g, b) = self.color.rgb();
        let (br, bg, bb) = config::FADE_RGB;
        let t = self.intensity.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (bg as f32 + (fg as f32 - bg as f32) * t).round() as u8;
        (mix(r, br), mix(g, bg), mix(b, bb))
    }
}

/// Terminal-cell canvas. World coordinates are pixels; each cell covers
/// `CELL_WIDTH_PX × CELL_HEIGHT_PX` of them.
#[derive(Debug)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<RenderCell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let mut buffer = Self {
            width,
            height,
            cells: Vec::new(),
        };
        buffer.resize(width, height);
        buffer
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let len = (width as usize).saturating_mul(height as usize);
        self.cells.clear();
        self.cells.resize(len, RenderCell::EMPTY);
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Size of the area in world pixels.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * config::CELL_WIDTH_PX,
            self.height as f32 * config::CELL_HEIGHT_PX,
        )
    }

    pub fn get(&self, x: u16, y: u16) -> RenderCell {
        debug_assert!(x < self.width && y < self.height, "get() out of bounds");
        self.cells[self.index(x, y)]
    }

    fn index(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    fn cell_center(x: u16, y: u16) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) * config::CELL_WIDTH_PX,
            (y as f32 + 0.5) * config::CELL_HEIGHT_PX,
        )
    }

    fn paint(&mut self, x: i32, y: i32, color: ColorId) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = self.index(x as u16, y as u16);
        self.cells[idx] = RenderCell {
            intensity: 1.0,
            color,
        };
    }
}

/// Linear radial gradient between the inner and outer fade stops, spanning a
/// radius equal to the area's width.
pub fn fade_alpha(point: Vec2, extent: Vec2) -> f32 {
    if extent.x <= 0.0 {
        return config::FADE_OUTER_ALPHA;
    }
    let t = ((point - extent / 2.0).length() / extent.x).min(1.0);
    config::FADE_INNER_ALPHA + (config::FADE_OUTER_ALPHA - config::FADE_INNER_ALPHA) * t
}

impl Surface for FrameBuffer {
    fn clear(&mut self) {
        let extent = self.extent();
        for y in 0..self.height {
            for x in 0..self.width {
                let alpha = fade_alpha(Self::cell_center(x, y), extent);
                let idx = self.index(x, y);
                let cell = &mut self.cells[idx];
                cell.intensity *= 1.0 - alpha;
                if cell.intensity < config::FADE_CUTOFF {
                    cell.intensity = 0.0;
                }
            }
        }
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: ColorId) {
        if !center.x.is_finite() || !center.y.is_finite() {
            return;
        }
        let cx = (center.x / config::CELL_WIDTH_PX).floor() as i32;
        let cy = (center.y / config::CELL_HEIGHT_PX).floor() as i32;
        self.paint(cx, cy, color);

        let reach_x = (radius.max(0.0) / config::CELL_WIDTH_PX).ceil() as i32;
        let reach_y = (radius.max(0.0) / config::CELL_HEIGHT_PX).ceil() as i32;
        for y in cy.saturating_sub(reach_y)..=cy.saturating_add(reach_y) {
            for x in cx.saturating_sub(reach_x)..=cx.saturating_add(reach_x) {
                if x >= self.width as i32 || y >= self.height as i32 {
                    continue;
                }
                if x < 0 || y < 0 {
                    continue;
                }
                let offset = Self::cell_center(x as u16, y as u16) - center;
                if offset.length() <= radius {
                    self.paint(x, y, color);
                }
            }
        }
    }
}

/// Surface double that records every call.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub clears: usize,
    pub circles: Vec<(Vec2, f32, ColorId)>,
}

#[cfg(test)]
impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.clears += 1;
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: ColorId) {
        self.circles.push((center, radius, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod present_fn {
        use super::*;

        #[test]
        fn clears_once_then_draws_every_command() {
            let commands = [
                RenderCommand::Circle {
                    center: Vec2::new(1.0, 2.0),
                    radius: 3.0,
                    color: ColorId::Mint,
                },
                RenderCommand::Circle {
                    center: Vec2::new(4.0, 5.0),
                    radius: 0.5,
                    color: ColorId::Sky,
                },
            ];
            let mut surface = RecordingSurface::default();
            present(&mut surface, &commands);
            assert_eq!(surface.clears, 1);
            assert_eq!(
                surface.circles,
                vec![
                    (Vec2::new(1.0, 2.0), 3.0, ColorId::Mint),
                    (Vec2::new(4.0, 5.0), 0.5, ColorId::Sky),
                ]
            );
        }

        #[test]
        fn empty_frame_still_clears() {
            let mut surface = RecordingSurface::default();
            present(&mut surface, &[]);
            assert_eq!(surface.clears, 1);
            assert!(surface.circles.is_empty());
        }
    }

    mod framebuffer {
        use super::*;

        #[test]
        fn extent_is_cells_times_cell_size() {
            let fb = FrameBuffer::new(80, 24);
            assert_eq!(
                fb.extent(),
                Vec2::new(80.0 * config::CELL_WIDTH_PX, 24.0 * config::CELL_HEIGHT_PX)
            );
        }

        #[test]
        fn resize_resets_cells() {
            let mut fb = FrameBuffer::new(4, 4);
            fb.draw_circle(Vec2::new(1.0, 1.0), 0.0, ColorId::Pink);
            fb.resize(6, 3);
            assert_eq!(fb.width(), 6);
            assert_eq!(fb.height(), 3);
            assert_eq!(fb.get(0, 0).intensity, 0.0);
        }

        #[test]
        fn zero_radius_circle_lights_its_own_cell() {
            let mut fb = FrameBuffer::new(10, 10);
            let center = Vec2::new(2.5 * config::CELL_WIDTH_PX, 3.5 * config::CELL_HEIGHT_PX);
            fb.draw_circle(center, 0.0, ColorId::Butter);
            let cell = fb.get(2, 3);
            assert_eq!(cell.intensity, 1.0);
            assert_eq!(cell.color, ColorId::Butter);
            assert_eq!(cell.glyph(), '●');
        }

        #[test]
        fn out_of_bounds_circle_is_ignored() {
            let mut fb = FrameBuffer::new(4, 4);
            fb.draw_circle(Vec2::new(-100.0, 900.0), 5.0, ColorId::Pink);
            fb.draw_circle(Vec2::new(9000.0, 9000.0), 5.0, ColorId::Pink);
        }

        #[test]
        fn clear_fades_toward_empty() {
            let mut fb = FrameBuffer::new(10, 10);
            fb.draw_circle(Vec2::new(1.0, 1.0), 0.0, ColorId::Sky);
            fb.clear();
            let once = fb.get(0, 0).intensity;
            assert!((once - 0.9).abs() < 1e-6);
            for _ in 0..100 {
                fb.clear();
            }
            assert_eq!(fb.get(0, 0).intensity, 0.0);
            assert_eq!(fb.get(0, 0).glyph(), ' ');
        }
    }

    mod fade_alpha_fn {
        use super::*;

        #[test]
        fn matches_gradient_stops() {
            let extent = Vec2::new(800.0, 600.0);
            assert!((fade_alpha(extent / 2.0, extent) - config::FADE_INNER_ALPHA).abs() < 1e-6);
            assert!((fade_alpha(Vec2::ZERO, extent) - 0.1).abs() < 1e-6);
        }
    }

    mod render_cell {
        use super::*;

        #[test]
        fn full_intensity_keeps_palette_color() {
            let cell = RenderCell {
                intensity: 1.0,
                color: ColorId::Pink,
            };
            assert_eq!(cell.rgb(), ColorId::Pink.rgb());
        }

        #[test]
        fn zero_intensity_is_fade_color() {
            let cell = RenderCell {
                intensity: 0.0,
                color: ColorId::Mint,
            };
            assert_eq!(cell.rgb(), config::FADE_RGB);
        }

        #[test]
        fn glyph_dims_with_intensity() {
            let glyphs: Vec<char> = [1.0, 0.5, 0.3, 0.1, 0.0]
                .iter()
                .map(|&intensity| RenderCell { intensity, color: ColorId::Sky }.glyph())
                .collect();
            assert_eq!(glyphs, vec!['●', '•', '·', '.', ' ']);
        }
    }
}
