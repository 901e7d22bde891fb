use pomotimer::chart::Arc;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine, Painter, Shape},
        Block, Borders, Widget,
    },
};

pub const FACE_COLOR: Color = Color::Rgb(0x00, 0x50, 0x90);
pub const SLICE_COLOR: Color = Color::Rgb(0xff, 0x50, 0x00);

const RADIUS: f64 = 0.95;

/// Filled wedge from the centre, or a radial line when the arc has no width
/// at the current resolution.
pub struct PieSlice {
    pub arc: Arc,
    pub radius: f64,
    /// Radius in canvas dots, used to decide degeneracy and sampling density
    pub dot_radius: f64,
    pub color: Color,
}

impl Shape for PieSlice {
    fn draw(&self, painter: &mut Painter) {
        let Arc { from, to } = self.arc;
        if self.arc.is_degenerate(self.dot_radius) {
            let (x, y) = Arc::point(to, self.radius);
            CanvasLine::new(0.0, 0.0, x, y, self.color).draw(painter);
            return;
        }

        let rings = (self.dot_radius.ceil() as usize).max(1) * 2;
        for ring in 0..=rings {
            let fraction = ring as f64 / rings as f64;
            let r = self.radius * fraction;
            let steps = ((from - to) * self.dot_radius * 2.0 * fraction)
                .ceil()
                .max(1.0) as usize;
            for step in 0..=steps {
                let angle = to + (from - to) * step as f64 / steps as f64;
                let (x, y) = Arc::point(angle, r);
                if let Some((px, py)) = painter.get_point(x, y) {
                    painter.paint(px, py, self.color);
                }
            }
        }
    }
}

/// Largest area that renders round: braille cells are twice as tall as wide.
pub fn square_in(area: Rect) -> Rect {
    let height = area.height.min(area.width / 2).max(1);
    let width = (height * 2).min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Today's sessions on a clock face. Midnight sits on the left, 06:00 at the
/// top, noon on the right and 18:00 at the bottom.
pub struct ClockChart<'a> {
    pub arcs: &'a [Arc],
}

impl Widget for ClockChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Today")
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width < 2 || inner.height < 1 {
            return;
        }

        let face = square_in(inner);
        let dot_radius = face.height as f64 * 2.0 * RADIUS;
        let arcs = self.arcs;

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-1.0, 1.0])
            .y_bounds([-1.0, 1.0])
            .paint(move |ctx| {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: RADIUS,
                    color: FACE_COLOR,
                });
                for arc in arcs {
                    ctx.draw(&PieSlice {
                        arc: *arc,
                        radius: RADIUS,
                        dot_radius,
                        color: SLICE_COLOR,
                    });
                }
            })
            .render(face, buf);
    }
}
