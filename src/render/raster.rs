use std::path::Path;

use anyhow::Context as _;
use kurbo::Shape as _;

use crate::{
    foundation::core::{Canvas, Point, Rgba8},
    foundation::error::{KolamError, KolamResult},
    render::surface::{RecordingSurface, Shape},
};

const PATH_TOLERANCE: f64 = 0.1;

/// Raster readback of a surface.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Premultiplied RGBA8 of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Paint the display list over an opaque `background`.
#[tracing::instrument(skip(surface), fields(items = surface.len()))]
pub fn rasterize(surface: &RecordingSurface, canvas: Canvas, background: Rgba8) -> KolamResult<FrameRGBA> {
    let width: u16 = canvas
        .width
        .try_into()
        .map_err(|_| KolamError::render("canvas width exceeds u16"))?;
    let height: u16 = canvas
        .height
        .try_into()
        .map_err(|_| KolamError::render("canvas height exceeds u16"))?;

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    clear_pixmap(&mut pixmap, background.premultiplied());

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    for (_, item) in surface.items() {
        let c = item.color;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
        for path in shape_paths(item.shape) {
            ctx.fill_path(&bezpath_to_cpu(&path));
        }
    }
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data: pixmap.data_as_u8_slice().to_vec(),
        premultiplied: true,
    })
}

pub fn save_png(frame: &FrameRGBA, path: &Path) -> KolamResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn shape_paths(shape: Shape) -> Vec<kurbo::BezPath> {
    match shape {
        Shape::Dot { center, radius } => vec![circle(center, radius)],
        Shape::Line { from, to, width } => line_paths(from, to, width),
    }
}

fn circle(center: Point, radius: f64) -> kurbo::BezPath {
    kurbo::Circle::new(center, radius).to_path(PATH_TOLERANCE)
}

/// Round-capped segment as separate fills: start cap, body quad, end cap.
fn line_paths(from: Point, to: Point, width: f64) -> Vec<kurbo::BezPath> {
    let r = width / 2.0;
    let d = to - from;
    let len = d.hypot();
    let mut out = vec![circle(from, r)];
    if len <= f64::EPSILON {
        return out;
    }
    let n = kurbo::Vec2::new(-d.y, d.x) * (r / len);
    let mut body = kurbo::BezPath::new();
    body.move_to(from + n);
    body.line_to(to + n);
    body.line_to(to - n);
    body.line_to(from - n);
    body.close_path();
    out.push(body);
    out.push(circle(to, r));
    out
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
