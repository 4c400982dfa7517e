use crate::{
    foundation::core::{NodeId, Resolution, Rgb, ViewpointId},
    foundation::error::{CaptureError, CaptureResult},
    render::backend::{PixelBuffer, Renderer},
    scene::memory::{CameraDef, MemoryScene},
};

/// Top-down orthographic rasterizer for [`MemoryScene`], powered by `vello_cpu`.
///
/// Shapes of nodes active in the hierarchy are drawn in node order, tinted by the scene's ambient
/// light; live particles are drawn unlit on top. The scene background is opaque, so the read-back
/// pixels are straight RGB.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatRenderer;

impl FlatRenderer {
    /// Create a renderer.
    pub fn new() -> Self {
        Self
    }
}

impl Renderer<MemoryScene> for FlatRenderer {
    fn render(
        &mut self,
        scene: &MemoryScene,
        viewpoint: &ViewpointId,
        resolution: Resolution,
    ) -> CaptureResult<PixelBuffer> {
        let camera = scene.camera(viewpoint).ok_or_else(|| {
            CaptureError::render(format!("viewpoint '{viewpoint}' has no camera"))
        })?;

        let width: u16 = resolution
            .width
            .try_into()
            .map_err(|_| CaptureError::render("render target width exceeds u16"))?;
        let height: u16 = resolution
            .height
            .try_into()
            .map_err(|_| CaptureError::render("render target height exceeds u16"))?;

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        let mut ctx = vello_cpu::RenderContext::new(width, height);

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        set_color(&mut ctx, scene.background());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));

        ctx.set_transform(view_transform(camera, resolution));

        let ambient = scene.ambient();
        let mut emitters = Vec::<NodeId>::new();
        for node in scene.visible_nodes() {
            if let Some(shape) = &node.shape {
                set_color(&mut ctx, shape.color.scale(ambient));
                ctx.fill_rect(&rect_to_cpu(shape.rect));
            }
            if node.emitter.is_some() {
                emitters.push(node.id.clone());
            }
        }

        for id in &emitters {
            let Some(em) = scene.node(id).and_then(|n| n.emitter) else {
                continue;
            };
            set_color(&mut ctx, em.color);
            let half = em.size * 0.5;
            for p in scene.particle_positions(id) {
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    p.x - half,
                    p.y - half,
                    p.x + half,
                    p.y + half,
                ));
            }
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(readback_rgb(&pixmap, resolution))
    }
}

fn view_transform(camera: &CameraDef, resolution: Resolution) -> vello_cpu::kurbo::Affine {
    let scale = f64::from(resolution.height) / camera.view_height;
    let half_w = f64::from(resolution.width) * 0.5;
    let half_h = f64::from(resolution.height) * 0.5;
    vello_cpu::kurbo::Affine::translate((half_w, half_h))
        * vello_cpu::kurbo::Affine::scale(scale)
        * vello_cpu::kurbo::Affine::translate((-camera.center.x, -camera.center.y))
}

fn set_color(ctx: &mut vello_cpu::RenderContext, color: Rgb) {
    let [r, g, b] = color.to_rgb8();
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, 255));
}

fn rect_to_cpu(r: kurbo::Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn readback_rgb(pixmap: &vello_cpu::Pixmap, resolution: Resolution) -> PixelBuffer {
    let src = pixmap.data_as_u8_slice();
    let mut data = Vec::with_capacity(resolution.pixel_count() * 3);
    for px in src.chunks_exact(4) {
        data.push(f32::from(px[0]) / 255.0);
        data.push(f32::from(px[1]) / 255.0);
        data.push(f32::from(px[2]) / 255.0);
    }
    PixelBuffer {
        width: resolution.width,
        height: resolution.height,
        data,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
