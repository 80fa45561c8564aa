//! Canvas 2D playback of a [`DisplayList`]

use wasm_bindgen::JsValue;
use web_sys::{CanvasGradient, CanvasRenderingContext2d};

use super::commands::{ColorStop, DisplayList, DrawCommand, Paint, PathOp};

/// Replays display lists onto a browser 2D context
pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    /// Draw every command in order. Individual failures are skipped so one
    /// bad gradient can't blank the frame.
    pub fn paint(&self, list: &DisplayList) {
        for command in &list.commands {
            if let Err(e) = self.apply(command) {
                log::warn!("canvas command {:?} failed: {:?}", command, e);
            }
        }
    }

    fn apply(&self, command: &DrawCommand) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match command {
            DrawCommand::Save => ctx.save(),
            DrawCommand::Restore => ctx.restore(),
            DrawCommand::Translate(x, y) => ctx.translate(*x as f64, *y as f64)?,
            DrawCommand::Rotate(angle) => ctx.rotate(*angle as f64)?,
            DrawCommand::SetFill(paint) => self.set_fill(paint)?,
            DrawCommand::SetShadow { color, blur } => {
                ctx.set_shadow_color(color);
                ctx.set_shadow_blur(*blur as f64);
            }
            DrawCommand::SetComposite(op) => ctx.set_global_composite_operation(op.as_str())?,
            DrawCommand::ClearRect { x, y, w, h } => {
                ctx.clear_rect(*x as f64, *y as f64, *w as f64, *h as f64)
            }
            DrawCommand::FillRect { x, y, w, h } => {
                ctx.fill_rect(*x as f64, *y as f64, *w as f64, *h as f64)
            }
            DrawCommand::FillEllipse {
                x,
                y,
                rx,
                ry,
                rotation,
                start,
                end,
            } => {
                ctx.begin_path();
                ctx.ellipse(
                    *x as f64,
                    *y as f64,
                    *rx as f64,
                    *ry as f64,
                    *rotation as f64,
                    *start as f64,
                    *end as f64,
                )?;
                ctx.fill();
            }
            DrawCommand::FillCircle { x, y, r } => {
                ctx.begin_path();
                ctx.arc(*x as f64, *y as f64, r.max(0.0) as f64, 0.0, std::f64::consts::TAU)?;
                ctx.fill();
            }
            DrawCommand::FillPath(ops) => {
                ctx.begin_path();
                for op in ops {
                    match *op {
                        PathOp::MoveTo(x, y) => ctx.move_to(x as f64, y as f64),
                        PathOp::LineTo(x, y) => ctx.line_to(x as f64, y as f64),
                        PathOp::QuadTo { cx, cy, x, y } => {
                            ctx.quadratic_curve_to(cx as f64, cy as f64, x as f64, y as f64)
                        }
                        PathOp::Close => ctx.close_path(),
                    }
                }
                ctx.fill();
            }
        }
        Ok(())
    }

    fn set_fill(&self, paint: &Paint) -> Result<(), JsValue> {
        match paint {
            Paint::Solid(color) => self.ctx.set_fill_style_str(color),
            Paint::Linear { from, to, stops } => {
                let gradient = self.ctx.create_linear_gradient(
                    from.0 as f64,
                    from.1 as f64,
                    to.0 as f64,
                    to.1 as f64,
                );
                add_stops(&gradient, stops)?;
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
            Paint::Radial {
                inner,
                outer,
                stops,
            } => {
                let gradient = self.ctx.create_radial_gradient(
                    inner.0 as f64,
                    inner.1 as f64,
                    inner.2.max(0.0) as f64,
                    outer.0 as f64,
                    outer.1 as f64,
                    outer.2.max(0.0) as f64,
                )?;
                add_stops(&gradient, stops)?;
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
        }
        Ok(())
    }
}

fn add_stops(gradient: &CanvasGradient, stops: &[ColorStop]) -> Result<(), JsValue> {
    for (offset, color) in stops {
        gradient.add_color_stop(offset.clamp(0.0, 1.0), color)?;
    }
    Ok(())
}
