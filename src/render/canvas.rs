//! Canvas 2D backend

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::DrawCommand;
use crate::consts::{LOGICAL_HEIGHT, LOGICAL_WIDTH};

/// Paints draw lists onto a `<canvas>`
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    /// Match the backing store to the displayed size times the pixel ratio
    pub fn resize(&self, device_pixel_ratio: f64) {
        let w = (self.canvas.client_width() as f64 * device_pixel_ratio).max(1.0) as u32;
        let h = (self.canvas.client_height() as f64 * device_pixel_ratio).max(1.0) as u32;
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
            log::debug!("Canvas resized to {w}x{h}");
        }
    }

    pub fn draw(&self, commands: &[DrawCommand]) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let sx = self.canvas.width() as f64 / LOGICAL_WIDTH as f64;
        let sy = self.canvas.height() as f64 / LOGICAL_HEIGHT as f64;
        ctx.set_transform(sx, 0.0, 0.0, sy, 0.0, 0.0)?;

        for command in commands {
            match command {
                DrawCommand::Clear { color } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.fill_rect(0.0, 0.0, LOGICAL_WIDTH as f64, LOGICAL_HEIGHT as f64);
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                    alpha,
                } => {
                    ctx.set_global_alpha(*alpha as f64);
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.begin_path();
                    ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)?;
                    ctx.fill();
                    ctx.set_global_alpha(1.0);
                }
                DrawCommand::Line { from, to, width, color } => {
                    ctx.set_stroke_style_str(&color.to_css());
                    ctx.set_line_width(*width as f64);
                    ctx.set_line_cap("round");
                    ctx.begin_path();
                    ctx.move_to(from.x as f64, from.y as f64);
                    ctx.line_to(to.x as f64, to.y as f64);
                    ctx.stroke();
                }
                DrawCommand::Polyline {
                    points,
                    width,
                    color,
                    alpha,
                } => {
                    let Some((first, rest)) = points.split_first() else {
                        continue;
                    };
                    ctx.set_global_alpha(*alpha as f64);
                    ctx.set_stroke_style_str(&color.to_css());
                    ctx.set_line_width(*width as f64);
                    ctx.set_line_join("round");
                    ctx.begin_path();
                    ctx.move_to(first.x as f64, first.y as f64);
                    for p in rest {
                        ctx.line_to(p.x as f64, p.y as f64);
                    }
                    ctx.stroke();
                    ctx.set_global_alpha(1.0);
                }
                DrawCommand::Rect { origin, size, color } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
                }
                DrawCommand::Text {
                    pos,
                    text,
                    size,
                    color,
                    align,
                } => {
                    ctx.set_font(&format!("{size}px sans-serif"));
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.set_text_align(align.as_str());
                    ctx.fill_text(text, pos.x as f64, pos.y as f64)?;
                }
            }
        }
        Ok(())
    }
}
