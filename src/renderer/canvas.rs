//! Canvas 2D backend
//!
//! Sprites are optional: until an image has loaded (or if it fails to), the
//! entity is drawn with its fallback shape instead.

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::shapes::{OUTLINE_WIDTH, Shape, entity_shape};
use crate::platform::Renderer;
use crate::sim::{EntityKind, Rect};

const BACKGROUND_SRC: &str = "images/background.jpg";
const PLAYER_SRC: &str = "images/player.png";
const OBSTACLE_SRC: &str = "images/obstacle.png";

/// Placeholder sky gradient stops (offset, color)
const SKY_GRADIENT: [(f32, &str); 3] = [(0.0, "#87CEEB"), (0.5, "#E0F6FF"), (1.0, "#B0E0E6")];

/// Renders the scene into a `<canvas>` with the 2D context
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    background: Option<HtmlImageElement>,
    player: Option<HtmlImageElement>,
    obstacle: Option<HtmlImageElement>,
}

impl CanvasRenderer {
    /// Grab the 2D context and start loading sprites
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        use wasm_bindgen::JsCast;

        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;

        Some(Self {
            canvas,
            ctx,
            background: load_image(BACKGROUND_SRC),
            player: load_image(PLAYER_SRC),
            obstacle: load_image(OBSTACLE_SRC),
        })
    }

    /// Match the backing store to the logical canvas size
    pub fn resize(&self, width: f32, height: f32) {
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
    }

    fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    fn draw_image(&self, img: &HtmlImageElement, x: f64, y: f64, w: f64, h: f64) {
        let _ = self
            .ctx
            .draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h);
    }

    fn fill_shape(&self, shape: &Shape) {
        let ctx = &self.ctx;
        match shape {
            Shape::Box { rect, fill } => {
                ctx.set_fill_style_str(fill);
                ctx.fill_rect(
                    rect.pos.x as f64,
                    rect.pos.y as f64,
                    rect.size.x as f64,
                    rect.size.y as f64,
                );
            }
            Shape::Polygon {
                points,
                fill,
                stroke,
            } => {
                let Some(first) = points.first() else { return };
                ctx.begin_path();
                ctx.move_to(first.x as f64, first.y as f64);
                for p in &points[1..] {
                    ctx.line_to(p.x as f64, p.y as f64);
                }
                ctx.close_path();
                ctx.set_fill_style_str(fill);
                ctx.fill();
                if let Some(stroke) = stroke {
                    ctx.set_stroke_style_str(stroke);
                    ctx.set_line_width(OUTLINE_WIDTH);
                    ctx.stroke();
                }
            }
            Shape::Curves {
                start,
                segments,
                fill,
            } => {
                ctx.begin_path();
                ctx.move_to(start.x as f64, start.y as f64);
                for seg in segments {
                    ctx.bezier_curve_to(
                        seg.c1.x as f64,
                        seg.c1.y as f64,
                        seg.c2.x as f64,
                        seg.c2.y as f64,
                        seg.end.x as f64,
                        seg.end.y as f64,
                    );
                }
                ctx.set_fill_style_str(fill);
                ctx.fill();
            }
            Shape::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                ctx.begin_path();
                let _ = ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    *radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.set_fill_style_str(fill);
                ctx.fill();
                if let Some(stroke) = stroke {
                    ctx.set_stroke_style_str(stroke);
                    ctx.set_line_width(OUTLINE_WIDTH);
                    ctx.stroke();
                }
            }
        }
    }
}

impl Renderer for CanvasRenderer {
    fn draw_background(&mut self, scroll_offset: f32) {
        let (w, h) = (self.width(), self.height());
        self.ctx.clear_rect(0.0, 0.0, w, h);

        if let Some(img) = ready(&self.background) {
            // Two stacked copies scrolling down, wrapping at the canvas height
            let y = scroll_offset as f64;
            self.draw_image(img, 0.0, y, w, h);
            self.draw_image(img, 0.0, y - h, w, h);
            return;
        }

        let gradient = self.ctx.create_linear_gradient(0.0, 0.0, 0.0, h);
        for (offset, color) in SKY_GRADIENT {
            let _ = gradient.add_color_stop(offset, color);
        }
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }

    fn draw_entity(&mut self, kind: &EntityKind, rect: Rect) {
        if kind.is_hazard() {
            if let Some(img) = ready(&self.obstacle) {
                self.draw_image(
                    img,
                    rect.pos.x as f64,
                    rect.pos.y as f64,
                    rect.size.x as f64,
                    rect.size.y as f64,
                );
                return;
            }
        }
        self.fill_shape(&entity_shape(kind, rect));
    }

    fn draw_player(&mut self, rect: Rect, blinking: bool) {
        if blinking {
            return;
        }
        let (x, y) = (rect.pos.x as f64, rect.pos.y as f64);
        let (w, h) = (rect.size.x as f64, rect.size.y as f64);
        match ready(&self.player) {
            Some(img) => self.draw_image(img, x, y, w, h),
            None => {
                self.ctx.set_fill_style_str("black");
                self.ctx.fill_rect(x, y, w, h);
            }
        }
    }

    fn draw_time(&mut self, readout: &str) {
        self.ctx.set_fill_style_str("black");
        self.ctx.set_font("20px Arial");
        self.ctx.set_text_align("left");
        let _ = self.ctx.fill_text(readout, 10.0, 30.0);
    }

    fn draw_game_over(&mut self, survival: &str) {
        let (w, h) = (self.width(), self.height());
        self.ctx.set_fill_style_str("rgba(0, 0, 0, 0.7)");
        self.ctx.fill_rect(0.0, 0.0, w, h);

        self.ctx.set_fill_style_str("white");
        self.ctx.set_font("bold 48px Arial");
        self.ctx.set_text_align("center");
        let _ = self.ctx.fill_text("GAME OVER", w / 2.0, h / 2.0 - 20.0);

        self.ctx.set_font("24px Arial");
        let _ = self.ctx.fill_text(survival, w / 2.0, h / 2.0 + 30.0);
    }
}

fn load_image(src: &str) -> Option<HtmlImageElement> {
    let img = HtmlImageElement::new().ok()?;
    img.set_src(src);
    Some(img)
}

/// The image, if it finished loading successfully
fn ready(img: &Option<HtmlImageElement>) -> Option<&HtmlImageElement> {
    img.as_ref()
        .filter(|img| img.complete() && img.natural_width() > 0)
}
