/// 2D canvas surface
use nalgebra::Point2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};
use wireview_core::{Background, Rgb, Surface};

const LINE_WIDTH: f64 = 1.2;

pub struct Canvas2dSurface {
    window: Window,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl Canvas2dSurface {
    pub fn new(window: Window, canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self {
            window,
            canvas,
            context,
        })
    }
}

impl Surface for Canvas2dSurface {
    fn container_size(&self) -> (f32, f32) {
        (
            self.canvas.client_width() as f32,
            self.canvas.client_height() as f32,
        )
    }

    fn pixel_ratio(&self) -> f32 {
        let ratio = self.window.device_pixel_ratio() as f32;
        if ratio > 0.0 {
            ratio
        } else {
            1.0
        }
    }

    fn backing_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize_backing(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self, background: Background) {
        let ratio = self.pixel_ratio() as f64;
        let (width, height) = self.container_size();
        let (width, height) = (width as f64, height as f64);

        // Draw in logical units from here on
        if let Err(err) = self
            .context
            .set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0)
        {
            log::warn!("canvas set_transform failed: {err:?}");
        }
        self.context.clear_rect(0.0, 0.0, width, height);

        if let Some(color) = background.color() {
            self.context
                .set_fill_style(&JsValue::from_str(&color.to_string()));
            self.context.fill_rect(0.0, 0.0, width, height);
        }
    }

    fn stroke_closed(&mut self, points: &[Point2<f32>], color: Rgb) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };

        let context = &self.context;
        context.set_line_width(LINE_WIDTH);
        context.set_stroke_style(&JsValue::from_str(&color.to_string()));
        context.begin_path();
        context.move_to(first.x as f64, first.y as f64);
        for point in rest {
            context.line_to(point.x as f64, point.y as f64);
        }
        context.line_to(first.x as f64, first.y as f64);
        context.stroke();
    }
}
