//! Replays draw lists onto a 2D canvas context

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use wasm_bindgen::Clamped;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlImageElement, ImageData};

use super::draw::{Align, Baseline, DrawCmd, DrawList, Paint};
use crate::assets::ImageId;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::ui::Rect;

/// Grain touches every 4th pixel (RGBA stride 16)
const NOISE_STRIDE: usize = 16;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    images: [Option<HtmlImageElement>; 3],
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self {
            ctx,
            images: [None, None, None],
        }
    }

    pub fn set_image(&mut self, id: ImageId, image: HtmlImageElement) {
        self.images[id.index()] = Some(image);
    }

    /// Draw a frame. Failed canvas calls are skipped; the next frame redraws everything.
    pub fn draw(&self, list: &DrawList) {
        let ctx = &self.ctx;
        ctx.set_global_alpha(1.0);
        for cmd in list.cmds() {
            match cmd {
                DrawCmd::Save => ctx.save(),
                DrawCmd::Restore => ctx.restore(),
                DrawCmd::Clip(rect) => {
                    ctx.begin_path();
                    self.rect_path(rect);
                    ctx.clip();
                }
                DrawCmd::Translate(v) => {
                    let _ = ctx.translate(v.x as f64, v.y as f64);
                }
                DrawCmd::Scale(v) => {
                    let _ = ctx.scale(v.x as f64, v.y as f64);
                }
                DrawCmd::Alpha(a) => ctx.set_global_alpha(*a as f64),
                DrawCmd::Shadow(shadow) => {
                    ctx.set_shadow_color(&shadow.color.as_css());
                    ctx.set_shadow_blur(shadow.blur as f64);
                    ctx.set_shadow_offset_x(0.0);
                    ctx.set_shadow_offset_y(shadow.offset_y as f64);
                }
                DrawCmd::FillRect { rect, paint } => {
                    if self.set_fill(paint) {
                        ctx.fill_rect(
                            rect.x as f64,
                            rect.y as f64,
                            rect.w as f64,
                            rect.h as f64,
                        );
                    }
                }
                DrawCmd::StrokeRect { rect, color, width } => {
                    ctx.set_stroke_style_str(&color.as_css());
                    ctx.set_line_width(*width as f64);
                    ctx.stroke_rect(
                        rect.x as f64,
                        rect.y as f64,
                        rect.w as f64,
                        rect.h as f64,
                    );
                }
                DrawCmd::Polyline {
                    points,
                    color,
                    width,
                    round_caps,
                } => {
                    let Some((first, rest)) = points.split_first() else {
                        continue;
                    };
                    ctx.set_stroke_style_str(&color.as_css());
                    ctx.set_line_width(*width as f64);
                    ctx.set_line_cap(if *round_caps { "round" } else { "butt" });
                    ctx.begin_path();
                    ctx.move_to(first.x as f64, first.y as f64);
                    for p in rest {
                        ctx.line_to(p.x as f64, p.y as f64);
                    }
                    ctx.stroke();
                }
                DrawCmd::FillCircle {
                    center,
                    radius,
                    paint,
                } => {
                    if self.set_fill(paint) {
                        ctx.begin_path();
                        if ctx
                            .arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)
                            .is_ok()
                        {
                            ctx.fill();
                        }
                    }
                }
                DrawCmd::Text {
                    text,
                    pos,
                    font,
                    color,
                    align,
                    baseline,
                } => {
                    ctx.set_font(&font.as_css());
                    ctx.set_fill_style_str(&color.as_css());
                    ctx.set_text_align(match align {
                        Align::Left => "left",
                        Align::Center => "center",
                    });
                    ctx.set_text_baseline(match baseline {
                        Baseline::Alphabetic => "alphabetic",
                        Baseline::Middle => "middle",
                    });
                    let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
                }
                DrawCmd::Image { id, src, dst } => {
                    if let Some(image) = &self.images[id.index()] {
                        let _ = ctx
                            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                                image,
                                src.x as f64,
                                src.y as f64,
                                src.w as f64,
                                src.h as f64,
                                dst.x as f64,
                                dst.y as f64,
                                dst.w as f64,
                                dst.h as f64,
                            );
                    }
                }
                DrawCmd::Noise { alpha, seed } => self.noise(*alpha, *seed),
            }
        }
    }

    fn rect_path(&self, rect: &Rect) {
        self.ctx
            .rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn gradient(&self, paint: &Paint) -> Option<CanvasGradient> {
        let (gradient, stops) = match paint {
            Paint::Solid(_) => return None,
            Paint::Linear { from, to, stops } => (
                self.ctx.create_linear_gradient(
                    from.x as f64,
                    from.y as f64,
                    to.x as f64,
                    to.y as f64,
                ),
                stops,
            ),
            Paint::Radial {
                center,
                inner,
                outer,
                stops,
            } => (
                self.ctx
                    .create_radial_gradient(
                        center.x as f64,
                        center.y as f64,
                        *inner as f64,
                        center.x as f64,
                        center.y as f64,
                        *outer as f64,
                    )
                    .ok()?,
                stops,
            ),
        };
        for (offset, color) in stops {
            gradient.add_color_stop(*offset, &color.as_css()).ok()?;
        }
        Some(gradient)
    }

    /// Set the fill style; false if the paint could not be built
    fn set_fill(&self, paint: &Paint) -> bool {
        match paint {
            Paint::Solid(color) => {
                self.ctx.set_fill_style_str(&color.as_css());
                true
            }
            _ => match self.gradient(paint) {
                Some(gradient) => {
                    self.ctx.set_fill_style_canvas_gradient(&gradient);
                    true
                }
                None => false,
            },
        }
    }

    /// Jitter sampled pixels by up to +/- alpha/2 of full scale
    fn noise(&self, alpha: f32, seed: u64) {
        let (w, h) = (CANVAS_WIDTH as u32, CANVAS_HEIGHT as u32);
        let Ok(image) = self.ctx.get_image_data(0.0, 0.0, w as f64, h as f64) else {
            return;
        };
        let mut data = image.data().0;
        let amount = alpha * 255.0;
        let mut rng = Pcg32::seed_from_u64(seed);
        for px in data.chunks_exact_mut(NOISE_STRIDE) {
            let jitter = (rng.random::<f32>() - 0.5) * amount;
            for channel in &mut px[..3] {
                *channel = (*channel as f32 + jitter).clamp(0.0, 255.0) as u8;
            }
        }
        if let Ok(noisy) = ImageData::new_with_u8_clamped_array_and_sh(Clamped(&data), w, h) {
            let _ = self.ctx.put_image_data(&noisy, 0.0, 0.0);
        }
    }
}
