use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::avatar::AvatarCache;
use super::curve::{Curve, flow_param};
use super::state::SociogramState;

const HOVER_BLUE: &str = "#3b82f6";
const PARTICLE_RADIUS: f64 = 3.0;
const BADGE_HALF_WIDTH: f64 = 30.0;
const BADGE_HALF_HEIGHT: f64 = 10.0;

/// Draws one frame. `seconds` is wall-clock time and drives the flow particles.
pub fn render(
	state: &SociogramState,
	avatars: &AvatarCache,
	ctx: &CanvasRenderingContext2d,
	seconds: f64,
) {
	draw_background(state, ctx);
	ctx.save();
	let _ = ctx.translate(state.camera.x, state.camera.y);
	let _ = ctx.scale(state.camera.k, state.camera.k);
	draw_edges(state, ctx, seconds);
	draw_nodes(state, avatars, ctx);
	ctx.restore();
}

fn draw_background(state: &SociogramState, ctx: &CanvasRenderingContext2d) {
	let (w, h) = (state.width, state.height);
	ctx.clear_rect(0.0, 0.0, w, h);
	match ctx.create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, w) {
		Ok(gradient) => {
			let _ = gradient.add_color_stop(0.0, "#1e293b");
			let _ = gradient.add_color_stop(1.0, "#020617");
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		Err(_) => ctx.set_fill_style_str("#0f172a"),
	}
	ctx.fill_rect(0.0, 0.0, w, h);
}

fn draw_edges(state: &SociogramState, ctx: &CanvasRenderingContext2d, seconds: f64) {
	let t = flow_param(seconds, state.view.flow_speed);

	for edge in state.simulation.edges() {
		let curve = state.curve(edge);
		let color = edge.category.color();
		let selected = state.is_edge_selected(edge);

		ctx.begin_path();
		ctx.move_to(curve.start.0, curve.start.1);
		ctx.quadratic_curve_to(curve.control.0, curve.control.1, curve.end.0, curve.end.1);
		let (blur, width, alpha) = if selected {
			(15.0, 3.0, 1.0)
		} else {
			(5.0, 1.5, 0.6)
		};
		ctx.set_shadow_blur(blur);
		ctx.set_shadow_color(color);
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width);
		ctx.set_global_alpha(alpha);
		ctx.stroke();
		ctx.set_shadow_blur(0.0);
		ctx.set_global_alpha(1.0);

		let (px, py) = curve.point(t);
		ctx.begin_path();
		let _ = ctx.arc(px, py, PARTICLE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str("#ffffff");
		ctx.fill();

		if state.edge_label_visible(edge) {
			draw_badge(ctx, &curve, &edge.kind, color);
		}
	}
}

fn draw_badge(ctx: &CanvasRenderingContext2d, curve: &Curve, text: &str, color: &str) {
	let (mx, my) = curve.midpoint();
	let r = BADGE_HALF_HEIGHT;
	let inner = BADGE_HALF_WIDTH - r;

	ctx.begin_path();
	let _ = ctx.arc(mx - inner, my, r, PI / 2.0, 3.0 * PI / 2.0);
	let _ = ctx.arc(mx + inner, my, r, -PI / 2.0, PI / 2.0);
	ctx.close_path();
	ctx.set_fill_style_str(color);
	ctx.fill();

	ctx.set_fill_style_str("#ffffff");
	ctx.set_font("bold 10px Inter, sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(text, mx, my);
}

fn draw_nodes(state: &SociogramState, avatars: &AvatarCache, ctx: &CanvasRenderingContext2d) {
	for node in state.simulation.nodes() {
		let hovered = state.interaction.is_hovered(&node.id);
		let r = if hovered {
			node.radius * state.view.hover_scale
		} else {
			node.radius
		};
		let (x, y) = (node.x, node.y);

		if hovered {
			ctx.set_shadow_blur(20.0);
			ctx.set_shadow_color(HOVER_BLUE);
		} else {
			ctx.set_shadow_blur(0.0);
		}

		ctx.save();
		ctx.begin_path();
		let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
		ctx.close_path();
		ctx.clip();
		match avatars.ready(&node.id) {
			Some(img) => {
				let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
					img,
					x - r,
					y - r,
					r * 2.0,
					r * 2.0,
				);
			}
			None => {
				ctx.set_fill_style_str("#1e293b");
				ctx.fill();
				ctx.set_fill_style_str("#64748b");
				ctx.set_font("20px sans-serif");
				ctx.set_text_align("center");
				ctx.set_text_baseline("middle");
				let _ = ctx.fill_text(&node.character.initial(), x, y);
			}
		}
		ctx.restore();

		ctx.begin_path();
		let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
		ctx.set_line_width(if hovered { 4.0 } else { 2.0 });
		ctx.set_stroke_style_str(if hovered { HOVER_BLUE } else { "#ffffff" });
		ctx.stroke();

		if state.label_visible(node) {
			ctx.set_shadow_blur(4.0);
			ctx.set_shadow_color("black");
			ctx.set_fill_style_str("white");
			ctx.set_font("bold 12px Inter, sans-serif");
			ctx.set_text_align("center");
			ctx.set_text_baseline("alphabetic");
			let _ = ctx.fill_text(&node.character.name, x, y + r + 15.0);

			if hovered {
				ctx.set_font("10px Inter, sans-serif");
				ctx.set_fill_style_str("#cbd5e1");
				let _ = ctx.fill_text(&node.character.role, x, y + r + 28.0);
			}
		}
		ctx.set_shadow_blur(0.0);
	}
}
