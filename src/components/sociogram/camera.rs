use super::config::ViewConfig;

/// Screen = world * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl Camera {
	/// Scale 1 with `world_center` in the middle of the viewport.
	pub fn centered(viewport: (f64, f64), world_center: (f64, f64)) -> Self {
		let mut camera = Self::default();
		camera.reset(viewport, world_center);
		camera
	}

	pub fn to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.x += dx;
		self.y += dy;
	}

	/// Multiplies the scale by `factor`, keeping the world point under
	/// `(sx, sy)` fixed on screen.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64, view: &ViewConfig) {
		let (wx, wy) = self.to_world(sx, sy);
		self.k = view.clamp_scale(self.k * factor);
		self.x = sx - wx * self.k;
		self.y = sy - wy * self.k;
	}

	/// Scrolling up (negative delta) zooms in.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64, view: &ViewConfig) {
		let factor = if delta_y < 0.0 {
			view.wheel_zoom_factor
		} else {
			1.0 / view.wheel_zoom_factor
		};
		self.zoom_at(sx, sy, factor, view);
	}

	pub fn zoom_in(&mut self, viewport: (f64, f64), view: &ViewConfig) {
		self.zoom_at(viewport.0 / 2.0, viewport.1 / 2.0, view.button_zoom_factor, view);
	}

	pub fn zoom_out(&mut self, viewport: (f64, f64), view: &ViewConfig) {
		self.zoom_at(viewport.0 / 2.0, viewport.1 / 2.0, 1.0 / view.button_zoom_factor, view);
	}

	/// Back to scale 1, panned so `world_center` lands mid-viewport.
	pub fn reset(&mut self, viewport: (f64, f64), world_center: (f64, f64)) {
		*self = Self::default();
		let (cx, cy) = self.to_screen(world_center.0, world_center.1);
		self.pan_by(viewport.0 / 2.0 - cx, viewport.1 / 2.0 - cy);
	}
}
