/// Sideways bend of an edge as a fraction of its length.
const BEND: f64 = 0.2;

/// Quadratic Bézier drawn for an edge. Bending every edge to its left keeps
/// A→B and B→A apart and hints at direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Curve {
	pub start: (f64, f64),
	pub control: (f64, f64),
	pub end: (f64, f64),
}

impl Curve {
	pub fn between(start: (f64, f64), end: (f64, f64)) -> Self {
		let (dx, dy) = (end.0 - start.0, end.1 - start.1);
		let control = (
			(start.0 + end.0) / 2.0 - dy * BEND,
			(start.1 + end.1) / 2.0 + dx * BEND,
		);
		Self {
			start,
			control,
			end,
		}
	}

	pub fn point(&self, t: f64) -> (f64, f64) {
		let mt = 1.0 - t;
		let (a, b, c) = (mt * mt, 2.0 * mt * t, t * t);
		(
			a * self.start.0 + b * self.control.0 + c * self.end.0,
			a * self.start.1 + b * self.control.1 + c * self.end.1,
		)
	}

	pub fn midpoint(&self) -> (f64, f64) {
		self.point(0.5)
	}

	/// Approximate distance from `p` to the curve, sampled at `samples + 1`
	/// evenly spaced parameters.
	pub fn distance_to(&self, p: (f64, f64), samples: usize) -> f64 {
		let samples = samples.max(1);
		(0..=samples)
			.map(|i| {
				let (x, y) = self.point(i as f64 / samples as f64);
				((x - p.0).powi(2) + (y - p.1).powi(2)).sqrt()
			})
			.fold(f64::INFINITY, f64::min)
	}
}

/// Position of the flow particle along its curve at wall-clock `seconds`.
pub fn flow_param(seconds: f64, speed: f64) -> f64 {
	(seconds * speed).rem_euclid(1.0)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn control_point_bends_left_of_direction() {
		let curve = Curve::between((0.0, 0.0), (100.0, 0.0));
		assert_eq!(curve.control, (50.0, 20.0));
		let back = Curve::between((100.0, 0.0), (0.0, 0.0));
		assert_eq!(back.control, (50.0, -20.0));
	}

	#[test]
	fn point_hits_endpoints_and_midpoint() {
		let curve = Curve::between((0.0, 0.0), (100.0, 0.0));
		assert_eq!(curve.point(0.0), (0.0, 0.0));
		assert_eq!(curve.point(1.0), (100.0, 0.0));
		assert_eq!(curve.midpoint(), (50.0, 10.0));
	}

	#[test]
	fn distance_to_curve() {
		let curve = Curve::between((0.0, 0.0), (100.0, 0.0));
		assert!(curve.distance_to((50.0, 10.0), 16) < 1e-9);
		assert!((curve.distance_to((50.0, 40.0), 16) - 30.0).abs() < 1e-9);
	}

	#[test]
	fn flow_param_wraps_into_unit_interval() {
		assert_eq!(flow_param(0.0, 1.0), 0.0);
		assert!((flow_param(12.25, 1.0) - 0.25).abs() < 1e-12);
		assert!((flow_param(1.5, 0.5) - 0.75).abs() < 1e-12);
		let t = flow_param(-0.25, 1.0);
		assert!((0.0..1.0).contains(&t));
	}
}
