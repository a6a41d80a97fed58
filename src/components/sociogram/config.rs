/// Physics constants and the initial layout of the simulation.
///
/// The defaults are tuned for a few dozen characters at a node radius of 35.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Numerator of the inverse-square repulsion between every pair.
	pub repulsion: f64,
	/// Pairs further apart than this do not repel each other.
	pub repulsion_cutoff: f64,
	/// Added to the squared distance in the repulsion denominator.
	pub softening: f64,
	/// Rest length of an edge.
	pub spring_length: f64,
	/// Spring stiffness.
	pub spring_k: f64,
	/// Velocity multiplier applied after every integration step, below 1.
	pub damping: f64,
	/// Hit and draw radius of a node.
	pub node_radius: f64,
	/// Mass every node is created with.
	pub node_mass: f64,
	/// New characters are placed on a ring of this radius.
	pub seed_radius: f64,
	/// World-space point new nodes are seeded around and the camera resets onto.
	pub world_center: (f64, f64),
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			repulsion: 15_000.0,
			repulsion_cutoff: 800.0,
			softening: 100.0,
			spring_length: 250.0,
			spring_k: 0.005,
			damping: 0.92,
			node_radius: 35.0,
			node_mass: 1.0,
			seed_radius: 300.0,
			world_center: (0.0, 0.0),
		}
	}
}

/// Camera limits, pointer handling and label visibility.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
	/// Furthest zoom out.
	pub min_scale: f64,
	/// Furthest zoom in.
	pub max_scale: f64,
	/// Scale change per wheel notch.
	pub wheel_zoom_factor: f64,
	/// Scale change per zoom button press.
	pub button_zoom_factor: f64,
	/// Names are drawn for every node above this zoom level.
	pub label_zoom_threshold: f64,
	/// Screen pixels a press may travel and still count as a click.
	pub click_threshold: f64,
	/// Radius multiplier of the hovered node.
	pub hover_scale: f64,
	/// Curve traversals per second of the flow particle.
	pub flow_speed: f64,
}

impl Default for ViewConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.1,
			max_scale: 5.0,
			wheel_zoom_factor: 1.1,
			button_zoom_factor: 1.2,
			label_zoom_threshold: 0.8,
			click_threshold: 4.0,
			hover_scale: 1.1,
			flow_speed: 1.0,
		}
	}
}

impl ViewConfig {
	/// Clamps a scale into `[min_scale, max_scale]`.
	pub fn clamp_scale(&self, k: f64) -> f64 {
		k.clamp(self.min_scale, self.max_scale)
	}
}
