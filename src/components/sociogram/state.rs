use log::debug;

use super::camera::Camera;
use super::config::{LayoutConfig, ViewConfig};
use super::curve::Curve;
use super::interaction::{Interaction, PointerOutcome};
use super::physics::{Edge, Node, Simulation};
use super::types::{Character, Relationship};

/// World units within which a click on empty canvas selects an edge.
pub const EDGE_PICK_RADIUS: f64 = 10.0;

/// Everything a sociogram frame reads or writes.
///
/// Each frame the drag override is applied first, then physics runs on the
/// remaining nodes, and only then is the frame rendered.
pub struct SociogramState {
	pub simulation: Simulation,
	pub camera: Camera,
	pub interaction: Interaction,
	pub view: ViewConfig,
	pub selected_edge: Option<String>,
	pub width: f64,
	pub height: f64,
}

impl SociogramState {
	pub fn new(
		characters: &[Character],
		relationships: &[Relationship],
		layout: LayoutConfig,
		view: ViewConfig,
		width: f64,
		height: f64,
	) -> Self {
		let camera = Camera::centered((width, height), layout.world_center);
		let mut simulation = Simulation::new(layout);
		simulation.sync(characters, relationships);

		Self {
			simulation,
			camera,
			interaction: Interaction::default(),
			view,
			selected_edge: None,
			width,
			height,
		}
	}

	/// Picks up a new character or relationship list without disturbing
	/// nodes that survive it.
	pub fn sync(&mut self, characters: &[Character], relationships: &[Relationship]) {
		self.simulation.sync(characters, relationships);
		if let Some(id) = &self.selected_edge {
			if !self.simulation.edges().iter().any(|e| &e.relationship_id == id) {
				self.selected_edge = None;
			}
		}
		if let Some(id) = &self.interaction.hovered {
			if self.simulation.node(id).is_none() {
				self.interaction.hovered = None;
			}
		}
	}

	pub fn frame(&mut self) {
		let pinned = self.interaction.drag_override();
		if let Some((id, x, y)) = pinned {
			self.simulation.pin(id, x, y);
		}
		self.simulation.tick(pinned.map(|(id, _, _)| id));
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		self.interaction
			.pointer_down(sx, sy, &self.camera, &self.simulation);
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		self.interaction.pointer_move(
			sx,
			sy,
			&mut self.camera,
			&mut self.simulation,
			&self.view,
		);
	}

	/// Returns the id of a character that was clicked, if any.
	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Option<String> {
		match self
			.interaction
			.pointer_up(sx, sy, &self.camera, &self.simulation)
		{
			PointerOutcome::Navigate(id) => Some(id),
			PointerOutcome::BackgroundClick(wx, wy) => {
				self.select_edge_at(wx, wy);
				None
			}
			PointerOutcome::None => None,
		}
	}

	pub fn pointer_leave(&mut self) {
		self.interaction.pointer_leave();
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		self.camera.wheel(sx, sy, delta_y, &self.view);
	}

	pub fn zoom_in(&mut self) {
		self.camera.zoom_in((self.width, self.height), &self.view);
	}

	pub fn zoom_out(&mut self) {
		self.camera.zoom_out((self.width, self.height), &self.view);
	}

	pub fn reset_view(&mut self) {
		self.camera.reset(
			(self.width, self.height),
			self.simulation.config().world_center,
		);
	}

	pub fn toggle_pause(&mut self) -> bool {
		let paused = self.simulation.toggle_pause();
		debug!(
			"sociogram: simulation {} at kinetic energy {:.4}",
			if paused { "paused" } else { "resumed" },
			self.simulation.kinetic_energy()
		);
		paused
	}

	pub fn curve(&self, edge: &Edge) -> Curve {
		let nodes = self.simulation.nodes();
		let (s, t) = (&nodes[edge.source], &nodes[edge.target]);
		Curve::between((s.x, s.y), (t.x, t.y))
	}

	/// Closest edge to a world point, within [`EDGE_PICK_RADIUS`].
	pub fn edge_at(&self, wx: f64, wy: f64) -> Option<&Edge> {
		self.simulation
			.edges()
			.iter()
			.map(|edge| (edge, self.curve(edge).distance_to((wx, wy), 24)))
			.filter(|(_, d)| *d < EDGE_PICK_RADIUS)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(edge, _)| edge)
	}

	/// Selects the edge under a world point; empty space clears the selection.
	pub fn select_edge_at(&mut self, wx: f64, wy: f64) {
		self.selected_edge = self.edge_at(wx, wy).map(|e| e.relationship_id.clone());
	}

	pub fn is_edge_selected(&self, edge: &Edge) -> bool {
		self.selected_edge.as_deref() == Some(edge.relationship_id.as_str())
	}

	pub fn edge_label_visible(&self, edge: &Edge) -> bool {
		let nodes = self.simulation.nodes();
		self.is_edge_selected(edge)
			|| self.interaction.is_hovered(&nodes[edge.source].id)
			|| self.interaction.is_hovered(&nodes[edge.target].id)
	}

	pub fn label_visible(&self, node: &Node) -> bool {
		self.interaction.is_hovered(&node.id) || self.camera.k > self.view.label_zoom_threshold
	}
}
