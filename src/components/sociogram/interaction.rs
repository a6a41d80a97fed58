use super::camera::Camera;
use super::config::ViewConfig;
use super::physics::Simulation;

/// The pointer gesture in progress. Screen coordinates unless noted.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
	#[default]
	Idle,
	DraggingNode {
		id: String,
		press: (f64, f64),
		/// World point the node is held at: where it was pressed until the
		/// pointer first moves, the pointer itself after that.
		at: (f64, f64),
		/// Set once the pointer leaves the click threshold; never cleared.
		moved: bool,
	},
	Panning {
		press: (f64, f64),
		last: (f64, f64),
		moved: bool,
	},
}

/// What a released pointer amounts to.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerOutcome {
	None,
	/// A node was clicked rather than dragged.
	Navigate(String),
	/// Empty canvas was clicked rather than panned. World coordinates.
	BackgroundClick(f64, f64),
}

#[derive(Clone, Debug, Default)]
pub struct Interaction {
	pub gesture: Gesture,
	pub hovered: Option<String>,
}

fn beyond(a: (f64, f64), b: (f64, f64), threshold: f64) -> bool {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	dx * dx + dy * dy > threshold * threshold
}

impl Interaction {
	/// Starts a drag on the node under the pointer, or a pan. The pressed node
	/// stays where it is until the pointer moves.
	pub fn pointer_down(&mut self, sx: f64, sy: f64, camera: &Camera, sim: &Simulation) {
		let (wx, wy) = camera.to_world(sx, sy);
		self.gesture = match sim.node_at(wx, wy) {
			Some(node) => Gesture::DraggingNode {
				id: node.id.clone(),
				press: (sx, sy),
				at: (node.x, node.y),
				moved: false,
			},
			None => Gesture::Panning {
				press: (sx, sy),
				last: (sx, sy),
				moved: false,
			},
		};
	}

	pub fn pointer_move(
		&mut self,
		sx: f64,
		sy: f64,
		camera: &mut Camera,
		sim: &mut Simulation,
		view: &ViewConfig,
	) {
		match &mut self.gesture {
			Gesture::Idle => {}
			Gesture::DraggingNode { id, press, at, moved } => {
				*moved |= beyond(*press, (sx, sy), view.click_threshold);
				*at = camera.to_world(sx, sy);
				sim.pin(id, at.0, at.1);
			}
			Gesture::Panning { press, last, moved } => {
				*moved |= beyond(*press, (sx, sy), view.click_threshold);
				camera.pan_by(sx - last.0, sy - last.1);
				*last = (sx, sy);
			}
		}

		let (wx, wy) = camera.to_world(sx, sy);
		self.hovered = sim.node_at(wx, wy).map(|n| n.id.clone());
	}

	/// Ends the gesture. A node press counts as a click only if the pointer
	/// never left the click threshold and is released over that same node.
	pub fn pointer_up(&mut self, sx: f64, sy: f64, camera: &Camera, sim: &Simulation) -> PointerOutcome {
		let (wx, wy) = camera.to_world(sx, sy);
		match std::mem::take(&mut self.gesture) {
			Gesture::DraggingNode { id, moved: false, .. } => {
				match sim.node_at(wx, wy) {
					Some(node) if node.id == id => PointerOutcome::Navigate(id),
					_ => PointerOutcome::None,
				}
			}
			Gesture::Panning { moved: false, .. } => PointerOutcome::BackgroundClick(wx, wy),
			_ => PointerOutcome::None,
		}
	}

	/// The pointer left the canvas: drop the gesture without acting on it.
	pub fn pointer_leave(&mut self) {
		self.gesture = Gesture::Idle;
		self.hovered = None;
	}

	/// Node held by the pointer and the world point it is held at.
	pub fn drag_override(&self) -> Option<(&str, f64, f64)> {
		match &self.gesture {
			Gesture::DraggingNode { id, at, .. } => Some((id.as_str(), at.0, at.1)),
			_ => None,
		}
	}

	pub fn is_hovered(&self, id: &str) -> bool {
		self.hovered.as_deref() == Some(id)
	}

	pub fn cursor(&self) -> &'static str {
		match self.gesture {
			Gesture::DraggingNode { .. } | Gesture::Panning { .. } => "grabbing",
			Gesture::Idle if self.hovered.is_some() => "pointer",
			Gesture::Idle => "grab",
		}
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::components::sociogram::config::LayoutConfig;
	use crate::components::sociogram::types::Character;

	/// Two nodes at (0, 0) and (30, 0), screen == world.
	fn setup() -> (Interaction, Camera, Simulation) {
		let mut sim = Simulation::new(LayoutConfig::default());
		sim.sync(
			&[Character::new("a", "Ada", "lead"), Character::new("b", "Bo", "foil")],
			&[],
		);
		sim.pin("a", 0.0, 0.0);
		sim.pin("b", 30.0, 0.0);
		(Interaction::default(), Camera::default(), sim)
	}

	#[test]
	fn click_on_node_navigates_once() {
		let (mut input, camera, sim) = setup();
		input.pointer_down(-20.0, 0.0, &camera, &sim);
		assert_eq!(input.cursor(), "grabbing");
		assert_eq!(
			input.pointer_up(-20.0, 0.0, &camera, &sim),
			PointerOutcome::Navigate("a".into())
		);
		assert_eq!(input.gesture, Gesture::Idle);
		assert_eq!(input.pointer_up(-20.0, 0.0, &camera, &sim), PointerOutcome::None);
	}

	#[test]
	fn pressing_a_node_leaves_it_in_place() {
		let (mut input, camera, mut sim) = setup();
		input.pointer_down(-20.0, 0.0, &camera, &sim);
		assert_eq!(input.drag_override(), Some(("a", 0.0, 0.0)));
		let a = sim.node("a").unwrap();
		assert_eq!((a.x, a.y), (0.0, 0.0));

		sim.tick(input.drag_override().map(|(id, _, _)| id));
		assert_eq!(sim.node("a").map(|n| (n.x, n.y)), Some((0.0, 0.0)));
		assert_eq!(
			input.pointer_up(-20.0, 0.0, &camera, &sim),
			PointerOutcome::Navigate("a".into())
		);
	}

	#[test]
	fn jitter_within_threshold_is_still_a_click() {
		let (mut input, mut camera, mut sim) = setup();
		let view = ViewConfig::default();
		input.pointer_down(-20.0, 0.0, &camera, &sim);
		input.pointer_move(-18.0, 2.0, &mut camera, &mut sim, &view);
		assert_eq!(
			input.pointer_up(-18.0, 2.0, &camera, &sim),
			PointerOutcome::Navigate("a".into())
		);
	}

	#[test]
	fn drag_beyond_threshold_does_not_navigate() {
		let (mut input, mut camera, mut sim) = setup();
		let view = ViewConfig::default();
		input.pointer_down(-20.0, 0.0, &camera, &sim);
		input.pointer_move(-60.0, 0.0, &mut camera, &mut sim, &view);
		input.pointer_move(-90.0, 10.0, &mut camera, &mut sim, &view);
		input.pointer_move(-20.0, 0.0, &mut camera, &mut sim, &view);
		assert_eq!(input.pointer_up(-20.0, 0.0, &camera, &sim), PointerOutcome::None);
		assert_eq!(camera, Camera::default());
	}

	#[test]
	fn release_over_a_different_node_does_not_navigate() {
		let (mut input, mut camera, mut sim) = setup();
		let view = ViewConfig {
			click_threshold: 100.0,
			..ViewConfig::default()
		};
		input.pointer_down(-20.0, 0.0, &camera, &sim);
		input.pointer_move(60.0, 0.0, &mut camera, &mut sim, &view);
		assert_eq!(input.hovered.as_deref(), Some("b"));
		assert_eq!(input.pointer_up(60.0, 0.0, &camera, &sim), PointerOutcome::None);
	}

	#[test]
	fn dragging_pins_node_to_pointer() {
		let (mut input, _, mut sim) = setup();
		let mut camera = Camera { x: 100.0, y: 50.0, k: 2.0 };
		let view = ViewConfig::default();
		input.pointer_down(60.0, 50.0, &camera, &sim);
		input.pointer_move(300.0, 250.0, &mut camera, &mut sim, &view);
		assert_eq!(input.drag_override(), Some(("a", 100.0, 100.0)));
		let a = sim.node("a").unwrap();
		assert_eq!((a.x, a.y, a.vx, a.vy), (100.0, 100.0, 0.0, 0.0));
	}

	#[test]
	fn panning_follows_pointer_deltas() {
		let (mut input, mut camera, mut sim) = setup();
		let view = ViewConfig::default();
		input.pointer_down(500.0, 500.0, &camera, &sim);
		assert!(input.drag_override().is_none());
		input.pointer_move(510.0, 495.0, &mut camera, &mut sim, &view);
		input.pointer_move(530.0, 505.0, &mut camera, &mut sim, &view);
		assert_eq!((camera.x, camera.y), (30.0, 5.0));
		assert_eq!(input.pointer_up(530.0, 505.0, &camera, &sim), PointerOutcome::None);
		assert_eq!(sim.node("a").map(|n| (n.x, n.y)), Some((0.0, 0.0)));
	}

	#[test]
	fn background_click_reports_world_point() {
		let (mut input, _, sim) = setup();
		let camera = Camera { x: 10.0, y: 10.0, k: 2.0 };
		input.pointer_down(410.0, 210.0, &camera, &sim);
		assert_eq!(
			input.pointer_up(410.0, 210.0, &camera, &sim),
			PointerOutcome::BackgroundClick(200.0, 100.0)
		);
	}

	#[test]
	fn hover_tracks_pointer_independently_of_gesture() {
		let (mut input, mut camera, mut sim) = setup();
		let view = ViewConfig::default();
		assert_eq!(input.cursor(), "grab");
		input.pointer_move(40.0, 0.0, &mut camera, &mut sim, &view);
		assert!(input.is_hovered("b"));
		assert_eq!(input.cursor(), "pointer");
		input.pointer_move(200.0, 0.0, &mut camera, &mut sim, &view);
		assert_eq!(input.hovered, None);
	}

	#[test]
	fn leaving_the_canvas_cancels_the_gesture() {
		let (mut input, camera, sim) = setup();
		input.pointer_down(0.0, 0.0, &camera, &sim);
		input.hovered = Some("a".into());
		input.pointer_leave();
		assert_eq!(input.gesture, Gesture::Idle);
		assert_eq!(input.hovered, None);
		assert_eq!(input.pointer_up(0.0, 0.0, &camera, &sim), PointerOutcome::None);
	}

	proptest! {
		#[test]
		fn drag_overrides_physics(moves in prop::collection::vec((-400.0..400.0f64, -400.0..400.0f64), 1..20)) {
			let (mut input, mut camera, mut sim) = setup();
			let view = ViewConfig::default();
			input.pointer_down(-20.0, 0.0, &camera, &sim);
			for (sx, sy) in moves {
				input.pointer_move(sx, sy, &mut camera, &mut sim, &view);
				let pinned = input.drag_override().map(|(id, _, _)| id.to_owned());
				sim.tick(pinned.as_deref());
				let a = sim.node("a").unwrap();
				prop_assert_eq!((a.x, a.y, a.vx, a.vy), (sx, sy, 0.0, 0.0));
			}
		}
	}
}
