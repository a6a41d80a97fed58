use std::collections::HashMap;
use std::f64::consts::PI;

use log::debug;

use super::config::LayoutConfig;
use super::types::{Character, RelationCategory, Relationship};

/// A character as a point mass in world space.
#[derive(Clone, Debug)]
pub struct Node {
	pub id: String,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub radius: f64,
	pub mass: f64,
	/// Read-only copy of the character the node stands for.
	pub character: Character,
}

impl Node {
	pub fn contains(&self, wx: f64, wy: f64) -> bool {
		let (dx, dy) = (self.x - wx, self.y - wy);
		dx * dx + dy * dy < self.radius * self.radius
	}
}

/// A relationship whose endpoints both resolved to nodes.
#[derive(Clone, Debug)]
pub struct Edge {
	pub relationship_id: String,
	pub source: usize,
	pub target: usize,
	pub kind: String,
	pub category: RelationCategory,
}

pub struct Simulation {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	config: LayoutConfig,
	paused: bool,
	forces: Vec<(f64, f64)>,
}

impl Simulation {
	pub fn new(config: LayoutConfig) -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			config,
			paused: false,
			forces: Vec::new(),
		}
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn config(&self) -> &LayoutConfig {
		&self.config
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Re-derives nodes and edges from the current project data.
	///
	/// Nodes whose id already exists keep their position and velocity; new
	/// ones are seeded on a ring around the world centre at an angle given by
	/// their index.
	pub fn sync(&mut self, characters: &[Character], relationships: &[Relationship]) {
		let mut previous: HashMap<String, Node> =
			self.nodes.drain(..).map(|n| (n.id.clone(), n)).collect();
		let count = characters.len() as f64;
		let (cx, cy) = self.config.world_center;

		self.nodes = characters
			.iter()
			.enumerate()
			.map(|(i, character)| match previous.remove(&character.id) {
				Some(existing) => Node {
					character: character.clone(),
					..existing
				},
				None => {
					let angle = (i as f64 / count) * 2.0 * PI;
					Node {
						id: character.id.clone(),
						x: cx + angle.cos() * self.config.seed_radius,
						y: cy + angle.sin() * self.config.seed_radius,
						vx: 0.0,
						vy: 0.0,
						radius: self.config.node_radius,
						mass: self.config.node_mass,
						character: character.clone(),
					}
				}
			})
			.collect();

		self.rebuild_edges(relationships);
	}

	fn rebuild_edges(&mut self, relationships: &[Relationship]) {
		let index: HashMap<&str, usize> = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.as_str(), i))
			.collect();

		let edges: Vec<Edge> = relationships
			.iter()
			.filter_map(|rel| {
				let (&source, &target) = (
					index.get(rel.source_id.as_str())?,
					index.get(rel.target_id.as_str())?,
				);
				Some(Edge {
					relationship_id: rel.id.clone(),
					source,
					target,
					kind: rel.kind.clone(),
					category: RelationCategory::classify(&rel.kind),
				})
			})
			.collect();

		let skipped = relationships.len() - edges.len();
		debug!(
			"sociogram: {} nodes, {} edges, {} dangling relationships skipped",
			self.nodes.len(),
			edges.len(),
			skipped
		);
		self.edges = edges;
	}

	pub fn toggle_pause(&mut self) -> bool {
		self.paused = !self.paused;
		self.paused
	}

	/// Places a node at `(x, y)` and stops it. Returns false for unknown ids.
	pub fn pin(&mut self, id: &str, x: f64, y: f64) -> bool {
		match self.nodes.iter_mut().find(|n| n.id == id) {
			Some(node) => {
				node.x = x;
				node.y = y;
				node.vx = 0.0;
				node.vy = 0.0;
				true
			}
			None => false,
		}
	}

	/// Topmost node under a world-space point. Later nodes are drawn on top.
	pub fn node_at(&self, wx: f64, wy: f64) -> Option<&Node> {
		self.nodes.iter().rev().find(|n| n.contains(wx, wy))
	}

	pub fn kinetic_energy(&self) -> f64 {
		self.nodes.iter().map(|n| n.vx * n.vx + n.vy * n.vy).sum()
	}

	/// Advances the layout by one step. `pinned` names a node held by the
	/// pointer, which neither moves nor picks up velocity.
	pub fn tick(&mut self, pinned: Option<&str>) {
		if self.paused {
			return;
		}
		let mut forces = std::mem::take(&mut self.forces);
		forces.clear();
		forces.resize(self.nodes.len(), (0.0, 0.0));

		self.accumulate_repulsion(&mut forces);
		self.accumulate_springs(&mut forces);
		self.integrate(&forces, pinned);

		self.forces = forces;
	}

	/// All-pairs repulsion. Returns the number of pairs that interacted.
	pub fn accumulate_repulsion(&self, forces: &mut [(f64, f64)]) -> usize {
		let cutoff_sq = self.config.repulsion_cutoff * self.config.repulsion_cutoff;
		let mut pairs = 0;
		for i in 0..self.nodes.len() {
			for j in (i + 1)..self.nodes.len() {
				let (a, b) = (&self.nodes[i], &self.nodes[j]);
				let (dx, dy) = (b.x - a.x, b.y - a.y);
				let dist_sq = dx * dx + dy * dy;
				if dist_sq >= cutoff_sq {
					continue;
				}
				let dist = nonzero(dist_sq.sqrt());
				let f = self.config.repulsion / (dist_sq + self.config.softening);
				let (fx, fy) = (dx / dist * f, dy / dist * f);
				forces[i].0 -= fx;
				forces[i].1 -= fy;
				forces[j].0 += fx;
				forces[j].1 += fy;
				pairs += 1;
			}
		}
		pairs
	}

	/// Hookean springs pulling each edge toward the rest length.
	pub fn accumulate_springs(&self, forces: &mut [(f64, f64)]) {
		for edge in &self.edges {
			let (s, t) = (&self.nodes[edge.source], &self.nodes[edge.target]);
			let (dx, dy) = (t.x - s.x, t.y - s.y);
			let dist = nonzero((dx * dx + dy * dy).sqrt());
			let f = (dist - self.config.spring_length) * self.config.spring_k;
			let (fx, fy) = (dx / dist * f, dy / dist * f);
			forces[edge.source].0 += fx;
			forces[edge.source].1 += fy;
			forces[edge.target].0 -= fx;
			forces[edge.target].1 -= fy;
		}
	}

	fn integrate(&mut self, forces: &[(f64, f64)], pinned: Option<&str>) {
		let damping = self.config.damping;
		let center = self.config.world_center;
		for (node, &(fx, fy)) in self.nodes.iter_mut().zip(forces) {
			if pinned == Some(node.id.as_str()) {
				continue;
			}
			let inv_mass = if node.mass > 0.0 { 1.0 / node.mass } else { 1.0 };
			node.vx += fx * inv_mass;
			node.vy += fy * inv_mass;
			node.x += node.vx;
			node.y += node.vy;
			node.vx *= damping;
			node.vy *= damping;

			if !(node.vx.is_finite() && node.vy.is_finite()) {
				node.vx = 0.0;
				node.vy = 0.0;
			}
			if !(node.x.is_finite() && node.y.is_finite()) {
				(node.x, node.y) = center;
			}
		}
	}
}

fn nonzero(dist: f64) -> f64 {
	if dist == 0.0 { 1.0 } else { dist }
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	fn cast(ids: &[&str]) -> Vec<Character> {
		ids.iter().map(|id| Character::new(*id, id.to_uppercase(), "lead")).collect()
	}

	fn triangle() -> Simulation {
		let mut sim = Simulation::new(LayoutConfig::default());
		sim.sync(
			&cast(&["a", "b", "c"]),
			&[
				Relationship::new("r1", "a", "b", "ally"),
				Relationship::new("r2", "b", "c", "enemy"),
			],
		);
		sim
	}

	fn place(sim: &mut Simulation, positions: &[(f64, f64)]) {
		for (node, &(x, y)) in sim.nodes.iter_mut().zip(positions) {
			node.x = x;
			node.y = y;
		}
	}

	#[test]
	fn three_characters_two_relationships() {
		let sim = triangle();
		assert_eq!(sim.nodes().len(), 3);
		assert_eq!(sim.edges().len(), 2);
		assert_eq!(sim.edges()[0].category, RelationCategory::Ally);
		assert_eq!(sim.edges()[1].category, RelationCategory::Enemy);

		let mut forces = vec![(0.0, 0.0); 3];
		assert_eq!(sim.accumulate_repulsion(&mut forces), 3);
	}

	#[test]
	fn energy_falls_below_one_percent_of_peak_within_200_ticks() {
		let mut sim = triangle();
		let mut peak = 0.0_f64;
		for _ in 0..20 {
			sim.tick(None);
			peak = peak.max(sim.kinetic_energy());
		}
		assert!(peak > 0.0);
		for _ in 20..200 {
			sim.tick(None);
		}
		assert!(sim.kinetic_energy() < 0.01 * peak);
	}

	#[test]
	fn energy_decays_monotonically_once_settling() {
		let mut sim = triangle();
		for _ in 0..150 {
			sim.tick(None);
		}
		let mut last = sim.kinetic_energy();
		for _ in 150..600 {
			sim.tick(None);
			let energy = sim.kinetic_energy();
			assert!(energy < last, "energy rose from {last} to {energy}");
			last = energy;
		}
		assert!(last < 1e-3);
	}

	#[test]
	fn dangling_relationships_are_skipped() {
		let mut sim = Simulation::new(LayoutConfig::default());
		let relationships = [
			Relationship::new("r1", "a", "b", "ally"),
			Relationship::new("r2", "a", "ghost", "rival"),
			Relationship::new("r3", "ghost", "b", "rival"),
			Relationship::new("r4", "c", "a", "family"),
			Relationship::new("r5", "nobody", "ghost", "love"),
		];
		sim.sync(&cast(&["a", "b", "c"]), &relationships);
		let ids: Vec<_> = sim.edges().iter().map(|e| e.relationship_id.as_str()).collect();
		assert_eq!(ids, ["r1", "r4"]);
	}

	#[test]
	fn new_nodes_are_seeded_on_a_ring_around_the_world_center() {
		let config = LayoutConfig {
			world_center: (500.0, -200.0),
			..LayoutConfig::default()
		};
		let mut sim = Simulation::new(config);
		sim.sync(&cast(&["a", "b", "c", "d"]), &[]);
		let expected = [(800.0, -200.0), (500.0, 100.0), (200.0, -200.0), (500.0, -500.0)];
		for (node, (x, y)) in sim.nodes().iter().zip(expected) {
			assert!((node.x - x).abs() < 1e-9 && (node.y - y).abs() < 1e-9);
			assert_eq!(node.radius, 35.0);
		}
	}

	#[test]
	fn resync_keeps_existing_state_and_seeds_newcomers() {
		let mut sim = triangle();
		for _ in 0..10 {
			sim.tick(None);
		}
		let before = sim.node("b").cloned().unwrap();

		let mut characters = cast(&["b", "a", "c", "d"]);
		characters[0].name = "Renamed".into();
		sim.sync(&characters, &[Relationship::new("r1", "a", "d", "ally")]);

		let after = sim.node("b").unwrap();
		assert_eq!((after.x, after.y, after.vx, after.vy), (before.x, before.y, before.vx, before.vy));
		assert_eq!(after.character.name, "Renamed");
		let d = sim.node("d").unwrap();
		assert_eq!((d.vx, d.vy), (0.0, 0.0));
		assert_eq!(sim.edges()[0].source, 1);
		assert_eq!(sim.edges()[0].target, 3);
	}

	#[test]
	fn removed_characters_lose_their_nodes() {
		let mut sim = triangle();
		sim.sync(&cast(&["a", "c"]), &[Relationship::new("r1", "a", "b", "ally")]);
		assert_eq!(sim.nodes().len(), 2);
		assert!(sim.edges().is_empty());
	}

	#[test]
	fn paused_tick_changes_nothing() {
		let mut sim = triangle();
		sim.tick(None);
		let snapshot: Vec<_> = sim.nodes().iter().map(|n| (n.x, n.y, n.vx, n.vy)).collect();
		assert!(sim.toggle_pause());
		sim.tick(None);
		let after: Vec<_> = sim.nodes().iter().map(|n| (n.x, n.y, n.vx, n.vy)).collect();
		assert_eq!(snapshot, after);
		assert!(!sim.toggle_pause());
	}

	#[test]
	fn pinned_node_stays_put_with_zero_velocity() {
		let mut sim = triangle();
		assert!(sim.pin("b", 40.0, 60.0));
		for _ in 0..5 {
			sim.tick(Some("b"));
		}
		let b = sim.node("b").unwrap();
		assert_eq!((b.x, b.y, b.vx, b.vy), (40.0, 60.0, 0.0, 0.0));
		assert!(!sim.pin("nobody", 0.0, 0.0));
	}

	#[test]
	fn isolated_nodes_still_repel() {
		let mut sim = Simulation::new(LayoutConfig::default());
		sim.sync(&cast(&["a", "b"]), &[]);
		place(&mut sim, &[(0.0, 0.0), (50.0, 0.0)]);
		sim.tick(None);
		assert!(sim.nodes()[0].x < 0.0);
		assert!(sim.nodes()[1].x > 50.0);
	}

	#[test]
	fn pairs_beyond_cutoff_do_not_interact() {
		let mut sim = Simulation::new(LayoutConfig::default());
		sim.sync(&cast(&["a", "b"]), &[]);
		place(&mut sim, &[(0.0, 0.0), (900.0, 0.0)]);
		let mut forces = vec![(0.0, 0.0); 2];
		assert_eq!(sim.accumulate_repulsion(&mut forces), 0);
		assert_eq!(forces, vec![(0.0, 0.0); 2]);
	}

	#[test]
	fn coincident_nodes_stay_finite() {
		let mut sim = Simulation::new(LayoutConfig::default());
		sim.sync(&cast(&["a", "b"]), &[Relationship::new("r", "a", "b", "love")]);
		place(&mut sim, &[(10.0, 10.0), (10.0, 10.0)]);
		sim.tick(None);
		assert!(sim.nodes().iter().all(|n| n.x.is_finite() && n.y.is_finite()));
	}

	#[test]
	fn spring_pulls_stretched_edge_together() {
		let mut sim = Simulation::new(LayoutConfig::default());
		sim.sync(&cast(&["a", "b"]), &[Relationship::new("r", "a", "b", "ally")]);
		place(&mut sim, &[(0.0, 0.0), (400.0, 0.0)]);
		let mut forces = vec![(0.0, 0.0); 2];
		sim.accumulate_springs(&mut forces);
		assert!((forces[0].0 - 0.75).abs() < 1e-12);
		assert!((forces[1].0 + 0.75).abs() < 1e-12);
	}

	#[test]
	fn hit_test_prefers_topmost_node() {
		let mut sim = Simulation::new(LayoutConfig::default());
		sim.sync(&cast(&["a", "b"]), &[]);
		place(&mut sim, &[(0.0, 0.0), (20.0, 0.0)]);
		assert_eq!(sim.node_at(10.0, 0.0).map(|n| n.id.as_str()), Some("b"));
		assert_eq!(sim.node_at(-30.0, 0.0).map(|n| n.id.as_str()), Some("a"));
		assert!(sim.node_at(-35.0, 0.0).is_none());
	}

	proptest! {
		#[test]
		fn repulsion_is_equal_and_opposite(
			ax in -500.0..500.0f64, ay in -500.0..500.0f64,
			bx in -500.0..500.0f64, by in -500.0..500.0f64,
		) {
			let mut sim = Simulation::new(LayoutConfig::default());
			sim.sync(&cast(&["a", "b"]), &[]);
			place(&mut sim, &[(ax, ay), (bx, by)]);
			let mut forces = vec![(0.0, 0.0); 2];
			sim.accumulate_repulsion(&mut forces);
			prop_assert!((forces[0].0 + forces[1].0).abs() < 1e-12);
			prop_assert!((forces[0].1 + forces[1].1).abs() < 1e-12);
		}
	}
}
