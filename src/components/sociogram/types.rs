/// A character as the project store hands it to the sociogram.
#[derive(Clone, Debug, PartialEq)]
pub struct Character {
	/// Stable id, also the node id in the graph.
	pub id: String,
	/// Display name drawn under the node.
	pub name: String,
	/// Shown under the name while the node is hovered.
	pub role: String,
	/// URL or data URI of the portrait.
	pub image_url: Option<String>,
}

impl Character {
	/// A character without a portrait.
	pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			role: role.into(),
			image_url: None,
		}
	}

	/// Attaches a portrait.
	pub fn with_image(mut self, url: impl Into<String>) -> Self {
		self.image_url = Some(url.into());
		self
	}

	/// Glyph drawn when no portrait is available.
	pub fn initial(&self) -> String {
		self.name.chars().next().map(String::from).unwrap_or_default()
	}
}

/// A directed link between two characters.
#[derive(Clone, Debug, PartialEq)]
pub struct Relationship {
	/// Unique id.
	pub id: String,
	/// Character the link starts from.
	pub source_id: String,
	/// Character the link points at.
	pub target_id: String,
	/// Free text, e.g. "Rival" or "Older sibling".
	pub kind: String,
	/// Longer notes; not drawn.
	pub description: Option<String>,
}

impl Relationship {
	/// A relationship without a description.
	pub fn new(
		id: impl Into<String>,
		source_id: impl Into<String>,
		target_id: impl Into<String>,
		kind: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			source_id: source_id.into(),
			target_id: target_id.into(),
			kind: kind.into(),
			description: None,
		}
	}

	fn links(&self, a: &str, b: &str) -> bool {
		(self.source_id == a && self.target_id == b) || (self.source_id == b && self.target_id == a)
	}
}

/// Entity kinds the navigation callback understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
	/// A cast member.
	Character,
	/// A place in the story world.
	Location,
}

impl EntityKind {
	/// Lowercase name, as used in routes.
	pub fn as_str(self) -> &'static str {
		match self {
			EntityKind::Character => "character",
			EntityKind::Location => "location",
		}
	}
}

/// Colour band of an edge, picked from the relationship type text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelationCategory {
	Enemy,
	Ally,
	Romance,
	Family,
	Mentor,
	Neutral,
}

const CATEGORY_RULES: &[(RelationCategory, &[&str])] = &[
	(RelationCategory::Enemy, &["enemy", "rival", "hate"]),
	(RelationCategory::Ally, &["friend", "ally", "support"]),
	(RelationCategory::Romance, &["romance", "love", "married"]),
	(RelationCategory::Family, &["family", "sibling", "parent"]),
	(RelationCategory::Mentor, &["mentor", "teacher", "student"]),
];

impl RelationCategory {
	pub const ALL: [RelationCategory; 6] = [
		RelationCategory::Enemy,
		RelationCategory::Ally,
		RelationCategory::Romance,
		RelationCategory::Family,
		RelationCategory::Mentor,
		RelationCategory::Neutral,
	];

	/// First matching rule wins, so "friendly rival" is an enemy.
	pub fn classify(kind: &str) -> Self {
		let kind = kind.to_lowercase();
		CATEGORY_RULES
			.iter()
			.find(|(_, needles)| needles.iter().any(|n| kind.contains(n)))
			.map(|(category, _)| *category)
			.unwrap_or(RelationCategory::Neutral)
	}

	pub fn color(self) -> &'static str {
		match self {
			RelationCategory::Enemy => "#f43f5e",
			RelationCategory::Ally => "#10b981",
			RelationCategory::Romance => "#d946ef",
			RelationCategory::Family => "#3b82f6",
			RelationCategory::Mentor => "#8b5cf6",
			RelationCategory::Neutral => "#94a3b8",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			RelationCategory::Enemy => "Enemy",
			RelationCategory::Ally => "Ally",
			RelationCategory::Romance => "Romance",
			RelationCategory::Family => "Family",
			RelationCategory::Mentor => "Mentor",
			RelationCategory::Neutral => "Neutral",
		}
	}
}

/// Appends the incoming relationships whose endpoints are not linked in
/// `existing`, in either direction. Incoming links are only checked against
/// `existing`, not against each other.
pub fn merge_relationships(
	existing: &[Relationship],
	incoming: impl IntoIterator<Item = Relationship>,
) -> Vec<Relationship> {
	let mut merged = existing.to_vec();
	merged.extend(
		incoming
			.into_iter()
			.filter(|rel| !existing.iter().any(|r| r.links(&rel.source_id, &rel.target_id))),
	);
	merged
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn classify_matches_substrings_case_insensitively() {
		assert_eq!(RelationCategory::classify("Sworn ENEMY"), RelationCategory::Enemy);
		assert_eq!(RelationCategory::classify("Best friend"), RelationCategory::Ally);
		assert_eq!(RelationCategory::classify("Married"), RelationCategory::Romance);
		assert_eq!(RelationCategory::classify("Older sibling"), RelationCategory::Family);
		assert_eq!(RelationCategory::classify("Former student"), RelationCategory::Mentor);
		assert_eq!(RelationCategory::classify("Coworker"), RelationCategory::Neutral);
		assert_eq!(RelationCategory::classify(""), RelationCategory::Neutral);
	}

	#[test]
	fn classify_prefers_earlier_rules() {
		assert_eq!(RelationCategory::classify("Friendly rival"), RelationCategory::Enemy);
		assert_eq!(RelationCategory::classify("Love-struck parent"), RelationCategory::Romance);
		assert_eq!(RelationCategory::classify("Loving parent"), RelationCategory::Family);
	}

	#[test]
	fn initial_handles_multibyte_and_empty_names() {
		assert_eq!(Character::new("1", "Élodie", "lead").initial(), "É");
		assert_eq!(Character::new("2", "", "extra").initial(), "");
	}

	#[test]
	fn merge_skips_pairs_already_linked_either_way() {
		let existing = vec![Relationship::new("r1", "a", "b", "ally")];
		let merged = merge_relationships(
			&existing,
			vec![
				Relationship::new("r2", "b", "a", "rival"),
				Relationship::new("r3", "a", "c", "mentor"),
				Relationship::new("r4", "c", "a", "student"),
			],
		);
		let ids: Vec<_> = merged.iter().map(|r| r.id.as_str()).collect();
		assert_eq!(ids, ["r1", "r3", "r4"]);
	}

	#[test]
	fn merge_keeps_existing_list_untouched() {
		let existing = vec![
			Relationship::new("r1", "a", "b", "ally"),
			Relationship::new("r2", "a", "b", "rival"),
		];
		assert_eq!(merge_relationships(&existing, Vec::new()), existing);
	}
}
