use leptos::prelude::*;
use log::info;

use crate::components::sociogram::{
	Character, EntityKind, Relationship, SociogramCanvas, merge_relationships,
};

/// Demo cast shown until a project is loaded.
fn sample_cast() -> (Vec<Character>, Vec<Relationship>) {
	let characters = [
		("ada", "Ada Vance", "Protagonist"),
		("bram", "Bram Holt", "Mentor"),
		("cass", "Cass Ilari", "Antagonist"),
		("dov", "Dov Ilari", "Henchman"),
		("elin", "Elin Vance", "Sister"),
		("fen", "Fen Mora", "Love interest"),
		("gil", "Gil Sorrow", "Informant"),
	]
	.into_iter()
	.map(|(id, name, role)| Character::new(id, name, role))
	.collect();

	let relationships = [
		("ada", "bram", "Student"),
		("ada", "cass", "Sworn enemy"),
		("cass", "dov", "Sibling"),
		("ada", "elin", "Sibling"),
		("ada", "fen", "Love"),
		("bram", "cass", "Former ally"),
		("gil", "dov", "Rival"),
	]
	.into_iter()
	.enumerate()
	.map(|(i, (source, target, kind))| {
		Relationship::new(format!("r{}", i + 1), source, target, kind)
	})
	.collect();

	(characters, relationships)
}

/// Links a relationship analysis might suggest for the demo cast.
fn suggested_links() -> Vec<Relationship> {
	vec![
		Relationship::new("s1", "fen", "gil", "Old friend"),
		Relationship::new("s2", "cass", "ada", "Rival"),
		Relationship::new("s3", "elin", "bram", "Mentor"),
	]
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (sample_characters, sample_relationships) = sample_cast();
	let characters = RwSignal::new(sample_characters);
	let relationships = RwSignal::new(sample_relationships);
	let selected = RwSignal::new(None::<Character>);

	let on_navigate = move |(kind, id): (EntityKind, String)| {
		info!("open {} {}", kind.as_str(), id);
		let character = characters.with_untracked(|c| c.iter().find(|c| c.id == id).cloned());
		selected.set(character);
	};
	let on_update_relationships = move |next: Vec<Relationship>| relationships.set(next);
	let merge_suggestions = move |_| {
		relationships.update(|current| *current = merge_relationships(current, suggested_links()));
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<SociogramCanvas
					characters=characters
					relationships=relationships
					on_navigate=on_navigate
					on_update_relationships=on_update_relationships
					fullscreen=true
				/>
				<div class="graph-overlay">
					<h1>"Sociogram"</h1>
					<p class="subtitle">
						"Drag characters to reposition. Click one to open it. Scroll to zoom. Drag background to pan."
					</p>
					<button on:click=merge_suggestions>"Merge suggested links"</button>
					{move || {
						selected
							.get()
							.map(|c| {
								view! {
									<p class="selected-character">
										<strong>{c.name}</strong>
										" · "
										{c.role}
									</p>
								}
							})
					}}
				</div>
			</div>
		</ErrorBoundary>
	}
}
