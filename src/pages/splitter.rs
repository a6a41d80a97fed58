use leptos::prelude::*;
use log::warn;

use crate::manuscript::{ManuscriptStructure, SplitPatterns, split_manuscript};

/// Paste a manuscript, tune the heading patterns, inspect the skeleton.
#[component]
pub fn Splitter() -> impl IntoView {
	let defaults = SplitPatterns::default();
	let text = RwSignal::new(String::new());
	let act = RwSignal::new(defaults.act);
	let chapter = RwSignal::new(defaults.chapter);
	let scene = RwSignal::new(defaults.scene);
	let result = RwSignal::new(None::<Result<ManuscriptStructure, String>>);

	let split = move |_| {
		let patterns = SplitPatterns {
			act: act.get_untracked(),
			chapter: chapter.get_untracked(),
			scene: scene.get_untracked(),
		};
		let outcome = text.with_untracked(|t| split_manuscript(t, &patterns)).map_err(|err| {
			warn!("manuscript split failed: {}", err);
			err.to_string()
		});
		result.set(Some(outcome));
	};

	let renumber = move |_| {
		result.update(|r| {
			if let Some(Ok(structure)) = r {
				structure.renumber_chapters();
			}
		});
	};

	let pattern_input = move |label: &'static str, signal: RwSignal<String>| {
		view! {
			<label class="splitter-pattern">
				<span>{label}</span>
				<input
					type="text"
					prop:value=move || signal.get()
					on:input=move |ev| signal.set(event_target_value(&ev))
				/>
			</label>
		}
	};

	view! {
		<div class="splitter">
			<aside class="splitter-controls">
				<h2>"Splitter"</h2>
				{pattern_input("Act regex", act)}
				{pattern_input("Chapter regex", chapter)}
				{pattern_input("Scene regex", scene)}
				<button on:click=split>"Parse manuscript"</button>
				<button on:click=renumber>"Renumber chapters"</button>
			</aside>

			<main class="splitter-body">
				<textarea
					placeholder="Paste your entire manuscript here..."
					prop:value=move || text.get()
					on:input=move |ev| text.set(event_target_value(&ev))
				/>
				{move || {
					result
						.get()
						.map(|outcome| match outcome {
							Ok(structure) => view! { <Skeleton structure=structure /> }.into_any(),
							Err(message) => view! { <p class="splitter-error">{message}</p> }.into_any(),
						})
				}}
			</main>
		</div>
	}
}

#[component]
fn Skeleton(structure: ManuscriptStructure) -> impl IntoView {
	let summary = format!(
		"{} words · {} chapters · {} scenes",
		structure.total_words,
		structure.chapter_count(),
		structure.scene_count()
	);

	view! {
		<div class="splitter-skeleton">
			<p class="splitter-summary">{summary}</p>
			{structure
				.acts
				.into_iter()
				.map(|act| {
					view! {
						<section class="splitter-act">
							<h3>{act.title}</h3>
							{act
								.chapters
								.into_iter()
								.map(|chapter| {
									view! {
										<div class="splitter-chapter">
											<h4>{chapter.title} " · " {chapter.word_count} " W"</h4>
											<ul>
												{chapter
													.scenes
													.into_iter()
													.map(|scene| {
														let preview: String = scene.content.chars().take(60).collect();
														view! {
															<li>
																<strong>{scene.title}</strong>
																" "
																<span>{preview}</span>
															</li>
														}
													})
													.collect_view()}
											</ul>
										</div>
									}
								})
								.collect_view()}
						</section>
					}
				})
				.collect_view()}
		</div>
	}
}
