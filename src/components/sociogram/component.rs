use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement, MouseEvent, WheelEvent, Window,
};

use super::avatar::AvatarCache;
use super::config::{LayoutConfig, ViewConfig};
use super::render;
use super::state::SociogramState;
use super::types::{Character, EntityKind, RelationCategory, Relationship};

type SharedState = Rc<RefCell<Option<SociogramState>>>;
type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Force-directed relationship graph of a cast of characters.
///
/// Clicking a node calls `on_navigate`; the "Add link" form calls
/// `on_update_relationships` with the extended list and expects the new list
/// to come back through `relationships`.
#[component]
pub fn SociogramCanvas(
	#[prop(into)] characters: Signal<Vec<Character>>,
	#[prop(into)] relationships: Signal<Vec<Relationship>>,
	#[prop(into)] on_navigate: Callback<(EntityKind, String)>,
	#[prop(into)] on_update_relationships: Callback<Vec<Relationship>>,
	#[prop(optional)] layout: Option<LayoutConfig>,
	#[prop(optional)] view: Option<ViewConfig>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let avatars: Rc<RefCell<AvatarCache>> = Rc::new(RefCell::new(AvatarCache::default()));
	let animate: SharedClosure = Rc::new(RefCell::new(None));
	let resize_cb: SharedClosure = Rc::new(RefCell::new(None));
	let alive = Rc::new(Cell::new(true));
	let frame_id = Rc::new(Cell::new(0));
	let paused = RwSignal::new(false);

	let (state_init, avatars_init, animate_init, resize_cb_init) = (
		state.clone(),
		avatars.clone(),
		animate.clone(),
		resize_cb.clone(),
	);
	let (alive_init, frame_id_init) = (alive.clone(), frame_id.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = measure(&window, &canvas, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("sociogram: 2d canvas context unavailable");
			return;
		};

		let (chars, rels) = (characters.get_untracked(), relationships.get_untracked());
		*state_init.borrow_mut() = Some(SociogramState::new(
			&chars,
			&rels,
			layout.clone().unwrap_or_default(),
			view.clone().unwrap_or_default(),
			w,
			h,
		));
		info!("sociogram mounted with {} characters", chars.len());

		let (state_resize, canvas_resize, alive_resize) =
			(state_init.clone(), canvas.clone(), alive_init.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			if !alive_resize.get() {
				return;
			}
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = measure(&win, &canvas_resize, fullscreen, width, height);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, avatars_anim, animate_inner, alive_anim, frame_id_anim) = (
			state_init.clone(),
			avatars_init.clone(),
			animate_init.clone(),
			alive_init.clone(),
			frame_id_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !alive_anim.get() {
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.frame();
				render::render(s, &avatars_anim.borrow(), &ctx, js_sys::Date::now() / 1000.0);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				schedule_frame(cb, &frame_id_anim);
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			schedule_frame(cb, &frame_id_init);
		}
	});

	let (state_sync, avatars_sync) = (state.clone(), avatars.clone());
	Effect::new(move |_| {
		let (chars, rels) = (characters.get(), relationships.get());
		avatars_sync.borrow_mut().sync(&chars);
		if let Some(ref mut s) = *state_sync.borrow_mut() {
			s.sync(&chars, &rels);
		}
	});

	// on_cleanup wants Send + Sync; everything here lives on the one wasm thread.
	let teardown = SendWrapper::new((alive, frame_id, animate, resize_cb));
	on_cleanup(move || {
		let (alive, frame_id, animate, resize_cb) = &*teardown;
		alive.set(false);
		let resize = resize_cb.borrow_mut().take();
		if let Some(win) = web_sys::window() {
			let _ = win.cancel_animation_frame(frame_id.get());
			if let Some(cb) = &resize {
				let _ = win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		// The frame closure holds its own handle; dropping it here breaks the cycle.
		animate.borrow_mut().take();
		info!("sociogram unmounted");
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
			if let Some(canvas) = canvas_ref.get_untracked() {
				let canvas: HtmlCanvasElement = canvas.into();
				let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", s.interaction.cursor());
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let clicked = state_mu
			.borrow_mut()
			.as_mut()
			.and_then(|s| s.pointer_up(x, y));
		if let Some(id) = clicked {
			debug!("sociogram: navigate to character {}", id);
			on_navigate.run((EntityKind::Character, id));
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	let on_snapshot = move |_: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		match export_snapshot(&canvas) {
			Ok(()) => debug!("sociogram: snapshot exported"),
			Err(err) => warn!("sociogram: snapshot failed: {:?}", err),
		}
	};

	let zoom_in = with_state(&state, |s| s.zoom_in());
	let zoom_out = with_state(&state, |s| s.zoom_out());
	let reset_view = with_state(&state, |s| s.reset_view());
	let toggle_pause = with_state(&state, move |s| paused.set(s.toggle_pause()));

	view! {
		<div class="sociogram">
			<canvas
				node_ref=canvas_ref
				class="sociogram-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>

			<div class="sociogram-controls">
				<button title="Zoom in" on:click=zoom_in>"+"</button>
				<button title="Zoom out" on:click=zoom_out>"−"</button>
				<button title="Reset view" on:click=reset_view>"⤢"</button>
				<button
					title="Pause or resume the layout"
					class:paused=move || paused.get()
					on:click=toggle_pause
				>
					{move || if paused.get() { "▶" } else { "❚❚" }}
				</button>
				<button title="Save snapshot" on:click=on_snapshot>"📷"</button>
			</div>

			<NewLinkForm
				characters=characters
				relationships=relationships
				on_update_relationships=on_update_relationships
			/>
			<Legend />
		</div>
	}
}

/// Origin/target/type form appending a relationship to the list.
#[component]
fn NewLinkForm(
	characters: Signal<Vec<Character>>,
	relationships: Signal<Vec<Relationship>>,
	on_update_relationships: Callback<Vec<Relationship>>,
) -> impl IntoView {
	let open = RwSignal::new(false);
	let origin = RwSignal::new(String::new());
	let target = RwSignal::new(String::new());
	let kind = RwSignal::new(String::new());

	let create = move |_: MouseEvent| {
		let (source_id, target_id, kind_text) =
			(origin.get_untracked(), target.get_untracked(), kind.get_untracked());
		let kind_text = kind_text.trim();
		if source_id.is_empty() || target_id.is_empty() || kind_text.is_empty() {
			return;
		}
		let mut next = relationships.get_untracked();
		next.push(Relationship::new(new_relationship_id(), source_id, target_id, kind_text));
		on_update_relationships.run(next);
		open.set(false);
		origin.set(String::new());
		target.set(String::new());
		kind.set(String::new());
	};

	let options = move || {
		characters
			.get()
			.into_iter()
			.map(|c| view! { <option value=c.id>{c.name}</option> })
			.collect_view()
	};

	view! {
		<div class="sociogram-actions">
			<button on:click=move |_| open.set(true)>"+ Add link"</button>
		</div>
		<Show when=move || open.get()>
			<div class="sociogram-form">
				<div class="sociogram-form-header">
					<h3>"New connection"</h3>
					<button on:click=move |_| open.set(false)>"×"</button>
				</div>
				<select
					prop:value=move || origin.get()
					on:change=move |ev| origin.set(event_target_value(&ev))
				>
					<option value="">"Origin"</option>
					{options}
				</select>
				<select
					prop:value=move || target.get()
					on:change=move |ev| target.set(event_target_value(&ev))
				>
					<option value="">"Target"</option>
					{options}
				</select>
				<input
					type="text"
					placeholder="Type (e.g. Rival)"
					prop:value=move || kind.get()
					on:input=move |ev| kind.set(event_target_value(&ev))
				/>
				<button on:click=create>"Create link"</button>
			</div>
		</Show>
	}
}

#[component]
fn Legend() -> impl IntoView {
	view! {
		<div class="sociogram-legend">
			<div class="sociogram-legend-title">"Relationship types"</div>
			{RelationCategory::ALL
				.iter()
				.map(|category| {
					view! {
						<div class="sociogram-legend-item">
							<span
								class="sociogram-legend-swatch"
								style=format!("background: {}", category.color())
							></span>
							{category.label()}
						</div>
					}
				})
				.collect_view()}
		</div>
	}
}

fn with_state<F>(state: &SharedState, f: F) -> impl FnMut(MouseEvent) + use<F>
where
	F: Fn(&mut SociogramState) + 'static,
{
	let state = state.clone();
	move |_| {
		if let Some(ref mut s) = *state.borrow_mut() {
			f(s);
		}
	}
}

fn schedule_frame(cb: &Closure<dyn FnMut()>, frame_id: &Cell<i32>) {
	let Some(win) = web_sys::window() else {
		return;
	};
	if let Ok(id) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
		frame_id.set(id);
	}
}

fn measure(
	window: &Window,
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		let size = |v: Result<JsValue, JsValue>, fallback: f64| {
			v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
		};
		return (
			size(window.inner_width(), 800.0),
			size(window.inner_height(), 600.0),
		);
	}
	(
		width.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			canvas
				.parent_element()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn export_snapshot(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
	let url = canvas.to_data_url()?;
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| JsValue::from_str("no document"))?;
	let link: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	link.set_download(&format!("sociogram_{}.png", js_sys::Date::now() as u64));
	link.set_href(&url);
	link.click();
	Ok(())
}

fn new_relationship_id() -> String {
	format!(
		"rel-{:x}-{:08x}",
		js_sys::Date::now() as u64,
		(js_sys::Math::random() * f64::from(u32::MAX)) as u32
	)
}
