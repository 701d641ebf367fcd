use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Element, MouseEvent, Window};

use super::error::SurfaceError;
use super::render;
use super::simulation::ForceConfig;
use super::state::ForceGraphState;
use super::types::GraphData;

type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;
type PointerCallback = Rc<RefCell<Option<Closure<dyn FnMut(MouseEvent)>>>>;

/// Steps the layout on animation frames, with at most one frame pending.
#[derive(Clone, Default)]
struct FrameLoop {
	callback: Callback,
	pending: Rc<Cell<bool>>,
}

impl FrameLoop {
	fn request(&self) -> Result<(), SurfaceError> {
		if self.pending.get() {
			return Ok(());
		}
		if let Some(ref cb) = *self.callback.borrow() {
			browser_window()?.request_animation_frame(cb.as_ref().unchecked_ref())?;
			self.pending.set(true);
		}
		Ok(())
	}
}

/// Window-level listeners that keep following a drag after the pointer
/// leaves the drawing surface, until the button is released.
#[derive(Clone, Default)]
struct DragTracking {
	surface: Rc<RefCell<Option<Element>>>,
	on_move: PointerCallback,
	on_up: PointerCallback,
}

impl DragTracking {
	fn attach(&self, surface: Element) -> Result<(), SurfaceError> {
		*self.surface.borrow_mut() = Some(surface);
		let win = browser_window()?;
		for (name, callback) in [("mousemove", &self.on_move), ("mouseup", &self.on_up)] {
			if let Some(ref cb) = *callback.borrow() {
				win.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref())?;
			}
		}
		Ok(())
	}

	fn detach(&self) -> Result<(), SurfaceError> {
		self.surface.borrow_mut().take();
		let win = browser_window()?;
		for (name, callback) in [("mousemove", &self.on_move), ("mouseup", &self.on_up)] {
			if let Some(ref cb) = *callback.borrow() {
				win.remove_event_listener_with_callback(name, cb.as_ref().unchecked_ref())?;
			}
		}
		Ok(())
	}
}

fn browser_window() -> Result<Window, SurfaceError> {
	web_sys::window().ok_or(SurfaceError::NoWindow)
}

fn window_size() -> Result<(f64, f64), SurfaceError> {
	let win = browser_window()?;
	let w = win.inner_width()?.as_f64().ok_or(SurfaceError::BadDimension("width"))?;
	let h = win.inner_height()?.as_f64().ok_or(SurfaceError::BadDimension("height"))?;
	Ok((w, h))
}

/// The `<svg>` enclosing the element a listener is attached to.
fn drag_surface(ev: &MouseEvent) -> Result<Element, SurfaceError> {
	let target: Element = ev
		.current_target()
		.ok_or(SurfaceError::NoTarget)?
		.dyn_into()
		.map_err(|_| SurfaceError::NoTarget)?;
	target.closest("svg")?.ok_or(SurfaceError::NoTarget)
}

/// Pointer offset relative to `surface`, along with its rendered size. The
/// offset may fall outside the surface.
fn pointer_offset(ev: &MouseEvent, surface: &Element) -> (f64, f64, f64, f64) {
	let rect = surface.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
		rect.width(),
		rect.height(),
	)
}

/// SVG force-directed graph with draggable nodes. The view box is centered
/// on the origin; with `fullscreen` it tracks the window size.
#[component]
pub fn ForceGraphSvg(
	/// Nodes and links to lay out, read once when the component is created.
	data: GraphData,
	/// Force tunables.
	#[prop(optional)]
	config: ForceConfig,
	/// Size the SVG to the window and follow resizes.
	#[prop(default = false)]
	fullscreen: bool,
	/// View box width when not fullscreen.
	#[prop(default = 960.0)]
	width: f64,
	/// View box height when not fullscreen.
	#[prop(default = 600.0)]
	height: f64,
) -> impl IntoView {
	let (width, height) = if fullscreen {
		window_size().unwrap_or_else(|err| {
			warn!("falling back to {width}x{height}: {err}");
			(width, height)
		})
	} else {
		(width, height)
	};

	let state = Rc::new(RefCell::new(ForceGraphState::new(
		&data,
		config,
		width,
		height,
	)));
	let (ids, links, positions) = {
		let s = state.borrow();
		(
			s.simulation.nodes().iter().map(|n| n.id.clone()).collect::<Vec<_>>(),
			s.simulation.links().collect::<Vec<_>>(),
			s.positions(),
		)
	};
	info!("force graph with {} nodes and {} links", ids.len(), links.len());

	let frame = RwSignal::new(positions);
	let size = RwSignal::new((width, height));
	let frames = FrameLoop::default();
	let resize_cb: Callback = Rc::new(RefCell::new(None));

	let (state_anim, frames_anim) = (state.clone(), frames.clone());
	*frames.callback.borrow_mut() = Some(Closure::new(move || {
		frames_anim.pending.set(false);
		let more = {
			let mut s = state_anim.borrow_mut();
			let more = s.tick();
			frame.set(s.positions());
			more
		};
		if more {
			if let Err(err) = frames_anim.request() {
				error!("cannot schedule layout frame: {err}");
			}
		}
	}));

	let (state_init, frames_init) = (state.clone(), frames.clone());
	Effect::new(move |_| {
		if fullscreen {
			let state_resize = state_init.clone();
			*resize_cb.borrow_mut() = Some(Closure::new(move || match window_size() {
				Ok((w, h)) => {
					state_resize.borrow_mut().resize(w, h);
					size.set((w, h));
				}
				Err(err) => warn!("resize ignored: {err}"),
			}));
			if let Some(ref cb) = *resize_cb.borrow() {
				let registered = browser_window().and_then(|win| {
					win.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
						.map_err(SurfaceError::from)
				});
				if let Err(err) = registered {
					warn!("cannot follow window resizes: {err}");
				}
			}
		}
		if let Err(err) = frames_init.request() {
			error!("cannot start layout: {err}");
		}
	});

	let tracking = DragTracking::default();

	let (state_mm, tracking_mm) = (state.clone(), tracking.clone());
	*tracking.on_move.borrow_mut() = Some(Closure::new(move |ev: MouseEvent| {
		let Some(surface) = tracking_mm.surface.borrow().clone() else {
			return;
		};
		let (sx, sy, w, h) = pointer_offset(&ev, &surface);
		let mut s = state_mm.borrow_mut();
		let (x, y) = s.screen_to_graph(sx, sy, w, h);
		s.drag_to(x, y);
	}));

	let (state_mu, tracking_mu) = (state.clone(), tracking.clone());
	*tracking.on_up.borrow_mut() = Some(Closure::new(move |_: MouseEvent| {
		state_mu.borrow_mut().drag_end();
		if let Err(err) = tracking_mu.detach() {
			warn!("cannot stop tracking drag: {err}");
		}
	}));

	let (state_md, frames_md) = (state.clone(), frames.clone());
	let on_grab = move |idx: usize, ev: MouseEvent| {
		ev.prevent_default();
		let surface = match drag_surface(&ev) {
			Ok(surface) => surface,
			Err(err) => {
				warn!("drag ignored: {err}");
				return;
			}
		};
		if !state_md.borrow_mut().drag_start(idx) {
			return;
		}
		if let Err(err) = tracking.attach(surface) {
			warn!("cannot track drag: {err}");
			state_md.borrow_mut().drag_end();
			return;
		}
		if let Err(err) = frames_md.request() {
			error!("cannot resume layout: {err}");
		}
	};

	let count = ids.len();
	view! {
		<svg
			class="force-graph-svg"
			width=move || size.get().0
			height=move || size.get().1
			viewBox=move || {
				let (w, h) = size.get();
				format!("{} {} {} {}", -w / 2.0, -h / 2.0, w, h)
			}
			style="display: block;"
		>
			{render::edges(links, frame)}
			{render::nodes(count, frame, on_grab)}
			{render::labels(ids, frame)}
		</svg>
	}
}
