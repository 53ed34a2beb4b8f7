//! Garden Drag and Drop
//!
//! Mouse-driven drag and drop for the garden grid: catalog plants are
//! dragged onto cells, planted cells are dragged onto the trash target.
//! A movement threshold tells a click (cell selection) from a drag.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// What is being dragged
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragSource {
    /// Catalog plant by id
    Plant(u32),
    /// Planted cell at (row, col)
    Cell { row: usize, col: usize },
}

/// Where it would land
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropTarget {
    Cell { row: usize, col: usize },
    Trash,
}

impl DragSource {
    /// Plants go onto cells, planted cells go to the trash
    pub fn accepts(&self, target: DropTarget) -> bool {
        match (self, target) {
            (DragSource::Plant(_), DropTarget::Cell { .. }) => true,
            (DragSource::Cell { .. }, DropTarget::Trash) => true,
            _ => false,
        }
    }
}

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    pub dragging_read: ReadSignal<Option<DragSource>>,
    pub dragging_write: WriteSignal<Option<DragSource>>,
    pub drop_target_read: ReadSignal<Option<DropTarget>>,
    pub drop_target_write: WriteSignal<Option<DropTarget>>,
    /// Set briefly after a drop so the trailing click is ignored
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Mousedown seen, threshold not crossed yet
    pub pending_read: ReadSignal<Option<DragSource>>,
    pub pending_write: WriteSignal<Option<DragSource>>,
    pub start_read: ReadSignal<(i32, i32)>,
    pub start_write: WriteSignal<(i32, i32)>,
}

/// Pixels the pointer must travel before a press becomes a drag
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// How long the click following a drop is swallowed
const CLICK_SUPPRESS_MS: u32 = 100;

/// Whether a pointer moved from `start` to `now` counts as a drag
pub fn exceeds_threshold(start: (i32, i32), now: (i32, i32)) -> bool {
    (now.0 - start.0).abs() > DRAG_THRESHOLD_PX || (now.1 - start.1).abs() > DRAG_THRESHOLD_PX
}

pub fn create_dnd_signals() -> DndSignals {
    let (dragging_read, dragging_write) = signal(None::<DragSource>);
    let (drop_target_read, drop_target_write) = signal(None::<DropTarget>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_read, pending_write) = signal(None::<DragSource>);
    let (start_read, start_write) = signal((0i32, 0i32));
    DndSignals {
        dragging_read,
        dragging_write,
        drop_target_read,
        drop_target_write,
        drag_just_ended_read,
        drag_just_ended_write,
        pending_read,
        pending_write,
        start_read,
        start_write,
    }
}

/// Reset all drag state and swallow the click that trails the mouseup
pub fn end_drag(dnd: &DndSignals) {
    dnd.dragging_write.set(None);
    dnd.drop_target_write.set(None);
    dnd.pending_write.set(None);
    dnd.drag_just_ended_write.set(true);

    let just_ended = dnd.drag_just_ended_write;
    Timeout::new(CLICK_SUPPRESS_MS, move || just_ended.set(false)).forget();
}

/// Attach a document-level mouse listener for the lifetime of the page
fn listen_on_document(event: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
    let listener = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(handler);
    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
    }
    listener.forget();
}

/// Mousedown handler for a draggable plant or cell
pub fn make_on_mousedown(dnd: DndSignals, source: DragSource) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        let on_control = ev.target().is_some_and(|t| {
            t.dyn_ref::<web_sys::HtmlInputElement>().is_some() || t.dyn_ref::<web_sys::HtmlButtonElement>().is_some()
        });
        if ev.button() != 0 || on_control {
            return;
        }
        dnd.pending_write.set(Some(source));
        dnd.start_write.set((ev.client_x(), ev.client_y()));
    }
}

fn bind_global_mousemove(dnd: DndSignals) {
    listen_on_document("mousemove", move |ev| {
        let Some(source) = dnd.pending_read.get_untracked() else {
            return;
        };
        if dnd.dragging_read.get_untracked().is_none()
            && exceeds_threshold(dnd.start_read.get_untracked(), (ev.client_x(), ev.client_y()))
        {
            dnd.dragging_write.set(Some(source));
        }
    });
}

/// Mouseenter handler marking `target` as the drop target when it fits
pub fn make_on_target_mouseenter(dnd: DndSignals, target: DropTarget) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_| {
        let accepted = dnd.dragging_read.get_untracked().is_some_and(|source| source.accepts(target));
        if accepted {
            dnd.drop_target_write.set(Some(target));
        }
    }
}

/// Mouseleave handler clearing the drop target while dragging
pub fn make_on_mouseleave(dnd: DndSignals) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_| {
        if dnd.dragging_read.get_untracked().is_some() {
            dnd.drop_target_write.set(None);
        }
    }
}

/// Bind global mouseup (drop detection) and mousemove (drag start)
pub fn bind_global_mouseup<F>(dnd: DndSignals, on_drop: F)
where
    F: Fn(DragSource, DropTarget) + Clone + 'static,
{
    listen_on_document("mouseup", move |_| {
        dnd.pending_write.set(None);
        let Some(source) = dnd.dragging_read.get_untracked() else {
            // plain click; the element's click handler runs
            return;
        };
        let target = dnd.drop_target_read.get_untracked();
        end_drag(&dnd);
        if let Some(target) = target {
            on_drop(source, target);
        }
    });

    bind_global_mousemove(dnd);
}
