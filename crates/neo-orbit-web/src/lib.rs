//! Browser entry points.
//!
//! One `SimulationRunner` lives in a `thread_local!`. The host page calls
//! `neo_init`, drives `neo_tick` from `requestAnimationFrame`, forwards
//! pointer and UI events, and reads the shared buffer described by
//! `neo_orbit::bridge::protocol` after each tick.

pub mod runner;

use std::cell::RefCell;

use neo_orbit::InputEvent;
use wasm_bindgen::prelude::*;

pub use runner::SimulationRunner;

thread_local! {
    static RUNNER: RefCell<Option<SimulationRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner. Calls before init or after teardown are dropped.
fn with_runner<R>(f: impl FnOnce(&mut SimulationRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                // The logger may not be installed yet, so go straight to the console
                web_sys::console::warn_1(&"neo-orbit: runner not initialized".into());
                None
            }
        }
    })
}

#[wasm_bindgen]
pub fn neo_init(config_json: Option<String>) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = SimulationRunner::from_json(config_json.as_deref());
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("neo-orbit: initialized");
}

/// Drive from `requestAnimationFrame`. Returns `true` when the buffer was rewritten.
#[wasm_bindgen]
pub fn neo_tick(dt: f32) -> bool {
    with_runner(|r| r.tick(dt)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn neo_set_progress_callback(callback: Option<js_sys::Function>) {
    with_runner(|r| r.set_progress_callback(callback));
}

// ---- Input ----

#[wasm_bindgen]
pub fn neo_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn neo_pointer_up(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
}

#[wasm_bindgen]
pub fn neo_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn neo_pointer_leave() {
    with_runner(|r| r.push_input(InputEvent::PointerLeave));
}

#[wasm_bindgen]
pub fn neo_custom_event(kind: u32, a: f32, b: f32, c: f32) {
    with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
}

// ---- Tracked objects ----

#[wasm_bindgen]
pub fn neo_track(key: &str, name: &str) -> i32 {
    with_runner(|r| r.track_neo(key, name)).unwrap_or(-1)
}

#[wasm_bindgen]
pub fn neo_load_elements(key: &str, json: &str) -> bool {
    with_runner(|r| r.load_neo_json(key, json)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn neo_fetch_failed(key: &str, reason: &str) {
    with_runner(|r| r.neo_failed(key, reason));
}

#[wasm_bindgen]
pub fn neo_untrack(key: &str) -> bool {
    with_runner(|r| r.untrack_neo(key)).unwrap_or(false)
}

// ---- Buffer accessors ----

#[wasm_bindgen]
pub fn get_buffer_ptr() -> *const f32 {
    with_runner(|r| r.buffer_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_bodies() -> u32 {
    with_runner(|r| r.max_bodies()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_body_count() -> u32 {
    with_runner(|r| r.body_count()).unwrap_or(0)
}

// ---- UI state accessors ----

#[wasm_bindgen]
pub fn get_progress() -> f32 {
    with_runner(|r| r.progress()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_is_playing() -> bool {
    with_runner(|r| r.is_playing()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn get_speed() -> f32 {
    with_runner(|r| r.speed()).unwrap_or(1.0)
}

#[wasm_bindgen]
pub fn get_view_mode() -> f32 {
    with_runner(|r| r.view_mode()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_selected_id() -> f32 {
    with_runner(|r| r.selected_id()).unwrap_or(-1.0)
}

#[wasm_bindgen]
pub fn get_current_days() -> f64 {
    with_runner(|r| r.current_days()).unwrap_or(0.0)
}

// ---- Feed table accessors ----

/// Risk score of a loaded object, or -1 when none is known.
#[wasm_bindgen]
pub fn get_risk_score(id: u32) -> i32 {
    with_runner(|r| r.risk(id).map(|risk| risk.score as i32))
        .flatten()
        .unwrap_or(-1)
}

/// Risk category code (0 low, 1 medium, 2 high), or -1 when none is known.
#[wasm_bindgen]
pub fn get_risk_category(id: u32) -> f32 {
    with_runner(|r| r.risk(id).map(|risk| risk.category.code()))
        .flatten()
        .unwrap_or(-1.0)
}

#[wasm_bindgen]
pub fn get_orbit_class(id: u32) -> Option<String> {
    with_runner(|r| r.orbit_class(id).map(str::to_string)).flatten()
}

/// Stop ticking and drop the runner. Call after cancelling the animation
/// frame and detaching listeners, before disposing renderer resources.
#[wasm_bindgen]
pub fn neo_teardown() {
    RUNNER.with(|cell| {
        if let Some(mut runner) = cell.borrow_mut().take() {
            runner.teardown();
        }
    });
}
