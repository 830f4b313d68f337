use log::{info, warn};
use neo_orbit::bridge::protocol::ProtocolLayout;
use neo_orbit::{
    parse_lookup, BodyId, DrawTiming, ElementsError, EngineConfig, FrameData, InputEvent, NeoRecord,
    Renderer, RiskAssessment, SimulationDriver,
};

/// Renderer that serializes each frame into the flat float buffer the
/// TypeScript scene reads.
struct SharedBufferRenderer {
    layout: ProtocolLayout,
    buffer: Vec<f32>,
    frame_counter: u64,
    body_count: usize,
}

impl SharedBufferRenderer {
    fn new(layout: ProtocolLayout) -> Self {
        let buffer = layout.allocate();
        Self {
            layout,
            buffer,
            frame_counter: 0,
            body_count: 0,
        }
    }
}

impl Renderer for SharedBufferRenderer {
    fn backend(&self) -> &'static str {
        "shared-buffer"
    }

    fn draw(&mut self, frame: &FrameData) -> DrawTiming {
        self.frame_counter += 1;
        match self.layout.write_frame(&mut self.buffer, self.frame_counter, frame) {
            Some(count) => self.body_count = count,
            None => warn!("runner: frame buffer smaller than layout"),
        }
        DrawTiming::default()
    }

    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// Owns the simulation driver and the shared buffer for the browser.
///
/// `lib.rs` keeps one of these in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export a
/// struct holding trait objects directly.
pub struct SimulationRunner {
    driver: SimulationDriver,
    output: SharedBufferRenderer,
    progress_callback: Option<js_sys::Function>,
}

impl SimulationRunner {
    pub fn new(config: EngineConfig) -> Self {
        let layout = ProtocolLayout::from_config(&config);
        Self {
            driver: SimulationDriver::new(config),
            output: SharedBufferRenderer::new(layout),
            progress_callback: None,
        }
    }

    /// Build from a JSON config; malformed JSON falls back to defaults.
    pub fn from_json(json: Option<&str>) -> Self {
        let config = match json {
            Some(json) => EngineConfig::from_json(json).unwrap_or_else(|err| {
                warn!("runner: bad config ({err}), using defaults");
                EngineConfig::default()
            }),
            None => EngineConfig::default(),
        };
        Self::new(config)
    }

    pub fn set_progress_callback(&mut self, callback: Option<js_sys::Function>) {
        self.progress_callback = callback;
    }

    /// Animation callback. Returns `true` when a tick ran and the buffer changed.
    pub fn tick(&mut self, frame_dt: f32) -> bool {
        let Some(report) = self.driver.on_animation_frame(frame_dt) else {
            return false;
        };
        self.driver.render(&mut self.output);
        if let (Some(progress), Some(callback)) = (report.progress, &self.progress_callback) {
            let value = wasm_bindgen::JsValue::from_f64(progress as f64);
            if let Err(err) = callback.call1(&wasm_bindgen::JsValue::NULL, &value) {
                warn!("runner: progress callback threw: {err:?}");
            }
        }
        true
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.driver.push_input(event);
    }

    /// Start tracking a near-Earth object. Returns its body id, or -1 after teardown.
    pub fn track_neo(&mut self, key: &str, name: &str) -> i32 {
        self.driver
            .state_mut()
            .map(|s| s.track_neo(key, name).0 as i32)
            .unwrap_or(-1)
    }

    /// Feed a NeoWs lookup body fetched by the host page.
    pub fn load_neo_json(&mut self, key: &str, json: &str) -> bool {
        let Some(state) = self.driver.state_mut() else {
            return false;
        };
        state.resolve_neo(key, parse_lookup(json))
    }

    /// Report that the host page could not fetch an object.
    pub fn neo_failed(&mut self, key: &str, reason: &str) {
        if let Some(state) = self.driver.state_mut() {
            state.resolve_neo(key, Err(ElementsError::Fetch(reason.to_string())));
        }
    }

    pub fn untrack_neo(&mut self, key: &str) -> bool {
        self.driver
            .state_mut()
            .and_then(|s| s.roster.untrack(key))
            .is_some()
    }

    /// Stop all work. The host page must cancel its animation frame and
    /// detach listeners before disposing the scene; after this every call is a no-op.
    pub fn teardown(&mut self) {
        self.driver.teardown();
        self.progress_callback = None;
        info!("runner: teardown complete");
    }

    // ---- Buffer accessors for shared memory reads ----

    pub fn buffer_ptr(&self) -> *const f32 {
        self.output.buffer.as_ptr()
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.output.layout.buffer_total_floats as u32
    }

    pub fn max_bodies(&self) -> u32 {
        self.output.layout.max_bodies as u32
    }

    pub fn body_count(&self) -> u32 {
        self.output.body_count as u32
    }

    // ---- UI read accessors ----

    pub fn progress(&self) -> f32 {
        self.driver.state().time.progress_fraction()
    }

    pub fn is_playing(&self) -> bool {
        self.driver.state().time.is_playing()
    }

    pub fn speed(&self) -> f32 {
        self.driver.state().time.speed().multiplier() as f32
    }

    pub fn view_mode(&self) -> f32 {
        self.driver.state().view_mode().code()
    }

    pub fn selected_id(&self) -> f32 {
        BodyId::encode(self.driver.state().selection.selected)
    }

    pub fn current_days(&self) -> f64 {
        self.driver.state().time.current_days()
    }

    pub fn is_torn_down(&self) -> bool {
        self.driver.is_torn_down()
    }

    // ---- Per-body detail for the feed table ----

    /// Additive risk score of a loaded near-Earth object. `None` for planets
    /// and for objects still pending or failed.
    pub fn risk(&self, id: u32) -> Option<RiskAssessment> {
        self.driver.state().roster.record(BodyId(id)).map(NeoRecord::risk)
    }

    /// Orbit class label of an active body.
    pub fn orbit_class(&self, id: u32) -> Option<&'static str> {
        self.driver.state().roster.get(BodyId(id)).map(|body| body.class.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_orbit::bridge::protocol::{HEADER_BODY_COUNT, HEADER_FRAME_COUNTER, HEADER_PLAYING};
    use neo_orbit::RiskLevel;

    const NEO: &str = r#"{
        "id": "3542519",
        "name": "(2010 PK9)",
        "close_approach_data": [
            { "orbiting_body": "Earth", "miss_distance": { "kilometers": "6000000" } }
        ],
        "orbital_data": {
            "semi_major_axis": "1.12", "eccentricity": "0.25", "inclination": "4.1",
            "ascending_node_longitude": "120.0", "perihelion_argument": "80.0", "mean_anomaly": "12.0"
        }
    }"#;

    fn buffer(runner: &SimulationRunner) -> &[f32] {
        &runner.output.buffer
    }

    #[test]
    fn tick_fills_buffer() {
        let mut runner = SimulationRunner::new(EngineConfig::default());
        assert!(runner.tick(0.05));
        assert_eq!(buffer(&runner)[HEADER_FRAME_COUNTER], 1.0);
        assert_eq!(buffer(&runner)[HEADER_BODY_COUNT], 8.0);
        assert_eq!(buffer(&runner)[HEADER_PLAYING], 1.0);
        assert_eq!(runner.body_count(), 8);
    }

    #[test]
    fn loaded_neo_joins_next_tick() {
        let mut runner = SimulationRunner::new(EngineConfig::default());
        let id = runner.track_neo("3542519", "");
        assert_eq!(id, 8);
        assert!(runner.load_neo_json("3542519", NEO));
        runner.tick(0.05);
        assert_eq!(runner.body_count(), 9);
    }

    #[test]
    fn failed_fetch_is_not_fatal() {
        let mut runner = SimulationRunner::new(EngineConfig::default());
        runner.track_neo("1", "x");
        runner.neo_failed("1", "HTTP 503");
        assert!(!runner.load_neo_json("1", "{ not json"));
        runner.tick(0.05);
        assert_eq!(runner.body_count(), 8);
    }

    #[test]
    fn risk_and_class_reach_the_bridge() {
        let mut runner = SimulationRunner::new(EngineConfig::default());
        let id = runner.track_neo("3542519", "") as u32;
        assert_eq!(runner.risk(id), None);
        assert!(runner.load_neo_json("3542519", NEO));

        // Not hazardous, no size or speed, 6e6 km miss: only the distance band scores
        let risk = runner.risk(id).unwrap();
        assert_eq!(risk.score, 10);
        assert_eq!(risk.category, RiskLevel::Low);
        assert_eq!(runner.orbit_class(id), Some("Apollo"));

        // Planets have a class but no risk record
        assert_eq!(runner.risk(0), None);
        assert!(runner.orbit_class(0).is_some());
        assert_eq!(runner.orbit_class(999), None);
    }

    #[test]
    fn bad_config_falls_back_to_defaults() {
        let runner = SimulationRunner::from_json(Some("{ \"max_bodies\": \"many\" }"));
        assert_eq!(runner.max_bodies(), 64);
        let runner = SimulationRunner::from_json(Some("{ \"max_bodies\": 16 }"));
        assert_eq!(runner.max_bodies(), 16);
    }

    #[test]
    fn teardown_stops_everything() {
        let mut runner = SimulationRunner::new(EngineConfig::default());
        runner.tick(0.05);
        runner.teardown();
        assert!(!runner.tick(0.05));
        assert_eq!(runner.track_neo("2", "y"), -1);
        assert!(runner.is_torn_down());
        assert_eq!(buffer(&runner)[HEADER_FRAME_COUNTER], 1.0);
    }
}
