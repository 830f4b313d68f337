//! The per-tick step function.
//!
//! `SimulationState` owns every piece of mutable engine state. One call to
//! `advance` applies queued input, moves the clock, propagates every body,
//! re-tests picking, resolves and eases the camera, and refills the body
//! buffer. Nothing here touches a rendering context, so a test harness can
//! drive it exactly like the browser loop does.

use glam::{Vec2, Vec3};
use log::debug;

use crate::api::config::EngineConfig;
use crate::api::types::BodyId;
use crate::camera::rig::{CameraRig, Projection};
use crate::camera::view::{resolve, CameraPose, ViewMode};
use crate::core::clock::{SimulationClock, TimeController};
use crate::core::roster::BodyRoster;
use crate::data::neows::{ElementsError, NeoRecord};
use crate::input::queue::{InputEvent, PointerState, UiCommand};
use crate::orbit::propagator::{propagate, Propagation};
use crate::renderer::instance::{BodyBuffer, BodyInstance, FLAG_DEGENERATE, FLAG_HOVERED, FLAG_SELECTED};
use crate::renderer::traits::FrameData;
use crate::selection::picking::{nearest_hit, BodyProxy, Ray, RayCaster, SelectionState};

/// Where one body is this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPosition {
    pub id: BodyId,
    pub propagation: Propagation,
}

/// Summary of one tick, for the UI and the host loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub clock: SimulationClock,
    pub progress: f32,
    pub view_mode: ViewMode,
    pub selection: SelectionState,
    /// Pose the camera is easing toward.
    pub desired_camera: CameraPose,
    /// Pose after this tick's easing.
    pub camera: CameraPose,
    pub selection_changed: bool,
    pub body_count: usize,
}

pub struct SimulationState {
    config: EngineConfig,
    pub time: TimeController,
    pub roster: BodyRoster,
    pub selection: SelectionState,
    view_mode: ViewMode,
    rig: CameraRig,
    pointer: PointerState,
    positions: Vec<BodyPosition>,
    bodies: BodyBuffer,
    clicks: Vec<Vec2>,
}

impl SimulationState {
    pub fn new(config: EngineConfig) -> Self {
        let time = TimeController::from_config(&config);
        let rig = CameraRig::new(
            CameraPose::new(Vec3::ZERO, config.overview_position),
            Projection::from_config(&config),
            config.camera_smoothing,
        );
        let bodies = BodyBuffer::new(config.max_bodies);
        Self {
            time,
            roster: BodyRoster::new(),
            selection: SelectionState::new(),
            view_mode: ViewMode::default(),
            rig,
            pointer: PointerState::default(),
            positions: Vec::new(),
            bodies,
            clicks: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if mode != self.view_mode {
            debug!("view: {:?} -> {:?}", self.view_mode, mode);
            self.view_mode = mode;
        }
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Positions from the last tick, in roster order.
    pub fn positions(&self) -> &[BodyPosition] {
        &self.positions
    }

    pub fn position_of(&self, id: BodyId) -> Option<Propagation> {
        self.positions.iter().find(|p| p.id == id).map(|p| p.propagation)
    }

    /// Body instances from the last tick.
    pub fn bodies(&self) -> &BodyBuffer {
        &self.bodies
    }

    pub fn track_neo(&mut self, key: &str, name: &str) -> BodyId {
        self.roster.track_neo(key, name)
    }

    /// Hand a fetch result to the roster. The body list is re-derived on the next tick.
    pub fn resolve_neo(&mut self, key: &str, result: Result<NeoRecord, ElementsError>) -> bool {
        self.roster.resolve(key, result)
    }

    /// Apply one validated UI setter.
    pub fn apply(&mut self, command: UiCommand) -> bool {
        match command {
            UiCommand::TogglePlay => self.time.toggle(),
            UiCommand::SetPlaying(true) => self.time.play(),
            UiCommand::SetPlaying(false) => self.time.pause(),
            UiCommand::SetSpeed(speed) => self.time.set_speed(speed),
            UiCommand::Scrub(fraction) => {
                self.time.scrub(fraction);
            }
            UiCommand::SetViewMode(mode) => self.set_view_mode(mode),
            UiCommand::Select(id) => {
                return self.selection.select(id, |id| self.roster.contains(id));
            }
            UiCommand::ClearSelection => {
                let had = self.selection.selected.is_some();
                self.selection.clear();
                return had;
            }
            UiCommand::Resize(aspect) => self.rig.projection.set_aspect(aspect),
        }
        false
    }

    /// Advance one tick of `dt` seconds with the events queued since the last tick.
    pub fn advance(&mut self, dt: f32, events: &[InputEvent], caster: &dyn RayCaster) -> FrameOutput {
        let mut selection_changed = false;

        // 1. Input, through the same setters the UI uses
        self.clicks.clear();
        for event in events {
            match *event {
                InputEvent::Custom { kind, a, b, c } => {
                    if let Some(command) = UiCommand::from_custom(kind, a, b, c) {
                        selection_changed |= self.apply(command);
                    }
                }
                _ => {
                    if let Some(click) = self.pointer.apply(event, self.config.drag_threshold) {
                        self.clicks.push(click);
                    }
                }
            }
        }

        // 2. Clock
        self.time.tick(dt as f64);
        let days = self.time.current_days();

        // 3. Propagate every active body
        self.positions.clear();
        self.positions.extend(self.roster.active().iter().map(|body| BodyPosition {
            id: body.id,
            propagation: propagate(&body.elements, days),
        }));

        // 4. Picking against the pose currently on screen
        let proxies: Vec<BodyProxy> = self
            .roster
            .active()
            .iter()
            .zip(&self.positions)
            .map(|(body, pos)| BodyProxy {
                id: body.id,
                center: pos.propagation.position(),
                radius: body.display_radius.max(self.config.hit_radius),
            })
            .collect();
        let pose = self.rig.pose();
        let pick = |ndc: Vec2| {
            Ray::from_ndc(ndc, &pose, &self.rig.projection).and_then(|ray| nearest_hit(caster, &ray, &proxies))
        };
        let hovered = self.pointer.position.and_then(&pick);
        self.selection.hover(hovered);
        for click in &self.clicks {
            selection_changed |= self.selection.click(pick(*click));
        }

        // 5. Camera
        let located: Vec<(BodyId, Vec3)> = self
            .positions
            .iter()
            .map(|p| (p.id, p.propagation.position()))
            .collect();
        let selected = self.selection.effective_selected(|id| self.roster.contains(id));
        let desired = resolve(self.view_mode, selected, &located, &self.config);
        let camera = self.rig.follow(desired, dt);

        // 6. Render instances
        self.fill_bodies();

        FrameOutput {
            clock: self.time.clock(),
            progress: self.time.progress_fraction(),
            view_mode: self.view_mode,
            selection: self.selection,
            desired_camera: desired,
            camera,
            selection_changed,
            body_count: self.positions.len(),
        }
    }

    fn fill_bodies(&mut self) {
        self.bodies.clear();
        let mut dropped = 0;
        for (body, pos) in self.roster.active().iter().zip(&self.positions) {
            let mut flags = 0;
            if self.selection.selected == Some(body.id) {
                flags |= FLAG_SELECTED;
            }
            if self.selection.hovered == Some(body.id) {
                flags |= FLAG_HOVERED;
            }
            if pos.propagation.is_degenerate() {
                flags |= FLAG_DEGENERATE;
            }
            let at = pos.propagation.position();
            let pushed = self.bodies.push(BodyInstance {
                x: at.x,
                y: at.y,
                z: at.z,
                radius: body.display_radius,
                id: BodyId::encode(Some(body.id)),
                kind: body.kind.code(),
                class_warning: BodyInstance::pack_class_warning(body.class.code(), body.warning.code()),
                flags: flags as f32,
            });
            if !pushed {
                dropped += 1;
            }
        }
        if dropped > 0 {
            debug!("render: body buffer full, {dropped} bodies not drawn");
        }
    }

    /// Renderer view of the last tick.
    pub fn frame_data(&self) -> FrameData<'_> {
        FrameData {
            bodies: &self.bodies.instances,
            camera: self.rig.pose(),
            view_projection: self.rig.view_projection(),
            clock: self.time.clock(),
            view_mode: self.view_mode,
            selection: self.selection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::queue::kinds;
    use crate::orbit::elements::OrbitalElements;
    use crate::orbit::planets::{EARTH, MARS, PLANET_COUNT};
    use crate::orbit::propagator::Degenerate;
    use crate::selection::picking::SphereCaster;

    const EARTH_ID: BodyId = BodyId(EARTH as u32);
    const DT: f32 = 0.033;

    fn state() -> SimulationState {
        let config = EngineConfig {
            camera_smoothing: 0.0,
            ..EngineConfig::default()
        };
        let mut s = SimulationState::new(config.clone());
        s.time = TimeController::from_config(&config).paused_at(0.0);
        s.advance(DT, &[], &SphereCaster);
        s
    }

    fn neo(a: f64, e: f64) -> NeoRecord {
        NeoRecord {
            neo_id: "x".into(),
            name: "x".into(),
            jpl_url: None,
            hazardous: false,
            diameter_m: None,
            miss_distance_km: Some(1.0e6),
            velocity_kps: None,
            close_approach_date: None,
            epoch_osculation: None,
            elements: OrbitalElements::planar(a, e),
        }
    }

    fn ndc_of(s: &SimulationState, id: BodyId) -> Vec2 {
        let at = s.position_of(id).unwrap().position();
        let p = s.rig().view_projection().project_point3(at);
        Vec2::new(p.x, p.y)
    }

    fn click_at(p: Vec2) -> [InputEvent; 2] {
        [
            InputEvent::PointerDown { x: p.x, y: p.y },
            InputEvent::PointerUp { x: p.x, y: p.y },
        ]
    }

    #[test]
    fn advance_propagates_all_planets() {
        let s = state();
        assert_eq!(s.positions().len(), PLANET_COUNT);
        assert_eq!(s.bodies().instance_count() as usize, PLANET_COUNT);
        let earth = s.position_of(EARTH_ID).unwrap().position();
        assert!((earth.length() - 20.0).abs() < 1.0, "earth at {earth}");
    }

    #[test]
    fn scrub_command_moves_clock() {
        let mut s = state();
        let scrub = InputEvent::Custom { kind: kinds::SCRUB, a: 0.5, b: 0.0, c: 0.0 };
        let out = s.advance(DT, &[scrub], &SphereCaster);
        assert_eq!(out.clock.target_days, 182.5);
        assert!(out.clock.current_days > 0.0 && out.clock.current_days < 182.5);
        assert!((out.progress - 0.5).abs() < 1e-6);
    }

    #[test]
    fn clicking_a_body_selects_it() {
        let mut s = state();
        let at = ndc_of(&s, EARTH_ID);
        let out = s.advance(DT, &click_at(at), &SphereCaster);
        assert_eq!(out.selection.selected, Some(EARTH_ID));
        assert!(out.selection_changed);
        let inst = s.bodies().instances[EARTH];
        assert!(inst.has_flag(FLAG_SELECTED));
    }

    #[test]
    fn clicking_empty_space_keeps_selection() {
        let mut s = state();
        let at = ndc_of(&s, EARTH_ID);
        s.advance(DT, &click_at(at), &SphereCaster);
        let out = s.advance(DT, &click_at(Vec2::new(0.0, -0.95)), &SphereCaster);
        assert_eq!(out.selection.selected, Some(EARTH_ID));
        assert!(!out.selection_changed);
    }

    #[test]
    fn hover_follows_pointer_every_tick() {
        let mut s = state();
        let at = ndc_of(&s, EARTH_ID);
        let out = s.advance(DT, &[InputEvent::PointerMove { x: at.x, y: at.y }], &SphereCaster);
        assert_eq!(out.selection.hovered, Some(EARTH_ID));
        assert!(s.bodies().instances[EARTH].has_flag(FLAG_HOVERED));
        // No new events: hover is recomputed, still there
        let out = s.advance(DT, &[], &SphereCaster);
        assert_eq!(out.selection.hovered, Some(EARTH_ID));
        let out = s.advance(DT, &[InputEvent::PointerLeave], &SphereCaster);
        assert_eq!(out.selection.hovered, None);
    }

    #[test]
    fn selection_follow_tracks_selected_body() {
        let mut s = state();
        s.apply(UiCommand::Select(BodyId(MARS as u32)));
        s.set_view_mode(ViewMode::SelectionFollow);
        let out = s.advance(DT, &[], &SphereCaster);
        let mars = s.position_of(BodyId(MARS as u32)).unwrap().position();
        assert_eq!(out.desired_camera.target, mars);
        // Zero smoothing: the rig lands on the desired pose immediately
        assert!(out.camera.target.distance(out.desired_camera.target) < 1e-4);
        assert!(out.camera.position.distance(out.desired_camera.position) < 1e-4);
    }

    #[test]
    fn selection_follow_without_selection_is_overview() {
        let mut s = state();
        s.set_view_mode(ViewMode::SelectionFollow);
        let out = s.advance(DT, &[], &SphereCaster);
        assert_eq!(out.desired_camera.target, Vec3::ZERO);
        assert_eq!(out.desired_camera.position, s.config().overview_position);
    }

    #[test]
    fn pending_and_failed_neos_are_skipped() {
        let mut s = state();
        s.track_neo("a", "pending");
        s.track_neo("b", "failed");
        s.resolve_neo("b", Err(ElementsError::MissingOrbitalData));
        let out = s.advance(DT, &[], &SphereCaster);
        assert_eq!(out.body_count, PLANET_COUNT);
    }

    #[test]
    fn degenerate_neo_is_flagged_at_origin() {
        let mut s = state();
        let id = s.track_neo("bad", "bad");
        s.resolve_neo("bad", Ok(neo(-2.0, 0.1)));
        let out = s.advance(DT, &[], &SphereCaster);
        assert_eq!(out.body_count, PLANET_COUNT + 1);
        assert_eq!(
            s.position_of(id),
            Some(Propagation::Degenerate(Degenerate::NonPositiveSemiMajorAxis))
        );
        let inst = s.bodies().instances[PLANET_COUNT];
        assert!(inst.has_flag(FLAG_DEGENERATE));
        assert_eq!((inst.x, inst.y, inst.z), (0.0, 0.0, 0.0));
    }

    #[test]
    fn untracked_selection_degrades_camera() {
        let mut s = state();
        let id = s.track_neo("gone", "gone");
        s.resolve_neo("gone", Ok(neo(1.2, 0.1)));
        s.advance(DT, &[], &SphereCaster);
        assert!(s.apply(UiCommand::Select(id)));
        s.set_view_mode(ViewMode::SelectionFollow);
        s.roster.untrack("gone");
        let out = s.advance(DT, &[], &SphereCaster);
        assert_eq!(out.desired_camera.target, Vec3::ZERO);
        // Stale id is kept, just treated as none
        assert_eq!(out.selection.selected, Some(id));
    }

    #[test]
    fn selecting_unknown_id_is_ignored() {
        let mut s = state();
        let select = InputEvent::Custom { kind: kinds::SELECT, a: 500.0, b: 0.0, c: 0.0 };
        let out = s.advance(DT, &[select], &SphereCaster);
        assert_eq!(out.selection.selected, None);
        assert!(!out.selection_changed);
    }

    #[test]
    fn selection_does_not_touch_positions() {
        let mut a = state();
        let mut b = state();
        b.apply(UiCommand::Select(EARTH_ID));
        a.advance(DT, &[], &SphereCaster);
        b.advance(DT, &[], &SphereCaster);
        assert_eq!(a.positions(), b.positions());
    }

    #[test]
    fn resize_updates_projection() {
        let mut s = state();
        let resize = InputEvent::Custom { kind: kinds::RESIZE, a: 1000.0, b: 500.0, c: 0.0 };
        s.advance(DT, &[resize], &SphereCaster);
        assert_eq!(s.rig().projection.aspect, 2.0);
    }
}
