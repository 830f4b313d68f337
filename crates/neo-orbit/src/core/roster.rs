use log::{info, warn};

use crate::api::types::{BodyId, BodyKind};
use crate::data::neows::{ElementsError, NeoRecord};
use crate::data::risk::RiskLevel;
use crate::orbit::classifier::{classify, OrbitClass};
use crate::orbit::elements::OrbitalElements;
use crate::orbit::planets::{planet_elements, NEO_DISPLAY_RADIUS, PLANET_DISPLAY_RADII, PLANET_NAMES};
use crate::orbit::propagator::validate;

/// Where a near-Earth object's element fetch stands.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    /// Requested, nothing back yet.
    Pending,
    Ready(NeoRecord),
    /// Last attempt failed. The body stays out of the simulation until a later success.
    Failed(String),
}

/// A body taking part in the simulation. Immutable once derived.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedBody {
    pub id: BodyId,
    pub name: String,
    pub kind: BodyKind,
    pub elements: OrbitalElements,
    pub class: OrbitClass,
    pub warning: RiskLevel,
    /// Sphere radius in scene units, used for drawing and as the default hit proxy.
    pub display_radius: f32,
}

struct NeoSlot {
    id: BodyId,
    /// External identifier (NeoWs id).
    key: String,
    name: String,
    state: FetchState,
}

/// Planets plus every requested near-Earth object.
/// The active body list is re-derived whenever a fetch resolves.
pub struct BodyRoster {
    planets: Vec<TrackedBody>,
    neos: Vec<NeoSlot>,
    active: Vec<TrackedBody>,
    next_id: u32,
}

impl BodyRoster {
    /// Roster holding only the planet table.
    pub fn new() -> Self {
        let planets: Vec<TrackedBody> = planet_elements()
            .iter()
            .enumerate()
            .map(|(idx, el)| TrackedBody {
                id: BodyId(idx as u32),
                name: PLANET_NAMES[idx].to_string(),
                kind: BodyKind::Planet,
                elements: *el,
                class: OrbitClass::Unclassified,
                warning: RiskLevel::Low,
                display_radius: PLANET_DISPLAY_RADII[idx],
            })
            .collect();
        let next_id = planets.len() as u32;
        let active = planets.clone();
        Self {
            planets,
            neos: Vec::new(),
            active,
            next_id,
        }
    }

    /// Register interest in a near-Earth object. Returns its handle.
    /// Tracking the same key twice returns the existing handle.
    pub fn track_neo(&mut self, key: &str, name: &str) -> BodyId {
        if let Some(slot) = self.neos.iter().find(|s| s.key == key) {
            return slot.id;
        }
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.neos.push(NeoSlot {
            id,
            key: key.to_string(),
            name: name.to_string(),
            state: FetchState::Pending,
        });
        id
    }

    /// Record the outcome of an element fetch. Unknown keys are ignored.
    /// Returns `true` if the active body set changed.
    pub fn resolve(&mut self, key: &str, result: Result<NeoRecord, ElementsError>) -> bool {
        let Some(slot) = self.neos.iter_mut().find(|s| s.key == key) else {
            warn!("roster: fetch result for untracked object {key}");
            return false;
        };
        let was_ready = matches!(slot.state, FetchState::Ready(_));
        match result {
            Ok(record) => {
                info!("roster: elements ready for {} ({})", slot.name, key);
                if slot.name.is_empty() {
                    slot.name = record.name.clone();
                }
                slot.state = FetchState::Ready(record);
            }
            // A failed refetch keeps elements that already arrived
            Err(err) if was_ready => {
                warn!("roster: refetch failed for {key}, keeping previous elements: {err}");
                return false;
            }
            Err(err) => {
                warn!("roster: excluding {key}: {err}");
                slot.state = FetchState::Failed(err.to_string());
                return false;
            }
        }
        self.rebuild();
        true
    }

    /// Stop tracking an object. A selection pointing at it becomes stale.
    pub fn untrack(&mut self, key: &str) -> Option<BodyId> {
        let idx = self.neos.iter().position(|s| s.key == key)?;
        let slot = self.neos.remove(idx);
        self.rebuild();
        Some(slot.id)
    }

    fn rebuild(&mut self) {
        self.active.clear();
        self.active.extend(self.planets.iter().cloned());
        for slot in &self.neos {
            if let FetchState::Ready(record) = &slot.state {
                if let Err(reason) = validate(&record.elements) {
                    warn!("roster: {} has unusable elements ({reason:?}), pinned at origin", slot.key);
                }
                self.active.push(TrackedBody {
                    id: slot.id,
                    name: slot.name.clone(),
                    kind: BodyKind::NearEarthObject,
                    elements: record.elements,
                    class: classify(&record.elements),
                    warning: record.warning(),
                    display_radius: NEO_DISPLAY_RADIUS,
                });
            }
        }
    }

    /// Bodies currently taking part in the simulation.
    pub fn active(&self) -> &[TrackedBody] {
        &self.active
    }

    pub fn get(&self, id: BodyId) -> Option<&TrackedBody> {
        self.active.iter().find(|b| b.id == id)
    }

    /// Whether `id` is in the active set.
    pub fn contains(&self, id: BodyId) -> bool {
        self.get(id).is_some()
    }

    pub fn fetch_state(&self, key: &str) -> Option<&FetchState> {
        self.neos.iter().find(|s| s.key == key).map(|s| &s.state)
    }

    /// Fetched record behind an active near-Earth object.
    pub fn record(&self, id: BodyId) -> Option<&NeoRecord> {
        self.neos.iter().find(|s| s.id == id).and_then(|s| match &s.state {
            FetchState::Ready(record) => Some(record),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl Default for BodyRoster {
    fn default() -> Self {
        Self::new()
    }
}
