//! Pointer picking and selection state.
//!
//! The pointer becomes a world-space ray through the current camera. A
//! `RayCaster` intersects it with per-body proxies, and the nearest hit
//! drives hover and click.

use glam::{Vec2, Vec3};
use log::debug;

use crate::api::types::BodyId;
use crate::camera::rig::Projection;
use crate::camera::view::CameraPose;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    /// Ray from the camera through a point in normalized device coordinates.
    /// `None` if the camera transform is degenerate.
    pub fn from_ndc(ndc: Vec2, pose: &CameraPose, projection: &Projection) -> Option<Ray> {
        let view_proj = projection.matrix() * pose.view_matrix();
        if view_proj.determinant().abs() < f32::EPSILON {
            return None;
        }
        // Unproject onto the near plane only; the far plane loses too much precision
        let on_near = view_proj.inverse().project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let direction = (on_near - pose.position).try_normalize()?;
        Some(Ray {
            origin: pose.position,
            direction,
        })
    }

    /// Distance along the ray to the first sphere intersection in front of the origin.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let root = disc.sqrt();
        let near = -b - root;
        if near >= 0.0 {
            return Some(near);
        }
        // Origin inside the sphere
        let far = -b + root;
        (far >= 0.0).then_some(far)
    }
}

/// Pickable stand-in for a body at this tick's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyProxy {
    pub id: BodyId,
    pub center: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub id: BodyId,
    /// Distance from the ray origin.
    pub distance: f32,
}

/// Ray intersection against body proxies.
/// The renderer may supply its own (e.g. mesh-accurate) implementation.
pub trait RayCaster {
    /// All proxies the ray hits, in any order.
    fn cast(&self, ray: &Ray, proxies: &[BodyProxy]) -> Vec<PickHit>;
}

/// Default caster: each proxy is a sphere.
#[derive(Debug, Clone, Copy, Default)]
pub struct SphereCaster;

impl RayCaster for SphereCaster {
    fn cast(&self, ray: &Ray, proxies: &[BodyProxy]) -> Vec<PickHit> {
        proxies
            .iter()
            .filter_map(|p| {
                ray.intersect_sphere(p.center, p.radius)
                    .map(|distance| PickHit { id: p.id, distance })
            })
            .collect()
    }
}

/// Nearest body hit by `ray`. Hits on ids outside `proxies` are dropped.
pub fn nearest_hit(caster: &dyn RayCaster, ray: &Ray, proxies: &[BodyProxy]) -> Option<BodyId> {
    caster
        .cast(ray, proxies)
        .into_iter()
        .filter(|hit| hit.distance.is_finite() && proxies.iter().any(|p| p.id == hit.id))
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
        .map(|hit| hit.id)
}

/// Selected and hovered identity. Pure metadata; never touches body data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected: Option<BodyId>,
    /// Recomputed every tick from the pointer, never persisted.
    pub hovered: Option<BodyId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the hover with this tick's pick result.
    pub fn hover(&mut self, hit: Option<BodyId>) {
        self.hovered = hit;
    }

    /// Apply a click. A hit selects; a miss leaves the selection alone.
    /// Returns `true` if the selection changed.
    pub fn click(&mut self, hit: Option<BodyId>) -> bool {
        match hit {
            Some(id) if self.selected != Some(id) => {
                debug!("selection: picked {:?}", id);
                self.selected = Some(id);
                true
            }
            _ => false,
        }
    }

    /// Select by id from the UI. Ids outside the tracked set are ignored.
    pub fn select(&mut self, id: BodyId, tracked: impl Fn(BodyId) -> bool) -> bool {
        if !tracked(id) {
            debug!("selection: ignoring untracked {:?}", id);
            return false;
        }
        self.selected = Some(id);
        true
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Selection restricted to the tracked set; a stale id reads as none.
    pub fn effective_selected(&self, tracked: impl Fn(BodyId) -> bool) -> Option<BodyId> {
        self.selected.filter(|id| tracked(*id))
    }
}
