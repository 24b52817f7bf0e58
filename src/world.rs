use log::{debug, info};

use crate::collision::broad_phase::{BodyBounds, BroadPhase, BroadPhaseKind};
use crate::collision::narrow_phase::NarrowPhaseKind;
use crate::collision::{BodyHandle, Contact, ContactPair};
use crate::dynamics::{CollisionState, RigidPolygon};
use crate::math::Vec2;
use crate::solver::{position, velocity, SolverConfig};

/// Configuration for the simulation world
#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Gravity acceleration applied to non-static bodies
    pub gravity: Vec2,
    /// Bodies falling below this height are clamped onto it
    pub floor_y: Option<f32>,
    /// Upper bound on the integrated time per step
    pub max_dt: f32,
    /// Solver configuration
    pub solver: SolverConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::ZERO,
            floor_y: None,
            max_dt: 1.0 / 15.0,
            solver: SolverConfig::default(),
        }
    }
}

/// The body registry and step orchestrator.
///
/// Owns every body in an index-stable arena, the current broad-phase
/// strategy, and the confirmed contact list of the last step. All
/// mutation flows through here: the world changes a body first and
/// notifies the broad phase afterwards, so spatial structures only ever
/// observe settled transforms.
pub struct World {
    config: WorldConfig,
    bodies: Vec<Option<RigidPolygon>>,
    free_bodies: Vec<usize>,
    broad_phase: Box<dyn BroadPhase>,
    broad_phase_kind: BroadPhaseKind,
    narrow_phase: NarrowPhaseKind,
    candidates: Vec<ContactPair>,
    contacts: Vec<Contact>,
    active: bool,
    time: f32,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

fn bounds_of(body: &RigidPolygon) -> BodyBounds {
    BodyBounds {
        aabb: body.aabb(),
        circle: body.bounding_circle(),
    }
}

impl World {
    /// Creates a new world with the given configuration
    pub fn new(config: WorldConfig) -> Self {
        let broad_phase_kind = BroadPhaseKind::default();
        Self {
            config,
            bodies: Vec::new(),
            free_bodies: Vec::new(),
            broad_phase: broad_phase_kind.make(),
            broad_phase_kind,
            narrow_phase: NarrowPhaseKind::default(),
            candidates: Vec::new(),
            contacts: Vec::new(),
            active: true,
            time: 0.0,
        }
    }

    /// Adds a body and registers it with the broad phase
    pub fn add_body(&mut self, mut body: RigidPolygon) -> BodyHandle {
        let handle = if let Some(index) = self.free_bodies.pop() {
            BodyHandle::new(index as u32)
        } else {
            let index = self.bodies.len();
            self.bodies.push(None);
            BodyHandle::new(index as u32)
        };

        body.handle = handle;
        body.sync();
        self.broad_phase.on_added(handle, &bounds_of(&body));
        self.bodies[handle.index()] = Some(body);
        handle
    }

    /// Removes a body, dropping any contact that references it
    pub fn remove_body(&mut self, handle: BodyHandle) {
        let Some(slot) = self.bodies.get_mut(handle.index()) else {
            return;
        };
        let Some(body) = slot.take() else {
            return;
        };
        self.broad_phase.on_removed(handle, &bounds_of(&body));
        self.free_bodies.push(handle.index());
        self.contacts
            .retain(|c| c.pair.a != handle && c.pair.b != handle);
    }

    /// Gets a body by handle
    pub fn body(&self, handle: BodyHandle) -> Option<&RigidPolygon> {
        self.bodies.get(handle.index()).and_then(|b| b.as_ref())
    }

    /// Moves a body, then notifies the broad phase
    pub fn set_body_position(&mut self, handle: BodyHandle, position: Vec2) {
        let Some(body) = self.bodies.get_mut(handle.index()).and_then(|b| b.as_mut()) else {
            return;
        };
        body.set_position(position);
        body.sync();
        self.broad_phase.on_updated(handle, &bounds_of(body));
    }

    /// Rotates a body, then notifies the broad phase
    pub fn set_body_angle(&mut self, handle: BodyHandle, angle: f32) {
        let Some(body) = self.bodies.get_mut(handle.index()).and_then(|b| b.as_mut()) else {
            return;
        };
        body.set_rotation(crate::math::Rot2::from_angle(angle));
        body.sync();
        self.broad_phase.on_updated(handle, &bounds_of(body));
    }

    /// Number of live bodies
    pub fn body_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.is_some()).count()
    }

    /// Live bodies with their handles
    pub fn bodies(&self) -> impl Iterator<Item = &RigidPolygon> {
        self.bodies.iter().flatten()
    }

    /// The first live body, in arena order, containing a world-space
    /// point, if any
    pub fn body_at_point(&self, point: Vec2) -> Option<BodyHandle> {
        self.bodies
            .iter()
            .flatten()
            .find(|b| b.contains_point(point))
            .map(|b| b.handle)
    }

    /// Contacts confirmed by the last step
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// The current broad-phase strategy
    pub fn broad_phase_kind(&self) -> BroadPhaseKind {
        self.broad_phase_kind
    }

    /// Switches the broad-phase strategy, re-registering every live body
    /// with the new one
    pub fn set_broad_phase(&mut self, kind: BroadPhaseKind) {
        if kind == self.broad_phase_kind {
            return;
        }
        let mut fresh = kind.make();
        for body in self.bodies.iter().flatten() {
            fresh.on_added(body.handle, &bounds_of(body));
        }
        info!(
            "broad phase switched: {} -> {}",
            self.broad_phase.name(),
            fresh.name()
        );
        self.broad_phase = fresh;
        self.broad_phase_kind = kind;
    }

    /// Cycles to the next broad-phase strategy
    pub fn next_broad_phase(&mut self) {
        self.set_broad_phase(self.broad_phase_kind.next());
    }

    /// Cycles to the previous broad-phase strategy
    pub fn previous_broad_phase(&mut self) {
        self.set_broad_phase(self.broad_phase_kind.previous());
    }

    /// The current narrow-phase algorithm
    pub fn narrow_phase_kind(&self) -> NarrowPhaseKind {
        self.narrow_phase
    }

    /// Selects the narrow-phase algorithm for subsequent steps
    pub fn set_narrow_phase(&mut self, kind: NarrowPhaseKind) {
        self.narrow_phase = kind;
    }

    /// Pauses or resumes the simulation; an inactive world ignores
    /// [`World::step`]
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Total simulated time
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advances the simulation by `dt` seconds (clamped to
    /// [`WorldConfig::max_dt`]).
    ///
    /// Pipeline: integrate, notify the broad phase, collect candidates,
    /// confirm them through the narrow phase, then run the position and
    /// velocity solver passes.
    pub fn step(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        let dt = dt.min(self.config.max_dt);

        self.integrate(dt);

        // Bodies have settled; now tell the broad phase about every
        // possible move (solver corrections from last step included)
        for index in 0..self.bodies.len() {
            let Some(body) = self.bodies[index].as_mut() else {
                continue;
            };
            if body.is_static() {
                continue;
            }
            let handle = body.handle;
            let bounds = bounds_of(body);
            self.broad_phase.on_updated(handle, &bounds);
        }

        for body in self.bodies.iter_mut().flatten() {
            body.collision_state = CollisionState::NotColliding;
        }

        self.candidates.clear();
        self.broad_phase.candidate_pairs(&mut self.candidates);
        debug!(
            "step t={:.3}: {} candidate pairs from {}",
            self.time,
            self.candidates.len(),
            self.broad_phase.name()
        );

        self.contacts.clear();
        for i in 0..self.candidates.len() {
            let pair = self.candidates[i];
            let (Some(a), Some(b)) = (
                self.bodies[pair.a.index()].as_ref(),
                self.bodies[pair.b.index()].as_ref(),
            ) else {
                continue;
            };

            let inv_mass_sum = a.inv_mass + b.inv_mass;
            let hit = self.narrow_phase.test(a, b);

            let state = if hit.is_some() {
                CollisionState::NarrowPhase
            } else {
                CollisionState::BroadPhase
            };
            for handle in [pair.a, pair.b] {
                if let Some(body) = self.bodies[handle.index()].as_mut() {
                    if body.collision_state != CollisionState::NarrowPhase {
                        body.collision_state = state;
                    }
                }
            }

            if let Some(hit) = hit {
                self.contacts.push(Contact {
                    pair,
                    point: hit.point,
                    normal: hit.normal,
                    depth: hit.depth,
                    inv_mass_sum,
                });
            }
        }
        debug!("step t={:.3}: {} confirmed contacts", self.time, self.contacts.len());

        position::solve(&mut self.bodies, &mut self.contacts, &self.config.solver);
        velocity::solve(&mut self.bodies, &self.contacts, &self.config.solver);

        self.time += dt;
    }

    /// Explicit Euler integration with the floor clamp
    fn integrate(&mut self, dt: f32) {
        let gravity = self.config.gravity;
        let floor_y = self.config.floor_y;

        for body in self.bodies.iter_mut().flatten() {
            if body.is_static() {
                body.sync();
                continue;
            }

            body.linear_velocity += gravity * dt;
            let mut position = body.position + body.linear_velocity * dt;

            if let Some(floor) = floor_y {
                if position.y < floor {
                    position.y = floor;
                    body.linear_velocity.y = 0.0;
                }
            }

            body.set_position(position);
            body.set_rotation(body.rotation.rotated_by(body.angular_velocity * dt));
            body.sync();
        }
    }
}
