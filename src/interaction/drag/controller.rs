//! Multi-pointer drag sessions: one kinematic joint actor per held pointer, steered toward the
//! pointer each physics tick and torn down on release.
//!
//! Screen coordinates here are y-up pixels with the origin at the bottom-left of the window.
use std::collections::BTreeMap;

use bevy::prelude::*;
use bevy_rapier2d::prelude::{Group, LockedAxes, RigidBody};

use crate::core::config::DragConfig;

pub type PointerId = u64;

/// Reserved id for the mouse so it sorts after every touch.
pub const MOUSE_POINTER_ID: PointerId = u64::MAX;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pick {
    pub body: Entity,
    pub world_point: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragNotice {
    Started,
    Stopped,
}

/// Engine services the controller needs. Every call tolerates missing entities.
pub trait DragHost {
    /// Nearest body under `screen` whose collider belongs to `layers`.
    fn pick(&mut self, screen: Vec2, layers: Group) -> Option<Pick>;
    fn world_to_screen(&self, world: Vec2) -> Option<Vec2>;
    fn body_transform(&self, body: Entity) -> Option<Transform>;
    fn locked_axes(&self, body: Entity) -> Option<LockedAxes>;
    fn set_locked_axes(&mut self, body: Entity, axes: LockedAxes);
    fn body_kind(&self, body: Entity) -> Option<RigidBody>;
    fn set_body_kind(&mut self, body: Entity, kind: RigidBody);
    /// Spawns the joint actor at `at`; its own anchor sits at its origin and the far end
    /// attaches to `body` at the body-local `anchor`.
    fn spawn_joint(&mut self, at: Vec2, rotation: Quat, body: Entity, anchor: Vec2) -> Entity;
    fn despawn_joint(&mut self, joint: Entity);
    fn joint_position(&self, joint: Entity) -> Option<Vec2>;
    fn joint_anchor(&self, joint: Entity) -> Option<Vec2>;
    fn set_joint_anchor(&mut self, joint: Entity, anchor: Vec2);
    fn set_joint_velocity(&mut self, joint: Entity, velocity: Vec2);
    fn reference_velocity(&self) -> Option<Vec2>;
    fn notify(&mut self, body: Entity, notice: DragNotice);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSettings {
    pub draggable_layers: Group,
    pub damping: f32,
    pub freeze_rotation: bool,
    pub snap_to_center: bool,
    pub snap_speed: f32,
    pub wake_fixed_bodies: bool,
    /// World pixels covered by one unit of drag velocity.
    pub pixels_per_unit: f32,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self::from_config(&DragConfig::default())
    }
}

impl DragSettings {
    pub fn from_config(cfg: &DragConfig) -> Self {
        let damping = effective_damping(cfg.damping);
        if damping != cfg.damping {
            warn!(
                configured = cfg.damping,
                "Drag damping must be positive; using {damping}"
            );
        }
        let pixels_per_unit = if cfg.pixels_per_unit.is_finite() && cfg.pixels_per_unit > 0.0 {
            cfg.pixels_per_unit
        } else {
            warn!(
                configured = cfg.pixels_per_unit,
                "Drag pixels_per_unit must be positive; using 1"
            );
            1.0
        };
        Self {
            draggable_layers: Group::from_bits_truncate(cfg.draggable_layers),
            damping,
            freeze_rotation: cfg.freeze_rotation,
            snap_to_center: cfg.snap_to_center,
            snap_speed: if cfg.snap_speed.is_finite() {
                cfg.snap_speed
            } else {
                0.0
            },
            wake_fixed_bodies: cfg.wake_fixed_bodies,
            pixels_per_unit,
        }
    }
}

/// Damping actually used at runtime: anything not strictly positive becomes 1.
pub fn effective_damping(raw: f32) -> f32 {
    if raw.is_finite() && raw > 0.0 {
        raw
    } else {
        1.0
    }
}

/// One lerp step of the joint anchor toward the body origin. Applied every tick, so the
/// remaining offset shrinks geometrically by `snap_speed * dt` per step.
pub fn snap_step(anchor: Vec2, snap_speed: f32, dt: f32) -> Vec2 {
    let t = snap_speed * dt;
    if t.is_nan() {
        return anchor;
    }
    anchor.lerp(Vec2::ZERO, t.clamp(0.0, 1.0))
}

/// Proportional tracking: speed grows linearly with pointer distance, divided by damping.
pub fn drag_velocity(object_screen: Vec2, pointer_screen: Vec2, damping: f32) -> Vec2 {
    let delta = pointer_screen - object_screen;
    let distance = delta.length();
    delta.normalize_or_zero() * (distance / damping)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub body: Entity,
    pub joint: Entity,
    pub pick_offset: Vec2,
    pub saved_axes: LockedAxes,
    pub saved_kind: Option<RigidBody>,
}

#[derive(Resource, Debug, Default)]
pub struct DragController {
    settings: DragSettings,
    sessions: BTreeMap<PointerId, DragSession>,
}

impl DragController {
    pub fn new(settings: DragSettings) -> Self {
        Self {
            settings,
            sessions: BTreeMap::new(),
        }
    }

    pub fn settings(&self) -> &DragSettings {
        &self.settings
    }

    pub fn session(&self, pointer: PointerId) -> Option<&DragSession> {
        self.sessions.get(&pointer)
    }


    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Returns true when a new session was opened.
    pub fn begin_drag(&mut self, host: &mut impl DragHost, pointer: PointerId, screen: Vec2) -> bool {
        if self.sessions.contains_key(&pointer) {
            return false;
        }
        let Some(pick) = host.pick(screen, self.settings.draggable_layers) else {
            return false;
        };
        let Some(body_tf) = host.body_transform(pick.body) else {
            return false;
        };
        let saved_axes = host.locked_axes(pick.body).unwrap_or(LockedAxes::empty());
        let saved_kind = host.body_kind(pick.body);
        if self.settings.freeze_rotation {
            host.set_locked_axes(pick.body, saved_axes | LockedAxes::ROTATION_LOCKED);
        }
        if self.settings.wake_fixed_bodies && saved_kind == Some(RigidBody::Fixed) {
            host.set_body_kind(pick.body, RigidBody::Dynamic);
        }
        let pick_offset = body_tf
            .compute_affine()
            .inverse()
            .transform_point3(pick.world_point.extend(0.0))
            .truncate();
        let joint = host.spawn_joint(pick.world_point, body_tf.rotation, pick.body, pick_offset);
        self.sessions.insert(
            pointer,
            DragSession {
                body: pick.body,
                joint,
                pick_offset,
                saved_axes,
                saved_kind,
            },
        );
        debug!(pointer, body = ?pick.body, ?joint, "drag started");
        host.notify(pick.body, DragNotice::Started);
        true
    }

    /// Steers one session toward `screen`. Ends the session if its body or joint vanished.
    pub fn update_drag(
        &mut self,
        host: &mut impl DragHost,
        pointer: PointerId,
        screen: Vec2,
        dt: f32,
    ) {
        let Some(session) = self.sessions.get(&pointer).copied() else {
            return;
        };
        if host.body_transform(session.body).is_none() {
            self.end_drag(host, pointer);
            return;
        }
        let Some(joint_world) = host.joint_position(session.joint) else {
            self.end_drag(host, pointer);
            return;
        };
        if self.settings.snap_to_center {
            if let Some(anchor) = host.joint_anchor(session.joint) {
                host.set_joint_anchor(
                    session.joint,
                    snap_step(anchor, self.settings.snap_speed, dt),
                );
            }
        }
        let Some(object_screen) = host.world_to_screen(joint_world) else {
            return;
        };
        let mut velocity = drag_velocity(object_screen, screen, self.settings.damping)
            * self.settings.pixels_per_unit;
        if let Some(reference) = host.reference_velocity() {
            velocity += reference;
        }
        host.set_joint_velocity(session.joint, velocity);
    }

    /// Pairs sessions (ascending pointer id) positionally with `active` and steers each.
    /// The pairing is rebuilt on every call.
    pub fn update_all(&mut self, host: &mut impl DragHost, active: &[Vec2], dt: f32) {
        let paired: Vec<(PointerId, Vec2)> = self
            .sessions
            .keys()
            .copied()
            .zip(active.iter().copied())
            .collect();
        for (pointer, screen) in paired {
            self.update_drag(host, pointer, screen, dt);
        }
    }

    pub fn end_drag(&mut self, host: &mut impl DragHost, pointer: PointerId) {
        let Some(session) = self.sessions.remove(&pointer) else {
            return;
        };
        let body_alive = host.body_transform(session.body).is_some();
        if body_alive {
            host.set_locked_axes(session.body, session.saved_axes);
            if let Some(kind) = session.saved_kind {
                if host.body_kind(session.body) != Some(kind) {
                    host.set_body_kind(session.body, kind);
                }
            }
        }
        host.despawn_joint(session.joint);
        if body_alive {
            host.notify(session.body, DragNotice::Stopped);
        }
        debug!(pointer, body = ?session.body, "drag stopped");
    }

    /// Releases every held body, e.g. when the board is rebuilt under the pointers.
    pub fn end_all(&mut self, host: &mut impl DragHost) {
        let pointers: Vec<PointerId> = self.sessions.keys().copied().collect();
        for pointer in pointers {
            self.end_drag(host, pointer);
        }
    }

    /// Swaps settings. Live sessions pick up a freeze-rotation change immediately; their
    /// saved constraints stay untouched so release still restores the original flags.
    pub fn reconfigure(&mut self, host: &mut impl DragHost, settings: DragSettings) {
        let freeze_changed = settings.freeze_rotation != self.settings.freeze_rotation;
        self.settings = settings;
        if !freeze_changed {
            return;
        }
        for session in self.sessions.values() {
            let Some(current) = host.locked_axes(session.body) else {
                continue;
            };
            let axes = if settings.freeze_rotation {
                current | LockedAxes::ROTATION_LOCKED
            } else {
                current.difference(LockedAxes::ROTATION_LOCKED)
                    | (session.saved_axes & LockedAxes::ROTATION_LOCKED)
            };
            host.set_locked_axes(session.body, axes);
        }
    }
}
