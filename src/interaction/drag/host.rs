use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier2d::prelude::*;

use super::controller::{DragHost, DragNotice, Pick};
use crate::core::components::{DragJoint, DragReference};

/// Entity-targeted trigger sent to a body when a pointer grabs it.
#[derive(Event, Debug, Clone, Copy)]
pub struct DragStarted;

/// Entity-targeted trigger sent to a body when its pointer lets go.
#[derive(Event, Debug, Clone, Copy)]
pub struct DragStopped;

/// Window positions are y-down, controller screen space is y-up. The mapping is its own inverse.
pub fn flip_y(pos: Vec2, window_height: f32) -> Vec2 {
    Vec2::new(pos.x, window_height - pos.y)
}

/// Rapier/ECS backed [`DragHost`]. Writes go through `Commands`, reads see last frame's state.
#[derive(SystemParam)]
pub struct EcsDragHost<'w, 's> {
    commands: Commands<'w, 's>,
    rapier: ReadRapierContext<'w, 's>,
    windows: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    cameras: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<Camera2d>>,
    bodies: Query<
        'w,
        's,
        (
            &'static GlobalTransform,
            Option<&'static LockedAxes>,
            Option<&'static RigidBody>,
        ),
        Without<DragJoint>,
    >,
    parents: Query<'w, 's, &'static ChildOf>,
    joints: Query<
        'w,
        's,
        (
            &'static GlobalTransform,
            &'static mut ImpulseJoint,
            &'static mut Velocity,
        ),
        (With<DragJoint>, Without<DragReference>),
    >,
    reference: Query<'w, 's, &'static Velocity, (With<DragReference>, Without<DragJoint>)>,
}

impl EcsDragHost<'_, '_> {
    fn window_height(&self) -> Option<f32> {
        self.windows.single().ok().map(|w| w.height())
    }

    /// Rigid body owning `collider`: the entity itself or its nearest body ancestor.
    fn owning_body(&self, collider: Entity) -> Option<Entity> {
        let mut current = collider;
        loop {
            if let Ok((_, _, Some(_))) = self.bodies.get(current) {
                return Some(current);
            }
            current = self.parents.get(current).ok()?.parent();
        }
    }
}

impl DragHost for EcsDragHost<'_, '_> {
    fn pick(&mut self, screen: Vec2, layers: Group) -> Option<Pick> {
        let height = self.window_height()?;
        let (camera, cam_tf) = self.cameras.iter().next()?;
        let world_point = camera
            .viewport_to_world_2d(cam_tf, flip_y(screen, height))
            .ok()?;
        let ctx = self.rapier.single().ok()?;
        let filter = QueryFilter::new()
            .exclude_sensors()
            .groups(CollisionGroups::new(Group::ALL, layers));
        let mut hit = None;
        ctx.intersect_point(world_point, filter, |collider| {
            hit = Some(collider);
            false
        });
        let body = self.owning_body(hit?)?;
        Some(Pick { body, world_point })
    }

    fn world_to_screen(&self, world: Vec2) -> Option<Vec2> {
        let height = self.window_height()?;
        let (camera, cam_tf) = self.cameras.iter().next()?;
        let viewport = camera.world_to_viewport(cam_tf, world.extend(0.0)).ok()?;
        Some(flip_y(viewport, height))
    }

    fn body_transform(&self, body: Entity) -> Option<Transform> {
        self.bodies
            .get(body)
            .ok()
            .map(|(tf, _, _)| tf.compute_transform())
    }

    fn locked_axes(&self, body: Entity) -> Option<LockedAxes> {
        self.bodies
            .get(body)
            .ok()
            .map(|(_, axes, _)| axes.copied().unwrap_or_default())
    }

    fn set_locked_axes(&mut self, body: Entity, axes: LockedAxes) {
        if let Ok(mut ec) = self.commands.get_entity(body) {
            ec.try_insert(axes);
        }
    }

    fn body_kind(&self, body: Entity) -> Option<RigidBody> {
        self.bodies.get(body).ok().and_then(|(_, _, kind)| kind.copied())
    }

    fn set_body_kind(&mut self, body: Entity, kind: RigidBody) {
        if let Ok(mut ec) = self.commands.get_entity(body) {
            ec.try_insert(kind);
        }
    }

    fn spawn_joint(&mut self, at: Vec2, rotation: Quat, body: Entity, anchor: Vec2) -> Entity {
        let joint = RevoluteJointBuilder::new()
            .local_anchor1(anchor)
            .local_anchor2(Vec2::ZERO)
            .build();
        self.commands
            .spawn((
                DragJoint,
                Name::new("drag-joint"),
                RigidBody::KinematicVelocityBased,
                Velocity::zero(),
                Transform::from_translation(at.extend(0.0)).with_rotation(rotation),
                ImpulseJoint::new(body, joint),
            ))
            .id()
    }

    fn despawn_joint(&mut self, joint: Entity) {
        if let Ok(mut ec) = self.commands.get_entity(joint) {
            ec.try_despawn();
        }
    }

    fn joint_position(&self, joint: Entity) -> Option<Vec2> {
        self.joints
            .get(joint)
            .ok()
            .map(|(tf, _, _)| tf.translation().truncate())
    }

    fn joint_anchor(&self, joint: Entity) -> Option<Vec2> {
        self.joints
            .get(joint)
            .ok()
            .map(|(_, j, _)| j.data.as_ref().local_anchor1())
    }

    fn set_joint_anchor(&mut self, joint: Entity, anchor: Vec2) {
        if let Ok((_, mut j, _)) = self.joints.get_mut(joint) {
            j.data.as_mut().set_local_anchor1(anchor);
        }
    }

    fn set_joint_velocity(&mut self, joint: Entity, velocity: Vec2) {
        if let Ok((_, _, mut vel)) = self.joints.get_mut(joint) {
            vel.linvel = velocity;
        }
    }

    fn reference_velocity(&self) -> Option<Vec2> {
        self.reference.iter().next().map(|v| v.linvel)
    }

    fn notify(&mut self, body: Entity, notice: DragNotice) {
        if self.commands.get_entity(body).is_err() {
            return;
        }
        match notice {
            DragNotice::Started => self.commands.trigger_targets(DragStarted, body),
            DragNotice::Stopped => self.commands.trigger_targets(DragStopped, body),
        }
    }
}
