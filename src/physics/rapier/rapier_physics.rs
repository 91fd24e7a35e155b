use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::config::GameConfig;

/// Rapier in the fixed schedule so drag steering and the solver share one tick rate.
pub struct PhysicsSetupPlugin;

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
            .add_systems(Startup, configure_physics);
        let debug_render = app
            .world()
            .get_resource::<GameConfig>()
            .is_some_and(|cfg| cfg.rapier_debug);
        if debug_render {
            app.add_plugins(RapierDebugRenderPlugin::default());
        }
    }
}

fn configure_physics(mut rapier_cfg: Query<&mut RapierConfiguration>) {
    // The board lies flat: no gravity, cards only move when dragged.
    for mut cfg in &mut rapier_cfg {
        cfg.gravity = Vect::ZERO;
    }
}
