use bevy::prelude::*;
use bevy_rapier2d::prelude::PhysicsSet;

use crate::core::config::GameConfig;
use crate::core::system::system_order::{DragDriveSet, JudgingSet, PointerInputSet};
use crate::gameplay::QuizPlugin;
use crate::interaction::drag::DragPlugin;
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::interaction::session::config_hot_reload::ConfigHotReloadPlugin;
use crate::physics::rapier::rapier_physics::PhysicsSetupPlugin;
use crate::rendering::camera::camera::CameraPlugin;

/// Outcome of the startup config load, logged once the log plugin is up.
#[derive(Resource, Debug, Default, Clone)]
pub struct ConfigReport {
    pub used: Vec<String>,
    pub errors: Vec<String>,
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameConfig>()
            .init_resource::<ConfigReport>()
            .configure_sets(Update, (PointerInputSet, JudgingSet.after(PointerInputSet)))
            .configure_sets(FixedUpdate, DragDriveSet.before(PhysicsSet::SyncBackend))
            .add_plugins((
                CameraPlugin,
                PhysicsSetupPlugin,
                DragPlugin,
                QuizPlugin,
                ConfigHotReloadPlugin,
                AutoClosePlugin,
            ))
            .add_systems(Startup, log_config_report);
    }
}

fn log_config_report(report: Res<ConfigReport>, cfg: Res<GameConfig>) {
    for e in &report.errors {
        warn!("CONFIG LOAD ISSUE: {e}");
    }
    if report.used.is_empty() {
        info!("No config layers found; using defaults");
    } else {
        info!(used = ?report.used, "Config layers loaded");
    }
    for w in cfg.validate() {
        warn!("CONFIG WARNING: {w}");
    }
    info!(
        rounds = cfg.quiz.rounds.len(),
        damping = cfg.drag.damping,
        freeze_rotation = cfg.drag.freeze_rotation,
        snap_to_center = cfg.drag.snap_to_center,
        "Runtime summary"
    );
}
