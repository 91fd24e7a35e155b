pub mod controller;
pub mod host;
pub mod systems;

use bevy::prelude::*;

use crate::core::system::system_order::{DragDriveSet, PointerInputSet};
pub use controller::{DragController, DragHost, DragSession, DragSettings, PointerId};
pub use host::{DragStarted, DragStopped, EcsDragHost};
pub use systems::ActivePointers;

pub struct DragPlugin;

impl Plugin for DragPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DragController>()
            .init_resource::<ActivePointers>()
            .add_systems(
                Update,
                (systems::sync_drag_settings, systems::sample_pointers)
                    .chain()
                    .in_set(PointerInputSet),
            )
            .add_systems(FixedUpdate, systems::drive_drags.in_set(DragDriveSet));
    }
}
