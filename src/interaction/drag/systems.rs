use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use smallvec::SmallVec;

use super::controller::{DragController, DragSettings, PointerId, MOUSE_POINTER_ID};
use super::host::{flip_y, EcsDragHost};
use crate::core::config::GameConfig;

/// Pointers currently held down, ascending by id, in controller screen space.
/// Refreshed every input tick; the physics tick pairs sessions against it by position.
#[derive(Resource, Default, Debug)]
pub struct ActivePointers(pub SmallVec<[(PointerId, Vec2); 4]>);

impl ActivePointers {
    pub fn positions(&self) -> SmallVec<[Vec2; 4]> {
        self.0.iter().map(|(_, p)| *p).collect()
    }
}

/// Input tick: open new pointers, close released ones, then resample held positions.
pub fn sample_pointers(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut active: ResMut<ActivePointers>,
    mut controller: ResMut<DragController>,
    mut host: EcsDragHost,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let height = window.height();

    for touch in touches.iter_just_pressed() {
        controller.begin_drag(&mut host, touch.id(), flip_y(touch.position(), height));
    }
    let cursor = window.cursor_position();
    if buttons.just_pressed(MouseButton::Left) {
        if let Some(pos) = cursor {
            controller.begin_drag(&mut host, MOUSE_POINTER_ID, flip_y(pos, height));
        }
    }

    // Ends after begins: a press and release within one frame must not leave a session.
    for touch in touches.iter_just_released().chain(touches.iter_just_canceled()) {
        controller.end_drag(&mut host, touch.id());
    }
    if buttons.just_released(MouseButton::Left) {
        controller.end_drag(&mut host, MOUSE_POINTER_ID);
    }

    active.0.clear();
    active
        .0
        .extend(touches.iter().map(|t| (t.id(), flip_y(t.position(), height))));
    if buttons.pressed(MouseButton::Left) {
        if let Some(pos) = cursor {
            active.0.push((MOUSE_POINTER_ID, flip_y(pos, height)));
        }
    }
    active.0.sort_by_key(|(id, _)| *id);
}

/// Physics tick: steer every joint toward its paired pointer.
pub fn drive_drags(
    time: Res<Time>,
    active: Res<ActivePointers>,
    mut controller: ResMut<DragController>,
    mut host: EcsDragHost,
) {
    if controller.is_empty() {
        return;
    }
    controller.update_all(&mut host, &active.positions(), time.delta_secs());
}

/// Pushes `GameConfig::drag` into the controller whenever the config resource changes.
pub fn sync_drag_settings(
    cfg: Res<GameConfig>,
    mut controller: ResMut<DragController>,
    mut host: EcsDragHost,
) {
    if !cfg.is_changed() {
        return;
    }
    let settings = DragSettings::from_config(&cfg.drag);
    if settings != *controller.settings() {
        info!(?settings, "Drag settings applied");
        controller.reconfigure(&mut host, settings);
    }
}
