use bevy::asset::AssetPlugin;
use bevy::render::camera::{camera_system, ManualTextureViews};
use bevy::window::{
    PrimaryWindow, WindowCreated, WindowResized, WindowResolution, WindowScaleFactorChanged,
};
use bevy_rapier2d::prelude::*;

use bevy::prelude::*;
use slot_quiz::core::components::DragJoint;
use slot_quiz::core::config::GameConfig;
use slot_quiz::interaction::drag::controller::MOUSE_POINTER_ID;
use slot_quiz::interaction::drag::{DragController, DragPlugin};

const WINDOW_W: f32 = 800.0;
const WINDOW_H: f32 = 600.0;

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, TransformPlugin, AssetPlugin::default()));
    app.init_asset::<Image>();
    app.init_resource::<ManualTextureViews>();
    app.add_event::<WindowResized>();
    app.add_event::<WindowCreated>();
    app.add_event::<WindowScaleFactorChanged>();
    app.init_resource::<ButtonInput<MouseButton>>();
    app.init_resource::<Touches>();
    app.insert_resource(GameConfig::default());
    // Physics steps in PostUpdate here so a plain `update` keeps the query pipeline fresh.
    app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default());
    app.add_plugins(DragPlugin);
    app.add_systems(PostUpdate, camera_system);

    app.world_mut().spawn((
        Window {
            resolution: WindowResolution::new(WINDOW_W, WINDOW_H),
            ..default()
        },
        PrimaryWindow,
    ));
    app.world_mut().spawn(Camera2d);
    app
}

/// 100x100 parked card centred on the world origin.
fn spawn_card(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((
            Transform::default(),
            RigidBody::Fixed,
            Collider::cuboid(50.0, 50.0),
            CollisionGroups::new(Group::GROUP_1, Group::ALL),
            Velocity::zero(),
        ))
        .id()
}

/// Cursor in window coordinates (y-down, origin top-left), given as a world offset.
fn put_cursor(app: &mut App, world: Vec2) {
    let pos = Vec2::new(WINDOW_W * 0.5 + world.x, WINDOW_H * 0.5 - world.y);
    let mut windows = app
        .world_mut()
        .query_filtered::<&mut Window, With<PrimaryWindow>>();
    let mut window = windows.single_mut(app.world_mut()).expect("primary window");
    window.set_cursor_position(Some(pos));
}

fn mouse(app: &mut App, f: impl FnOnce(&mut ButtonInput<MouseButton>)) {
    let mut buttons = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
    buttons.clear();
    f(&mut buttons);
}

fn settle(app: &mut App, frames: usize) {
    for _ in 0..frames {
        mouse(app, |_| {});
        app.update();
    }
}

fn joint_count(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, With<DragJoint>>()
        .iter(app.world())
        .count()
}

fn mouse_session_open(app: &App) -> bool {
    app.world()
        .resource::<DragController>()
        .session(MOUSE_POINTER_ID)
        .is_some()
}

#[test]
fn press_over_card_opens_session_with_joint() {
    let mut app = test_app();
    let card = spawn_card(&mut app);
    settle(&mut app, 3);

    put_cursor(&mut app, Vec2::new(20.0, 20.0));
    mouse(&mut app, |b| b.press(MouseButton::Left));
    app.update();

    assert!(mouse_session_open(&app), "press over the card should grab it");
    assert_eq!(joint_count(&mut app), 1);
    assert_eq!(
        app.world().get::<RigidBody>(card).copied(),
        Some(RigidBody::Dynamic)
    );
}

#[test]
fn press_beside_card_grabs_nothing() {
    let mut app = test_app();
    spawn_card(&mut app);
    settle(&mut app, 3);

    put_cursor(&mut app, Vec2::new(200.0, 0.0));
    mouse(&mut app, |b| b.press(MouseButton::Left));
    app.update();

    assert!(!mouse_session_open(&app));
    assert_eq!(joint_count(&mut app), 0);
}

#[test]
fn release_despawns_joint_and_parks_card() {
    let mut app = test_app();
    let card = spawn_card(&mut app);
    settle(&mut app, 3);

    put_cursor(&mut app, Vec2::new(20.0, 20.0));
    mouse(&mut app, |b| b.press(MouseButton::Left));
    app.update();
    assert!(mouse_session_open(&app));

    mouse(&mut app, |b| b.release(MouseButton::Left));
    app.update();

    assert!(!mouse_session_open(&app));
    assert_eq!(joint_count(&mut app), 0);
    assert_eq!(
        app.world().get::<RigidBody>(card).copied(),
        Some(RigidBody::Fixed)
    );
}

#[test]
fn click_within_one_frame_leaves_no_session() {
    let mut app = test_app();
    let card = spawn_card(&mut app);
    settle(&mut app, 3);

    put_cursor(&mut app, Vec2::new(20.0, 20.0));
    mouse(&mut app, |b| {
        b.press(MouseButton::Left);
        b.release(MouseButton::Left);
    });
    app.update();
    settle(&mut app, 3);

    assert!(!mouse_session_open(&app));
    assert_eq!(joint_count(&mut app), 0);
    assert_eq!(
        app.world().get::<RigidBody>(card).copied(),
        Some(RigidBody::Fixed)
    );

    // The pointer id is free again for a normal grab.
    mouse(&mut app, |b| b.press(MouseButton::Left));
    app.update();
    assert!(mouse_session_open(&app));
}

#[test]
fn held_pointer_steers_joint_toward_cursor() {
    let mut app = test_app();
    spawn_card(&mut app);
    settle(&mut app, 3);

    put_cursor(&mut app, Vec2::new(20.0, 20.0));
    mouse(&mut app, |b| b.press(MouseButton::Left));
    app.update();
    put_cursor(&mut app, Vec2::new(220.0, 20.0));
    settle(&mut app, 1);
    app.world_mut().run_schedule(FixedUpdate);

    let mut joints = app
        .world_mut()
        .query_filtered::<&Velocity, With<DragJoint>>();
    let vel = joints.single(app.world()).expect("one drag joint").linvel;
    assert!(vel.x > 0.0, "joint should move right, got {vel:?}");
    assert!(vel.y.abs() < vel.x * 0.1, "joint should move mostly sideways, got {vel:?}");
}
