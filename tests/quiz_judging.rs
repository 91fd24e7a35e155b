use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use bevy_rapier2d::rapier::geometry::CollisionEventFlags;

use slot_quiz::core::components::{Answer, HomePosition, Matched, RoundEntity, Slot, SlotLabel};
use slot_quiz::core::config::GameConfig;
use slot_quiz::gameplay::quiz::{
    advance_round, judge_matches, PendingAdvance, QuizCue, RoundAdvanced, RoundOutcome,
    Scoreboard, CORRECT_TINT, WRONG_TINT,
};

fn test_app(advance_delay: f32, with_advance: bool) -> App {
    let mut cfg = GameConfig::default();
    cfg.quiz.advance_delay = advance_delay;
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(cfg);
    app.init_resource::<Scoreboard>();
    app.init_resource::<PendingAdvance>();
    app.add_event::<CollisionEvent>();
    app.add_event::<QuizCue>();
    app.add_event::<RoundAdvanced>();
    if with_advance {
        app.add_systems(Update, (judge_matches, advance_round).chain());
    } else {
        app.add_systems(Update, judge_matches);
    }
    app
}

fn spawn_slot(app: &mut App, id: u32) -> Entity {
    let slot = app
        .world_mut()
        .spawn((RoundEntity, Slot { id }, Transform::default()))
        .id();
    app.world_mut()
        .spawn((SlotLabel, Text2d::new("?"), ChildOf(slot)));
    slot
}

fn spawn_answer(app: &mut App, id: u32, label: &str) -> Entity {
    app.world_mut()
        .spawn((
            RoundEntity,
            Answer {
                id,
                label: label.into(),
            },
            HomePosition(Vec2::ZERO),
            Sprite::from_color(Color::WHITE, Vec2::splat(10.0)),
            Transform::default(),
        ))
        .id()
}

fn drop_on(app: &mut App, slot: Entity, answer: Entity) {
    app.world_mut().send_event(CollisionEvent::Started(
        slot,
        answer,
        CollisionEventFlags::SENSOR,
    ));
    app.update();
}

fn cues(app: &App) -> Vec<QuizCue> {
    let events = app.world().resource::<Events<QuizCue>>();
    events.get_cursor().read(events).copied().collect()
}

fn slot_label(app: &mut App) -> String {
    app.world_mut()
        .query_filtered::<&Text2d, With<SlotLabel>>()
        .single(app.world())
        .expect("one slot label")
        .0
        .clone()
}

#[test]
fn correct_answer_fills_slot_and_schedules_win() {
    let mut app = test_app(3.0, false);
    let slot = spawn_slot(&mut app, 2);
    let cat = spawn_answer(&mut app, 2, "Cat");
    drop_on(&mut app, slot, cat);

    let world = app.world();
    assert_eq!(world.get::<Sprite>(cat).map(|s| s.color), Some(CORRECT_TINT));
    assert_eq!(world.get::<Matched>(cat).map(|m| m.slot), Some(slot));
    let pending = world.resource::<PendingAdvance>();
    assert!(matches!(pending.0, Some((_, RoundOutcome::Won))));
    assert_eq!(world.resource::<Scoreboard>().wrong_attempts, 0);
    assert_eq!(cues(&app), vec![QuizCue::Win]);
    assert_eq!(slot_label(&mut app), "Cat");
}

#[test]
fn collision_order_does_not_matter() {
    let mut app = test_app(3.0, false);
    let slot = spawn_slot(&mut app, 2);
    let cat = spawn_answer(&mut app, 2, "Cat");
    app.world_mut().send_event(CollisionEvent::Started(
        cat,
        slot,
        CollisionEventFlags::SENSOR,
    ));
    app.update();
    assert!(app.world().get::<Matched>(cat).is_some());
}

#[test]
fn wrong_answers_tint_and_lose_after_limit() {
    let mut app = test_app(3.0, false);
    let slot = spawn_slot(&mut app, 2);
    let dog = spawn_answer(&mut app, 1, "Dog");
    let cow = spawn_answer(&mut app, 3, "Cow");

    drop_on(&mut app, slot, dog);
    assert_eq!(app.world().resource::<Scoreboard>().wrong_attempts, 1);
    assert!(!app.world().resource::<PendingAdvance>().is_pending());
    assert_eq!(
        app.world().get::<Sprite>(dog).map(|s| s.color),
        Some(WRONG_TINT)
    );

    drop_on(&mut app, slot, cow);
    assert_eq!(app.world().resource::<Scoreboard>().wrong_attempts, 2);
    let pending = app.world().resource::<PendingAdvance>();
    assert!(matches!(pending.0, Some((_, RoundOutcome::Lost))));
    assert!(app.world().get::<Matched>(cow).is_none());
    assert_eq!(slot_label(&mut app), "?");
}

#[test]
fn matches_are_ignored_while_advance_pending() {
    let mut app = test_app(3.0, false);
    let slot = spawn_slot(&mut app, 2);
    let cat = spawn_answer(&mut app, 2, "Cat");
    let dog = spawn_answer(&mut app, 1, "Dog");
    drop_on(&mut app, slot, cat);
    drop_on(&mut app, slot, dog);
    assert_eq!(app.world().resource::<Scoreboard>().wrong_attempts, 0);
    assert_eq!(
        app.world().get::<Sprite>(dog).map(|s| s.color),
        Some(Color::WHITE)
    );
}

#[test]
fn non_slot_collisions_are_ignored() {
    let mut app = test_app(3.0, false);
    let _slot = spawn_slot(&mut app, 2);
    let cat = spawn_answer(&mut app, 2, "Cat");
    let dog = spawn_answer(&mut app, 1, "Dog");
    drop_on(&mut app, cat, dog);
    assert!(!app.world().resource::<PendingAdvance>().is_pending());
    assert!(cues(&app).is_empty());
}

#[test]
fn finished_round_is_replaced_by_the_next() {
    let mut app = test_app(0.0, true);
    let slot = spawn_slot(&mut app, 2);
    let cat = spawn_answer(&mut app, 2, "Cat");
    drop_on(&mut app, slot, cat);

    assert!(app.world().get_entity(cat).is_err());
    assert!(app.world().get_entity(slot).is_err());
    let board = app.world().resource::<Scoreboard>().clone();
    assert_eq!(board.rounds_won, 1);
    assert_eq!(board.wrong_attempts, 0);
    assert!(!app.world().resource::<PendingAdvance>().is_pending());

    let answers = app
        .world_mut()
        .query::<&Answer>()
        .iter(app.world())
        .count();
    assert_eq!(answers, GameConfig::default().quiz.rounds[0].answers.len());

    let advanced = app.world().resource::<Events<RoundAdvanced>>();
    let sent: Vec<_> = advanced.get_cursor().read(advanced).copied().collect();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].outcome, RoundOutcome::Won);
    assert_eq!(cues(&app), vec![QuizCue::Win, QuizCue::Intro]);
}
