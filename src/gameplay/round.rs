use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::seq::SliceRandom;

use crate::core::components::{Answer, HomePosition, Matched, RoundEntity, Slot, SlotLabel};
use crate::core::config::GameConfig;
use crate::gameplay::quiz::QuizCue;
use crate::interaction::drag::{DragStarted, DragStopped};

const ANSWER_COLOR: Color = Color::srgb(0.95, 0.92, 0.82);
const SLOT_COLOR: Color = Color::srgba(0.3, 0.35, 0.5, 0.8);
const LABEL_COLOR: Color = Color::srgb(0.1, 0.1, 0.12);
const RESTING_Z: f32 = 1.0;
const HELD_Z: f32 = 5.0;

pub const PROMPT_Y: f32 = 260.0;
pub const SLOT_Y: f32 = 60.0;
pub const ANSWER_ROW_Y: f32 = -200.0;

/// Evenly spaced, centred x positions for `count` cards.
pub fn row_positions(count: usize, card_width: f32) -> Vec<f32> {
    let spacing = card_width * 1.3;
    let start = -(count.saturating_sub(1) as f32) * spacing * 0.5;
    (0..count).map(|i| start + i as f32 * spacing).collect()
}

/// Builds the prompt, slot and answer cards for `round` (wrapping). Every entity carries
/// [`RoundEntity`] so an advance can clear it.
pub fn spawn_round(commands: &mut Commands, cfg: &GameConfig, round: usize) {
    let quiz = &cfg.quiz;
    let Some(round_cfg) = quiz.rounds.get(round % quiz.rounds.len().max(1)) else {
        warn!("No quiz rounds configured; board left empty");
        return;
    };

    commands.spawn((
        RoundEntity,
        Text2d::new(round_cfg.prompt.clone()),
        TextColor(Color::WHITE),
        Transform::from_xyz(0.0, PROMPT_Y, RESTING_Z),
    ));

    let slot_half = quiz.slot_size * 0.5;
    commands
        .spawn((
            RoundEntity,
            Slot { id: round_cfg.slot_id },
            Sprite::from_color(SLOT_COLOR, quiz.slot_size),
            Transform::from_xyz(0.0, SLOT_Y, 0.0),
            RigidBody::Fixed,
            Collider::cuboid(slot_half.x, slot_half.y),
            Sensor,
            ActiveEvents::COLLISION_EVENTS,
        ))
        .with_children(|parent| {
            parent.spawn((
                SlotLabel,
                Text2d::new("?"),
                TextColor(Color::WHITE),
                Transform::from_xyz(0.0, 0.0, 0.1),
            ));
        });

    let mut order: Vec<usize> = (0..round_cfg.answers.len()).collect();
    order.shuffle(&mut rand::thread_rng());
    let xs = row_positions(round_cfg.answers.len(), quiz.answer_size.x);
    let answer_half = quiz.answer_size * 0.5;
    let membership = Group::from_bits_truncate(cfg.drag.draggable_layers);

    for (slot_index, answer_index) in order.into_iter().enumerate() {
        let answer = &round_cfg.answers[answer_index];
        let home = Vec2::new(xs[slot_index], ANSWER_ROW_Y);
        commands
            .spawn((
                RoundEntity,
                Answer {
                    id: answer.id,
                    label: answer.label.clone(),
                },
                HomePosition(home),
                Sprite::from_color(ANSWER_COLOR, quiz.answer_size),
                Transform::from_translation(home.extend(RESTING_Z)),
                RigidBody::Fixed,
                Collider::cuboid(answer_half.x, answer_half.y),
                CollisionGroups::new(membership, Group::ALL),
                ActiveEvents::COLLISION_EVENTS,
                Velocity::zero(),
                GravityScale(0.0),
                Damping {
                    linear_damping: 4.0,
                    angular_damping: 4.0,
                },
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text2d::new(answer.label.clone()),
                    TextColor(LABEL_COLOR),
                    Transform::from_xyz(0.0, 0.0, 0.1),
                ));
            })
            .observe(lift_held_answer)
            .observe(settle_released_answer);
    }
}

pub fn spawn_first_round(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    mut cues: EventWriter<QuizCue>,
) {
    spawn_round(&mut commands, &cfg, 0);
    cues.write(QuizCue::Intro);
}

fn lift_held_answer(trigger: Trigger<DragStarted>, mut answers: Query<&mut Transform, With<Answer>>) {
    if let Ok(mut tf) = answers.get_mut(trigger.target()) {
        tf.translation.z = HELD_Z;
    }
}

/// A released card either docks on the slot it matched or goes back to its home spot.
fn settle_released_answer(
    trigger: Trigger<DragStopped>,
    mut answers: Query<
        (&HomePosition, Option<&Matched>, &mut Transform, &mut Velocity),
        With<Answer>,
    >,
    slots: Query<&GlobalTransform, With<Slot>>,
) {
    let Ok((home, matched, mut tf, mut vel)) = answers.get_mut(trigger.target()) else {
        return;
    };
    let target = matched
        .and_then(|m| slots.get(m.slot).ok())
        .map(|slot_tf| slot_tf.translation().truncate())
        .unwrap_or(home.0);
    tf.translation = target.extend(RESTING_Z);
    tf.rotation = Quat::IDENTITY;
    *vel = Velocity::zero();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_is_centred() {
        let xs = row_positions(3, 100.0);
        assert_eq!(xs.len(), 3);
        assert!((xs[0] + xs[2]).abs() < 1e-4);
        assert!(xs[1].abs() < 1e-4);
        assert!((xs[1] - xs[0] - 130.0).abs() < 1e-4);
        assert_eq!(row_positions(1, 100.0), vec![0.0]);
        assert!(row_positions(0, 100.0).is_empty());
    }
}
