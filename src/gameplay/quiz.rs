use bevy::prelude::*;
use bevy_rapier2d::prelude::CollisionEvent;

use crate::core::components::{Answer, Matched, RoundEntity, Slot, SlotLabel};
use crate::core::config::GameConfig;
use crate::gameplay::round::spawn_round;

pub const CORRECT_TINT: Color = Color::srgb(0.2, 0.8, 0.3);
pub const WRONG_TINT: Color = Color::srgb(0.9, 0.25, 0.2);

/// In-memory quiz counters. Nothing here outlives the process.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    pub round: usize,
    pub wrong_attempts: u32,
    pub rounds_won: u32,
    pub rounds_lost: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Wrong { round_over: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Won,
    Lost,
}

/// Presentation cue; stands in for the audio and animation players.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCue {
    Intro,
    Win,
    Lose,
}

/// Sent after the board has moved on to `round`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundAdvanced {
    pub round: usize,
    pub outcome: RoundOutcome,
}

/// Delay between the deciding match and the next round. While set, matches are ignored.
#[derive(Resource, Debug, Default)]
pub struct PendingAdvance(pub Option<(Timer, RoundOutcome)>);

impl PendingAdvance {
    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }
    pub fn schedule(&mut self, delay: f32, outcome: RoundOutcome) {
        if self.0.is_none() {
            self.0 = Some((
                Timer::from_seconds(delay.max(0.0), TimerMode::Once),
                outcome,
            ));
        }
    }
}

/// Scores one answer dropped on one slot. Reaching `max_wrong` wrong attempts ends the round.
pub fn judge(answer_id: u32, slot_id: u32, board: &mut Scoreboard, max_wrong: u32) -> Verdict {
    if answer_id == slot_id {
        return Verdict::Correct;
    }
    board.wrong_attempts += 1;
    Verdict::Wrong {
        round_over: board.wrong_attempts >= max_wrong,
    }
}

fn slot_and_answer(
    a: Entity,
    b: Entity,
    slots: &Query<&Slot>,
) -> Option<(Entity, Entity)> {
    if slots.contains(a) {
        Some((a, b))
    } else if slots.contains(b) {
        Some((b, a))
    } else {
        None
    }
}

pub fn judge_matches(
    mut commands: Commands,
    mut collisions: EventReader<CollisionEvent>,
    cfg: Res<GameConfig>,
    mut board: ResMut<Scoreboard>,
    mut pending: ResMut<PendingAdvance>,
    mut cues: EventWriter<QuizCue>,
    slots: Query<&Slot>,
    mut answers: Query<(&Answer, Option<&mut Sprite>), Without<Matched>>,
    mut labels: Query<(&ChildOf, &mut Text2d), With<SlotLabel>>,
) {
    for event in collisions.read() {
        let CollisionEvent::Started(a, b, _) = *event else {
            continue;
        };
        let Some((slot_e, answer_e)) = slot_and_answer(a, b, &slots) else {
            continue;
        };
        if pending.is_pending() {
            continue;
        }
        let Ok(slot) = slots.get(slot_e) else {
            continue;
        };
        let Ok((answer, sprite)) = answers.get_mut(answer_e) else {
            continue;
        };
        let verdict = judge(answer.id, slot.id, &mut board, cfg.quiz.max_wrong_attempts);
        info!(answer = answer.id, slot = slot.id, ?verdict, "Quiz verdict");
        match verdict {
            Verdict::Correct => {
                cues.write(QuizCue::Win);
                for (child_of, mut text) in &mut labels {
                    if child_of.parent() == slot_e {
                        text.0 = answer.label.clone();
                    }
                }
                if let Some(mut sprite) = sprite {
                    sprite.color = CORRECT_TINT;
                }
                commands.entity(answer_e).insert(Matched { slot: slot_e });
                pending.schedule(cfg.quiz.advance_delay, RoundOutcome::Won);
            }
            Verdict::Wrong { round_over } => {
                if round_over {
                    pending.schedule(cfg.quiz.advance_delay, RoundOutcome::Lost);
                }
                cues.write(QuizCue::Lose);
                if let Some(mut sprite) = sprite {
                    sprite.color = WRONG_TINT;
                }
            }
        }
    }
}

/// Counts down a scheduled advance, then tears the round down and builds the next one.
pub fn advance_round(
    mut commands: Commands,
    time: Res<Time>,
    cfg: Res<GameConfig>,
    mut board: ResMut<Scoreboard>,
    mut pending: ResMut<PendingAdvance>,
    mut cues: EventWriter<QuizCue>,
    mut advanced: EventWriter<RoundAdvanced>,
    round_entities: Query<Entity, With<RoundEntity>>,
) {
    let Some((timer, outcome)) = pending.0.as_mut() else {
        return;
    };
    if !timer.tick(time.delta()).finished() {
        return;
    }
    let outcome = *outcome;
    pending.0 = None;
    match outcome {
        RoundOutcome::Won => board.rounds_won += 1,
        RoundOutcome::Lost => board.rounds_lost += 1,
    }
    board.wrong_attempts = 0;
    board.round = (board.round + 1) % cfg.quiz.rounds.len().max(1);
    for entity in &round_entities {
        commands.entity(entity).despawn();
    }
    info!(
        round = board.round,
        won = board.rounds_won,
        lost = board.rounds_lost,
        ?outcome,
        "Advancing to next round"
    );
    spawn_round(&mut commands, &cfg, board.round);
    advanced.write(RoundAdvanced {
        round: board.round,
        outcome,
    });
    cues.write(QuizCue::Intro);
}

pub fn announce_cues(mut cues: EventReader<QuizCue>) {
    for cue in cues.read() {
        let (host, player) = match cue {
            QuizCue::Intro => ("talk", "idle"),
            QuizCue::Win => ("talk", "correct"),
            QuizCue::Lose => ("talk", "wrong"),
        };
        info!(?cue, host, player, "Cue");
    }
}
