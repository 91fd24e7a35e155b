pub mod quiz;
pub mod round;

use bevy::prelude::*;

use crate::core::system::system_order::{JudgingSet, PointerInputSet};
use crate::interaction::drag::{DragController, EcsDragHost};
use quiz::{PendingAdvance, QuizCue, RoundAdvanced, Scoreboard};

/// Slot judging, scoring and round flow.
pub struct QuizPlugin;

impl Plugin for QuizPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Scoreboard>()
            .init_resource::<PendingAdvance>()
            .add_event::<QuizCue>()
            .add_event::<RoundAdvanced>()
            .add_systems(Startup, round::spawn_first_round)
            .add_systems(
                Update,
                (
                    quiz::judge_matches,
                    quiz::advance_round,
                    release_held_answers,
                    quiz::announce_cues,
                )
                    .chain()
                    .in_set(JudgingSet)
                    .after(PointerInputSet),
            );
    }
}

/// The previous round's cards are gone after an advance; drop any joints still holding them.
fn release_held_answers(
    mut advanced: EventReader<RoundAdvanced>,
    mut controller: ResMut<DragController>,
    mut host: EcsDragHost,
) {
    if advanced.read().count() > 0 {
        controller.end_all(&mut host);
    }
}
