use bevy::prelude::*;

/// Target the player drops answers onto. Matches when `Answer::id == Slot::id`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub id: u32,
}

/// Draggable answer card.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub id: u32,
    pub label: String,
}

/// Tag for the text child of a slot; receives the matched answer's label.
#[derive(Component)]
pub struct SlotLabel;

/// Where an answer returns to when released without a match.
#[derive(Component, Debug, Deref, DerefMut, Copy, Clone)]
pub struct HomePosition(pub Vec2);

/// Set on an answer once it has been judged correct for this slot.
#[derive(Component, Debug, Copy, Clone)]
pub struct Matched {
    pub slot: Entity,
}

/// Everything spawned for the current round; despawned on advance.
#[derive(Component)]
pub struct RoundEntity;

/// Transient kinematic body hosting the pointer joint.
#[derive(Component)]
pub struct DragJoint;

/// Body whose velocity is added to every drag (e.g. a moving platform).
#[derive(Component)]
pub struct DragReference;
