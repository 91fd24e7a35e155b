//! Central system ordering labels to make update sequence explicit.
//! Stages (high-level):
//! 1. PointerInput (`Update`: sample pointers, begin/end drags)
//! 2. Judging (`Update`: react to sensor contacts after input)
//! 3. DragDrive (`FixedUpdate`: joint velocities before the Rapier step)
//! 4. Rapier (handled by plugin in the fixed schedule)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PointerInputSet; // drag sessions open and close here

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct JudgingSet; // quiz verdicts from collision events

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct DragDriveSet; // per physics tick joint steering
