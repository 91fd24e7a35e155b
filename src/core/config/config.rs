use anyhow::Context;
use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Slot Quiz".into(),
            auto_close: 0.0,
        }
    }
}

/// Pointer drag tuning. `damping` <= 0 is corrected to 1 when the settings are built.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DragConfig {
    /// Collision group bits eligible for picking.
    pub draggable_layers: u32,
    /// Higher values track the pointer more sluggishly.
    pub damping: f32,
    pub freeze_rotation: bool,
    pub snap_to_center: bool,
    pub snap_speed: f32,
    /// Switch `Fixed` bodies to `Dynamic` while held, restoring them on release.
    pub wake_fixed_bodies: bool,
    /// World pixels per drag velocity unit. Drag speed is screen distance / damping in
    /// these units, so at 100 the default damping closes a gap in about 0.1 s.
    pub pixels_per_unit: f32,
}
impl Default for DragConfig {
    fn default() -> Self {
        Self {
            draggable_layers: 0b0001,
            damping: 10.0,
            freeze_rotation: false,
            snap_to_center: true,
            snap_speed: 3.0,
            wake_fixed_bodies: true,
            pixels_per_unit: 100.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AnswerConfig {
    pub id: u32,
    pub label: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct RoundConfig {
    pub prompt: String,
    pub slot_id: u32,
    pub answers: Vec<AnswerConfig>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct QuizConfig {
    /// Seconds between the deciding match and the next round.
    pub advance_delay: f32,
    /// Wrong matches allowed before the round is lost.
    pub max_wrong_attempts: u32,
    pub answer_size: Vec2,
    pub slot_size: Vec2,
    pub rounds: Vec<RoundConfig>,
}
impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            advance_delay: 3.0,
            max_wrong_attempts: 2,
            answer_size: Vec2::new(160.0, 90.0),
            slot_size: Vec2::new(200.0, 120.0),
            rounds: vec![RoundConfig {
                prompt: "Which animal says \"meow\"?".into(),
                slot_id: 2,
                answers: vec![
                    AnswerConfig {
                        id: 1,
                        label: "Dog".into(),
                    },
                    AnswerConfig {
                        id: 2,
                        label: "Cat".into(),
                    },
                    AnswerConfig {
                        id: 3,
                        label: "Cow".into(),
                    },
                ],
            }],
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub drag: DragConfig,
    pub quiz: QuizConfig,
    pub rapier_debug: bool,
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        ron::from_str(&data).with_context(|| format!("parse RON {}", path.display()))
    }
    /// Deep-merges every readable file in order (later files win) and deserializes the result.
    /// Never fails: unreadable layers are reported in the error list and defaults fill the gaps.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                if let Some(val) = incoming.take() {
                                    merge_value(ev, val);
                                }
                                break;
                            }
                        }
                        if let Some(val) = incoming {
                            bm.insert(k, val);
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        let Some(val) = merged else {
            return (GameConfig::default(), used, errors);
        };
        match val.into_rust::<GameConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (GameConfig::default(), used, errors)
            }
        }
    }
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        } else if !self.window.auto_close.is_finite() {
            w.push(format!(
                "window.autoClose {} not finite -> treated as disabled",
                self.window.auto_close
            ));
        }
        let dr = &self.drag;
        if dr.draggable_layers == 0 {
            w.push("drag.draggable_layers is 0; nothing can be picked".into());
        }
        if dr.damping.is_nan() || dr.damping <= 0.0 {
            w.push(format!(
                "drag.damping {} must be > 0 (runtime uses 1.0)",
                dr.damping
            ));
        }
        if !dr.snap_speed.is_finite() {
            w.push(format!(
                "drag.snap_speed {} not finite (runtime uses 0.0)",
                dr.snap_speed
            ));
        } else if dr.snap_to_center && dr.snap_speed <= 0.0 {
            w.push(format!(
                "drag.snap_speed {} <= 0 with snap_to_center enabled; anchor never moves",
                dr.snap_speed
            ));
        }
        if !dr.pixels_per_unit.is_finite() || dr.pixels_per_unit <= 0.0 {
            w.push(format!(
                "drag.pixels_per_unit {} must be > 0 (runtime uses 1.0)",
                dr.pixels_per_unit
            ));
        }
        let q = &self.quiz;
        if q.advance_delay < 0.0 {
            w.push(format!("quiz.advance_delay {} negative", q.advance_delay));
        }
        if q.max_wrong_attempts == 0 {
            w.push("quiz.max_wrong_attempts is 0; the first wrong answer ends the round".into());
        }
        if q.answer_size.min_element() <= 0.0 || q.slot_size.min_element() <= 0.0 {
            w.push("quiz.answer_size / quiz.slot_size must be > 0".into());
        }
        if q.rounds.is_empty() {
            w.push("quiz.rounds is empty; nothing to play".into());
        }
        for (i, round) in q.rounds.iter().enumerate() {
            if round.answers.is_empty() {
                w.push(format!("quiz.rounds[{i}] has no answers"));
            } else if !round.answers.iter().any(|a| a.id == round.slot_id) {
                w.push(format!(
                    "quiz.rounds[{i}] slot_id {} matches no answer; round cannot be won",
                    round.slot_id
                ));
            }
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates_clean() {
        let warns = GameConfig::default().validate();
        assert!(warns.is_empty(), "unexpected warnings: {warns:?}");
    }

    #[test]
    fn unwinnable_round_is_flagged() {
        let mut cfg = GameConfig::default();
        cfg.quiz.rounds[0].slot_id = 99;
        let warns = cfg.validate();
        assert!(warns.iter().any(|w| w.contains("cannot be won")));
    }

    #[test]
    fn non_finite_values_are_flagged() {
        let mut cfg = GameConfig::default();
        cfg.window.auto_close = f32::INFINITY;
        cfg.drag.snap_speed = f32::NAN;
        cfg.drag.pixels_per_unit = -1.0;
        let warns = cfg.validate();
        assert!(warns.iter().any(|w| w.contains("window.autoClose")));
        assert!(warns.iter().any(|w| w.contains("drag.snap_speed")));
        assert!(warns.iter().any(|w| w.contains("drag.pixels_per_unit")));
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let cfg: GameConfig = ron::from_str("(drag: (damping: 4.0))").expect("parse");
        assert_eq!(cfg.drag.damping, 4.0);
        assert!(cfg.drag.snap_to_center);
        assert_eq!(cfg.quiz.max_wrong_attempts, 2);
    }
}
