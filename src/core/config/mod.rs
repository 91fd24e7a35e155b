pub mod config;

pub use config::{AnswerConfig, DragConfig, GameConfig, QuizConfig, RoundConfig, WindowConfig};
