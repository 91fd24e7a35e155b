use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "slot_quiz", about = "Drag-and-drop quiz board")]
pub struct CliArgs {
    /// Config layers, merged in order. Replaces the default pair when given.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Vec<PathBuf>,

    /// Parse and validate each config layer, print findings, then exit.
    #[arg(long)]
    pub check_config: bool,
}

impl CliArgs {
    pub fn config_paths(&self) -> Vec<PathBuf> {
        if self.config.is_empty() {
            vec![
                PathBuf::from("assets/config/game.ron"),
                PathBuf::from("assets/config/game.local.ron"),
            ]
        } else {
            self.config.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layers_when_none_given() {
        let args = CliArgs::parse_from(["slot_quiz"]);
        assert_eq!(args.config_paths().len(), 2);
        assert!(!args.check_config);
    }

    #[test]
    fn explicit_layers_replace_defaults() {
        let args = CliArgs::parse_from([
            "slot_quiz",
            "--config",
            "a.ron",
            "--config",
            "b.ron",
            "--check-config",
        ]);
        assert_eq!(
            args.config_paths(),
            vec![PathBuf::from("a.ron"), PathBuf::from("b.ron")]
        );
        assert!(args.check_config);
    }
}
