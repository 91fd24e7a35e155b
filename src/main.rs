use bevy::prelude::*;
use clap::Parser;

use slot_quiz::interaction::session::config_hot_reload::ConfigReloadSettings;
use slot_quiz::{CliArgs, ConfigReport, GameConfig, GamePlugin};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let paths = args.config_paths();

    if args.check_config {
        let mut findings = 0usize;
        for path in &paths {
            if !path.exists() {
                println!("{}: not present, skipped", path.display());
                continue;
            }
            let cfg = GameConfig::load_from_file(path)?;
            let warnings = cfg.validate();
            findings += warnings.len();
            println!("{}: ok ({} warning(s))", path.display(), warnings.len());
            for w in warnings {
                println!("  - {w}");
            }
        }
        let (merged, _, _) = GameConfig::load_layered(&paths);
        println!(
            "merged: {} round(s), damping {}, freeze_rotation {}, snap_to_center {}",
            merged.quiz.rounds.len(),
            merged.drag.damping,
            merged.drag.freeze_rotation,
            merged.drag.snap_to_center
        );
        if findings > 0 {
            anyhow::bail!("{findings} config warning(s)");
        }
        return Ok(());
    }

    // Layered config: base + optional local override. Problems are logged at startup.
    let (cfg, used, errors) = GameConfig::load_layered(&paths);

    App::new()
        .insert_resource(cfg.clone())
        .insert_resource(ConfigReport { used, errors })
        .insert_resource(ConfigReloadSettings {
            paths,
            ..default()
        })
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(GamePlugin)
        .run();
    Ok(())
}
