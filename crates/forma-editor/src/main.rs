//! Forma replay entry point

use std::path::PathBuf;
use std::process::ExitCode;

use forma_editor::ReplayScript;
use forma_editor::config::create_shared_config;

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forma_editor=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut settings_path = None;
    let mut script_path = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => settings_path = args.next().map(PathBuf::from),
            _ => script_path = Some(PathBuf::from(arg)),
        }
    }
    let Some(path) = script_path else {
        eprintln!("usage: forma [--config <settings.ron>] <script.ron>");
        return ExitCode::from(2);
    };

    let settings = create_shared_config(settings_path);
    tracing::info!("Replaying {:?}", path);
    let result = ReplayScript::load(&path).and_then(|script| {
        let (_, summary) = script.run(&settings);
        summary.to_json()
    });

    match result {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Replay failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
