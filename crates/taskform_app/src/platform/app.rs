use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use chrono::{DateTime, SecondsFormat, Utc};
use clap::Parser;
use taskform_core::{update, FormError, FormSettings, FormState, Msg};
use taskform_logging::{tf_info, tf_warn};

use super::cli::Cli;
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::ui::input::{parse_command, Command, HELP};
use super::ui::preset_dialog::TerminalPresetDialog;
use super::ui::render::render;

/// Everything the main loop reacts to.
pub enum LoopEvent {
    Input(Command),
    Form(Msg),
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli(&cli);
    taskform_logging::initialize(config.log_destination(), config.level());
    tf_info!("Using server {}", config.server_url);

    let settings = FormSettings {
        task: cli.task(),
        retry_delay: config.retry_delay(),
        ..FormSettings::new(name_placeholder(Utc::now()))
    };

    let (loop_tx, loop_rx) = mpsc::channel::<LoopEvent>();
    let mut runner = EffectRunner::new(
        config.fetch_settings(),
        loop_tx.clone(),
        Box::new(TerminalPresetDialog::new(io::stdout())),
    )?;
    spawn_input_reader(loop_tx);

    let mut state = step(FormState::new(settings), Msg::Mounted, &mut runner);
    while let Ok(event) = loop_rx.recv() {
        match event {
            LoopEvent::Form(msg) | LoopEvent::Input(Command::Form(msg)) => {
                state = step(state, msg, &mut runner);
            }
            LoopEvent::Input(Command::Help) => HELP.iter().for_each(|line| println!("{line}")),
            LoopEvent::Input(Command::Unknown(line)) => {
                println!("Unknown command {line:?}; type `help` for a list.");
            }
            LoopEvent::Input(Command::Quit) | LoopEvent::Quit => {
                step(state, Msg::Unmounted, &mut runner);
                break;
            }
        }
    }

    Ok(())
}

fn step(state: FormState, msg: Msg, runner: &mut EffectRunner) -> FormState {
    let before = state.error().cloned();
    let (mut state, effects) = update(state, msg);
    if let Some(error) = newly_failed(before.as_ref(), state.error()) {
        tf_warn!("{}", error);
    }
    if state.consume_dirty() {
        for line in render(&state.view()) {
            println!("{line}");
        }
    }
    runner.run(effects);
    state
}

/// The error the form switched to, if this step put it into an error state.
fn newly_failed<'a>(before: Option<&FormError>, after: Option<&'a FormError>) -> Option<&'a FormError> {
    after.filter(|error| before != Some(*error))
}

fn spawn_input_reader(tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if let Some(command) = parse_command(&line) {
                if tx.send(LoopEvent::Input(command)).is_err() {
                    return;
                }
            }
        }
        let _ = tx.send(LoopEvent::Quit);
    });
}

/// Name used when the user leaves the field blank, fixed when the form opens.
fn name_placeholder(now: DateTime<Utc>) -> String {
    format!("Task of {}", now.to_rfc3339_opts(SecondsFormat::Millis, true))
}
