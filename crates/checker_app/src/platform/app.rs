use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use checker_core::{update, AppState, Msg, SelectedImage};
use checker_engine::EngineHandle;
use checker_logging::{checker_debug, checker_info};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::ui::commands::{parse_command, UserCommand, HELP_TEXT};
use super::ui::render::render;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub fn run_app(config: AppConfig) -> anyhow::Result<()> {
    checker_info!("Using classification endpoint {}", config.endpoint);
    let engine = EngineHandle::new(config.submit_settings(), config.preview_settings())?;
    let runner = EffectRunner::new(engine);

    let (input_tx, input_rx) = mpsc::channel::<UserCommand>();
    // End of input closes the channel, which the loop treats as quit.
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(parse_command(&line)).is_err() {
                break;
            }
        }
    });

    let stdout = io::stdout();
    let mut shell = Shell::new(runner, stdout.lock());
    shell.print_lines(&[HELP_TEXT.to_string()])?;
    shell.render_current()?;

    loop {
        match input_rx.recv_timeout(POLL_INTERVAL) {
            Ok(command) => shell.handle_command(command)?,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => shell.request_quit(),
        }
        shell.pump_engine()?;
        if shell.should_exit() {
            break;
        }
    }

    checker_info!("Shutting down");
    Ok(())
}

/// Owns the state machine and feeds it from user commands and engine events.
struct Shell<W: Write> {
    state: AppState,
    runner: EffectRunner,
    out: W,
    quit_requested: bool,
}

impl<W: Write> Shell<W> {
    fn new(runner: EffectRunner, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            out,
            quit_requested: false,
        }
    }

    fn handle_command(&mut self, command: UserCommand) -> io::Result<()> {
        checker_debug!("User command {:?}", command);
        match command {
            UserCommand::Select(path) => {
                self.dispatch(Msg::FileSelected(Some(SelectedImage::from_path(path))))
            }
            UserCommand::Clear => self.dispatch(Msg::FileSelected(None)),
            UserCommand::Check => {
                if self.state.view().submit_enabled {
                    self.dispatch(Msg::SubmitClicked)
                } else {
                    self.print_lines(&["Check is disabled while a check is running.".to_string()])
                }
            }
            UserCommand::Health => self.dispatch(Msg::HealthCheckClicked),
            UserCommand::Help => self.print_lines(&[HELP_TEXT.to_string()]),
            UserCommand::Quit => {
                self.request_quit();
                Ok(())
            }
            UserCommand::Empty => Ok(()),
            UserCommand::Unknown(line) => {
                self.print_lines(&[format!("Unknown command: {line} (type `help`)")])
            }
        }
    }

    fn request_quit(&mut self) {
        if !self.quit_requested && self.state.is_submitting() {
            checker_info!("Waiting for the running check before quitting");
        }
        self.quit_requested = true;
    }

    fn should_exit(&self) -> bool {
        self.quit_requested && !self.state.is_submitting()
    }

    fn pump_engine(&mut self) -> io::Result<()> {
        while let Some(msg) = self.runner.poll() {
            self.dispatch(msg)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);

        if was_dirty {
            self.render_current()?;
        }
        Ok(())
    }

    fn render_current(&mut self) -> io::Result<()> {
        let lines = render(&self.state.view());
        self.print_lines(&lines)
    }

    fn print_lines(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}
