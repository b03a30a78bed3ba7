//! Interactive chat session.
//!
//! A reader task forwards crossterm events over a channel; the loop selects
//! over those, exchange outcomes, and a spinner tick, and redraws whenever
//! something changed.

mod keybindings;
mod lifecycle;

use std::{error::Error, time::Duration};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use self::keybindings::{handle_key, handle_paste, KeyLoopAction};
use self::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use crate::commands::ChatCommandTarget;
use crate::core::exchange::ExchangeReceiver;
use crate::core::startup::{bootstrap_controller, StartupError};
use crate::ui::renderer::draw;
use crate::ui::theme::Theme;
use crate::ui::view::TerminalView;
use crate::utils::logging::LoggingState;

const SPINNER_INTERVAL: Duration = Duration::from_millis(150);

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

pub async fn run_chat(log: Option<String>, force_mock: bool) -> Result<(), Box<dyn Error>> {
    let logging = LoggingState::new(log)?;
    let view = TerminalView::new(logging, Theme::dark_default());

    let (mut controller, mut outcomes) = match bootstrap_controller(view, force_mock) {
        Ok(parts) => parts,
        Err(e) => {
            if let Some(startup_error) = e.downcast_ref::<StartupError>() {
                startup_error.print();
                std::process::exit(startup_error.exit_code());
            }
            return Err(e);
        }
    };

    let mut terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = tokio::spawn(async move {
        loop {
            // Short poll so the task notices a closed channel promptly.
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    });

    let result = event_loop(&mut terminal, &mut controller, &mut event_rx, &mut outcomes).await;

    event_reader_handle.abort();
    restore_terminal(&mut terminal)?;
    info!("chat session ended");
    result
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    controller: &mut ChatCommandTarget,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    outcomes: &mut ExchangeReceiver,
) -> Result<(), Box<dyn Error>> {
    let backend_label = controller.backend_label();
    let mut spinner = tokio::time::interval(SPINNER_INTERVAL);
    spinner.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut request_redraw = true;

    loop {
        if request_redraw {
            terminal.draw(|f| draw(f, controller.view_mut(), &backend_label))?;
            request_redraw = false;
        }

        tokio::select! {
            Some(ui_event) = event_rx.recv() => {
                match ui_event {
                    UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if handle_key(controller, key) == KeyLoopAction::Exit {
                            debug!("exit requested");
                            return Ok(());
                        }
                    }
                    UiEvent::Crossterm(Event::Paste(text)) => handle_paste(controller, &text),
                    UiEvent::Crossterm(_) => {}
                }
                request_redraw = true;
            }
            Some((outcome, exchange_id)) = outcomes.recv() => {
                controller.complete_exchange(exchange_id, outcome);
                request_redraw = true;
            }
            _ = spinner.tick() => {
                request_redraw = controller.is_busy();
            }
        }
    }
}
