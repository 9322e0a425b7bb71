//! Terminal UI: ratatui + crossterm event loop around the voice agent.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;

use crate::agent::VoiceAgent;
use crate::ui::panels;

/// Runs the UI until the user quits
///
/// Blocks the calling thread; agent work (asks, speech sessions) runs on the
/// tokio runtime, so the loop only reads shared state and forwards key
/// presses.
pub fn run(agent: Arc<VoiceAgent>) -> Result<()> {
    terminal::enable_raw_mode()?;
    std::io::stdout().execute(EnterAlternateScreen)?;
    let mut term = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;

    log::info!("UI started; Space=mic, Enter=ask, 1-4=quick actions, q=quit");

    let result = run_loop(&mut term, &agent);

    terminal::disable_raw_mode()?;
    std::io::stdout().execute(LeaveAlternateScreen)?;

    agent.shutdown();
    result
}

fn run_loop(
    term: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    agent: &Arc<VoiceAgent>,
) -> Result<()> {
    loop {
        term.draw(|frame| {
            let area = frame.area();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(7),  // hero
                    Constraint::Min(12),    // voice panel
                    Constraint::Length(8),  // feature grid
                    Constraint::Length(1),  // footer
                ])
                .split(area);

            panels::draw_hero(frame, chunks[0]);
            panels::draw_voice_panel(frame, chunks[1], agent);
            panels::draw_features(frame, chunks[2]);
            panels::draw_footer(frame, chunks[3]);
        })?;

        // Poll with a short timeout so state changes repaint promptly
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => break,
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => break,
            (KeyCode::Char(' '), _) => agent.toggle_listening(),
            (KeyCode::Enter, _) => submit(agent, None),
            (KeyCode::Char(c @ '1'..='4'), _) => {
                let index = c as usize - '1' as usize;
                if let Some(action) = agent.actions().get(index) {
                    let route = action.route.clone();
                    submit(agent, Some(route));
                }
            }
            (_, _) => {}
        }
    }

    Ok(())
}

/// Fires an ask on the runtime without blocking the UI thread
fn submit(agent: &Arc<VoiceAgent>, route: Option<crate::router::Route>) {
    if agent.is_loading() {
        return;
    }
    let agent = agent.clone();
    tokio::spawn(async move {
        agent.ask(route).await;
    });
}
