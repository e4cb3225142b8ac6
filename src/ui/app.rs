use crate::api::CourseApi;
use crate::theme::Theme;
use crate::ui::command::{perform, Command, Message};
use crate::ui::render::render_ui;
use crate::ui::shell::Shell;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

pub struct App {
    api: Arc<dyn CourseApi>,
    shell: Shell,
    message_tx: mpsc::UnboundedSender<Message>,
    message_rx: mpsc::UnboundedReceiver<Message>,
}

impl App {
    pub fn new(api: Arc<dyn CourseApi>, theme: Theme) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            api,
            shell: Shell::new(theme),
            message_tx,
            message_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Load initial course list
        let initial = self.shell.start();
        self.dispatch(initial);

        // Main event loop
        let result = self.event_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        tracing::info!("Course catalog exiting");
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        loop {
            self.shell.tick(Instant::now());

            while let Ok(message) = self.message_rx.try_recv() {
                if let Some(command) = self.shell.handle_message(message) {
                    self.dispatch(command);
                }
            }

            terminal.draw(|f| render_ui(f, &self.shell))?;

            // Check for keyboard events with a short timeout
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Some(command) = self.shell.handle_key(key) {
                            self.dispatch(command);
                        }
                    }
                }
            }

            if self.shell.should_quit() {
                break;
            }

            // Small yield so spawned requests make progress
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Ok(())
    }

    /// Runs `command` in the background; its result comes back as a message.
    fn dispatch(&self, command: Command) {
        let api = Arc::clone(&self.api);
        let tx = self.message_tx.clone();

        tokio::spawn(async move {
            let message = perform(api.as_ref(), command).await;
            if tx.send(message).is_err() {
                tracing::debug!("UI closed before request completed");
            }
        });
    }
}
