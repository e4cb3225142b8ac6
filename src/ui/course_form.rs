use crate::api::ApiError;
use crate::draft::CourseDraft;
use crate::models::Course;
use crate::theme::Palette;
use crate::toast::Notifier;
use crate::ui::command::Command;
use crate::ui::render::{centered_rect, render_confirm};
use crate::ui::state::{FormField, FormMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const MAX_TIME_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    None,
    Command(Command),
    Cancelled,
}

/// Inline detail plus a shorter toast message for a failed save.
pub fn describe_failure(err: &ApiError) -> (String, &'static str) {
    match err {
        ApiError::Server { status, body } => {
            let toast = if err.is_client_fault() {
                "Invalid data. Check the information entered."
            } else if err.is_server_fault() {
                "Internal server error. Please try again."
            } else {
                "Error while saving the course"
            };
            (format!("Server error ({}): {}", status.as_u16(), body), toast)
        }
        ApiError::Network { .. } => (
            "Unable to contact the server".to_string(),
            "Cannot connect to the server. Check your connection.",
        ),
        ApiError::Request { message } => (message.clone(), "Error while saving the course"),
    }
}

#[derive(Debug)]
pub struct CourseForm {
    mode: FormMode,
    draft: CourseDraft,
    focus: FormField,
    submitting: bool,
    error: Option<String>,
    confirming_cancel: bool,
}

impl CourseForm {
    pub fn create() -> Self {
        Self::with_mode(FormMode::Create, CourseDraft::default())
    }

    pub fn edit(course: Course) -> Self {
        let draft = CourseDraft::from_course(&course);
        Self::with_mode(FormMode::Edit(course), draft)
    }

    fn with_mode(mode: FormMode, draft: CourseDraft) -> Self {
        Self {
            mode,
            draft,
            focus: FormField::Name,
            submitting: false,
            error: None,
            confirming_cancel: false,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn editing(&self) -> Option<&Course> {
        match &self.mode {
            FormMode::Edit(course) => Some(course),
            FormMode::Create => None,
        }
    }

    pub fn draft(&self) -> &CourseDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut CourseDraft {
        self.error = None;
        &mut self.draft
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_confirming_cancel(&self) -> bool {
        self.confirming_cancel
    }

    pub fn add_schedule(&mut self, notifier: &mut dyn Notifier) {
        self.draft.add_schedule();
        notifier.info("New time slot added");
    }

    pub fn remove_schedule(&mut self, index: usize, notifier: &mut dyn Notifier) {
        match self.draft.remove_schedule(index) {
            Ok(()) => {
                self.clamp_focus();
                notifier.warning("Time slot removed");
            }
            Err(e) => {
                notifier.error(&e.to_string());
            }
        }
    }

    /// Validates the draft and, when it passes, hands back the save call.
    /// A rejected draft never produces a command.
    pub fn submit(&mut self, notifier: &mut dyn Notifier) -> Option<Command> {
        if self.submitting {
            return None;
        }
        self.error = None;

        match self.draft.validate() {
            Ok(payload) => {
                self.submitting = true;
                tracing::info!(target_id = ?self.mode.target(), schedules = payload.schedules.len(), "Submitting course");
                Some(Command::SaveCourse {
                    target: self.mode.target(),
                    payload,
                })
            }
            Err(e) => {
                tracing::debug!(reason = %e, "Course form rejected");
                let message = e.to_string();
                notifier.error(&message);
                self.error = Some(message);
                None
            }
        }
    }

    /// The draft stays as it was so the user can retry.
    pub fn submit_failed(&mut self, err: &ApiError, notifier: &mut dyn Notifier) {
        tracing::error!(error = %err, kind = err.kind(), "Error saving course");
        let (detail, toast) = describe_failure(err);
        self.submitting = false;
        self.error = Some(detail);
        notifier.error(toast);
    }

    pub fn request_cancel(&mut self) -> FormAction {
        if self.draft.is_dirty() {
            self.confirming_cancel = true;
            FormAction::None
        } else {
            FormAction::Cancelled
        }
    }

    pub fn confirm_cancel(&mut self, notifier: &mut dyn Notifier) -> FormAction {
        if !self.confirming_cancel {
            return FormAction::None;
        }
        self.confirming_cancel = false;
        notifier.warning("Changes discarded");
        FormAction::Cancelled
    }

    pub fn handle_key(&mut self, key: KeyEvent, notifier: &mut dyn Notifier) -> FormAction {
        if self.submitting {
            return FormAction::None;
        }

        if self.confirming_cancel {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_cancel(notifier),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirming_cancel = false;
                    FormAction::None
                }
                _ => FormAction::None,
            };
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') => self.add_schedule(notifier),
                KeyCode::Char('d') => {
                    let index = self
                        .focus
                        .schedule_index()
                        .unwrap_or(self.draft.schedules().len().saturating_sub(1));
                    self.remove_schedule(index, notifier);
                }
                _ => {}
            }
            return FormAction::None;
        }

        match key.code {
            KeyCode::Esc => return self.request_cancel(),
            KeyCode::Enter => {
                return self
                    .submit(notifier)
                    .map_or(FormAction::None, FormAction::Command)
            }
            KeyCode::Tab | KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(-1),
            KeyCode::Left | KeyCode::Right => {
                if let FormField::Day(i) = self.focus {
                    let forward = key.code == KeyCode::Right;
                    if let Some(schedule) = self.draft_mut().schedule_mut(i) {
                        schedule.day = if forward {
                            schedule.day.next()
                        } else {
                            schedule.day.prev()
                        };
                    }
                }
            }
            KeyCode::Backspace => {
                let field = self.focus;
                if let Some(value) = self.field_value_mut(field) {
                    value.pop();
                }
            }
            KeyCode::Char(c) => {
                let field = self.focus;
                if field.is_time() && !(c.is_ascii_digit() || c == ':') {
                    return FormAction::None;
                }
                if let Some(value) = self.field_value_mut(field) {
                    if !field.is_time() || value.len() < MAX_TIME_LEN {
                        value.push(c);
                    }
                }
            }
            _ => {}
        }
        FormAction::None
    }

    fn move_focus(&mut self, step: isize) {
        let order = FormField::order(self.draft.schedules().len());
        let len = order.len() as isize;
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0) as isize;
        self.focus = order[(current + step).rem_euclid(len) as usize];
    }

    fn clamp_focus(&mut self) {
        let last = self.draft.schedules().len().saturating_sub(1);
        self.focus = match self.focus {
            FormField::Day(i) if i > last => FormField::Day(last),
            FormField::Start(i) if i > last => FormField::Start(last),
            FormField::End(i) if i > last => FormField::End(last),
            FormField::Location(i) if i > last => FormField::Location(last),
            other => other,
        };
    }

    fn field_value_mut(&mut self, field: FormField) -> Option<&mut String> {
        let draft = self.draft_mut();
        match field {
            FormField::Name => Some(&mut draft.name),
            FormField::Instructor => Some(&mut draft.instructor),
            FormField::Category => Some(&mut draft.category),
            FormField::Description => Some(&mut draft.description),
            FormField::Day(_) => None,
            FormField::Start(i) => draft.schedule_mut(i).map(|s| &mut s.start_time),
            FormField::End(i) => draft.schedule_mut(i).map(|s| &mut s.end_time),
            FormField::Location(i) => draft.schedule_mut(i).map(|s| &mut s.location),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let title = match self.mode {
            FormMode::Create => "Add a new course",
            FormMode::Edit(_) => "Edit course",
        };

        let schedule_rows = self.draft.schedules().len() as u16 + 3;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(if self.error.is_some() { 4 } else { 0 }),
                Constraint::Length(6),
                Constraint::Length(schedule_rows),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);

        if let Some(error) = &self.error {
            let paragraph = Paragraph::new(vec![
                Line::from(Span::styled(
                    "Detailed error:",
                    Style::default().fg(palette.error).add_modifier(Modifier::BOLD),
                )),
                Line::from(error.as_str()),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.error)),
            )
            .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, chunks[0]);
        }

        let fields = [
            (FormField::Name, "Course name *", &self.draft.name),
            (FormField::Instructor, "Instructor *", &self.draft.instructor),
            (FormField::Category, "Category", &self.draft.category),
            (FormField::Description, "Description", &self.draft.description),
        ];
        let lines: Vec<Line> = fields
            .iter()
            .map(|(field, label, value)| self.input_line(*field, label, value, palette))
            .collect();
        let details = Paragraph::new(lines).block(
            Block::default()
                .title(format!("{} (fields marked * are required)", title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent)),
        );
        frame.render_widget(details, chunks[1]);

        let mut schedule_lines = Vec::new();
        for (i, schedule) in self.draft.schedules().iter().enumerate() {
            let mut spans = vec![Span::raw(format!("{}. ", i + 1))];
            spans.extend(self.input_spans(FormField::Day(i), "Day", schedule.day.label(), palette));
            spans.extend(self.input_spans(FormField::Start(i), "  Start", &schedule.start_time, palette));
            spans.extend(self.input_spans(FormField::End(i), "  End", &schedule.end_time, palette));
            spans.extend(self.input_spans(FormField::Location(i), "  Location", &schedule.location, palette));
            schedule_lines.push(Line::from(spans));
        }
        schedule_lines.push(Line::from(Span::styled(
            "Ctrl+N: add time slot | Ctrl+D: remove focused slot | ←/→: change day",
            Style::default().fg(palette.muted),
        )));
        let schedules = Paragraph::new(schedule_lines).block(
            Block::default()
                .title(format!(
                    "Schedule * ({} valid time slot(s))",
                    self.draft.complete_schedule_count()
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent)),
        );
        frame.render_widget(schedules, chunks[2]);

        let status = if self.submitting {
            match self.mode {
                FormMode::Create => "Creating...",
                FormMode::Edit(_) => "Updating...",
            }
        } else {
            match self.mode {
                FormMode::Create => "[Enter: Create course | Esc: Cancel]",
                FormMode::Edit(_) => "[Enter: Update course | Esc: Cancel]",
            }
        };
        let footer = Paragraph::new(status)
            .style(Style::default().fg(if self.submitting {
                palette.warning
            } else {
                palette.foreground
            }))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[4]);

        if self.confirming_cancel {
            render_confirm(
                frame,
                centered_rect(60, 7, area),
                "Cancel? Unsaved changes will be lost.",
                palette,
            );
        }
    }

    fn field_style(&self, field: FormField, palette: &Palette) -> Style {
        if self.submitting {
            Style::default().fg(palette.muted)
        } else if self.focus == field {
            Style::default()
                .fg(palette.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.foreground)
        }
    }

    fn input_spans<'a>(&self, field: FormField, label: &'a str, value: &'a str, palette: &Palette) -> Vec<Span<'a>> {
        let cursor = if self.focus == field && !self.submitting { "_" } else { "" };
        vec![
            Span::styled(format!("{}: ", label), Style::default().fg(palette.accent)),
            Span::styled(format!("{}{}", value, cursor), self.field_style(field, palette)),
        ]
    }

    fn input_line<'a>(&self, field: FormField, label: &'a str, value: &'a str, palette: &Palette) -> Line<'a> {
        Line::from(self.input_spans(field, label, value, palette))
    }
}
