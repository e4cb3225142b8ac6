use crate::api::ApiError;
use crate::models::{Course, CourseFilter, CourseId};
use crate::theme::Palette;
use crate::toast::Notifier;
use crate::ui::command::Command;
use crate::ui::course_item::{intent_for_key, render_course_detail, ItemIntent};
use crate::ui::render::{centered_rect, render_confirm};
use crate::ui::state::{FilterField, ListFocus, ListState};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// What a key press on the list asks the shell to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ListAction {
    None,
    Command(Command),
    Edit(Course),
    Add,
    ToggleTheme,
    DismissToast,
    Quit,
}

impl From<Option<Command>> for ListAction {
    fn from(command: Option<Command>) -> Self {
        command.map_or(ListAction::None, ListAction::Command)
    }
}

#[derive(Debug)]
pub struct CourseListView {
    state: ListState,
    filter: CourseFilter,
    applied: CourseFilter,
    latest_seq: u64,
    seen_refresh: u64,
    selected_index: usize,
    focus: ListFocus,
}

impl Default for CourseListView {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseListView {
    pub fn new() -> Self {
        Self {
            state: ListState::Loading,
            filter: CourseFilter::default(),
            applied: CourseFilter::default(),
            latest_seq: 0,
            seen_refresh: 0,
            selected_index: 0,
            focus: ListFocus::Courses,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn filter(&self) -> &CourseFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut CourseFilter {
        &mut self.filter
    }

    pub fn focus(&self) -> ListFocus {
        self.focus
    }

    pub fn courses(&self) -> &[Course] {
        match &self.state {
            ListState::Ready(courses) => courses,
            _ => &[],
        }
    }

    pub fn selected(&self) -> Option<&Course> {
        self.courses().get(self.selected_index)
    }

    /// Initial load, with whatever criteria are currently applied.
    pub fn mount(&mut self) -> Command {
        self.fetch(self.applied.clone())
    }

    /// Refetches when the shell's refresh counter moved since we last saw it.
    pub fn sync_refresh(&mut self, counter: u64) -> Option<Command> {
        if counter == self.seen_refresh {
            return None;
        }
        self.seen_refresh = counter;
        Some(self.fetch(self.applied.clone()))
    }

    fn fetch(&mut self, filter: CourseFilter) -> Command {
        self.latest_seq += 1;
        self.state = ListState::Loading;
        self.applied = filter.clone();
        tracing::debug!(seq = self.latest_seq, query = ?filter.query_pairs(), "Fetching courses");
        Command::FetchCourses {
            seq: self.latest_seq,
            filter,
        }
    }

    pub fn submit_filters(&mut self) -> Command {
        self.focus = ListFocus::Courses;
        self.fetch(self.filter.clone())
    }

    /// Fetches again with the filter that was last applied.
    pub fn reload(&mut self) -> Command {
        self.fetch(self.applied.clone())
    }

    pub fn reset_filters(&mut self) -> Command {
        self.filter = CourseFilter::default();
        self.focus = ListFocus::Courses;
        self.fetch(CourseFilter::default())
    }

    /// Applies a list response. Anything but the latest issued request is
    /// dropped; returns whether the response was used.
    pub fn apply_courses(&mut self, seq: u64, result: Result<Vec<Course>, ApiError>) -> bool {
        if seq != self.latest_seq {
            tracing::debug!(seq, latest = self.latest_seq, "Discarding stale course list response");
            return false;
        }

        match result {
            Ok(courses) => {
                tracing::debug!(count = courses.len(), "Courses loaded");
                if self.selected_index >= courses.len() {
                    self.selected_index = courses.len().saturating_sub(1);
                }
                self.state = ListState::Ready(courses);
            }
            Err(e) => {
                tracing::error!(error = %e, kind = e.kind(), "Error fetching courses");
                self.state = ListState::Error("Failed to load courses".to_string());
            }
        }
        true
    }

    pub fn request_delete(&mut self, id: CourseId) {
        self.focus = ListFocus::ConfirmDelete(id);
    }

    pub fn confirm_delete(&mut self) -> Option<Command> {
        match self.focus {
            ListFocus::ConfirmDelete(id) => {
                self.focus = ListFocus::Courses;
                tracing::info!(id, "Deleting course");
                Some(Command::DeleteCourse { id })
            }
            _ => None,
        }
    }

    pub fn cancel_delete(&mut self) {
        if matches!(self.focus, ListFocus::ConfirmDelete(_)) {
            self.focus = ListFocus::Courses;
        }
    }

    /// On success the list is refetched; on failure the error replaces it.
    pub fn apply_delete(
        &mut self,
        id: CourseId,
        result: Result<(), ApiError>,
        notifier: &mut dyn Notifier,
    ) -> Option<Command> {
        match result {
            Ok(()) => {
                notifier.success("Course deleted successfully!");
                Some(self.fetch(self.applied.clone()))
            }
            Err(e) => {
                tracing::error!(id, error = %e, kind = e.kind(), "Error deleting course");
                self.state = ListState::Error("Failed to delete course".to_string());
                notifier.error("Failed to delete course");
                None
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ListAction {
        match self.focus {
            ListFocus::ConfirmDelete(_) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_delete().into(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.cancel_delete();
                    ListAction::None
                }
                _ => ListAction::None,
            },
            ListFocus::Filters(field) => self.handle_filter_key(field, key),
            ListFocus::Courses => self.handle_course_key(key),
        }
    }

    fn handle_filter_key(&mut self, field: FilterField, key: KeyEvent) -> ListAction {
        match key.code {
            KeyCode::Esc => self.focus = ListFocus::Courses,
            KeyCode::Enter => return ListAction::Command(self.submit_filters()),
            KeyCode::Tab | KeyCode::Down => self.focus = ListFocus::Filters(field.next()),
            KeyCode::BackTab | KeyCode::Up => self.focus = ListFocus::Filters(field.prev()),
            KeyCode::Backspace => {
                self.filter_value_mut(field).pop();
            }
            KeyCode::Char(c) => self.filter_value_mut(field).push(c),
            _ => {}
        }
        ListAction::None
    }

    fn handle_course_key(&mut self, key: KeyEvent) -> ListAction {
        if let Some(course) = self.selected() {
            if let Some(intent) = intent_for_key(course, key.code) {
                return match intent {
                    ItemIntent::Edit(course) => ListAction::Edit(course),
                    ItemIntent::Delete(id) => {
                        self.request_delete(id);
                        ListAction::None
                    }
                };
            }
        }

        match key.code {
            KeyCode::Char('q') => ListAction::Quit,
            KeyCode::Char('a') => ListAction::Add,
            KeyCode::Char('t') => ListAction::ToggleTheme,
            KeyCode::Char('x') => ListAction::DismissToast,
            KeyCode::Char('/') => {
                self.focus = ListFocus::Filters(FilterField::Search);
                ListAction::None
            }
            KeyCode::Char('R') => ListAction::Command(self.reload()),
            KeyCode::Char('r') => ListAction::Command(self.reset_filters()),
            KeyCode::Up => {
                self.selected_index = self.selected_index.saturating_sub(1);
                ListAction::None
            }
            KeyCode::Down => {
                if self.selected_index < self.courses().len().saturating_sub(1) {
                    self.selected_index += 1;
                }
                ListAction::None
            }
            _ => ListAction::None,
        }
    }

    fn filter_value_mut(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::Search => &mut self.filter.search,
            FilterField::Category => &mut self.filter.category,
            FilterField::Instructor => &mut self.filter.instructor,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        self.render_filters(frame, chunks[0], palette);

        match &self.state {
            ListState::Loading => {
                let paragraph = Paragraph::new("Loading courses...")
                    .block(panel("Courses", palette))
                    .alignment(Alignment::Center);
                frame.render_widget(paragraph, chunks[1]);
            }
            ListState::Error(message) => {
                let paragraph = Paragraph::new(message.as_str())
                    .block(
                        Block::default()
                            .title("Error [R: Reload | r: Reset filters]")
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(palette.error)),
                    )
                    .style(Style::default().fg(palette.error))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true });
                frame.render_widget(paragraph, chunks[1]);
            }
            ListState::Ready(courses) => self.render_courses(frame, chunks[1], courses, palette),
        }

        if let ListFocus::ConfirmDelete(_) = self.focus {
            let name = self.selected().map(|c| c.name.as_str()).unwrap_or("this course");
            render_confirm(
                frame,
                centered_rect(50, 7, area),
                &format!("Are you sure you want to delete {}?", name),
                palette,
            );
        }
    }

    fn render_filters(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ])
            .split(area);

        for (i, field) in [FilterField::Search, FilterField::Category, FilterField::Instructor]
            .into_iter()
            .enumerate()
        {
            let focused = self.focus == ListFocus::Filters(field);
            let border = if focused {
                Style::default()
                    .fg(palette.highlight)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.muted)
            };
            let value = match field {
                FilterField::Search => &self.filter.search,
                FilterField::Category => &self.filter.category,
                FilterField::Instructor => &self.filter.instructor,
            };
            let cursor = if focused { "_" } else { "" };
            let input = Paragraph::new(format!("{}{}", value, cursor)).block(
                Block::default()
                    .title(field.label())
                    .borders(Borders::ALL)
                    .border_style(border),
            );
            frame.render_widget(input, cells[i]);
        }
    }

    fn render_courses(&self, frame: &mut Frame, area: Rect, courses: &[Course], palette: &Palette) {
        if courses.is_empty() {
            let paragraph = Paragraph::new("No courses available")
                .block(panel("Courses (0)", palette))
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let items: Vec<ListItem> = courses
            .iter()
            .enumerate()
            .map(|(i, course)| {
                let style = if i == self.selected_index {
                    Style::default()
                        .fg(palette.highlight)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(palette.foreground)
                };
                let prefix = if i == self.selected_index { "> " } else { "  " };
                ListItem::new(format!("{}{} - {}", prefix, course.name, course.instructor))
                    .style(style)
            })
            .collect();

        let title = format!("Courses ({})", courses.len());
        let list = List::new(items).block(panel(&title, palette));
        frame.render_widget(list, columns[0]);

        if let Some(course) = courses.get(self.selected_index) {
            render_course_detail(frame, columns[1], course, palette);
        }
    }
}

fn panel<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
}
