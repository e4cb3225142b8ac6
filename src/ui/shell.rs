use crate::models::Course;
use crate::theme::Theme;
use crate::toast::{Notifier, ToastId, ToastQueue};
use crate::ui::command::{Command, Message};
use crate::ui::course_form::{CourseForm, FormAction};
use crate::ui::course_list::{CourseListView, ListAction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

#[derive(Debug)]
pub enum View {
    List,
    Form(CourseForm),
}

/// Root controller: owns the view switch, refresh counter, theme and toasts,
/// and routes keys and network completions to the active view.
#[derive(Debug)]
pub struct Shell {
    list: CourseListView,
    view: View,
    refresh: u64,
    theme: Theme,
    toasts: ToastQueue,
    should_quit: bool,
}

impl Shell {
    pub fn new(theme: Theme) -> Self {
        Self {
            list: CourseListView::new(),
            view: View::List,
            refresh: 0,
            theme,
            toasts: ToastQueue::new(),
            should_quit: false,
        }
    }

    pub fn start(&mut self) -> Command {
        self.list.mount()
    }

    pub fn list(&self) -> &CourseListView {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut CourseListView {
        &mut self.list
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn form(&self) -> Option<&CourseForm> {
        match &self.view {
            View::Form(form) => Some(form),
            View::List => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut CourseForm> {
        match &mut self.view {
            View::Form(form) => Some(form),
            View::List => None,
        }
    }

    /// The record the open form is editing; `None` in create mode or on the list.
    pub fn editing(&self) -> Option<&Course> {
        self.form().and_then(CourseForm::editing)
    }

    pub fn refresh_count(&self) -> u64 {
        self.refresh
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastQueue {
        &mut self.toasts
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn add_course(&mut self) {
        self.view = View::Form(CourseForm::create());
    }

    pub fn edit_course(&mut self, course: Course) {
        tracing::debug!(id = course.id, "Editing course");
        self.view = View::Form(CourseForm::edit(course));
    }

    pub fn cancel_form(&mut self) {
        self.view = View::List;
    }

    pub fn toggle_theme(&mut self) {
        self.theme.toggle(&mut self.toasts);
    }

    /// Closes the form, bumps the refresh counter and lets the list refetch.
    fn handle_saved(&mut self, updated: bool) -> Option<Command> {
        self.view = View::List;
        self.refresh += 1;
        self.toasts.success(if updated {
            "Course updated successfully!"
        } else {
            "Course created successfully!"
        });
        self.list.sync_refresh(self.refresh)
    }

    pub fn dismiss_toast(&mut self, id: ToastId) -> bool {
        self.toasts.dismiss(id)
    }

    /// Dismisses the toast shown with `number` (1-based, oldest first).
    fn dismiss_numbered_toast(&mut self, number: u32) {
        let id = (number as usize)
            .checked_sub(1)
            .and_then(|index| self.toasts.id_at(index));
        if let Some(id) = id {
            self.dismiss_toast(id);
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.toasts.prune(now);
    }

    pub fn handle_message(&mut self, message: Message) -> Option<Command> {
        match message {
            Message::CoursesLoaded { seq, result } => {
                self.list.apply_courses(seq, result);
                None
            }
            Message::CourseDeleted { id, result } => {
                self.list.apply_delete(id, result, &mut self.toasts)
            }
            Message::CourseSaved { target, result } => match result {
                Ok(course) => {
                    tracing::info!(id = course.id, "Course saved");
                    self.handle_saved(target.is_some())
                }
                Err(e) => {
                    match &mut self.view {
                        View::Form(form) => form.submit_failed(&e, &mut self.toasts),
                        View::List => {
                            tracing::warn!(error = %e, "Save failed after the form was closed");
                            self.toasts.error("Error while saving the course");
                        }
                    }
                    None
                }
            },
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => {
                    self.should_quit = true;
                    return None;
                }
                KeyCode::Char('t') => {
                    self.toggle_theme();
                    return None;
                }
                KeyCode::Char('x') => {
                    self.toasts.dismiss_oldest();
                    return None;
                }
                _ => {}
            }
        }

        // Alt+1..9 dismisses the toast carrying that number
        if key.modifiers.contains(KeyModifiers::ALT) {
            if let KeyCode::Char(c) = key.code {
                if let Some(number) = c.to_digit(10) {
                    self.dismiss_numbered_toast(number);
                    return None;
                }
            }
        }

        match &mut self.view {
            View::Form(form) => match form.handle_key(key, &mut self.toasts) {
                FormAction::None => None,
                FormAction::Command(command) => Some(command),
                FormAction::Cancelled => {
                    self.cancel_form();
                    None
                }
            },
            View::List => match self.list.handle_key(key) {
                ListAction::None => None,
                ListAction::Command(command) => Some(command),
                ListAction::Edit(course) => {
                    self.edit_course(course);
                    None
                }
                ListAction::Add => {
                    self.add_course();
                    None
                }
                ListAction::ToggleTheme => {
                    self.toggle_theme();
                    None
                }
                ListAction::DismissToast => {
                    self.toasts.dismiss_oldest();
                    None
                }
                ListAction::Quit => {
                    self.should_quit = true;
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::CourseFilter;
    use crate::theme::ThemeStore;

    fn shell() -> (Shell, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let theme = Theme::initialize(ThemeStore::at(dir.path().join("theme.toml")), false);
        (Shell::new(theme), dir)
    }

    fn course(id: u64) -> Course {
        Course {
            id,
            name: "Networks".to_string(),
            instructor: "V. Cerf".to_string(),
            category: String::new(),
            description: String::new(),
            schedules: Vec::new(),
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_add_and_cancel() {
        let (mut shell, _dir) = shell();
        shell.start();

        shell.handle_key(key(KeyCode::Char('a')));
        assert!(shell.form().is_some());
        assert!(shell.editing().is_none());

        shell.handle_key(key(KeyCode::Esc));
        assert!(shell.form().is_none());
        assert_eq!(shell.refresh_count(), 0);
    }

    #[test]
    fn test_save_closes_form_and_refreshes() {
        let (mut shell, _dir) = shell();
        shell.start();
        shell.edit_course(course(3));
        assert_eq!(shell.editing().map(|c| c.id), Some(3));

        let next = shell.handle_message(Message::CourseSaved {
            target: Some(3),
            result: Ok(course(3)),
        });

        assert!(shell.form().is_none());
        assert_eq!(shell.refresh_count(), 1);
        assert_eq!(
            next,
            Some(Command::FetchCourses {
                seq: 2,
                filter: CourseFilter::default()
            })
        );
        assert_eq!(
            shell.toasts().iter().last().map(|t| t.message.as_str()),
            Some("Course updated successfully!")
        );
    }

    #[test]
    fn test_save_failure_keeps_form_open() {
        let (mut shell, _dir) = shell();
        shell.add_course();

        let next = shell.handle_message(Message::CourseSaved {
            target: None,
            result: Err(ApiError::network("refused")),
        });

        assert!(next.is_none());
        assert_eq!(shell.form().and_then(|f| f.error()), Some("Unable to contact the server"));
        assert_eq!(shell.refresh_count(), 0);
    }

    #[test]
    fn test_theme_toggle_from_any_view() {
        let (mut shell, _dir) = shell();
        assert!(!shell.theme().is_dark());

        shell.handle_key(key(KeyCode::Char('t')));
        assert!(shell.theme().is_dark());

        shell.add_course();
        shell.handle_key(KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL));
        assert!(!shell.theme().is_dark());
        assert_eq!(shell.toasts().len(), 2);
    }

    #[test]
    fn test_dismiss_and_quit_keys() {
        let (mut shell, _dir) = shell();
        shell.toasts_mut().info("hello");

        shell.handle_key(key(KeyCode::Char('x')));
        assert!(shell.toasts().is_empty());

        shell.handle_key(key(KeyCode::Char('q')));
        assert!(shell.should_quit());
    }

    #[test]
    fn test_dismiss_toast_while_form_open() {
        let (mut shell, _dir) = shell();
        shell.add_course();
        shell.handle_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL));
        assert_eq!(shell.toasts().len(), 1);

        shell.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL));
        assert!(shell.toasts().is_empty());
        assert_eq!(shell.form().map(|f| f.draft().name.as_str()), Some(""));
    }

    #[test]
    fn test_dismiss_specific_toast_by_number() {
        let (mut shell, _dir) = shell();
        shell.add_course();
        let first = shell.toasts_mut().info("first");
        let second = shell.toasts_mut().warning("second");
        let third = shell.toasts_mut().error("third");

        shell.handle_key(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::ALT));
        assert!(shell.toasts().get(second).is_none());
        assert!(shell.toasts().get(first).is_some());
        assert!(shell.toasts().get(third).is_some());

        // Out of range numbers are ignored and never reach the form
        shell.handle_key(KeyEvent::new(KeyCode::Char('9'), KeyModifiers::ALT));
        shell.handle_key(KeyEvent::new(KeyCode::Char('0'), KeyModifiers::ALT));
        assert_eq!(shell.toasts().len(), 2);
        assert_eq!(shell.form().map(|f| f.draft().name.as_str()), Some(""));

        assert!(shell.dismiss_toast(third));
        assert_eq!(shell.toasts().iter().next().map(|t| t.id), Some(first));
    }
}
