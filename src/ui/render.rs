use crate::theme::Palette;
use crate::toast::ToastQueue;
use crate::ui::shell::{Shell, View};
use crate::ui::state::ListFocus;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const TOAST_WIDTH: u16 = 48;
const TOAST_HEIGHT: u16 = 3;
const HEADER_HEIGHT: u16 = 3;

pub fn render_ui(frame: &mut Frame, shell: &Shell) {
    let palette = shell.theme().palette();
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().fg(palette.foreground).bg(palette.background)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(frame, chunks[0], shell.theme().badge(), palette);

    match shell.view() {
        View::List => shell.list().render(frame, chunks[1], palette),
        View::Form(form) => form.render(frame, chunks[1], palette),
    }

    let help = match shell.view() {
        View::Form(_) => "[Tab/Shift+Tab: Move | Enter: Save | Esc: Cancel | Ctrl+T: Theme | Ctrl+X/Alt+N: Dismiss | Ctrl+C: Quit]",
        View::List => match shell.list().focus() {
            ListFocus::Filters(_) => "[Tab: Next filter | Enter: Search | Esc: Back to list]",
            ListFocus::ConfirmDelete(_) => "[y: Delete | n: Keep]",
            ListFocus::Courses => {
                "[↑↓: Navigate | a: Add | e: Edit | d: Delete | /: Filter | R: Reload | r: Reset | t: Theme | x/Alt+N: Dismiss | q: Quit]"
            }
        },
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(palette.muted))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[2]);

    render_toasts(frame, area, shell.toasts(), palette);
}

fn render_header(frame: &mut Frame, area: Rect, badge: &str, palette: &Palette) {
    let title = Line::from(vec![
        Span::styled(
            "Course Management System",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(format!("[{}]", badge), Style::default().fg(palette.muted)),
    ]);

    let header = Paragraph::new(title)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent)),
        )
        .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

/// Stacks toasts under the header on the right, oldest on top.
fn render_toasts(frame: &mut Frame, area: Rect, toasts: &ToastQueue, palette: &Palette) {
    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width.saturating_sub(width + 1);
    let max_visible = (area.height.saturating_sub(HEADER_HEIGHT) / TOAST_HEIGHT) as usize;

    for (i, toast) in toasts.iter().take(max_visible).enumerate() {
        let y = area.y + HEADER_HEIGHT + i as u16 * TOAST_HEIGHT;
        let rect = Rect::new(x, y, width, TOAST_HEIGHT).intersection(area);
        let color = palette.toast_color(toast.kind);

        let paragraph = Paragraph::new(toast.message.as_str())
            .block(
                Block::default()
                    .title(format!(" {} {} ", i + 1, toast.kind.label()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            )
            .style(
                Style::default()
                    .fg(color)
                    .bg(palette.background)
                    .add_modifier(Modifier::BOLD),
            )
            .wrap(Wrap { trim: true });

        frame.render_widget(Clear, rect);
        frame.render_widget(paragraph, rect);
    }
}

pub fn render_confirm(frame: &mut Frame, area: Rect, question: &str, palette: &Palette) {
    let text = vec![
        Line::from(question),
        Line::from(""),
        Line::from(Span::styled(
            "[y: Yes | n: No]",
            Style::default().fg(palette.muted),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .title("Confirm")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.warning)),
        )
        .style(Style::default().fg(palette.foreground).bg(palette.background))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

/// A `width`% wide, `height`-row tall rectangle centred in `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = (u32::from(area.width) * u32::from(width.min(100)) / 100) as u16;
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{Theme, ThemeStore};
    use crate::toast::Notifier;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_centered_rect() {
        let rect = centered_rect(50, 7, Rect::new(0, 0, 100, 41));
        assert_eq!(rect, Rect::new(25, 17, 50, 7));
    }

    #[test]
    fn test_centered_rect_on_very_wide_terminal() {
        let rect = centered_rect(60, 7, Rect::new(0, 0, 2000, 50));
        assert_eq!(rect, Rect::new(400, 21, 1200, 7));
    }

    #[test]
    fn test_renders_loading_list_with_toast() {
        let dir = tempfile::tempdir().unwrap();
        let theme = Theme::initialize(ThemeStore::at(dir.path().join("theme.toml")), true);
        let mut shell = Shell::new(theme);
        shell.start();
        shell.toasts_mut().success("Saved");

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render_ui(f, &shell)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Course Management System"));
        assert!(text.contains("Dark mode"));
        assert!(text.contains("Loading courses..."));
        assert!(text.contains("Saved"));
        assert!(text.contains("1 Success"));
    }

    #[test]
    fn test_renders_form() {
        let dir = tempfile::tempdir().unwrap();
        let theme = Theme::initialize(ThemeStore::at(dir.path().join("theme.toml")), false);
        let mut shell = Shell::new(theme);
        shell.add_course();

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render_ui(f, &shell)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Add a new course"));
        assert!(text.contains("0 valid time slot(s)"));
    }
}
