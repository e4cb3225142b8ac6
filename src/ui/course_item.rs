use crate::models::{Course, CourseId, Schedule};
use crate::theme::Palette;
use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// What the user asked to do with the course on display.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemIntent {
    Edit(Course),
    Delete(CourseId),
}

pub fn intent_for_key(course: &Course, code: KeyCode) -> Option<ItemIntent> {
    match code {
        KeyCode::Char('e') | KeyCode::Enter => Some(ItemIntent::Edit(course.clone())),
        KeyCode::Char('d') | KeyCode::Delete => Some(ItemIntent::Delete(course.id)),
        _ => None,
    }
}

/// "Monday - 09:00 to 10:00 @ Room 1"
pub fn schedule_line(schedule: &Schedule) -> String {
    let mut line = format!(
        "{} - {} to {}",
        schedule.day.label(),
        schedule.start_time,
        schedule.end_time
    );
    if !schedule.location.is_empty() {
        line.push_str(" @ ");
        line.push_str(&schedule.location);
    }
    line
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

pub fn detail_lines(course: &Course, palette: &Palette) -> Vec<Line<'static>> {
    let label = Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(
            course.name.clone(),
            Style::default()
                .fg(palette.highlight)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Instructor: ", label),
            Span::raw(course.instructor.clone()),
        ]),
        Line::from(vec![
            Span::styled("Category: ", label),
            Span::raw(or_placeholder(&course.category, "Not specified").to_string()),
        ]),
        Line::from(vec![
            Span::styled("Description: ", label),
            Span::raw(or_placeholder(&course.description, "No description").to_string()),
        ]),
    ];

    if !course.schedules.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Schedule:", label)));
        for schedule in &course.schedules {
            lines.push(Line::from(format!("  • {}", schedule_line(schedule))));
        }
    }

    lines
}

pub fn render_course_detail(frame: &mut Frame, area: Rect, course: &Course, palette: &Palette) {
    let paragraph = Paragraph::new(detail_lines(course, palette))
        .block(
            Block::default()
                .title("Course Details [e: Edit | d: Delete]")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent)),
        )
        .style(Style::default().fg(palette.foreground).bg(palette.background))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
