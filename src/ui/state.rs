use crate::models::{Course, CourseId};

/// What the course list is currently showing.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    Ready(Vec<Course>),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Search,
    Category,
    Instructor,
}

impl FilterField {
    pub fn next(self) -> Self {
        match self {
            FilterField::Search => FilterField::Category,
            FilterField::Category => FilterField::Instructor,
            FilterField::Instructor => FilterField::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FilterField::Search => FilterField::Instructor,
            FilterField::Category => FilterField::Search,
            FilterField::Instructor => FilterField::Category,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterField::Search => "Search",
            FilterField::Category => "Category",
            FilterField::Instructor => "Instructor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFocus {
    Courses,
    Filters(FilterField),
    ConfirmDelete(CourseId),
}

/// Focusable inputs of the course form. Schedule fields carry the entry index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Instructor,
    Category,
    Description,
    Day(usize),
    Start(usize),
    End(usize),
    Location(usize),
}

impl FormField {
    /// Focus order for a form with `schedule_count` entries.
    pub fn order(schedule_count: usize) -> Vec<FormField> {
        let mut fields = vec![
            FormField::Name,
            FormField::Instructor,
            FormField::Category,
            FormField::Description,
        ];
        for i in 0..schedule_count {
            fields.extend([
                FormField::Day(i),
                FormField::Start(i),
                FormField::End(i),
                FormField::Location(i),
            ]);
        }
        fields
    }

    pub fn schedule_index(self) -> Option<usize> {
        match self {
            FormField::Day(i) | FormField::Start(i) | FormField::End(i) | FormField::Location(i) => {
                Some(i)
            }
            _ => None,
        }
    }

    pub fn is_time(self) -> bool {
        matches!(self, FormField::Start(_) | FormField::End(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    Edit(Course),
}

impl FormMode {
    pub fn target(&self) -> Option<CourseId> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(course) => Some(course.id),
        }
    }
}
