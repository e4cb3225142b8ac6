use crate::models::{Course, CoursePayload, Schedule, Weekday};
use chrono::NaiveTime;
use thiserror::Error;

/// Reasons a draft is refused before anything is sent to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("course name required")]
    NameRequired,
    #[error("instructor required")]
    InstructorRequired,
    #[error("at least one valid time slot required")]
    NoCompleteSchedule,
    #[error("times must be written as HH:MM")]
    InvalidTime,
    #[error("end time must be after start time")]
    EndBeforeStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("at least one time slot is required")]
pub struct LastScheduleError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleDraft {
    pub id: Option<u64>,
    pub day: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
}

impl ScheduleDraft {
    /// Both ends of the slot are filled in.
    pub fn is_complete(&self) -> bool {
        !self.start_time.trim().is_empty() && !self.end_time.trim().is_empty()
    }

    fn has_any_time(&self) -> bool {
        !self.start_time.trim().is_empty() || !self.end_time.trim().is_empty()
    }

    fn to_schedule(&self) -> Schedule {
        Schedule {
            id: self.id,
            day: self.day,
            start_time: self.start_time.trim().to_string(),
            end_time: self.end_time.trim().to_string(),
            location: self.location.trim().to_string(),
        }
    }
}

impl From<&Schedule> for ScheduleDraft {
    fn from(schedule: &Schedule) -> Self {
        Self {
            id: schedule.id,
            day: schedule.day,
            start_time: schedule.start_time.clone(),
            end_time: schedule.end_time.clone(),
            location: schedule.location.clone(),
        }
    }
}

/// Editable copy of a course. Always holds at least one schedule entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDraft {
    pub name: String,
    pub instructor: String,
    pub category: String,
    pub description: String,
    schedules: Vec<ScheduleDraft>,
}

impl Default for CourseDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            instructor: String::new(),
            category: String::new(),
            description: String::new(),
            schedules: vec![ScheduleDraft::default()],
        }
    }
}

impl CourseDraft {
    pub fn from_course(course: &Course) -> Self {
        let mut schedules: Vec<ScheduleDraft> =
            course.schedules.iter().map(ScheduleDraft::from).collect();
        if schedules.is_empty() {
            schedules.push(ScheduleDraft::default());
        }

        Self {
            name: course.name.clone(),
            instructor: course.instructor.clone(),
            category: course.category.clone(),
            description: course.description.clone(),
            schedules,
        }
    }

    pub fn schedules(&self) -> &[ScheduleDraft] {
        &self.schedules
    }

    pub fn schedule_mut(&mut self, index: usize) -> Option<&mut ScheduleDraft> {
        self.schedules.get_mut(index)
    }

    pub fn add_schedule(&mut self) {
        self.schedules.push(ScheduleDraft::default());
    }

    /// Removes the entry at `index`. Refused while only one entry is left.
    pub fn remove_schedule(&mut self, index: usize) -> Result<(), LastScheduleError> {
        if self.schedules.len() <= 1 {
            return Err(LastScheduleError);
        }
        if index < self.schedules.len() {
            self.schedules.remove(index);
        }
        Ok(())
    }

    pub fn complete_schedule_count(&self) -> usize {
        self.schedules.iter().filter(|s| s.is_complete()).count()
    }

    /// Whether cancelling would throw away user input.
    pub fn is_dirty(&self) -> bool {
        [&self.name, &self.instructor, &self.category, &self.description]
            .iter()
            .any(|field| !field.trim().is_empty())
            || self.schedules.iter().any(ScheduleDraft::has_any_time)
    }

    /// Runs the submit checks in order and, if they pass, shapes the payload.
    /// Entries missing either time are dropped from the payload.
    pub fn validate(&self) -> Result<CoursePayload, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }
        if self.instructor.trim().is_empty() {
            return Err(ValidationError::InstructorRequired);
        }

        let complete: Vec<&ScheduleDraft> =
            self.schedules.iter().filter(|s| s.is_complete()).collect();
        if complete.is_empty() {
            return Err(ValidationError::NoCompleteSchedule);
        }
        for slot in &complete {
            match starts_before(slot.start_time.trim(), slot.end_time.trim()) {
                None => return Err(ValidationError::InvalidTime),
                Some(false) => return Err(ValidationError::EndBeforeStart),
                Some(true) => {}
            }
        }

        Ok(CoursePayload {
            name: self.name.trim().to_string(),
            instructor: self.instructor.trim().to_string(),
            category: self.category.trim().to_string(),
            description: self.description.trim().to_string(),
            schedules: complete.into_iter().map(ScheduleDraft::to_schedule).collect(),
        })
    }
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// Time-of-day comparison of two `HH:MM[:SS]` values; `None` when either
/// one does not parse.
pub fn starts_before(start: &str, end: &str) -> Option<bool> {
    Some(parse_time(start)? < parse_time(end)?)
}
