use crate::api::{ApiError, CourseApi};
use crate::models::{Course, CourseFilter, CourseId, CoursePayload};

/// Network work requested by a view.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchCourses { seq: u64, filter: CourseFilter },
    DeleteCourse { id: CourseId },
    /// Create when `target` is `None`, otherwise update that course.
    SaveCourse {
        target: Option<CourseId>,
        payload: CoursePayload,
    },
}

/// Completion of a [`Command`], fed back into the views.
#[derive(Debug)]
pub enum Message {
    CoursesLoaded {
        seq: u64,
        result: Result<Vec<Course>, ApiError>,
    },
    CourseDeleted {
        id: CourseId,
        result: Result<(), ApiError>,
    },
    CourseSaved {
        target: Option<CourseId>,
        result: Result<Course, ApiError>,
    },
}

pub async fn perform(api: &dyn CourseApi, command: Command) -> Message {
    match command {
        Command::FetchCourses { seq, filter } => Message::CoursesLoaded {
            seq,
            result: api.list_courses(&filter).await,
        },
        Command::DeleteCourse { id } => Message::CourseDeleted {
            id,
            result: api.delete_course(id).await,
        },
        Command::SaveCourse { target, payload } => {
            let result = match target {
                Some(id) => api.update_course(id, &payload).await,
                None => api.create_course(&payload).await,
            };
            Message::CourseSaved { target, result }
        }
    }
}
