mod client;
mod error;

pub use client::CourseClient;
pub use error::ApiError;

use crate::models::{Course, CourseFilter, CourseId, CoursePayload};
use async_trait::async_trait;

/// The five operations of the remote course service.
#[async_trait]
pub trait CourseApi: Send + Sync {
    /// `GET /courses/`, constrained by the non-blank filter fields.
    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>, ApiError>;

    async fn get_course(&self, id: CourseId) -> Result<Course, ApiError>;

    async fn create_course(&self, payload: &CoursePayload) -> Result<Course, ApiError>;

    async fn update_course(&self, id: CourseId, payload: &CoursePayload) -> Result<Course, ApiError>;

    async fn delete_course(&self, id: CourseId) -> Result<(), ApiError>;
}
