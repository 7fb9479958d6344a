use sqlx::PgPool;
use tracing::instrument;

use crate::modules::teaching_events::model::{
    CreateTeachingEventDto, PaginatedTeachingEventsResponse, TeachingEvent,
    TeachingEventFilterParams, UpdateTeachingEventDto,
};
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

const EVENT_COLUMNS: &str =
    "id, teacher_id, semester_id, name, hours, event_date, created_at, updated_at";

pub struct TeachingEventService;

impl TeachingEventService {
    async fn check_references(
        db: &PgPool,
        teacher_id: i32,
        semester_id: i32,
    ) -> Result<(), AppError> {
        let teacher_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM teachers WHERE id = $1)")
                .bind(teacher_id)
                .fetch_one(db)
                .await?;
        if !teacher_exists {
            return Err(AppError::bad_request(anyhow::anyhow!("Teacher not found")));
        }

        let semester_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM semesters WHERE id = $1)")
                .bind(semester_id)
                .fetch_one(db)
                .await?;
        if !semester_exists {
            return Err(AppError::bad_request(anyhow::anyhow!("Semester not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn create_event(
        db: &PgPool,
        dto: CreateTeachingEventDto,
    ) -> Result<TeachingEvent, AppError> {
        Self::check_references(db, dto.teacher_id, dto.semester_id).await?;

        let event = sqlx::query_as::<_, TeachingEvent>(&format!(
            "INSERT INTO teaching_events (teacher_id, semester_id, name, hours, event_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(dto.teacher_id)
        .bind(dto.semester_id)
        .bind(&dto.name)
        .bind(dto.hours)
        .bind(dto.event_date)
        .fetch_one(db)
        .await?;

        Ok(event)
    }

    /// Paginated event listing, optionally filtered by teacher and semester.
    #[instrument(skip(db))]
    pub async fn get_events(
        db: &PgPool,
        filters: TeachingEventFilterParams,
    ) -> Result<PaginatedTeachingEventsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut where_clause = String::from(" WHERE TRUE");
        if let Some(teacher_id) = filters.teacher_id {
            where_clause.push_str(&format!(" AND teacher_id = {}", teacher_id));
        }
        if let Some(semester_id) = filters.semester_id {
            where_clause.push_str(&format!(" AND semester_id = {}", semester_id));
        }

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM teaching_events{where_clause}"
        ))
        .fetch_one(db)
        .await?;

        let events = sqlx::query_as::<_, TeachingEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM teaching_events{where_clause}
             ORDER BY created_at DESC
             LIMIT {limit} OFFSET {offset}"
        ))
        .fetch_all(db)
        .await?;

        let has_more = offset + limit < total;

        Ok(PaginatedTeachingEventsResponse {
            data: events,
            meta: PaginationMeta {
                total,
                limit,
                offset: Some(offset),
                has_more,
            },
        })
    }

    #[instrument(skip(db))]
    pub async fn get_event(db: &PgPool, id: i32) -> Result<Option<TeachingEvent>, AppError> {
        let event = sqlx::query_as::<_, TeachingEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM teaching_events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(event)
    }

    #[instrument(skip(db))]
    pub async fn update_event(
        db: &PgPool,
        id: i32,
        dto: UpdateTeachingEventDto,
    ) -> Result<Option<TeachingEvent>, AppError> {
        let Some(existing) = Self::get_event(db, id).await? else {
            return Ok(None);
        };

        let name = dto.name.unwrap_or(existing.name);
        let hours = dto.hours.unwrap_or(existing.hours);
        let event_date = match dto.event_date {
            Some(date) => date,
            None => existing.event_date,
        };

        let event = sqlx::query_as::<_, TeachingEvent>(&format!(
            "UPDATE teaching_events
             SET name = $1, hours = $2, event_date = $3, updated_at = NOW()
             WHERE id = $4
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(&name)
        .bind(hours)
        .bind(event_date)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(Some(event))
    }

    #[instrument(skip(db))]
    pub async fn delete_event(db: &PgPool, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM teaching_events WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Teaching event not found"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::semesters::model::CreateSemesterDto;
    use crate::modules::semesters::service::SemesterService;
    use crate::modules::users::model::{CreateUserDto, UserRole};
    use crate::modules::users::service::UserService;
    use crate::utils::pagination::PaginationParams;
    use axum::http::StatusCode;
    use chrono::NaiveDate;
    use uuid::Uuid;

    async fn create_fixtures(pool: &PgPool) -> (i32, i32) {
        let teacher = UserService::create_user(
            pool,
            CreateUserDto {
                username: format!("teacher-{}", Uuid::new_v4()),
                password: "password123".to_string(),
                role: UserRole::Teacher,
                first_name: "Tina".to_string(),
                last_name: "Teacher".to_string(),
                retirement_date: None,
                total_teaching_duty: Some(18.0),
            },
        )
        .await
        .unwrap()
        .teacher
        .unwrap();

        let semester = SemesterService::create_semester(
            pool,
            CreateSemesterDto {
                name: format!("WS {}", Uuid::new_v4()),
                start_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            },
        )
        .await
        .unwrap();

        (teacher.id, semester.id)
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_and_filter_events(pool: PgPool) {
        let (teacher_id, semester_id) = create_fixtures(&pool).await;

        for i in 0..3 {
            TeachingEventService::create_event(
                &pool,
                CreateTeachingEventDto {
                    teacher_id,
                    semester_id,
                    name: format!("Lecture {}", i),
                    hours: 4.0,
                    event_date: None,
                },
            )
            .await
            .unwrap();
        }

        let page = TeachingEventService::get_events(
            &pool,
            TeachingEventFilterParams {
                teacher_id: Some(teacher_id),
                semester_id: Some(semester_id),
                pagination: PaginationParams {
                    limit: Some(2),
                    offset: Some(0),
                },
            },
        )
        .await
        .unwrap();

        assert_eq!(page.data.len(), 2);
        assert_eq!(page.meta.total, 3);
        assert!(page.meta.has_more);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_event_unknown_teacher(pool: PgPool) {
        let (_, semester_id) = create_fixtures(&pool).await;

        let result = TeachingEventService::create_event(
            &pool,
            CreateTeachingEventDto {
                teacher_id: 999999,
                semester_id,
                name: "Ghost lecture".to_string(),
                hours: 2.0,
                event_date: None,
            },
        )
        .await;

        assert_eq!(result.unwrap_err().status, StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_event(pool: PgPool) {
        let (teacher_id, semester_id) = create_fixtures(&pool).await;

        let event = TeachingEventService::create_event(
            &pool,
            CreateTeachingEventDto {
                teacher_id,
                semester_id,
                name: "Algorithms".to_string(),
                hours: 4.0,
                event_date: None,
            },
        )
        .await
        .unwrap();

        let updated = TeachingEventService::update_event(
            &pool,
            event.id,
            UpdateTeachingEventDto {
                name: None,
                hours: Some(6.0),
                event_date: None,
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.hours, 6.0);
        assert_eq!(updated.name, "Algorithms");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_event_clear_date(pool: PgPool) {
        let (teacher_id, semester_id) = create_fixtures(&pool).await;

        let event = TeachingEventService::create_event(
            &pool,
            CreateTeachingEventDto {
                teacher_id,
                semester_id,
                name: "Seminar".to_string(),
                hours: 2.0,
                event_date: Some(NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()),
            },
        )
        .await
        .unwrap();
        assert!(event.event_date.is_some());

        // An absent field keeps the date, an explicit null clears it.
        let untouched = TeachingEventService::update_event(
            &pool,
            event.id,
            UpdateTeachingEventDto {
                name: None,
                hours: None,
                event_date: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert!(untouched.event_date.is_some());

        let cleared = TeachingEventService::update_event(
            &pool,
            event.id,
            UpdateTeachingEventDto {
                name: None,
                hours: None,
                event_date: Some(None),
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert!(cleared.event_date.is_none());
    }
}
