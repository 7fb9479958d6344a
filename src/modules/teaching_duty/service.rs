use sqlx::{FromRow, PgPool};
use tracing::instrument;

use crate::modules::evaluation_settings::model::EffectiveSettings;
use crate::modules::evaluation_settings::service::EvaluationSettingsService;
use crate::modules::semesters::model::Semester;
use crate::modules::semesters::service::SemesterService;
use crate::modules::teachers::model::TeacherWithInfo;
use crate::modules::teachers::service::TeacherService;
use crate::modules::teaching_duty::model::{
    GroupBalance, SemesterBalance, TeacherBalanceReport, TeacherOverviewRow,
};
use crate::utils::errors::AppError;

/// Raw per-semester sums before caps are applied. `entry_count` tells
/// whether the teacher has any recorded data in the semester at all.
#[derive(FromRow)]
struct RawTotals {
    event_hours: f64,
    supervision_hours: f64,
    discount_hours: f64,
    entry_count: i64,
}

const TOTALS_QUERY: &str = "SELECT
        COALESCE((SELECT SUM(hours) FROM teaching_events
                  WHERE teacher_id = $1 AND semester_id = $2), 0) AS event_hours,
        COALESCE((SELECT SUM(s.hours * st.calculation_factor)
                  FROM supervisions s
                  JOIN supervision_types st ON st.id = s.supervision_type_id
                  WHERE s.teacher_id = $1 AND s.semester_id = $2), 0) AS supervision_hours,
        COALESCE((SELECT SUM(hours) FROM discounts
                  WHERE teacher_id = $1 AND semester_id = $2 AND approved), 0) AS discount_hours,
        (SELECT COUNT(*) FROM teaching_events WHERE teacher_id = $1 AND semester_id = $2)
        + (SELECT COUNT(*) FROM supervisions WHERE teacher_id = $1 AND semester_id = $2)
        + (SELECT COUNT(*) FROM discounts WHERE teacher_id = $1 AND semester_id = $2)
            AS entry_count";

fn apply_cap(hours: f64, cap: Option<f64>) -> f64 {
    match cap {
        Some(cap) => hours.min(cap),
        None => hours,
    }
}

pub struct TeachingDutyService;

impl TeachingDutyService {
    async fn raw_totals(
        db: &PgPool,
        teacher_id: i32,
        semester_id: i32,
    ) -> Result<RawTotals, AppError> {
        let totals = sqlx::query_as::<_, RawTotals>(TOTALS_QUERY)
            .bind(teacher_id)
            .bind(semester_id)
            .fetch_one(db)
            .await?;

        Ok(totals)
    }

    fn balance_from(
        totals: &RawTotals,
        teacher: &TeacherWithInfo,
        semester: &Semester,
        caps: &EffectiveSettings,
    ) -> SemesterBalance {
        let supervision_hours = apply_cap(totals.supervision_hours, caps.supervision_hours_cap);
        let discount_hours = apply_cap(totals.discount_hours, caps.discount_hours_cap);
        let balance = totals.event_hours + supervision_hours + discount_hours
            - teacher.total_teaching_duty;

        SemesterBalance {
            semester_id: semester.id,
            semester_name: semester.name.clone(),
            event_hours: totals.event_hours,
            supervision_hours,
            discount_hours,
            teaching_duty: teacher.total_teaching_duty,
            balance,
        }
    }

    /// Balance for one teacher in one semester; `None` when the teacher
    /// has nothing recorded there.
    async fn semester_balance(
        db: &PgPool,
        teacher: &TeacherWithInfo,
        semester: &Semester,
        caps: &EffectiveSettings,
    ) -> Result<Option<SemesterBalance>, AppError> {
        let totals = Self::raw_totals(db, teacher.id, semester.id).await?;
        if totals.entry_count == 0 {
            return Ok(None);
        }
        Ok(Some(Self::balance_from(&totals, teacher, semester, caps)))
    }

    /// Per-semester breakdown for one teacher. With a semester filter the
    /// report holds exactly that semester, recorded data or not; without
    /// one it holds every semester with data plus the accumulated total.
    #[instrument(skip(db))]
    pub async fn teacher_report(
        db: &PgPool,
        teacher_id: i32,
        semester_id: Option<i32>,
    ) -> Result<Option<TeacherBalanceReport>, AppError> {
        let Some(teacher) = TeacherService::get_teacher(db, teacher_id).await? else {
            return Ok(None);
        };

        let mut semesters = Vec::new();

        match semester_id {
            Some(semester_id) => {
                let semester = SemesterService::get_semester(db, semester_id)
                    .await?
                    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Semester not found")))?;
                let caps =
                    EvaluationSettingsService::get_effective_settings(db, Some(semester.id))
                        .await?;
                let totals = Self::raw_totals(db, teacher.id, semester.id).await?;
                semesters.push(Self::balance_from(&totals, &teacher, &semester, &caps));
            }
            None => {
                for semester in SemesterService::get_semesters(db).await? {
                    let caps =
                        EvaluationSettingsService::get_effective_settings(db, Some(semester.id))
                            .await?;
                    if let Some(balance) =
                        Self::semester_balance(db, &teacher, &semester, &caps).await?
                    {
                        semesters.push(balance);
                    }
                }
            }
        }

        let accumulated_balance = semesters.iter().map(|s| s.balance).sum();

        Ok(Some(TeacherBalanceReport {
            teacher_id: teacher.id,
            first_name: teacher.first_name,
            last_name: teacher.last_name,
            semesters,
            accumulated_balance,
        }))
    }

    /// Balances for every teacher, either for one semester or accumulated
    /// over all semesters with data.
    #[instrument(skip(db))]
    pub async fn overview(
        db: &PgPool,
        semester_id: Option<i32>,
    ) -> Result<Vec<TeacherOverviewRow>, AppError> {
        let teachers = TeacherService::get_teachers(db).await?;

        let semesters = match semester_id {
            Some(id) => {
                let semester = SemesterService::get_semester(db, id)
                    .await?
                    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Semester not found")))?;
                vec![semester]
            }
            None => SemesterService::get_semesters(db).await?,
        };

        let mut caps_by_semester = Vec::with_capacity(semesters.len());
        for semester in &semesters {
            let caps =
                EvaluationSettingsService::get_effective_settings(db, Some(semester.id)).await?;
            caps_by_semester.push(caps);
        }

        let single_semester = semester_id.is_some();
        let mut rows = Vec::with_capacity(teachers.len());

        for teacher in &teachers {
            let mut balance = 0.0;
            for (semester, caps) in semesters.iter().zip(&caps_by_semester) {
                if single_semester {
                    let totals = Self::raw_totals(db, teacher.id, semester.id).await?;
                    balance += Self::balance_from(&totals, teacher, semester, caps).balance;
                } else if let Some(semester_balance) =
                    Self::semester_balance(db, teacher, semester, caps).await?
                {
                    balance += semester_balance.balance;
                }
            }

            rows.push(TeacherOverviewRow {
                teacher_id: teacher.id,
                first_name: teacher.first_name.clone(),
                last_name: teacher.last_name.clone(),
                teaching_group_id: teacher.teaching_group_id,
                teaching_group_name: teacher.teaching_group_name.clone(),
                balance,
            });
        }

        Ok(rows)
    }

    /// The overview folded per teaching group.
    #[instrument(skip(db))]
    pub async fn group_overview(
        db: &PgPool,
        semester_id: Option<i32>,
    ) -> Result<Vec<GroupBalance>, AppError> {
        let rows = Self::overview(db, semester_id).await?;

        let mut groups: Vec<GroupBalance> = Vec::new();
        for row in rows {
            match groups
                .iter_mut()
                .find(|g| g.teaching_group_id == row.teaching_group_id)
            {
                Some(group) => {
                    group.teacher_count += 1;
                    group.total_balance += row.balance;
                }
                None => groups.push(GroupBalance {
                    teaching_group_id: row.teaching_group_id,
                    teaching_group_name: row.teaching_group_name,
                    teacher_count: 1,
                    total_balance: row.balance,
                }),
            }
        }

        groups.sort_by(|a, b| a.teaching_group_name.cmp(&b.teaching_group_name));

        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::discounts::model::CreateDiscountDto;
    use crate::modules::discounts::service::{DiscountService, DiscountTypeService};
    use crate::modules::evaluation_settings::model::UpsertEvaluationSettingsDto;
    use crate::modules::semesters::model::CreateSemesterDto;
    use crate::modules::supervision::model::CreateSupervisionDto;
    use crate::modules::supervision::service::{SupervisionService, SupervisionTypeService};
    use crate::modules::teaching_events::model::CreateTeachingEventDto;
    use crate::modules::teaching_events::service::TeachingEventService;
    use crate::modules::users::model::{CreateUserDto, UserRole};
    use crate::modules::users::service::UserService;
    use chrono::NaiveDate;
    use uuid::Uuid;

    async fn create_teacher(pool: &PgPool, duty: f64) -> i32 {
        UserService::create_user(
            pool,
            CreateUserDto {
                username: format!("teacher-{}", Uuid::new_v4()),
                password: "password123".to_string(),
                role: UserRole::Teacher,
                first_name: "Paula".to_string(),
                last_name: "Prof".to_string(),
                retirement_date: None,
                total_teaching_duty: Some(duty),
            },
        )
        .await
        .unwrap()
        .teacher
        .unwrap()
        .id
    }

    async fn create_semester(pool: &PgPool, start: (i32, u32, u32), end: (i32, u32, u32)) -> i32 {
        SemesterService::create_semester(
            pool,
            CreateSemesterDto {
                name: format!("Semester {}", Uuid::new_v4()),
                start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
                end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn add_event(pool: &PgPool, teacher_id: i32, semester_id: i32, hours: f64) {
        TeachingEventService::create_event(
            pool,
            CreateTeachingEventDto {
                teacher_id,
                semester_id,
                name: "Lecture".to_string(),
                hours,
                event_date: None,
            },
        )
        .await
        .unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_balance_formula_with_caps(pool: PgPool) {
        let teacher_id = create_teacher(&pool, 10.0).await;
        let semester_id = create_semester(&pool, (2025, 10, 1), (2026, 3, 31)).await;

        EvaluationSettingsService::upsert_settings(
            &pool,
            UpsertEvaluationSettingsDto {
                semester_id: Some(semester_id),
                supervision_hours_cap: Some(3.0),
                discount_hours_cap: Some(1.0),
            },
        )
        .await
        .unwrap();

        add_event(&pool, teacher_id, semester_id, 8.0).await;

        // 20 raw supervision hours at factor 0.5 give 10 weighted,
        // capped to 3.
        let types = SupervisionTypeService::get_types(&pool).await.unwrap();
        let master = types.iter().find(|t| t.name == "Master thesis").unwrap();
        SupervisionService::create_supervision(
            &pool,
            CreateSupervisionDto {
                teacher_id,
                semester_id,
                supervision_type_id: master.id,
                description: None,
                hours: 20.0,
            },
        )
        .await
        .unwrap();

        // 2 approved discount hours, capped to 1.
        let discount_types = DiscountTypeService::get_types(&pool).await.unwrap();
        DiscountService::create_discount(
            &pool,
            CreateDiscountDto {
                teacher_id,
                semester_id,
                discount_type_id: discount_types[0].id,
                description: None,
                hours: 2.0,
                approved: true,
            },
        )
        .await
        .unwrap();

        let report = TeachingDutyService::teacher_report(&pool, teacher_id, Some(semester_id))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(report.semesters.len(), 1);
        let balance = &report.semesters[0];
        assert!((balance.event_hours - 8.0).abs() < f64::EPSILON);
        assert!((balance.supervision_hours - 3.0).abs() < f64::EPSILON);
        assert!((balance.discount_hours - 1.0).abs() < f64::EPSILON);
        // 8 + 3 + 1 - 10
        assert!((balance.balance - 2.0).abs() < f64::EPSILON);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unapproved_discounts_do_not_count(pool: PgPool) {
        let teacher_id = create_teacher(&pool, 0.0).await;
        let semester_id = create_semester(&pool, (2025, 10, 1), (2026, 3, 31)).await;

        let discount_types = DiscountTypeService::get_types(&pool).await.unwrap();
        DiscountService::create_discount(
            &pool,
            CreateDiscountDto {
                teacher_id,
                semester_id,
                discount_type_id: discount_types[0].id,
                description: None,
                hours: 5.0,
                approved: false,
            },
        )
        .await
        .unwrap();

        let report = TeachingDutyService::teacher_report(&pool, teacher_id, Some(semester_id))
            .await
            .unwrap()
            .unwrap();

        assert!((report.semesters[0].discount_hours).abs() < f64::EPSILON);
        assert!((report.accumulated_balance).abs() < f64::EPSILON);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_accumulated_balance_skips_empty_semesters(pool: PgPool) {
        let teacher_id = create_teacher(&pool, 4.0).await;
        let first = create_semester(&pool, (2025, 4, 1), (2025, 9, 30)).await;
        let _empty = create_semester(&pool, (2025, 10, 1), (2026, 3, 31)).await;
        let third = create_semester(&pool, (2026, 4, 1), (2026, 9, 30)).await;

        add_event(&pool, teacher_id, first, 6.0).await;
        add_event(&pool, teacher_id, third, 5.0).await;

        let report = TeachingDutyService::teacher_report(&pool, teacher_id, None)
            .await
            .unwrap()
            .unwrap();

        // The empty semester contributes nothing, not a -4 deficit.
        assert_eq!(report.semesters.len(), 2);
        assert!((report.accumulated_balance - 3.0).abs() < f64::EPSILON);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_group_overview_folds_by_group(pool: PgPool) {
        let first = create_teacher(&pool, 0.0).await;
        let second = create_teacher(&pool, 0.0).await;
        let semester_id = create_semester(&pool, (2025, 10, 1), (2026, 3, 31)).await;

        add_event(&pool, first, semester_id, 2.0).await;
        add_event(&pool, second, semester_id, 3.0).await;

        let groups = TeachingDutyService::group_overview(&pool, Some(semester_id))
            .await
            .unwrap();

        // Both teachers are ungrouped and land in the NULL-group row.
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].teaching_group_id, None);
        assert_eq!(groups[0].teacher_count, 2);
        assert!((groups[0].total_balance - 5.0).abs() < f64::EPSILON);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_report_for_missing_teacher_returns_none(pool: PgPool) {
        let report = TeachingDutyService::teacher_report(&pool, 999999, None)
            .await
            .unwrap();
        assert!(report.is_none());
    }
}
