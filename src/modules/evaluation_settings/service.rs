use sqlx::PgPool;
use tracing::instrument;

use crate::modules::evaluation_settings::model::{
    EffectiveSettings, EvaluationSettings, UpsertEvaluationSettingsDto,
};
use crate::utils::errors::AppError;

const SETTINGS_COLUMNS: &str = "id, semester_id, supervision_hours_cap, discount_hours_cap";

pub struct EvaluationSettingsService;

impl EvaluationSettingsService {
    async fn get_row(
        db: &PgPool,
        semester_id: Option<i32>,
    ) -> Result<Option<EvaluationSettings>, AppError> {
        let row = sqlx::query_as::<_, EvaluationSettings>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM evaluation_settings
             WHERE semester_id IS NOT DISTINCT FROM $1"
        ))
        .bind(semester_id)
        .fetch_optional(db)
        .await?;

        Ok(row)
    }

    /// Resolve the caps in effect for a semester. Each cap falls back
    /// independently from the semester row to the global row; a cap missing
    /// from both means the credit is uncapped.
    #[instrument(skip(db))]
    pub async fn get_effective_settings(
        db: &PgPool,
        semester_id: Option<i32>,
    ) -> Result<EffectiveSettings, AppError> {
        let semester_row = match semester_id {
            Some(id) => Self::get_row(db, Some(id)).await?,
            None => None,
        };
        let global_row = Self::get_row(db, None).await?;

        let pick = |field: fn(&EvaluationSettings) -> Option<f64>| {
            semester_row
                .as_ref()
                .and_then(field)
                .or_else(|| global_row.as_ref().and_then(field))
        };

        Ok(EffectiveSettings {
            semester_id,
            supervision_hours_cap: pick(|s| s.supervision_hours_cap),
            discount_hours_cap: pick(|s| s.discount_hours_cap),
        })
    }

    /// Update-then-insert upsert keyed on semester_id (NULL targets the
    /// global row).
    #[instrument(skip(db))]
    pub async fn upsert_settings(
        db: &PgPool,
        dto: UpsertEvaluationSettingsDto,
    ) -> Result<EvaluationSettings, AppError> {
        if let Some(semester_id) = dto.semester_id {
            let semester_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM semesters WHERE id = $1)",
            )
            .bind(semester_id)
            .fetch_one(db)
            .await?;
            if !semester_exists {
                return Err(AppError::bad_request(anyhow::anyhow!("Semester not found")));
            }
        }

        let mut tx = db.begin().await?;

        let updated = sqlx::query_as::<_, EvaluationSettings>(&format!(
            "UPDATE evaluation_settings
             SET supervision_hours_cap = $1, discount_hours_cap = $2
             WHERE semester_id IS NOT DISTINCT FROM $3
             RETURNING {SETTINGS_COLUMNS}"
        ))
        .bind(dto.supervision_hours_cap)
        .bind(dto.discount_hours_cap)
        .bind(dto.semester_id)
        .fetch_optional(&mut *tx)
        .await?;

        let settings = match updated {
            Some(settings) => settings,
            None => {
                sqlx::query_as::<_, EvaluationSettings>(&format!(
                    "INSERT INTO evaluation_settings
                         (semester_id, supervision_hours_cap, discount_hours_cap)
                     VALUES ($1, $2, $3)
                     RETURNING {SETTINGS_COLUMNS}"
                ))
                .bind(dto.semester_id)
                .bind(dto.supervision_hours_cap)
                .bind(dto.discount_hours_cap)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;

        Ok(settings)
    }
}
