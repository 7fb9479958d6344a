use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One teacher's balance for a single semester. Supervision and discount
/// hours are the credited values, caps already applied.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct SemesterBalance {
    pub semester_id: i32,
    pub semester_name: String,
    pub event_hours: f64,
    pub supervision_hours: f64,
    pub discount_hours: f64,
    pub teaching_duty: f64,
    /// Positive means the teacher is ahead of their duty target.
    pub balance: f64,
}

/// Per-semester breakdown plus the accumulated total for one teacher.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct TeacherBalanceReport {
    pub teacher_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub semesters: Vec<SemesterBalance>,
    pub accumulated_balance: f64,
}

/// One row of the all-teachers overview.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct TeacherOverviewRow {
    pub teacher_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub teaching_group_id: Option<i32>,
    pub teaching_group_name: Option<String>,
    pub balance: f64,
}

/// Balances folded per teaching group; teachers without a group end up in
/// the row with a NULL group.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct GroupBalance {
    pub teaching_group_id: Option<i32>,
    pub teaching_group_name: Option<String>,
    pub teacher_count: usize,
    pub total_balance: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BalanceQueryParams {
    pub semester_id: Option<i32>,
}
