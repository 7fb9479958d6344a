use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{LoginRequest, LoginResponse};
use crate::modules::comments::model::{Comment, CreateCommentDto};
use crate::modules::discounts::model::{
    CreateDiscountDto, CreateDiscountTypeDto, Discount, DiscountType, UpdateDiscountDto,
    UpdateDiscountTypeDto,
};
use crate::modules::evaluation_settings::model::{
    EffectiveSettings, EvaluationSettings, UpsertEvaluationSettingsDto,
};
use crate::modules::semesters::model::{CreateSemesterDto, Semester, UpdateSemesterDto};
use crate::modules::supervision::model::{
    CreateSupervisionDto, CreateSupervisionTypeDto, Supervision, SupervisionType,
    UpdateSupervisionDto, UpdateSupervisionTypeDto,
};
use crate::modules::teachers::model::{Teacher, TeacherWithInfo, UpdateTeacherDto};
use crate::modules::teaching_duty::model::{
    GroupBalance, SemesterBalance, TeacherBalanceReport, TeacherOverviewRow,
};
use crate::modules::teaching_events::model::{
    CreateTeachingEventDto, PaginatedTeachingEventsResponse, TeachingEvent,
    UpdateTeachingEventDto,
};
use crate::modules::teaching_groups::model::{
    CreateTeachingGroupDto, TeachingGroup, UpdateTeachingGroupDto,
};
use crate::modules::users::model::{
    ControllerRecord, CreateUserDto, UpdateUserDto, User, UserRole, UserWithRelations,
};
use crate::utils::pagination::PaginationMeta;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::get_user_by_username,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::semesters::controller::create_semester,
        crate::modules::semesters::controller::get_semesters,
        crate::modules::semesters::controller::get_active_semester,
        crate::modules::semesters::controller::get_semester,
        crate::modules::semesters::controller::update_semester,
        crate::modules::semesters::controller::delete_semester,
        crate::modules::semesters::controller::activate_semester,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teaching_groups::controller::create_group,
        crate::modules::teaching_groups::controller::get_groups,
        crate::modules::teaching_groups::controller::get_group,
        crate::modules::teaching_groups::controller::get_group_members,
        crate::modules::teaching_groups::controller::update_group,
        crate::modules::teaching_groups::controller::delete_group,
        crate::modules::teaching_events::controller::create_event,
        crate::modules::teaching_events::controller::get_events,
        crate::modules::teaching_events::controller::get_event,
        crate::modules::teaching_events::controller::update_event,
        crate::modules::teaching_events::controller::delete_event,
        crate::modules::supervision::controller::create_supervision_type,
        crate::modules::supervision::controller::get_supervision_types,
        crate::modules::supervision::controller::update_supervision_type,
        crate::modules::supervision::controller::delete_supervision_type,
        crate::modules::supervision::controller::create_supervision,
        crate::modules::supervision::controller::get_supervisions,
        crate::modules::supervision::controller::get_supervision,
        crate::modules::supervision::controller::update_supervision,
        crate::modules::supervision::controller::delete_supervision,
        crate::modules::discounts::controller::create_discount_type,
        crate::modules::discounts::controller::get_discount_types,
        crate::modules::discounts::controller::update_discount_type,
        crate::modules::discounts::controller::delete_discount_type,
        crate::modules::discounts::controller::create_discount,
        crate::modules::discounts::controller::get_discounts,
        crate::modules::discounts::controller::get_discount,
        crate::modules::discounts::controller::update_discount,
        crate::modules::discounts::controller::delete_discount,
        crate::modules::comments::controller::create_comment,
        crate::modules::comments::controller::get_comments,
        crate::modules::comments::controller::delete_comment,
        crate::modules::evaluation_settings::controller::get_settings,
        crate::modules::evaluation_settings::controller::upsert_settings,
        crate::modules::teaching_duty::controller::get_own_balance,
        crate::modules::teaching_duty::controller::get_teacher_balance,
        crate::modules::teaching_duty::controller::get_overview,
        crate::modules::teaching_duty::controller::get_group_overview,
    ),
    components(
        schemas(
            User,
            UserRole,
            ControllerRecord,
            UserWithRelations,
            CreateUserDto,
            UpdateUserDto,
            LoginRequest,
            LoginResponse,
            ErrorResponse,
            Semester,
            CreateSemesterDto,
            UpdateSemesterDto,
            Teacher,
            TeacherWithInfo,
            UpdateTeacherDto,
            TeachingGroup,
            CreateTeachingGroupDto,
            UpdateTeachingGroupDto,
            TeachingEvent,
            CreateTeachingEventDto,
            UpdateTeachingEventDto,
            PaginatedTeachingEventsResponse,
            PaginationMeta,
            SupervisionType,
            CreateSupervisionTypeDto,
            UpdateSupervisionTypeDto,
            Supervision,
            CreateSupervisionDto,
            UpdateSupervisionDto,
            DiscountType,
            CreateDiscountTypeDto,
            UpdateDiscountTypeDto,
            Discount,
            CreateDiscountDto,
            UpdateDiscountDto,
            Comment,
            CreateCommentDto,
            EvaluationSettings,
            EffectiveSettings,
            UpsertEvaluationSettingsDto,
            SemesterBalance,
            TeacherBalanceReport,
            TeacherOverviewRow,
            GroupBalance,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and token issuance"),
        (name = "Users", description = "Account management"),
        (name = "Semesters", description = "Semester administration"),
        (name = "Teachers", description = "Teacher records"),
        (name = "Teaching groups", description = "Group administration"),
        (name = "Teaching events", description = "Courses and lectures"),
        (name = "Supervision", description = "Thesis and doctoral supervision"),
        (name = "Discounts", description = "Duty reductions"),
        (name = "Comments", description = "Notes on teacher records"),
        (name = "Evaluation settings", description = "Crediting caps"),
        (name = "Teaching duty", description = "Balance reports")
    ),
    info(
        title = "Lehrsaldo API",
        version = "0.1.0",
        description = "Teaching-load management backend: semesters, teaching events, supervisions, discounts and per-teacher balance reports.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
