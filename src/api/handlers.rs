use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use log::error;
use serde::Serialize;

use crate::api::models::*;
use crate::booking::{Cancellation, CheckIn};
use crate::commission::{CommissionReport, LocationFilter};
use crate::error::{ErrorCode, OperationResult};
use crate::model::{Booking, Transaction, WaitlistEntry};
use crate::pos::SaleRequest;
use crate::server::ServerState;
use crate::store::StorageError;
use crate::studio::{ClassView, Studio};

type ApiError = (StatusCode, Json<ErrorResponse>);
type OperationResponse<T> = Result<(StatusCode, Json<OperationResult<T>>), ApiError>;

fn api_error(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}

/// 작업 결과를 HTTP 응답으로 변환
///
/// 도메인 거부는 결과 본문을 그대로 두고 상태 코드만 바꿉니다.
fn respond<T: Serialize>(result: Result<OperationResult<T>, StorageError>) -> OperationResponse<T> {
    match result {
        Ok(outcome) => {
            let status = match outcome.code {
                None => StatusCode::OK,
                Some(ErrorCode::NotFound) => StatusCode::NOT_FOUND,
                Some(_) => StatusCode::CONFLICT,
            };
            Ok((status, Json(outcome)))
        }
        Err(e) => {
            error!("저장소 오류로 요청 실패: {}", e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                "변경 사항을 저장하지 못했습니다. 잠시 후 다시 시도하세요",
            ))
        }
    }
}

fn check_range(query: &ReportQuery) -> Result<(), ApiError> {
    if query.start > query.end {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "INVALID_RANGE",
            "시작 시각은 종료 시각보다 늦을 수 없습니다",
        ));
    }
    Ok(())
}

/// 수업 조회 핸들러
pub async fn get_class(
    State(state): State<ServerState>,
    Path(class_id): Path<String>,
) -> Result<Json<ClassView>, ApiError> {
    let studio = state.studio.lock().await;
    studio.class_view(&class_id).map(Json).ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("class not found: {}", class_id),
        )
    })
}

/// 예약 조회 핸들러
pub async fn get_booking(
    State(state): State<ServerState>,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let studio = state.studio.lock().await;
    studio.booking(&booking_id).map(Json).ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("booking not found: {}", booking_id),
        )
    })
}

/// 이용자 예약 이력 핸들러
pub async fn get_person_bookings(
    State(state): State<ServerState>,
    Path(person_id): Path<String>,
) -> Json<PersonBookingsResponse> {
    let studio = state.studio.lock().await;
    let bookings = studio.bookings_for_person(&person_id);
    Json(PersonBookingsResponse {
        person_id,
        bookings,
    })
}

/// 수업 예약 핸들러
pub async fn book_class(
    State(state): State<ServerState>,
    Path(class_id): Path<String>,
    Json(payload): Json<PersonRequest>,
) -> OperationResponse<Booking> {
    let mut studio = state.studio.lock().await;
    let person_name = resolve_name(&studio, &payload);
    respond(studio.book_class(&class_id, &payload.person_id, &person_name).await)
}

/// 대기자 등록 핸들러
pub async fn add_to_waitlist(
    State(state): State<ServerState>,
    Path(class_id): Path<String>,
    Json(payload): Json<PersonRequest>,
) -> OperationResponse<WaitlistEntry> {
    let mut studio = state.studio.lock().await;
    let person_name = resolve_name(&studio, &payload);
    respond(studio.add_to_waitlist(&class_id, &payload.person_id, &person_name).await)
}

/// 예약 취소 핸들러
pub async fn cancel_booking(
    State(state): State<ServerState>,
    Path(booking_id): Path<String>,
) -> OperationResponse<Cancellation> {
    let mut studio = state.studio.lock().await;
    respond(studio.cancel_booking(&booking_id).await)
}

/// 출석 처리 핸들러
pub async fn check_in_member(
    State(state): State<ServerState>,
    Path(booking_id): Path<String>,
) -> OperationResponse<CheckIn> {
    let mut studio = state.studio.lock().await;
    respond(studio.check_in_member(&booking_id).await)
}

/// 노쇼 처리 핸들러
pub async fn mark_no_show(
    State(state): State<ServerState>,
    Path(booking_id): Path<String>,
) -> OperationResponse<Booking> {
    let mut studio = state.studio.lock().await;
    respond(studio.mark_no_show(&booking_id).await)
}

/// 판매 기록 핸들러
pub async fn record_sale(
    State(state): State<ServerState>,
    Json(payload): Json<SaleRequest>,
) -> OperationResponse<Transaction> {
    let mut studio = state.studio.lock().await;
    respond(studio.record_sale(&payload).await)
}

/// 판매자 커미션 보고서 핸들러
pub async fn get_commission_report(
    State(state): State<ServerState>,
    Path(seller_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<CommissionReport>, ApiError> {
    check_range(&query)?;
    let studio = state.studio.lock().await;
    let report = studio.commission_report(&seller_id, query.start, query.end);
    Ok(Json(report.rounded()))
}

/// 전체 커미션 보고서 핸들러
pub async fn get_all_commission_reports(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<CommissionReportsResponse>, ApiError> {
    check_range(&query)?;
    let location = query.location.clone().unwrap_or_else(|| "all".to_string());
    let filter = location
        .parse::<LocationFilter>()
        .unwrap_or(LocationFilter::All);

    let studio = state.studio.lock().await;
    let reports = studio
        .all_commission_reports(&filter, query.start, query.end)
        .iter()
        .map(CommissionReport::rounded)
        .collect();

    Ok(Json(CommissionReportsResponse {
        location,
        start: query.start,
        end: query.end,
        reports,
    }))
}

/// 감사 로그 조회 핸들러
pub async fn get_audit_log(
    State(state): State<ServerState>,
    Query(query): Query<AuditQuery>,
) -> Json<AuditLogResponse> {
    let studio = state.studio.lock().await;
    Json(AuditLogResponse {
        entries: studio.audit_log(query.entity_id.as_deref()),
    })
}

fn resolve_name(studio: &Studio, payload: &PersonRequest) -> String {
    payload
        .person_name
        .clone()
        .or_else(|| {
            studio
                .state()
                .resolve_person(&payload.person_id)
                .map(|p| p.name().to_string())
        })
        .unwrap_or_else(|| payload.person_id.clone())
}
