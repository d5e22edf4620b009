use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::AuditLogEntry;
use crate::commission::CommissionReport;
use crate::model::Booking;

/// 예약/대기 등록 요청
#[derive(Debug, Deserialize, Serialize)]
pub struct PersonRequest {
    pub person_id: String,
    /// 없으면 명부의 이름 사용
    #[serde(default)]
    pub person_name: Option<String>,
}

/// 보고서 기간 쿼리
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
}

/// 감사 로그 쿼리
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    #[serde(default)]
    pub entity_id: Option<String>,
}

/// 이용자 예약 이력 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct PersonBookingsResponse {
    pub person_id: String,
    pub bookings: Vec<Booking>,
}

/// 전체 커미션 보고서 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct CommissionReportsResponse {
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub reports: Vec<CommissionReport>,
}

/// 감사 로그 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct AuditLogResponse {
    pub entries: Vec<AuditLogEntry>,
}

/// API 오류 응답
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
