use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers::*;
use crate::server::ServerState;

/// API 라우터 생성
pub fn create_api_router() -> Router<ServerState> {
    Router::new()
        // 수업/예약 API
        .route("/v1/classes/:class_id", get(get_class))
        .route("/v1/classes/:class_id/bookings", post(book_class))
        .route("/v1/classes/:class_id/waitlist", post(add_to_waitlist))
        .route("/v1/bookings/:booking_id", get(get_booking))
        .route("/v1/bookings/:booking_id/cancel", post(cancel_booking))
        .route("/v1/bookings/:booking_id/check-in", post(check_in_member))
        .route("/v1/bookings/:booking_id/no-show", post(mark_no_show))
        .route("/v1/people/:person_id/bookings", get(get_person_bookings))

        // POS API
        .route("/v1/transactions", post(record_sale))

        // 보고서 API
        .route("/v1/commissions", get(get_all_commission_reports))
        .route("/v1/commissions/:seller_id", get(get_commission_report))
        .route("/v1/audit", get(get_audit_log))
}
