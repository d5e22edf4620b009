//! xStudio: 피트니스 스튜디오 예약/정원 관리 엔진
//!
//! 수업 예약과 대기자 승격, 출석 시 크레딧 차감, POS 판매 기록, 판매자 커미션 집계,
//! 감사 로그를 제공합니다. 상태는 [`store::StateStore`]를 통해 스냅샷으로 영속화됩니다.

pub mod api;
pub mod audit;
pub mod booking;
pub mod clock;
pub mod commission;
pub mod config;
pub mod data;
pub mod db;
pub mod error;
pub mod model;
pub mod pos;
pub mod server;
pub mod store;
pub mod studio;

pub use error::{ErrorCode, OperationError, OperationResult};
pub use studio::{SharedStudio, Studio};
