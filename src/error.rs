//! 작업 결과 및 도메인 에러
//!
//! 도메인 거부(정원 초과, 중복 등)는 `OperationResult { success: false, .. }`로
//! 돌려주고, 저장소 장애만 `Err(StorageError)`로 전파합니다.

use serde::{Deserialize, Serialize};

/// 도메인 에러 타입
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OperationError {
  #[error("{entity} not found: {id}")]
  NotFound { entity: &'static str, id: String },
  #[error("{person_name} is already booked into {class_name}")]
  DuplicateBooking { person_name: String, class_name: String },
  #[error("{person_name} is already on the waitlist for {class_name}")]
  DuplicateWaitlist { person_name: String, class_name: String },
  #[error("{class_name} is full ({capacity} of {capacity} spots taken)")]
  ClassFull { class_name: String, capacity: u32 },
  #[error("booking {booking_id} is already checked in")]
  AlreadyCheckedIn { booking_id: String },
  #[error("booking {booking_id} is already {status}")]
  AlreadyCancelled { booking_id: String, status: String },
  #[error("invalid transaction: {0}")]
  InvalidTransaction(String),
}

impl OperationError {
  pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
    OperationError::NotFound {
      entity,
      id: id.into(),
    }
  }

  pub fn code(&self) -> ErrorCode {
    match self {
      OperationError::NotFound { .. } => ErrorCode::NotFound,
      OperationError::DuplicateBooking { .. } => ErrorCode::DuplicateBooking,
      OperationError::DuplicateWaitlist { .. } => ErrorCode::DuplicateWaitlist,
      OperationError::ClassFull { .. } => ErrorCode::ClassFull,
      OperationError::AlreadyCheckedIn { .. } => ErrorCode::AlreadyCheckedIn,
      OperationError::AlreadyCancelled { .. } => ErrorCode::AlreadyCancelled,
      OperationError::InvalidTransaction(_) => ErrorCode::InvalidTransaction,
    }
  }
}

/// 호출자가 분기할 수 있는 에러 코드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
  NotFound,
  DuplicateBooking,
  DuplicateWaitlist,
  ClassFull,
  AlreadyCheckedIn,
  AlreadyCancelled,
  InvalidTransaction,
}

/// 작업 결과 (UI에 그대로 표시할 메시지 포함)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult<T> {
  pub success: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub code: Option<ErrorCode>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data: Option<T>,
}

impl<T> OperationResult<T> {
  pub fn ok(message: impl Into<String>, data: T) -> Self {
    Self {
      success: true,
      message: message.into(),
      code: None,
      data: Some(data),
    }
  }

  pub fn failed(error: &OperationError) -> Self {
    Self {
      success: false,
      message: error.to_string(),
      code: Some(error.code()),
      data: None,
    }
  }

  pub fn is_code(&self, code: ErrorCode) -> bool {
    self.code == Some(code)
  }
}
