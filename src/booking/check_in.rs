//! 출석 처리 및 크레딧 차감
//!
//! 예약을 `checked-in`으로 바꾸고 이용자 종류에 맞는 잔액을 정확히 한 번 차감합니다.
//! 정원은 다시 확인하지 않습니다 (예약이 이미 자리를 점유하고 있음).

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use log::{debug, info, warn};
use serde::Serialize;

use super::engine::BookingEngine;
use crate::audit::{AuditAction, EntityType};
use crate::error::OperationError;
use crate::model::{Booking, BookingStatus, PersonKind};

/// 출석 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckIn {
  pub booking: Booking,
  pub debit: CreditDebit,
}

/// 차감 내역
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CreditDebit {
  /// 클래스팩 1회 차감
  ClassPack { remaining_classes: u32 },
  /// 클래스팩 잔여 0회 (차감 없이 출석 허용)
  ClassPackEmpty,
  /// 회원 주간 이용 횟수 증가
  WeeklyUsage { week_start: NaiveDate, count: u32 },
  /// drop-in 등 잔액이 없는 이용자
  NoBalance,
}

/// 주 시작일(월요일)
pub fn week_start(at: DateTime<Utc>) -> NaiveDate {
  let date = at.date_naive();
  date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

impl<'a> BookingEngine<'a> {
  /// 출석 처리
  pub fn check_in_member(&mut self, booking_id: &str) -> Result<CheckIn, OperationError> {
    let booking = self
      .state
      .booking(booking_id)
      .ok_or_else(|| OperationError::not_found("booking", booking_id))?;

    match booking.status {
      BookingStatus::Booked => {}
      BookingStatus::CheckedIn => {
        debug!("중복 출석 거부: {}", booking_id);
        return Err(OperationError::AlreadyCheckedIn {
          booking_id: booking_id.to_string(),
        });
      }
      status @ (BookingStatus::Cancelled | BookingStatus::NoShow) => {
        return Err(OperationError::AlreadyCancelled {
          booking_id: booking_id.to_string(),
          status: status.to_string(),
        });
      }
    }

    let person_id = booking.person_id.clone();
    let class_id = booking.class_id.clone();

    let debit = self.debit_credit(&person_id);

    let booking = self
      .state
      .booking_mut(booking_id)
      .ok_or_else(|| OperationError::not_found("booking", booking_id))?;
    booking.status = BookingStatus::CheckedIn;
    booking.checked_in_at = Some(self.now);
    let booking = booking.clone();

    let (class_name, location) = self
      .state
      .class(&class_id)
      .map(|c| (c.name.clone(), c.location.clone()))
      .unwrap_or_else(|| (class_id.clone(), String::new()));

    self.state.audit_log_mut().append(
      self.now,
      AuditAction::CheckedIn,
      EntityType::Booking,
      &booking.id,
      format!("{} checked in to {} at {}", booking.person_name, class_name, location),
      location.clone(),
    );

    info!("출석 완료: {} -> {} ({:?})", booking.person_name, class_name, debit);
    Ok(CheckIn { booking, debit })
  }

  /// 차감 우선순위: 클래스팩 잔여 → 회원 주간 카운터 → 없음
  fn debit_credit(&mut self, person_id: &str) -> CreditDebit {
    let kind = self.state.resolve_person(person_id).map(|p| p.kind());

    match kind {
      Some(PersonKind::PackClient) => match self.state.pack_client_mut(person_id) {
        Some(client) if client.remaining_classes > 0 => {
          client.remaining_classes -= 1;
          CreditDebit::ClassPack {
            remaining_classes: client.remaining_classes,
          }
        }
        _ => {
          warn!("클래스팩 잔여 0회 출석: {}", person_id);
          CreditDebit::ClassPackEmpty
        }
      },
      Some(PersonKind::Member) => {
        let week = week_start(self.now);
        let count = self.state.increment_weekly_usage(person_id, week);
        CreditDebit::WeeklyUsage {
          week_start: week,
          count,
        }
      }
      Some(PersonKind::DropIn) | Some(PersonKind::Lead) | None => CreditDebit::NoBalance,
    }
  }
}
