//! 예약 엔진
//!
//! 정원 확인, 중복 예약 방지, 취소 시 대기자 승격을 담당합니다.
//! 엔진은 호출자가 빌려준 [`StudioState`] 위에서 동기적으로 동작하며,
//! 직렬화와 영속화는 상위 계층(`Studio`)의 몫입니다.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;

use crate::audit::{AuditAction, EntityType};
use crate::error::OperationError;
use crate::model::{Booking, BookingStatus, WaitlistEntry};
use crate::store::StudioState;

/// 취소 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cancellation {
  /// 취소된 예약
  pub booking: Booking,
  /// 대기자 승격 시도 결과 (대기자가 없으면 `None`)
  pub promotion: Option<Promotion>,
}

/// 대기자 승격 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Promotion {
  /// 승격되어 예약됨
  Booked { booking: Booking },
  /// 승격 예약이 실패해 대기 항목이 제거됨 (재등록하지 않음)
  Dropped { entry: WaitlistEntry, reason: String },
}

/// 예약 엔진
pub struct BookingEngine<'a> {
  /// 작업 대상 상태
  pub(crate) state: &'a mut StudioState,
  /// 작업 시각
  pub(crate) now: DateTime<Utc>,
}

impl<'a> BookingEngine<'a> {
  /// 새 예약 엔진 생성
  pub fn new(state: &'a mut StudioState, now: DateTime<Utc>) -> Self {
    Self { state, now }
  }

  /// 수업 예약
  ///
  /// 정원이 찼으면 `ClassFull`로 끝나며 자동으로 대기 등록하지 않습니다.
  pub fn book_class(
    &mut self,
    class_id: &str,
    person_id: &str,
    person_name: &str,
  ) -> Result<Booking, OperationError> {
    let class = self
      .state
      .class(class_id)
      .ok_or_else(|| OperationError::not_found("class", class_id))?;
    let class_name = class.name.clone();
    let location = class.location.clone();
    let capacity = class.capacity;

    if self.state.active_booking(class_id, person_id).is_some() {
      debug!("중복 예약 거부: {} -> {}", person_id, class_id);
      return Err(OperationError::DuplicateBooking {
        person_name: person_name.to_string(),
        class_name,
      });
    }

    // 캐시가 아닌 실제 활성 예약 수로 판단
    let active = self.state.active_booking_count(class_id);
    if active >= capacity {
      debug!("정원 초과 거부: {} ({}/{})", class_id, active, capacity);
      return Err(OperationError::ClassFull {
        class_name,
        capacity,
      });
    }

    let booking = Booking::new(class_id, person_id, person_name, self.now);
    self.state.insert_booking(booking.clone());
    if let Some(class) = self.state.class_mut(class_id) {
      class.booked_count = active + 1;
    }

    self.state.audit_log_mut().append(
      self.now,
      AuditAction::ClassBooked,
      EntityType::Booking,
      &booking.id,
      format!("{} booked into {}", person_name, class_name),
      location,
    );

    info!("예약 완료: {} -> {} ({}/{})", person_name, class_name, active + 1, capacity);
    Ok(booking)
  }

  /// 대기자 등록
  ///
  /// 현재 정원은 확인하지 않습니다. 실제 자리 판단은 예약 시점에 합니다.
  pub fn add_to_waitlist(
    &mut self,
    class_id: &str,
    person_id: &str,
    person_name: &str,
  ) -> Result<WaitlistEntry, OperationError> {
    let class = self
      .state
      .class(class_id)
      .ok_or_else(|| OperationError::not_found("class", class_id))?;
    let class_name = class.name.clone();
    let location = class.location.clone();

    if self.state.waitlist_entry(class_id, person_id).is_some() {
      return Err(OperationError::DuplicateWaitlist {
        person_name: person_name.to_string(),
        class_name,
      });
    }

    let entry = WaitlistEntry::new(class_id, person_id, person_name, self.now);
    self.state.push_waitlist(entry.clone());

    let position = self.state.waitlist_for_class(class_id).len();
    self.state.audit_log_mut().append(
      self.now,
      AuditAction::WaitlistAdded,
      EntityType::Waitlist,
      &entry.id,
      format!("{} waitlisted for {} (position {})", person_name, class_name, position),
      location,
    );

    info!("대기자 등록: {} -> {} (순번 {})", person_name, class_name, position);
    Ok(entry)
  }

  /// 예약 취소
  ///
  /// 이미 취소/노쇼된 예약은 아무것도 바꾸지 않고 `AlreadyCancelled`를 돌려줍니다.
  /// 취소 후 대기자가 있으면 가장 먼저 등록된 한 명을 같은 호출 안에서 승격합니다.
  pub fn cancel_booking(&mut self, booking_id: &str) -> Result<Cancellation, OperationError> {
    let booking = self
      .state
      .booking(booking_id)
      .ok_or_else(|| OperationError::not_found("booking", booking_id))?;

    match booking.status {
      BookingStatus::Booked => {}
      BookingStatus::CheckedIn => {
        return Err(OperationError::AlreadyCheckedIn {
          booking_id: booking_id.to_string(),
        });
      }
      status @ (BookingStatus::Cancelled | BookingStatus::NoShow) => {
        debug!("이미 종료된 예약 취소 요청 무시: {} ({})", booking_id, status);
        return Err(OperationError::AlreadyCancelled {
          booking_id: booking_id.to_string(),
          status: status.to_string(),
        });
      }
    }

    let cancelled = self.release(booking_id, BookingStatus::Cancelled)?;
    let location = self.class_location(&cancelled.class_id);

    self.state.audit_log_mut().append(
      self.now,
      AuditAction::BookingCancelled,
      EntityType::Booking,
      &cancelled.id,
      format!("{} cancelled booking for class {}", cancelled.person_name, cancelled.class_id),
      location,
    );
    info!("예약 취소: {} ({})", cancelled.id, cancelled.person_name);

    let promotion = self.promote_next(&cancelled.class_id);

    Ok(Cancellation {
      booking: cancelled,
      promotion,
    })
  }

  /// 노쇼 처리 (외부 배치용)
  ///
  /// `booked` 상태에서만 가능하며 정원을 반환하지만 대기자를 승격하지 않습니다.
  pub fn mark_no_show(&mut self, booking_id: &str) -> Result<Booking, OperationError> {
    let booking = self
      .state
      .booking(booking_id)
      .ok_or_else(|| OperationError::not_found("booking", booking_id))?;

    match booking.status {
      BookingStatus::Booked => {}
      BookingStatus::CheckedIn => {
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

    let booking = self.release(booking_id, BookingStatus::NoShow)?;
    let location = self.class_location(&booking.class_id);
    self.state.audit_log_mut().append(
      self.now,
      AuditAction::NoShowMarked,
      EntityType::Booking,
      &booking.id,
      format!("{} marked as no-show for class {}", booking.person_name, booking.class_id),
      location,
    );
    info!("노쇼 처리: {} ({})", booking.id, booking.person_name);
    Ok(booking)
  }

  /// 예약을 종료 상태로 바꾸고 수업 예약 수 캐시를 줄입니다 (0 미만 불가).
  fn release(&mut self, booking_id: &str, status: BookingStatus) -> Result<Booking, OperationError> {
    let booking = self
      .state
      .booking_mut(booking_id)
      .ok_or_else(|| OperationError::not_found("booking", booking_id))?;
    booking.status = status;
    let booking = booking.clone();

    if let Some(class) = self.state.class_mut(&booking.class_id) {
      class.booked_count = class.booked_count.saturating_sub(1);
    }
    Ok(booking)
  }

  /// 가장 먼저 등록된 대기자를 꺼내 예약을 시도합니다.
  ///
  /// 예약이 실패해도 대기 항목은 다시 넣지 않습니다.
  fn promote_next(&mut self, class_id: &str) -> Option<Promotion> {
    let entry = self.state.pop_waitlist_front(class_id)?;
    let location = self.class_location(class_id);

    match self.book_class(class_id, &entry.person_id, &entry.person_name) {
      Ok(booking) => {
        self.state.audit_log_mut().append(
          self.now,
          AuditAction::WaitlistPromoted,
          EntityType::Waitlist,
          &entry.id,
          format!("{} promoted from waitlist (booking {})", entry.person_name, booking.id),
          location,
        );
        info!("대기자 승격: {} -> {}", entry.person_name, class_id);
        Some(Promotion::Booked { booking })
      }
      Err(e) => {
        warn!("대기자 승격 실패, 대기 항목 제거: {} -> {}: {}", entry.person_name, class_id, e);
        let reason = e.to_string();
        self.state.audit_log_mut().append(
          self.now,
          AuditAction::WaitlistDropped,
          EntityType::Waitlist,
          &entry.id,
          format!("{} dropped from waitlist: {}", entry.person_name, reason),
          location,
        );
        Some(Promotion::Dropped { entry, reason })
      }
    }
  }

  pub(crate) fn class_location(&self, class_id: &str) -> String {
    self
      .state
      .class(class_id)
      .map(|c| c.location.clone())
      .unwrap_or_default()
  }
}
