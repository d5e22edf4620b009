//! 감사 로그
//!
//! 모든 변경 작업마다 한 건씩 추가되는 append-only 기록입니다.
//! 한 번 기록된 항목은 수정하거나 삭제하지 않습니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 감사 대상 작업
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
  ClassBooked,
  WaitlistAdded,
  BookingCancelled,
  WaitlistPromoted,
  WaitlistDropped,
  CheckedIn,
  NoShowMarked,
  SaleRecorded,
}

impl AuditAction {
  pub fn as_str(self) -> &'static str {
    match self {
      AuditAction::ClassBooked => "class_booked",
      AuditAction::WaitlistAdded => "waitlist_added",
      AuditAction::BookingCancelled => "booking_cancelled",
      AuditAction::WaitlistPromoted => "waitlist_promoted",
      AuditAction::WaitlistDropped => "waitlist_dropped",
      AuditAction::CheckedIn => "checked_in",
      AuditAction::NoShowMarked => "no_show_marked",
      AuditAction::SaleRecorded => "sale_recorded",
    }
  }
}

/// 감사 대상 엔티티 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
  Booking,
  Waitlist,
  Transaction,
}

impl EntityType {
  pub fn as_str(self) -> &'static str {
    match self {
      EntityType::Booking => "booking",
      EntityType::Waitlist => "waitlist",
      EntityType::Transaction => "transaction",
    }
  }
}

/// 감사 로그 항목 (불변)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
  pub id: String,
  pub timestamp: DateTime<Utc>,
  pub action: AuditAction,
  pub entity_type: EntityType,
  pub entity_id: String,
  pub details: String,
  pub location: String,
}

/// append-only 감사 로그
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditLog {
  entries: Vec<AuditLogEntry>,
}

impl AuditLog {
  pub fn new() -> Self {
    Self::default()
  }

  /// 항목 추가. 검증하지 않으며 실패하지 않습니다.
  pub fn append(
    &mut self,
    timestamp: DateTime<Utc>,
    action: AuditAction,
    entity_type: EntityType,
    entity_id: impl Into<String>,
    details: impl Into<String>,
    location: impl Into<String>,
  ) -> &AuditLogEntry {
    self.entries.push(AuditLogEntry {
      id: Uuid::new_v4().to_string(),
      timestamp,
      action,
      entity_type,
      entity_id: entity_id.into(),
      details: details.into(),
      location: location.into(),
    });
    &self.entries[self.entries.len() - 1]
  }

  /// 전체 항목 (기록 순)
  pub fn entries(&self) -> &[AuditLogEntry] {
    &self.entries
  }

  /// 특정 엔티티의 항목
  pub fn for_entity<'a>(&'a self, entity_id: &'a str) -> impl Iterator<Item = &'a AuditLogEntry> + 'a {
    self.entries.iter().filter(move |e| e.entity_id == entity_id)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
