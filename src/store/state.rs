//! 엔티티 저장소
//!
//! 원본 레코드(수업, 회원, 직원, 상품)와 파생 컬렉션(예약, 대기자, 거래,
//! 감사 로그, 주간 이용 횟수)을 보관합니다. 비즈니스 규칙은 두지 않고
//! 조회/변경 헬퍼만 제공합니다.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::audit::AuditLog;
use crate::model::{
  Booking, Class, DropInClient, Lead, Member, PackClient, Person, Product, Staff, Transaction,
  WaitlistEntry,
};

/// 스튜디오 전체 상태 (저장 단위)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudioState {
  #[serde(default)]
  classes: BTreeMap<String, Class>,
  #[serde(default)]
  members: BTreeMap<String, Member>,
  #[serde(default)]
  pack_clients: BTreeMap<String, PackClient>,
  #[serde(default)]
  drop_in_clients: BTreeMap<String, DropInClient>,
  #[serde(default)]
  leads: BTreeMap<String, Lead>,
  #[serde(default)]
  staff: BTreeMap<String, Staff>,
  #[serde(default)]
  products: BTreeMap<String, Product>,
  #[serde(default)]
  bookings: HashMap<String, Booking>,
  /// 기록 순서가 곧 FIFO 순서
  #[serde(default)]
  waitlist: Vec<WaitlistEntry>,
  /// 회원 ID → 주 시작일(월요일) → 출석 횟수
  #[serde(default)]
  weekly_usage: BTreeMap<String, BTreeMap<NaiveDate, u32>>,
  #[serde(default)]
  transactions: Vec<Transaction>,
  #[serde(default)]
  audit_log: AuditLog,
}

impl StudioState {
  pub fn new() -> Self {
    Self::default()
  }

  // ---- 원본 레코드 ----

  pub fn insert_class(&mut self, class: Class) {
    self.classes.insert(class.id.clone(), class);
  }

  pub fn class(&self, class_id: &str) -> Option<&Class> {
    self.classes.get(class_id)
  }

  pub fn class_mut(&mut self, class_id: &str) -> Option<&mut Class> {
    self.classes.get_mut(class_id)
  }

  pub fn classes(&self) -> impl Iterator<Item = &Class> {
    self.classes.values()
  }

  pub fn insert_member(&mut self, member: Member) {
    self.members.insert(member.id.clone(), member);
  }

  pub fn insert_pack_client(&mut self, client: PackClient) {
    self.pack_clients.insert(client.id.clone(), client);
  }

  pub fn pack_client(&self, person_id: &str) -> Option<&PackClient> {
    self.pack_clients.get(person_id)
  }

  pub fn pack_client_mut(&mut self, person_id: &str) -> Option<&mut PackClient> {
    self.pack_clients.get_mut(person_id)
  }

  pub fn insert_drop_in(&mut self, client: DropInClient) {
    self.drop_in_clients.insert(client.id.clone(), client);
  }

  pub fn insert_lead(&mut self, lead: Lead) {
    self.leads.insert(lead.id.clone(), lead);
  }

  pub fn insert_staff(&mut self, staff: Staff) {
    self.staff.insert(staff.id.clone(), staff);
  }

  pub fn staff(&self, staff_id: &str) -> Option<&Staff> {
    self.staff.get(staff_id)
  }

  pub fn insert_product(&mut self, product: Product) {
    self.products.insert(product.id.clone(), product);
  }

  pub fn product(&self, product_id: &str) -> Option<&Product> {
    self.products.get(product_id)
  }

  /// ID가 속한 컬렉션으로 이용자 종류를 해석합니다.
  ///
  /// 컬렉션 간 ID 중복은 허용하지 않는 것이 전제이며, 중복되면
  /// 회원 → 클래스팩 → drop-in → 리드 순으로 먼저 찾은 쪽을 씁니다.
  pub fn resolve_person(&self, person_id: &str) -> Option<Person<'_>> {
    if let Some(member) = self.members.get(person_id) {
      return Some(Person::Member(member));
    }
    if let Some(client) = self.pack_clients.get(person_id) {
      return Some(Person::PackClient(client));
    }
    if let Some(client) = self.drop_in_clients.get(person_id) {
      return Some(Person::DropIn(client));
    }
    self.leads.get(person_id).map(Person::Lead)
  }

  // ---- 예약 ----

  pub fn booking(&self, booking_id: &str) -> Option<&Booking> {
    self.bookings.get(booking_id)
  }

  pub fn booking_mut(&mut self, booking_id: &str) -> Option<&mut Booking> {
    self.bookings.get_mut(booking_id)
  }

  pub fn insert_booking(&mut self, booking: Booking) {
    self.bookings.insert(booking.id.clone(), booking);
  }

  /// 수업의 예약 목록 (예약 시각 순)
  pub fn bookings_for_class(&self, class_id: &str) -> Vec<&Booking> {
    let mut bookings: Vec<&Booking> = self
      .bookings
      .values()
      .filter(|b| b.class_id == class_id)
      .collect();
    bookings.sort_by(|a, b| a.booked_at.cmp(&b.booked_at).then_with(|| a.id.cmp(&b.id)));
    bookings
  }

  /// 이용자의 예약 이력 (예약 시각 순)
  pub fn bookings_for_person(&self, person_id: &str) -> Vec<&Booking> {
    let mut bookings: Vec<&Booking> = self
      .bookings
      .values()
      .filter(|b| b.person_id == person_id)
      .collect();
    bookings.sort_by(|a, b| a.booked_at.cmp(&b.booked_at).then_with(|| a.id.cmp(&b.id)));
    bookings
  }

  /// (수업, 이용자)의 활성 예약
  pub fn active_booking(&self, class_id: &str, person_id: &str) -> Option<&Booking> {
    self
      .bookings
      .values()
      .find(|b| b.class_id == class_id && b.person_id == person_id && b.is_active())
  }

  /// 활성 예약 수 (booked + checked-in)
  pub fn active_booking_count(&self, class_id: &str) -> u32 {
    let count = self
      .bookings
      .values()
      .filter(|b| b.class_id == class_id && b.is_active())
      .count();
    u32::try_from(count).unwrap_or(u32::MAX)
  }

  /// 모든 수업의 `booked_count` 캐시를 예약 목록에서 다시 계산
  pub fn recount_booked(&mut self) {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for booking in self.bookings.values().filter(|b| b.is_active()) {
      *counts.entry(booking.class_id.as_str()).or_insert(0) += 1;
    }
    for class in self.classes.values_mut() {
      let actual = counts.get(class.id.as_str()).copied().unwrap_or(0);
      if class.booked_count != actual {
        warn!("수업 {} 예약 수 캐시 보정: {} -> {}", class.id, class.booked_count, actual);
        class.booked_count = actual;
      }
    }
  }

  /// 캐시 불일치 또는 정원 초과 수업 ID 목록
  pub fn capacity_violations(&self) -> Vec<String> {
    self
      .classes
      .values()
      .filter(|c| {
        let actual = self.active_booking_count(&c.id);
        c.booked_count != actual || actual > c.capacity
      })
      .map(|c| c.id.clone())
      .collect()
  }

  // ---- 대기자 ----

  /// 수업의 대기자 목록 (FIFO 순)
  pub fn waitlist_for_class(&self, class_id: &str) -> Vec<&WaitlistEntry> {
    self.waitlist.iter().filter(|w| w.class_id == class_id).collect()
  }

  pub fn waitlist_entry(&self, class_id: &str, person_id: &str) -> Option<&WaitlistEntry> {
    self
      .waitlist
      .iter()
      .find(|w| w.class_id == class_id && w.person_id == person_id)
  }

  pub fn push_waitlist(&mut self, entry: WaitlistEntry) {
    self.waitlist.push(entry);
  }

  /// 수업의 가장 먼저 등록된 대기자를 꺼냅니다.
  pub fn pop_waitlist_front(&mut self, class_id: &str) -> Option<WaitlistEntry> {
    let index = self.waitlist.iter().position(|w| w.class_id == class_id)?;
    Some(self.waitlist.remove(index))
  }

  // ---- 주간 이용 횟수 ----

  pub fn weekly_usage(&self, person_id: &str, week_start: NaiveDate) -> u32 {
    self
      .weekly_usage
      .get(person_id)
      .and_then(|weeks| weeks.get(&week_start))
      .copied()
      .unwrap_or(0)
  }

  /// 카운터가 없으면 만들고 1 증가시킨 뒤 새 값을 반환
  pub fn increment_weekly_usage(&mut self, person_id: &str, week_start: NaiveDate) -> u32 {
    let counter = self
      .weekly_usage
      .entry(person_id.to_string())
      .or_default()
      .entry(week_start)
      .or_insert(0);
    *counter += 1;
    *counter
  }

  // ---- 거래 / 감사 ----

  pub fn push_transaction(&mut self, transaction: Transaction) {
    self.transactions.push(transaction);
  }

  pub fn transactions(&self) -> &[Transaction] {
    &self.transactions
  }

  pub fn audit_log(&self) -> &AuditLog {
    &self.audit_log
  }

  pub fn audit_log_mut(&mut self) -> &mut AuditLog {
    &mut self.audit_log
  }
}
