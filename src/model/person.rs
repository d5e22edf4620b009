//! 회원/고객 모델
//!
//! 스튜디오 이용자는 네 종류로 나뉩니다. 어느 컬렉션에 속하는지로
//! 종류가 결정되며, 엔티티 저장소 경계에서 [`Person`]으로 한 번만 해석합니다.

use serde::{Deserialize, Serialize};

/// 멤버십 플랜
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MembershipPlan {
  /// 무제한
  Unlimited,
  /// 주 N회
  PerWeek { classes: u32 },
}

/// 정기 회원
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
  pub id: String,
  pub name: String,
  pub plan: MembershipPlan,
  #[serde(default)]
  pub location: String,
}

/// 클래스팩(선불 N회권) 고객
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackClient {
  pub id: String,
  pub name: String,
  /// 남은 수업 횟수 (0 미만으로 내려가지 않음)
  pub remaining_classes: u32,
  #[serde(default)]
  pub location: String,
}

/// 1회 이용(drop-in) 고객. 방문마다 POS에서 결제하므로 잔액이 없습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropInClient {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub location: String,
}

/// 잠재 고객
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default)]
  pub source: Option<String>,
}

/// 이용자 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonKind {
  Member,
  PackClient,
  DropIn,
  Lead,
}

/// 저장소에서 해석된 이용자 참조
#[derive(Debug, Clone, Copy)]
pub enum Person<'a> {
  Member(&'a Member),
  PackClient(&'a PackClient),
  DropIn(&'a DropInClient),
  Lead(&'a Lead),
}

impl<'a> Person<'a> {
  pub fn name(&self) -> &'a str {
    match self {
      Person::Member(m) => &m.name,
      Person::PackClient(p) => &p.name,
      Person::DropIn(d) => &d.name,
      Person::Lead(l) => &l.name,
    }
  }

  pub fn kind(&self) -> PersonKind {
    match self {
      Person::Member(_) => PersonKind::Member,
      Person::PackClient(_) => PersonKind::PackClient,
      Person::DropIn(_) => PersonKind::DropIn,
      Person::Lead(_) => PersonKind::Lead,
    }
  }
}
