//! 커미션 및 매출 집계
//!
//! 거래 로그를 읽기 전용으로 집계해 판매자별/분류별 매출과 커미션을 계산합니다.
//! 금액은 집계 중에는 반올림하지 않고 표시 직전에만 소수 둘째 자리로 반올림합니다.

pub mod aggregate;
pub mod category;

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{ProductCategory, StaffRole};

pub use aggregate::{all_commission_reports, commission_report};
pub use category::{categorize, infer_from_text};

/// 표시용 반올림 (소수 둘째 자리)
pub fn round2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

/// 역할별 커미션 요율
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionRates {
  rates: HashMap<StaffRole, f64>,
  /// 직원 명부에 없는 판매자에게 적용
  default_rate: f64,
}

impl Default for CommissionRates {
  fn default() -> Self {
    let rates = HashMap::from([
      (StaffRole::Owner, 0.0),
      (StaffRole::Manager, 0.05),
      (StaffRole::Sales, 0.15),
      (StaffRole::FrontDesk, 0.05),
      (StaffRole::Coach, 0.10),
    ]);
    Self {
      rates,
      default_rate: 0.0,
    }
  }
}

impl CommissionRates {
  pub fn with_rate(mut self, role: StaffRole, rate: f64) -> Self {
    self.rates.insert(role, rate);
    self
  }

  pub fn with_default_rate(mut self, rate: f64) -> Self {
    self.default_rate = rate;
    self
  }

  pub fn rate_for(&self, role: Option<StaffRole>) -> f64 {
    role
      .and_then(|r| self.rates.get(&r).copied())
      .unwrap_or(self.default_rate)
  }
}

/// 지점 필터
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationFilter {
  All,
  Only(String),
}

impl LocationFilter {
  pub fn matches(&self, location: &str) -> bool {
    match self {
      LocationFilter::All => true,
      LocationFilter::Only(wanted) => wanted == location,
    }
  }
}

impl FromStr for LocationFilter {
  type Err = std::convert::Infallible;

  /// 빈 문자열과 "all"은 전체 지점
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("all") {
      Ok(LocationFilter::All)
    } else {
      Ok(LocationFilter::Only(s.to_string()))
    }
  }
}

/// 분류별 매출
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
  pub memberships: f64,
  pub class_packs: f64,
  pub drop_in: f64,
  pub retail: f64,
  pub other: f64,
}

impl CategoryBreakdown {
  pub fn add(&mut self, category: ProductCategory, amount: f64) {
    let slot = match category {
      ProductCategory::Membership => &mut self.memberships,
      ProductCategory::ClassPack => &mut self.class_packs,
      ProductCategory::DropIn => &mut self.drop_in,
      ProductCategory::Retail => &mut self.retail,
      ProductCategory::Other => &mut self.other,
    };
    *slot += amount;
  }

  fn rounded(&self) -> Self {
    Self {
      memberships: round2(self.memberships),
      class_packs: round2(self.class_packs),
      drop_in: round2(self.drop_in),
      retail: round2(self.retail),
      other: round2(self.other),
    }
  }
}

/// 판매자 한 명의 기간 커미션 보고서
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionReport {
  pub seller_id: String,
  pub seller_name: String,
  /// 직원 명부에 없는 판매자는 `None`
  pub seller_role: Option<StaffRole>,
  pub total_sales: f64,
  pub transaction_count: u32,
  pub commission_rate: f64,
  pub commission_amount: f64,
  pub category_breakdown: CategoryBreakdown,
}

impl CommissionReport {
  /// 금액 필드를 소수 둘째 자리로 반올림한 표시용 사본
  pub fn rounded(&self) -> Self {
    Self {
      total_sales: round2(self.total_sales),
      commission_amount: round2(self.commission_amount),
      category_breakdown: self.category_breakdown.rounded(),
      ..self.clone()
    }
  }
}
