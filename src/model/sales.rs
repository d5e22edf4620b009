//! 직원, 상품, POS 거래 모델

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 거래 합계 검증 허용 오차
pub const TOTAL_TOLERANCE: f64 = 0.005;

/// 직원 역할 (커미션 요율 결정)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
  Owner,
  Manager,
  Sales,
  FrontDesk,
  Coach,
}

impl StaffRole {
  pub const ALL: [StaffRole; 5] = [
    StaffRole::Owner,
    StaffRole::Manager,
    StaffRole::Sales,
    StaffRole::FrontDesk,
    StaffRole::Coach,
  ];

  /// 환경 변수 접미사 (예: `FRONT_DESK`)
  pub fn env_suffix(self) -> &'static str {
    match self {
      StaffRole::Owner => "OWNER",
      StaffRole::Manager => "MANAGER",
      StaffRole::Sales => "SALES",
      StaffRole::FrontDesk => "FRONT_DESK",
      StaffRole::Coach => "COACH",
    }
  }
}

/// 직원
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
  pub id: String,
  pub name: String,
  pub role: StaffRole,
  #[serde(default)]
  pub location: String,
}

/// 상품 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
  Membership,
  ClassPack,
  DropIn,
  Retail,
  Other,
}

/// 판매 상품
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: String,
  pub name: String,
  pub category: ProductCategory,
  pub price: f64,
}

/// 거래 품목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
  pub product_id: String,
  pub product_name: String,
  pub quantity: u32,
  pub unit_price: f64,
  /// 판매 시점의 분류. 분류 도입 전 데이터에는 없을 수 있습니다.
  #[serde(default)]
  pub category: Option<ProductCategory>,
}

impl LineItem {
  pub fn amount(&self) -> f64 {
    self.unit_price * f64::from(self.quantity)
  }
}

/// POS 판매 기록 (불변)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
  pub id: String,
  pub person_id: Option<String>,
  pub person_name: Option<String>,
  pub items: Vec<LineItem>,
  pub subtotal: f64,
  pub discount: f64,
  pub tax: f64,
  pub total: f64,
  pub promo_code: Option<String>,
  pub seller_id: String,
  pub timestamp: DateTime<Utc>,
  pub location: String,
}

impl Transaction {
  /// `subtotal - discount + tax`
  pub fn expected_total(&self) -> f64 {
    self.subtotal - self.discount + self.tax
  }

  /// 합계 불변식 확인
  pub fn is_balanced(&self) -> bool {
    (self.total - self.expected_total()).abs() <= TOTAL_TOLERANCE
  }
}
