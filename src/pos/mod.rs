/**
* filename : mod
* author : HAMA
* date: 2026. 10. 19.
* description: POS 판매 기록
**/

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::{AuditAction, EntityType};
use crate::error::OperationError;
use crate::model::{LineItem, Transaction, TOTAL_TOLERANCE};
use crate::store::StudioState;

/// 판매 요청 품목
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
  pub product_id: String,
  pub quantity: u32,
  /// 카탈로그 가격 대신 적용할 단가
  #[serde(default)]
  pub unit_price: Option<f64>,
  /// 카탈로그에 없는 상품의 표시 이름
  #[serde(default)]
  pub product_name: Option<String>,
}

/// 판매 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRequest {
  #[serde(default)]
  pub person_id: Option<String>,
  pub items: Vec<SaleItem>,
  #[serde(default)]
  pub discount: f64,
  #[serde(default)]
  pub tax: f64,
  #[serde(default)]
  pub promo_code: Option<String>,
  pub seller_id: String,
  pub location: String,
  /// 단말이 계산한 합계. 있으면 서버 계산값과 대조합니다.
  #[serde(default)]
  pub declared_total: Option<f64>,
}

fn invalid(reason: impl Into<String>) -> OperationError {
  OperationError::InvalidTransaction(reason.into())
}

fn resolve_item(state: &StudioState, item: &SaleItem) -> Result<LineItem, OperationError> {
  if item.quantity == 0 {
    return Err(invalid(format!("quantity for {} must be at least 1", item.product_id)));
  }

  let product = state.product(&item.product_id);
  let unit_price = match (item.unit_price, product) {
    (Some(price), _) => price,
    (None, Some(product)) => product.price,
    (None, None) => return Err(OperationError::not_found("product", &item.product_id)),
  };
  if !unit_price.is_finite() || unit_price < 0.0 {
    return Err(invalid(format!("unit price for {} must be non-negative", item.product_id)));
  }

  let product_name = product
    .map(|p| p.name.clone())
    .or_else(|| item.product_name.clone())
    .unwrap_or_else(|| item.product_id.clone());

  Ok(LineItem {
    product_id: item.product_id.clone(),
    product_name,
    quantity: item.quantity,
    unit_price,
    category: product.map(|p| p.category),
  })
}

/// 판매 기록
///
/// 합계는 `subtotal - discount + tax`로 서버에서 계산하며, 요청에 합계가 있으면
/// 허용 오차 안에서 일치해야 합니다. 기록된 거래는 수정하지 않습니다.
pub fn record_sale(
  state: &mut StudioState,
  now: DateTime<Utc>,
  request: &SaleRequest,
) -> Result<Transaction, OperationError> {
  if request.items.is_empty() {
    return Err(invalid("a sale needs at least one item"));
  }
  if !request.discount.is_finite() || request.discount < 0.0 {
    return Err(invalid("discount must be non-negative"));
  }
  if !request.tax.is_finite() || request.tax < 0.0 {
    return Err(invalid("tax must be non-negative"));
  }

  let items = request
    .items
    .iter()
    .map(|item| resolve_item(state, item))
    .collect::<Result<Vec<_>, _>>()?;
  let subtotal: f64 = items.iter().map(LineItem::amount).sum();
  if request.discount > subtotal + TOTAL_TOLERANCE {
    return Err(invalid(format!(
      "discount {:.2} exceeds subtotal {:.2}",
      request.discount, subtotal
    )));
  }

  let person_name = match &request.person_id {
    Some(person_id) => Some(
      state
        .resolve_person(person_id)
        .map(|p| p.name().to_string())
        .ok_or_else(|| OperationError::not_found("person", person_id))?,
    ),
    None => None,
  };

  let transaction = Transaction {
    id: Uuid::new_v4().to_string(),
    person_id: request.person_id.clone(),
    person_name,
    items,
    subtotal,
    discount: request.discount,
    tax: request.tax,
    total: subtotal - request.discount + request.tax,
    promo_code: request.promo_code.clone(),
    seller_id: request.seller_id.clone(),
    timestamp: now,
    location: request.location.clone(),
  };

  if let Some(declared) = request.declared_total {
    if (declared - transaction.total).abs() > TOTAL_TOLERANCE {
      debug!("합계 불일치: 요청 {} / 계산 {}", declared, transaction.total);
      return Err(invalid(format!(
        "declared total {:.2} does not match {:.2} - {:.2} + {:.2} = {:.2}",
        declared, subtotal, request.discount, request.tax, transaction.total
      )));
    }
  }

  state.audit_log_mut().append(
    now,
    AuditAction::SaleRecorded,
    EntityType::Transaction,
    &transaction.id,
    format!(
      "Sale of {:.2} by {} ({} items)",
      transaction.total,
      transaction.seller_id,
      transaction.items.len()
    ),
    transaction.location.clone(),
  );
  state.push_transaction(transaction.clone());

  info!("판매 기록: {} {:.2} ({})", transaction.seller_id, transaction.total, transaction.location);
  Ok(transaction)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{Member, MembershipPlan, Product, ProductCategory};

  fn state() -> StudioState {
    let mut state = StudioState::new();
    state.insert_product(Product {
      id: "membership-monthly".into(),
      name: "Monthly Membership".into(),
      category: ProductCategory::Membership,
      price: 100.0,
    });
    state.insert_member(Member {
      id: "m1".into(),
      name: "Mina".into(),
      plan: MembershipPlan::Unlimited,
      location: "main".into(),
    });
    state
  }

  fn request(discount: f64, tax: f64) -> SaleRequest {
    SaleRequest {
      person_id: Some("m1".into()),
      items: vec![SaleItem {
        product_id: "membership-monthly".into(),
        quantity: 1,
        unit_price: None,
        product_name: None,
      }],
      discount,
      tax,
      promo_code: Some("FALL10".into()),
      seller_id: "s1".into(),
      location: "main".into(),
      declared_total: None,
    }
  }

  #[test]
  fn test_total_is_subtotal_minus_discount_plus_tax() {
    let mut state = state();
    let txn = record_sale(&mut state, Utc::now(), &request(10.0, 6.30)).unwrap();

    assert_eq!(txn.subtotal, 100.0);
    assert!((txn.total - 96.30).abs() < TOTAL_TOLERANCE);
    assert!(txn.is_balanced());
    assert_eq!(txn.person_name.as_deref(), Some("Mina"));
    assert_eq!(txn.items[0].category, Some(ProductCategory::Membership));
    assert_eq!(state.transactions().len(), 1);
    assert_eq!(state.audit_log().for_entity(&txn.id).count(), 1);
  }

  #[test]
  fn test_mismatched_declared_total_rejected() {
    let mut state = state();
    let mut req = request(10.0, 6.30);
    req.declared_total = Some(100.0);

    let err = record_sale(&mut state, Utc::now(), &req).unwrap_err();
    assert!(matches!(err, OperationError::InvalidTransaction(_)));
    assert!(state.transactions().is_empty());
    assert!(state.audit_log().is_empty());

    req.declared_total = Some(96.30);
    assert!(record_sale(&mut state, Utc::now(), &req).is_ok());
  }

  #[test]
  fn test_unknown_product_needs_price() {
    let mut state = state();
    let mut req = request(0.0, 0.0);
    req.items[0].product_id = "towel".into();

    let err = record_sale(&mut state, Utc::now(), &req).unwrap_err();
    assert!(matches!(err, OperationError::NotFound { entity: "product", .. }));

    req.items[0].unit_price = Some(5.0);
    req.items[0].product_name = Some("Towel".into());
    let txn = record_sale(&mut state, Utc::now(), &req).unwrap();
    assert_eq!(txn.items[0].product_name, "Towel");
    assert_eq!(txn.items[0].category, None);
  }

  #[test]
  fn test_invalid_amounts_rejected() {
    let mut state = state();
    assert!(record_sale(&mut state, Utc::now(), &request(150.0, 0.0)).is_err());
    assert!(record_sale(&mut state, Utc::now(), &request(-1.0, 0.0)).is_err());

    let mut req = request(0.0, 0.0);
    req.items[0].quantity = 0;
    assert!(record_sale(&mut state, Utc::now(), &req).is_err());

    let mut req = request(0.0, 0.0);
    req.person_id = Some("ghost".into());
    assert!(matches!(
      record_sale(&mut state, Utc::now(), &req),
      Err(OperationError::NotFound { entity: "person", .. })
    ));
  }
}
