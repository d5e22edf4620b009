//! 판매자별 집계

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::debug;

use super::{categorize, CategoryBreakdown, CommissionRates, CommissionReport, LocationFilter};
use crate::model::{LineItem, ProductCategory, Transaction};
use crate::store::StudioState;

#[derive(Debug, Default)]
struct SellerTotals {
  total_sales: f64,
  transaction_count: u32,
  breakdown: CategoryBreakdown,
}

impl SellerTotals {
  /// 할인과 세금은 품목 금액 비율로 나눠 분류별 합계가 `total_sales`와 맞도록 합니다.
  fn add(&mut self, transaction: &Transaction, state: &StudioState) {
    self.total_sales += transaction.total;
    self.transaction_count += 1;

    let gross: f64 = transaction.items.iter().map(LineItem::amount).sum();
    if gross > 0.0 {
      let scale = transaction.total / gross;
      for item in &transaction.items {
        self.breakdown.add(categorize(item, state), item.amount() * scale);
      }
    } else if transaction.total != 0.0 {
      // 품목 금액이 0이면 나눌 기준이 없음
      self.breakdown.add(ProductCategory::Other, transaction.total);
    }
  }
}

fn in_range(transaction: &Transaction, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
  transaction.timestamp >= start && transaction.timestamp <= end
}

fn build_report(
  state: &StudioState,
  rates: &CommissionRates,
  seller_id: &str,
  totals: SellerTotals,
) -> CommissionReport {
  let staff = state.staff(seller_id);
  let seller_role = staff.map(|s| s.role);
  let commission_rate = rates.rate_for(seller_role);

  CommissionReport {
    seller_id: seller_id.to_string(),
    seller_name: staff
      .map(|s| s.name.clone())
      .unwrap_or_else(|| seller_id.to_string()),
    seller_role,
    total_sales: totals.total_sales,
    transaction_count: totals.transaction_count,
    commission_rate,
    commission_amount: totals.total_sales * commission_rate,
    category_breakdown: totals.breakdown,
  }
}

/// 판매자 한 명의 기간 보고서 (모든 지점, 기간 양끝 포함)
///
/// 거래가 없으면 0으로 채운 보고서를 돌려줍니다.
pub fn commission_report(
  state: &StudioState,
  rates: &CommissionRates,
  seller_id: &str,
  start: DateTime<Utc>,
  end: DateTime<Utc>,
) -> CommissionReport {
  let mut totals = SellerTotals::default();
  for transaction in state
    .transactions()
    .iter()
    .filter(|t| t.seller_id == seller_id && in_range(t, start, end))
  {
    totals.add(transaction, state);
  }
  build_report(state, rates, seller_id, totals)
}

/// 전체 판매자 보고서
///
/// 기간 내 거래가 없는 판매자는 빠지며, 매출 내림차순 후 이름 오름차순으로 정렬합니다.
pub fn all_commission_reports(
  state: &StudioState,
  rates: &CommissionRates,
  location: &LocationFilter,
  start: DateTime<Utc>,
  end: DateTime<Utc>,
) -> Vec<CommissionReport> {
  let mut by_seller: BTreeMap<&str, SellerTotals> = BTreeMap::new();
  for transaction in state
    .transactions()
    .iter()
    .filter(|t| in_range(t, start, end) && location.matches(&t.location))
  {
    by_seller
      .entry(transaction.seller_id.as_str())
      .or_default()
      .add(transaction, state);
  }

  let mut reports: Vec<CommissionReport> = by_seller
    .into_iter()
    .map(|(seller_id, totals)| build_report(state, rates, seller_id, totals))
    .collect();

  reports.sort_by(|a, b| {
    b.total_sales
      .partial_cmp(&a.total_sales)
      .unwrap_or(Ordering::Equal)
      .then_with(|| a.seller_name.cmp(&b.seller_name))
      .then_with(|| a.seller_id.cmp(&b.seller_id))
  });

  debug!("커미션 보고서 {}건 생성 ({:?}, {} ~ {})", reports.len(), location, start, end);
  reports
}
