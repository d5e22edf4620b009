//! 품목 분류 결정
//!
//! 판매 시점에 기록된 분류를 우선 쓰고, 없으면 상품 카탈로그, 그래도 없으면
//! 상품 ID/이름의 문자열로 추론합니다. 문자열 추론은 분류 도입 전 데이터용입니다.

use crate::model::{LineItem, ProductCategory};
use crate::store::StudioState;

pub fn categorize(item: &LineItem, state: &StudioState) -> ProductCategory {
  if let Some(category) = item.category {
    return category;
  }
  if let Some(product) = state.product(&item.product_id) {
    return product.category;
  }
  infer_from_text(&item.product_id, &item.product_name)
}

pub fn infer_from_text(product_id: &str, product_name: &str) -> ProductCategory {
  let haystack = format!("{} {}", product_id, product_name).to_lowercase();
  if haystack.contains("membership") {
    ProductCategory::Membership
  } else if haystack.contains("pack") {
    ProductCategory::ClassPack
  } else if ["drop-in", "dropin", "drop_in", "drop in"]
    .iter()
    .any(|needle| haystack.contains(needle))
  {
    ProductCategory::DropIn
  } else {
    ProductCategory::Other
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Product;

  fn item(id: &str, name: &str, category: Option<ProductCategory>) -> LineItem {
    LineItem {
      product_id: id.into(),
      product_name: name.into(),
      quantity: 1,
      unit_price: 10.0,
      category,
    }
  }

  #[test]
  fn test_text_inference() {
    assert_eq!(infer_from_text("membership-gold", ""), ProductCategory::Membership);
    assert_eq!(infer_from_text("p-10", "10 Class Pack"), ProductCategory::ClassPack);
    assert_eq!(infer_from_text("drop-in-single", ""), ProductCategory::DropIn);
    assert_eq!(infer_from_text("towel", "Towel"), ProductCategory::Other);
  }

  #[test]
  fn test_explicit_category_wins() {
    let mut state = StudioState::new();
    state.insert_product(Product {
      id: "membership-gold".into(),
      name: "Gold".into(),
      category: ProductCategory::Membership,
      price: 120.0,
    });
    state.insert_product(Product {
      id: "shaker".into(),
      name: "Shaker Bottle".into(),
      category: ProductCategory::Retail,
      price: 15.0,
    });

    let explicit = item("membership-gold", "Gold", Some(ProductCategory::Other));
    assert_eq!(categorize(&explicit, &state), ProductCategory::Other);
    assert_eq!(categorize(&item("shaker", "Shaker", None), &state), ProductCategory::Retail);
    assert_eq!(categorize(&item("legacy-pack-5", "", None), &state), ProductCategory::ClassPack);
  }
}
