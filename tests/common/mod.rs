//! 통합 테스트 공용 픽스처

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use xstudio::clock::FixedClock;
use xstudio::commission::CommissionRates;
use xstudio::model::{
    Class, DropInClient, Member, MembershipPlan, PackClient, Product, ProductCategory, Staff,
    StaffRole,
};
use xstudio::store::{MemoryStore, StudioState};
use xstudio::Studio;

/// 2026-10-19 (월) 07:00 UTC
pub fn monday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 7, 0, 0).unwrap()
}

/// 정원 2인 수업 하나와 종류별 이용자가 있는 상태
pub fn roster() -> StudioState {
    let mut state = StudioState::new();
    state.insert_class(Class::new("spin", "Evening Spin", 2, "gangnam"));
    state.insert_class(Class::new("reformer", "Reformer Pilates", 1, "mapo"));

    state.insert_member(Member {
        id: "mem-1".into(),
        name: "Kim Minji".into(),
        plan: MembershipPlan::PerWeek { classes: 3 },
        location: "gangnam".into(),
    });
    state.insert_member(Member {
        id: "mem-2".into(),
        name: "Lee Junho".into(),
        plan: MembershipPlan::Unlimited,
        location: "gangnam".into(),
    });
    state.insert_pack_client(PackClient {
        id: "pack-1".into(),
        name: "Choi Yuna".into(),
        remaining_classes: 2,
        location: "gangnam".into(),
    });
    state.insert_pack_client(PackClient {
        id: "pack-empty".into(),
        name: "Jung Hyun".into(),
        remaining_classes: 0,
        location: "mapo".into(),
    });
    state.insert_drop_in(DropInClient {
        id: "drop-1".into(),
        name: "Alex Morgan".into(),
        location: "gangnam".into(),
    });

    state.insert_staff(Staff {
        id: "staff-sales".into(),
        name: "Kang Taeyang".into(),
        role: StaffRole::Sales,
        location: "gangnam".into(),
    });
    state.insert_staff(Staff {
        id: "staff-desk".into(),
        name: "Seo Mira".into(),
        role: StaffRole::FrontDesk,
        location: "mapo".into(),
    });
    state.insert_product(Product {
        id: "membership-unlimited".into(),
        name: "Unlimited Membership".into(),
        category: ProductCategory::Membership,
        price: 100.0,
    });
    state.insert_product(Product {
        id: "pack-10".into(),
        name: "10 Class Pack".into(),
        category: ProductCategory::ClassPack,
        price: 220.0,
    });
    state
}

/// 메모리 저장소와 고정 시계를 쓰는 스튜디오
pub fn studio() -> (Studio, Arc<MemoryStore>, Arc<FixedClock>) {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(monday_morning()));
    let studio = Studio::with_state(
        roster(),
        store.clone(),
        clock.clone(),
        CommissionRates::default(),
    );
    (studio, store, clock)
}
