//! 영속화 통합 테스트
//!
//! 저장소 백엔드별 재시작 복원과 저장 실패 시 원자성을 확인합니다.

mod common;

use std::sync::Arc;

use xstudio::clock::FixedClock;
use xstudio::commission::CommissionRates;
use xstudio::db::SqliteStore;
use xstudio::store::{open_store, JsonFileStore, StateStore, StorageError, StoreSpec};
use xstudio::{ErrorCode, Studio};

async fn exercise(studio: &mut Studio) {
    let booking = studio.book_class("spin", "pack-1", "Choi Yuna").await.unwrap().data.unwrap();
    studio.book_class("spin", "mem-1", "Kim Minji").await.unwrap();
    studio.add_to_waitlist("spin", "mem-2", "Lee Junho").await.unwrap();
    studio.check_in_member(&booking.id).await.unwrap();
}

async fn reopen(store: Arc<dyn StateStore>) -> Studio {
    let clock = Arc::new(FixedClock::new(common::monday_morning()));
    Studio::open(store, clock, CommissionRates::default()).await.unwrap()
}

#[tokio::test]
async fn test_json_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("studio.json");

    let store: Arc<dyn StateStore> = Arc::new(JsonFileStore::new(path.clone()));
    let clock = Arc::new(FixedClock::new(common::monday_morning()));
    let mut studio = Studio::with_state(common::roster(), store, clock, CommissionRates::default());
    exercise(&mut studio).await;

    let restored = reopen(Arc::new(JsonFileStore::new(path))).await;
    assert_eq!(restored.state(), studio.state());
    assert_eq!(restored.state().pack_client("pack-1").unwrap().remaining_classes, 1);
    assert_eq!(restored.waitlist("spin").len(), 1);
}

#[tokio::test]
async fn test_sqlite_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("studio.db").display());

    let store: Arc<dyn StateStore> = Arc::new(SqliteStore::connect(&url).await.unwrap());
    let clock = Arc::new(FixedClock::new(common::monday_morning()));
    let mut studio = Studio::with_state(common::roster(), store, clock, CommissionRates::default());
    exercise(&mut studio).await;

    let spec: StoreSpec = url.parse().unwrap();
    let restored = reopen(open_store(&spec).await.unwrap()).await;
    assert_eq!(restored.state(), studio.state());
    assert_eq!(restored.audit_log(None).len(), 4);
}

#[tokio::test]
async fn test_empty_store_opens_empty_studio() {
    let dir = tempfile::tempdir().unwrap();
    let studio = reopen(Arc::new(JsonFileStore::new(dir.path().join("missing.json")))).await;
    assert!(studio.classes().is_empty());
}

#[tokio::test]
async fn test_failed_save_rolls_back_every_operation() {
    let (mut studio, store, _) = common::studio();

    let booking = studio.book_class("spin", "pack-1", "Choi Yuna").await.unwrap().data.unwrap();
    studio.add_to_waitlist("reformer", "mem-1", "Kim Minji").await.unwrap();
    let before = studio.state().clone();

    store.set_fail_on_save(true);

    let check_in = studio.check_in_member(&booking.id).await;
    assert!(matches!(check_in, Err(StorageError::Unavailable(_))));
    // 출석 상태와 크레딧 차감이 함께 취소됨
    assert_eq!(studio.state(), &before);
    assert_eq!(studio.state().pack_client("pack-1").unwrap().remaining_classes, 2);

    assert!(studio.cancel_booking(&booking.id).await.is_err());
    assert!(studio.book_class("spin", "mem-2", "Lee Junho").await.is_err());
    assert!(studio.add_to_waitlist("spin", "mem-2", "Lee Junho").await.is_err());
    assert!(studio.mark_no_show(&booking.id).await.is_err());
    assert_eq!(studio.state(), &before);

    // 도메인 거부는 저장을 시도하지 않으므로 장애와 무관하게 결과를 돌려줌
    let duplicate = studio.book_class("spin", "pack-1", "Choi Yuna").await.unwrap();
    assert!(duplicate.is_code(ErrorCode::DuplicateBooking));

    store.set_fail_on_save(false);
    let retried = studio.check_in_member(&booking.id).await.unwrap();
    assert!(retried.success);
    assert_eq!(studio.state().pack_client("pack-1").unwrap().remaining_classes, 1);
}

#[tokio::test]
async fn test_unsupported_snapshot_version_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studio.json");
    std::fs::write(
        &path,
        r#"{"version": 99, "saved_at": "2026-10-19T07:00:00Z", "state": {}}"#,
    )
    .unwrap();

    let clock = Arc::new(FixedClock::new(common::monday_morning()));
    let result = Studio::open(
        Arc::new(JsonFileStore::new(path)),
        clock,
        CommissionRates::default(),
    )
    .await;
    assert!(matches!(
        result,
        Err(StorageError::UnsupportedVersion { found: 99, .. })
    ));
}
