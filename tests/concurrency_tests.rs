//! 동시성 통합 테스트
//!
//! 공유 스튜디오에 동시에 예약을 넣어도 정원을 넘지 않는지 확인합니다.

mod common;

use futures::future::join_all;

use xstudio::ErrorCode;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_concurrent_bookings_for_last_spot() {
    let (studio, _, _) = common::studio();
    let studio = studio.into_shared();

    let handles = ["mem-1", "mem-2"].into_iter().map(|person_id| {
        let studio = studio.clone();
        tokio::spawn(async move {
            let mut studio = studio.lock().await;
            studio.book_class("reformer", person_id, person_id).await
        })
    });

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let succeeded = results.iter().filter(|r| r.success).count();
    let full = results.iter().filter(|r| r.is_code(ErrorCode::ClassFull)).count();
    assert_eq!(succeeded, 1);
    assert_eq!(full, 1);

    let studio = studio.lock().await;
    assert_eq!(studio.class_view("reformer").unwrap().class.booked_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_many_concurrent_bookings_never_exceed_capacity() {
    let (studio, store, _) = common::studio();
    let studio = studio.into_shared();

    let handles = (0..32).map(|i| {
        let studio = studio.clone();
        tokio::spawn(async move {
            let person_id = format!("guest-{}", i);
            let mut studio = studio.lock().await;
            studio.book_class("spin", &person_id, &person_id).await
        })
    });

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.success).count(), 2);
    assert_eq!(store.save_count(), 2);

    let studio = studio.lock().await;
    assert_eq!(studio.state().active_booking_count("spin"), 2);
    assert!(studio.state().capacity_violations().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_cancels_promote_each_waitlisted_once() {
    let (mut studio, _, _) = common::studio();

    let a = studio.book_class("spin", "mem-1", "Kim Minji").await.unwrap().data.unwrap();
    let b = studio.book_class("spin", "mem-2", "Lee Junho").await.unwrap().data.unwrap();
    studio.add_to_waitlist("spin", "pack-1", "Choi Yuna").await.unwrap();
    studio.add_to_waitlist("spin", "drop-1", "Alex Morgan").await.unwrap();
    let studio = studio.into_shared();

    // 같은 예약을 두 번씩 취소해도 정원은 한 번만 반환됨
    let ids = vec![a.id.clone(), b.id.clone(), a.id, b.id];
    let handles = ids.into_iter().map(|booking_id| {
        let studio = studio.clone();
        tokio::spawn(async move {
            let mut studio = studio.lock().await;
            studio.cancel_booking(&booking_id).await
        })
    });
    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.success).count(), 2);
    assert_eq!(
        results
            .iter()
            .filter(|r| r.is_code(ErrorCode::AlreadyCancelled))
            .count(),
        2
    );

    let studio = studio.lock().await;
    let view = studio.class_view("spin").unwrap();
    assert_eq!(view.class.booked_count, 2);
    assert!(view.waitlist.is_empty());
    assert!(studio.state().capacity_violations().is_empty());
}
