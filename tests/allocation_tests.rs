//! 并发分配测试
//!
//! 多线程运行时下同时发起请求，验证短码唯一性和配额上限。

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use urlvault::config::LinksConfig;
use urlvault::errors::ErrorKind;
use urlvault::services::{Allocator, CodeLength};
use urlvault::storage::{AccountStore, LinkStore, MemoryStorage, UserAccount};

async fn setup(limit: i64) -> (Allocator, Arc<MemoryStorage>) {
    let store = Arc::new(MemoryStorage::new());
    store
        .insert_account_if_absent(&UserAccount::new("alice123", "hash", limit))
        .await
        .unwrap();
    store
        .insert_account_if_absent(&UserAccount::new("bobby123", "hash", limit))
        .await
        .unwrap();
    let allocator = Allocator::new(store.clone(), store.clone(), &LinksConfig::default()).unwrap();
    (allocator, store)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_custom_code_has_single_winner() {
    let (allocator, store) = setup(20).await;

    let mut handles = Vec::new();
    for i in 0..16 {
        let allocator = allocator.clone();
        let owner = if i % 2 == 0 { "alice123" } else { "bobby123" };
        handles.push(tokio::spawn(async move {
            allocator
                .allocate(
                    &format!("https://example.com/{}", i),
                    owner,
                    Some("contested01"),
                    None,
                )
                .await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(link) => {
                assert_eq!(link.code, "contested01");
                winners += 1;
            }
            Err(e) => assert_eq!(e.kind(), ErrorKind::CustomCodeTaken),
        }
    }
    assert_eq!(winners, 1);

    let alice = store.get_account("alice123").await.unwrap().unwrap();
    let bob = store.get_account("bobby123").await.unwrap().unwrap();
    assert_eq!(alice.url_count + bob.url_count, 1);
    assert_eq!(store.list_links().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_never_exceed_quota() {
    let (allocator, store) = setup(3).await;

    let mut handles = Vec::new();
    for i in 0..12 {
        let allocator = allocator.clone();
        handles.push(tokio::spawn(async move {
            allocator
                .allocate(&format!("https://example.com/{}", i), "alice123", None, None)
                .await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) => assert_eq!(e.kind(), ErrorKind::QuotaExceeded),
        }
    }
    assert_eq!(created, 3);

    let account = store.get_account("alice123").await.unwrap().unwrap();
    assert_eq!(account.url_count, 3);
    // 落败请求占用的短码已被释放
    assert_eq!(store.list_links_by_owner("alice123").await.unwrap().len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_generated_codes_are_distinct() {
    let (allocator, store) = setup(100).await;

    let mut handles = Vec::new();
    for i in 0..50 {
        let allocator = allocator.clone();
        handles.push(tokio::spawn(async move {
            allocator
                .allocate(&format!("https://example.com/{}", i), "alice123", None, None)
                .await
                .unwrap()
        }));
    }

    let mut codes = HashSet::new();
    for handle in handles {
        codes.insert(handle.await.unwrap().code);
    }
    assert_eq!(codes.len(), 50);
    assert_eq!(
        store.get_account("alice123").await.unwrap().unwrap().url_count,
        50
    );
}

#[tokio::test]
async fn test_collisions_escalate_length() {
    let (allocator, store) = setup(20).await;

    // 预先占满所有长度为 10 的候选
    let occupied = "a".repeat(10);
    store
        .insert_link_if_absent(&urlvault::storage::ShortLink::new(
            occupied.clone(),
            "https://taken.example/",
            "bobby123",
        ))
        .await
        .unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let allocator = allocator.with_generator(Arc::new(move |length: CodeLength| {
        counter.fetch_add(1, Ordering::SeqCst);
        "a".repeat(length.get())
    }));

    let link = allocator
        .allocate("https://example.com", "alice123", None, None)
        .await
        .unwrap();
    assert_eq!(link.code.len(), 11);
    assert_eq!(
        calls.load(Ordering::SeqCst),
        LinksConfig::default().max_collision_attempts as usize + 1
    );
}
