use std::sync::Arc;
use std::time::Duration;

use affilizap_common::{classify, Category, GeneratedCopy, Platform};
use affilizap_store::testing::{FullDiskStore, MockRemote};
use affilizap_store::{
    HistoryQuery, HistoryStore, JsonFileStore, KeyValueStore, MemoryStore, HISTORY_KEY,
};

fn copy(id: &str, link: &str, timestamp: i64) -> GeneratedCopy {
    GeneratedCopy {
        id: id.into(),
        original_link: link.into(),
        text: format!("🔥 Oferta {id}"),
        category: Category::Tech,
        platform: classify(link),
        image_url: Some(format!("data:image/png;base64,{}", "A".repeat(4096))),
        product_image_url: None,
        timestamp,
        is_error: false,
    }
}

fn failed(id: &str) -> GeneratedCopy {
    GeneratedCopy {
        is_error: true,
        ..copy(id, "https://amzn.to/err", 1)
    }
}

async fn stored_payload(local: &dyn KeyValueStore) -> serde_json::Value {
    let raw = local.get(HISTORY_KEY).await.unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn append_then_list_contains_everything() {
    let local = Arc::new(MemoryStore::new());
    let store = HistoryStore::new(local.clone());

    store.append(&[copy("a", "https://amzn.to/1", 10)]).await.unwrap();
    store
        .append(&[copy("b", "https://shopee.com.br/2", 30), copy("c", "https://meli.la/3", 20)])
        .await
        .unwrap();

    let ids: Vec<String> = store.list().await.into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
}

#[tokio::test]
async fn duplicates_are_kept() {
    let store = HistoryStore::new(Arc::new(MemoryStore::new()));
    let entry = copy("a", "https://amzn.to/1", 10);

    store.append(&[entry.clone()]).await.unwrap();
    store.append(&[entry]).await.unwrap();

    assert_eq!(store.list().await.len(), 2);
}

#[tokio::test]
async fn degraded_entries_are_not_stored() {
    let remote = Arc::new(MockRemote::new());
    let store = HistoryStore::new(Arc::new(MemoryStore::new())).with_remote(remote.clone());

    let sync = store
        .append(&[failed("e1"), copy("ok", "https://amzn.to/1", 5), failed("e2")])
        .await
        .unwrap();
    assert_eq!(sync.len(), 1);
    sync.settled().await;

    let listed = store.list().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "ok");
    assert_eq!(remote.recorded().len(), 1);
}

#[tokio::test]
async fn local_payload_never_holds_images() {
    let local = Arc::new(MemoryStore::new());
    let store = HistoryStore::new(local.clone());

    store.append(&[copy("a", "https://amzn.to/1", 10)]).await.unwrap();
    store.update_text("a", "editado").await.unwrap();

    let payload = stored_payload(local.as_ref()).await;
    for entry in payload.as_array().unwrap() {
        assert!(entry.get("imageUrl").is_none());
    }
    // The in-memory view keeps the screenshot for the current session.
    assert!(store.list().await[0].image_url.is_some());
}

#[tokio::test]
async fn remove_excludes_id() {
    let local = Arc::new(MemoryStore::new());
    let store = HistoryStore::new(local.clone());
    store
        .append(&[copy("a", "https://amzn.to/1", 10), copy("b", "https://amzn.to/2", 20)])
        .await
        .unwrap();

    assert!(store.remove("a").await.unwrap());
    assert!(!store.remove("a").await.unwrap());

    assert!(store.list().await.iter().all(|c| c.id != "a"));
    assert_eq!(stored_payload(local.as_ref()).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn clear_empties_both_views() {
    let local = Arc::new(MemoryStore::new());
    let store = HistoryStore::new(local.clone());
    store.append(&[copy("a", "https://amzn.to/1", 10)]).await.unwrap();

    store.clear().await.unwrap();

    assert!(store.list().await.is_empty());
    assert_eq!(local.get(HISTORY_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn update_text_writes_through() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::new(Arc::new(JsonFileStore::in_dir(dir.path())));
    store.append(&[copy("a", "https://amzn.to/1", 10)]).await.unwrap();

    assert!(store.update_text("a", "Texto revisado").await.unwrap());
    assert!(!store.update_text("missing", "x").await.unwrap());

    let reopened = HistoryStore::new(Arc::new(JsonFileStore::in_dir(dir.path())));
    reopened.load().await.unwrap();
    let entry = reopened.get("a").await.unwrap();
    assert_eq!(entry.text, "Texto revisado");
    assert_eq!(entry.image_url, None);
}

#[tokio::test]
async fn load_prefers_remote_when_it_has_rows() {
    let local = Arc::new(MemoryStore::new());
    HistoryStore::new(local.clone())
        .append(&[copy("local", "https://amzn.to/1", 10)])
        .await
        .unwrap();

    let remote = Arc::new(MockRemote::new().with_recent(vec![
        copy("r2", "https://shopee.com.br/2", 20),
        copy("r1", "https://meli.la/1", 15),
    ]));
    let store = HistoryStore::new(local.clone()).with_remote(remote);

    assert_eq!(store.load().await.unwrap(), 2);
    let ids: Vec<String> = store.list().await.into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["r2", "r1"]);
    assert_eq!(stored_payload(local.as_ref()).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn load_keeps_local_when_remote_is_empty_or_down() {
    let local = Arc::new(MemoryStore::new());
    HistoryStore::new(local.clone())
        .append(&[copy("local", "https://amzn.to/1", 10)])
        .await
        .unwrap();

    for remote in [MockRemote::new(), MockRemote::new().failing_reads()] {
        let store = HistoryStore::new(local.clone()).with_remote(Arc::new(remote));
        assert_eq!(store.load().await.unwrap(), 1);
        assert_eq!(store.list().await[0].id, "local");
    }
}

#[tokio::test]
async fn corrupt_local_history_starts_empty() {
    let local = Arc::new(MemoryStore::new());
    local.set(HISTORY_KEY, "{not json").await.unwrap();
    let store = HistoryStore::new(local);

    assert_eq!(store.load().await.unwrap(), 0);
}

#[tokio::test]
async fn remote_write_failures_do_not_fail_append() {
    let remote = Arc::new(MockRemote::new().failing_writes());
    let store = HistoryStore::new(Arc::new(MemoryStore::new())).with_remote(remote.clone());

    let sync = store
        .append(&[copy("a", "https://amzn.to/1", 10), copy("b", "https://amzn.to/2", 11)])
        .await
        .unwrap();
    sync.settled().await;

    assert_eq!(store.list().await.len(), 2);
    assert!(remote.recorded().is_empty());
}

#[tokio::test]
async fn query_filters_stored_entries() {
    let store = HistoryStore::new(Arc::new(MemoryStore::new()));
    store
        .append(&[
            copy("a", "https://amzn.to/1", 10),
            copy("b", "https://shopee.com.br/2", 30),
            copy("c", "https://amzn.to/3", 20),
        ])
        .await
        .unwrap();

    let amazon = store.query(&HistoryQuery::new().platform(Platform::Amazon)).await;
    assert_eq!(amazon.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["c", "a"]);

    let searched = store.query(&HistoryQuery::new().search("OFERTA B")).await;
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].id, "b");
}

#[tokio::test(start_paused = true)]
async fn slow_remote_does_not_block_readers() {
    let local = Arc::new(MemoryStore::new());
    HistoryStore::new(local.clone())
        .append(&[copy("local", "https://amzn.to/1", 10)])
        .await
        .unwrap();

    let remote = MockRemote::new()
        .with_recent(vec![copy("r1", "https://meli.la/1", 20)])
        .with_read_delay(Duration::from_secs(60));
    let store = Arc::new(HistoryStore::new(local).with_remote(Arc::new(remote)));

    let loading = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.load().await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;

    let listed = tokio::time::timeout(Duration::from_secs(1), store.list())
        .await
        .expect("list waited on the remote read");
    assert_eq!(listed[0].id, "local");

    assert_eq!(loading.await.unwrap().unwrap(), 1);
    assert_eq!(store.list().await[0].id, "r1");
}

#[tokio::test]
async fn local_write_failure_still_syncs_remote() {
    let remote = Arc::new(MockRemote::new());
    let store = HistoryStore::new(Arc::new(FullDiskStore)).with_remote(remote.clone());

    let sync = store
        .append(&[copy("a", "https://amzn.to/1", 10)])
        .await
        .unwrap();
    assert_eq!(sync.len(), 1);
    sync.settled().await;

    assert_eq!(store.list().await.len(), 1);
    assert_eq!(remote.recorded().len(), 1);
}

#[tokio::test]
async fn local_load_keeps_removals_over_remote_rows() {
    let local = Arc::new(MemoryStore::new());
    let remote = Arc::new(MockRemote::new().with_recent(vec![
        copy("b", "https://shopee.com.br/2", 20),
        copy("a", "https://amzn.to/1", 10),
    ]));

    let store = HistoryStore::new(local.clone()).with_remote(remote.clone());
    assert_eq!(store.load().await.unwrap(), 2);
    assert!(store.remove("a").await.unwrap());

    let reopened = HistoryStore::new(local).with_remote(remote);
    assert_eq!(reopened.load_local().await.unwrap(), 1);
    let ids: Vec<String> = reopened.list().await.into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["b"]);
}
