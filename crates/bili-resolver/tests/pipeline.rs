//! End-to-end pipeline tests against a mock upstream.

use std::collections::HashMap;

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bili_resolver::{ClientConfig, ResolveError, Resolver, ResolverConfig};

const BVID: &str = "BV1xx411c7mD";
const OTHER_BVID: &str = "BV17x411w7KC";

fn resolver_for(server: &MockServer) -> Resolver {
    Resolver::new(ResolverConfig {
        client: ClientConfig {
            api_base: server.uri(),
            short_link_base: server.uri(),
            ..ClientConfig::default()
        },
        ..ResolverConfig::default()
    })
    .expect("resolver construction")
}

fn view_body(cid: u64) -> Value {
    json!({
        "code": 0,
        "message": "0",
        "data": {
            "title": "test video",
            "desc": "a description",
            "pic": "https://cdn/pic.jpg",
            "cid": cid,
            "duration": 120,
            "owner": {"name": "uploader"},
            "stat": {"view": 1000, "danmaku": 50, "like": 80}
        }
    })
}

fn dash_playurl_body(video_ids: &[u32]) -> Value {
    let videos: Vec<Value> = video_ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "baseUrl": format!("https://cdn/v{id}"),
                "backupUrl": [format!("https://backup/v{id}")],
                "bandwidth": 800_000,
                "codecs": "avc1.640028",
                "width": 1920,
                "height": 1080,
                "frameRate": "30"
            })
        })
        .collect();
    json!({
        "code": 0,
        "message": "0",
        "data": {
            "quality": 80,
            "timelength": 120_000,
            "accept_quality": video_ids,
            "support_formats": [],
            "dash": {
                "video": videos,
                "audio": [{
                    "id": 30280,
                    "baseUrl": "https://cdn/audio",
                    "backupUrl": [],
                    "bandwidth": 192_000,
                    "codecs": "mp4a.40.2"
                }]
            }
        }
    })
}

async fn mount_view(server: &MockServer, bvid: &str, cid: u64) {
    Mock::given(method("GET"))
        .and(path("/x/web-interface/view"))
        .and(query_param("bvid", bvid))
        .respond_with(ResponseTemplate::new(200).set_body_json(view_body(cid)))
        .mount(server)
        .await;
}

async fn mount_playurl(server: &MockServer, bvid: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/x/player/playurl"))
        .and(query_param("bvid", bvid))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ============================================================================
// Single item
// ============================================================================

#[tokio::test]
async fn resolve_one_exact_match() {
    let server = MockServer::start().await;
    mount_view(&server, BVID, 111).await;
    mount_playurl(&server, BVID, dash_playurl_body(&[80, 64])).await;

    let resolver = resolver_for(&server);
    let item = resolver
        .resolve_one(BVID, Some("1080P"))
        .await
        .expect("resolution succeeds");

    assert_eq!(item.bvid.as_str(), BVID);
    assert_eq!(item.title, "test video");
    assert_eq!(item.tips, "obtained 1080P");
    assert_eq!(item.download.video.as_ref().unwrap().quality_id, 80);
    assert_eq!(item.download.audio.as_ref().unwrap().bandwidth, 192_000);
    assert_eq!(item.download.available_quality.len(), 2);
}

#[tokio::test]
async fn resolve_one_falls_back_to_highest_available() {
    // Upstream only offers 720P and below; 1080P was requested.
    let server = MockServer::start().await;
    mount_view(&server, BVID, 111).await;
    mount_playurl(&server, BVID, dash_playurl_body(&[64, 32, 16])).await;

    let resolver = resolver_for(&server);
    let item = resolver
        .resolve_one(
            &format!("https://www.bilibili.com/video/{BVID}"),
            Some("1080P"),
        )
        .await
        .expect("resolution succeeds");

    let video = item.download.video.as_ref().unwrap();
    assert_eq!(video.quality_id, 64);
    assert_eq!(video.quality, "720P");
    assert_eq!(
        item.tips,
        "target tier unavailable, obtained highest available: 720P"
    );
}

#[tokio::test]
async fn resolve_one_unrecognized_quality_hint_defaults_to_1080p() {
    let server = MockServer::start().await;
    mount_view(&server, BVID, 111).await;
    mount_playurl(&server, BVID, dash_playurl_body(&[80, 64])).await;

    let resolver = resolver_for(&server);
    let item = resolver.resolve_one(BVID, Some("ultra")).await.unwrap();
    assert_eq!(item.download.video.as_ref().unwrap().quality_id, 80);
    assert_eq!(item.tips, "obtained 1080P");
}

#[tokio::test]
async fn resolve_one_invalid_input_is_identifier_error() {
    let server = MockServer::start().await;
    let resolver = resolver_for(&server);

    let outcome = resolver.resolve_one("not a video", None).await;
    assert!(matches!(outcome, Err(ResolveError::Identifier(_))));
}

#[tokio::test]
async fn resolve_one_upstream_error_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/x/web-interface/view"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": -404, "message": "video not found", "data": null
        })))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    let outcome = resolver.resolve_one(BVID, None).await;
    match outcome {
        Err(ResolveError::Fetch(reason)) => assert!(reason.contains("video not found")),
        other => panic!("expected fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn resolve_one_legacy_avid_input() {
    // av170001 converts to BV17x411w7KC before any request is issued.
    let server = MockServer::start().await;
    mount_view(&server, OTHER_BVID, 222).await;
    mount_playurl(&server, OTHER_BVID, dash_playurl_body(&[80])).await;

    let resolver = resolver_for(&server);
    let item = resolver.resolve_one("av170001", None).await.unwrap();
    assert_eq!(item.bvid.as_str(), OTHER_BVID);
}

#[tokio::test]
async fn resolve_one_follows_short_link_one_hop() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/abc123"))
        .respond_with(
            ResponseTemplate::new(302).insert_header(
                "Location",
                format!("https://www.bilibili.com/video/{BVID}").as_str(),
            ),
        )
        .mount(&server)
        .await;
    mount_view(&server, BVID, 111).await;
    mount_playurl(&server, BVID, dash_playurl_body(&[80])).await;

    let resolver = resolver_for(&server);
    let item = resolver
        .resolve_one("https://b23.tv/abc123", None)
        .await
        .unwrap();
    assert_eq!(item.bvid.as_str(), BVID);
}

// ============================================================================
// Batch
// ============================================================================

fn batch(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn resolve_batch_empty_input() {
    let server = MockServer::start().await;
    let resolver = resolver_for(&server);

    let results = resolver.resolve_batch(&HashMap::new()).await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn resolve_batch_preserves_key_set() {
    let server = MockServer::start().await;
    mount_view(&server, BVID, 111).await;
    mount_view(&server, OTHER_BVID, 222).await;
    mount_playurl(&server, BVID, dash_playurl_body(&[80, 64])).await;
    mount_playurl(&server, OTHER_BVID, dash_playurl_body(&[64])).await;

    let resolver = resolver_for(&server);
    let inputs = batch(&[
        ("first", BVID),
        ("second", "av170001"),
        ("third", "garbage input"),
    ]);
    let results = resolver.resolve_batch(&inputs).await;

    let mut input_keys: Vec<&String> = inputs.keys().collect();
    let mut output_keys: Vec<&String> = results.keys().collect();
    input_keys.sort();
    output_keys.sort();
    assert_eq!(input_keys, output_keys);
}

#[tokio::test]
async fn resolve_batch_isolates_failures() {
    // One malformed input and one upstream failure must not affect the
    // remaining item.
    let server = MockServer::start().await;
    mount_view(&server, BVID, 111).await;
    mount_playurl(&server, BVID, dash_playurl_body(&[80])).await;
    Mock::given(method("GET"))
        .and(path("/x/web-interface/view"))
        .and(query_param("bvid", OTHER_BVID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": -403, "message": "access denied", "data": null
        })))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    let inputs = batch(&[
        ("good", BVID),
        ("denied", OTHER_BVID),
        ("bad", "garbage input"),
    ]);
    let results = resolver.resolve_batch(&inputs).await;

    assert_eq!(results.len(), 3);
    assert!(results["good"].is_ok());
    assert!(matches!(results["denied"], Err(ResolveError::Fetch(_))));
    assert!(matches!(results["bad"], Err(ResolveError::Identifier(_))));

    let item = results["good"].as_ref().unwrap();
    assert_eq!(item.tips, "obtained 1080P");
}

#[tokio::test]
async fn resolve_batch_single_item() {
    let server = MockServer::start().await;
    mount_view(&server, BVID, 111).await;
    mount_playurl(&server, BVID, dash_playurl_body(&[80])).await;

    let resolver = resolver_for(&server);
    let results = resolver.resolve_batch(&batch(&[("only", BVID)])).await;

    assert_eq!(results.len(), 1);
    assert!(results["only"].is_ok());
}

#[tokio::test]
async fn resolve_batch_stream_stage_failure_is_item_scoped() {
    let server = MockServer::start().await;
    mount_view(&server, BVID, 111).await;
    mount_view(&server, OTHER_BVID, 222).await;
    mount_playurl(&server, BVID, dash_playurl_body(&[80])).await;
    Mock::given(method("GET"))
        .and(path("/x/player/playurl"))
        .and(query_param("bvid", OTHER_BVID))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    let inputs = batch(&[("ok", BVID), ("broken", OTHER_BVID)]);
    let results = resolver.resolve_batch(&inputs).await;

    assert!(results["ok"].is_ok());
    assert!(matches!(results["broken"], Err(ResolveError::Fetch(_))));
}

// ============================================================================
// Combined (progressive) format
// ============================================================================

#[tokio::test]
async fn resolve_one_combined_format() {
    let server = MockServer::start().await;
    mount_view(&server, BVID, 111).await;
    mount_playurl(
        &server,
        BVID,
        json!({
            "code": 0,
            "message": "0",
            "data": {
                "quality": 32,
                "timelength": 300_000,
                "accept_quality": [32, 16],
                "support_formats": [],
                "durl": [
                    {"url": "https://cdn/part1.flv", "size": 12_345_678, "length": 300_000}
                ]
            }
        }),
    )
    .await;

    let resolver = resolver_for(&server);
    let item = resolver.resolve_one(BVID, Some("480P")).await.unwrap();

    assert_eq!(item.tips, "obtained 480P");
    let video = item.download.video.as_ref().unwrap();
    assert_eq!(video.size_bytes, Some(12_345_678));
    assert!(item.download.audio.is_none());
    assert!(item.download.merge_command.is_none());
}
