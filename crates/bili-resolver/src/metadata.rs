//! Per-item metadata retrieval, single and keyed-batch.

use std::collections::HashMap;

use futures::future::join_all;
use serde::Deserialize;
use tracing::debug;

use bili_models::{BvId, ItemMetadata, ItemStats};

use crate::client::BiliClient;
use crate::error::ResolveResult;

#[derive(Debug, Deserialize)]
struct RawView {
    title: String,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    pic: String,
    cid: u64,
    #[serde(default)]
    duration: u64,
    owner: RawOwner,
    stat: RawStat,
}

#[derive(Debug, Deserialize)]
struct RawOwner {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawStat {
    #[serde(default)]
    view: u64,
    #[serde(default)]
    danmaku: u64,
    #[serde(default)]
    like: u64,
}

/// Fetch metadata for a single item.
pub async fn fetch_one(client: &BiliClient, bvid: &BvId) -> ResolveResult<ItemMetadata> {
    debug!(bvid = %bvid, "fetching video metadata");
    let raw: RawView = client
        .get_data(&format!("/x/web-interface/view?bvid={bvid}"))
        .await?;

    Ok(ItemMetadata {
        bvid: bvid.clone(),
        title: raw.title,
        desc: raw.desc,
        pic: raw.pic,
        cid: raw.cid,
        duration: raw.duration,
        owner: raw.owner.name,
        stats: ItemStats {
            view: raw.stat.view,
            danmaku: raw.stat.danmaku,
            like: raw.stat.like,
        },
    })
}

/// Fetch metadata for every id concurrently.
///
/// One request per key, joined at a barrier; a failing key carries its own
/// error and never cancels its siblings. The output key set equals the
/// input key set.
pub async fn fetch_batch(
    client: &BiliClient,
    ids: &HashMap<String, BvId>,
) -> HashMap<String, ResolveResult<ItemMetadata>> {
    let futures: Vec<_> = ids
        .iter()
        .map(|(key, bvid)| async move { (key.clone(), fetch_one(client, bvid).await) })
        .collect();

    join_all(futures).await.into_iter().collect()
}
