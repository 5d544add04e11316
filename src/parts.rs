/// Part model and the platform's pagelist wire format
use serde::{Deserialize, Serialize};

/// One segment ("page") of a multi-part video
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Part {
    /// Opaque platform identifier (`cid`)
    #[serde(rename = "cid")]
    pub id: u64,
    /// 1-based page number
    pub page: u32,
    pub title: String,
    /// Duration in seconds
    pub duration: u64,
}

impl Part {
    pub fn new(id: u64, page: u32, title: impl Into<String>, duration: u64) -> Self {
        Self {
            id,
            page,
            title: title.into(),
            duration,
        }
    }
}

/// Response of `x/player/pagelist`
#[derive(Debug, Deserialize)]
pub struct PageListResponse {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub ttl: i64,
    #[serde(default)]
    pub data: Option<Vec<PageListItem>>,
}

#[derive(Debug, Deserialize)]
pub struct PageListItem {
    pub cid: u64,
    pub page: u32,
    /// Part title
    pub part: String,
    pub duration: u64,
}

impl From<PageListItem> for Part {
    fn from(item: PageListItem) -> Self {
        Part {
            id: item.cid,
            page: item.page,
            title: item.part,
            duration: item.duration,
        }
    }
}

/// Body of a successful `/bilibili-parts` reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartsEnvelope {
    pub parts: Vec<Part>,
}
