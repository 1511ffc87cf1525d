use serde::{Deserialize, Serialize};
use std::fmt;

/// Owner of a video record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Local primary key of a video record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VideoId(pub i64);

/// Local primary key of a thumbnail record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThumbnailId(pub i64);

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata the remote video host reports for one of its videos
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteVideoEntry {
    pub video_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Comma separated
    pub keywords: Option<String>,
    pub is_private: bool,
    /// Playback page URL
    pub youtube_url: Option<String>,
    /// Embeddable player asset URL
    pub swf_url: Option<String>,
    /// One URL per thumbnail variant, in the order the host lists them
    #[serde(default)]
    pub thumbnails: Vec<String>,
}

/// A video that has not been saved yet.
///
/// Only `video_id` and `user_id` survive the first save: every descriptive
/// field is replaced by what the remote host reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideo {
    pub video_id: String,
    pub user_id: UserId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
}

impl NewVideo {
    pub fn new(video_id: impl Into<String>, user_id: UserId) -> Self {
        Self {
            video_id: video_id.into(),
            user_id,
            title: None,
            description: None,
            keywords: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    /// True if any descriptive field was set locally (and will be discarded)
    pub fn has_local_edits(&self) -> bool {
        self.title.is_some() || self.description.is_some() || self.keywords.is_some()
    }

    /// Fill the shell from the remote entry, discarding local descriptive fields
    pub fn populate(self, entry: &RemoteVideoEntry) -> VideoDraft {
        VideoDraft {
            user_id: self.user_id,
            video_id: self.video_id,
            title: entry.title.clone(),
            description: entry.description.clone(),
            keywords: entry.keywords.clone(),
            is_private: entry.is_private,
            youtube_url: entry.youtube_url.clone(),
            swf_url: entry.swf_url.clone(),
        }
    }
}

/// A fully populated video that has no local id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDraft {
    pub user_id: UserId,
    pub video_id: String,
    pub title: String,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub is_private: bool,
    pub youtube_url: Option<String>,
    pub swf_url: Option<String>,
}

impl VideoDraft {
    /// Attach the id assigned by the store
    pub fn with_id(self, id: VideoId) -> Video {
        Video {
            id,
            user_id: self.user_id,
            video_id: self.video_id,
            title: self.title,
            description: self.description,
            keywords: self.keywords,
            is_private: self.is_private,
            youtube_url: self.youtube_url,
            swf_url: self.swf_url,
        }
    }
}

/// A persisted video mirrored from the remote host.
///
/// Identity, privacy and the derived URLs are fixed at creation; only the
/// descriptive fields are editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    id: VideoId,
    user_id: UserId,
    video_id: String,
    pub title: String,
    pub description: Option<String>,
    pub keywords: Option<String>,
    is_private: bool,
    youtube_url: Option<String>,
    swf_url: Option<String>,
}

impl Video {
    pub fn id(&self) -> VideoId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// The remote host's identifier
    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn is_private(&self) -> bool {
        self.is_private
    }

    pub fn youtube_url(&self) -> Option<&str> {
        self.youtube_url.as_deref()
    }

    pub fn swf_url(&self) -> Option<&str> {
        self.swf_url.as_deref()
    }

    /// Where the video can be embedded from
    pub fn absolute_url(&self) -> Option<&str> {
        self.swf_url()
    }

    /// Keywords split on commas, trimmed, empties dropped
    pub fn keyword_list(&self) -> Vec<&str> {
        self.keywords
            .as_deref()
            .map(|k| {
                k.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for Video {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A thumbnail row, created alongside a video's first save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub id: ThumbnailId,
    pub video: Option<VideoId>,
    pub url: String,
}

impl Thumbnail {
    pub fn absolute_url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewThumbnail {
    pub video: Option<VideoId>,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncEventKind {
    /// First save finished ("video_created")
    Created,
    /// A later save finished
    Updated,
}

/// Notification emitted after a lifecycle transition completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEvent {
    pub kind: SyncEventKind,
    pub video: Video,
}

impl SyncEvent {
    pub fn created(video: Video) -> Self {
        Self {
            kind: SyncEventKind::Created,
            video,
        }
    }

    pub fn updated(video: Video) -> Self {
        Self {
            kind: SyncEventKind::Updated,
            video,
        }
    }
}
