use domain::RemoteVideoEntry;
use std::collections::BTreeMap;
use std::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("video not found: {0}")]
    NotFound(String),
    #[error("video cannot be deleted: {0}")]
    Refused(String),
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    entry: RemoteVideoEntry,
    deletable: bool,
}

/// Videos known to the mock host
#[derive(Debug, Default)]
pub struct RemoteCatalog {
    videos: RwLock<BTreeMap<String, CatalogEntry>>,
}

impl RemoteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding a couple of fixed videos
    pub fn with_dummy_data() -> Self {
        let catalog = Self::new();

        catalog.insert(
            RemoteVideoEntry {
                video_id: "test-video-1".to_string(),
                title: "Mock Video".to_string(),
                description: Some("This is a mock video for testing the sync layer".to_string()),
                keywords: Some("mock, testing".to_string()),
                is_private: false,
                youtube_url: Some("https://www.youtube.com/watch?v=test-video-1".to_string()),
                swf_url: Some("https://www.youtube.com/v/test-video-1".to_string()),
                thumbnails: (0..3)
                    .map(|i| format!("https://i.ytimg.com/vi/test-video-1/{i}.jpg"))
                    .collect(),
            },
            true,
        );

        catalog.insert(
            RemoteVideoEntry {
                video_id: "locked-video-1".to_string(),
                title: "Locked Mock Video".to_string(),
                description: None,
                keywords: None,
                is_private: true,
                youtube_url: Some("https://www.youtube.com/watch?v=locked-video-1".to_string()),
                swf_url: Some("https://www.youtube.com/v/locked-video-1".to_string()),
                thumbnails: vec!["https://i.ytimg.com/vi/locked-video-1/default.jpg".to_string()],
            },
            false,
        );

        catalog
    }

    /// Add or replace a video
    pub fn insert(&self, entry: RemoteVideoEntry, deletable: bool) {
        self.videos
            .write()
            .expect("Failed to acquire write lock on videos")
            .insert(entry.video_id.clone(), CatalogEntry { entry, deletable });
    }

    pub fn get(&self, video_id: &str) -> Option<RemoteVideoEntry> {
        self.videos
            .read()
            .expect("Failed to acquire read lock on videos")
            .get(video_id)
            .map(|e| e.entry.clone())
    }

    /// Replace the descriptive fields of a video
    pub fn update_snippet(
        &self,
        video_id: &str,
        title: String,
        description: Option<String>,
        keywords: Option<String>,
    ) -> Result<RemoteVideoEntry, CatalogError> {
        let mut videos = self
            .videos
            .write()
            .expect("Failed to acquire write lock on videos");
        let stored = videos
            .get_mut(video_id)
            .ok_or_else(|| CatalogError::NotFound(video_id.to_string()))?;
        stored.entry.title = title;
        stored.entry.description = description;
        stored.entry.keywords = keywords;
        Ok(stored.entry.clone())
    }

    pub fn remove(&self, video_id: &str) -> Result<(), CatalogError> {
        let mut videos = self
            .videos
            .write()
            .expect("Failed to acquire write lock on videos");
        let deletable = videos
            .get(video_id)
            .map(|e| e.deletable)
            .ok_or_else(|| CatalogError::NotFound(video_id.to_string()))?;
        if !deletable {
            return Err(CatalogError::Refused(video_id.to_string()));
        }
        videos.remove(video_id);
        Ok(())
    }
}
