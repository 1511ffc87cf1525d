use domain::{NewThumbnail, Thumbnail, ThumbnailId, UserId, Video, VideoDraft, VideoId};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

/// Record store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepoError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Uniqueness constraint on the remote video id
    #[error("video_id already stored: {0}")]
    Duplicate(String),
}

impl RepoError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Repository trait for data access abstraction
/// This allows switching between different storage backends (in-memory, filesystem, database)
///
/// Every call is its own unit of work. Nothing spans more than one call.
pub trait Repository: Send + Sync {
    /// Store a new video and assign its id. Fails if `video_id` is taken.
    fn insert_video(&self, draft: VideoDraft) -> Result<Video, RepoError>;

    /// Get a video by local id
    fn get_video(&self, id: VideoId) -> Option<Video>;

    /// Get a video by the remote host's id
    fn find_by_video_id(&self, video_id: &str) -> Option<Video>;

    /// Get all videos, ordered by id
    fn get_videos(&self) -> Vec<Video>;

    /// Get all videos owned by a user, ordered by id
    fn videos_for_user(&self, user_id: UserId) -> Vec<Video>;

    /// Write the descriptive fields (title, description, keywords) of `video`
    /// onto the stored row and return it. Identity, privacy and URLs keep
    /// their stored values.
    fn update_video(&self, video: &Video) -> Result<Video, RepoError>;

    /// Remove a video together with its thumbnails
    fn delete_video(&self, id: VideoId) -> Result<(), RepoError>;

    /// Add a thumbnail. A set `video` must reference a stored video.
    fn insert_thumbnail(&self, thumbnail: NewThumbnail) -> Result<Thumbnail, RepoError>;

    /// Thumbnails of a video in insertion order
    fn thumbnails_for(&self, id: VideoId) -> Vec<Thumbnail>;
}

#[derive(Default)]
struct Tables {
    videos: BTreeMap<VideoId, Video>,
    by_video_id: HashMap<String, VideoId>,
    thumbnails: BTreeMap<ThumbnailId, Thumbnail>,
    next_video: i64,
    next_thumbnail: i64,
}

/// In-memory implementation of the Repository trait
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for InMemoryRepository {
    fn insert_video(&self, draft: VideoDraft) -> Result<Video, RepoError> {
        let mut tables = self
            .tables
            .write()
            .expect("Failed to acquire write lock on tables");

        if tables.by_video_id.contains_key(&draft.video_id) {
            return Err(RepoError::Duplicate(draft.video_id));
        }

        tables.next_video += 1;
        let id = VideoId(tables.next_video);
        let video = draft.with_id(id);
        tables.by_video_id.insert(video.video_id().to_string(), id);
        tables.videos.insert(id, video.clone());
        tracing::debug!(id = %id, video_id = video.video_id(), "inserted video");
        Ok(video)
    }

    fn get_video(&self, id: VideoId) -> Option<Video> {
        self.tables
            .read()
            .expect("Failed to acquire read lock on tables")
            .videos
            .get(&id)
            .cloned()
    }

    fn find_by_video_id(&self, video_id: &str) -> Option<Video> {
        let tables = self
            .tables
            .read()
            .expect("Failed to acquire read lock on tables");
        tables
            .by_video_id
            .get(video_id)
            .and_then(|id| tables.videos.get(id))
            .cloned()
    }

    fn get_videos(&self) -> Vec<Video> {
        self.tables
            .read()
            .expect("Failed to acquire read lock on tables")
            .videos
            .values()
            .cloned()
            .collect()
    }

    fn videos_for_user(&self, user_id: UserId) -> Vec<Video> {
        self.tables
            .read()
            .expect("Failed to acquire read lock on tables")
            .videos
            .values()
            .filter(|v| v.user_id() == user_id)
            .cloned()
            .collect()
    }

    fn update_video(&self, video: &Video) -> Result<Video, RepoError> {
        let mut tables = self
            .tables
            .write()
            .expect("Failed to acquire write lock on tables");

        let stored = tables
            .videos
            .get_mut(&video.id())
            .ok_or_else(|| RepoError::not_found("Video", video.id()))?;
        stored.title = video.title.clone();
        stored.description = video.description.clone();
        stored.keywords = video.keywords.clone();
        Ok(stored.clone())
    }

    fn delete_video(&self, id: VideoId) -> Result<(), RepoError> {
        let mut tables = self
            .tables
            .write()
            .expect("Failed to acquire write lock on tables");

        let video = tables
            .videos
            .remove(&id)
            .ok_or_else(|| RepoError::not_found("Video", id))?;
        tables.by_video_id.remove(video.video_id());
        tables.thumbnails.retain(|_, t| t.video != Some(id));
        tracing::debug!(id = %id, video_id = video.video_id(), "deleted video");
        Ok(())
    }

    fn insert_thumbnail(&self, thumbnail: NewThumbnail) -> Result<Thumbnail, RepoError> {
        let mut tables = self
            .tables
            .write()
            .expect("Failed to acquire write lock on tables");

        if let Some(video) = thumbnail.video {
            if !tables.videos.contains_key(&video) {
                return Err(RepoError::not_found("Video", video));
            }
        }

        tables.next_thumbnail += 1;
        let row = Thumbnail {
            id: ThumbnailId(tables.next_thumbnail),
            video: thumbnail.video,
            url: thumbnail.url,
        };
        tables.thumbnails.insert(row.id, row.clone());
        Ok(row)
    }

    fn thumbnails_for(&self, id: VideoId) -> Vec<Thumbnail> {
        self.tables
            .read()
            .expect("Failed to acquire read lock on tables")
            .thumbnails
            .values()
            .filter(|t| t.video == Some(id))
            .cloned()
            .collect()
    }
}
