//! Keeps local video records and the remote video host in step.
//!
//! A video moves through three states:
//!
//! * unsaved: a [`NewVideo`] shell holding only the remote id and owner,
//! * synced: a stored [`Video`] mirroring the remote entry,
//! * deleted: gone locally and remotely; [`VideoSync::delete_synced_video`]
//!   consumes the `Video`.
//!
//! Storage writes and remote calls are ordered but not transactional.

mod events;

pub use events::{EventSink, ListenerError, NoopSink};

use datastore::{RepoError, Repository};
use domain::{NewThumbnail, NewVideo, SyncEvent, Thumbnail, Video, VideoId};
use std::sync::Arc;
use youtube_client::{Credentials, RemoteError, RemoteVideoApi, VideoUpdate};

/// Message carried by the error raised when the host refuses a deletion
pub const DELETE_REFUSED: &str = "Cannot be deleted from Youtube";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Store(#[from] RepoError),

    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// Outcome of a later save.
///
/// The local row is written even when the remote update fails; that
/// failure is reported here instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub video: Video,
    pub remote_error: Option<RemoteError>,
}

impl UpdateReport {
    /// True when local and remote state may now differ
    pub fn is_diverged(&self) -> bool {
        self.remote_error.is_some()
    }
}

pub struct VideoSync {
    repo: Arc<dyn Repository>,
    api: Arc<dyn RemoteVideoApi>,
    credentials: Credentials,
}

impl VideoSync {
    pub fn new(
        repo: Arc<dyn Repository>,
        api: Arc<dyn RemoteVideoApi>,
        credentials: Credentials,
    ) -> Self {
        Self {
            repo,
            api,
            credentials,
        }
    }

    pub fn repository(&self) -> &Arc<dyn Repository> {
        &self.repo
    }

    /// First save: mirror the remote entry into a new local row.
    ///
    /// Nothing is stored when the fetch fails. A thumbnail failure leaves
    /// the video row in place without (all of) its thumbnails.
    pub fn create_synced_video(
        &self,
        new_video: NewVideo,
        events: &dyn EventSink,
    ) -> Result<Video, SyncError> {
        let entry = self.api.fetch_entry(&new_video.video_id)?;

        if new_video.has_local_edits() {
            tracing::debug!(
                video_id = %new_video.video_id,
                "discarding local fields in favour of the remote entry"
            );
        }

        let video = self.repo.insert_video(new_video.populate(&entry))?;

        for url in &entry.thumbnails {
            let thumbnail = NewThumbnail {
                video: Some(video.id()),
                url: url.clone(),
            };
            if let Err(e) = self.repo.insert_thumbnail(thumbnail) {
                tracing::warn!(
                    id = %video.id(),
                    video_id = video.video_id(),
                    error = %e,
                    "thumbnail insert failed, video left without thumbnails"
                );
                return Err(e.into());
            }
        }

        tracing::info!(
            id = %video.id(),
            video_id = video.video_id(),
            thumbnails = entry.thumbnails.len(),
            "video created"
        );
        events.emit(&SyncEvent::created(video.clone()))?;
        Ok(video)
    }

    /// Later save: push local edits to the host, then store them.
    ///
    /// Only the descriptive fields travel; identity, privacy and URLs stay
    /// as they were stored at creation. Authentication failure aborts
    /// before anything is written. The local row is written whether or not
    /// the remote update succeeds.
    pub fn update_synced_video(
        &self,
        video: &Video,
        events: &dyn EventSink,
    ) -> Result<UpdateReport, SyncError> {
        let stored = self
            .repo
            .get_video(video.id())
            .ok_or_else(|| RepoError::not_found("Video", video.id()))?;

        let token = self.api.authenticate(&self.credentials)?;

        let remote_error = self
            .api
            .update_remote(&token, stored.video_id(), &VideoUpdate::from(video))
            .err();
        if let Some(e) = &remote_error {
            tracing::warn!(
                video_id = stored.video_id(),
                error = %e,
                "remote update failed, saving locally anyway"
            );
        }

        let saved = self.repo.update_video(video)?;
        tracing::info!(id = %saved.id(), video_id = saved.video_id(), "video updated");

        events.emit(&SyncEvent::updated(saved.clone()))?;
        Ok(UpdateReport {
            video: saved,
            remote_error,
        })
    }

    /// Delete remotely, then locally.
    ///
    /// When the host refuses, the local row (still reachable through
    /// [`VideoSync::get_video`]) is left alone.
    pub fn delete_synced_video(&self, video: Video) -> Result<(), SyncError> {
        let token = self.api.authenticate(&self.credentials)?;

        if !self.api.delete_remote(&token, video.video_id())? {
            tracing::warn!(video_id = video.video_id(), "remote host refused deletion");
            return Err(RemoteError::operation(DELETE_REFUSED).into());
        }

        self.repo.delete_video(video.id())?;
        tracing::info!(id = %video.id(), video_id = video.video_id(), "video deleted");
        Ok(())
    }

    pub fn get_video(&self, id: VideoId) -> Option<Video> {
        self.repo.get_video(id)
    }

    /// Current remote metadata for a stored video
    pub fn remote_entry(&self, video: &Video) -> Result<domain::RemoteVideoEntry, SyncError> {
        Ok(self.api.fetch_entry(video.video_id())?)
    }

    pub fn thumbnails(&self, video: &Video) -> Vec<Thumbnail> {
        self.repo.thumbnails_for(video.id())
    }

    /// The first thumbnail mirrored for the video, if any
    pub fn default_thumbnail(&self, video: &Video) -> Option<Thumbnail> {
        self.thumbnails(video).into_iter().next()
    }
}
