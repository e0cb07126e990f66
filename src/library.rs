// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::LibraryError;
use crate::feed::{Episode, Podcast};

/// Everything a playback engine needs to start an episode: the resolved
/// audio URL and the position to resume from, if one was recorded.
#[derive(Debug, Clone)]
pub struct PlaybackCue {
    pub url: Url,
    pub resume_at: Option<Duration>,
}

/// The set of loaded podcasts, keyed by title.
///
/// The library exclusively owns its podcasts, and each podcast its episodes;
/// episodes point back to their podcast by title, resolved through here.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Library {
    podcasts: HashMap<String, Podcast>,
}

/// On-disk form of a library snapshot.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    saved_at: String,
    podcasts: HashMap<String, Podcast>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parsed podcast. A podcast with the same title replaces the
    /// existing entry.
    pub fn insert(&mut self, podcast: Podcast) {
        self.podcasts.insert(podcast.title.clone(), podcast);
    }

    /// Evict a podcast and all of its episodes.
    pub fn remove(&mut self, title: &str) -> Option<Podcast> {
        self.podcasts.remove(title)
    }

    pub fn get(&self, title: &str) -> Option<&Podcast> {
        self.podcasts.get(title)
    }

    /// All podcasts in alphabetical order by title.
    pub fn podcasts(&self) -> Vec<&Podcast> {
        let mut list: Vec<&Podcast> = self.podcasts.values().collect();
        list.sort_by(|a, b| a.title.cmp(&b.title));
        list
    }

    pub fn len(&self) -> usize {
        self.podcasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.podcasts.is_empty()
    }

    /// Look up one episode by podcast and episode title.
    pub fn episode(&self, podcast: &str, episode: &str) -> Result<&Episode, LibraryError> {
        let pod = self
            .podcasts
            .get(podcast)
            .ok_or_else(|| LibraryError::PodcastNotFound {
                title: podcast.to_string(),
            })?;
        pod.episode(episode).ok_or_else(|| LibraryError::EpisodeNotFound {
            podcast: podcast.to_string(),
            episode: episode.to_string(),
        })
    }

    /// Resolve an episode into a playback cue. An audio link that never
    /// parsed, or parses to an invalid URL, surfaces here.
    pub fn open_episode(&self, podcast: &str, episode: &str) -> Result<PlaybackCue, LibraryError> {
        let ep = self.episode(podcast, episode)?;
        Ok(PlaybackCue {
            url: ep.audio_url()?,
            resume_at: ep.position,
        })
    }

    /// Record the last known playback position of an episode, replacing any
    /// earlier value.
    pub fn record_position(
        &mut self,
        podcast: &str,
        episode: &str,
        position: Duration,
    ) -> Result<(), LibraryError> {
        let pod = self
            .podcasts
            .get_mut(podcast)
            .ok_or_else(|| LibraryError::PodcastNotFound {
                title: podcast.to_string(),
            })?;
        let ep = pod
            .episode_mut(episode)
            .ok_or_else(|| LibraryError::EpisodeNotFound {
                podcast: podcast.to_string(),
                episode: episode.to_string(),
            })?;
        ep.position = Some(position);
        Ok(())
    }

    /// Write the whole library, playback positions included, to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), LibraryError> {
        let snapshot = Snapshot {
            saved_at: Utc::now().to_rfc3339(),
            podcasts: self.podcasts.clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, json).map_err(|e| LibraryError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Restore a library from a snapshot file.
    pub fn load(path: &Path) -> Result<Self, LibraryError> {
        let content = std::fs::read_to_string(path).map_err(|e| LibraryError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let snapshot: Snapshot =
            serde_json::from_str(&content).map_err(|e| LibraryError::JsonParseFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(Self {
            podcasts: snapshot.podcasts,
        })
    }
}
