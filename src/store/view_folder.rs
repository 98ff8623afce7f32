// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{
    listed_views, sequenced_id, NewComment, NewView, StoreError, ViewPatch, ViewRecord, ViewStore,
};
use crate::model::{now_millis, Comment, CommentId, DiagramId, Id, OwnerId, Pan, View, ViewId};

const VIEWS_FILENAME: &str = "panorama-views.json";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable storage where
    /// possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

/// A folder holding every view and comment in a single `panorama-views.json` file.
///
/// Each call is a read-modify-write of that file, serialized through a lock shared by clones.
/// Id counters are stored alongside the records so deleted ids are never handed out again.
#[derive(Debug, Clone)]
pub struct ViewFolder {
    root: PathBuf,
    durability: WriteDurability,
    lock: Arc<Mutex<()>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ViewFileJson {
    #[serde(default)]
    next_view_seq: u64,
    #[serde(default)]
    next_comment_seq: u64,
    #[serde(default)]
    views: Vec<ViewJson>,
    #[serde(default)]
    comments: Vec<CommentJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ViewJson {
    view_id: String,
    diagram_id: String,
    owner_id: String,
    name: String,
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sort_order: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CommentJson {
    comment_id: String,
    diagram_id: String,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    view_id: Option<String>,
    #[serde(default)]
    created_at: u64,
}

/// Decoded contents of the views file.
#[derive(Debug, Default)]
struct ViewFile {
    next_view_seq: u64,
    next_comment_seq: u64,
    views: Vec<ViewRecord>,
    comments: Vec<Comment>,
}

impl ViewFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn views_path(&self) -> PathBuf {
        self.root.join(VIEWS_FILENAME)
    }

    fn load_file(&self) -> Result<ViewFile, StoreError> {
        let path = self.views_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                return Ok(ViewFile::default())
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let json: ViewFileJson =
            serde_json::from_str(&raw).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;
        view_file_from_json(json)
    }

    fn save_file(&self, file: &ViewFile) -> Result<(), StoreError> {
        let path = self.views_path();
        let json = view_file_to_json(file);
        let out = serde_json::to_string_pretty(&json).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;

        write_atomic(&self.root, &path, format!("{out}\n").as_bytes(), self.durability)
    }

    async fn modify<T>(
        &self,
        f: impl FnOnce(&mut ViewFile) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.lock.lock().await;
        let mut file = self.load_file()?;
        let out = f(&mut file)?;
        self.save_file(&file)?;
        Ok(out)
    }
}

impl ViewStore for ViewFolder {
    async fn create_view(&self, new_view: NewView) -> Result<View, StoreError> {
        let view = self
            .modify(|file| {
                file.next_view_seq += 1;
                let view_id: ViewId = sequenced_id("v", file.next_view_seq, "view_id")?;
                let view = View::new(view_id, new_view.name, new_view.zoom, new_view.pan)
                    .with_timestamp(now_millis())
                    .with_sort_order(Some(new_view.sort_order));
                file.views.push(ViewRecord {
                    diagram_id: new_view.diagram_id,
                    owner_id: new_view.owner_id,
                    view: view.clone(),
                });
                Ok(view)
            })
            .await?;
        tracing::debug!(view_id = %view.view_id(), "view created");
        Ok(view)
    }

    async fn update_view(&self, view_id: &ViewId, patch: ViewPatch) -> Result<View, StoreError> {
        self.modify(|file| {
            let Some(record) = file.views.iter_mut().find(|r| r.view.view_id() == view_id) else {
                return Err(StoreError::ViewNotFound {
                    view_id: view_id.clone(),
                });
            };
            patch.apply_to(&mut record.view);
            Ok(record.view.clone())
        })
        .await
    }

    async fn delete_view(&self, view_id: &ViewId) -> Result<(), StoreError> {
        self.modify(|file| {
            let before = file.views.len();
            file.views.retain(|r| r.view.view_id() != view_id);
            if file.views.len() == before {
                return Err(StoreError::ViewNotFound {
                    view_id: view_id.clone(),
                });
            }
            Ok(())
        })
        .await
    }

    async fn list_views(
        &self,
        diagram_id: &DiagramId,
        owner_id: &OwnerId,
    ) -> Result<Vec<View>, StoreError> {
        let _guard = self.lock.lock().await;
        let file = self.load_file()?;
        Ok(listed_views(&file.views, diagram_id, owner_id))
    }

    async fn list_comments(&self, diagram_id: &DiagramId) -> Result<Vec<Comment>, StoreError> {
        let _guard = self.lock.lock().await;
        let file = self.load_file()?;
        Ok(file
            .comments
            .into_iter()
            .filter(|c| c.diagram_id() == diagram_id)
            .collect())
    }

    async fn create_comment(&self, new_comment: NewComment) -> Result<Comment, StoreError> {
        self.modify(|file| {
            file.next_comment_seq += 1;
            let comment_id: CommentId =
                sequenced_id("c", file.next_comment_seq, "comment_id")?;
            let mut comment = Comment::new(comment_id, new_comment.diagram_id, new_comment.text);
            comment.set_view_id(new_comment.view_id);
            comment.set_created_at(now_millis());
            file.comments.push(comment.clone());
            Ok(comment)
        })
        .await
    }

    async fn delete_comment(&self, comment_id: &CommentId) -> Result<(), StoreError> {
        self.modify(|file| {
            let before = file.comments.len();
            file.comments.retain(|c| c.comment_id() != comment_id);
            if file.comments.len() == before {
                return Err(StoreError::CommentNotFound {
                    comment_id: comment_id.clone(),
                });
            }
            Ok(())
        })
        .await
    }
}

fn parse_id<T>(field: &'static str, value: String) -> Result<Id<T>, StoreError> {
    Id::new(value.clone()).map_err(|source| StoreError::InvalidId {
        field,
        value,
        source: Box::new(source),
    })
}

fn view_file_from_json(json: ViewFileJson) -> Result<ViewFile, StoreError> {
    let views = json
        .views
        .into_iter()
        .map(|v| -> Result<ViewRecord, StoreError> {
            let view_id: ViewId = parse_id("view_id", v.view_id)?;
            let parent_id = v
                .parent_id
                .map(|parent| parse_id("parent_id", parent))
                .transpose()?;
            let view = View::new(view_id, v.name, v.zoom, Pan::new(v.pan_x, v.pan_y))
                .with_parent(parent_id)
                .with_timestamp(v.timestamp)
                .with_sort_order(v.sort_order);
            Ok(ViewRecord {
                diagram_id: parse_id("diagram_id", v.diagram_id)?,
                owner_id: parse_id("owner_id", v.owner_id)?,
                view,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    let comments = json
        .comments
        .into_iter()
        .map(|c| -> Result<Comment, StoreError> {
            let mut comment = Comment::new(
                parse_id("comment_id", c.comment_id)?,
                parse_id("diagram_id", c.diagram_id)?,
                c.text,
            );
            comment.set_view_id(c.view_id.map(|id| parse_id("view_id", id)).transpose()?);
            comment.set_created_at(c.created_at);
            Ok(comment)
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    Ok(ViewFile {
        next_view_seq: json.next_view_seq,
        next_comment_seq: json.next_comment_seq,
        views,
        comments,
    })
}

fn view_file_to_json(file: &ViewFile) -> ViewFileJson {
    ViewFileJson {
        next_view_seq: file.next_view_seq,
        next_comment_seq: file.next_comment_seq,
        views: file
            .views
            .iter()
            .map(|record| ViewJson {
                view_id: record.view.view_id().to_string(),
                diagram_id: record.diagram_id.to_string(),
                owner_id: record.owner_id.to_string(),
                name: record.view.name().to_owned(),
                zoom: record.view.zoom(),
                pan_x: record.view.pan().x,
                pan_y: record.view.pan().y,
                timestamp: record.view.timestamp(),
                parent_id: record.view.parent_id().map(ToString::to_string),
                sort_order: record.view.sort_order(),
            })
            .collect(),
        comments: file
            .comments
            .iter()
            .map(|comment| CommentJson {
                comment_id: comment.comment_id().to_string(),
                diagram_id: comment.diagram_id().to_string(),
                text: comment.text().to_owned(),
                view_id: comment.view_id().map(ToString::to_string),
                created_at: comment.created_at(),
            })
            .collect(),
    }
}

/// Removes the temp file when `result` failed, so no half-written `.panorama.tmp.*` is left.
fn discard_on_error<T>(tmp_path: &Path, result: Result<T, StoreError>) -> Result<T, StoreError> {
    if result.is_err() {
        let _ = fs::remove_file(tmp_path);
    }
    result
}

fn write_atomic(
    root: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    fs::create_dir_all(root).map_err(|source| StoreError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let Some(parent) = path.parent() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent"),
        });
    };
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".panorama.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    let written = file
        .write_all(contents)
        .and_then(|()| match durability {
            WriteDurability::Durable => file.sync_all(),
            WriteDurability::BestEffort => Ok(()),
        })
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        });
    drop(file);
    discard_on_error(&tmp_path, written)?;

    let renamed = fs::rename(&tmp_path, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    });
    discard_on_error(&tmp_path, renamed)?;

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
