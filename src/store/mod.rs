// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence collaborators for views and comments.
//!
//! The view tree manager only talks to the [`ViewStore`] trait. Two implementations ship with the
//! crate: an in-process [`MemoryStore`] and a [`ViewFolder`] that keeps everything in one JSON
//! file on disk.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::model::{Comment, CommentId, DiagramId, Id, IdError, OwnerId, Pan, View, ViewId};

pub mod memory;
pub mod view_folder;

pub use memory::MemoryStore;
pub use view_folder::{ViewFolder, WriteDurability};

/// Fields required to create a view. The store assigns the id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewView {
    pub diagram_id: DiagramId,
    pub owner_id: OwnerId,
    pub name: String,
    pub zoom: f64,
    pub pan: Pan,
    pub sort_order: i64,
}

/// Partial update of a stored view. `None` leaves a field unchanged.
///
/// `parent_id` is doubly optional: `Some(None)` moves the view to the top level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewPatch {
    pub name: Option<String>,
    pub zoom: Option<f64>,
    pub pan: Option<Pan>,
    pub parent_id: Option<Option<ViewId>>,
    pub sort_order: Option<i64>,
    pub timestamp: Option<u64>,
}

impl ViewPatch {
    /// Position and parent of `view` at array index `position`.
    pub fn placement(view: &View, position: usize) -> Self {
        Self {
            parent_id: Some(view.parent_id().cloned()),
            sort_order: Some(i64::try_from(position).unwrap_or(i64::MAX)),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply_to(&self, view: &mut View) {
        if let Some(name) = &self.name {
            view.set_name(name.clone());
        }
        if let Some(zoom) = self.zoom {
            view.set_zoom(zoom);
        }
        if let Some(pan) = self.pan {
            view.set_pan(pan);
        }
        if let Some(parent_id) = &self.parent_id {
            view.set_parent_id(parent_id.clone());
        }
        if let Some(sort_order) = self.sort_order {
            view.set_sort_order(Some(sort_order));
        }
        if let Some(timestamp) = self.timestamp {
            view.set_timestamp(timestamp);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub diagram_id: DiagramId,
    pub text: String,
    pub view_id: Option<ViewId>,
}

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidId {
        field: &'static str,
        value: String,
        source: Box<IdError>,
    },
    ViewNotFound {
        view_id: ViewId,
    },
    CommentNotFound {
        comment_id: CommentId,
    },
    SymlinkRefused {
        path: PathBuf,
    },
    Unavailable {
        reason: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid id for {field}: {value:?}: {source}"),
            Self::ViewNotFound { view_id } => write!(f, "view not found in store (id={view_id})"),
            Self::CommentNotFound { comment_id } => {
                write!(f, "comment not found in store (id={comment_id})")
            }
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
            Self::Unavailable { reason } => write!(f, "store unavailable: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidId { source, .. } => Some(source),
            Self::ViewNotFound { .. } => None,
            Self::CommentNotFound { .. } => None,
            Self::SymlinkRefused { .. } => None,
            Self::Unavailable { .. } => None,
        }
    }
}

/// Async persistence contract consumed by the view tree manager.
///
/// Calls are awaited one at a time by the manager; implementations need not support concurrent
/// callers beyond what their own locking provides.
#[allow(async_fn_in_trait)]
pub trait ViewStore {
    async fn create_view(&self, new_view: NewView) -> Result<View, StoreError>;

    async fn update_view(&self, view_id: &ViewId, patch: ViewPatch) -> Result<View, StoreError>;

    async fn delete_view(&self, view_id: &ViewId) -> Result<(), StoreError>;

    /// Views of one diagram and owner, ordered by `sort_order` then `timestamp`.
    async fn list_views(
        &self,
        diagram_id: &DiagramId,
        owner_id: &OwnerId,
    ) -> Result<Vec<View>, StoreError>;

    async fn list_comments(&self, diagram_id: &DiagramId) -> Result<Vec<Comment>, StoreError>;

    async fn create_comment(&self, new_comment: NewComment) -> Result<Comment, StoreError>;

    async fn delete_comment(&self, comment_id: &CommentId) -> Result<(), StoreError>;
}

/// A stored view together with the diagram and owner it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ViewRecord {
    pub(crate) diagram_id: DiagramId,
    pub(crate) owner_id: OwnerId,
    pub(crate) view: View,
}

impl ViewRecord {
    fn belongs_to(&self, diagram_id: &DiagramId, owner_id: &OwnerId) -> bool {
        &self.diagram_id == diagram_id && &self.owner_id == owner_id
    }
}

pub(crate) fn listed_views(
    records: &[ViewRecord],
    diagram_id: &DiagramId,
    owner_id: &OwnerId,
) -> Vec<View> {
    let mut views = records
        .iter()
        .filter(|record| record.belongs_to(diagram_id, owner_id))
        .map(|record| record.view.clone())
        .collect::<Vec<_>>();
    views.sort_by(|a, b| {
        let a_key = a.sort_order().unwrap_or(i64::MAX);
        let b_key = b.sort_order().unwrap_or(i64::MAX);
        a_key.cmp(&b_key).then_with(|| a.timestamp().cmp(&b.timestamp()))
    });
    views
}

pub(crate) fn sequenced_id<T>(
    prefix: &str,
    seq: u64,
    field: &'static str,
) -> Result<Id<T>, StoreError> {
    let value = format!("{prefix}{seq}");
    Id::new(value.clone()).map_err(|source| StoreError::InvalidId {
        field,
        value,
        source: Box::new(source),
    })
}
