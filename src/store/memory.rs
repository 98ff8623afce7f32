// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::{
    listed_views, sequenced_id, NewComment, NewView, StoreError, ViewPatch, ViewRecord, ViewStore,
};
use crate::model::{now_millis, Comment, CommentId, DiagramId, OwnerId, View, ViewId};

#[derive(Debug, Default)]
struct MemoryState {
    views: Vec<ViewRecord>,
    comments: Vec<Comment>,
    next_view_seq: u64,
    next_comment_seq: u64,
    unavailable: Option<String>,
    calls: usize,
}

impl MemoryState {
    fn begin_call(&mut self) -> Result<(), StoreError> {
        self.calls += 1;
        match &self.unavailable {
            Some(reason) => Err(StoreError::Unavailable {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// In-process store used by the demo panel and tests.
///
/// Clones share the same state. Ids are `v1, v2, ...` for views and `c1, c2, ...` for comments.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `views` for one diagram and owner.
    ///
    /// Positions are assigned from the array order.
    pub fn with_views(diagram_id: &DiagramId, owner_id: &OwnerId, views: Vec<View>) -> Self {
        let next_view_seq = views.len() as u64;
        let views = views
            .into_iter()
            .enumerate()
            .map(|(idx, view)| ViewRecord {
                diagram_id: diagram_id.clone(),
                owner_id: owner_id.clone(),
                view: view.with_sort_order(Some(idx as i64)),
            })
            .collect();
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                views,
                next_view_seq,
                ..MemoryState::default()
            })),
        }
    }

    /// Makes every following call fail with [`StoreError::Unavailable`] until cleared.
    pub async fn set_unavailable(&self, reason: Option<&str>) {
        self.state.lock().await.unavailable = reason.map(str::to_owned);
    }

    /// Number of calls made against this store, including failed ones.
    pub async fn call_count(&self) -> usize {
        self.state.lock().await.calls
    }

    pub async fn stored_view(&self, view_id: &ViewId) -> Option<View> {
        let state = self.state.lock().await;
        state
            .views
            .iter()
            .find(|record| record.view.view_id() == view_id)
            .map(|record| record.view.clone())
    }
}

impl ViewStore for MemoryStore {
    async fn create_view(&self, new_view: NewView) -> Result<View, StoreError> {
        let mut state = self.state.lock().await;
        state.begin_call()?;

        // Skip ids that were seeded by `with_views` under the same naming scheme.
        let view_id = loop {
            state.next_view_seq += 1;
            let candidate: ViewId = sequenced_id("v", state.next_view_seq, "view_id")?;
            if !state.views.iter().any(|r| r.view.view_id() == &candidate) {
                break candidate;
            }
        };

        let view = View::new(view_id, new_view.name, new_view.zoom, new_view.pan)
            .with_timestamp(now_millis())
            .with_sort_order(Some(new_view.sort_order));
        state.views.push(ViewRecord {
            diagram_id: new_view.diagram_id,
            owner_id: new_view.owner_id,
            view: view.clone(),
        });
        Ok(view)
    }

    async fn update_view(&self, view_id: &ViewId, patch: ViewPatch) -> Result<View, StoreError> {
        let mut state = self.state.lock().await;
        state.begin_call()?;

        let Some(record) = state.views.iter_mut().find(|r| r.view.view_id() == view_id) else {
            return Err(StoreError::ViewNotFound {
                view_id: view_id.clone(),
            });
        };
        patch.apply_to(&mut record.view);
        Ok(record.view.clone())
    }

    async fn delete_view(&self, view_id: &ViewId) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.begin_call()?;

        let before = state.views.len();
        state.views.retain(|r| r.view.view_id() != view_id);
        if state.views.len() == before {
            return Err(StoreError::ViewNotFound {
                view_id: view_id.clone(),
            });
        }
        Ok(())
    }

    async fn list_views(
        &self,
        diagram_id: &DiagramId,
        owner_id: &OwnerId,
    ) -> Result<Vec<View>, StoreError> {
        let mut state = self.state.lock().await;
        state.begin_call()?;
        Ok(listed_views(&state.views, diagram_id, owner_id))
    }

    async fn list_comments(&self, diagram_id: &DiagramId) -> Result<Vec<Comment>, StoreError> {
        let mut state = self.state.lock().await;
        state.begin_call()?;
        Ok(state
            .comments
            .iter()
            .filter(|c| c.diagram_id() == diagram_id)
            .cloned()
            .collect())
    }

    async fn create_comment(&self, new_comment: NewComment) -> Result<Comment, StoreError> {
        let mut state = self.state.lock().await;
        state.begin_call()?;

        state.next_comment_seq += 1;
        let comment_id: CommentId = sequenced_id("c", state.next_comment_seq, "comment_id")?;
        let mut comment = Comment::new(comment_id, new_comment.diagram_id, new_comment.text);
        comment.set_view_id(new_comment.view_id);
        comment.set_created_at(now_millis());
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn delete_comment(&self, comment_id: &CommentId) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.begin_call()?;

        let before = state.comments.len();
        state.comments.retain(|c| c.comment_id() != comment_id);
        if state.comments.len() == before {
            return Err(StoreError::CommentNotFound {
                comment_id: comment_id.clone(),
            });
        }
        Ok(())
    }
}
