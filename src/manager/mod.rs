// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The view tree manager.
//!
//! Owns the live view array (the entry under the history cursor), the selection, the current
//! viewport and a queue of user notices. Mutations are applied locally first and then synced to
//! the [`ViewStore`] one awaited call at a time. Store failures are reported but never roll back
//! the local change.

use std::collections::HashMap;
use std::fmt;

use crate::drag::{DropAction, DEFAULT_NEST_THRESHOLD};
use crate::history::{History, DEFAULT_HISTORY_CAPACITY};
use crate::model::{
    clamp_zoom, now_millis, Comment, DiagramId, OwnerId, Pan, View, ViewId, Viewport, ViewportDelta,
};
use crate::notice::{Notice, Notices};
use crate::ops::{self, MoveDirection, MoveError};
use crate::sort::{self, SortMode, TreeRow};
use crate::store::{NewComment, NewView, StoreError, ViewPatch, ViewStore};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManagerConfig {
    /// Retained undo snapshots, including the live one.
    pub history_capacity: usize,
    /// Horizontal drag displacement that turns a drop into a nest.
    pub nest_threshold: f64,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            nest_threshold: DEFAULT_NEST_THRESHOLD,
        }
    }
}

#[derive(Debug)]
pub enum ViewError {
    EmptyName,
    EmptyComment,
    NoSelection,
    Move(MoveError),
    Store(StoreError),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => f.write_str("view name must not be empty"),
            Self::EmptyComment => f.write_str("comment text must not be empty"),
            Self::NoSelection => f.write_str("no view selected"),
            Self::Move(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "store error: {err}"),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Move(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::EmptyName | Self::EmptyComment | Self::NoSelection => None,
        }
    }
}

impl From<MoveError> for ViewError {
    fn from(err: MoveError) -> Self {
        Self::Move(err)
    }
}

impl From<StoreError> for ViewError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

pub struct ViewTreeManager<S> {
    store: S,
    config: ManagerConfig,
    diagram_id: DiagramId,
    owner_id: OwnerId,
    history: History<Vec<View>>,
    selected: Option<ViewId>,
    viewport: Viewport,
    sort: SortMode,
    comments: Vec<Comment>,
    notices: Notices,
}

impl<S: ViewStore> ViewTreeManager<S> {
    pub fn new(store: S, diagram_id: DiagramId, owner_id: OwnerId) -> Self {
        Self::with_config(store, diagram_id, owner_id, ManagerConfig::default())
    }

    pub fn with_config(
        store: S,
        diagram_id: DiagramId,
        owner_id: OwnerId,
        config: ManagerConfig,
    ) -> Self {
        Self {
            store,
            config,
            diagram_id,
            owner_id,
            history: History::with_capacity(Vec::new(), config.history_capacity),
            selected: None,
            viewport: Viewport::default(),
            sort: SortMode::default(),
            comments: Vec::new(),
            notices: Notices::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn diagram_id(&self) -> &DiagramId {
        &self.diagram_id
    }

    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    /// The live view array.
    pub fn views(&self) -> &[View] {
        self.history.current()
    }

    pub fn view(&self, view_id: &ViewId) -> Option<&View> {
        self.views().iter().find(|v| v.view_id() == view_id)
    }

    pub fn history(&self) -> &History<Vec<View>> {
        &self.history
    }

    pub fn selected(&self) -> Option<&ViewId> {
        self.selected.as_ref()
    }

    pub fn selected_view(&self) -> Option<&View> {
        self.selected.as_ref().and_then(|id| self.view(id))
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current viewport relative to the selected view, if any.
    pub fn viewport_delta(&self) -> Option<ViewportDelta> {
        self.selected_view().map(|view| self.viewport.delta_from(view))
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort
    }

    pub fn set_sort_mode(&mut self, sort: SortMode) {
        self.sort = sort;
    }

    pub fn cycle_sort_mode(&mut self) -> SortMode {
        self.sort = self.sort.next();
        self.sort
    }

    pub fn rows(&self) -> Vec<TreeRow> {
        sort::visible_rows(self.views(), self.sort)
    }

    /// Indices of views whose name fuzzily matches `query`, best first.
    pub fn search(&self, query: &str) -> Vec<usize> {
        sort::search_rows(self.views(), query)
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn comments_for(&self, view_id: &ViewId) -> Vec<&Comment> {
        self.comments
            .iter()
            .filter(|c| c.is_linked_to(view_id))
            .collect()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Fetches views and comments from the store and starts a fresh history.
    pub async fn load(&mut self) -> Result<(), ViewError> {
        let views = match self.store.list_views(&self.diagram_id, &self.owner_id).await {
            Ok(views) => views,
            Err(err) => {
                tracing::warn!(diagram_id = %self.diagram_id, error = %err, "failed to load views");
                self.notices.error(format!("Could not load views: {err}"));
                return Err(err.into());
            }
        };
        self.replace_views(views);

        match self.store.list_comments(&self.diagram_id).await {
            Ok(comments) => self.comments = comments,
            Err(err) => {
                tracing::warn!(diagram_id = %self.diagram_id, error = %err, "failed to load comments");
                self.notices.warning(format!("Could not load comments: {err}"));
            }
        }
        Ok(())
    }

    /// Adopts an externally supplied array (not produced by this manager's history).
    ///
    /// History restarts from `views`.
    pub fn replace_views(&mut self, views: Vec<View>) {
        tracing::debug!(count = views.len(), "view array replaced");
        self.history.reset(views);
        self.drop_stale_selection();
    }

    pub fn select(&mut self, view_id: &ViewId) -> Result<(), ViewError> {
        if self.view(view_id).is_none() {
            return self.reject(MoveError::NotFound {
                view_id: view_id.clone(),
            });
        }
        self.selected = Some(view_id.clone());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn zoom_at(&mut self, factor: f64, cursor: Pan) {
        self.viewport.zoom_at(factor, cursor);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.viewport.pan_by(dx, dy);
    }

    /// Saves the current viewport as a new root view.
    ///
    /// The view is only inserted once the store accepted it. A new view is an external change to
    /// the array, so history restarts from the resulting array.
    pub async fn save_view(&mut self, name: &str) -> Result<ViewId, ViewError> {
        let name = name.trim();
        if name.is_empty() {
            return self.reject(ViewError::EmptyName);
        }

        let new_view = NewView {
            diagram_id: self.diagram_id.clone(),
            owner_id: self.owner_id.clone(),
            name: name.to_owned(),
            zoom: clamp_zoom(self.viewport.zoom()),
            pan: self.viewport.pan(),
            sort_order: i64::try_from(self.views().len()).unwrap_or(i64::MAX),
        };

        match self.store.create_view(new_view).await {
            Ok(view) => {
                let view_id = view.view_id().clone();
                tracing::debug!(view_id = %view_id, "view saved");
                let mut next = self.views().to_vec();
                next.push(view);
                self.history.reset(next);
                self.notices.success(format!("Saved view \"{name}\""));
                Ok(view_id)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to save view");
                self.notices.error(format!("Could not save view: {err}"));
                Err(err.into())
            }
        }
    }

    /// Points the viewport at a saved view and selects it. The tree is not modified.
    pub fn load_view(&mut self, view_id: &ViewId) -> Result<Viewport, ViewError> {
        let Some(view) = self.view(view_id) else {
            return self.reject(MoveError::NotFound {
                view_id: view_id.clone(),
            });
        };
        let viewport = Viewport::of_view(view);
        self.viewport = viewport;
        self.selected = Some(view_id.clone());
        Ok(viewport)
    }

    /// Removes exactly one view, then deletes it and its linked comments in the store.
    ///
    /// Children keep their dangling `parent_id` and show up at the top level. Once the store has
    /// dropped the view, history restarts from the resulting array so no snapshot can bring the
    /// view back. If the store delete fails, the view still exists there and the removal stays
    /// undoable; its linked comments are kept.
    pub async fn delete_view(&mut self, view_id: &ViewId) -> Result<(), ViewError> {
        let next = match ops::remove_view(self.views(), view_id) {
            Ok(next) => next,
            Err(err) => return self.reject(err),
        };
        let name = self.view(view_id).map(|v| v.name().to_owned()).unwrap_or_default();

        tracing::debug!(view_id = %view_id, "view deleted");
        self.history.push(next);
        self.drop_stale_selection();

        if let Err(err) = self.store.delete_view(view_id).await {
            tracing::warn!(view_id = %view_id, error = %err, "failed to delete view in store");
            self.notices.error(format!(
                "Deleted locally, but sync failed: {err}; linked comments were kept"
            ));
            return Ok(());
        }
        let current = self.views().to_vec();
        self.history.reset(current);

        let linked = match self.store.list_comments(&self.diagram_id).await {
            Ok(comments) => comments
                .into_iter()
                .filter(|c| c.is_linked_to(view_id))
                .map(|c| c.comment_id().clone())
                .collect::<Vec<_>>(),
            Err(err) => {
                tracing::warn!(view_id = %view_id, error = %err, "failed to list linked comments");
                self.comments
                    .iter()
                    .filter(|c| c.is_linked_to(view_id))
                    .map(|c| c.comment_id().clone())
                    .collect()
            }
        };

        let mut failed = 0usize;
        for comment_id in &linked {
            match self.store.delete_comment(comment_id).await {
                Ok(()) => self.comments.retain(|c| c.comment_id() != comment_id),
                Err(err) => {
                    failed += 1;
                    tracing::warn!(comment_id = %comment_id, error = %err, "failed to delete linked comment");
                }
            }
        }

        if failed > 0 {
            self.notices.error(format!(
                "Deleted \"{name}\", but {failed} linked comment(s) could not be removed"
            ));
        } else {
            self.notices.success(format!("Deleted \"{name}\""));
        }
        Ok(())
    }

    /// Replaces the whole array (after a drag reorder or nest) as one undo step.
    pub async fn update_views(&mut self, next: Vec<View>) -> Result<(), ViewError> {
        if let Err(err) = ops::validate_forest(&next) {
            return self.reject(err);
        }
        self.commit(next).await;
        Ok(())
    }

    /// Moves the selected view (see [`MoveDirection`]).
    pub async fn move_selected(&mut self, direction: MoveDirection) -> Result<(), ViewError> {
        let Some(view_id) = self.selected.clone() else {
            return self.reject(ViewError::NoSelection);
        };
        let next = match ops::move_view(self.views(), &view_id, direction) {
            Ok(next) => next,
            Err(err) => return self.reject(err),
        };
        tracing::debug!(view_id = %view_id, direction = direction.label(), "view moved");
        self.commit(next).await;
        Ok(())
    }

    pub async fn apply_drop(&mut self, action: DropAction) -> Result<(), ViewError> {
        let next = match &action {
            DropAction::Nest { view_id, target } => ops::nest_under(self.views(), view_id, target),
            DropAction::Reorder { view_id, to_index } => {
                match ops::index_of(self.views(), view_id) {
                    Some(from) => ops::reorder(self.views(), from, *to_index),
                    None => Err(MoveError::NotFound {
                        view_id: view_id.clone(),
                    }),
                }
            }
        };
        match next {
            Ok(next) => self.update_views(next).await,
            Err(err) => self.reject(err),
        }
    }

    pub async fn rename_view(&mut self, view_id: &ViewId, name: &str) -> Result<(), ViewError> {
        let name = name.trim();
        if name.is_empty() {
            return self.reject(ViewError::EmptyName);
        }
        let next = match ops::rename_view(self.views(), view_id, name) {
            Ok(next) => next,
            Err(err) => return self.reject(err),
        };
        self.history.push(next);

        let patch = ViewPatch {
            name: Some(name.to_owned()),
            ..ViewPatch::default()
        };
        self.sync_patch(view_id, patch, "rename").await;
        Ok(())
    }

    /// Overwrites a view's zoom and pan with the current viewport.
    ///
    /// Zoom is clamped to the allowed range, and the live camera snaps to the written value.
    pub async fn refresh_view(&mut self, view_id: &ViewId) -> Result<(), ViewError> {
        let Some(idx) = ops::index_of(self.views(), view_id) else {
            return self.reject(MoveError::NotFound {
                view_id: view_id.clone(),
            });
        };
        let timestamp = now_millis();
        let zoom = clamp_zoom(self.viewport.zoom());
        let pan = self.viewport.pan();
        self.viewport = Viewport::new(zoom, pan);
        let mut next = self.views().to_vec();
        next[idx].set_zoom(zoom);
        next[idx].set_pan(pan);
        next[idx].set_timestamp(timestamp);
        self.history.push(next);

        let patch = ViewPatch {
            zoom: Some(zoom),
            pan: Some(pan),
            timestamp: Some(timestamp),
            ..ViewPatch::default()
        };
        self.sync_patch(view_id, patch, "refresh").await;
        Ok(())
    }

    /// Steps back one snapshot. Returns `false` when there is nothing to undo.
    pub async fn undo(&mut self) -> bool {
        let previous = self.views().to_vec();
        let Some(restored) = self.history.undo().cloned() else {
            self.notices.info("Nothing to undo");
            return false;
        };
        self.restore(previous, restored).await;
        true
    }

    /// Steps forward one snapshot. Returns `false` when there is nothing to redo.
    pub async fn redo(&mut self) -> bool {
        let previous = self.views().to_vec();
        let Some(restored) = self.history.redo().cloned() else {
            self.notices.info("Nothing to redo");
            return false;
        };
        self.restore(previous, restored).await;
        true
    }

    /// Expands or collapses a view's children. Never an undo step and never persisted.
    pub fn toggle_group(&mut self, view_id: &ViewId) -> Result<bool, ViewError> {
        let Some(idx) = ops::index_of(self.views(), view_id) else {
            return self.reject(MoveError::NotFound {
                view_id: view_id.clone(),
            });
        };
        let mut next = self.views().to_vec();
        let expanded = !next[idx].expanded();
        next[idx].set_expanded(expanded);
        self.history.replace_current(next);
        Ok(expanded)
    }

    pub async fn add_comment(
        &mut self,
        text: &str,
        view_id: Option<ViewId>,
    ) -> Result<Comment, ViewError> {
        let text = text.trim();
        if text.is_empty() {
            return self.reject(ViewError::EmptyComment);
        }
        if let Some(view_id) = &view_id {
            if self.view(view_id).is_none() {
                return self.reject(MoveError::NotFound {
                    view_id: view_id.clone(),
                });
            }
        }

        let new_comment = NewComment {
            diagram_id: self.diagram_id.clone(),
            text: text.to_owned(),
            view_id,
        };
        match self.store.create_comment(new_comment).await {
            Ok(comment) => {
                self.comments.push(comment.clone());
                self.notices.success("Comment added");
                Ok(comment)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to add comment");
                self.notices.error(format!("Could not add comment: {err}"));
                Err(err.into())
            }
        }
    }

    /// Records `next` as a new undo step and syncs positions and parents to the store.
    async fn commit(&mut self, mut next: Vec<View>) {
        renumber(&mut next);
        let previous = self.views().to_vec();
        if previous == next {
            return;
        }
        self.history.push(next.clone());
        self.drop_stale_selection();
        self.persist_changes(&previous, &next).await;
    }

    /// Adopts a snapshot reached by undo or redo.
    ///
    /// Expansion is display state, so the live flags carry over onto the snapshot. Every stored
    /// field that differs from `previous` is written back.
    async fn restore(&mut self, previous: Vec<View>, mut restored: Vec<View>) {
        let expanded = previous
            .iter()
            .map(|v| (v.view_id().clone(), v.expanded()))
            .collect::<HashMap<_, _>>();
        for view in &mut restored {
            if let Some(&flag) = expanded.get(view.view_id()) {
                view.set_expanded(flag);
            }
        }
        self.history.replace_current(restored.clone());
        self.drop_stale_selection();
        self.persist_changes(&previous, &restored).await;
    }

    /// One awaited store call per view that needs syncing.
    ///
    /// Views with a position-tracking field always get their index written; other views only get
    /// their parent written when it changed. Name, zoom, pan and timestamp are written when they
    /// differ from the same view in `previous`. Failures do not stop the loop.
    async fn persist_changes(&mut self, previous: &[View], next: &[View]) {
        let previous_by_id = previous
            .iter()
            .map(|v| (v.view_id(), v))
            .collect::<HashMap<_, _>>();

        let mut attempted = 0usize;
        let mut failures = Vec::new();
        for (position, view) in next.iter().enumerate() {
            let before = previous_by_id.get(view.view_id()).copied();
            let patch = changed_fields(before, view, position);
            if patch.is_empty() {
                continue;
            }

            attempted += 1;
            if let Err(err) = self.store.update_view(view.view_id(), patch).await {
                tracing::warn!(view_id = %view.view_id(), error = %err, "failed to persist view change");
                failures.push(err);
            }
        }

        if let Some(first) = failures.first() {
            self.notices.error(format!(
                "{} of {attempted} view update(s) failed to sync: {first}",
                failures.len()
            ));
        }
    }

    async fn sync_patch(&mut self, view_id: &ViewId, patch: ViewPatch, what: &str) {
        if let Err(err) = self.store.update_view(view_id, patch).await {
            tracing::warn!(view_id = %view_id, error = %err, what, "failed to persist view update");
            self.notices.error(format!("Updated locally, but {what} failed to sync: {err}"));
        }
    }

    fn drop_stale_selection(&mut self) {
        if let Some(selected) = &self.selected {
            if ops::index_of(self.views(), selected).is_none() {
                self.selected = None;
            }
        }
    }

    fn reject<T>(&mut self, err: impl Into<ViewError>) -> Result<T, ViewError> {
        let err = err.into();
        let message = rejection_message(self.views(), &err);
        tracing::debug!(error = %err, "operation rejected");
        self.notices.warning(message);
        Err(err)
    }
}

/// The patch that brings the stored copy of `before` up to `view` at array index `position`.
fn changed_fields(before: Option<&View>, view: &View, position: usize) -> ViewPatch {
    let mut patch = if view.sort_order().is_some() {
        ViewPatch::placement(view, position)
    } else if before.map(View::parent_id) != Some(view.parent_id()) {
        ViewPatch {
            parent_id: Some(view.parent_id().cloned()),
            ..ViewPatch::default()
        }
    } else {
        ViewPatch::default()
    };

    let Some(before) = before else {
        return patch;
    };
    if before.name() != view.name() {
        patch.name = Some(view.name().to_owned());
    }
    if before.zoom() != view.zoom() {
        patch.zoom = Some(view.zoom());
    }
    if before.pan() != view.pan() {
        patch.pan = Some(view.pan());
    }
    if before.timestamp() != view.timestamp() {
        patch.timestamp = Some(view.timestamp());
    }
    patch
}

/// Keeps `sort_order` equal to the array index for views that track a position.
fn renumber(views: &mut [View]) {
    for (position, view) in views.iter_mut().enumerate() {
        if view.sort_order().is_some() {
            view.set_sort_order(Some(i64::try_from(position).unwrap_or(i64::MAX)));
        }
    }
}

fn rejection_message(views: &[View], err: &ViewError) -> String {
    let name_of = |view_id: &ViewId| {
        views
            .iter()
            .find(|v| v.view_id() == view_id)
            .map(|v| format!("\"{}\"", v.name()))
            .unwrap_or_else(|| format!("view {view_id}"))
    };

    match err {
        ViewError::EmptyName => "Please enter a name for the view".to_owned(),
        ViewError::EmptyComment => "Please enter some comment text".to_owned(),
        ViewError::NoSelection => "Select a view first".to_owned(),
        ViewError::Move(MoveError::NoPrecedingSibling { view_id }) => {
            format!("{} has no view above it to nest under", name_of(view_id))
        }
        ViewError::Move(MoveError::AlreadyRoot { view_id }) => {
            format!("{} is already at the top level", name_of(view_id))
        }
        ViewError::Move(MoveError::AtTop { view_id }) => {
            format!("{} is already first in its group", name_of(view_id))
        }
        ViewError::Move(MoveError::AtBottom { view_id }) => {
            format!("{} is already last in its group", name_of(view_id))
        }
        ViewError::Move(MoveError::SelfParent { view_id }) => {
            format!("{} cannot be nested in itself", name_of(view_id))
        }
        ViewError::Move(MoveError::WouldCycle { view_id, parent_id }) => format!(
            "{} cannot be nested under its own descendant {}",
            name_of(view_id),
            name_of(parent_id)
        ),
        other => {
            let mut message = other.to_string();
            if let Some(first) = message.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            message
        }
    }
}
