// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Structural operations over a forest of views.
//!
//! Every operation takes the current array by reference and returns a new array, leaving the
//! input untouched. This keeps each result usable as an immutable history snapshot.
//!
//! A view whose `parent_id` names an id that is not in the array is treated as a root (its
//! *effective* parent is `None`). Stored parent ids are never rewritten to achieve this.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::model::{View, ViewId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDirection {
    pub fn label(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    NotFound { view_id: ViewId },
    NoPrecedingSibling { view_id: ViewId },
    AlreadyRoot { view_id: ViewId },
    AtTop { view_id: ViewId },
    AtBottom { view_id: ViewId },
    SelfParent { view_id: ViewId },
    WouldCycle { view_id: ViewId, parent_id: ViewId },
    IndexOutOfRange { index: usize, len: usize },
    DuplicateId { view_id: ViewId },
    Cycle { view_id: ViewId },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { view_id } => write!(f, "view not found (id={view_id})"),
            Self::NoPrecedingSibling { view_id } => {
                write!(f, "view {view_id} has no preceding sibling to nest under")
            }
            Self::AlreadyRoot { view_id } => {
                write!(f, "view {view_id} is already at the top level")
            }
            Self::AtTop { view_id } => write!(f, "view {view_id} is already first in its group"),
            Self::AtBottom { view_id } => write!(f, "view {view_id} is already last in its group"),
            Self::SelfParent { view_id } => write!(f, "view {view_id} cannot be nested in itself"),
            Self::WouldCycle { view_id, parent_id } => write!(
                f,
                "cannot nest view {view_id} under its own descendant {parent_id}"
            ),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range (len={len})")
            }
            Self::DuplicateId { view_id } => write!(f, "duplicate view id {view_id}"),
            Self::Cycle { view_id } => write!(f, "parent chain of view {view_id} forms a cycle"),
        }
    }
}

impl std::error::Error for MoveError {}

pub fn index_of(views: &[View], view_id: &ViewId) -> Option<usize> {
    views.iter().position(|v| v.view_id() == view_id)
}

/// The parent a view is displayed under: its `parent_id` if that id exists, otherwise `None`.
pub fn effective_parent<'a>(views: &'a [View], view: &'a View) -> Option<&'a ViewId> {
    let parent_id = view.parent_id()?;
    if parent_id == view.view_id() {
        return None;
    }
    views
        .iter()
        .any(|v| v.view_id() == parent_id)
        .then_some(parent_id)
}

/// Indices of views displayed at the top level, in array order.
pub fn root_indices(views: &[View]) -> Vec<usize> {
    let known = id_set(views);
    views
        .iter()
        .enumerate()
        .filter(|(_, v)| effective_parent_in(&known, v).is_none())
        .map(|(idx, _)| idx)
        .collect()
}

/// Indices of the direct children of `view_id`, in array order.
pub fn children_of(views: &[View], view_id: &ViewId) -> Vec<usize> {
    let known = id_set(views);
    views
        .iter()
        .enumerate()
        .filter(|(_, v)| effective_parent_in(&known, v) == Some(view_id))
        .map(|(idx, _)| idx)
        .collect()
}

pub fn has_children(views: &[View], view_id: &ViewId) -> bool {
    views
        .iter()
        .any(|v| v.parent_id() == Some(view_id) && v.view_id() != view_id)
}

/// Indices of the views sharing `view_id`'s effective parent (including itself), in array order.
pub fn siblings_of(views: &[View], view_id: &ViewId) -> Result<Vec<usize>, MoveError> {
    let idx = index_of(views, view_id).ok_or_else(|| MoveError::NotFound {
        view_id: view_id.clone(),
    })?;
    let known = id_set(views);
    let parent = effective_parent_in(&known, &views[idx]);
    Ok(views
        .iter()
        .enumerate()
        .filter(|(_, v)| effective_parent_in(&known, v) == parent)
        .map(|(idx, _)| idx)
        .collect())
}

/// The view itself plus all transitive descendants.
///
/// Descendants are gathered by repeatedly filtering the array for views whose parent is already
/// in the set. The set membership check also terminates on malformed (cyclic) input.
pub fn subtree_ids(views: &[View], view_id: &ViewId) -> HashSet<ViewId> {
    let mut members = HashSet::new();
    if index_of(views, view_id).is_none() {
        return members;
    }
    members.insert(view_id.clone());

    loop {
        let next = views
            .iter()
            .filter(|v| !members.contains(v.view_id()))
            .filter(|v| v.parent_id().is_some_and(|parent| members.contains(parent)))
            .map(|v| v.view_id().clone())
            .collect::<Vec<_>>();
        if next.is_empty() {
            return members;
        }
        members.extend(next);
    }
}

/// Checks the forest invariant: unique ids and no `parent_id` cycles.
pub fn validate_forest(views: &[View]) -> Result<(), MoveError> {
    let mut parents: HashMap<&ViewId, Option<&ViewId>> = HashMap::with_capacity(views.len());
    for view in views {
        if parents.insert(view.view_id(), view.parent_id()).is_some() {
            return Err(MoveError::DuplicateId {
                view_id: view.view_id().clone(),
            });
        }
    }

    for view in views {
        let mut current = view.parent_id();
        let mut steps = 0usize;
        while let Some(parent_id) = current {
            if parent_id == view.view_id() || steps > views.len() {
                return Err(MoveError::Cycle {
                    view_id: view.view_id().clone(),
                });
            }
            steps += 1;
            current = parents.get(parent_id).copied().flatten();
        }
    }

    Ok(())
}

/// Applies a directional move (see [`MoveDirection`]).
pub fn move_view(
    views: &[View],
    view_id: &ViewId,
    direction: MoveDirection,
) -> Result<Vec<View>, MoveError> {
    match direction {
        MoveDirection::Right => nest_under_preceding_sibling(views, view_id),
        MoveDirection::Left => unnest(views, view_id),
        MoveDirection::Up => swap_with_adjacent_sibling(views, view_id, false),
        MoveDirection::Down => swap_with_adjacent_sibling(views, view_id, true),
    }
}

/// Re-parents `view_id` under `parent_id` and expands the new parent. Array order is unchanged.
pub fn nest_under(
    views: &[View],
    view_id: &ViewId,
    parent_id: &ViewId,
) -> Result<Vec<View>, MoveError> {
    let idx = index_of(views, view_id).ok_or_else(|| MoveError::NotFound {
        view_id: view_id.clone(),
    })?;
    let parent_idx = index_of(views, parent_id).ok_or_else(|| MoveError::NotFound {
        view_id: parent_id.clone(),
    })?;
    if idx == parent_idx {
        return Err(MoveError::SelfParent {
            view_id: view_id.clone(),
        });
    }
    if subtree_ids(views, view_id).contains(parent_id) {
        return Err(MoveError::WouldCycle {
            view_id: view_id.clone(),
            parent_id: parent_id.clone(),
        });
    }

    let mut next = views.to_vec();
    next[idx].set_parent_id(Some(parent_id.clone()));
    next[parent_idx].set_expanded(true);
    Ok(next)
}

/// Moves the element at `from` to index `to` (array splice). Parents are untouched.
pub fn reorder(views: &[View], from: usize, to: usize) -> Result<Vec<View>, MoveError> {
    let len = views.len();
    if from >= len {
        return Err(MoveError::IndexOutOfRange { index: from, len });
    }
    if to >= len {
        return Err(MoveError::IndexOutOfRange { index: to, len });
    }

    let mut next = views.to_vec();
    let moved = next.remove(from);
    next.insert(to, moved);
    Ok(next)
}

/// Removes exactly one view. Children keep their (now dangling) `parent_id` and are displayed as
/// roots until re-parented.
pub fn remove_view(views: &[View], view_id: &ViewId) -> Result<Vec<View>, MoveError> {
    let idx = index_of(views, view_id).ok_or_else(|| MoveError::NotFound {
        view_id: view_id.clone(),
    })?;
    let mut next = views.to_vec();
    next.remove(idx);
    Ok(next)
}

pub fn rename_view(views: &[View], view_id: &ViewId, name: &str) -> Result<Vec<View>, MoveError> {
    let idx = index_of(views, view_id).ok_or_else(|| MoveError::NotFound {
        view_id: view_id.clone(),
    })?;
    let mut next = views.to_vec();
    next[idx].set_name(name);
    Ok(next)
}

// Directional move helpers.
include!("ops_impl.rs");
