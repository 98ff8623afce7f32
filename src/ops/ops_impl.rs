// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Directional move implementation used by `move_view`.
/// Keeps `ops::mod` focused on the public operation surface.
fn id_set(views: &[View]) -> HashSet<&ViewId> {
    views.iter().map(|v| v.view_id()).collect()
}

fn effective_parent_in<'a>(known: &HashSet<&ViewId>, view: &'a View) -> Option<&'a ViewId> {
    view.parent_id()
        .filter(|parent| *parent != view.view_id() && known.contains(parent))
}

fn nest_under_preceding_sibling(views: &[View], view_id: &ViewId) -> Result<Vec<View>, MoveError> {
    let siblings = siblings_of(views, view_id)?;
    let position = sibling_position(views, &siblings, view_id);
    let Some(preceding) = position.checked_sub(1).map(|p| siblings[p]) else {
        return Err(MoveError::NoPrecedingSibling {
            view_id: view_id.clone(),
        });
    };

    let parent_id = views[preceding].view_id().clone();
    nest_under(views, view_id, &parent_id)
}

fn unnest(views: &[View], view_id: &ViewId) -> Result<Vec<View>, MoveError> {
    let idx = index_of(views, view_id).ok_or_else(|| MoveError::NotFound {
        view_id: view_id.clone(),
    })?;
    let known = id_set(views);
    let Some(parent_id) = effective_parent_in(&known, &views[idx]) else {
        return Err(MoveError::AlreadyRoot {
            view_id: view_id.clone(),
        });
    };
    let grandparent = index_of(views, parent_id)
        .and_then(|parent_idx| effective_parent_in(&known, &views[parent_idx]))
        .cloned();

    let mut next = views.to_vec();
    next[idx].set_parent_id(grandparent);
    Ok(next)
}

fn swap_with_adjacent_sibling(
    views: &[View],
    view_id: &ViewId,
    downward: bool,
) -> Result<Vec<View>, MoveError> {
    let siblings = siblings_of(views, view_id)?;
    let position = sibling_position(views, &siblings, view_id);

    let (first, second) = if downward {
        let Some(&next_idx) = siblings.get(position + 1) else {
            return Err(MoveError::AtBottom {
                view_id: view_id.clone(),
            });
        };
        (view_id.clone(), views[next_idx].view_id().clone())
    } else {
        let Some(prev_idx) = position.checked_sub(1).map(|p| siblings[p]) else {
            return Err(MoveError::AtTop {
                view_id: view_id.clone(),
            });
        };
        (views[prev_idx].view_id().clone(), view_id.clone())
    };

    Ok(swap_subtrees(views, &first, &second))
}

fn sibling_position(views: &[View], siblings: &[usize], view_id: &ViewId) -> usize {
    siblings
        .iter()
        .position(|&idx| views[idx].view_id() == view_id)
        .unwrap_or(0)
}

/// Puts the subtree of `second` in front of the subtree of `first`.
///
/// Only the array slots occupied by the two subtrees are rewritten; each subtree keeps its
/// internal relative order and every other view keeps its index.
fn swap_subtrees(views: &[View], first: &ViewId, second: &ViewId) -> Vec<View> {
    let first_members = subtree_ids(views, first);
    let second_members = subtree_ids(views, second);

    let mut slots = Vec::new();
    let mut first_views = Vec::new();
    let mut second_views = Vec::new();
    for (idx, view) in views.iter().enumerate() {
        if second_members.contains(view.view_id()) {
            slots.push(idx);
            second_views.push(view.clone());
        } else if first_members.contains(view.view_id()) {
            slots.push(idx);
            first_views.push(view.clone());
        }
    }

    let mut next = views.to_vec();
    for (slot, view) in slots.into_iter().zip(second_views.into_iter().chain(first_views)) {
        next[slot] = view;
    }
    next
}
