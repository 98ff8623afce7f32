// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Drag gestures over the view tree.
//!
//! A drag that ends far enough to the right of where it started asks for nesting under the row it
//! was dropped on; anything else is a plain reorder to the drop row's index.

use crate::model::{Pan, ViewId};

/// Horizontal displacement (layout units) in the nesting direction that turns a drop into a nest.
pub const DEFAULT_NEST_THRESHOLD: f64 = 20.0;

/// The row currently under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub view_id: ViewId,
    pub index: usize,
}

/// Live feedback while dragging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragHint {
    Nest { target: ViewId },
    Reorder,
}

/// What a finished drag asks the manager to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropAction {
    Nest { view_id: ViewId, target: ViewId },
    Reorder { view_id: ViewId, to_index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    view_id: ViewId,
    origin: Pan,
    threshold: f64,
    hint: DragHint,
}

impl DragGesture {
    pub fn begin(view_id: ViewId, origin: Pan) -> Self {
        Self::with_threshold(view_id, origin, DEFAULT_NEST_THRESHOLD)
    }

    pub fn with_threshold(view_id: ViewId, origin: Pan, threshold: f64) -> Self {
        Self {
            view_id,
            origin,
            threshold,
            hint: DragHint::Reorder,
        }
    }

    pub fn view_id(&self) -> &ViewId {
        &self.view_id
    }

    pub fn hint(&self) -> &DragHint {
        &self.hint
    }

    pub fn update(&mut self, pointer: Pan, hover: Option<&DropTarget>) -> &DragHint {
        self.hint = match hover {
            Some(target) if self.wants_nest(pointer) && target.view_id != self.view_id => {
                DragHint::Nest {
                    target: target.view_id.clone(),
                }
            }
            _ => DragHint::Reorder,
        };
        &self.hint
    }

    pub fn finish(self, pointer: Pan, drop: Option<&DropTarget>) -> Option<DropAction> {
        let target = drop?;
        if target.view_id == self.view_id {
            return None;
        }
        if self.wants_nest(pointer) {
            return Some(DropAction::Nest {
                view_id: self.view_id,
                target: target.view_id.clone(),
            });
        }
        Some(DropAction::Reorder {
            view_id: self.view_id,
            to_index: target.index,
        })
    }

    fn wants_nest(&self, pointer: Pan) -> bool {
        pointer.x - self.origin.x >= self.threshold
    }
}
