// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{CommentId, DiagramId, ViewId};

/// A text annotation on a diagram, optionally pinned to one saved view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    comment_id: CommentId,
    diagram_id: DiagramId,
    text: String,
    view_id: Option<ViewId>,
    created_at: u64,
}

impl Comment {
    pub fn new(comment_id: CommentId, diagram_id: DiagramId, text: impl Into<String>) -> Self {
        Self {
            comment_id,
            diagram_id,
            text: text.into(),
            view_id: None,
            created_at: 0,
        }
    }

    pub fn comment_id(&self) -> &CommentId {
        &self.comment_id
    }

    pub fn diagram_id(&self) -> &DiagramId {
        &self.diagram_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn view_id(&self) -> Option<&ViewId> {
        self.view_id.as_ref()
    }

    pub fn set_view_id(&mut self, view_id: Option<ViewId>) {
        self.view_id = view_id;
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn set_created_at(&mut self, created_at: u64) {
        self.created_at = created_at;
    }

    pub fn is_linked_to(&self, view_id: &ViewId) -> bool {
        self.view_id.as_ref() == Some(view_id)
    }
}
