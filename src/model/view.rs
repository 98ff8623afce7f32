// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::{SystemTime, UNIX_EPOCH};

use super::ids::ViewId;

/// 2D pan offset of a viewport, in diagram layout units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pan {
    pub x: f64,
    pub y: f64,
}

impl Pan {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A named viewport snapshot.
///
/// Views form a forest through `parent_id`. Sibling order is the order of the owning array;
/// `sort_order` only mirrors that order for stores that persist positions.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    view_id: ViewId,
    name: String,
    zoom: f64,
    pan: Pan,
    timestamp: u64,
    parent_id: Option<ViewId>,
    expanded: bool,
    sort_order: Option<i64>,
}

impl View {
    pub fn new(view_id: ViewId, name: impl Into<String>, zoom: f64, pan: Pan) -> Self {
        Self {
            view_id,
            name: name.into(),
            zoom,
            pan,
            timestamp: 0,
            parent_id: None,
            expanded: false,
            sort_order: None,
        }
    }

    pub fn view_id(&self) -> &ViewId {
        &self.view_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    pub fn pan(&self) -> Pan {
        self.pan
    }

    pub fn set_pan(&mut self, pan: Pan) {
        self.pan = pan;
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    pub fn parent_id(&self) -> Option<&ViewId> {
        self.parent_id.as_ref()
    }

    pub fn set_parent_id(&mut self, parent_id: Option<ViewId>) {
        self.parent_id = parent_id;
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    pub fn sort_order(&self) -> Option<i64> {
        self.sort_order
    }

    pub fn set_sort_order(&mut self, sort_order: Option<i64>) {
        self.sort_order = sort_order;
    }

    pub fn with_parent(mut self, parent_id: Option<ViewId>) -> Self {
        self.parent_id = parent_id;
        self
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_sort_order(mut self, sort_order: Option<i64>) -> Self {
        self.sort_order = sort_order;
        self
    }
}

/// Milliseconds since the Unix epoch, saturating to zero on a clock before 1970.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
