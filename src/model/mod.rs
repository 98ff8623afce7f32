// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A diagram owns a forest of saved views (zoom + pan snapshots) and a list of comments that may
//! be pinned to a view.

pub mod comment;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod view;
pub mod viewport;

pub use comment::Comment;
pub use ids::{CommentId, DiagramId, Id, IdError, OwnerId, ViewId};
pub use view::{now_millis, Pan, View};
pub use viewport::{clamp_zoom, Viewport, ViewportDelta, MAX_ZOOM, MIN_ZOOM};
