// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Panorama: a saved-viewport tree for diagram canvases.
//!
//! [`manager::ViewTreeManager`] owns the forest of saved views, its undo history and the sync
//! with a [`store::ViewStore`]. The pure tree edits live in [`ops`], and [`tui`] puts a terminal
//! panel on top.

pub mod drag;
pub mod history;
pub mod keys;
pub mod manager;
pub mod model;
pub mod notice;
pub mod ops;
pub mod sort;
pub mod store;
pub mod tui;
