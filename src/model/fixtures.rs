// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::ViewId;
use super::view::{Pan, View};

pub(crate) fn vid(value: &str) -> ViewId {
    ViewId::new(value).expect("view id")
}

pub(crate) fn view(id: &str, name: &str, parent: Option<&str>) -> View {
    View::new(vid(id), name, 1.0, Pan::default()).with_parent(parent.map(vid))
}

/// `A, B, C` as three roots.
pub(crate) fn three_roots() -> Vec<View> {
    vec![view("1", "A", None), view("2", "B", None), view("3", "C", None)]
}

/// Two root subtrees with interleaved array positions:
///
/// ```text
/// A (1)          array: [1, 2, 11, 21, 12, 22]
///   A1 (11)
///   A2 (12)
/// B (2)
///   B1 (21)
///   B2 (22)
/// ```
pub(crate) fn interleaved_subtrees() -> Vec<View> {
    vec![
        view("1", "A", None),
        view("2", "B", None),
        view("11", "A1", Some("1")),
        view("21", "B1", Some("2")),
        view("12", "A2", Some("1")),
        view("22", "B2", Some("2")),
    ]
}

pub(crate) fn ids(views: &[View]) -> Vec<&str> {
    views.iter().map(|v| v.view_id().as_str()).collect()
}
