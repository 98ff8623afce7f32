// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Display ordering and search over the view forest.
//!
//! Sorting only affects the order rows are shown in; it never touches `parent_id` or the array.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::model::{View, ViewId};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Array order.
    #[default]
    Manual,
    Name(SortOrder),
    Timestamp(SortOrder),
    Zoom(SortOrder),
}

impl SortMode {
    /// The next mode in the UI cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Manual => Self::Name(SortOrder::Asc),
            Self::Name(SortOrder::Asc) => Self::Name(SortOrder::Desc),
            Self::Name(SortOrder::Desc) => Self::Timestamp(SortOrder::Asc),
            Self::Timestamp(SortOrder::Asc) => Self::Timestamp(SortOrder::Desc),
            Self::Timestamp(SortOrder::Desc) => Self::Zoom(SortOrder::Asc),
            Self::Zoom(SortOrder::Asc) => Self::Zoom(SortOrder::Desc),
            Self::Zoom(SortOrder::Desc) => Self::Manual,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Name(SortOrder::Asc) => "name ↑",
            Self::Name(SortOrder::Desc) => "name ↓",
            Self::Timestamp(SortOrder::Asc) => "time ↑",
            Self::Timestamp(SortOrder::Desc) => "time ↓",
            Self::Zoom(SortOrder::Asc) => "zoom ↑",
            Self::Zoom(SortOrder::Desc) => "zoom ↓",
        }
    }

    fn compare(self, a: &View, b: &View) -> Ordering {
        let (ordering, order) = match self {
            Self::Manual => return Ordering::Equal,
            Self::Name(order) => (
                a.name()
                    .to_lowercase()
                    .cmp(&b.name().to_lowercase())
                    .then_with(|| a.name().cmp(b.name())),
                order,
            ),
            Self::Timestamp(order) => (a.timestamp().cmp(&b.timestamp()), order),
            Self::Zoom(order) => (a.zoom().total_cmp(&b.zoom()), order),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// One displayed line of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRow {
    /// Index into the view array.
    pub index: usize,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
}

/// Flattens the forest depth-first, descending only into expanded views.
///
/// Each sibling group (and the root level) is sorted independently with a stable sort, so ties
/// keep array order.
pub fn visible_rows(views: &[View], sort: SortMode) -> Vec<TreeRow> {
    let known: HashSet<&ViewId> = views.iter().map(|v| v.view_id()).collect();
    let mut roots = Vec::new();
    let mut children: HashMap<&ViewId, Vec<usize>> = HashMap::new();
    for (idx, view) in views.iter().enumerate() {
        match view
            .parent_id()
            .filter(|parent| *parent != view.view_id() && known.contains(parent))
        {
            Some(parent) => children.entry(parent).or_default().push(idx),
            None => roots.push(idx),
        }
    }

    let sort_group = |group: &mut Vec<usize>| {
        group.sort_by(|&a, &b| sort.compare(&views[a], &views[b]));
    };
    sort_group(&mut roots);
    for group in children.values_mut() {
        sort_group(group);
    }

    let mut rows = Vec::with_capacity(views.len());
    let mut visited = HashSet::new();
    let mut stack = roots.into_iter().rev().map(|idx| (idx, 0usize)).collect::<Vec<_>>();
    while let Some((idx, depth)) = stack.pop() {
        if !visited.insert(idx) {
            continue;
        }
        let view = &views[idx];
        let kids = children.get(view.view_id());
        let has_children = kids.is_some_and(|kids| !kids.is_empty());
        rows.push(TreeRow {
            index: idx,
            depth,
            has_children,
            expanded: view.expanded(),
        });
        if has_children && view.expanded() {
            if let Some(kids) = kids {
                stack.extend(kids.iter().rev().map(|&kid| (kid, depth + 1)));
            }
        }
    }
    rows
}

/// Flat fuzzy search by name, best match first (ties keep array order).
pub fn search_rows(views: &[View], query: &str) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut scored = views
        .iter()
        .enumerate()
        .filter_map(|(idx, view)| {
            fuzzy_score(&needle, &view.name().to_lowercase()).map(|score| (score, idx))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|(score_a, idx_a), (score_b, idx_b)| {
        score_b.cmp(score_a).then_with(|| idx_a.cmp(idx_b))
    });
    scored.into_iter().map(|(_, idx)| idx).collect()
}

#[derive(Debug, Clone, Copy)]
struct SubsequenceStats {
    first: usize,
    span: usize,
    consecutive: usize,
    start_boundary: bool,
}

fn fuzzy_score(needle: &str, haystack: &str) -> Option<i64> {
    let subseq = subsequence_stats(needle, haystack)?;
    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());
    let ratio_score = (ratio * 1000.0).round() as i64;

    let mut score = ratio_score;
    score -= subseq.span as i64;
    score -= (subseq.first as i64) / 4;
    score += (subseq.consecutive as i64) * 40;
    if subseq.start_boundary {
        score += 150;
    }
    if haystack.contains(needle) {
        score += 2000;
    }
    if haystack == needle {
        score += 5000;
    }

    Some(score)
}

fn subsequence_stats(needle: &str, haystack: &str) -> Option<SubsequenceStats> {
    let mut needle_iter = needle.chars().peekable();
    let mut first: Option<usize> = None;
    let mut last: usize = 0;
    let mut prev_match: Option<usize> = None;
    let mut consecutive: usize = 0;
    let mut start_boundary = false;
    let mut prev_hay: Option<char> = None;

    for (idx, ch) in haystack.chars().enumerate() {
        let Some(&want) = needle_iter.peek() else {
            break;
        };

        if ch == want {
            needle_iter.next();
            if first.is_none() {
                first = Some(idx);
                start_boundary = prev_hay.map_or(true, is_boundary_char);
            }
            if prev_match.is_some_and(|prev| idx == prev + 1) {
                consecutive += 1;
            }
            prev_match = Some(idx);
            last = idx;
        }

        prev_hay = Some(ch);
    }

    if needle_iter.peek().is_some() {
        return None;
    }

    let first = first?;
    Some(SubsequenceStats {
        first,
        span: last.saturating_sub(first).saturating_add(1),
        consecutive,
        start_boundary,
    })
}

fn is_boundary_char(ch: char) -> bool {
    matches!(ch, '/' | ':' | '-' | '_' | ' ' | '.')
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{search_rows, visible_rows, SortMode, SortOrder};
    use crate::model::fixtures::{interleaved_subtrees, view};
    use crate::model::View;

    fn names(views: &[View], rows: &[usize]) -> Vec<String> {
        rows.iter().map(|&idx| views[idx].name().to_owned()).collect()
    }

    fn expanded(mut views: Vec<View>) -> Vec<View> {
        for v in &mut views {
            v.set_expanded(true);
        }
        views
    }

    #[test]
    fn manual_rows_follow_array_order_depth_first() {
        let views = expanded(interleaved_subtrees());

        let rows = visible_rows(&views, SortMode::Manual);

        let order = rows.iter().map(|r| r.index).collect::<Vec<_>>();
        assert_eq!(names(&views, &order), ["A", "A1", "A2", "B", "B1", "B2"]);
        assert_eq!(rows.iter().map(|r| r.depth).collect::<Vec<_>>(), [0, 1, 1, 0, 1, 1]);
        assert!(rows[0].has_children);
        assert!(!rows[1].has_children);
    }

    #[test]
    fn collapsed_groups_hide_children() {
        let mut views = interleaved_subtrees();
        views[0].set_expanded(true);

        let rows = visible_rows(&views, SortMode::Manual);
        let order = rows.iter().map(|r| r.index).collect::<Vec<_>>();

        assert_eq!(names(&views, &order), ["A", "A1", "A2", "B"]);
        assert!(!rows[3].expanded);
    }

    #[rstest]
    #[case(SortMode::Name(SortOrder::Asc), ["alpha", "Beta", "gamma"])]
    #[case(SortMode::Name(SortOrder::Desc), ["gamma", "Beta", "alpha"])]
    #[case(SortMode::Timestamp(SortOrder::Asc), ["Beta", "gamma", "alpha"])]
    #[case(SortMode::Zoom(SortOrder::Desc), ["alpha", "gamma", "Beta"])]
    fn sorting_applies_within_each_level(#[case] sort: SortMode, #[case] expected: [&str; 3]) {
        let mut views = vec![
            view("g", "gamma", None).with_timestamp(20),
            view("a", "alpha", None).with_timestamp(30),
            view("b", "Beta", None).with_timestamp(10),
        ];
        views[0].set_zoom(2.0);
        views[1].set_zoom(3.0);
        views[2].set_zoom(1.0);
        // A child group that must stay under its parent whatever the sort.
        views.push(view("a2", "zz", Some("a")));
        views.push(view("a1", "aa", Some("a")));
        views[1].set_expanded(true);

        let rows = visible_rows(&views, sort);
        let roots = rows.iter().filter(|r| r.depth == 0).map(|r| r.index).collect::<Vec<_>>();
        assert_eq!(names(&views, &roots), expected);

        let alpha_pos = rows.iter().position(|r| r.index == 1).expect("alpha row");
        assert_eq!(rows[alpha_pos + 1].depth, 1);
        assert_eq!(rows[alpha_pos + 2].depth, 1);
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn sort_mode_cycle_returns_to_manual() {
        let mut mode = SortMode::Manual;
        for _ in 0..7 {
            mode = mode.next();
        }
        assert_eq!(mode, SortMode::Manual);
    }

    #[test]
    fn orphans_render_as_roots() {
        let views = vec![view("11", "Orphan", Some("gone")), view("2", "B", None)];
        let rows = visible_rows(&views, SortMode::Manual);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.depth == 0));
    }

    #[test]
    fn search_ranks_exact_and_prefix_matches_first() {
        let views = vec![
            view("1", "Overview", None),
            view("2", "login flow", None),
            view("3", "Login", None),
            view("4", "unrelated", None),
        ];

        let hits = search_rows(&views, "login");

        assert_eq!(names(&views, &hits), ["Login", "login flow"]);
        assert!(search_rows(&views, "   ").is_empty());
    }
}
