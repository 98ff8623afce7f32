// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use panorama::history::History;
use panorama::model::{Pan, View, ViewId};
use panorama::ops::{move_view, nest_under, reorder, validate_forest, MoveDirection};
use panorama::sort::{search_rows, visible_rows, SortMode, SortOrder};

mod profiler;

// Group names (`forest.ops`, `forest.rows`, `forest.history`) and case ids are kept stable so
// results stay comparable across refactors.

#[derive(Debug, Clone, Copy)]
enum Case {
    Small,
    Wide,
    Deep,
}

impl Case {
    fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Wide => "wide",
            Self::Deep => "deep",
        }
    }
}

fn view_id(idx: usize) -> ViewId {
    ViewId::new(format!("v{idx:05}")).expect("view id")
}

/// Deterministic forests: `small` is 40 flat views, `wide` 50 roots with 20 children each, and
/// `deep` a single chain of 400.
fn fixture(case: Case) -> Vec<View> {
    let make = |idx: usize, parent: Option<usize>| {
        View::new(
            view_id(idx),
            format!("view {:03} {}", (idx * 37) % 1000, idx % 7),
            1.0 + (idx % 9) as f64 * 0.25,
            Pan::new(idx as f64 * 3.0, idx as f64 * -2.0),
        )
        .with_parent(parent.map(view_id))
        .with_timestamp(1_700_000_000_000 + ((idx * 7919) % 10_000) as u64)
        .with_sort_order(Some(idx as i64))
    };

    let mut views = Vec::new();
    match case {
        Case::Small => {
            for idx in 0..40 {
                views.push(make(idx, None));
            }
        }
        Case::Wide => {
            let mut idx = 0;
            for _ in 0..50 {
                let root = idx;
                let mut view = make(root, None);
                view.set_expanded(true);
                views.push(view);
                idx += 1;
                for _ in 0..20 {
                    views.push(make(idx, Some(root)));
                    idx += 1;
                }
            }
        }
        Case::Deep => {
            for idx in 0..400 {
                let mut view = make(idx, idx.checked_sub(1));
                view.set_expanded(true);
                views.push(view);
            }
        }
    }
    views
}

fn checksum(views: &[View]) -> u64 {
    views.iter().fold(0u64, |acc, view| {
        let parent = view.parent_id().map_or(0, |id| id.as_str().len() as u64);
        acc.wrapping_mul(131)
            .wrapping_add(view.view_id().as_str().len() as u64)
            .wrapping_add(parent)
    })
}

fn bench_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest.ops");
    group.throughput(Throughput::Elements(1));

    for case in [Case::Small, Case::Wide, Case::Deep] {
        let views = fixture(case);
        let middle = view_id(views.len() / 2);
        let last = view_id(views.len() - 1);

        group.bench_function(format!("move_down/{}", case.id()), |b| {
            b.iter(|| {
                let next = move_view(black_box(&views), &middle, MoveDirection::Down);
                black_box(next.map(|next| checksum(&next)).unwrap_or(0))
            })
        });

        group.bench_function(format!("move_right/{}", case.id()), |b| {
            b.iter(|| {
                let next = move_view(black_box(&views), &last, MoveDirection::Right);
                black_box(next.map(|next| checksum(&next)).unwrap_or(0))
            })
        });

        group.bench_function(format!("nest_under/{}", case.id()), |b| {
            let root = view_id(0);
            b.iter(|| {
                let next = nest_under(black_box(&views), &last, &root);
                black_box(next.map(|next| checksum(&next)).unwrap_or(0))
            })
        });

        group.bench_function(format!("reorder/{}", case.id()), |b| {
            b.iter(|| {
                let next = reorder(black_box(&views), views.len() - 1, 0).expect("reorder");
                black_box(checksum(&next))
            })
        });

        group.bench_function(format!("validate/{}", case.id()), |b| {
            b.iter(|| black_box(validate_forest(black_box(&views)).is_ok()))
        });
    }

    group.finish();
}

fn bench_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest.rows");

    for case in [Case::Small, Case::Wide, Case::Deep] {
        let views = fixture(case);
        group.throughput(Throughput::Elements(views.len() as u64));

        group.bench_function(format!("manual/{}", case.id()), |b| {
            b.iter(|| black_box(visible_rows(black_box(&views), SortMode::Manual).len()))
        });

        group.bench_function(format!("name_desc/{}", case.id()), |b| {
            b.iter(|| {
                black_box(visible_rows(black_box(&views), SortMode::Name(SortOrder::Desc)).len())
            })
        });

        group.bench_function(format!("search/{}", case.id()), |b| {
            b.iter(|| black_box(search_rows(black_box(&views), "view 3").len()))
        });
    }

    group.finish();
}

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest.history");
    let views = fixture(Case::Wide);
    group.throughput(Throughput::Elements(60));

    group.bench_function("push_60_undo_all/wide", |b| {
        b.iter_batched(
            || History::new(views.clone()),
            |mut history| {
                for _ in 0..60 {
                    history.push(views.clone());
                }
                let mut undone = 0usize;
                while history.undo().is_some() {
                    undone += 1;
                }
                black_box(undone)
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = bench_ops, bench_rows, bench_history
}
criterion_main!(benches);
