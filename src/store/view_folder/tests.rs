// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};

use super::{discard_on_error, write_atomic, ViewFolder, WriteDurability, VIEWS_FILENAME};
use crate::model::{CommentId, DiagramId, OwnerId, Pan, ViewId};
use crate::store::{NewComment, NewView, StoreError, ViewPatch, ViewStore};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("panorama-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

struct ViewFolderTestCtx {
    _tmp: TempDir,
    folder: ViewFolder,
    diagram_id: DiagramId,
    owner_id: OwnerId,
}

impl ViewFolderTestCtx {
    fn new(prefix: &str) -> Self {
        let tmp = TempDir::new(prefix);
        let folder = ViewFolder::new(tmp.path().join("views"));
        Self {
            _tmp: tmp,
            folder,
            diagram_id: DiagramId::new("d1").unwrap(),
            owner_id: OwnerId::new("alice").unwrap(),
        }
    }

    fn new_view(&self, name: &str, sort_order: i64) -> NewView {
        NewView {
            diagram_id: self.diagram_id.clone(),
            owner_id: self.owner_id.clone(),
            name: name.to_owned(),
            zoom: 1.5,
            pan: Pan::new(10.0, -4.0),
            sort_order,
        }
    }
}

#[fixture]
fn ctx() -> ViewFolderTestCtx {
    ViewFolderTestCtx::new("view-folder")
}

#[rstest]
#[tokio::test]
async fn list_on_missing_folder_is_empty(ctx: ViewFolderTestCtx) {
    let views = ctx.folder.list_views(&ctx.diagram_id, &ctx.owner_id).await.unwrap();
    assert!(views.is_empty());
    assert!(!ctx.folder.views_path().exists());
}

#[rstest]
#[tokio::test]
async fn created_views_are_persisted_and_listed_by_sort_order(ctx: ViewFolderTestCtx) {
    let folder = &ctx.folder;
    let second = folder.create_view(ctx.new_view("Second", 1)).await.unwrap();
    let first = folder.create_view(ctx.new_view("First", 0)).await.unwrap();
    assert_ne!(first.view_id(), second.view_id());

    let reopened = ViewFolder::new(folder.root());
    let views = reopened.list_views(&ctx.diagram_id, &ctx.owner_id).await.unwrap();

    let names = views.iter().map(|v| v.name()).collect::<Vec<_>>();
    assert_eq!(names, ["First", "Second"]);
    assert_eq!(views[0].zoom(), 1.5);
    assert_eq!(views[0].pan(), Pan::new(10.0, -4.0));
    assert!(views[0].timestamp() > 0);
}

#[rstest]
#[tokio::test]
async fn views_are_scoped_by_diagram_and_owner(ctx: ViewFolderTestCtx) {
    let folder = &ctx.folder;
    folder.create_view(ctx.new_view("Mine", 0)).await.unwrap();
    let mut other = ctx.new_view("Theirs", 0);
    other.owner_id = OwnerId::new("bob").unwrap();
    folder.create_view(other).await.unwrap();

    let mine = folder.list_views(&ctx.diagram_id, &ctx.owner_id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name(), "Mine");

    let other_diagram = DiagramId::new("d2").unwrap();
    assert!(folder.list_views(&other_diagram, &ctx.owner_id).await.unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn update_applies_patch_including_parent_clear(ctx: ViewFolderTestCtx) {
    let folder = &ctx.folder;
    let parent = folder.create_view(ctx.new_view("Parent", 0)).await.unwrap();
    let child = folder.create_view(ctx.new_view("Child", 1)).await.unwrap();

    let updated = folder
        .update_view(
            child.view_id(),
            ViewPatch {
                name: Some("Renamed".to_owned()),
                parent_id: Some(Some(parent.view_id().clone())),
                sort_order: Some(5),
                ..ViewPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name(), "Renamed");
    assert_eq!(updated.parent_id(), Some(parent.view_id()));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(folder.views_path()).unwrap()).unwrap();
    assert_eq!(json["views"][1]["parent_id"].as_str(), Some(parent.view_id().as_str()));
    assert_eq!(json["views"][1]["sort_order"].as_i64(), Some(5));

    let cleared = folder
        .update_view(
            child.view_id(),
            ViewPatch {
                parent_id: Some(None),
                ..ViewPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.parent_id(), None);
}

#[rstest]
#[tokio::test]
async fn deleted_ids_are_never_reused(ctx: ViewFolderTestCtx) {
    let folder = &ctx.folder;
    let first = folder.create_view(ctx.new_view("One", 0)).await.unwrap();
    folder.delete_view(first.view_id()).await.unwrap();

    let second = folder.create_view(ctx.new_view("Two", 0)).await.unwrap();
    assert_ne!(first.view_id(), second.view_id());

    let err = folder.delete_view(first.view_id()).await.unwrap_err();
    assert!(matches!(err, StoreError::ViewNotFound { .. }));
}

#[rstest]
#[tokio::test]
async fn comments_round_trip_with_view_links(ctx: ViewFolderTestCtx) {
    let folder = &ctx.folder;
    let view = folder.create_view(ctx.new_view("Pinned", 0)).await.unwrap();

    let linked = folder
        .create_comment(NewComment {
            diagram_id: ctx.diagram_id.clone(),
            text: "look here".to_owned(),
            view_id: Some(view.view_id().clone()),
        })
        .await
        .unwrap();
    folder
        .create_comment(NewComment {
            diagram_id: ctx.diagram_id.clone(),
            text: "general".to_owned(),
            view_id: None,
        })
        .await
        .unwrap();

    let comments = folder.list_comments(&ctx.diagram_id).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert!(comments[0].is_linked_to(view.view_id()));
    assert_eq!(comments[1].view_id(), None);

    folder.delete_comment(linked.comment_id()).await.unwrap();
    let missing = CommentId::new("c999").unwrap();
    assert!(matches!(
        folder.delete_comment(&missing).await.unwrap_err(),
        StoreError::CommentNotFound { .. }
    ));
    assert_eq!(folder.list_comments(&ctx.diagram_id).await.unwrap().len(), 1);
}

#[rstest]
#[tokio::test]
async fn load_rejects_invalid_ids(ctx: ViewFolderTestCtx) {
    std::fs::create_dir_all(ctx.folder.root()).unwrap();
    std::fs::write(
        ctx.folder.root().join(VIEWS_FILENAME),
        r#"{
  "views": [
    {
      "view_id": "bad/id",
      "diagram_id": "d1",
      "owner_id": "alice",
      "name": "Broken",
      "zoom": 1.0,
      "pan_x": 0.0,
      "pan_y": 0.0,
      "timestamp": 1
    }
  ]
}"#,
    )
    .unwrap();

    let err = ctx.folder.list_views(&ctx.diagram_id, &ctx.owner_id).await.unwrap_err();
    match err {
        StoreError::InvalidId { field, .. } => assert_eq!(field, "view_id"),
        other => panic!("expected InvalidId, got: {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn update_unknown_view_fails(ctx: ViewFolderTestCtx) {
    let missing = ViewId::new("v404").unwrap();
    let err = ctx.folder.update_view(&missing, ViewPatch::default()).await.unwrap_err();
    assert!(matches!(err, StoreError::ViewNotFound { .. }));
}

#[cfg(unix)]
#[rstest]
#[tokio::test]
async fn refuses_to_write_through_symlink(ctx: ViewFolderTestCtx) {
    let root = ctx.folder.root().to_path_buf();
    std::fs::create_dir_all(&root).unwrap();
    let target = root.join("elsewhere.json");
    std::fs::write(&target, "{}").unwrap();
    std::os::unix::fs::symlink(&target, root.join(VIEWS_FILENAME)).unwrap();

    let err = ctx.folder.create_view(ctx.new_view("Nope", 0)).await.unwrap_err();
    assert!(matches!(err, StoreError::SymlinkRefused { .. }));
}

#[rstest]
#[tokio::test]
async fn durable_writes_produce_the_same_file(ctx: ViewFolderTestCtx) {
    let folder = ctx.folder.clone().with_durability(WriteDurability::Durable);
    assert_eq!(folder.durability(), WriteDurability::Durable);

    folder.create_view(ctx.new_view("Durable", 0)).await.unwrap();

    let raw = std::fs::read_to_string(folder.views_path()).unwrap();
    assert!(raw.ends_with('\n'));
    assert_eq!(folder.list_views(&ctx.diagram_id, &ctx.owner_id).await.unwrap().len(), 1);
}

fn temp_files(dir: &std::path::Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".panorama.tmp."))
        .collect()
}

#[test]
fn failed_write_step_discards_the_temp_file() {
    let tmp = TempDir::new("discard");
    let tmp_path = tmp.path().join(".panorama.tmp.panorama-views.json.1");
    std::fs::write(&tmp_path, "{\"views\":").unwrap();

    let failed: Result<(), StoreError> = Err(StoreError::Io {
        path: tmp_path.clone(),
        source: std::io::Error::other("disk full"),
    });
    assert!(discard_on_error(&tmp_path, failed).is_err());
    assert!(!tmp_path.exists());

    std::fs::write(&tmp_path, "{}").unwrap();
    discard_on_error(&tmp_path, Ok(())).unwrap();
    assert!(tmp_path.exists());
}

#[test]
fn failed_rename_leaves_no_temp_file() {
    let tmp = TempDir::new("rename");
    let root = tmp.path().join("views");
    let target = root.join(VIEWS_FILENAME);
    std::fs::create_dir_all(target.join("occupied")).unwrap();

    let err = write_atomic(&root, &target, b"{}", WriteDurability::Durable).unwrap_err();

    assert!(matches!(err, StoreError::Io { .. }));
    assert!(temp_files(&root).is_empty());
}

#[rstest]
#[tokio::test]
async fn successful_writes_leave_no_temp_file(ctx: ViewFolderTestCtx) {
    ctx.folder.create_view(ctx.new_view("Clean", 0)).await.unwrap();

    assert!(temp_files(ctx.folder.root()).is_empty());
}
