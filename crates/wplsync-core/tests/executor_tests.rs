//! Tests for applying a sync plan

use pretty_assertions::assert_eq;
use std::fs;
use wplsync_core::{
    Classifier, Error, Executor, Interrupt, Inventory, SyncOptions, reconcile, scan_folder,
};
use wplsync_fs::RelativePath;
use wplsync_test_utils::TestTree;

struct Fixture {
    source: TestTree,
    target: TestTree,
}

impl Fixture {
    /// Source with a new and a changed file, target with an orphan.
    fn new() -> Self {
        let source = TestTree::new();
        let target = TestTree::new();
        source.write_with_mtime("Album/01.mp3", "unchanged", 1_000);
        source.write_with_mtime("Album/02.mp3", "changed in source", 2_000);
        source.write_with_mtime("New/03.mp3", "brand new", 3_000);
        target.write_with_mtime("Album/01.mp3", "unchanged", 1_000);
        target.write_with_mtime("Album/02.mp3", "stale", 1_000);
        target.write_with_mtime("Old/99.mp3", "orphan", 1_000);
        Self { source, target }
    }

    fn options(&self) -> SyncOptions {
        SyncOptions::new(self.source.root(), self.target.root()).unwrap()
    }

    fn inventories(&self, options: &SyncOptions) -> (Inventory, Inventory) {
        let classifier = Classifier::with_defaults().unwrap();
        let interrupt = Interrupt::new();
        (
            scan_folder(&options.source_folder, &classifier, &interrupt).unwrap(),
            scan_folder(&options.target_folder, &classifier, &interrupt).unwrap(),
        )
    }
}

#[test]
fn dry_run_reports_without_touching_disk() {
    let fixture = Fixture::new();
    let mut options = fixture.options();
    options.delete_orphans = true;
    let (source, target) = fixture.inventories(&options);
    let plan = reconcile(&source, &target);
    let before = fixture.target.files();

    let applied = Executor::new(&options, &Interrupt::new())
        .apply(&plan, &source, &target)
        .unwrap();

    assert_eq!(applied.created, vec![RelativePath::new("New/03.mp3")]);
    assert_eq!(applied.updated, vec![RelativePath::new("Album/02.mp3")]);
    assert_eq!(applied.deleted, vec![RelativePath::new("Old/99.mp3")]);
    assert_eq!(applied.bytes_copied, 9 + 17);
    assert_eq!(fixture.target.files(), before);
    fixture.target.assert_file_contains("Album/02.mp3", "stale");
}

#[test]
fn execute_copies_and_preserves_times() {
    let fixture = Fixture::new();
    let mut options = fixture.options();
    options.dry_run = false;
    let (source, target) = fixture.inventories(&options);
    let plan = reconcile(&source, &target);

    let applied = Executor::new(&options, &Interrupt::new())
        .apply(&plan, &source, &target)
        .unwrap();

    assert!(applied.errors.is_empty());
    fixture.target.assert_file_contains("New/03.mp3", "brand new");
    fixture.target.assert_file_contains("Album/02.mp3", "changed in source");
    assert_eq!(fixture.target.mtime("New/03.mp3").unix_seconds(), 3_000);
    assert_eq!(fixture.target.mtime("Album/02.mp3").unix_seconds(), 2_000);
}

#[test]
fn orphans_stay_without_delete_orphans() {
    let fixture = Fixture::new();
    let mut options = fixture.options();
    options.dry_run = false;
    let (source, target) = fixture.inventories(&options);
    let plan = reconcile(&source, &target);

    let applied = Executor::new(&options, &Interrupt::new())
        .apply(&plan, &source, &target)
        .unwrap();

    assert!(applied.deleted.is_empty());
    fixture.target.assert_file_exists("Old/99.mp3");
}

#[test]
fn orphans_are_deleted_with_delete_orphans() {
    let fixture = Fixture::new();
    let mut options = fixture.options();
    options.dry_run = false;
    options.delete_orphans = true;
    let (source, target) = fixture.inventories(&options);
    let plan = reconcile(&source, &target);

    Executor::new(&options, &Interrupt::new())
        .apply(&plan, &source, &target)
        .unwrap();

    fixture.target.assert_file_not_exists("Old/99.mp3");
    // Folders are left to the purge
    fixture.target.assert_file_exists("Old");
}

#[test]
fn second_run_finds_nothing_to_do() {
    let fixture = Fixture::new();
    let mut options = fixture.options();
    options.dry_run = false;
    options.delete_orphans = true;
    let (source, target) = fixture.inventories(&options);
    Executor::new(&options, &Interrupt::new())
        .apply(&reconcile(&source, &target), &source, &target)
        .unwrap();

    let (source, target) = fixture.inventories(&options);
    let plan = reconcile(&source, &target);

    assert!(plan.is_noop(), "Expected no work, got {:?}", plan);
    assert_eq!(plan.unchanged.len(), 3);
}

#[test]
fn failed_copy_is_recorded_and_run_continues() {
    let fixture = Fixture::new();
    let mut options = fixture.options();
    options.dry_run = false;
    let (source, target) = fixture.inventories(&options);
    let plan = reconcile(&source, &target);
    // Vanishes between scan and copy
    fs::remove_file(fixture.source.path("New/03.mp3")).unwrap();

    let applied = Executor::new(&options, &Interrupt::new())
        .apply(&plan, &source, &target)
        .unwrap();

    assert_eq!(applied.errors.len(), 1);
    assert_eq!(applied.errors[0].path, fixture.source.path("New/03.mp3"));
    assert!(applied.created.is_empty());
    assert_eq!(applied.updated, vec![RelativePath::new("Album/02.mp3")]);
}

#[test]
fn interruption_stops_the_run() {
    let fixture = Fixture::new();
    let mut options = fixture.options();
    options.dry_run = false;
    let (source, target) = fixture.inventories(&options);
    let plan = reconcile(&source, &target);
    let interrupt = Interrupt::new();
    interrupt.trigger();

    let result = Executor::new(&options, &interrupt).apply(&plan, &source, &target);

    assert!(matches!(result, Err(Error::Interrupted)));
    fixture.target.assert_file_not_exists("New/03.mp3");
}

#[test]
fn destination_inside_source_is_refused() {
    let fixture = Fixture::new();
    let mut options = fixture.options();
    let (source, _) = fixture.inventories(&options);
    options.target_folder = options.source_folder.join("mirror");
    let entry = source.get(&RelativePath::new("New/03.mp3")).unwrap();

    let result = Executor::new(&options, &Interrupt::new()).apply_create(entry);

    assert!(matches!(result, Err(Error::WouldModifySource { .. })));
}
