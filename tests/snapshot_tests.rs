use assert_fs::TempDir;
use assert_fs::fixture::{FileWriteStr, PathChild};
use bitstate::artifacts::index::entry_mode::{EntryMode, FileMode};
use bitstate::{
    Author, CommitData, DigestAlgorithm, Error, ErrorKind, IndexEntry, ObjectStore, ObjectType,
    Tree, TreeChild, hash_object,
};
use common::command::{nested_repository_dir, repository_dir};
use common::file::{Descriptor, list_all_files, write_generated_directory, write_generated_files};
use rstest::{fixture, rstest};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

mod common;

#[fixture]
fn data() -> CommitData {
    let timestamp = chrono::DateTime::parse_from_rfc3339("2023-01-01T12:00:00Z").unwrap();
    let author = Author::new_with_timestamp("fake_user", "fake_email@email.com", timestamp);
    CommitData::new(author.clone(), author, "Initial commit".to_string())
}

/// Every file reachable from `tree`, with its inflated content
fn collect_files(tree: &Tree) -> Vec<(String, String)> {
    let mut files = Vec::new();

    for child in tree.children() {
        match child {
            TreeChild::File(entry) => {
                let content = String::from_utf8(entry.file_data().unwrap().to_vec()).unwrap();
                files.push((entry.path().to_string(), content));
            }
            TreeChild::Directory(subtree) => files.extend(collect_files(subtree)),
        }
    }

    files.sort();
    files
}

#[rstest]
fn generated_projects_decode_through_the_store(repository_dir: TempDir) {
    let root = repository_dir.path();
    let mut expected = write_generated_files(root, 3)
        .into_iter()
        .flat_map(|file| list_all_files(&Descriptor::File(file), root))
        .collect::<Vec<_>>();
    let project = write_generated_directory(root, "project", 2, 2, 2);
    expected.extend(list_all_files(&Descriptor::Directory(project), root));
    expected.sort();

    let mut store = ObjectStore::new();
    let built = store.initialize_tree(root).unwrap().clone();
    let decoded = store.load_tree(built.oid(), ".").unwrap();

    pretty_assertions::assert_eq!(decoded.oid(), built.oid());
    pretty_assertions::assert_eq!(collect_files(&decoded), expected);
}

#[rstest]
fn rebuilding_an_unchanged_directory_is_deterministic(nested_repository_dir: TempDir) {
    let mut first = ObjectStore::new();
    let mut second = ObjectStore::new();

    let first_root = first.initialize_tree(nested_repository_dir.path()).unwrap().oid().clone();
    let second_root = second.initialize_tree(nested_repository_dir.path()).unwrap().oid().clone();

    pretty_assertions::assert_eq!(first_root, second_root);
    pretty_assertions::assert_eq!(
        first.objects().keys().collect::<Vec<_>>(),
        second.objects().keys().collect::<Vec<_>>()
    );
}

#[rstest]
fn editing_a_nested_file_changes_every_ancestor(nested_repository_dir: TempDir) {
    let mut store = ObjectStore::new();
    let before = store.initialize_tree(nested_repository_dir.path()).unwrap().clone();

    nested_repository_dir
        .child("a/b/3.txt")
        .write_str("three, edited")
        .unwrap();
    let after = store.initialize_tree(nested_repository_dir.path()).unwrap().clone();

    assert_ne!(after.oid(), before.oid());
    let (old_a, new_a) = (before.subtree("a").unwrap(), after.subtree("a").unwrap());
    assert_ne!(old_a.oid(), new_a.oid());
    assert_ne!(
        old_a.subtree("a/b").unwrap().oid(),
        new_a.subtree("a/b").unwrap().oid()
    );
    pretty_assertions::assert_eq!(
        before.file_entry("1.txt").unwrap().oid(),
        after.file_entry("1.txt").unwrap().oid()
    );
    assert!(store.contains(before.oid()));
    assert_eq!(store.root().unwrap().oid(), after.oid());
}

#[rstest]
fn index_entries_follow_the_binary_layout(repository_dir: TempDir) {
    repository_dir.child("hello.txt").write_str("hello").unwrap();
    let mtime = filetime::FileTime::from_unix_time(1_700_000_000, 123);
    filetime::set_file_mtime(repository_dir.child("hello.txt").path(), mtime).unwrap();

    let entry =
        IndexEntry::create(repository_dir.path(), "hello.txt", DigestAlgorithm::Sha1).unwrap();
    let buffer = entry.buffer();
    let oid = hash_object(Some(b"hello"), ObjectType::Blob, DigestAlgorithm::Sha1)
        .unwrap()
        .oid;

    // 62 fixed bytes + 9 path bytes, padded to 72
    assert_eq!(buffer.len(), 72);
    assert_eq!(&buffer[8..12], &1_700_000_000u32.to_be_bytes());
    assert_eq!(&buffer[12..16], &123u32.to_be_bytes());
    assert_eq!(&buffer[24..28], &0o100644u32.to_be_bytes());
    assert_eq!(&buffer[36..40], &5u32.to_be_bytes());
    assert_eq!(hex::encode(&buffer[40..60]), oid.to_string());
    assert_eq!(&buffer[60..62], &9u16.to_be_bytes());
    assert_eq!(&buffer[62..71], b"hello.txt");
    assert_eq!(buffer[71], 0);
}

#[rstest]
fn directory_entries_embed_the_subtree_id(nested_repository_dir: TempDir) {
    let mut store = ObjectStore::new();
    let root = store.initialize_tree(nested_repository_dir.path()).unwrap().clone();
    let subtree = root.subtree("a").unwrap();

    let directory = IndexEntry::directory("a", subtree.oid().clone()).unwrap();

    // "1.txt" entry is 62 + 5 bytes padded to 72, then the "a" directory entry
    let start = 12 + 72;
    assert_buffer_eq!(&root.buffer()[start..], directory.buffer().as_ref());
}

#[rstest]
fn executable_files_keep_their_mode(repository_dir: TempDir) {
    let script = repository_dir.child("run.sh");
    script.write_str("#!/bin/sh\necho hi\n").unwrap();
    std::fs::set_permissions(script.path(), std::fs::Permissions::from_mode(0o755)).unwrap();
    repository_dir.child("notes.txt").write_str("notes").unwrap();

    let mut store = ObjectStore::new();
    let root = store.initialize_tree(repository_dir.path()).unwrap();

    assert_eq!(
        root.file_entry("run.sh").unwrap().mode(),
        EntryMode::File(FileMode::Executable)
    );
    assert_eq!(
        root.file_entry("notes.txt").unwrap().mode(),
        EntryMode::File(FileMode::Regular)
    );
}

#[rstest]
fn git_directories_are_never_snapshotted(nested_repository_dir: TempDir) {
    nested_repository_dir
        .child(".git/objects/ab/cdef")
        .write_str("packed")
        .unwrap();
    nested_repository_dir.child("a/.git/HEAD").write_str("ref").unwrap();

    let mut store = ObjectStore::new();
    let root = store.initialize_tree(nested_repository_dir.path()).unwrap().clone();

    assert!(root.entry(".git").is_none());
    assert!(root.subtree("a").unwrap().entry("a/.git").is_none());
}

#[rstest]
fn snapshotting_a_file_is_rejected(repository_dir: TempDir) {
    repository_dir.child("file.txt").write_str("x").unwrap();
    let mut store = ObjectStore::new();

    let error = store
        .initialize_tree(repository_dir.path().join("file.txt"))
        .unwrap_err();

    assert!(matches!(error, Error::NotADirectory { .. }));
    assert_eq!(error.kind(), ErrorKind::Schema);
    assert!(store.root().is_none());
}

#[rstest]
fn snapshotting_a_missing_directory_is_not_found(repository_dir: TempDir) {
    let mut store = ObjectStore::new();

    let error = store
        .initialize_tree(repository_dir.path().join("missing"))
        .unwrap_err();

    assert!(matches!(error, Error::PathNotFound { .. }));
}

#[rstest]
fn commit_chain_skips_unchanged_trees(nested_repository_dir: TempDir, data: CommitData) {
    let mut store = ObjectStore::new();

    let first = store
        .initialize_tree_and_commit(nested_repository_dir.path(), data.clone())
        .unwrap();
    let repeat = store
        .initialize_tree_and_commit(nested_repository_dir.path(), data.clone())
        .unwrap();
    nested_repository_dir.child("4.txt").write_str("four").unwrap();
    let changed = store
        .initialize_tree_and_commit(nested_repository_dir.path(), data)
        .unwrap();

    assert!(!repeat.is_created());
    assert_eq!(repeat.oid(), first.oid());
    assert!(changed.is_created());
    assert_eq!(store.commits().len(), 2);
    assert_eq!(store.commits()[1].parent(), Some(first.oid()));
    assert_eq!(store.index_commit_hash(), Some(changed.oid()));
}

#[rstest]
fn sha256_trees_round_trip(nested_repository_dir: TempDir) {
    let mut store = ObjectStore::with_algorithm(DigestAlgorithm::Sha256);
    let root = store.initialize_tree(nested_repository_dir.path()).unwrap().clone();

    let decoded = Tree::from_buffer(&store, root.buffer().clone(), ".").unwrap();

    assert_eq!(decoded.oid(), root.oid());
    assert_eq!(decoded.oid().as_ref().len(), 64);
    // 74 fixed bytes + "1.txt" padded to 80
    assert_eq!(decoded.file_entry("1.txt").unwrap().buffer().len(), 80);
    pretty_assertions::assert_eq!(
        collect_files(&decoded),
        vec![
            ("1.txt".to_string(), "one".to_string()),
            ("a/2.txt".to_string(), "two".to_string()),
            ("a/b/3.txt".to_string(), "three".to_string()),
        ]
    );
}

#[rstest]
fn reset_objects_leaves_history_in_place(nested_repository_dir: TempDir, data: CommitData) {
    let mut store = ObjectStore::new();
    store
        .initialize_tree_and_commit(nested_repository_dir.path(), data)
        .unwrap();
    let root_oid = store.root().unwrap().oid().clone();

    store.reset_objects();

    assert!(store.objects().is_empty());
    assert_eq!(store.repo_path(), Path::new(""));
    assert_eq!(store.root().unwrap().oid(), &root_oid);
    assert!(matches!(
        store.load(&root_oid).unwrap_err(),
        Error::MissingObject { .. }
    ));
    assert_eq!(store.commits().len(), 1);
}
