//! End-to-end capture, serialise and restore through the public API.

use metadata::{
    GenericAttribute, GenericAttributeType, MetadataOptions, Node, NodeType, NoopBackend,
    RestoreContext, Timespec, UnknownTypeLog, platform_backend,
};
use std::fs;
use std::sync::Arc;
use test_support::{EntryKind, Fixture};

fn through_json(node: &Node) -> Node {
    let text = serde_json::to_string(node).expect("serialise node");
    serde_json::from_str(&text).expect("parse node")
}

#[test]
fn file_times_survive_json_round_trip() {
    let fixture = Fixture::new();
    let source = fixture.create("source.txt", EntryKind::File);
    let target = fixture.create("target.txt", EntryKind::File);
    filetime::set_file_mtime(&source, filetime::FileTime::from_unix_time(1_234_567_890, 0))
        .expect("set source mtime");

    let ctx = RestoreContext::for_platform();
    let node = Node::capture(&source, ctx.backend(), ctx.options()).expect("capture");
    let restored = through_json(&node);
    assert_eq!(restored, node);

    restored.restore_metadata(&target, &ctx).expect("restore");
    let mtime = fs::metadata(&target).expect("stat").modified().expect("mtime");
    assert_eq!(Timespec::from_system_time(mtime), Timespec::new(1_234_567_890, 0_i64));
}

#[test]
fn directory_capture_reports_dir_type() {
    let fixture = Fixture::new();
    let dir = fixture.create("nested", EntryKind::Dir);
    let node = Node::capture(&dir, &NoopBackend::new(), &MetadataOptions::default())
        .expect("capture");
    assert_eq!(node.node_type, NodeType::Dir);
    assert_eq!(node.name, "nested");
}

#[cfg(unix)]
#[test]
fn symlink_is_captured_without_following() {
    let fixture = Fixture::new();
    let link = fixture.create("link", EntryKind::Symlink);
    let node = Node::capture(&link, &*platform_backend(), &MetadataOptions::default())
        .expect("capture dangling link");
    assert_eq!(node.node_type, NodeType::Symlink);
}

#[cfg(unix)]
#[test]
fn symlink_times_are_set_on_the_link() {
    let fixture = Fixture::new();
    let link = fixture.create("link", EntryKind::Symlink);
    let mut node = Node::new("link", NodeType::Symlink);
    node.atime = Timespec::new(1_000_000_000, 0_i64);
    node.mtime = Timespec::new(1_100_000_000, 0_i64);

    let ctx = RestoreContext::for_platform();
    node.restore_metadata(&link, &ctx).expect("restore link times");
    if ctx.backend().name() == "noop" {
        return;
    }
    let meta = fs::symlink_metadata(&link).expect("lstat");
    let mtime = filetime::FileTime::from_last_modification_time(&meta);
    assert_eq!(mtime.unix_seconds(), 1_100_000_000);
}

#[test]
fn unknown_generic_type_is_reported_once_across_contexts() {
    let fixture = Fixture::new();
    let first = fixture.create("a", EntryKind::File);
    let second = fixture.create("b", EntryKind::File);

    let text = r#"{
        "name": "a",
        "type": "file",
        "mode": 420,
        "mtime": {"sec": 1700000000, "nsec": 0},
        "atime": {"sec": 1700000000, "nsec": 0},
        "ctime": {"sec": 1700000000, "nsec": 0},
        "generic_attributes": [
            {"type": "vendor.experimental", "value": "AQID"}
        ]
    }"#;
    let node: Node = serde_json::from_str(text).expect("parse");
    assert_eq!(
        node.generic_attribute(&GenericAttributeType::new("vendor.experimental")),
        Some(&[1_u8, 2, 3][..])
    );

    let log = Arc::new(UnknownTypeLog::new());
    let ctx = RestoreContext::for_platform().with_unknown_log(Arc::clone(&log));
    let worker = ctx.clone();
    node.restore_metadata(&first, &ctx).expect("restore first");
    node.restore_metadata(&second, &worker).expect("restore second");
    assert_eq!(log.types(), ["vendor.experimental"]);
}

#[test]
fn disabled_facets_are_neither_captured_nor_restored() {
    let fixture = Fixture::new();
    let file = fixture.create("f", EntryKind::File);
    let before = fs::metadata(&file).expect("stat").modified().expect("mtime");

    let options = MetadataOptions::new()
        .extended_attributes(false)
        .generic_attributes(false)
        .times(false);
    let ctx = RestoreContext::for_platform().with_options(options);
    let mut node = Node::capture(&file, ctx.backend(), ctx.options()).expect("capture");
    assert!(node.extended_attributes.is_empty());
    assert!(node.generic_attributes.is_empty());

    node.mtime = Timespec::new(5, 0_i64);
    node.generic_attributes.push(GenericAttribute::new(
        GenericAttributeType::FILE_ATTRIBUTES,
        vec![0xff],
    ));
    node.restore_metadata(&file, &ctx).expect("nothing to restore");
    let after = fs::metadata(&file).expect("stat").modified().expect("mtime");
    assert_eq!(before, after);
    assert!(ctx.unknown_types().is_empty());
}

#[cfg(all(
    feature = "xattr",
    any(target_os = "linux", target_os = "android", target_os = "freebsd", target_os = "macos")
))]
#[test]
fn user_xattr_round_trips_between_files() {
    let fixture = Fixture::new();
    let source = fixture.create("source", EntryKind::File);
    let target = fixture.create("target", EntryKind::File);
    if !test_support::xattrs_supported(&source) {
        eprintln!("xattrs not supported, skipping test");
        return;
    }
    xattr::set(&source, "user.foo", b"bar").expect("set xattr");

    let ctx = RestoreContext::for_platform();
    let node = through_json(
        &Node::capture(&source, ctx.backend(), ctx.options()).expect("capture"),
    );
    assert_eq!(node.extended_attribute("user.foo"), Some(&b"bar"[..]));

    node.restore_metadata(&target, &ctx).expect("restore");
    assert_eq!(
        xattr::get(&target, "user.foo").expect("get xattr"),
        Some(b"bar".to_vec())
    );
}
