#[path = "common/mod.rs"]
mod common;

use common::*;
use time::macros::date;
use ytnarr::{read_dump, CommentDump, CommentIndex, CommentRecord, DateWindow, PipelineError};

const TS: &str = "2023-05-01T10:00:00Z";

fn rec(id: &str, text: &str, video: &str) -> CommentRecord {
    CommentRecord::new(id, Some(text.to_string()), video, 0, TS)
}

fn dump(video: &str, comments: Vec<CommentRecord>) -> CommentDump {
    CommentDump {
        video_id: video.to_string(),
        comments,
    }
}

#[test]
fn index_dedupes_by_text_and_video_pair() {
    let a = "count me in for this challenge";
    let b = "so proud of everyone joining today";
    let dumps = vec![
        dump("v1", vec![rec("c1", a, "v1"), rec("c2", b, "v1")]),
        // same text under the same video collapses, even across dumps
        dump("v1", vec![rec("c3", a, "v1")]),
        // same text under another video stays
        dump("v2", vec![rec("c4", a, "v2")]),
    ];

    let index = CommentIndex::build(&dumps, None).unwrap();
    assert_eq!(index.len(), 3);
    assert_eq!(index.comments_for("v1"), &[0, 1]);
    assert_eq!(index.comments_for("v2"), &[2]);
    assert_eq!(index.comments_for("missing"), &[] as &[u32]);

    let entry = index.get(2).unwrap();
    assert_eq!(entry.text, a);
    assert_eq!(entry.video_id, "v2");
}

#[test]
fn index_preserves_first_seen_order_and_is_idempotent() {
    let texts = [
        "let us all stand together now",
        "we will join the challenge together",
        "signed up with my whole family yesterday",
    ];
    let dumps = vec![
        dump("v1", vec![rec("c1", texts[0], "v1")]),
        dump("v2", vec![rec("c2", texts[1], "v2"), rec("c3", texts[2], "v2")]),
        dump("v1", vec![rec("c4", texts[0], "v1")]),
    ];

    let first = CommentIndex::build(&dumps, None).unwrap();
    let second = CommentIndex::build(&dumps, None).unwrap();
    assert_eq!(first.entries(), second.entries());

    let got: Vec<&str> = first.entries().iter().map(|e| e.text.as_str()).collect();
    assert_eq!(got, texts.to_vec());
}

#[test]
fn index_drops_empty_and_low_diversity_comments() {
    let dumps = vec![dump(
        "v1",
        vec![
            rec("c1", "nice", "v1"),
            rec("c2", "https://only.a/link", "v1"),
            CommentRecord::new("c3", None, "v1", 0, TS),
            rec("c4", "count me in for this challenge", "v1"),
        ],
    )];

    let index = CommentIndex::build(&dumps, None).unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index.get(0).unwrap().text, "count me in for this challenge");
}

#[test]
fn date_window_filters_before_cleaning() {
    let old = CommentRecord::new(
        "c1",
        Some("count me in for this challenge".to_string()),
        "v1",
        0,
        "2021-01-01T00:00:00Z",
    );
    let dumps = vec![dump("v1", vec![old, rec("c2", "so proud of everyone joining today", "v1")])];

    let window = DateWindow::new(date!(2023 - 01 - 01), date!(2023 - 12 - 31));
    let index = CommentIndex::build(&dumps, Some(window)).unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index.get(0).unwrap().text, "so proud of everyone joining today");
}

#[test]
fn bad_timestamp_is_fatal_only_under_a_window() {
    let bad = CommentRecord::new(
        "c1",
        Some("count me in for this challenge".to_string()),
        "v1",
        0,
        "not-a-timestamp",
    );
    let dumps = vec![dump("v1", vec![bad])];

    assert!(CommentIndex::build(&dumps, None).is_ok());

    let window = DateWindow::new(date!(2023 - 01 - 01), date!(2023 - 12 - 31));
    let err = CommentIndex::build(&dumps, Some(window)).unwrap_err();
    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::MalformedRecord { stage, at, .. }) => {
            assert_eq!(*stage, "comment index");
            assert!(at.contains("v1"));
            assert!(at.contains("c1"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn dumps_load_from_plain_and_compressed_archives() {
    let dir = tempfile::tempdir().unwrap();
    let videos: &[(&str, &[&str])] = &[("v1", &["count me in for this challenge"])];

    let plain = dir.path().join("a.json");
    write_dump(&plain, videos);
    let loaded = read_dump(&plain, 64 * 1024).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].video_id, "v1");
    assert_eq!(loaded[0].comments.len(), 1);
    assert_eq!(loaded[0].comments[0].text(), "count me in for this challenge");

    let packed = dir.path().join("b.json.zst");
    write_dump_zst(&packed, videos);
    let loaded = read_dump(&packed, 64 * 1024).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].comments[0].id(), "c0_0");
}

#[test]
fn malformed_dump_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    // comment rows must be [id, text, parent, likes, published]
    std::fs::write(&path, r#"[{"VideoID": "v1", "Comments": [["c1", "text"]]}]"#).unwrap();

    let err = read_dump(&path, 64 * 1024).unwrap_err();
    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::MalformedRecord { stage, at, .. }) => {
            assert_eq!(*stage, "comment ingest");
            assert!(at.contains("broken.json"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
