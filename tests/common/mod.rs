use serde_json::json;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Build a dump value in the collector's shape: one object per video,
/// comments as `[id, text, parent_id, like_count, published_at]` rows.
pub fn dump_value(videos: &[(&str, &[&str])]) -> serde_json::Value {
    let mut arr = Vec::new();
    for (i, (vid, texts)) in videos.iter().enumerate() {
        let comments: Vec<serde_json::Value> = texts
            .iter()
            .enumerate()
            .map(|(j, t)| json!([format!("c{}_{}", i, j), t, vid, 0, "2023-05-01T10:00:00Z"]))
            .collect();
        arr.push(json!({"VideoID": vid, "Comments": comments}));
    }
    serde_json::Value::Array(arr)
}

pub fn write_dump(path: &Path, videos: &[(&str, &[&str])]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, dump_value(videos).to_string()).unwrap();
}

/// Same dump, zstd-compressed (`.json.zst`).
pub fn write_dump_zst(path: &Path, videos: &[(&str, &[&str])]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    enc.write_all(dump_value(videos).to_string().as_bytes()).unwrap();
    enc.finish().unwrap();
}

/// Write a cluster table with the `Video ID` / `Video Transcript` columns.
pub fn write_cluster_csv(path: &Path, rows: &[(&str, &str)]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut w = csv::Writer::from_path(path).unwrap();
    w.write_record(["Video ID", "Video Transcript"]).unwrap();
    for (id, transcript) in rows {
        w.write_record([*id, *transcript]).unwrap();
    }
    w.flush().unwrap();
}

pub fn write_video_vectors(path: &Path, rows: &[(&str, Vec<f32>)]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut out = String::new();
    for (id, v) in rows {
        out.push_str(&json!({"video_id": id, "vector": v}).to_string());
        out.push('\n');
    }
    fs::write(path, out).unwrap();
}

pub fn write_comment_vectors(path: &Path, rows: &[(u32, Vec<f32>)]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut out = String::new();
    for (id, v) in rows {
        out.push_str(&json!({"comment_id": id, "vector": v}).to_string());
        out.push('\n');
    }
    fs::write(path, out).unwrap();
}

/// A transcript that survives cleaning (enough tokens, enough variety).
pub fn transcript(tag: &str) -> String {
    format!("today we start the {tag} challenge together and invite every single viewer")
}

/// Read a CSV file into (header, records) as plain strings.
pub fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    let header = rdr
        .headers()
        .unwrap()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let rows = rdr
        .records()
        .map(|r| r.unwrap().iter().map(|s| s.to_string()).collect())
        .collect();
    (header, rows)
}
