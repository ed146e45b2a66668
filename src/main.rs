use anyhow::Result;
use std::path::PathBuf;
use ytnarr::NarrativeETL;

const DATA_ROOT: &str = "./data";
const RESULTS_ROOT: &str = "./results";

fn main() -> Result<()> {
    let hw = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(8);

    let etl = NarrativeETL::new()
        .base_dir(PathBuf::from(DATA_ROOT))
        .output_dir(PathBuf::from(RESULTS_ROOT))
        .parallelism(hw)
        .progress(true);

    let summary = etl.run()?;
    println!(
        "{} unique comments across {} dumps; {} videos in {} clusters",
        summary.unique_comments, summary.dump_files, summary.videos, summary.clusters
    );
    println!(
        "wrote {} feature rows, {} alignment rows, {} silhouette rows",
        summary.feature_rows, summary.alignment_rows, summary.silhouette_rows
    );

    Ok(())
}
