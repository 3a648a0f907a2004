//! Output printed after a run.

use ripline_core::pipeline::{PipelineError, RunSummary};
use ripline_core::workspace::{format_bytes, format_elapsed, total_sizes, RunDirectories};
use tracing::warn;

/// Prints elapsed time, size totals and the space saved.
pub async fn print_summary(summary: &RunSummary) {
    println!(
        "\nOperation Complete. Time Elapsed - {}",
        format_elapsed(summary.elapsed)
    );

    let totals = total_sizes(summary).await;
    println!(
        "\nTotal size of raw unencoded files - {}",
        format_bytes(totals.raw_bytes)
    );
    println!(
        "Total size of encoded files - {}",
        format_bytes(totals.encoded_bytes)
    );
    if let Some(saved) = totals.saved_bytes() {
        println!("Total disk space saved via encoding - {}", format_bytes(saved));
    }
}

/// Deletes the raw files of the run, reporting problems without failing.
pub async fn delete_raw_files(dirs: &RunDirectories) {
    println!("\nDeleting raw unencoded files...");
    match dirs.remove_raw().await {
        Ok(()) => println!("Raw unencoded files deleted."),
        Err(e) => {
            warn!(path = %dirs.raw.display(), error = %e, "Failed to delete raw files");
            println!(
                "An error occurred while deleting {}: {}",
                dirs.raw.display(),
                e
            );
        }
    }
}

/// Text shown for a failed run, including captured tool output.
pub fn failure_details(err: &PipelineError) -> Option<String> {
    err.captured_output()
        .filter(|output| !output.trim().is_empty())
        .map(|output| format!("External tool output:\n\n{}", output.trim_end()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripline_core::catalog::TitleId;
    use ripline_core::encoder::EncoderError;

    #[test]
    fn test_failure_details_with_output() {
        let err = PipelineError::Encoding {
            id: TitleId::new(0, 0),
            source: EncoderError::failed("exit 2", Some("Encode failed\n".into())),
        };
        assert_eq!(
            failure_details(&err).as_deref(),
            Some("External tool output:\n\nEncode failed")
        );
    }

    #[test]
    fn test_failure_details_without_output() {
        assert!(failure_details(&PipelineError::NothingToProcess).is_none());
    }
}
