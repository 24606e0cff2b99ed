use std::fmt;

use super::file::FetchOutcome;

/// Per-run tally of item outcomes.
///
/// `total` counts every dispatched item, so it always equals
/// `skipped + downloaded + failed + no_op`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub skipped: usize,
    pub downloaded: usize,
    pub failed: usize,
    /// Items without a URL. Counted in `total` but not reported.
    pub no_op: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &FetchOutcome) {
        self.total += 1;
        match outcome {
            FetchOutcome::NoOp => self.no_op += 1,
            FetchOutcome::Skipped => self.skipped += 1,
            FetchOutcome::Downloaded => self.downloaded += 1,
            FetchOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Download Summary:")?;
        writeln!(f, "Total files processed: {}", self.total)?;
        writeln!(f, "Already downloaded (skipped): {}", self.skipped)?;
        writeln!(f, "Successfully downloaded: {}", self.downloaded)?;
        write!(f, "Failed downloads: {}", self.failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::error::DownloadError;
    use crate::state::WorkItem;

    fn failed() -> FetchOutcome {
        FetchOutcome::Failed {
            item: WorkItem::new("http://x/1.png", "1.png"),
            error: DownloadError::EmptyBody {
                url: "http://x/1.png".into(),
            },
        }
    }

    #[test]
    fn test_counts_add_up_to_total() {
        let mut summary = RunSummary::default();
        for outcome in [
            FetchOutcome::Skipped,
            FetchOutcome::Downloaded,
            FetchOutcome::Downloaded,
            FetchOutcome::NoOp,
            failed(),
        ] {
            summary.record(&outcome);
        }
        assert_eq!(summary.total, 5);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.downloaded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.no_op, 1);
        assert_eq!(
            summary.total,
            summary.skipped + summary.downloaded + summary.failed + summary.no_op
        );
    }

    #[test]
    fn test_display() {
        let summary = RunSummary {
            total: 4,
            skipped: 1,
            downloaded: 2,
            failed: 1,
            no_op: 0,
        };
        assert_eq!(
            summary.to_string(),
            "Download Summary:\n\
             Total files processed: 4\n\
             Already downloaded (skipped): 1\n\
             Successfully downloaded: 2\n\
             Failed downloads: 1"
        );
    }
}
