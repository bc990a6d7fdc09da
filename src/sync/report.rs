use std::fmt;

use crate::error::EmptyReason;

/// What happened to one book during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum BookOutcome {
    Synced { page_id: String, blocks: usize },
    /// The bookmark list could not be fetched; no page was written.
    Skipped(EmptyReason),
}

/// Totals for a sync run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// Books returned by the reading source
    pub listed: usize,
    /// Books at or after the watermark
    pub selected: usize,
    pub synced: usize,
    pub skipped: usize,
    pub pages_deleted: usize,
    pub blocks_written: usize,
}

impl SyncReport {
    pub fn record(&mut self, outcome: &BookOutcome) {
        match outcome {
            BookOutcome::Synced { blocks, .. } => {
                self.synced += 1;
                self.blocks_written += blocks;
            }
            BookOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.selected == 0 {
            return write!(f, "Already up to date ({} books checked).", self.listed);
        }
        write!(
            f,
            "Synced {} of {} book{} ({} block{} written, {} old page{} replaced",
            self.synced,
            self.selected,
            if self.selected == 1 { "" } else { "s" },
            self.blocks_written,
            if self.blocks_written == 1 { "" } else { "s" },
            self.pages_deleted,
            if self.pages_deleted == 1 { "" } else { "s" },
        )?;
        if self.skipped > 0 {
            write!(f, ", {} skipped", self.skipped)?;
        }
        write!(f, ").")
    }
}
