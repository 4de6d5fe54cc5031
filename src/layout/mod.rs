//! Stitches shared HTML fragments (header, footer, calculator navigation)
//! into a page.
//!
//! Each fragment is decoration: it is loaded on its own task, and a fragment
//! that fails to load is logged and left out without affecting the others.

mod placeholder;
mod source;

pub use placeholder::{fill_placeholder, has_placeholder};
pub use source::{FragmentSource, FsFragmentSource, HttpFragmentSource};

use std::sync::Arc;
use tracing::{Instrument, debug, error, info};

/// A fragment file and the id of the element it is inserted into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub slot: String,
    pub source: String,
}

impl Fragment {
    pub fn new(slot: &str, source: &str) -> Self {
        Self {
            slot: slot.to_string(),
            source: source.to_string(),
        }
    }
}

/// The fragments every client page may reference.
pub fn default_fragments() -> Vec<Fragment> {
    vec![
        Fragment::new("header", "header.html"),
        Fragment::new("footer", "footer.html"),
        Fragment::new("calc_nav", "calculator_nav.html"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentStatus {
    Inserted { bytes: usize },
    /// The page has no placeholder for this fragment, so it was never fetched.
    Skipped,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentOutcome {
    pub slot: String,
    pub source: String,
    pub status: FragmentStatus,
}

/// The stitched page plus one outcome per requested fragment, in request order.
#[derive(Debug, Clone)]
pub struct LayoutReport {
    pub html: String,
    pub outcomes: Vec<FragmentOutcome>,
}

impl LayoutReport {
    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, FragmentStatus::Failed { .. }))
            .count()
    }
}

/// Loads every fragment whose placeholder exists in `page` concurrently and
/// inserts the ones that loaded.
#[tracing::instrument(skip_all, fields(fragments = fragments.len()))]
pub async fn load_layout(
    page: &str,
    source: Arc<dyn FragmentSource>,
    fragments: &[Fragment],
) -> LayoutReport {
    let mut pending = Vec::with_capacity(fragments.len());

    for fragment in fragments {
        if !has_placeholder(page, &fragment.slot) {
            debug!(slot = %fragment.slot, "No placeholder, skipping fragment");
            pending.push((fragment, None));
            continue;
        }

        let source = source.clone();
        let name = fragment.source.clone();
        let span = tracing::info_span!(
            "load_fragment",
            slot = %fragment.slot,
            source = %fragment.source,
        );
        let task = tokio::spawn(async move { source.load(&name).await }.instrument(span));
        pending.push((fragment, Some(task)));
    }

    let mut html = page.to_string();
    let mut outcomes = Vec::with_capacity(pending.len());

    for (fragment, task) in pending {
        let status = match task {
            None => FragmentStatus::Skipped,
            Some(task) => {
                let loaded = match task.await {
                    Ok(result) => result,
                    Err(e) => Err(anyhow::anyhow!("fragment task failed: {e}")),
                };
                match loaded {
                    Ok(body) => match fill_placeholder(&html, &fragment.slot, &body) {
                        Some(filled) => {
                            html = filled;
                            FragmentStatus::Inserted { bytes: body.len() }
                        }
                        // an earlier fragment's content replaced this placeholder
                        None => FragmentStatus::Skipped,
                    },
                    Err(e) => {
                        error!(slot = %fragment.slot, source = %fragment.source, error = %e, "Error loading layout fragment");
                        FragmentStatus::Failed {
                            error: format!("{e:#}"),
                        }
                    }
                }
            }
        };

        outcomes.push(FragmentOutcome {
            slot: fragment.slot.clone(),
            source: fragment.source.clone(),
            status,
        });
    }

    let report = LayoutReport { html, outcomes };
    info!(failures = report.failures(), "Layout assembled");
    report
}
