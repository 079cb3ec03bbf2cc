//! # Sweep
//!
//! Tag-based cleanup of streams this deployment owns but no longer declares.
//!
//! A stream is owned when its tags carry the application-name tag with this
//! deployment's app name. Owned streams missing from the declared list are
//! deleted; with an empty list every owned stream is deleted. Per-stream
//! failures are recorded and the sweep moves on.

use super::types::{BrokerError, StreamBroker, SweepMode, SweepReport};
use crate::model::StreamSpec;
use std::collections::HashSet;
use tracing::{debug, info, info_span, warn, Instrument};

impl StreamBroker {
    /// Delete owned streams that are not in `desired`
    ///
    /// Only a failure to list streams is returned as an error; nothing is
    /// deleted in that case.
    pub async fn sweep(
        &self,
        desired: &[StreamSpec],
        mode: SweepMode,
    ) -> Result<SweepReport, BrokerError> {
        let owner = self.tags.owner();
        let span = info_span!(
            "sweep",
            owner.key = %owner.key,
            owner.value = %owner.value,
            dry_run = mode == SweepMode::DryRun
        );

        async move {
            let declared: HashSet<&str> = desired.iter().map(|spec| spec.name.as_str()).collect();

            let streams = self.provider.list_streams().await.map_err(|e| {
                self.log.error(&format!("Failed to list Streams: {e}"));
                BrokerError::from(e)
            })?;
            debug!(count = streams.len(), "Listed streams for sweep");

            let mut report = SweepReport {
                mode,
                ..SweepReport::default()
            };

            for stream_name in streams {
                let tags = match self.provider.list_tags_for_stream(&stream_name).await {
                    Ok(tags) => tags,
                    Err(e) => {
                        warn!(stream = %stream_name, error = %e, "Could not read stream tags");
                        self.log.error(&format!(
                            "Error reading tags for Stream {stream_name}: {e}"
                        ));
                        report.skipped.push((stream_name, e.into()));
                        continue;
                    }
                };

                if !owner.is_present_in(&tags) {
                    report.not_owned.push(stream_name);
                    continue;
                }

                if declared.contains(stream_name.as_str()) {
                    report.retained.push(stream_name);
                    continue;
                }

                if mode == SweepMode::DryRun {
                    self.log.info(&format!("Would delete Stream {stream_name}."));
                    report.would_delete.push(stream_name);
                    continue;
                }

                match self.provider.delete_stream(&stream_name).await {
                    Ok(()) => {
                        self.log.info(&format!("Deleted Stream {stream_name}."));
                        report.deleted.push(stream_name);
                    }
                    Err(e) => {
                        warn!(stream = %stream_name, error = %e, "Stream delete failed");
                        self.log.error(&format!("Error deleting Stream {stream_name}."));
                        report.failed.push((stream_name, e.into()));
                    }
                }
            }

            info!(
                deleted = report.deleted.len(),
                would_delete = report.would_delete.len(),
                retained = report.retained.len(),
                not_owned = report.not_owned.len(),
                failed = report.failed.len(),
                skipped = report.skipped.len(),
                "Sweep finished"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }
}
