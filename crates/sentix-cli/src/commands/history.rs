use std::time::Instant;

use sentix_core::{Dashboard, EnvelopeError, FeedId, IndicatorHistory};

use crate::cli::ProtocolArgs;

use super::{CommandResult, View};

pub async fn run(args: &ProtocolArgs, dashboard: &Dashboard) -> CommandResult {
    let started = Instant::now();

    match dashboard.history(&args.protocol).await {
        Ok(history) => {
            let warnings = if history.timestamps.is_empty() {
                vec![format!("no history recorded for '{}'", args.protocol)]
            } else {
                Vec::new()
            };
            CommandResult::ok(View::History(history), vec![FeedId::PriceHistory])
                .with_warnings(warnings)
                .with_latency(started)
        }
        Err(error) => CommandResult::ok(
            View::History(IndicatorHistory::empty(args.protocol.as_str())),
            vec![FeedId::PriceHistory],
        )
        .with_errors(vec![EnvelopeError::from(&error)])
        .with_latency(started),
    }
}
