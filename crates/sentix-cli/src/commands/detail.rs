use std::time::Instant;

use sentix_core::{derive_symbol, Dashboard, DetailView, EnvelopeError, FeedId, SentimentType};

use crate::cli::ProtocolArgs;

use super::{CommandResult, View};

pub async fn run(args: &ProtocolArgs, dashboard: &Dashboard) -> CommandResult {
    let started = Instant::now();

    match dashboard.detail(&args.protocol).await {
        Ok(mut view) => {
            let warnings = std::mem::take(&mut view.warnings);
            CommandResult::ok(View::Detail(view), vec![FeedId::Onchain])
                .with_warnings(warnings)
                .with_latency(started)
        }
        Err(error) => {
            let view = DetailView {
                protocol_id: args.protocol.clone(),
                symbol: derive_symbol(&args.protocol),
                onchain_sentiment: SentimentType::Neutral,
                indicators: Vec::new(),
                found: false,
                warnings: Vec::new(),
            };
            CommandResult::ok(View::Detail(view), vec![FeedId::Onchain])
                .with_errors(vec![EnvelopeError::from(&error)])
                .with_latency(started)
        }
    }
}
