use std::time::Instant;

use sentix_core::{Dashboard, DashboardSnapshot, FeedId};

use crate::cli::TokensArgs;

use super::{CommandResult, View};

pub async fn run(args: &TokensArgs, dashboard: &Dashboard) -> CommandResult {
    let started = Instant::now();
    let DashboardSnapshot {
        rows,
        pagination,
        warnings,
        errors,
    } = dashboard.load(args.page).await;

    CommandResult::ok(
        View::Tokens { rows, pagination },
        vec![FeedId::Fundamental, FeedId::Onchain],
    )
    .with_warnings(warnings)
    .with_errors(errors)
    .with_latency(started)
}
