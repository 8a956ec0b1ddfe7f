use sentix_core::DashboardConfig;

use super::{CommandResult, View};

pub fn run(config: DashboardConfig) -> CommandResult {
    CommandResult::ok(View::Config(config), Vec::new())
}
