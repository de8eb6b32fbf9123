//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::{map_error, FailureReport};
pub use parse::{Cli, Commands};
pub use presentation::NO_CHANGES;
pub use route::RunContext;
