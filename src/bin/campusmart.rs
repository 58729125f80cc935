use anyhow::Result;
use campusmart::cli::{actions, actions::Action, start, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse arguments, initialize telemetry, and build the action
    let action = start()?;

    let result = match action {
        Action::Server(_) => actions::server::handle(action).await,
    };

    // Flush any buffered spans before exiting
    telemetry::shutdown_tracer();

    result
}
