use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use skycast_core::{App, ServiceConfig};
use skycast_ui::{render, AppServices, DashboardModel};

mod command;

use command::{Command, HELP};

fn main() -> Result<()> {
    // Logs go to stderr; keep them quiet unless RUST_LOG asks
    skycast_core::init_with_default_filter("warn")?;

    let mut app = App::new()?;
    let config = app.shared_config();

    let services = Arc::new(AppServices::new(&config)?);
    let mut model = DashboardModel::new(
        services.clone(),
        config.display.temperature_unit.into(),
    );

    let settle = settle_timeout(&config.services);

    tracing::info!("SkyCast started");
    println!("SkyCast - type `help` for commands");

    model.search(&config.display.default_city);
    settle_and_show(&mut model, settle);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("Failed to read command")? == 0 {
            break;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        match command {
            Command::Search(city) => model.search(&city),
            Command::Type(partial) => model.set_query(&partial),
            Command::Pick(index) => {
                if !model.select_suggestion(index) {
                    println!("No suggestion {}", index + 1);
                    continue;
                }
            }
            Command::Here => model.locate(),
            Command::Unit(unit) => model.set_unit(unit),
            Command::Toggle => model.toggle_unit(),
            Command::Dismiss => model.dismiss_alert(),
            Command::Show => {}
            Command::Help => {
                println!("{}", HELP);
                continue;
            }
            Command::Quit => break,
        }

        settle_and_show(&mut model, settle);
    }

    services.shutdown();
    app.shutdown()?;

    Ok(())
}

fn settle_and_show(model: &mut DashboardModel, timeout: Duration) {
    if !model.wait_until_idle(timeout) {
        tracing::warn!("Dashboard still busy after {:?}", timeout);
    }
    println!("{}", render(model.state()));
}

/// Long enough for every retry of both requests in a load.
fn settle_timeout(services: &ServiceConfig) -> Duration {
    let attempts = u64::from(services.max_retries).saturating_add(1);
    Duration::from_secs(
        services
            .timeout_secs
            .saturating_add(2)
            .saturating_mul(2)
            .saturating_mul(attempts),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_covers_every_attempt() {
        let services = ServiceConfig::default();
        // (10 + 2) * 2 requests * 3 attempts
        assert_eq!(settle_timeout(&services), Duration::from_secs(72));
    }

    #[test]
    fn settle_saturates_on_huge_config() {
        let services = ServiceConfig {
            timeout_secs: u64::MAX,
            max_retries: u32::MAX,
            ..ServiceConfig::default()
        };
        assert_eq!(settle_timeout(&services), Duration::from_secs(u64::MAX));
    }
}
