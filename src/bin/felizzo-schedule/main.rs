// This file is part of felizzo-scheduler.
//
// felizzo-scheduler is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// felizzo-scheduler is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]

mod command_line;

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use anyhow::{Context, bail};
use clap::Parser;
use felizzo_scheduler::{
    Results, Schedule, ScheduleError, config::SchedulerConfig, roster, utils,
};
use log::{info, warn};

use crate::command_line::Args;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    utils::init_logger(args.debug, args.systemd);

    if args.man {
        return Args::generate_man_page();
    }

    let Some(roster_path) = &args.roster else {
        bail!("felizzo-schedule: --roster is required");
    };

    let mut config = match &args.config {
        Some(path) => SchedulerConfig::load(path)?,
        None => SchedulerConfig::default(),
    };
    args.override_config(&mut config);

    let roster = roster::load(roster_path)?;
    let mut schedule = Schedule::generate(
        &config.event,
        &roster,
        &config.format(),
        &config.distributor()?,
    )?;

    if let Some(path) = &args.results
        && path.exists()
    {
        apply_results(&mut schedule, path)?;
    }

    for record in &args.records {
        schedule.record_winner(&record.match_id, record.side)?;
        if let Some(winner) = schedule.winner(record.match_id.as_str()) {
            info!("{}: {winner} wins", record.match_id);
        }
    }

    match &args.results {
        Some(path) => {
            schedule.results().save(path)?;
            info!("results: saved {}", path.display());
        }
        None if !args.records.is_empty() => {
            warn!("results: no --results file, the recorded winners are only in the output");
        }
        None => {}
    }

    let output = if args.text {
        schedule.to_string()
    } else {
        serde_json::to_string_pretty(&schedule)?
    };

    match &args.output {
        Some(path) => {
            let mut temporary = path.as_os_str().to_owned();
            temporary.push(".tmp");

            fs::write(&temporary, output)
                .with_context(|| format!("output: failed to write {}", path.display()))?;
            fs::rename(&temporary, path)
                .with_context(|| format!("output: failed to replace {}", path.display()))?;

            info!("output: wrote {} matches to {}", schedule.len(), path.display());
        }
        None => writeln!(io::stdout(), "{output}")?,
    }

    Ok(())
}

fn apply_results(schedule: &mut Schedule, path: &Path) -> anyhow::Result<()> {
    let results = Results::load(path)?;

    match schedule.apply(&results) {
        Ok(()) => {
            info!(
                "results: {} winners from {}",
                results.winners.len(),
                path.display()
            );
            Ok(())
        }
        Err(error @ ScheduleError::StaleResults { .. }) => Err(error).with_context(|| {
            format!(
                "results: {} was recorded against another schedule, regenerate with the same \
                 roster and config or move it aside",
                path.display()
            )
        }),
        Err(error) => Err(error.into()),
    }
}
