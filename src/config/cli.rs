use crate::domain::model::Direction;
use clap::{ArgGroup, Parser};

#[derive(Debug, Clone, Parser)]
#[command(name = "clock-agent")]
#[command(about = "Clocks you in or out of the time-tracking web app")]
#[command(group(
    ArgGroup::new("direction")
        .required(true)
        .args(["clock_in", "clock_out"]),
))]
pub struct CliConfig {
    #[arg(short = 'i', long, help = "clocks you in")]
    pub clock_in: bool,

    #[arg(short = 'o', long, help = "clocks you out")]
    pub clock_out: bool,
}

impl CliConfig {
    pub fn direction(&self) -> Direction {
        if self.clock_in {
            Direction::ClockIn
        } else {
            Direction::ClockOut
        }
    }
}
