use crate::demo::{
    run_analytics_report, run_cohort_report, run_simulation, AnalyticsArgs, CohortReportArgs,
    SimulateArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use cohort_risk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Cohort Risk",
    about = "Run the academic early-warning service or inspect a cohort from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect a synthetic behavioral cohort
    Cohort {
        #[command(subcommand)]
        command: CohortCommand,
    },
    /// Score a survey dataset and print the collapse watchlist
    Analytics(AnalyticsArgs),
}

#[derive(Subcommand, Debug)]
enum CohortCommand {
    /// Print cohort statistics and the at-risk table
    Report(CohortReportArgs),
    /// Run a what-if simulation for one student
    Simulate(SimulateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Cohort {
            command: CohortCommand::Report(args),
        } => run_cohort_report(args),
        Command::Cohort {
            command: CohortCommand::Simulate(args),
        } => run_simulation(args),
        Command::Analytics(args) => run_analytics_report(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["cohort-risk-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn simulate_accepts_fix_flags_and_targets() {
        let cli = Cli::try_parse_from([
            "cohort-risk-api",
            "cohort",
            "simulate",
            "--student-id",
            "1004",
            "--seed",
            "9",
            "--fix-attendance",
            "--workload",
            "8",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Cohort {
                command: CohortCommand::Simulate(args),
            }) => {
                assert_eq!(args.student_id, 1004);
                assert_eq!(args.seed, Some(9));
                assert!(args.fix_attendance);
                assert!(!args.fix_workload);
                assert_eq!(args.workload, Some(8));
            }
            other => panic!("expected simulate command, got {other:?}"),
        }
    }

    #[test]
    fn analytics_requires_a_dataset() {
        assert!(Cli::try_parse_from(["cohort-risk-api", "analytics"]).is_err());
    }
}
