use booking_probe::{catalog, fixtures::StayDates, verify, CatalogOptions, Error};
use clap::{builder::RangedU64ValueParser, Parser, ValueEnum};
use endpoint_probe::{ConsoleReporter, Harness, HarnessConfiguration, JsonReporter};
use std::{
    io::{self, Write},
    process::ExitCode,
    time::Duration,
};

/// Exit status when the run could not be set up or its report not written.
const SETUP_FAILURE: u8 = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "booking-probe")]
#[command(about = "Verifies the API of a deployed vacation rental booking site", long_about = None)]
struct Opts {
    /// Deployment to verify, e.g. https://booking.example.com
    #[arg(long, env = "BOOKING_PROBE_BASE_URL", default_value = "http://localhost:3000")]
    base_url: String,

    /// Per request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = RangedU64ValueParser::<u64>::new().range(1..))]
    timeout: u64,

    /// Timeout in seconds for payment and booking creation
    #[arg(long, default_value_t = 60, value_parser = RangedU64ValueParser::<u64>::new().range(1..))]
    payment_timeout: u64,

    /// Property to check, repeatable. The first one is used for pricing and payments
    #[arg(long = "property", value_name = "ID")]
    properties: Vec<u64>,

    /// Requests in flight at once; 1 runs the checks strictly in order
    #[arg(long, default_value_t = 1, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    concurrency: usize,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Also create a real booking upstream
    #[arg(long)]
    include_live_booking: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let opts = Opts::parse();
    let stdout = io::stdout();

    ExitCode::from(exit_status(run(opts, stdout.lock()).await))
}

fn exit_status(result: Result<u8, Error>) -> u8 {
    match result {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("booking-probe: {}", e);
            SETUP_FAILURE
        }
    }
}

async fn run<W: Write>(opts: Opts, mut out: W) -> Result<u8, Error> {
    let mut configuration = HarnessConfiguration::new(&opts.base_url)?;
    configuration.set_default_timeout(Duration::from_secs(opts.timeout));
    configuration.set_concurrency(opts.concurrency);
    let harness = Harness::with_configuration(configuration);

    let mut options = CatalogOptions::new(StayDates::from_today());
    if !opts.properties.is_empty() {
        options.property_ids = opts.properties.clone();
    }
    options.payment_timeout = Duration::from_secs(opts.payment_timeout);
    options.include_live_booking = opts.include_live_booking;

    let test_cases = catalog(&options)?;

    let summary = match opts.format {
        Format::Text => {
            writeln!(out, "Verifying {}", harness.configuration().base_url())?;
            writeln!(
                out,
                "Stay {} to {}, properties {:?}",
                options.dates.check_in, options.dates.check_out, options.property_ids
            )?;

            let mut reporter = ConsoleReporter::new(out);
            let summary = verify(&harness, &test_cases, &mut reporter).await;
            if let Some(e) = reporter.take_error() {
                return Err(e.into());
            }
            summary
        }
        Format::Json => {
            let mut reporter = JsonReporter::new(out);
            let summary = verify(&harness, &test_cases, &mut reporter).await;
            if let Some(e) = reporter.take_error() {
                return Err(e.into());
            }
            summary
        }
    };

    Ok(summary.exit_code())
}
