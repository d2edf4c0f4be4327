use std::path::PathBuf;

use clap::{AppSettings, Parser};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{error, info};
use vec1::Vec1;

use msfreq::{CoveragePlotter, PlotError, RenderOptions, TerminalBackend};

/// Plot the frequency coverage of one or more measurement sets.
#[derive(Parser)]
#[clap(name = "ms-plot-freq")]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_long_args = true)]
struct Args {
    /// Measurement set(s) to plot.
    #[clap(required = true)]
    ms: Vec<PathBuf>,

    /// Plot all spectral windows in each measurement set. The default is to
    /// scan for the spectral windows used with the given intent.
    #[clap(short, long)]
    quick: bool,

    /// Frequency unit to plot in (Hz, kHz, MHz, GHz or THz).
    #[clap(short, long, default_value = "GHz")]
    unit: String,

    /// Put measurement set names on the y axis. The default is to only show
    /// them in the legend.
    #[clap(short, long)]
    ylabels: bool,

    /// Only plot spectral windows used with a STATE OBS_MODE matching this
    /// pattern.
    #[clap(short, long, default_value = "OBSERVE_TARGET")]
    intent: String,

    /// Only plot spectral windows used with a FIELD NAME matching this
    /// pattern.
    #[clap(short, long, default_value = "*")]
    field: String,

    /// Match the intent and field patterns against whole names, rather than
    /// anywhere within them.
    #[clap(short, long)]
    exact: bool,

    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,

    /// Disable progress bars.
    #[clap(long)]
    no_progress_bars: bool,
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbosity);

    if let Err(e) = try_main(args) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn try_main(args: Args) -> Result<(), PlotError> {
    // Don't bother reading anything if there's nowhere to plot it.
    let backend = TerminalBackend::detect()?;

    let ms_list = match Vec1::try_from_vec(args.ms) {
        Ok(ms_list) => ms_list,
        // clap requires at least one.
        Err(_) => unreachable!(),
    };
    info!("Plotting {} measurement set(s)", ms_list.len());

    let progress_bar = ProgressBar::with_draw_target(
        Some(ms_list.len() as _),
        if args.no_progress_bars {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stdout()
        },
    )
    .with_style(
        ProgressStyle::default_bar()
            .template("{msg:17}: [{wide_bar:.blue}] {pos:2}/{len:2} measurement sets ({elapsed_precise}<{eta_precise})").unwrap()
            .progress_chars("=> "),
    )
    .with_position(0)
    .with_message("Reading");
    progress_bar.tick();

    let mut plotter = CoveragePlotter::new(backend, ms_list).with_progress_bar(progress_bar);
    plotter.render(&RenderOptions {
        intent: args.intent,
        field: args.field,
        exact_match: args.exact,
        quick: args.quick,
        unit: args.unit,
        dataset_labels_on_axis: args.ylabels,
    })?;
    Ok(())
}

fn setup_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Info),
        1 => builder.filter_level(log::LevelFilter::Debug),
        2 => builder.filter_level(log::LevelFilter::Trace),
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
            builder.format(|buf, record| {
                use std::io::Write;

                let timestamp = buf.timestamp();
                let level = record.level();
                let target = record.target();
                let line = record.line().unwrap_or(0);
                let message = record.args();

                writeln!(buf, "[{timestamp} {level} {target}:{line}] {message}")
            })
        }
    };
    builder.init();
}
