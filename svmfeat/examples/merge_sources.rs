use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use svmfeat::{
    compute_idf, normalize, BuildConfig, FeatureSpace, NormalizeConfig, ProblemBuilder, ProblemMerger,
    SvmError, WireWriter,
};
use tracing::Level;

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "svmfeat - Merge and normalize LIBSVM-format feature files")]
struct Cli {
    /// Log progress at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge training sources and save the resulting feature space
    Train {
        /// Source files, one per feature extractor
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Merged output file
        #[arg(short, long)]
        output: PathBuf,

        /// Where to save the feature space (JSON)
        #[arg(long)]
        space: PathBuf,
    },
    /// Merge test sources aligned to a saved feature space
    Test {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[arg(short, long)]
        output: PathBuf,

        /// Feature space saved by `train`
        #[arg(long)]
        space: PathBuf,
    },
    /// Normalize one file's values and write it back out
    Normalize {
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Keep raw values instead of binarizing
        #[arg(long)]
        no_binary: bool,

        /// Divide by the row sum
        #[arg(long)]
        tf: bool,

        /// Weight by inverse document frequency
        #[arg(long)]
        idf: bool,

        /// Skip unit-length normalization
        #[arg(long)]
        no_l2norm: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let start_time = std::time::Instant::now();
    if let Err(err) = run(cli.command) {
        eprintln!("error: {err}");
        eprintln!("status code: {}", err.code());
        process::exit(1);
    }
    println!("Completed in {:.2?}", start_time.elapsed());
}

fn run(command: Commands) -> Result<(), SvmError> {
    let merger = ProblemMerger::new();

    match command {
        Commands::Train { inputs, output, space } => {
            let report = merger.merge_files(&inputs, &output, &svmfeat::OffsetMode::Compute)?;
            FeatureSpace::from(&report).save(&space)?;
            println!(
                "Merged {} rows into {} features: offsets {:?}",
                report.rows,
                report.feature_dim(),
                report.offsets
            );
        }
        Commands::Test { inputs, output, space } => {
            let space = FeatureSpace::load(&space)?;
            let report = merger.merge_files(&inputs, &output, &space.align())?;
            println!("Merged {} rows, dropped {} pairs", report.rows, report.total_dropped());
        }
        Commands::Normalize {
            input,
            output,
            no_binary,
            tf,
            idf,
            no_l2norm,
        } => {
            let config = NormalizeConfig::none()
                .with_binary(!no_binary)
                .with_tf(tf)
                .with_idf(idf)
                .with_l2norm(!no_l2norm);

            let mut problem = ProblemBuilder::new(BuildConfig::default()).build_from_path(&input)?;
            let weights = config.idf.then(|| compute_idf(&problem));
            normalize(&mut problem, &config, weights.as_deref())?;

            let name = output.display().to_string();
            let file = File::create(&output).map_err(|e| SvmError::open(&name, e))?;
            let mut writer = WireWriter::named(BufWriter::new(file), name);
            writer.write_problem(&problem)?;
            writer.flush()?;
            println!("Wrote {} rows", writer.rows_written());
        }
    }

    Ok(())
}
