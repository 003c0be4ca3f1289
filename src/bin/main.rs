//! Word kernel command line interface
//!
//! Computes kernel matrices and explicit feature map decision values for word
//! sequence files.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use wordkernel::report::Scores;
use wordkernel::{
    CommWordKernel, Kernel, KernelConfig, LinearAdd, Normalization, Result, ScoreReport,
    SequenceSet, SequenceStore,
};

#[derive(Parser)]
#[command(name = "wordkernel")]
#[command(about = "Common word kernels for sorted word sequences")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "wordkernel contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the kernel matrix between two sequence files
    Matrix(MatrixArgs),
    /// Score sequences against weighted support sequences
    Predict(PredictArgs),
    /// Display a saved report
    Info(InfoArgs),
}

#[derive(Args, Clone)]
struct KernelArgs {
    /// Count each shared word once
    #[arg(long)]
    sign: bool,

    /// Normalization of kernel values
    #[arg(short, long, default_value = "full")]
    normalization: CliNormalization,

    /// Input format
    #[arg(short, long, default_value = "words")]
    format: CliFormat,

    /// k-mer order for the dna format
    #[arg(long, default_value = "3")]
    order: usize,

    /// Kernel value cache size in entries (0 disables)
    #[arg(long, default_value = "0")]
    cache_entries: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliNormalization {
    /// No normalization
    #[value(name = "none")]
    None,
    /// Square root of the diagonal product
    #[value(name = "sqrt")]
    SqrtDiagonal,
    /// Full diagonal product (unit self-similarity)
    #[value(name = "full")]
    FullDiagonal,
    /// Square root of the square root of the length product
    #[value(name = "sqrtlen")]
    SqrtSqrtLength,
    /// Square root of the length product
    #[value(name = "len")]
    SqrtLength,
    /// Length product
    #[value(name = "sqlen")]
    Length,
}

impl From<CliNormalization> for Normalization {
    fn from(cli_normalization: CliNormalization) -> Self {
        match cli_normalization {
            CliNormalization::None => Normalization::None,
            CliNormalization::SqrtDiagonal => Normalization::SqrtDiagonal,
            CliNormalization::FullDiagonal => Normalization::FullDiagonal,
            CliNormalization::SqrtSqrtLength => Normalization::SqrtSqrtLength,
            CliNormalization::SqrtLength => Normalization::SqrtLength,
            CliNormalization::Length => Normalization::Length,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliFormat {
    /// `label symbol symbol ...` per line
    #[value(name = "words")]
    Words,
    /// `label ACGT...` per line, split into k-mers
    #[value(name = "dna")]
    Dna,
}

impl KernelArgs {
    fn config(&self) -> KernelConfig {
        KernelConfig::default()
            .with_sign(self.sign)
            .with_normalization(self.normalization.into())
            .with_cache_entries(self.cache_entries)
    }

    fn load(&self, path: &Path) -> Result<SequenceSet> {
        info!("Loading {:?} as {:?}", path, self.format);
        let set = match self.format {
            CliFormat::Words => SequenceSet::from_file(path)?,
            CliFormat::Dna => SequenceSet::from_dna_file(path, self.order)?,
        };
        info!(
            "Loaded {} sequences with {} words",
            set.len(),
            set.total_symbols()
        );
        Ok(set)
    }
}

#[derive(Args)]
struct MatrixArgs {
    /// Left sequence file
    #[arg(long)]
    lhs: PathBuf,

    /// Right sequence file (defaults to the left file)
    #[arg(long)]
    rhs: Option<PathBuf>,

    /// Output report file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    kernel: KernelArgs,
}

#[derive(Args)]
struct PredictArgs {
    /// Support sequence file; each label is used as the sequence weight
    #[arg(long)]
    support: PathBuf,

    /// Sequences to score
    #[arg(long)]
    data: PathBuf,

    /// Bias added to every decision value
    #[arg(short, long, default_value = "0.0", allow_hyphen_values = true)]
    bias: f64,

    /// Output report file (optional, prints to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also score through pairwise kernel values and report the deviation
    #[arg(long)]
    check: bool,

    #[command(flatten)]
    kernel: KernelArgs,
}

#[derive(Args)]
struct InfoArgs {
    /// Report file
    report: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Matrix(args) => matrix_command(args),
        Commands::Predict(args) => predict_command(args),
        Commands::Info(args) => info_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn matrix_command(args: MatrixArgs) -> Result<()> {
    let lhs = Arc::new(args.kernel.load(&args.lhs)?);
    let rhs = match &args.rhs {
        Some(path) => Arc::new(args.kernel.load(path)?),
        None => Arc::clone(&lhs),
    };

    let mut kernel = CommWordKernel::new(args.kernel.config());
    kernel.init(lhs, rhs)?;

    let report = ScoreReport::matrix(&kernel)?;

    if let Some(output_path) = &args.output {
        report.save_to_file(output_path)?;
        info!("Report saved to: {output_path:?}");
    } else if let Scores::Matrix { rows } = &report.scores {
        for row in rows {
            let line: Vec<String> = row.iter().map(|value| format!("{value:.6}")).collect();
            println!("{}", line.join(" "));
        }
    }

    Ok(())
}

fn predict_command(args: PredictArgs) -> Result<()> {
    let support = Arc::new(args.kernel.load(&args.support)?);
    let data = Arc::new(args.kernel.load(&args.data)?);

    let indices: Vec<usize> = (0..support.len()).collect();
    let weights = support.labels().to_vec();

    let mut kernel = CommWordKernel::new(args.kernel.config());
    kernel.init(Arc::clone(&support), data)?;
    kernel.init_optimization(&indices, &weights)?;
    info!(
        "Feature map over {} support sequences uses {} words",
        indices.len(),
        kernel.optimization_words()
    );

    let report = ScoreReport::decision(&kernel, args.bias)?;
    let Scores::Decision { values, .. } = &report.scores else {
        unreachable!("decision reports hold decision values");
    };

    if args.check {
        let mut max_deviation: f64 = 0.0;
        for (j, &value) in values.iter().enumerate() {
            let mut expected = args.bias;
            for (&i, &weight) in indices.iter().zip(&weights) {
                expected += weight * kernel.compute(i, j)?;
            }
            max_deviation = max_deviation.max((expected - value).abs());
        }
        if max_deviation > 1e-9 {
            warn!("Feature map deviates from pairwise scoring by {max_deviation:e}");
        }
        println!("# Max deviation from pairwise scoring: {max_deviation:e}");
    }

    if let Some(output_path) = &args.output {
        report.save_to_file(output_path)?;
        info!("Report saved to: {output_path:?}");
    } else {
        println!("# Decision values for {} sequences", values.len());
        println!("# Format: sequence_index predicted_label decision_value");
        for (j, value) in values.iter().enumerate() {
            let label = if *value >= 0.0 { 1 } else { -1 };
            println!("{j} {label} {value:.6}");
        }
    }

    Ok(())
}

fn info_command(args: InfoArgs) -> Result<()> {
    info!("Loading report from: {:?}", args.report);
    let report = ScoreReport::load_from_file(&args.report)?;

    report.print_summary();

    match &report.scores {
        Scores::Matrix { rows } => {
            let n_show = rows.len().min(5);
            println!("\nFirst rows:");
            for (i, row) in rows.iter().enumerate().take(n_show) {
                let shown: Vec<String> =
                    row.iter().take(5).map(|value| format!("{value:.4}")).collect();
                println!("  {i}: {}", shown.join(" "));
            }
            if rows.len() > n_show {
                println!("  ... ({} more)", rows.len() - n_show);
            }
        }
        Scores::Decision { values, .. } => {
            let positive = values.iter().filter(|&&value| value >= 0.0).count();
            println!("\nPositive: {positive}");
            println!("Negative: {}", values.len() - positive);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_normalization_mapping() {
        assert_eq!(
            Normalization::from(CliNormalization::FullDiagonal),
            Normalization::FullDiagonal
        );
        assert_eq!(Normalization::from(CliNormalization::Length), Normalization::Length);
    }

    #[test]
    fn test_cli_parses_predict() {
        let cli = Cli::try_parse_from([
            "wordkernel",
            "predict",
            "--support",
            "sv.txt",
            "--data",
            "test.txt",
            "--bias",
            "-0.5",
            "--sign",
            "-n",
            "none",
        ])
        .expect("Arguments should parse");

        match cli.command {
            Commands::Predict(args) => {
                assert_eq!(args.bias, -0.5);
                let config = args.kernel.config();
                assert!(config.use_sign);
                assert_eq!(config.normalization, Normalization::None);
            }
            _ => panic!("expected predict command"),
        }
    }
}
