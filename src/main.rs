use clap::{Parser, ValueEnum};
use gauss_jordan::matrix::matrix_gen::{generate_matrix, identity, MatrixKind};
use gauss_jordan::matrix::matrix_io::{read_matrix, read_matrix_from_file, write_matrix};
use gauss_jordan::utils::{millis, timed};
use gauss_jordan::{eliminate, EliminationConfig, Result, Strategy};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyKind {
    Sequential,
    Parallel,
    Pooled,
    Distributed,
}

/// Matrix inversion with Gauss-Jordan elimination on [A|I].
#[derive(Debug, Parser)]
#[command(name = "gauss-jordan", version)]
struct Args {
    /// Read the matrix from a file, or `-` for stdin: its size N, then N * N values
    #[arg(short, long, required_unless_present = "random", conflicts_with = "random")]
    input: Option<PathBuf>,

    /// Generate a random SIZE x SIZE matrix instead
    #[arg(short, long, value_name = "SIZE")]
    random: Option<usize>,

    #[arg(short, long, value_enum, default_value_t = StrategyKind::Sequential)]
    strategy: StrategyKind,

    /// Worker threads, or ranks for the distributed strategy
    #[arg(short, long, default_value_t = 4)]
    workers: usize,

    /// Write matrices to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pivots with an absolute value at or below this are treated as zero
    #[arg(long, default_value_t = 0.0)]
    tolerance: f64,

    /// Also print the augmented matrix before elimination
    #[arg(long)]
    show_input: bool,
}

impl Args {
    fn strategy(&self) -> Strategy {
        match self.strategy {
            StrategyKind::Sequential => Strategy::Sequential,
            StrategyKind::Parallel => Strategy::Parallel {
                workers: self.workers,
            },
            StrategyKind::Pooled => Strategy::Pooled {
                workers: self.workers,
            },
            StrategyKind::Distributed => Strategy::Distributed {
                participants: self.workers,
            },
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut matrix = match (&args.input, args.random) {
        (Some(path), _) if path.as_os_str() == "-" => read_matrix(io::stdin().lock())?,
        (Some(path), _) => read_matrix_from_file(path)?,
        (None, Some(size)) => generate_matrix(MatrixKind::Random, size),
        (None, None) => unreachable!("clap requires --input or --random"),
    };
    matrix.augment(&identity(matrix.rows()))?;

    let console = args.output.is_none();
    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    if args.show_input {
        if console {
            writeln!(writer, "Matrix before inversion:")?;
        }
        write_matrix(&matrix, &mut writer)?;
    }

    let config = EliminationConfig {
        pivot_tolerance: args.tolerance,
    };
    let (result, elapsed) = timed(|| eliminate(&mut matrix, args.strategy(), &config));
    result?;

    if console {
        writeln!(writer, "Matrix after inversion:")?;
    }
    write_matrix(&matrix, &mut writer)?;
    drop(writer);

    println!("Time taken by algorithm: {:.5}ms", millis(elapsed));
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}
