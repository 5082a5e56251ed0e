use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;

use matrix_calculator::config::Config;
use matrix_calculator::logging;
use matrix_calculator::matrix::Matrix;
use matrix_calculator::matrix_io;
use matrix_calculator::operations::Operation;
use matrix_calculator::session::{Session, Slot};

#[derive(Parser)]
#[command(name = "matrix-calculator")]
#[command(about = "Add, subtract, multiply and take determinants of matrices stored as text")]
#[command(version)]
struct Cli {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// A + B
    Sum { a: PathBuf, b: PathBuf },

    /// A - B
    Subtract { a: PathBuf, b: PathBuf },

    /// A * B
    Multiply { a: PathBuf, b: PathBuf },

    /// Determinant of a square matrix
    Det { file: PathBuf },

    /// Load a matrix and print it
    Show { file: PathBuf },

    /// Write a matrix of standard-normal values
    Random {
        rows: usize,
        cols: usize,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Output file, printed to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_json(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    if let Err(e) = logging::init(&config.log_filter) {
        eprintln!("Error initialising logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli.command, &config) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: &Config) -> Result<String, Box<dyn std::error::Error>> {
    let mut session = Session::new().with_elimination_tracing(config.trace_elimination);
    let places = config.decimal_places;

    let (op, a, b) = match command {
        Commands::Sum { a, b } => (Operation::Sum, a, b),
        Commands::Subtract { a, b } => (Operation::Subtract, a, b),
        Commands::Multiply { a, b } => (Operation::Multiply, a, b),
        Commands::Det { file } => {
            session.load(Slot::A, file)?;
            return Ok(format!("{}\n", session.determinant(Slot::A)?.render(places)));
        }
        Commands::Show { file } => {
            session.load(Slot::A, file)?;
            return Ok(session.describe(Slot::A, places)?);
        }
        Commands::Random {
            rows,
            cols,
            seed,
            output,
        } => {
            let matrix = Matrix::random(rows, cols, seed)?;
            return match output {
                Some(path) => {
                    matrix_io::write_matrix_to_file(&path, &matrix)?;
                    Ok(format!("wrote {} matrix to {}\n", matrix.dims(), path.display()))
                }
                None => Ok(matrix_io::encode(&matrix)),
            };
        }
    };

    session.load(Slot::A, a)?;
    session.load(Slot::B, b)?;
    Ok(session.run(op)?.render(places))
}
