use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use plantdoc_pdf::{DiagnosisResult, ExportConfig, export_report_to_file};

#[derive(Parser, Debug)]
#[command(version, about = "Paginate a rendered plant diagnosis report into a PDF")]
struct Args {
    /// Rasterized report surface (PNG or JPEG)
    #[arg(long)]
    surface: PathBuf,

    /// Geometry manifest measured on the report layout (JSON)
    #[arg(long)]
    manifest: PathBuf,

    /// Diagnosis result used for naming and document metadata (JSON)
    #[arg(long)]
    diagnosis: Option<PathBuf>,

    /// Export settings (JSON); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file, or a directory to name the file in
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for the report, named after the plant and today's date
    #[arg(long, conflicts_with = "output")]
    out_dir: Option<PathBuf>,

    /// Page margin in millimeters
    #[arg(long)]
    margin: Option<f64>,

    /// Rounding tolerance in raster pixels
    #[arg(long)]
    safety_margin: Option<f64>,
}

impl Args {
    /// Where the report goes; defaults to the working directory.
    fn target(&self) -> PathBuf {
        self.out_dir
            .clone()
            .or_else(|| self.output.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn run(args: Args) -> Result<PathBuf, plantdoc_pdf::Error> {
    let mut config = match &args.config {
        Some(path) => ExportConfig::from_json_file(path)?,
        None => ExportConfig::default(),
    };
    if let Some(margin) = args.margin {
        config.margin_mm = margin;
    }
    if let Some(safety) = args.safety_margin {
        config.safety_margin_px = safety;
    }

    let diagnosis = args
        .diagnosis
        .as_deref()
        .map(DiagnosisResult::from_json_file)
        .transpose()?;

    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir)?;
    }

    export_report_to_file(
        &args.surface,
        &args.manifest,
        diagnosis.as_ref(),
        &config,
        &args.target(),
    )
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(args) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            if e.is_retryable() {
                eprintln!("The export can be retried.");
            }
            ExitCode::FAILURE
        }
    }
}
