use anyhow::Result;
use clap::{Parser, Subcommand};
use label_sheet::{FontCatalog, LabelJob, LabelTemplate};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "labelpress", about = "Label sheet generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a job file to a PDF label sheet
    Render {
        /// Job description (JSON)
        #[arg(short, long)]
        job: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Replace the job's templates with rows from a CSV file
        /// (columns: title, subtitle, price, quantity, extra)
        #[arg(long)]
        templates_csv: Option<PathBuf>,

        /// Logo image to place on each label
        #[arg(long)]
        logo: Option<PathBuf>,

        /// Register a TTF family, as Family=path/to/font.ttf (repeatable)
        #[arg(long = "font", value_name = "FAMILY=PATH")]
        fonts: Vec<String>,

        /// Register a TTF family and mark it Arabic-capable
        #[arg(long, value_name = "FAMILY=PATH")]
        arabic_font: Option<String>,
    },

    /// Write a starter job file to edit by hand
    Init {
        /// Output JSON file
        #[arg(short, long, default_value = "job.json")]
        output: PathBuf,
    },
}

fn parse_font_arg(arg: &str) -> Result<(String, PathBuf)> {
    let (family, path) = arg
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected FAMILY=PATH, got '{}'", arg))?;
    Ok((family.to_string(), PathBuf::from(path)))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            job,
            output,
            templates_csv,
            logo,
            fonts,
            arabic_font,
        } => {
            let mut job = LabelJob::load(&job).await?;

            if let Some(csv_path) = templates_csv {
                job.templates = label_sheet::load_templates_from_csv(&csv_path).await?;
                println!("Loaded {} templates from {}", job.templates.len(), csv_path.display());
            }

            if logo.is_some() {
                job.logo_path = logo;
            }

            let mut catalog = FontCatalog::with_builtins();
            for font_arg in &fonts {
                let (family, path) = parse_font_arg(font_arg)?;
                let bytes = tokio::fs::read(&path).await?;
                if let Err(e) = catalog.register_ttf(&family, &bytes) {
                    log::warn!("skipping font '{}': {}", family, e);
                }
            }
            if let Some(arabic_arg) = &arabic_font {
                let (family, path) = parse_font_arg(arabic_arg)?;
                let bytes = tokio::fs::read(&path).await?;
                if let Err(e) = catalog.register_arabic_ttf(&family, &bytes) {
                    log::warn!("Arabic font '{}' unusable: {}", family, e);
                }
            }

            label_sheet::render_sheet(&job, &catalog, &output).await?;
            println!(
                "Rendered {} labels → {}",
                job.copies,
                output.display()
            );
        }

        Commands::Init { output } => {
            let job = LabelJob {
                copies: 6,
                templates: vec![LabelTemplate {
                    title: Some("Oud Royal".into()),
                    subtitle: Some("Shop A".into()),
                    price: Some("1500".into()),
                    quantity: Some("2".into()),
                    ..Default::default()
                }],
                ..Default::default()
            };
            job.save(&output).await?;
            println!("Wrote starter job → {}", output.display());
        }
    }

    Ok(())
}
