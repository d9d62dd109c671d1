//! examforge CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::Globals;

#[derive(Parser)]
#[command(name = "examforge", version, about = "Grade-5 exam builder")]
struct Cli {
    /// Session file holding the matrix and the exam
    #[arg(long, global = true, default_value = commands::DEFAULT_SESSION)]
    session: PathBuf,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and sample outcome catalog
    Init,

    /// Browse the outcome catalog
    Catalog {
        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        topic: Option<String>,

        #[arg(long)]
        lesson: Option<String>,

        /// Outcome catalog, .csv or .xlsx (default: from config)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Add a row to the exam matrix
    AddRow {
        #[arg(long)]
        subject: String,

        #[arg(long)]
        topic: String,

        #[arg(long)]
        lesson: String,

        /// Outcome number as listed by `catalog`
        #[arg(long, conflicts_with = "outcome_text")]
        outcome: Option<usize>,

        /// Outcome text, bypassing the catalog
        #[arg(long)]
        outcome_text: Option<String>,

        /// Question type (mcq, tf, matching, fill, essay)
        #[arg(long = "type")]
        question_type: String,

        /// Level (M1, M2, M3)
        #[arg(long, default_value = "M1")]
        level: String,

        /// Base points per item
        #[arg(long, default_value = "0.5")]
        points: f64,

        /// Number of items
        #[arg(long, default_value = "1")]
        count: u32,

        /// Instructional periods; 0 looks them up in the period catalog
        #[arg(long, default_value = "0")]
        periods: u32,

        /// Point pool (1 or 2)
        #[arg(long, default_value = "1")]
        block: u8,
    },

    /// Show the matrix and the exam
    Show,

    /// Fill unknown period counts from the period catalog
    FillPeriods,

    /// Compute ratios and points from period counts
    Allocate {
        /// Spread 10 points over the whole exam instead of two blocks
        #[arg(long)]
        whole_exam: bool,

        /// Block 1 pool (default: from config)
        #[arg(long)]
        block1: Option<f64>,

        /// Block 2 pool (default: from config)
        #[arg(long)]
        block2: Option<f64>,
    },

    /// Remove every matrix row
    Clear,

    /// Generate question content for the matrix
    Generate {
        /// Use placeholder content without calling a service
        #[arg(long)]
        offline: bool,

        /// Regenerate the existing items, keeping their plans
        #[arg(long)]
        regenerate: bool,
    },

    /// Replace the content of one exam item
    Edit {
        /// Question number (1-based)
        #[arg(long)]
        item: usize,

        /// JSON file with the new content
        #[arg(long)]
        content: PathBuf,
    },

    /// Check question content JSON against the rules for its type
    Validate {
        /// Question type (mcq, tf, matching, fill, essay)
        #[arg(long = "type")]
        question_type: String,

        /// JSON file with the content
        #[arg(long)]
        content: PathBuf,
    },

    /// Write the exam document and a session snapshot
    Export {
        /// Output directory
        #[arg(long, default_value = "./examforge-output")]
        output: PathBuf,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        subject: Option<String>,

        /// Time in minutes
        #[arg(long)]
        time: Option<u32>,
    },

    /// Extract lesson period counts from a teaching-plan PDF
    ExtractPeriods {
        #[arg(long)]
        pdf: PathBuf,

        /// Output CSV (default: from config)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examforge=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let globals = Globals {
        session: cli.session,
        config: cli.config,
    };

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Catalog {
            subject,
            topic,
            lesson,
            file,
        } => commands::catalog::execute(&globals, subject, topic, lesson, file),
        Commands::AddRow {
            subject,
            topic,
            lesson,
            outcome,
            outcome_text,
            question_type,
            level,
            points,
            count,
            periods,
            block,
        } => commands::add_row::execute(
            &globals,
            commands::add_row::RowArgs {
                subject,
                topic,
                lesson,
                outcome,
                outcome_text,
                question_type,
                level,
                points,
                count,
                periods,
                block,
            },
        ),
        Commands::Show => commands::show::execute(&globals),
        Commands::FillPeriods => commands::fill_periods::execute(&globals),
        Commands::Allocate {
            whole_exam,
            block1,
            block2,
        } => commands::allocate::execute(&globals, whole_exam, block1, block2),
        Commands::Clear => commands::clear::execute(&globals),
        Commands::Generate {
            offline,
            regenerate,
        } => commands::generate::execute(&globals, offline, regenerate).await,
        Commands::Edit { item, content } => commands::edit::execute(&globals, item, content),
        Commands::Validate {
            question_type,
            content,
        } => commands::validate::execute(question_type, content),
        Commands::Export {
            output,
            title,
            subject,
            time,
        } => commands::export::execute(&globals, output, title, subject, time),
        Commands::ExtractPeriods { pdf, output } => {
            commands::extract_periods::execute(&globals, pdf, output)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
