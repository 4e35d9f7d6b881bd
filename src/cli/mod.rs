// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`    — fits both classifiers on a labelled CSV
//   2. `classify` — loads one classifier and labels comments
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use std::io;

use anyhow::Result;
use clap::Parser;
use commands::{ClassifyArgs, Commands, TrainArgs};

use crate::domain::traits::CommentClassifier;

#[derive(Parser, Debug)]
#[command(
    name = "comment-triage",
    version,
    about = "Categorise comments and suggest a reply for each one."
)]
pub struct Cli {
    /// The subcommand to run (train or classify)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case. The CLI layer only routes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Classify(args) => run_classify(args),
        }
    }
}

/// Handles the `train` subcommand.
fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on corpus: {}", args.corpus);

    let use_case = TrainUseCase::new(args.into());
    let trained  = use_case.execute()?;

    for t in &trained {
        println!(
            "{:<8} accuracy {:.3} ({} train / {} validation) → {} (report: {})",
            t.variant,
            t.accuracy,
            t.train_size,
            t.val_size,
            t.artifact_path.display(),
            t.report_path.display()
        );
    }
    println!("Training complete. Models saved to '{}'.", use_case.config().model_dir);
    Ok(())
}

/// Handles the `classify` subcommand in whichever mode the flags select.
fn run_classify(args: ClassifyArgs) -> Result<()> {
    use crate::application::classify_use_case::{write_result, ClassifyUseCase};

    let use_case = ClassifyUseCase::new(&(&args).into())?;

    if let Some(text) = &args.text {
        let result = use_case.classify(text)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            write_result(io::stdout().lock(), &result, use_case.shows_confidence())?;
        }
        return Ok(());
    }

    if let Some(job) = args.batch_job() {
        let summary = use_case.classify_batch(&job)?;
        println!("Saved categorized comments to {}", job.output.display());
        println!("{summary}");
        return Ok(());
    }

    let stdin  = io::stdin();
    let stdout = io::stdout();
    let handled = use_case.run_interactive(stdin.lock(), stdout.lock())?;
    tracing::debug!("Interactive session classified {} comments", handled);
    Ok(())
}
