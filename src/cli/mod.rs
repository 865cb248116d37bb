// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses command line arguments with clap and delegates all
// work to Layer 2 (application).
//
//   1. `train`   — builds vocabulary + embeddings, trains, saves
//   2. `predict` — loads the artifact and scores a question pair
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, TrainArgs};

use crate::domain::traits::PairScorer;
use crate::ml::trainer::DECISION_THRESHOLD;

#[derive(Parser, Debug)]
#[command(
    name = "siamese-qq",
    version = "0.1.0",
    about = "Train a siamese BiLSTM model to detect duplicate questions, then score new pairs."
)]
pub struct Cli {
    /// The subcommand to run (train or predict)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => Self::run_train(args),
            Commands::Predict(args) => Self::run_predict(args),
        }
    }

    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on '{}'", args.train_csv);

        let use_case = TrainUseCase::new(args.into());
        let summary  = use_case.execute()?;

        println!(
            "Training time finished.\n{} epochs in {:>12.2}s",
            summary.epochs,
            summary.elapsed.as_secs_f64()
        );
        match (summary.last_val_acc, summary.best_val_acc) {
            (Some(last), Some(best)) => println!("val_acc {:.4} (max: {:.4})", last, best),
            _ => println!("val_acc n/a (empty validation split)"),
        }
        println!("Done.");
        Ok(())
    }

    fn run_predict(args: PredictArgs) -> Result<()> {
        use crate::application::predict_use_case::PredictUseCase;

        let scorer = PredictUseCase::new(&args.artifact_dir)?;
        let p      = scorer.score(&args.question1, &args.question2)?;

        println!("similarity: {:.4}", p);
        println!("is_duplicate: {}", u8::from(p > DECISION_THRESHOLD));
        Ok(())
    }
}
