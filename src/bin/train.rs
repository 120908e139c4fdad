//! Offline trainer for the HeartGuard risk model.
//!
//! # Usage
//!
//! ```bash
//! heartguard-train train --data data/heart.csv --model-dir model
//! heartguard-train evaluate --seed 7 --trees 200
//! ```
//!
//! `train` fits the scaler and forest and writes them with their manifest;
//! `evaluate` runs the same pipeline and prints the full classification
//! report without touching the model directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use heartguard::adapters::artifacts::FsArtifactStore;
use heartguard::adapters::csv::CsvDataset;
use heartguard::application::{TrainingConfig, TrainingOutcome, TrainingService};
use heartguard::config::{LogMode, Settings};
use heartguard::logging;

#[derive(Parser)]
#[command(name = "heartguard-train")]
#[command(about = "Train and evaluate the HeartGuard heart disease model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Headerless 14-column CSV dataset
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Directory for scaler, model and manifest
    #[arg(long, global = true)]
    model_dir: Option<PathBuf>,

    /// Seed for the stratified split
    #[arg(long, global = true, default_value_t = 42)]
    seed: u64,

    /// Fraction of rows held out for evaluation
    #[arg(long, global = true, default_value_t = 0.2)]
    test_size: f64,

    /// Number of trees in the forest
    #[arg(long, global = true, default_value_t = 100, value_parser = at_least_one())]
    trees: usize,

    /// Maximum depth of each tree
    #[arg(long, global = true, default_value_t = 5, value_parser = at_least_one())]
    max_depth: usize,
}

fn at_least_one() -> clap::builder::RangedU64ValueParser<usize> {
    clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the model and persist the artifacts
    Train,

    /// Fit the model and print the classification report (nothing is saved)
    Evaluate,
}

impl Cli {
    fn settings(&self) -> Settings {
        let mut settings = Settings::from_env();
        if let Some(data) = &self.data {
            settings.data_path.clone_from(data);
        }
        if let Some(dir) = &self.model_dir {
            settings.model_dir.clone_from(dir);
        }
        // The trainer is never a TUI; keep logs on stdout unless forced to file.
        if settings.log_mode == LogMode::Auto {
            settings.log_mode = LogMode::Stdout;
        }
        settings
    }

    fn training_config(&self) -> TrainingConfig {
        let mut config = TrainingConfig {
            test_size: self.test_size,
            seed: self.seed,
            ..TrainingConfig::default()
        };
        config.params.n_trees = self.trees;
        config.params.max_depth = self.max_depth;
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings();
    let _guard = logging::init(&settings, false)?;

    let service = TrainingService::new(
        CsvDataset::new(&settings.data_path),
        cli.training_config(),
    );

    match cli.command {
        Commands::Train => cmd_train(&service, &settings),
        Commands::Evaluate => cmd_evaluate(&service),
    }
}

fn run_pipeline(service: &TrainingService<CsvDataset>) -> Result<TrainingOutcome> {
    service
        .train()
        .with_context(|| format!("Training on {:?} failed", service.source().path()))
}

fn print_summary(service: &TrainingService<CsvDataset>, outcome: &TrainingOutcome) {
    let config = service.config();
    let cleaning = &outcome.cleaning;
    println!("Forest");
    println!("======");
    println!("Trees:        {}", config.params.n_trees);
    println!("Max depth:    {}", config.params.max_depth);
    println!("Split seed:   {}", config.seed);
    println!("Test size:    {}", config.test_size);
    println!();
    println!("Dataset");
    println!("=======");
    println!("Raw rows:     {}", cleaning.raw_rows);
    println!("Kept rows:    {}", cleaning.kept_rows);
    println!("Dropped rows: {}", cleaning.dropped_rows);
    println!("Train rows:   {}", outcome.train_rows);
    println!("Test rows:    {}", outcome.test_rows);
    println!();
}

fn cmd_train(service: &TrainingService<CsvDataset>, settings: &Settings) -> Result<()> {
    let outcome = run_pipeline(service)?;
    print_summary(service, &outcome);

    let store = FsArtifactStore::new(&settings.model_dir);
    service
        .persist(&store, &outcome)
        .with_context(|| format!("Failed to save artifacts to {:?}", settings.model_dir))?;

    println!("Model Accuracy: {:.4}", outcome.evaluation.accuracy);
    println!("Model and scaler saved to {:?}", settings.model_dir);
    Ok(())
}

fn cmd_evaluate(service: &TrainingService<CsvDataset>) -> Result<()> {
    let outcome = run_pipeline(service)?;
    print_summary(service, &outcome);

    println!("Accuracy: {:.4}", outcome.evaluation.accuracy);
    println!();
    println!("Classification Report:");
    println!("{}", outcome.evaluation);
    println!("Confusion Matrix:");
    println!("{}", outcome.evaluation.confusion_table());
    Ok(())
}
