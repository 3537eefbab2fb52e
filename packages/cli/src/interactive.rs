//! Menu-driven stage selection using `dialoguer`.

use book_pipeline::PipelineConfig;
use book_pipeline::inspect::DEFAULT_SAMPLE_SIZE;
use book_pipeline_cli_utils::MultiProgress;
use dialoguer::{Input, Select};

use crate::stages;

/// Stages available from the menu.
enum Stage {
    Extract,
    Transform,
    Inspect,
    RunAll,
}

impl Stage {
    const ALL: &[Self] = &[Self::RunAll, Self::Extract, Self::Transform, Self::Inspect];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::RunAll => "Run extract and transform",
            Self::Extract => "Extract catalog page into DocumentDB",
            Self::Transform => "Transform listings into DynamoDB",
            Self::Inspect => "Inspect stored listings",
        }
    }
}

/// Prompts for a stage and runs it.
///
/// # Errors
///
/// Returns an error if the prompt fails or the selected stage aborts.
pub async fn run(
    config: &PipelineConfig,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Book Pipeline");
    println!();

    let labels: Vec<&str> = Stage::ALL.iter().map(Stage::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Stage::ALL[idx] {
        Stage::RunAll => stages::run_all(config, multi).await?,
        Stage::Extract => stages::extract(config, multi).await?,
        Stage::Transform => stages::transform(config, multi).await?,
        Stage::Inspect => {
            let limit: u32 = Input::new()
                .with_prompt("Number of listings to show")
                .default(DEFAULT_SAMPLE_SIZE)
                .validate_with(|n: &u32| validate_limit(*n))
                .interact_text()?;
            stages::inspect(config, limit).await?;
        }
    }

    Ok(())
}

fn validate_limit(limit: u32) -> Result<(), &'static str> {
    if limit == 0 {
        Err("Enter a number of at least 1")
    } else {
        Ok(())
    }
}
