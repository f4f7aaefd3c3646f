//! One-shot CLI run of the full pipeline.

use crate::config::Config;
use crate::pipeline::{Pipeline, VideoSource};
use anyhow::Result;

/// Run the pipeline once and print the artifact paths.
pub async fn run_analyze_command(config: Config, source: VideoSource, quiet: bool) -> Result<()> {
    let pipeline = Pipeline::new(config)?;

    if !quiet {
        println!(
            "transcriber: {}, analyzer: {}",
            pipeline.transcriber_model(),
            pipeline.analyzer_model()
        );
    }

    let result = pipeline.run(&source, quiet).await?;

    println!("audio:      {}", result.audio_path.display());
    println!("transcript: {}", result.transcript_path.display());
    println!("report:     {}", result.report_path.display());

    if !quiet {
        println!();
        println!("{}", result.report);
    }

    Ok(())
}
