pub mod builder;
pub mod config;
pub mod container;
pub mod error;
pub mod logging;
pub mod model;
pub mod render;
pub mod timespan;
pub mod writer;

pub use config::{CliArgs, ConvertConfig};
pub use error::{ConvertError, RestoreOutcome};
pub use logging::{LogFormat, LoggingConfig, init_logging};

use anyhow::{Context, Result};
use std::fs;

/// Run the whole conversion: read the project archive, build the model,
/// render the document set, and write it out. Fails fast on the first
/// unrecovered error; documents already written stay in place.
pub fn run(config: &ConvertConfig) -> Result<()> {
    config.ensure_input()?;

    tracing::info!(
        input = ?config.input,
        output = ?config.output_dir,
        "converting project"
    );

    let document = container::open_project(&config.input)?;
    let model = builder::build(document)?;

    tracing::info!(
        types = model.types.len(),
        entities = model.entities.len(),
        events = model.events.len(),
        "project model built"
    );

    let documents = render::render(&model);

    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("cannot create output directory {:?}", config.output_dir)
    })?;
    for document in &documents {
        writer::write_document(&config.document_path(&document.title), &document.content)?;
    }

    tracing::info!(documents = documents.len(), "conversion complete");
    Ok(())
}
