//! Instruction template rendering.
//!
//! The assistant persona, citation rules and link catalog are natural-language
//! configuration, not control logic. They live as Tera templates under
//! `src/prompts/` so the wording can change without touching orchestration
//! code. The current date is injected so the model can filter stale event
//! listings.

use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tera::{Context, Error as TeraError, Tera};

use crate::intent::SportCategory;

/// Template for the club assistant's instruction block.
pub const ASSISTANT_TEMPLATE: &str = "vereinsassistent.md";

#[derive(Debug, Serialize)]
pub struct PromptContext {
    /// Today's date, ISO formatted, for filtering past events.
    pub current_date: String,
    /// Detected sport category, if any, restricting retrieval.
    pub category: Option<SportCategory>,
}

impl PromptContext {
    pub fn new(category: Option<SportCategory>) -> Self {
        Self {
            current_date: Local::now().format("%Y-%m-%d").to_string(),
            category,
        }
    }
}

/// Get the path to the prompts directory
fn prompts_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir).join("src").join("prompts")
}

pub fn load_prompt<T: Serialize>(template: &str, context_data: &T) -> Result<String, TeraError> {
    let mut tera = Tera::default();
    tera.add_raw_template("inline_template", template)?;
    let context = Context::from_serialize(context_data)?;
    let rendered = tera.render("inline_template", &context)?;
    Ok(rendered)
}

pub fn load_prompt_file<T: Serialize>(
    template_file: impl Into<PathBuf>,
    context_data: &T,
) -> Result<String, TeraError> {
    let template_path = template_file.into();
    // if the template_file doesn't exist, try to load it from the prompts directory
    let file_path = if !template_path.exists() {
        prompts_dir().join(template_path)
    } else {
        template_path
    };

    let template_content = fs::read_to_string(file_path)
        .map_err(|e| TeraError::chain("Failed to read template file", e))?;
    load_prompt(&template_content, context_data)
}

/// Render the club assistant instruction block for one request.
pub fn assistant_instructions(category: Option<SportCategory>) -> Result<String, TeraError> {
    load_prompt_file(ASSISTANT_TEMPLATE, &PromptContext::new(category))
}
