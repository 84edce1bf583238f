//! Query command implementation

use log::debug;

use crate::cli::{CommandContext, GlobalOptions, OptionalStoreArgs};
use crate::client::QueryApi;
use crate::client::models::{GenerateContentRequest, GenerateContentResponse};
use crate::directory::{MODEL_PREFIX, ResourceKind};
use crate::error::Result;
use crate::models::QueryDisplay;
use crate::output;

/// Run the query command
pub async fn run(
    opts: &GlobalOptions,
    text: &[String],
    store: &OptionalStoreArgs,
    model: Option<&str>,
    metadata_filter: Option<&str>,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let store_id = ctx.optional_store(store).await?;
    let model = model
        .filter(|m| !m.is_empty())
        .unwrap_or(ctx.config.default_model());
    let model_id = model_path(model);

    let response = ask(
        ctx.client.as_ref(),
        &model_id,
        &text.join(" "),
        store_id,
        metadata_filter,
    )
    .await?;

    output::print(&QueryDisplay::new(&response), ctx.format)
}

/// Model ids are what users type (`gemini-2.5-flash`); the API wants
/// `models/gemini-2.5-flash`. Full ids pass through unchanged.
pub fn model_path(model: &str) -> String {
    if ResourceKind::Model.is_identifier(model) {
        model.to_string()
    } else {
        format!("{}{}", MODEL_PREFIX, model)
    }
}

/// Send one question, grounded on `store` when given.
pub async fn ask<C: QueryApi + ?Sized>(
    client: &C,
    model: &str,
    question: &str,
    store: Option<String>,
    metadata_filter: Option<&str>,
) -> Result<GenerateContentResponse> {
    let request = GenerateContentRequest::prompt(question).with_file_search(
        store.into_iter().collect(),
        metadata_filter
            .filter(|f| !f.is_empty())
            .map(str::to_string),
    );
    debug!("Querying {} ({} tools)", model, request.tools.len());

    Ok(client.generate_content(model, &request).await?)
}
