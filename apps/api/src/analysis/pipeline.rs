//! Analysis pipeline — orchestrates one request end to end.
//!
//! Flow: AnalysisRequest → prompts::build → TextModel::invoke → resolver::resolve.
//! Each call is independent; nothing is shared or persisted between requests.

use tracing::{info, warn};

use crate::analysis::input::AnalysisRequest;
use crate::analysis::prompts;
use crate::analysis::resolver::{resolve, ResolveError};
use crate::analysis::schema::AnalysisResult;
use crate::errors::AppError;
use crate::llm_client::{SchemaLevel, TextModel};

pub async fn analyze(
    request: &AnalysisRequest,
    model: &dyn TextModel,
    level: SchemaLevel,
) -> Result<AnalysisResult, AppError> {
    info!(
        source = request.source_kind.as_str(),
        chars = request.content.chars().count(),
        "Analyzing job ad"
    );

    let envelope = prompts::build(request);

    let output = model
        .invoke(&envelope, level)
        .await
        .map_err(|e| AppError::RemoteCapability(format!("{} call failed: {e}", model.model_name())))?;

    let result = resolve(&output).map_err(|e| match e {
        ResolveError::Unparsable { raw } => AppError::UnparsableOutput { raw },
    })?;

    if result.summary.is_empty() {
        warn!("Model output resolved without a summary");
    }

    Ok(result)
}
