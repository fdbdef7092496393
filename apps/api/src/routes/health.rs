/// GET /health
/// Static liveness string; no dependencies are checked.
pub async fn health_handler() -> &'static str {
    "Job ad analysis API is running"
}
