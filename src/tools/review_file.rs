/// Input parameters for the `review_file` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ReviewFileParams {
    /// Path to the source file to review
    pub file_path: String,
}
