/// Input parameters for the `request_corrections` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct RequestCorrectionsParams {
    pub root: String,
    pub extensions: Vec<String>,
    /// Where corrected copies are written
    pub output_dir: Option<String>,
}
