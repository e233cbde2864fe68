/// Input parameters for the `correct_directory` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CorrectDirectoryParams {
    /// Directory to scan
    pub root: String,
    pub extensions: Vec<String>,
    pub output_dir: Option<String>,
    /// Overwrite the originals with the corrected copies
    pub apply: Option<bool>,
}
