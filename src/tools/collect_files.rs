#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CollectFilesParams {
    /// Directory to scan
    pub root: String,
    /// File extensions to match, e.g. ["cs", ".ts"]
    pub extensions: Vec<String>,
    /// Folder names to skip; the built-in set is used when omitted
    pub excluded: Option<Vec<String>>,
}
