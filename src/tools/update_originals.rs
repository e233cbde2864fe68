#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UpdateOriginalsParams {
    // run returned by request_corrections
    pub run_id: String,
}
