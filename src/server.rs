use std::path::{Path, PathBuf};

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};

use crate::{
    collector::collect_files_excluding,
    config::{default_output_dir, CorrectorConfig},
    error::CorrectorError,
    ollama::OllamaClient,
    pipeline::run_pipeline,
    prompt::{build_prompt, language_tag, truncate_chars},
    requester::request_corrections,
    store::RunStore,
    tools::{
        CollectFilesParams, CorrectDirectoryParams, ListRunsParams, RequestCorrectionsParams,
        ReviewFileParams, UpdateOriginalsParams,
    },
    updater::update_originals,
};

const DEFAULT_LIST_LIMIT: usize = 5;

#[derive(Clone)]
pub struct SourceCorrector {
    tool_router: ToolRouter<Self>,
    config: CorrectorConfig,
    client: OllamaClient,
    runs: RunStore,
}

fn mcp_error(e: CorrectorError) -> McpError {
    if e.is_invalid_argument() {
        McpError::invalid_params(e.to_string(), None)
    } else {
        McpError::internal_error(e.to_string(), None)
    }
}

#[tool_router]
impl SourceCorrector {
    pub fn new(config: CorrectorConfig) -> anyhow::Result<Self> {
        let client = OllamaClient::new(&config)?;
        Ok(Self {
            tool_router: Self::tool_router(),
            config,
            client,
            runs: RunStore::new(),
        })
    }

    fn output_dir(&self, requested: Option<String>) -> Result<PathBuf, McpError> {
        match requested {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => default_output_dir().map_err(mcp_error),
        }
    }

    #[tool(
        name = "collect_files",
        description = "List source files under a directory that match the given extensions, skipping build and vendor folders"
    )]
    async fn collect_files(
        &self,
        Parameters(params): Parameters<CollectFilesParams>,
    ) -> Result<CallToolResult, McpError> {
        let excluded = params
            .excluded
            .unwrap_or_else(|| self.config.excluded_folders.clone());
        let files = collect_files_excluding(Path::new(&params.root), &params.extensions, &excluded)
            .map_err(mcp_error)?;

        let text = if files.is_empty() {
            "No matching files found".to_string()
        } else {
            files
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join("\n")
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        name = "review_file",
        description = "Ask the local model to review one source file and return its raw answer"
    )]
    async fn review_file(
        &self,
        Parameters(params): Parameters<ReviewFileParams>,
    ) -> Result<CallToolResult, McpError> {
        let path = PathBuf::from(&params.file_path);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| McpError::internal_error(format!("Failed to read file: {e}"), None))?;
        let contents = String::from_utf8_lossy(&bytes);

        if contents.trim().is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "File is blank, nothing to review",
            )]));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| params.file_path.clone());
        let prompt = build_prompt(
            &file_name,
            &language_tag(&path),
            truncate_chars(&contents, self.config.char_budget),
        );

        let review = self
            .client
            .generate(&prompt)
            .await
            .and_then(|reply| reply.ok_or(CorrectorError::MissingResponse))
            .map_err(mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(review.trim())]))
    }

    #[tool(
        name = "request_corrections",
        description = "Review every matching file under a directory and write corrected copies to an output directory. Returns a run ID for update_originals"
    )]
    async fn request_corrections(
        &self,
        Parameters(params): Parameters<RequestCorrectionsParams>,
    ) -> Result<CallToolResult, McpError> {
        let root = PathBuf::from(&params.root);
        let output_dir = self.output_dir(params.output_dir)?;
        let files =
            collect_files_excluding(&root, &params.extensions, &self.config.excluded_folders)
                .map_err(mcp_error)?;

        let report =
            request_corrections(&self.client, &files, &output_dir, self.config.char_budget).await;
        let text = report.format_summary();
        let run_id = self.runs.save(root, files, report);
        tracing::info!(%run_id, "saved correction run");

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        name = "update_originals",
        description = "Overwrite original files with the corrected copies from a previous request_corrections run"
    )]
    async fn update_originals(
        &self,
        Parameters(params): Parameters<UpdateOriginalsParams>,
    ) -> Result<CallToolResult, McpError> {
        let Some(run) = self.runs.get(&params.run_id) else {
            return Err(McpError::invalid_params(
                format!("No run found with ID {}", params.run_id),
                None,
            ));
        };

        let report = update_originals(&run.originals, &run.report.records).await;
        Ok(CallToolResult::success(vec![Content::text(
            report.format_summary(),
        )]))
    }

    #[tool(name = "list_runs", description = "List the most recent correction runs")]
    async fn list_runs(
        &self,
        Parameters(params): Parameters<ListRunsParams>,
    ) -> Result<CallToolResult, McpError> {
        let runs = self
            .runs
            .list_recent(params.limit.unwrap_or(DEFAULT_LIST_LIMIT));

        let text = if runs.is_empty() {
            "No runs found".to_string()
        } else {
            runs.iter()
                .map(|r| r.format_summary())
                .collect::<Vec<_>>()
                .join("\n\n---\n\n")
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        name = "correct_directory",
        description = "Collect, review and (with apply=true) overwrite originals with corrections in one step"
    )]
    async fn correct_directory(
        &self,
        Parameters(params): Parameters<CorrectDirectoryParams>,
    ) -> Result<CallToolResult, McpError> {
        let output_dir = self.output_dir(params.output_dir)?;
        let report = run_pipeline(
            &self.config,
            Path::new(&params.root),
            &params.extensions,
            &output_dir,
            params.apply.unwrap_or(false),
        )
        .await
        .map_err(mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(
            report.format_summary(),
        )]))
    }
}

#[tool_handler]
impl ServerHandler for SourceCorrector {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Reviews source files with a local model and writes back suggested corrections.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;
    use serde_json::json;
    use std::fs;

    fn corrector_for(server: &mockito::Server) -> SourceCorrector {
        SourceCorrector::new(CorrectorConfig {
            endpoint: format!("{}/api/generate", server.url()),
            model: "test-model".into(),
            ..Default::default()
        })
        .unwrap()
    }

    fn text_of(result: &CallToolResult) -> String {
        let value = serde_json::to_value(result).unwrap();
        value["content"][0]["text"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn saved_run_can_be_applied_later() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_body(json!({ "response": "```csharp\nclass B { }\n```" }).to_string())
            .create_async()
            .await;

        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let b = src.path().join("B.cs");
        fs::write(&b, "class B {").unwrap();

        let corrector = corrector_for(&server);
        let result = corrector
            .request_corrections(Parameters(RequestCorrectionsParams {
                root: src.path().display().to_string(),
                extensions: vec!["cs".into()],
                output_dir: Some(out.path().display().to_string()),
            }))
            .await
            .unwrap();

        let run_id = corrector.runs.list_recent(1)[0].run_id.clone();
        assert!(text_of(&result).contains(&run_id));
        assert_eq!(fs::read_to_string(&b).unwrap(), "class B {");

        let result = corrector
            .update_originals(Parameters(UpdateOriginalsParams { run_id }))
            .await
            .unwrap();

        assert!(text_of(&result).starts_with("1 updated"));
        assert_eq!(fs::read_to_string(&b).unwrap(), "class B { }\n");
    }

    #[tokio::test]
    async fn unknown_run_id_is_invalid_params() {
        let server = mockito::Server::new_async().await;
        let err = corrector_for(&server)
            .update_originals(Parameters(UpdateOriginalsParams {
                run_id: "no-such-run".into(),
            }))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn empty_extensions_are_invalid_params() {
        let server = mockito::Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let err = corrector_for(&server)
            .collect_files(Parameters(CollectFilesParams {
                root: dir.path().display().to_string(),
                extensions: Vec::new(),
                excluded: None,
            }))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn endpoint_failure_is_internal_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(500)
            .with_body("model not loaded")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("A.cs");
        fs::write(&file, "class A { }").unwrap();

        let err = corrector_for(&server)
            .review_file(Parameters(ReviewFileParams {
                file_path: file.display().to_string(),
            }))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn blank_file_is_not_sent_for_review() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .expect(0)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Empty.cs");
        fs::write(&file, " \n\t").unwrap();

        let result = corrector_for(&server)
            .review_file(Parameters(ReviewFileParams {
                file_path: file.display().to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(text_of(&result), "File is blank, nothing to review");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_utf8_file_is_reviewed_lossily() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .match_body(mockito::Matcher::Regex("caf\u{FFFD}".into()))
            .with_body(json!({ "response": "  No errors found.\n" }).to_string())
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Latin1.cs");
        fs::write(&file, b"// caf\xE9\nclass A { }\n").unwrap();

        let result = corrector_for(&server)
            .review_file(Parameters(ReviewFileParams {
                file_path: file.display().to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(text_of(&result), "No errors found.");
    }
}
