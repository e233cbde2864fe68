mod collect_files;
mod correct_directory;
mod list_runs;
mod request_corrections;
mod review_file;
mod update_originals;

pub use collect_files::CollectFilesParams;
pub use correct_directory::CorrectDirectoryParams;
pub use list_runs::ListRunsParams;
pub use request_corrections::RequestCorrectionsParams;
pub use review_file::ReviewFileParams;
pub use update_originals::UpdateOriginalsParams;
