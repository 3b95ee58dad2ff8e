use guriri_types::error::StorageError;
use guriri_types::live_doc::LiveDocFile;

/// Flat blob store keyed by file name.
///
/// Implemented by `LocalLiveDocStore` in guriri-infra.
pub trait LiveDocStore: Send + Sync + 'static {
    /// Write `content` under `file_name` and return the stored path.
    fn store(
        &self,
        file_name: &str,
        content: &[u8],
    ) -> impl std::future::Future<Output = Result<String, StorageError>> + Send;

    /// First stored file, by name order, whose name contains `needle`.
    fn find_first_matching(
        &self,
        needle: &str,
    ) -> impl std::future::Future<Output = Result<LiveDocFile, StorageError>> + Send;
}
