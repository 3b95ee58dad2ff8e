use guriri_types::error::RepositoryError;
use guriri_types::order::Order;

/// Append-only order storage.
pub trait OrderRepository: Send + Sync + 'static {
    /// Insert a new order. Ids are unique; a duplicate is a `Conflict`.
    fn create_order(
        &self,
        order: &Order,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn count_orders(&self) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;
}
