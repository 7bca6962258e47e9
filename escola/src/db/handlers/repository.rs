//! Base repository trait for database operations.
//!
//! A repository is a data access layer for a single postgres table. It provides methods for
//! creating, reading, updating, and deleting entities, and for listing them in primary key
//! order.
use crate::db::errors::Result;

/// Base repository trait providing common database operations
///
/// This trait has separate associated types for create requests, update requests, and responses.
#[async_trait::async_trait]
pub trait Repository {
    /// The request type for creating entities
    type CreateRequest;

    /// The request type for updating entities
    type UpdateRequest;

    /// The response/DTO type returned by operations
    type Response;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// Create a new entity
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response>;

    /// Get an entity by ID
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>>;

    /// List every entity, ordered by ID
    async fn list(&mut self) -> Result<Vec<Self::Response>>;

    /// Delete an entity by ID, returning the row as it was before deletion
    async fn delete(&mut self, id: Self::Id) -> Result<Option<Self::Response>>;

    /// Update an entity by ID. Fails with [`DbError::NotFound`](crate::db::errors::DbError::NotFound)
    /// when no row has that ID.
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response>;
}
