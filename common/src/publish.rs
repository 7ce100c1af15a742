use async_trait::async_trait;

use crate::error::PublishError;

/// Defines the contract for making the working tree visible on the remote.
///
/// Implementations stage every change under the site root, commit it with
/// `message` and push the result. No rollback is expected on failure.
#[async_trait]
pub trait PublishRepository: Send + Sync {
    async fn publish(&self, message: &str) -> Result<(), PublishError>;
}
