//! Client seam for the receptor API that owns desired and actual LRP state.

mod http;
mod models;

use thiserror::Error;

pub use http::HttpReceptorClient;
pub use models::{
    Action, ActualLrp, ActualLrpState, DesiredLrp, DesiredLrpCreateRequest,
    DesiredLrpUpdateRequest, DownloadAction, EnvironmentVariable, RunAction,
};

/// Failure reported by (or while talking to) the receptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceptorError {
    /// The receptor answered with a non-success status and an error body.
    #[error("{message}")]
    Api {
        status: u16,
        name: String,
        message: String,
    },
    #[error("failed to reach receptor at {url}: {message}")]
    Transport { url: String, message: String },
    #[error("unexpected response from receptor at {url}: {message}")]
    Decode { url: String, message: String },
}

impl ReceptorError {
    /// Convenience for an API error with a generic name, mostly useful in tests.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            name: "UnknownError".to_string(),
            message: message.into(),
        }
    }
}

pub type ReceptorResult<T> = std::result::Result<T, ReceptorError>;

/// Narrow view of the backend used by the lifecycle controller.
///
/// Process guids are opaque; implementations escape them wherever they land in a URL.
pub trait ReceptorClient {
    /// Every desired LRP known to the backend, unfiltered.
    fn desired_lrps(&self) -> ReceptorResult<Vec<DesiredLrp>>;

    fn create_desired_lrp(&self, request: DesiredLrpCreateRequest) -> ReceptorResult<()>;

    fn update_desired_lrp(
        &self,
        process_guid: &str,
        update: DesiredLrpUpdateRequest,
    ) -> ReceptorResult<()>;

    fn delete_desired_lrp(&self, process_guid: &str) -> ReceptorResult<()>;

    /// Actual instances for one process guid.
    fn actual_lrps_by_process_guid(&self, process_guid: &str) -> ReceptorResult<Vec<ActualLrp>>;
}

impl<T: ReceptorClient + ?Sized> ReceptorClient for &T {
    fn desired_lrps(&self) -> ReceptorResult<Vec<DesiredLrp>> {
        (**self).desired_lrps()
    }

    fn create_desired_lrp(&self, request: DesiredLrpCreateRequest) -> ReceptorResult<()> {
        (**self).create_desired_lrp(request)
    }

    fn update_desired_lrp(
        &self,
        process_guid: &str,
        update: DesiredLrpUpdateRequest,
    ) -> ReceptorResult<()> {
        (**self).update_desired_lrp(process_guid, update)
    }

    fn delete_desired_lrp(&self, process_guid: &str) -> ReceptorResult<()> {
        (**self).delete_desired_lrp(process_guid)
    }

    fn actual_lrps_by_process_guid(&self, process_guid: &str) -> ReceptorResult<Vec<ActualLrp>> {
        (**self).actual_lrps_by_process_guid(process_guid)
    }
}
