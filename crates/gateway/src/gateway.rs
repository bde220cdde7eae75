use std::sync::Arc;

use {
    convene_protocol::{Operation, OperationDescriptor},
    serde_json::Value,
    tracing::{debug, warn},
};

use crate::{
    bearer::BearerSource,
    error::{Error, Result},
    transport::{HttpTransport, Transport},
};

/// Nullable view of a call result: `data` is `None` on any transport failure.
///
/// Kept for consumers that only branch on data presence; new code should
/// prefer the `Result` returned by [`OperationGateway::call`].
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResult<T> {
    pub data: Option<T>,
}

impl<T> OperationResult<T> {
    pub fn is_failure(&self) -> bool {
        self.data.is_none()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        Self { data: result.ok() }
    }
}

/// Issues every remote call the console makes.
///
/// Holds no state besides its transport and a handle to the credential
/// source; cloning is cheap and clones share both.
#[derive(Clone)]
pub struct OperationGateway {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn BearerSource>,
}

impl OperationGateway {
    pub fn new(transport: Arc<dyn Transport>, credentials: Arc<dyn BearerSource>) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Gateway over HTTP to `endpoint`.
    pub fn http(endpoint: &str, credentials: Arc<dyn BearerSource>) -> Result<Self> {
        let transport = HttpTransport::from_endpoint(endpoint)?;
        Ok(Self::new(Arc::new(transport), credentials))
    }

    /// Send an untyped descriptor and return the root field's raw payload.
    ///
    /// Required variables holding `null` are sent as-is; rejecting them is
    /// the server's job.
    pub async fn dispatch(&self, descriptor: &OperationDescriptor) -> Result<Value> {
        let result = self.try_dispatch(descriptor).await;
        if let Err(ref e) = result {
            warn!(operation = %descriptor.name, kind = %descriptor.kind, error = %e, "operation failed");
        }
        result
    }

    async fn try_dispatch(&self, descriptor: &OperationDescriptor) -> Result<Value> {
        let missing = descriptor.variables.missing_required();
        if !missing.is_empty() {
            debug!(operation = %descriptor.name, ?missing, "required variables are null");
        }

        let request = descriptor.to_request();
        let bearer = self.credentials.bearer_token();
        debug!(
            operation = %descriptor.name,
            kind = %descriptor.kind,
            authenticated = bearer.is_some(),
            uploads = request.uploads.len(),
            "dispatching operation"
        );

        let mut response = self.transport.send(&request, bearer.as_ref()).await?;
        if !response.errors.is_empty() {
            return Err(Error::GraphQl(response.error_summary()));
        }
        response
            .take_field(&descriptor.name)
            .ok_or_else(|| Error::MissingData(descriptor.name.clone()))
    }

    /// Send a typed operation and decode its payload into `O::Output`.
    ///
    /// Decoding is a plain serde conversion: no coercion, no defaults beyond
    /// what the output type itself declares.
    pub async fn call<O: Operation>(&self, operation: &O) -> Result<O::Output> {
        let value = self.dispatch(&operation.descriptor()).await?;
        serde_json::from_value(value).map_err(|e| {
            warn!(operation = O::NAME, error = %e, "operation payload did not decode");
            Error::Json(e)
        })
    }

    /// Like [`call`](Self::call), flattened to the nullable shape.
    pub async fn fetch<O: Operation>(&self, operation: &O) -> OperationResult<O::Output> {
        self.call(operation).await.into()
    }
}

impl std::fmt::Debug for OperationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationGateway").finish_non_exhaustive()
    }
}
