use std::sync::Arc;

use {
    anyhow::{Context, Result},
    convene_auth::{AuthProvider, CredentialStore, JsonFileStore},
    convene_config::ConsoleConfig,
    convene_gateway::{HttpTransport, OperationGateway},
    url::Url,
};

/// Everything a command needs, wired from the configuration.
pub struct App {
    pub auth: AuthProvider,
    pub gateway: OperationGateway,
}

impl App {
    pub fn from_config(config: &ConsoleConfig) -> Result<Self> {
        let session_path = config.session_path();
        let storage = Arc::new(JsonFileStore::new(session_path.clone()));
        let credentials = Arc::new(
            CredentialStore::init(storage)
                .with_context(|| format!("failed to read session {}", session_path.display()))?,
        );

        let endpoint = Url::parse(&config.endpoint)
            .with_context(|| format!("invalid endpoint {}", config.endpoint))?;
        let client = HttpTransport::build_client(config.proxy.as_deref(), &config.user_agent);
        let transport = HttpTransport::with_client(client, endpoint);
        let gateway = OperationGateway::new(Arc::new(transport), credentials.clone());

        Ok(Self {
            auth: AuthProvider::new(gateway.clone(), credentials),
            gateway,
        })
    }
}
