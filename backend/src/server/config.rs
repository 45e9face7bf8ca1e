//! HTTP server configuration object.

use std::net::SocketAddr;

use backend::config::{AppConfig, StripeSettings};
use backend::inbound::http::session_config::SessionSettings;
use backend::outbound::persistence::DbPool;
use url::Url;

/// Everything the server needs once startup validation has passed.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) app_base_url: Url,
    pub(crate) stripe: Option<StripeSettings>,
    pub(crate) db_pool: DbPool,
}

impl ServerConfig {
    /// Combine the resolved application config with runtime resources.
    #[must_use]
    pub fn new(app: &AppConfig, bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            session: app.session().clone(),
            bind_addr,
            app_base_url: app.app_base_url().clone(),
            stripe: app.stripe().cloned(),
            db_pool,
        }
    }
}
