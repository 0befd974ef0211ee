use std::env;

use async_trait::async_trait;
use reqwest::{Client, Url, header};
use uuid::Uuid;

use crate::{
    config::HttpServiceConfig,
    membership::{
        error::{ServiceError, internal_error, rejected, transport},
        ports::MembershipService,
        types::SiteId,
    },
};

/// Talks to the collaboration service over HTTP:
/// `POST {base_url}/sites/{site}/members/{user}/toggle`.
///
/// No request timeout is set here; how long a toggle may take is the
/// service's business.
#[derive(Debug, Clone)]
pub struct HttpMembershipService {
    client: Client,
    base_url: Url,
    auth_header: Option<String>,
}

impl HttpMembershipService {
    pub fn new(config: &HttpServiceConfig) -> Result<Self, ServiceError> {
        let base_url = Url::parse(&config.base_url).map_err(|err| {
            internal_error(format!("invalid membership base_url '{}': {err}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(internal_error(format!(
                "membership base_url '{}' cannot carry a path",
                config.base_url
            )));
        }

        let auth_header = match &config.token_env {
            Some(var) => {
                let token = env::var(var).map_err(|_| {
                    internal_error(format!(
                        "missing membership service token environment variable {var}"
                    ))
                })?;
                Some(format!("Bearer {token}"))
            }
            None => None,
        };

        let client = Client::builder()
            .build()
            .map_err(|err| internal_error(format!("failed to build http client: {err}")))?;

        Ok(Self {
            client,
            base_url,
            auth_header,
        })
    }

    fn toggle_url(&self, site_id: &SiteId, user_id: &str) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| internal_error("membership base_url cannot carry a path"))?
            .pop_if_empty()
            .extend(["sites", site_id.as_str(), "members", user_id, "toggle"]);
        Ok(url)
    }
}

#[async_trait]
impl MembershipService for HttpMembershipService {
    async fn toggle_membership(
        &self,
        site_id: &SiteId,
        user_id: &str,
    ) -> Result<(), ServiceError> {
        let url = self.toggle_url(site_id, user_id)?;
        let request_id = Uuid::now_v7().to_string();
        tracing::debug!(
            target: "membership.http",
            request_id = %request_id,
            url = %url,
            "membership_toggle_dispatch"
        );

        let mut request = self
            .client
            .post(url)
            .header("x-request-id", request_id.clone());
        if let Some(auth_header) = &self.auth_header {
            request = request.header(header::AUTHORIZATION, auth_header);
        }

        let response = request.send().await.map_err(|err| {
            transport(format!(
                "membership toggle for site '{site_id}' and user '{user_id}' failed: {err}"
            ))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(rejected(format!(
                "membership service answered {status} for site '{site_id}' and user '{user_id}': {}",
                body.trim()
            )));
        }

        tracing::debug!(
            target: "membership.http",
            request_id = %request_id,
            status = status.as_u16(),
            "membership_toggle_done"
        );
        Ok(())
    }
}
