//! Web API call layer: rate-limit retry, soft-failure diagnostics, and
//! cursor pagination.
//!
//! [`ApiClient`] wraps a [`Transport`] and owns the policy around calls:
//! rate-limited rejections are retried on a fixed cadence up to a bounded
//! number of tries, other rejections are logged once and handed back to the
//! caller, and `users.list` is walked page by page until the backend stops
//! handing out cursors.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use super::transport::{ApiResponse, Transport};
use crate::chat::{ChatError, ChatUser, UserProfile};

/// Fixed pause between retries of a rate-limited call.
pub const RATE_LIMIT_SLEEP: Duration = Duration::from_secs(10);

/// Number of retries granted to a rate-limited call before giving up.
pub const RATE_LIMIT_TRIES: u32 = 6;

/// Page size requested from `users.list`.
const USERS_PAGE_LIMIT: u32 = 200;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One member record from a `users.list` page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Member {
    /// Backend-assigned member id.
    #[serde(default)]
    pub id: String,
    /// Login handle.
    #[serde(default)]
    pub name: String,
    /// Whether the account has been deactivated.
    #[serde(default)]
    pub deleted: bool,
    /// Directory profile attached to the member.
    #[serde(default)]
    pub profile: MemberProfile,
}

/// Directory profile fields carried on a member record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MemberProfile {
    /// Given name, empty when unset.
    #[serde(default)]
    pub first_name: String,
    /// Full display name, empty when unset.
    #[serde(default)]
    pub real_name: String,
    /// Directory email, absent when the workspace hides it.
    #[serde(default)]
    pub email: Option<String>,
}

impl From<Member> for ChatUser {
    fn from(member: Member) -> Self {
        let MemberProfile {
            first_name,
            real_name,
            email,
        } = member.profile;
        ChatUser {
            id: member.id,
            name: member.name,
            profile: UserProfile {
                first_name: Some(first_name).filter(|s| !s.is_empty()),
                real_name: Some(real_name).filter(|s| !s.is_empty()),
                email: email.filter(|s| !s.is_empty()),
            },
        }
    }
}

/// One decoded page of `users.list`.
#[derive(Debug, Clone, Default, Deserialize)]
struct UsersPage {
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

/// Pagination trailer on a `users.list` page.
#[derive(Debug, Clone, Default, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Policy layer over a [`Transport`].
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    retry_on_rate_limit: bool,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("retry_on_rate_limit", &self.retry_on_rate_limit)
            .finish()
    }
}

impl ApiClient {
    /// Create a client that retries rate-limited calls.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            retry_on_rate_limit: true,
        }
    }

    /// Create a client that surfaces rate-limited rejections immediately
    /// instead of sleeping and retrying.
    pub fn without_retry(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            retry_on_rate_limit: false,
        }
    }

    /// Issue one Web API call under the client's retry policy.
    ///
    /// # Errors
    ///
    /// [`ChatError::RateLimitExhausted`] when every granted retry was also
    /// rate limited, [`ChatError::Transport`] when the wire fails.
    pub async fn call(&self, method: &str, params: Value) -> Result<ApiResponse, ChatError> {
        self.call_with_retry(method, params, self.retry_on_rate_limit)
            .await
    }

    /// Issue one Web API call with an explicit rate-limit retry choice.
    ///
    /// With retries enabled, a rate-limited response is retried unchanged
    /// after [`RATE_LIMIT_SLEEP`], at most [`RATE_LIMIT_TRIES`] times,
    /// whatever its `ok` flag claims. Any other rejection is logged and
    /// returned as-is; callers inspect [`ApiResponse::ok`] when they care
    /// about the outcome.
    ///
    /// # Errors
    ///
    /// [`ChatError::RateLimitExhausted`] when every granted retry was also
    /// rate limited, [`ChatError::Transport`] when the wire fails.
    pub async fn call_with_retry(
        &self,
        method: &str,
        params: Value,
        retry_on_rate_limit: bool,
    ) -> Result<ApiResponse, ChatError> {
        let mut attempts: u32 = 0;
        loop {
            let response = self.transport.request(method, &params).await?;

            // Rate-limit detection runs before the ok flag is trusted.
            if response.is_rate_limited() && retry_on_rate_limit {
                attempts = attempts.saturating_add(1);
                if attempts > RATE_LIMIT_TRIES {
                    error!(method, tries = RATE_LIMIT_TRIES, "rate limit retries exhausted");
                    return Err(ChatError::RateLimitExhausted);
                }
                warn!(method, attempt = attempts, "rate limited, backing off");
                tokio::time::sleep(RATE_LIMIT_SLEEP).await;
                continue;
            }

            if !response.ok() {
                log_soft_failure(method, &params, &response);
            }
            return Ok(response);
        }
    }

    /// Walk every page of a member-listing endpoint (`users.list`),
    /// excluding deactivated members.
    ///
    /// Page order is preserved. A rejected or malformed page terminates the
    /// walk with the members collected so far.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiClient::call`] failures.
    pub async fn list_all_members(&self, method: &str) -> Result<Vec<Member>, ChatError> {
        let mut members = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut params = json!({ "limit": USERS_PAGE_LIMIT });
            if let Some(current) = &cursor {
                params["cursor"] = json!(current);
            }

            let response = self.call(method, params).await?;
            if !response.ok() {
                break;
            }

            let page: UsersPage = match response.parse() {
                Ok(page) => page,
                Err(e) => {
                    warn!(error = %e, "malformed users page, stopping listing");
                    break;
                }
            };

            members.extend(page.members.into_iter().filter(|m| !m.deleted));

            let next = page
                .response_metadata
                .map(|meta| meta.next_cursor)
                .filter(|next| !next.is_empty());
            match next {
                Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                    warn!("users page echoed its own cursor, stopping listing");
                    break;
                }
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(members)
    }
}

/// Log a non-rate-limit rejection once, with the offending parameters when
/// there are any.
fn log_soft_failure(method: &str, params: &Value, response: &ApiResponse) {
    let code = response.error().unwrap_or("unknown");
    let has_params = params.as_object().is_some_and(|map| !map.is_empty());
    if has_params {
        error!(method, code, params = %params, "api call rejected");
    } else {
        error!(method, code, "api call rejected");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
