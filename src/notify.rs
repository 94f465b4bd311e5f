//! Best-effort "content changed" pings to an external indexer.
//!
//! A notification is attempted at most once. Failure is logged and dropped; it
//! never changes the outcome of the run that triggered it.

use reqwest::blocking::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::AppError;

pub trait Notifier {
    fn notify(&self, changed: &[String]) -> Result<(), AppError>;
}

/// POSTs `{"urlList": [...]}` to a configured endpoint.
pub struct HttpPing {
    client: Client,
    url: String,
}

impl HttpPing {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PingBody<'a> {
    url_list: &'a [String],
}

impl Notifier for HttpPing {
    fn notify(&self, changed: &[String]) -> Result<(), AppError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&PingBody { url_list: changed })
            .send()
            .map_err(|e| AppError::new(4, format!("notification failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("notification rejected with status {}", resp.status()),
            ));
        }
        Ok(())
    }
}

/// Send one notification if anything changed; swallow and log any failure.
///
/// Returns whether the notification was delivered.
pub fn notify_best_effort(notifier: Option<&dyn Notifier>, changed: &[String]) -> bool {
    let Some(notifier) = notifier else {
        return false;
    };
    if changed.is_empty() {
        debug!("nothing changed, skipping notification");
        return false;
    }
    match notifier.notify(changed) {
        Ok(()) => {
            debug!(count = changed.len(), "change notification sent");
            true
        }
        Err(err) => {
            warn!("change notification dropped: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct Flaky {
        calls: Cell<usize>,
        fail: bool,
    }

    impl Notifier for Flaky {
        fn notify(&self, _changed: &[String]) -> Result<(), AppError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(AppError::new(4, "down"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn failure_is_swallowed_after_one_attempt() {
        let n = Flaky {
            calls: Cell::new(0),
            fail: true,
        };
        assert!(!notify_best_effort(Some(&n), &["usd.json".to_string()]));
        assert_eq!(n.calls.get(), 1);
    }

    #[test]
    fn skips_when_nothing_changed() {
        let n = Flaky {
            calls: Cell::new(0),
            fail: false,
        };
        assert!(!notify_best_effort(Some(&n), &[]));
        assert_eq!(n.calls.get(), 0);
        assert!(notify_best_effort(Some(&n), &["gbp.json".to_string()]));
    }

    #[test]
    fn body_uses_url_list_key() {
        let changed = vec!["a".to_string()];
        let json = serde_json::to_value(PingBody { url_list: &changed }).unwrap();
        assert_eq!(json["urlList"][0], "a");
    }
}
