//! Navigation driver wrapper: snapshot queries, gestures, readiness waits.
//!
//! Timing-dependent behavior goes through `wait_until`, which re-checks an
//! expected condition at a short interval up to a bounded timeout instead
//! of sleeping a fixed duration. All waits are cancellation points.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::domain::errors::{DomainResult, ExtractionError};
use crate::domain::models::{NodeId, TimingConfig, UiSnapshot};
use crate::domain::ports::UiDriver;

/// Issues queries and synthetic interactions against the host UI,
/// independent of extraction semantics.
pub struct Navigator {
    driver: Arc<dyn UiDriver>,
    timing: TimingConfig,
    cancel: Arc<AtomicBool>,
}

impl Navigator {
    pub fn new(driver: Arc<dyn UiDriver>, timing: TimingConfig, cancel: Arc<AtomicBool>) -> Self {
        Self {
            driver,
            timing,
            cancel,
        }
    }

    /// Errors with `Cancelled` once `stop` has been requested.
    pub fn check_cancelled(&self) -> DomainResult<()> {
        if self.cancel.load(Ordering::SeqCst) {
            Err(ExtractionError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Snapshot of the current tree, no waiting.
    pub async fn current(&self) -> DomainResult<UiSnapshot> {
        self.driver.snapshot().await
    }

    /// Polls until `condition` holds on a fresh snapshot, or the bounded
    /// timeout expires.
    ///
    /// On expiry the last snapshot error wins if there was one (a
    /// persistently unobtainable tree is `UiUnavailable`); otherwise the
    /// condition simply never held and the result is `TargetNotFound`.
    pub async fn wait_until<F>(&self, what: &str, condition: F) -> DomainResult<UiSnapshot>
    where
        F: Fn(&UiSnapshot) -> bool,
    {
        let deadline = Instant::now() + Duration::from_millis(self.timing.wait_timeout_ms);
        let mut last_error: Option<ExtractionError> = None;

        loop {
            self.check_cancelled()?;
            match self.driver.snapshot().await {
                Ok(snap) if condition(&snap) => return Ok(snap),
                Ok(_) => last_error = None,
                Err(err) => last_error = Some(err),
            }
            if Instant::now() >= deadline {
                return Err(
                    last_error.unwrap_or_else(|| ExtractionError::TargetNotFound(what.to_string()))
                );
            }
            sleep(Duration::from_millis(self.timing.poll_interval_ms)).await;
        }
    }

    /// Waits for any node whose text contains `text`.
    pub async fn wait_for_text(&self, text: &str) -> DomainResult<UiSnapshot> {
        self.wait_until(text, |snap| snap.contains_text(text)).await
    }

    /// Waits until any UI tree at all is obtainable.
    pub async fn wait_for_ui(&self) -> DomainResult<UiSnapshot> {
        self.wait_until("host UI", |snap| snap.root().is_some())
            .await
            .map_err(|err| match err {
                ExtractionError::TargetNotFound(_) => {
                    ExtractionError::UiUnavailable("no UI tree obtainable".to_string())
                }
                other => other,
            })
    }

    /// Taps a node and fails if the gesture could not be dispatched.
    pub async fn tap(&self, node: NodeId) -> DomainResult<()> {
        if self.driver.tap(node).await? {
            Ok(())
        } else {
            Err(ExtractionError::UiUnavailable(format!(
                "tap on node {node} was not dispatched"
            )))
        }
    }

    /// Coordinate tap, same dispatch contract as `tap`.
    pub async fn tap_point(&self, x: i32, y: i32) -> DomainResult<()> {
        if self.driver.tap_point(x, y).await? {
            Ok(())
        } else {
            Err(ExtractionError::UiUnavailable(format!(
                "tap at ({x}, {y}) was not dispatched"
            )))
        }
    }

    /// Waits for `needle` to appear, then taps its first match.
    pub async fn tap_text(&self, needle: &str) -> DomainResult<()> {
        let snap = self.wait_for_text(needle).await?;
        let id = snap
            .find_by_text(needle)
            .ok_or_else(|| ExtractionError::TargetNotFound(needle.to_string()))?;
        let target = snap.clickable_ancestor(id).unwrap_or(id);
        self.tap(target).await
    }

    /// Scroll gesture; reports dispatch success, not content movement.
    pub async fn scroll_down(&self) -> DomainResult<bool> {
        self.driver.scroll_down().await
    }

    pub async fn back(&self) -> DomainResult<()> {
        self.driver.back().await
    }

    /// Fixed post-scroll settle. There is no condition to poll for after a
    /// scroll, so this is the one wait that stays a plain delay.
    pub async fn settle(&self) -> DomainResult<()> {
        sleep(Duration::from_millis(self.timing.scroll_settle_ms)).await;
        self.check_cancelled()
    }
}
