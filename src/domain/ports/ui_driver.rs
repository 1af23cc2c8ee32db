//! UI driver port - interface to the externally-owned host UI.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{NodeId, UiSnapshot};

/// Trait for host-UI automation backends.
///
/// The driver owns whatever thread affinity its platform requires for
/// reading the tree and dispatching gestures; the async boundary is the
/// handoff. Gesture methods report whether the gesture was dispatched,
/// never whether the host reacted.
#[async_trait]
pub trait UiDriver: Send + Sync {
    /// First installed candidate identifier, if any.
    async fn resolve_host(&self, candidates: &[String]) -> DomainResult<Option<String>>;

    /// Resolve and start the host application. `false` when not installed.
    async fn launch_host(&self, app_id: &str) -> DomainResult<bool>;

    /// Capture a point-in-time snapshot of the current UI tree.
    async fn snapshot(&self) -> DomainResult<UiSnapshot>;

    /// Synthetic single-point tap on a node from the latest snapshot.
    async fn tap(&self, node: NodeId) -> DomainResult<bool>;

    /// Coordinate-fallback tap.
    async fn tap_point(&self, x: i32, y: i32) -> DomainResult<bool>;

    /// Directional gesture spanning a fixed fraction of the viewport.
    async fn scroll_down(&self) -> DomainResult<bool>;

    /// Host-level back navigation.
    async fn back(&self) -> DomainResult<()>;
}
