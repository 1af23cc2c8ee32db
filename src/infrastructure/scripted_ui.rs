//! Scripted UI driver: a fixture-driven stand-in for the host application.
//!
//! A `UiScript` describes a small screen graph: named screens, each a
//! sequence of scroll pages, with tap transitions keyed by substring match
//! and optional back edges. Integration tests and the `run` command drive
//! the full engine against it without a real device.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainResult, ExtractionError};
use crate::domain::models::{NodeId, UiSnapshot};
use crate::domain::ports::UiDriver;

/// Serializable screen-graph fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiScript {
    /// Host application identifiers this fixture pretends are installed.
    #[serde(default)]
    pub installed_apps: Vec<String>,

    /// Screen shown after a successful launch.
    pub start_screen: String,

    pub screens: HashMap<String, ScriptScreen>,
}

/// One screen: scroll pages plus interaction edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptScreen {
    /// Snapshots per scroll position; `scroll_down` advances through them.
    pub pages: Vec<UiSnapshot>,

    /// Tap transitions, first matching needle wins.
    #[serde(default)]
    pub taps: Vec<TapRule>,

    /// Where `back` leads, if anywhere.
    #[serde(default)]
    pub back_to: Option<String>,

    /// When set, scrolling past the last page keeps reporting success.
    #[serde(default)]
    pub endless_scroll: bool,
}

/// Tap edge: if the tapped node's subtree mentions `needle`
/// (case-insensitive), navigation moves to `goto`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapRule {
    pub needle: String,
    pub goto: String,
}

#[derive(Debug)]
struct DriverState {
    screen: Option<String>,
    page: usize,
}

/// `UiDriver` over a `UiScript`.
pub struct ScriptedUiDriver {
    script: UiScript,
    state: Mutex<DriverState>,
    snapshots_taken: AtomicU32,
}

impl ScriptedUiDriver {
    pub fn new(script: UiScript) -> Self {
        Self {
            script,
            state: Mutex::new(DriverState {
                screen: None,
                page: 0,
            }),
            snapshots_taken: AtomicU32::new(0),
        }
    }

    /// How many snapshots have been served. Tests use this to assert scan
    /// bounds.
    pub fn snapshots_taken(&self) -> u32 {
        self.snapshots_taken.load(Ordering::SeqCst)
    }

    fn screen(&self, name: &str) -> DomainResult<&ScriptScreen> {
        self.script
            .screens
            .get(name)
            .ok_or_else(|| ExtractionError::UiUnavailable(format!("unknown screen '{name}'")))
    }

    fn page_snapshot<'a>(screen: &'a ScriptScreen, page: usize) -> DomainResult<&'a UiSnapshot> {
        if screen.pages.is_empty() {
            return Err(ExtractionError::UiUnavailable(
                "screen has no pages".to_string(),
            ));
        }
        Ok(&screen.pages[page.min(screen.pages.len() - 1)])
    }

    /// First rule whose needle appears in the tapped node's subtree text
    /// or its own description.
    fn matching_rule<'a>(
        screen: &'a ScriptScreen,
        snap: &UiSnapshot,
        node: NodeId,
    ) -> Option<&'a TapRule> {
        let mut haystacks: Vec<String> = snap
            .subtree_texts(node)
            .iter()
            .map(|t| t.to_lowercase())
            .collect();
        if let Some(description) = snap.node(node).and_then(|n| n.description.as_deref()) {
            haystacks.push(description.to_lowercase());
        }

        screen.taps.iter().find(|rule| {
            let needle = rule.needle.to_lowercase();
            haystacks.iter().any(|h| h.contains(&needle))
        })
    }
}

#[async_trait]
impl UiDriver for ScriptedUiDriver {
    async fn resolve_host(&self, candidates: &[String]) -> DomainResult<Option<String>> {
        Ok(candidates
            .iter()
            .find(|c| self.script.installed_apps.contains(c))
            .cloned())
    }

    async fn launch_host(&self, app_id: &str) -> DomainResult<bool> {
        if !self.script.installed_apps.iter().any(|a| a == app_id) {
            return Ok(false);
        }
        let mut state = self.state.lock().unwrap();
        state.screen = Some(self.script.start_screen.clone());
        state.page = 0;
        Ok(true)
    }

    async fn snapshot(&self) -> DomainResult<UiSnapshot> {
        let state = self.state.lock().unwrap();
        let Some(screen_name) = state.screen.clone() else {
            return Err(ExtractionError::UiUnavailable(
                "host application not launched".to_string(),
            ));
        };
        let screen = self.screen(&screen_name)?;
        let snap = Self::page_snapshot(screen, state.page)?.clone();
        self.snapshots_taken.fetch_add(1, Ordering::SeqCst);
        Ok(snap)
    }

    async fn tap(&self, node: NodeId) -> DomainResult<bool> {
        let mut state = self.state.lock().unwrap();
        let Some(screen_name) = state.screen.clone() else {
            return Ok(false);
        };
        let screen = self.screen(&screen_name)?;
        let snap = Self::page_snapshot(screen, state.page)?;
        if snap.node(node).is_none() {
            return Ok(false);
        }
        if let Some(rule) = Self::matching_rule(screen, snap, node) {
            state.screen = Some(rule.goto.clone());
            state.page = 0;
        }
        Ok(true)
    }

    async fn tap_point(&self, x: i32, y: i32) -> DomainResult<bool> {
        let mut state = self.state.lock().unwrap();
        let Some(screen_name) = state.screen.clone() else {
            return Ok(false);
        };
        let screen = self.screen(&screen_name)?;
        let snap = Self::page_snapshot(screen, state.page)?;

        // Deepest node under the point: descendants follow ancestors in
        // preorder, so the last containing node wins.
        let hit = snap
            .dfs()
            .into_iter()
            .filter(|&id| snap.node(id).is_some_and(|n| n.bounds.contains(x, y)))
            .last();

        if let Some(mut cursor) = hit {
            loop {
                if let Some(rule) = Self::matching_rule(screen, snap, cursor) {
                    state.screen = Some(rule.goto.clone());
                    state.page = 0;
                    break;
                }
                match snap.parent(cursor) {
                    Some(parent) => cursor = parent,
                    None => break,
                }
            }
        }
        Ok(true)
    }

    async fn scroll_down(&self) -> DomainResult<bool> {
        let mut state = self.state.lock().unwrap();
        let Some(screen_name) = state.screen.clone() else {
            return Ok(false);
        };
        let screen = self.screen(&screen_name)?;
        if state.page + 1 < screen.pages.len() {
            state.page += 1;
            Ok(true)
        } else {
            Ok(screen.endless_scroll)
        }
    }

    async fn back(&self) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        let Some(screen_name) = state.screen.clone() else {
            return Ok(());
        };
        let screen = self.screen(&screen_name)?;
        if let Some(destination) = &screen.back_to {
            state.screen = Some(destination.clone());
            state.page = 0;
        }
        Ok(())
    }
}
