//! In-process `PageSource` answering from a script.

#![allow(dead_code)]

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use storefront::api::{ApiError, Page};
use storefront::catalog::PageSource;
use tokio::sync::oneshot;

/// What one scripted fetch returns.
pub enum Reply {
    Items(Vec<u32>),
    Fail(&'static str),
}

pub struct Scripted {
    reply: Reply,
    started: Option<oneshot::Sender<()>>,
    release: Option<oneshot::Receiver<()>>,
}

impl Scripted {
    pub fn now(reply: Reply) -> Self {
        Self {
            reply,
            started: None,
            release: None,
        }
    }

    /// Reply held back until `release` fires; `started` fires on request.
    pub fn gated(
        reply: Reply,
        started: oneshot::Sender<()>,
        release: oneshot::Receiver<()>,
    ) -> Self {
        Self {
            reply,
            started: Some(started),
            release: Some(release),
        }
    }
}

/// Items `start..start+count`.
pub fn items(start: u32, count: u32) -> Vec<u32> {
    (start..start + count).collect()
}

#[derive(Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, scripted: Scripted) {
        self.script.lock().push_back(scripted);
    }

    pub fn reply(&self, reply: Reply) {
        self.push(Scripted::now(reply));
    }

    /// `(query, page)` of every fetch so far.
    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    type Item = u32;
    type Query = String;

    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch_page(&self, query: &String, page: u32) -> Result<Page<u32>, ApiError> {
        self.calls.lock().push((query.clone(), page));
        let next = self.script.lock().pop_front();
        let Scripted {
            reply,
            started,
            release,
        } = next.unwrap_or_else(|| panic!("unexpected fetch of page {} for {:?}", page, query));

        if let Some(started) = started {
            let _ = started.send(());
        }
        if let Some(release) = release {
            let _ = release.await;
        }

        match reply {
            Reply::Items(items) => Ok(Page::new(items)),
            Reply::Fail(message) => Err(ApiError::Rejected {
                message: message.to_string(),
            }),
        }
    }
}
