//! In-memory transport, navigator and fixtures shared by unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::config::ApiConfig;
use crate::net::error::ApiError;
use crate::net::events::AuthEvents;
use crate::net::http::{ApiClient, Navigator, PreparedRequest, RawResponse, Transport};
use crate::net::types::UserProfile;
use crate::state::credentials::CredentialStore;
use crate::util::storage::MemoryStorage;

enum Reply {
    Ready(Result<RawResponse, ApiError>),
    Later(oneshot::Receiver<Result<RawResponse, ApiError>>),
}

/// Replies to requests in FIFO order and records what was sent.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Rc<RefCell<VecDeque<Reply>>>,
    sent: Rc<RefCell<Vec<PreparedRequest>>>,
}

impl ScriptedTransport {
    pub fn reply(&self, status: u16, body: &str) {
        self.replies
            .borrow_mut()
            .push_back(Reply::Ready(Ok(RawResponse { status, body: body.to_owned() })));
    }

    pub fn fail(&self, message: &str) {
        self.replies
            .borrow_mut()
            .push_back(Reply::Ready(Err(ApiError::Transport(message.to_owned()))));
    }

    /// Queue a reply the test completes later through the returned sender.
    pub fn reply_later(&self) -> oneshot::Sender<Result<RawResponse, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().push_back(Reply::Later(rx));
        tx
    }

    pub fn sent(&self) -> Vec<PreparedRequest> {
        self.sent.borrow().clone()
    }

    pub fn last_sent(&self) -> PreparedRequest {
        self.sent.borrow().last().cloned().expect("no request sent")
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, ApiError> {
        self.sent.borrow_mut().push(request);
        let reply = self.replies.borrow_mut().pop_front();
        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Later(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Transport("reply dropped".to_owned()))),
            None => Err(ApiError::Transport("no scripted reply".to_owned())),
        }
    }
}

/// Records redirect targets instead of navigating.
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    visits: Rc<RefCell<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.visits.borrow_mut().push(path.to_owned());
    }
}

/// An `ApiClient` over in-memory seams, plus handles to inspect them.
pub struct Harness {
    pub api: ApiClient,
    pub transport: ScriptedTransport,
    pub navigator: RecordingNavigator,
    pub storage: MemoryStorage,
}

impl Harness {
    pub fn new() -> Self {
        let transport = ScriptedTransport::default();
        let navigator = RecordingNavigator::default();
        let storage = MemoryStorage::new();
        let api = ApiClient::new(
            ApiConfig::default(),
            CredentialStore::new(Rc::new(storage.clone())),
            Rc::new(transport.clone()),
            Rc::new(navigator.clone()),
            AuthEvents::new(),
        );
        Self { api, transport, navigator, storage }
    }

    /// Harness with `token`/`user` already persisted.
    pub fn signed_in(token: &str, user: &UserProfile) -> Self {
        let harness = Self::new();
        harness.api.credentials().save(token, user).unwrap();
        harness
    }
}

pub fn sample_user(user_id: u64) -> UserProfile {
    UserProfile {
        user_id,
        email: format!("user{user_id}@mindset.test"),
        nickname: format!("user{user_id}"),
        ..UserProfile::default()
    }
}
