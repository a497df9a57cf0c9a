//! Scripted OAuth and calendar mocks
//!
//! Each mock returns a configurable result and records how often (and with
//! what) it was called.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use acelab_common::auth::TokenSet;
use acelab_core::{CalendarApi, OAuthProvider};
use acelab_domain::{
    AcelabError, CreatedCalendarEvent, NewCalendarEvent, Result as DomainResult,
};
use async_trait::async_trait;

pub const MEET_LINK: &str = "https://meet.google.com/abc-defg-hij";

pub fn tokens(access: &str, refresh: Option<&str>, expires_in: i64) -> TokenSet {
    TokenSet::new(access.to_string(), refresh.map(str::to_string), expires_in, None)
}

/// Scripted `OAuthProvider`.
pub struct MockOAuthProvider {
    exchange: Mutex<DomainResult<TokenSet>>,
    refresh: Mutex<DomainResult<TokenSet>>,
    email: Mutex<DomainResult<String>>,
    exchange_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    email_calls: AtomicUsize,
    last_state: Mutex<Option<String>>,
}

impl Default for MockOAuthProvider {
    fn default() -> Self {
        Self {
            exchange: Mutex::new(Ok(tokens("ya29.exchanged", Some("1//refresh"), 3600))),
            refresh: Mutex::new(Ok(tokens("ya29.refreshed", None, 3600))),
            email: Mutex::new(Ok(super::TUTOR_EMAIL.to_string())),
            exchange_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            email_calls: AtomicUsize::new(0),
            last_state: Mutex::new(None),
        }
    }
}

impl MockOAuthProvider {
    pub fn set_exchange(&self, result: DomainResult<TokenSet>) {
        *self.exchange.lock().unwrap() = result;
    }

    pub fn set_refresh(&self, result: DomainResult<TokenSet>) {
        *self.refresh.lock().unwrap() = result;
    }

    pub fn set_email(&self, result: DomainResult<String>) {
        *self.email.lock().unwrap() = result;
    }

    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn email_calls(&self) -> usize {
        self.email_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.exchange_calls() + self.refresh_calls() + self.email_calls()
    }

    pub fn last_state(&self) -> Option<String> {
        self.last_state.lock().unwrap().clone()
    }
}

#[async_trait]
impl OAuthProvider for MockOAuthProvider {
    fn authorization_url(&self, state: &str) -> String {
        *self.last_state.lock().unwrap() = Some(state.to_string());
        format!("https://accounts.example/auth?state={state}")
    }

    async fn exchange_code(&self, _code: &str) -> DomainResult<TokenSet> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        self.exchange.lock().unwrap().clone()
    }

    async fn refresh_access_token(&self, _refresh_token: &str) -> DomainResult<TokenSet> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh.lock().unwrap().clone()
    }

    async fn fetch_user_email(&self, _access_token: &str) -> DomainResult<String> {
        self.email_calls.fetch_add(1, Ordering::SeqCst);
        self.email.lock().unwrap().clone()
    }
}

/// Recording `CalendarApi`.
pub struct MockCalendarApi {
    insert_result: Mutex<DomainResult<CreatedCalendarEvent>>,
    delete_result: Mutex<DomainResult<()>>,
    inserted: Mutex<Vec<(String, NewCalendarEvent)>>,
    deleted: Mutex<Vec<(String, String)>>,
}

impl Default for MockCalendarApi {
    fn default() -> Self {
        Self {
            insert_result: Mutex::new(Ok(CreatedCalendarEvent {
                event_id: "evt-1".to_string(),
                meeting_link: Some(MEET_LINK.to_string()),
            })),
            delete_result: Mutex::new(Ok(())),
            inserted: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }
}

impl MockCalendarApi {
    pub fn set_insert(&self, result: DomainResult<CreatedCalendarEvent>) {
        *self.insert_result.lock().unwrap() = result;
    }

    pub fn fail_deletes(&self, message: &str) {
        *self.delete_result.lock().unwrap() = Err(AcelabError::ProviderApi(message.to_string()));
    }

    /// `(access_token, event)` pairs in call order.
    pub fn inserted(&self) -> Vec<(String, NewCalendarEvent)> {
        self.inserted.lock().unwrap().clone()
    }

    /// `(access_token, event_id)` pairs in call order.
    pub fn deleted(&self) -> Vec<(String, String)> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarApi for MockCalendarApi {
    async fn insert_event(
        &self,
        access_token: &str,
        event: &NewCalendarEvent,
    ) -> DomainResult<CreatedCalendarEvent> {
        self.inserted.lock().unwrap().push((access_token.to_string(), event.clone()));
        self.insert_result.lock().unwrap().clone()
    }

    async fn delete_event(&self, access_token: &str, event_id: &str) -> DomainResult<()> {
        self.deleted.lock().unwrap().push((access_token.to_string(), event_id.to_string()));
        self.delete_result.lock().unwrap().clone()
    }
}
