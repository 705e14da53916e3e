//! Session state machine
//!
//! `Idle -> Pending -> {Succeeded, Failed} -> Pending -> ...`
//!
//! `SessionState` is the only writer of request status, entities and the
//! error message. A submit is split at its suspension point:
//! [`SessionState::begin_submit`] performs the synchronous transition and
//! hands out the request to send, [`SessionState::complete`] applies the
//! outcome. [`SessionState::on_submit`] composes both around the network
//! call.

use chrono::{DateTime, Utc};
use ner_core::{
    ClientErrorKind, ClientResult, Entity, FormField, FormInput, Locale, PredictionClient,
    RequestPayload, RequestStatus, UiConfig,
};
use uuid::Uuid;

use crate::builder::RequestBuilder;
use crate::labels::Labels;

/// A request handed out by `begin_submit`, awaiting its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub request_id: Uuid,
    pub payload: RequestPayload,
}

/// Form values, request status and last results of one user session
#[derive(Debug, Clone)]
pub struct SessionState {
    form: FormInput,
    status: RequestStatus,
    last_entities: Vec<Entity>,
    last_error_message: Option<String>,
    last_error_kind: Option<ClientErrorKind>,
    last_completed_at: Option<DateTime<Utc>>,
    pending_id: Option<Uuid>,
    locale: Locale,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(FormInput::default(), Locale::default())
    }
}

impl SessionState {
    /// Create an idle session with the given initial form values
    pub fn new(form: FormInput, locale: Locale) -> Self {
        Self {
            form,
            status: RequestStatus::Idle,
            last_entities: Vec::new(),
            last_error_message: None,
            last_error_kind: None,
            last_completed_at: None,
            pending_id: None,
            locale,
        }
    }

    /// Create an idle session with the configured form defaults
    pub fn from_config(config: &UiConfig) -> Self {
        let form = FormInput::default()
            .with_framework(config.default_framework)
            .with_model_name(config.default_model.clone());
        Self::new(form, config.locale)
    }

    pub fn form(&self) -> &FormInput {
        &self.form
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn last_entities(&self) -> &[Entity] {
        &self.last_entities
    }

    pub fn last_error_message(&self) -> Option<&str> {
        self.last_error_message.as_deref()
    }

    /// Kind of the last failure, for diagnostics
    pub fn last_error_kind(&self) -> Option<ClientErrorKind> {
        self.last_error_kind
    }

    pub fn last_completed_at(&self) -> Option<DateTime<Utc>> {
        self.last_completed_at
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn labels(&self) -> &'static Labels {
        Labels::for_locale(self.locale)
    }

    /// Id of the in-flight request, if any
    pub fn pending_request_id(&self) -> Option<Uuid> {
        self.pending_id
    }

    /// Apply a field edit. Allowed in every state; never touches the
    /// request status or the last results.
    pub fn on_field_change(&mut self, field: FormField) {
        tracing::trace!(?field, "form field changed");
        self.form.apply(field);
    }

    /// Start a submission.
    ///
    /// Returns `None` without side effects while a request is pending.
    /// Otherwise clears the previous results, moves to `Pending` and
    /// returns the request to send.
    pub fn begin_submit(&mut self) -> Option<PendingRequest> {
        if self.status.is_pending() {
            tracing::debug!(
                request_id = ?self.pending_id,
                "submit ignored: request already in flight"
            );
            return None;
        }

        self.last_entities.clear();
        self.last_error_message = None;
        self.last_error_kind = None;

        let request_id = Uuid::new_v4();
        let payload = RequestBuilder::build(&self.form);
        self.status = RequestStatus::Pending;
        self.pending_id = Some(request_id);

        tracing::debug!(
            %request_id,
            framework = %payload.framework,
            model = %payload.model_name,
            "prediction request started"
        );

        Some(PendingRequest {
            request_id,
            payload,
        })
    }

    /// Apply the outcome of the pending request.
    ///
    /// Returns `false` and leaves the session untouched when `request_id`
    /// is not the request currently pending.
    pub fn complete(&mut self, request_id: Uuid, outcome: ClientResult<Vec<Entity>>) -> bool {
        if self.pending_id != Some(request_id) {
            tracing::warn!(
                %request_id,
                pending = ?self.pending_id,
                "discarding outcome of a request that is not pending"
            );
            return false;
        }

        self.pending_id = None;
        self.last_completed_at = Some(Utc::now());

        match outcome {
            Ok(entities) => {
                tracing::info!(%request_id, count = entities.len(), "prediction succeeded");
                self.status = RequestStatus::Succeeded;
                self.last_entities = entities;
            }
            Err(e) => {
                tracing::warn!(%request_id, kind = %e.kind(), error = %e, "prediction failed");
                self.status = RequestStatus::Failed;
                self.last_entities.clear();
                self.last_error_message = Some(self.labels().request_failed.to_string());
                self.last_error_kind = Some(e.kind());
            }
        }

        true
    }

    /// Submit the current form through `client` and wait for the outcome.
    ///
    /// A no-op while a request is pending. Returns the resulting status.
    pub async fn on_submit(&mut self, client: &dyn PredictionClient) -> RequestStatus {
        let Some(pending) = self.begin_submit() else {
            return self.status;
        };

        let outcome = client.submit(&pending.payload).await;
        self.complete(pending.request_id, outcome);
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ner_core::{ClientError, Framework};
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Client answering with a fixed outcome and recording each payload
    struct ScriptedClient {
        outcome: ClientResult<Vec<Entity>>,
        calls: AtomicUsize,
        payloads: Mutex<Vec<RequestPayload>>,
    }

    impl ScriptedClient {
        fn new(outcome: ClientResult<Vec<Entity>>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
                payloads: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PredictionClient for ScriptedClient {
        async fn submit(&self, payload: &RequestPayload) -> ClientResult<Vec<Entity>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.payloads.lock().unwrap().push(payload.clone());
            self.outcome.clone()
        }

        fn endpoint(&self) -> &str {
            "memory://scripted"
        }
    }

    fn moscow() -> Vec<Entity> {
        vec![Entity::new("LOC", "Москва", 0, 6)]
    }

    fn server_error() -> ClientError {
        ClientError::Server {
            status: 500,
            body: "Internal Server Error".to_string(),
        }
    }

    #[test]
    fn test_initial_state() {
        let session = SessionState::default();
        assert_eq!(session.status(), RequestStatus::Idle);
        assert!(session.last_entities().is_empty());
        assert!(session.last_error_message().is_none());
        assert!(session.pending_request_id().is_none());
        assert_eq!(session.form(), &FormInput::default());
    }

    #[test]
    fn test_from_config_defaults() {
        let config = UiConfig {
            locale: Locale::Ru,
            default_framework: Framework::Flair,
            default_model: "ner-fast".to_string(),
        };
        let session = SessionState::from_config(&config);

        assert_eq!(session.form().framework, Framework::Flair);
        assert_eq!(session.form().model_name, "ner-fast");
        assert_eq!(session.locale(), Locale::Ru);
    }

    #[tokio::test]
    async fn test_submit_success() {
        let client = ScriptedClient::new(Ok(moscow()));
        let mut session = SessionState::default();
        session.on_field_change(FormField::Text("Москва".to_string()));

        let status = session.on_submit(&client).await;

        assert_eq!(status, RequestStatus::Succeeded);
        assert_eq!(session.last_entities(), moscow().as_slice());
        assert!(session.last_error_message().is_none());
        assert!(session.last_completed_at().is_some());
        assert_eq!(client.calls(), 1);
        assert_eq!(
            client.payloads.lock().unwrap()[0],
            RequestPayload {
                text: "Москва".to_string(),
                framework: "spacy".to_string(),
                model_name: "ru_core_news_sm".to_string(),
            }
        );
    }

    #[test]
    fn test_failure_transitions() {
        let mut session = SessionState::default();
        assert_eq!(session.status(), RequestStatus::Idle);

        let pending = session.begin_submit().unwrap();
        assert_eq!(session.status(), RequestStatus::Pending);

        assert!(session.complete(pending.request_id, Err(server_error())));
        assert_eq!(session.status(), RequestStatus::Failed);
        assert_eq!(session.last_error_message(), Some("Request to server failed"));
        assert_eq!(session.last_error_kind(), Some(ClientErrorKind::Server));
        assert!(session.last_entities().is_empty());
    }

    #[test]
    fn test_error_message_is_fixed_for_every_kind() {
        let errors = [
            ClientError::Network("connection refused".to_string()),
            server_error(),
            ClientError::MalformedResponse("missing field `entities`".to_string()),
        ];

        for error in errors {
            let mut session = SessionState::new(FormInput::default(), Locale::Ru);
            let pending = session.begin_submit().unwrap();
            session.complete(pending.request_id, Err(error));

            assert_eq!(
                session.last_error_message(),
                Some("Ошибка при запросе к серверу")
            );
        }
    }

    #[test]
    fn test_malformed_distinguishable_from_empty() {
        let mut empty = SessionState::default();
        let pending = empty.begin_submit().unwrap();
        empty.complete(pending.request_id, Ok(Vec::new()));

        let mut malformed = SessionState::default();
        let pending = malformed.begin_submit().unwrap();
        malformed.complete(
            pending.request_id,
            Err(ClientError::MalformedResponse("missing field `entities`".to_string())),
        );

        assert!(empty.last_entities().is_empty());
        assert!(malformed.last_entities().is_empty());
        assert_eq!(empty.status(), RequestStatus::Succeeded);
        assert_eq!(empty.last_error_kind(), None);
        assert_eq!(malformed.status(), RequestStatus::Failed);
        assert_eq!(
            malformed.last_error_kind(),
            Some(ClientErrorKind::MalformedResponse)
        );
    }

    #[tokio::test]
    async fn test_submit_while_pending_is_noop() {
        let client = ScriptedClient::new(Ok(moscow()));
        let mut session = SessionState::default();

        let pending = session.begin_submit().unwrap();
        assert!(session.begin_submit().is_none());

        let status = session.on_submit(&client).await;
        assert_eq!(status, RequestStatus::Pending);
        assert_eq!(client.calls(), 0);
        assert_eq!(session.pending_request_id(), Some(pending.request_id));
    }

    #[test]
    fn test_stale_completion_ignored() {
        let mut session = SessionState::default();
        let pending = session.begin_submit().unwrap();

        assert!(!session.complete(Uuid::new_v4(), Ok(moscow())));
        assert_eq!(session.status(), RequestStatus::Pending);
        assert!(session.last_entities().is_empty());

        assert!(session.complete(pending.request_id, Ok(moscow())));
        assert!(!session.complete(pending.request_id, Err(server_error())));
        assert_eq!(session.status(), RequestStatus::Succeeded);
    }

    #[test]
    fn test_resubmit_clears_previous_results() {
        let mut session = SessionState::default();

        let first = session.begin_submit().unwrap();
        session.complete(first.request_id, Ok(moscow()));
        assert_eq!(session.last_entities().len(), 1);

        let second = session.begin_submit().unwrap();
        assert_eq!(session.status(), RequestStatus::Pending);
        assert!(session.last_entities().is_empty());
        assert!(session.last_error_message().is_none());
        assert_ne!(first.request_id, second.request_id);

        session.complete(second.request_id, Err(server_error()));
        let third = session.begin_submit().unwrap();
        assert!(session.last_error_message().is_none());
        assert!(session.last_error_kind().is_none());

        session.complete(third.request_id, Ok(moscow()));
        assert_eq!(session.status(), RequestStatus::Succeeded);
    }

    #[test]
    fn test_payload_snapshot_at_submit_time() {
        let mut session = SessionState::default();
        session.on_field_change(FormField::Text("first".to_string()));

        let pending = session.begin_submit().unwrap();
        session.on_field_change(FormField::Text("second".to_string()));

        assert_eq!(pending.payload.text, "first");
        assert_eq!(session.form().text, "second");
    }

    fn field_strategy() -> impl Strategy<Value = FormField> {
        prop_oneof![
            any::<String>().prop_map(FormField::Text),
            prop::sample::select(Framework::ALL.to_vec()).prop_map(FormField::Framework),
            "[a-z_\\-]{0,24}".prop_map(FormField::ModelName),
        ]
    }

    /// Session driven into one of the four states
    fn session_in(state: u8) -> SessionState {
        let mut session = SessionState::default();
        match state {
            0 => {}
            1 => {
                session.begin_submit();
            }
            2 => {
                let pending = session.begin_submit().unwrap();
                session.complete(pending.request_id, Ok(moscow()));
            }
            _ => {
                let pending = session.begin_submit().unwrap();
                session.complete(pending.request_id, Err(server_error()));
            }
        }
        session
    }

    proptest! {
        #[test]
        fn field_edits_never_change_status(
            state in 0u8..4,
            edits in prop::collection::vec(field_strategy(), 0..32),
        ) {
            let mut session = session_in(state);
            let status = session.status();
            let entities = session.last_entities().to_vec();
            let error = session.last_error_message().map(str::to_string);
            let pending = session.pending_request_id();

            for edit in edits {
                session.on_field_change(edit);
            }

            prop_assert_eq!(session.status(), status);
            prop_assert_eq!(session.last_entities(), entities.as_slice());
            prop_assert_eq!(session.last_error_message().map(str::to_string), error);
            prop_assert_eq!(session.pending_request_id(), pending);
        }
    }
}
