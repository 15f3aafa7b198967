//! Two-stage fact-check orchestration
//!
//! [`FactCheckPipeline`] owns the single active [`Session`] and drives it
//! through extraction and verification, reporting progress to the bridge
//! as [`PipelineEvent`] values on a channel.
//!
//! # Examples
//!
//! ```
//! use veracity_llm::{Credential, MockProvider};
//! use veracity_pipeline::{FactCheckPipeline, PipelineConfig, StartOutcome};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let service = MockProvider::new(
//!     r#"{"claims": [{"claim_id": 1, "claim": "Water boils at 100C at sea level."}]}"#,
//!     r#"{"fact_checks": [{"claim_id": 1, "claim": "Water boils at 100C at sea level.", "verified": true, "explanation": "Standard pressure.", "source": "NIST"}]}"#,
//! );
//! let (pipeline, mut events) = FactCheckPipeline::channel(service, &PipelineConfig::default());
//!
//! let credential = Credential::new("gsk_example").unwrap();
//! let outcome = pipeline.start("Water boils at 100C at sea level.", credential).await;
//! assert_eq!(outcome, StartOutcome::Completed);
//!
//! assert_eq!(events.recv().await.unwrap().action(), "claimsExtracted");
//! assert_eq!(events.recv().await.unwrap().action(), "factCheckResults");
//! # }
//! ```

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::parser::ResponseParser;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};
use veracity_domain::{BridgeCommand, Phase, PipelineEvent, Session};
use veracity_llm::{Credential, VerificationService};

/// What a call to [`FactCheckPipeline::start`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Both stages ran and results were emitted
    Completed,

    /// A stage failed and an error was emitted
    Failed,

    /// A run was already in progress; a visibility toggle was emitted
    ToggledVisibility,

    /// The command carried an unusable credential; an error was emitted
    Rejected,
}

/// Orchestrates extraction and verification for one session at a time
///
/// The session lock is only held for bookkeeping, never across a service
/// call, so [`session`](Self::session) and a concurrent
/// [`start`](Self::start) stay responsive while a stage is outstanding.
pub struct FactCheckPipeline<S> {
    service: S,
    parser: ResponseParser,
    events: UnboundedSender<PipelineEvent>,
    session: Mutex<Session>,
}

impl<S: VerificationService> FactCheckPipeline<S> {
    /// Create a pipeline that reports to `events`
    pub fn new(service: S, config: &PipelineConfig, events: UnboundedSender<PipelineEvent>) -> Self {
        Self::with_parser(service, ResponseParser::new(config), events)
    }

    /// Create a pipeline with a custom parser
    pub fn with_parser(
        service: S,
        parser: ResponseParser,
        events: UnboundedSender<PipelineEvent>,
    ) -> Self {
        Self {
            service,
            parser,
            events,
            session: Mutex::new(Session::default()),
        }
    }

    /// Create a pipeline along with the receiving end of its event channel
    pub fn channel(service: S, config: &PipelineConfig) -> (Self, UnboundedReceiver<PipelineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(service, config, tx), rx)
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.lock().clone()
    }

    /// Phase of the current session
    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// Handle a command from the bridge
    pub async fn handle(&self, command: BridgeCommand) -> StartOutcome {
        match command {
            BridgeCommand::StartFactCheck { content, api_key } => match Credential::new(api_key) {
                Ok(credential) => self.start(content, credential).await,
                Err(e) => {
                    warn!("Rejected fact check request: {}", e);
                    self.emit(PipelineEvent::FactCheckError {
                        error: e.to_string(),
                    });
                    StartOutcome::Rejected
                }
            },
        }
    }

    /// Run a fact check over `content`
    ///
    /// If a run is already in progress, no request is made and a
    /// [`PipelineEvent::ToggleOverlay`] is emitted instead. Otherwise a new
    /// session replaces the previous one (idle, completed or failed) and
    /// runs to completion or failure. Nothing is retried.
    pub async fn start(&self, content: impl Into<String>, credential: Credential) -> StartOutcome {
        let started = {
            let mut session = self.lock();
            if session.is_in_progress() {
                None
            } else {
                let mut next = Session::new(content);
                let begun = next.transition(Phase::ExtractingClaims);
                *session = next;
                Some(begun.map(|_| session.id))
            }
        };

        let id = match started {
            None => {
                info!("Fact check already in progress, toggling visibility");
                self.emit(PipelineEvent::ToggleOverlay);
                return StartOutcome::ToggledVisibility;
            }
            Some(Err(e)) => return self.abort(PipelineError::State(e)),
            Some(Ok(id)) => id,
        };

        info!("Session {} started", id);
        match self.run(&credential).await {
            Ok(()) => {
                info!("Session {} completed", id);
                StartOutcome::Completed
            }
            Err(e) => self.abort(e),
        }
    }

    async fn run(&self, credential: &Credential) -> Result<(), PipelineError> {
        let content = self.lock().content.clone();
        debug!("Extracting claims from {} chars of content", content.len());

        let raw = self.service.extract_claims(&content, credential).await?;
        let claims = self.parser.parse_claims(&raw);
        info!("Extracted {} claims", claims.len());

        if claims.is_empty() {
            self.update(|session| session.transition(Phase::Completed))?;
            self.emit(PipelineEvent::ClaimsExtracted { claims: Vec::new() });
            self.emit(PipelineEvent::FactCheckResults {
                results: Vec::new(),
            });
            return Ok(());
        }

        self.update(|session| {
            session.claims = claims.clone();
            session.transition(Phase::AwaitingVerification)
        })?;
        self.emit(PipelineEvent::ClaimsExtracted {
            claims: claims.clone(),
        });

        let raw = self.service.verify_claims(&claims, credential).await?;
        let results = self.parser.parse_fact_checks(&raw);
        info!("Received {} fact-check results", results.len());

        let unmatched = self.update(|session| {
            session.results = results.clone();
            let unmatched: Vec<u32> = session
                .unmatched_results()
                .iter()
                .map(|r| r.claim_id)
                .collect();
            session.transition(Phase::Completed).map(|_| unmatched)
        })?;
        if !unmatched.is_empty() {
            warn!("Results reference unknown claim ids: {:?}", unmatched);
        }

        self.emit(PipelineEvent::FactCheckResults { results });
        Ok(())
    }

    /// Fail the session and report `error` to the bridge
    fn abort(&self, error: PipelineError) -> StartOutcome {
        let message = error.to_string();
        error!("Fact check failed: {}", message);

        self.lock().fail(message.clone());
        self.emit(PipelineEvent::FactCheckError { error: message });
        StartOutcome::Failed
    }

    fn update<T>(
        &self,
        f: impl FnOnce(&mut Session) -> Result<T, String>,
    ) -> Result<T, PipelineError> {
        f(&mut self.lock()).map_err(PipelineError::State)
    }

    fn emit(&self, event: PipelineEvent) {
        let action = event.action();
        if self.events.send(event).is_err() {
            debug!("No receiver for {} event", action);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<S> std::fmt::Debug for FactCheckPipeline<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactCheckPipeline")
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}
