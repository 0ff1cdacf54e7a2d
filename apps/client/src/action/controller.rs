//! RemoteActionController — single-flight execution of one remote action.
//!
//! Lifecycle per dispatched trigger:
//!
//! ```text
//! Idle ──trigger──▶ InFlight ──settle──▶ Succeeded(v) | Failed(reason) ──render──▶ Idle
//! ```
//!
//! The InFlight guard and the working render both run before the first
//! suspension point, so a second trigger issued while the first is awaiting
//! the transport always sees InFlight and is dropped. Every dispatched call is
//! tagged with a generation; `reset()` bumps it, and a response whose tag no
//! longer matches is discarded without rendering.
//!
//! The state mutex is never held across an `.await` or a render call.
//! A dispatched call that never reaches its terminal render (the `trigger`
//! future dropped by a caller-side timeout, or a panic in the hook or the
//! transport) releases the controller through `InFlightGuard`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::action::normalize::normalize;
use crate::action::render::RenderHook;
use crate::action::{ActionRequest, ActionResult, ActionState, Dispatch, TriggerOutcome};
use crate::transport::Transport;

/// JSON field read from a 2xx body when no other is configured.
pub const DEFAULT_RESULT_FIELD: &str = "value";

#[derive(Debug, Default)]
struct Inner {
    state: ActionState,
    generation: u64,
    last_result: Option<ActionResult>,
}

/// A dispatched call, carrying the generation it was issued under.
struct Ticket {
    generation: u64,
    request: ActionRequest,
    guard: InFlightGuard,
}

/// Armed from the moment a call goes InFlight until its terminal render has
/// run. Dropped while still armed, it bumps the generation and puts the
/// controller back to Idle, so a response that turns up later is stale.
///
/// Covers a `trigger` future dropped mid-flight, a panicking `on_working`,
/// and a transport or render panic inside a `spawn_trigger` task.
struct InFlightGuard {
    inner: Arc<Mutex<Inner>>,
    generation: u64,
    armed: bool,
}

impl InFlightGuard {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.generation != self.generation {
            return;
        }
        inner.generation += 1;
        inner.state = ActionState::Idle;
        warn!(
            generation = self.generation,
            "Remote action abandoned before settling; controller released"
        );
    }
}

enum Begin {
    Ignored,
    Rejected(ActionResult),
    Dispatched(Ticket),
}

pub struct RemoteActionController {
    transport: Arc<dyn Transport>,
    hook: Arc<dyn RenderHook>,
    result_field: String,
    inner: Arc<Mutex<Inner>>,
}

impl RemoteActionController {
    pub fn new(transport: Arc<dyn Transport>, hook: Arc<dyn RenderHook>) -> Self {
        Self {
            transport,
            hook,
            result_field: DEFAULT_RESULT_FIELD.to_string(),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Names the JSON field that carries the success value.
    pub fn with_result_field(mut self, field: impl Into<String>) -> Self {
        self.result_field = field.into();
        self
    }

    pub fn result_field(&self) -> &str {
        &self.result_field
    }

    pub fn state(&self) -> ActionState {
        self.lock().state.clone()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn last_result(&self) -> Option<ActionResult> {
        self.lock().last_result.clone()
    }

    /// Runs one action to completion.
    ///
    /// Returns `Ignored` without any side effect if a call is already in
    /// flight. Otherwise exactly one terminal render follows, unless the
    /// controller is reset first, in which case the response is dropped and
    /// `Stale` is returned.
    pub async fn trigger(&self, request: ActionRequest) -> TriggerOutcome {
        match self.begin(request) {
            Begin::Ignored => TriggerOutcome::Ignored,
            Begin::Rejected(result) => TriggerOutcome::Settled(result),
            Begin::Dispatched(ticket) => self.complete(ticket).await,
        }
    }

    /// Fire-and-forget variant for button handlers.
    ///
    /// The guard, validation and working render happen before this returns;
    /// the remote call and the terminal render run on a spawned task.
    /// Must be called from within a tokio runtime.
    pub fn spawn_trigger(self: &Arc<Self>, request: ActionRequest) -> Dispatch {
        match self.begin(request) {
            Begin::Ignored => Dispatch::Ignored,
            Begin::Rejected(result) => Dispatch::Settled(result),
            Begin::Dispatched(ticket) => {
                let this = Arc::clone(self);
                Dispatch::Running(tokio::spawn(async move { this.complete(ticket).await }))
            }
        }
    }

    /// Forces the controller back to Idle. Any call still in flight becomes
    /// stale and its response will not be rendered.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        let previous = std::mem::take(&mut inner.state);
        info!(
            generation = inner.generation,
            was_in_flight = previous.is_in_flight(),
            "Remote action reset"
        );
    }

    fn begin(&self, request: ActionRequest) -> Begin {
        let mut inner = self.lock();

        if inner.state.is_in_flight() {
            debug!(
                endpoint = request.endpoint(),
                generation = inner.generation,
                "Trigger ignored: call already in flight"
            );
            return Begin::Ignored;
        }

        inner.generation += 1;
        let generation = inner.generation;

        if let Err(e) = request.validate() {
            let reason = e.reason();
            warn!(generation, code = e.code(), "Trigger rejected: {reason}");
            let result = ActionResult::failure(reason.clone());
            inner.state = ActionState::Failed(reason.clone());
            inner.last_result = Some(result.clone());
            drop(inner);

            self.hook.on_failed(&reason);
            self.return_to_idle(generation);
            return Begin::Rejected(result);
        }

        inner.state = ActionState::InFlight;
        drop(inner);

        let guard = InFlightGuard {
            inner: Arc::clone(&self.inner),
            generation,
            armed: true,
        };

        info!(generation, endpoint = request.endpoint(), "Remote action dispatched");
        self.hook.on_working();

        Begin::Dispatched(Ticket {
            generation,
            request,
            guard,
        })
    }

    async fn complete(&self, ticket: Ticket) -> TriggerOutcome {
        let Ticket {
            generation,
            request,
            guard,
        } = ticket;

        let outcome = match self
            .transport
            .post_json(request.endpoint(), request.payload())
            .await
        {
            Ok(response) => normalize(&response, &self.result_field),
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            warn!(generation, code = e.code(), "Remote action failed: {e}");
        }
        let result = ActionResult::from(outcome);

        {
            let mut inner = self.lock();
            if inner.generation != generation {
                debug!(
                    generation,
                    current = inner.generation,
                    "Discarding stale response"
                );
                drop(inner);
                guard.disarm();
                return TriggerOutcome::Stale;
            }
            inner.state = match (&result.value, &result.error) {
                (Some(value), _) => ActionState::Succeeded(value.clone()),
                (None, reason) => ActionState::Failed(reason.clone().unwrap_or_default()),
            };
            inner.last_result = Some(result.clone());
        }

        match (&result.value, &result.error) {
            (Some(value), _) => self.hook.on_succeeded(value),
            (None, Some(reason)) => self.hook.on_failed(reason),
            (None, None) => self.hook.on_failed("unknown error"),
        }

        self.return_to_idle(generation);
        guard.disarm();
        info!(generation, ok = result.ok, "Remote action settled");
        TriggerOutcome::Settled(result)
    }

    /// Leaves a terminal state, unless the hook already moved things on.
    fn return_to_idle(&self, generation: u64) {
        let mut inner = self.lock();
        if inner.generation == generation && !inner.state.is_in_flight() {
            inner.state = ActionState::Idle;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
