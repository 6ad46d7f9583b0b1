//! Async client for the ProbModelSEED JSON-RPC service
//!
//! [`ProbModelSeedClient`] exposes one method per remote operation. All of
//! them funnel through a single transport helper that:
//!
//! 1. builds a JSON-RPC 1.1 envelope with a fresh random id;
//! 2. resolves the `Authorization` header (provider, then static token, then
//!    none);
//! 3. POSTs the envelope through the configured [`Transport`];
//! 4. settles the call exactly once, to the returned [`PendingCall`] and to
//!    the matching user callback.
//!
//! # Outcome classification
//!
//! | Reply                                   | Outcome                                   |
//! |-----------------------------------------|-------------------------------------------|
//! | 2xx, `{"result": [v, ...]}`             | resolves with `v`                         |
//! | 2xx, `{"error": e}` and no `result`     | [`RpcError::Service`] carrying `e`        |
//! | 2xx, anything else                      | [`RpcError::MalformedResponse`] (503)     |
//! | non-2xx, JSON body                      | [`RpcError::Service`] carrying `error`    |
//! | non-2xx, non-JSON body                  | `"Unknown error - <body>"`                |
//! | no reply, empty body, or aborted        | `"Unknown Error"`                         |
//!
//! Calls are spawned on the current Tokio runtime. Invoked outside one, a
//! call does not panic; it settles immediately with `"Unknown Error"`.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::FutureExt;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::{ProbModelSeedError, Result, RpcError};
use crate::rpc::auth::Authorization;
use crate::rpc::methods::{Method, Returns};
use crate::rpc::metrics::CallMetrics;
use crate::rpc::token_store::KeyringTokenProvider;
use crate::rpc::transport::http::HttpTransport;
use crate::rpc::transport::{HttpReply, OutboundRequest, Transport};
use crate::rpc::types::RpcRequest;

/// Endpoint used when no URL, or an empty one, is supplied.
pub const DEFAULT_SERVICE_URL: &str = "http://p3.theseed.org/services/ProbModelSEED";

const DEPRECATION_NOTICE: &str = "DEPRECATION WARNING: '*_async' method names will be removed \
     in a future version. Please use the identical methods without the '_async' suffix.";

/// Settled outcome of a call.
pub type CallOutcome = std::result::Result<Value, RpcError>;

/// Listener invoked with the unwrapped result of a successful call.
pub type SuccessCallback = Box<dyn FnOnce(Value) + Send + 'static>;

/// Listener invoked with the rejection of a failed call.
pub type ErrorCallback = Box<dyn FnOnce(RpcError) + Send + 'static>;

/// Optional success and error listeners for one call.
///
/// Exactly one of them (whichever matches the outcome) is invoked, at most
/// once, before the [`PendingCall`] resolves.
///
/// # Examples
///
/// ```
/// use probmodelseed::rpc::Callbacks;
///
/// let callbacks = Callbacks::none()
///     .on_success(|models| println!("models: {models}"))
///     .on_error(|err| eprintln!("failed: {err}"));
/// ```
#[derive(Default)]
pub struct Callbacks {
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
}

impl Callbacks {
    /// No listeners; the outcome is only observable through the future.
    pub fn none() -> Self {
        Self::default()
    }

    /// Both listeners at once.
    pub fn new(
        on_success: impl FnOnce(Value) + Send + 'static,
        on_error: impl FnOnce(RpcError) + Send + 'static,
    ) -> Self {
        Self::none().on_success(on_success).on_error(on_error)
    }

    /// Set the success listener.
    pub fn on_success(mut self, f: impl FnOnce(Value) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    /// Set the error listener.
    pub fn on_error(mut self, f: impl FnOnce(RpcError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    fn deliver(self, outcome: CallOutcome) {
        match outcome {
            Ok(value) => {
                if let Some(on_success) = self.on_success {
                    on_success(value);
                }
            }
            Err(error) => {
                if let Some(on_error) = self.on_error {
                    on_error(error);
                }
            }
        }
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Handle that aborts an in-flight call.
#[derive(Debug, Clone)]
pub struct AbortHandle(CancellationToken);

impl AbortHandle {
    /// Abandon the HTTP exchange. The call then settles as a failed exchange
    /// with no body (`"Unknown Error"`), unless it already settled.
    pub fn abort(&self) {
        self.0.cancel();
    }
}

/// A call in flight.
///
/// Await it to obtain the outcome. Dropping it does not cancel the call;
/// callbacks still fire. Use [`PendingCall::abort`] to cancel.
#[derive(Debug)]
pub struct PendingCall {
    id: String,
    method: Method,
    outcome: oneshot::Receiver<CallOutcome>,
    cancel: CancellationToken,
}

impl PendingCall {
    /// Correlation id sent in the request envelope.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The remote method being called.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Abort the in-flight exchange.
    pub fn abort(&self) {
        self.cancel.cancel();
    }

    /// A detached handle that can abort this call from elsewhere.
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle(self.cancel.clone())
    }
}

impl Future for PendingCall {
    type Output = CallOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.outcome
            .poll_unpin(cx)
            .map(|received| received.unwrap_or_else(|_| Err(RpcError::unknown())))
    }
}

struct ClientInner {
    url: String,
    auth: Authorization,
    transport: Arc<dyn Transport>,
    deprecation_warned: AtomicBool,
}

/// Client for the ProbModelSEED service.
///
/// Cheap to clone; clones share the transport, the credentials and the
/// deprecation-warning flag.
///
/// Calls run on the ambient Tokio runtime. Called outside one, a method
/// returns a [`PendingCall`] already rejected with `"Unknown Error"` and the
/// error callback fires immediately.
///
/// # Examples
///
/// ```no_run
/// use probmodelseed::rpc::{Authorization, Callbacks, ProbModelSeedClient};
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = ProbModelSeedClient::new(None, Authorization::with_token("tok", "alice"))?;
/// let models = client.list_models(Callbacks::none()).await?;
/// println!("{models}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ProbModelSeedClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for ProbModelSeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbModelSeedClient")
            .field("url", &self.inner.url)
            .field("auth", &self.inner.auth)
            .field("transport", &self.inner.transport)
            .finish_non_exhaustive()
    }
}

impl ProbModelSeedClient {
    /// Create a client over the default HTTP transport.
    ///
    /// `url` falls back to [`DEFAULT_SERVICE_URL`] when `None` or empty.
    ///
    /// # Errors
    ///
    /// Returns [`ProbModelSeedError::Http`] if the HTTP client cannot be
    /// built.
    pub fn new(url: Option<&str>, auth: Authorization) -> Result<Self> {
        let transport = HttpTransport::new(None)?;
        Ok(Self::with_transport(url, auth, Arc::new(transport)))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(
        url: Option<&str>,
        auth: Authorization,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let url = match url {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => DEFAULT_SERVICE_URL.to_string(),
        };

        Self {
            inner: Arc::new(ClientInner {
                url,
                auth,
                transport,
                deprecation_warned: AtomicBool::new(false),
            }),
        }
    }

    /// Create a client from loaded configuration.
    ///
    /// The static token and user id come from `auth`; when
    /// `auth.use_keyring` is set, the keyring is consulted on every request
    /// and takes precedence over the static token.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.service.timeout_seconds.map(Duration::from_secs);
        let transport = HttpTransport::new(timeout)?;

        let mut auth = Authorization::from_info(config.auth.info());
        if config.auth.use_keyring {
            auth = auth.with_provider(KeyringTokenProvider::new(config.auth.user_id.clone()));
        }

        Ok(Self::with_transport(
            Some(&config.service.url),
            auth,
            Arc::new(transport),
        ))
    }

    /// The endpoint every request is posted to.
    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// The client's authorization configuration.
    pub fn authorization(&self) -> &Authorization {
        &self.inner.auth
    }

    /// Whether a deprecated `_async` alias has been used on this client.
    pub fn deprecation_warned(&self) -> bool {
        self.inner.deprecation_warned.load(Ordering::Acquire)
    }

    /// Call any method by catalog entry.
    ///
    /// # Errors
    ///
    /// Returns [`ProbModelSeedError::InvalidInput`] when `input` is given to
    /// `list_models` or missing for any other method. No request is sent in
    /// that case.
    pub fn call(
        &self,
        method: Method,
        input: Option<Value>,
        callbacks: Callbacks,
    ) -> Result<PendingCall> {
        let params = match (method.takes_input(), input) {
            (true, Some(input)) => vec![input],
            (false, None) => Vec::new(),
            (true, None) => {
                return Err(ProbModelSeedError::InvalidInput(format!(
                    "{method} requires an input payload"
                ))
                .into())
            }
            (false, Some(_)) => {
                return Err(
                    ProbModelSeedError::InvalidInput(format!("{method} takes no input")).into(),
                )
            }
        };
        Ok(self.dispatch(method, params, callbacks))
    }

    /// List the caller's models. Takes no input.
    pub fn list_models(&self, callbacks: Callbacks) -> PendingCall {
        self.dispatch(Method::ListModels, Vec::new(), callbacks)
    }

    /// Deprecated alias of [`Self::list_models`].
    #[deprecated(note = "`*_async` method names will be removed; use `list_models`")]
    pub fn list_models_async(&self, callbacks: Callbacks) -> PendingCall {
        self.warn_deprecated("list_models_async");
        self.list_models(callbacks)
    }

    fn warn_deprecated(&self, alias: &'static str) {
        if self
            .inner
            .deprecation_warned
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            tracing::warn!(alias, "{}", DEPRECATION_NOTICE);
        }
    }

    fn dispatch(&self, method: Method, params: Vec<Value>, callbacks: Callbacks) -> PendingCall {
        let request = RpcRequest::new(method.wire_name(), params);
        let id = request.id.clone();
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let cancel = CancellationToken::new();

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(method = %method, "No Tokio runtime for ProbModelSEED call: {}", e);
                settle_listeners(method, Err(RpcError::unknown()), callbacks, outcome_tx);
                return PendingCall {
                    id,
                    method,
                    outcome: outcome_rx,
                    cancel,
                };
            }
        };

        let inner = Arc::clone(&self.inner);
        let token = cancel.clone();
        handle.spawn(async move {
            let outcome = match AssertUnwindSafe(inner.execute(method, request, token))
                .catch_unwind()
                .await
            {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::error!(method = %method, "ProbModelSEED call panicked before settling");
                    Err(RpcError::unknown())
                }
            };
            settle_listeners(method, outcome, callbacks, outcome_tx);
        });

        PendingCall {
            id,
            method,
            outcome: outcome_rx,
            cancel,
        }
    }
}

/// Deliver one outcome to the listeners, then to the pending call.
fn settle_listeners(
    method: Method,
    outcome: CallOutcome,
    callbacks: Callbacks,
    outcome_tx: oneshot::Sender<CallOutcome>,
) {
    // A panicking listener must not prevent the future from settling.
    let delivered = outcome.clone();
    if std::panic::catch_unwind(AssertUnwindSafe(|| callbacks.deliver(delivered))).is_err() {
        tracing::error!(method = %method, "ProbModelSEED callback panicked");
    }
    let _ = outcome_tx.send(outcome);
}

impl ClientInner {
    async fn execute(
        &self,
        method: Method,
        request: RpcRequest,
        cancel: CancellationToken,
    ) -> CallOutcome {
        let metrics = CallMetrics::start(method);
        let outcome = self.exchange(method, &request, cancel).await;
        metrics.finish(&outcome);

        match &outcome {
            Ok(_) => tracing::debug!(method = %method, id = %request.id, "ProbModelSEED call resolved"),
            Err(e) => tracing::debug!(
                method = %method,
                id = %request.id,
                status = e.status(),
                "ProbModelSEED call rejected: {}",
                e
            ),
        }
        outcome
    }

    async fn exchange(
        &self,
        method: Method,
        request: &RpcRequest,
        cancel: CancellationToken,
    ) -> CallOutcome {
        let body = serde_json::to_string(request).map_err(|e| RpcError::Service {
            error: Value::String(format!("failed to encode request: {e}")),
        })?;

        let outbound = OutboundRequest {
            url: self.url.clone(),
            body,
            authorization: self.auth.resolve(),
        };

        tracing::debug!(
            method = %method,
            id = %request.id,
            url = %self.url,
            authorized = outbound.authorization.is_some(),
            "Sending ProbModelSEED request"
        );

        let reply = tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                tracing::debug!(id = %request.id, "ProbModelSEED request aborted");
                None
            }

            result = self.transport.post(outbound) => match result {
                Ok(reply) => Some(reply),
                Err(e) => {
                    tracing::debug!(id = %request.id, "ProbModelSEED request got no reply: {:#}", e);
                    None
                }
            },
        };

        settle(&self.url, reply, method.returns())
    }
}

/// Classify a reply (or its absence) into an outcome.
pub(crate) fn settle(url: &str, reply: Option<HttpReply>, returns: Returns) -> CallOutcome {
    match reply {
        Some(reply) if reply.is_success() => decode_success(url, reply.body, returns),
        Some(reply) => Err(decode_failure(Some(&reply.body))),
        None => Err(decode_failure(None)),
    }
}

fn decode_success(url: &str, body: String, returns: Returns) -> CallOutcome {
    let envelope: Value = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(e) => return Err(malformed(url, e.to_string(), body)),
    };

    match envelope.get("result") {
        Some(Value::Array(values)) => Ok(match returns {
            Returns::Single => values.first().cloned().unwrap_or(Value::Null),
            Returns::All => Value::Array(values.clone()),
        }),
        _ => match envelope.get("error") {
            Some(error) if !error.is_null() => Err(RpcError::Service {
                error: error.clone(),
            }),
            _ => Err(malformed(
                url,
                "response envelope has no result list".to_string(),
                body,
            )),
        },
    }
}

fn decode_failure(body: Option<&str>) -> RpcError {
    match body {
        Some(text) if !text.is_empty() => {
            let error = match serde_json::from_str::<Value>(text) {
                Ok(envelope) => envelope.get("error").cloned().unwrap_or(Value::Null),
                Err(_) => Value::String(format!("Unknown error - {text}")),
            };
            RpcError::Service { error }
        }
        _ => RpcError::unknown(),
    }
}

fn malformed(url: &str, error: String, response: String) -> RpcError {
    RpcError::MalformedResponse {
        error,
        url: url.to_string(),
        response,
    }
}

macro_rules! rpc_methods {
    ($($(#[$attr:meta])* $name:ident, $alias:ident => $method:ident;)*) => {
        impl ProbModelSeedClient {
            $(
                #[doc = concat!(
                    "Call `ProbModelSEED.", stringify!($name),
                    "` with an opaque input payload and resolve with its single result."
                )]
                $(#[$attr])*
                pub fn $name(&self, input: Value, callbacks: Callbacks) -> PendingCall {
                    self.dispatch(Method::$method, vec![input], callbacks)
                }

                #[doc = concat!("Deprecated alias of [`Self::", stringify!($name), "`].")]
                #[deprecated(
                    note = "`*_async` method names will be removed; use the method without the `_async` suffix"
                )]
                $(#[$attr])*
                pub fn $alias(&self, input: Value, callbacks: Callbacks) -> PendingCall {
                    self.warn_deprecated(stringify!($alias));
                    self.$name(input, callbacks)
                }
            )*
        }
    };
}

rpc_methods! {
    list_gapfill_solutions, list_gapfill_solutions_async => ListGapfillSolutions;
    manage_gapfill_solutions, manage_gapfill_solutions_async => ManageGapfillSolutions;
    list_fba_studies, list_fba_studies_async => ListFbaStudies;
    delete_fba_studies, delete_fba_studies_async => DeleteFbaStudies;
    export_model, export_model_async => ExportModel;
    export_media, export_media_async => ExportMedia;
    get_model, get_model_async => GetModel;
    delete_model, delete_model_async => DeleteModel;
    list_model_edits, list_model_edits_async => ListModelEdits;
    manage_model_edits, manage_model_edits_async => ManageModelEdits;
    get_feature, get_feature_async => GetFeature;
    compare_regions, compare_regions_async => CompareRegions;
    plant_annotation_overview, plant_annotation_overview_async => PlantAnnotationOverview;
    #[allow(non_snake_case)]
    ModelReconstruction, ModelReconstruction_async => LegacyModelReconstruction;
    #[allow(non_snake_case)]
    FluxBalanceAnalysis, FluxBalanceAnalysis_async => LegacyFluxBalanceAnalysis;
    #[allow(non_snake_case)]
    GapfillModel, GapfillModel_async => LegacyGapfillModel;
    import_media, import_media_async => ImportMedia;
    reconstruct_fbamodel, reconstruct_fbamodel_async => ReconstructFbamodel;
    flux_balance_analysis, flux_balance_analysis_async => FluxBalanceAnalysis;
    gapfill_model, gapfill_model_async => GapfillModel;
}
