// oam-relay-server/src/server.rs
// ============================================================================
// Module: Relay HTTP Server
// Description: HTTP API surface for lifecycle and record operations.
// Purpose: Expose the orchestrator and record engine over axum POST routes.
// Dependencies: oam-relay-core, oam-relay-records, axum, tokio
// ============================================================================

//! ## Overview
//! The server exposes the seven relay operations as POST routes with
//! kebab-case JSON bodies. Lifecycle successes answer 204 No Content; the
//! caller is then guaranteed configuration and routing only — automation
//! runs out-of-band through the worker queue. Request bodies are untrusted
//! and bounded by the configured size limit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::post;
use oam_relay_config::AuditSinkType;
use oam_relay_config::OamRelayConfig;
use oam_relay_core::ApplicationName;
use oam_relay_core::EndpointDescription;
use oam_relay_core::InMemoryResourceInventory;
use oam_relay_core::LifecycleError;
use oam_relay_core::OperationName;
use oam_relay_core::OperationPath;
use oam_relay_core::Orchestrator;
use oam_relay_core::ReleaseNumber;
use oam_relay_core::RemoteAddress;
use oam_relay_core::RemoteProtocol;
use oam_relay_core::SuccessorDescription;
use oam_relay_records::InMemoryRecordIndex;
use oam_relay_records::OamRecord;
use oam_relay_records::QueryError;
use oam_relay_records::RecordQueryEngine;
use oam_relay_records::ScrollPolicy;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::audit::AuditSink;
use crate::audit::FileAuditSink;
use crate::audit::LifecycleAuditEvent;
use crate::audit::NoopAuditSink;
use crate::audit::StderrAuditSink;
use crate::automation::AutomationGateway;
use crate::automation::AutomationWorker;
use crate::automation::HttpAutomationGateway;
use crate::automation::NullAutomationGateway;
use crate::automation::QueuedAutomationExecutor;
use crate::automation::automation_channel;
use crate::routing::RoutingTable;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Operation every registered peer consumes by default.
const REDIRECT_OPERATION: &str = "redirect-oam-request-information";
/// Routing path of the default redirect operation.
const REDIRECT_OPERATION_PATH: &str = "/v1/redirect-oam-request-information";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server construction and transport errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration was rejected.
    #[error("server config error: {0}")]
    Config(String),
    /// Server initialization failed.
    #[error("server init error: {0}")]
    Init(String),
    /// The HTTP transport failed.
    #[error("server transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Orchestrator wired to the server's concrete collaborators.
type RelayOrchestrator =
    Orchestrator<InMemoryResourceInventory, RoutingTable, QueuedAutomationExecutor>;

/// Shared state behind every handler.
struct AppState {
    /// Lifecycle orchestrator.
    orchestrator: RelayOrchestrator,
    /// Record query engine.
    engine: RecordQueryEngine<InMemoryRecordIndex>,
    /// Audit sink for lifecycle events.
    audit: Arc<dyn AuditSink>,
}

/// OaM Relay server instance.
pub struct OamRelayServer {
    /// Validated configuration.
    config: OamRelayConfig,
    /// Shared handler state.
    state: Arc<AppState>,
    /// Automation worker, spawned by [`OamRelayServer::serve`].
    worker: AutomationWorker,
}

impl OamRelayServer {
    /// Builds a server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when initialization fails.
    pub fn from_config(config: OamRelayConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let audit = build_audit_sink(&config)?;
        let gateway: Arc<dyn AutomationGateway> = match &config.automation.gateway {
            Some(base) => Arc::new(HttpAutomationGateway::new(base.clone())),
            None => Arc::new(NullAutomationGateway),
        };
        let (executor, worker) =
            automation_channel(config.automation.queue_capacity, gateway, Arc::clone(&audit));
        let orchestrator =
            Orchestrator::new(InMemoryResourceInventory::new(), RoutingTable::new(), executor);
        let engine = RecordQueryEngine::with_scroll_policy(
            InMemoryRecordIndex::new(),
            ScrollPolicy {
                keep_alive_ms: config.records.scroll_keep_alive_ms,
            },
        );
        let state = Arc::new(AppState {
            orchestrator,
            engine,
            audit,
        });
        Ok(Self {
            config,
            state,
            worker,
        })
    }

    /// Serves requests until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr: SocketAddr = self
            .config
            .server
            .bind
            .parse()
            .map_err(|_| ServerError::Config("invalid bind address".to_string()))?;
        tokio::spawn(self.worker.run());
        let app = router(self.state, self.config.server.max_body_bytes);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|_| ServerError::Transport("http bind failed".to_string()))?;
        axum::serve(listener, app)
            .await
            .map_err(|_| ServerError::Transport("http server failed".to_string()))
    }
}

/// Builds the audit sink selected by configuration.
fn build_audit_sink(config: &OamRelayConfig) -> Result<Arc<dyn AuditSink>, ServerError> {
    match config.audit.sink {
        AuditSinkType::Stderr => Ok(Arc::new(StderrAuditSink)),
        AuditSinkType::None => Ok(Arc::new(NoopAuditSink)),
        AuditSinkType::File => {
            let path = config
                .audit
                .path
                .as_ref()
                .ok_or_else(|| ServerError::Config("audit.path required".to_string()))?;
            let sink =
                FileAuditSink::new(path).map_err(|err| ServerError::Init(err.to_string()))?;
            Ok(Arc::new(sink))
        }
    }
}

/// Builds the route table for the relay API.
fn router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/v1/regard-application", post(regard_application))
        .route("/v1/disregard-application", post(disregard_application))
        .route("/v1/bequeath-your-data-and-die", post(bequeath_your_data_and_die))
        .route("/v1/list-applications", post(list_applications))
        .route("/v1/list-records", post(list_records))
        .route("/v1/list-records-of-application", post(list_records_of_application))
        .route("/v1/record-oam-request", post(record_oam_request))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

// ============================================================================
// SECTION: Request Bodies
// ============================================================================

/// Body of `regard-application`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RegardApplicationBody {
    /// Application name to register.
    application_name: ApplicationName,
    /// Release number to register.
    release_number: ReleaseNumber,
    /// Remote protocol of the peer.
    protocol: RemoteProtocol,
    /// Remote address of the peer.
    address: RemoteAddress,
    /// Remote port of the peer.
    port: u16,
    /// Named operations to route; defaults to the redirect operation.
    #[serde(default)]
    operations: Option<BTreeMap<OperationName, OperationPath>>,
}

/// Body of `disregard-application`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DisregardApplicationBody {
    /// Application name to deregister.
    application_name: ApplicationName,
    /// Release number to deregister.
    release_number: ReleaseNumber,
}

/// Body of `bequeath-your-data-and-die`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct BequeathBody {
    /// Successor application name.
    new_application_name: ApplicationName,
    /// Successor release number.
    new_application_release: ReleaseNumber,
    /// Successor remote protocol.
    new_application_protocol: RemoteProtocol,
    /// Successor remote address.
    new_application_address: RemoteAddress,
    /// Successor remote port.
    new_application_port: u16,
}

/// Body of `list-records`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ListRecordsBody {
    /// Number of records to return.
    number_of_records: u64,
    /// Offset of the latest record to skip past.
    latest_record: u64,
}

/// Body of `list-records-of-application`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ListRecordsOfApplicationBody {
    /// Application whose records are requested.
    application_name: ApplicationName,
    /// Number of records to return.
    number_of_records: u64,
    /// Offset of the latest match to skip past.
    latest_match: u64,
}

/// Error body returned for failed requests.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// Human-readable error message.
    error: String,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Maps a lifecycle error to a response.
fn lifecycle_failure(err: &LifecycleError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(ErrorBody {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// Maps a record query error to a response.
fn query_failure(err: &QueryError) -> Response {
    let code = match err {
        QueryError::Malformed(_) => StatusCode::BAD_REQUEST,
        QueryError::Unavailable(_) | QueryError::Scroll(_) => StatusCode::BAD_GATEWAY,
    };
    (
        code,
        axum::Json(ErrorBody {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// Records one lifecycle audit event.
fn audit_lifecycle(
    state: &AppState,
    operation: &'static str,
    application: Option<&ApplicationName>,
    release: Option<&ReleaseNumber>,
    result: &Result<(), LifecycleError>,
) {
    let (outcome, error) = match result {
        Ok(()) => ("resolved", None),
        Err(err) => ("rejected", Some(err.to_string())),
    };
    state.audit.record_lifecycle(&LifecycleAuditEvent::new(
        operation,
        application.map(ToString::to_string),
        release.map(ToString::to_string),
        outcome,
        error,
    ));
}

/// Handles `regard-application`.
async fn regard_application(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<RegardApplicationBody>,
) -> Response {
    let operations = body.operations.unwrap_or_else(|| {
        let mut defaults = BTreeMap::new();
        defaults.insert(
            OperationName::new(REDIRECT_OPERATION),
            OperationPath::new(REDIRECT_OPERATION_PATH),
        );
        defaults
    });
    let description = EndpointDescription {
        application_name: body.application_name,
        release_number: body.release_number,
        remote_protocol: body.protocol,
        remote_address: body.address,
        remote_port: body.port,
        operations,
    };
    let result = state
        .orchestrator
        .regard_application(&description, &OperationPath::new("/v1/regard-application"))
        .await;
    audit_lifecycle(
        &state,
        "regard-application",
        Some(&description.application_name),
        Some(&description.release_number),
        &result,
    );
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => lifecycle_failure(&err),
    }
}

/// Handles `disregard-application`.
async fn disregard_application(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<DisregardApplicationBody>,
) -> Response {
    let result = state
        .orchestrator
        .disregard_application(
            &body.application_name,
            &body.release_number,
            &OperationPath::new("/v1/disregard-application"),
        )
        .await;
    audit_lifecycle(
        &state,
        "disregard-application",
        Some(&body.application_name),
        Some(&body.release_number),
        &result,
    );
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => lifecycle_failure(&err),
    }
}

/// Handles `bequeath-your-data-and-die`.
async fn bequeath_your_data_and_die(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<BequeathBody>,
) -> Response {
    let successor = SuccessorDescription {
        application_name: body.new_application_name,
        release_number: body.new_application_release,
        remote_protocol: body.new_application_protocol,
        remote_address: body.new_application_address,
        remote_port: body.new_application_port,
    };
    let result = state.orchestrator.bequeath_your_data_and_die(&successor).await;
    audit_lifecycle(
        &state,
        "bequeath-your-data-and-die",
        Some(&successor.application_name),
        Some(&successor.release_number),
        &result,
    );
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => lifecycle_failure(&err),
    }
}

/// Handles `list-applications`.
async fn list_applications(State(state): State<Arc<AppState>>) -> Response {
    match state.orchestrator.list_applications().await {
        Ok(applications) => (StatusCode::OK, axum::Json(applications)).into_response(),
        Err(err) => lifecycle_failure(&err),
    }
}

/// Handles `list-records`.
async fn list_records(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<ListRecordsBody>,
) -> Response {
    match state.engine.list_records(body.number_of_records, body.latest_record).await {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(err) => query_failure(&err),
    }
}

/// Handles `list-records-of-application`.
async fn list_records_of_application(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<ListRecordsOfApplicationBody>,
) -> Response {
    let result = state
        .engine
        .list_records_of_application(
            &body.application_name,
            body.number_of_records,
            body.latest_match,
        )
        .await;
    match result {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(err) => query_failure(&err),
    }
}

/// Handles `record-oam-request`.
async fn record_oam_request(
    State(state): State<Arc<AppState>>,
    axum::Json(record): axum::Json<OamRecord>,
) -> Response {
    match state.engine.record_oam_request(&record).await {
        Ok(Some(receipt)) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => query_failure(&err),
    }
}
