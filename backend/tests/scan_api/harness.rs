//! Server harness and shared world for the scan API scenarios.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. Domain services run for real over
//! in-memory repositories; only third-party collaborators are doubled. The
//! `WorldFixture` stops the server even if a scenario panics.

use std::cell::RefCell;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use reqwest::RequestBuilder;
use rstest::fixture;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

use scan_backend::Trace;
use scan_backend::domain::ports::UserDirectory;
use scan_backend::domain::{
    EmailAddress, ExternalUserId, ImagePolicy, ScanCollaborators, ScanHistoryService,
    ScanIngestionService, TRACE_ID_HEADER, UsageStatsRecorder, UserDirectoryService,
    VerifiedIdentity,
};
use scan_backend::inbound::http::accounts::{get_stats, get_user, verify};
use scan_backend::inbound::http::error::{
    json_error_handler, path_error_handler, query_error_handler,
};
use scan_backend::inbound::http::history::list_history;
use scan_backend::inbound::http::scans::submit_scan;
use scan_backend::inbound::http::state::{HttpState, HttpStatePorts};

use crate::doubles::{
    ClassifierResponse, ImageStoreResponse, RecordingClassifier, RecordingIdentityVerifier,
    RecordingImageStore, STORED_IMAGE_URL, VerifierResponse, confident_verdict,
};
use crate::in_memory::{
    InMemoryScanRepository, InMemoryUsageStatsRepository, InMemoryUserRepository,
};

/// Token the identity double accepts by default.
pub(crate) const CLIENT_TOKEN: &str = "ada-id-token";
/// Subject id the identity double reports for [`CLIENT_TOKEN`].
pub(crate) const CLIENT_SUBJECT: &str = "uid-ada";
/// Email the identity double reports for [`CLIENT_TOKEN`].
pub(crate) const CLIENT_EMAIL: &str = "ada@example.com";

const BOUNDARY: &str = "scan-api-boundary";

/// Status, decoded body and trace header of one response.
#[derive(Debug, Clone)]
pub(crate) struct ApiResponse {
    pub(crate) status: u16,
    pub(crate) body: Value,
    pub(crate) trace_id: Option<String>,
}

pub(crate) struct ScanApiWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) verifier: RecordingIdentityVerifier,
    pub(crate) images: RecordingImageStore,
    pub(crate) classifier: RecordingClassifier,
    pub(crate) users: Arc<InMemoryUserRepository>,
    pub(crate) scans: Arc<InMemoryScanRepository>,
    pub(crate) last: Option<ApiResponse>,
    pub(crate) responses: Vec<ApiResponse>,
}

impl ScanApiWorld {
    pub(crate) fn last(&self) -> &ApiResponse {
        self.last.as_ref().expect("a request was sent")
    }
}

pub(crate) type SharedWorld = Rc<RefCell<ScanApiWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        shutdown(&self.world);
    }
}

fn shutdown(world: &SharedWorld) {
    // The future must not borrow the world; it is borrowed for `block_on`.
    let ctx = world.borrow();
    let server = ctx.server.clone();
    ctx.local.block_on(&ctx.runtime, async move {
        server.stop(true).await;
    });
}

/// Run `operation` against the server and remember the last response.
pub(crate) fn with_world_async<F>(world: &SharedWorld, operation: impl FnOnce(String) -> F)
where
    F: Future<Output = Vec<ApiResponse>>,
{
    let responses = {
        let ctx = world.borrow();
        let base_url = ctx.base_url.clone();
        ctx.local.block_on(&ctx.runtime, operation(base_url))
    };
    let mut ctx = world.borrow_mut();
    ctx.last = responses.last().cloned();
    ctx.responses = responses;
}

/// Identity the verifier double reports for `subject`.
pub(crate) fn identity_for(subject: &str, email: &str) -> VerifiedIdentity {
    VerifiedIdentity {
        subject_id: ExternalUserId::new(subject).expect("valid subject"),
        email: EmailAddress::new(email).expect("valid email"),
        name: Some("Ada Lovelace".to_owned()),
    }
}

/// Encode a single `image` part as `multipart/form-data`.
pub(crate) fn multipart_image(filename: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; \
         filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Build a scan submission request for a small PNG.
pub(crate) fn scan_request(base_url: &str, path: &str, token: Option<&str>) -> RequestBuilder {
    let request = reqwest::Client::new()
        .post(format!("{base_url}{path}"))
        .header(
            reqwest::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(multipart_image("lesion.png", "image/png", &[0x89, 0x50, 0x4E, 0x47]));
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Build a bodiless request.
pub(crate) fn plain_request(
    base_url: &str,
    method: reqwest::Method,
    path: &str,
    token: Option<&str>,
) -> RequestBuilder {
    let request = reqwest::Client::new().request(method, format!("{base_url}{path}"));
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Send `request` and decode the JSON body, if any.
pub(crate) async fn send(request: RequestBuilder) -> ApiResponse {
    let response = request.send().await.expect("request reaches the server");
    let status = response.status().as_u16();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    ApiResponse {
        status,
        body,
        trace_id,
    }
}

async fn spawn_scan_server(http_state: HttpState) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let http_data = web::Data::new(http_state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(http_data.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .wrap(Trace)
            .service(submit_scan)
            .service(list_history)
            .service(verify)
            .service(get_user)
            .service(get_stats)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

struct Wiring {
    verifier: RecordingIdentityVerifier,
    images: RecordingImageStore,
    classifier: RecordingClassifier,
    users: Arc<InMemoryUserRepository>,
    scans: Arc<InMemoryScanRepository>,
    stats: Arc<InMemoryUsageStatsRepository>,
}

impl Wiring {
    fn new() -> Self {
        Self {
            verifier: RecordingIdentityVerifier::new(VerifierResponse::Ok(identity_for(
                CLIENT_SUBJECT,
                CLIENT_EMAIL,
            ))),
            images: RecordingImageStore::new(ImageStoreResponse::Ok(STORED_IMAGE_URL.to_owned())),
            classifier: RecordingClassifier::new(ClassifierResponse::Ok(confident_verdict())),
            users: Arc::new(InMemoryUserRepository::default()),
            scans: Arc::new(InMemoryScanRepository::default()),
            stats: Arc::new(InMemoryUsageStatsRepository::default()),
        }
    }

    fn http_state(&self) -> HttpState {
        let clock = Arc::new(DefaultClock);
        let directory: Arc<dyn UserDirectory> = Arc::new(UserDirectoryService::new(
            Arc::new(self.verifier.clone()),
            self.users.clone(),
            self.stats.clone(),
            clock.clone(),
        ));
        let history = Arc::new(ScanHistoryService::new(
            self.users.clone(),
            self.scans.clone(),
        ));
        let ingestion = Arc::new(ScanIngestionService::new(
            ImagePolicy::default(),
            ScanCollaborators {
                directory: directory.clone(),
                images: Arc::new(self.images.clone()),
                classifier: Arc::new(self.classifier.clone()),
            },
            self.scans.clone(),
            UsageStatsRecorder::new(self.stats.clone(), clock.clone()),
            clock,
        ));

        HttpState::from(HttpStatePorts {
            scans: ingestion,
            history,
            users: directory,
        })
    }
}

#[fixture]
pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let wiring = Wiring::new();
    let http_state = wiring.http_state();

    let (base_url, server) = local
        .block_on(&runtime, spawn_scan_server(http_state))
        .expect("server should start");

    let Wiring {
        verifier,
        images,
        classifier,
        users,
        scans,
        stats: _,
    } = wiring;

    WorldFixture {
        world: Rc::new(RefCell::new(ScanApiWorld {
            runtime,
            local,
            base_url,
            server,
            verifier,
            images,
            classifier,
            users,
            scans,
            last: None,
            responses: Vec::new(),
        })),
    }
}
