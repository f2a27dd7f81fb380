//! Builders for HTTP state ports and the adapters behind them.
//!
//! Every collaborator with missing credentials, and every repository without
//! a database pool, falls back to its fixture so the server still starts.

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use reqwest::Url;
use tracing::{info, warn};

use scan_backend::domain::ports::{
    ChatAssistant, Classifier, ClinicDirectory, FixtureChatAssistant, FixtureClassifier,
    FixtureClinicDirectory, FixtureIdentityVerifier, FixtureImageStore, FixtureScanRepository,
    FixtureUsageStatsRepository, FixtureUserRepository, IdentityVerifier, ImageStore,
    ScanRepository, UsageStatsRepository, UserRepository,
};
use scan_backend::domain::{
    ScanCollaborators, ScanHistoryService, ScanIngestionService, UsageStatsRecorder,
    UserDirectoryService,
};
use scan_backend::inbound::http::state::{HttpState, HttpStateExtraPorts, HttpStatePorts};
use scan_backend::outbound::chat::GeminiChatAssistant;
use scan_backend::outbound::classifier::GroqClassifier;
use scan_backend::outbound::clinics::PlacesClinicDirectory;
use scan_backend::outbound::identity::FirebaseIdentityVerifier;
use scan_backend::outbound::persistence::{
    DbPool, DieselScanRepository, DieselUsageStatsRepository, DieselUserRepository,
};
use scan_backend::outbound::storage::SupabaseImageStore;
use scan_backend::settings::AppSettings;

use super::ServerConfig;

/// Driven adapters talking to third-party services.
struct Collaborators {
    verifier: Arc<dyn IdentityVerifier>,
    images: Arc<dyn ImageStore>,
    classifier: Arc<dyn Classifier>,
    chat: Arc<dyn ChatAssistant>,
    clinics: Arc<dyn ClinicDirectory>,
}

/// Repositories sharing one database pool.
struct Repositories {
    users: Arc<dyn UserRepository>,
    scans: Arc<dyn ScanRepository>,
    stats: Arc<dyn UsageStatsRepository>,
}

impl Repositories {
    fn fixtures() -> Self {
        Self {
            users: Arc::new(FixtureUserRepository),
            scans: Arc::new(FixtureScanRepository),
            stats: Arc::new(FixtureUsageStatsRepository),
        }
    }

    fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            scans: Arc::new(DieselScanRepository::new(pool.clone())),
            stats: Arc::new(DieselUsageStatsRepository::new(pool.clone())),
        }
    }
}

fn setup_error(collaborator: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("failed to configure {collaborator}: {err}"))
}

/// Use the adapter built from `credentials` when present, else `fixture`.
fn configured_or_fixture<K, T>(
    name: &str,
    credentials: Option<K>,
    build: impl FnOnce(K) -> io::Result<Arc<T>>,
    fixture: Arc<T>,
) -> io::Result<Arc<T>>
where
    T: ?Sized,
{
    match credentials {
        Some(credentials) => {
            info!(collaborator = name, "collaborator configured");
            build(credentials)
        }
        None => {
            warn!(collaborator = name, "collaborator not configured; using fixture");
            Ok(fixture)
        }
    }
}

fn select_repositories<Pool>(
    pool: Option<&Pool>,
    make: impl FnOnce(&Pool) -> Repositories,
) -> Repositories {
    match pool {
        Some(pool) => make(pool),
        None => {
            warn!("no database configured; scans and users are not persisted");
            Repositories::fixtures()
        }
    }
}

fn build_collaborators(settings: &AppSettings) -> io::Result<Collaborators> {
    let verifier = configured_or_fixture(
        "identity",
        settings.firebase_api_key(),
        |key| {
            let endpoint =
                Url::parse(&settings.firebase_endpoint).map_err(|err| setup_error("identity", err))?;
            let verifier = FirebaseIdentityVerifier::new(endpoint, key, settings.identity_timeout())
                .map_err(|err| setup_error("identity", err))?;
            Ok(Arc::new(verifier) as Arc<dyn IdentityVerifier>)
        },
        Arc::new(FixtureIdentityVerifier) as Arc<dyn IdentityVerifier>,
    )?;

    let images = configured_or_fixture(
        "storage",
        settings.supabase_credentials(),
        |(url, key)| {
            let store = SupabaseImageStore::new(
                url,
                key,
                settings.supabase_bucket.clone(),
                settings.storage_timeout(),
            )
            .map_err(|err| setup_error("storage", err))?;
            Ok(Arc::new(store) as Arc<dyn ImageStore>)
        },
        Arc::new(FixtureImageStore) as Arc<dyn ImageStore>,
    )?;

    let classifier = configured_or_fixture(
        "classifier",
        settings.groq_api_key(),
        |key| {
            let endpoint = Url::parse(&settings.groq_endpoint)
                .map_err(|err| setup_error("classifier", err))?;
            let classifier = GroqClassifier::new(
                endpoint,
                key,
                settings.groq_model.clone(),
                settings.classifier_timeout(),
            )
            .map_err(|err| setup_error("classifier", err))?;
            Ok(Arc::new(classifier) as Arc<dyn Classifier>)
        },
        Arc::new(FixtureClassifier) as Arc<dyn Classifier>,
    )?;

    let chat = configured_or_fixture(
        "chat",
        settings.gemini_api_key(),
        |key| {
            let assistant = GeminiChatAssistant::new(
                &settings.gemini_endpoint,
                &settings.gemini_model,
                key,
                settings.chat_timeout(),
            )
            .map_err(|err| setup_error("chat", err))?;
            Ok(Arc::new(assistant) as Arc<dyn ChatAssistant>)
        },
        Arc::new(FixtureChatAssistant) as Arc<dyn ChatAssistant>,
    )?;

    let clinics = configured_or_fixture(
        "clinics",
        settings.google_maps_api_key(),
        |key| {
            let directory =
                PlacesClinicDirectory::new(&settings.places_endpoint, key, settings.clinics_timeout())
                    .map_err(|err| setup_error("clinics", err))?;
            Ok(Arc::new(directory) as Arc<dyn ClinicDirectory>)
        },
        Arc::new(FixtureClinicDirectory) as Arc<dyn ClinicDirectory>,
    )?;

    Ok(Collaborators {
        verifier,
        images,
        classifier,
        chat,
        clinics,
    })
}

fn assemble_state(
    settings: &AppSettings,
    collaborators: Collaborators,
    repositories: Repositories,
    clock: Arc<dyn Clock>,
) -> HttpState {
    let Collaborators {
        verifier,
        images,
        classifier,
        chat,
        clinics,
    } = collaborators;
    let Repositories {
        users,
        scans,
        stats,
    } = repositories;

    let directory = Arc::new(UserDirectoryService::new(
        verifier,
        users.clone(),
        stats.clone(),
        clock.clone(),
    ));
    let history = Arc::new(ScanHistoryService::new(users, scans.clone()));
    let policy = settings.image_policy();
    let max_upload_bytes = policy.max_bytes();
    let ingestion = Arc::new(ScanIngestionService::new(
        policy,
        ScanCollaborators {
            directory: directory.clone(),
            images,
            classifier,
        },
        scans,
        UsageStatsRecorder::new(stats, clock.clone()),
        clock,
    ));

    HttpState::new_with_extra(
        HttpStatePorts {
            scans: ingestion,
            history,
            users: directory,
        },
        HttpStateExtraPorts { chat, clinics },
    )
    .with_max_upload_bytes(max_upload_bytes)
}

/// Build the shared HTTP state from configured adapters and fixture fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let collaborators = build_collaborators(&config.settings)?;
    let repositories = select_repositories(config.db_pool.as_ref(), Repositories::diesel);
    let state = assemble_state(
        &config.settings,
        collaborators,
        repositories,
        Arc::new(DefaultClock),
    );
    Ok(web::Data::new(state))
}
