//! Step definitions shared by the scan API feature files.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use futures::future::join_all;
use reqwest::Method;
use rstest_bdd_macros::{given, then, when};
use scan_backend::domain::ports::{ClassifierError, IdentityVerifierError, ImageStoreError};
use scan_backend::domain::{
    ExternalUserId, FALLBACK_CONFIDENCE, GUEST_FOLDER, ScanCategory, User, Verdict,
};
use serde_json::Value;

use crate::doubles::{
    ClassifierResponse, ImageStoreResponse, STORED_IMAGE_URL, VerifierResponse,
    confident_verdict,
};
use crate::harness::{
    CLIENT_EMAIL, CLIENT_SUBJECT, CLIENT_TOKEN, WorldFixture, identity_for, plain_request,
    scan_request, send, with_world_async,
};

fn submit(world: &WorldFixture, path: &str, token: Option<&str>) {
    with_world_async(&world.world(), |base_url| {
        let request = scan_request(&base_url, path, token);
        async move { vec![send(request).await] }
    });
}

fn request(world: &WorldFixture, method: Method, path: &str, token: Option<&str>) {
    with_world_async(&world.world(), |base_url| {
        let request = plain_request(&base_url, method, path, token);
        async move { vec![send(request).await] }
    });
}

fn client_user(world: &WorldFixture) -> User {
    let subject = ExternalUserId::new(CLIENT_SUBJECT).expect("valid subject");
    world
        .world()
        .borrow()
        .users
        .all()
        .into_iter()
        .find(|user| *user.external_id() == subject)
        .expect("client is registered")
}

fn last_body(world: &WorldFixture) -> Value {
    world.world().borrow().last().body.clone()
}

fn parse_category(raw: &str) -> ScanCategory {
    raw.parse().expect("known category")
}

// -----------------------------------------------------------------------------
// Given
// -----------------------------------------------------------------------------

#[given("a running scan server")]
fn a_running_scan_server(world: &WorldFixture) {
    let _ = world;
}

#[given("the identity provider rejects the client's token")]
fn the_identity_provider_rejects_the_clients_token(world: &WorldFixture) {
    world
        .world()
        .borrow()
        .verifier
        .set_response(VerifierResponse::Err(IdentityVerifierError::rejected(
            "token expired",
        )));
}

#[given("the identity provider reports subject \"{subject}\" for the same email")]
fn the_identity_provider_reports_subject_for_the_same_email(world: &WorldFixture, subject: String) {
    world
        .world()
        .borrow()
        .verifier
        .set_response(VerifierResponse::Ok(identity_for(&subject, CLIENT_EMAIL)));
}

#[given("the classifier is unavailable")]
fn the_classifier_is_unavailable(world: &WorldFixture) {
    world
        .world()
        .borrow()
        .classifier
        .set_response(ClassifierResponse::Err(ClassifierError::timeout(
            "no reply within 30s",
        )));
}

#[given("the classifier replies without a label")]
fn the_classifier_replies_without_a_label(world: &WorldFixture) {
    let mut verdict = confident_verdict();
    verdict.label = "  ".to_owned();
    verdict.recommendations = None;
    world
        .world()
        .borrow()
        .classifier
        .set_response(ClassifierResponse::Ok(verdict));
}

#[given("the image store rejects uploads")]
fn the_image_store_rejects_uploads(world: &WorldFixture) {
    world
        .world()
        .borrow()
        .images
        .set_response(ImageStoreResponse::Err(ImageStoreError::rejected(
            403_u16,
            "bucket policy",
        )));
}

#[given("the client has submitted {count} scans of type {category}")]
fn the_client_has_submitted_scans_of_type(world: &WorldFixture, count: usize, category: String) {
    let path = format!("/api/scan/{category}");
    for _ in 0..count {
        submit(world, &path, Some(CLIENT_TOKEN));
        assert_eq!(world.world().borrow().last().status, 200);
    }
}

#[given("the client has verified their token")]
fn the_client_has_verified_their_token(world: &WorldFixture) {
    request(world, Method::POST, "/api/auth/verify", Some(CLIENT_TOKEN));
    assert_eq!(world.world().borrow().last().status, 201);
}

// -----------------------------------------------------------------------------
// When
// -----------------------------------------------------------------------------

#[when("a guest submits a {category} image")]
fn a_guest_submits_an_image(world: &WorldFixture, category: String) {
    submit(world, &format!("/api/scan/{category}"), None);
}

#[when("a guest submits a {category} image via the detect path")]
fn a_guest_submits_an_image_via_the_detect_path(world: &WorldFixture, category: String) {
    submit(world, &format!("/api/detect/{category}"), None);
}

#[when("the client submits an {category} image with their token")]
fn the_client_submits_an_image_with_their_token(world: &WorldFixture, category: String) {
    submit(world, &format!("/api/scan/{category}"), Some(CLIENT_TOKEN));
}

#[when("the client requests their usage statistics")]
fn the_client_requests_their_usage_statistics(world: &WorldFixture) {
    let path = format!("/api/users/{CLIENT_SUBJECT}/stats");
    request(world, Method::GET, &path, Some(CLIENT_TOKEN));
}

#[when("the client requests the usage statistics of \"{subject}\"")]
fn the_client_requests_the_usage_statistics_of(world: &WorldFixture, subject: String) {
    let path = format!("/api/users/{subject}/stats");
    request(world, Method::GET, &path, Some(CLIENT_TOKEN));
}

#[when("the client requests page {page} of their history with {per_page} per page")]
fn the_client_requests_a_page_of_their_history(world: &WorldFixture, page: u32, per_page: u32) {
    let path =
        format!("/api/scans/history/{CLIENT_SUBJECT}?page={page}&per_page={per_page}");
    request(world, Method::GET, &path, Some(CLIENT_TOKEN));
}

#[when("the client requests their {category} history")]
fn the_client_requests_their_filtered_history(world: &WorldFixture, category: String) {
    let path = format!("/api/scans/history/{CLIENT_SUBJECT}?type={category}");
    request(world, Method::GET, &path, Some(CLIENT_TOKEN));
}

#[when("the client requests their history")]
fn the_client_requests_their_history(world: &WorldFixture) {
    let path = format!("/api/scans/history/{CLIENT_SUBJECT}");
    request(world, Method::GET, &path, Some(CLIENT_TOKEN));
}

#[when("the client requests their history via the detect path")]
fn the_client_requests_their_history_via_the_detect_path(world: &WorldFixture) {
    let path = format!("/api/detect/history/{CLIENT_SUBJECT}");
    request(world, Method::GET, &path, Some(CLIENT_TOKEN));
}

#[when("the client requests the history of \"{subject}\"")]
fn the_client_requests_the_history_of(world: &WorldFixture, subject: String) {
    let path = format!("/api/scans/history/{subject}");
    request(world, Method::GET, &path, Some(CLIENT_TOKEN));
}

#[when("an anonymous caller requests the history of \"{subject}\"")]
fn an_anonymous_caller_requests_the_history_of(world: &WorldFixture, subject: String) {
    let path = format!("/api/scans/history/{subject}");
    request(world, Method::GET, &path, None);
}

#[when("the client verifies their token")]
fn the_client_verifies_their_token(world: &WorldFixture) {
    request(world, Method::POST, "/api/auth/verify", Some(CLIENT_TOKEN));
}

#[when("an anonymous caller verifies")]
fn an_anonymous_caller_verifies(world: &WorldFixture) {
    request(world, Method::POST, "/api/auth/verify", None);
}

#[when("the client verifies their token {count} times concurrently")]
fn the_client_verifies_their_token_concurrently(world: &WorldFixture, count: usize) {
    with_world_async(&world.world(), |base_url| {
        let requests: Vec<_> = (0..count)
            .map(|_| {
                plain_request(&base_url, Method::POST, "/api/auth/verify", Some(CLIENT_TOKEN))
            })
            .collect();
        async move { join_all(requests.into_iter().map(send)).await }
    });
}

#[when("the client fetches the user \"{subject}\"")]
fn the_client_fetches_the_user(world: &WorldFixture, subject: String) {
    let path = format!("/api/auth/user/{subject}");
    request(world, Method::GET, &path, Some(CLIENT_TOKEN));
}

// -----------------------------------------------------------------------------
// Then
// -----------------------------------------------------------------------------

#[then("the response status is {status}")]
fn the_response_status_is(world: &WorldFixture, status: u16) {
    let shared = world.world();
    let ctx = shared.borrow();
    assert_eq!(ctx.last().status, status, "body: {}", ctx.last().body);
}

#[then("the error message is \"{message}\"")]
fn the_error_message_is(world: &WorldFixture, message: String) {
    let body = last_body(world);
    assert_eq!(body.get("error").and_then(Value::as_str), Some(message.as_str()));
}

#[then("the error code is \"{code}\"")]
fn the_error_code_is(world: &WorldFixture, code: String) {
    let body = last_body(world);
    assert_eq!(body.get("code").and_then(Value::as_str), Some(code.as_str()));
}

#[then("the response carries a trace id")]
fn the_response_carries_a_trace_id(world: &WorldFixture) {
    let shared = world.world();
    let ctx = shared.borrow();
    let trace_id = ctx.last().trace_id.as_deref().expect("trace-id header");
    assert!(!trace_id.is_empty());
}

#[then("the scan result has no scan id")]
fn the_scan_result_has_no_scan_id(world: &WorldFixture) {
    let body = last_body(world);
    assert_eq!(body.get("scan_id"), Some(&Value::Null));
}

#[then("the scan result has a scan id")]
fn the_scan_result_has_a_scan_id(world: &WorldFixture) {
    let body = last_body(world);
    let scan_id = body.get("scan_id").and_then(Value::as_str).expect("scan id");
    let stored = world.world().borrow().scans.all();
    assert!(stored.iter().any(|scan| scan.id().to_string() == scan_id));
}

#[then("the scan result is the classifier verdict")]
fn the_scan_result_is_the_classifier_verdict(world: &WorldFixture) {
    let body = last_body(world);
    assert_eq!(body["disease_name"], "Eczema");
    assert_eq!(body["confidence"].as_f64(), Some(0.87));
    assert_eq!(body["severity"], "low");
    assert_eq!(body["image_url"], STORED_IMAGE_URL);
    assert!(body["timestamp"].is_string());
}

#[then("the scan result is the {category} fallback verdict")]
fn the_scan_result_is_the_fallback_verdict(world: &WorldFixture, category: String) {
    let expected = Verdict::fallback(parse_category(&category));
    let body = last_body(world);
    assert_eq!(body["disease_name"], expected.label.as_str());
    assert_eq!(body["confidence"].as_f64(), Some(FALLBACK_CONFIDENCE));
    assert_eq!(body["severity"], "medium");
    assert_eq!(body["description"], expected.description.as_str());
    assert_eq!(
        body["recommendations"],
        serde_json::json!(expected.recommendations)
    );
}

#[then("the scan result is labelled \"{label}\" with the {category} specialist advice")]
fn the_scan_result_is_labelled_with_specialist_advice(
    world: &WorldFixture,
    label: String,
    category: String,
) {
    let specialist = parse_category(&category).specialist();
    let body = last_body(world);
    assert_eq!(body["disease_name"], label.as_str());
    assert_eq!(
        body["recommendations"],
        serde_json::json!([format!("Consult {specialist}")])
    );
}

#[then("the image was stored under the guest folder for {category}")]
fn the_image_was_stored_under_the_guest_folder(world: &WorldFixture, category: String) {
    let calls = world.world().borrow().images.calls();
    let (path, content_type, size) = calls.last().cloned().expect("an upload");
    assert!(path.starts_with(&format!("{category}/{GUEST_FOLDER}/")), "path: {path}");
    assert!(path.ends_with(".png"));
    assert_eq!(content_type, "image/png");
    assert_eq!(size, 4);
}

#[then("the image was stored under the client's folder for {category}")]
fn the_image_was_stored_under_the_clients_folder(world: &WorldFixture, category: String) {
    let owner = client_user(world).id();
    let calls = world.world().borrow().images.calls();
    let (path, _, _) = calls.last().cloned().expect("an upload");
    assert!(path.starts_with(&format!("{category}/{owner}/")), "path: {path}");
}

#[then("no image was stored")]
fn no_image_was_stored(world: &WorldFixture) {
    assert!(world.world().borrow().images.calls().is_empty());
}

#[then("the classifier was not called")]
fn the_classifier_was_not_called(world: &WorldFixture) {
    assert!(world.world().borrow().classifier.calls().is_empty());
}

#[then("the classifier saw the stored image as {category}")]
fn the_classifier_saw_the_stored_image(world: &WorldFixture, category: String) {
    let calls = world.world().borrow().classifier.calls();
    assert_eq!(
        calls,
        vec![(STORED_IMAGE_URL.to_owned(), parse_category(&category))]
    );
}

#[then("no scans are persisted")]
fn no_scans_are_persisted(world: &WorldFixture) {
    assert!(world.world().borrow().scans.all().is_empty());
}

#[then("the client owns {count} persisted scans")]
fn the_client_owns_persisted_scans(world: &WorldFixture, count: usize) {
    let owner = client_user(world).id();
    let owned = world
        .world()
        .borrow()
        .scans
        .all()
        .into_iter()
        .filter(|scan| scan.owner() == owner)
        .count();
    assert_eq!(owned, count);
}

#[then("the statistics report {eye} eye scans and {skin} skin scans")]
fn the_statistics_report(world: &WorldFixture, eye: u64, skin: u64) {
    let body = last_body(world);
    assert_eq!(body["eye_scans"].as_u64(), Some(eye));
    assert_eq!(body["skin_scans"].as_u64(), Some(skin));
    assert_eq!(body["total_scans"].as_u64(), Some(eye + skin));
    assert!(body["last_scan_date"].is_string());
}

#[then("the history page holds {count} scans of {total} across {pages} pages")]
fn the_history_page_holds(world: &WorldFixture, count: usize, total: u64, pages: u64) {
    let body = last_body(world);
    let scans = body["scans"].as_array().expect("scans array");
    assert_eq!(scans.len(), count);
    assert_eq!(body["total"].as_u64(), Some(total));
    assert_eq!(body["total_pages"].as_u64(), Some(pages));
}

#[then("the history is ordered newest first")]
fn the_history_is_ordered_newest_first(world: &WorldFixture) {
    let body = last_body(world);
    let timestamps: Vec<&str> = body["scans"]
        .as_array()
        .expect("scans array")
        .iter()
        .filter_map(|scan| scan["timestamp"].as_str())
        .collect();
    let mut sorted = timestamps.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(timestamps, sorted);
}

#[then("every history entry has type {category}")]
fn every_history_entry_has_type(world: &WorldFixture, category: String) {
    let body = last_body(world);
    let scans = body["scans"].as_array().expect("scans array");
    assert!(scans.iter().all(|scan| scan["disease_type"] == category.as_str()));
}

#[then("the verify message is \"{message}\"")]
fn the_verify_message_is(world: &WorldFixture, message: String) {
    let body = last_body(world);
    assert_eq!(body["message"], message.as_str());
    assert_eq!(body["user"]["uid"], CLIENT_SUBJECT);
}

#[then("every verification returns the same user id")]
fn every_verification_returns_the_same_user_id(world: &WorldFixture) {
    let shared = world.world();
    let ctx = shared.borrow();
    let ids: Vec<&Value> = ctx
        .responses
        .iter()
        .map(|response| &response.body["user"]["id"])
        .collect();
    let first = ids.first().copied().expect("at least one verification");
    assert!(first.is_string());
    assert!(ids.iter().all(|id| *id == first), "ids: {ids:?}");

    let created = ctx
        .responses
        .iter()
        .filter(|response| response.status == 201)
        .count();
    assert_eq!(created, 1);
}

#[then("exactly {count} user is stored")]
fn exactly_users_are_stored(world: &WorldFixture, count: usize) {
    assert_eq!(world.world().borrow().users.all().len(), count);
}

#[then("the fetched user has email \"{email}\"")]
fn the_fetched_user_has_email(world: &WorldFixture, email: String) {
    let body = last_body(world);
    assert_eq!(body["user"]["email"], email.as_str());
    assert_eq!(body["user"]["uid"], CLIENT_SUBJECT);
}
