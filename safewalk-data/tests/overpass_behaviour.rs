//! Behavioural tests for [`OverpassProvider`] against a canned HTTP server.

mod support;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use safewalk_core::{Coordinate, ElementKind, Entity, MapProvider, ProviderError, sweep_query};
use safewalk_data::OverpassProvider;
use std::cell::RefCell;
use support::{CannedServer, CapturedRequest};

const POPULATED_AREA: &str = r#"{
  "version": 0.6,
  "elements": [
    {"type": "node", "id": 101, "lat": 9.3160, "lon": 76.6150,
     "tags": {"highway": "street_lamp"}},
    {"type": "way", "id": 202, "center": {"lat": 9.3170, "lon": 76.6160},
     "tags": {"highway": "residential", "name": "Temple Road"}}
  ]
}"#;

#[derive(Default)]
struct OverpassWorld {
    server: RefCell<Option<CannedServer>>,
    result: RefCell<Option<Result<Vec<Entity>, ProviderError>>>,
    request: RefCell<Option<CapturedRequest>>,
}

#[fixture]
fn world() -> OverpassWorld {
    OverpassWorld::default()
}

fn entities(world: &OverpassWorld) -> Vec<Entity> {
    match world.result.borrow().as_ref() {
        Some(Ok(entities)) => entities.clone(),
        other => panic!("expected entities, got {other:?}"),
    }
}

fn error(world: &OverpassWorld) -> ProviderError {
    match world.result.borrow().as_ref() {
        Some(Err(err)) => err.clone(),
        other => panic!("expected an error, got {other:?}"),
    }
}

// --- Given steps ---

#[given("an Overpass server returning a lamp and a residential road")]
fn populated_server(world: &OverpassWorld) {
    world
        .server
        .replace(Some(CannedServer::respond("200 OK", POPULATED_AREA)));
}

#[given("an Overpass server returning no elements")]
fn empty_server(world: &OverpassWorld) {
    world.server.replace(Some(CannedServer::respond(
        "200 OK",
        r#"{"version": 0.6, "elements": []}"#,
    )));
}

#[given("an Overpass server failing with a gateway timeout")]
fn failing_server(world: &OverpassWorld) {
    world.server.replace(Some(CannedServer::respond(
        "504 Gateway Timeout",
        r#"{"error": "gateway timeout"}"#,
    )));
}

#[given("an Overpass server returning an HTML page")]
fn html_server(world: &OverpassWorld) {
    world.server.replace(Some(CannedServer::respond(
        "200 OK",
        "<html><body>rate limited</body></html>",
    )));
}

// --- When steps ---

#[when("the area sweep is fetched")]
fn fetch_sweep(world: &OverpassWorld) {
    let server = world
        .server
        .take()
        .expect("server must be initialised");
    let provider = OverpassProvider::new(server.base_url()).expect("provider builds");
    let centre = Coordinate::new(9.3157, 76.6151).expect("valid centre");
    let query = sweep_query(centre).expect("sweep query");

    world
        .result
        .replace(Some(provider.fetch_entities(&query)));
    world.request.replace(Some(server.received()));
}

// --- Then steps ---

#[then("two entities are returned")]
fn then_two_entities(world: &OverpassWorld) {
    let entities = entities(world);
    assert_eq!(entities.len(), 2);
    assert_eq!(entities[0].kind, ElementKind::Node);
    assert_eq!(entities[0].tag("highway"), Some("street_lamp"));
    assert_eq!(entities[1].kind, ElementKind::Way);
    assert!(entities[1].position.is_some(), "way centre should be used");
}

#[then("the query was posted to the interpreter endpoint")]
fn then_posted(world: &OverpassWorld) {
    let request = world.request.borrow();
    let request = request.as_ref().expect("request captured");
    assert!(
        request.request_line.starts_with("POST /api/interpreter "),
        "unexpected request line {:?}",
        request.request_line
    );
    assert!(request.body.starts_with("[out:json][timeout:25];"));
    assert!(request.body.contains(r#"node["highway"="street_lamp"](around:1500,9.3157,76.6151);"#));
    assert!(request.body.ends_with("out center;\n"));
    assert!(request.header("user-agent").is_some_and(|agent| !agent.is_empty()));
}

#[then("no entities are returned")]
fn then_no_entities(world: &OverpassWorld) {
    assert!(entities(world).is_empty());
}

#[then("an HTTP error with status 504 is returned")]
fn then_http_error(world: &OverpassWorld) {
    let err = error(world);
    assert!(
        matches!(err, ProviderError::Http { status: 504, .. }),
        "expected HTTP 504, got {err:?}"
    );
    assert!(err.is_transient());
}

#[then("a malformed response error is returned")]
fn then_malformed(world: &OverpassWorld) {
    let err = error(world);
    assert!(
        matches!(err, ProviderError::MalformedResponse { .. }),
        "expected MalformedResponse, got {err:?}"
    );
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/overpass_provider.feature", name = $title)]
        fn $fn_name(world: OverpassWorld) {
            let _ = world;
        }
    };
}

register_scenario!(
    fetching_from_populated_area,
    "fetching entities from a populated area"
);
register_scenario!(empty_area_yields_no_entities, "an empty area yields no entities");
register_scenario!(server_error_is_transport_failure, "a server error is a transport failure");
register_scenario!(non_json_body_is_malformed, "a non-JSON body is malformed");
