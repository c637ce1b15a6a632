//! End-to-end tests for the HTTP adapters against a loopback stub server.

mod support;

use std::time::Duration;

use courier_route_core::{
    Coordinate, ProviderError, ResolutionOutcome, RouteProvider, RouteResolver, TravelMode,
};
use courier_route_http::{
    GraphHopperProvider, HttpProviderConfig, OpenRouteServiceProvider, OsrmProvider,
    ProviderChainConfig,
};
use rstest::{fixture, rstest};
use support::{Reply, StubServer};

const OSRM_OK: &str = r#"{
    "code": "Ok",
    "routes": [{
        "geometry": {"type": "LineString", "coordinates": [[10.1815, 36.8065], [10.175, 36.812], [10.1658, 36.8188]]},
        "distance": 2410.0,
        "duration": 290.0
    }]
}"#;

const GRAPHHOPPER_OK: &str = r#"{
    "paths": [{
        "distance": 2390.0,
        "time": 301000,
        "points": {"type": "LineString", "coordinates": [[10.1815, 36.8065], [10.1658, 36.8188]]}
    }]
}"#;

const ORS_OK: &str = r#"{
    "type": "FeatureCollection",
    "features": [{
        "geometry": {"type": "LineString", "coordinates": [[10.1815, 36.8065], [10.172, 36.811], [10.1658, 36.8188]]},
        "properties": {"summary": {"distance": 2450.0, "duration": 320.0}}
    }]
}"#;

#[fixture]
fn endpoints() -> (Coordinate, Coordinate) {
    (
        Coordinate::new(36.8065, 10.1815),
        Coordinate::new(36.8188, 10.1658),
    )
}

fn osrm(server: &StubServer) -> OsrmProvider {
    OsrmProvider::new(server.url()).expect("provider should build")
}

#[rstest]
#[tokio::test]
async fn osrm_returns_authoritative_route(endpoints: (Coordinate, Coordinate)) {
    let server = StubServer::ok(OSRM_OK).await;
    let (start, end) = endpoints;

    let route = osrm(&server)
        .fetch_route(start, end, TravelMode::Cycling)
        .await
        .expect("route");

    assert!(route.is_authoritative());
    assert_eq!(route.distance_meters(), 2410.0);
    assert_eq!(route.duration(), Duration::from_secs(290));
    assert_eq!(route.polyline().len(), 3);
    assert_eq!(
        server.requests(),
        vec![
            "/route/v1/cycling/10.1815,36.8065;10.1658,36.8188?overview=full&geometries=geojson"
                .to_owned()
        ]
    );
}

#[rstest]
#[tokio::test]
async fn graphhopper_sends_key_and_converts_time(endpoints: (Coordinate, Coordinate)) {
    let server = StubServer::ok(GRAPHHOPPER_OK).await;
    let provider = GraphHopperProvider::with_config(
        HttpProviderConfig::new(server.url()).with_api_key("gh-key"),
    )
    .expect("provider should build");
    let (start, end) = endpoints;

    let route = provider
        .fetch_route(start, end, TravelMode::Driving)
        .await
        .expect("route");

    assert_eq!(route.duration(), Duration::from_secs(301));
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("/route?point=36.8065%2C10.1815&point=36.8188%2C10.1658"));
    assert!(requests[0].contains("profile=car"));
    assert!(requests[0].ends_with("key=gh-key"));
}

#[rstest]
#[tokio::test]
async fn openrouteservice_returns_route(endpoints: (Coordinate, Coordinate)) {
    let server = StubServer::ok(ORS_OK).await;
    let provider = OpenRouteServiceProvider::with_config(
        HttpProviderConfig::new(server.url()).with_api_key("ors-key"),
    )
    .expect("provider should build");
    let (start, end) = endpoints;

    let route = provider
        .fetch_route(start, end, TravelMode::Walking)
        .await
        .expect("route");

    assert_eq!(route.distance_meters(), 2450.0);
    assert!(server.requests()[0].starts_with("/v2/directions/foot-walking?api_key=ors-key"));
}

#[rstest]
#[case(404)]
#[case(503)]
#[tokio::test]
async fn non_success_status_is_reported(endpoints: (Coordinate, Coordinate), #[case] status: u16) {
    let server = StubServer::start(Reply::Json {
        status,
        body: r#"{"code": "InvalidUrl"}"#.to_owned(),
    })
    .await;
    let (start, end) = endpoints;

    let err = osrm(&server)
        .fetch_route(start, end, TravelMode::Driving)
        .await
        .expect_err("status should fail");

    assert_eq!(
        err,
        ProviderError::HttpStatus {
            provider: "osrm".to_owned(),
            status,
        }
    );
}

#[rstest]
#[tokio::test]
async fn malformed_body_is_parse_error(endpoints: (Coordinate, Coordinate)) {
    let server = StubServer::ok("<html>maintenance</html>").await;
    let (start, end) = endpoints;

    let err = osrm(&server)
        .fetch_route(start, end, TravelMode::Driving)
        .await
        .expect_err("html is not json");

    assert!(matches!(err, ProviderError::Parse { .. }), "got {err:?}");
}

#[rstest]
#[tokio::test]
async fn oversized_body_is_rejected(endpoints: (Coordinate, Coordinate)) {
    let server = StubServer::ok(OSRM_OK).await;
    let provider = OsrmProvider::with_config(
        HttpProviderConfig::new(server.url()).with_max_body_bytes(64),
    )
    .expect("provider should build");
    let (start, end) = endpoints;

    let err = provider
        .fetch_route(start, end, TravelMode::Driving)
        .await
        .expect_err("body is over the limit");

    assert_eq!(
        err,
        ProviderError::Parse {
            provider: "osrm".to_owned(),
            message: "response body exceeds 64 bytes".to_owned(),
        }
    );
}

#[rstest]
#[tokio::test]
async fn body_at_limit_is_accepted(endpoints: (Coordinate, Coordinate)) {
    let server = StubServer::ok(OSRM_OK).await;
    let provider = OsrmProvider::with_config(
        HttpProviderConfig::new(server.url()).with_max_body_bytes(OSRM_OK.len()),
    )
    .expect("provider should build");
    let (start, end) = endpoints;

    let route = provider
        .fetch_route(start, end, TravelMode::Driving)
        .await
        .expect("route");

    assert_eq!(route.polyline().len(), 3);
}

#[rstest]
#[tokio::test]
async fn stalled_server_times_out(endpoints: (Coordinate, Coordinate)) {
    let server = StubServer::start(Reply::Stall).await;
    let provider = OsrmProvider::with_config(
        HttpProviderConfig::new(server.url()).with_timeout(Duration::from_millis(200)),
    )
    .expect("provider should build");
    let (start, end) = endpoints;

    let err = provider
        .fetch_route(start, end, TravelMode::Driving)
        .await
        .expect_err("stalled server");

    assert!(matches!(err, ProviderError::Timeout { .. }), "got {err:?}");
}

#[rstest]
#[tokio::test]
async fn refused_connection_is_network_error(endpoints: (Coordinate, Coordinate)) {
    // Bind then drop to get a port with nothing listening.
    let url = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        format!("http://{}", listener.local_addr().expect("address"))
    };
    let provider = OsrmProvider::new(url).expect("provider should build");
    let (start, end) = endpoints;

    let err = provider
        .fetch_route(start, end, TravelMode::Driving)
        .await
        .expect_err("nothing listening");

    assert!(
        matches!(err, ProviderError::Network { .. } | ProviderError::Timeout { .. }),
        "got {err:?}"
    );
}

#[rstest]
#[tokio::test]
async fn resolver_falls_through_to_working_provider(endpoints: (Coordinate, Coordinate)) {
    let broken = StubServer::start(Reply::Json {
        status: 500,
        body: "{}".to_owned(),
    })
    .await;
    let working = StubServer::ok(OSRM_OK).await;
    let resolver = RouteResolver::new(vec![Box::new(osrm(&broken)), Box::new(osrm(&working))]);
    let (start, end) = endpoints;

    let outcome = resolver
        .resolve_outcome(start, end, TravelMode::Driving)
        .await;

    assert!(matches!(outcome, ResolutionOutcome::Success(_)));
    assert_eq!(broken.requests().len(), 1);
    assert_eq!(working.requests().len(), 1);
}

#[rstest]
#[tokio::test]
async fn chain_degrades_when_every_provider_stalls(endpoints: (Coordinate, Coordinate)) {
    let stalled = StubServer::start(Reply::Stall).await;
    let config = ProviderChainConfig::default().overlay(|name| match name {
        "COURIER_ROUTE_OSRM_URL" => Some(stalled.url()),
        "COURIER_ROUTE_TIMEOUT_SECS" => Some("1".to_owned()),
        _ => None,
    });
    let resolver = config.build_resolver().expect("resolver should build");
    let (start, end) = endpoints;

    let outcome = resolver
        .resolve_outcome(start, end, TravelMode::Walking)
        .await;

    assert!(outcome.is_degraded());
    let route = outcome.route();
    assert_eq!(route.polyline().first(), Some(&start));
    assert_eq!(route.polyline().last(), Some(&end));
}
