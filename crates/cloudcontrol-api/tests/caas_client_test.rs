// Integration tests for `CaasClient` using wiremock.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{basic_auth, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cloudcontrol_api::caas::models::{IpVersion, NetworkDomainType, ResourceState};
use cloudcontrol_api::caas::requests::{
    DeployNetworkDomain, EditPortList, ListUpdate, NetworkDomainFilter, ReservationScope,
    VlanFilter,
};
use cloudcontrol_api::{ApiHosts, CaasClient, Credentials, Error, ShutdownOutcome, transport};

const ORG: &str = "org-1";

// ── Helpers ─────────────────────────────────────────────────────────

fn authority(server: &MockServer) -> String {
    let url = Url::parse(&server.uri()).unwrap();
    format!("{}:{}", url.host_str().unwrap(), url.port().unwrap())
}

async fn mount_identity(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/caas/2.8/user/myUser"))
        .and(basic_auth("alice", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userName": "alice",
            "organization": {
                "id": ORG,
                "name": "Example",
                "homeGeoApiHost": authority(server),
                "homeGeoId": "northamerica"
            }
        })))
        .mount(server)
        .await;
}

async fn setup() -> (MockServer, CaasClient) {
    let server = MockServer::start().await;
    mount_identity(&server).await;
    let hosts = ApiHosts::single(&Url::parse(&server.uri()).unwrap()).unwrap();
    let http = transport::TransportConfig::default().build_client().unwrap();
    let client = CaasClient::connect_with_client(http, &hosts, Credentials::new("alice", "s3cret"))
        .await
        .unwrap();
    (server, client)
}

fn base(p: &str) -> String {
    format!("/caas/2.8/{ORG}/{p}")
}

// ── Session bootstrap ───────────────────────────────────────────────

#[tokio::test]
async fn test_bootstrap_resolves_org_and_home_geo() {
    let (server, client) = setup().await;

    assert_eq!(client.org_id(), ORG);
    assert_eq!(
        client.endpoints().home_geo_base().as_str(),
        format!("http://{}/caas/2.8/{ORG}/", authority(&server))
    );
}

#[tokio::test]
async fn test_bootstrap_rejects_bad_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/caas/2.8/user/myUser"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "operation": "GET_MY_USER",
            "responseCode": "AUTHENTICATION_FAILED",
            "message": "Invalid credentials"
        })))
        .mount(&server)
        .await;

    let hosts = ApiHosts::single(&Url::parse(&server.uri()).unwrap()).unwrap();
    let result = CaasClient::connect_with_client(
        reqwest::Client::new(),
        &hosts,
        Credentials::new("alice", "wrong"),
    )
    .await;

    match result {
        Err(Error::Http {
            status,
            message,
            response_code,
        }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
            assert_eq!(response_code.as_deref(), Some("AUTHENTICATION_FAILED"));
        }
        Err(other) => panic!("expected Http error, got {other:?}"),
        Ok(_) => panic!("expected bootstrap failure"),
    }
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_network_domains_sends_only_set_filters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(base("network/networkDomain")))
        .and(query_param("datacenterId", "NA9"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "networkDomain": [{
                "id": "nd-1",
                "name": "APITEST",
                "type": "ESSENTIALS",
                "state": "NORMAL",
                "datacenterId": "NA9",
                "snatIpv4Address": "168.128.1.1"
            }],
            "pageNumber": 1,
            "pageCount": 1,
            "totalCount": 1,
            "pageSize": 250
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = NetworkDomainFilter {
        datacenter_id: Some("NA9".into()),
        ..NetworkDomainFilter::default()
    };
    let domains = client.list_network_domains(&filter).await.unwrap();

    assert_eq!(domains.len(), 1);
    assert_eq!(domains[0].name, "APITEST");
    assert_eq!(domains[0].state, ResourceState::Normal);
    assert_eq!(
        domains[0].extra.get("snatIpv4Address"),
        None,
        "known fields are not duplicated into extra"
    );

    let requests = server.received_requests().await.unwrap();
    let list_query = requests
        .iter()
        .find(|r| r.url.path().ends_with("networkDomain"))
        .and_then(|r| r.url.query().map(str::to_owned));
    assert_eq!(list_query.as_deref(), Some("datacenterId=NA9"));
}

#[tokio::test]
async fn test_empty_page_is_empty_vec() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(base("network/vlan")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pageNumber": 1,
            "pageCount": 0,
            "totalCount": 0,
            "pageSize": 250
        })))
        .mount(&server)
        .await;

    let vlans = client.list_vlans(&VlanFilter::default()).await.unwrap();
    assert!(vlans.is_empty());
}

#[tokio::test]
async fn test_geographic_regions_use_home_geo_base() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(base("infrastructure/geographicRegion")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "geographicRegion": [
                { "id": "northamerica", "name": "North America", "isHome": true }
            ],
            "totalCount": 1
        })))
        .mount(&server)
        .await;

    let regions = client
        .list_geographic_regions(&Default::default())
        .await
        .unwrap();
    assert_eq!(regions[0].id, "northamerica");
    assert_eq!(regions[0].is_home, Some(true));
}

#[tokio::test]
async fn test_reserved_ipv6_uses_family_key() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(base("network/reservedIpv6Address")))
        .and(query_param("vlanId", "v-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ipv6": [{ "ipAddress": "2607:f480::10", "vlanId": "v-1" }],
            "totalCount": 1
        })))
        .mount(&server)
        .await;

    let reserved = client
        .list_reserved_ips(&ReservationScope::Vlan("v-1".into()), IpVersion::Ipv6)
        .await
        .unwrap();
    assert_eq!(reserved[0].ip_address, "2607:f480::10");
}

// ── Error normalization ─────────────────────────────────────────────

#[tokio::test]
async fn test_non_200_carries_provider_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(base("network/vlan/missing")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "operation": "GET_VLAN",
            "responseCode": "RESOURCE_NOT_FOUND",
            "message": "VLAN missing not found."
        })))
        .mount(&server)
        .await;

    let err = client.get_vlan("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("VLAN missing not found."));
}

#[tokio::test]
async fn test_malformed_200_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(base("server/server")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client.list_servers(&Default::default()).await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }));
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_deploy_network_domain_returns_tracking_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(base("network/deployNetworkDomain")))
        .and(body_json(json!({
            "datacenterId": "NA9",
            "name": "APITEST",
            "type": "ESSENTIALS"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "operation": "DEPLOY_NETWORK_DOMAIN",
            "responseCode": "IN_PROGRESS",
            "message": "Request to deploy Network Domain 'APITEST' has been accepted.",
            "info": [{ "name": "networkDomainId", "value": "nd-1" }],
            "requestId": "na9_20260101T000000Z_abc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .deploy_network_domain(&DeployNetworkDomain {
            datacenter_id: "NA9".into(),
            name: "APITEST".into(),
            description: None,
            domain_type: NetworkDomainType::Essentials,
        })
        .await
        .unwrap();

    assert_eq!(resp.created_id().unwrap(), "nd-1");
}

#[tokio::test]
async fn test_rejected_envelope_is_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(base("network/deletePortList")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "operation": "DELETE_PORT_LIST",
            "responseCode": "RESOURCE_BUSY",
            "message": "Port List is in use."
        })))
        .mount(&server)
        .await;

    let err = client.delete_port_list("pl-1").await.unwrap_err();
    assert_eq!(err.response_code(), Some("RESOURCE_BUSY"));
}

#[tokio::test]
async fn test_edit_port_list_sends_nil_sentinel() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(base("network/editPortList")))
        .and(body_json(json!({
            "id": "pl-1",
            "port": [{ "begin": 443 }],
            "childPortListId": [{ "nil": true }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "operation": "EDIT_PORT_LIST",
            "responseCode": "OK",
            "requestId": "r-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let body = EditPortList {
        id: "pl-1".into(),
        description: None,
        port: ListUpdate::Replace(vec![cloudcontrol_api::caas::models::PortRange {
            begin: 443,
            end: None,
        }]),
        child_port_list_id: Some(ListUpdate::Clear),
    };
    client.edit_port_list(&body).await.unwrap();
}

#[tokio::test]
async fn test_shutdown_already_stopped_is_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(base("server/shutdownServer")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "operation": "SHUTDOWN_SERVER",
            "responseCode": "SERVER_STOPPED",
            "message": "Server is already stopped."
        })))
        .mount(&server)
        .await;

    let outcome = client.shutdown_server("srv-1").await.unwrap();
    assert!(matches!(outcome, ShutdownOutcome::AlreadyStopped));
}

#[tokio::test]
async fn test_shutdown_in_progress_is_initiated() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(base("server/shutdownServer")))
        .and(body_json(json!({ "id": "srv-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "operation": "SHUTDOWN_SERVER",
            "responseCode": "IN_PROGRESS",
            "requestId": "r-9"
        })))
        .mount(&server)
        .await;

    let outcome = client.shutdown_server("srv-1").await.unwrap();
    match outcome {
        ShutdownOutcome::Initiated(resp) => assert_eq!(resp.request_id.as_deref(), Some("r-9")),
        ShutdownOutcome::AlreadyStopped => panic!("expected an initiated shutdown"),
    }
}
