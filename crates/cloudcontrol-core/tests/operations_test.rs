// Integration tests for `Session` operations against a wiremock provider.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cloudcontrol_api::caas::requests::NetworkDomainFilter;
use cloudcontrol_core::{
    CoreError, CreateFirewallRule, CreateNetworkDomain, CreateServer, DuplicateNamePolicy,
    EndpointSpec, IpVersion, ListChange, NetworkDomainType, NicPlacement, NicRequest, PortMatch,
    PortRange, PortSpec, PowerAction, ReserveIp, ResourceState, Session, SessionConfig,
    TrackingSleeper, UpdateFirewallRule, UpdatePortList, UpdateServer, WaitPolicy,
};

const ORG: &str = "org-1";

// ── Helpers ─────────────────────────────────────────────────────────

fn authority(server: &MockServer) -> String {
    let url = Url::parse(&server.uri()).unwrap();
    format!("{}:{}", url.host_str().unwrap(), url.port().unwrap())
}

async fn setup() -> (MockServer, Session, TrackingSleeper) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/caas/2.8/user/myUser"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userName": "alice",
            "organization": { "id": ORG, "homeGeoApiHost": authority(&server) }
        })))
        .mount(&server)
        .await;

    let mut config = SessionConfig::new("na", "alice", SecretString::from("s3cret".to_owned()));
    config.base_url = Some(Url::parse(&server.uri()).unwrap());
    let sleeper = TrackingSleeper::new();
    let session = Session::connect(config)
        .await
        .unwrap()
        .with_sleeper(Arc::new(sleeper.clone()));
    (server, session, sleeper)
}

fn base(p: &str) -> String {
    format!("/caas/2.8/{ORG}/{p}")
}

fn accepted(operation: &str, id_name: &str, id: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "operation": operation,
        "responseCode": "IN_PROGRESS",
        "message": "Request accepted",
        "info": [{ "name": id_name, "value": id }],
        "requestId": format!("req-{id}")
    }))
}

fn domain(state: &str) -> Value {
    json!({
        "id": "nd-1",
        "name": "APITEST",
        "type": "ESSENTIALS",
        "state": state,
        "datacenterId": "NA9"
    })
}

fn server_json(started: bool, state: &str) -> Value {
    json!({
        "id": "srv-1",
        "name": "web01",
        "state": state,
        "started": started,
        "datacenterId": "NA9",
        "disk": [{ "id": "disk-1", "scsiId": 0, "sizeGb": 10, "speed": "STANDARD" }],
        "networkInfo": { "networkDomainId": "nd-1" }
    })
}

async fn posted_body(server: &MockServer, suffix: &str) -> Value {
    let requests = server.received_requests().await.unwrap();
    let request = requests
        .iter()
        .find(|r| r.method.as_str() == "POST" && r.url.path().ends_with(suffix))
        .unwrap();
    serde_json::from_slice(&request.body).unwrap()
}

async fn post_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .count()
}

// ── Network domains ─────────────────────────────────────────────────

#[tokio::test]
async fn create_network_domain_waits_for_normal() {
    let (server, session, sleeper) = setup().await;

    // Existence check sees nothing, then two pending polls, then NORMAL.
    Mock::given(method("GET"))
        .and(path(base("network/networkDomain")))
        .and(query_param("datacenterId", "NA9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalCount": 0 })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(base("network/networkDomain")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "networkDomain": [domain("PENDING_ADD")], "totalCount": 1 })),
        )
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(base("network/networkDomain")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "networkDomain": [domain("NORMAL")], "totalCount": 1 })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(base("network/deployNetworkDomain")))
        .and(body_partial_json(json!({
            "datacenterId": "NA9",
            "name": "APITEST",
            "type": "ESSENTIALS"
        })))
        .respond_with(accepted("DEPLOY_NETWORK_DOMAIN", "networkDomainId", "nd-1"))
        .expect(1)
        .mount(&server)
        .await;

    let req = CreateNetworkDomain {
        datacenter_id: "NA9".into(),
        name: "APITEST".into(),
        description: None,
        domain_type: NetworkDomainType::Essentials,
    };
    let applied = session
        .create_network_domain(&req, Some(&WaitPolicy::default()))
        .await
        .unwrap();

    assert!(applied.changed);
    assert_eq!(applied.request_id.as_deref(), Some("req-nd-1"));
    assert_eq!(applied.resource.state, ResourceState::Normal);
    assert_eq!(sleeper.calls(), vec![Duration::from_secs(10); 2]);

    let listed = session
        .list_network_domains(&NetworkDomainFilter {
            datacenter_id: Some("NA9".into()),
            ..NetworkDomainFilter::default()
        })
        .await
        .unwrap();
    assert!(
        listed
            .iter()
            .any(|d| d.name == "APITEST" && d.state == ResourceState::Normal)
    );
}

#[tokio::test]
async fn create_network_domain_returns_existing_unchanged() {
    let (server, session, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(base("network/networkDomain")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "networkDomain": [domain("NORMAL")], "totalCount": 1 })),
        )
        .mount(&server)
        .await;

    let req = CreateNetworkDomain {
        datacenter_id: "NA9".into(),
        name: "APITEST".into(),
        description: None,
        domain_type: NetworkDomainType::Essentials,
    };
    let applied = session.create_network_domain(&req, None).await.unwrap();

    assert!(!applied.changed);
    assert_eq!(applied.resource.id, "nd-1");
    assert_eq!(post_count(&server).await, 0);
}

// ── VLANs ───────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_vlan_polls_until_absent() {
    let (server, session, sleeper) = setup().await;
    let vlan = json!({
        "id": "v-1",
        "name": "web",
        "state": "NORMAL",
        "networkDomain": { "id": "nd-1", "name": "APITEST" }
    });

    Mock::given(method("GET"))
        .and(path(base("network/vlan/v-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(vlan.clone()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(base("network/deleteVlan")))
        .and(body_partial_json(json!({ "id": "v-1" })))
        .respond_with(accepted("DELETE_VLAN", "vlanId", "v-1"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(base("network/vlan")))
        .and(query_param("networkDomainId", "nd-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "vlan": [{
                "id": "v-1", "name": "web", "state": "PENDING_DELETE",
                "networkDomain": { "id": "nd-1" }
            }],
            "totalCount": 1
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(base("network/vlan")))
        .and(query_param("networkDomainId", "nd-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalCount": 0 })))
        .mount(&server)
        .await;

    let applied = session
        .delete_vlan("v-1", Some(&WaitPolicy::default()))
        .await
        .unwrap();

    assert!(applied.changed);
    assert_eq!(applied.resource.unwrap().name, "web");
    assert_eq!(sleeper.calls().len(), 1);
}

#[tokio::test]
async fn delete_of_absent_vlan_is_unchanged() {
    let (server, session, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(base("network/vlan/v-9")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "operation": "GET_VLAN",
            "responseCode": "RESOURCE_NOT_FOUND",
            "message": "VLAN v-9 not found"
        })))
        .mount(&server)
        .await;

    let applied = session.delete_vlan("v-9", None).await.unwrap();
    assert!(!applied.changed);
    assert!(applied.resource.is_none());
    assert_eq!(post_count(&server).await, 0);
}

#[tokio::test]
async fn duplicate_names_are_rejected_under_strict_policy() {
    let (server, session, _) = setup().await;
    let session = session.with_name_policy(DuplicateNamePolicy::Reject);

    Mock::given(method("GET"))
        .and(path(base("network/vlan")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "vlan": [
                { "id": "v-1", "name": "web", "state": "NORMAL" },
                { "id": "v-2", "name": "web", "state": "NORMAL" }
            ],
            "totalCount": 2
        })))
        .mount(&server)
        .await;

    let err = session.find_vlan("nd-1", "web").await.unwrap_err();
    assert!(matches!(err, CoreError::AmbiguousReference { count: 2, .. }));

    let lenient = session.with_name_policy(DuplicateNamePolicy::FirstMatch);
    let first = lenient.find_vlan("nd-1", "web").await.unwrap().unwrap();
    assert_eq!(first.id, "v-1");
}

// ── Firewall ────────────────────────────────────────────────────────

#[tokio::test]
async fn any_source_port_omits_the_port_clause() {
    let (server, session, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(base("network/firewallRule")))
        .and(query_param("networkDomainId", "nd-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalCount": 0 })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(base("network/createFirewallRule")))
        .respond_with(accepted("CREATE_FIREWALL_RULE", "firewallRuleId", "fw-1"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(base("network/firewallRule/fw-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "fw-1", "name": "allow-https", "state": "NORMAL", "enabled": true
        })))
        .mount(&server)
        .await;

    let source = EndpointSpec::from_parts(
        "source",
        Some("ANY".into()),
        None,
        None,
        Some("ANY".parse::<PortSpec>().unwrap()),
        None,
    )
    .unwrap();
    let destination = EndpointSpec::from_parts(
        "destination",
        Some("10.0.0.10".into()),
        None,
        None,
        Some("443".parse::<PortSpec>().unwrap()),
        None,
    )
    .unwrap();
    let req = CreateFirewallRule::new("nd-1", "allow-https", source, destination);

    let applied = session.create_firewall_rule(&req).await.unwrap();
    assert_eq!(applied.resource.id, "fw-1");

    let body = posted_body(&server, "network/createFirewallRule").await;
    assert_eq!(body["source"], json!({ "ip": { "address": "ANY" } }));
    assert_eq!(body["destination"]["port"], json!({ "begin": 443 }));
    assert_eq!(body["action"], "ACCEPT_DECISIVELY");
    assert_eq!(body["placement"], json!({ "position": "LAST" }));
}

#[tokio::test]
async fn missing_port_list_names_the_reference() {
    let (server, session, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(base("network/firewallRule")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalCount": 0 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(base("network/portList")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalCount": 0 })))
        .mount(&server)
        .await;

    let source = EndpointSpec::from_parts(
        "source",
        Some("ANY".into()),
        None,
        None,
        Some(PortSpec::Any),
        None,
    )
    .unwrap();
    let destination = EndpointSpec::from_parts(
        "destination",
        Some("10.0.0.10".into()),
        None,
        None,
        None,
        Some("web-ports".into()),
    )
    .unwrap();
    let req = CreateFirewallRule::new("nd-1", "allow-web", source, destination);

    let err = session.create_firewall_rule(&req).await.unwrap_err();
    match err {
        CoreError::ReferenceResolution {
            kind, reference, ..
        } => {
            assert_eq!(kind, "port list");
            assert_eq!(reference, "web-ports");
        }
        other => panic!("expected reference failure, got {other:?}"),
    }
    assert_eq!(post_count(&server).await, 0);
}

#[tokio::test]
async fn reversed_port_range_is_refused_before_any_request() {
    let (server, session, _) = setup().await;

    let source = EndpointSpec::from_parts(
        "source",
        Some("ANY".into()),
        None,
        None,
        Some(PortSpec::Any),
        None,
    )
    .unwrap();
    // Built directly, so the parser's range check never ran.
    let destination = EndpointSpec {
        port: PortMatch::Ports(PortSpec::Range(PortRange {
            begin: 100,
            end: Some(50),
        })),
        ..EndpointSpec::from_parts(
            "destination",
            Some("10.0.0.1".into()),
            None,
            None,
            Some(PortSpec::Any),
            None,
        )
        .unwrap()
    };
    let req = CreateFirewallRule::new("nd-1", "reversed", source, destination.clone());

    let err = session.create_firewall_rule(&req).await.unwrap_err();
    assert!(
        matches!(&err, CoreError::Validation { message } if message.starts_with("destination:")),
        "expected validation failure, got {err:?}"
    );

    let update = UpdateFirewallRule {
        destination: Some(destination),
        ..UpdateFirewallRule::default()
    };
    let err = session.update_firewall_rule("fw-1", &update).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }), "got {err:?}");

    // Only the identity lookup made during connect reached the provider.
    let requests = server.received_requests().await.unwrap();
    assert!(
        requests.iter().all(|r| r.url.path().ends_with("user/myUser")),
        "unexpected requests: {:?}",
        requests.iter().map(|r| r.url.path().to_owned()).collect::<Vec<_>>()
    );
    assert_eq!(post_count(&server).await, 0);
}

// ── Port lists ──────────────────────────────────────────────────────

#[tokio::test]
async fn child_cycle_is_refused_before_submission() {
    let (server, session, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(base("network/portList/pl-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pl-1", "name": "web", "state": "NORMAL", "port": [{ "begin": 80 }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(base("network/portList/pl-2")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pl-2", "name": "outer", "state": "NORMAL",
            "port": [{ "begin": 443 }],
            "childPortList": [{ "id": "pl-1", "name": "web" }]
        })))
        .mount(&server)
        .await;

    let req = UpdatePortList {
        children: Some(ListChange::Replace(vec!["pl-2".into()])),
        ..UpdatePortList::default()
    };
    let err = session.update_port_list("pl-1", &req).await.unwrap_err();

    assert!(matches!(err, CoreError::Validation { .. }));
    assert_eq!(post_count(&server).await, 0);
}

// ── Servers ─────────────────────────────────────────────────────────

#[tokio::test]
async fn customized_deploy_resolves_vlan_and_generates_password() {
    let (server, session, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(base("server/server")))
        .and(query_param("networkDomainId", "nd-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalCount": 0 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(base("network/vlan")))
        .and(query_param("networkDomainId", "nd-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "vlan": [{ "id": "v-1", "name": "web", "state": "NORMAL" }],
            "totalCount": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(base("server/deployServer")))
        .respond_with(accepted("DEPLOY_SERVER", "serverId", "srv-1"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(base("server/server/srv-1")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(server_json(false, "PENDING_ADD")),
        )
        .mount(&server)
        .await;

    let req = CreateServer {
        name: "web01".into(),
        description: None,
        image_id: "img-1".into(),
        network_domain_id: "nd-1".into(),
        primary_nic: NicRequest {
            placement: NicPlacement::VlanName("web".into()),
            network_adapter: None,
        },
        additional_nics: Vec::new(),
        disks: Vec::new(),
        cpu_count: Some(2),
        cores_per_socket: None,
        cpu_speed: None,
        memory_gb: Some(4),
        primary_dns: None,
        secondary_dns: None,
        ipv4_gateway: None,
        ipv6_gateway: None,
        start: true,
        customize: true,
        administrator_password: None,
    };
    let applied = session.create_server(&req, None).await.unwrap();

    assert!(applied.changed);
    assert!(applied.resource.administrator_password.is_some());

    let body = posted_body(&server, "server/deployServer").await;
    assert_eq!(body["networkInfo"]["primaryNic"], json!({ "vlanId": "v-1" }));
    assert_eq!(body["cpu"], json!({ "count": 2 }));
    let password = body["administratorPassword"].as_str().unwrap();
    assert!((12..=19).contains(&password.len()));
}

#[tokio::test]
async fn running_server_cannot_be_reconfigured() {
    let (server, session, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(base("server/server/srv-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(server_json(true, "NORMAL")))
        .mount(&server)
        .await;

    let req = UpdateServer {
        memory_gb: Some(8),
        ..UpdateServer::default()
    };
    let err = session.update_server("srv-1", &req, None).await.unwrap_err();

    assert!(matches!(err, CoreError::Validation { .. }));
    assert_eq!(post_count(&server).await, 0);
}

#[tokio::test]
async fn stop_waits_for_started_flag_with_capped_interval() {
    let (server, session, sleeper) = setup().await;

    Mock::given(method("GET"))
        .and(path(base("server/server/srv-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(server_json(true, "NORMAL")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(base("server/shutdownServer")))
        .respond_with(accepted("SHUTDOWN_SERVER", "serverId", "srv-1"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(base("server/server")))
        .and(query_param("networkDomainId", "nd-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "server": [server_json(true, "PENDING_CHANGE")],
            "totalCount": 1
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(base("server/server")))
        .and(query_param("networkDomainId", "nd-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "server": [server_json(false, "NORMAL")],
            "totalCount": 1
        })))
        .mount(&server)
        .await;

    let applied = session
        .power("srv-1", PowerAction::Stop, Some(&WaitPolicy::server()))
        .await
        .unwrap();

    assert!(applied.changed);
    assert!(!applied.resource.started);
    assert_eq!(sleeper.calls(), vec![Duration::from_secs(15)]);
}

#[tokio::test]
async fn stop_of_stopped_server_is_unchanged() {
    let (server, session, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(base("server/server/srv-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(server_json(false, "NORMAL")))
        .mount(&server)
        .await;

    let applied = session
        .power("srv-1", PowerAction::Stop, None)
        .await
        .unwrap();
    assert!(!applied.changed);
    assert_eq!(post_count(&server).await, 0);
}

#[tokio::test]
async fn expand_disk_requires_a_larger_size() {
    let (server, session, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(base("server/server/srv-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(server_json(false, "NORMAL")))
        .mount(&server)
        .await;

    let err = session
        .expand_disk("srv-1", "disk-1", 10, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));

    let err = session
        .expand_disk("srv-1", "disk-9", 50, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
    assert_eq!(post_count(&server).await, 0);
}

// ── IPAM ────────────────────────────────────────────────────────────

#[tokio::test]
async fn reservation_echoing_another_address_is_rejected() {
    let (server, session, _) = setup().await;

    Mock::given(method("GET"))
        .and(path(base("network/reservedPrivateIpv4Address")))
        .and(query_param("vlanId", "v-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalCount": 0 })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(base("network/reservePrivateIpv4Address")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "operation": "RESERVE_PRIVATE_IPV4_ADDRESS",
            "responseCode": "OK",
            "message": "Private IPv4 address reserved",
            "info": [{ "name": "ipAddress", "value": "10.0.0.11" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let req = ReserveIp {
        vlan_id: "v-1".into(),
        ip_address: "10.0.0.10".into(),
        version: IpVersion::Ipv4,
        description: None,
    };
    let err = session.reserve_ip(&req).await.unwrap_err();
    match err {
        CoreError::ProviderRejected {
            operation,
            response_code,
            message,
        } => {
            assert_eq!(operation, "RESERVE_PRIVATE_IPV4_ADDRESS");
            assert_eq!(response_code, "OK");
            assert!(message.contains("10.0.0.11"), "{message}");
        }
        other => panic!("expected a provider rejection, got {other:?}"),
    }
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_identity_lookup_is_a_bootstrap_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/caas/2.8/user/myUser"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "responseCode": "AUTHENTICATION_FAILED",
            "message": "Invalid credentials"
        })))
        .mount(&server)
        .await;

    let mut config = SessionConfig::new("na", "alice", SecretString::from("nope".to_owned()));
    config.base_url = Some(Url::parse(&server.uri()).unwrap());

    match Session::connect(config).await {
        Err(CoreError::SessionBootstrap { user, reason }) => {
            assert_eq!(user, "alice");
            assert!(reason.contains("Invalid credentials"));
        }
        Err(other) => panic!("expected bootstrap failure, got {other:?}"),
        Ok(_) => panic!("expected bootstrap failure"),
    }
}
