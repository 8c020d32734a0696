//! HTTP contract tests for the GraphQL transport and repository.
//!
//! Each test runs against a local mock server and checks the request shape
//! the backend sees and how its responses are decoded.

use serde_json::json;
use std::time::Duration;
use taskroster_core::{
    ClientConfig, ErrorPolicy, GraphQlRepository, HttpSyncController, HttpTransport,
    LoadOutcome, Person, PersonRepository, RepoError, SyncError, Task, TaskRepository,
    TransportError,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        endpoint: format!("{}/graphql", server.uri()),
        application_id: "test-app".into(),
        ..Default::default()
    }
}

fn repository(server: &MockServer) -> GraphQlRepository<HttpTransport> {
    let config = config_for(server);
    GraphQlRepository::from_config(HttpTransport::new(&config).unwrap(), &config)
}

fn people_body() -> serde_json::Value {
    json!({
        "data": {
            "people": {
                "edges": [
                    {"node": {"id": "p2", "name": "Grace"}},
                    {"node": {"id": "p1", "name": "Ada"}}
                ]
            }
        }
    })
}

#[tokio::test]
async fn people_query_carries_application_header_and_keeps_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("X-Parse-Application-Id", "test-app"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({"operationName": "getPeople"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(people_body()))
        .expect(1)
        .mount(&server)
        .await;

    let people = repository(&server).list_people().await.unwrap();
    assert_eq!(
        people,
        vec![Person::new("p2", "Grace"), Person::new("p1", "Ada")]
    );
}

#[tokio::test]
async fn tasks_query_filters_by_person_variable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "getTasks",
            "variables": {"personId": "p1"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "tasks": {
                    "count": 1,
                    "edges": [{"node": {"id": "t1", "name": "Buy milk"}}]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let list = repository(&server).list_tasks("p1").await.unwrap();
    assert_eq!(list.person_id, "p1");
    assert_eq!(list.count, Some(1));
    assert_eq!(list.items, vec![Task::new("t1", "Buy milk")]);
}

#[tokio::test]
async fn create_task_links_the_person_and_returns_the_new_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "createTask",
            "variables": {"name": "Buy milk", "personId": "p1"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"createTask": {"task": {"id": "t7"}}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = repository(&server)
        .create_task("p1", "Buy milk")
        .await
        .unwrap();
    assert_eq!(id, "t7");
}

#[tokio::test]
async fn delete_mutations_use_their_id_variables() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "deletePerson",
            "variables": {"personId": "p1"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"deletePerson": {"person": {"id": "p1"}}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "deleteTask",
            "variables": {"taskId": "t1"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"deleteTask": {"task": {"id": "t1"}}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repo = repository(&server);
    assert_eq!(repo.delete_person("p1").await.unwrap(), "p1");
    assert_eq!(repo.delete_task("t1").await.unwrap(), "t1");
}

#[tokio::test]
async fn partial_query_errors_are_tolerated_by_default() {
    let server = MockServer::start().await;
    let mut body = people_body();
    body["errors"] = json!([{"message": "one edge was hidden", "path": ["people"]}]);
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let people = repository(&server).list_people().await.unwrap();
    assert_eq!(people.len(), 2);
}

#[tokio::test]
async fn partial_query_errors_fail_under_strict_policy() {
    let server = MockServer::start().await;
    let mut body = people_body();
    body["errors"] = json!([{"message": "one edge was hidden"}]);
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let repo = GraphQlRepository::with_policies(
        HttpTransport::new(&config).unwrap(),
        ErrorPolicy::None,
        ErrorPolicy::None,
    );
    let err = repo.list_people().await.unwrap_err();
    assert!(matches!(err, RepoError::GraphQl(ref errors) if errors.len() == 1));
}

#[tokio::test]
async fn mutation_errors_fail_even_with_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"updatePerson": null},
            "errors": [{"message": "Object not found.", "path": ["updatePerson"]}]
        })))
        .mount(&server)
        .await;

    let err = repository(&server)
        .update_person("missing", "Name")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "GraphQL error: Object not found. (at updatePerson)"
    );
}

#[tokio::test]
async fn null_root_field_is_missing_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"people": null}})))
        .mount(&server)
        .await;

    let err = repository(&server).list_people().await.unwrap_err();
    assert!(matches!(err, RepoError::MissingData("people")));
}

#[tokio::test]
async fn graphql_envelope_on_error_status_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{"message": "Syntax Error: Unexpected Name"}]
        })))
        .mount(&server)
        .await;

    let err = repository(&server).list_people().await.unwrap_err();
    assert!(matches!(err, RepoError::GraphQl(_)));
}

#[tokio::test]
async fn non_graphql_error_status_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = repository(&server).list_people().await.unwrap_err();
    match err {
        RepoError::Transport(TransportError::Status { status, body }) => {
            assert_eq!(status, 502);
            assert_eq!(body, "bad gateway");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = repository(&server).list_people().await.unwrap_err();
    assert!(matches!(err, RepoError::Transport(TransportError::Decode(_))));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(people_body())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig {
        timeout_seconds: 1,
        ..config_for(&server)
    };
    let repo = GraphQlRepository::from_config(HttpTransport::new(&config).unwrap(), &config);
    let err = repo.list_people().await.unwrap_err();
    assert!(matches!(err, RepoError::Transport(TransportError::Timeout(_))));
}

#[tokio::test]
async fn controller_reloads_people_once_after_create() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "createPerson",
            "variables": {"name": "Alice"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"createPerson": {"person": {"id": "p3"}}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"operationName": "getPeople"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"people": {"edges": [{"node": {"id": "p3", "name": "Alice"}}]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let controller = HttpSyncController::connect(&config_for(&server)).unwrap();
    let outcome = controller.create_person("Alice").await.unwrap();

    assert_eq!(outcome.id, "p3");
    assert_eq!(outcome.reload, LoadOutcome::Applied { count: 1 });
    assert_eq!(controller.people(), vec![Person::new("p3", "Alice")]);
}

#[tokio::test]
async fn controller_failed_mutation_skips_reload_and_keeps_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"operationName": "createPerson"})))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"operationName": "getPeople"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(people_body()))
        .expect(0)
        .mount(&server)
        .await;

    let controller = HttpSyncController::connect(&config_for(&server)).unwrap();
    let mut failures = controller.subscribe();
    let err = controller.create_person("Alice").await.unwrap_err();

    assert!(matches!(err, SyncError::Repo { .. }));
    assert!(controller.people().is_empty());
    assert_eq!(failures.try_recv().unwrap().code, "bad_status");
}

#[tokio::test]
async fn blank_name_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(people_body()))
        .expect(0)
        .mount(&server)
        .await;

    let controller = HttpSyncController::connect(&config_for(&server)).unwrap();
    let err = controller.create_person("  ").await.unwrap_err();
    assert!(err.is_rejected_before_dispatch());
}
