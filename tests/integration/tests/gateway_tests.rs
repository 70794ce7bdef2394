//! Gateway Integration Tests
//!
//! These tests start both the API server and the gateway against the same
//! PostgreSQL and Redis, then drive the gateway over a real WebSocket.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::time::Duration;

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestGateway, TestServer, TestUser,
};
use reqwest::StatusCode;
use serde_json::json;

async fn start_both() -> (TestServer, TestGateway) {
    let server = TestServer::start().await.expect("Failed to start API server");
    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    (server, gateway)
}

async fn create_channel(
    server: &TestServer,
    owner: &TestUser,
    request: &CreateChannelRequest,
) -> ChannelResponse {
    let response = server
        .post_auth("/api/channels", &owner.token, request)
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

#[tokio::test]
async fn test_identify_returns_ready() {
    if !check_test_env().await {
        return;
    }

    let (server, gateway) = start_both().await;
    let user = server.create_user("netrunner").await.unwrap();

    let mut client = gateway.connect().await.unwrap();
    let ready = client.identify(&user.token).await.unwrap();

    assert_eq!(ready["d"]["v"], 1);
    assert_eq!(ready["d"]["user"]["id"], user.id.to_string());
    assert_eq!(ready["d"]["user"]["username"], user.username);
    assert!(ready["d"]["session_id"].is_string());
    assert!(ready["s"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_heartbeat_is_acknowledged() {
    if !check_test_env().await {
        return;
    }

    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let mut client = gateway.connect().await.unwrap();

    client.send(json!({ "op": 1, "d": null })).await.unwrap();
    let ack = client.recv().await.unwrap();
    assert_eq!(ack["op"], 11);
}

#[tokio::test]
async fn test_bad_token_closes_with_authentication_failed() {
    if !check_test_env().await {
        return;
    }

    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let mut client = gateway.connect().await.unwrap();

    client
        .send(json!({ "op": 2, "d": { "token": "not-a-jwt" } }))
        .await
        .unwrap();
    assert_eq!(client.recv_close_code().await.unwrap(), Some(4004));
}

#[tokio::test]
async fn test_subscribe_before_identify_is_rejected() {
    if !check_test_env().await {
        return;
    }

    let gateway = TestGateway::start().await.expect("Failed to start gateway");
    let mut client = gateway.connect().await.unwrap();

    client
        .send(json!({ "op": 3, "d": { "channel_id": "1" } }))
        .await
        .unwrap();
    assert_eq!(client.recv_close_code().await.unwrap(), Some(4003));
}

#[tokio::test]
async fn test_hidden_channel_subscription_is_refused() {
    if !check_test_env().await {
        return;
    }

    let (server, gateway) = start_both().await;
    let owner = server.create_user("owner").await.unwrap();
    let outsider = server.create_user("outsider").await.unwrap();
    let channel = create_channel(&server, &owner, &CreateChannelRequest::private()).await;

    let mut client = gateway.connect().await.unwrap();
    client.identify(&outsider.token).await.unwrap();
    client
        .send(json!({ "op": 3, "d": { "channel_id": channel.id } }))
        .await
        .unwrap();

    let refused = client.recv_dispatch("UNSUBSCRIBED").await.unwrap();
    assert_eq!(refused["d"]["channel_id"], channel.id);
    assert_eq!(refused["d"]["reason"], "UNKNOWN_CHANNEL");
}

#[tokio::test]
async fn test_subscriber_receives_new_messages() {
    if !check_test_env().await {
        return;
    }

    let (server, gateway) = start_both().await;
    let owner = server.create_user("owner").await.unwrap();
    let listener = server.create_user("listener").await.unwrap();
    let channel = create_channel(&server, &owner, &CreateChannelRequest::public()).await;

    let mut client = gateway.connect().await.unwrap();
    client.identify(&listener.token).await.unwrap();
    client
        .send(json!({ "op": 3, "d": { "channel_id": channel.id } }))
        .await
        .unwrap();
    let subscribed = client.recv_dispatch("SUBSCRIBED").await.unwrap();
    assert_eq!(subscribed["d"]["channel_id"], channel.id);

    // The Redis topic subscription follows the hub asynchronously
    tokio::time::sleep(Duration::from_millis(300)).await;

    let response = server
        .post_auth(
            "/api/messages",
            &owner.token,
            &CreateMessageRequest::simple(&channel.id, "live wire"),
        )
        .await
        .unwrap();
    let posted: MessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let event = client.recv_dispatch("MESSAGE_CREATE").await.unwrap();
    assert_eq!(event["d"]["id"], posted.id);
    assert_eq!(event["d"]["content"], "live wire");
}

#[tokio::test]
async fn test_concurrent_writes_deliver_in_stored_order() {
    if !check_test_env().await {
        return;
    }

    let (server, gateway) = start_both().await;
    let owner = server.create_user("owner").await.unwrap();
    let channel = create_channel(&server, &owner, &CreateChannelRequest::public()).await;

    let mut client = gateway.connect().await.unwrap();
    client.identify(&owner.token).await.unwrap();
    client
        .send(json!({ "op": 3, "d": { "channel_id": channel.id } }))
        .await
        .unwrap();
    client.recv_dispatch("SUBSCRIBED").await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    let requests: Vec<_> = (0..12)
        .map(|i| CreateMessageRequest::simple(&channel.id, &format!("burst {i}")))
        .collect();
    let responses = futures_util::future::join_all(
        requests
            .iter()
            .map(|request| server.post_auth("/api/messages", &owner.token, request)),
    )
    .await;
    for response in responses {
        assert_status(response.unwrap(), StatusCode::CREATED).await.unwrap();
    }

    let mut delivered = Vec::new();
    for _ in 0..requests.len() {
        let event = client.recv_dispatch("MESSAGE_CREATE").await.unwrap();
        delivered.push(event["d"]["id"].as_str().unwrap().to_string());
    }

    let response = server
        .get_auth(&format!("/api/messages?channelId={}", channel.id), &owner.token)
        .await
        .unwrap();
    let stored: MessageListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    let stored: Vec<_> = stored.messages.into_iter().map(|m| m.id).collect();
    assert_eq!(stored, delivered);

    // Catching up from any delivered message yields exactly what followed it
    let anchor = &delivered[3];
    let response = server
        .get_auth(
            &format!("/api/messages?channelId={}&sinceId={anchor}", channel.id),
            &owner.token,
        )
        .await
        .unwrap();
    let after: MessageListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    let after: Vec<_> = after.messages.into_iter().map(|m| m.id).collect();
    assert_eq!(after, delivered[4..].to_vec());
}

#[tokio::test]
async fn test_unsubscribe_is_acknowledged() {
    if !check_test_env().await {
        return;
    }

    let (server, gateway) = start_both().await;
    let owner = server.create_user("owner").await.unwrap();
    let channel = create_channel(&server, &owner, &CreateChannelRequest::public()).await;

    let mut client = gateway.connect().await.unwrap();
    client.identify(&owner.token).await.unwrap();
    client
        .send(json!({ "op": 3, "d": { "channel_id": channel.id } }))
        .await
        .unwrap();
    client.recv_dispatch("SUBSCRIBED").await.unwrap();

    client
        .send(json!({ "op": 4, "d": { "channel_id": channel.id } }))
        .await
        .unwrap();
    let unsubscribed = client.recv_dispatch("UNSUBSCRIBED").await.unwrap();
    assert_eq!(unsubscribed["d"]["channel_id"], channel.id);
    assert!(unsubscribed["d"]["reason"].is_null());
}
