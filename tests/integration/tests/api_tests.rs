//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, fixtures::*, TestServer, TestUser,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

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

async fn post_message(
    server: &TestServer,
    author: &TestUser,
    request: &CreateMessageRequest,
) -> MessageResponse {
    let response = server
        .post_auth("/api/messages", &author.token, request)
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn list_messages(server: &TestServer, user: &TestUser, query: &str) -> Vec<MessageResponse> {
    let response = server
        .get_auth(&format!("/api/messages?{query}"), &user.token)
        .await
        .unwrap();
    let list: MessageListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    list.messages
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/messages?channelId=1").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .get_auth("/api/messages?channelId=1", "not-a-jwt")
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "UNAUTHORIZED");
}

// ============================================================================
// Channel Tests
// ============================================================================

#[tokio::test]
async fn test_general_channel_is_listed() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/channels").await.unwrap();
    let list: ChannelListResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(list
        .channels
        .iter()
        .any(|c| c.name == "General" && c.privacy == "public"));
}

#[tokio::test]
async fn test_creator_becomes_admin() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.create_user("owner").await.unwrap();
    let channel = create_channel(&server, &owner, &CreateChannelRequest::public()).await;

    assert_eq!(channel.member_count, 1);
    assert_eq!(channel.creator_id, Some(owner.id.to_string()));

    let response = server
        .get_auth(&format!("/api/channels/{}", channel.id), &owner.token)
        .await
        .unwrap();
    let detail: ChannelDetailResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(detail.is_member);
    assert_eq!(detail.user_role.as_deref(), Some("admin"));
}

#[tokio::test]
async fn test_duplicate_channel_name_conflicts() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.create_user("owner").await.unwrap();
    let request = CreateChannelRequest::public();
    create_channel(&server, &owner, &request).await;

    let response = server
        .post_auth("/api/channels", &owner.token, &request)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "CHANNEL_NAME_TAKEN");
}

#[tokio::test]
async fn test_private_channel_is_hidden_from_outsiders() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.create_user("owner").await.unwrap();
    let outsider = server.create_user("outsider").await.unwrap();
    let channel = create_channel(&server, &owner, &CreateChannelRequest::private()).await;

    // Not in the outsider's list
    let response = server.get_auth("/api/channels", &outsider.token).await.unwrap();
    let list: ChannelListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(list.channels.iter().all(|c| c.id != channel.id));

    // Reported exactly like a channel that does not exist
    let response = server
        .get_auth(&format!("/api/channels/{}", channel.id), &outsider.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_CHANNEL");

    let response = server
        .get_auth(&format!("/api/messages?channelId={}", channel.id), &outsider.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_CHANNEL");

    // And it cannot be self-joined
    let response = server
        .post_auth(
            &format!("/api/channels/{}/join", channel.id),
            &outsider.token,
            &json!({}),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "CHANNEL_NOT_JOINABLE");

    // The owner still sees it
    let response = server.get_auth("/api/channels", &owner.token).await.unwrap();
    let list: ChannelListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(list.channels.iter().any(|c| c.id == channel.id));
}

#[tokio::test]
async fn test_join_and_leave_public_channel() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.create_user("owner").await.unwrap();
    let member = server.create_user("member").await.unwrap();
    let channel = create_channel(&server, &owner, &CreateChannelRequest::public()).await;
    let join_path = format!("/api/channels/{}/join", channel.id);

    let response = server
        .post_auth(&join_path, &member.token, &json!({}))
        .await
        .unwrap();
    let membership: MembershipResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(membership.role, "member");
    assert_eq!(membership.user_id, member.id.to_string());

    let response = server
        .post_auth(&join_path, &member.token, &json!({}))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "ALREADY_MEMBER");

    let response = server
        .delete_auth(&format!("/api/channels/{}/leave", channel.id), &member.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_admin_cannot_leave() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.create_user("owner").await.unwrap();
    let channel = create_channel(&server, &owner, &CreateChannelRequest::public()).await;

    let response = server
        .delete_auth(&format!("/api/channels/{}/leave", channel.id), &owner.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "ADMIN_CANNOT_LEAVE");
}

#[tokio::test]
async fn test_only_admin_can_delete_channel() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.create_user("owner").await.unwrap();
    let member = server.create_user("member").await.unwrap();
    let channel = create_channel(&server, &owner, &CreateChannelRequest::public()).await;
    let path = format!("/api/channels/{}", channel.id);

    server
        .post_auth(&format!("{path}/join"), &member.token, &json!({}))
        .await
        .unwrap();

    let response = server.delete_auth(&path, &member.token).await.unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "FORBIDDEN");

    let response = server.delete_auth(&path, &owner.token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_auth(&path, &owner.token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_moderator_promotion_and_removal() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.create_user("owner").await.unwrap();
    let moderator = server.create_user("mod").await.unwrap();
    let member = server.create_user("member").await.unwrap();
    let channel = create_channel(&server, &owner, &CreateChannelRequest::public()).await;
    let base = format!("/api/channels/{}", channel.id);

    for user in [&moderator, &member] {
        server
            .post_auth(&format!("{base}/join"), &user.token, &json!({}))
            .await
            .unwrap();
    }

    let response = server
        .put_auth(
            &format!("{base}/members/{}", moderator.id),
            &owner.token,
            &json!({ "role": "moderator" }),
        )
        .await
        .unwrap();
    let membership: MembershipResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(membership.role, "moderator");

    // Moderators cannot touch admins
    let response = server
        .delete_auth(&format!("{base}/members/{}", owner.id), &moderator.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "ADMIN_IMMUNE");

    // But can remove plain members
    let response = server
        .delete_auth(&format!("{base}/members/{}", member.id), &moderator.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Message Tests
// ============================================================================

#[tokio::test]
async fn test_non_member_can_read_and_write_public_channel() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.create_user("owner").await.unwrap();
    let visitor = server.create_user("visitor").await.unwrap();
    let channel = create_channel(&server, &owner, &CreateChannelRequest::public()).await;

    let message = post_message(
        &server,
        &visitor,
        &CreateMessageRequest::simple(&channel.id, "  jacking in  "),
    )
    .await;
    assert_eq!(message.content, "jacking in");
    assert_eq!(message.message_type, "chat");
    assert_eq!(message.username, visitor.username);

    let messages = list_messages(&server, &visitor, &format!("channelId={}", channel.id)).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, message.id);
}

#[tokio::test]
async fn test_message_content_limits() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.create_user("owner").await.unwrap();
    let channel = create_channel(&server, &owner, &CreateChannelRequest::public()).await;

    let response = server
        .post_auth(
            "/api/messages",
            &owner.token,
            &CreateMessageRequest::simple(&channel.id, &"a".repeat(1001)),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_FAILED");

    let response = server
        .post_auth(
            "/api/messages",
            &owner.token,
            &CreateMessageRequest::simple(&channel.id, "   "),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    post_message(
        &server,
        &owner,
        &CreateMessageRequest::simple(&channel.id, &"a".repeat(1000)),
    )
    .await;
}

#[tokio::test]
async fn test_messages_are_ordered_and_paged_by_since_id() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.create_user("owner").await.unwrap();
    let channel = create_channel(&server, &owner, &CreateChannelRequest::public()).await;

    let mut posted = Vec::new();
    for i in 0..5 {
        let message = post_message(
            &server,
            &owner,
            &CreateMessageRequest::simple(&channel.id, &format!("message {i}")),
        )
        .await;
        posted.push(message.id);
    }

    let all = list_messages(&server, &owner, &format!("channelId={}", channel.id)).await;
    let ids: Vec<_> = all.iter().map(|m| m.id.clone()).collect();
    assert_eq!(ids, posted);

    let after = list_messages(
        &server,
        &owner,
        &format!("channelId={}&sinceId={}&limit=2", channel.id, posted[1]),
    )
    .await;
    let ids: Vec<_> = after.iter().map(|m| m.id.clone()).collect();
    assert_eq!(ids, posted[2..4].to_vec());

    let latest = list_messages(&server, &owner, &format!("channelId={}&limit=2", channel.id)).await;
    let ids: Vec<_> = latest.iter().map(|m| m.id.clone()).collect();
    assert_eq!(ids, posted[3..].to_vec());
}

#[tokio::test]
async fn test_unknown_since_id_is_not_found() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.create_user("owner").await.unwrap();
    let channel = create_channel(&server, &owner, &CreateChannelRequest::public()).await;
    post_message(&server, &owner, &CreateMessageRequest::simple(&channel.id, "first")).await;

    let response = server
        .get_auth(
            &format!("/api/messages?channelId={}&sinceId=1", channel.id),
            &owner.token,
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_MESSAGE");
}

#[tokio::test]
async fn test_missing_channel_id_is_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user = server.create_user("user").await.unwrap();

    let response = server.get_auth("/api/messages", &user.token).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_replies_assemble_into_threads() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.create_user("owner").await.unwrap();
    let channel = create_channel(&server, &owner, &CreateChannelRequest::public()).await;

    let root = post_message(&server, &owner, &CreateMessageRequest::simple(&channel.id, "root")).await;
    let reply = post_message(
        &server,
        &owner,
        &CreateMessageRequest::reply(&channel.id, "reply", &root.id),
    )
    .await;
    assert_eq!(reply.parent_id.as_deref(), Some(root.id.as_str()));

    let response = server
        .get_auth(
            &format!("/api/messages/thread?channelId={}", channel.id),
            &owner.token,
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    let threads = body["threads"].as_array().unwrap();

    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0]["id"], root.id);
    assert_eq!(threads[0]["replies"][0]["id"], reply.id);
}

#[tokio::test]
async fn test_slash_commands() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.create_user("owner").await.unwrap();
    let channel = create_channel(&server, &owner, &CreateChannelRequest::public()).await;

    let action = post_message(
        &server,
        &owner,
        &CreateMessageRequest::simple(&channel.id, "/me hacks the mainframe"),
    )
    .await;
    assert_eq!(action.message_type, "action");
    assert_eq!(action.content, "hacks the mainframe");

    let roll = post_message(
        &server,
        &owner,
        &CreateMessageRequest::simple(&channel.id, "/roll 2d6"),
    )
    .await;
    assert_eq!(roll.message_type, "dice_roll");
    assert!(roll.content.starts_with("2d6 = "));
}

// ============================================================================
// Reaction Tests
// ============================================================================

#[tokio::test]
async fn test_reaction_toggle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.create_user("owner").await.unwrap();
    let fan = server.create_user("fan").await.unwrap();
    let channel = create_channel(&server, &owner, &CreateChannelRequest::public()).await;
    let message = post_message(&server, &owner, &CreateMessageRequest::simple(&channel.id, "hi")).await;
    let path = format!("/api/messages/{}/reactions", message.id);

    let response = server
        .post_auth(&path, &fan.token, &ToggleReactionRequest::new("⚡"))
        .await
        .unwrap();
    let toggled: ReactionToggleResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(toggled.added);
    assert_eq!(toggled.count, 1);

    let messages = list_messages(&server, &owner, &format!("channelId={}", channel.id)).await;
    assert_eq!(messages[0].reactions.len(), 1);
    assert_eq!(messages[0].reactions[0].reaction_type, "⚡");

    let response = server
        .post_auth(&path, &fan.token, &ToggleReactionRequest::new("⚡"))
        .await
        .unwrap();
    let toggled: ReactionToggleResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!toggled.added);
    assert_eq!(toggled.count, 0);

    let response = server
        .post_auth(&path, &fan.token, &ToggleReactionRequest::new("👍"))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_REACTION_TYPE");
}
