mod common;

use axum::http::StatusCode;
use fixtures::{test_state, MemoryStore};
use quill::routes::routes;

use common::{get, post_form, session_cookie};

const PASSWORD: &str = "a perfectly long password";

#[tokio::test]
async fn anonymous_visitor_sees_counts_but_no_follow_controls() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice", "alice@example.com", PASSWORD);
    let bob = store.seed_user("bob", "bob@example.com", PASSWORD);
    store.seed_post(&alice, "Morning pages", "Three of them, before coffee.");
    store.seed_post(&alice, "On drafts", "Every first draft is a rumor.");
    store.seed_follow(&bob, &alice);
    let app = routes(test_state(store));

    let (parts, body) = get(&app, "/profile/alice", None).await;

    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.contains("Posts: 2"));
    assert!(body.contains("Followers: 1"));
    assert!(body.contains("Following: 0"));
    assert!(body.contains("Morning pages"));
    // No session, so no follow/unfollow form is offered.
    assert!(!body.contains("action=\"/follow/"));
    assert!(!body.contains("action=\"/unfollow/"));
}

#[tokio::test]
async fn unknown_username_renders_not_found_on_every_profile_route() {
    let store = MemoryStore::new();
    store.seed_user("alice", "alice@example.com", PASSWORD);
    let app = routes(test_state(store));

    for uri in [
        "/profile/ghost",
        "/profile/ghost/followers",
        "/profile/ghost/following",
    ] {
        let (parts, body) = get(&app, uri, None).await;
        assert_eq!(parts.status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body.contains("Whoops, we cannot find that page."), "{uri}");
    }
}

#[tokio::test]
async fn own_profile_shows_no_follow_button() {
    let store = MemoryStore::new();
    store.seed_user("alice", "alice@example.com", PASSWORD);
    let app = routes(test_state(store));

    let (parts, _) = post_form(
        &app,
        "/login",
        &format!("username=alice&password={}", PASSWORD.replace(' ', "+")),
        None,
    )
    .await;
    let cookie = session_cookie(&parts);

    let (parts, body) = get(&app, "/profile/alice", Some(&cookie)).await;

    assert_eq!(parts.status, StatusCode::OK);
    assert!(!body.contains("action=\"/follow/"));
    assert!(!body.contains("action=\"/unfollow/"));
}

#[tokio::test]
async fn followers_and_following_screens_list_profile_cards() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice", "alice@example.com", PASSWORD);
    let bob = store.seed_user("bob", "bob@example.com", PASSWORD);
    store.seed_follow(&bob, &alice);
    let app = routes(test_state(store));

    let (_, body) = get(&app, "/profile/alice/followers", None).await;
    assert!(body.contains("profile-card"));
    assert!(body.contains("bob"));

    let (_, body) = get(&app, "/profile/bob/following", None).await;
    assert!(body.contains("alice"));

    let (_, body) = get(&app, "/profile/alice/following", None).await;
    assert!(body.contains("Nobody here yet."));
}

#[tokio::test]
async fn backend_fault_degrades_to_not_found() {
    let store = MemoryStore::new();
    store.seed_user("alice", "alice@example.com", PASSWORD);
    store.poison();
    let app = routes(test_state(store));

    let (parts, body) = get(&app, "/profile/alice", None).await;

    assert_eq!(parts.status, StatusCode::NOT_FOUND);
    assert!(body.contains("Whoops, we cannot find that page."));
}

mod aggregation {
    use super::PASSWORD;
    use fixtures::{test_state, MemoryStore};
    use quill::auth::SessionUser;
    use quill::profile::shared_profile_data;
    use quill::store::UserRecord;

    fn session_user(record: &UserRecord) -> SessionUser {
        SessionUser::from(record)
    }

    #[tokio::test]
    async fn flags_are_false_without_a_session() {
        let store = MemoryStore::new();
        let alice = store.seed_user("alice", "alice@example.com", PASSWORD);
        let bob = store.seed_user("bob", "bob@example.com", PASSWORD);
        store.seed_follow(&bob, &alice);
        let state = test_state(store);

        let ctx = shared_profile_data(&state, &alice, None).await.unwrap();

        assert!(!ctx.is_visitors_profile);
        assert!(!ctx.is_following);
    }

    #[tokio::test]
    async fn own_profile_sets_the_visitor_flag() {
        let store = MemoryStore::new();
        let alice = store.seed_user("alice", "alice@example.com", PASSWORD);
        let state = test_state(store);

        let visitor = session_user(&alice);
        let ctx = shared_profile_data(&state, &alice, Some(&visitor))
            .await
            .unwrap();

        assert!(ctx.is_visitors_profile);
        assert!(!ctx.is_following);
    }

    #[tokio::test]
    async fn following_flag_reflects_the_store() {
        let store = MemoryStore::new();
        let alice = store.seed_user("alice", "alice@example.com", PASSWORD);
        let bob = store.seed_user("bob", "bob@example.com", PASSWORD);
        store.seed_follow(&bob, &alice);
        let state = test_state(store);

        let visitor = session_user(&bob);
        let ctx = shared_profile_data(&state, &alice, Some(&visitor))
            .await
            .unwrap();

        assert!(!ctx.is_visitors_profile);
        assert!(ctx.is_following);
    }

    #[tokio::test]
    async fn counts_describe_the_owner_not_the_visitor() {
        let store = MemoryStore::new();
        let alice = store.seed_user("alice", "alice@example.com", PASSWORD);
        let bob = store.seed_user("bob", "bob@example.com", PASSWORD);
        // The visitor has plenty of activity of their own.
        store.seed_post(&bob, "Bob one", "...");
        store.seed_post(&bob, "Bob two", "...");
        store.seed_follow(&bob, &alice);
        store.seed_post(&alice, "Alice one", "...");
        let state = test_state(store);

        let visitor = session_user(&bob);
        let ctx = shared_profile_data(&state, &alice, Some(&visitor))
            .await
            .unwrap();

        assert_eq!(ctx.post_count, 1);
        assert_eq!(ctx.follower_count, 1);
        assert_eq!(ctx.following_count, 0);
    }

    #[tokio::test]
    async fn any_failed_count_fails_the_whole_aggregation() {
        let store = MemoryStore::new();
        let alice = store.seed_user("alice", "alice@example.com", PASSWORD);
        store.poison();
        let state = test_state(store);

        let result = shared_profile_data(&state, &alice, None).await;
        assert!(result.is_err());
    }
}
