//! In-memory implementations of the quill store traits, plus seed-data
//! helpers, for driving the application in tests without Postgres.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use quill::credentials::gravatar_url;
use quill::mail::Mailer;
use quill::state::AppState;
use quill::store::{
    FollowStore, NewUser, PostRecord, PostStore, ProfileCard, StoreError, UserRecord, UserStore,
};
use quill::token::JwtConfig;

pub const TEST_JWT_SECRET: &str = "fixture-signing-secret";

/// Low bcrypt cost to keep test runs fast.
const TEST_BCRYPT_COST: u32 = 4;

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<UserRecord>>,
    posts: Mutex<Vec<PostRecord>>,
    follows: Mutex<Vec<(Uuid, Uuid)>>,
    fail_reads: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every subsequent store call fail, to exercise the backend-fault
    /// paths.
    pub fn poison(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store poisoned".into()))
        } else {
            Ok(())
        }
    }

    pub fn seed_user(&self, username: &str, email: &str, password: &str) -> UserRecord {
        let user = UserRecord {
            user_id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: bcrypt::hash(password, TEST_BCRYPT_COST).expect("bcrypt hash"),
            avatar_url: gravatar_url(email),
            created_at_utc: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub fn seed_post(&self, author: &UserRecord, title: &str, body: &str) -> PostRecord {
        let post = PostRecord {
            post_id: Uuid::new_v4(),
            author_id: author.user_id,
            author_username: author.username.clone(),
            author_avatar_url: author.avatar_url.clone(),
            title: title.to_string(),
            body: body.to_string(),
            created_at_utc: Utc::now(),
        };
        self.posts.lock().unwrap().push(post.clone());
        post
    }

    pub fn seed_follow(&self, follower: &UserRecord, followed: &UserRecord) {
        self.follows
            .lock()
            .unwrap()
            .push((follower.user_id, followed.user_id));
    }
}

/// An [`AppState`] wired to the given memory store, a fixed signing secret,
/// and a disabled mailer.
pub fn test_state(store: Arc<MemoryStore>) -> AppState {
    AppState {
        users: store.clone(),
        posts: store.clone(),
        follows: store,
        jwt: JwtConfig::new(TEST_JWT_SECRET),
        mailer: Mailer::disabled(),
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<UserRecord, StoreError> {
        self.check_available()?;
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        self.check_available()?;
        Ok(self.users.lock().unwrap().iter().any(|u| u.email == email))
    }

    async fn create(&self, new_user: NewUser) -> Result<UserRecord, StoreError> {
        self.check_available()?;
        let user = UserRecord {
            user_id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            avatar_url: new_user.avatar_url,
            created_at_utc: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<PostRecord>, StoreError> {
        self.check_available()?;
        let mut posts: Vec<PostRecord> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at_utc.cmp(&a.created_at_utc));
        Ok(posts)
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<i64, StoreError> {
        self.check_available()?;
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.author_id == author_id)
            .count() as i64)
    }

    async fn feed_for(&self, user_id: Uuid) -> Result<Vec<PostRecord>, StoreError> {
        self.check_available()?;
        let followed: Vec<Uuid> = self
            .follows
            .lock()
            .unwrap()
            .iter()
            .filter(|(follower, _)| *follower == user_id)
            .map(|(_, followed)| *followed)
            .collect();

        let mut posts: Vec<PostRecord> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| followed.contains(&p.author_id))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at_utc.cmp(&a.created_at_utc));
        Ok(posts)
    }
}

#[async_trait]
impl FollowStore for MemoryStore {
    async fn is_following(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<bool, StoreError> {
        self.check_available()?;
        Ok(self
            .follows
            .lock()
            .unwrap()
            .contains(&(follower_id, followed_id)))
    }

    async fn count_followers(&self, user_id: Uuid) -> Result<i64, StoreError> {
        self.check_available()?;
        Ok(self
            .follows
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, followed)| *followed == user_id)
            .count() as i64)
    }

    async fn count_following(&self, user_id: Uuid) -> Result<i64, StoreError> {
        self.check_available()?;
        Ok(self
            .follows
            .lock()
            .unwrap()
            .iter()
            .filter(|(follower, _)| *follower == user_id)
            .count() as i64)
    }

    async fn followers_of(&self, user_id: Uuid) -> Result<Vec<ProfileCard>, StoreError> {
        self.check_available()?;
        let follower_ids: Vec<Uuid> = self
            .follows
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, followed)| *followed == user_id)
            .map(|(follower, _)| *follower)
            .collect();

        Ok(self.cards_for(&follower_ids))
    }

    async fn following_of(&self, user_id: Uuid) -> Result<Vec<ProfileCard>, StoreError> {
        self.check_available()?;
        let followed_ids: Vec<Uuid> = self
            .follows
            .lock()
            .unwrap()
            .iter()
            .filter(|(follower, _)| *follower == user_id)
            .map(|(_, followed)| *followed)
            .collect();

        Ok(self.cards_for(&followed_ids))
    }

    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), StoreError> {
        self.check_available()?;
        let mut follows = self.follows.lock().unwrap();
        if !follows.contains(&(follower_id, followed_id)) {
            follows.push((follower_id, followed_id));
        }
        Ok(())
    }

    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), StoreError> {
        self.check_available()?;
        self.follows
            .lock()
            .unwrap()
            .retain(|pair| *pair != (follower_id, followed_id));
        Ok(())
    }
}

impl MemoryStore {
    fn cards_for(&self, ids: &[Uuid]) -> Vec<ProfileCard> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| ids.contains(&u.user_id))
            .map(|u| ProfileCard {
                username: u.username.clone(),
                avatar_url: u.avatar_url.clone(),
            })
            .collect()
    }
}
