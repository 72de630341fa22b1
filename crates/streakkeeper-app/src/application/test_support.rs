//! In-memory collaborators for application tests

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::RwLock;

use streakkeeper_domain::check_in::{CheckInEvent, CheckInRepository};
use streakkeeper_domain::clock::Clock;
use streakkeeper_domain::notification::ReminderNotifier;
use streakkeeper_domain::reminder::{ReminderRepository, ReminderSubscription};
use streakkeeper_domain::shared::{DomainError, UserId};
use streakkeeper_domain::user::{User, UserRepository};

mockall::mock! {
    pub Notifier {}

    #[async_trait]
    impl ReminderNotifier for Notifier {
        async fn send_daily_reminder(&self, user: &User) -> Result<(), DomainError>;
        async fn send_hourly_reminder(&self, user: &User) -> Result<(), DomainError>;
        async fn send_missed_warning(&self, user: &User) -> Result<(), DomainError>;
        async fn send_welcome(&self, user: &User) -> Result<(), DomainError>;
        async fn send_test(&self, user: &User) -> Result<(), DomainError>;
    }
}

/// Noon on 2024-05-15 in the local zone
pub fn noon() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 5, 15, 12, 0, 0)
        .earliest()
        .unwrap()
}

pub fn hours_from_noon(hours: i64) -> DateTime<Utc> {
    (noon() + Duration::hours(hours)).with_timezone(&Utc)
}

pub fn user(name: &str) -> User {
    User::new(name.to_string(), format!("{}@example.com", name)).unwrap()
}

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
    broken: RwLock<HashSet<String>>,
    listing_broken: AtomicBool,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: &User) {
        self.users
            .write()
            .await
            .insert(user.id().as_str().to_string(), user.clone());
    }

    /// Make lookups of `id` fail
    pub async fn break_user(&self, id: &UserId) {
        self.broken.write().await.insert(id.as_str().to_string());
    }

    /// Make `find_all` fail
    pub fn break_listing(&self) {
        self.listing_broken.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> Result<(), DomainError> {
        self.insert(user).await;
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        if self.broken.read().await.contains(id.as_str()) {
            return Err(DomainError::Repository("disk on fire".to_string()));
        }
        Ok(self.users.read().await.get(id.as_str()).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        if self.listing_broken.load(Ordering::SeqCst) {
            return Err(DomainError::Repository("users table unreadable".to_string()));
        }
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.username().cmp(b.username()));
        Ok(users)
    }
}

#[derive(Default)]
pub struct InMemoryCheckInRepository {
    events: RwLock<Vec<CheckInEvent>>,
    broken: RwLock<HashSet<String>>,
}

impl InMemoryCheckInRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: &User, at: DateTime<Utc>) {
        self.events
            .write()
            .await
            .push(CheckInEvent::new(user.id().clone(), at, None));
    }

    /// Make history reads for `id` fail
    pub async fn break_user(&self, id: &UserId) {
        self.broken.write().await.insert(id.as_str().to_string());
    }

    async fn check(&self, user_id: &UserId) -> Result<(), DomainError> {
        if self.broken.read().await.contains(user_id.as_str()) {
            return Err(DomainError::Repository("check-in table locked".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CheckInRepository for InMemoryCheckInRepository {
    async fn save(&self, event: &CheckInEvent) -> Result<(), DomainError> {
        self.events.write().await.push(event.clone());
        Ok(())
    }

    async fn find_since(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Vec<CheckInEvent>, DomainError> {
        self.check(user_id).await?;
        let mut events: Vec<CheckInEvent> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.user_id() == user_id && e.checked_in_at() >= since)
            .cloned()
            .collect();
        events.sort_by_key(|e| std::cmp::Reverse(e.checked_in_at()));
        Ok(events)
    }

    async fn find_latest_at(&self, user_id: &UserId) -> Result<Option<DateTime<Utc>>, DomainError> {
        self.check(user_id).await?;
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.user_id() == user_id)
            .map(|e| e.checked_in_at())
            .max())
    }

    async fn count_since(&self, user_id: &UserId, since: DateTime<Utc>) -> Result<u64, DomainError> {
        Ok(self.find_since(user_id, since).await?.len() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryReminderRepository {
    subscriptions: RwLock<HashMap<String, ReminderSubscription>>,
    saves: AtomicUsize,
    save_broken: AtomicBool,
    list_broken: AtomicBool,
}

impl InMemoryReminderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, subscription: ReminderSubscription) {
        self.subscriptions
            .write()
            .await
            .insert(subscription.user_id().as_str().to_string(), subscription);
    }

    pub async fn get(&self, user_id: &UserId) -> Option<ReminderSubscription> {
        self.subscriptions.read().await.get(user_id.as_str()).cloned()
    }

    /// Number of successful `save` calls so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make every `save` fail without touching stored records
    pub fn break_save(&self) {
        self.save_broken.store(true, Ordering::SeqCst);
    }

    /// Make `find_enabled` fail
    pub fn break_list(&self) {
        self.list_broken.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReminderRepository for InMemoryReminderRepository {
    async fn save(&self, subscription: &ReminderSubscription) -> Result<(), DomainError> {
        if self.save_broken.load(Ordering::SeqCst) {
            return Err(DomainError::Repository("database is locked".to_string()));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.insert(subscription.clone()).await;
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ReminderSubscription>, DomainError> {
        Ok(self.get(user_id).await)
    }

    async fn find_enabled(&self) -> Result<Vec<ReminderSubscription>, DomainError> {
        if self.list_broken.load(Ordering::SeqCst) {
            return Err(DomainError::Repository("database is locked".to_string()));
        }
        Ok(self
            .subscriptions
            .read()
            .await
            .values()
            .filter(|s| s.is_enabled())
            .cloned()
            .collect())
    }
}
