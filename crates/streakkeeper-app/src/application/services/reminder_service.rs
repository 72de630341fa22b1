use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use streakkeeper_domain::check_in::{CheckInEvent, CheckInRepository};
use streakkeeper_domain::clock::Clock;
use streakkeeper_domain::notification::{NotificationKind, ReminderNotifier};
use streakkeeper_domain::reminder::{ReminderRepository, ReminderSettings, ReminderSubscription};
use streakkeeper_domain::shared::{DomainError, UserId};
use streakkeeper_domain::user::{User, UserRepository};

use super::dispatch::send_with_timeout;

/// Use cases that change a user's reminder schedule outside the scheduler
pub struct ReminderService {
    user_repo: Arc<dyn UserRepository>,
    check_in_repo: Arc<dyn CheckInRepository>,
    reminder_repo: Arc<dyn ReminderRepository>,
    notifier: Arc<dyn ReminderNotifier>,
    clock: Arc<dyn Clock>,
    notification_timeout: Duration,
}

impl ReminderService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        check_in_repo: Arc<dyn CheckInRepository>,
        reminder_repo: Arc<dyn ReminderRepository>,
        notifier: Arc<dyn ReminderNotifier>,
        clock: Arc<dyn Clock>,
        notification_timeout: Duration,
    ) -> Self {
        Self {
            user_repo,
            check_in_repo,
            reminder_repo,
            notifier,
            clock,
            notification_timeout,
        }
    }

    /// Persist a new user together with its default reminder subscription.
    /// The welcome email goes out in the background and never fails the call.
    #[instrument(skip(self, email))]
    pub async fn register_user(&self, username: &str, email: &str) -> Result<User, DomainError> {
        let user = User::new(username.to_string(), email.to_string())?;
        self.user_repo.save(&user).await?;
        self.ensure_subscription(user.id()).await?;

        self.spawn_notification(NotificationKind::Welcome, user.clone());

        info!("✅ Registered user {}", user.username());
        Ok(user)
    }

    /// Queue a test email for an existing user
    #[instrument(skip(self))]
    pub async fn send_test_email(&self, user_id: &UserId) -> Result<(), DomainError> {
        let user = self.require_user(user_id).await?;
        self.spawn_notification(NotificationKind::TestEmail, user);
        Ok(())
    }

    /// The user's subscription, created with defaults if it does not exist yet
    pub async fn ensure_subscription(
        &self,
        user_id: &UserId,
    ) -> Result<ReminderSubscription, DomainError> {
        self.require_user(user_id).await?;

        if let Some(existing) = self.reminder_repo.find_by_user(user_id).await? {
            return Ok(existing);
        }

        let now = self.clock.now().with_timezone(&Utc);
        let subscription = ReminderSubscription::with_defaults(user_id.clone(), now);
        self.reminder_repo.save(&subscription).await?;

        info!("Created default reminder subscription for {}", user_id);
        Ok(subscription)
    }

    pub async fn get_subscription(
        &self,
        user_id: &UserId,
    ) -> Result<ReminderSubscription, DomainError> {
        self.reminder_repo
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| DomainError::SubscriptionNotFound(user_id.to_string()))
    }

    /// Apply a partial settings update; the next due time follows the new settings
    #[instrument(skip(self))]
    pub async fn update_settings(
        &self,
        user_id: &UserId,
        settings: ReminderSettings,
    ) -> Result<ReminderSubscription, DomainError> {
        let mut subscription = self.ensure_subscription(user_id).await?;
        let last_check_in = self.check_in_repo.find_latest_at(user_id).await?;
        let now = self.clock.now();

        subscription.apply_settings(&settings, last_check_in, &now)?;
        self.reminder_repo.save(&subscription).await?;

        info!(
            "Reminder settings updated for {}: enabled={}, frequency={}, interval={}h",
            user_id,
            subscription.is_enabled(),
            subscription.frequency(),
            subscription.interval_hours()
        );
        Ok(subscription)
    }

    /// Recompute the next reminder with `checked_in_at` as the latest check-in.
    /// Users without a subscription are left alone.
    pub async fn reschedule_after_check_in(
        &self,
        user_id: &UserId,
        checked_in_at: DateTime<Utc>,
    ) -> Result<Option<ReminderSubscription>, DomainError> {
        let Some(mut subscription) = self.reminder_repo.find_by_user(user_id).await? else {
            return Ok(None);
        };

        if !subscription.is_enabled() {
            return Ok(Some(subscription));
        }

        let now = self.clock.now();
        subscription.reschedule(Some(checked_in_at), &now);
        self.reminder_repo.save(&subscription).await?;

        Ok(Some(subscription))
    }

    /// Accept at most one check-in per local calendar day, then reschedule
    #[instrument(skip(self, note))]
    pub async fn record_check_in(
        &self,
        user_id: &UserId,
        note: Option<String>,
    ) -> Result<CheckInEvent, DomainError> {
        self.require_user(user_id).await?;

        let now = self.clock.now();
        let today = now.date_naive();

        if let Some(latest) = self.check_in_repo.find_latest_at(user_id).await? {
            if latest.with_timezone(&now.timezone()).date_naive() == today {
                return Err(DomainError::AlreadyCheckedIn(format!(
                    "User {} already checked in on {}",
                    user_id, today
                )));
            }
        }

        let event = CheckInEvent::new(user_id.clone(), now.with_timezone(&Utc), note);
        self.check_in_repo.save(&event).await?;
        self.reschedule_after_check_in(user_id, event.checked_in_at())
            .await?;

        info!("✅ Check-in recorded for {} on {}", user_id, today);
        Ok(event)
    }

    async fn require_user(&self, user_id: &UserId) -> Result<User, DomainError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()))
    }

    /// Send on a detached task, bounded by the notification timeout.
    /// The outcome is only logged.
    fn spawn_notification(&self, kind: NotificationKind, user: User) {
        let notifier = Arc::clone(&self.notifier);
        let timeout = self.notification_timeout;

        tokio::spawn(async move {
            match send_with_timeout(notifier.as_ref(), kind, &user, timeout).await {
                Ok(()) => info!("📨 {} sent to {}", kind, user.username()),
                Err(e) => warn!(
                    "⚠️  Failed to send {} to {}: {}",
                    kind,
                    user.username(),
                    e.format_with_code()
                ),
            }
        });
    }
}
