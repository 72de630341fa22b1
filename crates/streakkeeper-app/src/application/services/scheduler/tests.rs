use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;

use streakkeeper_domain::notification::ReminderNotifier;
use streakkeeper_domain::reminder::{ReminderFrequency, ReminderSubscription};
use streakkeeper_domain::shared::DomainError;
use streakkeeper_domain::user::User;

use super::{ReminderScheduler, SchedulerConfig, TickReport};
use crate::application::test_support::*;

struct Fixture {
    users: Arc<InMemoryUserRepository>,
    check_ins: Arc<InMemoryCheckInRepository>,
    reminders: Arc<InMemoryReminderRepository>,
    clock: Arc<ManualClock>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            check_ins: Arc::new(InMemoryCheckInRepository::new()),
            reminders: Arc::new(InMemoryReminderRepository::new()),
            clock: Arc::new(ManualClock::new(noon())),
        }
    }

    fn scheduler(&self, notifier: Arc<dyn ReminderNotifier>) -> ReminderScheduler {
        self.scheduler_with(notifier, SchedulerConfig::default())
    }

    fn scheduler_with(
        &self,
        notifier: Arc<dyn ReminderNotifier>,
        config: SchedulerConfig,
    ) -> ReminderScheduler {
        ReminderScheduler::new(
            self.users.clone(),
            self.check_ins.clone(),
            self.reminders.clone(),
            notifier,
            self.clock.clone(),
            config,
        )
    }

    /// User with an hourly subscription that fell due an hour ago
    async fn overdue_hourly(&self, name: &str) -> (User, ReminderSubscription) {
        let user = user(name);
        self.users.insert(&user).await;

        let subscription = ReminderSubscription::restore(
            user.id().clone(),
            true,
            ReminderFrequency::Hourly,
            6,
            Some(hours_from_noon(-1)),
            Some(hours_from_noon(-7)),
        );
        self.reminders.insert(subscription.clone()).await;

        (user, subscription)
    }
}

fn smtp_down() -> DomainError {
    DomainError::Notification("smtp down".to_string())
}

#[tokio::test]
async fn test_due_subscription_fires_once_and_advances() {
    let fixture = Fixture::new();
    let (user, _) = fixture.overdue_hourly("alice").await;

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_hourly_reminder()
        .times(1)
        .returning(|_| Ok(()));
    let scheduler = fixture.scheduler(Arc::new(notifier));

    let report = scheduler.run_reminder_tick().await;
    assert_eq!(
        report,
        TickReport {
            due: 1,
            sent: 1,
            failed: 0,
            skipped: 0
        }
    );

    let stored = fixture.reminders.get(user.id()).await.unwrap();
    assert_eq!(stored.last_fired(), Some(hours_from_noon(0)));
    assert_eq!(stored.next_due(), Some(hours_from_noon(6)));

    // Same instant again: nothing is due any more
    let report = scheduler.run_reminder_tick().await;
    assert_eq!(report.due, 0);
}

#[tokio::test]
async fn test_enabled_subscription_without_due_time_fires() {
    let fixture = Fixture::new();
    let user = user("nora");
    fixture.users.insert(&user).await;
    fixture
        .reminders
        .insert(ReminderSubscription::restore(
            user.id().clone(),
            true,
            ReminderFrequency::Hourly,
            6,
            None,
            None,
        ))
        .await;

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_hourly_reminder()
        .times(1)
        .returning(|_| Ok(()));
    let scheduler = fixture.scheduler(Arc::new(notifier));

    let report = scheduler.run_reminder_tick().await;

    assert_eq!(report.due, 1);
    assert_eq!(report.sent, 1);
    let stored = fixture.reminders.get(user.id()).await.unwrap();
    assert_eq!(stored.last_fired(), Some(hours_from_noon(0)));
    assert_eq!(stored.next_due(), Some(hours_from_noon(6)));
}

#[tokio::test]
async fn test_daily_subscription_uses_daily_variant() {
    let fixture = Fixture::new();
    let user = user("bob");
    fixture.users.insert(&user).await;
    fixture
        .reminders
        .insert(ReminderSubscription::restore(
            user.id().clone(),
            true,
            ReminderFrequency::Daily,
            24,
            Some(hours_from_noon(-3)),
            None,
        ))
        .await;

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_daily_reminder()
        .withf(|u: &User| u.username() == "bob")
        .times(1)
        .returning(|_| Ok(()));
    notifier.expect_send_hourly_reminder().never();
    let scheduler = fixture.scheduler(Arc::new(notifier));

    scheduler.run_reminder_tick().await;

    let stored = fixture.reminders.get(user.id()).await.unwrap();
    assert!(stored.next_due().unwrap() > hours_from_noon(0));
}

#[tokio::test]
async fn test_send_failure_leaves_record_for_next_tick() {
    let fixture = Fixture::new();
    let (user, before) = fixture.overdue_hourly("alice").await;

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_hourly_reminder()
        .times(2)
        .returning(|_| Err(smtp_down()));
    let scheduler = fixture.scheduler(Arc::new(notifier));

    let report = scheduler.run_reminder_tick().await;
    assert_eq!(report.failed, 1);
    assert_eq!(report.sent, 0);
    assert_eq!(fixture.reminders.get(user.id()).await.unwrap(), before);
    assert_eq!(fixture.reminders.save_count(), 0);

    // Still due on the following tick
    fixture.clock.advance(ChronoDuration::hours(1));
    let report = scheduler.run_reminder_tick().await;
    assert_eq!(report.due, 1);
}

#[tokio::test]
async fn test_one_failure_does_not_block_other_users() {
    let fixture = Fixture::new();
    let (alice, alice_before) = fixture.overdue_hourly("alice").await;
    let (bob, _) = fixture.overdue_hourly("bob").await;

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_hourly_reminder()
        .withf(|u: &User| u.username() == "alice")
        .returning(|_| Err(smtp_down()));
    notifier
        .expect_send_hourly_reminder()
        .withf(|u: &User| u.username() == "bob")
        .times(1)
        .returning(|_| Ok(()));
    let scheduler = fixture.scheduler(Arc::new(notifier));

    let report = scheduler.run_reminder_tick().await;

    assert_eq!(report.due, 2);
    assert_eq!(report.sent, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(fixture.reminders.get(alice.id()).await.unwrap(), alice_before);
    assert_eq!(
        fixture.reminders.get(bob.id()).await.unwrap().last_fired(),
        Some(hours_from_noon(0))
    );
}

#[tokio::test]
async fn test_persist_failure_keeps_record_due() {
    let fixture = Fixture::new();
    let (user, before) = fixture.overdue_hourly("alice").await;
    fixture.reminders.break_save();

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_hourly_reminder()
        .times(2)
        .returning(|_| Ok(()));
    let scheduler = fixture.scheduler(Arc::new(notifier));

    let report = scheduler.run_reminder_tick().await;
    assert_eq!(report.due, 1);
    assert_eq!(report.sent, 1);
    assert_eq!(fixture.reminders.get(user.id()).await.unwrap(), before);
    assert_eq!(fixture.reminders.save_count(), 0);

    fixture.clock.advance(ChronoDuration::minutes(30));
    let report = scheduler.run_reminder_tick().await;
    assert_eq!(report.due, 1);
}

#[tokio::test]
async fn test_check_in_lookup_failure_still_records_firing() {
    let fixture = Fixture::new();
    let (user, _) = fixture.overdue_hourly("alice").await;
    fixture.check_ins.insert(&user, hours_from_noon(-30)).await;
    fixture.check_ins.break_user(user.id()).await;

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_hourly_reminder()
        .times(1)
        .returning(|_| Ok(()));
    let scheduler = fixture.scheduler(Arc::new(notifier));

    let report = scheduler.run_reminder_tick().await;

    assert_eq!(report.sent, 1);
    assert_eq!(report.failed, 0);
    let stored = fixture.reminders.get(user.id()).await.unwrap();
    assert_eq!(stored.last_fired(), Some(hours_from_noon(0)));
    assert_eq!(stored.next_due(), Some(hours_from_noon(6)));
    assert_eq!(fixture.reminders.save_count(), 1);
}

#[tokio::test]
async fn test_subscription_load_failure_yields_empty_report() {
    let fixture = Fixture::new();
    fixture.overdue_hourly("alice").await;
    fixture.reminders.break_list();

    let mut notifier = MockNotifier::new();
    notifier.expect_send_hourly_reminder().never();
    let scheduler = fixture.scheduler(Arc::new(notifier));

    assert_eq!(scheduler.run_reminder_tick().await, TickReport::default());
}

#[tokio::test]
async fn test_user_listing_failure_yields_empty_sweep() {
    let fixture = Fixture::new();
    fixture.users.insert(&user("bob")).await;
    fixture.users.break_listing();

    let mut notifier = MockNotifier::new();
    notifier.expect_send_missed_warning().never();
    let scheduler = fixture.scheduler(Arc::new(notifier));

    assert_eq!(
        scheduler.run_missed_check_in_sweep().await,
        TickReport::default()
    );
}

struct StalledNotifier;

#[async_trait]
impl ReminderNotifier for StalledNotifier {
    async fn send_daily_reminder(&self, _user: &User) -> Result<(), DomainError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }

    async fn send_hourly_reminder(&self, user: &User) -> Result<(), DomainError> {
        self.send_daily_reminder(user).await
    }

    async fn send_missed_warning(&self, user: &User) -> Result<(), DomainError> {
        self.send_daily_reminder(user).await
    }

    async fn send_welcome(&self, user: &User) -> Result<(), DomainError> {
        self.send_daily_reminder(user).await
    }

    async fn send_test(&self, user: &User) -> Result<(), DomainError> {
        self.send_daily_reminder(user).await
    }
}

#[tokio::test]
async fn test_timed_out_send_counts_as_failure() {
    let fixture = Fixture::new();
    let (user, before) = fixture.overdue_hourly("alice").await;

    let config = SchedulerConfig {
        notification_timeout: Duration::from_millis(50),
        ..SchedulerConfig::default()
    };
    let scheduler = fixture.scheduler_with(Arc::new(StalledNotifier), config);

    let report = scheduler.run_reminder_tick().await;

    assert_eq!(report.failed, 1);
    assert_eq!(fixture.reminders.get(user.id()).await.unwrap(), before);
}

#[tokio::test]
async fn test_unreadable_user_is_skipped() {
    let fixture = Fixture::new();
    let (ghost, _) = fixture.overdue_hourly("ghost").await;
    fixture.users.break_user(ghost.id()).await;
    let (carol, _) = fixture.overdue_hourly("carol").await;

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_hourly_reminder()
        .withf(|u: &User| u.username() == "carol")
        .times(1)
        .returning(|_| Ok(()));
    let scheduler = fixture.scheduler(Arc::new(notifier));

    let report = scheduler.run_reminder_tick().await;

    assert_eq!(report.skipped, 1);
    assert_eq!(report.sent, 1);
    assert!(fixture
        .reminders
        .get(carol.id())
        .await
        .unwrap()
        .last_fired()
        .is_some());
}

#[tokio::test]
async fn test_disabled_and_future_subscriptions_do_not_fire() {
    let fixture = Fixture::new();
    let dora = user("dora");
    let eve = user("eve");
    fixture.users.insert(&dora).await;
    fixture.users.insert(&eve).await;

    let mut disabled = ReminderSubscription::with_defaults(dora.id().clone(), hours_from_noon(-48));
    disabled.disable();
    fixture.reminders.insert(disabled).await;
    fixture
        .reminders
        .insert(ReminderSubscription::with_defaults(
            eve.id().clone(),
            hours_from_noon(-1),
        ))
        .await;

    let mut notifier = MockNotifier::new();
    notifier.expect_send_daily_reminder().never();
    notifier.expect_send_hourly_reminder().never();
    let scheduler = fixture.scheduler(Arc::new(notifier));

    assert_eq!(scheduler.run_reminder_tick().await, TickReport::default());
}

#[tokio::test]
async fn test_missed_sweep_warns_and_mutates_nothing() {
    let fixture = Fixture::new();
    let (alice, _) = fixture.overdue_hourly("alice").await;
    let bob = user("bob");
    let carol = user("carol");
    fixture.users.insert(&bob).await;
    fixture.users.insert(&carol).await;

    fixture.check_ins.insert(&alice, hours_from_noon(-24)).await;
    fixture.check_ins.insert(&bob, hours_from_noon(-72)).await;

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_missed_warning()
        .withf(|u: &User| u.username() != "alice")
        .times(4)
        .returning(|_| Ok(()));
    let scheduler = fixture.scheduler(Arc::new(notifier));
    let before = fixture.reminders.get(alice.id()).await;

    let first = scheduler.run_missed_check_in_sweep().await;
    let second = scheduler.run_missed_check_in_sweep().await;

    assert_eq!(first.due, 2);
    assert_eq!(first, second);
    assert_eq!(fixture.reminders.save_count(), 0);
    assert_eq!(fixture.reminders.get(alice.id()).await, before);
}

#[tokio::test]
async fn test_missed_sweep_continues_past_failures() {
    let fixture = Fixture::new();
    let bob = user("bob");
    let carol = user("carol");
    let dave = user("dave");
    for u in [&bob, &carol, &dave] {
        fixture.users.insert(u).await;
    }
    fixture.check_ins.break_user(bob.id()).await;

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_missed_warning()
        .withf(|u: &User| u.username() == "carol")
        .returning(|_| Err(smtp_down()));
    notifier
        .expect_send_missed_warning()
        .withf(|u: &User| u.username() == "dave")
        .times(1)
        .returning(|_| Ok(()));
    let scheduler = fixture.scheduler(Arc::new(notifier));

    let report = scheduler.run_missed_check_in_sweep().await;

    assert_eq!(
        report,
        TickReport {
            due: 2,
            sent: 1,
            failed: 1,
            skipped: 1
        }
    );
}

#[tokio::test]
async fn test_start_and_stop() {
    let fixture = Fixture::new();
    let scheduler = fixture.scheduler(Arc::new(MockNotifier::new()));

    scheduler.start().await;
    scheduler.start().await;
    assert!(scheduler.is_running().await);

    tokio::time::timeout(Duration::from_secs(5), scheduler.stop())
        .await
        .expect("Scheduler should stop promptly");
    assert!(!scheduler.is_running().await);

    // Stopping again is harmless
    scheduler.stop().await;
}

#[tokio::test]
async fn test_reminder_loop_ticks_until_stopped() {
    let fixture = Fixture::new();
    fixture.overdue_hourly("alice").await;

    let mut notifier = MockNotifier::new();
    notifier
        .expect_send_hourly_reminder()
        .times(1)
        .returning(|_| Ok(()));
    let config = SchedulerConfig {
        reminder_tick: Duration::from_secs(1),
        ..SchedulerConfig::default()
    };
    let scheduler = fixture.scheduler_with(Arc::new(notifier), config);

    scheduler.start().await;
    tokio::time::sleep(Duration::from_millis(1500)).await;
    scheduler.stop().await;

    assert_eq!(fixture.reminders.save_count(), 1);
}

/// Announces each send, then takes `delay` to complete it
struct SlowNotifier {
    started: Notify,
    delay: Duration,
}

impl SlowNotifier {
    async fn send(&self) -> Result<(), DomainError> {
        self.started.notify_one();
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

#[async_trait]
impl ReminderNotifier for SlowNotifier {
    async fn send_daily_reminder(&self, _user: &User) -> Result<(), DomainError> {
        self.send().await
    }

    async fn send_hourly_reminder(&self, _user: &User) -> Result<(), DomainError> {
        self.send().await
    }

    async fn send_missed_warning(&self, _user: &User) -> Result<(), DomainError> {
        self.send().await
    }

    async fn send_welcome(&self, _user: &User) -> Result<(), DomainError> {
        self.send().await
    }

    async fn send_test(&self, _user: &User) -> Result<(), DomainError> {
        self.send().await
    }
}

#[tokio::test]
async fn test_stop_lets_in_flight_batch_finish() {
    let fixture = Fixture::new();
    let (alice, _) = fixture.overdue_hourly("alice").await;
    let (bob, _) = fixture.overdue_hourly("bob").await;

    let notifier = Arc::new(SlowNotifier {
        started: Notify::new(),
        delay: Duration::from_millis(300),
    });
    let config = SchedulerConfig {
        reminder_tick: Duration::from_secs(1),
        ..SchedulerConfig::default()
    };
    let scheduler = fixture.scheduler_with(notifier.clone(), config);

    scheduler.start().await;
    tokio::time::timeout(Duration::from_secs(5), notifier.started.notified())
        .await
        .expect("First send should start within the first tick");

    let stop_requested = Instant::now();
    scheduler.stop().await;

    // Both sends of the batch took place after stop was requested
    assert!(stop_requested.elapsed() >= Duration::from_millis(500));
    assert_eq!(fixture.reminders.save_count(), 2);
    for id in [alice.id(), bob.id()] {
        assert_eq!(
            fixture.reminders.get(id).await.unwrap().last_fired(),
            Some(hours_from_noon(0))
        );
    }
    assert!(!scheduler.is_running().await);
}
