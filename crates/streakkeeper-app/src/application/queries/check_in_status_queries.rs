use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};
use log::info;
use std::sync::Arc;

use crate::application::dtos::{CheckInDto, CheckInStatusDto};
use streakkeeper_domain::check_in::{CheckInRepository, StreakCalculator};
use streakkeeper_domain::clock::Clock;
use streakkeeper_domain::shared::{DomainError, UserId};
use streakkeeper_domain::user::UserRepository;

/// Days of history inspected for the consecutive-day count
const RECENT_WINDOW_DAYS: i64 = 7;

pub struct CheckInStatusQueries {
    user_repo: Arc<dyn UserRepository>,
    check_in_repo: Arc<dyn CheckInRepository>,
    clock: Arc<dyn Clock>,
}

impl CheckInStatusQueries {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        check_in_repo: Arc<dyn CheckInRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repo,
            check_in_repo,
            clock,
        }
    }

    /// Today's status, recent streak and month-to-date count for one user
    pub async fn get_status(&self, user_id: &UserId) -> Result<CheckInStatusDto, DomainError> {
        if self.user_repo.find_by_id(user_id).await?.is_none() {
            return Err(DomainError::UserNotFound(user_id.to_string()));
        }

        let now = self.clock.now();
        let tz = now.timezone();
        let today = now.date_naive();

        let recent_since = now.with_timezone(&Utc) - Duration::days(RECENT_WINDOW_DAYS);
        let recent = self.check_in_repo.find_since(user_id, recent_since).await?;
        let summary = StreakCalculator::summarize(&recent, &now);

        let month_start_utc = first_of_month(today)
            .and_hms_opt(0, 0, 0)
            .and_then(|start| tz.from_local_datetime(&start).earliest())
            .map(|start| start.with_timezone(&Utc))
            .unwrap_or(recent_since);
        let month_count = self.check_in_repo.count_since(user_id, month_start_utc).await?;

        let todays = recent.iter().find(|event| event.is_on(today, &tz));

        let dto = CheckInStatusDto {
            user_id: user_id.to_string(),
            today_checked: todays.is_some(),
            consecutive_days: summary.current_streak,
            month_count,
            recent_check_in_days: summary.total_check_in_days,
            last_check_in: todays.map(CheckInDto::from),
            recent_check_ins: recent.iter().map(CheckInDto::from).collect(),
        };

        info!(
            "[status] get_status user_id={} today={} consecutive={} month={}",
            dto.user_id, dto.today_checked, dto.consecutive_days, dto.month_count
        );

        Ok(dto)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
