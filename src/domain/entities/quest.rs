//! Quest entity - player-scoped daily objectives

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::QuestType;

use super::ProgressCounter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    /// Type + date derived identifier, unique per player
    pub quest_id: String,
    pub quest_type: QuestType,
    pub counter: ProgressCounter,
    pub started_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Quest {
    /// Build the daily quest of `quest_type` for `date`, expiring at the next UTC midnight
    pub fn daily(quest_type: QuestType, date: NaiveDate, target: u32, now: DateTime<Utc>) -> Self {
        let expires_at = date
            .succ_opt()
            .and_then(|next| next.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc());

        Self {
            quest_id: Self::daily_id(quest_type, date),
            quest_type,
            counter: ProgressCounter::new(target),
            started_at: now,
            expires_at,
        }
    }

    pub fn daily_id(quest_type: QuestType, date: NaiveDate) -> String {
        format!("{}_{}", quest_type.daily_prefix(), date.format("%Y-%m-%d"))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| now >= expires)
    }

    /// Still accepting progress
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.counter.completed && !self.is_expired(now)
    }

    /// Advance progress; returns true if this call completed the quest
    pub fn advance(&mut self, amount: u32, now: DateTime<Utc>) -> bool {
        if self.is_expired(now) {
            return false;
        }
        self.counter.advance(amount)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).single().expect("valid date")
    }

    #[test]
    fn test_daily_quest_identity_and_expiry() {
        let now = noon();
        let quest = Quest::daily(QuestType::Exploration, now.date_naive(), 6, now);

        assert_eq!(quest.quest_id, "daily_explore_2024-03-09");
        assert_eq!(
            quest.expires_at,
            Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).single()
        );
        assert!(quest.is_active(now));
        assert!(!quest.is_active(now + Duration::hours(12)));
    }

    #[test]
    fn test_expired_quest_ignores_progress() {
        let now = noon();
        let mut quest = Quest::daily(QuestType::Battle, now.date_naive(), 1, now);

        assert!(!quest.advance(5, now + Duration::days(1)));
        assert_eq!(quest.counter.progress, 0);
        assert!(quest.advance(1, now));
    }
}
