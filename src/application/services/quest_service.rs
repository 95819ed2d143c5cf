//! Quest & achievement tracker

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::ports::outbound::{ClockPort, QuestRepositoryPort, RandomPort};
use crate::application::services::EngineError;
use crate::domain::entities::{achievement_catalog, Achievement, Quest};
use crate::domain::value_objects::{AchievementId, PlayerId, QuestType};

pub struct QuestService {
    quests: Arc<dyn QuestRepositoryPort>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

impl QuestService {
    pub fn new(
        quests: Arc<dyn QuestRepositoryPort>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            quests,
            clock,
            random,
        }
    }

    /// Create today's quest of every type the player does not already hold.
    /// Returns how many were created.
    #[instrument(skip(self))]
    pub async fn generate_daily_quests(&self, player_id: PlayerId) -> Result<u32, EngineError> {
        let now = self.clock.now();
        let today = now.date_naive();
        let mut created = 0;

        for quest_type in QuestType::ALL {
            let (min, max) = quest_type.daily_target_range();
            let target = self.random.gen_range(min, max).clamp(min, max);
            let quest = Quest::daily(quest_type, today, target, now);

            if self.quests.add_quest(player_id, &quest).await? {
                debug!(player_id = %player_id, quest_id = %quest.quest_id, target, "Daily quest created");
                created += 1;
            }
        }

        info!(player_id = %player_id, created, "Daily quests generated");
        Ok(created)
    }

    /// Advance active quests of one type. Returns how many this call completed.
    pub async fn advance_quests(
        &self,
        player_id: PlayerId,
        quest_type: QuestType,
        amount: u32,
    ) -> Result<u32, EngineError> {
        let completed = self
            .quests
            .update_quest_progress(player_id, quest_type, amount, self.clock.now())
            .await?;
        if completed > 0 {
            info!(player_id = %player_id, quest_type = %quest_type, completed, "Quests completed");
        }
        Ok(completed)
    }

    /// Advance one achievement. Returns whether this call completed it.
    pub async fn advance_achievement(
        &self,
        player_id: PlayerId,
        achievement_id: AchievementId,
        amount: u32,
    ) -> Result<bool, EngineError> {
        let completed = self
            .quests
            .update_achievement_progress(player_id, achievement_id, amount, self.clock.now())
            .await?;
        if completed {
            info!(player_id = %player_id, achievement = %achievement_id, "Achievement unlocked");
        }
        Ok(completed)
    }

    /// Give the player every catalog achievement they are missing
    pub async fn seed_achievements(&self, player_id: PlayerId) -> Result<u32, EngineError> {
        let created = self
            .quests
            .seed_achievements(player_id, &achievement_catalog())
            .await?;
        debug!(player_id = %player_id, created, "Achievements seeded");
        Ok(created)
    }

    pub async fn active_quests(&self, player_id: PlayerId) -> Result<Vec<Quest>, EngineError> {
        Ok(self
            .quests
            .get_active_quests(player_id, self.clock.now())
            .await?)
    }

    pub async fn completed_quest_count(&self, player_id: PlayerId) -> Result<u32, EngineError> {
        Ok(self.quests.count_completed_quests(player_id).await?)
    }

    pub async fn achievements(&self, player_id: PlayerId) -> Result<Vec<Achievement>, EngineError> {
        Ok(self.quests.get_player_achievements(player_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::application::ports::outbound::{
        MockClockPort, MockQuestRepositoryPort, MockRandomPort,
    };

    fn fixed_clock() -> Arc<MockClockPort> {
        let now = Utc.with_ymd_and_hms(2024, 7, 4, 18, 30, 0).unwrap();
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(move || now);
        Arc::new(clock)
    }

    fn max_random() -> Arc<MockRandomPort> {
        let mut random = MockRandomPort::new();
        random.expect_gen_range().returning(|_, max| max);
        Arc::new(random)
    }

    #[tokio::test]
    async fn test_generate_daily_quests_is_idempotent_per_day() {
        let stored = Arc::new(Mutex::new(HashSet::new()));
        let targets = Arc::new(Mutex::new(Vec::new()));

        let mut repo = MockQuestRepositoryPort::new();
        {
            let stored = stored.clone();
            let targets = targets.clone();
            repo.expect_add_quest().returning(move |_, quest| {
                targets
                    .lock()
                    .unwrap()
                    .push((quest.quest_type, quest.counter.target));
                Ok(stored.lock().unwrap().insert(quest.quest_id.clone()))
            });
        }

        let service = QuestService::new(Arc::new(repo), fixed_clock(), max_random());
        let player_id = PlayerId::new();

        assert_eq!(service.generate_daily_quests(player_id).await.unwrap(), 5);
        assert_eq!(service.generate_daily_quests(player_id).await.unwrap(), 0);

        let stored = stored.lock().unwrap();
        assert!(stored.contains("daily_battle_2024-07-04"));
        assert!(stored.contains("daily_collect_2024-07-04"));

        for (quest_type, target) in targets.lock().unwrap().iter() {
            assert_eq!(*target, quest_type.daily_target_range().1);
        }
    }

    #[tokio::test]
    async fn test_seed_achievements_passes_full_catalog() {
        let mut repo = MockQuestRepositoryPort::new();
        repo.expect_seed_achievements()
            .withf(|_, catalog| catalog.len() == AchievementId::ALL.len())
            .times(1)
            .returning(|_, catalog| Ok(catalog.len() as u32));

        let service = QuestService::new(Arc::new(repo), fixed_clock(), max_random());
        assert_eq!(service.seed_achievements(PlayerId::new()).await.unwrap(), 10);
    }
}
