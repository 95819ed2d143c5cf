//! Progression ledger - experience, money, levels and story choices

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::application::ports::outbound::PlayerRepositoryPort;
use crate::application::services::{EnergyService, EngineError, QuestService};
use crate::domain::entities::Player;
use crate::domain::services::{battle_reward, story_choice_reward};
use crate::domain::value_objects::{AchievementId, PlayerId, QuestType};

/// Rewards credited for a battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewardOutcome {
    pub exp: u32,
    pub money: u32,
    pub level_up: Option<u32>,
}

/// Context of the scene a story choice was made in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneData {
    #[serde(default)]
    pub scene_id: Option<String>,
    /// Energy charged before the choice pays out
    #[serde(default)]
    pub energy_cost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryOutcome {
    pub exp: u32,
    pub money: u32,
    pub relationship: i32,
    pub level_up: Option<u32>,
}

pub struct ProgressionService {
    players: Arc<dyn PlayerRepositoryPort>,
    quests: Arc<QuestService>,
    energy: Arc<EnergyService>,
}

impl ProgressionService {
    pub fn new(
        players: Arc<dyn PlayerRepositoryPort>,
        quests: Arc<QuestService>,
        energy: Arc<EnergyService>,
    ) -> Self {
        Self {
            players,
            quests,
            energy,
        }
    }

    /// Credit a battle's rewards and advance battle-driven achievements and quests
    #[instrument(skip(self))]
    pub async fn apply_battle_rewards(
        &self,
        player_id: PlayerId,
        score: u64,
        max_combo: u32,
        perfect_hits: u32,
    ) -> Result<RewardOutcome, EngineError> {
        self.load(player_id).await?;

        let reward = battle_reward(score, max_combo, perfect_hits);
        self.players.add_experience(player_id, reward.exp).await?;
        self.players.add_money(player_id, reward.money).await?;

        self.quests
            .advance_achievement(player_id, AchievementId::FirstBlood, 1)
            .await?;
        self.quests
            .advance_achievement(player_id, AchievementId::Perfectionist, perfect_hits)
            .await?;
        self.quests
            .advance_achievement(player_id, AchievementId::ComboMaster, max_combo)
            .await?;
        self.quests
            .advance_quests(player_id, QuestType::Battle, 1)
            .await?;
        self.quests
            .advance_quests(player_id, QuestType::Collection, perfect_hits)
            .await?;

        let level_up = self.check_level_up(player_id).await?;
        info!(
            player_id = %player_id,
            exp = reward.exp,
            money = reward.money,
            level_up = ?level_up,
            "Battle rewards applied"
        );

        Ok(RewardOutcome {
            exp: reward.exp,
            money: reward.money,
            level_up,
        })
    }

    /// Apply every level-up the stored experience allows. Returns the new level, if any.
    pub async fn check_level_up(&self, player_id: PlayerId) -> Result<Option<u32>, EngineError> {
        let mut player = self.load(player_id).await?;
        let Some(level) = player.apply_level_ups() else {
            return Ok(None);
        };

        self.players
            .update_level(player_id, level, player.max_health, player.max_energy)
            .await?;
        info!(player_id = %player_id, level, "Level up");
        Ok(Some(level))
    }

    /// Pay out a narrative choice. Any scene energy cost is spent first.
    #[instrument(skip(self))]
    pub async fn process_story_choice(
        &self,
        player_id: PlayerId,
        choice_id: &str,
        scene: &SceneData,
    ) -> Result<StoryOutcome, EngineError> {
        self.load(player_id).await?;

        if scene.energy_cost > 0 {
            self.energy.use_energy(player_id, scene.energy_cost).await?;
        }

        let choice = story_choice_reward(choice_id);
        for (character, amount) in &choice.relationships {
            self.players
                .update_relationship(player_id, *character, *amount)
                .await?;
        }
        if choice.reward.exp > 0 {
            self.players.add_experience(player_id, choice.reward.exp).await?;
        }
        if choice.reward.money > 0 {
            self.players.add_money(player_id, choice.reward.money).await?;
        }

        if choice.reported_relationship > 0 {
            self.quests
                .advance_achievement(
                    player_id,
                    AchievementId::PicoFriend,
                    choice.reported_relationship.unsigned_abs(),
                )
                .await?;
        }
        self.quests
            .advance_quests(player_id, QuestType::Social, 1)
            .await?;

        let level_up = self.check_level_up(player_id).await?;
        info!(player_id = %player_id, choice_id, "Story choice processed");

        Ok(StoryOutcome {
            exp: choice.reward.exp,
            money: choice.reward.money,
            relationship: choice.reported_relationship,
            level_up,
        })
    }

    async fn load(&self, player_id: PlayerId) -> Result<Player, EngineError> {
        self.players
            .get_player(player_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Player", player_id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use mockall::predicate::*;

    use super::*;
    use crate::application::ports::outbound::{
        MockClockPort, MockPlayerRepositoryPort, MockQuestRepositoryPort, MockRandomPort,
    };
    use crate::domain::value_objects::StoryCharacter;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap()
    }

    fn clock() -> Arc<MockClockPort> {
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(now);
        Arc::new(clock)
    }

    /// Player repository backed by a shared player record
    fn shared_player_repo(player: Arc<Mutex<Player>>) -> MockPlayerRepositoryPort {
        let mut repo = MockPlayerRepositoryPort::new();
        {
            let player = player.clone();
            repo.expect_get_player()
                .returning(move |_| Ok(Some(player.lock().unwrap().clone())));
        }
        {
            let player = player.clone();
            repo.expect_add_experience().returning(move |_, amount| {
                player.lock().unwrap().exp += amount;
                Ok(())
            });
        }
        {
            let player = player.clone();
            repo.expect_add_money().returning(move |_, amount| {
                player.lock().unwrap().money += amount;
                Ok(())
            });
        }
        {
            let player = player.clone();
            repo.expect_update_level()
                .returning(move |_, level, max_health, max_energy| {
                    let mut player = player.lock().unwrap();
                    player.level = level;
                    player.max_health = max_health;
                    player.max_energy = max_energy;
                    Ok(())
                });
        }
        {
            let player = player.clone();
            repo.expect_update_energy()
                .returning(move |_, energy, at| {
                    let mut player = player.lock().unwrap();
                    player.energy = energy;
                    player.last_energy_update = at;
                    Ok(())
                });
        }
        repo
    }

    fn service(
        players: MockPlayerRepositoryPort,
        quests: MockQuestRepositoryPort,
    ) -> ProgressionService {
        let players: Arc<dyn PlayerRepositoryPort> = Arc::new(players);
        let quests = Arc::new(QuestService::new(
            Arc::new(quests),
            clock(),
            Arc::new(MockRandomPort::new()),
        ));
        let energy = Arc::new(EnergyService::new(
            players.clone(),
            clock(),
            Duration::minutes(5),
        ));
        ProgressionService::new(players, quests, energy)
    }

    #[tokio::test]
    async fn test_battle_rewards_credit_and_level_up() {
        let player = Arc::new(Mutex::new(Player::new(7, None, "Ace", now())));
        player.lock().unwrap().exp = 40;
        let player_id = player.lock().unwrap().id;

        let mut quests = MockQuestRepositoryPort::new();
        quests
            .expect_update_achievement_progress()
            .with(eq(player_id), eq(AchievementId::FirstBlood), eq(1), always())
            .times(1)
            .returning(|_, _, _, _| Ok(true));
        quests
            .expect_update_achievement_progress()
            .with(eq(player_id), eq(AchievementId::Perfectionist), eq(30), always())
            .times(1)
            .returning(|_, _, _, _| Ok(false));
        quests
            .expect_update_achievement_progress()
            .with(eq(player_id), eq(AchievementId::ComboMaster), eq(45), always())
            .times(1)
            .returning(|_, _, _, _| Ok(false));
        quests
            .expect_update_quest_progress()
            .with(eq(player_id), eq(QuestType::Battle), eq(1), always())
            .times(1)
            .returning(|_, _, _, _| Ok(0));
        quests
            .expect_update_quest_progress()
            .with(eq(player_id), eq(QuestType::Collection), eq(30), always())
            .times(1)
            .returning(|_, _, _, _| Ok(1));

        let service = service(shared_player_repo(player.clone()), quests);
        let outcome = service
            .apply_battle_rewards(player_id, 12_500, 45, 30)
            .await
            .unwrap();

        // 40 + 126 = 166 exp crosses the level-1 threshold of 100
        assert_eq!(outcome.exp, 126);
        assert_eq!(outcome.money, 63);
        assert_eq!(outcome.level_up, Some(2));

        let player = player.lock().unwrap();
        assert_eq!(player.exp, 166);
        assert_eq!(player.money, 163);
        assert_eq!(player.max_health, 110);
        assert_eq!(player.max_energy, 105);
    }

    #[tokio::test]
    async fn test_fresh_player_reward_below_first_threshold() {
        let player = Arc::new(Mutex::new(Player::new(9, None, "Rookie", now())));
        let player_id = player.lock().unwrap().id;

        let mut quests = MockQuestRepositoryPort::new();
        quests
            .expect_update_achievement_progress()
            .returning(|_, _, _, _| Ok(false));
        quests
            .expect_update_quest_progress()
            .returning(|_, _, _, _| Ok(0));

        let outcome = service(shared_player_repo(player.clone()), quests)
            .apply_battle_rewards(player_id, 3000, 30, 10)
            .await
            .unwrap();

        // exp: 50 + 3 + 3 + 20, money: 25 + 1 + 1 + 10
        assert_eq!(outcome.exp, 76);
        assert_eq!(outcome.money, 37);
        assert_eq!(outcome.level_up, None);

        let player = player.lock().unwrap();
        assert_eq!((player.level, player.exp), (1, 76));
        assert_eq!((player.max_health, player.max_energy), (100, 100));
    }

    #[tokio::test]
    async fn test_story_choice_help_pico() {
        let player = Arc::new(Mutex::new(Player::new(8, None, "Bee", now())));
        let player_id = player.lock().unwrap().id;

        let mut players = shared_player_repo(player.clone());
        players
            .expect_update_relationship()
            .with(eq(player_id), eq(StoryCharacter::Pico), eq(15))
            .times(1)
            .returning(|_, _, _| Ok(()));
        players
            .expect_update_relationship()
            .with(eq(player_id), eq(StoryCharacter::Boyfriend), eq(5))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut quests = MockQuestRepositoryPort::new();
        quests
            .expect_update_achievement_progress()
            .with(eq(player_id), eq(AchievementId::PicoFriend), eq(15), always())
            .times(1)
            .returning(|_, _, _, _| Ok(false));
        quests
            .expect_update_quest_progress()
            .with(eq(player_id), eq(QuestType::Social), eq(1), always())
            .times(1)
            .returning(|_, _, _, _| Ok(0));

        let outcome = service(players, quests)
            .process_story_choice(player_id, "help_pico", &SceneData::default())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            StoryOutcome {
                exp: 50,
                money: 100,
                relationship: 15,
                level_up: None,
            }
        );
        assert_eq!(player.lock().unwrap().money, 200);
    }

    #[tokio::test]
    async fn test_story_choice_without_energy_pays_nothing() {
        let mut starting = Player::new(9, None, "Cee", now());
        starting.energy = 3;
        let player = Arc::new(Mutex::new(starting));
        let player_id = player.lock().unwrap().id;

        let mut players = shared_player_repo(player.clone());
        players.expect_update_relationship().never();
        let mut quests = MockQuestRepositoryPort::new();
        quests.expect_update_quest_progress().never();

        let scene = SceneData {
            scene_id: Some("alley".to_string()),
            energy_cost: 10,
        };
        let result = service(players, quests)
            .process_story_choice(player_id, "challenge_battle", &scene)
            .await;

        assert!(matches!(
            result,
            Err(EngineError::InsufficientResource { required: 10, .. })
        ));
        assert_eq!(player.lock().unwrap().exp, 0);
    }
}
