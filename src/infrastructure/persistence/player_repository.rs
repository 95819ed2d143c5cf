use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteQueryResult;
use sqlx::{FromRow, SqlitePool};

use crate::application::ports::outbound::{PlayerRepositoryPort, RepoError};
use crate::domain::entities::{InventoryItem, Player, PlayerStats, SkillAttributes, StoryProgress};
use crate::domain::value_objects::{PlayerId, StoryCharacter};

const PLAYER_COLUMNS: &str = "id, external_id, username, display_name, level, exp, money, \
     health, max_health, energy, max_energy, last_energy_update, rhythm, charisma, strength, \
     created_at";

#[derive(FromRow)]
struct PlayerRow {
    id: String,
    external_id: i64,
    username: Option<String>,
    display_name: String,
    level: u32,
    exp: u32,
    money: u32,
    health: u32,
    max_health: u32,
    energy: u32,
    max_energy: u32,
    last_energy_update: DateTime<Utc>,
    rhythm: u32,
    charisma: u32,
    strength: u32,
    created_at: DateTime<Utc>,
}

impl TryFrom<PlayerRow> for Player {
    type Error = RepoError;

    fn try_from(row: PlayerRow) -> Result<Self, Self::Error> {
        Ok(Player {
            id: row
                .id
                .parse()
                .map_err(|e| RepoError::serialization(format!("player id {}: {}", row.id, e)))?,
            external_id: row.external_id,
            username: row.username,
            display_name: row.display_name,
            level: row.level,
            exp: row.exp,
            money: row.money,
            health: row.health,
            max_health: row.max_health,
            energy: row.energy,
            max_energy: row.max_energy,
            last_energy_update: row.last_energy_update,
            skills: SkillAttributes {
                rhythm: row.rhythm,
                charisma: row.charisma,
                strength: row.strength,
            },
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct StoryRow {
    chapter: u32,
    pico_relationship: i32,
    boyfriend_relationship: i32,
}

#[derive(FromRow)]
struct StatsRow {
    total_battles: u32,
    battles_won: u32,
    perfect_scores: u32,
    max_combo: u32,
    money_earned: u32,
    total_play_secs: f64,
}

#[derive(FromRow)]
struct InventoryRow {
    item_id: String,
    name: String,
    quantity: u32,
}

pub struct SqlitePlayerRepository {
    pool: SqlitePool,
}

impl SqlitePlayerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Map an UPDATE result, treating "no row matched" as an unknown player
fn expect_player_row(
    operation: &'static str,
    id: PlayerId,
    result: Result<SqliteQueryResult, sqlx::Error>,
) -> Result<(), RepoError> {
    let result = result.map_err(|e| RepoError::database(operation, e))?;
    if result.rows_affected() == 0 {
        return Err(RepoError::not_found("Player", id));
    }
    Ok(())
}

#[async_trait]
impl PlayerRepositoryPort for SqlitePlayerRepository {
    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, RepoError> {
        let sql = format!("SELECT {} FROM players WHERE id = ?", PLAYER_COLUMNS);
        let row: Option<PlayerRow> = sqlx::query_as(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_player", e))?;
        row.map(Player::try_from).transpose()
    }

    async fn get_player_by_external_id(&self, external_id: i64) -> Result<Option<Player>, RepoError> {
        let sql = format!("SELECT {} FROM players WHERE external_id = ?", PLAYER_COLUMNS);
        let row: Option<PlayerRow> = sqlx::query_as(&sql)
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_player_by_external_id", e))?;
        row.map(Player::try_from).transpose()
    }

    async fn create_player(&self, player: &Player, starter_items: &[InventoryItem]) -> Result<(), RepoError> {
        let id = player.id.to_string();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("create_player", e))?;

        sqlx::query(
            r#"
            INSERT INTO players (id, external_id, username, display_name, level, exp, money,
                health, max_health, energy, max_energy, last_energy_update,
                rhythm, charisma, strength, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(player.external_id)
        .bind(&player.username)
        .bind(&player.display_name)
        .bind(player.level)
        .bind(player.exp)
        .bind(player.money)
        .bind(player.health)
        .bind(player.max_health)
        .bind(player.energy)
        .bind(player.max_energy)
        .bind(player.last_energy_update)
        .bind(player.skills.rhythm)
        .bind(player.skills.charisma)
        .bind(player.skills.strength)
        .bind(player.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::constraint(format!(
                "Player with external id {} already exists",
                player.external_id
            )),
            _ => RepoError::database("create_player", e),
        })?;

        sqlx::query("INSERT INTO story_progress (player_id) VALUES (?)")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("create_player", e))?;

        sqlx::query("INSERT INTO player_stats (player_id) VALUES (?)")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("create_player", e))?;

        for item in starter_items {
            sqlx::query(
                "INSERT INTO inventory (player_id, item_id, name, quantity) VALUES (?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(&item.item_id)
            .bind(&item.name)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("create_player", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("create_player", e))
    }

    async fn update_energy(&self, id: PlayerId, energy: u32, updated_at: DateTime<Utc>) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE players SET energy = ?, last_energy_update = ? WHERE id = ?")
            .bind(energy)
            .bind(updated_at)
            .bind(id.to_string())
            .execute(&self.pool)
            .await;
        expect_player_row("update_energy", id, result)
    }

    async fn add_experience(&self, id: PlayerId, amount: u32) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE players SET exp = MIN(exp + ?, 4294967295) WHERE id = ?")
            .bind(amount)
            .bind(id.to_string())
            .execute(&self.pool)
            .await;
        expect_player_row("add_experience", id, result)
    }

    async fn add_money(&self, id: PlayerId, amount: u32) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("add_money", e))?;

        let result = sqlx::query("UPDATE players SET money = MIN(money + ?, 4294967295) WHERE id = ?")
            .bind(amount)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await;
        expect_player_row("add_money", id, result)?;

        sqlx::query("UPDATE player_stats SET money_earned = MIN(money_earned + ?, 4294967295) WHERE player_id = ?")
            .bind(amount)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("add_money", e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("add_money", e))
    }

    async fn update_level(&self, id: PlayerId, level: u32, max_health: u32, max_energy: u32) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE players SET level = ?, max_health = ?, max_energy = ? WHERE id = ?")
            .bind(level)
            .bind(max_health)
            .bind(max_energy)
            .bind(id.to_string())
            .execute(&self.pool)
            .await;
        expect_player_row("update_level", id, result)
    }

    async fn update_relationship(&self, id: PlayerId, character: StoryCharacter, amount: i32) -> Result<(), RepoError> {
        let sql = match character {
            StoryCharacter::Pico => {
                "UPDATE story_progress SET pico_relationship = pico_relationship + ? WHERE player_id = ?"
            }
            StoryCharacter::Boyfriend => {
                "UPDATE story_progress SET boyfriend_relationship = boyfriend_relationship + ? WHERE player_id = ?"
            }
        };
        let result = sqlx::query(sql)
            .bind(amount)
            .bind(id.to_string())
            .execute(&self.pool)
            .await;
        expect_player_row("update_relationship", id, result)
    }

    async fn get_story_progress(&self, id: PlayerId) -> Result<StoryProgress, RepoError> {
        let row: Option<StoryRow> = sqlx::query_as(
            "SELECT chapter, pico_relationship, boyfriend_relationship FROM story_progress WHERE player_id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_story_progress", e))?;

        let row = row.ok_or_else(|| RepoError::not_found("Player", id))?;
        Ok(StoryProgress {
            chapter: row.chapter,
            pico_relationship: row.pico_relationship,
            boyfriend_relationship: row.boyfriend_relationship,
        })
    }

    async fn get_stats(&self, id: PlayerId) -> Result<PlayerStats, RepoError> {
        let row: Option<StatsRow> = sqlx::query_as(
            r#"
            SELECT total_battles, battles_won, perfect_scores, max_combo, money_earned, total_play_secs
            FROM player_stats WHERE player_id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_stats", e))?;

        let row = row.ok_or_else(|| RepoError::not_found("Player", id))?;
        Ok(PlayerStats {
            total_battles: row.total_battles,
            battles_won: row.battles_won,
            perfect_scores: row.perfect_scores,
            max_combo: row.max_combo,
            money_earned: row.money_earned,
            total_play_secs: row.total_play_secs,
        })
    }

    async fn get_inventory(&self, id: PlayerId) -> Result<Vec<InventoryItem>, RepoError> {
        let rows: Vec<InventoryRow> = sqlx::query_as(
            "SELECT item_id, name, quantity FROM inventory WHERE player_id = ? ORDER BY item_id",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_inventory", e))?;

        Ok(rows
            .into_iter()
            .map(|row| InventoryItem::new(row.item_id, row.name, row.quantity))
            .collect())
    }
}
