//! Battle session - the per-player rhythm battle state machine
//!
//! A session starts `Active` with its cursor on the first note. Every input
//! judges exactly one note and advances the cursor; when the cursor reaches
//! the end the session becomes `Complete` and is frozen for summary
//! extraction. There is no way back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ArrowSet, BattleId, PlayerId, TimingAccuracy};

use super::Song;

/// Nominal spacing between consecutive notes, in seconds
pub const NOTE_SPACING_SECS: f64 = 0.8;

/// One note of a generated pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub index: usize,
    pub arrows: ArrowSet,
    /// Advisory offset from the start of the song, in seconds
    pub timing: f64,
}

impl NoteEvent {
    pub fn new(index: usize, arrows: ArrowSet) -> Self {
        Self {
            index,
            arrows,
            timing: index as f64 * NOTE_SPACING_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleState {
    Active,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("Battle is already complete")]
    AlreadyComplete,
    #[error("Battle is still in progress")]
    NotComplete,
}

/// How a single note was judged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "accuracy", rename_all = "snake_case")]
pub enum NoteJudgement {
    Hit(TimingAccuracy),
    Miss,
}

/// Outcome of feeding one input to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteResult {
    pub note_index: usize,
    pub judgement: NoteJudgement,
    /// Score added by this note (base points × combo after the update)
    pub points: u64,
    pub combo: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BattleSession {
    id: BattleId,
    player_id: PlayerId,
    song_id: String,
    song_name: String,
    energy_cost: u32,
    notes: Vec<NoteEvent>,
    current_note: usize,
    perfect_hits: u32,
    good_hits: u32,
    bad_hits: u32,
    missed: u32,
    combo: u32,
    max_combo: u32,
    score: u64,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl BattleSession {
    pub fn new(
        player_id: PlayerId,
        song: &Song,
        notes: Vec<NoteEvent>,
        started_at: DateTime<Utc>,
    ) -> Self {
        assert!(!notes.is_empty(), "a battle needs at least one note");
        Self {
            id: BattleId::new(),
            player_id,
            song_id: song.id.clone(),
            song_name: song.name.clone(),
            energy_cost: song.energy_cost,
            notes,
            current_note: 0,
            perfect_hits: 0,
            good_hits: 0,
            bad_hits: 0,
            missed: 0,
            combo: 0,
            max_combo: 0,
            score: 0,
            started_at,
            ended_at: None,
        }
    }

    /// Judge the current note against the submitted arrows.
    ///
    /// A note is hit when the submitted set equals the required set. The
    /// score added is `base_points × combo` using the combo *after* this
    /// note is applied, so a combo-breaking bad hit adds nothing.
    pub fn process_input(
        &mut self,
        submitted: &ArrowSet,
        accuracy: TimingAccuracy,
        now: DateTime<Utc>,
    ) -> Result<NoteResult, BattleError> {
        if self.is_complete() {
            return Err(BattleError::AlreadyComplete);
        }
        assert!(self.current_note < self.notes.len());

        let note = &self.notes[self.current_note];
        let judgement = if *submitted == note.arrows {
            NoteJudgement::Hit(accuracy)
        } else {
            NoteJudgement::Miss
        };

        let base_points = match judgement {
            NoteJudgement::Hit(accuracy) => {
                match accuracy {
                    TimingAccuracy::Perfect => self.perfect_hits += 1,
                    TimingAccuracy::Good => self.good_hits += 1,
                    TimingAccuracy::Bad => self.bad_hits += 1,
                }
                if accuracy.keeps_combo() {
                    self.combo += 1;
                } else {
                    self.combo = 0;
                }
                accuracy.base_points()
            }
            NoteJudgement::Miss => {
                self.missed += 1;
                self.combo = 0;
                0
            }
        };

        let points = u64::from(base_points) * u64::from(self.combo);
        self.score += points;
        self.max_combo = self.max_combo.max(self.combo);

        let result = NoteResult {
            note_index: self.current_note,
            judgement,
            points,
            combo: self.combo,
        };

        self.current_note += 1;
        if self.current_note == self.notes.len() {
            self.ended_at = Some(now);
        }

        Ok(result)
    }

    pub fn state(&self) -> BattleState {
        if self.current_note == self.notes.len() {
            BattleState::Complete
        } else {
            BattleState::Active
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == BattleState::Complete
    }

    /// The note awaiting input, if any
    pub fn next_note(&self) -> Option<&NoteEvent> {
        self.notes.get(self.current_note)
    }

    /// Seconds between start and the final note; `None` while active
    pub fn duration_secs(&self) -> Option<f64> {
        self.ended_at.map(|ended| {
            let elapsed = (ended - self.started_at).num_milliseconds().max(0);
            elapsed as f64 / 1000.0
        })
    }

    pub fn id(&self) -> BattleId {
        self.id
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn song_id(&self) -> &str {
        &self.song_id
    }

    pub fn song_name(&self) -> &str {
        &self.song_name
    }

    pub fn energy_cost(&self) -> u32 {
        self.energy_cost
    }

    pub fn notes(&self) -> &[NoteEvent] {
        &self.notes
    }

    pub fn total_notes(&self) -> usize {
        self.notes.len()
    }

    /// Number of notes judged so far (hits and misses alike)
    pub fn current_note(&self) -> usize {
        self.current_note
    }

    pub fn perfect_hits(&self) -> u32 {
        self.perfect_hits
    }

    pub fn good_hits(&self) -> u32 {
        self.good_hits
    }

    pub fn bad_hits(&self) -> u32 {
        self.bad_hits
    }

    pub fn missed(&self) -> u32 {
        self.missed
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::entities::SongCatalog;
    use crate::domain::value_objects::Arrow;

    fn session_with(arrows: Vec<ArrowSet>) -> BattleSession {
        let catalog = SongCatalog::builtin();
        let song = catalog.get("tutorial").expect("tutorial song");
        let notes = arrows
            .into_iter()
            .enumerate()
            .map(|(i, a)| NoteEvent::new(i, a))
            .collect();
        BattleSession::new(PlayerId::new(), song, notes, Utc::now())
    }

    fn left() -> ArrowSet {
        ArrowSet::single(Arrow::Left)
    }

    #[test]
    fn test_note_timing_offsets() {
        let note = NoteEvent::new(5, left());
        assert!((note.timing - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_correct_hits_build_combo_and_score() {
        let mut session = session_with(vec![left(); 3]);
        let now = session.started_at();

        let first = session.process_input(&left(), TimingAccuracy::Perfect, now).expect("active");
        assert_eq!(first.points, 100);
        let second = session.process_input(&left(), TimingAccuracy::Good, now).expect("active");
        assert_eq!(second.points, 100); // 50 × combo 2
        assert_eq!(session.combo(), 2);
        assert_eq!(session.score(), 200);
        assert_eq!(session.state(), BattleState::Active);
    }

    #[test]
    fn test_bad_hit_breaks_combo_and_scores_nothing() {
        let mut session = session_with(vec![left(); 3]);
        let now = session.started_at();

        session.process_input(&left(), TimingAccuracy::Perfect, now).expect("active");
        let bad = session.process_input(&left(), TimingAccuracy::Bad, now).expect("active");

        assert_eq!(bad.judgement, NoteJudgement::Hit(TimingAccuracy::Bad));
        assert_eq!(bad.points, 0);
        assert_eq!(session.combo(), 0);
        assert_eq!(session.bad_hits(), 1);
        assert_eq!(session.max_combo(), 1);
    }

    #[test]
    fn test_wrong_arrows_count_as_miss() {
        let chord: ArrowSet = [Arrow::Up, Arrow::Down].into_iter().collect();
        let mut session = session_with(vec![chord.clone(), chord]);
        let now = session.started_at();

        let partial = ArrowSet::single(Arrow::Up);
        let result = session.process_input(&partial, TimingAccuracy::Perfect, now).expect("active");
        assert_eq!(result.judgement, NoteJudgement::Miss);
        assert_eq!(session.missed(), 1);
        assert_eq!(session.perfect_hits(), 0);

        let none = ArrowSet::new();
        let result = session.process_input(&none, TimingAccuracy::Perfect, now).expect("active");
        assert_eq!(result.judgement, NoteJudgement::Miss);
        assert_eq!(session.missed(), 2);
    }

    #[test]
    fn test_order_and_duplicates_do_not_matter() {
        let chord: ArrowSet = [Arrow::Left, Arrow::Right].into_iter().collect();
        let mut session = session_with(vec![chord]);

        let pressed: ArrowSet = [Arrow::Right, Arrow::Left, Arrow::Right].into_iter().collect();
        let result = session
            .process_input(&pressed, TimingAccuracy::Perfect, session.started_at())
            .expect("active");
        assert_eq!(result.judgement, NoteJudgement::Hit(TimingAccuracy::Perfect));
    }

    #[test]
    fn test_misses_after_streak_keep_max_combo() {
        let mut session = session_with(vec![left(); 15]);
        let now = session.started_at();

        for _ in 0..10 {
            session.process_input(&left(), TimingAccuracy::Perfect, now).expect("active");
        }
        assert_eq!(session.combo(), 10);

        let wrong = ArrowSet::single(Arrow::Right);
        let first_miss = session.process_input(&wrong, TimingAccuracy::Perfect, now).expect("active");
        assert_eq!(first_miss.combo, 0);
        for _ in 0..4 {
            session.process_input(&wrong, TimingAccuracy::Perfect, now).expect("active");
        }

        assert_eq!(session.combo(), 0);
        assert_eq!(session.max_combo(), 10);
        assert_eq!(session.missed(), 5);
        assert!(session.is_complete());
    }

    #[test]
    fn test_completion_freezes_session() {
        let mut session = session_with(vec![left(); 2]);
        let start = session.started_at();

        session.process_input(&left(), TimingAccuracy::Good, start).expect("active");
        assert_eq!(session.duration_secs(), None);

        let end = start + Duration::seconds(42);
        session.process_input(&left(), TimingAccuracy::Good, end).expect("active");

        assert!(session.is_complete());
        assert!(session.next_note().is_none());
        assert_eq!(session.ended_at(), Some(end));
        assert_eq!(session.duration_secs(), Some(42.0));

        let err = session.process_input(&left(), TimingAccuracy::Good, end).unwrap_err();
        assert_eq!(err, BattleError::AlreadyComplete);
        assert_eq!(session.current_note(), 2);
        assert_eq!(session.score(), 150);
    }

    #[test]
    fn test_score_replays_from_recorded_inputs() {
        let inputs = [
            (true, TimingAccuracy::Perfect),
            (true, TimingAccuracy::Perfect),
            (false, TimingAccuracy::Perfect),
            (true, TimingAccuracy::Good),
            (true, TimingAccuracy::Bad),
            (true, TimingAccuracy::Good),
        ];
        let mut session = session_with(vec![left(); inputs.len()]);
        let now = session.started_at();

        let mut expected = 0;
        let mut combo = 0;
        for (correct, accuracy) in inputs {
            let pressed = if correct { left() } else { ArrowSet::new() };
            session.process_input(&pressed, accuracy, now).expect("active");

            let base = if correct { u64::from(accuracy.base_points()) } else { 0 };
            combo = if correct && accuracy.keeps_combo() { combo + 1 } else { 0 };
            expected += base * combo;
        }

        // 100 + 200 + 0 + 50 + 0 + 50
        assert_eq!(expected, 400);
        assert_eq!(session.score(), expected);
    }

    #[test]
    fn test_long_song_score_exceeds_u32() {
        let json = r#"[
            {"id": "marathon", "name": "Marathon", "note_count": 10000, "difficulty": 1,
             "energy_cost": 1, "duration_minutes": 140}
        ]"#;
        let catalog = SongCatalog::from_json(json).expect("valid catalog");
        let song = catalog.get("marathon").expect("marathon song");
        let notes = (0..song.note_count).map(|i| NoteEvent::new(i, left())).collect();
        let mut session = BattleSession::new(PlayerId::new(), song, notes, Utc::now());
        let now = session.started_at();

        while !session.is_complete() {
            session
                .process_input(&left(), TimingAccuracy::Perfect, now)
                .expect("active");
        }

        // 100 × (1 + 2 + ... + 10000)
        assert_eq!(session.score(), 5_000_500_000);
        assert!(session.score() > u64::from(u32::MAX));
        assert_eq!(session.max_combo(), 10_000);
    }
}
