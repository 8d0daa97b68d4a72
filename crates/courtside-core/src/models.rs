use std::fmt;

use sha2::{Digest, Sha256};

/// Identifier of a team, player or game.
///
/// Rows mix real identifiers with fallbacks, so the variant records where
/// the text came from. Every variant renders as its plain text in tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityId {
    /// Numeric id parsed from a link, or the configured team id.
    Resolved(String),
    /// Positional stand-in when a link carried no id (`p_3`, `unknown`).
    Placeholder(String),
    /// Display name used as-is because nothing matched it.
    RawName(String),
}

impl EntityId {
    pub fn as_str(&self) -> &str {
        match self {
            EntityId::Resolved(s) | EntityId::Placeholder(s) | EntityId::RawName(s) => s,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, EntityId::Resolved(_))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full per-game stat set shared by box scores and season logs.
///
/// Values are the trimmed cell text, never coerced to numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatLine {
    pub points: String,
    pub fg2_made: String,
    pub fg2_attempted: String,
    pub fg3_made: String,
    pub fg3_attempted: String,
    pub ft_made: String,
    pub ft_attempted: String,
    pub off_rebounds: String,
    pub def_rebounds: String,
    pub rebounds: String,
    pub assists: String,
    pub steals: String,
    pub blocks: String,
    pub fouls: String,
    pub turnovers: String,
}

impl StatLine {
    pub const HEADERS: [&'static str; 15] = [
        "得分",
        "兩分球進",
        "兩分球投",
        "三分球進",
        "三分球投",
        "罰球進",
        "罰球投",
        "進攻籃板",
        "防守籃板",
        "籃板",
        "助攻",
        "抄截",
        "阻攻",
        "犯規",
        "失誤",
    ];

    fn push_fields(&self, out: &mut Vec<String>) {
        out.extend(
            [
                &self.points,
                &self.fg2_made,
                &self.fg2_attempted,
                &self.fg3_made,
                &self.fg3_attempted,
                &self.ft_made,
                &self.ft_attempted,
                &self.off_rebounds,
                &self.def_rebounds,
                &self.rebounds,
                &self.assists,
                &self.steals,
                &self.blocks,
                &self.fouls,
                &self.turnovers,
            ]
            .into_iter()
            .cloned(),
        );
    }
}

/// A row of one output table.
pub trait TableRow {
    /// File stem of the persisted table.
    const TABLE: &'static str;
    /// Header labels, in column order. Consumers key on these exact labels.
    const HEADERS: &'static [&'static str];

    /// Field values in header order.
    fn record(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRow {
    pub team_id: EntityId,
    pub name: String,
    pub logo: String,
    pub cover: String,
    pub ppg: String,
    pub rpg: String,
    pub apg: String,
    pub oppg: String,
}

impl TableRow for TeamRow {
    const TABLE: &'static str = "teams";
    const HEADERS: &'static [&'static str] = &[
        "球隊ID",
        "球隊名稱",
        "隊徽",
        "封面",
        "場均得分",
        "場均籃板",
        "場均助攻",
        "場均失分",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.team_id.to_string(),
            self.name.clone(),
            self.logo.clone(),
            self.cover.clone(),
            self.ppg.clone(),
            self.rpg.clone(),
            self.apg.clone(),
            self.oppg.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub player_id: EntityId,
    pub name: String,
    pub photo: String,
}

impl TableRow for PlayerRow {
    const TABLE: &'static str = "players";
    const HEADERS: &'static [&'static str] = &["球員ID", "球員姓名", "照片"];

    fn record(&self) -> Vec<String> {
        vec![
            self.player_id.to_string(),
            self.name.clone(),
            self.photo.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub team_id: EntityId,
    pub player_id: EntityId,
    pub number: String,
}

impl TableRow for RosterRow {
    const TABLE: &'static str = "team_roster";
    const HEADERS: &'static [&'static str] = &["球隊ID", "球員ID", "號碼"];

    fn record(&self) -> Vec<String> {
        vec![
            self.team_id.to_string(),
            self.player_id.to_string(),
            self.number.clone(),
        ]
    }
}

/// A scheduled game. The away side is the opponent's display name; it is
/// never resolved to a team id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRow {
    pub game_id: EntityId,
    pub season_id: String,
    pub date: String,
    pub home_team_id: EntityId,
    pub away_team: EntityId,
    pub home_score: String,
    pub away_score: String,
}

impl TableRow for GameRow {
    const TABLE: &'static str = "games";
    const HEADERS: &'static [&'static str] = &[
        "賽事編號",
        "季度ID",
        "日期",
        "主隊ID",
        "客隊ID",
        "主隊得分",
        "客隊得分",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.game_id.to_string(),
            self.season_id.clone(),
            self.date.clone(),
            self.home_team_id.to_string(),
            self.away_team.to_string(),
            self.home_score.clone(),
            self.away_score.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameTeamStatRow {
    pub game_id: EntityId,
    pub team_id: EntityId,
    pub quarters: [String; 4],
    pub total: u32,
}

impl TableRow for GameTeamStatRow {
    const TABLE: &'static str = "game_team_stats";
    const HEADERS: &'static [&'static str] = &[
        "賽事編號",
        "球隊ID",
        "第一節",
        "第二節",
        "第三節",
        "第四節",
        "總分",
    ];

    fn record(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(Self::HEADERS.len());
        out.push(self.game_id.to_string());
        out.push(self.team_id.to_string());
        out.extend(self.quarters.iter().cloned());
        out.push(self.total.to_string());
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePlayerStatRow {
    pub game_id: EntityId,
    pub player_id: EntityId,
    pub team_id: EntityId,
    pub stats: StatLine,
}

impl TableRow for GamePlayerStatRow {
    const TABLE: &'static str = "game_player_stats";
    const HEADERS: &'static [&'static str] = &[
        "賽事編號",
        "球員ID",
        "球隊ID",
        "得分",
        "兩分球進",
        "兩分球投",
        "三分球進",
        "三分球投",
        "罰球進",
        "罰球投",
        "進攻籃板",
        "防守籃板",
        "籃板",
        "助攻",
        "抄截",
        "阻攻",
        "犯規",
        "失誤",
    ];

    fn record(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(Self::HEADERS.len());
        out.push(self.game_id.to_string());
        out.push(self.player_id.to_string());
        out.push(self.team_id.to_string());
        self.stats.push_fields(&mut out);
        out
    }
}

/// One appearance from a player's own page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSeasonLogRow {
    pub player_id: EntityId,
    pub player_name: String,
    pub date: String,
    pub opponent: String,
    pub stats: StatLine,
}

impl TableRow for PlayerSeasonLogRow {
    const TABLE: &'static str = "player_season_logs";
    const HEADERS: &'static [&'static str] = &[
        "球員ID",
        "球員姓名",
        "日期",
        "對手",
        "得分",
        "兩分球進",
        "兩分球投",
        "三分球進",
        "三分球投",
        "罰球進",
        "罰球投",
        "進攻籃板",
        "防守籃板",
        "籃板",
        "助攻",
        "抄截",
        "阻攻",
        "犯規",
        "失誤",
    ];

    fn record(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(Self::HEADERS.len());
        out.push(self.player_id.to_string());
        out.push(self.player_name.clone());
        out.push(self.date.clone());
        out.push(self.opponent.clone());
        self.stats.push_fields(&mut out);
        out
    }
}

/// Every row set produced by one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tables {
    pub teams: Vec<TeamRow>,
    pub players: Vec<PlayerRow>,
    pub roster: Vec<RosterRow>,
    pub games: Vec<GameRow>,
    pub game_team_stats: Vec<GameTeamStatRow>,
    pub game_player_stats: Vec<GamePlayerStatRow>,
    pub season_logs: Vec<PlayerSeasonLogRow>,
}

/// Compute a SHA-256 hash of some bytes, returned as 64-char hex.
pub fn compute_hash(content: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_ref());
    format!("{:x}", hasher.finalize())
}
