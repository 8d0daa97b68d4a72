//! Stable identifiers for teams, players and games.

use std::collections::HashMap;

use url::Url;

use crate::models::{EntityId, PlayerRow};

/// Game id used when a result link carries no `id` parameter. Not unique.
pub const UNKNOWN_GAME_ID: &str = "unknown";

/// Digits of the `id` query parameter of a profile or result link.
///
/// Relative links are accepted.
pub fn id_param(link: &str) -> Option<String> {
    let base = Url::parse("http://localhost/").ok()?;
    let url = base.join(link.trim()).ok()?;
    url.query_pairs()
        .find(|(key, value)| {
            key == "id" && !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
        })
        .map(|(_, value)| value.into_owned())
}

/// Player id from a profile link, or `p_<index>` by roster position.
pub fn player_id(link: Option<&str>, index: usize) -> EntityId {
    match link.and_then(id_param) {
        Some(id) => EntityId::Resolved(id),
        None => EntityId::Placeholder(format!("p_{index}")),
    }
}

/// Game id from a result link, or [`UNKNOWN_GAME_ID`].
pub fn game_id(link: Option<&str>) -> EntityId {
    match link.and_then(id_param) {
        Some(id) => EntityId::Resolved(id),
        None => EntityId::Placeholder(UNKNOWN_GAME_ID.to_string()),
    }
}

/// Drop a trailing jersey marker: `"陳世峰 #1"` → `"陳世峰"`.
pub fn strip_jersey_suffix(name: &str) -> &str {
    let name = name.trim();
    if let Some((head, number)) = name.rsplit_once('#') {
        let number = number.trim();
        if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
            return head.trim_end();
        }
    }
    name
}

/// The subject team's id when `name` is its display name, the raw name
/// otherwise.
pub fn team_ref(name: &str, team_name: &str, team_id: &EntityId) -> EntityId {
    if name == team_name {
        team_id.clone()
    } else {
        EntityId::RawName(name.to_string())
    }
}

/// Roster name → player id lookup used to correlate box-score lines.
///
/// Names are not unique; a later roster entry replaces an earlier one with
/// the same name.
#[derive(Debug, Clone, Default)]
pub struct PlayerIndex {
    by_name: HashMap<String, EntityId>,
}

impl PlayerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_players(players: &[PlayerRow]) -> Self {
        let mut index = Self::new();
        for player in players {
            index.insert(&player.name, player.player_id.clone());
        }
        index
    }

    pub fn insert(&mut self, name: &str, id: EntityId) {
        self.by_name.insert(name.to_string(), id);
    }

    /// Resolve a box-score name, falling back to the name itself.
    pub fn resolve(&self, box_score_name: &str) -> EntityId {
        let name = strip_jersey_suffix(box_score_name);
        self.by_name
            .get(name)
            .cloned()
            .unwrap_or_else(|| EntityId::RawName(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_param_from_links() {
        assert_eq!(
            id_param("https://basketball.biji.co/index.php?q=tools&act=player-info&id=501"),
            Some("501".into())
        );
        assert_eq!(
            id_param("/index.php?q=game&act=result&id=1001"),
            Some("1001".into())
        );
        assert_eq!(id_param("index.php?q=tools&id=7"), Some("7".into()));
        assert_eq!(id_param("index.php?q=tools&id=abc"), None);
        assert_eq!(id_param("index.php?q=tools"), None);
        assert_eq!(id_param(""), None);
    }

    #[test]
    fn id_param_ignores_suffixed_keys() {
        assert_eq!(id_param("/r?game_id=5&id=9"), Some("9".into()));
        assert_eq!(id_param("/r?game_id=5"), None);
    }

    #[test]
    fn player_id_falls_back_to_position() {
        assert_eq!(
            player_id(Some("/p?id=12"), 3),
            EntityId::Resolved("12".into())
        );
        assert_eq!(player_id(None, 3), EntityId::Placeholder("p_3".into()));
        assert_eq!(
            player_id(Some("/p?name=x"), 0),
            EntityId::Placeholder("p_0".into())
        );
    }

    #[test]
    fn game_id_falls_back_to_unknown() {
        assert_eq!(game_id(Some("/g?id=1001")), EntityId::Resolved("1001".into()));
        assert_eq!(game_id(None), EntityId::Placeholder("unknown".into()));
    }

    #[test]
    fn strip_jersey_suffix_variants() {
        assert_eq!(strip_jersey_suffix("陳世峰 #1"), "陳世峰");
        assert_eq!(strip_jersey_suffix(" 林大偉 #23 "), "林大偉");
        assert_eq!(strip_jersey_suffix("陳世峰"), "陳世峰");
        assert_eq!(strip_jersey_suffix("A #B"), "A #B");
    }

    #[test]
    fn resolve_against_roster() {
        let mut index = PlayerIndex::new();
        index.insert("陳世峰", EntityId::Resolved("501".into()));

        assert_eq!(index.resolve("陳世峰 #1"), EntityId::Resolved("501".into()));
        assert_eq!(index.resolve("外援 #9"), EntityId::RawName("外援".into()));
    }

    #[test]
    fn later_duplicate_name_wins() {
        let players = vec![
            PlayerRow {
                player_id: EntityId::Resolved("1".into()),
                name: "王".into(),
                photo: String::new(),
            },
            PlayerRow {
                player_id: EntityId::Resolved("2".into()),
                name: "王".into(),
                photo: String::new(),
            },
        ];
        let index = PlayerIndex::from_players(&players);
        assert_eq!(index.len(), 1);
        assert_eq!(index.resolve("王 #5"), EntityId::Resolved("2".into()));
    }

    #[test]
    fn team_ref_matches_display_name() {
        let team = EntityId::Resolved("happy".into());
        assert_eq!(team_ref("快樂籃球隊", "快樂籃球隊", &team), team);
        assert_eq!(
            team_ref("閃電隊", "快樂籃球隊", &team),
            EntityId::RawName("閃電隊".into())
        );
    }
}
