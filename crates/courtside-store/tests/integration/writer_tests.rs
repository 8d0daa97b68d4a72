use courtside_core::testutil::{fixture_fetcher, game_url};
use courtside_store::CsvTableWriter;

use crate::integration::common::{fixture_tables, read_rows, run_with};

const CORE_TABLES: [&str; 6] = [
    "teams",
    "players",
    "team_roster",
    "games",
    "game_team_stats",
    "game_player_stats",
];

#[tokio::test]
async fn writes_six_tables_with_fixed_headers() {
    let tmp = tempfile::tempdir().unwrap();
    let writer = CsvTableWriter::new(tmp.path().join("data"));

    let written = writer.write_all(&fixture_tables().await, false).unwrap();
    let names: Vec<&str> = written.iter().map(|w| w.table).collect();
    assert_eq!(names, CORE_TABLES);
    assert!(!tmp.path().join("data/player_season_logs.csv").exists());

    let teams = read_rows(&writer.path_for("teams"));
    assert_eq!(
        teams[0],
        vec!["球隊ID", "球隊名稱", "隊徽", "封面", "場均得分", "場均籃板", "場均助攻", "場均失分"]
    );
    assert_eq!(
        teams[1],
        vec![
            "happy",
            "快樂籃球隊",
            "./images/team_logo.png",
            "./images/team_cover.jpeg",
            "78.5",
            "41.2",
            "15.0",
            "70.1"
        ]
    );

    let games = read_rows(&writer.path_for("games"));
    assert_eq!(games.len(), 4);
    assert_eq!(
        games[1],
        vec!["1001", "2025-q1", "2025/03/01", "happy", "台北 閃電隊", "88", "75"]
    );
    assert_eq!(games[3][0], "unknown");
    assert_eq!(games[3][5], "");

    let team_stats = read_rows(&writer.path_for("game_team_stats"));
    assert_eq!(team_stats[1], vec!["1001", "happy", "24", "18", "", "20", "62"]);

    let player_stats = read_rows(&writer.path_for("game_player_stats"));
    assert_eq!(player_stats[0].len(), 18);
    assert_eq!(&player_stats[1][..4], ["1001", "501", "happy", "21"]);
    assert_eq!(player_stats[2][6], "", "empty 3PM stays empty");
    assert_eq!(player_stats[2][9], "02", "no numeric coercion");
}

#[tokio::test]
async fn row_counts_and_digests_are_reported() {
    let tmp = tempfile::tempdir().unwrap();
    let writer = CsvTableWriter::new(tmp.path());

    let written = writer.write_all(&fixture_tables().await, false).unwrap();
    let rows: Vec<usize> = written.iter().map(|w| w.rows).collect();
    assert_eq!(rows, vec![1, 3, 3, 3, 4, 6]);

    for table in &written {
        let bytes = std::fs::read(&table.path).unwrap();
        assert_eq!(table.digest, courtside_core::compute_hash(&bytes));
    }
}

#[tokio::test]
async fn identical_runs_write_identical_bytes() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    let a = CsvTableWriter::new(first.path())
        .write_all(&fixture_tables().await, true)
        .unwrap();
    let b = CsvTableWriter::new(second.path())
        .write_all(&fixture_tables().await, true)
        .unwrap();

    assert_eq!(a.len(), 7);
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.digest, y.digest, "{}", x.table);
        assert_eq!(std::fs::read(&x.path).unwrap(), std::fs::read(&y.path).unwrap());
    }
}

#[tokio::test]
async fn rewrite_replaces_previous_contents() {
    let tmp = tempfile::tempdir().unwrap();
    let writer = CsvTableWriter::new(tmp.path());

    writer.write_all(&fixture_tables().await, false).unwrap();
    let first = std::fs::read(writer.path_for("game_player_stats")).unwrap();

    let failing = fixture_fetcher().route_error(&game_url(1002), "HTTP 503");
    writer.write_all(&run_with(failing).await, false).unwrap();
    let second = read_rows(&writer.path_for("game_player_stats"));

    assert_ne!(std::fs::read(writer.path_for("game_player_stats")).unwrap(), first);
    assert_eq!(second.len(), 4, "header plus one game's three players");
    assert!(second[1..].iter().all(|row| row[0] == "1001"));
    assert!(!tmp.path().join("game_player_stats.csv.tmp").exists());
}

#[tokio::test]
async fn season_logs_table_when_enabled() {
    let tmp = tempfile::tempdir().unwrap();
    let writer = CsvTableWriter::new(tmp.path());

    writer.write_all(&fixture_tables().await, true).unwrap();
    let logs = read_rows(&writer.path_for("player_season_logs"));

    assert_eq!(&logs[0][..4], ["球員ID", "球員姓名", "日期", "對手"]);
    assert_eq!(logs.len(), 5, "two rows for each linked player");
    assert_eq!(&logs[1][..5], ["501", "陳世峰", "2025/03/01", "台北 閃電隊", "21"]);
    assert_eq!(&logs[3][..2], ["502", "林大偉"]);
}

#[tokio::test]
async fn season_logs_are_collected_even_when_not_written() {
    let tmp = tempfile::tempdir().unwrap();
    let writer = CsvTableWriter::new(tmp.path());

    let tables = fixture_tables().await;
    assert_eq!(tables.season_logs.len(), 4);

    let written = writer.write_all(&tables, false).unwrap();
    assert_eq!(written.len(), 6);
    assert!(!writer.path_for("player_season_logs").exists());
}

#[test]
fn empty_tables_still_get_headers() {
    let tmp = tempfile::tempdir().unwrap();
    let writer = CsvTableWriter::new(tmp.path());

    writer
        .write_all(&courtside_core::models::Tables::default(), false)
        .unwrap();
    for table in CORE_TABLES {
        let rows = read_rows(&writer.path_for(table));
        assert_eq!(rows.len(), 1, "{table}");
    }
}
