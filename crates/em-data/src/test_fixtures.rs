//! Shared in-memory snapshot fixtures for the data-layer tests.

use rusqlite::Connection;

use crate::snapshot::SnapshotHandle;

const SCHEMA: &str = "
CREATE TABLE events (
    number INTEGER, name TEXT,
    cut_w INTEGER, cut_h INTEGER, cut_ox INTEGER, cut_oy INTEGER, cut_dx INTEGER, cut_dy INTEGER,
    cut_w2 INTEGER, cut_h2 INTEGER, cut_ox2 INTEGER, cut_oy2 INTEGER, cut_dx2 INTEGER, cut_dy2 INTEGER,
    map_w INTEGER, map_h INTEGER, map_ox INTEGER, map_oy INTEGER, map_dx INTEGER, map_dy INTEGER,
    map_w2 INTEGER, map_h2 INTEGER, map_ox2 INTEGER, map_oy2 INTEGER, map_dx2 INTEGER, map_dy2 INTEGER
);
CREATE TABLE dates (event_number INTEGER, day INTEGER, date TEXT);
CREATE TABLE maps (
    event_number INTEGER, id INTEGER, name TEXT, image_file TEXT, full_image_file TEXT,
    w INTEGER, h INTEGER, ox INTEGER, oy INTEGER, dx INTEGER, dy INTEGER,
    w2 INTEGER, h2 INTEGER, ox2 INTEGER, oy2 INTEGER, dx2 INTEGER, dy2 INTEGER,
    rotation INTEGER
);
CREATE TABLE areas (id INTEGER, name TEXT);
CREATE TABLE blocks (id INTEGER, area_id INTEGER, name TEXT);
CREATE TABLE map_links (day INTEGER, map_id INTEGER, area_id INTEGER, block_id INTEGER);
CREATE TABLE genres (id INTEGER, name TEXT, code INTEGER, day INTEGER);
CREATE TABLE layouts (
    block_id INTEGER, space_no INTEGER, x INTEGER, y INTEGER,
    orientation INTEGER, map_id INTEGER
);
CREATE TABLE circles (
    id INTEGER, day INTEGER, block_id INTEGER, space_no INTEGER, space_no_sub INTEGER,
    genre_id INTEGER, name TEXT, name_kana TEXT, pen_name TEXT
);
CREATE TABLE circle_extends (
    circle_id INTEGER, web_catalog_id INTEGER,
    site_url TEXT, twitter_url TEXT, pixiv_url TEXT
);
";

const SAMPLE_ROWS: &str = "
INSERT INTO events VALUES (105, 'EventFest 105',
    211, 300, 0, 0, 0, 0,  105, 150, 0, 0, 0, 0,
    1600, 1200, 40, 40, 0, 0,  800, 600, 20, 20, 0, 0);

INSERT INTO dates VALUES (105, 1, '2026-08-15');
INSERT INTO dates VALUES (105, 2, '2026-08-16');

INSERT INTO maps VALUES (105, 1, 'East Hall 1-3', 'map_e123.png', 'map_e123_full.png',
    1600, 1200, 40, 40, 0, 0,  800, 600, 20, 20, 0, 0, 0);
INSERT INTO maps VALUES (105, 2, 'West Hall 1-2', 'map_w12.png', 'map_w12_full.png',
    1200, 900, 30, 30, 0, 0,  600, 450, 15, 15, 0, 0, 90);

INSERT INTO areas VALUES (1, 'East A');
INSERT INTO areas VALUES (2, 'West A');

INSERT INTO blocks VALUES (10, 1, 'A');
INSERT INTO blocks VALUES (11, 1, 'B');
INSERT INTO blocks VALUES (20, 2, 'C');

INSERT INTO map_links VALUES (1, 1, 1, 10);
INSERT INTO map_links VALUES (1, 1, 1, 11);
INSERT INTO map_links VALUES (1, 2, 2, 20);
INSERT INTO map_links VALUES (2, 1, 1, 10);

INSERT INTO genres VALUES (101, 'Comics', 1, 1);
INSERT INTO genres VALUES (102, 'Games', 1, 1);
INSERT INTO genres VALUES (103, 'Music', 2, 2);

INSERT INTO layouts VALUES (10, 1, 100, 100, 3, 1);
INSERT INTO layouts VALUES (10, 2, 140, 100, 4, 1);
INSERT INTO layouts VALUES (11, 1, 100, 200, 2, 1);
INSERT INTO layouts VALUES (20, 1, 50, 50, 0, 2);

INSERT INTO circles VALUES (1, 1, 10, 1, 0, 101, 'Star Forge', 'すたーふぉーじ', 'Aoi');
INSERT INTO circles VALUES (2, 1, 10, 1, 1, 101, 'Moon Atelier', 'むーんあとりえ', 'Hikari');
INSERT INTO circles VALUES (3, 1, 10, 2, 0, 102, 'Pixel Garden', 'ぴくせるがーでん', 'Ren');
INSERT INTO circles VALUES (4, 1, 10, 2, 1, 102, 'Iron Quill', 'あいあんくいる', 'Sou');
INSERT INTO circles VALUES (5, 1, 11, 1, 0, 101, 'Paper Lantern', 'ぺーぱーらんたん', 'Yu');
INSERT INTO circles VALUES (6, 1, 11, 1, 1, 102, 'Cloud Nine', 'くらうどないん', 'Mei');
INSERT INTO circles VALUES (7, 2, 10, 1, 0, 103, 'Star Chart', 'すたーちゃーと', 'Aoi');
INSERT INTO circles VALUES (8, 2, 20, 1, 0, 103, 'Night Market', 'ないとまーけっと', 'Rin');

INSERT INTO circle_extends VALUES (1, 9001, 'https://starforge.example', NULL, NULL);
INSERT INTO circle_extends VALUES (2, 9002, NULL, 'https://x.example/moon', NULL);
INSERT INTO circle_extends VALUES (5, 9005, NULL, NULL, 'https://pixiv.example/yu');
INSERT INTO circle_extends VALUES (7, 9007, 'https://starchart.example', NULL, NULL);
-- orphaned row, no matching circle; dropped by the left-outer merge
INSERT INTO circle_extends VALUES (99, 9099, NULL, NULL, NULL);
";

pub(crate) fn empty_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("in-memory db");
    conn.execute_batch(SCHEMA).expect("schema");
    conn
}

/// A small but fully populated one-event snapshot.
pub(crate) fn sample_snapshot() -> SnapshotHandle {
    let conn = empty_connection();
    conn.execute_batch(SAMPLE_ROWS).expect("sample rows");
    SnapshotHandle::from_connection(conn)
}

/// A snapshot with one undecodable row in `circles` and one in `dates`.
pub(crate) fn corrupt_snapshot() -> SnapshotHandle {
    let conn = empty_connection();
    conn.execute_batch(
        "
        INSERT INTO dates VALUES (105, 1, '2026-08-15');
        INSERT INTO dates VALUES (105, 2, 'not-a-date');
        INSERT INTO circles VALUES (1, 1, 10, 1, 0, 101, 'Star Forge', 'すたーふぉーじ', 'Aoi');
        INSERT INTO circles VALUES (2, 1, 10, 1, 1, 101, NULL, 'むーんあとりえ', 'Hikari');
        ",
    )
    .expect("corrupt rows");
    SnapshotHandle::from_connection(conn)
}
