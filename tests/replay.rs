//! Crawl over saved feed HTML with the stock selectors.

use std::fs;
use std::time::Duration;

use review_scrap::config::CrawlConfig;
use review_scrap::process::crawl;
use review_scrap::snapshot::SnapshotPage;

fn card(author: &str, date: &str, stars: u8, likes: u32, text: &str) -> String {
    format!(
        r#"<div class="d15Mdf bAhLNe">
            <div class="xKpxId zc7KVe">
                <span class="X43Kjb">{author}</span>
                <div class="pf5lIe"><div aria-label="Rated {stars} stars out of five stars" role="img"></div></div>
                <span class="p2TkOb">{date}</span>
                <div class="jUL89d y92BAb">{likes}</div>
            </div>
            <div class="UD7Dzf"><span jsname="bN97Pc">{text}</span></div>
        </div>"#
    )
}

fn document(cards: &[String], show_more: bool) -> String {
    let more = if show_more {
        r#"<div role="button"><span class="RveJvd snByac">Show More</span></div>"#
    } else {
        ""
    };
    format!(
        r#"<html><body>
        <h1 class="AHFaub" itemprop="name"><span>Brainly: Homework Help</span></h1>
        <div class="W4P4ne">{}</div>
        {more}
        </body></html>"#,
        cards.concat()
    )
}

fn config(dir: &std::path::Path) -> CrawlConfig {
    CrawlConfig {
        scroll_dwell: Duration::ZERO,
        stall_dwell: Duration::ZERO,
        lookup_timeout: Duration::ZERO,
        output_dir: dir.to_path_buf(),
        ..Default::default()
    }
}

#[test]
fn replayed_feed_is_written_in_discovery_order() {
    let a = card("Rina", "June 1, 2021", 5, 12, "Sangat\nmembantu");
    let b = card("Tom", "June 2, 2021", 2, 0, "Too many ads");
    let c = card("Uli", "June 3, 2021", 4, 3, "Good");
    let frames = [
        document(&[a.clone(), b.clone()], false),
        document(&[a, b, c], true),
    ];
    let page = SnapshotPage::from_html(&frames);
    let out = tempfile::tempdir().unwrap();

    let report = crawl(&page, "replay", &config(out.path())).unwrap();

    assert_eq!(report.entity, "Brainly: Homework Help");
    assert_eq!(report.path, out.path().join("Brainly_ Homework Help.csv"));
    assert_eq!(report.written, 3);

    let content = fs::read_to_string(&report.path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(
        lines,
        [
            "name,post_date,likes,ratings,comment",
            r#"Rina,"June 1, 2021",12,5,Sangat membantu"#,
            r#"Tom,"June 2, 2021",0,2,Too many ads"#,
            r#"Uli,"June 3, 2021",3,4,Good"#,
        ]
    );
}

#[test]
fn replay_reads_frames_from_a_directory() {
    let frames = tempfile::tempdir().unwrap();
    let a = card("Rina", "June 1, 2021", 5, 12, "ok");
    let b = card("Tom", "June 2, 2021", 1, 0, "no");
    fs::write(frames.path().join("000.html"), document(&[a.clone()], false)).unwrap();
    fs::write(frames.path().join("001.html"), document(&[a, b], false)).unwrap();

    let page = SnapshotPage::from_dir(frames.path()).unwrap();
    let out = tempfile::tempdir().unwrap();
    let report = crawl(&page, "replay", &config(out.path())).unwrap();

    assert_eq!(report.written, 2);
    // Pass 1 reads frame 0, passes 2 and 3 are the grace and exhausting passes on frame 1.
    assert_eq!(report.passes, 3);
}
