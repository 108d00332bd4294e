// tests/rank_properties.rs
//! Ranking determinism: order of arrival never shows through.

use feedrank::rank::rank;
use feedrank::ScoredResult;
use rand::seq::SliceRandom;

fn result(title: &str, link: &str, score: f64) -> ScoredResult {
    ScoredResult {
        title: title.to_string(),
        link: link.to_string(),
        text: String::new(),
        title_score: 0,
        description_score: 0,
        recency_score: None,
        score,
    }
}

fn sample_results() -> Vec<ScoredResult> {
    vec![
        result("alpha", "https://a.test/1", 4_200.0),
        result("bravo", "https://a.test/2", 9_000.0),
        result("charlie", "https://a.test/3", 9_000.0),
        result("delta", "https://a.test/4", 100.0),
        result("echo", "https://a.test/5", 0.0),
        result("echo", "https://a.test/0", 0.0),
        result("foxtrot", "https://a.test/6", 7_350.5),
    ]
}

#[test]
fn output_is_sorted_descending_with_clamped_length() {
    for n in [0i64, 1, 3, 7, 50] {
        let out = rank(sample_results(), n);
        assert_eq!(out.len(), (n.max(0) as usize).min(7));
        for w in out.windows(2) {
            assert!(w[0].score >= w[1].score);
        }
    }
}

#[test]
fn shuffled_input_produces_identical_ordering() {
    let baseline = rank(sample_results(), 10);
    let mut rng = rand::rng();
    for _ in 0..20 {
        let mut shuffled = sample_results();
        shuffled.shuffle(&mut rng);
        assert_eq!(rank(shuffled, 10), baseline);
    }
}

#[test]
fn ties_are_broken_by_title_then_link() {
    let out = rank(sample_results(), 10);
    // the two 9000s order by title
    assert_eq!(out[0].title, "bravo");
    assert_eq!(out[1].title, "charlie");
    // the two "echo" entries order by link
    assert_eq!(out[5].link, "https://a.test/0");
    assert_eq!(out[6].link, "https://a.test/5");
}
