use ranobes_meta::{MetaError, extract};

use mock_fetcher::plan;

fn book(inner: &str) -> String {
    format!(
        r#"<html><body><article itemtype="http://schema.org/Book"><h1 class="title">Title</h1>{inner}</article></body></html>"#
    )
}

#[test]
fn extracts_full_book_page() {
    let meta = extract(&plan("book.html")).expect("parse book html");

    assert_eq!(meta.title, "Lord of the Mysteries");
    assert_eq!(meta.subtitle.as_deref(), Some("诡秘之主"));
    assert_eq!(
        meta.description.as_deref(),
        Some(
            "In the waves of steam and machinery, who could achieve extraordinary?\n\
             In the fogs of history and darkness, who was whispering?\n\
             I woke up from the realm of mysteries and opened my eyes to the world."
        )
    );
    assert_eq!(
        meta.cover.as_deref(),
        Some("/uploads/posts/2020-05/thumbs/lotm.jpg")
    );
    assert_eq!(meta.published_year.as_deref(), Some("2018"));
    assert_eq!(meta.language.as_deref(), Some("China"));
    assert_eq!(meta.publisher.as_deref(), Some("Qidian, Webnovel"));
    assert_eq!(meta.genres, vec!["Action", "Adventure", "Mystery"]);
    assert_eq!(
        meta.tags,
        vec!["Secret Organizations", "Steampunk", "Tarot Cards"]
    );
    assert_eq!(meta.duration, Some(291 * 3600));

    assert_eq!(meta.author, None);
    assert_eq!(meta.narrator, None);
    assert_eq!(meta.isbn, None);
    assert_eq!(meta.asin, None);
    assert!(meta.series.is_empty());
}

#[test]
fn minimal_page_leaves_optional_fields_absent() {
    let meta = extract(&plan("book_minimal.html")).expect("parse minimal html");

    assert_eq!(meta.title, "Shadow Slave");
    assert_eq!(meta.subtitle, None);
    assert_eq!(meta.description, None);
    assert_eq!(meta.cover, None);
    assert_eq!(meta.published_year, None);
    assert_eq!(meta.language, None);
    assert_eq!(meta.publisher, None);
    assert_eq!(meta.duration, None);
    assert!(meta.genres.is_empty());
    assert!(meta.tags.is_empty());
}

#[test]
fn page_without_book_block_is_malformed() {
    let res = extract(&plan("not_a_book.html"));
    assert!(matches!(res, Err(MetaError::MalformedPage(_))));
}

#[test]
fn book_block_without_title_is_malformed() {
    let html = r#"<article itemtype="http://schema.org/Book"><h2>Nope</h2></article>"#;
    assert!(matches!(extract(html), Err(MetaError::MalformedPage(_))));

    let html = r#"<article itemtype="http://schema.org/Book"><h1 class="title"> </h1></article>"#;
    assert!(matches!(extract(html), Err(MetaError::MalformedPage(_))));
}

#[test]
fn extraction_is_repeatable() {
    let html = plan("book.html");
    let first = extract(&html).expect("first parse");
    let second = extract(&html).expect("second parse");
    assert_eq!(first.genres, second.genres);
    assert_eq!(first.tags, second.tags);
    assert_eq!(first, second);
}

#[test]
fn publisher_names_are_joined() {
    let html = book(
        r#"<span class="publishers_list"><span><a>Acme</a></span>, <span><a>Beta</a></span></span>"#,
    );
    assert_eq!(
        extract(&html).unwrap().publisher.as_deref(),
        Some("Acme, Beta")
    );

    let html = book(r#"<span class="publishers_list"></span>"#);
    assert_eq!(extract(&html).unwrap().publisher, None);
}

#[test]
fn duration_only_counts_hours() {
    let duration = |content: &str| {
        extract(&book(&format!(
            r#"<span itemprop="timeRequired" content="{content}"></span>"#
        )))
        .unwrap()
        .duration
    };
    assert_eq!(duration("PT5H"), Some(18000));
    assert_eq!(duration("PT5H30M"), Some(18000));
    assert_eq!(duration("P1D"), None);

    let html = book(r#"<span itemprop="timeRequired"></span>"#);
    assert_eq!(extract(&html).unwrap().duration, None);
}

#[test]
fn serializes_in_abs_shape() {
    let meta = extract(&plan("book_minimal.html")).unwrap();
    let v = serde_json::to_value(&meta).unwrap();

    assert_eq!(v["title"], "Shadow Slave");
    assert!(v["publishedYear"].is_null());
    assert!(v.get("published_year").is_none());
    assert!(v["subtitle"].is_null());
    assert!(v["duration"].is_null());
    assert_eq!(v["genres"], serde_json::json!([]));
    assert_eq!(v["tags"], serde_json::json!([]));
    assert_eq!(v["series"], serde_json::json!([]));
}
