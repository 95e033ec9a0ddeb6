//! Turns a ranobes.com book page into [`BookMetadata`].
//!
//! Everything except the title is described by [`FIELD_RULES`], a table of
//! selector + value source + optional pattern, so markup changes on the site
//! only touch the table.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{trace, warn};

use crate::{error::MetaError, helpers, model::BookMetadata};

pub const BOOK_ROOT: &str = "article[itemtype='http://schema.org/Book']";
pub const BOOK_TITLE: &str = "h1.title";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Subtitle,
    Description,
    Cover,
    PublishedYear,
    Language,
    Publisher,
    Genres,
    Tags,
    Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    /// Trimmed text of the first matching element.
    Text,
    /// Text fragments of the first matching element, one per line.
    Lines,
    /// Attribute of the first matching element.
    Attr(&'static str),
    /// Trimmed text of every matching element, in document order.
    EachText,
}

#[derive(Debug)]
pub struct FieldRule {
    pub field: Field,
    pub selector: &'static str,
    pub source: Source,
    /// When set, the first capture group is the value and a value that does
    /// not match is dropped.
    pub pattern: Option<&'static str>,
}

pub static FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Subtitle,
        selector: "span.subtitle",
        source: Source::Text,
        pattern: None,
    },
    FieldRule {
        field: Field::Description,
        selector: "[itemprop='description']",
        source: Source::Lines,
        pattern: None,
    },
    FieldRule {
        field: Field::Cover,
        selector: ".poster figure.cover",
        source: Source::Attr("style"),
        pattern: Some(r"url\((.*?)\)"),
    },
    FieldRule {
        field: Field::PublishedYear,
        selector: "[itemprop='dateCreated']",
        source: Source::Text,
        pattern: None,
    },
    FieldRule {
        field: Field::Language,
        selector: "[itemprop='locationCreated']",
        source: Source::Text,
        pattern: None,
    },
    FieldRule {
        field: Field::Publisher,
        selector: "span.publishers_list span a",
        source: Source::EachText,
        pattern: None,
    },
    FieldRule {
        field: Field::Genres,
        selector: "#mc-fs-genre a",
        source: Source::EachText,
        pattern: None,
    },
    FieldRule {
        field: Field::Tags,
        selector: "[itemprop='keywords'] a",
        source: Source::EachText,
        pattern: None,
    },
    FieldRule {
        field: Field::Duration,
        selector: "[itemprop='timeRequired']",
        source: Source::Attr("content"),
        pattern: Some(r"^PT(\d+)H"),
    },
];

static ROOT_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse(BOOK_ROOT).unwrap());
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse(BOOK_TITLE).unwrap());

static COMPILED_RULES: Lazy<Vec<CompiledRule>> = Lazy::new(|| {
    FIELD_RULES
        .iter()
        .map(|rule| CompiledRule {
            rule,
            selector: Selector::parse(rule.selector).unwrap(),
            pattern: rule.pattern.map(|p| Regex::new(p).unwrap()),
        })
        .collect()
});

struct CompiledRule {
    rule: &'static FieldRule,
    selector: Selector,
    pattern: Option<Regex>,
}

#[derive(Debug, PartialEq)]
enum Value {
    One(Option<String>),
    Many(Vec<String>),
}

impl CompiledRule {
    fn apply(&self, root: ElementRef<'_>) -> Value {
        let first = || root.select(&self.selector).next();
        match self.rule.source {
            Source::Text => Value::One(
                first()
                    .and_then(|el| helpers::non_empty(helpers::stripped_text(el)))
                    .and_then(|text| self.capture(&text)),
            ),
            Source::Lines => Value::One(
                first()
                    .and_then(|el| helpers::non_empty(helpers::text_lines(el)))
                    .and_then(|text| self.capture(&text)),
            ),
            Source::Attr(name) => Value::One(
                first()
                    .and_then(|el| el.value().attr(name))
                    .and_then(|value| self.capture(value)),
            ),
            Source::EachText => Value::Many(
                root.select(&self.selector)
                    .map(helpers::stripped_text)
                    .filter(|text| !text.is_empty())
                    .filter_map(|text| self.capture(&text))
                    .collect(),
            ),
        }
    }

    fn capture(&self, value: &str) -> Option<String> {
        match &self.pattern {
            Some(pattern) => pattern
                .captures(value)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_owned()),
            None => Some(value.to_owned()),
        }
    }
}

/// Parse a book page. Fails only when the book block or its title is missing;
/// every other field is left empty when its element is not on the page.
pub fn extract(html: &str) -> Result<BookMetadata, MetaError> {
    let doc = Html::parse_document(html);
    extract_document(&doc)
}

fn extract_document(doc: &Html) -> Result<BookMetadata, MetaError> {
    let root = doc
        .select(&ROOT_SELECTOR)
        .next()
        .ok_or(MetaError::MalformedPage("no book block"))?;
    let title = root
        .select(&TITLE_SELECTOR)
        .next()
        .ok_or(MetaError::MalformedPage("no title heading"))?;
    let title = helpers::first_text_node(title).ok_or(MetaError::MalformedPage("empty title"))?;

    let mut book = BookMetadata::new(title);
    for rule in COMPILED_RULES.iter() {
        let value = rule.apply(root);
        trace!(field = ?rule.rule.field, ?value, "extracted field");
        assign(&mut book, rule.rule.field, value);
    }
    Ok(book)
}

fn assign(book: &mut BookMetadata, field: Field, value: Value) {
    match (field, value) {
        (Field::Subtitle, Value::One(v)) => book.subtitle = v,
        (Field::Description, Value::One(v)) => book.description = v,
        (Field::Cover, Value::One(v)) => {
            book.cover = v
                .map(|token| helpers::strip_quotes(&token).to_owned())
                .and_then(helpers::non_empty)
        }
        (Field::PublishedYear, Value::One(v)) => book.published_year = v,
        (Field::Language, Value::One(v)) => book.language = v,
        (Field::Duration, Value::One(v)) => {
            book.duration = v.as_deref().and_then(helpers::hours_to_seconds)
        }
        (Field::Publisher, Value::Many(v)) => {
            book.publisher = if v.is_empty() {
                None
            } else {
                Some(v.join(", "))
            }
        }
        (Field::Genres, Value::Many(v)) => book.genres = v,
        (Field::Tags, Value::Many(v)) => book.tags = v,
        (field, value) => {
            warn!(?field, ?value, "field rule source does not fit the field");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_compile() {
        assert_eq!(COMPILED_RULES.len(), FIELD_RULES.len());
        Selector::parse(BOOK_ROOT).unwrap();
        Selector::parse(BOOK_TITLE).unwrap();
    }

    #[test]
    fn test_every_field_has_one_rule() {
        for field in [
            Field::Subtitle,
            Field::Description,
            Field::Cover,
            Field::PublishedYear,
            Field::Language,
            Field::Publisher,
            Field::Genres,
            Field::Tags,
            Field::Duration,
        ] {
            assert_eq!(
                FIELD_RULES.iter().filter(|r| r.field == field).count(),
                1,
                "{field:?}"
            );
        }
    }

    #[test]
    fn test_list_fields_use_each_text() {
        for rule in FIELD_RULES {
            let is_list = matches!(rule.field, Field::Publisher | Field::Genres | Field::Tags);
            assert_eq!(is_list, rule.source == Source::EachText, "{:?}", rule.field);
        }
    }

    fn book(inner: &str) -> String {
        format!(
            r#"<html><body><article itemtype="http://schema.org/Book">
            <h1 class="title">Title</h1>{inner}</article></body></html>"#
        )
    }

    fn duration_of(content: &str) -> Option<u64> {
        let html = book(&format!(
            r#"<meta itemprop="timeRequired" content="{content}">"#
        ));
        extract(&html).unwrap().duration
    }

    #[test]
    fn test_duration_hours_only() {
        assert_eq!(duration_of("PT5H"), Some(18000));
        assert_eq!(duration_of("PT5H30M"), Some(18000));
        assert_eq!(duration_of("P1D"), None);
        assert_eq!(duration_of("PT30M"), None);
        assert_eq!(duration_of("xPT5H"), None);
    }

    #[test]
    fn test_cover_pattern() {
        let html = book(
            r#"<div class="poster"><figure class="cover" style="background-image: url('/uploads/c.jpg'); width: 10px"></figure></div>"#,
        );
        assert_eq!(
            extract(&html).unwrap().cover.as_deref(),
            Some("/uploads/c.jpg")
        );

        let html = book(
            r#"<div class="poster"><figure class="cover" style="width: 10px"></figure></div>"#,
        );
        assert_eq!(extract(&html).unwrap().cover, None);

        let html = book(r#"<div class="poster"><figure class="cover"></figure></div>"#);
        assert_eq!(extract(&html).unwrap().cover, None);
    }

    #[test]
    fn test_blank_anchors_are_dropped() {
        let html = book(
            r#"<div id="mc-fs-genre"><a href="/g/1">Action</a><a href="/g/2"> </a></div>
            <span class="publishers_list"><span><a href="/p/1">  </a></span></span>"#,
        );
        let meta = extract(&html).unwrap();
        assert_eq!(meta.genres, vec!["Action"]);
        assert_eq!(meta.publisher, None);
    }

    #[test]
    fn test_blank_text_is_absent() {
        let html = book(r#"<span class="subtitle">   </span>"#);
        assert_eq!(extract(&html).unwrap().subtitle, None);
    }
}
