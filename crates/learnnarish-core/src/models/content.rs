use serde::{Deserialize, Serialize};

use super::record::{Collection, Record, RecordMeta};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Lesson {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub number: Option<i64>,
    /// Markdown body.
    #[serde(default)]
    pub lesson: Option<String>,
    #[serde(default)]
    pub narish_title: Option<String>,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

impl Lesson {
    pub fn display_title(&self) -> String {
        match (&self.number, &self.title) {
            (Some(number), Some(title)) => format!("Lesson {}: {}", number, title),
            (None, Some(title)) => title.clone(),
            (Some(number), None) => format!("Lesson {}", number),
            (None, None) => "Untitled lesson".to_string(),
        }
    }
}

impl Record for Lesson {
    const COLLECTION: Collection = Collection::Lessons;

    fn id(&self) -> i64 {
        self.id
    }
}

/// A static page; `link` is its path relative to the site root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Page {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub display_order: Option<i64>,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

impl Record for Page {
    const COLLECTION: Collection = Collection::Pages;

    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_with_missing_fields() {
        let json = r#"{"id": 4, "title": "Home", "link": null, "date_created": "2022-03-01T10:00:00.000Z"}"#;
        let page: Page = serde_json::from_str(json).expect("page should parse");
        assert_eq!(page.id, 4);
        assert_eq!(page.title.as_deref(), Some("Home"));
        assert_eq!(page.link, None);
        assert_eq!(page.display_order, None);
        assert_eq!(page.meta.date_created.as_deref(), Some("2022-03-01T10:00:00.000Z"));
        assert_eq!(page.meta.date_updated, None);
    }

    #[test]
    fn test_lesson_display_title() {
        let lesson = Lesson {
            id: 1,
            title: Some("Greetings".to_string()),
            number: Some(3),
            lesson: None,
            narish_title: None,
            meta: RecordMeta::default(),
        };
        assert_eq!(lesson.display_title(), "Lesson 3: Greetings");

        let untitled = Lesson {
            title: None,
            number: None,
            ..lesson
        };
        assert_eq!(untitled.display_title(), "Untitled lesson");
    }
}
