use chrono::{TimeZone, Utc};
use notepad_core::search::projection::{
    preview, EMPTY_CONTENT_PLACEHOLDER, EMPTY_LIST_MESSAGE, PREVIEW_CHARS, UNTITLED_PLACEHOLDER,
};
use notepad_core::{filter, render, search, ListView, Note, NoteId};

fn notes(titles: &[&str]) -> Vec<Note> {
    let now = Utc.with_ymd_and_hms(2024, 4, 2, 10, 0, 0).unwrap();
    titles
        .iter()
        .enumerate()
        .map(|(index, title)| {
            let mut note = Note::with_id(NoteId::from(format!("n{index}")), now);
            note.title = title.to_string();
            note
        })
        .collect()
}

fn titles(matched: &[&Note]) -> Vec<String> {
    matched.iter().map(|note| note.title.clone()).collect()
}

#[test]
fn filter_matches_title_case_insensitively() {
    let list = notes(&["Shopping", "Recipe", "Todo"]);

    assert_eq!(titles(&filter(&list, "sho")), vec!["Shopping"]);
    assert_eq!(titles(&filter(&list, "SHO")), vec!["Shopping"]);
    assert_eq!(
        titles(&filter(&list, "")),
        vec!["Shopping", "Recipe", "Todo"]
    );
}

#[test]
fn filter_matches_plain_text_but_not_markup() {
    let mut list = notes(&["Alpha", "Beta"]);
    list[0].content = "<b>Bread</b> &amp; butter".to_string();
    list[1].content = "<u>plain</u>".to_string();

    assert_eq!(titles(&filter(&list, "bread & butter")), vec!["Alpha"]);
    assert!(filter(&list, "<b>").is_empty());
    assert!(filter(&list, "u>").is_empty());
}

#[test]
fn preview_truncates_to_sixty_characters_with_ellipsis() {
    let long = "a".repeat(100);
    let shown = preview(&long, PREVIEW_CHARS);
    assert_eq!(shown.chars().count(), 63);
    assert!(shown.ends_with("..."));

    assert_eq!(preview("0123456789", PREVIEW_CHARS), "0123456789");
    assert_eq!(preview(&"b".repeat(60), PREVIEW_CHARS), "b".repeat(60));
}

#[test]
fn preview_measures_plain_text_after_stripping_markup() {
    let content = format!("<b>{}</b>", "c".repeat(60));
    assert_eq!(preview(&content, PREVIEW_CHARS), "c".repeat(60));
}

#[test]
fn render_uses_placeholders_and_flags_active_note() {
    let mut list = notes(&["", "Filled"]);
    list[1].content = "<i>hello</i>".to_string();
    let active = list[1].id.clone();

    let view = render(&list, Some(&active), PREVIEW_CHARS);
    let items = view.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, UNTITLED_PLACEHOLDER);
    assert_eq!(items[0].preview, EMPTY_CONTENT_PLACEHOLDER);
    assert!(!items[0].active);
    assert_eq!(items[1].title, "Filled");
    assert_eq!(items[1].preview, "hello");
    assert!(items[1].active);
}

#[test]
fn search_without_matches_renders_empty_message() {
    let list = notes(&["Shopping"]);
    assert_eq!(
        search(&list, "zzz", None),
        ListView::Empty(EMPTY_LIST_MESSAGE)
    );
}
