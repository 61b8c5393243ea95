//! HTML fragments for cards and the detail panel.
//!
//! All record text is user supplied and escaped before interpolation.

use crate::model::card::CardRecord;

/// Element id of the map container inside the panel markup.
pub const MAP_CONTAINER_ID: &str = "map";

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Filename-style caption shown under a card image, e.g. `CAFE_YEONNAM.JPG`.
pub fn card_label(name: &str) -> String {
    format!("{}.JPG", name.to_uppercase().replace(' ', "_"))
}

pub fn card_markup(record: &CardRecord) -> String {
    format!(
        r#"<img src="{}" draggable="false" />
<span class="filename">{}</span>"#,
        escape_html(&record.image_url),
        escape_html(&card_label(&record.name)),
    )
}

pub fn panel_markup(record: &CardRecord) -> String {
    format!(
        r#"<img src="{}" />
<h3>{}</h3>
<p>{}</p>
<p class="keywords" style="font-style: italic; color: #6c5c4c;">{}</p>
<div id="{}" style="height: 200px; margin-top: 1rem; border-radius: 6px;"></div>"#,
        escape_html(&record.image_url),
        escape_html(&record.name),
        escape_html(&record.description),
        escape_html(&record.keywords),
        MAP_CONTAINER_ID,
    )
}
