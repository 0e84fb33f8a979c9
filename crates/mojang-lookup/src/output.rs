use mojang_client::PlayerId;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Entry<'a> {
    name: &'a str,
    id: Option<PlayerId>,
}

/// One `name<TAB>id` line per username, `-` for unresolved
pub fn render_lines(names: &[String], ids: &[Option<PlayerId>]) -> String {
    names
        .iter()
        .zip(ids)
        .map(|(name, id)| match id {
            Some(id) => format!("{name}\t{id}\n"),
            None => format!("{name}\t-\n"),
        })
        .collect()
}

pub fn render_json(names: &[String], ids: &[Option<PlayerId>]) -> serde_json::Result<String> {
    let entries: Vec<Entry<'_>> = names
        .iter()
        .zip(ids)
        .map(|(name, id)| Entry { name, id: *id })
        .collect();
    serde_json::to_string_pretty(&entries)
}
