use triage_core::{Config, DialogueItem};
use triage_data::{ItemFile, ItemProvider, Paths};

pub fn run(config: &Config, json: bool) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let source = ItemFile::new(paths.items_file(config));
    let items = source.list_items()?;

    for line in item_lines(&items, json) {
        println!("{line}");
    }
    if !json {
        println!("{} items from {}", items.len(), source.path().display());
    }
    Ok(())
}

fn item_lines(items: &[DialogueItem], json: bool) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if json {
                serde_json::json!({
                    "number": i + 1,
                    "id": item.id,
                    "age": item.age,
                    "bracket": item.bracket,
                    "turns": item.transcript.turn_count(),
                    "has_prediction": item.predicted_major.is_some(),
                })
                .to_string()
            } else {
                format!(
                    "{:>4}  #{:<6} {:<10} {:>3} turns",
                    i + 1,
                    item.id,
                    item.bracket.as_str(),
                    item.transcript.turn_count()
                )
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::Transcript;

    fn items() -> Vec<DialogueItem> {
        vec![
            DialogueItem::new(7, "15세 이상", Transcript::PlainText("의사: 네\n환자: 아파요".into()))
                .with_predictions(Some("흉통".into()), None, None),
            DialogueItem::new(9, "", Transcript::Turns(vec![])),
        ]
    }

    #[test]
    fn test_item_lines_text() {
        let lines = item_lines(&items(), false);
        assert_eq!(lines[0], "   1  #7      adult        2 turns");
        assert_eq!(lines[1], "   2  #9      unknown      0 turns");
    }

    #[test]
    fn test_item_lines_json() {
        let lines = item_lines(&items(), true);
        let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first["id"], 7);
        assert_eq!(first["bracket"], "adult");
        assert_eq!(first["turns"], 2);
        assert_eq!(first["has_prediction"], true);
        let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(second["number"], 2);
        assert_eq!(second["has_prediction"], false);
    }
}
