use std::path::{Path, PathBuf};

use triage_core::{AgeBracket, CategoryTable, DialogueItem, Taxonomy, Transcript};

pub fn scenario_taxonomy() -> Taxonomy {
    let adult: CategoryTable = [("Chest Pain", "Cardiac"), ("Chest Pain", "Musculoskeletal")]
        .into_iter()
        .collect();
    let pediatric: CategoryTable = [("Fever", "Viral"), ("Fever", "Bacterial")]
        .into_iter()
        .collect();
    Taxonomy::new()
        .with(AgeBracket::Adult, adult)
        .with(AgeBracket::Pediatric, pediatric)
}

pub fn scenario_items() -> Vec<DialogueItem> {
    vec![
        DialogueItem::new(7, "15세 이상", Transcript::PlainText("의사: 어디가 불편하세요?".into())),
        DialogueItem::new(9, "15세 미만", Transcript::PlainText("환자: 열이 나요".into())),
    ]
}

/// Lay out an items table and a category directory the way a study folder looks
pub fn write_data_dir(root: &Path) -> (PathBuf, PathBuf) {
    let items = root.join("evaluation_data.csv");
    std::fs::write(
        &items,
        "\u{feff}index,나이,챗GPT와 대화한 내용,LLM_대분류\n\
         7,15세 이상,\"[{\"\"turn\"\":1,\"\"speaker\"\":\"\"I\"\",\"\"utterance\"\":\"\"어디가 불편하세요?\"\"}]\",Chest Pain\n\
         9,15세 미만,환자: 열이 나요,\n",
    )
    .unwrap();

    let categories = root.join("categories");
    std::fs::create_dir_all(&categories).unwrap();
    std::fs::write(
        categories.join("성인.csv"),
        "대분류,중분류\nChest Pain,Cardiac\nChest Pain,Musculoskeletal\nChest Pain,Cardiac\n",
    )
    .unwrap();
    std::fs::write(
        categories.join("pediatric.csv"),
        "major,sub\nFever,Viral\nFever,Bacterial\n",
    )
    .unwrap();

    (items, categories)
}
