use triage_core::{AgeBracket, Config, Taxonomy};
use triage_data::{CategoryDir, Paths, TaxonomyProvider};

pub fn run(config: &Config) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let dir = paths.categories_dir(config);

    match CategoryDir::new(&dir).lookup_categories()? {
        Some(taxonomy) => print!("{}", taxonomy_tree(&taxonomy)),
        None => println!(
            "No category tables found in {}; items will use their own option lists.",
            dir.display()
        ),
    }
    Ok(())
}

fn taxonomy_tree(taxonomy: &Taxonomy) -> String {
    let mut out = String::new();
    for bracket in [AgeBracket::Adult, AgeBracket::Pediatric] {
        out.push_str(&format!("{bracket}\n"));
        let Some(table) = taxonomy.table(bracket) else {
            out.push_str("  (none)\n");
            continue;
        };
        for major in table.majors() {
            let subs = table.subs(&major).unwrap_or_default();
            out.push_str(&format!("  {major} ({})\n", subs.len()));
            for sub in subs {
                out.push_str(&format!("    - {sub}\n"));
            }
        }
    }
    out
}
