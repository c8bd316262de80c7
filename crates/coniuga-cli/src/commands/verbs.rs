//! The `coniuga verbs` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use coniuga_core::reference::{load_reference_data, ReferenceData};

pub fn execute(reference_path: Option<PathBuf>) -> Result<()> {
    let reference = match reference_path {
        Some(path) => load_reference_data(&path)?,
        None => ReferenceData::italian(),
    };

    let mut categories = Table::new();
    categories.set_header(vec!["Category", "Verbs"]);
    for category in &reference.categories {
        categories.add_row(vec![
            Cell::new(&category.name),
            Cell::new(category.verbs.join(", ")),
        ]);
    }

    let mut moods = Table::new();
    moods.set_header(vec!["Mood", "Tenses"]);
    for mood in &reference.moods {
        moods.add_row(vec![Cell::new(&mood.mood), Cell::new(mood.tenses.join(", "))]);
    }

    println!("{categories}\n");
    println!("{moods}");
    println!(
        "\n{} verbs, {} moods, {} distinct tenses",
        reference.all_verbs().count(),
        reference.moods.len(),
        reference.all_tenses().len()
    );
    Ok(())
}
