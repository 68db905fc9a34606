use crate::domain::formula::FormulaBook;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

pub fn load_book(path: &Path) -> Result<FormulaBook> {
    let file = File::open(path).with_context(|| format!("opening formula book {path:?}"))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing formula book {path:?}"))
}

pub fn save_book(path: &Path, book: &FormulaBook) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("creating {parent:?}"))?;
    }
    let json = serde_json::to_string_pretty(book).context("serializing formula book")?;
    fs::write(path, json).with_context(|| format!("writing formula book {path:?}"))
}
