//! Interactive title selection.

use anyhow::Result;
use dialoguer::Input;

use ripline_core::catalog::{parse_selection, Selection, Title};

/// Prints the titles found on one disc.
pub fn print_titles(unit: u32, titles: &[Title]) {
    let disc_title = titles
        .first()
        .map(|t| t.disc_title.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or("unknown");

    println!("The following titles were read from disc {} - {}\n", unit, disc_title);
    for title in titles {
        println!("{}", describe_title(title));
    }
    println!();
}

fn describe_title(title: &Title) -> String {
    format!(
        "ID: {}, Title Name: {}, Size: {}, Length: {}, Chapters: {}",
        title.id.index, title.file_name, title.size, title.length, title.chapters
    )
}

/// Asks which titles of `unit` to process until the answer parses.
pub fn select_titles(unit: u32) -> Result<Selection> {
    let answer: String = Input::new()
        .with_prompt(format!(
            "Titles to process from disc {} (0,1,2... or 'all')",
            unit
        ))
        .allow_empty(true)
        .validate_with(|input: &String| parse_selection(input).map(|_| ()).map_err(|e| e.to_string()))
        .interact_text()?;

    Ok(parse_selection(&answer)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripline_core::testing::fixtures;

    #[test]
    fn test_describe_title() {
        let title = fixtures::title(0, 3, "title_t03.mkv");
        assert_eq!(
            describe_title(&title),
            "ID: 3, Title Name: title_t03.mkv, Size: 24.1 GB, Length: 1:32:10, Chapters: 12"
        );
    }
}
