//! Output formatting for CLI

use crate::{
    Result, adapters::MineField, q_learning::ValueTable, reward::Contact, types::GridCell,
};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Render the greedy action of every cell, top row first.
///
/// Objects are drawn over the arrows: `#` rock, `*` mine, `X` super-mine.
/// Cells that were never updated show `.`.
pub fn format_policy(table: &ValueTable, field: &MineField) -> Result<String> {
    let mut out = String::with_capacity((table.columns() + 1) * table.rows());
    for y in (0..table.rows() as i64).rev() {
        for x in 0..table.columns() as i64 {
            let cell = GridCell::new(x, y);
            let glyph = match field.object_at(cell) {
                Contact::Rock => '#',
                Contact::Mine { .. } => '*',
                Contact::SuperMine => 'X',
                Contact::None => {
                    if table.get(cell)?.iter().all(|&score| score == 0.0) {
                        '.'
                    } else {
                        table.greedy_action(cell)?.arrow()
                    }
                }
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }
}
