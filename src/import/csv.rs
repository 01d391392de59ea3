//! CSV Reader
//!
//! Comma separated, double-quoted fields with `""` escapes, CRLF or LF
//! line endings, and newlines inside quoted fields.

use super::{ImportError, SourceRow};

/// Parse CSV text into rows of cells; fully blank lines are skipped but
/// still counted, so each row keeps the line it starts on
pub fn parse_csv(text: &str) -> Result<Vec<SourceRow>, ImportError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut row_start = 1usize;
    let mut quote_line = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push('\n');
                }
                '\r' if chars.peek() == Some(&'\n') => {}
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
                quote_line = line;
            }
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                row.push(std::mem::take(&mut field));
                push_row(&mut rows, row_start, std::mem::take(&mut row));
                line += 1;
                row_start = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ImportError::UnterminatedQuote { line: quote_line });
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        push_row(&mut rows, row_start, row);
    }
    Ok(rows)
}

fn push_row(rows: &mut Vec<SourceRow>, line: usize, cells: Vec<String>) {
    if cells.iter().any(|cell| !cell.trim().is_empty()) {
        rows.push(SourceRow { line, cells });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(rows: &[SourceRow]) -> Vec<Vec<&str>> {
        rows.iter().map(|r| r.cells.iter().map(String::as_str).collect()).collect()
    }

    fn lines(rows: &[SourceRow]) -> Vec<usize> {
        rows.iter().map(|r| r.line).collect()
    }

    #[test]
    fn test_simple_rows() {
        let rows = parse_csv("name,qty\nTips,3\n").unwrap();
        assert_eq!(cells(&rows), vec![vec!["name", "qty"], vec!["Tips", "3"]]);
        assert_eq!(lines(&rows), vec![1, 2]);
    }

    #[test]
    fn test_quoted_fields() {
        let rows = parse_csv("name,notes\r\n\"Gloves, nitrile\",\"size \"\"M\"\"\"\r\n").unwrap();
        assert_eq!(rows[1].cells, vec!["Gloves, nitrile", "size \"M\""]);
    }

    #[test]
    fn test_newline_inside_quotes() {
        let rows = parse_csv("a,b\n\"line one\r\nline two\",x").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].cells[0], "line one\nline two");
        assert_eq!(rows[1].cells[1], "x");
    }

    #[test]
    fn test_bom_and_blank_lines() {
        let rows = parse_csv("\u{feff}a,b\n\n , \n1,2").unwrap();
        assert_eq!(cells(&rows), vec![vec!["a", "b"], vec!["1", "2"]]);
        assert_eq!(lines(&rows), vec![1, 4]);
    }

    #[test]
    fn test_trailing_empty_cell_is_kept() {
        let rows = parse_csv("a,b,c\n1,2,\n").unwrap();
        assert_eq!(rows[1].cells, vec!["1", "2", ""]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(parse_csv("a,b\n1,\"oops\n2,3"), Err(ImportError::UnterminatedQuote { line: 2 }));
    }

    #[test]
    fn test_row_lines_after_multiline_cell() {
        let rows = parse_csv("item,notes\n\"Tips\",\"two\nlines\"\r\n\r\nAgar,x\n").unwrap();
        assert_eq!(lines(&rows), vec![1, 2, 5]);
        assert_eq!(rows[2].cells[0], "Agar");
    }
}
