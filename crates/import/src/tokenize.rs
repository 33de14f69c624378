/// Split one line of text into fields.
///
/// A `"` flips the quoted state wherever it appears and is not copied into
/// the field; the delimiter is literal while quoted. There is no escaping
/// beyond that, so an unterminated quote runs to the end of the line.
/// Fields are trimmed. The result always holds at least one field.
pub fn split_row(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.trim_end_matches(['\r', '\n']).chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Split text into lines on `\n`, `\r\n` or a bare `\r`.
///
/// Old Mac-style exports end lines with `\r` alone.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().flat_map(|line| line.split('\r'))
}
