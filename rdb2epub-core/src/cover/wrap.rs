/// Greedy line wrapping of a title.
///
/// Words are separated by single spaces. Each word is appended to the current
/// line together with a trailing space and the line is measured; when it gets
/// wider than `max_width` the line as it was before the word is emitted and
/// the word starts the next line. Words are never split, so a word wider than
/// `max_width` sits alone on its line. Whatever remains after the last word is
/// emitted as the final line.
pub fn wrap_title<F>(title: &str, max_width: u32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> u32,
{
    let mut lines = Vec::new();
    let mut buffer = String::new();

    for word in title.split(' ') {
        let previous_len = buffer.len();
        buffer.push_str(word);
        buffer.push(' ');

        if measure(&buffer) > max_width {
            // an overflowing first word has no previous line to emit
            if previous_len > 0 {
                lines.push(buffer[..previous_len].trim_end().to_string());
            }
            buffer.drain(..previous_len);
        }
    }

    lines.push(buffer.trim_end().to_string());
    lines
}
