/// Characters that keep a special meaning inside a double-quoted `sh` word.
const DOUBLE_QUOTE_SPECIALS: [char; 4] = ['\\', '"', '`', '$'];

/// Escape free-form text for interpolation between double quotes.
pub fn escape_double_quoted(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        if DOUBLE_QUOTE_SPECIALS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Wrap `text` as a single double-quoted shell word.
pub fn quote(text: &str) -> String {
    format!("\"{}\"", escape_double_quoted(text))
}

/// Render a program and its arguments as one `sh -c` command line.
pub fn render_command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program.to_string())
        .chain(args.iter().map(|arg| quote(arg)))
        .collect::<Vec<_>>()
        .join(" ")
}
