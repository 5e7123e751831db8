use std::io::Write;

/// Prompt and read one line from stdin. An empty read means end of input.
pub fn readline() -> Result<Option<String>, String> {
    write!(std::io::stdout(), "atlas> ").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())?;

    let mut buffer = String::new();
    let read = std::io::stdin()
        .read_line(&mut buffer)
        .map_err(|e| e.to_string())?;
    Ok((read > 0).then_some(buffer))
}
