//! Command-line grammar of the interactive editor.
//!
//! A command is `verb -arg0 -arg1 …`: the literal `-` separates the verb
//! from each argument, and whitespace around every token is trimmed.  An
//! argument may contain embedded spaces; verbs that take lists (like
//! `del`) split them further themselves.  Because `-` is the delimiter it
//! can never appear inside a widget name.

/// Split one input line into its verb and argument tokens.
///
/// An all-whitespace line yields an empty verb, which the loop skips.
pub fn parse(input: &str) -> (String, Vec<String>) {
    let mut tokens = input.trim().split('-').map(str::trim);
    let verb = tokens.next().unwrap_or_default().to_string();
    let args = tokens.map(str::to_string).collect();
    (verb, args)
}
