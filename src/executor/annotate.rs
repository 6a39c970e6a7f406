/// Positional error messages
///
/// Native rejections usually start with `line L:C` followed by free text.
/// The position is spliced into the query as a visible marker for display;
/// the query itself is never modified.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatedError {
    /// 1-based line, 0-based column
    Located {
        line: usize,
        column: usize,
        detail: String,
    },
    Unlocated {
        message: String,
    },
}

/// Query annotated with the position of an error, if one was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub error: LocatedError,
    pub query: Option<String>,
}

fn parse_position(token: &str) -> Option<(usize, usize)> {
    let (line, column) = token.split_once(':')?;
    let line = line.parse().ok()?;
    let column = column.trim_end_matches([':', ',']).parse().ok()?;
    Some((line, column))
}

/// Splits `line L:C detail...` into its position and detail.
#[must_use]
pub fn locate(message: &str) -> LocatedError {
    let tokens: Vec<&str> = message.split_whitespace().collect();
    if tokens.len() >= 2 && tokens[0].eq_ignore_ascii_case("line") {
        if let Some((line, column)) = parse_position(tokens[1]) {
            return LocatedError::Located {
                line,
                column,
                detail: tokens[2..].join(" "),
            };
        }
    }
    LocatedError::Unlocated {
        message: message.to_string(),
    }
}

/// Copy of `query` with `marker` inserted at `column` of `line`.
///
/// Positions past the end of the text are clamped to the last line / end of line.
#[must_use]
pub fn render_with_marker(query: &str, line: usize, column: usize, marker: &str) -> String {
    let lines: Vec<&str> = query.split('\n').collect();
    let target = line.clamp(1, lines.len()) - 1;

    lines
        .iter()
        .enumerate()
        .map(|(i, text)| {
            if i == target {
                let at = text.char_indices().nth(column).map_or(text.len(), |(b, _)| b);
                format!("{}{marker}{}", &text[..at], &text[at..])
            } else {
                (*text).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn annotate(query: &str, message: &str, marker: &str) -> Annotation {
    let error = locate(message);
    let query = match &error {
        LocatedError::Located { line, column, .. } => {
            Some(render_with_marker(query, *line, *column, marker))
        }
        LocatedError::Unlocated { .. } => None,
    };
    Annotation { error, query }
}
