//! Transcript parsing for dumb-terminal interpreter output.

/// Extracts `(score, moves)` from a status line, if the transcript contains
/// one.
///
/// V3 games render a status line such as
/// ` West of House                          Score: 0        Moves: 0`
/// at the top of each response in dumb mode.
#[must_use]
pub fn parse_status(raw: &str) -> Option<(i32, u32)> {
    for line in raw.lines() {
        if let (Some(score), Some(moves)) = (
            field_after::<i32>(line, "Score:"),
            field_after::<u32>(line, "Moves:"),
        ) {
            return Some((score, moves));
        }
    }
    None
}

fn field_after<T: std::str::FromStr>(line: &str, label: &str) -> Option<T> {
    let rest = line.split(label).nth(1)?;
    rest.split_whitespace().next()?.parse().ok()
}

/// Normalizes a raw transcript chunk into an observation.
///
/// Drops carriage returns, status lines, and the trailing input prompt, then
/// trims surrounding blank lines.
#[must_use]
pub fn clean_transcript(raw: &str) -> String {
    let unfolded = raw.replace('\r', "");
    let mut lines: Vec<&str> = unfolded
        .lines()
        .filter(|line| !is_status_line(line))
        .map(str::trim_end)
        .collect();

    // The interpreter leaves its input prompt as the final line.
    while let Some(last) = lines.last() {
        let trimmed = last.trim();
        if trimmed.is_empty() || trimmed == ">" {
            lines.pop();
        } else {
            break;
        }
    }
    while lines.first().is_some_and(|line| line.trim().is_empty()) {
        lines.remove(0);
    }

    lines.join("\n")
}

fn is_status_line(line: &str) -> bool {
    line.contains("Score:") && line.contains("Moves:")
}

/// Whether the transcript announces the end of the episode.
///
/// Games print a starred banner such as `*** You have died ***` when the
/// episode terminates.
#[must_use]
pub fn is_game_over(text: &str) -> bool {
    text.lines().any(|line| {
        let trimmed = line.trim();
        trimmed.starts_with("***") && trimmed.ends_with("***") && trimmed.len() > 6
    })
}
