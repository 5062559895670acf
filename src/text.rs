//! Text cleanup for review content before submission.
//!
//! Review text arrives as arbitrary UTF-8 with HTML markup and entities,
//! smart punctuation and stray control characters. The destination endpoint
//! has been observed to stall on some of these, so everything is reduced to
//! a transport-safe ASCII subset before posting. All functions here are pure.

/// Suffix appended to truncated text.
pub const DEFAULT_ELLIPSIS: &str = "...";

/// Remove HTML/XML tags, keeping only the text between them.
///
/// An unterminated tag swallows the rest of the input, which matches how
/// upstream strips markup and is the safe choice for transport.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Clean arbitrary free text into a bounded, transport-safe ASCII string.
///
/// Steps, in order (each feeds the next):
/// 1. Decode HTML entities.
/// 2. Replace Unicode bullets with `"- "` and dash variants with `"-"`.
/// 3. Unify line breaks to `\n`.
/// 4. Strip ASCII control characters (tab and newline survive).
/// 5. With `allow_line_breaks`: strip horizontal whitespace around newlines;
///    otherwise collapse all whitespace runs into single spaces.
/// 6. Convert non-breaking spaces to spaces, collapse space/tab runs.
/// 7. With `allow_line_breaks`: cap consecutive newlines at one blank line.
/// 8. Transliterate to ASCII and drop anything outside tab/LF/CR/0x20-0x7E.
/// 9. Trim.
pub fn normalize(text: &str, allow_line_breaks: bool) -> String {
    if text.is_empty() {
        return String::new();
    }

    let decoded = html_escape::decode_html_entities(text);

    let mut replaced = String::with_capacity(decoded.len());
    for ch in decoded.chars() {
        match ch {
            '\u{2022}' | '\u{2023}' | '\u{25CF}' => replaced.push_str("- "),
            '\u{2013}' | '\u{2014}' | '\u{2015}' => replaced.push('-'),
            _ => replaced.push(ch),
        }
    }

    let unified = replaced.replace("\r\n", "\n").replace('\r', "\n");
    let stripped: String = unified.chars().filter(|&c| !is_stripped_control(c)).collect();

    let collapsed = if allow_line_breaks {
        collapse_around_newlines(&stripped)
    } else {
        collapse_all_whitespace(&stripped)
    };

    let spaced = collapse_spaces_and_tabs(&collapsed.replace('\u{a0}', " "));

    let paragraphed = if allow_line_breaks {
        collapse_blank_lines(&spaced)
    } else {
        spaced
    };

    transliterate_to_ascii(&paragraphed).trim().to_string()
}

/// Control characters removed outright: 0x00-0x08, 0x0B-0x0C, 0x0E-0x1F, 0x7F.
/// Tab, LF and CR are handled by the whitespace passes instead.
fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0b}' | '\u{0c}' | '\u{0e}'..='\u{1f}' | '\u{7f}')
}

/// Collapse every whitespace run that contains a newline down to just its
/// newlines, so indentation and trailing spaces around breaks disappear while
/// paragraph breaks (double newlines) survive for the blank-line pass.
fn collapse_around_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = String::new();
    let mut newlines = 0usize;
    for ch in text.chars() {
        if ch == ' ' || ch == '\t' || ch == '\n' {
            run.push(ch);
            if ch == '\n' {
                newlines += 1;
            }
        } else {
            flush_whitespace_run(&mut out, &mut run, &mut newlines);
            out.push(ch);
        }
    }
    flush_whitespace_run(&mut out, &mut run, &mut newlines);
    out
}

fn flush_whitespace_run(out: &mut String, run: &mut String, newlines: &mut usize) {
    if *newlines > 0 {
        for _ in 0..*newlines {
            out.push('\n');
        }
    } else {
        out.push_str(run);
    }
    run.clear();
    *newlines = 0;
}

fn collapse_all_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for ch in text.chars() {
        if ch.is_ascii_whitespace() {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}

fn collapse_spaces_and_tabs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for ch in text.chars() {
        if ch == ' ' || ch == '\t' {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}

/// Cap runs of 2+ newlines at exactly one blank line.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0usize;
    for ch in text.chars() {
        if ch == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push('\n');
            }
        } else {
            newlines = 0;
            out.push(ch);
        }
    }
    out
}

/// Convert UTF-8 text into a safe ASCII subset for API transport.
///
/// Transliteration is best effort and never fails; characters with no ASCII
/// equivalent are dropped. The final filter keeps only tab, LF, CR and
/// printable ASCII.
fn transliterate_to_ascii(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    deunicode::deunicode_with_tofu(text, "")
        .chars()
        .filter(|&c| c == '\t' || c == '\n' || c == '\r' || (' '..='~').contains(&c))
        .collect()
}

/// Limit text to `max_length` code points with the default `"..."` suffix.
pub fn limit_text(text: &str, max_length: usize) -> String {
    limit_text_with(text, max_length, DEFAULT_ELLIPSIS)
}

/// Limit text to `max_length` code points, preserving word boundaries where
/// possible and appending `ellipsis` when truncation occurs.
///
/// Lengths are counted in code points, not bytes. The output never exceeds
/// `max_length` code points.
pub fn limit_text_with(text: &str, max_length: usize, ellipsis: &str) -> String {
    let text = text.trim();
    if text.is_empty() || max_length == 0 {
        return String::new();
    }

    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let ellipsis_len = ellipsis.chars().count();
    if max_length <= ellipsis_len {
        if ellipsis_len == 0 || ellipsis_len > max_length {
            return text.chars().take(max_length).collect();
        }
        return ellipsis.to_string();
    }

    let slice: String = text.chars().take(max_length - ellipsis_len).collect();
    let slice = slice.trim_end();

    // Back off to the last whitespace so we don't cut mid-word; keep the
    // hard cut when the slice is a single unbroken word.
    let backed = match slice.rfind(|c: char| c.is_whitespace()) {
        Some(idx) => slice[..idx].trim_end(),
        None => slice,
    };
    let kept = if backed.is_empty() { slice } else { backed };

    format!("{}{}", kept, ellipsis)
}

/// Word-count excerpt for display tables: keep the first `max_words` words,
/// appending `"..."` when anything was dropped.
pub fn trim_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        words.join(" ")
    } else {
        format!("{}{}", words[..max_words].join(" "), DEFAULT_ELLIPSIS)
    }
}
