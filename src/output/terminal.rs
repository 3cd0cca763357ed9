// Colored terminal output for verdicts and batch summaries.

use colored::Colorize;

use crate::screen::FilterResult;

/// Truncate to at most `max` characters, appending an ellipsis when cut.
/// Operates on chars, not bytes, so multibyte text never splits mid-glyph.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}...")
    }
}

/// Display one check result with its source text.
pub fn display_result(text: &str, result: &FilterResult) {
    let preview = truncate_chars(text, 60);

    match result {
        FilterResult::Evaluated(v) if v.safe => {
            let score = v
                .score
                .map(|s| format!(" (score: {s:.2})"))
                .unwrap_or_default();
            println!("{} {}{}", "✅ Safe".green().bold(), preview, score.dimmed());
        }
        FilterResult::Evaluated(v) => {
            println!(
                "{} {}",
                "❌ Blocked:".red().bold(),
                v.reason.as_deref().unwrap_or("unknown reason")
            );
            if !v.matched_rules.is_empty() {
                println!("   Matched rules: {}", v.matched_rules.join(", ").dimmed());
            }
            if let Some(filtered) = &v.filtered_content {
                println!("   Filtered: {}", truncate_chars(filtered, 60));
            }
        }
        FilterResult::ToolFailure { message } => {
            println!("{} {}", "!! Filter failed:".yellow().bold(), message);
        }
    }
}

/// Display an index-aligned batch with a closing summary.
pub fn display_batch(texts: &[String], results: &[FilterResult]) {
    println!("\n{}", "Batch results".bold());
    println!("{}", "-".repeat(40).dimmed());

    for (i, (text, result)) in texts.iter().zip(results).enumerate() {
        let marker = match result {
            FilterResult::Evaluated(v) if v.safe => "✅".to_string(),
            FilterResult::Evaluated(_) => "❌".to_string(),
            FilterResult::ToolFailure { .. } => "!!".yellow().to_string(),
        };
        let score = match result {
            FilterResult::Evaluated(v) => v
                .score
                .map(|s| format!(" (score: {s:.2})"))
                .unwrap_or_default(),
            FilterResult::ToolFailure { .. } => " (tool failure)".to_string(),
        };
        println!(
            "{}. {} {}{}",
            i + 1,
            marker,
            truncate_chars(text, 50),
            score.dimmed()
        );
    }

    let safe = results.iter().filter(|r| r.is_safe()).count();
    let failed = results
        .iter()
        .filter(|r| matches!(r, FilterResult::ToolFailure { .. }))
        .count();

    println!();
    println!("Summary: {safe}/{} items are safe", results.len());
    if failed > 0 {
        println!(
            "{}",
            format!("{failed} check(s) failed to run — review before publishing").yellow()
        );
    }
}
