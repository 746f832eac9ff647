//! Output formatting for CLI

use crate::predictors::PredictorStats;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a rate in `[0, 1]` as a percentage
pub fn format_percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print the score block shared by every command
pub fn print_stats(stats: &PredictorStats) {
    print_kv("Rounds", &format_number(stats.total_games));
    print_kv("AI wins", &format_number(stats.wins));
    print_kv("Opponent wins", &format_number(stats.losses));
    print_kv("Ties", &format_number(stats.ties));
    print_kv("AI win rate", &format_percent(stats.ai_win_rate));
    print_kv("Opponent win rate", &format_percent(stats.player_win_rate));
}
