//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use caltrack_core::Item;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print a single item
    pub fn print_item(&self, item: &Item) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", item.id);
                println!("Name:     {}", item.name);
                println!("Calories: {}", item.calories);
            }
            OutputFormat::Json => {
                println!("{:#}", serde_json::json!(item));
            }
            OutputFormat::Quiet => {
                println!("{}", item.id);
            }
        }
    }

    /// Print the item list followed by the total
    pub fn print_items(&self, items: &[Item], total: u64) {
        match self.format {
            OutputFormat::Human => {
                if items.is_empty() {
                    println!("No items found.");
                } else {
                    for item in items {
                        println!(
                            "{:>4} | {} | {} Calories",
                            item.id,
                            truncate(&item.name, 40),
                            item.calories
                        );
                    }
                    println!();
                }
                println!("Total Calories: {} ({} item(s))", total, items.len());
            }
            OutputFormat::Json => {
                println!(
                    "{:#}",
                    serde_json::json!({"items": items, "total": total})
                );
            }
            OutputFormat::Quiet => {
                for item in items {
                    println!("{}", item.id);
                }
            }
        }
    }

    /// Print only the total
    pub fn print_total(&self, total: u64, count: usize) {
        match self.format {
            OutputFormat::Human => {
                println!("Total Calories: {} ({} item(s))", total, count);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"total": total, "count": count}));
            }
            OutputFormat::Quiet => {
                println!("{}", total);
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
