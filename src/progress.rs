//! Progress bar display for batch runs

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for a fixed-length batch of items
pub struct ProgressDisplay {
    pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new progress display with a total item count
    pub fn new(total: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let pb = ProgressBar::new(total);
        pb.set_style(style);

        Self { pb }
    }

    /// Set the total once it is known (listing-driven batches)
    pub fn set_total(&self, total: u64) {
        self.pb.set_length(total);
    }

    /// Show the item currently being processed
    pub fn update(&self, item: &str) {
        // Truncate long names for display
        let display = if item.len() > 50 {
            format!("...{}", &item[item.len() - 47..])
        } else {
            item.to_string()
        };
        self.pb.set_message(display);
    }

    /// Print a status line above the bar. Batch runs are often piped;
    /// status always lands on stdout whether or not the bar is drawn.
    pub fn status(&self, line: String) {
        if self.pb.is_hidden() {
            println!("{}", line);
        } else {
            self.pb.println(line);
        }
    }

    /// Advance the bar by one item
    pub fn inc(&self) {
        self.pb.inc(1);
    }

    /// Finish the bar
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.pb.abandon();
    }
}
