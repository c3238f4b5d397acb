use acquire::Handle;
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

const BYTES_STYLE: &str =
    "{spinner:.blue} {prefix:>10} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const UNSIZED_STYLE: &str = "{spinner:.blue} {prefix:>10} [{elapsed_precise}] {bytes} ({bytes_per_sec}) {wide_msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static SIZED: Lazy<ProgressStyle> = Lazy::new(|| style(BYTES_STYLE));
static UNSIZED: Lazy<ProgressStyle> = Lazy::new(|| style(UNSIZED_STYLE));

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_chars(TICK)
        .progress_chars(PB_CHARS)
}

/// Progress bar mirroring a handle's counters between polls.
pub struct ProgressTracker {
    pb: ProgressBar,
    sized: bool,
}

impl ProgressTracker {
    pub fn new(label: &'static str, quiet: bool) -> Self {
        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::no_length()
        };
        pb.set_style(UNSIZED.clone());
        pb.set_prefix(label);
        Self { pb, sized: false }
    }

    pub fn observe(&mut self, handle: &Handle) {
        if let Ok(total) = u64::try_from(handle.total_size()) {
            if !self.sized {
                self.pb.set_style(SIZED.clone());
                self.sized = true;
            }
            self.pb.set_length(total);
        }
        if let Ok(bytes) = u64::try_from(handle.bytes_processed()) {
            self.pb.set_position(bytes);
        }
        if !self.sized {
            if let Some(file) = handle.current_file() {
                self.pb.set_message(file.display().to_string());
            }
        }
        self.pb.tick();
    }

    pub fn finish(&self) {
        self.pb.finish();
    }

    pub fn abandon(&self) {
        self.pb.abandon();
    }
}
