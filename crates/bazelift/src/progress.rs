//! Download progress rendering on stderr

use std::io::Write;

/// Progress callback for the artifact download: a carriage-return line with
/// running megabytes and percentage, finished with a newline. Never invoked
/// on a cache hit, so a cached run prints nothing.
pub fn report(downloaded: u64, total: u64) {
    if total > 0 {
        let percent = (downloaded as f64 / total as f64 * 100.0) as u8;
        let mb_downloaded = downloaded as f64 / 1_048_576.0;
        let mb_total = total as f64 / 1_048_576.0;
        eprint!(
            "\r  Progress: {:.1} / {:.1} MB ({}%)",
            mb_downloaded, mb_total, percent
        );
        std::io::stderr().flush().ok();

        if downloaded == total {
            eprintln!(); // Newline after completion
        }
    }
}
