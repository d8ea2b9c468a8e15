//! ui::prompts
//!
//! Operator cancel window before destructive actions.
//!
//! There are no interactive questions: the operator cancels a pending
//! release by interrupting the process (Ctrl-C) while the countdown runs.

use std::time::Duration;

use super::output::Logger;

/// Announce a pending action and wait `delay`, one second at a time.
///
/// Returns immediately for a zero delay.
pub fn countdown(logger: &Logger, action: &str, delay: Duration) {
    countdown_with(logger, action, delay, std::thread::sleep);
}

/// [`countdown`] with an injectable sleep function.
pub fn countdown_with(
    logger: &Logger,
    action: &str,
    delay: Duration,
    mut sleep: impl FnMut(Duration),
) {
    let secs = delay.as_secs();
    if secs == 0 {
        return;
    }

    logger.warn(format!(
        "{} in {} seconds. Press Ctrl-C to cancel.",
        action, secs
    ));
    for remaining in (1..=secs).rev() {
        logger.info(format!("{}...", remaining));
        sleep(Duration::from_secs(1));
    }
}
