use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use animaster_config::{AnimasterConfig, LoggingConfig, PlaybackConfig};
use animaster_core::{Scheduler, TimerQueue};
use anyhow::{Context, Result};

mod stage;
use stage::{Stage, Trigger};

fn init_logging(config: &LoggingConfig) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filter) = &config.filter {
        builder.parse_filters(filter);
    }
    let _ = builder.try_init();
}

/// Drive the queue up to `run_for_ms`, either instantly or against the wall clock.
fn run(queue: &TimerQueue, config: &PlaybackConfig) {
    let end = queue.now_ms() + config.run_for_ms.max(0.0);

    if config.realtime {
        while let Some(deadline) = queue.next_deadline().filter(|d| *d <= end) {
            let wait_ms = (deadline - queue.now_ms()) * config.time_scale;
            if let Ok(wait) = Duration::try_from_secs_f64(wait_ms / 1000.0) {
                std::thread::sleep(wait);
            }
            queue.advance_to(deadline);
        }
    }

    let fired = queue.advance_to(end);
    log::debug!("virtual run fired {} callbacks", fired);
}

fn main() -> Result<()> {
    let config = AnimasterConfig::load();
    init_logging(&config.logging);

    let queue = TimerQueue::new();
    let stage = Rc::new(RefCell::new(Stage::new(&queue, config.demo.durations.clone())));

    for event in config.sorted_events() {
        let trigger: Trigger = event
            .trigger
            .parse()
            .with_context(|| format!("trigger at {}ms", event.at_ms))?;
        let stage = Rc::clone(&stage);
        queue.schedule_after(
            event.at_ms,
            Box::new(move || stage.borrow_mut().fire(trigger)),
        );
    }

    log::info!(
        "running {} triggers for {}ms ({})",
        config.demo.events.len(),
        config.playback.run_for_ms,
        if config.playback.realtime {
            "realtime"
        } else {
            "virtual time"
        }
    );
    run(&queue, &config.playback);

    log::info!("state at {}ms:", queue.now_ms());
    for block in stage.borrow().blocks() {
        log::info!("  {block}");
    }
    if !queue.is_idle() {
        log::info!("{} callbacks still pending", queue.pending());
    }

    Ok(())
}
