//! `foliosync` demo
//!
//! Mounts the configured page, replays a scripted browsing session against
//! the real-time event loop and logs every state the renderer would receive.

use anyhow::{Context, Result};
use foliosync::{
    config::{ConfigManager, PageConfig},
    layout::{DocumentLayout, Rect},
    page::{PageController, PageEvent, PageState},
    utils,
};
use parking_lot::Mutex;
use std::sync::{Arc, mpsc};
use std::time::Duration;
use tracing::{info, warn};

/// Renderer channel capacity
const STATE_CHANNEL_CAPACITY: usize = 32;

/// Viewport height used for the scripted session
const VIEWPORT_HEIGHT: f64 = 800.0;

/// Height of each section in the synthetic layout
const SECTION_HEIGHT: f64 = 900.0;

fn main() -> Result<()> {
    utils::init_logging().context("Failed to initialize logging system")?;

    let config = ConfigManager::load().context("Failed to load page configuration")?;
    info!(
        "Configuration loaded: {} sections, {} stats, {} testimonials",
        config.sections.len(),
        config.stats.len(),
        config.testimonials.len()
    );

    let layout = demo_layout(&config);
    let script = demo_script(&config, &layout);

    let (event_tx, event_rx) = mpsc::channel::<PageEvent>();
    let (state_tx, state_rx) = mpsc::sync_channel::<PageState>(STATE_CHANNEL_CAPACITY);

    let controller = Arc::new(Mutex::new(PageController::new(config, event_rx, state_tx)));
    controller.lock().send_initial_state();

    let renderer = std::thread::spawn(move || {
        let mut frames = 0usize;
        for state in state_rx {
            frames += 1;
            info!(
                "Frame {}: active={:?} nav_visible={} carousel={:?} counters={:?}",
                frames,
                state.active_section,
                state.nav_visible,
                state.carousel_index,
                state
                    .counters
                    .iter()
                    .map(|c| c.display.as_str())
                    .collect::<Vec<_>>()
            );
            if let Some(request) = &state.scroll_request {
                info!("Frame {}: scroll to '{}' at {}", frames, request.section, request.target_y);
            }
        }
        frames
    });

    let loop_handle = PageController::spawn_event_loop(Arc::clone(&controller))
        .context("Page event loop was already running")?;

    for (pause, event) in script {
        std::thread::sleep(pause);
        if event_tx.send(event).is_err() {
            warn!("Event loop stopped before the script finished");
            break;
        }
    }

    if loop_handle.join().is_err() {
        warn!("Page event loop panicked");
    }
    drop(controller);

    let frames = renderer.join().unwrap_or_default();
    info!("Session finished after {} frames", frames);
    println!("foliosync session finished: {frames} frames rendered; see the log for details");

    Ok(())
}

/// Stack the configured sections and place each reveal entity near the top
/// of a section, cycling through them in order.
fn demo_layout(config: &PageConfig) -> DocumentLayout {
    let mut layout = DocumentLayout::new(VIEWPORT_HEIGHT);
    let mut top = 0.0;
    for section in &config.sections {
        layout = layout.with_section(section.id.clone(), top);
        top += SECTION_HEIGHT;
    }

    let section_count = config.sections.len().max(1);
    for (index, reveal) in config.reveals.iter().enumerate() {
        let section_top = config
            .sections
            .get((index + 1) % section_count)
            .and_then(|s| layout.section_offset(&s.id))
            .unwrap_or(0.0);
        layout = layout.with_entity(reveal.id.clone(), Rect::new(section_top + 100.0, 400.0));
    }
    layout
}

/// Pause-then-event pairs for a short browsing session
fn demo_script(config: &PageConfig, layout: &DocumentLayout) -> Vec<(Duration, PageEvent)> {
    let ms = Duration::from_millis;
    let mut script = vec![(ms(50), PageEvent::Layout(layout.clone()))];

    for section in &config.sections {
        if let Some(top) = layout.section_offset(&section.id) {
            script.push((ms(400), PageEvent::Scroll { scroll_y: top }));
        }
    }

    script.push((ms(500), PageEvent::SelectTestimonial(1)));
    script.push((ms(200), PageEvent::ToggleMobileMenu));
    if let Some(first) = config.sections.first() {
        script.push((ms(200), PageEvent::NavigateTo(first.id.clone())));
        script.push((ms(50), PageEvent::Scroll { scroll_y: 0.0 }));
    }
    script.push((ms(2500), PageEvent::Shutdown));
    script
}
